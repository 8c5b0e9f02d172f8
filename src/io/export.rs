use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::Write;

use crate::application::LedgerService;
use crate::domain::{Account, Transaction};

/// Database snapshot for full export
#[derive(Debug, Clone, Serialize)]
pub struct WalletSnapshot {
    pub version: String,
    pub exported_at: DateTime<Utc>,
    pub accounts: Vec<Account>,
    pub transactions: Vec<Transaction>,
}

/// Exporter for writing wallet statements in various formats
pub struct Exporter<'a> {
    service: &'a LedgerService,
}

impl<'a> Exporter<'a> {
    pub fn new(service: &'a LedgerService) -> Self {
        Self { service }
    }

    /// Export the transaction log to CSV format, newest-first.
    pub async fn export_transactions_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let transactions = self.service.all_transactions().await?;
        let mut csv_writer = csv::Writer::from_writer(writer);

        // Write header
        csv_writer.write_record([
            "id",
            "sequence",
            "kind",
            "amount_cents",
            "description",
            "sender",
            "recipient",
            "created_at",
            "status",
            "points_earned",
        ])?;

        let mut count = 0;
        for tx in &transactions {
            csv_writer.write_record([
                tx.id.to_string(),
                tx.sequence.to_string(),
                tx.kind.as_str().to_string(),
                tx.amount_cents.to_string(),
                tx.description.clone(),
                tx.sender.clone().unwrap_or_default(),
                tx.recipient.clone().unwrap_or_default(),
                tx.created_at.to_rfc3339(),
                tx.status.as_str().to_string(),
                tx.points_earned.map(|p| p.to_string()).unwrap_or_default(),
            ])?;
            count += 1;
        }

        csv_writer.flush()?;
        Ok(count)
    }

    /// Export account balances to CSV format
    pub async fn export_balances_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let accounts = self.service.list_accounts().await?;
        let mut csv_writer = csv::Writer::from_writer(writer);

        // Write header
        csv_writer.write_record(["handle", "name", "balance_cents", "loyalty_points", "tier"])?;

        let mut count = 0;
        for account in &accounts {
            csv_writer.write_record([
                account.handle.clone(),
                account.display_name(),
                account.balance_cents.to_string(),
                account.loyalty_points.to_string(),
                account.tier().as_str().to_string(),
            ])?;
            count += 1;
        }

        csv_writer.flush()?;
        Ok(count)
    }

    /// Export accounts and the full transaction log as a JSON snapshot
    pub async fn export_full_json<W: Write>(&self, mut writer: W) -> Result<WalletSnapshot> {
        let accounts = self.service.list_accounts().await?;
        let transactions = self.service.all_transactions().await?;

        let snapshot = WalletSnapshot {
            version: env!("CARGO_PKG_VERSION").to_string(),
            exported_at: Utc::now(),
            accounts,
            transactions,
        };

        let json = serde_json::to_string_pretty(&snapshot)?;
        writer.write_all(json.as_bytes())?;
        writer.flush()?;

        Ok(snapshot)
    }
}

// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use anyhow::Result;
use bursar::application::LedgerService;
use bursar::domain::Account;
use tempfile::TempDir;

/// Helper to create a test service with a temporary database
pub async fn test_service() -> Result<(LedgerService, TempDir)> {
    let temp_dir = TempDir::new()?;
    let db_path = temp_dir.path().join("test.db");
    let service = LedgerService::init(db_path.to_str().unwrap()).await?;
    Ok((service, temp_dir))
}

/// Test fixture: standard student accounts
pub struct Students;

impl Students {
    pub const ADA: &'static str = "20CSC010";
    pub const ADA_PASSWORD: &'static str = "pw123456";
    pub const GRACE: &'static str = "20CSC099";
    pub const GRACE_PASSWORD: &'static str = "hopper42";

    /// Register Ada and leave her logged in
    pub async fn register_ada(service: &LedgerService) -> Result<Account> {
        let account = service
            .register(Self::ADA, "Ada", "Lovelace", "ada@x.edu", Self::ADA_PASSWORD)
            .await?;
        Ok(account)
    }

    /// Register Grace and leave her logged in
    pub async fn register_grace(service: &LedgerService) -> Result<Account> {
        let account = service
            .register(
                Self::GRACE,
                "Grace",
                "Hopper",
                "grace@x.edu",
                Self::GRACE_PASSWORD,
            )
            .await?;
        Ok(account)
    }

    /// Register both students; the session ends up on Ada
    pub async fn register_both(service: &LedgerService) -> Result<()> {
        Self::register_grace(service).await?;
        Self::register_ada(service).await?;
        Ok(())
    }
}

/// Fund the session account. Amount in cents; must clear the top-up minimum.
pub async fn fund_session_account(service: &LedgerService, amount_cents: i64) -> Result<()> {
    service.top_up(amount_cents, "card").await?;
    Ok(())
}

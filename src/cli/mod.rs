use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::application::LedgerService;
use crate::domain::{format_cents, parse_cents, reward_catalog, Tier};

/// Bursar - Campus Wallet Ledger
#[derive(Parser)]
#[command(name = "bursar")]
#[command(about = "A local-first campus wallet with loyalty points, backed by an append-only ledger")]
#[command(version)]
pub struct Cli {
    /// Database file path
    #[arg(short, long, default_value = "bursar.db")]
    pub database: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new database
    Init,

    /// Register a new account and log in
    Register {
        /// Matric number (must be unique)
        handle: String,

        /// First name
        #[arg(long)]
        first_name: String,

        /// Last name
        #[arg(long)]
        last_name: String,

        /// Contact email
        #[arg(long)]
        email: String,

        /// Password
        #[arg(long)]
        password: String,
    },

    /// Log in with matric number and password
    Login {
        /// Matric number
        handle: String,

        /// Password
        #[arg(long)]
        password: String,
    },

    /// Log out (no-op when already logged out)
    Logout,

    /// Show the logged-in account
    Whoami,

    /// Top up the wallet balance
    Topup {
        /// Amount to add (e.g., "1000" or "1000.00"), minimum 500
        amount: String,

        /// Payment method (e.g., card, bank, ussd)
        #[arg(short, long, default_value = "card")]
        method: String,
    },

    /// Send money to another account
    Send {
        /// Recipient matric number
        recipient: String,

        /// Amount to send (e.g., "300" or "300.00"), minimum 100
        amount: String,

        /// Optional note shown in the transaction log
        #[arg(short, long)]
        note: Option<String>,
    },

    /// Pay a campus vendor
    Pay {
        /// Vendor name
        vendor: String,

        /// Amount to pay (e.g., "250" or "250.00")
        amount: String,
    },

    /// Show the wallet balance
    Balance,

    /// List recent transactions, newest first
    History {
        /// Maximum number of transactions to show
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Show loyalty points and tier
    Loyalty,

    /// List the reward catalog
    Rewards,

    /// Redeem a reward from the catalog
    Redeem {
        /// Reward id (see `rewards`)
        id: String,
    },

    /// Search accounts by matric number or name
    Search {
        /// Substring to match
        query: String,
    },

    /// Show the public profile of an account
    Profile {
        /// Matric number
        handle: String,
    },

    /// Export statements to CSV or JSON
    Export {
        /// What to export: transactions, balances, full
        export_type: String,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Commands::Init => {
                LedgerService::init(&self.database).await?;
                println!("Database initialized: {}", self.database);
            }

            Commands::Register {
                handle,
                first_name,
                last_name,
                email,
                password,
            } => {
                let service = LedgerService::connect(&self.database).await?;
                let account = service
                    .register(&handle, &first_name, &last_name, &email, &password)
                    .await?;
                println!(
                    "Registered {} ({}). You are now logged in.",
                    account.display_name(),
                    account.handle
                );
            }

            Commands::Login { handle, password } => {
                let service = LedgerService::connect(&self.database).await?;
                let account = service.login(&handle, &password).await?;
                println!("Logged in as {} ({})", account.display_name(), account.handle);
            }

            Commands::Logout => {
                let service = LedgerService::connect(&self.database).await?;
                service.logout().await?;
                println!("Logged out.");
            }

            Commands::Whoami => {
                let service = LedgerService::connect(&self.database).await?;
                let account = service.current_account().await?;
                println!("Account: {} ({})", account.display_name(), account.handle);
                println!("  Email:    {}", account.email);
                println!("  Balance:  {}", format_cents(account.balance_cents));
                println!(
                    "  Loyalty:  {} points ({})",
                    account.loyalty_points,
                    account.tier()
                );
                println!(
                    "  Created:  {}",
                    account.created_at.format("%Y-%m-%d %H:%M:%S")
                );
            }

            Commands::Topup { amount, method } => {
                let service = LedgerService::connect(&self.database).await?;
                let amount_cents = parse_cents(&amount)
                    .context("Invalid amount format. Use '1000.00' or '1000'")?;

                let transaction = service.top_up(amount_cents, &method).await?;
                println!(
                    "Topped up {} via {} ({})",
                    format_cents(transaction.amount_cents),
                    method,
                    transaction.id
                );
            }

            Commands::Send {
                recipient,
                amount,
                note,
            } => {
                let service = LedgerService::connect(&self.database).await?;
                let amount_cents =
                    parse_cents(&amount).context("Invalid amount format. Use '300.00' or '300'")?;

                let outcome = service.transfer(&recipient, amount_cents, note).await?;
                println!(
                    "Sent {} to {} ({})",
                    format_cents(outcome.transaction.amount_cents),
                    recipient,
                    outcome.transaction.id
                );
                if outcome.points_earned > 0 {
                    println!("Earned {} loyalty points", outcome.points_earned);
                }
                println!("New balance: {}", format_cents(outcome.sender_balance_cents));
            }

            Commands::Pay { vendor, amount } => {
                let service = LedgerService::connect(&self.database).await?;
                let amount_cents =
                    parse_cents(&amount).context("Invalid amount format. Use '250.00' or '250'")?;

                let outcome = service.pay(&vendor, amount_cents).await?;
                println!(
                    "Paid {} to {} ({})",
                    format_cents(outcome.transaction.amount_cents),
                    vendor,
                    outcome.transaction.id
                );
                if outcome.points_earned > 0 {
                    println!("Earned {} loyalty points", outcome.points_earned);
                }
                println!("New balance: {}", format_cents(outcome.balance_cents));
            }

            Commands::Balance => {
                let service = LedgerService::connect(&self.database).await?;
                let balance = service.balance().await?;
                println!("Balance: {}", format_cents(balance));
            }

            Commands::History { limit } => {
                let service = LedgerService::connect(&self.database).await?;
                let transactions = service.list_transactions(limit).await?;

                if transactions.is_empty() {
                    println!("No transactions found.");
                } else {
                    println!(
                        "{:<20} {:<10} {:>12} {:<10} {}",
                        "DATE", "KIND", "AMOUNT", "STATUS", "DESCRIPTION"
                    );
                    println!("{}", "-".repeat(76));
                    for tx in transactions {
                        println!(
                            "{:<20} {:<10} {:>12} {:<10} {}",
                            tx.created_at.format("%Y-%m-%d %H:%M:%S"),
                            tx.kind.as_str(),
                            format_cents(tx.amount_cents),
                            tx.status.as_str(),
                            tx.description
                        );
                    }
                }
            }

            Commands::Loyalty => {
                let service = LedgerService::connect(&self.database).await?;
                let status = service.loyalty_status().await?;
                println!("Loyalty: {} points ({})", status.points, status.tier);
                match Tier::points_to_next(status.points) {
                    Some(needed) => println!("Next tier in {} points", needed),
                    None => println!("Top tier reached"),
                }
            }

            Commands::Rewards => {
                println!("{:<16} {:>8}  {}", "ID", "COST", "REWARD");
                println!("{}", "-".repeat(60));
                for reward in reward_catalog() {
                    println!(
                        "{:<16} {:>8}  {} - {}",
                        reward.id, reward.points_cost, reward.title, reward.description
                    );
                }
            }

            Commands::Redeem { id } => {
                let service = LedgerService::connect(&self.database).await?;
                let points_cost = service.reward_cost(&id).ok_or_else(|| {
                    anyhow::anyhow!("Unknown reward '{}'. See `bursar rewards` for the catalog", id)
                })?;

                let redemption = service.redeem_reward(&id, points_cost).await?;
                println!(
                    "Redeemed '{}' for {} points ({} points remaining)",
                    redemption.reward_id, redemption.points_cost, redemption.points_remaining
                );
            }

            Commands::Search { query } => {
                let service = LedgerService::connect(&self.database).await?;
                let accounts = service.search_accounts(&query).await?;

                if accounts.is_empty() {
                    println!("No accounts found.");
                } else {
                    println!("{:<12} {}", "HANDLE", "NAME");
                    println!("{}", "-".repeat(36));
                    for account in accounts {
                        println!("{:<12} {}", account.handle, account.display_name());
                    }
                }
            }

            Commands::Profile { handle } => {
                let service = LedgerService::connect(&self.database).await?;
                let account = service.get_profile(&handle).await?;
                println!("Account: {} ({})", account.display_name(), account.handle);
                println!("  Email:   {}", account.email);
                println!("  Tier:    {}", account.tier());
                println!(
                    "  Joined:  {}",
                    account.created_at.format("%Y-%m-%d %H:%M:%S")
                );
            }

            Commands::Export {
                export_type,
                output,
            } => {
                let service = LedgerService::connect(&self.database).await?;
                run_export_command(&service, &export_type, output.as_deref()).await?;
            }
        }

        Ok(())
    }
}

async fn run_export_command(
    service: &LedgerService,
    export_type: &str,
    output: Option<&str>,
) -> Result<()> {
    use crate::io::Exporter;
    use std::fs::File;
    use std::io::{stdout, Write};

    let exporter = Exporter::new(service);

    // Determine output writer
    let writer: Box<dyn Write> = match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path))?;
            Box::new(file)
        }
        None => Box::new(stdout()),
    };

    match export_type {
        "transactions" => {
            let count = exporter.export_transactions_csv(writer).await?;
            if output.is_some() {
                eprintln!("Exported {} transactions", count);
            }
        }
        "balances" => {
            let count = exporter.export_balances_csv(writer).await?;
            if output.is_some() {
                eprintln!("Exported {} balances", count);
            }
        }
        "full" => {
            let snapshot = exporter.export_full_json(writer).await?;
            if output.is_some() {
                eprintln!(
                    "Exported full database: {} accounts, {} transactions",
                    snapshot.accounts.len(),
                    snapshot.transactions.len()
                );
            }
        }
        _ => {
            anyhow::bail!(
                "Invalid export type '{}'. Valid types: transactions, balances, full",
                export_type
            );
        }
    }

    Ok(())
}

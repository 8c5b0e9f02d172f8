use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::{Row, Sqlite, SqlitePool};
use uuid::Uuid;

use crate::domain::{
    Account, AccountId, Transaction, TransactionKind, TransactionStatus,
};

use super::MIGRATION_001_INITIAL;

/// The active session: one opaque token resolving to one account.
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub account_id: AccountId,
}

/// Repository for persisting and querying accounts, credentials and the
/// transaction log.
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    /// Create a new repository with the given SQLite connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connect to a SQLite database at the given path.
    /// Creates the database file if it doesn't exist.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = SqlitePool::connect(database_url)
            .await
            .context("Failed to connect to database")?;
        Ok(Self::new(pool))
    }

    /// Run database migrations.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::query(MIGRATION_001_INITIAL)
            .execute(&self.pool)
            .await
            .context("Failed to run migration 001")?;
        Ok(())
    }

    /// Initialize a new database (connect + migrate).
    pub async fn init(database_url: &str) -> Result<Self> {
        let repo = Self::connect(database_url).await?;
        repo.migrate().await?;
        Ok(repo)
    }

    // ========================
    // Account operations
    // ========================

    /// Insert a new account together with its credential record.
    /// Both rows land in one transaction.
    pub async fn create_account(&self, account: &Account, password_hash: &str) -> Result<()> {
        let mut db_tx = self
            .pool
            .begin()
            .await
            .context("Failed to begin transaction")?;

        sqlx::query(
            r#"
            INSERT INTO accounts (id, handle, first_name, last_name, email, balance_cents, loyalty_points, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(account.id.to_string())
        .bind(&account.handle)
        .bind(&account.first_name)
        .bind(&account.last_name)
        .bind(&account.email)
        .bind(account.balance_cents)
        .bind(account.loyalty_points)
        .bind(account.created_at.to_rfc3339())
        .execute(&mut *db_tx)
        .await
        .context("Failed to save account")?;

        sqlx::query("INSERT INTO credentials (account_id, password_hash) VALUES (?, ?)")
            .bind(account.id.to_string())
            .bind(password_hash)
            .execute(&mut *db_tx)
            .await
            .context("Failed to save credential")?;

        db_tx.commit().await.context("Failed to commit account")?;
        Ok(())
    }

    /// Get an account by ID.
    pub async fn get_account(&self, id: AccountId) -> Result<Option<Account>> {
        let row = sqlx::query(
            r#"
            SELECT id, handle, first_name, last_name, email, balance_cents, loyalty_points, created_at
            FROM accounts
            WHERE id = ?
            "#,
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch account")?;

        match row {
            Some(row) => Ok(Some(Self::row_to_account(&row)?)),
            None => Ok(None),
        }
    }

    /// Get an account by its unique handle.
    pub async fn get_account_by_handle(&self, handle: &str) -> Result<Option<Account>> {
        let row = sqlx::query(
            r#"
            SELECT id, handle, first_name, last_name, email, balance_cents, loyalty_points, created_at
            FROM accounts
            WHERE handle = ?
            "#,
        )
        .bind(handle)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch account by handle")?;

        match row {
            Some(row) => Ok(Some(Self::row_to_account(&row)?)),
            None => Ok(None),
        }
    }

    /// List all accounts ordered by handle.
    pub async fn list_accounts(&self) -> Result<Vec<Account>> {
        let rows = sqlx::query(
            r#"
            SELECT id, handle, first_name, last_name, email, balance_cents, loyalty_points, created_at
            FROM accounts
            ORDER BY handle
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to list accounts")?;

        rows.iter().map(Self::row_to_account).collect()
    }

    /// Search accounts by handle or display-name substring, case-insensitive.
    pub async fn search_accounts(&self, query: &str) -> Result<Vec<Account>> {
        let pattern = format!("%{}%", query);
        let rows = sqlx::query(
            r#"
            SELECT id, handle, first_name, last_name, email, balance_cents, loyalty_points, created_at
            FROM accounts
            WHERE handle LIKE ?1 OR (first_name || ' ' || last_name) LIKE ?1
            ORDER BY handle
            "#,
        )
        .bind(&pattern)
        .fetch_all(&self.pool)
        .await
        .context("Failed to search accounts")?;

        rows.iter().map(Self::row_to_account).collect()
    }

    /// Persist the mutable fields of an account (balance and points).
    pub async fn update_account(&self, account: &Account) -> Result<()> {
        sqlx::query("UPDATE accounts SET balance_cents = ?, loyalty_points = ? WHERE id = ?")
            .bind(account.balance_cents)
            .bind(account.loyalty_points)
            .bind(account.id.to_string())
            .execute(&self.pool)
            .await
            .context("Failed to update account")?;
        Ok(())
    }

    /// Fetch the stored password hash for an account.
    pub async fn get_password_hash(&self, account_id: AccountId) -> Result<Option<String>> {
        let row = sqlx::query("SELECT password_hash FROM credentials WHERE account_id = ?")
            .bind(account_id.to_string())
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch credential")?;

        Ok(row.map(|r| r.get("password_hash")))
    }

    fn row_to_account(row: &sqlx::sqlite::SqliteRow) -> Result<Account> {
        let id_str: String = row.get("id");
        let created_at_str: String = row.get("created_at");

        Ok(Account {
            id: Uuid::parse_str(&id_str).context("Invalid account ID")?,
            handle: row.get("handle"),
            first_name: row.get("first_name"),
            last_name: row.get("last_name"),
            email: row.get("email"),
            balance_cents: row.get("balance_cents"),
            loyalty_points: row.get("loyalty_points"),
            created_at: DateTime::parse_from_rfc3339(&created_at_str)
                .context("Invalid created_at timestamp")?
                .with_timezone(&Utc),
        })
    }

    // ========================
    // Transaction log operations
    // ========================

    /// Apply a ledger entry: persist the updated balances/points of the given
    /// accounts and append the transaction record, all inside one database
    /// transaction. Assigns the next sequence number to the record.
    pub async fn record_entry(
        &self,
        accounts: &[&Account],
        transaction: &mut Transaction,
    ) -> Result<()> {
        let mut db_tx = self
            .pool
            .begin()
            .await
            .context("Failed to begin transaction")?;

        for account in accounts {
            sqlx::query("UPDATE accounts SET balance_cents = ?, loyalty_points = ? WHERE id = ?")
                .bind(account.balance_cents)
                .bind(account.loyalty_points)
                .bind(account.id.to_string())
                .execute(&mut *db_tx)
                .await
                .context("Failed to update account")?;
        }

        transaction.sequence = Self::next_sequence(&mut db_tx).await?;

        sqlx::query(
            r#"
            INSERT INTO transactions (id, sequence, kind, amount_cents, description, sender, recipient, created_at, status, points_earned)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(transaction.id.to_string())
        .bind(transaction.sequence)
        .bind(transaction.kind.as_str())
        .bind(transaction.amount_cents)
        .bind(&transaction.description)
        .bind(&transaction.sender)
        .bind(&transaction.recipient)
        .bind(transaction.created_at.to_rfc3339())
        .bind(transaction.status.as_str())
        .bind(transaction.points_earned)
        .execute(&mut *db_tx)
        .await
        .context("Failed to save transaction")?;

        db_tx.commit().await.context("Failed to commit entry")?;
        Ok(())
    }

    /// Get the next sequence number and increment the counter.
    async fn next_sequence(db_tx: &mut sqlx::Transaction<'_, Sqlite>) -> Result<i64> {
        let row = sqlx::query(
            r#"
            UPDATE sequence_counter
            SET value = value + 1
            WHERE name = 'transaction_sequence'
            RETURNING value
            "#,
        )
        .fetch_one(&mut **db_tx)
        .await
        .context("Failed to get next sequence number")?;

        Ok(row.get("value"))
    }

    /// List transactions newest-first, optionally truncated.
    pub async fn list_transactions(&self, limit: Option<usize>) -> Result<Vec<Transaction>> {
        let rows = match limit {
            Some(n) => {
                sqlx::query(
                    r#"
                    SELECT id, sequence, kind, amount_cents, description, sender, recipient, created_at, status, points_earned
                    FROM transactions
                    ORDER BY sequence DESC
                    LIMIT ?
                    "#,
                )
                .bind(n as i64)
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query(
                    r#"
                    SELECT id, sequence, kind, amount_cents, description, sender, recipient, created_at, status, points_earned
                    FROM transactions
                    ORDER BY sequence DESC
                    "#,
                )
                .fetch_all(&self.pool)
                .await
            }
        }
        .context("Failed to list transactions")?;

        rows.iter().map(Self::row_to_transaction).collect()
    }

    /// Count all transactions in the log.
    pub async fn count_transactions(&self) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM transactions")
            .fetch_one(&self.pool)
            .await
            .context("Failed to count transactions")?;
        Ok(row.get("count"))
    }

    fn row_to_transaction(row: &sqlx::sqlite::SqliteRow) -> Result<Transaction> {
        let id_str: String = row.get("id");
        let kind_str: String = row.get("kind");
        let status_str: String = row.get("status");
        let created_at_str: String = row.get("created_at");

        Ok(Transaction {
            id: Uuid::parse_str(&id_str).context("Invalid transaction ID")?,
            sequence: row.get("sequence"),
            kind: TransactionKind::from_str(&kind_str)
                .ok_or_else(|| anyhow::anyhow!("Invalid transaction kind: {}", kind_str))?,
            amount_cents: row.get("amount_cents"),
            description: row.get("description"),
            sender: row.get("sender"),
            recipient: row.get("recipient"),
            created_at: DateTime::parse_from_rfc3339(&created_at_str)
                .context("Invalid created_at timestamp")?
                .with_timezone(&Utc),
            status: TransactionStatus::from_str(&status_str)
                .ok_or_else(|| anyhow::anyhow!("Invalid transaction status: {}", status_str))?,
            points_earned: row.get("points_earned"),
        })
    }

    // ========================
    // Session operations
    // ========================

    /// Store the session token, replacing any existing session.
    pub async fn set_session(&self, token: &str, account_id: AccountId) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO session (id, token, account_id) VALUES (1, ?, ?)
            ON CONFLICT(id) DO UPDATE SET token = excluded.token, account_id = excluded.account_id
            "#,
        )
        .bind(token)
        .bind(account_id.to_string())
        .execute(&self.pool)
        .await
        .context("Failed to set session")?;
        Ok(())
    }

    /// Fetch the current session, if any.
    pub async fn get_session(&self) -> Result<Option<Session>> {
        let row = sqlx::query("SELECT token, account_id FROM session WHERE id = 1")
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch session")?;

        match row {
            Some(row) => {
                let account_id_str: String = row.get("account_id");
                Ok(Some(Session {
                    token: row.get("token"),
                    account_id: Uuid::parse_str(&account_id_str)
                        .context("Invalid session account ID")?,
                }))
            }
            None => Ok(None),
        }
    }

    /// Remove the session row if present.
    pub async fn clear_session(&self) -> Result<()> {
        sqlx::query("DELETE FROM session WHERE id = 1")
            .execute(&self.pool)
            .await
            .context("Failed to clear session")?;
        Ok(())
    }
}

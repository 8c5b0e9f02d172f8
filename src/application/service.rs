use tokio::sync::Mutex;
use uuid::Uuid;

use crate::domain::{
    find_reward, points_for_spend, Account, Cents, Tier, Transaction, TransactionKind,
    MIN_TOP_UP_CENTS, MIN_TRANSFER_CENTS,
};
use crate::storage::Repository;

use super::{credentials, AppError};

/// Application service providing high-level operations for the campus wallet.
/// This is the single authority over balances, loyalty points, credentials
/// and the transaction log; it is the only writer of persisted state.
pub struct LedgerService {
    repo: Repository,
    /// Serializes every check-then-act sequence. The storage layer has no
    /// concurrent-access protection of its own, so all operations on the
    /// same database must funnel through one service instance.
    op_lock: Mutex<()>,
}

/// Result of a peer transfer
pub struct TransferOutcome {
    pub transaction: Transaction,
    pub points_earned: i64,
    pub sender_balance_cents: Cents,
}

/// Result of a vendor payment
pub struct PaymentOutcome {
    pub transaction: Transaction,
    pub points_earned: i64,
    pub balance_cents: Cents,
}

/// Confirmation of a reward redemption
pub struct Redemption {
    pub reward_id: String,
    pub points_cost: i64,
    pub points_remaining: i64,
}

/// Current loyalty standing for the session account
pub struct LoyaltyStatus {
    pub points: i64,
    pub tier: Tier,
}

impl LedgerService {
    /// Create a new ledger service with the given repository.
    pub fn new(repo: Repository) -> Self {
        Self {
            repo,
            op_lock: Mutex::new(()),
        }
    }

    /// Initialize a new database at the given path.
    pub async fn init(database_path: &str) -> Result<Self, AppError> {
        let db_url = format!("sqlite:{}?mode=rwc", database_path);
        let repo = Repository::init(&db_url).await?;
        Ok(Self::new(repo))
    }

    /// Connect to an existing database.
    pub async fn connect(database_path: &str) -> Result<Self, AppError> {
        let db_url = format!("sqlite:{}", database_path);
        let repo = Repository::connect(&db_url).await?;
        Ok(Self::new(repo))
    }

    // ========================
    // Auth operations
    // ========================

    /// Register a new account and open a session for it.
    pub async fn register(
        &self,
        handle: &str,
        first_name: &str,
        last_name: &str,
        email: &str,
        password: &str,
    ) -> Result<Account, AppError> {
        let _guard = self.op_lock.lock().await;

        if self.repo.get_account_by_handle(handle).await?.is_some() {
            return Err(AppError::DuplicateHandle(handle.to_string()));
        }

        let account = Account::new(handle, first_name, last_name, email);
        let password_hash = credentials::hash_password(password)?;

        self.repo.create_account(&account, &password_hash).await?;
        self.open_session(&account).await?;

        Ok(account)
    }

    /// Log in with handle and password, opening a session on success.
    /// Unknown handles and wrong passwords are indistinguishable to the caller.
    pub async fn login(&self, handle: &str, password: &str) -> Result<Account, AppError> {
        let _guard = self.op_lock.lock().await;

        let account = self
            .repo
            .get_account_by_handle(handle)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        let stored_hash = self
            .repo
            .get_password_hash(account.id)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        if !credentials::verify_password(password, &stored_hash) {
            return Err(AppError::InvalidCredentials);
        }

        self.open_session(&account).await?;
        Ok(account)
    }

    /// Resolve the current session to its account, re-read from the store.
    pub async fn current_account(&self) -> Result<Account, AppError> {
        self.session_account().await
    }

    /// Clear the session. Idempotent: a no-op when already logged out.
    pub async fn logout(&self) -> Result<(), AppError> {
        let _guard = self.op_lock.lock().await;
        self.repo.clear_session().await?;
        Ok(())
    }

    // ========================
    // Wallet operations
    // ========================

    /// Credit the session account's balance and record a payment entry.
    pub async fn top_up(&self, amount_cents: Cents, method: &str) -> Result<Transaction, AppError> {
        let _guard = self.op_lock.lock().await;
        let mut account = self.session_account().await?;

        if amount_cents < MIN_TOP_UP_CENTS {
            return Err(AppError::BelowMinimum {
                minimum_cents: MIN_TOP_UP_CENTS,
                amount_cents,
            });
        }

        account.balance_cents += amount_cents;

        let mut transaction = Transaction::new(
            TransactionKind::Payment,
            amount_cents,
            format!("Top up via {}", method),
        );
        self.repo
            .record_entry(&[&account], &mut transaction)
            .await?;

        Ok(transaction)
    }

    /// Move money from the session account to another account. Credits the
    /// sender 1 loyalty point per ₦100 sent. Debit, credit, point credit and
    /// log append apply atomically or not at all.
    pub async fn transfer(
        &self,
        recipient_handle: &str,
        amount_cents: Cents,
        note: Option<String>,
    ) -> Result<TransferOutcome, AppError> {
        let _guard = self.op_lock.lock().await;
        let mut sender = self.session_account().await?;

        let mut recipient = self
            .repo
            .get_account_by_handle(recipient_handle)
            .await?
            .ok_or_else(|| AppError::RecipientNotFound(recipient_handle.to_string()))?;

        if sender.balance_cents < amount_cents {
            return Err(AppError::InsufficientFunds {
                balance_cents: sender.balance_cents,
                required_cents: amount_cents,
            });
        }

        if amount_cents < MIN_TRANSFER_CENTS {
            return Err(AppError::BelowMinimum {
                minimum_cents: MIN_TRANSFER_CENTS,
                amount_cents,
            });
        }

        let points_earned = points_for_spend(amount_cents);
        let description = note.unwrap_or_else(|| format!("Send to {}", recipient.handle));

        let mut transaction = Transaction::new(TransactionKind::Transfer, amount_cents, description)
            .with_sender(sender.handle.clone())
            .with_recipient(recipient.handle.clone())
            .with_points_earned(points_earned);

        if sender.id == recipient.id {
            // Self-transfer nets to zero; only the point credit sticks.
            sender.loyalty_points += points_earned;
            self.repo.record_entry(&[&sender], &mut transaction).await?;
        } else {
            sender.balance_cents -= amount_cents;
            sender.loyalty_points += points_earned;
            recipient.balance_cents += amount_cents;
            self.repo
                .record_entry(&[&sender, &recipient], &mut transaction)
                .await?;
        }

        Ok(TransferOutcome {
            transaction,
            points_earned,
            sender_balance_cents: sender.balance_cents,
        })
    }

    /// Pay a campus vendor from the session account. Credits 1 loyalty point
    /// per ₦100 spent.
    pub async fn pay(&self, vendor_name: &str, amount_cents: Cents) -> Result<PaymentOutcome, AppError> {
        let _guard = self.op_lock.lock().await;
        let mut account = self.session_account().await?;

        if amount_cents <= 0 {
            return Err(AppError::InvalidAmount(
                "Amount must be positive".to_string(),
            ));
        }

        if account.balance_cents < amount_cents {
            return Err(AppError::InsufficientFunds {
                balance_cents: account.balance_cents,
                required_cents: amount_cents,
            });
        }

        let points_earned = points_for_spend(amount_cents);
        account.balance_cents -= amount_cents;
        account.loyalty_points += points_earned;

        let mut transaction = Transaction::new(
            TransactionKind::Payment,
            amount_cents,
            format!("QR payment to {}", vendor_name),
        )
        .with_points_earned(points_earned);

        self.repo
            .record_entry(&[&account], &mut transaction)
            .await?;

        Ok(PaymentOutcome {
            transaction,
            points_earned,
            balance_cents: account.balance_cents,
        })
    }

    // ========================
    // Loyalty operations
    // ========================

    /// Redeem a reward by debiting its point cost from the session account.
    /// Rewards are a static catalog external to the ledger, so nothing is
    /// appended to the transaction log.
    pub async fn redeem_reward(
        &self,
        reward_id: &str,
        points_cost: i64,
    ) -> Result<Redemption, AppError> {
        let _guard = self.op_lock.lock().await;
        let mut account = self.session_account().await?;

        if points_cost <= 0 {
            return Err(AppError::InvalidAmount(
                "Points cost must be positive".to_string(),
            ));
        }

        if account.loyalty_points < points_cost {
            return Err(AppError::InsufficientPoints {
                points: account.loyalty_points,
                required: points_cost,
            });
        }

        account.loyalty_points -= points_cost;
        self.repo.update_account(&account).await?;

        Ok(Redemption {
            reward_id: reward_id.to_string(),
            points_cost,
            points_remaining: account.loyalty_points,
        })
    }

    /// Current points and derived tier for the session account.
    pub async fn loyalty_status(&self) -> Result<LoyaltyStatus, AppError> {
        let account = self.session_account().await?;
        Ok(LoyaltyStatus {
            points: account.loyalty_points,
            tier: account.tier(),
        })
    }

    /// Redeemable cost for a catalog reward id, if it exists.
    pub fn reward_cost(&self, reward_id: &str) -> Option<i64> {
        find_reward(reward_id).map(|r| r.points_cost)
    }

    // ========================
    // Read operations
    // ========================

    /// Current balance for the session account.
    pub async fn balance(&self) -> Result<Cents, AppError> {
        Ok(self.session_account().await?.balance_cents)
    }

    /// List the transaction log newest-first, optionally truncated.
    pub async fn list_transactions(
        &self,
        limit: Option<usize>,
    ) -> Result<Vec<Transaction>, AppError> {
        self.session_account().await?;
        Ok(self.repo.list_transactions(limit).await?)
    }

    /// Public profile view of any account.
    pub async fn get_profile(&self, handle: &str) -> Result<Account, AppError> {
        self.repo
            .get_account_by_handle(handle)
            .await?
            .ok_or_else(|| AppError::UserNotFound(handle.to_string()))
    }

    /// Search accounts by handle or display name substring.
    pub async fn search_accounts(&self, query: &str) -> Result<Vec<Account>, AppError> {
        Ok(self.repo.search_accounts(query).await?)
    }

    /// All accounts, for local statement export.
    pub async fn list_accounts(&self) -> Result<Vec<Account>, AppError> {
        Ok(self.repo.list_accounts().await?)
    }

    /// The full transaction log newest-first, for local statement export.
    pub async fn all_transactions(&self) -> Result<Vec<Transaction>, AppError> {
        Ok(self.repo.list_transactions(None).await?)
    }

    // ========================
    // Session plumbing
    // ========================

    /// Resolve the stored session token to an account, always re-reading the
    /// account from the store. Callers holding `op_lock` use this directly;
    /// it never takes the lock itself.
    async fn session_account(&self) -> Result<Account, AppError> {
        let session = self
            .repo
            .get_session()
            .await?
            .ok_or(AppError::NotAuthenticated)?;

        self.repo
            .get_account(session.account_id)
            .await?
            .ok_or_else(|| AppError::UserNotFound(session.account_id.to_string()))
    }

    async fn open_session(&self, account: &Account) -> Result<(), AppError> {
        let token = Uuid::new_v4().to_string();
        self.repo.set_session(&token, account.id).await?;
        Ok(())
    }
}

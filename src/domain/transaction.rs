use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Cents;

pub type TransactionId = Uuid;

/// Kind tag for a ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Outgoing payment (top-up settlement or vendor payment).
    Payment,
    /// Peer transfer between two accounts.
    Transfer,
    /// Incoming transfer, as seen from the receiving side.
    Received,
    /// Loyalty reward redemption.
    Reward,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Payment => "payment",
            TransactionKind::Transfer => "transfer",
            TransactionKind::Received => "received",
            TransactionKind::Reward => "reward",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "payment" => Some(TransactionKind::Payment),
            "transfer" => Some(TransactionKind::Transfer),
            "received" => Some(TransactionKind::Received),
            "reward" => Some(TransactionKind::Reward),
            _ => None,
        }
    }
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Lifecycle status. Every ledger operation settles synchronously, so only
/// Completed is ever produced; Pending and Failed exist for the display model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Completed,
    Pending,
    Failed,
}

impl TransactionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Completed => "completed",
            TransactionStatus::Pending => "pending",
            TransactionStatus::Failed => "failed",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "completed" => Some(TransactionStatus::Completed),
            "pending" => Some(TransactionStatus::Pending),
            "failed" => Some(TransactionStatus::Failed),
            _ => None,
        }
    }
}

impl std::fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One entry in the append-only transaction log. Entries are created
/// atomically with the balance mutation they record and are immutable
/// afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    /// Monotonically increasing sequence number for newest-first ordering
    pub sequence: i64,
    pub kind: TransactionKind,
    /// Amount in cents (always positive)
    pub amount_cents: Cents,
    pub description: String,
    /// Weak reference to the sending account by handle
    pub sender: Option<String>,
    /// Weak reference to the receiving account by handle
    pub recipient: Option<String>,
    pub created_at: DateTime<Utc>,
    pub status: TransactionStatus,
    /// Loyalty points credited alongside this entry, if any
    pub points_earned: Option<i64>,
}

impl Transaction {
    /// Create a new completed transaction. Sequence number must be assigned
    /// by the repository.
    pub fn new(kind: TransactionKind, amount_cents: Cents, description: impl Into<String>) -> Self {
        assert!(amount_cents > 0, "Transaction amount must be positive");
        Self {
            id: Uuid::new_v4(),
            sequence: 0, // Will be set by repository
            kind,
            amount_cents,
            description: description.into(),
            sender: None,
            recipient: None,
            created_at: Utc::now(),
            status: TransactionStatus::Completed,
            points_earned: None,
        }
    }

    pub fn with_sender(mut self, handle: impl Into<String>) -> Self {
        self.sender = Some(handle.into());
        self
    }

    pub fn with_recipient(mut self, handle: impl Into<String>) -> Self {
        self.recipient = Some(handle.into());
        self
    }

    pub fn with_points_earned(mut self, points: i64) -> Self {
        self.points_earned = Some(points);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_transaction() {
        let tx = Transaction::new(TransactionKind::Transfer, 30_000, "lunch")
            .with_sender("20CSC010")
            .with_recipient("20CSC099")
            .with_points_earned(3);

        assert_eq!(tx.kind, TransactionKind::Transfer);
        assert_eq!(tx.amount_cents, 30_000);
        assert_eq!(tx.status, TransactionStatus::Completed);
        assert_eq!(tx.sender.as_deref(), Some("20CSC010"));
        assert_eq!(tx.recipient.as_deref(), Some("20CSC099"));
        assert_eq!(tx.points_earned, Some(3));
    }

    #[test]
    fn test_kind_roundtrip() {
        for kind in [
            TransactionKind::Payment,
            TransactionKind::Transfer,
            TransactionKind::Received,
            TransactionKind::Reward,
        ] {
            assert_eq!(TransactionKind::from_str(kind.as_str()), Some(kind));
        }
    }

    #[test]
    fn test_status_roundtrip() {
        for status in [
            TransactionStatus::Completed,
            TransactionStatus::Pending,
            TransactionStatus::Failed,
        ] {
            assert_eq!(TransactionStatus::from_str(status.as_str()), Some(status));
        }
    }

    #[test]
    #[should_panic(expected = "Transaction amount must be positive")]
    fn test_transaction_requires_positive_amount() {
        Transaction::new(TransactionKind::Payment, 0, "nothing");
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Cents, Tier};

pub type AccountId = Uuid;

/// A student wallet account. Credential material lives in its own storage
/// table and never appears on this type: everything here is safe to hand
/// back to callers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    /// Unique human-facing identifier (matriculation number).
    pub handle: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// Never goes negative as a result of a ledger operation.
    pub balance_cents: Cents,
    /// Never goes negative as a result of a ledger operation.
    pub loyalty_points: i64,
    pub created_at: DateTime<Utc>,
}

impl Account {
    /// Create a fresh account with zero balance and zero points.
    pub fn new(
        handle: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            handle: handle.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
            balance_cents: 0,
            loyalty_points: 0,
            created_at: Utc::now(),
        }
    }

    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Tier is derived from current points on every read, never stored.
    pub fn tier(&self) -> Tier {
        Tier::for_points(self.loyalty_points)
    }
}

use thiserror::Error;

use crate::domain::Cents;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Matric number already registered: {0}")]
    DuplicateHandle(String),

    #[error("Invalid matric number or password")]
    InvalidCredentials,

    #[error("Not authenticated")]
    NotAuthenticated,

    #[error("Amount below minimum: minimum {minimum_cents} cents, got {amount_cents}")]
    BelowMinimum {
        minimum_cents: Cents,
        amount_cents: Cents,
    },

    #[error("Insufficient funds: balance {balance_cents} cents, required {required_cents}")]
    InsufficientFunds {
        balance_cents: Cents,
        required_cents: Cents,
    },

    #[error("Insufficient loyalty points: have {points}, required {required}")]
    InsufficientPoints { points: i64, required: i64 },

    #[error("Recipient not found: {0}")]
    RecipientNotFound(String),

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Database error: {0}")]
    Database(#[from] anyhow::Error),
}

//! Unified error type for `BaubleBot`.
//!
//! Programmer and infrastructure faults surface as [`Error`]; user-facing
//! denials (item already active, curse blocking, etc.) are *not* errors and are
//! returned as [`crate::core::lifecycle::Outcome`] values so commands can
//! render them. Malformed persisted effect payloads are recovered by the codec
//! and never reach this type.

use thiserror::Error;

/// All failure modes the crate can produce.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration file or environment problem.
    #[error("Configuration error: {message}")]
    Config {
        /// Human-readable description of the problem.
        message: String,
    },

    /// Database error from the `SeaORM` layer.
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Item id not present in the catalog.
    #[error("Unknown item: {id}")]
    ItemNotFound {
        /// The item id that failed to resolve.
        id: String,
    },

    /// Player row missing when one was required.
    #[error("Player not found: {id}")]
    PlayerNotFound {
        /// Discord user id.
        id: String,
    },

    /// Purchase rejected for lack of funds.
    #[error("Insufficient funds: balance {balance}, price {price}")]
    InsufficientFunds {
        /// Current balance.
        balance: i64,
        /// Total price of the attempted purchase.
        price: i64,
    },

    /// Player does not own enough of the item.
    #[error("Not enough of item '{id}' in inventory")]
    InsufficientQuantity {
        /// The item id.
        id: String,
    },

    /// Purchase would exceed the stack limit.
    #[error("Cannot hold more than {max} of item '{id}'")]
    StackLimit {
        /// The item id.
        id: String,
        /// Maximum stack size for the item.
        max: u32,
    },

    /// JSON serialization failure when writing state back.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error (config file reads, etc).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Missing or invalid environment variable.
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    /// Serenity/Poise framework error.
    #[error("Serenity/Poise framework error: {0}")]
    Framework(Box<poise::serenity_prelude::Error>),
}

impl From<poise::serenity_prelude::Error> for Error {
    fn from(value: poise::serenity_prelude::Error) -> Self {
        Error::Framework(Box::new(value))
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;

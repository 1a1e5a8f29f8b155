//! Shared test utilities for `BaubleBot`.
//!
//! Common helpers for setting up in-memory test databases, catalogs, and
//! deterministic randomness.

use crate::catalog::Catalog;
use crate::errors::Result;
use rand::SeedableRng;
use rand::rngs::StdRng;
use sea_orm::DatabaseConnection;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// The builtin catalog; tests assert against its known items.
///
/// # Panics
/// Only if the builtin table fails validation, which is itself a test failure.
#[allow(clippy::expect_used)]
pub fn test_catalog() -> Catalog {
    Catalog::builtin().expect("builtin catalog must validate")
}

/// A deterministic rng for reproducible reward/durability rolls.
#[must_use]
pub fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(0xBA0B_1E55)
}

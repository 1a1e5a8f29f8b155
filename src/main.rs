//! `BaubleBot` binary entry point.

use baublebot::bot;
use baublebot::catalog::Catalog;
use baublebot::config::{database, shop};
use baublebot::errors::{Error, Result};
use dotenvy::dotenv;
use std::{env, sync::Arc};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; non-fatal, env vars can be set externally
    dotenv().ok();
    info!("Attempted to load .env file.");

    // 3. Load the shop configuration (optional shop.toml)
    let shop_config = shop::load_default_config()
        .inspect_err(|e| error!("Failed to load shop configuration: {e}"))?;
    info!("Shop configuration processed.");

    // 4. Build the item catalog and apply operator price overrides
    let mut catalog = Catalog::builtin()?;
    catalog.apply_price_overrides(&shop_config.override_pairs())?;
    info!("Catalog ready with {} items.", catalog.len());

    // 5. Initialize database
    let db = database::create_connection()
        .await
        .inspect(|_| info!("Database connection established."))
        .inspect_err(|e| error!("Failed to connect to database: {e}"))?;
    database::create_tables(&db)
        .await
        .inspect(|_| info!("Database tables ready."))
        .inspect_err(|e| error!("Failed to create tables: {e}"))?;

    // 6. Run the bot; the token is loaded directly before use
    let token = env::var("DISCORD_BOT_TOKEN")
        .inspect_err(|e| error!("DISCORD_BOT_TOKEN not found: {e}"))
        .map_err(Error::EnvVar)?;

    bot::run_bot(token, db, Arc::new(catalog), shop_config.fallback_band()).await?;

    Ok(())
}

//! Bot layer - Discord-specific interface and command handlers
//!
//! This module provides the Discord interface for the `BaubleBot` application,
//! including all slash commands, autocomplete handlers, bot context
//! management, and the background sweep task that expires effects and pays
//! out passive income.

/// Discord command implementations (general, shop, items, effects)
pub mod commands;
/// Discord interaction handlers (autocomplete, etc.)
pub mod handlers;

use crate::catalog::Catalog;
use crate::core::notify::{Notice, NotifyThrottle};
use crate::core::player;
use crate::core::rewards::FallbackBand;
use crate::errors::{Error, Result};
use poise::serenity_prelude as serenity;
use rand::SeedableRng;
use rand::rngs::StdRng;
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

/// Seconds between background sweep passes.
const SWEEP_INTERVAL_SECS: u64 = 60;

/// Shared data available to all bot commands.
/// This structure holds the database connection, the item catalog, and the
/// configured chest fallback band that commands need to access.
pub struct BotData {
    /// Database connection for all database operations
    pub database: DatabaseConnection,
    /// Item definitions the shop and effect commands resolve against
    pub catalog: Arc<Catalog>,
    /// Currency band used when a chest cannot resolve to an item
    pub fallback: FallbackBand,
}

impl BotData {
    /// Creates a new `BotData` instance for the shared command context.
    #[must_use]
    pub const fn new(
        database: DatabaseConnection,
        catalog: Arc<Catalog>,
        fallback: FallbackBand,
    ) -> Self {
        Self {
            database,
            catalog,
            fallback,
        }
    }
}

async fn on_error(error: poise::FrameworkError<'_, BotData, Error>) {
    match error {
        poise::FrameworkError::Setup { error, .. } => {
            error!("Failed to start bot: {error:?}");
        }
        poise::FrameworkError::Command { error, ctx, .. } => {
            error!("Error in command `{}`: {:?}", ctx.command().name, error);
            if let Err(e) = ctx.say(format!("An error occurred: {error}")).await {
                error!("Failed to send error message: {e}");
            }
        }
        error => {
            if let Err(e) = poise::builtins::on_error(error).await {
                error!("Error while handling error: {e}");
            }
        }
    }
}

/// Renders a sweep notice as a DM line.
fn notice_text(catalog: &Catalog, notice: &Notice) -> String {
    let name_of = |id: &str| {
        catalog
            .get(id)
            .map_or_else(|| id.to_string(), |def| def.name.clone())
    };
    match notice {
        Notice::Expired { item_id } => {
            format!("⏳ Your **{}** effect has worn off.", name_of(item_id))
        }
        Notice::ExpiringSoon {
            item_id,
            remaining_secs,
        } => format!(
            "⏳ Your **{}** effect expires in about {} minute(s).",
            name_of(item_id),
            (remaining_secs / 60).max(1)
        ),
    }
}

/// Background loop: every minute, expire lapsed effects, credit passive
/// income, and DM users about effects that ended or are about to.
async fn sweep_loop(http: Arc<serenity::Http>, db: DatabaseConnection, catalog: Arc<Catalog>) {
    let mut throttle = NotifyThrottle::default();
    let mut rng = StdRng::from_entropy();
    let mut ticker = tokio::time::interval(Duration::from_secs(SWEEP_INTERVAL_SECS));

    loop {
        ticker.tick().await;
        let deliveries = match player::sweep_all(&db, &mut throttle, &mut rng).await {
            Ok(deliveries) => deliveries,
            Err(e) => {
                error!("Sweep pass failed: {e}");
                continue;
            }
        };

        for (user_id, notice) in deliveries {
            let Ok(raw) = user_id.parse::<u64>() else {
                warn!("Skipping notice for non-numeric user id {user_id}");
                continue;
            };
            let text = notice_text(&catalog, &notice);
            match serenity::UserId::new(raw).create_dm_channel(&http).await {
                Ok(channel) => {
                    if let Err(e) = channel.say(&http, text).await {
                        warn!("Failed to DM user {user_id}: {e}");
                    }
                }
                Err(e) => warn!("Failed to open DM channel for {user_id}: {e}"),
            }
        }
    }
}

/// Builds the poise framework, registers all slash commands globally, starts
/// the background sweep task, and runs the client until shutdown.
pub async fn run_bot(
    token: String,
    database: DatabaseConnection,
    catalog: Arc<Catalog>,
    fallback: FallbackBand,
) -> Result<()> {
    let sweep_db = database.clone();
    let sweep_catalog = Arc::clone(&catalog);

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: vec![
                commands::ping(),
                commands::help(),
                commands::balance(),
                commands::shop(),
                commands::buy(),
                commands::inventory(),
                commands::use_item(),
                commands::effects(),
                commands::remove_effect(),
                commands::throw(),
            ],
            on_error: |error| Box::pin(on_error(error)),
            ..Default::default()
        })
        .setup(move |ctx, ready, framework| {
            Box::pin(async move {
                info!("Logged in as {}", ready.user.name);
                info!("Registering commands globally...");
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;

                tokio::spawn(sweep_loop(
                    Arc::clone(&ctx.http),
                    sweep_db,
                    sweep_catalog,
                ));
                info!("Background sweep task started.");

                Ok(BotData::new(database, catalog, fallback))
            })
        })
        .build();

    let intents =
        serenity::GatewayIntents::GUILD_MESSAGES | serenity::GatewayIntents::DIRECT_MESSAGES;

    info!("Setting up Serenity client for Poise framework...");
    let mut client = serenity::Client::builder(&token, intents)
        .framework(framework)
        .await
        .map_err(|e| Error::Framework(Box::new(e)))?;

    info!("Starting bot client...");
    client
        .start()
        .await
        .map_err(|e| Error::Framework(Box::new(e)))?;
    Ok(())
}

pub use commands::*;
pub use handlers::*;

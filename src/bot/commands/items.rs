//! Inventory Discord commands - `inventory`, `use_item`, and `throw`.
//!
//! This module contains commands that interact with the database through our
//! core modules to list owned items, consume or equip them, open reward
//! containers, and throw curses at other players.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, handlers::autocomplete},
        core::player,
        errors::{Error, Result},
    };
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    /// Lists the items the author owns.
    #[poise::command(slash_command, prefix_command)]
    pub async fn inventory(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let db = &ctx.data().database;
        let catalog = &ctx.data().catalog;
        let user_id = ctx.author().id.to_string();

        let state = player::load(db, &user_id).await?;
        if state.inventory.is_empty() {
            ctx.say("🎒 Your inventory is empty. Use `/shop` to browse items.")
                .await?;
            return Ok(());
        }

        let mut lines = vec![String::from("**🎒 Your Inventory**")];
        let mut owned: Vec<_> = state.inventory.values().collect();
        owned.sort_by(|a, b| a.id.cmp(&b.id));
        for item in owned {
            let name = catalog
                .get(&item.id)
                .map_or_else(|| item.id.clone(), |def| def.name.clone());
            lines.push(format!("• **{}** x{} (`{}`)", name, item.quantity, item.id));
        }
        ctx.say(lines.join("\n")).await?;
        Ok(())
    }

    /// Uses one unit of an owned item.
    ///
    /// Consumables start a timed effect, tools and equipment get equipped
    /// with rolled durability, chests and mystery boxes open into a reward,
    /// and cosmetics toggle on or off.
    #[poise::command(slash_command, prefix_command)]
    pub async fn use_item(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Item to use"]
        #[autocomplete = "autocomplete::autocomplete_owned_item_id"]
        item: String,
    ) -> Result<()> {
        let db = &ctx.data().database;
        let catalog = &ctx.data().catalog;
        let fallback = ctx.data().fallback;
        let user_id = ctx.author().id.to_string();
        let mut rng = StdRng::from_entropy();

        match player::use_item(db, catalog, fallback, &user_id, &item, &mut rng).await {
            Ok(outcome) => {
                let prefix = if outcome.success { "✅" } else { "❌" };
                ctx.say(format!("{prefix} {}", outcome.message)).await?;
            }
            Err(Error::ItemNotFound { id }) => {
                ctx.say(format!("❌ No item called `{id}` exists.")).await?;
            }
            Err(Error::InsufficientQuantity { id }) => {
                ctx.say(format!("❌ You don't own any `{id}`.")).await?;
            }
            Err(e) => return Err(e),
        }
        Ok(())
    }

    /// Throws a curse bottle at another player.
    ///
    /// The target gets the curse as an active effect; a player can only carry
    /// one curse at a time, and you cannot throw one at yourself.
    #[poise::command(slash_command, prefix_command)]
    pub async fn throw(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Player to curse"] target: poise::serenity_prelude::User,
        #[description = "Throwable curse item"]
        #[autocomplete = "autocomplete::autocomplete_owned_item_id"]
        item: String,
    ) -> Result<()> {
        let db = &ctx.data().database;
        let catalog = &ctx.data().catalog;
        let thrower_id = ctx.author().id.to_string();
        let target_id = target.id.to_string();

        match player::throw_curse_at(db, catalog, &thrower_id, &target_id, &item).await {
            Ok(outcome) => {
                let prefix = if outcome.success { "🧪" } else { "❌" };
                ctx.say(format!("{prefix} {}", outcome.message)).await?;
            }
            Err(Error::ItemNotFound { id }) => {
                ctx.say(format!("❌ No item called `{id}` exists.")).await?;
            }
            Err(Error::InsufficientQuantity { id }) => {
                ctx.say(format!("❌ You don't own any `{id}`.")).await?;
            }
            Err(e) => return Err(e),
        }
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;

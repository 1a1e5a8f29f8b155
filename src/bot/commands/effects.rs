//! Effect Discord commands - `effects` and `remove_effect`.
//!
//! This module contains commands that show a player's active and permanent
//! effects and unequip permanent ones.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, handlers::autocomplete},
        catalog::Catalog,
        core::{player, state::ActiveEffect},
        errors::{Error, Result},
    };
    use chrono::{DateTime, Utc};

    fn display_name(catalog: &Catalog, id: &str) -> String {
        catalog
            .get(id)
            .map_or_else(|| id.to_string(), |def| def.name.clone())
    }

    fn describe_instance(inst: &ActiveEffect, now: DateTime<Utc>) -> String {
        if let Some(left) = inst.remaining(now) {
            let mins = (left.num_seconds() / 60).max(1);
            return format!("{mins} minute(s) left");
        }
        if let Some(uses) = inst.uses_left {
            return format!("{uses} use(s) left");
        }
        if let (Some(cur), Some(max)) = (inst.current_durability, inst.max_durability) {
            return format!("durability {cur}/{max}");
        }
        String::from("active")
    }

    /// Shows the author's active and permanent effects.
    ///
    /// Active effects report their remaining time, uses, or durability;
    /// permanent effects list when they were applied.
    #[poise::command(slash_command, prefix_command)]
    pub async fn effects(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let db = &ctx.data().database;
        let catalog = &ctx.data().catalog;
        let user_id = ctx.author().id.to_string();
        let now = Utc::now();

        let state = player::load(db, &user_id).await?;

        let mut lines = Vec::new();
        let mut active: Vec<_> = state.containers.active.iter().collect();
        active.sort_by(|a, b| a.0.cmp(b.0));
        for (item_id, instances) in active {
            for inst in instances.iter().filter(|inst| inst.is_valid(now)) {
                lines.push(format!(
                    "• **{}** — {}",
                    display_name(catalog, item_id),
                    describe_instance(inst, now)
                ));
            }
        }

        let mut permanent: Vec<_> = state.containers.permanent.iter().collect();
        permanent.sort_by(|a, b| a.0.cmp(b.0));
        for (item_id, record) in permanent {
            lines.push(format!(
                "• **{}** — permanent, since {}",
                display_name(catalog, item_id),
                record.applied_at.format("%Y-%m-%d")
            ));
        }

        if lines.is_empty() {
            ctx.say("✨ You have no effects right now.").await?;
        } else {
            ctx.say(format!("**✨ Your Effects**\n{}", lines.join("\n")))
                .await?;
        }
        Ok(())
    }

    /// Unequips a permanent effect, returning the item to the inventory.
    ///
    /// VIP memberships cannot be removed this way; they run out on their own.
    #[poise::command(slash_command, prefix_command)]
    pub async fn remove_effect(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Permanent item to unequip"]
        #[autocomplete = "autocomplete::autocomplete_permanent_item_id"]
        item: String,
    ) -> Result<()> {
        let db = &ctx.data().database;
        let catalog = &ctx.data().catalog;
        let user_id = ctx.author().id.to_string();

        let outcome = player::remove_effect(db, catalog, &user_id, &item).await?;
        let prefix = if outcome.success { "✅" } else { "❌" };
        ctx.say(format!("{prefix} {}", outcome.message)).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;

//! General Discord commands - ping, help, and balance.
//! This module contains simple commands that provide basic bot functionality
//! and user assistance.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::BotData,
        core::player,
        errors::{Error, Result},
    };

    /// Responds with "Pong!" to test bot connectivity.
    ///
    /// This is a simple health check command that doesn't require any database operations.
    #[poise::command(slash_command, prefix_command)]
    pub async fn ping(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        ctx.say("Pong!").await?;
        Ok(())
    }

    /// Displays help information about available commands.
    #[poise::command(slash_command, prefix_command)]
    pub async fn help(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let help_text = "**BaubleBot Help**\n\
        Here is a summary of all available commands for BaubleBot.\n\n\
        **Shop Commands**\n\
        • `/shop` - Browses the item catalog with prices and rarities.\n\
        • `/buy <item> [quantity]` - Purchases an item from the shop.\n\
        • `/balance` - Shows your coins, level, and XP.\n\n\
        **Item Commands**\n\
        • `/inventory` - Lists the items you own.\n\
        • `/use_item <item>` - Uses an item: drinks a consumable, equips a tool, opens a chest.\n\
        • `/throw <target> <item>` - Throws a curse bottle at another player.\n\n\
        **Effect Commands**\n\
        • `/effects` - Shows your active and permanent effects with time remaining.\n\
        • `/remove_effect <item>` - Unequips a permanent effect, returning the item.\n\n\
        **Utility Commands**\n\
        • `/ping` - Checks if the bot is responsive.\n\
        • `/help` - Shows this help message.";

        ctx.say(help_text).await?;
        Ok(())
    }

    /// Shows the author's coin balance, level, and XP progress.
    #[poise::command(slash_command, prefix_command)]
    pub async fn balance(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let db = &ctx.data().database;
        let user_id = ctx.author().id.to_string();

        let model = player::get_or_create(db, &user_id).await?;
        ctx.say(format!(
            "💰 **{}** coins | Level **{}** | {} XP",
            model.balance, model.level, model.xp
        ))
        .await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;

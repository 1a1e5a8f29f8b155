//! Shop Discord commands - `shop` and `buy`.
//!
//! This module contains commands that browse the item catalog and purchase
//! items through the core player module.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, handlers::autocomplete},
        core::player,
        errors::{Error, Result},
    };

    /// Browses the item catalog.
    ///
    /// Lists every purchasable item with its price, rarity, and description,
    /// sorted by rarity then price. Output is split across messages to stay
    /// under the Discord length limit.
    #[poise::command(slash_command, prefix_command)]
    pub async fn shop(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let catalog = &ctx.data().catalog;

        let mut defs: Vec<_> = catalog.iter().collect();
        defs.sort_by(|a, b| a.rarity.cmp(&b.rarity).then(a.price.cmp(&b.price)));

        let mut pages = vec![String::from("**🛒 BaubleBot Shop**\n")];
        for def in defs {
            let line = format!(
                "• **{}** `{}` — {} coins [{}]\n  {}\n",
                def.name,
                def.id,
                def.price,
                def.rarity.label(),
                def.description
            );
            // Discord caps messages at 2000 characters
            match pages.last_mut() {
                Some(page) if page.len() + line.len() < 1900 => page.push_str(&line),
                _ => pages.push(line),
            }
        }

        for page in pages {
            ctx.say(page).await?;
        }
        Ok(())
    }

    /// Purchases an item from the shop.
    ///
    /// Deducts the price from the author's balance and adds the item to their
    /// inventory, respecting stack limits for stackable items and the
    /// one-per-player rule for everything else.
    #[poise::command(slash_command, prefix_command)]
    pub async fn buy(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Item to purchase"]
        #[autocomplete = "autocomplete::autocomplete_item_id"]
        item: String,
        #[description = "Quantity (default 1)"] quantity: Option<u32>,
    ) -> Result<()> {
        let db = &ctx.data().database;
        let catalog = &ctx.data().catalog;
        let user_id = ctx.author().id.to_string();
        let qty = quantity.unwrap_or(1);

        if qty == 0 {
            ctx.say("❌ Quantity must be at least 1.").await?;
            return Ok(());
        }

        match player::buy(db, catalog, &user_id, &item, qty).await {
            Ok(outcome) => {
                ctx.say(format!("✅ {}", outcome.message)).await?;
            }
            Err(Error::ItemNotFound { id }) => {
                ctx.say(format!(
                    "❌ No item called `{id}` in the shop. Use `/shop` to browse."
                ))
                .await?;
            }
            Err(Error::InsufficientFunds { balance, price }) => {
                ctx.say(format!(
                    "❌ Insufficient funds! That costs **{price}** coins but you have **{balance}**."
                ))
                .await?;
            }
            Err(Error::StackLimit { id, max }) => {
                ctx.say(format!("❌ You can hold at most **{max}**x `{id}`."))
                    .await?;
            }
            Err(e) => return Err(e),
        }
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;

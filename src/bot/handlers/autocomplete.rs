//! Autocomplete handlers for Discord slash command parameters.
//!
//! This module provides autocomplete functionality for item ids, improving
//! the user experience by suggesting valid options as the user types.

use crate::{bot::BotData, core::player, errors::Error};

/// Discord caps autocomplete responses at 25 entries.
const AUTOCOMPLETE_LIMIT: usize = 25;

/// Case-insensitive contains over the id and optional display name.
/// `partial_lower` must already be lowercased.
fn matches_partial(id: &str, name: Option<&str>, partial_lower: &str) -> bool {
    id.to_lowercase().contains(partial_lower)
        || name.is_some_and(|n| n.to_lowercase().contains(partial_lower))
}

/// Provides autocomplete suggestions for catalog item ids.
///
/// Matches the partial input against both the item id and the display name,
/// case-insensitively, and returns up to 25 ids.
pub async fn autocomplete_item_id(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    let partial_lower = partial.to_lowercase();

    // Catalog iteration is id-ordered, so results are already sorted
    ctx.data()
        .catalog
        .iter()
        .filter(|def| matches_partial(&def.id, Some(&def.name), &partial_lower))
        .map(|def| def.id.clone())
        .take(AUTOCOMPLETE_LIMIT)
        .collect()
}

/// Provides autocomplete suggestions restricted to items the author owns.
pub async fn autocomplete_owned_item_id(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    let db = &ctx.data().database;
    let user_id = ctx.author().id.to_string();

    let Ok(state) = player::load(db, &user_id).await else {
        return Vec::new();
    };

    let partial_lower = partial.to_lowercase();
    let mut matching: Vec<String> = state
        .inventory
        .values()
        .filter(|owned| owned.quantity > 0 && matches_partial(&owned.id, None, &partial_lower))
        .map(|owned| owned.id.clone())
        .take(AUTOCOMPLETE_LIMIT)
        .collect();

    matching.sort();
    matching
}

/// Provides autocomplete suggestions restricted to the author's permanent
/// effects, for `/remove_effect`.
pub async fn autocomplete_permanent_item_id(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    let db = &ctx.data().database;
    let user_id = ctx.author().id.to_string();

    let Ok(state) = player::load(db, &user_id).await else {
        return Vec::new();
    };

    let partial_lower = partial.to_lowercase();
    let mut matching: Vec<String> = state
        .containers
        .permanent
        .keys()
        .filter(|id| matches_partial(id, None, &partial_lower))
        .cloned()
        .take(AUTOCOMPLETE_LIMIT)
        .collect();

    matching.sort();
    matching
}

#[cfg(test)]
mod tests {
    use super::matches_partial;

    #[test]
    fn test_matching_ignores_case_on_both_sides() {
        assert!(matches_partial("iron_pickaxe", None, "pick"));
        assert!(matches_partial("iron_pickaxe", None, "iron"));
        // Uppercase input is lowercased by the callers before matching
        assert!(matches_partial("iron_pickaxe", Some("Iron Pickaxe"), "iron p"));
        assert!(!matches_partial("iron_pickaxe", Some("Iron Pickaxe"), "gold"));
    }

    #[test]
    fn test_matching_covers_display_name() {
        assert!(matches_partial("curse_bottle", Some("Bottled Curse"), "bottled"));
        assert!(!matches_partial("curse_bottle", None, "bottled c"));
    }
}

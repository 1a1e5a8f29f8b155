//! The builtin item table.
//!
//! Kept as plain constructors rather than a data file so the compiler checks
//! every effect descriptor. Prices can still be overridden via `shop.toml`.

use super::{Category, ItemDef, Rarity};
use crate::catalog::effects::{
    ChestReward, ETERNAL_DURABILITY, EffectKind, Target, VipBenefit,
};

fn item(
    id: &str,
    name: &str,
    description: &str,
    category: Category,
    rarity: Rarity,
    price: i64,
    stackable: bool,
    max_stack: u32,
    effect: EffectKind,
) -> ItemDef {
    ItemDef {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        category,
        rarity,
        price,
        stackable,
        max_stack,
        effect,
    }
}

/// All builtin shop items.
#[allow(clippy::too_many_lines)] // One entry per item, table-shaped on purpose
pub fn builtin_items() -> Vec<ItemDef> {
    vec![
        // --- Consumables -----------------------------------------------------
        item(
            "coffee",
            "Strong Coffee",
            "Work pays 25% more for an hour.",
            Category::Consumable,
            Rarity::Common,
            250,
            true,
            10,
            EffectKind::Multiplier {
                targets: vec![Target::Work],
                multiplier: 1.25,
                duration: Some(3600),
            },
        ),
        item(
            "golden_pretzel",
            "Golden Pretzel",
            "Everything pays 50% more for half an hour.",
            Category::Consumable,
            Rarity::Rare,
            2_000,
            true,
            5,
            EffectKind::Multiplier {
                targets: vec![Target::All],
                multiplier: 1.5,
                duration: Some(1800),
            },
        ),
        item(
            "energy_drink",
            "Energy Drink",
            "Work cooldowns 30% shorter for two hours.",
            Category::Consumable,
            Rarity::Common,
            400,
            true,
            10,
            EffectKind::CooldownReduction {
                targets: vec![Target::Work],
                reduction: 0.3,
                duration: Some(7200),
            },
        ),
        item(
            "scholars_tome",
            "Scholar's Tome",
            "Double XP from every action for an hour.",
            Category::Consumable,
            Rarity::Uncommon,
            1_200,
            true,
            5,
            EffectKind::XpMultiplier {
                targets: vec![Target::All],
                multiplier: 2.0,
                duration: Some(3600),
            },
        ),
        item(
            "lucky_clover",
            "Lucky Clover",
            "+20% luck in games, good for 5 rounds.",
            Category::Consumable,
            Rarity::Uncommon,
            900,
            true,
            10,
            EffectKind::SuccessBoost {
                targets: vec![Target::Games],
                boost: 0.2,
                uses: Some(5),
            },
        ),
        item(
            "guard_dog",
            "Guard Dog",
            "Blocks the next 3 robbery attempts against you.",
            Category::Consumable,
            Rarity::Rare,
            3_500,
            true,
            3,
            EffectKind::Protection {
                prevents: vec![Target::Robbery],
                duration: Some(86_400),
                uses: Some(3),
            },
        ),
        // --- Permanents ------------------------------------------------------
        item(
            "golden_watch",
            "Golden Watch",
            "Permanent +10% on everything you earn.",
            Category::Permanent,
            Rarity::Epic,
            25_000,
            false,
            1,
            EffectKind::PermanentMultiplier {
                targets: vec![Target::All],
                multiplier: 1.1,
            },
        ),
        item(
            "silver_stopwatch",
            "Silver Stopwatch",
            "Permanent 15% shorter work cooldowns.",
            Category::Permanent,
            Rarity::Rare,
            12_000,
            false,
            1,
            EffectKind::PermanentCooldown {
                targets: vec![Target::Work],
                reduction: 0.15,
            },
        ),
        item(
            "rabbits_foot",
            "Rabbit's Foot",
            "Permanent +10% luck at the tables.",
            Category::Permanent,
            Rarity::Rare,
            10_000,
            false,
            1,
            EffectKind::PermanentLuck { boost: 0.1 },
        ),
        item(
            "iron_vault",
            "Iron Vault",
            "Permanently shrugs off robbery attempts.",
            Category::Permanent,
            Rarity::Legendary,
            60_000,
            false,
            1,
            EffectKind::PermanentProtection {
                prevents: vec![Target::Robbery],
            },
        ),
        item(
            "money_tree",
            "Money Tree",
            "Drops 100-300 coins every hour while planted.",
            Category::Permanent,
            Rarity::Epic,
            30_000,
            false,
            1,
            EffectKind::PassiveIncome {
                min_amount: 100,
                max_amount: 300,
                interval: 3600,
            },
        ),
        item(
            "vip_card",
            "VIP Card",
            "30 days of VIP: +50% money, +10% luck, faster cooldowns, extra XP.",
            Category::Permanent,
            Rarity::Legendary,
            100_000,
            false,
            1,
            EffectKind::VipMembership {
                duration: 2_592_000,
                benefits: vec![
                    VipBenefit::MoneyBoost,
                    VipBenefit::LuckBoost,
                    VipBenefit::XpBoost,
                    VipBenefit::CooldownReduction,
                ],
            },
        ),
        // --- Tools -----------------------------------------------------------
        item(
            "iron_pickaxe",
            "Iron Pickaxe",
            "Mine at double yield until it breaks.",
            Category::Tool,
            Rarity::Common,
            1_500,
            true,
            3,
            EffectKind::MiningTool {
                multiplier: 2.0,
                durability: 50,
            },
        ),
        item(
            "eternal_pickaxe",
            "Eternal Pickaxe",
            "Triple mining yield. Never breaks.",
            Category::Tool,
            Rarity::Mythic,
            250_000,
            false,
            1,
            EffectKind::MiningTool {
                multiplier: 3.0,
                durability: ETERNAL_DURABILITY,
            },
        ),
        item(
            "dynamite_bundle",
            "Dynamite Bundle",
            "Five massive blasts at 4x yield.",
            Category::Tool,
            Rarity::Epic,
            8_000,
            true,
            5,
            EffectKind::MiningLimited {
                multiplier: 4.0,
                uses: 5,
            },
        ),
        // --- Equipment -------------------------------------------------------
        item(
            "merchants_ring",
            "Merchant's Ring",
            "+15% money while worn.",
            Category::Equipment,
            Rarity::Rare,
            15_000,
            false,
            1,
            EffectKind::Equipment {
                slot: "ring".to_string(),
                money_multiplier: Some(1.15),
                luck_boost: None,
                base_durability: 40,
                durability_variation: 10,
            },
        ),
        item(
            "gamblers_amulet",
            "Gambler's Amulet",
            "+12% luck while worn.",
            Category::Equipment,
            Rarity::Rare,
            14_000,
            false,
            1,
            EffectKind::Equipment {
                slot: "amulet".to_string(),
                money_multiplier: None,
                luck_boost: Some(0.12),
                base_durability: 35,
                durability_variation: 5,
            },
        ),
        // --- Special ---------------------------------------------------------
        item(
            "curse_bottle",
            "Bottled Curse",
            "Throw at someone to disable their effects for 30 minutes.",
            Category::Special,
            Rarity::Epic,
            20_000,
            true,
            3,
            EffectKind::Curse {
                luck_penalty: -0.3,
                money_penalty: -0.5,
                disables_effects: true,
                duration: 1800,
                throwable: true,
            },
        ),
        // --- Mystery containers ----------------------------------------------
        item(
            "wooden_chest",
            "Wooden Chest",
            "A creaky box with something inside.",
            Category::Mystery,
            Rarity::Common,
            1_000,
            true,
            20,
            EffectKind::OpenChest {
                rewards: vec![
                    ChestReward {
                        id: "coffee".to_string(),
                        chance: 0.5,
                    },
                    ChestReward {
                        id: "energy_drink".to_string(),
                        chance: 0.3,
                    },
                    ChestReward {
                        id: "lucky_clover".to_string(),
                        chance: 0.2,
                    },
                ],
            },
        ),
        item(
            "gilded_chest",
            "Gilded Chest",
            "Heavy. Promising.",
            Category::Mystery,
            Rarity::Epic,
            10_000,
            true,
            10,
            EffectKind::OpenChest {
                rewards: vec![
                    ChestReward {
                        id: "golden_pretzel".to_string(),
                        chance: 0.45,
                    },
                    ChestReward {
                        id: "guard_dog".to_string(),
                        chance: 0.3,
                    },
                    ChestReward {
                        id: "dynamite_bundle".to_string(),
                        chance: 0.2,
                    },
                    ChestReward {
                        id: "golden_watch".to_string(),
                        chance: 0.05,
                    },
                ],
            },
        ),
        item(
            "mystery_box",
            "Mystery Box",
            "Any item worth 200-5000 coins.",
            Category::Mystery,
            Rarity::Uncommon,
            2_500,
            true,
            10,
            EffectKind::MysteryBox {
                min: 200,
                max: 5_000,
                rarity_bonus: false,
            },
        ),
        item(
            "premium_mystery_box",
            "Premium Mystery Box",
            "Any item worth 1000-30000 coins, with better odds for rare finds.",
            Category::Mystery,
            Rarity::Epic,
            15_000,
            true,
            5,
            EffectKind::MysteryBox {
                min: 1_000,
                max: 30_000,
                rarity_bonus: true,
            },
        ),
        item(
            "coin_pouch",
            "Coin Pouch",
            "Somewhere between 500 and 2500 coins.",
            Category::Mystery,
            Rarity::Common,
            1_200,
            true,
            20,
            EffectKind::RandomMoney {
                min: 500,
                max: 2_500,
            },
        ),
        // --- Cosmetics -------------------------------------------------------
        item(
            "top_hat",
            "Top Hat",
            "Pure class. Does nothing.",
            Category::Cosmetic,
            Rarity::Uncommon,
            5_000,
            false,
            1,
            EffectKind::Cosmetic,
        ),
        item(
            "party_crown",
            "Party Crown",
            "For winners. Also does nothing.",
            Category::Cosmetic,
            Rarity::Rare,
            9_000,
            false,
            1,
            EffectKind::Cosmetic,
        ),
    ]
}

//! Item catalog - the static registry of purchasable item definitions.
//!
//! Definitions are immutable and validated once at construction: every
//! `targets` set is non-empty, chest reward tables reference resolvable ids,
//! and prices are non-negative. The rest of the engine trusts the catalog.

/// Effect descriptors and action/target matching
pub mod effects;
/// Builtin item definitions
mod items;

pub use effects::{
    Action, ChestReward, ETERNAL_DURABILITY, EffectKind, Target, VipBenefit, targets_match,
};

use crate::errors::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Shop category an item belongs to; drives lifecycle dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// One-shot items building a timed/use-limited active effect.
    Consumable,
    /// Items creating a permanent effect record.
    Permanent,
    /// Mining tools with durability.
    Tool,
    /// Wearable gear with rolled durability.
    Equipment,
    /// Special consumables (curses, oddities).
    Special,
    /// Container items resolved by the reward engine.
    Mystery,
    /// Visual-only items toggling an equip flag.
    Cosmetic,
}

/// Display rarity; defines sort order and mystery-box tier weights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rarity {
    /// Baseline tier.
    Common,
    /// Slightly rare.
    Uncommon,
    /// Rare.
    Rare,
    /// Epic.
    Epic,
    /// Legendary.
    Legendary,
    /// Top tier.
    Mythic,
}

impl Rarity {
    /// Display label for embeds and listings.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Common => "Common",
            Self::Uncommon => "Uncommon",
            Self::Rare => "Rare",
            Self::Epic => "Epic",
            Self::Legendary => "Legendary",
            Self::Mythic => "Mythic",
        }
    }
}

/// An immutable, catalog-resident item definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemDef {
    /// Stable string key.
    pub id: String,
    /// Display name.
    pub name: String,
    /// One-line shop description.
    pub description: String,
    /// Lifecycle category.
    pub category: Category,
    /// Display rarity.
    pub rarity: Rarity,
    /// Shop price in coins.
    pub price: i64,
    /// Whether more than one can be held.
    pub stackable: bool,
    /// Maximum held quantity when stackable.
    pub max_stack: u32,
    /// The single effect descriptor.
    pub effect: EffectKind,
}

/// Id-keyed registry of item definitions.
#[derive(Debug, Clone)]
pub struct Catalog {
    items: BTreeMap<String, ItemDef>,
}

impl Catalog {
    /// Builds a catalog from definitions, validating each one.
    pub fn new(defs: Vec<ItemDef>) -> Result<Self> {
        let mut items = BTreeMap::new();
        for def in defs {
            validate(&def)?;
            if items.insert(def.id.clone(), def).is_some() {
                return Err(Error::Config {
                    message: "duplicate item id in catalog".to_string(),
                });
            }
        }
        let catalog = Self { items };
        catalog.validate_chest_references()?;
        Ok(catalog)
    }

    /// The builtin shop catalog.
    pub fn builtin() -> Result<Self> {
        Self::new(items::builtin_items())
    }

    /// Looks up an item by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&ItemDef> {
        self.items.get(id)
    }

    /// Iterates all definitions in id order.
    pub fn iter(&self) -> impl Iterator<Item = &ItemDef> {
        self.items.values()
    }

    /// Number of definitions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items whose price falls inside `[min, max]`, excluding Mystery containers.
    /// This is the mystery-box candidate pool.
    #[must_use]
    pub fn in_price_band(&self, min: i64, max: i64) -> Vec<&ItemDef> {
        self.items
            .values()
            .filter(|d| d.category != Category::Mystery && d.price >= min && d.price <= max)
            .collect()
    }

    /// Applies price overrides from the shop config; unknown ids are rejected.
    pub fn apply_price_overrides(&mut self, overrides: &[(String, i64)]) -> Result<()> {
        for (id, price) in overrides {
            if *price < 0 {
                return Err(Error::Config {
                    message: format!("negative price override for '{id}'"),
                });
            }
            match self.items.get_mut(id) {
                Some(def) => def.price = *price,
                None => {
                    return Err(Error::ItemNotFound { id: id.clone() });
                }
            }
        }
        Ok(())
    }

    fn validate_chest_references(&self) -> Result<()> {
        for def in self.items.values() {
            if let EffectKind::OpenChest { rewards } = &def.effect {
                for reward in rewards {
                    if !self.items.contains_key(&reward.id) {
                        return Err(Error::Config {
                            message: format!(
                                "chest '{}' references unknown reward '{}'",
                                def.id, reward.id
                            ),
                        });
                    }
                }
            }
        }
        Ok(())
    }
}

fn validate(def: &ItemDef) -> Result<()> {
    if def.id.trim().is_empty() {
        return Err(Error::Config {
            message: "item id cannot be empty".to_string(),
        });
    }
    if def.price < 0 {
        return Err(Error::Config {
            message: format!("item '{}' has a negative price", def.id),
        });
    }
    if def.stackable && def.max_stack == 0 {
        return Err(Error::Config {
            message: format!("stackable item '{}' has max_stack 0", def.id),
        });
    }
    let empty_targets = match &def.effect {
        EffectKind::Multiplier { targets, .. }
        | EffectKind::CooldownReduction { targets, .. }
        | EffectKind::XpMultiplier { targets, .. }
        | EffectKind::SuccessBoost { targets, .. }
        | EffectKind::PermanentMultiplier { targets, .. }
        | EffectKind::PermanentCooldown { targets, .. } => targets.is_empty(),
        EffectKind::Protection { prevents, .. }
        | EffectKind::PermanentProtection { prevents } => prevents.is_empty(),
        _ => false,
    };
    if empty_targets {
        return Err(Error::Config {
            message: format!("item '{}' has an empty target set", def.id),
        });
    }
    if let EffectKind::OpenChest { rewards } = &def.effect {
        if rewards.is_empty() {
            return Err(Error::Config {
                message: format!("chest '{}' has an empty reward table", def.id),
            });
        }
        if rewards.iter().any(|r| r.chance <= 0.0 || !r.chance.is_finite()) {
            return Err(Error::Config {
                message: format!("chest '{}' has a non-positive reward chance", def.id),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_builtin_catalog_validates() {
        let catalog = Catalog::builtin().unwrap();
        assert!(!catalog.is_empty());
        // Every chest reward must resolve
        for def in catalog.iter() {
            if let EffectKind::OpenChest { rewards } = &def.effect {
                for reward in rewards {
                    assert!(catalog.get(&reward.id).is_some(), "{}", reward.id);
                }
            }
        }
    }

    #[test]
    fn test_empty_target_set_rejected() {
        let def = ItemDef {
            id: "bad".to_string(),
            name: "Bad".to_string(),
            description: String::new(),
            category: Category::Consumable,
            rarity: Rarity::Common,
            price: 10,
            stackable: true,
            max_stack: 5,
            effect: EffectKind::Multiplier {
                targets: vec![],
                multiplier: 1.5,
                duration: Some(60),
            },
        };
        assert!(Catalog::new(vec![def]).is_err());
    }

    #[test]
    fn test_dangling_chest_reference_rejected() {
        let def = ItemDef {
            id: "chest".to_string(),
            name: "Chest".to_string(),
            description: String::new(),
            category: Category::Mystery,
            rarity: Rarity::Rare,
            price: 100,
            stackable: true,
            max_stack: 10,
            effect: EffectKind::OpenChest {
                rewards: vec![ChestReward {
                    id: "no_such_item".to_string(),
                    chance: 1.0,
                }],
            },
        };
        assert!(Catalog::new(vec![def]).is_err());
    }

    #[test]
    fn test_price_override_applies() {
        let mut catalog = Catalog::builtin().unwrap();
        let id = catalog.iter().next().unwrap().id.clone();
        catalog
            .apply_price_overrides(&[(id.clone(), 12345)])
            .unwrap();
        assert_eq!(catalog.get(&id).unwrap().price, 12345);
    }

    #[test]
    fn test_price_override_unknown_id_rejected() {
        let mut catalog = Catalog::builtin().unwrap();
        let result = catalog.apply_price_overrides(&[("nope".to_string(), 1)]);
        assert!(matches!(result, Err(Error::ItemNotFound { .. })));
    }

    #[test]
    fn test_price_band_excludes_mystery_items() {
        let catalog = Catalog::builtin().unwrap();
        let pool = catalog.in_price_band(0, i64::MAX);
        assert!(pool.iter().all(|d| d.category != Category::Mystery));
        assert!(!pool.is_empty());
    }
}

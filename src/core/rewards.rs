//! Randomized reward resolution for chests, mystery boxes, and money bags.
//!
//! Chest tables are cumulative in list order with an inclusive boundary on the
//! lower entry; anything unresolvable (floating-point edge, dangling id,
//! empty pool) falls back to a currency grant so opening a container never
//! fails.

use crate::catalog::effects::ChestReward;
use crate::catalog::{Catalog, ItemDef, Rarity};
use crate::core::state::{Inventory, grant_item};
use chrono::{DateTime, Utc};
use rand::Rng;
use tracing::warn;

/// What opening a container produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reward {
    /// A catalog item.
    Item {
        /// Catalog id granted.
        id: String,
        /// Display name for the reply.
        name: String,
    },
    /// A currency grant.
    Money {
        /// Amount credited.
        amount: i64,
    },
}

/// Currency band used when a reward table cannot resolve to an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FallbackBand {
    /// Minimum fallback amount (inclusive).
    pub min: i64,
    /// Maximum fallback amount (inclusive).
    pub max: i64,
}

impl Default for FallbackBand {
    fn default() -> Self {
        Self {
            min: 500,
            max: 2_000,
        }
    }
}

/// Resolves a chest's weighted reward table.
///
/// The table is walked in list order accumulating chances; the first entry
/// whose cumulative chance reaches the roll wins (a roll of exactly 0.5
/// against `[{a, 0.5}, {b, 0.5}]` selects `a`).
pub fn resolve_chest<R: Rng>(
    rewards: &[ChestReward],
    catalog: &Catalog,
    fallback: FallbackBand,
    rng: &mut R,
) -> Reward {
    let roll: f64 = rng.r#gen();
    let mut cumulative = 0.0;
    for entry in rewards {
        cumulative += entry.chance;
        if cumulative >= roll {
            match catalog.get(&entry.id) {
                Some(def) => {
                    return Reward::Item {
                        id: def.id.clone(),
                        name: def.name.clone(),
                    };
                }
                None => {
                    // Validated at catalog load; only reachable for tables built at runtime.
                    warn!("chest reward '{}' not in catalog; falling back to money", entry.id);
                    break;
                }
            }
        }
    }
    money_fallback(fallback, rng)
}

/// Resolves a mystery box: a uniform pick from the price-band pool, optionally
/// re-weighted by rarity tier, excluding non-stackables the player already owns.
pub fn resolve_mystery_box<R: Rng>(
    min: i64,
    max: i64,
    rarity_bonus: bool,
    catalog: &Catalog,
    inventory: &Inventory,
    rng: &mut R,
) -> Reward {
    let pool: Vec<&ItemDef> = catalog
        .in_price_band(min, max)
        .into_iter()
        .filter(|def| def.stackable || !inventory.contains_key(&def.id))
        .collect();

    if pool.is_empty() {
        return money_fallback(FallbackBand { min, max }, rng);
    }

    let pick = if rarity_bonus {
        let tier = roll_rarity_tier(rng);
        let tiered: Vec<&&ItemDef> = pool.iter().filter(|def| def.rarity == tier).collect();
        if tiered.is_empty() {
            pool[rng.gen_range(0..pool.len())]
        } else {
            tiered[rng.gen_range(0..tiered.len())]
        }
    } else {
        pool[rng.gen_range(0..pool.len())]
    };

    Reward::Item {
        id: pick.id.clone(),
        name: pick.name.clone(),
    }
}

/// Uniform-random money bag amount.
pub fn resolve_money_bag<R: Rng>(min: i64, max: i64, rng: &mut R) -> i64 {
    if min >= max {
        return min;
    }
    rng.gen_range(min..=max)
}

/// Applies a resolved reward to the player: items into the inventory, money
/// onto the balance.
pub fn grant_reward(
    inventory: &mut Inventory,
    balance: &mut i64,
    reward: &Reward,
    now: DateTime<Utc>,
) {
    match reward {
        Reward::Item { id, .. } => grant_item(inventory, id, 1, now),
        Reward::Money { amount } => *balance += amount,
    }
}

/// Tier weights for the rarity-bonus re-roll: legendary 5%, epic 10%,
/// rare 20%, uncommon 30%, else common.
fn roll_rarity_tier<R: Rng>(rng: &mut R) -> Rarity {
    let roll: f64 = rng.r#gen();
    if roll < 0.05 {
        Rarity::Legendary
    } else if roll < 0.15 {
        Rarity::Epic
    } else if roll < 0.35 {
        Rarity::Rare
    } else if roll < 0.65 {
        Rarity::Uncommon
    } else {
        Rarity::Common
    }
}

fn money_fallback<R: Rng>(band: FallbackBand, rng: &mut R) -> Reward {
    Reward::Money {
        amount: resolve_money_bag(band.min, band.max, rng),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    /// Rng that replays a fixed f64 sequence for boundary tests.
    struct ScriptedRolls {
        rolls: Vec<f64>,
        next: usize,
    }

    impl ScriptedRolls {
        fn new(rolls: Vec<f64>) -> Self {
            Self { rolls, next: 0 }
        }
    }

    impl rand::RngCore for ScriptedRolls {
        fn next_u32(&mut self) -> u32 {
            self.next_u64() as u32
        }

        // gen::<f64>() consumes the top 53 bits of one u64
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        fn next_u64(&mut self) -> u64 {
            let roll = self.rolls[self.next.min(self.rolls.len() - 1)];
            self.next += 1;
            ((roll * f64::from(1u32 << 26) * f64::from(1u32 << 27)) as u64) << 11
        }

        fn fill_bytes(&mut self, dest: &mut [u8]) {
            for chunk in dest.chunks_mut(8) {
                let bytes = self.next_u64().to_le_bytes();
                chunk.copy_from_slice(&bytes[..chunk.len()]);
            }
        }

        fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
            self.fill_bytes(dest);
            Ok(())
        }
    }

    fn two_entry_table() -> Vec<ChestReward> {
        vec![
            ChestReward {
                id: "coffee".to_string(),
                chance: 0.5,
            },
            ChestReward {
                id: "energy_drink".to_string(),
                chance: 0.5,
            },
        ]
    }

    #[test]
    fn test_boundary_roll_selects_lower_entry() {
        let catalog = Catalog::builtin().unwrap();
        let mut rng = ScriptedRolls::new(vec![0.5]);
        let reward = resolve_chest(&two_entry_table(), &catalog, FallbackBand::default(), &mut rng);
        assert_eq!(
            reward,
            Reward::Item {
                id: "coffee".to_string(),
                name: "Strong Coffee".to_string(),
            }
        );
    }

    #[test]
    fn test_high_roll_selects_upper_entry() {
        let catalog = Catalog::builtin().unwrap();
        let mut rng = ScriptedRolls::new(vec![0.999_999]);
        let reward = resolve_chest(&two_entry_table(), &catalog, FallbackBand::default(), &mut rng);
        assert_eq!(
            reward,
            Reward::Item {
                id: "energy_drink".to_string(),
                name: "Energy Drink".to_string(),
            }
        );
    }

    #[test]
    fn test_underweight_table_falls_back_to_money() {
        let catalog = Catalog::builtin().unwrap();
        // Table only covers 30% of the roll space
        let table = vec![ChestReward {
            id: "coffee".to_string(),
            chance: 0.3,
        }];
        let mut rng = ScriptedRolls::new(vec![0.9, 0.5]);
        let band = FallbackBand { min: 100, max: 200 };
        match resolve_chest(&table, &catalog, band, &mut rng) {
            Reward::Money { amount } => assert!((100..=200).contains(&amount)),
            other => panic!("expected money fallback, got {other:?}"),
        }
    }

    #[test]
    fn test_dangling_reward_id_falls_back_to_money() {
        let catalog = Catalog::builtin().unwrap();
        let table = vec![ChestReward {
            id: "no_such_item".to_string(),
            chance: 1.0,
        }];
        let mut rng = StdRng::seed_from_u64(7);
        assert!(matches!(
            resolve_chest(&table, &catalog, FallbackBand::default(), &mut rng),
            Reward::Money { .. }
        ));
    }

    #[test]
    fn test_mystery_box_stays_in_price_band() {
        let catalog = Catalog::builtin().unwrap();
        let inventory = Inventory::new();
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..100 {
            match resolve_mystery_box(200, 5_000, false, &catalog, &inventory, &mut rng) {
                Reward::Item { id, .. } => {
                    let def = catalog.get(&id).unwrap();
                    assert!((200..=5_000).contains(&def.price), "{id}");
                    assert!(def.category != crate::catalog::Category::Mystery);
                }
                Reward::Money { .. } => panic!("pool is non-empty; no fallback expected"),
            }
        }
    }

    #[test]
    fn test_mystery_box_excludes_owned_non_stackables() {
        let catalog = Catalog::builtin().unwrap();
        let mut inventory = Inventory::new();
        let now = chrono::Utc::now();
        // Own every non-stackable in the band
        for def in catalog.in_price_band(200, 5_000) {
            if !def.stackable {
                grant_item(&mut inventory, &def.id, 1, now);
            }
        }
        let mut rng = StdRng::seed_from_u64(13);
        for _ in 0..100 {
            if let Reward::Item { id, .. } =
                resolve_mystery_box(200, 5_000, false, &catalog, &inventory, &mut rng)
            {
                assert!(catalog.get(&id).unwrap().stackable, "{id}");
            }
        }
    }

    #[test]
    fn test_empty_pool_grants_money_in_band() {
        let catalog = Catalog::builtin().unwrap();
        let inventory = Inventory::new();
        let mut rng = StdRng::seed_from_u64(17);
        // Nothing is priced 1..=10
        match resolve_mystery_box(1, 10, false, &catalog, &inventory, &mut rng) {
            Reward::Money { amount } => assert!((1..=10).contains(&amount)),
            other => panic!("expected money, got {other:?}"),
        }
    }

    #[test]
    fn test_rarity_bonus_tier_boundaries() {
        let mut rng = ScriptedRolls::new(vec![0.01]);
        assert_eq!(roll_rarity_tier(&mut rng), Rarity::Legendary);
        let mut rng = ScriptedRolls::new(vec![0.10]);
        assert_eq!(roll_rarity_tier(&mut rng), Rarity::Epic);
        let mut rng = ScriptedRolls::new(vec![0.30]);
        assert_eq!(roll_rarity_tier(&mut rng), Rarity::Rare);
        let mut rng = ScriptedRolls::new(vec![0.50]);
        assert_eq!(roll_rarity_tier(&mut rng), Rarity::Uncommon);
        let mut rng = ScriptedRolls::new(vec![0.90]);
        assert_eq!(roll_rarity_tier(&mut rng), Rarity::Common);
    }

    #[test]
    fn test_money_bag_bounds() {
        let mut rng = StdRng::seed_from_u64(19);
        for _ in 0..100 {
            let amount = resolve_money_bag(500, 2_500, &mut rng);
            assert!((500..=2_500).contains(&amount));
        }
        assert_eq!(resolve_money_bag(100, 100, &mut rng), 100);
    }

    #[test]
    fn test_grant_reward_applies() {
        let mut inventory = Inventory::new();
        let mut balance = 0_i64;
        let now = chrono::Utc::now();
        grant_reward(
            &mut inventory,
            &mut balance,
            &Reward::Item {
                id: "coffee".to_string(),
                name: "Strong Coffee".to_string(),
            },
            now,
        );
        grant_reward(&mut inventory, &mut balance, &Reward::Money { amount: 750 }, now);
        assert_eq!(inventory.get("coffee").unwrap().quantity, 1);
        assert_eq!(balance, 750);
    }
}

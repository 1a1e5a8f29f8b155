//! Effect lifecycle manager - applying, consuming, and expiring effects.
//!
//! All functions here are pure over the decoded containers (plus a clock and an
//! rng); database plumbing lives in [`crate::core::player`]. User-facing
//! denials come back as [`Outcome`] values so the command layer can render
//! them without matching on error types.

use crate::catalog::effects::{ETERNAL_DURABILITY, EffectKind};
use crate::catalog::{Category, ItemDef};
use crate::core::state::{
    ActiveEffect, CURSE_ID, Cosmetics, EffectContainers, Inventory, take_item,
};
use chrono::{DateTime, Utc};
use rand::Rng;

/// The `{success, message}` result every lifecycle operation produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    /// Whether the operation took effect.
    pub success: bool,
    /// User-facing description of what happened (or why not).
    pub message: String,
}

impl Outcome {
    /// A successful outcome.
    #[must_use]
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    /// A denial.
    #[must_use]
    pub fn reject(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// Why an instance was removed by the expiry sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpiryReason {
    /// Wall-clock expiry passed.
    TimedOut,
    /// Use budget reached zero.
    UsesExhausted,
    /// Durability reached zero.
    Broke,
}

/// One instance removed by the expiry sweep.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpiredEffect {
    /// Item id the instance lived under.
    pub item_id: String,
    /// What killed it.
    pub reason: ExpiryReason,
}

/// Per-trigger durability loss range for equipment.
const EQUIPMENT_WEAR: std::ops::RangeInclusive<u32> = 1..=3;
/// Per-trigger durability loss range for mining tools.
const TOOL_WEAR: std::ops::RangeInclusive<u32> = 1..=5;

/// Denial shown while a disabling curse suppresses item usage.
pub const CURSE_BLOCKED: &str = "A curse is suppressing your effects. Wait it out.";

/// Applies an item's effect onto the containers. Mystery containers are not
/// handled here; the player layer routes those to the reward resolvers.
///
/// Inventory is decremented internally only for tools/equipment (equipping
/// consumes the physical item); for consumables the caller decrements on a
/// successful outcome.
pub fn apply_effect<R: Rng>(
    containers: &mut EffectContainers,
    inventory: &mut Inventory,
    cosmetics: &mut Cosmetics,
    item: &ItemDef,
    now: DateTime<Utc>,
    rng: &mut R,
) -> Outcome {
    if containers.disabling_curse(now).is_some() {
        return Outcome::reject(CURSE_BLOCKED);
    }
    if let EffectKind::Curse { throwable: true, .. } = item.effect {
        return Outcome::reject(format!(
            "**{}** must be thrown at someone with `/throw`.",
            item.name
        ));
    }

    match item.category {
        Category::Consumable | Category::Special => apply_consumable(containers, item, now),
        Category::Permanent => apply_permanent(containers, item, now),
        Category::Tool | Category::Equipment => equip_gear(containers, inventory, item, now, rng),
        Category::Cosmetic => toggle_cosmetic(cosmetics, item),
        Category::Mystery => Outcome::reject(format!(
            "**{}** is a container; it opens rather than applies.",
            item.name
        )),
    }
}

/// One active instance per item at a time: a still-valid instance rejects the
/// re-application with its remaining time or uses.
fn apply_consumable(
    containers: &mut EffectContainers,
    item: &ItemDef,
    now: DateTime<Utc>,
) -> Outcome {
    if let Some(existing) = containers.first_valid(&item.id, now) {
        return Outcome::reject(already_active_message(item, existing, now));
    }
    containers
        .active
        .entry(item.id.clone())
        .or_default()
        .push(ActiveEffect::from_effect(&item.effect, now));
    Outcome::ok(format!("**{}** is now active.", item.name))
}

fn already_active_message(item: &ItemDef, existing: &ActiveEffect, now: DateTime<Utc>) -> String {
    if let Some(remaining) = existing.remaining(now) {
        let minutes = (remaining.num_seconds() + 59) / 60;
        format!(
            "**{}** is already active ({minutes} min remaining).",
            item.name
        )
    } else if let Some(uses) = existing.uses_left {
        format!("**{}** is already active ({uses} uses left).", item.name)
    } else if let Some(durability) = existing.current_durability {
        format!(
            "**{}** is already equipped ({durability} durability left).",
            item.name
        )
    } else {
        format!("**{}** is already active.", item.name)
    }
}

fn apply_permanent(containers: &mut EffectContainers, item: &ItemDef, now: DateTime<Utc>) -> Outcome {
    if let Some(existing) = containers.permanent.get(&item.id) {
        // VIP is renewable once its own duration has lapsed.
        if !existing.is_lapsed_vip(now) {
            return Outcome::reject(format!("**{}** is already in effect.", item.name));
        }
    }
    containers.permanent.insert(
        item.id.clone(),
        crate::core::state::PermanentEffect {
            effect: item.effect.clone(),
            applied_at: now,
        },
    );
    Outcome::ok(format!("**{}** is now permanently in effect.", item.name))
}

fn equip_gear<R: Rng>(
    containers: &mut EffectContainers,
    inventory: &mut Inventory,
    item: &ItemDef,
    now: DateTime<Utc>,
    rng: &mut R,
) -> Outcome {
    if let Some(existing) = containers.first_valid(&item.id, now) {
        return Outcome::reject(already_active_message(item, existing, now));
    }
    let durability = match &item.effect {
        EffectKind::MiningTool { durability, .. } => *durability,
        EffectKind::Equipment {
            base_durability,
            durability_variation,
            ..
        } => {
            let low = base_durability.saturating_sub(*durability_variation).max(1);
            let high = base_durability + durability_variation;
            rng.gen_range(low..=high)
        }
        _ => {
            return Outcome::reject(format!("**{}** is not equippable.", item.name));
        }
    };
    // Equipping consumes the physical item.
    if !take_item(inventory, &item.id, 1) {
        return Outcome::reject(format!("You don't have a **{}** to equip.", item.name));
    }
    containers
        .active
        .entry(item.id.clone())
        .or_default()
        .push(ActiveEffect::with_durability(&item.effect, durability, now));
    Outcome::ok(format!(
        "**{}** equipped ({durability} durability).",
        item.name
    ))
}

fn toggle_cosmetic(cosmetics: &mut Cosmetics, item: &ItemDef) -> Outcome {
    let flag = cosmetics.entry(item.id.clone()).or_insert(false);
    *flag = !*flag;
    if *flag {
        Outcome::ok(format!("**{}** equipped.", item.name))
    } else {
        Outcome::ok(format!("**{}** unequipped.", item.name))
    }
}

/// Consumes one trigger from the oldest valid instance under `item_id`:
/// decrements the use budget, or wears durability down stochastically.
/// Returns true when an instance was touched.
pub fn consume_on_trigger<R: Rng>(
    containers: &mut EffectContainers,
    item_id: &str,
    now: DateTime<Utc>,
    rng: &mut R,
) -> bool {
    let Some(instances) = containers.active.get_mut(item_id) else {
        return false;
    };
    let Some(inst) = instances.iter_mut().find(|i| i.is_valid(now)) else {
        return false;
    };

    if let Some(uses) = inst.uses_left.as_mut() {
        *uses = uses.saturating_sub(1);
    } else if let Some(current) = inst.current_durability.as_mut() {
        // The eternal tool never wears.
        if inst.max_durability == Some(ETERNAL_DURABILITY) {
            return true;
        }
        let wear = match inst.effect {
            EffectKind::Equipment { .. } => rng.gen_range(EQUIPMENT_WEAR),
            _ => rng.gen_range(TOOL_WEAR),
        };
        *current = current.saturating_sub(wear);
    } else {
        // Purely timed instance; nothing to consume.
        return true;
    }

    instances.retain(|i| !i.is_exhausted());
    if instances.is_empty() {
        containers.active.remove(item_id);
    }
    true
}

/// Removes every lapsed instance (timed out, out of uses, broken) and reaps
/// lapsed VIP records. Idempotent: a second run over a clean record removes
/// nothing and reports nothing.
pub fn expire_effects(containers: &mut EffectContainers, now: DateTime<Utc>) -> Vec<ExpiredEffect> {
    let mut expired = Vec::new();

    for (item_id, instances) in &mut containers.active {
        instances.retain(|inst| {
            let reason = if inst.is_expired(now) {
                Some(ExpiryReason::TimedOut)
            } else if inst.uses_left == Some(0) {
                Some(ExpiryReason::UsesExhausted)
            } else if inst.current_durability == Some(0) {
                Some(ExpiryReason::Broke)
            } else {
                None
            };
            match reason {
                Some(reason) => {
                    expired.push(ExpiredEffect {
                        item_id: item_id.clone(),
                        reason,
                    });
                    false
                }
                None => true,
            }
        });
    }
    containers.active.retain(|_, instances| !instances.is_empty());

    let lapsed_vip: Vec<String> = containers
        .permanent
        .iter()
        .filter(|(_, rec)| rec.is_lapsed_vip(now))
        .map(|(id, _)| id.clone())
        .collect();
    for id in lapsed_vip {
        containers.permanent.remove(&id);
        expired.push(ExpiredEffect {
            item_id: id,
            reason: ExpiryReason::TimedOut,
        });
    }

    expired
}

/// Explicitly removes a permanent effect, returning the item to the inventory.
/// VIP is not returnable - its time keeps running whether worn or not.
pub fn remove_permanent(
    containers: &mut EffectContainers,
    inventory: &mut Inventory,
    item_id: &str,
    item_name: &str,
    now: DateTime<Utc>,
) -> Outcome {
    let Some(record) = containers.permanent.get(item_id) else {
        return Outcome::reject(format!("**{item_name}** is not in effect."));
    };
    if matches!(record.effect, EffectKind::VipMembership { .. }) {
        return Outcome::reject("VIP membership runs out on its own; it cannot be removed.");
    }
    containers.permanent.remove(item_id);
    crate::core::state::grant_item(inventory, item_id, 1, now);
    Outcome::ok(format!(
        "**{item_name}** removed and returned to your inventory."
    ))
}

/// Lands a thrown curse on the target's containers. One curse at a time.
pub fn throw_curse(
    target: &mut EffectContainers,
    curse: &EffectKind,
    now: DateTime<Utc>,
) -> Outcome {
    debug_assert!(matches!(curse, EffectKind::Curse { .. }));
    if target.active_curse(now).is_some() {
        return Outcome::reject("They are already cursed.");
    }
    target
        .active
        .entry(CURSE_ID.to_string())
        .or_default()
        .push(ActiveEffect::from_effect(curse, now));
    Outcome::ok("The curse takes hold.")
}

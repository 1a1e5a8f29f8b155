//! Effect application engine - folds stored effects into aggregate modifiers.
//!
//! All queries here are pure and read-only over decoded containers; callers
//! separately invoke the lifecycle module when an action actually executes and
//! uses/durability must be consumed.
//!
//! Aggregation rules: multiplicative effects compound, additive effects
//! (cooldown reduction, luck) sum then clamp. A disabling curse is an absolute
//! override, not a participant in the fold.

use crate::catalog::effects::{Action, EffectKind, VipBenefit, targets_match};
use crate::core::state::EffectContainers;
use chrono::{DateTime, Utc};

/// Aggregate modifiers for one action.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Modifiers {
    /// Money multiplier; neutral = 1.0.
    pub multiplier: f64,
    /// Cooldown reduction fraction; clamped to [`MAX_COOLDOWN_REDUCTION`].
    pub cooldown_reduction: f64,
    /// Luck boost; clamped above at [`MAX_LUCK_BOOST`], no floor (curses and
    /// penalties may push it negative).
    pub luck_boost: f64,
}

impl Default for Modifiers {
    fn default() -> Self {
        Self {
            multiplier: 1.0,
            cooldown_reduction: 0.0,
            luck_boost: 0.0,
        }
    }
}

/// Ceiling for summed cooldown reduction.
pub const MAX_COOLDOWN_REDUCTION: f64 = 0.9;
/// Ceiling for summed luck boost.
pub const MAX_LUCK_BOOST: f64 = 0.95;

/// VIP money bonus while the `MoneyBoost` benefit is active.
const VIP_MONEY_MULTIPLIER: f64 = 1.5;
/// VIP luck bonus while the `LuckBoost` benefit is active.
const VIP_LUCK_BOOST: f64 = 0.10;
/// VIP XP bonus while the `XpBoost` benefit is active.
const VIP_XP_MULTIPLIER: f64 = 1.25;
/// Fixed VIP cooldown waiver while the `CooldownReduction` benefit is active.
const VIP_COOLDOWN_WAIVER: f64 = 0.5;

/// Computes the aggregate money/cooldown/luck modifiers for an action.
#[must_use]
pub fn compute_modifiers(
    containers: &EffectContainers,
    action: Action,
    now: DateTime<Utc>,
) -> Modifiers {
    // A disabling curse short-circuits everything else.
    if let Some(inst) = containers.disabling_curse(now) {
        if let EffectKind::Curse {
            luck_penalty,
            money_penalty,
            ..
        } = inst.effect
        {
            return Modifiers {
                multiplier: 1.0 + money_penalty,
                cooldown_reduction: 0.0,
                luck_boost: luck_penalty,
            };
        }
    }

    let mut mods = Modifiers::default();

    for instances in containers.active.values() {
        for inst in instances {
            if !inst.is_valid(now) {
                continue;
            }
            match &inst.effect {
                EffectKind::Multiplier {
                    targets,
                    multiplier,
                    ..
                } if targets_match(targets, action) => {
                    mods.multiplier *= multiplier;
                }
                EffectKind::CooldownReduction {
                    targets, reduction, ..
                } if targets_match(targets, action) => {
                    mods.cooldown_reduction += reduction;
                }
                EffectKind::SuccessBoost { targets, boost, .. }
                    if targets_match(targets, action) =>
                {
                    mods.luck_boost += boost;
                }
                // Equipment applies its fields directly, on every action.
                EffectKind::Equipment {
                    money_multiplier,
                    luck_boost,
                    ..
                } => {
                    if let Some(m) = money_multiplier {
                        mods.multiplier *= m;
                    }
                    if let Some(b) = luck_boost {
                        mods.luck_boost += b;
                    }
                }
                // A non-disabling curse participates in the fold.
                EffectKind::Curse {
                    luck_penalty,
                    money_penalty,
                    disables_effects: false,
                    ..
                } => {
                    mods.multiplier *= 1.0 + money_penalty;
                    mods.luck_boost += luck_penalty;
                }
                // XP, protection, mining and container kinds feed other queries.
                _ => {}
            }
        }
    }

    for record in containers.permanent.values() {
        match &record.effect {
            EffectKind::PermanentMultiplier {
                targets,
                multiplier,
            } if targets_match(targets, action) => {
                mods.multiplier *= multiplier;
            }
            EffectKind::PermanentCooldown { targets, reduction }
                if targets_match(targets, action) =>
            {
                mods.cooldown_reduction += reduction;
            }
            EffectKind::PermanentLuck { boost }
                if action.is_game() || action == Action::Gambling =>
            {
                mods.luck_boost += boost;
            }
            _ => {}
        }
    }

    if let Some(vip) = containers.active_vip(now) {
        if let EffectKind::VipMembership { benefits, .. } = &vip.effect {
            if benefits.contains(&VipBenefit::MoneyBoost) {
                mods.multiplier *= VIP_MONEY_MULTIPLIER;
            }
            if benefits.contains(&VipBenefit::LuckBoost) {
                mods.luck_boost += VIP_LUCK_BOOST;
            }
        }
    }

    mods.cooldown_reduction = mods.cooldown_reduction.min(MAX_COOLDOWN_REDUCTION);
    mods.luck_boost = mods.luck_boost.min(MAX_LUCK_BOOST);
    mods
}

/// Computes the aggregate XP multiplier for an action. A disabling curse
/// flattens it to 1.0.
#[must_use]
pub fn compute_xp_multiplier(
    containers: &EffectContainers,
    action: Action,
    now: DateTime<Utc>,
) -> f64 {
    if containers.disabling_curse(now).is_some() {
        return 1.0;
    }

    let mut multiplier = 1.0;
    for instances in containers.active.values() {
        for inst in instances {
            if !inst.is_valid(now) {
                continue;
            }
            if let EffectKind::XpMultiplier {
                targets,
                multiplier: m,
                ..
            } = &inst.effect
            {
                if targets_match(targets, action) {
                    multiplier *= m;
                }
            }
        }
    }

    if let Some(vip) = containers.active_vip(now) {
        if let EffectKind::VipMembership { benefits, .. } = &vip.effect {
            if benefits.contains(&VipBenefit::XpBoost) {
                multiplier *= VIP_XP_MULTIPLIER;
            }
        }
    }
    multiplier
}

/// Finds the item id of the first valid protection covering the action,
/// preferring consumable protections (oldest first) over permanent ones.
/// Read-only; the caller consumes a use via the lifecycle module when the
/// protection actually fires.
#[must_use]
pub fn protection_against(
    containers: &EffectContainers,
    action: Action,
    now: DateTime<Utc>,
) -> Option<String> {
    for (item_id, instances) in &containers.active {
        for inst in instances {
            if !inst.is_valid(now) {
                continue;
            }
            if let EffectKind::Protection { prevents, .. } = &inst.effect {
                if targets_match(prevents, action) {
                    return Some(item_id.clone());
                }
            }
        }
    }
    for (item_id, record) in &containers.permanent {
        if let EffectKind::PermanentProtection { prevents } = &record.effect {
            if targets_match(prevents, action) {
                return Some(item_id.clone());
            }
        }
    }
    None
}

/// The best mining yield multiplier among valid tool instances; 1.0 bare-handed.
#[must_use]
pub fn mining_multiplier(containers: &EffectContainers, now: DateTime<Utc>) -> f64 {
    let mut best = 1.0_f64;
    for instances in containers.active.values() {
        for inst in instances {
            if !inst.is_valid(now) {
                continue;
            }
            match &inst.effect {
                EffectKind::MiningTool { multiplier, .. }
                | EffectKind::MiningLimited { multiplier, .. } => {
                    best = best.max(*multiplier);
                }
                _ => {}
            }
        }
    }
    best
}

/// Fixed VIP cooldown waiver while the benefit is active, else 0.
#[must_use]
pub fn vip_cooldown_waiver(containers: &EffectContainers, now: DateTime<Utc>) -> f64 {
    containers
        .active_vip(now)
        .and_then(|vip| match &vip.effect {
            EffectKind::VipMembership { benefits, .. }
                if benefits.contains(&VipBenefit::CooldownReduction) =>
            {
                Some(VIP_COOLDOWN_WAIVER)
            }
            _ => None,
        })
        .unwrap_or(0.0)
}

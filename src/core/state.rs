//! Runtime effect state hung off a player record.
//!
//! Two containers: `active` (per-item ordered lists of time/use-bounded
//! instances; front = oldest, consumed first) and `permanent` (one record per
//! item id). Both are persisted as JSON text columns and decoded by the codec.

use crate::catalog::effects::EffectKind;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Synthetic item id the curse instance lives under. Not a catalog purchase id;
/// curses land on a target via `/throw`, never via `/buy`.
pub const CURSE_ID: &str = "curse";

/// A time/use-bounded runtime record of an item's effect on a user.
///
/// Fields are copied from the catalog descriptor at apply time, so the engine
/// never needs the catalog to evaluate stored instances.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveEffect {
    /// Snapshot of the item's effect descriptor.
    pub effect: EffectKind,
    /// When the instance was created.
    pub applied_at: DateTime<Utc>,
    /// Wall-clock expiry, when the effect is timed.
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
    /// Remaining trigger budget, when the effect is use-limited.
    #[serde(default)]
    pub uses_left: Option<u32>,
    /// Remaining durability for tools/equipment.
    #[serde(default)]
    pub current_durability: Option<u32>,
    /// Durability the instance started with.
    #[serde(default)]
    pub max_durability: Option<u32>,
}

impl ActiveEffect {
    /// Builds a fresh instance from a descriptor at `now`.
    #[must_use]
    pub fn from_effect(effect: &EffectKind, now: DateTime<Utc>) -> Self {
        let expires_at = effect
            .duration_secs()
            .map(|secs| now + Duration::seconds(secs));
        let uses_left = effect.use_limit();
        Self {
            effect: effect.clone(),
            applied_at: now,
            expires_at,
            uses_left,
            current_durability: None,
            max_durability: None,
        }
    }

    /// Builds a durability-bearing instance (tools, equipment).
    #[must_use]
    pub fn with_durability(effect: &EffectKind, durability: u32, now: DateTime<Utc>) -> Self {
        Self {
            effect: effect.clone(),
            applied_at: now,
            expires_at: None,
            uses_left: None,
            current_durability: Some(durability),
            max_durability: Some(durability),
        }
    }

    /// Whether the wall-clock expiry has passed.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }

    /// Whether the use budget or durability has run out.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.uses_left == Some(0) || self.current_durability == Some(0)
    }

    /// Unexpired and not exhausted.
    #[must_use]
    pub fn is_valid(&self, now: DateTime<Utc>) -> bool {
        !self.is_expired(now) && !self.is_exhausted()
    }

    /// Time left before expiry, when the instance is timed and still running.
    #[must_use]
    pub fn remaining(&self, now: DateTime<Utc>) -> Option<Duration> {
        self.expires_at
            .map(|at| at - now)
            .filter(|d| *d > Duration::zero())
    }
}

/// A non-expiring (or self-managed-expiry, e.g. VIP) effect record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PermanentEffect {
    /// Snapshot of the item's effect descriptor.
    pub effect: EffectKind,
    /// When the record was created. For `PassiveIncome` this is advanced to the
    /// last payout; for VIP it anchors the lazy expiry check.
    pub applied_at: DateTime<Utc>,
}

impl PermanentEffect {
    /// Whether a VIP record has outlived its own duration. Always false for
    /// non-VIP kinds; those only leave by explicit removal.
    #[must_use]
    pub fn is_lapsed_vip(&self, now: DateTime<Utc>) -> bool {
        match &self.effect {
            EffectKind::VipMembership { duration, .. } => {
                self.applied_at + Duration::seconds(*duration) <= now
            }
            _ => false,
        }
    }
}

/// Per-item ordered lists of active instances.
pub type ActiveEffects = BTreeMap<String, Vec<ActiveEffect>>;
/// One permanent record per item id.
pub type PermanentEffects = BTreeMap<String, PermanentEffect>;
/// Equip flag per cosmetic item id.
pub type Cosmetics = BTreeMap<String, bool>;

/// The two effect containers carried by a player record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EffectContainers {
    /// Temporary, stacking, expiring instances.
    pub active: ActiveEffects,
    /// Permanent records.
    pub permanent: PermanentEffects,
}

impl EffectContainers {
    /// The currently valid curse instance, if any.
    #[must_use]
    pub fn active_curse(&self, now: DateTime<Utc>) -> Option<&ActiveEffect> {
        self.active
            .get(CURSE_ID)?
            .iter()
            .find(|inst| inst.is_valid(now))
    }

    /// The curse that suppresses every other effect, if one is valid.
    #[must_use]
    pub fn disabling_curse(&self, now: DateTime<Utc>) -> Option<&ActiveEffect> {
        self.active_curse(now).filter(|inst| {
            matches!(
                inst.effect,
                EffectKind::Curse {
                    disables_effects: true,
                    ..
                }
            )
        })
    }

    /// First valid instance for an item id, oldest first.
    #[must_use]
    pub fn first_valid(&self, item_id: &str, now: DateTime<Utc>) -> Option<&ActiveEffect> {
        self.active
            .get(item_id)?
            .iter()
            .find(|inst| inst.is_valid(now))
    }

    /// The valid VIP membership record, honoring lazy expiry.
    #[must_use]
    pub fn active_vip(&self, now: DateTime<Utc>) -> Option<&PermanentEffect> {
        self.permanent.values().find(|rec| {
            matches!(rec.effect, EffectKind::VipMembership { .. }) && !rec.is_lapsed_vip(now)
        })
    }
}

/// One stack of an owned item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OwnedItem {
    /// Catalog id.
    pub id: String,
    /// Held quantity.
    pub quantity: u32,
    /// First purchase/grant time.
    pub purchase_date: DateTime<Utc>,
}

/// Item-id keyed inventory.
pub type Inventory = BTreeMap<String, OwnedItem>;

/// Adds `qty` of an item to the inventory, inserting a stack if absent.
pub fn grant_item(inventory: &mut Inventory, id: &str, qty: u32, now: DateTime<Utc>) {
    inventory
        .entry(id.to_string())
        .and_modify(|owned| owned.quantity += qty)
        .or_insert_with(|| OwnedItem {
            id: id.to_string(),
            quantity: qty,
            purchase_date: now,
        });
}

/// Removes `qty` of an item; returns false (and changes nothing) if the player
/// holds fewer. Empty stacks are dropped.
pub fn take_item(inventory: &mut Inventory, id: &str, qty: u32) -> bool {
    let Some(owned) = inventory.get_mut(id) else {
        return false;
    };
    if owned.quantity < qty {
        return false;
    }
    owned.quantity -= qty;
    if owned.quantity == 0 {
        inventory.remove(id);
    }
    true
}

//! Effect descriptors - the typed payloads attached to catalog items.
//!
//! Every item carries exactly one [`EffectKind`]. The enum is a closed,
//! serde-tagged union rather than an open object bag; unknown `type` tags fail
//! to decode, which the store codec treats as a droppable entry rather than a
//! fatal error.

use serde::{Deserialize, Serialize};

/// Action categories an effect's contribution can apply to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Target {
    /// Work-style earning commands.
    Work,
    /// Mini-games (coinflip, dice, roulette).
    Games,
    /// Gambling commands.
    Gambling,
    /// Robbery attempts (both directions).
    Robbery,
    /// Wildcard - applies everywhere.
    All,
}

/// Concrete action a command executes, matched against effect target sets.
///
/// The sub-game actions exist so a `games` target covers them without the
/// catalog having to enumerate every mini-game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Work-style earning command.
    Work,
    /// Generic games query.
    Games,
    /// Gambling command.
    Gambling,
    /// Robbery attempt.
    Robbery,
    /// Coinflip mini-game.
    Coinflip,
    /// Dice mini-game.
    Dice,
    /// Roulette mini-game.
    Roulette,
}

impl Action {
    /// Whether this action belongs to the games family.
    #[must_use]
    pub const fn is_game(self) -> bool {
        matches!(
            self,
            Self::Games | Self::Coinflip | Self::Dice | Self::Roulette
        )
    }
}

impl Target {
    /// Whether a single target entry covers the given action.
    #[must_use]
    pub const fn covers(self, action: Action) -> bool {
        match self {
            Self::All => true,
            Self::Work => matches!(action, Action::Work),
            Self::Games => action.is_game(),
            Self::Gambling => matches!(action, Action::Gambling),
            Self::Robbery => matches!(action, Action::Robbery),
        }
    }
}

/// Whether any target in the set covers the action.
#[must_use]
pub fn targets_match(targets: &[Target], action: Action) -> bool {
    targets.iter().any(|t| t.covers(action))
}

/// Benefits a VIP membership can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VipBenefit {
    /// Flat +50% money multiplier on all earning actions.
    MoneyBoost,
    /// Flat +0.10 luck boost.
    LuckBoost,
    /// x1.25 XP gain.
    XpBoost,
    /// Fixed 50% cooldown waiver.
    CooldownReduction,
}

/// One entry in a chest's weighted reward table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChestReward {
    /// Catalog id of the reward item.
    pub id: String,
    /// Probability mass for this entry; the table is cumulative in list order.
    pub chance: f64,
}

/// Durability value marking the "eternal" tool variant - never decrements.
pub const ETERNAL_DURABILITY: u32 = 999_999;

/// The effect payload of a catalog item. Exactly one kind per item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EffectKind {
    /// Multiplies money earned from matching actions.
    Multiplier {
        /// Actions this applies to; non-empty.
        targets: Vec<Target>,
        /// Money multiplier, compounds multiplicatively with other multipliers.
        multiplier: f64,
        /// Lifetime in seconds; `None` = until consumed.
        #[serde(default)]
        duration: Option<i64>,
    },
    /// Reduces command cooldowns for matching actions.
    CooldownReduction {
        /// Actions this applies to; non-empty.
        targets: Vec<Target>,
        /// Additive reduction fraction, summed then clamped.
        reduction: f64,
        /// Lifetime in seconds.
        #[serde(default)]
        duration: Option<i64>,
    },
    /// Multiplies XP earned from matching actions.
    XpMultiplier {
        /// Actions this applies to; non-empty.
        targets: Vec<Target>,
        /// XP multiplier.
        multiplier: f64,
        /// Lifetime in seconds.
        #[serde(default)]
        duration: Option<i64>,
    },
    /// Additive luck boost for matching actions.
    SuccessBoost {
        /// Actions this applies to; non-empty.
        targets: Vec<Target>,
        /// Additive luck fraction.
        boost: f64,
        /// Trigger count before exhaustion; `None` = unlimited while unexpired.
        #[serde(default)]
        uses: Option<u32>,
    },
    /// Blocks hostile actions against the holder; consumed on use.
    Protection {
        /// Actions this protects against.
        prevents: Vec<Target>,
        /// Lifetime in seconds.
        #[serde(default)]
        duration: Option<i64>,
        /// Number of blocks before exhaustion.
        #[serde(default)]
        uses: Option<u32>,
    },
    /// Permanent money multiplier.
    PermanentMultiplier {
        /// Actions this applies to; non-empty.
        targets: Vec<Target>,
        /// Money multiplier.
        multiplier: f64,
    },
    /// Permanent cooldown reduction.
    PermanentCooldown {
        /// Actions this applies to; non-empty.
        targets: Vec<Target>,
        /// Additive reduction fraction.
        reduction: f64,
    },
    /// Permanent luck boost, applies to the games/gambling family.
    PermanentLuck {
        /// Additive luck fraction.
        boost: f64,
    },
    /// Permanent protection against hostile actions.
    PermanentProtection {
        /// Actions this protects against.
        prevents: Vec<Target>,
    },
    /// Mining tool with fixed durability.
    MiningTool {
        /// Mining yield multiplier.
        multiplier: f64,
        /// Starting durability; [`ETERNAL_DURABILITY`] marks the eternal variant.
        durability: u32,
    },
    /// Use-limited mining booster.
    MiningLimited {
        /// Mining yield multiplier.
        multiplier: f64,
        /// Trigger count before exhaustion.
        uses: u32,
    },
    /// Wearable gear; money/luck fields apply to every action directly.
    Equipment {
        /// Equipment slot name (e.g. "ring", "amulet").
        slot: String,
        /// Money multiplier while equipped.
        #[serde(default)]
        money_multiplier: Option<f64>,
        /// Additive luck while equipped.
        #[serde(default)]
        luck_boost: Option<f64>,
        /// Center of the durability roll on equip.
        base_durability: u32,
        /// Uniform +/- spread of the durability roll.
        durability_variation: u32,
    },
    /// Opens into one reward from a weighted table.
    OpenChest {
        /// Weighted reward table; cumulative in list order.
        rewards: Vec<ChestReward>,
    },
    /// Opens into a random catalog item inside a price band.
    MysteryBox {
        /// Lower price bound (inclusive).
        min: i64,
        /// Upper price bound (inclusive).
        max: i64,
        /// Layer a tier-weighted rarity re-roll over the price-filtered pool.
        #[serde(default)]
        rarity_bonus: bool,
    },
    /// Opens into a uniform-random currency amount.
    RandomMoney {
        /// Minimum amount (inclusive).
        min: i64,
        /// Maximum amount (inclusive).
        max: i64,
    },
    /// Timed VIP membership with a set of benefit flags.
    VipMembership {
        /// Lifetime in seconds; lazily expired on read.
        duration: i64,
        /// Benefits the membership carries.
        benefits: Vec<VipBenefit>,
    },
    /// Periodic automatic income while held as a permanent effect.
    PassiveIncome {
        /// Minimum payout per interval.
        min_amount: i64,
        /// Maximum payout per interval.
        max_amount: i64,
        /// Payout interval in seconds.
        interval: i64,
    },
    /// Hostile debuff; while active with `disables_effects` it overrides all
    /// other effect contributions.
    Curse {
        /// Additive luck penalty (negative).
        luck_penalty: f64,
        /// Money penalty folded as `1.0 + penalty` (negative).
        money_penalty: f64,
        /// Whether the curse suppresses every other effect while valid.
        disables_effects: bool,
        /// Lifetime in seconds.
        duration: i64,
        /// Must be thrown at a target; cannot be self-applied.
        throwable: bool,
    },
    /// Purely visual item; toggles an equip flag, no effect contribution.
    Cosmetic,
}

impl EffectKind {
    /// Wall-clock lifetime in seconds, when the kind carries one.
    #[must_use]
    pub const fn duration_secs(&self) -> Option<i64> {
        match self {
            Self::Multiplier { duration, .. }
            | Self::CooldownReduction { duration, .. }
            | Self::XpMultiplier { duration, .. }
            | Self::Protection { duration, .. } => *duration,
            Self::VipMembership { duration, .. } | Self::Curse { duration, .. } => Some(*duration),
            _ => None,
        }
    }

    /// Trigger budget, when the kind carries one.
    #[must_use]
    pub const fn use_limit(&self) -> Option<u32> {
        match self {
            Self::SuccessBoost { uses, .. } | Self::Protection { uses, .. } => *uses,
            Self::MiningLimited { uses, .. } => Some(*uses),
            _ => None,
        }
    }

    /// Whether this kind lives in the permanent-effects container.
    #[must_use]
    pub const fn is_permanent(&self) -> bool {
        matches!(
            self,
            Self::PermanentMultiplier { .. }
                | Self::PermanentCooldown { .. }
                | Self::PermanentLuck { .. }
                | Self::PermanentProtection { .. }
                | Self::VipMembership { .. }
                | Self::PassiveIncome { .. }
        )
    }
}

//! Player entity - the persistent economy record for one Discord user.
//!
//! The four container columns (`items`, `active_effects`, `permanent_effects`,
//! `cosmetics`) hold JSON text and are only read/written through the effect
//! store codec, which tolerates legacy string-wrapped payloads.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Player database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "players")]
pub struct Model {
    /// Discord user id (stringified snowflake)
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Coin balance
    pub balance: i64,
    /// Lifetime experience points
    pub xp: i64,
    /// Current level
    pub level: i32,
    /// Inventory container, JSON-encoded
    #[sea_orm(column_type = "Text")]
    pub items: String,
    /// Active (temporary) effects container, JSON-encoded
    #[sea_orm(column_type = "Text")]
    pub active_effects: String,
    /// Permanent effects container, JSON-encoded
    #[sea_orm(column_type = "Text")]
    pub permanent_effects: String,
    /// Cosmetic equip flags, JSON-encoded
    #[sea_orm(column_type = "Text")]
    pub cosmetics: String,
    /// Row creation time
    pub created_at: DateTimeUtc,
    /// Last mutation time
    pub updated_at: DateTimeUtc,
}

/// Player has no relations; all state is embedded in the row.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

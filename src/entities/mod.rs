//! `SeaORM` entity definitions.

/// Player entity - one row per Discord user
pub mod player;

pub use player::Entity as Player;

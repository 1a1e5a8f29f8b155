//! Database configuration module for `BaubleBot`.
//!
//! Handles the `SQLite` connection and table creation using `SeaORM`. Table
//! creation uses `Schema::create_table_from_entity` so the database schema
//! always matches the entity definitions without hand-written SQL.

use crate::entities::Player;
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};

/// Gets the database URL from the environment or the default `SQLite` path.
#[must_use]
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://data/baublebot.sqlite".to_string())
}

/// Establishes the database connection.
pub async fn create_connection() -> Result<DatabaseConnection> {
    Database::connect(get_database_url()).await.map_err(Into::into)
}

/// Creates all tables from the entity definitions.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let player_table = schema.create_table_from_entity(Player);
    db.execute(builder.build(&player_table)).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::player::Model as PlayerModel;
    use sea_orm::{EntityTrait, QuerySelect};

    #[tokio::test]
    async fn test_create_tables() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;

        // Table exists and is queryable
        let _: Vec<PlayerModel> = Player::find().limit(1).all(&db).await?;
        Ok(())
    }
}

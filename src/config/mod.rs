/// Database configuration and connection management
pub mod database;

/// Shop configuration loading from shop.toml
pub mod shop;

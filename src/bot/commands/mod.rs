//! Discord command implementations organized by category.

#![allow(clippy::too_long_first_doc_paragraph)]

/// Active and permanent effect commands
pub mod effects;

/// General utility commands
pub mod general;

/// Inventory and item usage commands
pub mod items;

/// Shop browsing and purchase commands
pub mod shop;

// Export commands
pub use effects::*;
pub use general::*;
pub use items::*;
pub use shop::*;

//! Core engine - framework-agnostic economy and effect logic.
//!
//! Everything under `core` is either pure over decoded state (engine,
//! lifecycle, rewards, codec) or thin database orchestration (player). The bot
//! layer calls into this module and renders the results.

/// Effect store codec - the decode/encode boundary for persisted containers
pub mod codec;
/// Effect application engine - modifier aggregation queries
pub mod engine;
/// Effect lifecycle - apply, consume, expire
pub mod lifecycle;
/// Expiry-notification throttling
pub mod notify;
/// Player persistence orchestration and background sweeps
pub mod player;
/// Randomized reward resolution
pub mod rewards;
/// Runtime effect/inventory state types
pub mod state;

//! Battle coordination for Tankforge.
//!
//! Each battle runs as an isolated Tokio task (actor model) that owns the
//! duel board and drives the request-card / resolve-turn loop.
//!
//! # Key types
//!
//! - [`BattleCoordinator`]: validates and starts battles
//! - [`BattleDirectory`]: player → running battle
//! - [`BattleHandle`]: submit cards to, or cancel, a running battle
//! - [`Duel`]: pure turn logic
//! - [`BattlePhase`]: turn-loop state machine
//! - [`BattleConfig`]: deck size, timeouts, delays

mod battle;
mod config;
mod coordinator;
mod directory;
mod error;
mod logic;

pub use battle::{BattleHandle, BattleId, BattleOutcome, Combatant, EndReason};
pub use config::{BattleConfig, BattlePhase};
pub use coordinator::BattleCoordinator;
pub use directory::BattleDirectory;
pub use error::BattleError;
pub use logic::{Duel, Move, Side, TurnReport};

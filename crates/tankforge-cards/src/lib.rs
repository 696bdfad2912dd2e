//! Card catalog and limited pack dispenser for Tankforge.
//!
//! # Key types
//!
//! - [`Catalog`] — the immutable list of card templates, grouped by [`Tier`]
//! - [`PackDispenser`] — draws distinct cards and enforces the global
//!   pack inventory
//! - [`PackConfig`] — inventory size and cards per pack

mod catalog;
mod config;
mod dispenser;
mod error;

pub use catalog::{Catalog, Template, Tier};
pub use config::PackConfig;
pub use dispenser::PackDispenser;
pub use error::CardError;

//! # Tankforge
//!
//! Server for a two-player, turn-based tank card game played over
//! newline-delimited JSON on TCP.
//!
//! Players connect, receive an identifier, pair with each other, open
//! limited card packs and fight battles in which each side fields one card
//! at a time. The crate ties together the layers below it:
//!
//! - [`tankforge_transport`]: line-framed TCP connections
//! - [`tankforge_protocol`]: request/response frames and the JSON codec
//! - [`tankforge_session`]: session registry and pairing directory
//! - [`tankforge_cards`]: card catalog and pack dispenser
//! - [`tankforge_battle`]: battle coordinator and turn state machine
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use tankforge::prelude::*;
//!
//! # async fn start() -> Result<(), TankforgeError> {
//! let server = TankforgeServer::builder()
//!     .bind("0.0.0.0:8080")
//!     .build()
//!     .await?;
//! server.run().await
//! # }
//! ```

mod config;
mod disconnect;
mod dispatch;
mod error;
mod handler;
mod server;

pub use config::ServerConfig;
pub use error::{RequestError, TankforgeError};
pub use server::{TankforgeServer, TankforgeServerBuilder};

/// Common imports for running a server.
pub mod prelude {
    pub use crate::{ServerConfig, TankforgeError, TankforgeServer, TankforgeServerBuilder};
    pub use tankforge_battle::BattleConfig;
    pub use tankforge_cards::PackConfig;
    pub use tankforge_protocol::{PlayerId, Request, RequestKind, Response, ResponseKind, Tank};
}

//! Player session registry and pairing directory for Tankforge.
//!
//! This crate answers two questions for the rest of the server:
//!
//! 1. **Who is online?** — [`SessionRegistry`] maps each generated
//!    [`PlayerId`](tankforge_protocol::PlayerId) to the outbound channel of
//!    its live connection.
//! 2. **Who plays with whom?** — [`PairingDirectory`] holds the symmetric
//!    1:1 pairing relation that battles require.
//!
//! # How it fits in the stack
//!
//! ```text
//! Battle Layer (above)   ← sends notifications through PlayerSender
//!     ↕
//! Session Layer (this crate)  ← player identity, connection handles, pairs
//!     ↕
//! Protocol Layer (below) ← PlayerId, Response
//! ```
//!
//! Both structures own their map behind a `tokio::sync::RwLock` and expose
//! only whole operations; no lock guard ever leaves the crate.

mod error;
mod pairing;
mod registry;
mod session;

pub use error::{PairingError, SessionError};
pub use pairing::PairingDirectory;
pub use registry::SessionRegistry;
pub use session::{PlayerSender, Session};

//! Wire protocol for Tankforge.
//!
//! This crate defines the "language" that players and the server speak:
//!
//! - **Types** ([`Request`], [`Response`], [`Tank`], [`PlayerId`]) —
//!   the frame structures that travel on the wire, one JSON object per line.
//! - **Kinds** ([`RequestKind`], [`ResponseKind`]) — the `tipo` tags that
//!   select what a frame means.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]) — how frames are converted
//!   to/from bytes.
//! - **Errors** ([`ProtocolError`]) — what can go wrong during
//!   encoding/decoding.
//!
//! # Architecture
//!
//! The protocol layer sits between transport (raw lines) and the session
//! and battle layers. It doesn't know about connections or battles —
//! it only knows how to serialize and deserialize frames.
//!
//! ```text
//! Transport (lines) → Protocol (Request/Response) → Session / Battle
//! ```

mod codec;
mod error;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use types::{
    PlayerId, Request, RequestKind, Response, ResponseKind, SERVER_OWNER,
    Tank,
};

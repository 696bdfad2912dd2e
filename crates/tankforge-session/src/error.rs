//! Error types for the session layer.

use tankforge_protocol::PlayerId;

/// Errors from looking up or messaging a session.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// No session exists for the given player.
    #[error("player {0} is not online")]
    NotFound(PlayerId),

    /// The session exists but its connection no longer accepts frames.
    #[error("connection of player {0} is closed")]
    Unreachable(PlayerId),
}

/// Reasons a pairing request is refused, in the order they are checked.
///
/// The `Display` text is sent verbatim to the requesting client.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PairingError {
    #[error("cannot pair with self")]
    SelfPairing,

    #[error("target does not exist")]
    TargetNotFound,

    #[error("requester already paired")]
    RequesterPaired,

    #[error("target already paired")]
    TargetPaired,
}

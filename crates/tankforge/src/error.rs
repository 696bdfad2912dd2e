//! Unified error type for the Tankforge server.

use tankforge_battle::BattleError;
use tankforge_cards::CardError;
use tankforge_protocol::ProtocolError;
use tankforge_session::{PairingError, SessionError};
use tankforge_transport::TransportError;

/// A request the connection handler refuses before it reaches any
/// component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RequestError {
    #[error("malformed frame")]
    MalformedFrame,

    #[error("invalid command")]
    UnknownCommand,

    #[error("sender id mismatch")]
    SenderMismatch,

    #[error("not paired")]
    NotPaired,

    #[error("not paired with target")]
    NotPairedWith,
}

/// Top-level error that wraps all crate-specific errors.
///
/// Errors raised while serving a request are answered with an `Erro`
/// frame carrying this type's `Display` text, so every wrapped variant is
/// `transparent`.
#[derive(Debug, thiserror::Error)]
pub enum TankforgeError {
    /// A transport-level error (bind, accept, send, recv).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A protocol-level error (encode, decode).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A session-level error (player offline, connection closed).
    #[error(transparent)]
    Session(#[from] SessionError),

    /// A pairing request was refused.
    #[error(transparent)]
    Pairing(#[from] PairingError),

    /// A pack draw failed or the pack config is unusable.
    #[error(transparent)]
    Card(#[from] CardError),

    /// A battle could not be started or fed.
    #[error(transparent)]
    Battle(#[from] BattleError),

    /// The request itself was rejected.
    #[error(transparent)]
    Request(#[from] RequestError),

    /// The server config is unusable.
    #[error("invalid server config: {0}")]
    InvalidConfig(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_transport_error() {
        let err = TransportError::FrameTooLong { max: 64 };
        let tankforge_err: TankforgeError = err.into();
        assert!(matches!(tankforge_err, TankforgeError::Transport(_)));
        assert!(tankforge_err.to_string().contains("64"));
    }

    #[test]
    fn test_pairing_error_text_is_passed_through() {
        let tankforge_err: TankforgeError = PairingError::TargetPaired.into();
        assert_eq!(tankforge_err.to_string(), "target already paired");
    }

    #[test]
    fn test_card_error_text_is_passed_through() {
        let tankforge_err: TankforgeError = CardError::NoPacksRemaining.into();
        assert_eq!(tankforge_err.to_string(), "no packs remaining");
    }

    #[test]
    fn test_battle_error_text_is_passed_through() {
        let tankforge_err: TankforgeError = BattleError::NotInBattle.into();
        assert_eq!(tankforge_err.to_string(), "not in a battle");
    }

    #[test]
    fn test_request_error_text_is_passed_through() {
        let tankforge_err: TankforgeError = RequestError::UnknownCommand.into();
        assert_eq!(tankforge_err.to_string(), "invalid command");
    }
}

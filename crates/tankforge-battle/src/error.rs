//! Error types for the battle layer.

use tankforge_protocol::PlayerId;

use crate::BattleId;

/// Errors that can occur while starting or feeding a battle.
///
/// Variants that reach a client are rendered with their `Display` text.
#[derive(Debug, thiserror::Error)]
pub enum BattleError {
    /// One of the players is already fighting.
    #[error("already in a battle")]
    AlreadyInBattle(PlayerId),

    /// A player tried to battle themselves.
    #[error("cannot battle self")]
    SelfBattle,

    /// A submission came from someone who is not in any battle.
    #[error("not in a battle")]
    NotInBattle,

    /// A submission came from a player who is not part of this battle.
    #[error("player {0} is not a participant of this battle")]
    NotAParticipant(PlayerId),

    /// A second card arrived before the first was consumed.
    #[error("player {player} submitted a card while one was pending in {battle}")]
    SlotOccupied { battle: BattleId, player: PlayerId },

    /// The battle is already tearing down.
    #[error("battle {0} is finishing")]
    Finishing(BattleId),

    /// The battle config cannot be used.
    #[error("invalid battle config: {0}")]
    InvalidConfig(String),
}

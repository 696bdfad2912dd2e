//! Battle configuration and phase machine.

use std::time::Duration;

use crate::BattleError;

// ---------------------------------------------------------------------------
// BattleConfig
// ---------------------------------------------------------------------------

/// Settings shared by every battle a coordinator starts.
#[derive(Debug, Clone)]
pub struct BattleConfig {
    /// Cards each side may field before it loses on exhaustion.
    pub deck_size: usize,

    /// How long a side has to submit a requested card.
    pub card_timeout: Duration,

    /// Pause between the start announcement and the first round.
    pub start_delay: Duration,

    /// Pause after each resolved round.
    pub round_delay: Duration,
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            deck_size: 5,
            card_timeout: Duration::from_secs(10),
            start_delay: Duration::from_secs(1),
            round_delay: Duration::from_secs(1),
        }
    }
}

impl BattleConfig {
    /// Rejects configs a battle cannot run with.
    pub fn validate(&self) -> Result<(), BattleError> {
        if self.deck_size == 0 {
            return Err(BattleError::InvalidConfig(
                "deck size must be at least 1".into(),
            ));
        }
        if self.card_timeout.is_zero() {
            return Err(BattleError::InvalidConfig(
                "card timeout must be positive".into(),
            ));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// BattlePhase
// ---------------------------------------------------------------------------

/// Where a battle's turn loop currently is.
///
/// ```text
/// AwaitingCards ⇄ ResolvingTurn
///       │               │
///       └──→ Finished ←─┘
/// ```
///
/// - **AwaitingCards**: one or both sides have no card in play; the
///   battle is requesting and waiting for cards.
/// - **ResolvingTurn**: both current cards are known; damage is applied.
/// - **Finished**: terminal. Entered on exhaustion, timeout or
///   cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BattlePhase {
    AwaitingCards,
    ResolvingTurn,
    Finished,
}

impl BattlePhase {
    /// Returns `true` if moving to `target` is a legal transition.
    pub fn can_transition_to(self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::AwaitingCards, Self::ResolvingTurn)
                | (Self::ResolvingTurn, Self::AwaitingCards)
                | (Self::AwaitingCards, Self::Finished)
                | (Self::ResolvingTurn, Self::Finished)
        )
    }

    /// Returns `true` for the terminal phase.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Finished)
    }
}

impl std::fmt::Display for BattlePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AwaitingCards => write!(f, "AwaitingCards"),
            Self::ResolvingTurn => write!(f, "ResolvingTurn"),
            Self::Finished => write!(f, "Finished"),
        }
    }
}

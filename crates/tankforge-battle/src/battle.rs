//! Battle actor: an isolated Tokio task that runs one duel to completion.
//!
//! The outside world talks to a running battle through a [`BattleHandle`]:
//! it submits cards into per-side single-slot channels and can raise the
//! battle's cancellation token. The actor owns the [`Duel`] and the two
//! players' outbound channels, so no lock guards the board.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use tankforge_protocol::{PlayerId, Response, ResponseKind};
use tankforge_session::PlayerSender;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio_util::sync::CancellationToken;

use crate::logic::{Duel, Move, Side};
use crate::{BattleConfig, BattleDirectory, BattleError, BattlePhase};

/// Unique identifier of a battle, used to tell a battle's directory
/// entries apart from a newer battle's.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BattleId(pub u64);

impl fmt::Display for BattleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "B-{}", self.0)
    }
}

/// Why a battle ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndReason {
    /// The loser had no cards left to field.
    NoCardsRemaining,
    /// The loser did not submit a requested card in time.
    Timeout,
    /// The battle was cancelled from outside (disconnect, protocol abuse).
    ForcedTermination,
}

impl fmt::Display for EndReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoCardsRemaining => write!(f, "no cards remaining"),
            Self::Timeout => write!(f, "timeout"),
            Self::ForcedTermination => write!(f, "forced termination"),
        }
    }
}

/// How a battle ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BattleOutcome {
    pub winner: Option<PlayerId>,
    pub loser: Option<PlayerId>,
    pub reason: EndReason,
}

impl BattleOutcome {
    fn decided(winner: &PlayerId, loser: &PlayerId, reason: EndReason) -> Self {
        Self {
            winner: Some(winner.clone()),
            loser: Some(loser.clone()),
            reason,
        }
    }

    fn forced() -> Self {
        Self {
            winner: None,
            loser: None,
            reason: EndReason::ForcedTermination,
        }
    }

    /// Text of the `Fim_Batalha` notification.
    pub fn message(&self) -> String {
        match (&self.winner, &self.loser) {
            (Some(winner), Some(loser)) => format!(
                "Battle over: winner {winner}, loser {loser} ({})",
                self.reason
            ),
            _ => format!("Battle over: no winner ({})", self.reason),
        }
    }
}

/// State shared between the actor and every handle clone.
#[derive(Debug, Default)]
struct BattleShared {
    cancel: CancellationToken,
    finalized: AtomicBool,
    done: CancellationToken,
    outcome: OnceLock<BattleOutcome>,
}

impl BattleShared {
    /// Claims the right to finalize. Only the first caller gets `true`.
    fn begin_finalize(&self) -> bool {
        self.finalized
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    fn is_finalized(&self) -> bool {
        self.finalized.load(Ordering::Acquire)
    }
}

/// Handle to a running battle.
///
/// Cheap to clone; the [`BattleDirectory`] stores one per participant.
#[derive(Debug, Clone)]
pub struct BattleHandle {
    id: BattleId,
    players: [PlayerId; 2],
    slots: [mpsc::Sender<Move>; 2],
    shared: Arc<BattleShared>,
}

impl BattleHandle {
    pub fn id(&self) -> BattleId {
        self.id
    }

    /// Both participants, first side then second side.
    pub fn players(&self) -> &[PlayerId; 2] {
        &self.players
    }

    /// The seat `player` occupies, if they are in this battle.
    pub fn side_of(&self, player: &PlayerId) -> Option<Side> {
        Side::BOTH
            .into_iter()
            .find(|side| &self.players[side.index()] == player)
    }

    /// Hands a card to the battle for `player`'s side.
    ///
    /// Each side has room for exactly one pending card. Submitting while a
    /// card is still pending, or after the battle began finishing, cancels
    /// the battle and returns an error.
    pub fn submit(&self, player: &PlayerId, mv: Move) -> Result<(), BattleError> {
        let side = self
            .side_of(player)
            .ok_or_else(|| BattleError::NotAParticipant(player.clone()))?;

        if self.shared.is_finalized() {
            self.cancel();
            return Err(BattleError::Finishing(self.id));
        }

        match self.slots[side.index()].try_send(mv) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(_)) => {
                tracing::warn!(
                    battle = %self.id,
                    %player,
                    "card submitted while one was pending, cancelling"
                );
                self.cancel();
                Err(BattleError::SlotOccupied {
                    battle: self.id,
                    player: player.clone(),
                })
            }
            Err(TrySendError::Closed(_)) => {
                self.cancel();
                Err(BattleError::Finishing(self.id))
            }
        }
    }

    /// Raises the cancellation signal. Idempotent.
    pub fn cancel(&self) {
        if !self.shared.cancel.is_cancelled() {
            tracing::debug!(battle = %self.id, "battle cancellation raised");
        }
        self.shared.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.shared.cancel.is_cancelled()
    }

    /// Returns `true` once the battle has been finalized.
    pub fn is_finished(&self) -> bool {
        self.shared.done.is_cancelled()
    }

    /// Waits for the battle to finish and returns how it ended.
    pub async fn finished(&self) -> Option<BattleOutcome> {
        self.shared.done.cancelled().await;
        self.shared.outcome.get().cloned()
    }
}

/// What happened while waiting for a card.
enum Wait {
    Received(Move),
    TimedOut,
    Cancelled,
}

/// The internal battle actor state. Runs inside a Tokio task.
pub(crate) struct BattleActor {
    handle: BattleHandle,
    duel: Duel,
    phase: BattlePhase,
    senders: [PlayerSender; 2],
    inbox: [mpsc::Receiver<Move>; 2],
    config: BattleConfig,
    directory: Arc<BattleDirectory>,
}

impl BattleActor {
    /// Runs the duel until it ends, then finalizes.
    pub(crate) async fn run(mut self) {
        tracing::info!(
            battle = %self.handle.id,
            first = %self.duel.player(Side::First),
            second = %self.duel.player(Side::Second),
            "battle started"
        );

        let outcome = self.play().await;
        self.finalize(outcome).await;
    }

    async fn play(&mut self) -> BattleOutcome {
        for side in Side::BOTH {
            let opponent = self.duel.player(side.opponent()).as_str();
            self.send(side, Response::new(ResponseKind::BattleStarted, opponent));
        }

        if !self.pause(self.config.start_delay).await {
            return BattleOutcome::forced();
        }

        loop {
            if self.handle.is_cancelled() {
                return BattleOutcome::forced();
            }
            self.set_phase(BattlePhase::AwaitingCards);

            for side in Side::BOTH {
                if !self.duel.needs_card(side) {
                    continue;
                }
                if let Some(outcome) = self.collect_card(side).await {
                    return outcome;
                }
            }

            self.set_phase(BattlePhase::ResolvingTurn);
            let Some(report) = self.duel.resolve_turn() else {
                continue;
            };
            let attacker = self.duel.player(report.attacker).clone();
            tracing::debug!(
                battle = %self.handle.id,
                round = report.round,
                %attacker,
                destroyed = ?report.destroyed,
                "turn resolved"
            );

            let turn = Response::new(
                ResponseKind::TurnResolved,
                format!("Player {attacker} attacked on turn {}", report.round),
            )
            .with_cards(report.cards.to_vec());
            self.broadcast(turn);

            if !self.pause(self.config.round_delay).await {
                return BattleOutcome::forced();
            }
        }
    }

    /// Requests and waits for `side`'s next card. Returns an outcome if
    /// the battle ends instead.
    async fn collect_card(&mut self, side: Side) -> Option<BattleOutcome> {
        let player = self.duel.player(side).clone();
        let opponent = self.duel.player(side.opponent()).clone();

        if self.duel.is_exhausted(side) {
            return Some(BattleOutcome::decided(
                &opponent,
                &player,
                EndReason::NoCardsRemaining,
            ));
        }

        let index = self.duel.used(side);
        self.send(
            side,
            Response::new(ResponseKind::CardRequested, index.to_string()),
        );

        match self.await_move(side).await {
            Wait::Received(mv) => {
                if mv.declared_index != Some(index as i64) {
                    tracing::debug!(
                        battle = %self.handle.id,
                        %player,
                        expected = index,
                        declared = ?mv.declared_index,
                        "declared card index differs from requested"
                    );
                }
                if self.duel.place(side, mv) {
                    tracing::warn!(
                        battle = %self.handle.id,
                        %player,
                        "card index out of range, placeholder fielded"
                    );
                }
                None
            }
            Wait::TimedOut => {
                tracing::info!(battle = %self.handle.id, %player, "card wait timed out");
                Some(BattleOutcome::decided(
                    &opponent,
                    &player,
                    EndReason::Timeout,
                ))
            }
            Wait::Cancelled => Some(BattleOutcome::forced()),
        }
    }

    async fn await_move(&mut self, side: Side) -> Wait {
        let inbox = &mut self.inbox[side.index()];
        tokio::select! {
            biased;
            _ = self.handle.shared.cancel.cancelled() => Wait::Cancelled,
            received = tokio::time::timeout(self.config.card_timeout, inbox.recv()) => {
                match received {
                    Ok(Some(mv)) => Wait::Received(mv),
                    Ok(None) => Wait::Cancelled,
                    Err(_) => Wait::TimedOut,
                }
            }
        }
    }

    /// Sleeps for `delay` unless cancelled first. Returns `false` on
    /// cancellation.
    async fn pause(&self, delay: Duration) -> bool {
        if delay.is_zero() {
            tokio::task::yield_now().await;
            return !self.handle.is_cancelled();
        }
        tokio::select! {
            biased;
            _ = self.handle.shared.cancel.cancelled() => false,
            _ = tokio::time::sleep(delay) => true,
        }
    }

    /// Ends the battle exactly once: clears the directory, notifies both
    /// players and releases the card slots.
    async fn finalize(&mut self, outcome: BattleOutcome) {
        if !self.handle.shared.begin_finalize() {
            return;
        }
        self.set_phase(BattlePhase::Finished);

        self.directory.remove_pair(&self.handle).await;

        self.broadcast(Response::new(ResponseKind::BattleOver, outcome.message()));

        for inbox in &mut self.inbox {
            inbox.close();
        }
        self.handle.shared.cancel.cancel();

        tracing::info!(
            battle = %self.handle.id,
            winner = ?outcome.winner,
            reason = %outcome.reason,
            "battle finished"
        );
        let _ = self.handle.shared.outcome.set(outcome);
        self.handle.shared.done.cancel();
    }

    fn set_phase(&mut self, next: BattlePhase) {
        if self.phase == next {
            return;
        }
        debug_assert!(
            self.phase.can_transition_to(next),
            "illegal battle transition {} -> {}",
            self.phase,
            next
        );
        self.phase = next;
    }

    /// Sends to one side. Silently drops if that player's connection is
    /// gone.
    fn send(&self, side: Side, msg: Response) {
        let _ = self.senders[side.index()].send(msg);
    }

    fn broadcast(&self, msg: Response) {
        for side in Side::BOTH {
            self.send(side, msg.clone());
        }
    }
}

/// A participant as the coordinator hands it over.
#[derive(Debug, Clone)]
pub struct Combatant {
    pub id: PlayerId,
    pub sender: PlayerSender,
}

impl Combatant {
    pub fn new(id: PlayerId, sender: PlayerSender) -> Self {
        Self { id, sender }
    }
}

/// Builds a battle's handle and its not-yet-spawned actor.
pub(crate) fn prepare_battle(
    id: BattleId,
    first: Combatant,
    second: Combatant,
    config: BattleConfig,
    directory: Arc<BattleDirectory>,
) -> (BattleHandle, BattleActor) {
    let (first_tx, first_rx) = mpsc::channel(1);
    let (second_tx, second_rx) = mpsc::channel(1);

    let handle = BattleHandle {
        id,
        players: [first.id.clone(), second.id.clone()],
        slots: [first_tx, second_tx],
        shared: Arc::new(BattleShared::default()),
    };

    let actor = BattleActor {
        handle: handle.clone(),
        duel: Duel::new(first.id, second.id, config.deck_size),
        phase: BattlePhase::AwaitingCards,
        senders: [first.sender, second.sender],
        inbox: [first_rx, second_rx],
        config,
        directory,
    };

    (handle, actor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_begin_finalize_only_first_caller_wins() {
        let shared = BattleShared::default();
        assert!(shared.begin_finalize());
        assert!(!shared.begin_finalize());
        assert!(shared.is_finalized());
    }

    #[test]
    fn test_outcome_message_names_winner_and_reason() {
        let outcome = BattleOutcome::decided(
            &PlayerId::from("1"),
            &PlayerId::from("2"),
            EndReason::Timeout,
        );
        assert_eq!(outcome.message(), "Battle over: winner 1, loser 2 (timeout)");
    }

    #[test]
    fn test_forced_outcome_has_no_winner() {
        let outcome = BattleOutcome::forced();
        assert_eq!(outcome.winner, None);
        assert_eq!(
            outcome.message(),
            "Battle over: no winner (forced termination)"
        );
    }

    #[test]
    fn test_battle_id_display() {
        assert_eq!(BattleId(7).to_string(), "B-7");
    }
}

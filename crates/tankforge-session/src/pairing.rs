//! The pairing directory: a symmetric 1:1 relation between online players.

use std::collections::HashMap;

use tankforge_protocol::PlayerId;
use tokio::sync::RwLock;

use crate::{PairingError, SessionRegistry};

/// Tracks which players are paired for play.
///
/// Every pairing `A ↔ B` is stored as two entries, `A → B` and `B → A`.
/// Both are inserted and removed under the same write lock, so no reader
/// ever observes half a pair.
pub struct PairingDirectory {
    pairs: RwLock<HashMap<PlayerId, PlayerId>>,
}

impl PairingDirectory {
    /// Creates an empty directory.
    pub fn new() -> Self {
        Self {
            pairs: RwLock::new(HashMap::new()),
        }
    }

    /// Pairs `requester` with `target`.
    ///
    /// Checks, in order: self-pairing, target online, requester free,
    /// target free. The caller sends the confirmations.
    ///
    /// The target's presence is verified against `sessions` both before
    /// and after the insertion. A target that disconnects in between is
    /// either caught by the second check (and the pair undone) or removed
    /// from the registry after it, in which case its disconnection cascade
    /// unpairs it.
    pub async fn pair(
        &self,
        sessions: &SessionRegistry,
        requester: &PlayerId,
        target: &PlayerId,
    ) -> Result<(), PairingError> {
        if requester == target {
            return Err(PairingError::SelfPairing);
        }
        if !sessions.contains(target).await {
            return Err(PairingError::TargetNotFound);
        }

        {
            let mut pairs = self.pairs.write().await;
            if pairs.contains_key(requester) {
                return Err(PairingError::RequesterPaired);
            }
            if pairs.contains_key(target) {
                return Err(PairingError::TargetPaired);
            }
            pairs.insert(requester.clone(), target.clone());
            pairs.insert(target.clone(), requester.clone());
        }

        if !sessions.contains(target).await {
            self.undo_pair(requester, target).await;
            return Err(PairingError::TargetNotFound);
        }

        tracing::info!(%requester, %target, "players paired");
        Ok(())
    }

    /// Returns the partner of `player_id`, if paired.
    pub async fn partner_of(&self, player_id: &PlayerId) -> Option<PlayerId> {
        self.pairs.read().await.get(player_id).cloned()
    }

    /// Returns `true` if `player_id` is paired.
    pub async fn is_paired(&self, player_id: &PlayerId) -> bool {
        self.pairs.read().await.contains_key(player_id)
    }

    /// Dissolves whatever pairing `player_id` is part of.
    ///
    /// Returns the former partner, or `None` if the player was unpaired.
    pub async fn unpair(&self, player_id: &PlayerId) -> Option<PlayerId> {
        let mut pairs = self.pairs.write().await;
        let partner = pairs.remove(player_id)?;
        pairs.remove(&partner);
        drop(pairs);

        tracing::info!(%player_id, %partner, "pairing dissolved");
        Some(partner)
    }

    /// Removes the pairing `requester`/`target` only if it is still the
    /// one in place. The target's disconnection cascade may already have
    /// dissolved it and the requester may have paired again since.
    async fn undo_pair(&self, requester: &PlayerId, target: &PlayerId) -> bool {
        let mut pairs = self.pairs.write().await;
        if pairs.get(requester) != Some(target) {
            return false;
        }
        pairs.remove(requester);
        if pairs.get(target) == Some(requester) {
            pairs.remove(target);
        }
        true
    }

    /// Returns the number of active pairings.
    pub async fn pair_count(&self) -> usize {
        self.pairs.read().await.len() / 2
    }
}

impl Default for PairingDirectory {
    fn default() -> Self {
        Self::new()
    }
}

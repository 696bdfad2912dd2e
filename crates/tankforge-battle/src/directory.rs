//! Battle directory: which player is fighting in which battle.

use std::collections::HashMap;

use tankforge_protocol::PlayerId;
use tokio::sync::RwLock;

use crate::{BattleError, BattleHandle};

/// Maps each fighting player to their battle's handle.
///
/// Both participants of a battle are inserted and removed together, so a
/// player is in at most one battle and a pair is never half-registered.
#[derive(Debug, Default)]
pub struct BattleDirectory {
    entries: RwLock<HashMap<PlayerId, BattleHandle>>,
}

impl BattleDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers both participants of `handle`.
    ///
    /// Fails without changing anything if either player already has an
    /// entry.
    pub async fn insert_pair(&self, handle: &BattleHandle) -> Result<(), BattleError> {
        let mut entries = self.entries.write().await;
        if let Some(busy) = handle
            .players()
            .iter()
            .find(|player| entries.contains_key(*player))
        {
            return Err(BattleError::AlreadyInBattle(busy.clone()));
        }
        for player in handle.players() {
            entries.insert(player.clone(), handle.clone());
        }
        tracing::debug!(battle = %handle.id(), "battle registered");
        Ok(())
    }

    /// The battle `player` is currently in.
    pub async fn get(&self, player: &PlayerId) -> Option<BattleHandle> {
        self.entries.read().await.get(player).cloned()
    }

    pub async fn contains(&self, player: &PlayerId) -> bool {
        self.entries.read().await.contains_key(player)
    }

    /// Removes `handle`'s participants, but only entries that still point
    /// at this battle. Returns the number of entries removed.
    pub async fn remove_pair(&self, handle: &BattleHandle) -> usize {
        let mut entries = self.entries.write().await;
        let mut removed = 0;
        for player in handle.players() {
            if entries.get(player).map(BattleHandle::id) == Some(handle.id()) {
                entries.remove(player);
                removed += 1;
            }
        }
        removed
    }

    /// Number of players currently fighting.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

//! Battle coordinator: starts battles and hands out their handles.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::battle::prepare_battle;
use crate::{BattleConfig, BattleDirectory, BattleError, BattleHandle, BattleId, Combatant};

/// Counter for generating unique battle IDs.
static NEXT_BATTLE_ID: AtomicU64 = AtomicU64::new(1);

/// Entry point for battle operations from the connection layer.
///
/// Starting a battle registers both players in the shared
/// [`BattleDirectory`] before the battle task runs, so a card submitted
/// right after `start` returns always finds its battle.
#[derive(Debug)]
pub struct BattleCoordinator {
    directory: Arc<BattleDirectory>,
    config: BattleConfig,
}

impl BattleCoordinator {
    /// Creates a coordinator with an empty directory.
    pub fn new(config: BattleConfig) -> Result<Self, BattleError> {
        config.validate()?;
        Ok(Self {
            directory: Arc::new(BattleDirectory::new()),
            config,
        })
    }

    pub fn directory(&self) -> &Arc<BattleDirectory> {
        &self.directory
    }

    pub fn config(&self) -> &BattleConfig {
        &self.config
    }

    /// Starts a battle between `first` (who attacks first) and `second`.
    ///
    /// Fails with [`BattleError::AlreadyInBattle`] if either player is
    /// already fighting; nothing is spawned in that case.
    pub async fn start(
        &self,
        first: Combatant,
        second: Combatant,
    ) -> Result<BattleHandle, BattleError> {
        if first.id == second.id {
            return Err(BattleError::SelfBattle);
        }

        let id = BattleId(NEXT_BATTLE_ID.fetch_add(1, Ordering::Relaxed));
        let (handle, actor) = prepare_battle(
            id,
            first,
            second,
            self.config.clone(),
            Arc::clone(&self.directory),
        );

        self.directory.insert_pair(&handle).await?;
        tokio::spawn(actor.run());
        Ok(handle)
    }
}

//! The session registry: the single source of truth for "is this player
//! online".

use std::collections::HashMap;

use tankforge_protocol::{PlayerId, Response};
use tankforge_transport::ConnectionId;
use tokio::sync::RwLock;

use crate::{PlayerSender, Session, SessionError};

/// Maps generated player identifiers to their live sessions.
///
/// ## Lifecycle
///
/// ```text
/// accept ──→ register() ──→ [online] ──→ remove() ──→ [closed]
///                              │
///                       lookup() / send_to()
/// ```
///
/// Identifier assignment happens under the write lock together with the
/// insertion, so two concurrent registrations never share an id.
pub struct SessionRegistry {
    inner: RwLock<RegistryInner>,
}

struct RegistryInner {
    sessions: HashMap<PlayerId, Session>,
    /// Last identifier handed out. Never reused, even after removal.
    last_id: u64,
}

impl SessionRegistry {
    /// Creates an empty registry. The first registered player gets `"1"`.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(RegistryInner {
                sessions: HashMap::new(),
                last_id: 0,
            }),
        }
    }

    /// Registers a new connection and returns its session.
    pub async fn register(
        &self,
        connection_id: ConnectionId,
        sender: PlayerSender,
    ) -> Session {
        let mut inner = self.inner.write().await;
        inner.last_id += 1;
        let player_id = PlayerId::from_counter(inner.last_id);
        let session = Session::new(player_id.clone(), connection_id, sender);
        inner.sessions.insert(player_id.clone(), session.clone());
        drop(inner);

        tracing::info!(%player_id, %connection_id, "session registered");
        session
    }

    /// Returns the outbound channel of an online player.
    pub async fn lookup(&self, player_id: &PlayerId) -> Option<PlayerSender> {
        self.inner
            .read()
            .await
            .sessions
            .get(player_id)
            .map(|s| s.sender().clone())
    }

    /// Returns `true` if the player is online.
    pub async fn contains(&self, player_id: &PlayerId) -> bool {
        self.inner.read().await.sessions.contains_key(player_id)
    }

    /// Removes a player's session and closes its connection handle.
    ///
    /// Returns the removed session, or `None` if the player was not online
    /// (removal is idempotent).
    pub async fn remove(&self, player_id: &PlayerId) -> Option<Session> {
        let session = self.inner.write().await.sessions.remove(player_id)?;
        session.close();
        tracing::info!(%player_id, "session removed");
        Some(session)
    }

    /// Sends a frame to an online player.
    ///
    /// The lock is released before the frame is pushed, so a slow
    /// connection never holds up registry writers.
    pub async fn send_to(
        &self,
        player_id: &PlayerId,
        response: Response,
    ) -> Result<(), SessionError> {
        let sender = self
            .lookup(player_id)
            .await
            .ok_or_else(|| SessionError::NotFound(player_id.clone()))?;
        sender
            .send(response)
            .map_err(|_| SessionError::Unreachable(player_id.clone()))
    }

    /// Removes and closes every session. Used on shutdown.
    pub async fn close_all(&self) -> usize {
        let drained: Vec<Session> = self
            .inner
            .write()
            .await
            .sessions
            .drain()
            .map(|(_, s)| s)
            .collect();
        for session in &drained {
            session.close();
        }
        drained.len()
    }

    /// Returns the number of online players.
    pub async fn len(&self) -> usize {
        self.inner.read().await.sessions.len()
    }

    /// Returns `true` if nobody is online.
    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.sessions.is_empty()
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// =========================================================================
// Tests
// =========================================================================

//! Session types: the server's record of one connected player.

use tankforge_protocol::{PlayerId, Response};
use tankforge_transport::ConnectionId;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Channel sender for delivering outbound frames to a player.
///
/// Unbounded so that pushing a notification never blocks the sender: a
/// slow client can only delay its own writer task, never a battle or a
/// lock holder.
pub type PlayerSender = mpsc::UnboundedSender<Response>;

/// A single player's session.
///
/// Created when a connection is accepted; removed (and its connection
/// closed) when the connection's read side fails or the server shuts down.
/// Cloning yields another handle to the same session.
#[derive(Debug, Clone)]
pub struct Session {
    /// The identifier assigned at registration.
    pub player_id: PlayerId,

    /// The transport connection backing this session.
    pub connection_id: ConnectionId,

    sender: PlayerSender,
    closed: CancellationToken,
}

impl Session {
    pub(crate) fn new(
        player_id: PlayerId,
        connection_id: ConnectionId,
        sender: PlayerSender,
    ) -> Self {
        Self {
            player_id,
            connection_id,
            sender,
            closed: CancellationToken::new(),
        }
    }

    /// The outbound channel of this session's connection.
    pub fn sender(&self) -> &PlayerSender {
        &self.sender
    }

    /// Fires once the session is closed. The connection's writer task
    /// watches this to shut down the socket.
    pub fn closed(&self) -> CancellationToken {
        self.closed.clone()
    }

    /// Closes the connection handle. Idempotent.
    pub fn close(&self) {
        self.closed.cancel();
    }

    /// Returns `true` once [`close`](Self::close) has been called.
    pub fn is_closed(&self) -> bool {
        self.closed.is_cancelled()
    }
}

//! Per-connection handler: registration, frame decoding, and the outbound
//! writer.
//!
//! Each accepted connection gets its own Tokio task running this handler.
//! The flow is:
//!   1. Register a session → send `Criaçao_Id` with the new identifier
//!   2. Spawn the writer task that drains the session's outbound channel
//!   3. Loop: read a line → decode a `Request` → dispatch
//!   4. On read failure or session close → disconnection cascade

use std::sync::Arc;

use tankforge_protocol::{Codec, PlayerId, Request, Response, ResponseKind};
use tankforge_transport::{Connection, LineConnection};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::disconnect::handle_disconnect;
use crate::dispatch::dispatch;
use crate::server::ServerState;
use crate::{RequestError, TankforgeError};

/// Drop guard that runs the disconnection cascade when the handler exits.
///
/// This ensures cleanup happens even if the handler panics. Since `Drop`
/// is synchronous, we spawn a fire-and-forget task for the async work.
struct DisconnectGuard<C: Codec> {
    player_id: PlayerId,
    state: Arc<ServerState<C>>,
}

impl<C: Codec> Drop for DisconnectGuard<C> {
    fn drop(&mut self) {
        let player_id = self.player_id.clone();
        let state = Arc::clone(&self.state);
        tokio::spawn(async move {
            handle_disconnect(&state, &player_id).await;
        });
    }
}

/// Handles a single connection from accept to close.
pub(crate) async fn handle_connection<C: Codec>(
    conn: LineConnection,
    state: Arc<ServerState<C>>,
) -> Result<(), TankforgeError> {
    let conn = Arc::new(conn);
    let conn_id = conn.id();

    let (tx, rx) = mpsc::unbounded_channel();
    let session = state.sessions.register(conn_id, tx).await;
    let player_id = session.player_id.clone();
    let closed = session.closed();
    let _guard = DisconnectGuard {
        player_id: player_id.clone(),
        state: Arc::clone(&state),
    };

    // Queued before the writer starts, so it is always the first frame.
    let _ = session
        .sender()
        .send(Response::new(ResponseKind::IdAssigned, player_id.as_str()));
    drop(session);

    let writer = tokio::spawn(write_loop(
        Arc::clone(&conn),
        rx,
        closed.clone(),
        Arc::clone(&state),
    ));

    tracing::info!(%conn_id, %player_id, "player connected");

    loop {
        let received = tokio::select! {
            _ = closed.cancelled() => {
                tracing::debug!(%player_id, "session closed by server");
                break;
            }
            received = conn.recv() => received,
        };

        let data = match received {
            Ok(Some(data)) => data,
            Ok(None) => {
                tracing::info!(%player_id, "connection closed cleanly");
                break;
            }
            Err(e) if e.is_recoverable() => {
                tracing::debug!(%player_id, error = %e, "dropped unreadable frame");
                reply_error(&state, &player_id, RequestError::MalformedFrame.into()).await;
                continue;
            }
            Err(e) => {
                tracing::debug!(%player_id, error = %e, "recv error");
                break;
            }
        };

        let request: Request = match state.codec.decode(&data) {
            Ok(request) => request,
            Err(e) => {
                tracing::debug!(%player_id, error = %e, "failed to decode request");
                reply_error(&state, &player_id, RequestError::MalformedFrame.into()).await;
                continue;
            }
        };

        if let Err(e) = dispatch(&state, &player_id, request).await {
            tracing::debug!(%player_id, error = %e, "request rejected");
            reply_error(&state, &player_id, e).await;
        }
    }

    // Stops the writer even when the loop ended on a read error.
    closed.cancel();
    let _ = writer.await;

    // _guard drops here → disconnection cascade fires.
    Ok(())
}

/// Sends an `Erro` frame to the player who caused `err`.
async fn reply_error<C: Codec>(
    state: &ServerState<C>,
    player_id: &PlayerId,
    err: TankforgeError,
) {
    let _ = state
        .sessions
        .send_to(player_id, Response::error(err.to_string()))
        .await;
}

/// Drains a session's outbound channel onto its socket until the session
/// is closed, then shuts the socket down.
async fn write_loop<C: Codec>(
    conn: Arc<LineConnection>,
    mut rx: mpsc::UnboundedReceiver<Response>,
    closed: CancellationToken,
    state: Arc<ServerState<C>>,
) {
    loop {
        let response = tokio::select! {
            biased;
            _ = closed.cancelled() => break,
            response = rx.recv() => match response {
                Some(response) => response,
                None => break,
            },
        };

        let bytes = match state.codec.encode(&response) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::error!(error = %e, "failed to encode response");
                continue;
            }
        };
        if let Err(e) = conn.send(&bytes).await {
            tracing::debug!(conn_id = %conn.id(), error = %e, "send failed");
            break;
        }
    }

    let _ = conn.close().await;
}

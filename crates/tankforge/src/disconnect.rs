//! Disconnection cascade: session → pairing → battle.

use tankforge_protocol::{Codec, PlayerId, Response, ResponseKind};

use crate::server::ServerState;

/// Tears down everything a dropped player was part of.
///
/// Each step is safe to run when it finds nothing, so the cascade can run
/// after a server-side close, a read error, or both.
pub(crate) async fn handle_disconnect<C: Codec>(state: &ServerState<C>, player: &PlayerId) {
    let removed = state.sessions.remove(player).await.is_some();

    if let Some(partner) = state.pairings.unpair(player).await {
        let notice = Response::new(ResponseKind::PartnerDisconnected, "partner disconnected");
        if let Err(e) = state.sessions.send_to(&partner, notice).await {
            tracing::debug!(%partner, error = %e, "partner already gone");
        }
    }

    if let Some(battle) = state.battles.directory().get(player).await {
        battle.cancel();
        state.battles.directory().remove_pair(&battle).await;
        tracing::info!(%player, battle = %battle.id(), "battle cancelled by disconnect");
    }

    tracing::info!(%player, session_removed = removed, "player disconnected");
}

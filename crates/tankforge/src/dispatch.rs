//! Request dispatch: routes a decoded [`Request`] to the component that
//! serves it and sends the resulting notifications.
//!
//! Every handler returns `Err` for a refused request; the connection
//! handler turns that into an `Erro` frame for the requester alone.

use tankforge_battle::{BattleError, Combatant, Move};
use tankforge_protocol::{Codec, PlayerId, Request, RequestKind, Response, ResponseKind, Tank};
use tankforge_session::{PairingError, SessionError};

use crate::server::ServerState;
use crate::{RequestError, TankforgeError};

/// Serves one request from `player`.
pub(crate) async fn dispatch<C: Codec>(
    state: &ServerState<C>,
    player: &PlayerId,
    request: Request,
) -> Result<(), TankforgeError> {
    if !request.sender.is_empty() && request.sender != player.as_str() {
        return Err(RequestError::SenderMismatch.into());
    }
    let kind = request
        .request_kind()
        .ok_or(RequestError::UnknownCommand)?;
    tracing::debug!(%player, command = kind.tag(), "dispatching request");

    match kind {
        RequestKind::Pair => pair(state, player, &request).await,
        RequestKind::OpenPack => open_pack(state, player).await,
        RequestKind::Battle => battle(state, player, &request).await,
        RequestKind::NextCard => next_card(state, player, request).await,
        RequestKind::Chat => chat(state, player, request).await,
    }
}

async fn pair<C: Codec>(
    state: &ServerState<C>,
    player: &PlayerId,
    request: &Request,
) -> Result<(), TankforgeError> {
    let target = PlayerId::new(request.target.trim());
    state.pairings.pair(&state.sessions, player, &target).await?;

    let _ = state
        .sessions
        .send_to(player, Response::new(ResponseKind::Paired, target.as_str()))
        .await;
    let _ = state
        .sessions
        .send_to(&target, Response::new(ResponseKind::Paired, player.as_str()))
        .await;
    Ok(())
}

async fn open_pack<C: Codec>(
    state: &ServerState<C>,
    player: &PlayerId,
) -> Result<(), TankforgeError> {
    let cards = state.dispenser.draw(player).await?;
    let response = Response::new(ResponseKind::PackOpened, "Pack opened successfully")
        .with_cards(cards);
    state.sessions.send_to(player, response).await?;
    Ok(())
}

/// Starts a battle between `player` and their current partner.
///
/// `id_destinatario` is not consulted: a player can only fight the
/// partner they are paired with.
async fn battle<C: Codec>(
    state: &ServerState<C>,
    player: &PlayerId,
    request: &Request,
) -> Result<(), TankforgeError> {
    let partner = state
        .pairings
        .partner_of(player)
        .await
        .ok_or(RequestError::NotPaired)?;
    if !request.target.is_empty() && request.target != partner.as_str() {
        tracing::debug!(
            %player,
            %partner,
            target = %request.target,
            "battle target differs from partner"
        );
    }

    let own = state
        .sessions
        .lookup(player)
        .await
        .ok_or_else(|| SessionError::NotFound(player.clone()))?;
    let other = state
        .sessions
        .lookup(&partner)
        .await
        .ok_or(PairingError::TargetNotFound)?;

    let handle = state
        .battles
        .start(
            Combatant::new(player.clone(), own),
            Combatant::new(partner, other),
        )
        .await?;
    tracing::info!(%player, battle = %handle.id(), "battle requested");
    Ok(())
}

/// Delivers a card into the player's pending slot.
async fn next_card<C: Codec>(
    state: &ServerState<C>,
    player: &PlayerId,
    request: Request,
) -> Result<(), TankforgeError> {
    let handle = state
        .battles
        .directory()
        .get(player)
        .await
        .ok_or(BattleError::NotInBattle)?;

    let declared_index = request.declared_index();
    let card = request
        .card
        .unwrap_or_else(|| Tank::placeholder(player));
    handle.submit(player, Move::new(card, declared_index))?;
    Ok(())
}

/// Relays chat text to the partner named in `id_destinatario`.
async fn chat<C: Codec>(
    state: &ServerState<C>,
    player: &PlayerId,
    request: Request,
) -> Result<(), TankforgeError> {
    let partner = state.pairings.partner_of(player).await;
    let target = PlayerId::new(request.target.trim());
    if partner.as_ref() != Some(&target) {
        return Err(RequestError::NotPairedWith.into());
    }

    state
        .sessions
        .send_to(&target, Response::new(ResponseKind::Chat, request.message))
        .await?;
    Ok(())
}

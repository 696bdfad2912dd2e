//! Core protocol types for Tankforge's wire format.
//!
//! Every type here travels "on the wire": one JSON object per line. Field
//! names on the wire are fixed by deployed clients (`tipo`, `mensagem`,
//! `carta`, ...); the Rust side uses descriptive names and maps them with
//! `#[serde(rename)]`.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Owner stamped on catalog templates that no player holds yet.
pub const SERVER_OWNER: &str = "server";

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

/// Identifier the server assigns to a connected player.
///
/// Generated from a monotonically increasing counter and carried as a
/// decimal string on the wire (`"1"`, `"2"`, ...). `#[serde(transparent)]`
/// keeps it a plain JSON string rather than `{ "0": "1" }`.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct PlayerId(String);

impl PlayerId {
    /// Wraps an identifier received from the wire.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Formats a counter value as an identifier.
    pub fn from_counter(n: u64) -> Self {
        Self(n.to_string())
    }

    /// Returns the identifier as it appears on the wire.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PlayerId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

// ---------------------------------------------------------------------------
// Tank — the card
// ---------------------------------------------------------------------------

/// A card: one tank with a model name, an owner, health, and attack.
///
/// Health changes during a battle; attack never does. Copies handed to a
/// player carry that player's id as `owner`; catalog templates carry
/// [`SERVER_OWNER`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Tank {
    #[serde(rename = "modelo", default)]
    pub model: String,

    #[serde(rename = "id_jogador", default)]
    pub owner: String,

    #[serde(rename = "vida", default)]
    pub health: i32,

    #[serde(rename = "ataque", default)]
    pub attack: i32,
}

impl Tank {
    /// Creates a card.
    pub fn new(
        model: impl Into<String>,
        owner: impl Into<String>,
        health: i32,
        attack: i32,
    ) -> Self {
        Self {
            model: model.into(),
            owner: owner.into(),
            health,
            attack,
        }
    }

    /// Returns a copy of this card owned by `owner`.
    pub fn copied_for(&self, owner: &PlayerId) -> Self {
        Self {
            owner: owner.as_str().to_owned(),
            ..self.clone()
        }
    }

    /// Minimal-stat stand-in used when a player submits an unusable card.
    pub fn placeholder(owner: &PlayerId) -> Self {
        Self::new("Placeholder", owner.as_str(), 1, 0)
    }

    /// Applies one hit. Health may go negative; callers check
    /// [`is_destroyed`](Self::is_destroyed).
    pub fn take_hit(&mut self, damage: i32) {
        self.health = self.health.saturating_sub(damage);
    }

    /// A card at zero health or below leaves play.
    pub fn is_destroyed(&self) -> bool {
        self.health <= 0
    }
}

// ---------------------------------------------------------------------------
// Kinds
// ---------------------------------------------------------------------------

/// The operations a client can request (the `tipo` of a [`Request`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    /// Pair with the player named in `id_destinatario`.
    Pair,
    /// Draw one pack of cards.
    OpenPack,
    /// Start a battle with the current partner.
    Battle,
    /// Submit the next card for the running battle.
    NextCard,
    /// Relay free text to the current partner.
    Chat,
}

impl RequestKind {
    /// Every request kind, in wire-catalog order.
    pub const ALL: [Self; 5] = [
        Self::Pair,
        Self::OpenPack,
        Self::Battle,
        Self::NextCard,
        Self::Chat,
    ];

    /// The `tipo` string for this kind.
    pub fn tag(self) -> &'static str {
        match self {
            Self::Pair => "Parear",
            Self::OpenPack => "Abrir_Pacote",
            Self::Battle => "Batalhar",
            Self::NextCard => "Próxima_Carta",
            Self::Chat => "Mensagem",
        }
    }

    /// Looks up a kind by its `tipo` string. Unknown tags yield `None`.
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.tag() == tag)
    }
}

/// The notifications the server sends (the `tipo` of a [`Response`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResponseKind {
    /// Carries the identifier assigned to a fresh connection.
    #[serde(rename = "Criaçao_Id")]
    IdAssigned,
    /// Pairing confirmed; `mensagem` names the partner.
    #[serde(rename = "Pareamento")]
    Paired,
    /// Pack draw result; `cartas` holds the drawn cards.
    #[serde(rename = "Sorteio")]
    PackOpened,
    /// Battle started; `mensagem` names the opponent.
    #[serde(rename = "Inicio_Batalha")]
    BattleStarted,
    /// The server wants the card at the deck index in `mensagem`.
    #[serde(rename = "Enviar_Próxima_Carta")]
    CardRequested,
    /// A turn resolved; `cartas` holds both current cards.
    #[serde(rename = "Turno_Realizado")]
    TurnResolved,
    /// Battle over; `mensagem` names winner, loser and reason.
    #[serde(rename = "Fim_Batalha")]
    BattleOver,
    /// The partner's connection dropped.
    #[serde(rename = "Desconexão")]
    PartnerDisconnected,
    /// Chat text relayed from the partner.
    #[serde(rename = "Mensagem")]
    Chat,
    /// Validation or protocol failure; `mensagem` is human-readable.
    #[serde(rename = "Erro")]
    Error,
}

// ---------------------------------------------------------------------------
// Frames
// ---------------------------------------------------------------------------

/// A client → server frame.
///
/// `tipo` is kept as the raw string so an unknown command still decodes
/// and can be answered with a precise error instead of a parse failure.
/// Every other field is optional on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Request {
    #[serde(rename = "tipo")]
    pub kind: String,

    #[serde(rename = "id_remetente", default)]
    pub sender: String,

    #[serde(rename = "id_destinatario", default)]
    pub target: String,

    #[serde(rename = "mensagem", default)]
    pub message: String,

    #[serde(
        rename = "carta",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub card: Option<Tank>,
}

impl Request {
    /// Creates a request of the given kind with every other field empty.
    pub fn new(kind: RequestKind) -> Self {
        Self {
            kind: kind.tag().to_owned(),
            ..Self::default()
        }
    }

    /// Sets `id_remetente`.
    pub fn from_player(mut self, sender: &PlayerId) -> Self {
        self.sender = sender.as_str().to_owned();
        self
    }

    /// Sets `id_destinatario`.
    pub fn to_player(mut self, target: &PlayerId) -> Self {
        self.target = target.as_str().to_owned();
        self
    }

    /// Sets `mensagem`.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Sets `carta`.
    pub fn with_card(mut self, card: Tank) -> Self {
        self.card = Some(card);
        self
    }

    /// The parsed `tipo`, or `None` for an unknown command.
    pub fn request_kind(&self) -> Option<RequestKind> {
        RequestKind::from_tag(&self.kind)
    }

    /// The deck index a card submission claims, when `mensagem` holds one.
    pub fn declared_index(&self) -> Option<i64> {
        self.message.trim().parse().ok()
    }
}

/// A server → client frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    #[serde(rename = "tipo")]
    pub kind: ResponseKind,

    #[serde(rename = "mensagem", default)]
    pub message: String,

    #[serde(
        rename = "cartas",
        default,
        skip_serializing_if = "Vec::is_empty"
    )]
    pub cards: Vec<Tank>,
}

impl Response {
    /// Creates a response without cards.
    pub fn new(kind: ResponseKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            cards: Vec::new(),
        }
    }

    /// Shorthand for an `Erro` response.
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(ResponseKind::Error, message)
    }

    /// Attaches cards to the response.
    pub fn with_cards(mut self, cards: Vec<Tank>) -> Self {
        self.cards = cards;
        self
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    //! The wire names are shared with already-deployed clients, so these
    //! tests pin the exact JSON shapes.

    use super::*;

    #[test]
    fn test_player_id_serializes_as_plain_string() {
        let json = serde_json::to_string(&PlayerId::from_counter(7)).unwrap();
        assert_eq!(json, "\"7\"");
    }

    #[test]
    fn test_player_id_display_is_raw_id() {
        assert_eq!(PlayerId::new("12").to_string(), "12");
    }

    #[test]
    fn test_tank_uses_wire_field_names() {
        let tank = Tank::new("Sherman (Medium)", "3", 100, 28);
        let json: serde_json::Value = serde_json::to_value(&tank).unwrap();

        assert_eq!(json["modelo"], "Sherman (Medium)");
        assert_eq!(json["id_jogador"], "3");
        assert_eq!(json["vida"], 100);
        assert_eq!(json["ataque"], 28);
    }

    #[test]
    fn test_tank_take_hit_and_destroyed() {
        let mut tank = Tank::new("M22 (Light)", "1", 50, 10);
        tank.take_hit(28);
        assert_eq!(tank.health, 22);
        assert!(!tank.is_destroyed());

        tank.take_hit(22);
        assert_eq!(tank.health, 0);
        assert!(tank.is_destroyed());
    }

    #[test]
    fn test_tank_copied_for_stamps_owner_without_touching_source() {
        let template = Tank::new("Maus (Heavy)", SERVER_OWNER, 280, 57);
        let copy = template.copied_for(&PlayerId::new("4"));

        assert_eq!(copy.owner, "4");
        assert_eq!(copy.health, 280);
        assert_eq!(template.owner, SERVER_OWNER);
    }

    #[test]
    fn test_request_kind_tags_round_trip() {
        for kind in RequestKind::ALL {
            assert_eq!(RequestKind::from_tag(kind.tag()), Some(kind));
        }
        assert_eq!(RequestKind::from_tag("Voar"), None);
    }

    #[test]
    fn test_request_decodes_with_missing_optional_fields() {
        let json = r#"{"tipo":"Abrir_Pacote","id_remetente":"1"}"#;
        let req: Request = serde_json::from_str(json).unwrap();

        assert_eq!(req.request_kind(), Some(RequestKind::OpenPack));
        assert_eq!(req.sender, "1");
        assert!(req.target.is_empty());
        assert!(req.card.is_none());
    }

    #[test]
    fn test_request_decodes_card_submission() {
        let json = r#"{
            "tipo": "Próxima_Carta",
            "id_remetente": "2",
            "id_destinatario": "None",
            "mensagem": "3",
            "carta": {"modelo": "T-34 (Medium)", "id_jogador": "2", "vida": 110, "ataque": 27}
        }"#;
        let req: Request = serde_json::from_str(json).unwrap();

        assert_eq!(req.request_kind(), Some(RequestKind::NextCard));
        assert_eq!(req.declared_index(), Some(3));
        assert_eq!(req.card.unwrap().attack, 27);
    }

    #[test]
    fn test_request_declared_index_ignores_free_text() {
        let req = Request::new(RequestKind::NextCard).with_message("Carta");
        assert_eq!(req.declared_index(), None);
    }

    #[test]
    fn test_request_unknown_kind_still_decodes() {
        let req: Request = serde_json::from_str(r#"{"tipo":"Voar"}"#).unwrap();
        assert_eq!(req.request_kind(), None);
    }

    #[test]
    fn test_response_kind_wire_names() {
        let cases = [
            (ResponseKind::IdAssigned, "Criaçao_Id"),
            (ResponseKind::Paired, "Pareamento"),
            (ResponseKind::PackOpened, "Sorteio"),
            (ResponseKind::BattleStarted, "Inicio_Batalha"),
            (ResponseKind::CardRequested, "Enviar_Próxima_Carta"),
            (ResponseKind::TurnResolved, "Turno_Realizado"),
            (ResponseKind::BattleOver, "Fim_Batalha"),
            (ResponseKind::PartnerDisconnected, "Desconexão"),
            (ResponseKind::Chat, "Mensagem"),
            (ResponseKind::Error, "Erro"),
        ];
        for (kind, tag) in cases {
            let json = serde_json::to_value(kind).unwrap();
            assert_eq!(json, tag);
        }
    }

    #[test]
    fn test_response_omits_empty_cards() {
        let json: serde_json::Value =
            serde_json::to_value(Response::error("no packs remaining")).unwrap();

        assert_eq!(json["tipo"], "Erro");
        assert_eq!(json["mensagem"], "no packs remaining");
        assert!(json.get("cartas").is_none());
    }

    #[test]
    fn test_response_with_cards_lists_them_in_order() {
        let cards = vec![
            Tank::new("Fox (Light)", "1", 52, 11),
            Tank::new("KV-2 (Heavy)", "2", 250, 50),
        ];
        let resp = Response::new(ResponseKind::TurnResolved, "turn 0")
            .with_cards(cards);
        let json: serde_json::Value = serde_json::to_value(&resp).unwrap();

        assert_eq!(json["cartas"][0]["modelo"], "Fox (Light)");
        assert_eq!(json["cartas"][1]["modelo"], "KV-2 (Heavy)");
    }
}

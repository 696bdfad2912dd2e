//! Pure turn logic of a duel, free of channels and timers.
//!
//! [`Duel`] tracks which card each side has in play, how many cards each
//! side has lost, and whose turn it is to attack. The battle actor feeds it
//! cards and asks it to resolve turns; everything else (requesting cards,
//! waiting, notifying) lives in the actor.

use tankforge_protocol::{PlayerId, Tank};

/// One of the two seats in a duel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    /// The player who asked for the battle. Attacks on even rounds.
    First,
    /// The partner. Attacks on odd rounds.
    Second,
}

impl Side {
    /// Both sides in request order.
    pub const BOTH: [Side; 2] = [Side::First, Side::Second];

    /// The other seat.
    pub fn opponent(self) -> Self {
        match self {
            Self::First => Self::Second,
            Self::Second => Self::First,
        }
    }

    /// Array index of this seat.
    pub fn index(self) -> usize {
        match self {
            Self::First => 0,
            Self::Second => 1,
        }
    }
}

/// A card submission for one side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Move {
    /// The card the client sent.
    pub card: Tank,

    /// The deck index the client claims this card has, if it gave one.
    pub declared_index: Option<i64>,
}

impl Move {
    pub fn new(card: Tank, declared_index: Option<i64>) -> Self {
        Self {
            card,
            declared_index,
        }
    }
}

/// Result of one resolved turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnReport {
    /// The round that was just played, starting at 0.
    pub round: u64,

    /// Who dealt damage this round.
    pub attacker: Side,

    /// Both current cards after damage, first side then second side.
    pub cards: [Tank; 2],

    /// Which cards were destroyed and left play, first side then second.
    pub destroyed: [bool; 2],
}

/// The board state of a two-player duel.
#[derive(Debug, Clone)]
pub struct Duel {
    players: [PlayerId; 2],
    current: [Option<Tank>; 2],
    used: [usize; 2],
    round: u64,
    deck_size: usize,
}

impl Duel {
    pub fn new(first: PlayerId, second: PlayerId, deck_size: usize) -> Self {
        Self {
            players: [first, second],
            current: [None, None],
            used: [0, 0],
            round: 0,
            deck_size,
        }
    }

    pub fn player(&self, side: Side) -> &PlayerId {
        &self.players[side.index()]
    }

    /// Number of cards `side` has lost so far; also the deck index of the
    /// next card it will be asked for.
    pub fn used(&self, side: Side) -> usize {
        self.used[side.index()]
    }

    pub fn current(&self, side: Side) -> Option<&Tank> {
        self.current[side.index()].as_ref()
    }

    pub fn round(&self) -> u64 {
        self.round
    }

    /// Returns `true` if `side` has no card in play.
    pub fn needs_card(&self, side: Side) -> bool {
        self.current[side.index()].is_none()
    }

    /// Returns `true` once `side` has lost its whole deck.
    pub fn is_exhausted(&self, side: Side) -> bool {
        self.used(side) >= self.deck_size
    }

    /// Who attacks in the current round. The first side opens.
    pub fn attacker(&self) -> Side {
        if self.round % 2 == 0 {
            Side::First
        } else {
            Side::Second
        }
    }

    /// Puts a submitted card into play for `side`.
    ///
    /// A declared index outside `[0, deck_size)` makes the card unusable;
    /// a placeholder with minimal stats takes its place. Returns `true`
    /// when that substitution happened.
    pub fn place(&mut self, side: Side, mv: Move) -> bool {
        let out_of_range = match mv.declared_index {
            Some(i) => i < 0 || i >= self.deck_size as i64,
            None => false,
        };
        let card = if out_of_range {
            Tank::placeholder(self.player(side))
        } else {
            mv.card
        };
        self.current[side.index()] = Some(card);
        out_of_range
    }

    /// Plays one round: the attacker's card hits the defender's card.
    ///
    /// Returns `None` if either side has no card in play. Afterwards every
    /// card at zero health or below leaves play and counts as used, the
    /// attacker's included; a surviving card stays in play for the next
    /// round.
    pub fn resolve_turn(&mut self) -> Option<TurnReport> {
        let attacker = self.attacker();
        let defender = attacker.opponent();

        let damage = self.current[attacker.index()].as_ref()?.attack;
        self.current[defender.index()].as_mut()?.take_hit(damage);

        let cards = [
            self.current[0].clone().unwrap_or_default(),
            self.current[1].clone().unwrap_or_default(),
        ];
        let destroyed = [cards[0].is_destroyed(), cards[1].is_destroyed()];

        for side in Side::BOTH {
            if destroyed[side.index()] {
                self.current[side.index()] = None;
                self.used[side.index()] += 1;
            }
        }

        let report = TurnReport {
            round: self.round,
            attacker,
            cards,
            destroyed,
        };
        self.round += 1;
        Some(report)
    }
}

use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use uuid::Uuid;

use super::constants;

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum Suit {
    Club,
    Diamond,
    Heart,
    Spade,
}

impl Suit {
    pub const ALL: [Self; 4] = [Self::Club, Self::Diamond, Self::Heart, Self::Spade];
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let repr = match self {
            Self::Club => "♣",
            Self::Diamond => "♦",
            Self::Heart => "♥",
            Self::Spade => "♠",
        };
        write!(f, "{repr}")
    }
}

/// Card values run 2..=14 with the ace always high (14).
/// Ace-low straights are handled inside the evaluator.
pub type Value = u8;

/// A card is a tuple of a value and a suit.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct Card(pub Value, pub Suit);

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let value = match self.0 {
            14 => "A",
            13 => "K",
            12 => "Q",
            11 => "J",
            v => &v.to_string(),
        };
        write!(f, "{value}{}", self.1)
    }
}

/// A full deck, consumed from the top during a hand.
#[derive(Clone, Debug)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    /// A fresh 52-card deck in uniformly random order.
    #[must_use]
    pub fn fresh() -> Self {
        let mut cards = Vec::with_capacity(52);
        for value in 2..=14 {
            for suit in Suit::ALL {
                cards.push(Card(value, suit));
            }
        }
        cards.shuffle(&mut rand::rng());
        Self { cards }
    }

    /// Remove and return the top card. The seat cap guarantees a hand can
    /// never consume more than 21 cards, so an empty draw is an invariant
    /// violation rather than a runtime condition.
    pub fn draw(&mut self) -> Card {
        self.cards.pop().expect("deck exhausted: 52-card invariant violated")
    }

    #[must_use]
    pub fn remaining(&self) -> usize {
        self.cards.len()
    }
}

/// Type alias for whole chips. Stacks, bets, and pots are all integer
/// chip counts; there are no fractional chips anywhere in the engine.
pub type Chips = u32;

/// Type alias for seat positions at a table.
pub type SeatIndex = usize;

/// Stable per-connection identity used as the player key.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct PlayerId(pub Uuid);

impl PlayerId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PlayerId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Display name, whitespace-normalized and truncated on construction.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct PlayerName(String);

impl PlayerName {
    pub fn new(s: &str) -> Self {
        let mut name: String = s
            .trim()
            .chars()
            .map(|c| if c.is_whitespace() { '_' } else { c })
            .collect();
        name.truncate(constants::MAX_NAME_LEN);
        if name.is_empty() {
            name.push_str("anon");
        }
        Self(name)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl<'de> Deserialize<'de> for PlayerName {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Self::new(&s))
    }
}

impl From<&str> for PlayerName {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Blinds {
    pub small: Chips,
    pub big: Chips,
}

impl Blinds {
    /// Clamp so the big blind always exceeds the small blind.
    #[must_use]
    pub fn clamped(small: Chips, big: Chips) -> Self {
        let small = small.max(1);
        Self {
            small,
            big: big.max(small + 1),
        }
    }
}

impl fmt::Display for Blinds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.small, self.big)
    }
}

/// An action submitted by a seat, human or bot alike.
///
/// `Bet` and `Raise` both carry the *total* street amount the player wants
/// to be at, not the increment.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum Action {
    Fold,
    Check,
    Call,
    Bet(Chips),
    Raise(Chips),
    AllIn,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let repr = match self {
            Self::Fold => "folds".to_string(),
            Self::Check => "checks".to_string(),
            Self::Call => "calls".to_string(),
            Self::Bet(amount) => format!("bets {amount}"),
            Self::Raise(amount) => format!("raises to {amount}"),
            Self::AllIn => "goes all-in".to_string(),
        };
        write!(f, "{repr}")
    }
}

/// One of the four betting phases within a hand.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Street {
    PreFlop,
    Flop,
    Turn,
    River,
}

impl fmt::Display for Street {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::PreFlop => "pre-flop",
            Self::Flop => "flop",
            Self::Turn => "turn",
            Self::River => "river",
        };
        write!(f, "{repr}")
    }
}

/// Coarse room lifecycle phase; governs which commands are legal.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomPhase {
    Lobby,
    Hand,
    Reveal,
    Showdown,
}

/// A seated player. Per-hand fields are reset by `begin_hand`.
#[derive(Clone, Debug)]
pub struct Player {
    pub id: PlayerId,
    pub name: PlayerName,
    pub seat: SeatIndex,
    pub stack: Chips,
    pub hole: Vec<Card>,
    pub folded: bool,
    pub all_in: bool,
    /// Chips committed on the current street.
    pub bet_this_round: Chips,
    /// Chips committed across the whole hand; drives side-pot math.
    pub committed: Chips,
    /// Whether the player has responded to the street's latest aggression.
    pub has_acted: bool,
    pub connected: bool,
    pub is_bot: bool,
}

impl Player {
    #[must_use]
    pub fn new(id: PlayerId, name: PlayerName, seat: SeatIndex, stack: Chips, is_bot: bool) -> Self {
        Self {
            id,
            name,
            seat,
            stack,
            hole: Vec::with_capacity(constants::HOLE_CARDS),
            folded: false,
            all_in: false,
            bet_this_round: 0,
            committed: 0,
            has_acted: false,
            connected: true,
            is_bot,
        }
    }

    pub fn reset_for_hand(&mut self) {
        self.hole.clear();
        self.folded = false;
        self.all_in = false;
        self.bet_this_round = 0;
        self.committed = 0;
        self.has_acted = false;
    }

    pub fn reset_for_street(&mut self) {
        self.bet_this_round = 0;
        self.has_acted = false;
    }

    /// Dealt in and not folded: still eligible to win something this hand.
    #[must_use]
    pub fn is_live(&self) -> bool {
        !self.hole.is_empty() && !self.folded
    }

    /// Live and able to put more chips in: the betting round waits on them.
    #[must_use]
    pub fn can_act(&self) -> bool {
        self.is_live() && !self.all_in
    }
}

/// Human-readable room event, capped by the room log.
#[derive(Clone, Debug, Serialize)]
pub struct LogEntry {
    pub at: DateTime<Utc>,
    pub text: String,
}

impl LogEntry {
    #[must_use]
    pub fn now(text: String) -> Self {
        Self {
            at: Utc::now(),
            text,
        }
    }
}

/// One winner's share of one pot at showdown.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct WinnerEntry {
    pub name: PlayerName,
    pub seat: SeatIndex,
    pub amount: Chips,
    /// Hand category name, absent when the pot was won without a showdown.
    pub hand: Option<String>,
}

/// Last-hand result summary, replaced at the start of each hand.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct WinnerInfo {
    pub entries: Vec<WinnerEntry>,
}

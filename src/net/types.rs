//! Wire schema for the card-game backend.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every type here is a read-only projection of server truth. Field names
//! follow the backend's camelCase JSON. Card suits and ranks travel as small
//! integers; `Suit` and `Rank` are the single place where that ordering is
//! bound to display glyphs, so their discriminants must track the server enum.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::{Deserialize, Serialize};

/// A game session as listed by `GET /games`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Game {
    pub id: String,
    /// Server-assigned creation timestamp, kept verbatim.
    pub created_at: String,
}

/// A player seated in a game. `total_value` is computed by the server.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub player_id: String,
    pub player_name: String,
    pub total_value: i64,
}

/// One card in a hand. Cards carry no identity beyond suit and rank.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    pub suit: Suit,
    pub rank: Rank,
}

impl Card {
    /// Display form, e.g. `♥A` or `♣10`.
    #[must_use]
    pub fn glyph(self) -> String {
        format!("{}{}", self.suit.glyph(), self.rank.label())
    }
}

/// Remaining cards of one suit, keyed by the server's suit identifier.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuitCount {
    pub suit: String,
    pub remaining: u32,
}

/// Remaining cards of one suit and rank combination.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuitRankCount {
    pub suit: Suit,
    pub rank: Rank,
    pub count: u32,
}

// =============================================================================
// SUIT
// =============================================================================

/// Card suit in server enum order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Suit {
    Hearts = 0,
    Spades = 1,
    Clubs = 2,
    Diamonds = 3,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Hearts, Suit::Spades, Suit::Clubs, Suit::Diamonds];

    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }

    #[must_use]
    pub fn glyph(self) -> &'static str {
        match self {
            Self::Hearts => "♥",
            Self::Spades => "♠",
            Self::Clubs => "♣",
            Self::Diamonds => "♦",
        }
    }

    /// Upper-case enum name as the backend spells it.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Hearts => "HEARTS",
            Self::Spades => "SPADES",
            Self::Clubs => "CLUBS",
            Self::Diamonds => "DIAMONDS",
        }
    }
}

impl TryFrom<u8> for Suit {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Suit::ALL
            .get(usize::from(value))
            .copied()
            .ok_or_else(|| format!("suit out of range: {value}"))
    }
}

impl From<Suit> for u8 {
    fn from(suit: Suit) -> Self {
        suit as u8
    }
}

// =============================================================================
// RANK
// =============================================================================

/// Card rank in server enum order (ace low).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Rank {
    Ace = 0,
    Two = 1,
    Three = 2,
    Four = 3,
    Five = 4,
    Six = 5,
    Seven = 6,
    Eight = 7,
    Nine = 8,
    Ten = 9,
    Jack = 10,
    Queen = 11,
    King = 12,
}

impl Rank {
    pub const ALL: [Rank; 13] = [
        Rank::Ace,
        Rank::Two,
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
    ];

    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        const LABELS: [&str; 13] = ["A", "2", "3", "4", "5", "6", "7", "8", "9", "10", "J", "Q", "K"];
        LABELS[self.index()]
    }
}

impl TryFrom<u8> for Rank {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Rank::ALL
            .get(usize::from(value))
            .copied()
            .ok_or_else(|| format!("rank out of range: {value}"))
    }
}

impl From<Rank> for u8 {
    fn from(rank: Rank) -> Self {
        rank as u8
    }
}

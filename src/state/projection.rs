//! Session projection: one merged snapshot of a game's server views.
//!
//! SYSTEM CONTEXT
//! ==============
//! A snapshot combines the roster, one hand per player and both
//! remaining-count views. `fetch_snapshot` issues the roster branch and the
//! two count views together, fans the hand requests out once the roster is
//! known, and only yields a snapshot when every request succeeded.
//!
//! DENSE TABLES
//! ============
//! The server may omit zero-valued entries. Every lookup into the sparse
//! count lists therefore defaults to zero; an unmatched suit key is ignored.

#[cfg(test)]
#[path = "projection_test.rs"]
mod projection_test;

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use futures::future::join_all;

use crate::net::api;
use crate::net::transport::{Transport, TransportError};
use crate::net::types::{Card, Player, Rank, Suit, SuitCount, SuitRankCount};

/// How keys of the `remaining-by-suit` view are matched to suits.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SuitKeyMatch {
    /// Exact glyph, e.g. `♥`.
    Glyph,
    /// Case-insensitive enum name, e.g. `hearts`.
    Name,
    /// Trimmed glyph, name (singular or plural), initial letter or ordinal.
    #[default]
    Normalized,
}

impl SuitKeyMatch {
    /// Resolve a server suit key, or `None` if it names no suit.
    #[must_use]
    pub fn resolve(self, key: &str) -> Option<Suit> {
        match self {
            Self::Glyph => Suit::ALL.into_iter().find(|s| s.glyph() == key),
            Self::Name => Suit::ALL.into_iter().find(|s| s.name().eq_ignore_ascii_case(key)),
            Self::Normalized => resolve_normalized(key.trim()),
        }
    }
}

fn resolve_normalized(key: &str) -> Option<Suit> {
    if let Some(suit) = Suit::ALL.into_iter().find(|s| s.glyph() == key) {
        return Some(suit);
    }
    if let Ok(ordinal) = key.parse::<u8>() {
        return Suit::try_from(ordinal).ok();
    }
    let upper = key.to_ascii_uppercase();
    Suit::ALL.into_iter().find(|s| {
        let name = s.name();
        upper == name || upper == name.trim_end_matches('S') || upper == name[..1]
    })
}

impl FromStr for SuitKeyMatch {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "glyph" => Ok(Self::Glyph),
            "name" => Ok(Self::Name),
            "normalized" => Ok(Self::Normalized),
            other => Err(format!("unknown suit match mode '{other}' (expected glyph, name or normalized)")),
        }
    }
}

impl fmt::Display for SuitKeyMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Glyph => "glyph",
            Self::Name => "name",
            Self::Normalized => "normalized",
        };
        f.write_str(s)
    }
}

// =============================================================================
// SNAPSHOT
// =============================================================================

/// Remaining-card counts per suit, indexed by [`Suit::index`].
pub type SuitTable = [u32; 4];

/// Remaining-card counts per suit and rank, indexed `[suit][rank]`.
pub type RankGrid = [[u32; 13]; 4];

/// Merged local projection of one game.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Snapshot {
    /// Roster in server order.
    pub players: Vec<Player>,
    /// Hands keyed by player id; replaced wholesale on every commit.
    pub hands: HashMap<String, Vec<Card>>,
    pub suit_counts: Vec<SuitCount>,
    pub suit_rank_counts: Vec<SuitRankCount>,
}

impl Snapshot {
    /// The player's hand, or an empty hand when none has been fetched.
    #[must_use]
    pub fn hand(&self, player_id: &str) -> &[Card] {
        self.hands.get(player_id).map(Vec::as_slice).unwrap_or_default()
    }

    /// Dense per-suit table; absent or unmatched suits stay at zero.
    #[must_use]
    pub fn suit_table(&self, matching: SuitKeyMatch) -> SuitTable {
        let mut table: SuitTable = [0; 4];
        for entry in &self.suit_counts {
            match matching.resolve(&entry.suit) {
                Some(suit) => {
                    let slot = &mut table[suit.index()];
                    *slot = slot.saturating_add(entry.remaining);
                }
                None => tracing::debug!(key = %entry.suit, %matching, "unmatched suit key ignored"),
            }
        }
        table
    }

    /// Dense 4x13 grid; every combination the server omitted is zero.
    #[must_use]
    pub fn rank_grid(&self) -> RankGrid {
        let mut grid: RankGrid = [[0; 13]; 4];
        for entry in &self.suit_rank_counts {
            let slot = &mut grid[entry.suit.index()][entry.rank.index()];
            *slot = slot.saturating_add(entry.count);
        }
        grid
    }

    /// Count for one cell of the grid.
    #[must_use]
    pub fn remaining(&self, suit: Suit, rank: Rank) -> u32 {
        self.suit_rank_counts
            .iter()
            .filter(|c| c.suit == suit && c.rank == rank)
            .fold(0, |acc, c| acc.saturating_add(c.count))
    }

    /// Sum of every reported `remaining` value, regardless of suit key.
    #[must_use]
    pub fn total_remaining(&self) -> u64 {
        self.suit_counts.iter().map(|c| u64::from(c.remaining)).sum()
    }

    /// Whether a deal could succeed; false once the shoe reports no cards.
    #[must_use]
    pub fn can_deal(&self) -> bool {
        self.total_remaining() > 0
    }
}

/// Fetch every view of `game_id` and merge them into one snapshot.
///
/// Every request runs to completion even when a sibling fails; the first
/// failure is then returned and no partial snapshot is produced.
///
/// # Errors
///
/// Returns the first [`TransportError`] among the constituent requests.
pub async fn fetch_snapshot(transport: &dyn Transport, game_id: &str) -> Result<Snapshot, TransportError> {
    let roster = async {
        let players = api::players(transport, game_id).await?;
        let fetched = join_all(players.iter().map(|player| async move {
            (player.player_id.clone(), api::hand(transport, &player.player_id).await)
        }))
        .await;

        let mut hands = HashMap::with_capacity(fetched.len());
        for (player_id, hand) in fetched {
            hands.insert(player_id, hand?);
        }
        Ok::<_, TransportError>((players, hands))
    };

    let (roster, by_suit, by_suit_rank) = futures::join!(
        roster,
        api::remaining_by_suit(transport, game_id),
        api::remaining_by_suit_rank(transport, game_id),
    );

    let (players, hands) = roster?;
    Ok(Snapshot { players, hands, suit_counts: by_suit?, suit_rank_counts: by_suit_rank? })
}

//! Plain-text rendering of a dashboard view.
//!
//! Pure functions over `DashboardView` and its parts; no I/O. The CLI prints
//! whatever these return.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use crate::dashboard::DashboardView;
use crate::net::types::{Card, Rank, Suit};
use crate::state::games::GamesState;
use crate::state::projection::{Snapshot, SuitKeyMatch};
use crate::state::session::SessionState;

const EMPTY_HAND: &str = "—";
const DISCONNECTED_BANNER: &str = "!! Connection lost; retrying";
const DEAL_DISABLED: &str = "Dealing disabled: shoe is empty";

/// Space-separated card glyphs in hand order, or a dash for an empty hand.
#[must_use]
pub fn hand(cards: &[Card]) -> String {
    if cards.is_empty() {
        return EMPTY_HAND.to_owned();
    }
    cards.iter().map(|c| c.glyph()).collect::<Vec<_>>().join(" ")
}

#[must_use]
pub fn games(state: &GamesState) -> String {
    if state.loading && !state.loaded {
        return "Loading games...\n".to_owned();
    }
    if state.items.is_empty() {
        return "No games.\n".to_owned();
    }
    let mut out = String::new();
    for game in &state.items {
        out.push_str(&format!("{}  {}\n", game.id, game.created_at));
    }
    out
}

/// Roster with totals and hands.
#[must_use]
pub fn players(snapshot: &Snapshot) -> String {
    if snapshot.players.is_empty() {
        return "No players.\n".to_owned();
    }
    let width = snapshot.players.iter().map(|p| p.player_name.chars().count()).max().unwrap_or(0);
    let mut out = String::new();
    for player in &snapshot.players {
        out.push_str(&format!(
            "{:<width$}  {:>3}  {}  [{}]\n",
            player.player_name,
            player.total_value,
            hand(snapshot.hand(&player.player_id)),
            player.player_id,
        ));
    }
    out
}

/// One line per suit with its remaining count.
#[must_use]
pub fn suit_table(snapshot: &Snapshot, matching: SuitKeyMatch) -> String {
    let table = snapshot.suit_table(matching);
    let mut out = String::new();
    for suit in Suit::ALL {
        out.push_str(&format!("{} {:<8} {:>4}\n", suit.glyph(), suit.name(), table[suit.index()]));
    }
    out
}

/// Full 4x13 remaining grid with a rank header row.
#[must_use]
pub fn rank_grid(snapshot: &Snapshot) -> String {
    let grid = snapshot.rank_grid();
    let mut out = String::from("  ");
    for rank in Rank::ALL {
        out.push_str(&format!(" {:>3}", rank.label()));
    }
    out.push('\n');
    for suit in Suit::ALL {
        out.push_str(suit.glyph());
        out.push(' ');
        for count in grid[suit.index()] {
            out.push_str(&format!(" {count:>3}"));
        }
        out.push('\n');
    }
    out
}

fn session(session: &SessionState, matching: SuitKeyMatch) -> String {
    let mut out = format!("Game {}\n", session.game.id);
    if !session.synced {
        out.push_str("Syncing...\n");
        return out;
    }
    let snapshot = &session.snapshot;
    out.push('\n');
    out.push_str(&players(snapshot));
    out.push('\n');
    out.push_str(&format!("Remaining: {}\n", snapshot.total_remaining()));
    if !snapshot.can_deal() {
        out.push_str(DEAL_DISABLED);
        out.push('\n');
    }
    out.push_str(&suit_table(snapshot, matching));
    out.push('\n');
    out.push_str(&rank_grid(snapshot));
    out
}

/// Whole screen: banner, notice, then either the game list or the selected game.
#[must_use]
pub fn view(view: &DashboardView) -> String {
    let mut out = String::new();
    if !view.connection_healthy() {
        out.push_str(DISCONNECTED_BANNER);
        out.push('\n');
    }
    if let Some(notice) = &view.notice {
        out.push_str(&format!("error: {}\n", notice.message));
    }
    match &view.session {
        Some(selected) => out.push_str(&session(selected, view.suit_match)),
        None => out.push_str(&games(&view.games)),
    }
    out
}

//! Session-scoped state for the selected game.
//!
//! SYSTEM CONTEXT
//! ==============
//! Everything that belongs to one selection lives in a single
//! `SessionState`. Selecting a game replaces the whole value, so nothing from
//! the previous game (roster, hands, counts, guards, inputs) survives a switch.
//! The `epoch` tags sync cycles; a cycle whose epoch no longer matches the
//! current session is discarded.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use super::projection::Snapshot;
use crate::net::types::Game;

#[derive(Clone, Debug, PartialEq)]
pub struct SessionState {
    pub game: Game,
    /// Identifies this selection; never reused.
    pub epoch: u64,
    /// Last committed projection; empty until the first successful cycle.
    pub snapshot: Snapshot,
    /// True once any cycle has committed.
    pub synced: bool,
    /// Outcome of the most recent completed cycle.
    pub connection_healthy: bool,
    /// Set while an add-deck action is in flight.
    pub adding_deck: bool,
    /// Transient "new player name" input.
    pub player_name_input: String,
}

impl SessionState {
    #[must_use]
    pub fn new(game: Game, epoch: u64) -> Self {
        Self {
            game,
            epoch,
            snapshot: Snapshot::default(),
            synced: false,
            connection_healthy: true,
            adding_deck: false,
            player_name_input: String::new(),
        }
    }

    #[must_use]
    pub fn game_id(&self) -> &str {
        &self.game.id
    }

    /// Replace the projection with a complete cycle result.
    pub fn commit(&mut self, snapshot: Snapshot) {
        self.snapshot = snapshot;
        self.synced = true;
        self.connection_healthy = true;
    }

    /// Record a failed cycle; the previous projection stays in place.
    pub fn mark_unhealthy(&mut self) {
        self.connection_healthy = false;
    }

    /// Trimmed player name, or `None` when blank.
    #[must_use]
    pub fn pending_player_name(&self) -> Option<String> {
        let trimmed = self.player_name_input.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_owned())
    }
}

//! Game-list state for the unselected view.
//!
//! DESIGN
//! ======
//! Separating list inventory from the selected game's projection keeps
//! list refreshes from touching sync state and vice versa.

#[cfg(test)]
#[path = "games_test.rs"]
mod games_test;

use crate::net::types::Game;

/// Last good game list plus its loading flag.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GamesState {
    /// Games in server order; kept across failed refreshes.
    pub items: Vec<Game>,
    pub loading: bool,
    /// True once any list request has succeeded.
    pub loaded: bool,
}

impl GamesState {
    /// Replace the list with a fresh server response.
    pub fn commit(&mut self, items: Vec<Game>) {
        self.items = items;
        self.loaded = true;
        self.loading = false;
    }

    /// Record a failed refresh; the last good list stays visible.
    pub fn fail(&mut self) {
        self.loading = false;
    }

    #[must_use]
    pub fn find(&self, game_id: &str) -> Option<&Game> {
        self.items.iter().find(|g| g.id == game_id)
    }
}

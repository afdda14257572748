//! Action gateway for operator-initiated mutations.
//!
//! Every action follows the same template:
//! 1. precondition check; failing it is a silent no-op (`Skipped`)
//! 2. the mutating request(s)
//! 3. on success, an immediate sync cycle plus transient-input reset
//! 4. on failure, an action-scoped notice that expires after `notice_ttl`
//!
//! ERROR HANDLING
//! ==============
//! Action failures are logged and turned into notices here. They never reach
//! the connection-health flag, which only background cycles write. The
//! post-action cycle is an ordinary cycle, so its own failure only marks the
//! connection unhealthy.

#[cfg(test)]
#[path = "actions_test.rs"]
mod actions_test;

use std::sync::Arc;

use tracing::{debug, error};

use super::Dashboard;
use crate::net::api;
use crate::net::transport::TransportError;
use crate::state::notice::Action;

/// What happened to one action invocation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActionOutcome {
    /// A precondition failed; nothing was sent.
    Skipped,
    /// The mutation succeeded.
    Done,
    /// The mutation failed and a notice was raised.
    Failed,
}

/// Clears the add-deck flag of its selection when the action ends, even if
/// the action future is dropped mid-flight.
struct AddDeckGuard<'a> {
    dashboard: &'a Dashboard,
    epoch: u64,
}

impl Drop for AddDeckGuard<'_> {
    fn drop(&mut self) {
        self.dashboard.with_state(|s| {
            if let Some(session) = s.session_at(self.epoch) {
                session.adding_deck = false;
            }
        });
    }
}

impl Dashboard {
    fn selected(&self) -> Option<(String, u64)> {
        self.with_state(|s| s.session.as_ref().map(|x| (x.game.id.clone(), x.epoch)))
    }

    fn skip(action: Action, reason: &str) -> ActionOutcome {
        debug!(%action, reason, "action skipped");
        ActionOutcome::Skipped
    }

    fn fail(&self, action: Action, e: &TransportError) -> ActionOutcome {
        error!(%action, error = %e, "action failed");
        let seq = self.with_state(|s| s.notices.raise(action));

        let weak = Arc::downgrade(&self.inner);
        let ttl = self.inner.config.notice_ttl;
        tokio::spawn(async move {
            tokio::time::sleep(ttl).await;
            if let Some(inner) = weak.upgrade() {
                Dashboard { inner }.with_state(|s| s.notices.dismiss(seq));
            }
        });
        ActionOutcome::Failed
    }

    /// Reload the game list. The last good list survives a failure.
    pub async fn refresh_games(&self) -> ActionOutcome {
        self.with_state(|s| s.games.loading = true);
        match api::list_games(self.transport()).await {
            Ok(items) => {
                self.with_state(|s| s.games.commit(items));
                ActionOutcome::Done
            }
            Err(e) => {
                self.with_state(|s| s.games.fail());
                self.fail(Action::ListGames, &e)
            }
        }
    }

    /// Create a game, then re-list. Nothing is inserted optimistically.
    pub async fn create_game(&self) -> ActionOutcome {
        if let Err(e) = api::create_game(self.transport()).await {
            return self.fail(Action::CreateGame, &e);
        }
        self.refresh_games().await;
        ActionOutcome::Done
    }

    /// Delete a game, deselecting it if it was selected, then re-list.
    pub async fn delete_game(&self, game_id: &str) -> ActionOutcome {
        if let Err(e) = api::delete_game(self.transport(), game_id).await {
            return self.fail(Action::DeleteGame, &e);
        }
        self.with_state(|s| {
            if s.session.as_ref().is_some_and(|x| x.game.id == game_id) {
                s.clear_selection();
            }
        });
        self.refresh_games().await;
        ActionOutcome::Done
    }

    pub async fn shuffle(&self) -> ActionOutcome {
        let Some((game_id, epoch)) = self.selected() else {
            return Self::skip(Action::Shuffle, "no game selected");
        };
        match api::shuffle(self.transport(), &game_id).await {
            Ok(()) => {
                self.run_cycle(epoch).await;
                ActionOutcome::Done
            }
            Err(e) => self.fail(Action::Shuffle, &e),
        }
    }

    /// Allocate a deck and attach it to the shoe. At most one in flight per
    /// selection; a repeat call while one is pending is skipped.
    pub async fn add_deck(&self) -> ActionOutcome {
        let claimed = self.with_state(|s| {
            let session = s.session.as_mut()?;
            if session.adding_deck {
                return Some(None);
            }
            session.adding_deck = true;
            Some(Some((session.game.id.clone(), session.epoch)))
        });
        let (game_id, epoch) = match claimed {
            None => return Self::skip(Action::AddDeck, "no game selected"),
            Some(None) => return Self::skip(Action::AddDeck, "already in flight"),
            Some(Some(claim)) => claim,
        };

        let guard = AddDeckGuard { dashboard: self, epoch };
        let result = async {
            let deck_id = api::new_deck(self.transport()).await?;
            api::attach_deck(self.transport(), &game_id, &deck_id).await
        }
        .await;
        drop(guard);

        match result {
            Ok(()) => {
                self.run_cycle(epoch).await;
                ActionOutcome::Done
            }
            Err(e) => self.fail(Action::AddDeck, &e),
        }
    }

    /// Join the trimmed name from the player-name input, clearing it on success.
    pub async fn add_player(&self) -> ActionOutcome {
        let pending = self.with_state(|s| {
            let session = s.session.as_ref()?;
            Some((session.game.id.clone(), session.epoch, session.pending_player_name()))
        });
        let Some((game_id, epoch, name)) = pending else {
            return Self::skip(Action::AddPlayer, "no game selected");
        };
        let Some(name) = name else {
            return Self::skip(Action::AddPlayer, "blank player name");
        };

        match api::join(self.transport(), &game_id, &name).await {
            Ok(()) => {
                self.with_state(|s| {
                    if let Some(session) = s.session_at(epoch) {
                        session.player_name_input.clear();
                    }
                });
                self.run_cycle(epoch).await;
                ActionOutcome::Done
            }
            Err(e) => self.fail(Action::AddPlayer, &e),
        }
    }

    pub async fn remove_player(&self, player_id: &str) -> ActionOutcome {
        let Some((_, epoch)) = self.selected() else {
            return Self::skip(Action::RemovePlayer, "no game selected");
        };
        match api::leave(self.transport(), player_id).await {
            Ok(()) => {
                self.run_cycle(epoch).await;
                ActionOutcome::Done
            }
            Err(e) => self.fail(Action::RemovePlayer, &e),
        }
    }

    /// Deal one card to `player_id`. Disabled once the shoe reports no cards.
    pub async fn deal_one_card(&self, player_id: &str) -> ActionOutcome {
        let selected =
            self.with_state(|s| s.session.as_ref().map(|x| (x.game.id.clone(), x.epoch, x.snapshot.can_deal())));
        let Some((game_id, epoch, can_deal)) = selected else {
            return Self::skip(Action::DealCard, "no game selected");
        };
        if !can_deal {
            return Self::skip(Action::DealCard, "shoe is empty");
        }

        match api::deal_one(self.transport(), &game_id, player_id).await {
            Ok(()) => {
                self.run_cycle(epoch).await;
                ActionOutcome::Done
            }
            Err(e) => self.fail(Action::DealCard, &e),
        }
    }
}

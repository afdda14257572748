//! Dashboard controller: selection, sync loop and action gateway.
//!
//! ARCHITECTURE
//! ============
//! `Dashboard` is a cheap clonable handle over one shared `DashboardState`.
//! Every write (selection swap, cycle commit, transient-field reset, notice)
//! happens inside a short `Mutex` section that never spans an `.await`, so
//! two mutations can never interleave mid-update even though requests
//! overlap freely on the runtime.
//!
//! - `sync_loop` drives the periodic refresh of the selected game.
//! - `actions` wraps every mutating operator action.
//!
//! Selection follows an arena-reset pattern: selecting a game replaces the
//! whole `SessionState` and the poller task with fresh ones.

pub mod actions;
pub mod sync_loop;


use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::task::JoinHandle;
use tracing::info;

use crate::config::DashboardConfig;
use crate::net::api;
use crate::net::transport::{HttpTransport, Transport, TransportError};
use crate::net::types::Game;
use crate::state::games::GamesState;
use crate::state::notice::{ActionNotice, Notices};
use crate::state::projection::SuitKeyMatch;
use crate::state::session::SessionState;

pub use actions::ActionOutcome;
pub use sync_loop::CycleOutcome;

/// Clonable handle to one dashboard instance.
#[derive(Clone)]
pub struct Dashboard {
    inner: Arc<Inner>,
}

struct Inner {
    transport: Arc<dyn Transport>,
    config: DashboardConfig,
    state: Mutex<DashboardState>,
}

impl Drop for Inner {
    fn drop(&mut self) {
        let state = self.state.get_mut().unwrap_or_else(PoisonError::into_inner);
        if let Some(poller) = state.poller.take() {
            poller.abort();
        }
    }
}

#[derive(Default)]
struct DashboardState {
    games: GamesState,
    session: Option<SessionState>,
    notices: Notices,
    next_epoch: u64,
    /// The one timer task of the current selection.
    poller: Option<JoinHandle<()>>,
}

impl DashboardState {
    fn clear_selection(&mut self) {
        if let Some(poller) = self.poller.take() {
            poller.abort();
        }
        if let Some(session) = self.session.take() {
            info!(game_id = %session.game.id, epoch = session.epoch, "game deselected");
        }
    }

    fn session_at(&mut self, epoch: u64) -> Option<&mut SessionState> {
        self.session.as_mut().filter(|s| s.epoch == epoch)
    }
}

/// Read-only copy of everything a renderer needs.
#[derive(Clone, Debug, PartialEq)]
pub struct DashboardView {
    pub games: GamesState,
    pub session: Option<SessionState>,
    pub notice: Option<ActionNotice>,
    pub suit_match: SuitKeyMatch,
}

impl DashboardView {
    /// Connection banner state; only background cycles affect it.
    #[must_use]
    pub fn connection_healthy(&self) -> bool {
        self.session.as_ref().is_none_or(|s| s.connection_healthy)
    }

    /// Whether a deal request could be issued right now.
    #[must_use]
    pub fn deal_enabled(&self) -> bool {
        self.session.as_ref().is_some_and(|s| s.snapshot.can_deal())
    }
}

impl Dashboard {
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>, config: DashboardConfig) -> Self {
        Self {
            inner: Arc::new(Inner { transport, config, state: Mutex::new(DashboardState::default()) }),
        }
    }

    /// Build a dashboard talking HTTP to the configured backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn from_config(config: DashboardConfig) -> Result<Self, TransportError> {
        let transport = HttpTransport::from_config(&config)?;
        Ok(Self::new(Arc::new(transport), config))
    }

    #[must_use]
    pub fn config(&self) -> &DashboardConfig {
        &self.inner.config
    }

    fn transport(&self) -> &dyn Transport {
        self.inner.transport.as_ref()
    }

    fn lock(&self) -> MutexGuard<'_, DashboardState> {
        self.inner.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn with_state<R>(&self, f: impl FnOnce(&mut DashboardState) -> R) -> R {
        f(&mut self.lock())
    }

    #[must_use]
    pub fn view(&self) -> DashboardView {
        let state = self.lock();
        DashboardView {
            games: state.games.clone(),
            session: state.session.clone(),
            notice: state.notices.current.clone(),
            suit_match: self.inner.config.suit_match,
        }
    }

    /// Select `game`: discard the previous session and start its sync loop.
    ///
    /// Must be called from within a tokio runtime.
    pub fn select(&self, game: Game) {
        let mut state = self.lock();
        state.clear_selection();
        state.next_epoch += 1;
        let epoch = state.next_epoch;
        info!(game_id = %game.id, epoch, "game selected");
        state.session = Some(SessionState::new(game, epoch));
        state.poller = Some(self.spawn_poller(epoch));
    }

    /// Return to the unselected view and stop syncing.
    pub fn deselect(&self) {
        self.with_state(DashboardState::clear_selection);
    }

    #[must_use]
    pub fn selected_game_id(&self) -> Option<String> {
        self.with_state(|s| s.session.as_ref().map(|x| x.game.id.clone()))
    }

    /// Edit the transient player-name input of the selected game.
    pub fn set_player_name_input(&self, text: impl Into<String>) {
        let text = text.into();
        self.with_state(|s| {
            if let Some(session) = s.session.as_mut() {
                session.player_name_input = text;
            }
        });
    }

    /// Liveness probe.
    ///
    /// # Errors
    ///
    /// Returns a [`TransportError`] if the backend is unreachable.
    pub async fn health(&self) -> Result<String, TransportError> {
        api::health(self.transport()).await
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================

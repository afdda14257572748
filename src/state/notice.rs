//! Action-scoped error notices.
//!
//! A notice belongs to the user action that raised it and is never used for
//! background sync failures. Each notice carries a sequence number so a
//! delayed dismissal only clears the notice it was scheduled for.

#[cfg(test)]
#[path = "notice_test.rs"]
mod notice_test;

use std::fmt;

/// User-initiated actions that can surface a notice.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    ListGames,
    CreateGame,
    DeleteGame,
    Shuffle,
    AddDeck,
    AddPlayer,
    RemovePlayer,
    DealCard,
}

impl Action {
    /// Operator-facing failure message.
    #[must_use]
    pub fn failure_message(self) -> &'static str {
        match self {
            Self::ListGames => "Failed to load games.",
            Self::CreateGame => "Failed to create game.",
            Self::DeleteGame => "Failed to delete game.",
            Self::Shuffle => "Shuffle failed.",
            Self::AddDeck => "Failed to create or add deck.",
            Self::AddPlayer => "Failed to add player.",
            Self::RemovePlayer => "Failed to remove player.",
            Self::DealCard => "Failed to deal card.",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::ListGames => "list_games",
            Self::CreateGame => "create_game",
            Self::DeleteGame => "delete_game",
            Self::Shuffle => "shuffle",
            Self::AddDeck => "add_deck",
            Self::AddPlayer => "add_player",
            Self::RemovePlayer => "remove_player",
            Self::DealCard => "deal_card",
        };
        f.write_str(s)
    }
}

/// A visible action error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActionNotice {
    pub seq: u64,
    pub action: Action,
    pub message: String,
}

/// The single notice slot shown near the controls.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Notices {
    pub current: Option<ActionNotice>,
    next_seq: u64,
}

impl Notices {
    /// Show the failure message for `action`, replacing any older notice.
    /// Returns the sequence number to dismiss it with.
    pub fn raise(&mut self, action: Action) -> u64 {
        self.next_seq += 1;
        let seq = self.next_seq;
        self.current = Some(ActionNotice { seq, action, message: action.failure_message().to_owned() });
        seq
    }

    /// Clear the notice if it is still the one identified by `seq`.
    pub fn dismiss(&mut self, seq: u64) -> bool {
        if self.current.as_ref().is_some_and(|n| n.seq == seq) {
            self.current = None;
            return true;
        }
        false
    }
}

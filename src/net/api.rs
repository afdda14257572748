//! REST endpoint helpers for the card-game backend.
//!
//! Each helper issues exactly one call through a [`Transport`]. Paths are
//! relative to the API root; the transport prepends it. Ids are opaque
//! server strings and are percent-escaped into their path segment.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

use super::transport::{ApiRequest, Transport, TransportError, call_json, call_unit};
use super::types::{Card, Game, Player, SuitCount, SuitRankCount};

/// Everything except RFC 3986 unreserved characters is escaped, so an id
/// always stays one path segment.
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'.').remove(b'_').remove(b'~');

/// Escape an opaque server id for use as a single path segment.
pub(crate) fn segment(id: &str) -> String {
    utf8_percent_encode(id, SEGMENT).to_string()
}

pub(crate) fn game_path(game_id: &str) -> String {
    format!("/games/{}", segment(game_id))
}

pub(crate) fn players_path(game_id: &str) -> String {
    format!("{}/players", game_path(game_id))
}

pub(crate) fn hand_path(player_id: &str) -> String {
    format!("/players/{}/hand", segment(player_id))
}

pub(crate) fn leave_path(player_id: &str) -> String {
    format!("/players/{}/leave", segment(player_id))
}

pub(crate) fn remaining_by_suit_path(game_id: &str) -> String {
    format!("{}/remaining-by-suit", game_path(game_id))
}

pub(crate) fn remaining_by_suit_rank_path(game_id: &str) -> String {
    format!("{}/remaining-by-suit-rank", game_path(game_id))
}

pub(crate) fn attach_deck_path(game_id: &str, deck_id: &str) -> String {
    format!("{}/decks/{}", game_path(game_id), segment(deck_id))
}

pub(crate) fn deal_path(game_id: &str, player_id: &str) -> String {
    format!("{}/players/{}/deal", game_path(game_id), segment(player_id))
}

/// `GET /games`: sessions in server order.
///
/// # Errors
///
/// Returns a [`TransportError`] if the call or decode fails.
pub async fn list_games(transport: &dyn Transport) -> Result<Vec<Game>, TransportError> {
    call_json(transport, ApiRequest::get("/games")).await
}

/// `POST /games`. The returned id is ignored; callers re-list instead.
///
/// # Errors
///
/// Returns a [`TransportError`] if the call fails.
pub async fn create_game(transport: &dyn Transport) -> Result<(), TransportError> {
    call_unit(transport, ApiRequest::post("/games")).await
}

/// `DELETE /games/{id}`.
///
/// # Errors
///
/// Returns a [`TransportError`] if the call fails.
pub async fn delete_game(transport: &dyn Transport, game_id: &str) -> Result<(), TransportError> {
    call_unit(transport, ApiRequest::delete(game_path(game_id))).await
}

/// `POST /games/{id}/shuffle`.
///
/// # Errors
///
/// Returns a [`TransportError`] if the call fails.
pub async fn shuffle(transport: &dyn Transport, game_id: &str) -> Result<(), TransportError> {
    call_unit(transport, ApiRequest::post(format!("{}/shuffle", game_path(game_id)))).await
}

/// `POST /games/new-deck`: allocate a deck and return its id.
///
/// # Errors
///
/// Returns a [`TransportError`] if the call fails or the body is not a string.
pub async fn new_deck(transport: &dyn Transport) -> Result<String, TransportError> {
    call_json(transport, ApiRequest::post("/games/new-deck")).await
}

/// `POST /games/{id}/decks/{deckId}`: attach a deck to the shoe.
///
/// # Errors
///
/// Returns a [`TransportError`] if the call fails.
pub async fn attach_deck(transport: &dyn Transport, game_id: &str, deck_id: &str) -> Result<(), TransportError> {
    call_unit(transport, ApiRequest::post(attach_deck_path(game_id, deck_id))).await
}

/// `POST /games/{id}/join?playerName=`.
///
/// # Errors
///
/// Returns a [`TransportError`] if the call fails.
pub async fn join(transport: &dyn Transport, game_id: &str, player_name: &str) -> Result<(), TransportError> {
    let request = ApiRequest::post(format!("{}/join", game_path(game_id))).query("playerName", player_name);
    call_unit(transport, request).await
}

/// `DELETE /players/{id}/leave`.
///
/// # Errors
///
/// Returns a [`TransportError`] if the call fails.
pub async fn leave(transport: &dyn Transport, player_id: &str) -> Result<(), TransportError> {
    call_unit(transport, ApiRequest::delete(leave_path(player_id))).await
}

/// `POST /games/{id}/players/{id}/deal?count=1`.
///
/// # Errors
///
/// Returns a [`TransportError`] if the call fails.
pub async fn deal_one(transport: &dyn Transport, game_id: &str, player_id: &str) -> Result<(), TransportError> {
    let request = ApiRequest::post(deal_path(game_id, player_id)).query("count", "1");
    call_unit(transport, request).await
}

/// `GET /games/{id}/players`: roster in server order.
///
/// # Errors
///
/// Returns a [`TransportError`] if the call or decode fails.
pub async fn players(transport: &dyn Transport, game_id: &str) -> Result<Vec<Player>, TransportError> {
    call_json(transport, ApiRequest::get(players_path(game_id))).await
}

/// `GET /players/{id}/hand`.
///
/// # Errors
///
/// Returns a [`TransportError`] if the call or decode fails.
pub async fn hand(transport: &dyn Transport, player_id: &str) -> Result<Vec<Card>, TransportError> {
    call_json(transport, ApiRequest::get(hand_path(player_id))).await
}

/// `GET /games/{id}/remaining-by-suit`.
///
/// # Errors
///
/// Returns a [`TransportError`] if the call or decode fails.
pub async fn remaining_by_suit(transport: &dyn Transport, game_id: &str) -> Result<Vec<SuitCount>, TransportError> {
    call_json(transport, ApiRequest::get(remaining_by_suit_path(game_id))).await
}

/// `GET /games/{id}/remaining-by-suit-rank`.
///
/// # Errors
///
/// Returns a [`TransportError`] if the call or decode fails.
pub async fn remaining_by_suit_rank(
    transport: &dyn Transport,
    game_id: &str,
) -> Result<Vec<SuitRankCount>, TransportError> {
    call_json(transport, ApiRequest::get(remaining_by_suit_rank_path(game_id))).await
}

/// `GET /health`: liveness probe; the body is opaque text.
///
/// # Errors
///
/// Returns a [`TransportError`] if the call fails.
pub async fn health(transport: &dyn Transport) -> Result<String, TransportError> {
    let body = transport.call(ApiRequest::get("/health")).await?;
    Ok(match body {
        Some(serde_json::Value::String(text)) => text,
        Some(other) => other.to_string(),
        None => String::new(),
    })
}

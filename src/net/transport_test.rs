use std::collections::HashMap;

use axum::Json;
use axum::Router;
use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::routing::{delete, get, post};
use serde_json::json;

use super::*;

// =============================================================
// parse_body
// =============================================================

#[test]
fn parse_body_empty_is_none() {
    assert_eq!(parse_body(""), None);
    assert_eq!(parse_body("  \n"), None);
}

#[test]
fn parse_body_parses_json() {
    assert_eq!(parse_body(r#"[{"a":1}]"#), Some(json!([{ "a": 1 }])));
    assert_eq!(parse_body(r#""deck-1""#), Some(json!("deck-1")));
}

#[test]
fn parse_body_keeps_plain_text_as_string() {
    assert_eq!(parse_body("UP"), Some(json!("UP")));
}

// =============================================================
// ApiRequest / TransportError
// =============================================================

#[test]
fn api_request_builder_collects_query() {
    let req = ApiRequest::post("/games/g1/join").query("playerName", "Alice");
    assert_eq!(req.method, Method::Post);
    assert_eq!(req.path, "/games/g1/join");
    assert_eq!(req.query, vec![("playerName".to_owned(), "Alice".to_owned())]);
}

#[test]
fn status_error_display_carries_path_and_code() {
    let err = TransportError::Status { method: Method::Get, path: "/games".into(), status: 503 };
    assert_eq!(err.to_string(), "GET /games: HTTP 503");
    assert_eq!(err.status(), Some(503));
}

#[test]
fn network_error_has_no_status() {
    let err = TransportError::Network { method: Method::Post, path: "/x".into(), message: "refused".into() };
    assert_eq!(err.status(), None);
}

// =============================================================
// call_json with the mock
// =============================================================

#[tokio::test]
async fn call_json_empty_body_is_decode_error() {
    let mock = test_helpers::MockTransport::new();
    mock.on(Method::Get, "/games", test_helpers::Reply::Empty);
    let err = call_json::<Vec<crate::net::types::Game>>(&mock, ApiRequest::get("/games"))
        .await
        .unwrap_err();
    assert!(matches!(err, TransportError::Decode { .. }));
}

#[tokio::test]
async fn call_json_shape_mismatch_is_decode_error() {
    let mock = test_helpers::MockTransport::new();
    mock.on_json(Method::Get, "/games", json!({ "not": "a list" }));
    let err = call_json::<Vec<crate::net::types::Game>>(&mock, ApiRequest::get("/games"))
        .await
        .unwrap_err();
    assert!(matches!(err, TransportError::Decode { path, .. } if path == "/games"));
}

// =============================================================
// HttpTransport against an in-process stub backend
// =============================================================

async fn spawn_stub() -> String {
    let app = Router::new()
        .route("/api/games", get(|| async { Json(json!([{ "id": "g1", "createdAt": "t0" }])) }))
        .route("/api/games/{id}", delete(|| async { StatusCode::NO_CONTENT }))
        .route(
            "/api/games/{id}/join",
            post(|Query(q): Query<HashMap<String, String>>| async move {
                Json(json!(q.get("playerName").cloned().unwrap_or_default()))
            }),
        )
        .route("/api/games/{id}/shuffle", post(|| async { "" }))
        .route("/api/players/{id}/hand", get(|Path(id): Path<String>| async move { Json(json!(id)) }))
        .route("/api/health", get(|| async { "UP" }))
        .route("/api/boom", get(|| async { StatusCode::INTERNAL_SERVER_ERROR }));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn transport_for(base_url: String) -> HttpTransport {
    let config = DashboardConfig { base_url, ..DashboardConfig::default() };
    HttpTransport::from_config(&config).unwrap()
}

#[tokio::test]
async fn http_get_parses_json_list() {
    let transport = transport_for(spawn_stub().await);
    let body = transport.call(ApiRequest::get("/games")).await.unwrap();
    assert_eq!(body, Some(json!([{ "id": "g1", "createdAt": "t0" }])));
}

#[tokio::test]
async fn http_no_content_yields_none() {
    let transport = transport_for(spawn_stub().await);
    let body = transport.call(ApiRequest::delete("/games/g1")).await.unwrap();
    assert_eq!(body, None);
}

#[tokio::test]
async fn http_empty_ok_body_yields_none() {
    let transport = transport_for(spawn_stub().await);
    let body = transport.call(ApiRequest::post("/games/g1/shuffle")).await.unwrap();
    assert_eq!(body, None);
}

#[tokio::test]
async fn http_query_is_url_encoded() {
    let transport = transport_for(spawn_stub().await);
    let req = ApiRequest::post("/games/g1/join").query("playerName", "Ann & Bob");
    let body = transport.call(req).await.unwrap();
    assert_eq!(body, Some(json!("Ann & Bob")));
}

#[tokio::test]
async fn http_escaped_id_reaches_server_as_one_segment() {
    let transport = transport_for(spawn_stub().await);
    let path = crate::net::api::hand_path("a/b?c#d");
    let body = transport.call(ApiRequest::get(path)).await.unwrap();
    assert_eq!(body, Some(json!("a/b?c#d")));
}

#[tokio::test]
async fn http_plain_text_body_becomes_string() {
    let transport = transport_for(spawn_stub().await);
    let body = transport.call(ApiRequest::get("/health")).await.unwrap();
    assert_eq!(body, Some(json!("UP")));
}

#[tokio::test]
async fn http_non_success_maps_to_status_error() {
    let transport = transport_for(spawn_stub().await);
    let err = transport.call(ApiRequest::get("/boom")).await.unwrap_err();
    assert_eq!(err, TransportError::Status { method: Method::Get, path: "/boom".into(), status: 500 });
}

#[tokio::test]
async fn http_unknown_route_maps_to_404() {
    let transport = transport_for(spawn_stub().await);
    let err = transport.call(ApiRequest::get("/nope")).await.unwrap_err();
    assert_eq!(err.status(), Some(404));
}

#[tokio::test]
async fn http_connection_refused_is_network_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let transport = transport_for(format!("http://{addr}"));
    let err = transport.call(ApiRequest::get("/games")).await.unwrap_err();
    assert!(matches!(err, TransportError::Network { .. }));
}

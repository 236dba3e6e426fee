//! Integration tests for the Spotify login and passthrough endpoints

mod common;

use axum::http::{header, StatusCode};
use axum::response::Response;
use serde_json::{json, Value};

use common::{body_text, parse_body_value, TestApp};
use spindj_test_utils::TrackFixture;

fn fixtures() -> Vec<TrackFixture> {
    vec![
        TrackFixture::new("Get Lucky", "Daft Punk"),
        TrackFixture::new("Lose Yourself to Dance", "Daft Punk"),
    ]
}

/// The `state` parameter of a `/login` redirect
fn login_state(response: &Response) -> String {
    let location = response.headers()[header::LOCATION].to_str().unwrap();
    location
        .split('&')
        .find_map(|pair| pair.split_once("state="))
        .map(|(_, v)| v.to_string())
        .unwrap()
}

// ========== Login Tests ==========

#[tokio::test]
async fn test_login_redirects_to_spotify() {
    let app = TestApp::start_unauthorized().await;

    let response = app.get("/login").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let location = response.headers()[header::LOCATION].to_str().unwrap();
    assert!(location.starts_with(&format!("{}/authorize?", app.spotify.url())));
    assert!(location.contains("response_type=code"));
    assert!(location.contains("client_id=test-client-id"));
    assert!(location.contains("state="));
}

#[tokio::test]
async fn test_callback_completes_login() {
    let app = TestApp::start_unauthorized().await;
    app.spotify.mock_code_exchange("auth-code").await;

    let response = app.get("/login").await;
    let state = login_state(&response);

    let response = app
        .get(&format!("/callback?code=auth-code&state={}", state))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains(&format!(
        "SPOTIFY_REFRESH_TOKEN={}",
        app.spotify.refresh_token()
    )));

    // Tokens from the exchange are cached; no refresh grant needed
    tokio_test::assert_ok!(app.state.spotify_auth.ensure_access_token().await);
}

#[tokio::test]
async fn test_callback_state_mismatch() {
    let app = TestApp::start_unauthorized().await;

    let _ = app.get("/login").await;
    let response = app.get("/callback?code=auth-code&state=forged").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = parse_body_value(response).await;
    assert_eq!(json["code"], "INVALID_STATE");
    assert!(app.spotify.requests_to("/api/token").await.is_empty());
}

#[tokio::test]
async fn test_forged_callback_keeps_login_pending() {
    let app = TestApp::start_unauthorized().await;
    app.spotify.mock_code_exchange("auth-code").await;

    let response = app.get("/login").await;
    let state = login_state(&response);

    let response = app.get("/callback?code=auth-code&state=forged").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .get(&format!("/callback?code=auth-code&state={}", state))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    // The state is single-use
    let response = app
        .get(&format!("/callback?code=auth-code&state={}", state))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_callback_without_login() {
    let app = TestApp::start_unauthorized().await;

    let response = app.get("/callback?code=auth-code&state=anything").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ========== Passthrough Tests ==========

#[tokio::test]
async fn test_search_tracks() {
    let app = TestApp::start().await;
    app.spotify.mock_search_query("daft punk", &fixtures()).await;

    let response = app
        .post_json("/searchTracks", &json!({"query": "daft punk"}))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = parse_body_value(response).await;
    let tracks = json["tracks"].as_array().unwrap();
    assert_eq!(tracks.len(), 2);
    assert_eq!(tracks[0]["id"], "daft_punk_get_lucky");
    assert_eq!(tracks[0]["artists"], json!(["Daft Punk"]));
    assert_eq!(tracks[0]["album"], "Get Lucky (Album)");
    assert_eq!(tracks[0]["display"], "Get Lucky - Daft Punk");

    let searches = app.spotify.requests_to("/v1/search").await;
    assert!(searches[0].url.query().unwrap().contains("limit=10"));
}

#[tokio::test]
async fn test_get_recommendations_numbers_tracks() {
    let app = TestApp::start().await;
    app.spotify.mock_recommendations(&fixtures()).await;

    let response = app
        .post_json(
            "/getRecommendations",
            &json!({"seed_genres": ["french-house"], "limit": 2}),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = parse_body_value(response).await;
    assert_eq!(json["tracks"][0]["display"], "1. Get Lucky - Daft Punk");
    assert_eq!(
        json["tracks"][1]["display"],
        "2. Lose Yourself to Dance - Daft Punk"
    );
}

#[tokio::test]
async fn test_get_recommendations_requires_seed() {
    let app = TestApp::start().await;

    let response = app.post_json("/getRecommendations", &json!({})).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(parse_body_value(response).await["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_create_playlist_with_tracks() {
    let app = TestApp::start().await;
    app.spotify.mock_create_playlist("pl123").await;
    app.spotify.mock_add_tracks("pl123").await;

    let response = app
        .post_json(
            "/createPlaylist",
            &json!({"name": "Road Trip", "tracks": ["id1", "id2"]}),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = parse_body_value(response).await;
    assert_eq!(json["playlistId"], "pl123");
    assert_eq!(json["url"], "https://open.spotify.com/playlist/pl123");
    assert_eq!(
        json["display"],
        "Created playlist \"Road Trip\" -> https://open.spotify.com/playlist/pl123"
    );

    let created = app.spotify.requests_to("/v1/me/playlists").await;
    let body: Value = serde_json::from_slice(&created[0].body).unwrap();
    assert_eq!(body["public"], false);
    assert_eq!(body["description"], "");

    let added = app.spotify.requests_to("/v1/playlists/pl123/tracks").await;
    let body: Value = serde_json::from_slice(&added[0].body).unwrap();
    assert_eq!(body["uris"], json!(["spotify:track:id1", "spotify:track:id2"]));
}

#[tokio::test]
async fn test_create_empty_playlist_skips_add() {
    let app = TestApp::start().await;
    app.spotify.mock_create_playlist("pl_empty").await;

    let response = app
        .post_json("/createPlaylist", &json!({"name": "Empty"}))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(app
        .spotify
        .requests_to("/v1/playlists/pl_empty/tracks")
        .await
        .is_empty());
}

#[tokio::test]
async fn test_play_track() {
    let app = TestApp::start().await;
    app.spotify.mock_play().await;

    let response = app
        .post_json("/playTrack", &json!({"trackId": "abc123"}))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(parse_body_value(response).await, json!({"status": "playing"}));

    let plays = app.spotify.requests_to("/v1/me/player/play").await;
    let body: Value = serde_json::from_slice(&plays[0].body).unwrap();
    assert_eq!(body["uris"], json!(["spotify:track:abc123"]));
}

// ========== Error Tests ==========

#[tokio::test]
async fn test_passthrough_before_login() {
    let app = TestApp::start_unauthorized().await;

    let response = app
        .post_json("/searchTracks", &json!({"query": "daft punk"}))
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(parse_body_value(response).await["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_rejected_token_is_refreshed_on_next_request() {
    let app = TestApp::start().await;
    app.spotify.mock_search_query("daft punk", &fixtures()).await;
    app.spotify.mock_search_rejected_once().await;

    let response = app
        .post_json("/searchTracks", &json!({"query": "daft punk"}))
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .post_json("/searchTracks", &json!({"query": "daft punk"}))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(app.spotify.requests_to("/api/token").await.len(), 2);
}

#[tokio::test]
async fn test_malformed_body() {
    let app = TestApp::start().await;

    let response = app.post_json("/playTrack", &json!({"track": 1})).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(parse_body_value(response).await["code"], "INVALID_BODY");
}

#[tokio::test]
async fn test_spotify_failure_is_bad_gateway() {
    let app = TestApp::start().await;
    app.spotify.mock_search_error(503).await;

    let response = app
        .post_json("/searchTracks", &json!({"query": "anything"}))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(parse_body_value(response).await["code"], "SPOTIFY_ERROR");
}

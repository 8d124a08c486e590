//! Client contract tests against a mock backend.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use ose_api::{ApiConfig, ApiError, CreateCharacterRequest, OseClient};
use ose_core::{testing::ScriptedRoller, CharacterClass};
use serde_json::json;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn token_for(user_id: i64) -> String {
    let payload = URL_SAFE_NO_PAD.encode(format!(r#"{{"sub":"gm","user_id":{user_id},"exp":4102444800}}"#));
    format!("eyJhbGciOiJIUzI1NiJ9.{payload}.c2lnbmF0dXJl")
}

fn client_for(server: &MockServer) -> OseClient {
    let config = ApiConfig::new(format!("{}/", server.uri())).with_credentials("gm", "secret");
    OseClient::new(config).unwrap()
}

async fn logged_in(server: &MockServer) -> OseClient {
    Mock::given(method("POST"))
        .and(path("/api/auth/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": token_for(7),
            "token_type": "bearer"
        })))
        .mount(server)
        .await;

    let mut client = client_for(server);
    client.authenticate().await.unwrap();
    client
}

#[tokio::test]
async fn test_login_posts_form_and_stores_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/token"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string_contains("username=gm"))
        .and(body_string_contains("grant_type=password"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": token_for(7),
            "ttl": 1800
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut client = client_for(&server);
    let response = client.login("gm", "secret").await.unwrap();

    assert_eq!(response.expires_in, Some(1800));
    assert_eq!(client.token(), Some(token_for(7).as_str()));
    assert_eq!(client.claims().unwrap().user_id, Some(7));
}

#[tokio::test]
async fn test_login_failure_reports_detail() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/token"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"detail": "Incorrect username or password"})),
        )
        .mount(&server)
        .await;

    let mut client = client_for(&server);
    let err = client.login("gm", "wrong").await.unwrap_err();
    match err {
        ApiError::Api { status, message } => {
            assert_eq!(status, 401);
            assert_eq!(message, "Incorrect username or password");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(client.token().is_none());
}

#[tokio::test]
async fn test_error_without_detail() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/auth/me"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.current_user().await.unwrap_err();
    assert!(matches!(
        err,
        ApiError::Api { status: 500, ref message } if message == "Unknown error"
    ));
}

#[tokio::test]
async fn test_authenticated_requests_send_bearer() {
    let server = MockServer::start().await;
    let client = logged_in(&server).await;

    Mock::given(method("GET"))
        .and(path("/api/auth/me"))
        .and(header("authorization", format!("Bearer {}", token_for(7)).as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 7,
            "username": "gm",
            "email": "gm@example.org"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let user = client.current_user().await.unwrap();
    assert_eq!(user.username, "gm");
    assert_eq!(user.id, Some(7));
}

#[tokio::test]
async fn test_create_character() {
    let server = MockServer::start().await;
    let client = logged_in(&server).await;

    Mock::given(method("POST"))
        .and(path("/api/v1/characters/"))
        .and(body_string_contains(r#""character_class":"nain""#))
        .and(body_string_contains(r#""game_session_id":3"#))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 42,
            "name": "Thorin",
            "character_class": "nain",
            "strength": 9,
            "intelligence": 9,
            "wisdom": 9,
            "dexterity": 9,
            "constitution": 9,
            "charisma": 9,
            "max_hp": 3,
            "current_hp": 3,
            "user_id": 7
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut roller = ScriptedRoller::new([3; 22]);
    let thorin = ose_core::generate_with(&mut roller, "Thorin", CharacterClass::Dwarf).unwrap();
    let request = CreateCharacterRequest::new(thorin, 7, 3);

    let stored = client.create_character(&request).await.unwrap();
    assert_eq!(stored.id, 42);
    assert_eq!(stored.data.validate(), Ok(()));
    assert_eq!(stored.extra["user_id"], 7);
}

#[tokio::test]
async fn test_character_crud_paths() {
    let server = MockServer::start().await;
    let client = logged_in(&server).await;

    Mock::given(method("GET"))
        .and(path("/api/v1/characters/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "name": "Bilbo"},
            {"id": 2, "name": "Legolas"}
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/characters/2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 2, "name": "Legolas"})))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/v1/characters/2"))
        .and(body_string_contains(r#""current_hp":1"#))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"id": 2, "current_hp": 1})),
        )
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/v1/characters/2"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let all = client.list_characters().await.unwrap();
    assert_eq!(all.len(), 2);

    let legolas = client.get_character(2).await.unwrap();
    assert_eq!(legolas.data.name.as_deref(), Some("Legolas"));

    let updated = client
        .update_character(2, &json!({"current_hp": 1}))
        .await
        .unwrap();
    assert_eq!(updated.data.current_hp, Some(1));

    client.delete_character(2).await.unwrap();
}

#[tokio::test]
async fn test_health_falls_back() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"detail": "Not Found"})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "ok"})))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let health = client.health().await.unwrap();
    assert_eq!(health.status, "ok");
    assert_eq!(health.version, "1.0.0");
}

#[tokio::test]
async fn test_health_empty_body_defaults() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let health = client.health().await.unwrap();
    assert_eq!(health.status, "connected");
    assert_eq!(health.version, "1.0.0");
}

#[tokio::test]
async fn test_health_reports_last_failure() {
    // No mocks mounted: every endpoint gets wiremock's 404
    let server = MockServer::start().await;
    let client = client_for(&server);
    let err = client.health().await.unwrap_err();
    assert!(matches!(err, ApiError::Api { status: 404, .. }));
}

#[tokio::test]
async fn test_refresh_replaces_token() {
    let server = MockServer::start().await;
    let mut client = logged_in(&server).await;

    Mock::given(method("POST"))
        .and(path("/api/auth/refresh"))
        .and(header("authorization", format!("Bearer {}", token_for(7)).as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": token_for(8)
        })))
        .mount(&server)
        .await;

    client.refresh("gm").await.unwrap();
    assert_eq!(client.claims().unwrap().user_id, Some(8));
}

#[tokio::test]
async fn test_authenticate_without_credentials() {
    let mut client = OseClient::new(ApiConfig::new("http://127.0.0.1:9")).unwrap();
    assert!(matches!(
        client.authenticate().await,
        Err(ApiError::NoCredentials)
    ));
}

#[tokio::test]
async fn test_ensure_authenticated_keeps_live_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": token_for(9)
        })))
        .expect(0)
        .mount(&server)
        .await;

    let mut client = client_for(&server);
    client.set_token(token_for(7));
    let claims = client.ensure_authenticated().await.unwrap();
    assert_eq!(claims.user_id, Some(7));
}

#[tokio::test]
async fn test_ensure_authenticated_replaces_expired_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": token_for(9)
        })))
        .expect(1)
        .mount(&server)
        .await;

    let expired = format!(
        "eyJhbGciOiJIUzI1NiJ9.{}.c2ln",
        URL_SAFE_NO_PAD.encode(r#"{"user_id":7,"exp":1000}"#)
    );
    let mut client = client_for(&server);
    client.set_token(expired);
    let claims = client.ensure_authenticated().await.unwrap();
    assert_eq!(claims.user_id, Some(9));
    assert_eq!(client.token(), Some(token_for(9).as_str()));
}

#[tokio::test]
async fn test_ensure_authenticated_logs_in_without_token() {
    let server = MockServer::start().await;
    let _ = logged_in(&server).await;

    let mut client = client_for(&server);
    assert!(client.token().is_none());
    let claims = client.ensure_authenticated().await.unwrap();
    assert_eq!(claims.user_id, Some(7));
}

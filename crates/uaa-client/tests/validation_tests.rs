//! Remote token introspection (`/check_token`) behavior.

use serde_json::json;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use uaa_client::{Config, Token, UaaClient, UaaError};

// base64("test-client:test-secret"), the Config::for_testing credentials
const BASIC_AUTH: &str = "Basic dGVzdC1jbGllbnQ6dGVzdC1zZWNyZXQ=";

fn bearer(access_token: &str) -> Token {
    Token {
        access_token: access_token.to_string(),
        token_type: "bearer".to_string(),
        refresh_token: None,
        expiry: None,
        claims: None,
    }
}

async fn setup(mock_server: &MockServer) -> UaaClient {
    UaaClient::new(Config::for_testing(&mock_server.uri())).unwrap()
}

#[tokio::test]
async fn test_valid_token_posts_form_with_basic_auth() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/check_token"))
        .and(header("Authorization", BASIC_AUTH))
        .and(body_string_contains("token=some-access-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"active": true})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let uaa = setup(&mock_server).await;
    uaa.valid_token(&bearer("some-access-token")).await.unwrap();
}

#[tokio::test]
async fn test_rejected_token_surfaces_error_description() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/check_token"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(json!({"error_description": "token expired"})),
        )
        .mount(&mock_server)
        .await;

    let uaa = setup(&mock_server).await;
    let err = uaa.valid_token(&bearer("stale")).await.unwrap_err();

    assert!(matches!(err, UaaError::InvalidToken { .. }));
    assert!(err.to_string().contains("token expired"));
}

#[tokio::test]
async fn test_rejected_token_with_undecodable_body_falls_back() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/check_token"))
        .respond_with(ResponseTemplate::new(400).set_body_string("<html>nope</html>"))
        .mount(&mock_server)
        .await;

    let uaa = setup(&mock_server).await;
    let err = uaa.valid_token(&bearer("opaque")).await.unwrap_err();

    assert!(err.to_string().contains("could not verify token"), "got: {err}");
}

#[tokio::test]
async fn test_rejected_credentials_are_distinct_from_rejected_token() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/check_token"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&mock_server)
        .await;

    let uaa = setup(&mock_server).await;
    let err = uaa.valid_token(&bearer("t")).await.unwrap_err();
    assert!(matches!(err, UaaError::BadCredentials), "got {err:?}");
}

#[tokio::test]
async fn test_unexpected_status_carries_status_and_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/check_token"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .mount(&mock_server)
        .await;

    let uaa = setup(&mock_server).await;
    let err = uaa.valid_token(&bearer("t")).await.unwrap_err();

    match err {
        UaaError::ValidationFailed { status, body } => {
            assert_eq!(status, 502);
            assert_eq!(body, "bad gateway");
        }
        other => panic!("expected ValidationFailed, got {other:?}"),
    }
}

#[tokio::test]
async fn test_oversized_body_is_a_transport_error() {
    let mock_server = MockServer::start().await;

    // 2 MiB body, double the 1 MiB read bound
    Mock::given(method("POST"))
        .and(path("/check_token"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![b'x'; 2 << 20]))
        .mount(&mock_server)
        .await;

    let uaa = setup(&mock_server).await;
    let err = uaa.valid_token(&bearer("t")).await.unwrap_err();
    assert!(matches!(err, UaaError::ResponseTooLarge { .. }), "got {err:?}");
}

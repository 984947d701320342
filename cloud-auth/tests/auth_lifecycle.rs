//! Wire-level tests for the token lifecycle against a mock token endpoint.

use cloud_auth::{AuthError, AuthManager, TokenState};
use cloud_gateway::ReqwestGateway;
use mockito::{Matcher, Server, ServerGuard};

fn manager(server: &ServerGuard) -> AuthManager<ReqwestGateway> {
    AuthManager::new(ReqwestGateway::with_base_url(server.url()))
}

fn token_state(access: &str, refresh: &str) -> TokenState {
    TokenState {
        access_token: access.to_string(),
        refresh_token: refresh.to_string(),
        expires_in: Some(3600),
        token_type: "Bearer".to_string(),
        scope: Some("playback-control-all".to_string()),
    }
}

#[tokio::test]
async fn test_exchange_posts_code_grant_and_returns_tokens() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/oauth/token")
        .match_body(Matcher::AllOf(vec![
            Matcher::UrlEncoded("grant_type".into(), "authorization_code".into()),
            Matcher::UrlEncoded("code".into(), "code-1".into()),
            Matcher::UrlEncoded("redirect_uri".into(), "https://host.example/cb".into()),
            Matcher::UrlEncoded("client_id".into(), "casttosonos-client-1".into()),
            Matcher::UrlEncoded("code_verifier".into(), "verifier-1".into()),
        ]))
        .with_status(200)
        .with_body(
            r#"{"access_token":"at-1","refresh_token":"rt-1","expires_in":3600,"token_type":"Bearer","scope":"playback-control-all"}"#,
        )
        .create_async()
        .await;

    let state = manager(&server)
        .exchange_code("code-1", "https://host.example/cb", "verifier-1")
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(state.access_token, "at-1");
    assert_eq!(state.refresh_token, "rt-1");
    assert_eq!(state.expires_in, Some(3600));
    assert_eq!(state.scope.as_deref(), Some("playback-control-all"));
}

#[tokio::test]
async fn test_exchange_defaults_token_type_to_bearer() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/oauth/token")
        .with_status(200)
        .with_body(r#"{"access_token":"at-1","refresh_token":"rt-1"}"#)
        .create_async()
        .await;

    let state = manager(&server)
        .exchange_code("code-1", "https://host.example/cb", "verifier-1")
        .await
        .unwrap();

    assert_eq!(state.token_type, "Bearer");
}

#[tokio::test]
async fn test_exchange_rejects_missing_code_without_a_request() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/oauth/token")
        .expect(0)
        .create_async()
        .await;

    let result = manager(&server)
        .exchange_code("", "https://host.example/cb", "verifier-1")
        .await;

    mock.assert_async().await;
    match result {
        Err(AuthError::MissingCredential(what)) => assert_eq!(what, "authorization code"),
        other => panic!("Expected MissingCredential, got {other:?}"),
    }
}

#[tokio::test]
async fn test_exchange_failure_carries_status_and_body() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/oauth/token")
        .with_status(400)
        .with_body(r#"{"error":"invalid_grant"}"#)
        .create_async()
        .await;

    let result = manager(&server)
        .exchange_code("code-1", "https://host.example/cb", "verifier-1")
        .await;

    match result {
        Err(AuthError::TokenExchangeFailed { status, body }) => {
            assert_eq!(status, 400);
            assert!(body.contains("invalid_grant"));
        }
        other => panic!("Expected TokenExchangeFailed, got {other:?}"),
    }
}

#[tokio::test]
async fn test_exchange_without_access_token_is_malformed() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/oauth/token")
        .with_status(200)
        .with_body(r#"{"refresh_token":"rt-1"}"#)
        .create_async()
        .await;

    let result = manager(&server)
        .exchange_code("code-1", "https://host.example/cb", "verifier-1")
        .await;

    assert!(matches!(result, Err(AuthError::MalformedTokenResponse)));
}

#[tokio::test]
async fn test_refresh_posts_refresh_grant() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/oauth/token")
        .match_body(Matcher::AllOf(vec![
            Matcher::UrlEncoded("grant_type".into(), "refresh_token".into()),
            Matcher::UrlEncoded("refresh_token".into(), "rt-old".into()),
            Matcher::UrlEncoded("client_id".into(), "casttosonos-client-1".into()),
        ]))
        .with_status(200)
        .with_body(r#"{"access_token":"at-new","refresh_token":"rt-new","expires_in":7200}"#)
        .create_async()
        .await;

    let state = manager(&server)
        .refresh(&token_state("at-old", "rt-old"))
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(state.access_token, "at-new");
    assert_eq!(state.refresh_token, "rt-new");
    assert_eq!(state.expires_in, Some(7200));
}

#[tokio::test]
async fn test_refresh_preserves_old_refresh_token_when_omitted() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/oauth/token")
        .with_status(200)
        .with_body(r#"{"access_token":"at-new","expires_in":7200}"#)
        .create_async()
        .await;

    let state = manager(&server)
        .refresh(&token_state("at-old", "rt-old"))
        .await
        .unwrap();

    assert_eq!(state.access_token, "at-new");
    assert_eq!(state.refresh_token, "rt-old");
}

#[tokio::test]
async fn test_refresh_treats_empty_refresh_token_as_omitted() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/oauth/token")
        .with_status(200)
        .with_body(r#"{"access_token":"at-new","refresh_token":""}"#)
        .create_async()
        .await;

    let state = manager(&server)
        .refresh(&token_state("at-old", "rt-old"))
        .await
        .unwrap();

    assert_eq!(state.refresh_token, "rt-old");
}

#[tokio::test]
async fn test_refresh_failure_carries_status_and_body() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/oauth/token")
        .with_status(400)
        .with_body(r#"{"error":"invalid_grant","error_description":"refresh token revoked"}"#)
        .create_async()
        .await;

    let result = manager(&server).refresh(&token_state("at-old", "rt-old")).await;

    match result {
        Err(AuthError::RefreshFailed { status, body }) => {
            assert_eq!(status, 400);
            assert!(body.contains("refresh token revoked"));
        }
        other => panic!("Expected RefreshFailed, got {other:?}"),
    }
}

#[tokio::test]
async fn test_refresh_rejects_missing_refresh_token_without_a_request() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/oauth/token")
        .expect(0)
        .create_async()
        .await;

    let result = manager(&server).refresh(&token_state("at-old", "")).await;

    mock.assert_async().await;
    match result {
        Err(AuthError::MissingCredential(what)) => assert_eq!(what, "refresh token"),
        other => panic!("Expected MissingCredential, got {other:?}"),
    }
}

#[tokio::test]
async fn test_liveness_collects_boolean_flags() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/api/v2/whoami")
        .match_header("authorization", "Bearer at-1")
        .with_status(200)
        .with_body(r#"{"hasSonosToken":true,"hasSonosRefreshToken":false,"userId":"u-1"}"#)
        .create_async()
        .await;

    let report = manager(&server).test_liveness("at-1").await.unwrap();

    mock.assert_async().await;
    assert!(report.authenticated);
    assert!(report.flag("hasSonosToken"));
    assert!(!report.flag("hasSonosRefreshToken"));
    // Non-boolean fields are not capability flags
    assert!(!report.flags.contains_key("userId"));
}

#[tokio::test]
async fn test_liveness_failure_carries_status_and_body() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/api/v2/whoami")
        .with_status(401)
        .with_body(r#"{"error":"token_expired"}"#)
        .create_async()
        .await;

    let result = manager(&server).test_liveness("at-stale").await;

    match result {
        Err(AuthError::AuthTestFailed { status, body }) => {
            assert_eq!(status, 401);
            assert!(body.contains("token_expired"));
        }
        other => panic!("Expected AuthTestFailed, got {other:?}"),
    }
}

#[tokio::test]
async fn test_liveness_rejects_missing_access_token() {
    let server = Server::new_async().await;

    let result = manager(&server).test_liveness("").await;

    match result {
        Err(AuthError::MissingCredential(what)) => assert_eq!(what, "access token"),
        other => panic!("Expected MissingCredential, got {other:?}"),
    }
}

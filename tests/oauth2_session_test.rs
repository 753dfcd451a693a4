// ABOUTME: Unit tests for the OAuth2 session state machine
// ABOUTME: Validates authorization URL construction and token-response transitions
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2026 withings-metrics contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use std::collections::HashMap;
use url::Url;
use withings_metrics::config::{AppCredentials, UserTokens};
use withings_metrics::errors::Error;
use withings_metrics::oauth2_client::{OAuth2Session, TokenResponse};

fn app_credentials() -> AppCredentials {
    AppCredentials {
        client_id: Some("client-1".into()),
        consumer_secret: Some("secret-1".into()),
        callback_url: Some("https://example.org/callback".into()),
    }
}

fn session_with_code() -> OAuth2Session {
    let tokens = UserTokens {
        authorization_code: Some("auth-code-1".into()),
        ..Default::default()
    };
    OAuth2Session::new(app_credentials(), tokens)
}

fn success_response() -> TokenResponse {
    serde_json::from_str(
        r#"{
            "status": 0,
            "body": {
                "access_token": "access-1",
                "refresh_token": "refresh-1",
                "userid": 12345
            }
        }"#,
    )
    .unwrap()
}

fn failure_response(message: &str) -> TokenResponse {
    serde_json::from_str(&format!(r#"{{"status": 503, "error": "{message}"}}"#)).unwrap()
}

#[test]
fn test_authorization_url_carries_expected_parameters() {
    let session = session_with_code();
    let url = Url::parse(&session.authorization_url().unwrap()).unwrap();

    let pairs: HashMap<_, _> = url.query_pairs().into_owned().collect();
    assert_eq!(pairs.get("response_type").map(String::as_str), Some("code"));
    assert_eq!(pairs.get("client_id").map(String::as_str), Some("client-1"));
    assert_eq!(pairs.get("state").map(String::as_str), Some("OK"));
    assert_eq!(pairs.get("scope").map(String::as_str), Some("user.metrics"));
    assert_eq!(
        pairs.get("redirect_uri").map(String::as_str),
        Some("https://example.org/callback")
    );
}

#[test]
fn test_authorization_url_requires_client_id() {
    let session = OAuth2Session::new(AppCredentials::default(), UserTokens::default());
    let err = session.authorization_url().unwrap_err();
    assert!(matches!(err, Error::MissingCredential("client_id")));
}

#[test]
fn test_success_response_transitions_to_authorized() {
    let mut session = session_with_code();
    assert!(!session.is_authorized());

    session.apply_token_response(success_response()).unwrap();

    assert!(session.is_authorized());
    assert_eq!(session.access_token(), Some("access-1"));
    assert_eq!(session.tokens().refresh_token.as_deref(), Some("refresh-1"));
    assert_eq!(session.tokens().user_id.as_deref(), Some("12345"));
}

#[test]
fn test_invalid_code_failure_clears_authorization_code() {
    let mut session = session_with_code();

    let err = session
        .apply_token_response(failure_response("invalid code used in request"))
        .unwrap_err();

    assert!(matches!(err, Error::TokenExchangeFailed { status: 503, .. }));
    assert_eq!(session.tokens().authorization_code, None);
    assert!(!session.is_authorized());
}

#[test]
fn test_unrelated_failure_retains_authorization_code() {
    let mut session = session_with_code();

    let err = session
        .apply_token_response(failure_response("temporarily unavailable"))
        .unwrap_err();

    assert!(matches!(err, Error::TokenExchangeFailed { status: 503, .. }));
    assert_eq!(
        session.tokens().authorization_code.as_deref(),
        Some("auth-code-1")
    );
}

#[test]
fn test_custom_invalid_code_predicate() {
    let mut session = session_with_code();
    session.set_invalid_code_predicate(|message| message.contains("expired"));

    // The default marker no longer matches.
    let _ = session
        .apply_token_response(failure_response("invalid code used in request"))
        .unwrap_err();
    assert!(session.tokens().authorization_code.is_some());

    let _ = session
        .apply_token_response(failure_response("grant expired"))
        .unwrap_err();
    assert_eq!(session.tokens().authorization_code, None);
}

#[test]
fn test_success_without_body_is_an_error() {
    let mut session = session_with_code();
    let response: TokenResponse = serde_json::from_str(r#"{"status": 0}"#).unwrap();

    let err = session.apply_token_response(response).unwrap_err();
    assert!(matches!(err, Error::TokenExchangeFailed { status: 0, .. }));
    assert!(!session.is_authorized());
}

#[test]
fn test_string_userid_is_accepted() {
    let mut session = session_with_code();
    let response: TokenResponse = serde_json::from_str(
        r#"{
            "status": 0,
            "body": {
                "access_token": "access-1",
                "refresh_token": "refresh-1",
                "userid": "98765"
            }
        }"#,
    )
    .unwrap();

    session.apply_token_response(response).unwrap();
    assert_eq!(session.tokens().user_id.as_deref(), Some("98765"));
}

#[test]
fn test_missing_userid_leaves_user_id_untouched() {
    let mut session = session_with_code();
    let response: TokenResponse = serde_json::from_str(
        r#"{
            "status": 0,
            "body": {
                "access_token": "access-1",
                "refresh_token": "refresh-1"
            }
        }"#,
    )
    .unwrap();

    session.apply_token_response(response).unwrap();
    assert_eq!(session.tokens().user_id, None);
}

#[test]
fn test_needs_authorization_code_transitions() {
    let mut session = OAuth2Session::new(app_credentials(), UserTokens::default());
    assert!(session.needs_authorization_code());

    session.complete_authorization("  pasted-code\n");
    assert!(!session.needs_authorization_code());
    assert_eq!(
        session.tokens().authorization_code.as_deref(),
        Some("pasted-code")
    );

    let authorized = OAuth2Session::new(
        app_credentials(),
        UserTokens {
            access_token: Some("access-1".into()),
            ..Default::default()
        },
    );
    assert!(!authorized.needs_authorization_code());
}

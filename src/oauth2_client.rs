// ABOUTME: OAuth2 session state machine for the Withings token lifecycle
// ABOUTME: Handles authorization URL construction, code exchange, and token refresh
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2026 withings-metrics contributors

//! # OAuth2 client module
//!
//! The session moves through three states: **Unauthorized** (no access
//! token) → **Authorizing** (authorization code present, exchanging) →
//! **Authorized** (access and refresh tokens present). The interactive
//! authorization step is deliberately *not* part of construction: callers
//! ask for [`OAuth2Session::authorization_url`], obtain a code from the
//! user however they like, and hand it back via
//! [`OAuth2Session::complete_authorization`]. The vendor imposes a validity
//! window of roughly 30 seconds on the code; this client documents the
//! constraint to the user and does not enforce it.
//!
//! The vendor signals failure through a `status` field in the response
//! envelope rather than HTTP status codes; `0` is success, anything else
//! carries a human-readable `error` string. Whether that string means "the
//! stored authorization code is bad and must be discarded" is decided by a
//! pluggable predicate, since it is a vendor-message-coupled heuristic.

use crate::config::{AppCredentials, UserTokens};
use crate::constants::{env_config, INVALID_CODE_MARKER, OAUTH_SCOPE, OAUTH_STATE};
use crate::errors::{Error, Result};
use crate::utils::http_client::oauth_client;
use reqwest::Client;
use serde::Deserialize;
use std::fmt;
use tracing::{info, warn};
use url::Url;

/// Decides from the vendor error string whether the stored authorization
/// code should be discarded.
pub type InvalidCodePredicate = Box<dyn Fn(&str) -> bool + Send + Sync>;

/// Endpoint configuration for the OAuth2 flow.
#[derive(Debug, Clone)]
pub struct OAuth2Config {
    /// Browser-facing authorization endpoint.
    pub authorize_url: String,
    /// Token endpoint for both grant types.
    pub token_url: String,
}

impl Default for OAuth2Config {
    fn default() -> Self {
        Self {
            authorize_url: env_config::authorize_url(),
            token_url: env_config::token_url(),
        }
    }
}

/// The authentication/refresh state machine over one user's token set.
///
/// Owns its credentials and tokens for the duration of one run; callers
/// load them through [`crate::config::TokenStore`] beforehand and persist
/// [`OAuth2Session::tokens`] afterwards, including after failures: a
/// cleared authorization code only enables a retry on the next run if it
/// reaches disk.
pub struct OAuth2Session {
    config: OAuth2Config,
    app: AppCredentials,
    tokens: UserTokens,
    client: Client,
    invalid_code_predicate: InvalidCodePredicate,
    skip_redundant_refresh: bool,
}

impl OAuth2Session {
    /// Create a session over the given credentials and token state, using
    /// the default endpoints (environment-overridable).
    #[must_use]
    pub fn new(app: AppCredentials, tokens: UserTokens) -> Self {
        Self::with_config(OAuth2Config::default(), app, tokens)
    }

    /// Create a session with explicit endpoint configuration.
    #[must_use]
    pub fn with_config(config: OAuth2Config, app: AppCredentials, tokens: UserTokens) -> Self {
        Self {
            config,
            app,
            tokens,
            client: oauth_client(),
            invalid_code_predicate: Box::new(|message| message.contains(INVALID_CODE_MARKER)),
            skip_redundant_refresh: false,
        }
    }

    /// Skip the refresh call that historically follows a fresh code
    /// exchange. The double round trip is the vendor-compatible default;
    /// opting out is safe only if confirmed against the real API.
    #[must_use]
    pub fn skip_redundant_refresh(mut self, skip: bool) -> Self {
        self.skip_redundant_refresh = skip;
        self
    }

    /// Replace the heuristic that recognizes "invalid code" errors.
    pub fn set_invalid_code_predicate(
        &mut self,
        predicate: impl Fn(&str) -> bool + Send + Sync + 'static,
    ) {
        self.invalid_code_predicate = Box::new(predicate);
    }

    /// True once an access token is held.
    #[must_use]
    pub const fn is_authorized(&self) -> bool {
        self.tokens.access_token.is_some()
    }

    /// True when the interactive authorization step has to run before
    /// [`OAuth2Session::ensure_authorized`] can succeed.
    #[must_use]
    pub const fn needs_authorization_code(&self) -> bool {
        self.tokens.access_token.is_none() && self.tokens.authorization_code.is_none()
    }

    /// The current token state, for persistence.
    #[must_use]
    pub const fn tokens(&self) -> &UserTokens {
        &self.tokens
    }

    /// Consume the session, yielding the token state.
    #[must_use]
    pub fn into_tokens(self) -> UserTokens {
        self.tokens
    }

    /// The bearer token for API calls, once authorized.
    #[must_use]
    pub fn access_token(&self) -> Option<&str> {
        self.tokens.access_token.as_deref()
    }

    /// The URL the user must open in a browser to obtain an authorization
    /// code.
    ///
    /// # Errors
    ///
    /// Returns an error when `client_id` or `callback_url` is not
    /// configured, or the authorize endpoint URL is malformed.
    pub fn authorization_url(&self) -> Result<String> {
        let client_id = self
            .app
            .client_id
            .as_deref()
            .ok_or(Error::MissingCredential("client_id"))?;
        let callback_url = self
            .app
            .callback_url
            .as_deref()
            .ok_or(Error::MissingCredential("callback_url"))?;

        let mut url = Url::parse(&self.config.authorize_url)?;
        url.query_pairs_mut()
            .append_pair("response_type", "code")
            .append_pair("client_id", client_id)
            .append_pair("state", OAUTH_STATE)
            .append_pair("scope", OAUTH_SCOPE)
            .append_pair("redirect_uri", callback_url);

        Ok(url.into())
    }

    /// Store the authorization code obtained from the user.
    pub fn complete_authorization(&mut self, code: &str) {
        self.tokens.authorization_code = Some(code.trim().to_owned());
    }

    /// Exchange the stored authorization code for access and refresh
    /// tokens.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AuthorizationRequired`] without a stored code,
    /// [`Error::MissingCredential`] without complete app credentials, and
    /// [`Error::TokenExchangeFailed`] when the endpoint reports a non-zero
    /// status, after clearing the stored code if the error message matches
    /// the invalid-code predicate.
    pub async fn exchange_code(&mut self) -> Result<()> {
        let code = self
            .tokens
            .authorization_code
            .clone()
            .ok_or(Error::AuthorizationRequired)?;

        info!("requesting access token with authorization code");
        let response = {
            let client_id = self
                .app
                .client_id
                .as_deref()
                .ok_or(Error::MissingCredential("client_id"))?;
            let consumer_secret = self
                .app
                .consumer_secret
                .as_deref()
                .ok_or(Error::MissingCredential("consumer_secret"))?;
            let callback_url = self
                .app
                .callback_url
                .as_deref()
                .ok_or(Error::MissingCredential("callback_url"))?;

            let params = [
                ("action", "requesttoken"),
                ("grant_type", "authorization_code"),
                ("client_id", client_id),
                ("client_secret", consumer_secret),
                ("code", code.as_str()),
                ("redirect_uri", callback_url),
            ];

            self.client
                .post(&self.config.token_url)
                .form(&params)
                .send()
                .await?
                .json::<TokenResponse>()
                .await?
        };

        self.apply_token_response(response)
    }

    /// Obtain a fresh access token from the stored refresh token.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingCredential`] without a refresh token or
    /// complete app credentials, and [`Error::TokenExchangeFailed`] when
    /// the endpoint reports a non-zero status.
    pub async fn refresh_access_token(&mut self) -> Result<()> {
        let refresh_token = self
            .tokens
            .refresh_token
            .clone()
            .ok_or(Error::MissingCredential("refresh_token"))?;

        info!("refreshing access token");
        let response = {
            let client_id = self
                .app
                .client_id
                .as_deref()
                .ok_or(Error::MissingCredential("client_id"))?;
            let consumer_secret = self
                .app
                .consumer_secret
                .as_deref()
                .ok_or(Error::MissingCredential("consumer_secret"))?;

            let params = [
                ("action", "requesttoken"),
                ("grant_type", "refresh_token"),
                ("client_id", client_id),
                ("client_secret", consumer_secret),
                ("refresh_token", refresh_token.as_str()),
            ];

            self.client
                .post(&self.config.token_url)
                .form(&params)
                .send()
                .await?
                .json::<TokenResponse>()
                .await?
        };

        self.apply_token_response(response)
    }

    /// Drive the session to the Authorized state.
    ///
    /// Exchanges the stored authorization code when no access token is
    /// held, then refreshes. The refresh also runs right after a fresh
    /// exchange (an idempotent validation of the new token pair that the
    /// vendor flow has always performed) unless the session was built with
    /// [`OAuth2Session::skip_redundant_refresh`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::AuthorizationRequired`] when neither an access
    /// token nor an authorization code is available, and any error of
    /// [`OAuth2Session::exchange_code`] or
    /// [`OAuth2Session::refresh_access_token`].
    pub async fn ensure_authorized(&mut self) -> Result<()> {
        let mut exchanged = false;
        if self.tokens.access_token.is_none() {
            if self.tokens.authorization_code.is_none() {
                return Err(Error::AuthorizationRequired);
            }
            self.exchange_code().await?;
            exchanged = true;
        }

        if !(exchanged && self.skip_redundant_refresh) {
            self.refresh_access_token().await?;
        }

        Ok(())
    }

    /// Apply a token endpoint response envelope to the session state.
    ///
    /// This is the pure transition underlying both grant types, split out
    /// from the transport so it can be exercised directly.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TokenExchangeFailed`] for a non-zero status or a
    /// success envelope without a body. A failure whose error message
    /// matches the invalid-code predicate clears the stored authorization
    /// code first, so the next run can start over with a fresh code.
    pub fn apply_token_response(&mut self, response: TokenResponse) -> Result<()> {
        if response.status != 0 {
            let message = response
                .error
                .unwrap_or_else(|| "no error message provided".into());
            if (self.invalid_code_predicate)(&message) {
                warn!("token endpoint rejected the authorization code, discarding it");
                self.tokens.authorization_code = None;
            }
            return Err(Error::TokenExchangeFailed {
                status: response.status,
                message,
            });
        }

        let body = response.body.ok_or_else(|| Error::TokenExchangeFailed {
            status: 0,
            message: "success response without a token body".into(),
        })?;

        self.tokens.access_token = Some(body.access_token);
        self.tokens.refresh_token = Some(body.refresh_token);
        if let Some(user_id) = body.userid {
            self.tokens.user_id = Some(user_id.to_string());
        }
        info!("token endpoint reported success");
        Ok(())
    }
}

/// Response envelope of the token endpoint: `status` is `0` on success,
/// anything else is a failure described by `error`.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    /// Vendor status code.
    pub status: i64,
    /// Token payload, present on success.
    #[serde(default)]
    pub body: Option<TokenBody>,
    /// Human-readable error, present on failure.
    #[serde(default)]
    pub error: Option<String>,
}

/// Token payload of a successful response.
#[derive(Debug, Deserialize)]
pub struct TokenBody {
    /// Bearer token authorizing API calls.
    pub access_token: String,
    /// Token for obtaining new access tokens without user interaction.
    pub refresh_token: String,
    /// Vendor-side user id; numeric on the wire, but tolerated as a string.
    #[serde(default)]
    pub userid: Option<UserId>,
}

/// The vendor reports `userid` as a number; be liberal and accept a string
/// too.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum UserId {
    /// Numeric user id, the documented wire format.
    Number(i64),
    /// String user id, seen in older persisted documents.
    Text(String),
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(id) => write!(f, "{id}"),
            Self::Text(id) => f.write_str(id),
        }
    }
}

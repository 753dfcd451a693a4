// ABOUTME: Application constants for the Withings API endpoints and OAuth parameters
// ABOUTME: Environment-based endpoint overrides live in the env_config module
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2026 withings-metrics contributors

//! Constants grouped by domain.

use std::env;

/// OAuth scope requested during user authorization.
pub const OAUTH_SCOPE: &str = "user.metrics";

/// Static `state` parameter sent with the authorization request.
pub const OAUTH_STATE: &str = "OK";

/// Measurement category for real measurements (as opposed to user objectives).
pub const MEASURE_CATEGORY_REAL: u32 = 1;

/// Substring of the vendor error message that marks a rejected authorization code.
pub const INVALID_CODE_MARKER: &str = "invalid code";

/// Default on-disk locations for the two configuration documents.
pub mod config_files {
    /// Application credentials (client id, consumer secret, callback URL).
    pub const APP_CONFIG: &str = "config/withings_app.json";
    /// Per-user tokens (authorization code, access/refresh tokens, user id).
    pub const USER_CONFIG: &str = "config/withings_user.json";
}

/// Environment-based endpoint configuration.
pub mod env_config {
    use super::env;

    /// Browser-facing authorization endpoint.
    #[must_use]
    pub fn authorize_url() -> String {
        env::var("WITHINGS_AUTH_URL")
            .unwrap_or_else(|_| "https://account.withings.com/oauth2_user/authorize2".into())
    }

    /// Token endpoint for both the code exchange and the refresh grant.
    #[must_use]
    pub fn token_url() -> String {
        env::var("WITHINGS_TOKEN_URL")
            .unwrap_or_else(|_| "https://wbsapi.withings.net/v2/oauth2".into())
    }

    /// Measurements endpoint.
    #[must_use]
    pub fn getmeas_url() -> String {
        env::var("WITHINGS_GETMEAS_URL")
            .unwrap_or_else(|_| "https://wbsapi.withings.net/measure?action=getmeas".into())
    }
}

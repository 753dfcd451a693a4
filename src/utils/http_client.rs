// ABOUTME: HTTP client constructors with timeout configuration
// ABOUTME: Separate clients tuned for OAuth token exchanges and measurement API calls
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2026 withings-metrics contributors

use reqwest::{Client, ClientBuilder};
use std::time::Duration;

/// Create a new HTTP client with custom timeout settings.
///
/// Falls back to a default client if custom client creation fails.
#[must_use]
pub fn create_client_with_timeout(timeout_secs: u64, connect_timeout_secs: u64) -> Client {
    ClientBuilder::new()
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(connect_timeout_secs))
        .build()
        .unwrap_or_else(|_| Client::new())
}

/// HTTP client for OAuth flows. Token exchanges should be fast operations,
/// so the timeouts are short.
#[must_use]
pub fn oauth_client() -> Client {
    create_client_with_timeout(15, 5)
}

/// HTTP client for measurement API calls, with more generous timeouts.
#[must_use]
pub fn api_client() -> Client {
    create_client_with_timeout(30, 10)
}

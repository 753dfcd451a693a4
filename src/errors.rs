// ABOUTME: Unified error type for the Withings client
// ABOUTME: Covers authentication, measurement fetch, decode, and transport failures
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2026 withings-metrics contributors

//! Crate-wide error handling.
//!
//! Authentication failures are fatal to a session and surfaced to the user;
//! data-fetch failures are typed so callers can treat them as "no data
//! available" instead of crashing. Missing or corrupt configuration is never
//! an error here: [`crate::config::TokenStore`] degrades to an empty store.

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// All failure modes of the client.
#[derive(Debug, Error)]
pub enum Error {
    /// The token endpoint answered with a non-zero status.
    #[error("token exchange failed (status {status}): {message}")]
    TokenExchangeFailed {
        /// Vendor status code from the response envelope.
        status: i64,
        /// Human-readable vendor error message.
        message: String,
    },

    /// The measurements endpoint answered with a non-zero status.
    #[error("measurement fetch failed (status {status}): {message}")]
    MeasurementFetchFailed {
        /// Vendor status code from the response envelope.
        status: i64,
        /// Human-readable vendor error message.
        message: String,
    },

    /// A measure group record contained no measures.
    #[error("measure group {group_id} contains no measures")]
    MalformedMeasureGroup {
        /// Server-side group id of the offending record.
        group_id: i64,
    },

    /// No access token and no authorization code are available; the
    /// interactive authorization step has to run first.
    #[error("not authorized: obtain an authorization code via the interactive step first")]
    AuthorizationRequired,

    /// A required app credential is absent from the configuration.
    #[error("{0} is not configured")]
    MissingCredential(&'static str),

    /// A configured endpoint URL failed to parse.
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// HTTP transport failure, including response-body decode errors.
    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    /// Failed to write a configuration document.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to serialize a configuration document.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// True for failures that require human re-authorization and terminate
    /// the session (the CLI maps these to a non-zero exit).
    #[must_use]
    pub const fn is_auth_failure(&self) -> bool {
        matches!(
            self,
            Self::TokenExchangeFailed { .. }
                | Self::AuthorizationRequired
                | Self::MissingCredential(_)
        )
    }
}

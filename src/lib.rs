// ABOUTME: Main library entry point for the Withings body-composition client
// ABOUTME: OAuth2 token lifecycle, persistent token storage, and typed measurement queries
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2026 withings-metrics contributors

#![deny(unsafe_code)]

//! # Withings Metrics
//!
//! A personal health-data retrieval client for the Withings API. It
//! authenticates through the vendor's OAuth2 flow, keeps tokens on disk
//! between runs, and fetches body-composition measurement groups (weight,
//! fat ratio, muscle mass, hydration, bone mass) for a date range as typed,
//! queryable objects.
//!
//! ## Architecture
//!
//! - **Models**: measurement types, scaled values, and timestamped groups
//! - **Config**: the two persisted JSON documents (app credentials, user
//!   tokens) with degrade-to-empty loading
//! - **`OAuth2` client**: the exchange/refresh state machine over one
//!   user's token set
//! - **Measurements**: the bearer-authenticated `getmeas` call and its
//!   typed decode
//!
//! The first run is interactive: the user opens the authorization URL in a
//! browser and pastes the resulting code back within the vendor's ~30 s
//! validity window. Every later run refreshes silently.
//!
//! ## Example
//!
//! ```rust,no_run
//! use chrono::{Duration, Utc};
//! use withings_metrics::config::TokenStore;
//! use withings_metrics::constants::config_files;
//! use withings_metrics::measurements::MeasurementClient;
//! use withings_metrics::oauth2_client::OAuth2Session;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> anyhow::Result<()> {
//!     let store = TokenStore::new(config_files::APP_CONFIG, config_files::USER_CONFIG);
//!     let mut session = OAuth2Session::new(store.load_app(), store.load_user());
//!     session.ensure_authorized().await?;
//!     store.save_user(session.tokens())?;
//!
//!     let end = Utc::now();
//!     let client = MeasurementClient::new(&session);
//!     let groups = client.get_measurements(end - Duration::days(30), end).await?;
//!     for group in &groups {
//!         println!("{}: weight {:?}", group.datetime(), group.weight());
//!     }
//!     Ok(())
//! }
//! ```

/// Persisted configuration: app credentials and per-user tokens
pub mod config;

/// Endpoint URLs, OAuth parameters, and configuration defaults
pub mod constants;

/// Crate-wide error type and `Result` alias
pub mod errors;

/// Structured logging setup
pub mod logging;

/// Measurement retrieval against the `getmeas` endpoint
pub mod measurements;

/// Measurement domain model and wire decode
pub mod models;

/// `OAuth2` session state machine: code exchange and token refresh
pub mod oauth2_client;

/// Shared plumbing (HTTP client construction)
pub mod utils;

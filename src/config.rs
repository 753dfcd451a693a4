// ABOUTME: Durable token and credential storage backed by small JSON documents
// ABOUTME: Loads degrade to an empty store; saves render sorted keys for stable diffs
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2026 withings-metrics contributors

//! Persisted configuration.
//!
//! Two documents live on disk: the app credentials registered with the
//! vendor, and the per-user token set mutated by the OAuth2 session. A
//! missing or malformed document loads as an empty value: a fresh store is
//! a valid pre-authorization state, so first runs work without any setup
//! beyond the app credentials.

use crate::errors::Result;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Application-level OAuth client credentials. Immutable after load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppCredentials {
    /// OAuth client id issued by the vendor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    /// OAuth client secret issued by the vendor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consumer_secret: Option<String>,
    /// Redirect URI registered with the vendor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub callback_url: Option<String>,
}

/// Per-user token state. Mutated only by the OAuth2 session.
///
/// `access_token` is present iff a successful exchange or refresh has
/// occurred since the store was last cleared; `authorization_code` is
/// cleared whenever the server reports it invalid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserTokens {
    /// Single-use authorization code from the interactive step.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authorization_code: Option<String>,
    /// Bearer token authorizing API calls.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    /// Token used to obtain a new access token without user interaction.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    /// Vendor-side user id reported by the token endpoint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

/// Read/write access to the two configuration documents.
#[derive(Debug, Clone)]
pub struct TokenStore {
    app_path: PathBuf,
    user_path: PathBuf,
}

impl TokenStore {
    /// Create a store over the given document paths.
    pub fn new(app_path: impl Into<PathBuf>, user_path: impl Into<PathBuf>) -> Self {
        Self {
            app_path: app_path.into(),
            user_path: user_path.into(),
        }
    }

    /// Load the app credentials, degrading to empty on a missing or
    /// malformed document.
    #[must_use]
    pub fn load_app(&self) -> AppCredentials {
        Self::load(&self.app_path)
    }

    /// Load the user tokens, degrading to empty on a missing or malformed
    /// document.
    #[must_use]
    pub fn load_user(&self) -> UserTokens {
        Self::load(&self.user_path)
    }

    /// Write the app credentials back to disk.
    ///
    /// # Errors
    ///
    /// Returns an error when the document cannot be serialized or written.
    pub fn save_app(&self, credentials: &AppCredentials) -> Result<()> {
        Self::save(&self.app_path, credentials)
    }

    /// Write the user tokens back to disk.
    ///
    /// # Errors
    ///
    /// Returns an error when the document cannot be serialized or written.
    pub fn save_user(&self, tokens: &UserTokens) -> Result<()> {
        Self::save(&self.user_path, tokens)
    }

    fn load<T: DeserializeOwned + Default>(path: &Path) -> T {
        match fs::read_to_string(path) {
            Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|err| {
                warn!("cannot parse config file {}: {err}, starting empty", path.display());
                T::default()
            }),
            Err(err) => {
                warn!("cannot read config file {}: {err}, starting empty", path.display());
                T::default()
            }
        }
    }

    fn save<T: Serialize>(path: &Path, value: &T) -> Result<()> {
        // Rendering through a Value sorts object keys, keeping saved
        // documents diff-friendly across runs.
        let value = serde_json::to_value(value)?;
        let mut rendered = serde_json::to_string_pretty(&value)?;
        rendered.push('\n');
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, rendered)?;
        Ok(())
    }
}

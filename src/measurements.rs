// ABOUTME: Measurement retrieval against the bearer-authenticated getmeas endpoint
// ABOUTME: Decodes response envelopes into validated MeasureGroup values
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2026 withings-metrics contributors

//! Measurement retrieval.
//!
//! Requires an authorized [`OAuth2Session`]. A non-zero vendor status is an
//! explicit [`Error::MeasurementFetchFailed`], never an implicit empty
//! result, so callers can distinguish "no data in range" from "the fetch
//! failed".

use crate::constants::{env_config, MEASURE_CATEGORY_REAL};
use crate::errors::{Error, Result};
use crate::models::{MeasureGroup, RawMeasureGroup};
use crate::oauth2_client::OAuth2Session;
use crate::utils::http_client::api_client;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use tracing::info;

/// Client for the measurements endpoint, borrowing an authorized session.
pub struct MeasurementClient<'a> {
    session: &'a OAuth2Session,
    client: Client,
    getmeas_url: String,
}

impl<'a> MeasurementClient<'a> {
    /// Create a client over an authorized session, using the default
    /// endpoint (environment-overridable).
    #[must_use]
    pub fn new(session: &'a OAuth2Session) -> Self {
        Self::with_endpoint(session, env_config::getmeas_url())
    }

    /// Create a client against an explicit measurements endpoint.
    #[must_use]
    pub fn with_endpoint(session: &'a OAuth2Session, getmeas_url: impl Into<String>) -> Self {
        Self {
            session,
            client: api_client(),
            getmeas_url: getmeas_url.into(),
        }
    }

    /// Fetch body-composition measurement groups between two instants, in
    /// server order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AuthorizationRequired`] when the session holds no
    /// access token, [`Error::MeasurementFetchFailed`] when the endpoint
    /// reports a non-zero status, and [`Error::MalformedMeasureGroup`] when
    /// a returned record carries no measures.
    pub async fn get_measurements(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<MeasureGroup>> {
        let token = self
            .session
            .access_token()
            .ok_or(Error::AuthorizationRequired)?;

        let params = [
            ("category", MEASURE_CATEGORY_REAL.to_string()),
            ("startdate", start.timestamp().to_string()),
            ("enddate", end.timestamp().to_string()),
        ];

        let response = self
            .client
            .post(&self.getmeas_url)
            .bearer_auth(token)
            .form(&params)
            .send()
            .await?
            .json::<MeasurementsResponse>()
            .await?;

        let groups = decode_measurements_response(response)?;
        info!("{} measurement groups received", groups.len());
        Ok(groups)
    }
}

/// Decode a measurements envelope into domain groups, preserving server
/// order.
///
/// This is the pure decode underlying
/// [`MeasurementClient::get_measurements`], split out from the transport so
/// it can be exercised directly.
///
/// # Errors
///
/// Returns [`Error::MeasurementFetchFailed`] for a non-zero status or a
/// success envelope without a body, and [`Error::MalformedMeasureGroup`]
/// when a record carries no measures.
pub fn decode_measurements_response(response: MeasurementsResponse) -> Result<Vec<MeasureGroup>> {
    if response.status != 0 {
        return Err(Error::MeasurementFetchFailed {
            status: response.status,
            message: response
                .error
                .unwrap_or_else(|| "no error message provided".into()),
        });
    }

    let body = response
        .body
        .ok_or_else(|| Error::MeasurementFetchFailed {
            status: 0,
            message: "success response without a measurement body".into(),
        })?;

    body.measuregrps
        .into_iter()
        .map(MeasureGroup::try_from)
        .collect()
}

/// Response envelope of the measurements endpoint.
#[derive(Debug, Deserialize)]
pub struct MeasurementsResponse {
    /// Vendor status code; `0` is success.
    pub status: i64,
    /// Measurement payload, present on success.
    #[serde(default)]
    pub body: Option<MeasurementsBody>,
    /// Human-readable error, present on failure.
    #[serde(default)]
    pub error: Option<String>,
}

/// Measurement payload of a successful response.
#[derive(Debug, Deserialize)]
pub struct MeasurementsBody {
    /// Raw measure group records in server order.
    pub measuregrps: Vec<RawMeasureGroup>,
}

// ABOUTME: Typed measurement model for Withings body-composition data
// ABOUTME: Decodes raw API measure records into validated domain types
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2026 withings-metrics contributors

//! Measurement domain model.
//!
//! The API reports every reading as an integer value plus a power-of-ten
//! unit exponent; [`MeasureValue::value`] performs the decoding. Readings
//! taken together share a timestamp and arrive as one [`MeasureGroup`],
//! which offers convenience accessors for the common body-composition
//! types. Raw wire records are validated on conversion: a group without
//! measures is a structural decode error, never a silent empty group.

use crate::errors::{Error, Result};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::fmt;

/// Measurement type codes used by the vendor API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeasureType {
    /// Body weight (kg).
    Weight,
    /// Height (meters).
    Height,
    /// Fat-free mass (kg).
    FatFreeMass,
    /// Fat ratio (%).
    FatRatio,
    /// Fat mass weight (kg).
    FatMassWeight,
    /// Muscle mass (kg).
    MuscleMass,
    /// Body water (kg).
    Hydration,
    /// Bone mass (kg).
    BoneMass,
    /// Any type code this client does not recognize.
    Unknown(u32),
}

impl MeasureType {
    /// Map a vendor type code to a measurement type. Total: unrecognized
    /// codes map to [`MeasureType::Unknown`].
    #[must_use]
    pub const fn from_code(code: u32) -> Self {
        match code {
            1 => Self::Weight,
            4 => Self::Height,
            5 => Self::FatFreeMass,
            6 => Self::FatRatio,
            8 => Self::FatMassWeight,
            76 => Self::MuscleMass,
            77 => Self::Hydration,
            88 => Self::BoneMass,
            other => Self::Unknown(other),
        }
    }

    /// The vendor type code for this measurement type.
    #[must_use]
    pub const fn code(self) -> u32 {
        match self {
            Self::Weight => 1,
            Self::Height => 4,
            Self::FatFreeMass => 5,
            Self::FatRatio => 6,
            Self::FatMassWeight => 8,
            Self::MuscleMass => 76,
            Self::Hydration => 77,
            Self::BoneMass => 88,
            Self::Unknown(code) => code,
        }
    }

    /// Human-readable name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Weight => "Weight",
            Self::Height => "Height",
            Self::FatFreeMass => "Fat Free Mass",
            Self::FatRatio => "Fat Ratio",
            Self::FatMassWeight => "Fat Mass Weight",
            Self::MuscleMass => "Muscle Mass",
            Self::Hydration => "Hydration",
            Self::BoneMass => "Bone Mass",
            Self::Unknown(_) => "unknown",
        }
    }

    /// Display unit suffix; empty for unknown types.
    #[must_use]
    pub const fn unit_suffix(self) -> &'static str {
        match self {
            Self::Weight
            | Self::FatFreeMass
            | Self::FatMassWeight
            | Self::MuscleMass
            | Self::Hydration
            | Self::BoneMass => "kg",
            Self::Height => "meter",
            Self::FatRatio => "%",
            Self::Unknown(_) => "",
        }
    }
}

/// One scaled reading: type code, raw integer value, power-of-ten exponent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeasureValue {
    measure_type: MeasureType,
    raw_value: i64,
    unit_exponent: i32,
}

impl MeasureValue {
    /// Build a measure from its wire components.
    #[must_use]
    pub const fn new(measure_type: MeasureType, raw_value: i64, unit_exponent: i32) -> Self {
        Self {
            measure_type,
            raw_value,
            unit_exponent,
        }
    }

    /// The measurement type.
    #[must_use]
    pub const fn measure_type(&self) -> MeasureType {
        self.measure_type
    }

    /// The undecoded integer value as sent by the server.
    #[must_use]
    pub const fn raw_value(&self) -> i64 {
        self.raw_value
    }

    /// The power-of-ten exponent applied by [`MeasureValue::value`].
    #[must_use]
    pub const fn unit_exponent(&self) -> i32 {
        self.unit_exponent
    }

    /// Decoded real-world value: `raw_value * 10^unit_exponent`.
    #[must_use]
    pub fn value(&self) -> f64 {
        self.raw_value as f64 * 10f64.powi(self.unit_exponent)
    }
}

impl fmt::Display for MeasureValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let suffix = self.measure_type.unit_suffix();
        if suffix.is_empty() {
            write!(f, "{}: {}", self.measure_type.name(), self.value())
        } else {
            write!(f, "{}: {} {}", self.measure_type.name(), self.value(), suffix)
        }
    }
}

/// A timestamped set of related measurements taken together.
///
/// Measures keep the server-returned order, which is meaningful only for
/// display. Immutable after construction.
#[derive(Debug, Clone)]
pub struct MeasureGroup {
    group_id: i64,
    attribution: i64,
    taken_at: i64,
    category: i64,
    measures: Vec<MeasureValue>,
}

impl MeasureGroup {
    /// Build a group from decoded parts.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedMeasureGroup`] when `measures` is empty; a
    /// group with nothing in it indicates a broken server record and must
    /// not propagate silently.
    pub fn new(
        group_id: i64,
        attribution: i64,
        taken_at: i64,
        category: i64,
        measures: Vec<MeasureValue>,
    ) -> Result<Self> {
        if measures.is_empty() {
            return Err(Error::MalformedMeasureGroup { group_id });
        }
        Ok(Self {
            group_id,
            attribution,
            taken_at,
            category,
            measures,
        })
    }

    /// Server-side group id.
    #[must_use]
    pub const fn group_id(&self) -> i64 {
        self.group_id
    }

    /// Attribution flag (who the measurement is attributed to).
    #[must_use]
    pub const fn attribution(&self) -> i64 {
        self.attribution
    }

    /// Unix timestamp (seconds) of the measurement.
    #[must_use]
    pub const fn taken_at(&self) -> i64 {
        self.taken_at
    }

    /// Measurement category.
    #[must_use]
    pub const fn category(&self) -> i64 {
        self.category
    }

    /// Measures in server order.
    #[must_use]
    pub fn measures(&self) -> &[MeasureValue] {
        &self.measures
    }

    /// The measurement instant as a UTC datetime. A timestamp outside the
    /// representable range falls back to the Unix epoch.
    #[must_use]
    pub fn datetime(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.taken_at, 0).unwrap_or(DateTime::UNIX_EPOCH)
    }

    /// Iterate over the measures in server order.
    pub fn iter(&self) -> std::slice::Iter<'_, MeasureValue> {
        self.measures.iter()
    }

    /// Number of measures in the group.
    #[must_use]
    pub fn len(&self) -> usize {
        self.measures.len()
    }

    /// Always false for a group built through [`MeasureGroup::new`].
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.measures.is_empty()
    }

    /// Decoded value of the first measure of the given type, in server
    /// order. First match wins when a group carries duplicate types.
    #[must_use]
    pub fn value_of(&self, measure_type: MeasureType) -> Option<f64> {
        self.measures
            .iter()
            .find(|m| m.measure_type() == measure_type)
            .map(MeasureValue::value)
    }

    /// Body weight in kg, when present.
    #[must_use]
    pub fn weight(&self) -> Option<f64> {
        self.value_of(MeasureType::Weight)
    }

    /// Fat ratio in percent, when present.
    #[must_use]
    pub fn fat_ratio(&self) -> Option<f64> {
        self.value_of(MeasureType::FatRatio)
    }

    /// Muscle mass in kg, when present.
    #[must_use]
    pub fn muscle_mass(&self) -> Option<f64> {
        self.value_of(MeasureType::MuscleMass)
    }

    /// Body water in kg, when present.
    #[must_use]
    pub fn hydration(&self) -> Option<f64> {
        self.value_of(MeasureType::Hydration)
    }

    /// Bone mass in kg, when present.
    #[must_use]
    pub fn bone_mass(&self) -> Option<f64> {
        self.value_of(MeasureType::BoneMass)
    }
}

impl<'a> IntoIterator for &'a MeasureGroup {
    type Item = &'a MeasureValue;
    type IntoIter = std::slice::Iter<'a, MeasureValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.measures.iter()
    }
}

// Wire format structures as returned by the measurements endpoint.

/// Raw measure record: `{value, type, unit}`.
#[derive(Debug, Deserialize)]
pub struct RawMeasure {
    /// Undecoded integer value.
    pub value: i64,
    /// Vendor type code.
    #[serde(rename = "type")]
    pub kind: u32,
    /// Power-of-ten unit exponent.
    pub unit: i32,
}

/// Raw measure group record: `{grpid, attrib, date, category, measures}`.
#[derive(Debug, Deserialize)]
pub struct RawMeasureGroup {
    /// Server-side group id.
    pub grpid: i64,
    /// Attribution flag.
    pub attrib: i64,
    /// Unix timestamp (seconds).
    pub date: i64,
    /// Measurement category.
    pub category: i64,
    /// Measure records in server order.
    pub measures: Vec<RawMeasure>,
}

impl From<RawMeasure> for MeasureValue {
    fn from(raw: RawMeasure) -> Self {
        Self::new(MeasureType::from_code(raw.kind), raw.value, raw.unit)
    }
}

impl TryFrom<RawMeasureGroup> for MeasureGroup {
    type Error = Error;

    fn try_from(raw: RawMeasureGroup) -> Result<Self> {
        let measures = raw.measures.into_iter().map(MeasureValue::from).collect();
        Self::new(raw.grpid, raw.attrib, raw.date, raw.category, measures)
    }
}

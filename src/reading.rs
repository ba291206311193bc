// Meter Synth - Reading types
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Interval reading types.

use crate::error::ConfigError;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Energy-flow category of a reading.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub enum MeasurementClass {
    /// Active import.
    #[default]
    AI,
    /// Active export.
    AE,
    /// Reactive import.
    RI,
    /// Reactive export.
    RE,
}

impl MeasurementClass {
    /// Two-letter wire code.
    pub fn code(&self) -> &'static str {
        match self {
            MeasurementClass::AI => "AI",
            MeasurementClass::AE => "AE",
            MeasurementClass::RI => "RI",
            MeasurementClass::RE => "RE",
        }
    }

    /// Unit label for values of this class.
    pub fn unit(&self) -> &'static str {
        match self {
            MeasurementClass::AI | MeasurementClass::AE => "kWh",
            MeasurementClass::RI | MeasurementClass::RE => "kVArh",
        }
    }
}

impl fmt::Display for MeasurementClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for MeasurementClass {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "AI" => Ok(MeasurementClass::AI),
            "AE" => Ok(MeasurementClass::AE),
            "RI" => Ok(MeasurementClass::RI),
            "RE" => Ok(MeasurementClass::RE),
            _ => Err(ConfigError::UnknownMeasurementClass(s.to_string())),
        }
    }
}

/// Provenance of a reading value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum QualityFlag {
    #[default]
    Actual,
    Estimated,
    Missing,
    Corrected,
}

impl QualityFlag {
    /// Single-letter wire code.
    pub fn code(&self) -> &'static str {
        match self {
            QualityFlag::Actual => "A",
            QualityFlag::Estimated => "E",
            QualityFlag::Missing => "M",
            QualityFlag::Corrected => "X",
        }
    }
}

/// One consumption value for one entity and one period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    /// Internal entity identifier.
    pub entity_id: Uuid,
    /// 13-digit external identifier.
    pub external_id: String,
    /// Period start (UTC).
    pub timestamp: DateTime<Utc>,
    /// 1-based period index within the day.
    pub period: u32,
    /// Consumption, non-negative, 2 decimal places.
    pub value: Decimal,
    /// Measurement class.
    pub class: MeasurementClass,
    /// Quality flag.
    #[serde(default)]
    pub quality: QualityFlag,
    /// Name of the profile that produced the value.
    pub profile: String,
    /// Unit label.
    pub unit: String,
}

impl Reading {
    /// Calendar date of the period.
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date_naive()
    }
}

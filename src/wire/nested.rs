// Meter Synth - Nested wire format
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Nested JSON wire format.
//!
//! ```text
//! { "<ExternalId>": { "MC": { "<class>": { "<YYYY-MM-DD>": {
//!     "<period>": { "period": 1, "value": 12.30, "qualityFlag": "A", "unit": "kWh" },
//!     ...
//! }}}}}
//! ```
//!
//! At 30-minute granularity every date also carries entries `49` and `50`
//! with a null value and a null quality flag. Downstream consumers of this
//! layout expect them; 15- and 5-minute dates are never padded.

use super::{fixed_2dp, WireError};
use crate::calendar::Granularity;
use crate::reading::{MeasurementClass, Reading};
use chrono::NaiveDate;
use serde::Serialize;
use serde_json::value::RawValue;
use std::collections::BTreeMap;
use std::io::Write;

/// Extra period keys added to every date at 48 periods per day.
pub const PADDING_PERIODS: [u32; 2] = [49, 50];

/// Periods per day that trigger padding.
const PADDED_PERIODS_PER_DAY: u32 = 48;

/// One period entry.
#[derive(Debug, Clone, Serialize)]
pub struct NestedEntry {
    pub period: u32,
    /// Two-decimal number, `null` for padding.
    pub value: Option<Box<RawValue>>,
    #[serde(rename = "qualityFlag")]
    pub quality_flag: Option<&'static str>,
    pub unit: String,
}

impl NestedEntry {
    fn from_reading(reading: &Reading) -> Result<Self, WireError> {
        Ok(Self {
            period: reading.period,
            value: Some(RawValue::from_string(fixed_2dp(reading.value))?),
            quality_flag: Some(reading.quality.code()),
            unit: reading.unit.clone(),
        })
    }

    fn placeholder(period: u32, unit: &str) -> Self {
        Self {
            period,
            value: None,
            quality_flag: None,
            unit: unit.to_string(),
        }
    }

    /// Whether this is a padding entry.
    pub fn is_placeholder(&self) -> bool {
        self.value.is_none()
    }
}

/// Periods of one date.
pub type DateEntries = BTreeMap<u32, NestedEntry>;

/// Dates of one class.
pub type ClassEntries = BTreeMap<NaiveDate, DateEntries>;

/// Readings of one entity, grouped by class.
#[derive(Debug, Clone, Default, Serialize)]
pub struct NestedEntity {
    #[serde(rename = "MC")]
    pub classes: BTreeMap<MeasurementClass, ClassEntries>,
}

/// Full nested document, keyed by external id.
pub type NestedDocument = BTreeMap<String, NestedEntity>;

/// Groups readings into the nested layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NestedEncoder {
    granularity: Granularity,
}

impl NestedEncoder {
    /// Create an encoder for readings of `granularity`.
    pub fn new(granularity: Granularity) -> Self {
        Self { granularity }
    }

    /// Granularity the encoder pads for.
    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    /// Whether dates get the 49/50 placeholder entries.
    pub fn pads(&self) -> bool {
        self.granularity.periods_per_day() == PADDED_PERIODS_PER_DAY
    }

    /// Build the document.
    ///
    /// Fails with [`WireError::PeriodOutOfRange`] if a reading's period does
    /// not exist at the encoder's granularity.
    pub fn document<'a>(
        &self,
        readings: impl IntoIterator<Item = &'a Reading>,
    ) -> Result<NestedDocument, WireError> {
        let periods_per_day = self.granularity.periods_per_day();
        let mut document = NestedDocument::new();
        for reading in readings {
            if reading.period == 0 || reading.period > periods_per_day {
                return Err(WireError::PeriodOutOfRange {
                    period: reading.period,
                    periods_per_day,
                });
            }
            document
                .entry(reading.external_id.clone())
                .or_default()
                .classes
                .entry(reading.class)
                .or_default()
                .entry(reading.date())
                .or_default()
                .insert(reading.period, NestedEntry::from_reading(reading)?);
        }

        if self.pads() {
            for entity in document.values_mut() {
                for (class, dates) in entity.classes.iter_mut() {
                    for periods in dates.values_mut() {
                        for period in PADDING_PERIODS {
                            periods
                                .entry(period)
                                .or_insert_with(|| NestedEntry::placeholder(period, class.unit()));
                        }
                    }
                }
            }
        }

        Ok(document)
    }

    /// Encode to a compact JSON string.
    pub fn to_string<'a>(
        &self,
        readings: impl IntoIterator<Item = &'a Reading>,
    ) -> Result<String, WireError> {
        Ok(serde_json::to_string(&self.document(readings)?)?)
    }

    /// Encode as pretty JSON into `writer`.
    pub fn to_writer<'a, W: Write>(
        &self,
        readings: impl IntoIterator<Item = &'a Reading>,
        writer: W,
    ) -> Result<(), WireError> {
        serde_json::to_writer_pretty(writer, &self.document(readings)?)?;
        Ok(())
    }
}

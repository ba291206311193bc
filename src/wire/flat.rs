// Meter Synth - Flat wire format
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Flat CSV wire format, one row per reading.

use super::{fixed_2dp, WireError};
use crate::reading::Reading;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashMap;
use std::io::Write;
use uuid::Uuid;

/// Column names, in order.
pub const FLAT_HEADER: [&str; 8] = [
    "ExternalId",
    "Site",
    "MeasurementClass",
    "Date",
    "Period",
    "Value",
    "QualityFlag",
    "Unit",
];

/// One flat row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlatRow<'a> {
    pub external_id: &'a str,
    pub site: &'a str,
    pub class: &'static str,
    pub date: NaiveDate,
    pub period: u32,
    /// Exactly two decimals.
    pub value: String,
    pub quality_flag: &'static str,
    pub unit: &'a str,
}

impl<'a> FlatRow<'a> {
    /// Row for `reading` under `site`.
    pub fn from_reading(reading: &'a Reading, site: &'a str) -> Self {
        Self {
            external_id: &reading.external_id,
            site,
            class: reading.class.code(),
            date: reading.date(),
            period: reading.period,
            value: fixed_2dp(reading.value),
            quality_flag: reading.quality.code(),
            unit: &reading.unit,
        }
    }
}

/// Incremental flat writer.
///
/// The header is written on construction, so even an empty run yields a
/// well-formed file. Rows are written in the order they are given.
pub struct FlatEncoder<W: Write> {
    writer: csv::Writer<W>,
    site: String,
    rows: u64,
}

impl<W: Write> FlatEncoder<W> {
    /// Start a flat file on `writer`.
    pub fn new(writer: W, site: &str) -> Result<Self, WireError> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(writer);
        writer.write_record(FLAT_HEADER)?;
        Ok(Self {
            writer,
            site: site.to_string(),
            rows: 0,
        })
    }

    /// Write one reading.
    pub fn write(&mut self, reading: &Reading) -> Result<(), WireError> {
        self.writer
            .serialize(FlatRow::from_reading(reading, &self.site))?;
        self.rows += 1;
        Ok(())
    }

    /// Rows written so far.
    pub fn rows(&self) -> u64 {
        self.rows
    }

    /// Flush buffered rows to the underlying writer.
    pub fn flush(&mut self) -> Result<(), WireError> {
        self.writer.flush()?;
        Ok(())
    }

    /// Flush and return the underlying writer.
    pub fn finish(self) -> Result<W, WireError> {
        self.writer
            .into_inner()
            .map_err(|e| WireError::Io(e.into_error()))
    }
}

/// Readings in flat row order: by entity (first appearance), then
/// timestamp, then period.
pub fn flat_order(readings: &[Reading]) -> Vec<&Reading> {
    let mut first_seen: HashMap<Uuid, usize> = HashMap::new();
    for reading in readings {
        let next = first_seen.len();
        first_seen.entry(reading.entity_id).or_insert(next);
    }

    let mut ordered: Vec<&Reading> = readings.iter().collect();
    ordered.sort_by_key(|r| (first_seen[&r.entity_id], r.timestamp, r.period));
    ordered
}

/// Encode readings into `writer` in flat row order.
pub fn encode_flat<W: Write>(readings: &[Reading], site: &str, writer: W) -> Result<W, WireError> {
    let mut encoder = FlatEncoder::new(writer, site)?;
    for reading in flat_order(readings) {
        encoder.write(reading)?;
    }
    encoder.finish()
}

/// Encode readings to a string.
pub fn encode_flat_string(readings: &[Reading], site: &str) -> Result<String, WireError> {
    let bytes = encode_flat(readings, site, Vec::new())?;
    String::from_utf8(bytes)
        .map_err(|e| WireError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reading::{MeasurementClass, QualityFlag};
    use chrono::{TimeZone, Utc};
    use rust_decimal::Decimal;

    fn reading(entity: u128, hour: u32, period: u32, cents: i64) -> Reading {
        Reading {
            entity_id: Uuid::from_u128(entity),
            external_id: format!("{:013}", entity),
            timestamp: Utc.with_ymd_and_hms(2024, 6, 15, hour, 0, 0).unwrap(),
            period,
            value: Decimal::new(cents, 2),
            class: MeasurementClass::RE,
            quality: QualityFlag::Actual,
            profile: "Office".to_string(),
            unit: "kVArh".to_string(),
        }
    }

    #[test]
    fn test_header_and_row() {
        let out = encode_flat_string(&[reading(7, 0, 1, 1230)], "Plant A").unwrap();
        let mut lines = out.lines();
        assert_eq!(
            lines.next(),
            Some("ExternalId,Site,MeasurementClass,Date,Period,Value,QualityFlag,Unit")
        );
        assert_eq!(
            lines.next(),
            Some("0000000000007,Plant A,RE,2024-06-15,1,12.30,A,kVArh")
        );
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn test_empty_has_header() {
        let out = encode_flat_string(&[], "").unwrap();
        assert_eq!(out.lines().count(), 1);
    }

    #[test]
    fn test_quality_codes() {
        let flags = [
            (QualityFlag::Actual, "A"),
            (QualityFlag::Estimated, "E"),
            (QualityFlag::Missing, "M"),
            (QualityFlag::Corrected, "X"),
        ];
        for (flag, code) in flags {
            let mut r = reading(1, 0, 1, 100);
            r.quality = flag;
            assert_eq!(FlatRow::from_reading(&r, "").quality_flag, code);
        }
    }

    #[test]
    fn test_order_entity_then_time() {
        let readings = vec![
            reading(2, 1, 3, 100),
            reading(1, 0, 1, 100),
            reading(2, 0, 1, 100),
            reading(1, 1, 3, 100),
        ];
        let ordered: Vec<(u128, u32)> = flat_order(&readings)
            .iter()
            .map(|r| (r.entity_id.as_u128(), r.period))
            .collect();
        assert_eq!(ordered, vec![(2, 1), (2, 3), (1, 1), (1, 3)]);
    }

    #[test]
    fn test_site_with_comma_quoted() {
        let out = encode_flat_string(&[reading(7, 0, 1, 5)], "North, East").unwrap();
        assert!(out.contains("\"North, East\""));
        assert!(out.contains(",0.05,"));
    }

    #[test]
    fn test_incremental_rows() {
        let mut encoder = FlatEncoder::new(Vec::new(), "S").unwrap();
        encoder.write(&reading(1, 0, 1, 100)).unwrap();
        encoder.write(&reading(1, 1, 3, 100)).unwrap();
        assert_eq!(encoder.rows(), 2);
        let bytes = encoder.finish().unwrap();
        assert_eq!(String::from_utf8(bytes).unwrap().lines().count(), 3);
    }
}

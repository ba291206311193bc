// Meter Synth - Reading generator
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Per-entity reading generation.
//!
//! A [`ReadingGenerator`] binds one profile to one random source and
//! turns into a lazy [`Readings`] iterator for a single entity. Each
//! `next()` computes exactly one period and draws exactly one noise value,
//! so memory stays constant whatever the date range.

use crate::calendar::Granularity;
use crate::config::GenerationConfig;
use crate::error::{ConfigError, Result};
use crate::profiles::registry::SharedProfile;
use crate::profiles::compose_consumption;
use crate::random::RandomSource;
use crate::reading::{MeasurementClass, QualityFlag, Reading};
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use std::iter::FusedIterator;
use uuid::Uuid;

/// Date range, period length and class shared by every entity of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationWindow {
    /// First day generated.
    pub start_date: NaiveDate,
    /// Last day generated (inclusive).
    pub end_date: NaiveDate,
    /// Period length.
    pub granularity: Granularity,
    /// Measurement class.
    pub class: MeasurementClass,
}

impl GenerationWindow {
    /// Create a window.
    pub fn new(
        start_date: NaiveDate,
        end_date: NaiveDate,
        granularity: Granularity,
        class: MeasurementClass,
    ) -> Self {
        Self {
            start_date,
            end_date,
            granularity,
            class,
        }
    }

    /// Window of a generation config.
    pub fn from_config(config: &GenerationConfig) -> Self {
        Self::new(
            config.start_date,
            config.end_date,
            config.granularity,
            config.class,
        )
    }

    /// Readings per entity.
    pub fn reading_count(&self) -> u64 {
        crate::calendar::days_in_range(self.start_date, self.end_date)
            * u64::from(self.granularity.periods_per_day())
    }
}

/// One profile bound to one random source.
#[derive(Debug)]
pub struct ReadingGenerator {
    profile: SharedProfile,
    rng: RandomSource,
}

impl ReadingGenerator {
    /// Create a generator.
    pub fn new(profile: SharedProfile, rng: RandomSource) -> Self {
        Self { profile, rng }
    }

    /// Whether the bound random source is reproducible.
    pub fn is_deterministic(&self) -> bool {
        self.rng.is_deterministic()
    }

    /// Lazy readings for one entity over `window`.
    ///
    /// Consumes the generator: a sequence is restarted by building a new
    /// generator, never by resuming a partially consumed one.
    pub fn generate(
        self,
        entity_id: Uuid,
        external_id: &str,
        window: &GenerationWindow,
    ) -> Result<Readings> {
        if window.end_date < window.start_date {
            return Err(ConfigError::InvalidDateRange {
                start: window.start_date,
                end: window.end_date,
            }
            .into());
        }
        if external_id.trim().is_empty() {
            return Err(ConfigError::BlankIdentifier {
                parameter: "external_id",
            }
            .into());
        }

        Ok(self.start(entity_id, external_id.to_string(), window))
    }

    /// Sequence for arguments already validated by the caller.
    pub(crate) fn start(
        self,
        entity_id: Uuid,
        external_id: String,
        window: &GenerationWindow,
    ) -> Readings {
        Readings {
            profile_name: self.profile.name().to_string(),
            profile: self.profile,
            rng: self.rng,
            entity_id,
            external_id,
            class: window.class,
            granularity: window.granularity,
            day_start: midnight(window.start_date),
            next_period: 1,
            remaining: window.reading_count(),
        }
    }
}

/// Lazy, finite, single-pass reading sequence for one entity.
#[derive(Debug)]
pub struct Readings {
    profile: SharedProfile,
    profile_name: String,
    rng: RandomSource,
    entity_id: Uuid,
    external_id: String,
    class: MeasurementClass,
    granularity: Granularity,
    day_start: DateTime<Utc>,
    next_period: u32,
    remaining: u64,
}

impl Readings {
    /// Internal id of the entity.
    pub fn entity_id(&self) -> Uuid {
        self.entity_id
    }

    /// External id of the entity.
    pub fn external_id(&self) -> &str {
        &self.external_id
    }
}

impl Iterator for Readings {
    type Item = Reading;

    fn next(&mut self) -> Option<Reading> {
        if self.remaining == 0 {
            return None;
        }

        let period = self.next_period;
        let offset = i64::from((period - 1) * self.granularity.minutes());
        let timestamp = self.day_start + Duration::minutes(offset);
        let value = compose_consumption(self.profile.as_ref(), &timestamp, &mut self.rng);

        self.remaining -= 1;
        if period == self.granularity.periods_per_day() {
            self.next_period = 1;
            self.day_start += Duration::days(1);
        } else {
            self.next_period = period + 1;
        }

        Some(Reading {
            entity_id: self.entity_id,
            external_id: self.external_id.clone(),
            timestamp,
            period,
            value,
            class: self.class,
            quality: QualityFlag::Actual,
            profile: self.profile_name.clone(),
            unit: self.class.unit().to_string(),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = usize::try_from(self.remaining).unwrap_or(usize::MAX);
        (n, Some(n))
    }
}

impl ExactSizeIterator for Readings {}

impl FusedIterator for Readings {}

fn midnight(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::period_index;
    use crate::error::SynthError;
    use crate::profiles::OfficeProfile;
    use rust_decimal::Decimal;
    use std::sync::Arc;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn generator(seed: u64) -> ReadingGenerator {
        ReadingGenerator::new(Arc::new(OfficeProfile::new()), RandomSource::seeded(seed))
    }

    fn window(start: NaiveDate, end: NaiveDate, g: Granularity) -> GenerationWindow {
        GenerationWindow::new(start, end, g, MeasurementClass::AI)
    }

    #[test]
    fn test_single_day_half_hourly() {
        let w = window(date(2024, 6, 15), date(2024, 6, 15), Granularity::ThirtyMinutes);
        let readings: Vec<Reading> = generator(42)
            .generate(Uuid::from_u128(1), "1234567890126", &w)
            .unwrap()
            .collect();

        assert_eq!(readings.len(), 48);
        assert_eq!(readings[0].period, 1);
        assert_eq!(readings[47].period, 48);
        assert_eq!(
            readings[0].timestamp,
            Utc.with_ymd_and_hms(2024, 6, 15, 0, 0, 0).unwrap()
        );
        assert_eq!(
            readings[47].timestamp,
            Utc.with_ymd_and_hms(2024, 6, 15, 23, 30, 0).unwrap()
        );
        for r in &readings {
            assert_eq!(r.quality, QualityFlag::Actual);
            assert_eq!(r.profile, "Office");
            assert_eq!(r.unit, "kWh");
            assert_eq!(r.external_id, "1234567890126");
        }
    }

    #[test]
    fn test_periods_consistent_with_calendar() {
        let w = window(date(2024, 2, 28), date(2024, 3, 1), Granularity::FiveMinutes);
        let readings: Vec<Reading> = generator(1)
            .generate(Uuid::from_u128(1), "1234567890126", &w)
            .unwrap()
            .collect();

        assert_eq!(readings.len(), 3 * 288);
        for r in &readings {
            assert_eq!(period_index(&r.timestamp, Granularity::FiveMinutes), r.period);
        }
        assert_eq!(readings[288].date(), date(2024, 2, 29));
        assert_eq!(readings[288].period, 1);
        assert_eq!(readings.last().unwrap().date(), date(2024, 3, 1));
    }

    #[test]
    fn test_values_non_negative_two_decimals() {
        let w = window(date(2024, 1, 1), date(2024, 1, 7), Granularity::FifteenMinutes);
        for r in generator(9)
            .generate(Uuid::from_u128(1), "1234567890126", &w)
            .unwrap()
        {
            assert!(r.value >= Decimal::ZERO);
            assert!(r.value.scale() <= 2);
        }
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let w = window(date(2024, 6, 1), date(2024, 6, 3), Granularity::ThirtyMinutes);
        let a: Vec<Reading> = generator(5)
            .generate(Uuid::from_u128(1), "1234567890126", &w)
            .unwrap()
            .collect();
        let b: Vec<Reading> = generator(5)
            .generate(Uuid::from_u128(1), "1234567890126", &w)
            .unwrap()
            .collect();
        let c: Vec<Reading> = generator(6)
            .generate(Uuid::from_u128(1), "1234567890126", &w)
            .unwrap()
            .collect();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_exact_size() {
        let w = window(date(2024, 6, 1), date(2024, 6, 2), Granularity::FifteenMinutes);
        let mut readings = generator(5)
            .generate(Uuid::from_u128(1), "1234567890126", &w)
            .unwrap();
        assert_eq!(readings.len(), 192);
        readings.next();
        assert_eq!(readings.len(), 191);
        assert_eq!(readings.by_ref().count(), 191);
        assert!(readings.next().is_none());
    }

    #[test]
    fn test_inverted_range_rejected() {
        let w = window(date(2024, 6, 2), date(2024, 6, 1), Granularity::ThirtyMinutes);
        let err = generator(1)
            .generate(Uuid::from_u128(1), "1234567890126", &w)
            .unwrap_err();
        assert!(matches!(
            err,
            SynthError::Config(ConfigError::InvalidDateRange { .. })
        ));
    }

    #[test]
    fn test_blank_external_id_rejected() {
        let w = window(date(2024, 6, 1), date(2024, 6, 1), Granularity::ThirtyMinutes);
        let err = generator(1)
            .generate(Uuid::from_u128(1), "  ", &w)
            .unwrap_err();
        assert_eq!(
            err,
            SynthError::Config(ConfigError::BlankIdentifier {
                parameter: "external_id"
            })
        );
    }
}

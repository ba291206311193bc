// Meter Synth - Calendar arithmetic
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Period arithmetic.
//!
//! A day is partitioned into fixed-length periods numbered from 1.
//! Period 1 always starts at midnight UTC of its date.

use crate::error::{CalendarError, ConfigError};
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Timelike, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Minutes in a day.
pub const MINUTES_PER_DAY: u32 = 1440;

/// Interval length of a reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum Granularity {
    /// 5-minute periods, 288 per day.
    FiveMinutes,
    /// 15-minute periods, 96 per day.
    FifteenMinutes,
    /// 30-minute periods, 48 per day.
    #[default]
    ThirtyMinutes,
}

impl Granularity {
    /// All supported granularities, finest first.
    pub const ALL: [Granularity; 3] = [
        Granularity::FiveMinutes,
        Granularity::FifteenMinutes,
        Granularity::ThirtyMinutes,
    ];

    /// Parse from a minute count.
    pub fn from_minutes(minutes: u32) -> Result<Self, ConfigError> {
        match minutes {
            5 => Ok(Granularity::FiveMinutes),
            15 => Ok(Granularity::FifteenMinutes),
            30 => Ok(Granularity::ThirtyMinutes),
            _ => Err(ConfigError::UnsupportedGranularity { minutes }),
        }
    }

    /// Length of one period in minutes.
    pub fn minutes(&self) -> u32 {
        match self {
            Granularity::FiveMinutes => 5,
            Granularity::FifteenMinutes => 15,
            Granularity::ThirtyMinutes => 30,
        }
    }

    /// Number of periods in a day.
    pub fn periods_per_day(&self) -> u32 {
        MINUTES_PER_DAY / self.minutes()
    }
}

impl TryFrom<u32> for Granularity {
    type Error = ConfigError;

    fn try_from(minutes: u32) -> Result<Self, Self::Error> {
        Granularity::from_minutes(minutes)
    }
}

impl From<Granularity> for u32 {
    fn from(granularity: Granularity) -> Self {
        granularity.minutes()
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}min", self.minutes())
    }
}

/// 1-based period index of a timestamp within its day.
pub fn period_index(timestamp: &DateTime<Utc>, granularity: Granularity) -> u32 {
    let minutes_since_midnight = timestamp.hour() * 60 + timestamp.minute();
    minutes_since_midnight / granularity.minutes() + 1
}

/// Start timestamp of period `index` on `date`.
///
/// Exact inverse of [`period_index`] for every index in
/// `1..=granularity.periods_per_day()`.
pub fn period_start(
    date: NaiveDate,
    index: u32,
    granularity: Granularity,
) -> Result<DateTime<Utc>, CalendarError> {
    let max = granularity.periods_per_day();
    if index == 0 || index > max {
        return Err(CalendarError::PeriodOutOfRange { index, max });
    }
    let midnight = date.and_time(NaiveTime::MIN);
    let offset = Duration::minutes(i64::from((index - 1) * granularity.minutes()));
    Ok(Utc.from_utc_datetime(&(midnight + offset)))
}

/// Periods in a day for a granularity given in minutes.
pub fn periods_per_day(minutes: u32) -> Result<u32, ConfigError> {
    Ok(Granularity::from_minutes(minutes)?.periods_per_day())
}

/// Number of calendar days in `[start, end]`, or 0 when inverted.
pub fn days_in_range(start: NaiveDate, end: NaiveDate) -> u64 {
    if end < start {
        return 0;
    }
    (end - start).num_days() as u64 + 1
}

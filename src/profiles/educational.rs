// Meter Synth - Educational profile
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! School and campus load.
//!
//! Teaching day 08-16 with evening activities, near-idle weekends, and a
//! summer holiday trough in July and August instead of a cooling peak.

use super::{hourly, hundredths, ConsumptionProfile};
use chrono::{DateTime, Datelike, Utc, Weekday};
use rust_decimal::Decimal;

const TIME_OF_DAY: [i64; 24] = [
    20, 20, 20, 20, 20, 20, // 00-05
    25, 50, 100, 100, 100, 100, // 06-11
    100, 100, 100, 100, 70, 70, // 12-17
    45, 45, 45, 45, 20, 20, // 18-23
];

#[derive(Debug, Clone)]
pub struct EducationalProfile {
    base_load_kwh: Decimal,
}

impl EducationalProfile {
    /// Registry name.
    pub const NAME: &'static str = "Educational";

    pub fn new() -> Self {
        Self {
            base_load_kwh: hundredths(1800),
        }
    }
}

impl Default for EducationalProfile {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsumptionProfile for EducationalProfile {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn base_load(&self, _timestamp: &DateTime<Utc>, _hour: u32) -> Decimal {
        self.base_load_kwh
    }

    fn time_of_day_factor(&self, _timestamp: &DateTime<Utc>, hour: u32) -> Decimal {
        hourly(&TIME_OF_DAY, hour)
    }

    fn day_of_week_factor(&self, timestamp: &DateTime<Utc>) -> Decimal {
        match timestamp.weekday() {
            Weekday::Sat | Weekday::Sun => hundredths(25),
            _ => Decimal::ONE,
        }
    }

    fn seasonal_factor(&self, timestamp: &DateTime<Utc>) -> Decimal {
        match timestamp.month() {
            7 | 8 => hundredths(40),
            12 | 1 | 2 => hundredths(115),
            _ => Decimal::ONE,
        }
    }
}

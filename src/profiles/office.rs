// Meter Synth - Office profile
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Office building load.
//!
//! HVAC and lighting ramp up from 07:00, plateau through business hours
//! with a small lunchtime dip, and fall back to a standby floor in the
//! evening. Weekends run at standby levels.

use super::{hourly, hundredths, ConsumptionProfile};
use chrono::{DateTime, Datelike, Utc, Weekday};
use rust_decimal::Decimal;

/// Hourly shape, in hundredths.
const TIME_OF_DAY: [i64; 24] = [
    30, 30, 30, 30, 30, 32, // 00-05 standby
    45, 70, 90, 100, 100, 100, // 06-11 arrival, morning plateau
    95, 95, 100, 100, 98, 85, // 12-17 lunch dip, afternoon
    60, 45, 38, 35, 32, 30, // 18-23 wind down
];

/// Weekday business-hours profile.
#[derive(Debug, Clone)]
pub struct OfficeProfile {
    base_load_kwh: Decimal,
}

impl OfficeProfile {
    /// Registry name.
    pub const NAME: &'static str = "Office";

    /// Create with the default base load.
    pub fn new() -> Self {
        Self::with_base_load(hundredths(1250))
    }

    /// Create with a custom base load per period.
    pub fn with_base_load(base_load_kwh: Decimal) -> Self {
        Self { base_load_kwh }
    }
}

impl Default for OfficeProfile {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsumptionProfile for OfficeProfile {
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
            Weekday::Sat => hundredths(40),
            Weekday::Sun => hundredths(30),
            Weekday::Fri => hundredths(90),
            _ => Decimal::ONE,
        }
    }
}

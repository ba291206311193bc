// Meter Synth - Retail profile
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Retail store load.
//!
//! Refrigeration keeps a night floor; trading hours run 08-21 with the
//! weekly peak on Saturday. Footfall makes the load noisier than other
//! commercial buildings.

use super::{hourly, hundredths, noise_factor, ConsumptionProfile};
use crate::random::RandomSource;
use chrono::{DateTime, Datelike, Utc, Weekday};
use rust_decimal::Decimal;

/// Noise amplitude for traffic-driven load, in percent.
pub const RETAIL_NOISE_PERCENT: u32 = 12;

const TIME_OF_DAY: [i64; 24] = [
    25, 25, 25, 25, 25, 25, // 00-05 refrigeration only
    30, 45, 75, 100, 100, 100, // 06-11 opening
    100, 100, 100, 100, 100, 100, // 12-17 trading
    95, 90, 80, 55, 35, 28, // 18-23 late trading, close
];

/// Store trading-hours profile.
#[derive(Debug, Clone)]
pub struct RetailProfile {
    base_load_kwh: Decimal,
}

impl RetailProfile {
    /// Registry name.
    pub const NAME: &'static str = "Retail";

    pub fn new() -> Self {
        Self {
            base_load_kwh: hundredths(2200),
        }
    }
}

impl Default for RetailProfile {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsumptionProfile for RetailProfile {
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
            Weekday::Mon | Weekday::Tue | Weekday::Wed => hundredths(90),
            Weekday::Thu => hundredths(95),
            Weekday::Fri => Decimal::ONE,
            Weekday::Sat => hundredths(115),
            Weekday::Sun => hundredths(85),
        }
    }

    fn noise_factor(&self, rng: &mut RandomSource) -> Decimal {
        noise_factor(rng, RETAIL_NOISE_PERCENT)
    }
}

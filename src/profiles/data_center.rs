// Meter Synth - Data center profile
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Data center load.
//!
//! IT load is flat around the clock and the week; cooling adds a mild
//! afternoon bump and a summer uplift. There is no winter heating uplift.

use super::{hundredths, noise_factor, ConsumptionProfile};
use crate::random::RandomSource;
use chrono::{DateTime, Datelike, Utc};
use rust_decimal::Decimal;

/// Noise amplitude for steady 24/7 load, in percent.
pub const DATA_CENTER_NOISE_PERCENT: u32 = 2;

/// Steady 24/7 profile.
#[derive(Debug, Clone)]
pub struct DataCenterProfile {
    it_load_kwh: Decimal,
    cooling_share: Decimal,
}

impl DataCenterProfile {
    /// Registry name.
    pub const NAME: &'static str = "DataCenter";

    pub fn new() -> Self {
        Self {
            it_load_kwh: hundredths(32_000),
            cooling_share: hundredths(25),
        }
    }
}

impl Default for DataCenterProfile {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsumptionProfile for DataCenterProfile {
    fn name(&self) -> &str {
        Self::NAME
    }

    /// IT load plus its cooling overhead.
    fn base_load(&self, _timestamp: &DateTime<Utc>, _hour: u32) -> Decimal {
        self.it_load_kwh * (Decimal::ONE + self.cooling_share)
    }

    fn time_of_day_factor(&self, _timestamp: &DateTime<Utc>, hour: u32) -> Decimal {
        match hour {
            12..=17 => hundredths(104),
            _ => Decimal::ONE,
        }
    }

    fn day_of_week_factor(&self, _timestamp: &DateTime<Utc>) -> Decimal {
        Decimal::ONE
    }

    fn seasonal_factor(&self, timestamp: &DateTime<Utc>) -> Decimal {
        match timestamp.month() {
            6..=8 => hundredths(108),
            _ => Decimal::ONE,
        }
    }

    fn noise_factor(&self, rng: &mut RandomSource) -> Decimal {
        noise_factor(rng, DATA_CENTER_NOISE_PERCENT)
    }
}

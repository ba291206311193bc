// Meter Synth - Manufacturing profile
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Manufacturing plant load.
//!
//! Three production shifts (06-14, 14-22, 22-06) on a high process base
//! load. The night shift runs reduced lines; Saturday runs two shifts and
//! Sunday keeps only continuous processes.

use super::{hundredths, ConsumptionProfile};
use chrono::{DateTime, Datelike, Utc, Weekday};
use rust_decimal::Decimal;

/// Production shift of an hour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shift {
    Early,
    Late,
    Night,
}

impl Shift {
    /// Shift running at `hour`.
    pub fn at_hour(hour: u32) -> Self {
        match hour {
            6..=13 => Shift::Early,
            14..=21 => Shift::Late,
            _ => Shift::Night,
        }
    }
}

/// Three-shift production profile.
#[derive(Debug, Clone)]
pub struct ManufacturingProfile {
    process_load_kwh: Decimal,
    changeover_dip: bool,
}

impl ManufacturingProfile {
    /// Registry name.
    pub const NAME: &'static str = "Manufacturing";

    /// Create with the default process load.
    pub fn new() -> Self {
        Self {
            process_load_kwh: hundredths(8500),
            changeover_dip: true,
        }
    }

    /// Disable the shift changeover dip.
    pub fn without_changeover_dip(mut self) -> Self {
        self.changeover_dip = false;
        self
    }
}

impl Default for ManufacturingProfile {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsumptionProfile for ManufacturingProfile {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn base_load(&self, _timestamp: &DateTime<Utc>, _hour: u32) -> Decimal {
        self.process_load_kwh
    }

    fn time_of_day_factor(&self, _timestamp: &DateTime<Utc>, hour: u32) -> Decimal {
        let shift = match Shift::at_hour(hour) {
            Shift::Early => Decimal::ONE,
            Shift::Late => hundredths(95),
            Shift::Night => hundredths(70),
        };
        // Lines ramp down for handover at 06, 14 and 22
        if self.changeover_dip && matches!(hour, 6 | 14 | 22) {
            shift * hundredths(85)
        } else {
            shift
        }
    }

    fn day_of_week_factor(&self, timestamp: &DateTime<Utc>) -> Decimal {
        match timestamp.weekday() {
            Weekday::Sat => hundredths(80),
            Weekday::Sun => hundredths(50),
            _ => Decimal::ONE,
        }
    }
}

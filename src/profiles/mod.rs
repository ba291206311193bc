// Meter Synth - Consumption profiles
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Consumption profiles.
//!
//! A profile turns a timestamp into four multiplicative factors (base
//! load, time of day, day of week, season) plus a random noise factor.
//! [`compose_consumption`] multiplies them, clamps at zero and rounds to
//! two decimal places exactly once.
//!
//! Seasonal and noise behavior default to [`northern_seasonal_factor`]
//! and [`noise_factor`] with [`DEFAULT_NOISE_PERCENT`]; variants override
//! the trait methods where their load shape differs.
//!
//! ## Built-in profiles
//!
//! - [`office::OfficeProfile`]: weekday business hours
//! - [`manufacturing::ManufacturingProfile`]: three-shift production
//! - [`retail::RetailProfile`]: trading hours, weekend peak
//! - [`data_center::DataCenterProfile`]: steady 24/7 load
//! - [`educational::EducationalProfile`]: term-time school day

pub mod data_center;
pub mod educational;
pub mod manufacturing;
pub mod office;
pub mod registry;
pub mod retail;

pub use data_center::DataCenterProfile;
pub use educational::EducationalProfile;
pub use manufacturing::ManufacturingProfile;
pub use office::OfficeProfile;
pub use registry::ProfileRegistry;
pub use retail::RetailProfile;

use crate::random::RandomSource;
use chrono::{DateTime, Datelike, Timelike, Utc};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use std::fmt;

/// Default noise amplitude, in percent.
pub const DEFAULT_NOISE_PERCENT: u32 = 10;

/// Decimal places of a consumption value.
pub const VALUE_DECIMALS: u32 = 2;

/// Time-dependent consumption model.
///
/// Implementations must return non-negative base loads and factors.
pub trait ConsumptionProfile: Send + Sync + fmt::Debug {
    /// Registry name.
    fn name(&self) -> &str;

    /// Base consumption per period before any factor.
    fn base_load(&self, timestamp: &DateTime<Utc>, hour: u32) -> Decimal;

    /// Multiplier for the hour of day.
    fn time_of_day_factor(&self, timestamp: &DateTime<Utc>, hour: u32) -> Decimal;

    /// Multiplier for the day of week.
    fn day_of_week_factor(&self, timestamp: &DateTime<Utc>) -> Decimal;

    /// Multiplier for the season.
    fn seasonal_factor(&self, timestamp: &DateTime<Utc>) -> Decimal {
        northern_seasonal_factor(timestamp)
    }

    /// Random multiplier around 1.
    fn noise_factor(&self, rng: &mut RandomSource) -> Decimal {
        noise_factor(rng, DEFAULT_NOISE_PERCENT)
    }
}

/// Northern-hemisphere seasons: summer +20%, winter +10%, else neutral.
pub fn northern_seasonal_factor(timestamp: &DateTime<Utc>) -> Decimal {
    match timestamp.month() {
        6..=8 => hundredths(120),
        12 | 1 | 2 => hundredths(110),
        _ => Decimal::ONE,
    }
}

/// Uniform multiplier in `[1 - percent/100, 1 + percent/100)`.
///
/// Draws exactly one uniform from `rng`.
pub fn noise_factor(rng: &mut RandomSource, percent: u32) -> Decimal {
    let u = Decimal::from_f64(rng.next_uniform())
        .unwrap_or(Decimal::ZERO)
        .round_dp(6);
    let amplitude = Decimal::new(i64::from(percent), 2);
    Decimal::ONE + (Decimal::from(2) * u - Decimal::ONE) * amplitude
}

/// Consumption of one period.
///
/// `round(max(0, base × tod × dow × season × noise), 2)`, rounding half
/// to even.
pub fn compose_consumption(
    profile: &dyn ConsumptionProfile,
    timestamp: &DateTime<Utc>,
    rng: &mut RandomSource,
) -> Decimal {
    let hour = timestamp.hour();
    let product = profile.base_load(timestamp, hour)
        * profile.time_of_day_factor(timestamp, hour)
        * profile.day_of_week_factor(timestamp)
        * profile.seasonal_factor(timestamp)
        * profile.noise_factor(rng);

    product
        .max(Decimal::ZERO)
        .round_dp_with_strategy(VALUE_DECIMALS, RoundingStrategy::MidpointNearestEven)
}

/// `value / 100` as a decimal.
pub(crate) fn hundredths(value: i64) -> Decimal {
    Decimal::new(value, 2)
}

/// Look up an hourly factor table expressed in hundredths.
pub(crate) fn hourly(table: &[i64; 24], hour: u32) -> Decimal {
    hundredths(table[(hour % 24) as usize])
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[derive(Debug)]
    struct FixedProfile {
        base: Decimal,
        factor: Decimal,
    }

    impl ConsumptionProfile for FixedProfile {
        fn name(&self) -> &str {
            "Fixed"
        }

        fn base_load(&self, _timestamp: &DateTime<Utc>, _hour: u32) -> Decimal {
            self.base
        }

        fn time_of_day_factor(&self, _timestamp: &DateTime<Utc>, _hour: u32) -> Decimal {
            self.factor
        }

        fn day_of_week_factor(&self, _timestamp: &DateTime<Utc>) -> Decimal {
            Decimal::ONE
        }

        fn seasonal_factor(&self, _timestamp: &DateTime<Utc>) -> Decimal {
            Decimal::ONE
        }

        fn noise_factor(&self, _rng: &mut RandomSource) -> Decimal {
            Decimal::ONE
        }
    }

    #[test]
    fn test_seasonal_defaults() {
        let summer = Utc.with_ymd_and_hms(2024, 7, 1, 12, 0, 0).unwrap();
        let winter = Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap();
        let spring = Utc.with_ymd_and_hms(2024, 4, 10, 12, 0, 0).unwrap();
        let december = Utc.with_ymd_and_hms(2024, 12, 31, 23, 30, 0).unwrap();

        assert_eq!(northern_seasonal_factor(&summer), Decimal::new(12, 1));
        assert_eq!(northern_seasonal_factor(&winter), Decimal::new(11, 1));
        assert_eq!(northern_seasonal_factor(&december), Decimal::new(11, 1));
        assert_eq!(northern_seasonal_factor(&spring), Decimal::ONE);
    }

    #[test]
    fn test_noise_factor_bounds() {
        let mut rng = RandomSource::seeded(42);
        let low = Decimal::new(90, 2);
        let high = Decimal::new(110, 2);
        for _ in 0..10_000 {
            let n = noise_factor(&mut rng, DEFAULT_NOISE_PERCENT);
            assert!(n >= low && n <= high, "noise {} out of bounds", n);
        }

        let mut rng = RandomSource::seeded(42);
        for _ in 0..10_000 {
            let n = noise_factor(&mut rng, 2);
            assert!(n >= Decimal::new(98, 2) && n <= Decimal::new(102, 2));
        }
    }

    #[test]
    fn test_compose_rounds_once() {
        // 1.005 * 1.001 = 1.006005 -> 1.01; rounding the base first would yield 1.00
        let profile = FixedProfile {
            base: Decimal::new(1005, 3),
            factor: Decimal::new(1001, 3),
        };
        let mut rng = RandomSource::seeded(1);
        let ts = Utc.with_ymd_and_hms(2024, 4, 1, 0, 0, 0).unwrap();
        assert_eq!(compose_consumption(&profile, &ts, &mut rng), Decimal::new(101, 2));
    }

    #[test]
    fn test_compose_half_even() {
        let profile = FixedProfile {
            base: Decimal::new(1125, 3),
            factor: Decimal::ONE,
        };
        let mut rng = RandomSource::seeded(1);
        let ts = Utc.with_ymd_and_hms(2024, 4, 1, 0, 0, 0).unwrap();
        assert_eq!(compose_consumption(&profile, &ts, &mut rng), Decimal::new(112, 2));
    }

    #[test]
    fn test_compose_clamps_negative() {
        let profile = FixedProfile {
            base: Decimal::new(5, 0),
            factor: Decimal::new(-1, 0),
        };
        let mut rng = RandomSource::seeded(1);
        let ts = Utc.with_ymd_and_hms(2024, 4, 1, 0, 0, 0).unwrap();
        assert_eq!(compose_consumption(&profile, &ts, &mut rng), Decimal::ZERO);
    }

    #[test]
    fn test_hourly_table_lookup() {
        let table = [
            10, 11, 12, 13, 14, 15, 16, 17, 18, 19, 20, 21, 22, 23, 24, 25, 26, 27, 28, 29, 30,
            31, 32, 33,
        ];
        assert_eq!(hourly(&table, 0), Decimal::new(10, 2));
        assert_eq!(hourly(&table, 23), Decimal::new(33, 2));
    }
}

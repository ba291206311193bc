// Meter Synth - Generation configuration
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Generation configuration.

use crate::calendar::{days_in_range, Granularity};
use crate::error::ConfigError;
use crate::profiles::registry::normalize;
use crate::reading::MeasurementClass;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use xxhash_rust::xxh64::xxh64;

/// Smallest supported entity count.
pub const MIN_ENTITY_COUNT: usize = 1;

/// Largest supported entity count.
pub const MAX_ENTITY_COUNT: usize = 1000;

/// Default profile name.
pub const DEFAULT_PROFILE: &str = "Office";

/// Everything needed to generate one reading set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// First day generated.
    pub start_date: NaiveDate,
    /// Last day generated (inclusive).
    pub end_date: NaiveDate,
    /// Period length.
    pub granularity: Granularity,
    /// Profile name, case-insensitive.
    pub profile: String,
    /// Measurement class of every reading.
    pub class: MeasurementClass,
    /// Number of entities.
    pub entity_count: usize,
    /// Reproducible generation.
    pub deterministic: bool,
    /// Seed, used only when `deterministic` is set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// Explicit internal entity ids.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub entity_ids: Vec<Uuid>,
    /// Site label for the flat wire format.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site: Option<String>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        // 2024-02-01
        let day = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap_or(NaiveDate::MIN);
        Self {
            start_date: day,
            end_date: day,
            granularity: Granularity::default(),
            profile: DEFAULT_PROFILE.to_string(),
            class: MeasurementClass::default(),
            entity_count: 1,
            deterministic: false,
            seed: None,
            entity_ids: Vec::new(),
            site: None,
        }
    }
}

impl GenerationConfig {
    /// Create a config covering `[start_date, end_date]`.
    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            start_date,
            end_date,
            ..Default::default()
        }
    }

    /// Set period length.
    pub fn with_granularity(mut self, granularity: Granularity) -> Self {
        self.granularity = granularity;
        self
    }

    /// Set profile name.
    pub fn with_profile(mut self, profile: &str) -> Self {
        self.profile = profile.to_string();
        self
    }

    /// Set measurement class.
    pub fn with_class(mut self, class: MeasurementClass) -> Self {
        self.class = class;
        self
    }

    /// Set number of entities.
    pub fn with_entity_count(mut self, n: usize) -> Self {
        self.entity_count = n;
        self
    }

    /// Enable or disable reproducible generation.
    pub fn with_deterministic(mut self, deterministic: bool) -> Self {
        self.deterministic = deterministic;
        self
    }

    /// Set seed and enable reproducible generation.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self.deterministic = true;
        self
    }

    /// Use explicit internal entity ids.
    pub fn with_entity_ids(mut self, ids: impl IntoIterator<Item = Uuid>) -> Self {
        self.entity_ids = ids.into_iter().collect();
        self
    }

    /// Set site label.
    pub fn with_site(mut self, site: &str) -> Self {
        self.site = Some(site.to_string());
        self
    }

    /// Check range, count and profile name.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.end_date < self.start_date {
            return Err(ConfigError::InvalidDateRange {
                start: self.start_date,
                end: self.end_date,
            });
        }
        if !(MIN_ENTITY_COUNT..=MAX_ENTITY_COUNT).contains(&self.entity_count) {
            return Err(ConfigError::EntityCountOutOfRange {
                count: self.entity_count,
                min: MIN_ENTITY_COUNT,
                max: MAX_ENTITY_COUNT,
            });
        }
        if self.profile.trim().is_empty() {
            return Err(ConfigError::BlankProfileName);
        }
        Ok(())
    }

    /// Number of days covered.
    pub fn days(&self) -> u64 {
        days_in_range(self.start_date, self.end_date)
    }

    /// Seed honoring the deterministic flag.
    pub fn seed(&self) -> Option<u64> {
        if self.deterministic {
            self.seed
        } else {
            None
        }
    }

    /// Seed driving a deterministic run: the explicit seed, or the
    /// configuration fingerprint when none was given. `None` when not
    /// deterministic.
    pub fn effective_seed(&self) -> Option<u64> {
        if self.deterministic {
            Some(self.seed.unwrap_or_else(|| self.fingerprint()))
        } else {
            None
        }
    }

    /// Stable hash of everything except the seed and deterministic flag.
    pub fn fingerprint(&self) -> u64 {
        let ids: Vec<String> = self.entity_ids.iter().map(Uuid::to_string).collect();
        let canonical = format!(
            "{}|{}|{}|{}|{}|{}|{}|{}",
            self.start_date,
            self.end_date,
            self.granularity.minutes(),
            normalize(self.profile.trim()),
            self.class.code(),
            self.entity_count,
            ids.join(","),
            self.site.as_deref().unwrap_or(""),
        );
        xxh64(canonical.as_bytes(), 0)
    }

    /// `days × periods_per_day × entity_count`, without generating anything.
    pub fn expected_reading_count(&self) -> u64 {
        self.days() * u64::from(self.granularity.periods_per_day()) * self.entity_count as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_config_default() {
        let config = GenerationConfig::default();
        assert_eq!(config.granularity, Granularity::ThirtyMinutes);
        assert_eq!(config.profile, "Office");
        assert_eq!(config.class, MeasurementClass::AI);
        assert_eq!(config.entity_count, 1);
        assert!(!config.deterministic);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_date_range() {
        let config = GenerationConfig::new(date(2024, 6, 15), date(2024, 6, 14));
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidDateRange {
                start: date(2024, 6, 15),
                end: date(2024, 6, 14)
            })
        );
    }

    #[test]
    fn test_validate_entity_count() {
        let base = GenerationConfig::new(date(2024, 6, 15), date(2024, 6, 15));
        assert!(base.clone().with_entity_count(1).validate().is_ok());
        assert!(base.clone().with_entity_count(1000).validate().is_ok());
        assert!(matches!(
            base.clone().with_entity_count(0).validate(),
            Err(ConfigError::EntityCountOutOfRange { count: 0, .. })
        ));
        assert!(matches!(
            base.with_entity_count(1001).validate(),
            Err(ConfigError::EntityCountOutOfRange { count: 1001, .. })
        ));
    }

    #[test]
    fn test_validate_blank_profile() {
        let config = GenerationConfig::default().with_profile("   ");
        assert_eq!(config.validate(), Err(ConfigError::BlankProfileName));
    }

    #[test]
    fn test_seed_ignored_when_not_deterministic() {
        let mut config = GenerationConfig::default().with_seed(42);
        assert_eq!(config.seed(), Some(42));
        assert_eq!(config.effective_seed(), Some(42));

        config.deterministic = false;
        assert_eq!(config.seed(), None);
        assert_eq!(config.effective_seed(), None);
    }

    #[test]
    fn test_effective_seed_falls_back_to_fingerprint() {
        let config = GenerationConfig::default().with_deterministic(true);
        assert_eq!(config.effective_seed(), Some(config.fingerprint()));
    }

    #[test]
    fn test_fingerprint_stable_and_sensitive() {
        let a = GenerationConfig::new(date(2024, 1, 1), date(2024, 1, 31)).with_profile("Retail");
        let b = GenerationConfig::new(date(2024, 1, 1), date(2024, 1, 31)).with_profile("retail");
        let c = GenerationConfig::new(date(2024, 1, 1), date(2024, 2, 1)).with_profile("Retail");
        assert_eq!(a.fingerprint(), b.fingerprint());
        assert_ne!(a.fingerprint(), c.fingerprint());
        assert_eq!(a.fingerprint(), a.clone().with_seed(9).fingerprint());
    }

    #[test]
    fn test_fingerprint_follows_profile_lookup() {
        let a = GenerationConfig::new(date(2024, 1, 1), date(2024, 1, 1)).with_profile("DataCenter");
        let b = a.clone().with_profile("data-center");
        let c = a.clone().with_profile(" Data_Center ");
        assert_eq!(a.fingerprint(), b.fingerprint());
        assert_eq!(a.fingerprint(), c.fingerprint());
    }

    #[test]
    fn test_expected_reading_count() {
        let config = GenerationConfig::new(date(2023, 1, 1), date(2023, 12, 31))
            .with_granularity(Granularity::FifteenMinutes);
        assert_eq!(config.expected_reading_count(), 35_040);

        let config = GenerationConfig::new(date(2024, 6, 15), date(2024, 6, 16))
            .with_granularity(Granularity::FiveMinutes)
            .with_entity_count(3);
        assert_eq!(config.expected_reading_count(), 2 * 288 * 3);
    }

    #[test]
    fn test_json_roundtrip() {
        let config = GenerationConfig::new(date(2024, 6, 1), date(2024, 6, 30))
            .with_granularity(Granularity::FifteenMinutes)
            .with_profile("DataCenter")
            .with_class(MeasurementClass::RI)
            .with_entity_count(4)
            .with_seed(7)
            .with_site("North Campus");

        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"granularity\":15"));
        assert!(json.contains("\"class\":\"RI\""));
        let loaded: GenerationConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_json_partial_uses_defaults() {
        let json = r#"{"start_date":"2024-03-01","end_date":"2024-03-02","entity_count":2}"#;
        let config: GenerationConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.entity_count, 2);
        assert_eq!(config.profile, "Office");
        assert_eq!(config.days(), 2);
    }
}

// Meter Synth - Error types
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Error types for meter-synth
//!
//! Configuration, calendar, randomness and profile failures are plain
//! values (`Clone + PartialEq`) so callers can match on them and build
//! user-facing messages. I/O bound failures of the encoders live in
//! [`crate::wire::WireError`].

use chrono::NaiveDate;
use thiserror::Error;

/// Result type alias for generation operations
pub type Result<T> = std::result::Result<T, SynthError>;

/// Main error type for generation operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SynthError {
    /// Invalid generation configuration
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Calendar arithmetic error
    #[error("Calendar error: {0}")]
    Calendar(#[from] CalendarError),

    /// Random source misuse
    #[error("Random source error: {0}")]
    Random(#[from] RandomError),

    /// Profile lookup error
    #[error("Profile error: {0}")]
    Profile(#[from] ProfileError),
}

/// Errors in a generation configuration
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// End date before start date
    #[error("Invalid date range: end {end} is before start {start}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },

    /// Entity count outside the supported bounds
    #[error("Entity count {count} out of range [{min}, {max}]")]
    EntityCountOutOfRange { count: usize, min: usize, max: usize },

    /// Profile name empty or whitespace
    #[error("Profile name must not be blank")]
    BlankProfileName,

    /// An identifier parameter was empty or whitespace
    #[error("Identifier '{parameter}' must not be blank")]
    BlankIdentifier { parameter: &'static str },

    /// Interval length not supported
    #[error("Unsupported granularity: {minutes} minutes (expected 5, 15 or 30)")]
    UnsupportedGranularity { minutes: u32 },

    /// Unknown measurement class code
    #[error("Unknown measurement class: {0}")]
    UnknownMeasurementClass(String),
}

/// Errors in period arithmetic
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CalendarError {
    /// Period index outside `1..=periods_per_day`
    #[error("Period index {index} out of range [1, {max}]")]
    PeriodOutOfRange { index: u32, max: u32 },
}

/// Misuse of a random source
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RandomError {
    /// Upper bound must be positive
    #[error("Bound must be positive, got {max}")]
    NonPositiveBound { max: i64 },

    /// Lower bound must be strictly below upper bound
    #[error("Invalid range: min {min} must be less than max {max}")]
    InvertedRange { min: i64, max: i64 },
}

/// Errors from the profile registry
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProfileError {
    /// No profile registered under that name
    #[error("Profile not found: {name}")]
    NotFound { name: String },
}

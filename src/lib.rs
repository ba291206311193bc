// Meter Synth - Synthetic interval meter readings
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! # Meter Synth
//!
//! Synthetic interval consumption readings for simulated metering points.
//!
//! Each entity gets one reading per fixed-length period (5, 15 or 30
//! minutes) over an inclusive date range. Values come from a named
//! consumption profile (base load × time of day × day of week × season ×
//! noise) and are rounded to two decimals.
//!
//! - **Reproducible**: a seed fixes identifiers and every value
//! - **Independent entities**: an entity's readings depend only on the run
//!   seed and its own id, never on entity count or generation order
//! - **Eager or streaming**: same readings either way
//! - **Wire formats**: nested JSON and flat CSV
//!
//! ## Quick Start
//!
//! ```rust
//! use meter_synth::{GenerationConfig, Granularity, Orchestrator};
//! use chrono::NaiveDate;
//!
//! let day = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
//! let config = GenerationConfig::new(day, day)
//!     .with_granularity(Granularity::ThirtyMinutes)
//!     .with_profile("Office")
//!     .with_seed(42);
//!
//! let result = Orchestrator::with_default_profiles().generate(&config).unwrap();
//! assert_eq!(result.len(), 48);
//! assert_eq!(result.readings()[0].period, 1);
//!
//! let csv = meter_synth::wire::encode_flat_string(result.readings(), "Site").unwrap();
//! assert!(csv.starts_with("ExternalId,Site,MeasurementClass"));
//! ```
//!
//! ## Modules
//!
//! - [`calendar`]: Period arithmetic
//! - [`random`]: Seeded and entropy random sources
//! - [`profiles`]: Consumption profiles and the profile registry
//! - [`generator`]: Per-entity lazy reading sequences
//! - [`identifier`]: Internal to external identifier mapping
//! - [`orchestrator`]: Multi-entity runs, eager and streaming
//! - [`wire`]: Nested and flat wire formats
//! - [`export`]: Streaming export with cancellation
//! - [`manifest`]: Run manifests

pub mod calendar;
pub mod config;
pub mod error;
pub mod export;
pub mod generator;
pub mod identifier;
pub mod manifest;
pub mod orchestrator;
pub mod profiles;
pub mod random;
pub mod reading;
pub mod result;
pub mod wire;

// Re-exports for convenient access
pub use calendar::{period_index, period_start, Granularity};
pub use config::{GenerationConfig, MAX_ENTITY_COUNT, MIN_ENTITY_COUNT};
pub use error::{CalendarError, ConfigError, ProfileError, RandomError, Result, SynthError};
pub use export::{export_flat, CancellationToken, ExportOutcome};
pub use generator::{GenerationWindow, ReadingGenerator, Readings};
pub use manifest::GenerationManifest;
pub use orchestrator::{
    expected_reading_count, EntityPlan, EntitySource, GenerationPlan, Orchestrator, ReadingStream,
};
pub use profiles::{ConsumptionProfile, ProfileRegistry};
pub use random::RandomSource;
pub use reading::{MeasurementClass, QualityFlag, Reading};
pub use result::{ConsumptionStats, GenerationResult};
pub use wire::{FlatEncoder, NestedEncoder, WireError};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

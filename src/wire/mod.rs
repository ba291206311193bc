// Meter Synth - Wire formats
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Wire formats.
//!
//! - [`nested`]: JSON document keyed `external id → MC → class → date → period`
//! - [`flat`]: one CSV row per reading
//!
//! Both treat a multi-entity reading sequence as the union of its
//! per-entity blocks.

pub mod flat;
pub mod nested;

pub use flat::{encode_flat, encode_flat_string, FlatEncoder, FlatRow, FLAT_HEADER};
pub use nested::{NestedDocument, NestedEncoder, NestedEntry, PADDING_PERIODS};

use rust_decimal::Decimal;

/// Errors raised while writing a wire format.
#[derive(Debug, thiserror::Error)]
pub enum WireError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("period {period} out of range for {periods_per_day} periods per day")]
    PeriodOutOfRange { period: u32, periods_per_day: u32 },
}

/// Render a value with exactly two decimal places.
pub fn fixed_2dp(value: Decimal) -> String {
    let mut value = value;
    value.rescale(2);
    value.to_string()
}

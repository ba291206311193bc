// Meter Synth - Streaming export
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Streaming flat export with cooperative cancellation.
//!
//! ```no_run
//! use meter_synth::export::{export_flat, CancellationToken, ExportOutcome};
//! use meter_synth::{GenerationConfig, Orchestrator};
//! use chrono::NaiveDate;
//!
//! let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
//! let end = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
//! let config = GenerationConfig::new(start, end).with_entity_count(500);
//!
//! let stream = Orchestrator::with_default_profiles()
//!     .generate_streaming(&config)
//!     .unwrap();
//!
//! let token = CancellationToken::new();
//! let file = std::fs::File::create("readings.csv").unwrap();
//! match export_flat(stream, "Site", file, &token).unwrap() {
//!     ExportOutcome::Completed { rows } => println!("{} rows", rows),
//!     ExportOutcome::Cancelled { rows } => println!("stopped after {} rows", rows),
//! }
//! ```

use crate::reading::Reading;
use crate::wire::{FlatEncoder, WireError};
use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared cancellation flag.
///
/// Clones share the same flag, so a signal handler on one thread can stop
/// an export running on another.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Create a token that is not cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Whether cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// How an export ended. Cancellation is an outcome, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportOutcome {
    /// Every reading was written.
    Completed { rows: u64 },
    /// Stopped on request; `rows` rows were written and kept.
    Cancelled { rows: u64 },
}

impl ExportOutcome {
    /// Rows written.
    pub fn rows(&self) -> u64 {
        match self {
            ExportOutcome::Completed { rows } | ExportOutcome::Cancelled { rows } => *rows,
        }
    }

    /// Whether the export was cancelled.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, ExportOutcome::Cancelled { .. })
    }
}

/// Write readings in flat format as they arrive.
///
/// The token is checked before each reading. On cancellation the rows
/// already written are flushed and left in place.
pub fn export_flat<I, W>(
    readings: I,
    site: &str,
    writer: W,
    token: &CancellationToken,
) -> Result<ExportOutcome, WireError>
where
    I: IntoIterator<Item = Reading>,
    W: Write,
{
    let mut encoder = FlatEncoder::new(writer, site)?;
    for reading in readings {
        if token.is_cancelled() {
            let rows = encoder.rows();
            encoder.finish()?;
            log::debug!("flat export cancelled after {} rows", rows);
            return Ok(ExportOutcome::Cancelled { rows });
        }
        encoder.write(&reading)?;
    }

    let rows = encoder.rows();
    encoder.finish()?;
    log::debug!("flat export completed, {} rows", rows);
    Ok(ExportOutcome::Completed { rows })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GenerationConfig;
    use crate::orchestrator::Orchestrator;
    use chrono::NaiveDate;

    fn config() -> GenerationConfig {
        let day = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        GenerationConfig::new(day, day).with_entity_count(2).with_seed(3)
    }

    #[test]
    fn test_token_shared_between_clones() {
        let token = CancellationToken::new();
        let clone = token.clone();
        assert!(!token.is_cancelled());
        clone.cancel();
        assert!(token.is_cancelled());
    }

    #[test]
    fn test_export_completes() {
        let stream = Orchestrator::with_default_profiles()
            .generate_streaming(&config())
            .unwrap();
        let mut out = Vec::new();
        let outcome = export_flat(stream, "S", &mut out, &CancellationToken::new()).unwrap();
        assert_eq!(outcome, ExportOutcome::Completed { rows: 96 });
        assert_eq!(String::from_utf8(out).unwrap().lines().count(), 97);
    }

    #[test]
    fn test_export_cancelled_midway() {
        let token = CancellationToken::new();
        let trigger = token.clone();
        let stream = Orchestrator::with_default_profiles()
            .generate_streaming(&config())
            .unwrap()
            .enumerate()
            .map(move |(i, r)| {
                if i == 9 {
                    trigger.cancel();
                }
                r
            });

        let mut out = Vec::new();
        let outcome = export_flat(stream, "S", &mut out, &token).unwrap();
        // Cancelled while reading 9 is produced, so it is never written
        assert_eq!(outcome, ExportOutcome::Cancelled { rows: 9 });
        assert!(outcome.is_cancelled());
        assert_eq!(String::from_utf8(out).unwrap().lines().count(), 10);
    }

    #[test]
    fn test_export_cancelled_before_start() {
        let token = CancellationToken::new();
        token.cancel();
        let stream = Orchestrator::with_default_profiles()
            .generate_streaming(&config())
            .unwrap();
        let mut out = Vec::new();
        let outcome = export_flat(stream, "S", &mut out, &token).unwrap();
        assert_eq!(outcome.rows(), 0);
        // Header only
        assert_eq!(String::from_utf8(out).unwrap().lines().count(), 1);
    }
}

// Meter Synth - Generation results
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Materialized generation output.
//!
//! Statistics are derived from the readings on every call and never
//! stored.

use crate::config::GenerationConfig;
use crate::reading::Reading;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

/// All readings of an eager run plus the configuration behind them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationResult {
    /// Configuration that produced the readings.
    pub config: GenerationConfig,
    /// Readings, entity-major then chronological.
    pub readings: Vec<Reading>,
}

/// Aggregate consumption statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsumptionStats {
    /// Distinct entities.
    pub entity_count: usize,
    /// Number of readings.
    pub reading_count: usize,
    pub min: Decimal,
    pub max: Decimal,
    /// Mean value, rounded to 4 decimal places.
    pub mean: Decimal,
    pub total: Decimal,
}

impl GenerationResult {
    /// Wrap generated readings.
    pub fn new(config: GenerationConfig, readings: Vec<Reading>) -> Self {
        Self { config, readings }
    }

    /// Get all readings.
    pub fn readings(&self) -> &[Reading] {
        &self.readings
    }

    /// Number of readings.
    pub fn len(&self) -> usize {
        self.readings.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    /// Number of distinct entities.
    pub fn entity_count(&self) -> usize {
        self.readings
            .iter()
            .map(|r| r.entity_id)
            .collect::<HashSet<Uuid>>()
            .len()
    }

    /// `(internal, external)` id pairs in first-seen order.
    pub fn entities(&self) -> Vec<(Uuid, String)> {
        let mut seen = HashSet::new();
        self.readings
            .iter()
            .filter(|r| seen.insert(r.entity_id))
            .map(|r| (r.entity_id, r.external_id.clone()))
            .collect()
    }

    /// Readings of one entity, by external id.
    pub fn readings_for<'a>(&'a self, external_id: &'a str) -> impl Iterator<Item = &'a Reading> {
        self.readings
            .iter()
            .filter(move |r| r.external_id == external_id)
    }

    /// Smallest value.
    pub fn min(&self) -> Option<Decimal> {
        self.readings.iter().map(|r| r.value).min()
    }

    /// Largest value.
    pub fn max(&self) -> Option<Decimal> {
        self.readings.iter().map(|r| r.value).max()
    }

    /// Sum of all values.
    pub fn total(&self) -> Decimal {
        self.readings.iter().map(|r| r.value).sum()
    }

    /// Mean value, rounded to 4 decimal places.
    pub fn mean(&self) -> Option<Decimal> {
        if self.readings.is_empty() {
            return None;
        }
        let mean = self.total() / Decimal::from(self.readings.len());
        Some(mean.round_dp_with_strategy(4, RoundingStrategy::MidpointNearestEven))
    }

    /// All statistics at once.
    pub fn stats(&self) -> Option<ConsumptionStats> {
        Some(ConsumptionStats {
            entity_count: self.entity_count(),
            reading_count: self.readings.len(),
            min: self.min()?,
            max: self.max()?,
            mean: self.mean()?,
            total: self.total(),
        })
    }
}

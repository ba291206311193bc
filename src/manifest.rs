// Meter Synth - Generation manifest
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Manifest describing a generated reading set.
//!
//! A manifest is written next to an exported file so the set can be
//! checked or regenerated later: it records the configuration, its
//! fingerprint, the effective seed, and the identifier table.

use crate::config::GenerationConfig;
use crate::result::{ConsumptionStats, GenerationResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use uuid::Uuid;

/// Identifier pair of one entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityManifest {
    pub internal_id: Uuid,
    pub external_id: String,
}

/// Manifest of one generation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationManifest {
    /// Library version that produced the set.
    pub generator_version: String,
    /// Configuration of the run.
    pub config: GenerationConfig,
    /// Configuration fingerprint.
    pub fingerprint: u64,
    /// Seed actually used, for deterministic runs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub effective_seed: Option<u64>,
    /// Entities in run order.
    pub entities: Vec<EntityManifest>,
    /// `days × periods_per_day × entity_count`.
    pub expected_readings: u64,
    /// Readings actually produced.
    pub actual_readings: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<ConsumptionStats>,
    /// Generation timestamp.
    pub generated_at: DateTime<Utc>,
}

impl GenerationManifest {
    /// Manifest for a configuration, before any reading is counted.
    pub fn new(config: &GenerationConfig) -> Self {
        Self {
            generator_version: crate::VERSION.to_string(),
            config: config.clone(),
            fingerprint: config.fingerprint(),
            effective_seed: config.effective_seed(),
            entities: Vec::new(),
            expected_readings: config.expected_reading_count(),
            actual_readings: 0,
            stats: None,
            generated_at: Utc::now(),
        }
    }

    /// Manifest of an eager run.
    pub fn from_result(result: &GenerationResult) -> Self {
        let entities = result
            .entities()
            .into_iter()
            .map(|(internal_id, external_id)| EntityManifest {
                internal_id,
                external_id,
            })
            .collect();
        Self::new(&result.config)
            .with_entities(entities)
            .with_actual_readings(result.len() as u64)
            .with_stats(result.stats())
    }

    /// Set entity table.
    pub fn with_entities(mut self, entities: Vec<EntityManifest>) -> Self {
        self.entities = entities;
        self
    }

    /// Set produced reading count.
    pub fn with_actual_readings(mut self, n: u64) -> Self {
        self.actual_readings = n;
        self
    }

    /// Set statistics.
    pub fn with_stats(mut self, stats: Option<ConsumptionStats>) -> Self {
        self.stats = stats;
        self
    }

    /// Whether every expected reading was produced.
    pub fn is_complete(&self) -> bool {
        self.actual_readings == self.expected_readings
    }

    /// Serialize to JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Parse from JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Save to JSON file.
    pub fn to_json_file(&self, path: impl AsRef<Path>) -> Result<(), std::io::Error> {
        let json = self
            .to_json()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, json)
    }

    /// Load from JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, std::io::Error> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json).map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    }
}

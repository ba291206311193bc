// Meter Synth - Multi-entity orchestration
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Multi-entity orchestration.
//!
//! Every run goes through the same steps:
//!
//! 1. **Validate** the configuration (date range, entity count, profile name)
//! 2. **Resolve** the profile from the registry
//! 3. **Derive identifiers**: explicit ids (truncated or padded to the
//!    entity count), ids drawn from a seed-derived byte stream, or fresh
//!    random ids
//! 4. **Derive per-entity seeds** (deterministic runs only):
//!    `xxh64(internal_id, effective_seed)`
//! 5. **Generate** one [`Readings`] sequence per entity
//!
//! Steps 1-4 produce a [`GenerationPlan`]. The plan can then be run
//! eagerly ([`GenerationPlan::generate`], entities in parallel) or lazily
//! ([`GenerationPlan::into_stream`], one entity in flight). Both yield the
//! same readings in the same order: entity-major, then chronological.
//!
//! An entity's seed depends only on the run seed and its own id, so its
//! readings do not change with entity count, order or scheduling, and
//! [`GenerationPlan::entity_readings`] regenerates one entity alone.

use crate::config::GenerationConfig;
use crate::error::Result;
use crate::generator::{GenerationWindow, ReadingGenerator, Readings};
use crate::identifier;
use crate::profiles::registry::{ProfileRegistry, SharedProfile};
use crate::random::RandomSource;
use crate::reading::Reading;
use crate::result::GenerationResult;
use rayon::prelude::*;
use std::iter::FusedIterator;
use std::sync::Arc;
use uuid::{Builder, Uuid};
use xxhash_rust::xxh64::xxh64;

/// Randomness assigned to one entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntitySource {
    /// Reproducible source with this per-entity seed.
    Seeded(u64),
    /// Fresh OS-entropy source per sequence.
    Entropy,
}

impl EntitySource {
    /// Build the random source.
    pub fn random_source(&self) -> RandomSource {
        match self {
            EntitySource::Seeded(seed) => RandomSource::seeded(*seed),
            EntitySource::Entropy => RandomSource::from_entropy(),
        }
    }
}

/// One entity of a plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityPlan {
    /// Position in the run.
    pub index: usize,
    /// Internal identifier.
    pub internal_id: Uuid,
    /// 13-digit external identifier.
    pub external_id: String,
    /// Randomness for this entity.
    pub source: EntitySource,
}

/// Combine a run seed with an entity id into the entity's seed.
pub fn entity_seed(run_seed: u64, internal_id: &Uuid) -> u64 {
    xxh64(internal_id.as_bytes(), run_seed)
}

/// Draw `count` UUIDs from a random source.
pub fn draw_entity_ids(rng: &mut RandomSource, count: usize) -> Vec<Uuid> {
    (0..count)
        .map(|_| {
            let mut bytes = [0u8; 16];
            rng.fill_bytes(&mut bytes);
            Builder::from_random_bytes(bytes).into_uuid()
        })
        .collect()
}

/// Validated, resolved run ready to generate.
#[derive(Debug, Clone)]
pub struct GenerationPlan {
    config: GenerationConfig,
    profile: SharedProfile,
    window: GenerationWindow,
    entities: Vec<EntityPlan>,
}

impl GenerationPlan {
    /// Configuration of the run.
    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    /// Resolved profile.
    pub fn profile(&self) -> &SharedProfile {
        &self.profile
    }

    /// Date range, granularity and class.
    pub fn window(&self) -> &GenerationWindow {
        &self.window
    }

    /// Entities in run order.
    pub fn entities(&self) -> &[EntityPlan] {
        &self.entities
    }

    /// Look up an entity by internal id.
    pub fn entity(&self, internal_id: &Uuid) -> Option<&EntityPlan> {
        self.entities.iter().find(|e| e.internal_id == *internal_id)
    }

    /// Look up an entity by external id.
    pub fn entity_by_external(&self, external_id: &str) -> Option<&EntityPlan> {
        self.entities.iter().find(|e| e.external_id == external_id)
    }

    /// Readings this plan produces.
    pub fn expected_reading_count(&self) -> u64 {
        self.window.reading_count() * self.entities.len() as u64
    }

    /// Lazy readings of one entity of this plan.
    pub fn entity_readings(&self, entity: &EntityPlan) -> Readings {
        ReadingGenerator::new(Arc::clone(&self.profile), entity.source.random_source()).start(
            entity.internal_id,
            entity.external_id.clone(),
            &self.window,
        )
    }

    /// Generate everything, entities in parallel.
    pub fn generate(self) -> GenerationResult {
        let blocks: Vec<Vec<Reading>> = self
            .entities
            .par_iter()
            .map(|entity| self.entity_readings(entity).collect())
            .collect();

        let capacity = usize::try_from(self.expected_reading_count()).unwrap_or(0);
        let mut readings = Vec::with_capacity(capacity);
        for block in blocks {
            readings.extend(block);
        }

        log::debug!(
            "generated {} readings for {} entities",
            readings.len(),
            self.entities.len()
        );
        GenerationResult::new(self.config, readings)
    }

    /// Lazy stream over all entities, one entity in flight.
    pub fn into_stream(self) -> ReadingStream {
        ReadingStream {
            per_entity: self.window.reading_count(),
            profile: self.profile,
            window: self.window,
            pending: self.entities.into_iter(),
            current: None,
        }
    }
}

/// Entity-major lazy reading stream.
#[derive(Debug)]
pub struct ReadingStream {
    profile: SharedProfile,
    window: GenerationWindow,
    pending: std::vec::IntoIter<EntityPlan>,
    current: Option<Readings>,
    per_entity: u64,
}

impl Iterator for ReadingStream {
    type Item = Reading;

    fn next(&mut self) -> Option<Reading> {
        loop {
            if let Some(reading) = self.current.as_mut().and_then(Iterator::next) {
                return Some(reading);
            }
            let entity = self.pending.next()?;
            log::trace!("streaming entity {} ({})", entity.index, entity.external_id);
            self.current = Some(
                ReadingGenerator::new(Arc::clone(&self.profile), entity.source.random_source())
                    .start(entity.internal_id, entity.external_id, &self.window),
            );
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let in_flight = self.current.as_ref().map_or(0, |r| r.len() as u64);
        let queued = self.pending.len() as u64 * self.per_entity;
        let n = usize::try_from(in_flight + queued).unwrap_or(usize::MAX);
        (n, Some(n))
    }
}

impl FusedIterator for ReadingStream {}

/// Drives validation, resolution, identifier and seed derivation, and
/// generation for multi-entity runs.
#[derive(Debug, Clone)]
pub struct Orchestrator {
    registry: Arc<ProfileRegistry>,
}

impl Orchestrator {
    /// Create an orchestrator over a profile registry.
    pub fn new(registry: Arc<ProfileRegistry>) -> Self {
        Self { registry }
    }

    /// Create an orchestrator over the built-in profiles.
    pub fn with_default_profiles() -> Self {
        Self::new(Arc::new(ProfileRegistry::with_defaults()))
    }

    /// Profile registry in use.
    pub fn registry(&self) -> &Arc<ProfileRegistry> {
        &self.registry
    }

    /// Validate, resolve and derive identifiers and seeds.
    pub fn plan(&self, config: &GenerationConfig) -> Result<GenerationPlan> {
        config.validate()?;
        let profile = self.registry.get(config.profile.trim())?;

        let run_seed = config.effective_seed();
        let mut id_source = RandomSource::from_seed_option(run_seed);
        let internal_ids = resolve_entity_ids(config, &mut id_source);

        for (external, owners) in identifier::find_collisions(&internal_ids) {
            log::warn!(
                "external id {} shared by {} internal ids",
                external,
                owners.len()
            );
        }

        let entities = internal_ids
            .into_iter()
            .enumerate()
            .map(|(index, internal_id)| {
                let source = match run_seed {
                    Some(seed) => EntitySource::Seeded(entity_seed(seed, &internal_id)),
                    None => EntitySource::Entropy,
                };
                log::trace!("entity {} {} source {:?}", index, internal_id, source);
                EntityPlan {
                    index,
                    external_id: identifier::derive(&internal_id),
                    internal_id,
                    source,
                }
            })
            .collect::<Vec<_>>();

        log::debug!(
            "planned {} entities with profile '{}' ({}, {} days, seed {:?})",
            entities.len(),
            profile.name(),
            config.granularity,
            config.days(),
            run_seed
        );

        Ok(GenerationPlan {
            config: config.clone(),
            window: GenerationWindow::from_config(config),
            profile,
            entities,
        })
    }

    /// Generate all readings eagerly.
    pub fn generate(&self, config: &GenerationConfig) -> Result<GenerationResult> {
        Ok(self.plan(config)?.generate())
    }

    /// Generate readings lazily, entity by entity.
    ///
    /// Configuration errors surface here, before any reading is produced.
    pub fn generate_streaming(&self, config: &GenerationConfig) -> Result<ReadingStream> {
        Ok(self.plan(config)?.into_stream())
    }

    /// Regenerate the readings of one entity of a run.
    ///
    /// In a deterministic run the sequence is identical to that entity's
    /// block in [`generate`](Self::generate). `None` if the id is not part
    /// of the run.
    pub fn generate_entity(
        &self,
        config: &GenerationConfig,
        internal_id: &Uuid,
    ) -> Result<Option<Readings>> {
        let plan = self.plan(config)?;
        Ok(plan.entity(internal_id).map(|e| plan.entity_readings(e)))
    }
}

/// `days × periods_per_day × entity_count` without generating anything.
pub fn expected_reading_count(config: &GenerationConfig) -> u64 {
    config.expected_reading_count()
}

/// Explicit ids first (truncated to the entity count), then ids drawn
/// from `source` until the count is reached.
fn resolve_entity_ids(config: &GenerationConfig, source: &mut RandomSource) -> Vec<Uuid> {
    let mut ids: Vec<Uuid> = config
        .entity_ids
        .iter()
        .take(config.entity_count)
        .copied()
        .collect();
    let missing = config.entity_count - ids.len();
    ids.extend(draw_entity_ids(source, missing));
    ids
}

// Meter Synth - Profile registry
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Name to profile lookup.
//!
//! Names are matched case-insensitively and ignore `-`, `_` and spaces,
//! so `"DataCenter"`, `"data-center"` and `"data_center"` resolve to the
//! same entry. Registration under an existing name replaces the entry.

use super::{
    ConsumptionProfile, DataCenterProfile, EducationalProfile, ManufacturingProfile,
    OfficeProfile, RetailProfile,
};
use crate::error::ProfileError;
use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock};

/// Shared profile handle.
pub type SharedProfile = Arc<dyn ConsumptionProfile>;

/// Registry of named consumption profiles.
///
/// Lookups take a read lock; [`register`](Self::register) is the only
/// writer.
#[derive(Debug, Default)]
pub struct ProfileRegistry {
    profiles: RwLock<BTreeMap<String, SharedProfile>>,
}

impl ProfileRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the built-in profiles.
    pub fn with_defaults() -> Self {
        let registry = Self::new();
        registry.register(Arc::new(OfficeProfile::new()));
        registry.register(Arc::new(ManufacturingProfile::new()));
        registry.register(Arc::new(RetailProfile::new()));
        registry.register(Arc::new(DataCenterProfile::new()));
        registry.register(Arc::new(EducationalProfile::new()));
        registry
    }

    /// Register a profile under its own name, returning any replaced entry.
    pub fn register(&self, profile: SharedProfile) -> Option<SharedProfile> {
        let key = normalize(profile.name());
        let mut profiles = self.profiles.write().unwrap_or_else(PoisonError::into_inner);
        let replaced = profiles.insert(key, profile);
        if let Some(ref old) = replaced {
            log::debug!("replaced profile '{}'", old.name());
        }
        replaced
    }

    /// Resolve a profile by name.
    pub fn get(&self, name: &str) -> Result<SharedProfile, ProfileError> {
        let profiles = self.profiles.read().unwrap_or_else(PoisonError::into_inner);
        profiles
            .get(&normalize(name))
            .cloned()
            .ok_or_else(|| ProfileError::NotFound {
                name: name.to_string(),
            })
    }

    /// Whether a profile is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_ok()
    }

    /// Display names of all registered profiles, sorted.
    pub fn names(&self) -> Vec<String> {
        let profiles = self.profiles.read().unwrap_or_else(PoisonError::into_inner);
        let mut names: Vec<String> = profiles.values().map(|p| p.name().to_string()).collect();
        names.sort();
        names
    }

    /// Number of registered profiles.
    pub fn len(&self) -> usize {
        self.profiles
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Registry key of a profile name.
pub(crate) fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, '-' | '_' | ' '))
        .flat_map(char::to_lowercase)
        .collect()
}

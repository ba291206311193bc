// Meter Synth - Identifier mapping
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Internal to external identifier mapping.
//!
//! An external identifier is 13 ASCII digits: 12 digits taken from the
//! xxh64 hash of the internal UUID's bytes, followed by the modulus-11
//! check digit used by metering-point administration numbers.
//!
//! The mapping is pure and stable. It does not resolve collisions;
//! [`find_collisions`] reports them.

use std::collections::{BTreeMap, HashMap};
use uuid::Uuid;
use xxhash_rust::xxh64::xxh64;

/// Length of an external identifier.
pub const EXTERNAL_ID_LEN: usize = 13;

/// Prime weights for the check digit, one per body digit.
const CHECK_WEIGHTS: [u32; 12] = [3, 5, 7, 13, 17, 19, 23, 29, 31, 37, 41, 43];

/// 10^12, the body range.
const BODY_MODULUS: u64 = 1_000_000_000_000;

/// Derive the external identifier of an internal identifier.
pub fn derive(internal_id: &Uuid) -> String {
    let body = xxh64(internal_id.as_bytes(), 0) % BODY_MODULUS;
    let body = format!("{:012}", body);
    let check = check_digit(&body).unwrap_or(0);
    format!("{}{}", body, check)
}

/// Derive external identifiers for a set of internal identifiers.
///
/// Each mapping depends only on its own id, so input order is irrelevant.
pub fn derive_many<'a>(ids: impl IntoIterator<Item = &'a Uuid>) -> BTreeMap<Uuid, String> {
    ids.into_iter().map(|id| (*id, derive(id))).collect()
}

/// Whether `s` has the external identifier shape: exactly 13 ASCII digits.
pub fn is_valid_external_id(s: &str) -> bool {
    s.len() == EXTERNAL_ID_LEN && s.bytes().all(|b| b.is_ascii_digit())
}

/// Check digit over a 12-digit body, `None` if the body is malformed.
pub fn check_digit(body: &str) -> Option<u32> {
    if body.len() != CHECK_WEIGHTS.len() {
        return None;
    }
    let mut sum = 0u32;
    for (c, weight) in body.chars().zip(CHECK_WEIGHTS) {
        sum += c.to_digit(10)? * weight;
    }
    Some(sum % 11 % 10)
}

/// Whether a well-formed external identifier carries a matching check digit.
pub fn has_valid_check_digit(external_id: &str) -> bool {
    if !is_valid_external_id(external_id) {
        return false;
    }
    let (body, check) = external_id.split_at(EXTERNAL_ID_LEN - 1);
    check_digit(body) == check.chars().next().and_then(|c| c.to_digit(10))
}

/// External identifiers shared by more than one internal identifier.
///
/// Each entry lists the colliding internal ids in first-seen order.
pub fn find_collisions<'a>(ids: impl IntoIterator<Item = &'a Uuid>) -> Vec<(String, Vec<Uuid>)> {
    group_collisions(ids.into_iter().map(|id| (derive(id), *id)))
}

/// Group `(external, internal)` pairs and keep external ids owned by more
/// than one distinct internal id. Entries and owners are in first-seen order.
pub fn group_collisions(
    pairs: impl IntoIterator<Item = (String, Uuid)>,
) -> Vec<(String, Vec<Uuid>)> {
    let mut by_external: HashMap<String, Vec<Uuid>> = HashMap::new();
    let mut order: Vec<String> = Vec::new();
    for (external, id) in pairs {
        let owners = by_external.entry(external.clone()).or_default();
        if owners.is_empty() {
            order.push(external);
        }
        if !owners.contains(&id) {
            owners.push(id);
        }
    }
    order
        .into_iter()
        .filter_map(|external| {
            let owners = by_external.remove(&external)?;
            (owners.len() > 1).then_some((external, owners))
        })
        .collect()
}

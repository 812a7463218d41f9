//! Read-time reconciliation of the local and remote sample lists.
//!
//! Entries are keyed by `id`. Remote metadata wins when both tiers know a
//! sample; local-only entries are appended; a remote entry without an inline
//! payload borrows the local copy's so retrieval stays offline-capable.

use std::collections::HashMap;

use crate::sample::Sample;

/// Merge `local` into `remote`.
///
/// Output order: remote entries in remote order, then local-only entries in
/// local order. Duplicate ids within one input keep their first occurrence.
/// The merge is idempotent and never drops an id present in either input.
pub fn merge(local: &[Sample], remote: &[Sample]) -> Vec<Sample> {
    let mut merged: Vec<Sample> = Vec::with_capacity(remote.len() + local.len());
    let mut index: HashMap<&str, usize> = HashMap::with_capacity(merged.capacity());

    for sample in remote {
        if index.contains_key(sample.id.as_str()) {
            continue;
        }
        index.insert(sample.id.as_str(), merged.len());
        merged.push(sample.clone());
    }

    for sample in local {
        match index.get(sample.id.as_str()) {
            Some(&i) => {
                let entry = &mut merged[i];
                if entry.inline_payload.is_none() && sample.inline_payload.is_some() {
                    entry.inline_payload = sample.inline_payload.clone();
                }
            }
            None => {
                index.insert(sample.id.as_str(), merged.len());
                merged.push(sample.clone());
            }
        }
    }

    merged
}

//! Order-preserving candidate deduplication

use std::collections::HashSet;

use crate::models::Candidate;

/// Drop candidates whose (artist, title) pair was already seen, ignoring case
///
/// The first occurrence wins and relative order is kept.
pub fn dedupe(candidates: Vec<Candidate>) -> Vec<Candidate> {
    let mut seen = HashSet::with_capacity(candidates.len());
    candidates
        .into_iter()
        .filter(|c| seen.insert(c.dedup_key()))
        .collect()
}

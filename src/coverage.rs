//! Endpoint coverage aggregation and set differences between two traces.
use std::collections::BTreeMap;

use crate::canon::Canonicalizer;
use crate::trace::Trace;

/// Fold a trace into per-endpoint call counts. The `BTreeMap` keeps every
/// downstream listing deterministically sorted by endpoint key.
pub fn endpoint_counts(trace: &Trace, canon: &Canonicalizer) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for entry in &trace.entries {
        *counts.entry(canon.canonicalize_request(entry)).or_insert(0) += 1;
    }
    counts
}

/// Set differences between the reference and candidate endpoint sets.
///
/// `missing` (reference-only) is interpreted as functionality the candidate
/// lacks; `extra` (candidate-only) is informational and never fails the
/// comparison on its own.
#[derive(Debug)]
pub struct CoverageDiff {
    pub shared: Vec<String>,
    pub missing: Vec<String>,
    pub extra: Vec<String>,
}

impl CoverageDiff {
    pub fn compute(
        reference: &BTreeMap<String, usize>,
        candidate: &BTreeMap<String, usize>,
    ) -> CoverageDiff {
        let shared = reference
            .keys()
            .filter(|key| candidate.contains_key(*key))
            .cloned()
            .collect();
        let missing = reference
            .keys()
            .filter(|key| !candidate.contains_key(*key))
            .cloned()
            .collect();
        let extra = candidate
            .keys()
            .filter(|key| !reference.contains_key(*key))
            .cloned()
            .collect();
        CoverageDiff {
            shared,
            missing,
            extra,
        }
    }
}

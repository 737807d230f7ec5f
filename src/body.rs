//! Request-body shape consistency between traces.
//!
//! Bodies are compared by coarse shape, not content: either the sorted set
//! of top-level JSON object keys, or a marker for empty, non-object, and
//! unparseable bodies.
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::canon::Canonicalizer;
use crate::trace::Trace;

/// Coarse classification of one request body.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum BodyShape {
    /// Body absent or empty string.
    Empty,
    /// Sorted top-level keys of a JSON object body.
    Keys(Vec<String>),
    /// Valid JSON, but not an object.
    NonObject,
    /// JSON parsing failed.
    Unparseable,
}

impl BodyShape {
    pub fn classify(body: Option<&str>) -> BodyShape {
        let Some(body) = body.filter(|body| !body.is_empty()) else {
            return BodyShape::Empty;
        };
        match serde_json::from_str::<serde_json::Value>(body) {
            Ok(serde_json::Value::Object(map)) => {
                let mut keys: Vec<String> = map.keys().cloned().collect();
                keys.sort();
                BodyShape::Keys(keys)
            }
            Ok(_) => BodyShape::NonObject,
            Err(_) => BodyShape::Unparseable,
        }
    }
}

impl fmt::Display for BodyShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BodyShape::Empty => f.write_str("__empty__"),
            BodyShape::NonObject => f.write_str("__non_dict__"),
            BodyShape::Unparseable => f.write_str("__unparseable__"),
            BodyShape::Keys(keys) => {
                let quoted: Vec<String> = keys.iter().map(|key| format!("\"{key}\"")).collect();
                write!(f, "[{}]", quoted.join(", "))
            }
        }
    }
}

/// One endpoint whose observed body-shape sets differ between the traces.
/// Both sides are pre-rendered and sorted for deterministic reporting.
#[derive(Debug)]
pub struct BodyDiff {
    pub endpoint: String,
    pub reference: Vec<String>,
    pub candidate: Vec<String>,
}

/// Map each endpoint to the set of distinct body shapes observed for it.
pub fn body_shapes(trace: &Trace, canon: &Canonicalizer) -> BTreeMap<String, BTreeSet<BodyShape>> {
    let mut shapes: BTreeMap<String, BTreeSet<BodyShape>> = BTreeMap::new();
    for entry in &trace.entries {
        let key = canon.canonicalize_request(entry);
        shapes
            .entry(key)
            .or_default()
            .insert(BodyShape::classify(entry.body.as_deref()));
    }
    shapes
}

/// Diffs for every endpoint present in both maps whose shape sets differ.
pub fn diff_body(
    reference: &BTreeMap<String, BTreeSet<BodyShape>>,
    candidate: &BTreeMap<String, BTreeSet<BodyShape>>,
) -> Vec<BodyDiff> {
    let mut diffs = Vec::new();
    for (endpoint, reference_shapes) in reference {
        let Some(candidate_shapes) = candidate.get(endpoint) else {
            continue;
        };
        if reference_shapes == candidate_shapes {
            continue;
        }
        diffs.push(BodyDiff {
            endpoint: endpoint.clone(),
            reference: rendered(reference_shapes),
            candidate: rendered(candidate_shapes),
        });
    }
    diffs
}

fn rendered(shapes: &BTreeSet<BodyShape>) -> Vec<String> {
    let mut out: Vec<String> = shapes.iter().map(ToString::to_string).collect();
    out.sort();
    out
}

//! Auth-header consistency between traces.
//!
//! The stub server sanitizes sensitive header values to `present`/`absent`
//! before they reach a trace, so states are compared literally and never
//! re-sanitized here.
use std::collections::{BTreeMap, BTreeSet};

use crate::canon::Canonicalizer;
use crate::trace::Trace;

/// Case variants the clients are known to emit for the API-key header.
const API_KEY_HEADER_VARIANTS: [&str; 3] = ["DD-API-KEY", "Dd-Api-Key", "dd-api-key"];
const AUTH_HEADER_VARIANTS: [&str; 2] = ["Authorization", "authorization"];

const ABSENT: &str = "absent";

/// One endpoint whose observed auth-state sets differ between the traces.
#[derive(Debug)]
pub struct AuthDiff {
    pub endpoint: String,
    pub reference: Vec<String>,
    pub candidate: Vec<String>,
}

/// Map each endpoint to the set of distinct auth states observed for it,
/// where a state summarizes API-key and authorization header presence as
/// `api_key=<value>,auth=<value>`.
pub fn auth_states(trace: &Trace, canon: &Canonicalizer) -> BTreeMap<String, BTreeSet<String>> {
    let mut states: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
    for entry in &trace.entries {
        let key = canon.canonicalize_request(entry);
        let api_key = header_value(&entry.headers, &API_KEY_HEADER_VARIANTS);
        let auth = header_value(&entry.headers, &AUTH_HEADER_VARIANTS);
        states
            .entry(key)
            .or_default()
            .insert(format!("api_key={api_key},auth={auth}"));
    }
    states
}

/// Diffs for every endpoint present in both maps whose state sets differ.
/// Output is sorted by endpoint, and each side's states are sorted.
pub fn diff_auth(
    reference: &BTreeMap<String, BTreeSet<String>>,
    candidate: &BTreeMap<String, BTreeSet<String>>,
) -> Vec<AuthDiff> {
    let mut diffs = Vec::new();
    for (endpoint, reference_states) in reference {
        let Some(candidate_states) = candidate.get(endpoint) else {
            continue;
        };
        if reference_states == candidate_states {
            continue;
        }
        diffs.push(AuthDiff {
            endpoint: endpoint.clone(),
            reference: reference_states.iter().cloned().collect(),
            candidate: candidate_states.iter().cloned().collect(),
        });
    }
    diffs
}

fn header_value<'a>(headers: &'a BTreeMap<String, String>, variants: &[&str]) -> &'a str {
    variants
        .iter()
        .find_map(|name| headers.get(*name))
        .map_or(ABSENT, String::as_str)
}

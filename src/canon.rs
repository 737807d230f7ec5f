//! Route-template canonicalization for request paths.
//!
//! Two requests that differ only in embedded identifiers must map to the
//! same endpoint key, so traces from independent clients can be joined
//! per endpoint. Segment classification is an ordered rule cascade with
//! first-match-wins semantics; the order is part of the contract.
use regex::Regex;
use std::collections::BTreeSet;

use crate::trace::RequestEntry;

/// Placeholder substituted for identifier-shaped path segments.
pub const PLACEHOLDER: &str = "{id}";

/// Literal multi-word API path segments that would otherwise trip the slug
/// rule. Naive slug detection cannot tell `platform-infra-oncall` (an ID)
/// from `sensitive-data-scanner` (a resource name); this list is the
/// tie-break. Extra entries can be supplied at runtime via
/// `--known-segments`.
const DEFAULT_KNOWN_SEGMENTS: &[&str] = &[
    "api",
    "v1",
    "v2",
    "monitor",
    "dashboard",
    "logs",
    "events",
    "search",
    "aggregate",
    "incidents",
    "query",
    "metrics",
    "rum",
    "applications",
    "team",
    "ip_ranges",
    "validate",
    "downtime",
    "slo",
    "correction",
    "synthetics",
    "tests",
    "trigger",
    "results",
    "notebooks",
    "hosts",
    "totals",
    "users",
    "roles",
    "service_accounts",
    "api_keys",
    "application_keys",
    "security_monitoring",
    "rules",
    "signals",
    "sensitive-data-scanner",
    "config",
    "cost",
    "enabled",
    "estimated",
    "series",
    "dashboard_lists",
    "manual",
    "dashboards",
    "mute",
    "unmute",
    "host",
];

/// Identifier-shape rules, evaluated in declaration order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SegmentRule {
    /// 8-4-4-4-12 hex groups.
    Uuid,
    /// Purely decimal digits.
    Numeric,
    /// Long hexadecimal string (12+ hex characters).
    HexId,
    /// Three or more hyphen-joined lowercase-alphanumeric groups, longer
    /// than 6 characters. Known segments are kept verbatim.
    SlugId,
}

const RULE_ORDER: [SegmentRule; 4] = [
    SegmentRule::Uuid,
    SegmentRule::Numeric,
    SegmentRule::HexId,
    SegmentRule::SlugId,
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SegmentClass {
    Identifier,
    Literal,
}

/// Pure canonicalization policy: compiled segment shapes plus the known
/// literal segments that rescue slug-shaped resource names.
pub struct Canonicalizer {
    uuid: Regex,
    numeric: Regex,
    hex_id: Regex,
    slug_id: Regex,
    known_segments: BTreeSet<String>,
}

impl Canonicalizer {
    /// Canonicalizer with the built-in known-segment list.
    pub fn new() -> Canonicalizer {
        Canonicalizer::with_known_segments(std::iter::empty::<&str>())
    }

    /// Canonicalizer whose known-segment list is the built-in defaults
    /// plus `extra`. Entries are matched case-insensitively, so they are
    /// stored lowercased.
    pub fn with_known_segments<I, S>(extra: I) -> Canonicalizer
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut known_segments: BTreeSet<String> = DEFAULT_KNOWN_SEGMENTS
            .iter()
            .map(|segment| (*segment).to_string())
            .collect();
        known_segments.extend(extra.into_iter().map(|segment| segment.as_ref().to_lowercase()));

        Canonicalizer {
            uuid: Regex::new(
                "^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$",
            )
            .expect("uuid segment regex"),
            numeric: Regex::new("^[0-9]+$").expect("numeric segment regex"),
            hex_id: Regex::new("^[0-9a-fA-F]{12,}$").expect("hex segment regex"),
            slug_id: Regex::new("^[a-z0-9]+(-[a-z0-9]+){2,}$").expect("slug segment regex"),
            known_segments,
        }
    }

    /// Replace identifier-shaped segments of `path` with the placeholder
    /// and reassemble with a leading `/`. Pure and deterministic; empty
    /// segments and unmatched shapes pass through verbatim.
    pub fn canonicalize_path(&self, path: &str) -> String {
        let canonical: Vec<&str> = path
            .trim_matches('/')
            .split('/')
            .map(|segment| match self.classify_segment(segment) {
                SegmentClass::Identifier => PLACEHOLDER,
                SegmentClass::Literal => segment,
            })
            .collect();
        format!("/{}", canonical.join("/"))
    }

    /// Endpoint key for one request: uppercased method, a space, and the
    /// canonical path. Absent fields degrade to `?` and `/` rather than
    /// erroring, because entries originate from untrusted processes.
    pub fn canonicalize_request(&self, entry: &RequestEntry) -> String {
        let method = entry.method.as_deref().unwrap_or("?").to_ascii_uppercase();
        let path = self.canonicalize_path(entry.path.as_deref().unwrap_or("/"));
        format!("{method} {path}")
    }

    fn classify_segment(&self, segment: &str) -> SegmentClass {
        for rule in RULE_ORDER {
            if !self.rule_applies(rule, segment) {
                continue;
            }
            return match rule {
                SegmentRule::SlugId if self.is_known_segment(segment) => SegmentClass::Literal,
                _ => SegmentClass::Identifier,
            };
        }
        SegmentClass::Literal
    }

    fn rule_applies(&self, rule: SegmentRule, segment: &str) -> bool {
        match rule {
            SegmentRule::Uuid => self.uuid.is_match(segment),
            SegmentRule::Numeric => self.numeric.is_match(segment),
            SegmentRule::HexId => self.hex_id.is_match(segment),
            SegmentRule::SlugId => segment.len() > 6 && self.slug_id.is_match(segment),
        }
    }

    fn is_known_segment(&self, segment: &str) -> bool {
        self.known_segments.contains(&segment.to_lowercase())
    }
}

impl Default for Canonicalizer {
    fn default() -> Canonicalizer {
        Canonicalizer::new()
    }
}

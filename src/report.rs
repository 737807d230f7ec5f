//! Report rendering and the parity verdict.
//!
//! The report is rendered into a `String` in one fixed section order so
//! output is byte-deterministic for identical inputs; the caller prints it
//! once. The verdict is derived here because it is defined entirely by the
//! findings the report lists.
use std::collections::BTreeMap;

use crate::auth;
use crate::body;
use crate::canon::Canonicalizer;
use crate::coverage::{self, CoverageDiff};
use crate::trace::Trace;

/// Overall comparison outcome. `Fail` means at least one parity gap:
/// a missing endpoint, an auth diff, or a body-shape diff. Extra
/// candidate-only endpoints never fail on their own.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
    Pass,
    Fail,
}

/// Rendered report plus the verdict it concluded with.
#[derive(Debug)]
pub struct ParityReport {
    pub text: String,
    pub verdict: Verdict,
}

/// Run all analyzers over the two traces and render the full report.
pub fn render(reference: &Trace, candidate: &Trace, canon: &Canonicalizer) -> ParityReport {
    let reference_counts = coverage::endpoint_counts(reference, canon);
    let candidate_counts = coverage::endpoint_counts(candidate, canon);
    let diff = CoverageDiff::compute(&reference_counts, &candidate_counts);
    let auth_diffs = auth::diff_auth(
        &auth::auth_states(reference, canon),
        &auth::auth_states(candidate, canon),
    );
    let body_diffs = body::diff_body(
        &body::body_shapes(reference, canon),
        &body::body_shapes(candidate, canon),
    );

    let mut out = String::new();

    push_section(&mut out, "Request Trace Comparison Report", "=");
    push_line(
        &mut out,
        &format!(
            "  Reference: {} ({} requests)",
            reference.source,
            reference.entries.len()
        ),
    );
    push_line(
        &mut out,
        &format!(
            "  Candidate: {} ({} requests)",
            candidate.source,
            candidate.entries.len()
        ),
    );

    push_section(&mut out, "Endpoint Coverage", "-");
    push_line(
        &mut out,
        &format!("  Reference endpoints: {}", reference_counts.len()),
    );
    push_line(
        &mut out,
        &format!("  Candidate endpoints: {}", candidate_counts.len()),
    );
    push_line(&mut out, &format!("  Shared:              {}", diff.shared.len()));
    push_line(&mut out, &format!("  Reference only:      {}", diff.missing.len()));
    push_line(&mut out, &format!("  Candidate only:      {}", diff.extra.len()));

    if !diff.missing.is_empty() {
        push_section(
            &mut out,
            "Endpoints in reference but NOT in candidate (missing)",
            "-",
        );
        for endpoint in &diff.missing {
            let count = count_for(&reference_counts, endpoint);
            push_line(
                &mut out,
                &format!("  MISSING  {endpoint}  (reference called {count}x)"),
            );
        }
    }

    if !diff.extra.is_empty() {
        // Candidate-only endpoints are extras, not necessarily defects.
        push_section(
            &mut out,
            "Endpoints in candidate but NOT in reference (extra)",
            "-",
        );
        for endpoint in &diff.extra {
            let count = count_for(&candidate_counts, endpoint);
            push_line(
                &mut out,
                &format!("  EXTRA    {endpoint}  (candidate called {count}x)"),
            );
        }
    }

    if !auth_diffs.is_empty() {
        push_section(&mut out, "Auth Header Differences", "-");
        for finding in &auth_diffs {
            push_line(&mut out, &format!("  {}", finding.endpoint));
            push_line(
                &mut out,
                &format!("    Reference: [{}]", finding.reference.join(", ")),
            );
            push_line(
                &mut out,
                &format!("    Candidate: [{}]", finding.candidate.join(", ")),
            );
        }
    }

    if !body_diffs.is_empty() {
        push_section(&mut out, "Request Body Structure Differences", "-");
        for finding in &body_diffs {
            push_line(&mut out, &format!("  {}", finding.endpoint));
            push_line(
                &mut out,
                &format!("    Reference keys: [{}]", finding.reference.join(", ")),
            );
            push_line(
                &mut out,
                &format!("    Candidate keys: [{}]", finding.candidate.join(", ")),
            );
        }
    }

    if !diff.shared.is_empty() {
        push_section(&mut out, "Shared Endpoint Call Counts", "-");
        push_line(
            &mut out,
            &format!("  {:<50} {:>9} {:>9}", "Endpoint", "Reference", "Candidate"),
        );
        push_line(
            &mut out,
            &format!("  {} {} {}", "-".repeat(50), "-".repeat(9), "-".repeat(9)),
        );
        for endpoint in &diff.shared {
            let reference_n = count_for(&reference_counts, endpoint);
            let candidate_n = count_for(&candidate_counts, endpoint);
            let marker = if reference_n == candidate_n {
                ""
            } else {
                "  <-- diff"
            };
            push_line(
                &mut out,
                &format!("  {endpoint:<50} {reference_n:>9} {candidate_n:>9}{marker}"),
            );
        }
    }

    push_section(&mut out, "Summary", "=");
    let percent = coverage_percent(reference_counts.len(), candidate_counts.len(), diff.shared.len());
    push_line(
        &mut out,
        &format!(
            "  Candidate covers {}/{} reference endpoints ({percent:.1}%)",
            diff.shared.len(),
            reference_counts.len()
        ),
    );
    push_line(&mut out, &format!("  Missing endpoints: {}", diff.missing.len()));
    push_line(&mut out, &format!("  Extra endpoints:   {}", diff.extra.len()));
    push_line(&mut out, &format!("  Auth diffs:        {}", auth_diffs.len()));
    push_line(&mut out, &format!("  Body diffs:        {}", body_diffs.len()));

    let verdict =
        if diff.missing.is_empty() && auth_diffs.is_empty() && body_diffs.is_empty() {
            Verdict::Pass
        } else {
            Verdict::Fail
        };

    push_line(&mut out, "");
    match verdict {
        Verdict::Pass => push_line(&mut out, "  RESULT: PASS -- full parity"),
        Verdict::Fail => push_line(&mut out, "  RESULT: FAIL -- parity gaps remain"),
    }

    ParityReport { text: out, verdict }
}

/// Share of reference endpoints also exercised by the candidate. Zero
/// reference endpoints count as full coverage only when the candidate set
/// is empty too; a candidate with endpoints but no reference to judge them
/// against scores zero.
fn coverage_percent(reference_total: usize, candidate_total: usize, shared: usize) -> f64 {
    if reference_total > 0 {
        shared as f64 / reference_total as f64 * 100.0
    } else if candidate_total == 0 {
        100.0
    } else {
        0.0
    }
}

fn count_for(counts: &BTreeMap<String, usize>, endpoint: &str) -> usize {
    counts.get(endpoint).copied().unwrap_or(0)
}

fn push_line(out: &mut String, line: &str) {
    out.push_str(line);
    out.push('\n');
}

fn push_section(out: &mut String, title: &str, rule: &str) {
    let width = (title.len() + 4).max(60);
    let bar = rule.repeat(width);
    push_line(out, "");
    push_line(out, &bar);
    push_line(out, &format!("  {title}"));
    push_line(out, &bar);
}

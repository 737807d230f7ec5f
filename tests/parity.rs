//! End-to-end tests for the tparity binary.
//!
//! Each test writes JSONL fixtures into a temp dir, runs the built binary,
//! and asserts on the report, the diagnostic stream, and the exit code.
use std::path::PathBuf;
use std::process::{Command, Output};
use tempfile::TempDir;

fn tparity() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_tparity"));
    // Pin the filter so loader warnings are visible regardless of the
    // environment the tests run under.
    cmd.env("RUST_LOG", "info");
    cmd
}

fn write_lines(dir: &TempDir, name: &str, lines: &[&str]) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, lines.join("\n")).expect("write fixture");
    path
}

fn stdout_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn stderr_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

#[test]
fn full_parity_exits_zero() {
    let dir = TempDir::new().expect("tempdir");
    let reference = write_lines(
        &dir,
        "reference.jsonl",
        &[
            r#"{"method":"GET","path":"/api/v1/monitor/123","query":"","headers":{"DD-API-KEY":"present"},"body":""}"#,
            r#"{"method":"POST","path":"/api/v1/monitor","query":"","headers":{"DD-API-KEY":"present"},"body":"{\"name\":\"cpu\"}"}"#,
        ],
    );
    let candidate = write_lines(
        &dir,
        "candidate.jsonl",
        &[
            r#"{"method":"GET","path":"/api/v1/monitor/987654","query":"","headers":{"dd-api-key":"present"},"body":""}"#,
            r#"{"method":"post","path":"/api/v1/monitor","query":"","headers":{"Dd-Api-Key":"present"},"body":"{\"name\":\"mem\"}"}"#,
        ],
    );

    let output = tparity()
        .args([&reference, &candidate])
        .output()
        .expect("run tparity");

    let report = stdout_of(&output);
    assert_eq!(output.status.code(), Some(0), "report:\n{report}");
    assert!(report.contains("RESULT: PASS"));
    assert!(report.contains("(100.0%)"));
}

#[test]
fn missing_endpoint_exits_one() {
    let dir = TempDir::new().expect("tempdir");
    let reference = write_lines(
        &dir,
        "reference.jsonl",
        &[
            r#"{"method":"GET","path":"/api/v1/monitor/123","headers":{},"body":""}"#,
            r#"{"method":"GET","path":"/api/v1/ip_ranges","headers":{},"body":""}"#,
        ],
    );
    let candidate = write_lines(
        &dir,
        "candidate.jsonl",
        &[r#"{"method":"GET","path":"/api/v1/monitor/456","headers":{},"body":""}"#],
    );

    let output = tparity()
        .args([&reference, &candidate])
        .output()
        .expect("run tparity");

    let report = stdout_of(&output);
    assert_eq!(output.status.code(), Some(1), "report:\n{report}");
    assert!(report.contains("MISSING  GET /api/v1/ip_ranges"));
    assert!(report.contains("RESULT: FAIL"));
}

#[test]
fn missing_positional_argument_exits_two() {
    let output = tparity()
        .arg("only-one.jsonl")
        .output()
        .expect("run tparity");

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr_of(&output).contains("Usage"));
}

#[test]
fn absent_trace_files_warn_but_still_render_a_report() {
    let dir = TempDir::new().expect("tempdir");
    let output = tparity()
        .args([dir.path().join("ref.jsonl"), dir.path().join("cand.jsonl")])
        .output()
        .expect("run tparity");

    assert_eq!(output.status.code(), Some(0));
    assert!(stdout_of(&output).contains("RESULT: PASS"));
    let diagnostics = stderr_of(&output);
    assert!(diagnostics.contains("trace file not found"), "{diagnostics}");
}

#[test]
fn malformed_lines_warn_without_aborting() {
    let dir = TempDir::new().expect("tempdir");
    let reference = write_lines(
        &dir,
        "reference.jsonl",
        &[
            r#"{"method":"GET","path":"/api/v1/hosts","headers":{},"body":""}"#,
            "{definitely not json",
        ],
    );
    let candidate = write_lines(
        &dir,
        "candidate.jsonl",
        &[r#"{"method":"GET","path":"/api/v1/hosts","headers":{},"body":""}"#],
    );

    let output = tparity()
        .args([&reference, &candidate])
        .output()
        .expect("run tparity");

    assert_eq!(output.status.code(), Some(0));
    assert!(stderr_of(&output).contains("invalid JSON"));
    assert!(stdout_of(&output).contains("RESULT: PASS"));
}

#[test]
fn known_segments_file_keeps_custom_literals_distinct() {
    let dir = TempDir::new().expect("tempdir");
    // Both segments are slug-shaped, so without configuration they collapse
    // into the same {id} template and the comparison passes vacuously.
    let reference = write_lines(
        &dir,
        "reference.jsonl",
        &[r#"{"method":"GET","path":"/api/v2/custom-usage-report","headers":{},"body":""}"#],
    );
    let candidate = write_lines(
        &dir,
        "candidate.jsonl",
        &[r#"{"method":"GET","path":"/api/v2/custom-billing-report","headers":{},"body":""}"#],
    );

    let collapsed = tparity()
        .args([&reference, &candidate])
        .output()
        .expect("run tparity");
    assert_eq!(collapsed.status.code(), Some(0));

    let segments = write_lines(
        &dir,
        "segments.txt",
        &["# extra literal segments", "custom-usage-report", "custom-billing-report"],
    );
    let distinct = tparity()
        .arg("--known-segments")
        .arg(&segments)
        .args([&reference, &candidate])
        .output()
        .expect("run tparity");

    let report = stdout_of(&distinct);
    assert_eq!(distinct.status.code(), Some(1), "report:\n{report}");
    assert!(report.contains("MISSING  GET /api/v2/custom-usage-report"));
    assert!(report.contains("EXTRA    GET /api/v2/custom-billing-report"));
}

#[test]
fn unreadable_known_segments_file_is_an_invocation_error() {
    let dir = TempDir::new().expect("tempdir");
    let reference = write_lines(&dir, "reference.jsonl", &[]);
    let candidate = write_lines(&dir, "candidate.jsonl", &[]);

    let output = tparity()
        .arg("--known-segments")
        .arg(dir.path().join("no-such-file.txt"))
        .args([&reference, &candidate])
        .output()
        .expect("run tparity");

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr_of(&output).contains("known segments"));
}

//! CLI argument parsing for the parity checker.
//!
//! The CLI is intentionally thin: two trace paths in, a report and an exit
//! code out. All comparison policy lives in the engine modules.
use clap::Parser;
use std::path::PathBuf;

/// Root CLI arguments.
///
/// clap handles the invocation-invalid case itself: a missing positional
/// argument prints usage to stderr and exits with code 2, which is distinct
/// from the parity-failure code 1.
#[derive(Parser, Debug)]
#[command(
    name = "tparity",
    version,
    about = "Diff two recorded API request traces for endpoint parity",
    after_help = "Exit codes:\n  0  full parity\n  1  parity gaps found\n  2  invalid invocation\n\nExamples:\n  tparity reference.jsonl candidate.jsonl\n  tparity --known-segments segments.txt reference.jsonl candidate.jsonl"
)]
pub struct Args {
    /// Reference trace (JSONL request log from the trusted client)
    #[arg(value_name = "REFERENCE")]
    pub reference: PathBuf,

    /// Candidate trace (JSONL request log judged against the reference)
    #[arg(value_name = "CANDIDATE")]
    pub candidate: PathBuf,

    /// File of extra known literal path segments, one per line
    #[arg(long, value_name = "PATH")]
    pub known_segments: Option<PathBuf>,
}

use anyhow::{Context, Result};
use clap::Parser;
use std::process::ExitCode;

mod auth;
mod body;
mod canon;
mod cli;
mod coverage;
mod report;
mod trace;

use canon::Canonicalizer;
use report::Verdict;
use trace::Trace;

fn main() -> ExitCode {
    let args = cli::Args::parse();
    init_tracing();

    match run(&args) {
        Ok(Verdict::Pass) => ExitCode::SUCCESS,
        Ok(Verdict::Fail) => ExitCode::from(1),
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::from(2)
        }
    }
}

fn run(args: &cli::Args) -> Result<Verdict> {
    let canon = build_canonicalizer(args)?;

    let reference = Trace::load(&args.reference);
    let candidate = Trace::load(&args.candidate);
    for warning in reference.warnings.iter().chain(&candidate.warnings) {
        tracing::warn!("{warning}");
    }

    let report = report::render(&reference, &candidate, &canon);
    print!("{}", report.text);
    Ok(report.verdict)
}

fn build_canonicalizer(args: &cli::Args) -> Result<Canonicalizer> {
    let Some(path) = &args.known_segments else {
        return Ok(Canonicalizer::new());
    };
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("read known segments file {}", path.display()))?;
    let extra = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'));
    Ok(Canonicalizer::with_known_segments(extra))
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

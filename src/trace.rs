//! Loading of JSONL request traces.
//!
//! Traces come from an external stub server and are untrusted input: loading
//! is best-effort over the whole file and never fails. A missing file or a
//! corrupt line becomes a warning collected on the trace, so the comparison
//! still runs and the report still renders.
use serde::Deserialize;
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::Path;

/// One observed HTTP call, parsed from a single JSONL line.
///
/// Every field is optional because trace entries originate from external
/// processes; absent fields degrade to defaults during canonicalization
/// instead of erroring. The log format's `query` field is not modeled here
/// since the engine ignores it (serde skips unknown fields).
#[derive(Debug, Clone, Deserialize)]
pub struct RequestEntry {
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    #[serde(default)]
    pub body: Option<String>,
}

/// An ordered sequence of request entries loaded from one input source,
/// plus any warnings produced while loading it. Read-only after load.
#[derive(Debug)]
pub struct Trace {
    /// Display label for the report, normally the input path.
    pub source: String,
    pub entries: Vec<RequestEntry>,
    pub warnings: Vec<String>,
}

impl Trace {
    /// Load a JSONL trace. Never fails: a missing or unreadable file yields
    /// an empty trace with one warning, and each unparseable line yields a
    /// warning and is skipped. A single corrupt line must never abort the
    /// comparison.
    pub fn load(path: &Path) -> Trace {
        let source = path.display().to_string();
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) => {
                let warning = if err.kind() == ErrorKind::NotFound {
                    format!("trace file not found: {source}")
                } else {
                    format!("trace file not readable: {source}: {err}")
                };
                return Trace {
                    source,
                    entries: Vec::new(),
                    warnings: vec![warning],
                };
            }
        };

        let mut entries = Vec::new();
        let mut warnings = Vec::new();
        for (idx, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            match serde_json::from_str::<RequestEntry>(line) {
                Ok(entry) => entries.push(entry),
                Err(err) => warnings.push(format!("invalid JSON at {}:{}: {}", source, idx + 1, err)),
            }
        }

        Trace {
            source,
            entries,
            warnings,
        }
    }
}

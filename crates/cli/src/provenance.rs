use anyhow::{Context, Result};
use serde_json::{json, Value};
use std::ffi::OsString;
use std::fs;
use std::panic::Location;
use std::path::{Path, PathBuf};
use std::process::Command;

/// What a solution sidecar records besides the revision and callsite.
pub struct Payload {
    /// Solver parameters as given on the command line.
    pub params: Value,
    /// Instance sizes, cover total, and solver statistics.
    pub summary: Value,
}

impl Payload {
    pub fn new(params: Value, summary: Value) -> Self {
        Self { params, summary }
    }
}

/// Write `<solution-stem>.provenance.json` next to `solution`.
#[track_caller]
pub fn write_sidecar<P: AsRef<Path>>(solution: P, payload: Payload) -> Result<PathBuf> {
    let solution = solution.as_ref();
    let provenance_path = provenance_path(solution);
    if let Some(parent) = provenance_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating provenance dir {}", parent.display()))?;
        }
    }

    let callsite = Location::caller();
    let doc = json!({
        "code_rev": code_rev(),
        "callsite": {
            "file": callsite.file(),
            "line": callsite.line()
        },
        "params": payload.params,
        "summary": payload.summary,
        "outputs": [solution.to_string_lossy()]
    });
    fs::write(&provenance_path, serde_json::to_vec_pretty(&doc)?)
        .with_context(|| format!("writing {}", provenance_path.display()))?;
    tracing::debug!(path = %provenance_path.display(), "provenance written");
    Ok(provenance_path)
}

fn provenance_path(solution: &Path) -> PathBuf {
    let mut name = solution
        .file_stem()
        .map(|s| s.to_os_string())
        .unwrap_or_else(|| OsString::from("solution"));
    name.push(".provenance.json");
    solution.with_file_name(name)
}

/// Solver version tagged with the commit it was built from, e.g. `0.1.0+3f2c9e1`.
///
/// The commit comes from `GIT_COMMIT` (build time, then run time), else from
/// `git rev-parse --short HEAD`; `unknown` when none is available.
pub fn code_rev() -> String {
    let commit = option_env!("GIT_COMMIT")
        .map(str::to_string)
        .into_iter()
        .chain(std::env::var("GIT_COMMIT").ok())
        .find(|c| !c.trim().is_empty())
        .or_else(git_short_head)
        .unwrap_or_else(|| "unknown".to_string());
    format!("{}+{}", edgecover::VERSION, commit.trim())
}

fn git_short_head() -> Option<String> {
    let output = Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    String::from_utf8(output.stdout)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

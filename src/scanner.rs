//! Scanner for method implementations defined against known receivers.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

use regex::Regex;

use crate::contract::InterfaceSpec;
use crate::error::StubgenError;

#[derive(Debug, Default)]
/// Result of one implementation scan.
///
/// `implemented` is keyed by interface name; membership is all that
/// matters, and repeated definitions are idempotent. `warnings` carries
/// skipped-file notices for the caller to print.
pub struct ScanOutcome {
    pub implemented: BTreeMap<String, BTreeSet<String>>,
    pub warnings: Vec<String>,
}

impl ScanOutcome {
    /// The implemented-method set for one interface (empty if none found).
    pub fn methods_for(&self, interface_name: &str) -> BTreeSet<String> {
        self.implemented
            .get(interface_name)
            .cloned()
            .unwrap_or_default()
    }
}

/// Scans a directory of `.go` source units for methods defined against the
/// owners named in `specs`.
///
/// Files are visited in sorted name order for deterministic results, and
/// units whose stem ends in `_test` never contribute. Unreadable files are
/// skipped with a warning; the scan degrades to partial results rather than
/// aborting, because stub generation should still proceed for the files
/// that are readable.
pub fn scan_implementations(
    dir: impl AsRef<Path>,
    specs: &[InterfaceSpec],
) -> Result<ScanOutcome, StubgenError> {
    let dir = dir.as_ref();
    let mut outcome = ScanOutcome::default();
    for spec in specs {
        outcome
            .implemented
            .entry(spec.name.clone())
            .or_default();
    }

    let matchers: Vec<(String, Regex)> = specs
        .iter()
        .map(|spec| {
            let re = Regex::new(&format!(
                r"^func\s+\(\w+\s+\*?{}\)\s+(\w+)\(",
                regex::escape(&spec.owner)
            ))
            .expect("valid regex");
            (spec.name.clone(), re)
        })
        .collect();

    for path in source_units(dir)? {
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) => {
                outcome
                    .warnings
                    .push(format!("skipping unreadable file '{}': {e}", path.display()));
                continue;
            }
        };

        for line in content.lines() {
            for (interface_name, re) in &matchers {
                if let Some(cap) = re.captures(line) {
                    outcome
                        .implemented
                        .entry(interface_name.clone())
                        .or_default()
                        .insert(cap[1].to_string());
                }
            }
        }
    }

    Ok(outcome)
}

/// Enumerates the `.go` files to scan, sorted by name, excluding test units.
fn source_units(dir: &Path) -> Result<Vec<PathBuf>, StubgenError> {
    let entries = fs::read_dir(dir).map_err(|e| {
        StubgenError::ScanError(format!(
            "failed to read scan directory '{}': {e}",
            dir.display()
        ))
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let entry =
            entry.map_err(|e| StubgenError::ScanError(format!("failed to read entry: {e}")))?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        if path.extension().and_then(|e| e.to_str()) != Some("go") {
            continue;
        }
        if is_test_unit(&path) {
            continue;
        }
        files.push(path);
    }

    files.sort();
    Ok(files)
}

fn is_test_unit(path: &Path) -> bool {
    path.file_stem()
        .and_then(|s| s.to_str())
        .is_some_and(|stem| stem.ends_with("_test"))
}

pub mod contract;
pub mod error;
pub mod locale;
pub mod report;
pub mod scanner;
pub mod signature;
pub mod synth;
pub mod translate;

use std::path::Path;

pub use contract::{load_contract, parse_contract, InterfaceContract, InterfaceSpec, MethodDecl};
pub use error::StubgenError;
pub use report::{coverage_reports, render_report, CoverageReport};
pub use scanner::{scan_implementations, ScanOutcome};
pub use synth::{synthesize, write_stubs};

/// Output of one generation run: the full artifact text plus any
/// skipped-file warnings collected while scanning.
#[derive(Debug)]
pub struct GeneratedStubs {
    pub text: String,
    pub warnings: Vec<String>,
}

/// End-to-end pipeline: load the declared contract, scan the implementation
/// directory, and synthesize stubs for every missing method.
///
/// `only` optionally restricts synthesis to the listed method names (in the
/// caller's order); names absent from the live diff are skipped silently.
pub fn generate_stubs(
    definition_path: impl AsRef<Path>,
    scan_dir: impl AsRef<Path>,
    specs: &[InterfaceSpec],
    package: &str,
    only: Option<&[String]>,
) -> Result<GeneratedStubs, StubgenError> {
    let contracts = load_contract(definition_path, specs)?;
    let outcome = scan_implementations(scan_dir, specs)?;
    let text = synthesize(package, &contracts, &outcome.implemented, only)?;
    Ok(GeneratedStubs {
        text,
        warnings: outcome.warnings,
    })
}

/// Like [`generate_stubs`], then writes the artifact to `output` in a
/// single overwrite.
pub fn generate_stubs_to_path(
    definition_path: impl AsRef<Path>,
    scan_dir: impl AsRef<Path>,
    specs: &[InterfaceSpec],
    package: &str,
    only: Option<&[String]>,
    output: impl AsRef<Path>,
) -> Result<GeneratedStubs, StubgenError> {
    let generated = generate_stubs(definition_path, scan_dir, specs, package, only)?;
    write_stubs(output, &generated.text)?;
    Ok(generated)
}

/// Computes the per-interface coverage reports from the same contract and
/// scan inputs the generator uses, without writing anything.
pub fn coverage(
    definition_path: impl AsRef<Path>,
    scan_dir: impl AsRef<Path>,
    specs: &[InterfaceSpec],
) -> Result<(Vec<CoverageReport>, Vec<String>), StubgenError> {
    let contracts = load_contract(definition_path, specs)?;
    let outcome = scan_implementations(scan_dir, specs)?;
    let reports = coverage_reports(&contracts, &outcome.implemented);
    Ok((reports, outcome.warnings))
}

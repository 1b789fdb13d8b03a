//! Coverage reporting: implemented vs. missing methods per interface.

use std::collections::{BTreeMap, BTreeSet};

use crate::contract::InterfaceContract;
use crate::synth::missing_methods;

#[derive(Debug, Clone)]
/// Implemented/missing breakdown for one interface.
pub struct CoverageReport {
    pub interface_name: String,
    pub implemented: usize,
    pub missing: Vec<String>,
}

impl CoverageReport {
    pub fn declared(&self) -> usize {
        self.implemented + self.missing.len()
    }
}

/// Builds one report per contract from the scanned implemented sets.
pub fn coverage_reports(
    contracts: &[InterfaceContract],
    implemented: &BTreeMap<String, BTreeSet<String>>,
) -> Vec<CoverageReport> {
    contracts
        .iter()
        .map(|contract| {
            let implemented_set = implemented
                .get(&contract.name)
                .cloned()
                .unwrap_or_default();
            let missing: Vec<String> = missing_methods(contract, &implemented_set)
                .into_iter()
                .map(|decl| decl.name)
                .collect();
            CoverageReport {
                interface_name: contract.name.clone(),
                implemented: contract.methods.len() - missing.len(),
                missing,
            }
        })
        .collect()
}

/// Renders the report text. An empty missing set prints an explicit
/// "all implemented" marker rather than an empty list.
pub fn render_report(reports: &[CoverageReport]) -> String {
    let mut out = String::new();
    for report in reports {
        out.push_str(&format!(
            "{}: {} implemented, {} missing (of {} declared)\n",
            report.interface_name,
            report.implemented,
            report.missing.len(),
            report.declared()
        ));
        if report.missing.is_empty() {
            out.push_str("  all implemented\n");
        } else {
            for name in &report.missing {
                out.push_str(&format!("  missing: {name}\n"));
            }
        }
    }
    out
}

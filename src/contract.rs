//! Extraction of declared interface contracts from generated source text.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use regex::Regex;

use crate::error::StubgenError;

#[derive(Debug, Clone)]
/// An interface of interest and the receiver identifier its
/// implementations are defined against.
pub struct InterfaceSpec {
    /// Declared interface name (for example `MutationResolver`).
    pub name: String,
    /// Receiver/owner identifier (for example `mutationResolver`).
    pub owner: String,
}

impl InterfaceSpec {
    pub fn new(name: impl Into<String>, owner: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            owner: owner.into(),
        }
    }
}

#[derive(Debug, Clone)]
/// One declared method: its name and the full raw declaration line.
pub struct MethodDecl {
    pub name: String,
    /// Trimmed declaration line including parameter and return lists.
    pub signature: String,
}

#[derive(Debug, Clone)]
/// The declared contract of one interface, in source order.
///
/// Immutable after parse. An interface absent from the source yields an
/// empty `methods` list rather than an error; callers treat "declared with
/// zero extracted methods" the same as "not found".
pub struct InterfaceContract {
    pub name: String,
    pub owner: String,
    pub methods: Vec<MethodDecl>,
}

impl InterfaceContract {
    /// Looks up a declared method by exact (case-sensitive) name.
    pub fn method(&self, name: &str) -> Option<&MethodDecl> {
        self.methods.iter().find(|m| m.name == name)
    }

    /// Declared method names in extraction order.
    pub fn method_names(&self) -> Vec<&str> {
        self.methods.iter().map(|m| m.name.as_str()).collect()
    }
}

/// Parses the named interface blocks out of generated source text.
///
/// The opening line is matched per line; the block body is delimited by
/// brace-depth tracking to the matching close brace, so nested braces
/// inside a single-line signature never truncate the block.
pub fn parse_contract(
    source: &str,
    specs: &[InterfaceSpec],
) -> Result<Vec<InterfaceContract>, StubgenError> {
    if specs.is_empty() {
        return Err(StubgenError::ContractError(
            "no interfaces of interest were given".to_string(),
        ));
    }

    let method_re = Regex::new(r"^([A-Z][A-Za-z0-9_]*)\(").expect("valid regex");
    let lines: Vec<&str> = source.lines().collect();

    let mut contracts = Vec::with_capacity(specs.len());
    for spec in specs {
        let open_re = Regex::new(&format!(
            r"^\s*type\s+{}\s+interface\s*\{{",
            regex::escape(&spec.name)
        ))
        .expect("valid regex");

        let methods = match lines.iter().position(|line| open_re.is_match(line)) {
            Some(open_idx) => extract_methods(&lines, open_idx, &spec.name, &method_re)?,
            None => Vec::new(),
        };

        contracts.push(InterfaceContract {
            name: spec.name.clone(),
            owner: spec.owner.clone(),
            methods,
        });
    }

    Ok(contracts)
}

/// Reads the interface-definition file and parses the requested contracts.
///
/// A read failure is fatal (`SourceUnavailable`): no meaningful contract
/// can be derived without the definition source.
pub fn load_contract(
    path: impl AsRef<Path>,
    specs: &[InterfaceSpec],
) -> Result<Vec<InterfaceContract>, StubgenError> {
    let path = path.as_ref();
    let source = fs::read_to_string(path).map_err(|e| {
        StubgenError::SourceUnavailable(format!(
            "failed to read interface definitions '{}': {e}",
            path.display()
        ))
    })?;
    parse_contract(&source, specs)
}

fn extract_methods(
    lines: &[&str],
    open_idx: usize,
    interface_name: &str,
    method_re: &Regex,
) -> Result<Vec<MethodDecl>, StubgenError> {
    let mut methods = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    let mut depth = 0i32;

    for (i, line) in lines.iter().enumerate().skip(open_idx) {
        if i > open_idx && depth >= 1 {
            let trimmed = line.trim();
            if let Some(cap) = method_re.captures(trimmed) {
                let name = cap[1].to_string();
                // Duplicate declaration lines keep the first occurrence.
                if seen.insert(name.clone()) {
                    methods.push(MethodDecl {
                        name,
                        signature: trimmed.to_string(),
                    });
                }
            }
        }

        for ch in line.chars() {
            match ch {
                '{' => depth += 1,
                '}' => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(methods);
                    }
                }
                _ => {}
            }
        }
    }

    Err(StubgenError::ContractError(format!(
        "interface '{interface_name}' block is not closed before end of source"
    )))
}

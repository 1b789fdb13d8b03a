//! Synthesis of placeholder implementations for missing contract methods.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use crate::contract::{InterfaceContract, MethodDecl};
use crate::error::StubgenError;
use crate::signature::{parse_return_types, ReturnKind, ReturnType};

/// Computes the missing set for one interface: declared minus implemented,
/// case-sensitive, preserving the contract's extraction order.
pub fn missing_methods(
    contract: &InterfaceContract,
    implemented: &BTreeSet<String>,
) -> Vec<MethodDecl> {
    contract
        .methods
        .iter()
        .filter(|decl| !implemented.contains(&decl.name))
        .cloned()
        .collect()
}

/// Restricts a missing set to a caller-supplied name list, in the caller's
/// order. A listed name with no corresponding missing entry is skipped
/// silently and synthesis continues: the live diff is the source of truth,
/// and the external list is only a filter over it.
pub fn filter_missing(missing: &[MethodDecl], only: &[String]) -> Vec<MethodDecl> {
    only.iter()
        .filter_map(|name| missing.iter().find(|decl| &decl.name == name))
        .cloned()
        .collect()
}

/// Maps one classified return type to its zero-value expression.
///
/// Never fails: unrecognized types fall back to a nil reference.
pub fn zero_value(return_type: &ReturnType) -> &'static str {
    match return_type.kind {
        ReturnKind::Error => "fmt.Errorf(\"not implemented\")",
        ReturnKind::Str => "\"\"",
        ReturnKind::Bool => "false",
        ReturnKind::Int => "0",
        ReturnKind::Float => "0.0",
        ReturnKind::Pointer
        | ReturnKind::Slice
        | ReturnKind::Map
        | ReturnKind::Channel
        | ReturnKind::Other => "nil",
    }
}

/// Renders one stub: a doc comment naming the field the method resolves,
/// then a method body returning the zero values of its return list.
pub fn render_stub(owner: &str, decl: &MethodDecl) -> Result<String, StubgenError> {
    let return_types = parse_return_types(&decl.signature)?;
    let field = lower_first(&decl.name);

    let mut out = String::new();
    out.push_str(&format!(
        "// {} is the resolver for the {} field.\n",
        decl.name, field
    ));
    out.push_str(&format!("func (r *{}) {} {{\n", owner, decl.signature));
    if !return_types.is_empty() {
        let values: Vec<&str> = return_types.iter().map(zero_value).collect();
        out.push_str(&format!("\treturn {}\n", values.join(", ")));
    }
    out.push_str("}\n");
    Ok(out)
}

/// Renders the fixed artifact header: package clause, generated-file
/// notice, and the two imports every stub body needs.
pub fn render_header(package: &str) -> String {
    let mut out = String::new();
    out.push_str(&format!("package {package}\n\n"));
    out.push_str("// This file contains stub implementations for methods that are declared\n");
    out.push_str("// in the generated interfaces but not yet implemented.\n");
    out.push_str("// WARNING: This file is generated. Do not edit manually.\n\n");
    out.push_str("import (\n");
    out.push_str("\t\"context\"\n");
    out.push_str("\t\"fmt\"\n");
    out.push_str(")\n");
    out
}

/// Builds the complete stub artifact for all interface groups.
///
/// The header is emitted exactly once; stubs follow per interface, in the
/// contract's order (or the filter's order when `only` is given). Pure:
/// identical inputs produce byte-identical output.
pub fn synthesize(
    package: &str,
    contracts: &[InterfaceContract],
    implemented: &BTreeMap<String, BTreeSet<String>>,
    only: Option<&[String]>,
) -> Result<String, StubgenError> {
    let mut out = render_header(package);

    for contract in contracts {
        let implemented_set = implemented
            .get(&contract.name)
            .cloned()
            .unwrap_or_default();
        let mut missing = missing_methods(contract, &implemented_set);
        if let Some(only) = only {
            missing = filter_missing(&missing, only);
        }

        for decl in &missing {
            out.push('\n');
            out.push_str(&render_stub(&contract.owner, decl)?);
        }
    }

    Ok(out)
}

/// Writes the artifact in one shot, overwriting any prior content.
///
/// The full text is built in memory first, so a failed run writes nothing.
pub fn write_stubs(path: impl AsRef<Path>, text: &str) -> Result<(), StubgenError> {
    let path = path.as_ref();
    fs::write(path, text).map_err(|e| {
        StubgenError::Io(std::io::Error::new(
            e.kind(),
            format!("failed to write stubs '{}': {e}", path.display()),
        ))
    })
}

fn lower_first(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::InterfaceSpec;

    fn decl(name: &str, signature: &str) -> MethodDecl {
        MethodDecl {
            name: name.to_string(),
            signature: signature.to_string(),
        }
    }

    fn contract(name: &str, owner: &str, decls: Vec<MethodDecl>) -> InterfaceContract {
        InterfaceContract {
            name: name.to_string(),
            owner: owner.to_string(),
            methods: decls,
        }
    }

    #[test]
    fn missing_is_set_difference_in_contract_order() {
        let c = contract(
            "QueryResolver",
            "queryResolver",
            vec![
                decl("Routers", "Routers(ctx context.Context) ([]*model.Router, error)"),
                decl("Router", "Router(ctx context.Context, id string) (*model.Router, error)"),
                decl("Health", "Health(ctx context.Context) (bool, error)"),
            ],
        );
        let implemented: BTreeSet<String> = ["Router".to_string()].into();
        let missing = missing_methods(&c, &implemented);
        let names: Vec<&str> = missing.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["Routers", "Health"]);
    }

    #[test]
    fn filter_keeps_caller_order_and_skips_unknown_names() {
        let missing = vec![
            decl("A", "A() error"),
            decl("B", "B() error"),
            decl("C", "C() error"),
        ];
        let only = vec!["C".to_string(), "NotInContract".to_string(), "A".to_string()];
        let filtered = filter_missing(&missing, &only);
        let names: Vec<&str> = filtered.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["C", "A"]);
    }

    #[test]
    fn pointer_and_error_stub_is_literal() {
        let d = decl("Foo", "Foo(ctx context.Context) (*Widget, error)");
        let stub = render_stub("queryResolver", &d).unwrap();
        assert_eq!(
            stub,
            "// Foo is the resolver for the foo field.\n\
             func (r *queryResolver) Foo(ctx context.Context) (*Widget, error) {\n\
             \treturn nil, fmt.Errorf(\"not implemented\")\n\
             }\n"
        );
    }

    #[test]
    fn primitive_zero_values() {
        let d = decl("Flags", "Flags(ctx context.Context) (bool, string, int, []string)");
        let stub = render_stub("queryResolver", &d).unwrap();
        assert!(stub.contains("\treturn false, \"\", 0, nil\n"));
    }

    #[test]
    fn method_without_returns_has_empty_body() {
        let d = decl("Reset", "Reset(ctx context.Context)");
        let stub = render_stub("queryResolver", &d).unwrap();
        assert!(stub.ends_with(") {\n}\n"));
        assert!(!stub.contains("return"));
    }

    #[test]
    fn header_has_package_and_both_imports_once() {
        let header = render_header("resolver");
        assert!(header.starts_with("package resolver\n"));
        assert_eq!(header.matches("\"context\"").count(), 1);
        assert_eq!(header.matches("\"fmt\"").count(), 1);
    }

    #[test]
    fn synthesize_is_byte_identical_across_runs() {
        let specs = [InterfaceSpec::new("QueryResolver", "queryResolver")];
        let c = contract(
            &specs[0].name,
            &specs[0].owner,
            vec![decl(
                "Routers",
                "Routers(ctx context.Context) ([]*model.Router, error)",
            )],
        );
        let implemented = BTreeMap::new();
        let first = synthesize("resolver", &[c.clone()], &implemented, None).unwrap();
        let second = synthesize("resolver", &[c], &implemented, None).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn fully_implemented_interface_emits_header_only() {
        let c = contract(
            "QueryResolver",
            "queryResolver",
            vec![decl("Routers", "Routers(ctx context.Context) ([]*model.Router, error)")],
        );
        let mut implemented = BTreeMap::new();
        implemented.insert(
            "QueryResolver".to_string(),
            BTreeSet::from(["Routers".to_string()]),
        );
        let out = synthesize("resolver", &[c], &implemented, None).unwrap();
        assert_eq!(out, render_header("resolver"));
    }
}

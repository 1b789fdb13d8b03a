use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use stubgen::contract::InterfaceSpec;
use stubgen::{coverage, generate_stubs, generate_stubs_to_path, render_report, StubgenError};

struct TempDir {
    path: PathBuf,
}

impl TempDir {
    fn new(prefix: &str) -> Self {
        let stamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock")
            .as_nanos();
        let path = std::env::temp_dir().join(format!(
            "stubgen_synth_{}_{}_{}",
            prefix,
            std::process::id(),
            stamp
        ));
        fs::create_dir_all(&path).expect("create temp dir");
        Self { path }
    }

    fn write(&self, file: &str, content: &str) {
        fs::write(self.path.join(file), content).expect("write temp file");
    }

    fn file_path(&self, file: &str) -> PathBuf {
        self.path.join(file)
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        if self.path.exists() {
            let _ = fs::remove_dir_all(&self.path);
        }
    }
}

const GENERATED: &str = r#"
package graphql

type QueryResolver interface {
	Widget(ctx context.Context) (*Widget, error)
	Widgets(ctx context.Context) ([]*model.Widget, error)
	InstanceConfig(ctx context.Context, routerID string) (map[string]any, error)
	Health(ctx context.Context) (bool, error)
}

type SubscriptionResolver interface {
	InstallProgress(ctx context.Context, routerID string) (<-chan *model.InstallProgress, error)
}
"#;

fn specs() -> Vec<InterfaceSpec> {
    vec![
        InterfaceSpec::new("QueryResolver", "queryResolver"),
        InterfaceSpec::new("SubscriptionResolver", "subscriptionResolver"),
    ]
}

fn setup(prefix: &str) -> TempDir {
    let dir = TempDir::new(prefix);
    dir.write("generated.go", GENERATED);
    fs::create_dir_all(dir.file_path("resolvers")).expect("create resolvers dir");
    dir
}

#[test]
fn stub_for_pointer_and_error_is_literal() {
    let dir = setup("literal");
    let generated = generate_stubs(
        dir.file_path("generated.go"),
        dir.file_path("resolvers"),
        &specs(),
        "resolver",
        None,
    )
    .unwrap();

    assert!(generated.text.contains(
        "func (r *queryResolver) Widget(ctx context.Context) (*Widget, error) {\n\treturn nil, fmt.Errorf(\"not implemented\")\n}\n"
    ));
}

#[test]
fn channel_and_map_returns_are_nil() {
    let dir = setup("nil_kinds");
    let generated = generate_stubs(
        dir.file_path("generated.go"),
        dir.file_path("resolvers"),
        &specs(),
        "resolver",
        None,
    )
    .unwrap();

    assert!(generated.text.contains(
        "func (r *subscriptionResolver) InstallProgress(ctx context.Context, routerID string) (<-chan *model.InstallProgress, error) {\n\treturn nil, fmt.Errorf(\"not implemented\")\n}\n"
    ));
    assert!(generated.text.contains(
        "func (r *queryResolver) InstanceConfig(ctx context.Context, routerID string) (map[string]any, error) {\n\treturn nil, fmt.Errorf(\"not implemented\")\n}\n"
    ));
}

#[test]
fn implemented_methods_are_excluded() {
    let dir = setup("excluded");
    dir.write(
        "resolvers/widget.go",
        "package resolver\n\nfunc (r *queryResolver) Widget(ctx context.Context) (*Widget, error) {\n\treturn r.svc.Widget(ctx)\n}\n",
    );

    let generated = generate_stubs(
        dir.file_path("generated.go"),
        dir.file_path("resolvers"),
        &specs(),
        "resolver",
        None,
    )
    .unwrap();

    assert!(!generated.text.contains("// Widget is the resolver"));
    assert!(generated.text.contains("// Widgets is the resolver for the widgets field."));
}

#[test]
fn test_file_implementations_still_report_fully_missing() {
    let dir = setup("test_only");
    dir.write(
        "resolvers/widget_test.go",
        "package resolver\n\nfunc (r *queryResolver) Widget(ctx context.Context) (*Widget, error) {\n\treturn nil, nil\n}\n",
    );

    let (reports, _) = coverage(
        dir.file_path("generated.go"),
        dir.file_path("resolvers"),
        &specs(),
    )
    .unwrap();

    let query = reports
        .iter()
        .find(|r| r.interface_name == "QueryResolver")
        .unwrap();
    assert_eq!(query.implemented, 0);
    assert_eq!(query.missing.len(), 4);
}

#[test]
fn report_prints_all_implemented_marker() {
    let dir = setup("all_impl");
    dir.write(
        "resolvers/all.go",
        "package resolver\n\nfunc (r *subscriptionResolver) InstallProgress(ctx context.Context, routerID string) (<-chan *model.InstallProgress, error) {\n\treturn nil, nil\n}\n",
    );

    let (reports, _) = coverage(
        dir.file_path("generated.go"),
        dir.file_path("resolvers"),
        &specs(),
    )
    .unwrap();
    let text = render_report(&reports);

    assert!(text.contains("SubscriptionResolver: 1 implemented, 0 missing"));
    assert!(text.contains("all implemented"));
    assert!(text.contains("QueryResolver: 0 implemented, 4 missing"));
}

#[test]
fn two_runs_write_byte_identical_artifacts() {
    let dir = setup("idempotent");
    let output = dir.file_path("stubs.resolvers.go");

    generate_stubs_to_path(
        dir.file_path("generated.go"),
        dir.file_path("resolvers"),
        &specs(),
        "resolver",
        None,
        &output,
    )
    .unwrap();
    let first = fs::read(&output).unwrap();

    generate_stubs_to_path(
        dir.file_path("generated.go"),
        dir.file_path("resolvers"),
        &specs(),
        "resolver",
        None,
        &output,
    )
    .unwrap();
    let second = fs::read(&output).unwrap();

    assert_eq!(first, second);
}

#[test]
fn output_overwrites_prior_content() {
    let dir = setup("overwrite");
    let output = dir.file_path("stubs.resolvers.go");
    dir.write("stubs.resolvers.go", "stale hand-edited content\n");

    generate_stubs_to_path(
        dir.file_path("generated.go"),
        dir.file_path("resolvers"),
        &specs(),
        "resolver",
        None,
        &output,
    )
    .unwrap();

    let content = fs::read_to_string(&output).unwrap();
    assert!(content.starts_with("package resolver\n"));
    assert!(!content.contains("stale hand-edited"));
}

#[test]
fn only_filter_orders_and_tolerates_unknown_names() {
    let dir = setup("filter");
    let only = vec![
        "Health".to_string(),
        "NotInContract".to_string(),
        "Widget".to_string(),
    ];

    let generated = generate_stubs(
        dir.file_path("generated.go"),
        dir.file_path("resolvers"),
        &specs(),
        "resolver",
        Some(&only),
    )
    .unwrap();

    let health_at = generated.text.find("// Health is the resolver").unwrap();
    let widget_at = generated.text.find("// Widget is the resolver").unwrap();
    assert!(health_at < widget_at);
    assert!(!generated.text.contains("NotInContract"));
    assert!(!generated.text.contains("// Widgets is the resolver"));
}

#[test]
fn unreadable_definition_source_is_fatal() {
    let dir = setup("fatal");
    let err = generate_stubs(
        dir.file_path("missing.go"),
        dir.file_path("resolvers"),
        &specs(),
        "resolver",
        None,
    )
    .unwrap_err();
    assert!(matches!(err, StubgenError::SourceUnavailable(_)));
}

#[test]
fn header_is_emitted_exactly_once() {
    let dir = setup("header_once");
    let generated = generate_stubs(
        dir.file_path("generated.go"),
        dir.file_path("resolvers"),
        &specs(),
        "resolver",
        None,
    )
    .unwrap();

    assert_eq!(generated.text.matches("package resolver").count(), 1);
    assert_eq!(generated.text.matches("import (").count(), 1);
}

//! Tests for build scripts replayed against the markup facade

use std::path::PathBuf;

use tempfile::TempDir;

use depthtree::application::{ApplicationError, BuildReport, Script};
use depthtree::config::Settings;
use depthtree::markup::{DisplayOptions, NodeKind, TreeNodeConvert};

const COMPANY: &str = r#"
[[add]]
args = ["company"]

[[add]]
indent = 1
args = [{ kind = "element", name = "staff", attrs = { id = 1 } }]

[[add]]
indent = 2
args = [
    { kind = "element", name = "firstname", text = "yong" },
    { kind = "element", name = "lastname", text = "mook kim" },
]

[[add]]
as = "comment"
indent = 1
args = ["end of staff"]
"#;

fn create_script(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).expect("write script");
    path
}

#[test]
fn given_company_script_when_running_then_builds_nested_tree() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let path = create_script(&temp, "company.toml", COMPANY);

    // Act
    let markup = Script::load(&path).unwrap().run(&Settings::default()).unwrap();

    // Assert
    let doc = markup.document();
    let company = markup.get().unwrap();
    let level1 = doc.children(company);
    assert_eq!(level1.len(), 2);
    let staff = level1[0];
    assert_eq!(doc.attribute(staff, "id"), Some("1"));
    assert_eq!(doc.children(staff).len(), 2);
    assert_eq!(doc.kind(level1[1]), Some(&NodeKind::Comment("end of staff".into())));
    assert_eq!(doc.text_content(staff), "yongmook kim");
}

#[test]
fn given_company_script_when_reporting_then_counts_match() {
    // Arrange
    let script = Script::parse(COMPANY, "company.toml").unwrap();

    // Act
    let report = BuildReport::from_markup(&script.run(&Settings::default()).unwrap());

    // Assert
    assert_eq!(report.top_level, 1);
    assert_eq!(report.added, 5);
    assert_eq!(report.height, 4);
    assert_eq!(report.by_kind.get("element"), Some(&4));
    assert_eq!(report.by_kind.get("comment"), Some(&1));
}

#[test]
fn given_script_base_depth_when_running_then_overrides_settings() {
    // Arrange
    let script = Script::parse(
        r#"
base_depth = 3

[[add]]
args = ["a"]

[[add]]
indent = 1
args = ["b"]
"#,
        "inline.toml",
    )
    .unwrap();
    let settings = Settings {
        base_depth: 1,
        ..Settings::default()
    };

    // Act
    let markup = script.run(&settings).unwrap();

    // Assert
    let doc = markup.document();
    let a = markup.get().unwrap();
    assert_eq!(doc.children(a).len(), 1);
}

#[test]
fn given_grouped_args_with_marker_when_running_then_marker_applies_to_rest() {
    // Arrange
    let script = Script::parse(
        r#"
[[add]]
args = ["list", ["x", { kind = "indent" }, "y"], "z"]
"#,
        "inline.toml",
    )
    .unwrap();

    // Act
    let markup = script.run(&Settings::default()).unwrap();

    // Assert
    let doc = markup.document();
    assert_eq!(markup.children().len(), 2);
    let x = markup.children()[1];
    assert_eq!(doc.children(x).len(), 2);
}

#[test]
fn given_missing_file_when_loading_then_operation_failed() {
    let result = Script::load(&PathBuf::from("/nonexistent/script.toml"));
    assert!(matches!(result, Err(ApplicationError::OperationFailed { .. })));
}

#[test]
fn given_invalid_toml_when_parsing_then_script_error_names_path() {
    let err = Script::parse("[[add]\nargs = ", "broken.toml").unwrap_err();
    assert!(err.to_string().contains("broken.toml"));
}

#[test]
fn given_script_when_exporting_then_outline_starts_at_document_root() {
    // Arrange
    let markup = Script::parse(COMPANY, "company.toml")
        .unwrap()
        .run(&Settings::default())
        .unwrap();

    // Act
    let (document, root) = markup.export();
    let outline = document.subtree(root, &DisplayOptions::default()).to_string();
    let direct = markup.to_tree_string(&DisplayOptions::default()).to_string();

    // Assert
    assert!(outline.starts_with("#document"));
    assert!(outline.contains("<staff id=\"1\">"));
    assert!(direct.starts_with("<company>"));
}

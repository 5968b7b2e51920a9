//! Scaffold project file tests against the bundled fixtures

use std::path::PathBuf;

use pretty_assertions::assert_eq;

use rust_apiscaffold::model::{DbObject, DbObjectKind};
use rust_apiscaffold::project::{parse_scaffold_config, CrudAction};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
        .join("project.scaffold.xml")
}

#[test]
fn test_store_fixture_config() {
    let path = fixture("store");
    let config = parse_scaffold_config(&path).unwrap();
    let dir = path.parent().unwrap();

    assert_eq!(config.name, "Store");
    assert_eq!(config.schema_path, dir.join("store.schema.xml"));
    assert_eq!(config.output_directory, dir.join("generated"));

    let patterns: Vec<&str> = config.selections.iter().map(|s| s.pattern.as_str()).collect();
    assert_eq!(patterns, vec!["*.*", "Sales.OrderDetail"]);
}

#[test]
fn test_store_fixture_project_settings() {
    let project = parse_scaffold_config(&fixture("store"))
        .unwrap()
        .load_project()
        .unwrap();

    let detail = DbObject::new("Sales", "OrderDetail", DbObjectKind::Table);
    let order = DbObject::new("Sales", "Order", DbObjectKind::Table);

    assert!(!project.resolve(&detail).is_enabled(CrudAction::Delete));
    assert!(project.resolve(&detail).use_logger);
    assert!(project.resolve(&order).is_enabled(CrudAction::Delete));

    let features: Vec<&str> = project.features().iter().map(|f| f.name.as_str()).collect();
    assert_eq!(features, vec!["dbo", "Sales"]);
}

#[test]
fn test_audited_fixture_defaults_output_directory() {
    let path = fixture("audited");
    let project = parse_scaffold_config(&path).unwrap().load_project().unwrap();

    assert_eq!(project.name, "Hr");
    assert_eq!(project.output_directory, path.parent().unwrap().join("generated"));
    let settings = project.global_settings();
    assert!(settings.entities_with_data_contracts);
    assert_eq!(settings.concurrency_token, "Timestamp");
    assert!(settings.audit_entity.is_some());
}

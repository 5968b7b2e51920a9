//! Selection pattern and settings resolution tests

use pretty_assertions::assert_eq;

use rust_apiscaffold::model::{Database, DbObject, DbObjectKind};
use rust_apiscaffold::project::{CrudAction, Project, SelectionPattern};

fn product() -> DbObject {
    DbObject::new("dbo", "Product", DbObjectKind::Table)
}

fn project() -> Project {
    Project::new("Store", Database::new("Store"))
}

#[test]
fn test_pattern_parsing() {
    assert_eq!(SelectionPattern::parse("*.*").unwrap(), SelectionPattern::Global);
    assert_eq!(
        SelectionPattern::parse("Sales.*").unwrap(),
        SelectionPattern::Schema("Sales".to_string())
    );
    assert_eq!(
        SelectionPattern::parse("*.Order").unwrap(),
        SelectionPattern::Name("Order".to_string())
    );
    assert_eq!(
        SelectionPattern::parse("Sales.Order").unwrap().to_string(),
        "Sales.Order"
    );
}

#[test]
fn test_invalid_patterns_are_rejected() {
    for pattern in ["", "Product", "dbo.Pro*", "a.b.c", ".Product"] {
        let err = SelectionPattern::parse(pattern).unwrap_err();
        assert!(
            err.to_string().contains("Invalid selection pattern"),
            "pattern '{}' gave: {}",
            pattern,
            err
        );
    }
}

#[test]
fn test_precedence_exact_schema_name_global() {
    let mut project = project();
    project.global_selection_with(|s| s.concurrency_token = "global".to_string());
    project.select("*.Product", |s| s.concurrency_token = "name".to_string()).unwrap();
    project.select("dbo.*", |s| s.concurrency_token = "schema".to_string()).unwrap();
    project
        .select("dbo.Product", |s| s.concurrency_token = "exact".to_string())
        .unwrap();

    assert_eq!(project.resolve(&product()).concurrency_token, "exact");

    project.remove_selection("dbo.Product").unwrap();
    assert_eq!(project.resolve(&product()).concurrency_token, "schema");

    project.remove_selection("dbo.*").unwrap();
    assert_eq!(project.resolve(&product()).concurrency_token, "name");

    project.remove_selection("*.Product").unwrap();
    assert_eq!(project.resolve(&product()).concurrency_token, "global");
}

#[test]
fn test_name_selection_beats_global_in_every_schema() {
    let mut project = project();
    project.select("*.Product", |s| s.use_logger = true).unwrap();

    assert!(project.resolve(&product()).use_logger);
    assert!(project
        .resolve(&DbObject::new("Archive", "Product", DbObjectKind::Table))
        .use_logger);
    assert!(!project
        .resolve(&DbObject::new("dbo", "Category", DbObjectKind::Table))
        .use_logger);
}

#[test]
fn test_selection_snapshots_global_at_creation() {
    let mut project = project();
    project.global_selection_with(|s| s.use_logger = true);
    project.select("dbo.Product", |_| {}).unwrap();
    project.global_selection_with(|s| {
        s.use_logger = false;
        s.force_overwrite = true;
        s.concurrency_token = "Timestamp".to_string();
    });

    let settings = project.resolve(&product());
    assert!(settings.use_logger);
    assert!(!settings.force_overwrite);
    assert_eq!(settings.concurrency_token, "");
    assert!(project.global_settings().force_overwrite);
}

#[test]
fn test_global_selection_cannot_be_removed() {
    let mut project = project();
    project.global_selection();
    let err = project.remove_selection("*.*").unwrap_err();
    assert!(err.to_string().contains("cannot be removed"));
}

#[test]
fn test_remove_action_scopes_to_pattern() {
    let mut project = project();
    project.remove_action("dbo.Product", CrudAction::Delete).unwrap();

    assert!(!project.resolve(&product()).is_enabled(CrudAction::Delete));
    assert!(project.resolve(&product()).is_enabled(CrudAction::Update));
    assert!(project.global_settings().is_enabled(CrudAction::Delete));
}

#[test]
fn test_force_overwrite_all_reaches_existing_selections() {
    let mut project = project();
    project.select("Sales.*", |_| {}).unwrap();
    project.force_overwrite_all();

    assert!(project.global_settings().force_overwrite);
    assert!(project.resolve_schema("Sales").force_overwrite);
}

#[test]
fn test_action_names_parse_case_insensitively() {
    assert_eq!("delete".parse::<CrudAction>().unwrap(), CrudAction::Delete);
    assert_eq!("ReadAll".parse::<CrudAction>().unwrap(), CrudAction::ReadAll);
    assert!("Merge".parse::<CrudAction>().is_err());
}

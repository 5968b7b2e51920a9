//! Scaffolder API tests: hooks, injected strategies and failure modes

use std::cell::RefCell;
use std::rc::Rc;

use pretty_assertions::assert_eq;

use rust_apiscaffold::definition::ObjectDefinition;
use rust_apiscaffold::model::{Column, Database, Table};
use rust_apiscaffold::naming::{DefaultNamingConvention, NamingConvention};
use rust_apiscaffold::project::Project;
use rust_apiscaffold::render::{EmitOutcome, Renderer, ScaffoldHooks};
use rust_apiscaffold::Scaffolder;

use crate::common::{product_database, TestContext};

fn product_project(ctx: &TestContext) -> Project {
    let mut project =
        Project::new("Store", product_database()).with_output_directory(ctx.output_dir());
    project.build_features();
    project
}

#[test]
fn test_hooks_see_every_file_in_order() {
    let ctx = TestContext::empty();
    let project = product_project(&ctx);
    let events = Rc::new(RefCell::new(Vec::new()));
    let before = Rc::clone(&events);
    let after = Rc::clone(&events);

    let hooks = ScaffoldHooks::new()
        .before_scaffold(move |e| before.borrow_mut().push((e.definition.name().to_string(), None)))
        .after_scaffold(move |e| after.borrow_mut().push((e.definition.name().to_string(), e.outcome)));
    let report = Scaffolder::new(&project).with_hooks(hooks).scaffold().unwrap();

    let events = events.borrow();
    assert_eq!(events.len(), report.files.len() * 2);
    assert_eq!(events[0], ("Category".to_string(), None));
    assert_eq!(
        events[1],
        ("Category".to_string(), Some(EmitOutcome::Written))
    );
}

#[test]
fn test_views_get_entity_and_read_all_only() {
    let ctx = TestContext::empty();
    let project = product_project(&ctx);
    let plan = Scaffolder::new(&project).plan().unwrap();

    let names: Vec<&str> = plan.iter().map(|p| p.definition.name()).collect();
    assert!(names.contains(&"ProductSummary"));
    assert!(!names.contains(&"ProductSummaryRequest"));

    let controller = plan
        .iter()
        .find_map(|p| match &p.definition {
            ObjectDefinition::Class(class) if class.name == "DboController" => Some(class),
            _ => None,
        })
        .unwrap();
    let view_actions: Vec<&str> = controller
        .methods
        .iter()
        .map(|m| m.name.as_str())
        .filter(|n| n.contains("ProductSummar"))
        .collect();
    assert_eq!(view_actions, vec!["GetProductSummariesAsync"]);
}

/// Prefixes every entity with `Tbl`
struct PrefixedNaming;

impl NamingConvention for PrefixedNaming {
    fn pascal_case(&self, name: &str) -> String {
        DefaultNamingConvention.pascal_case(name)
    }

    fn camel_case(&self, name: &str) -> String {
        DefaultNamingConvention.camel_case(name)
    }

    fn plural_name(&self, name: &str) -> String {
        DefaultNamingConvention.plural_name(name)
    }

    fn singular_name(&self, name: &str) -> String {
        DefaultNamingConvention.singular_name(name)
    }

    fn escape_identifier(&self, name: String) -> String {
        DefaultNamingConvention.escape_identifier(name)
    }

    fn entity_name(&self, object_name: &str) -> String {
        format!("Tbl{}", self.singular_name(&self.pascal_case(object_name)))
    }
}

#[test]
fn test_naming_convention_is_injected() {
    let ctx = TestContext::empty();
    let project = product_project(&ctx);
    Scaffolder::new(&project)
        .with_naming(PrefixedNaming)
        .scaffold()
        .unwrap();

    let files = ctx.generated_files();
    assert!(files.contains(&"Models/TblProduct.cs".to_string()));
    assert!(files.contains(&"Requests/TblProductRequest.cs".to_string()));
    assert!(ctx
        .generated("Controllers/DboController.cs")
        .contains("GetTblProductsAsync"));
}

/// Emits one line per definition
struct OutlineRenderer;

impl Renderer for OutlineRenderer {
    fn file_extension(&self) -> &str {
        "txt"
    }

    fn render(&self, definition: &ObjectDefinition) -> String {
        format!("{}.{}\n", definition.namespace(), definition.name())
    }
}

#[test]
fn test_renderer_is_injected() {
    let ctx = TestContext::empty();
    let project = product_project(&ctx);
    Scaffolder::new(&project)
        .with_renderer(OutlineRenderer)
        .scaffold()
        .unwrap();

    assert_eq!(ctx.generated("Models/Product.txt"), "Store.Models.Product\n");
    assert!(ctx.generated_files().iter().all(|f| f.ends_with(".txt")));
}

#[test]
fn test_unknown_column_type_fails_before_writing() {
    let ctx = TestContext::empty();
    let database = Database::new("Geo").with_table(
        Table::new("dbo", "Place")
            .with_column(Column::new("PlaceID", "int"))
            .with_column(Column::new("Location", "geography"))
            .with_primary_key(&["PlaceID"]),
    );
    let project = Project::new("Geo", database).with_output_directory(ctx.output_dir());

    let err = Scaffolder::new(&project).scaffold().unwrap_err();
    let message = err.to_string();
    assert!(message.contains("dbo.Place"), "{}", message);
    assert!(message.contains("geography"), "{}", message);
    assert!(!ctx.output_dir().exists());
}

#[test]
fn test_entity_name_collision_is_reported() {
    let ctx = TestContext::empty();
    let database = Database::new("Store")
        .with_table(Table::new("dbo", "Category").with_column(Column::new("Id", "int")))
        .with_table(Table::new("dbo", "Categories").with_column(Column::new("Id", "int")));
    let project = Project::new("Store", database).with_output_directory(ctx.output_dir());

    let err = Scaffolder::new(&project).scaffold().unwrap_err();
    let message = err.to_string();
    assert!(message.contains("Category"), "{}", message);
    assert!(message.contains("dbo.Categories"), "{}", message);
    assert!(!ctx.output_dir().exists());
}

fn keyed_table(schema: &str, name: &str) -> Table {
    Table::new(schema, name)
        .with_column(Column::new("Id", "int"))
        .with_primary_key(&["Id"])
}

#[test]
fn test_entity_clashing_with_request_model_is_reported() {
    let ctx = TestContext::empty();
    let database = Database::new("Store")
        .with_table(keyed_table("dbo", "Product"))
        .with_table(keyed_table("dbo", "ProductRequest"));
    let project = Project::new("Store", database).with_output_directory(ctx.output_dir());

    let err = Scaffolder::new(&project).scaffold().unwrap_err();
    assert_eq!(
        err.to_string(),
        "Naming collision: dbo.ProductRequest and dbo.Product both generate type ProductRequest"
    );
    assert!(!ctx.output_dir().exists());
}

#[test]
fn test_entity_clashing_with_response_envelope_is_reported() {
    let ctx = TestContext::empty();
    let database = Database::new("Store").with_table(keyed_table("dbo", "PagedResponse"));
    let project = Project::new("Store", database).with_output_directory(ctx.output_dir());

    let err = Scaffolder::new(&project).scaffold().unwrap_err();
    assert_eq!(
        err.to_string(),
        "Naming collision: dbo.PagedResponse and Store both generate type PagedResponse"
    );
    assert!(!ctx.output_dir().exists());
}

#[test]
fn test_incomplete_audit_entity_fails() {
    let ctx = TestContext::empty();
    let mut project = Project::new("Store", product_database()).with_output_directory(ctx.output_dir());
    project.global_selection_with(|s| {
        s.audit_entity = Some(rust_apiscaffold::project::AuditEntity::new(
            "CreatedBy",
            "",
            "UpdatedBy",
            "UpdatedAt",
        ))
    });

    let err = Scaffolder::new(&project).plan().unwrap_err();
    assert!(err.to_string().contains("CreationDateTime"), "{}", err);
}

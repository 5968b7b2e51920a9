//! The Entity Framework database context

use anyhow::Result;
use tracing::debug;

use crate::definition::{
    AccessModifier, ClassDefinition, ConstructorDefinition, Lines, MethodDefinition,
    ObjectDefinition, ParameterDefinition, PropertyDefinition,
};
use crate::model::SchemaObject;

use super::{BuildContext, Layer};

/// Build `<Project>DbContext` with one `DbSet` per table and view and the
/// mapping of keys, tables, views and the concurrency token
pub fn build_db_context(ctx: &BuildContext) -> Result<ObjectDefinition> {
    let database = &ctx.project.database;
    let name = ctx.db_context_name();

    let mut class = ClassDefinition::new(ctx.namespace(Layer::Models), name.clone());
    class.import("Microsoft.EntityFrameworkCore");
    class.base_class = Some("DbContext".to_string());

    class.constructors.push(ConstructorDefinition {
        parameters: vec![ParameterDefinition::new(
            format!("DbContextOptions<{}>", name),
            "options",
        )],
        base_arguments: Some(vec!["options".to_string()]),
        ..ConstructorDefinition::default()
    });

    let mut lines = Lines::new();
    for table in &database.tables {
        let entity = ctx.entity_name(table);
        class.properties.push(PropertyDefinition::automatic(
            format!("DbSet<{}>", entity),
            ctx.naming.plural_name(&entity),
        ));

        lines.code(format!("modelBuilder.Entity<{}>(builder =>", entity)).open();
        lines.code(format!(
            "builder.ToTable(\"{}\", \"{}\");",
            table.name, table.schema
        ));

        let key: Vec<String> = table
            .key_columns()
            .iter()
            .map(|c| format!("p.{}", ctx.naming.property_name(c)))
            .collect();
        match key.as_slice() {
            [] => {
                lines.code("builder.HasNoKey();");
            }
            [single] => {
                lines.code(format!("builder.HasKey(p => {});", single));
            }
            _ => {
                lines.code(format!("builder.HasKey(p => new {{ {} }});", key.join(", ")));
            }
        }

        if let Some(identity) = &table.identity {
            lines.code(format!(
                "builder.Property(p => p.{}).UseIdentityColumn();",
                ctx.naming.property_name(&identity.column)
            ));
        }

        let settings = ctx.settings(table);
        if table.column(&settings.concurrency_token).is_some() {
            lines.code(format!(
                "builder.Property(p => p.{}).IsRowVersion();",
                ctx.naming.property_name(&settings.concurrency_token)
            ));
        }
        lines.close_with(");").blank();
    }

    for view in &database.views {
        let entity = ctx.entity_name(view);
        class.properties.push(PropertyDefinition::automatic(
            format!("DbSet<{}>", entity),
            ctx.naming.plural_name(&entity),
        ));

        lines.code(format!("modelBuilder.Entity<{}>(builder =>", entity)).open();
        lines.code("builder.HasNoKey();");
        lines.code(format!(
            "builder.ToView(\"{}\", \"{}\");",
            view.name, view.schema
        ));
        lines.close_with(");").blank();
    }

    lines.code("base.OnModelCreating(modelBuilder);");

    let mut on_model_creating = MethodDefinition::new("void", "OnModelCreating");
    on_model_creating.access = AccessModifier::Protected;
    on_model_creating.is_override = true;
    on_model_creating
        .parameters
        .push(ParameterDefinition::new("ModelBuilder", "modelBuilder"));
    on_model_creating.lines = lines.build();
    class.methods.push(on_model_creating);

    debug!("Built database context {}", class.name);
    Ok(class.into())
}

//! Request models and their conversion to entities

use anyhow::Result;
use tracing::debug;

use crate::definition::{
    AttributeDefinition, ClassDefinition, Lines, MethodDefinition, ObjectDefinition,
    ParameterDefinition, PropertyDefinition,
};
use crate::model::Table;

use super::{BuildContext, Layer};

/// Build `<Entity>Request` for a table.
///
/// Key columns carry `[Key]`, other non-nullable columns `[Required]`, and
/// string columns with a positive length `[StringLength(n)]`.
pub fn build_request_model(ctx: &BuildContext, table: &Table) -> Result<ObjectDefinition> {
    let entity = ctx.entity_name(table);
    let mut class = ClassDefinition::new(
        ctx.namespace(Layer::Requests),
        ctx.naming.request_model_name(&entity),
    );
    class.import("System");
    class.import("System.ComponentModel.DataAnnotations");

    for column in ctx.request_columns(table) {
        let mut property = PropertyDefinition::automatic(
            ctx.column_type(table, column)?,
            ctx.naming.property_name(&column.name),
        );

        if table.is_key_column(&column.name) {
            property = property.with_attribute(AttributeDefinition::new("Key"));
        } else if !column.is_nullable {
            property = property.with_attribute(AttributeDefinition::new("Required"));
        }

        if ctx.types.is_string(column) {
            if let Some(length) = column.length.filter(|l| *l > 0) {
                property = property.with_attribute(
                    AttributeDefinition::new("StringLength").with_argument(length.to_string()),
                );
            }
        }

        class.properties.push(property);
    }

    debug!("Built request model {}", class.name);
    Ok(class.into())
}

/// Build the static `RequestExtensions` class with one `ToEntity` per table
pub fn build_request_extensions(ctx: &BuildContext, tables: &[&Table]) -> Result<ObjectDefinition> {
    let mut class = ClassDefinition::new(ctx.namespace(Layer::Requests), "RequestExtensions");
    class.is_static = true;
    class.import(ctx.namespace(Layer::Models));

    for table in tables {
        let entity = ctx.entity_name(*table);

        let mut method = MethodDefinition::new(entity.clone(), "ToEntity");
        method.is_static = true;
        method.is_extension = true;
        method.parameters.push(ParameterDefinition::new(
            ctx.naming.request_model_name(&entity),
            "request",
        ));

        let columns = ctx.request_columns(table);
        let mut lines = Lines::new();
        lines.code(format!("return new {}", entity)).open();
        for (index, column) in columns.iter().enumerate() {
            let property = ctx.naming.property_name(&column.name);
            let separator = if index + 1 < columns.len() { "," } else { "" };
            lines.code(format!("{} = request.{}{}", property, property, separator));
        }
        lines.close_with(";");
        method.lines = lines.build();

        class.methods.push(method);
    }

    debug!("Built request extensions for {} tables", tables.len());
    Ok(class.into())
}

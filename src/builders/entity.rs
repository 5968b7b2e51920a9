//! Entity classes, one per table or view

use anyhow::Result;
use tracing::debug;

use crate::definition::{
    ClassDefinition, ConstructorDefinition, Lines, ObjectDefinition, ParameterDefinition,
    PropertyDefinition,
};
use crate::model::SchemaObject;

use super::{key_columns, BuildContext, Layer};

/// Build the entity class for a table or view.
///
/// Tables with a primary key also get a key constructor, which the repository
/// lookups and the controllers use to build a search entity.
pub fn build_entity(ctx: &BuildContext, object: &dyn SchemaObject) -> Result<ObjectDefinition> {
    let mut class = ClassDefinition::new(ctx.namespace(Layer::Models), ctx.entity_name(object));
    class.import("System");
    class.is_partial = true;
    class.documentation = Some(format!(
        "Represents the {} {}",
        object.kind().as_str().to_lowercase(),
        object.full_name()
    ));

    for column in object.columns() {
        class.properties.push(PropertyDefinition::automatic(
            ctx.column_type(object, column)?,
            ctx.naming.property_name(&column.name),
        ));
    }

    if let Some(table) = ctx.project.database.find_table(&object.full_name()) {
        let key = key_columns(table)?;
        if !key.is_empty() {
            class.constructors.push(ConstructorDefinition::default());

            let mut constructor = ConstructorDefinition::default();
            let mut lines = Lines::new();
            for column in key {
                let parameter = ctx.naming.parameter_name(&column.name);
                lines.code(format!(
                    "{} = {};",
                    ctx.naming.property_name(&column.name),
                    parameter
                ));
                constructor
                    .parameters
                    .push(ParameterDefinition::new(ctx.column_type(table, column)?, parameter));
            }
            constructor.lines = lines.build();
            class.constructors.push(constructor);
        }
    }

    debug!("Built entity {}", class.name);
    Ok(class.into())
}

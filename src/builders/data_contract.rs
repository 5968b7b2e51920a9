//! Data contracts: entity columns joined with their foreign key targets

use anyhow::Result;
use tracing::debug;

use crate::definition::{ClassDefinition, ObjectDefinition, PropertyDefinition};
use crate::model::{Column, ForeignKey, SchemaObject, Table};

use super::{BuildContext, Layer};

/// A foreign key target joined into a data contract
pub(crate) struct ContractJoin<'a> {
    pub foreign_key: &'a ForeignKey,
    pub target: &'a Table,
    /// Target columns with the contract property each one fills
    pub columns: Vec<(&'a Column, String)>,
}

/// Joins of a table's data contract, in foreign key order.
///
/// Every target contributes its non-key columns prefixed with the target
/// entity name (`CategoryCategoryName`); a name already taken is skipped.
pub(crate) fn contract_joins<'a>(
    ctx: &BuildContext<'a>,
    table: &'a Table,
) -> Result<Vec<ContractJoin<'a>>> {
    let mut taken: Vec<String> = table
        .columns
        .iter()
        .map(|c| ctx.naming.property_name(&c.name))
        .collect();

    let mut joins = Vec::new();
    for foreign_key in &table.foreign_keys {
        let target = ctx.foreign_key_target(table, foreign_key)?;
        let target_entity = ctx.entity_name(target);

        let mut columns = Vec::new();
        for column in target.columns.iter().filter(|c| !target.is_key_column(&c.name)) {
            let name = format!("{}{}", target_entity, ctx.naming.property_name(&column.name));
            if taken.contains(&name) {
                continue;
            }
            taken.push(name.clone());
            columns.push((column, name));
        }

        joins.push(ContractJoin {
            foreign_key,
            target,
            columns,
        });
    }
    Ok(joins)
}

/// Build `<Entity>DataContract` for a table: its own columns followed by the
/// joined columns of every foreign key target
pub fn build_data_contract(ctx: &BuildContext, table: &Table) -> Result<ObjectDefinition> {
    let entity = ctx.entity_name(table);
    let mut class = ClassDefinition::new(
        ctx.namespace(Layer::Models),
        ctx.naming.data_contract_name(&entity),
    );
    class.import("System");

    for column in &table.columns {
        class.properties.push(PropertyDefinition::automatic(
            ctx.column_type(table, column)?,
            ctx.naming.property_name(&column.name),
        ));
    }

    for join in contract_joins(ctx, table)? {
        for (column, name) in join.columns {
            class.properties.push(PropertyDefinition::automatic(
                ctx.nullable_column_type(join.target, column)?,
                name,
            ));
        }
    }

    debug!("Built data contract {}", class.name);
    Ok(class.into())
}

//! Definition builders
//!
//! Each builder is a pure function from the project (through [`BuildContext`])
//! to one or more [`ObjectDefinition`]s. Nothing here touches the file system;
//! the orchestrator decides where and whether definitions are written.

mod controller;
mod data_contract;
mod db_context;
mod entity;
mod repository;
mod requests;
mod responses;

use anyhow::Result;

use crate::definition::{Lines, ParameterDefinition};
use crate::error::ScaffoldError;
use crate::model::{Column, ForeignKey, SchemaObject, Table};
use crate::naming::{NamingConvention, TypeResolver};
use crate::project::{CrudAction, Project, ProjectSettings};

pub use controller::build_controller;
pub use data_contract::build_data_contract;
pub use db_context::build_db_context;
pub use entity::build_entity;
pub use repository::{build_repository, build_repository_interface};
pub use requests::{build_request_extensions, build_request_model};
pub use responses::{build_response_contracts, build_response_extensions};

/// Output layer of a generated definition: its directory and namespace suffix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layer {
    Models,
    Repositories,
    Responses,
    Requests,
    Controllers,
}

impl Layer {
    pub fn directory(&self) -> &'static str {
        match self {
            Layer::Models => "Models",
            Layer::Repositories => "Repositories",
            Layer::Responses => "Responses",
            Layer::Requests => "Requests",
            Layer::Controllers => "Controllers",
        }
    }
}

/// Everything a builder needs besides the object it builds
#[derive(Clone, Copy)]
pub struct BuildContext<'a> {
    pub project: &'a Project,
    pub naming: &'a dyn NamingConvention,
    pub types: &'a dyn TypeResolver,
}

impl<'a> BuildContext<'a> {
    pub fn new(
        project: &'a Project,
        naming: &'a dyn NamingConvention,
        types: &'a dyn TypeResolver,
    ) -> Self {
        Self {
            project,
            naming,
            types,
        }
    }

    pub fn root_namespace(&self) -> String {
        self.naming.pascal_case(&self.project.name)
    }

    pub fn namespace(&self, layer: Layer) -> String {
        format!("{}.{}", self.root_namespace(), layer.directory())
    }

    pub fn db_context_name(&self) -> String {
        self.naming.db_context_name(&self.project.name)
    }

    pub fn entity_name(&self, object: &dyn SchemaObject) -> String {
        self.naming.entity_name(object.name())
    }

    pub fn settings(&self, object: &dyn SchemaObject) -> &'a ProjectSettings {
        self.project.resolve(&object.db_object())
    }

    pub fn column_type(&self, object: &dyn SchemaObject, column: &Column) -> Result<String> {
        self.types
            .resolve(&self.project.database, &object.full_name(), column)
    }

    /// Type of a filter parameter that defaults to `null`
    pub fn nullable_column_type(&self, object: &dyn SchemaObject, column: &Column) -> Result<String> {
        let ty = self.column_type(object, column)?;
        if ty.ends_with('?') || self.types.is_string(column) || ty.ends_with("[]") {
            Ok(ty)
        } else {
            Ok(format!("{}?", ty))
        }
    }

    /// Model type exposed by read-all: the data contract when enabled
    pub fn read_model_name(&self, object: &dyn SchemaObject) -> String {
        let entity = self.entity_name(object);
        if self.uses_data_contract(object) {
            self.naming.data_contract_name(&entity)
        } else {
            entity
        }
    }

    /// Data contracts only apply to tables, which carry the foreign keys to join
    pub fn uses_data_contract(&self, object: &dyn SchemaObject) -> bool {
        self.project
            .database
            .find_table(&object.full_name())
            .is_some()
            && self.settings(object).entities_with_data_contracts
    }

    pub fn foreign_key_target(&self, table: &Table, foreign_key: &ForeignKey) -> Result<&'a Table> {
        self.project
            .database
            .find_table(&foreign_key.references)
            .ok_or_else(|| {
                ScaffoldError::ForeignKeyTargetNotFound {
                    table: table.full_name(),
                    foreign_key: foreign_key.name.clone(),
                    referenced: foreign_key.references.clone(),
                }
                .into()
            })
    }

    /// Foreign keys exposed as read-all filters: single local column pointing
    /// at a table with a single-column primary key
    pub fn filter_columns<'t>(&self, table: &'t Table) -> Result<Vec<&'t Column>> {
        let mut columns = Vec::new();
        for foreign_key in &table.foreign_keys {
            let target = self.foreign_key_target(table, foreign_key)?;
            if foreign_key.columns.len() != 1 || target.key_columns().len() != 1 {
                continue;
            }
            let column = constraint_column(table, &foreign_key.name, &foreign_key.columns[0])?;
            if !columns.iter().any(|c: &&Column| c.name == column.name) {
                columns.push(column);
            }
        }
        Ok(columns)
    }

    /// Filter parameters of the read-all query, each defaulting to `null`
    pub fn filter_parameters(&self, table: &Table) -> Result<Vec<ParameterDefinition>> {
        let mut parameters = Vec::new();
        for column in self.filter_columns(table)? {
            parameters.push(
                ParameterDefinition::new(
                    self.nullable_column_type(table, column)?,
                    self.naming.parameter_name(&column.name),
                )
                .with_default("null"),
            );
        }
        Ok(parameters)
    }

    /// Columns a request model carries: everything but the concurrency token
    /// and the identity column
    pub fn request_columns<'t>(&self, table: &'t Table) -> Vec<&'t Column> {
        let settings = self.settings(table);
        table
            .columns
            .iter()
            .filter(|c| !settings.is_concurrency_token(&c.name))
            .filter(|c| !table.is_identity_column(&c.name))
            .collect()
    }

    /// Columns copied from the request on update: not key, audit, concurrency
    /// token or identity
    pub fn updatable_columns<'t>(&self, table: &'t Table) -> Result<Vec<&'t Column>> {
        let settings = self.settings(table);
        if let Some(audit) = &settings.audit_entity {
            audit.validate(&table.full_name())?;
        }

        Ok(table
            .columns
            .iter()
            .filter(|c| !table.is_key_column(&c.name))
            .filter(|c| !table.is_identity_column(&c.name))
            .filter(|c| !settings.is_concurrency_token(&c.name))
            .filter(|c| {
                settings
                    .audit_entity
                    .as_ref()
                    .map_or(true, |audit| !audit.contains(&c.name))
            })
            .collect())
    }

    /// Whether any action needs the by-key repository lookup
    pub fn needs_key_lookup(&self, table: &Table) -> bool {
        let settings = self.settings(table);
        table.primary_key.is_some()
            && [CrudAction::ReadByKey, CrudAction::Update, CrudAction::Delete]
                .into_iter()
                .any(|action| settings.is_enabled(action))
    }

    /// Whether the table takes a request model
    pub fn needs_request_model(&self, table: &Table) -> bool {
        let settings = self.settings(table);
        settings.is_enabled(CrudAction::Create)
            || (table.primary_key.is_some() && settings.is_enabled(CrudAction::Update))
    }

    /// Type of the `id` route parameter: the key type for single-column keys,
    /// `string` for composite keys joined with `|`
    pub fn key_parameter(&self, table: &Table) -> Result<ParameterDefinition> {
        let key = key_columns(table)?;
        let ty = match key.as_slice() {
            [single] => self.column_type(table, single)?,
            _ => "string".to_string(),
        };
        Ok(ParameterDefinition::new(ty, "id"))
    }

    /// Statements that load `entity` from the `id` route parameter
    pub fn key_lookup(&self, table: &Table, lines: &mut Lines) -> Result<()> {
        let entity = self.entity_name(table);
        let key = key_columns(table)?;
        let arguments = match key.as_slice() {
            [_] => "id".to_string(),
            _ => {
                lines.code("var key = id.Split('|');");
                key.iter()
                    .enumerate()
                    .map(|(index, &column)| match self.types.key_parser(column) {
                        Some(parser) => format!("{}(key[{}])", parser, index),
                        None => format!("key[{}]", index),
                    })
                    .collect::<Vec<_>>()
                    .join(", ")
            }
        };
        lines.code(format!(
            "var entity = await Repository.{}(new {}({}));",
            self.naming.get_method(&entity),
            entity,
            arguments
        ));
        Ok(())
    }
}

/// Primary key columns in key order; a key naming a missing column is an error
pub(crate) fn key_columns(table: &Table) -> Result<Vec<&Column>> {
    let mut columns = Vec::new();
    for name in table.key_columns() {
        let column = table
            .column(name)
            .ok_or_else(|| ScaffoldError::PrimaryKeyColumnNotFound {
                table: table.full_name(),
                column: name.clone(),
            })?;
        columns.push(column);
    }
    Ok(columns)
}

pub(crate) fn constraint_column<'t>(
    table: &'t Table,
    constraint: &str,
    column: &str,
) -> Result<&'t Column> {
    table.column(column).ok_or_else(|| {
        ScaffoldError::ConstraintColumnNotFound {
            table: table.full_name(),
            constraint: constraint.to_string(),
            column: column.to_string(),
        }
        .into()
    })
}

/// `item.A == entity.A && item.B == entity.B`
pub(crate) fn match_expression(
    naming: &dyn NamingConvention,
    item: &str,
    other: &str,
    columns: &[String],
) -> String {
    columns
        .iter()
        .map(|c| {
            let property = naming.property_name(c);
            format!("{}.{} == {}.{}", item, property, other, property)
        })
        .collect::<Vec<_>>()
        .join(" && ")
}

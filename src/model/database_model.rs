//! Database model representation

use std::collections::HashSet;

use anyhow::Result;

use crate::error::ScaffoldError;

use super::{DbObject, SchemaObject, Table, View};

/// The complete database schema consumed by the scaffolder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Database {
    pub name: String,
    pub default_schema: String,
    pub tables: Vec<Table>,
    pub views: Vec<View>,
}

impl Default for Database {
    fn default() -> Self {
        Self {
            name: String::new(),
            default_schema: "dbo".to_string(),
            tables: Vec::new(),
            views: Vec::new(),
        }
    }
}

impl Database {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_table(mut self, table: Table) -> Self {
        self.tables.push(table);
        self
    }

    pub fn with_view(mut self, view: View) -> Self {
        self.views.push(view);
        self
    }

    /// All tables followed by all views, in declaration order
    pub fn db_objects(&self) -> Vec<DbObject> {
        self.tables
            .iter()
            .map(|t| t.db_object())
            .chain(self.views.iter().map(|v| v.db_object()))
            .collect()
    }

    /// Find a table by `schema.name`, or by bare name in the default schema
    pub fn find_table(&self, name: &str) -> Option<&Table> {
        let (schema, name) = match name.split_once('.') {
            Some((schema, name)) => (schema, name),
            None => (self.default_schema.as_str(), name),
        };
        self.tables
            .iter()
            .find(|t| t.schema == schema && t.name == name)
    }

    pub fn find_view(&self, schema: &str, name: &str) -> Option<&View> {
        self.views
            .iter()
            .find(|v| v.schema == schema && v.name == name)
    }

    /// Look up the table or view behind a db object
    pub fn find_object(&self, object: &DbObject) -> Option<&dyn SchemaObject> {
        match object.kind {
            super::DbObjectKind::Table => self
                .find_table(&object.full_name())
                .map(|t| t as &dyn SchemaObject),
            super::DbObjectKind::View => self
                .find_view(&object.schema, &object.name)
                .map(|v| v as &dyn SchemaObject),
        }
    }

    /// Check the structural invariants the builders rely on.
    ///
    /// - object names are unique
    /// - primary key, unique and foreign key columns exist in their table
    /// - foreign keys reference an existing table
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for object in self.db_objects() {
            if !seen.insert(object.full_name()) {
                return Err(ScaffoldError::DuplicateObject {
                    object: object.full_name(),
                }
                .into());
            }
        }

        for table in &self.tables {
            for key_column in table.key_columns() {
                if table.column(key_column).is_none() {
                    return Err(ScaffoldError::PrimaryKeyColumnNotFound {
                        table: table.full_name(),
                        column: key_column.clone(),
                    }
                    .into());
                }
            }

            for unique in &table.uniques {
                check_constraint_columns(table, &unique.name, &unique.columns)?;
            }

            for fk in &table.foreign_keys {
                check_constraint_columns(table, &fk.name, &fk.columns)?;
                if self.find_table(&fk.references).is_none() {
                    return Err(ScaffoldError::ForeignKeyTargetNotFound {
                        table: table.full_name(),
                        foreign_key: fk.name.clone(),
                        referenced: fk.references.clone(),
                    }
                    .into());
                }
            }
        }

        Ok(())
    }
}

fn check_constraint_columns(table: &Table, constraint: &str, columns: &[String]) -> Result<()> {
    for column in columns {
        if table.column(column).is_none() {
            return Err(ScaffoldError::ConstraintColumnNotFound {
                table: table.full_name(),
                constraint: constraint.to_string(),
                column: column.clone(),
            }
            .into());
        }
    }
    Ok(())
}

//! Database schema element types

use std::fmt;

/// Kind of a database object that can be scaffolded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DbObjectKind {
    Table,
    View,
}

impl DbObjectKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DbObjectKind::Table => "Table",
            DbObjectKind::View => "View",
        }
    }
}

/// A (schema, name, kind) tuple identifying a table or view
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DbObject {
    pub schema: String,
    pub name: String,
    pub kind: DbObjectKind,
}

impl DbObject {
    pub fn new(schema: impl Into<String>, name: impl Into<String>, kind: DbObjectKind) -> Self {
        Self {
            schema: schema.into(),
            name: name.into(),
            kind,
        }
    }

    /// Get the full name (e.g., dbo.Product)
    pub fn full_name(&self) -> String {
        format!("{}.{}", self.schema, self.name)
    }
}

impl fmt::Display for DbObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.schema, self.name)
    }
}

/// Column element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub name: String,
    pub data_type: String,
    pub is_nullable: bool,
    pub length: Option<i32>,
    pub precision: Option<u8>,
    pub scale: Option<u8>,
}

impl Column {
    /// Create a NOT NULL column
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
            is_nullable: false,
            length: None,
            precision: None,
            scale: None,
        }
    }

    pub fn nullable(mut self) -> Self {
        self.is_nullable = true;
        self
    }

    pub fn with_length(mut self, length: i32) -> Self {
        self.length = Some(length);
        self
    }

    pub fn with_precision(mut self, precision: u8, scale: u8) -> Self {
        self.precision = Some(precision);
        self.scale = Some(scale);
        self
    }
}

/// Primary key constraint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrimaryKey {
    pub name: Option<String>,
    /// Key columns in key order
    pub columns: Vec<String>,
}

/// Foreign key constraint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKey {
    pub name: String,
    /// Local columns, in the order of the referenced key
    pub columns: Vec<String>,
    /// Referenced table as `schema.name`
    pub references: String,
}

/// Unique constraint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unique {
    pub name: String,
    pub columns: Vec<String>,
}

/// Identity (auto-increment) column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub column: String,
    pub seed: i64,
    pub increment: i64,
}

/// Table element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub schema: String,
    pub name: String,
    pub columns: Vec<Column>,
    pub primary_key: Option<PrimaryKey>,
    pub foreign_keys: Vec<ForeignKey>,
    pub uniques: Vec<Unique>,
    pub identity: Option<Identity>,
}

impl Table {
    pub fn new(schema: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            schema: schema.into(),
            name: name.into(),
            columns: Vec::new(),
            primary_key: None,
            foreign_keys: Vec::new(),
            uniques: Vec::new(),
            identity: None,
        }
    }

    pub fn with_column(mut self, column: Column) -> Self {
        self.columns.push(column);
        self
    }

    pub fn with_primary_key(mut self, columns: &[&str]) -> Self {
        self.primary_key = Some(PrimaryKey {
            name: Some(format!("PK_{}_{}", self.schema, self.name)),
            columns: columns.iter().map(|c| c.to_string()).collect(),
        });
        self
    }

    pub fn with_identity(mut self, column: &str) -> Self {
        self.identity = Some(Identity {
            column: column.to_string(),
            seed: 1,
            increment: 1,
        });
        self
    }

    pub fn with_unique(mut self, columns: &[&str]) -> Self {
        let name = format!("UQ_{}_{}_{}", self.schema, self.name, columns.join("_"));
        self.uniques.push(Unique {
            name,
            columns: columns.iter().map(|c| c.to_string()).collect(),
        });
        self
    }

    pub fn with_foreign_key(mut self, columns: &[&str], references: &str) -> Self {
        let name = format!("FK_{}_{}_{}", self.schema, self.name, columns.join("_"));
        self.foreign_keys.push(ForeignKey {
            name,
            columns: columns.iter().map(|c| c.to_string()).collect(),
            references: references.to_string(),
        });
        self
    }

    /// Primary key column names, empty when the table has no primary key
    pub fn key_columns(&self) -> &[String] {
        self.primary_key
            .as_ref()
            .map(|pk| pk.columns.as_slice())
            .unwrap_or(&[])
    }

    pub fn is_key_column(&self, column: &str) -> bool {
        self.key_columns().iter().any(|c| c == column)
    }

    pub fn is_identity_column(&self, column: &str) -> bool {
        self.identity.as_ref().is_some_and(|i| i.column == column)
    }

    /// Primary key columns resolved against the column set, in key order
    pub fn primary_key_columns(&self) -> Vec<&Column> {
        self.key_columns()
            .iter()
            .filter_map(|name| self.column(name))
            .collect()
    }
}

/// View element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct View {
    pub schema: String,
    pub name: String,
    pub columns: Vec<Column>,
}

impl View {
    pub fn new(schema: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            schema: schema.into(),
            name: name.into(),
            columns: Vec::new(),
        }
    }

    pub fn with_column(mut self, column: Column) -> Self {
        self.columns.push(column);
        self
    }
}

/// Shared read access over tables and views
pub trait SchemaObject {
    fn schema(&self) -> &str;
    fn name(&self) -> &str;
    fn columns(&self) -> &[Column];
    fn kind(&self) -> DbObjectKind;

    fn db_object(&self) -> DbObject {
        DbObject::new(self.schema(), self.name(), self.kind())
    }

    fn full_name(&self) -> String {
        format!("{}.{}", self.schema(), self.name())
    }

    fn column(&self, name: &str) -> Option<&Column> {
        self.columns().iter().find(|c| c.name == name)
    }
}

impl SchemaObject for Table {
    fn schema(&self) -> &str {
        &self.schema
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn columns(&self) -> &[Column] {
        &self.columns
    }

    fn kind(&self) -> DbObjectKind {
        DbObjectKind::Table
    }
}

impl SchemaObject for View {
    fn schema(&self) -> &str {
        &self.schema
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn columns(&self) -> &[Column] {
        &self.columns
    }

    fn kind(&self) -> DbObjectKind {
        DbObjectKind::View
    }
}

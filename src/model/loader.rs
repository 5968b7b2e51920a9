//! Loader for XML schema snapshot files
//!
//! A snapshot describes the tables and views of a database the way the
//! catalog import exposes them:
//!
//! ```xml
//! <Database Name="Store" DefaultSchema="dbo">
//!   <Table Schema="dbo" Name="Product">
//!     <Column Name="ProductId" Type="int" />
//!     <Column Name="ProductName" Type="nvarchar" Length="100" />
//!     <PrimaryKey Columns="ProductId" />
//!     <Identity Column="ProductId" />
//!     <Unique Name="UQ_Product_ProductName" Columns="ProductName" />
//!   </Table>
//! </Database>
//! ```

use std::path::Path;

use anyhow::Result;
use encoding_rs::WINDOWS_1252;
use roxmltree::{Document, Node};

use crate::error::ScaffoldError;

use super::{Column, Database, ForeignKey, Identity, PrimaryKey, Table, Unique, View};

/// Read a file as a string, trying UTF-8 first, then Windows-1252 as fallback
pub(crate) fn read_file_with_encoding_fallback(path: &Path) -> std::io::Result<String> {
    let bytes = std::fs::read(path)?;

    match String::from_utf8(bytes) {
        Ok(s) => Ok(s.trim_start_matches('\u{feff}').to_string()),
        Err(e) => {
            let bytes = e.into_bytes();
            let (decoded, _, had_errors) = WINDOWS_1252.decode(&bytes);
            if had_errors {
                Err(std::io::Error::new(
                    std::io::ErrorKind::InvalidData,
                    "File contains invalid characters",
                ))
            } else {
                Ok(decoded.into_owned())
            }
        }
    }
}

/// Parse a schema snapshot file
pub fn parse_schema(path: &Path) -> Result<Database> {
    let content =
        read_file_with_encoding_fallback(path).map_err(|e| ScaffoldError::SchemaReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

    let doc = Document::parse(&content).map_err(|e| ScaffoldError::SchemaParseError {
        path: path.to_path_buf(),
        source: e,
    })?;

    let fallback_name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("Database");

    let database = database_from_node(&doc.root_element(), fallback_name)?;
    database.validate()?;
    Ok(database)
}

/// Parse a schema snapshot held in memory
pub fn parse_schema_str(content: &str) -> Result<Database> {
    let doc = Document::parse(content).map_err(|e| ScaffoldError::InvalidSchemaFormat {
        message: e.to_string(),
    })?;
    let database = database_from_node(&doc.root_element(), "Database")?;
    database.validate()?;
    Ok(database)
}

fn database_from_node(root: &Node, fallback_name: &str) -> Result<Database> {
    if root.tag_name().name() != "Database" {
        return Err(ScaffoldError::InvalidSchemaFormat {
            message: format!(
                "expected <Database> root element, found <{}>",
                root.tag_name().name()
            ),
        }
        .into());
    }

    let mut database = Database::new(root.attribute("Name").unwrap_or(fallback_name));
    if let Some(schema) = root.attribute("DefaultSchema") {
        database.default_schema = schema.to_string();
    }

    for node in root.children().filter(|n| n.is_element()) {
        match node.tag_name().name() {
            "Table" => {
                let table = parse_table(&node, &database.default_schema)?;
                database.tables.push(table);
            }
            "View" => {
                let schema = node
                    .attribute("Schema")
                    .unwrap_or(database.default_schema.as_str())
                    .to_string();
                let name = required_attribute(&node, "Name")?;
                let mut view = View::new(schema, name);
                for column in node.children().filter(|n| n.has_tag_name("Column")) {
                    view.columns.push(parse_column(&column)?);
                }
                database.views.push(view);
            }
            _ => {}
        }
    }

    Ok(database)
}

fn parse_table(node: &Node, default_schema: &str) -> Result<Table> {
    let schema = node.attribute("Schema").unwrap_or(default_schema);
    let name = required_attribute(node, "Name")?;
    let mut table = Table::new(schema, name);

    for child in node.children().filter(|n| n.is_element()) {
        match child.tag_name().name() {
            "Column" => table.columns.push(parse_column(&child)?),
            "PrimaryKey" => {
                table.primary_key = Some(PrimaryKey {
                    name: child.attribute("Name").map(|s| s.to_string()),
                    columns: split_columns(required_attribute(&child, "Columns")?),
                });
            }
            "Identity" => {
                table.identity = Some(Identity {
                    column: required_attribute(&child, "Column")?.to_string(),
                    seed: parse_number(&child, "Seed")?.unwrap_or(1),
                    increment: parse_number(&child, "Increment")?.unwrap_or(1),
                });
            }
            "Unique" => table.uniques.push(Unique {
                name: required_attribute(&child, "Name")?.to_string(),
                columns: split_columns(required_attribute(&child, "Columns")?),
            }),
            "ForeignKey" => {
                let references = required_attribute(&child, "References")?;
                let references = if references.contains('.') {
                    references.to_string()
                } else {
                    format!("{}.{}", default_schema, references)
                };
                table.foreign_keys.push(ForeignKey {
                    name: required_attribute(&child, "Name")?.to_string(),
                    columns: split_columns(required_attribute(&child, "Columns")?),
                    references,
                });
            }
            _ => {}
        }
    }

    Ok(table)
}

fn parse_column(node: &Node) -> Result<Column> {
    let mut column = Column::new(
        required_attribute(node, "Name")?,
        required_attribute(node, "Type")?,
    );
    column.is_nullable = node
        .attribute("Nullable")
        .map(|v| v.eq_ignore_ascii_case("true"))
        .unwrap_or(false);
    column.length = parse_number(node, "Length")?;
    column.precision = parse_number(node, "Precision")?;
    column.scale = parse_number(node, "Scale")?;
    Ok(column)
}

fn required_attribute<'a>(node: &Node<'a, '_>, name: &str) -> Result<&'a str> {
    node.attribute(name).ok_or_else(|| {
        ScaffoldError::InvalidSchemaFormat {
            message: format!(
                "<{}> element is missing the '{}' attribute",
                node.tag_name().name(),
                name
            ),
        }
        .into()
    })
}

fn parse_number<T: std::str::FromStr>(node: &Node, name: &str) -> Result<Option<T>> {
    match node.attribute(name) {
        None => Ok(None),
        Some(value) => value.trim().parse().map(Some).map_err(|_| {
            ScaffoldError::InvalidSchemaFormat {
                message: format!(
                    "attribute '{}' of <{}> is not a number: {}",
                    name,
                    node.tag_name().name(),
                    value
                ),
            }
            .into()
        }),
    }
}

fn split_columns(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|c| c.trim().trim_start_matches('[').trim_end_matches(']'))
        .filter(|c| !c.is_empty())
        .map(|c| c.to_string())
        .collect()
}

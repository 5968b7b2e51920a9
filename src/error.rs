//! Error types for rust-apiscaffold

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while scaffolding a project
#[derive(Error, Debug)]
pub enum ScaffoldError {
    #[error("Failed to read schema file: {path}")]
    SchemaReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse schema file: {path}")]
    SchemaParseError {
        path: PathBuf,
        #[source]
        source: roxmltree::Error,
    },

    #[error("Invalid schema file format: {message}")]
    InvalidSchemaFormat { message: String },

    #[error("Failed to read scaffold project file: {path}")]
    ConfigReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse scaffold project file: {path}")]
    ConfigParseError {
        path: PathBuf,
        #[source]
        source: roxmltree::Error,
    },

    #[error("Invalid selection pattern '{pattern}': expected '*.*', '<schema>.*', '*.<name>' or '<schema>.<name>'")]
    InvalidSelectionPattern { pattern: String },

    #[error("The global selection '*.*' cannot be removed")]
    GlobalSelectionRemoval,

    #[error("Audit entity for {object} is incomplete: '{column}' column name is empty")]
    InvalidAuditEntity { object: String, column: &'static str },

    #[error("Unknown CRUD action: {action}")]
    UnknownAction { action: String },

    #[error("Type mapping not found for column {object}.{column} (database type '{data_type}')")]
    TypeMappingNotFound {
        object: String,
        column: String,
        data_type: String,
    },

    #[error("Primary key column '{column}' does not exist in table {table}")]
    PrimaryKeyColumnNotFound { table: String, column: String },

    #[error("Foreign key {foreign_key} on {table} references a table that does not exist: {referenced}")]
    ForeignKeyTargetNotFound {
        table: String,
        foreign_key: String,
        referenced: String,
    },

    #[error("Column '{column}' referenced by {constraint} does not exist in {table}")]
    ConstraintColumnNotFound {
        table: String,
        constraint: String,
        column: String,
    },

    #[error("Database object declared twice: {object}")]
    DuplicateObject { object: String },

    #[error("Naming collision: {first} and {second} both generate {path}")]
    NamingCollision {
        path: PathBuf,
        first: String,
        second: String,
    },

    #[error("Naming collision: {first} and {second} both generate type {name}")]
    TypeNameCollision {
        name: String,
        first: String,
        second: String,
    },

    #[error("Failed to write generated file to {path}")]
    FileWriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

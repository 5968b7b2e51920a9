//! SQL Server type to C# type resolution

use anyhow::Result;

use crate::error::ScaffoldError;
use crate::model::{Column, Database};

/// Maps a column's database type to a target-language type.
///
/// Unknown database types are an error: a silent default would produce
/// source that does not compile.
pub trait TypeResolver {
    /// Language type for the column, nullable form included (e.g. `int?`)
    fn resolve(&self, database: &Database, object: &str, column: &Column) -> Result<String>;

    /// Whether the column maps to a string
    fn is_string(&self, column: &Column) -> bool;

    /// `Convert` method parsing one segment of a composite key, `None` for strings
    fn key_parser(&self, column: &Column) -> Option<&'static str>;
}

/// (database type, C# type, is value type)
const SQL_SERVER_TYPES: &[(&str, &str, bool)] = &[
    ("bigint", "long", true),
    ("binary", "byte[]", false),
    ("bit", "bool", true),
    ("char", "string", false),
    ("date", "DateTime", true),
    ("datetime", "DateTime", true),
    ("datetime2", "DateTime", true),
    ("datetimeoffset", "DateTimeOffset", true),
    ("decimal", "decimal", true),
    ("float", "double", true),
    ("image", "byte[]", false),
    ("int", "int", true),
    ("money", "decimal", true),
    ("nchar", "string", false),
    ("ntext", "string", false),
    ("numeric", "decimal", true),
    ("nvarchar", "string", false),
    ("real", "float", true),
    ("rowversion", "byte[]", false),
    ("smalldatetime", "DateTime", true),
    ("smallint", "short", true),
    ("smallmoney", "decimal", true),
    ("sql_variant", "object", false),
    ("text", "string", false),
    ("time", "TimeSpan", true),
    ("timestamp", "byte[]", false),
    ("tinyint", "byte", true),
    ("uniqueidentifier", "Guid", true),
    ("varbinary", "byte[]", false),
    ("varchar", "string", false),
    ("xml", "string", false),
];

/// Default SQL Server to C# mapping
#[derive(Debug, Clone, Copy, Default)]
pub struct SqlServerTypeResolver;

impl SqlServerTypeResolver {
    fn lookup(column: &Column) -> Option<(&'static str, bool)> {
        let data_type = normalize_type_name(&column.data_type);
        SQL_SERVER_TYPES
            .iter()
            .find(|(db_type, _, _)| *db_type == data_type)
            .map(|(_, ty, is_value)| (*ty, *is_value))
    }
}

impl TypeResolver for SqlServerTypeResolver {
    fn resolve(&self, _database: &Database, object: &str, column: &Column) -> Result<String> {
        let (ty, is_value_type) =
            Self::lookup(column).ok_or_else(|| ScaffoldError::TypeMappingNotFound {
                object: object.to_string(),
                column: column.name.clone(),
                data_type: column.data_type.clone(),
            })?;

        if column.is_nullable && is_value_type {
            Ok(format!("{}?", ty))
        } else {
            Ok(ty.to_string())
        }
    }

    fn is_string(&self, column: &Column) -> bool {
        matches!(Self::lookup(column), Some(("string", _)))
    }

    fn key_parser(&self, column: &Column) -> Option<&'static str> {
        match Self::lookup(column) {
            Some(("short", _)) => Some("Convert.ToInt16"),
            Some(("int", _)) => Some("Convert.ToInt32"),
            Some(("long", _)) => Some("Convert.ToInt64"),
            _ => None,
        }
    }
}

/// Lowercase a type name and drop brackets and a length suffix:
/// `[NVARCHAR](50)` -> `nvarchar`
fn normalize_type_name(data_type: &str) -> String {
    let base = data_type.split('(').next().unwrap_or(data_type);
    base.trim()
        .trim_start_matches('[')
        .trim_end_matches(']')
        .to_ascii_lowercase()
}

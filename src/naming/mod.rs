//! Identifier naming and type resolution
//!
//! Every generated artifact derives its identifiers through a
//! [`NamingConvention`], so the same column always produces the same property
//! and parameter name in the entity, the request model and the controller.

mod types;

use heck::{ToLowerCamelCase, ToUpperCamelCase};

pub use types::{SqlServerTypeResolver, TypeResolver};

/// C# keywords that need an `@` prefix when used as identifiers
const CSHARP_KEYWORDS: &[&str] = &[
    "abstract", "as", "base", "bool", "break", "byte", "case", "catch", "char", "checked",
    "class", "const", "continue", "decimal", "default", "delegate", "do", "double", "else",
    "enum", "event", "explicit", "extern", "false", "finally", "fixed", "float", "for",
    "foreach", "goto", "if", "implicit", "in", "int", "interface", "internal", "is", "lock",
    "long", "namespace", "new", "null", "object", "operator", "out", "override", "params",
    "private", "protected", "public", "readonly", "ref", "return", "sbyte", "sealed", "short",
    "sizeof", "stackalloc", "static", "string", "struct", "switch", "this", "throw", "true",
    "try", "typeof", "uint", "ulong", "unchecked", "unsafe", "ushort", "using", "virtual",
    "void", "volatile", "while",
];

/// Strategy for turning schema names into identifiers.
///
/// Implementors provide the five base conversions; the artifact names are
/// derived from them and rarely need overriding.
pub trait NamingConvention {
    /// PascalCase type or property name
    fn pascal_case(&self, name: &str) -> String;

    /// camelCase local or parameter name
    fn camel_case(&self, name: &str) -> String;

    /// Plural form of a PascalCase name
    fn plural_name(&self, name: &str) -> String;

    /// Singular form of a PascalCase name
    fn singular_name(&self, name: &str) -> String;

    /// Escape an identifier that collides with a reserved word
    fn escape_identifier(&self, name: String) -> String;

    /// Class name for a table or view
    fn entity_name(&self, object_name: &str) -> String {
        self.singular_name(&self.pascal_case(object_name))
    }

    fn property_name(&self, column: &str) -> String {
        self.pascal_case(column)
    }

    fn parameter_name(&self, column: &str) -> String {
        self.escape_identifier(self.camel_case(column))
    }

    fn feature_name(&self, schema: &str) -> String {
        self.pascal_case(schema)
    }

    fn get_all_method(&self, entity: &str) -> String {
        format!("Get{}Async", self.plural_name(entity))
    }

    fn get_method(&self, entity: &str) -> String {
        format!("Get{}Async", entity)
    }

    fn post_method(&self, entity: &str) -> String {
        format!("Post{}Async", entity)
    }

    fn put_method(&self, entity: &str) -> String {
        format!("Put{}Async", entity)
    }

    fn delete_method(&self, entity: &str) -> String {
        format!("Delete{}Async", entity)
    }

    /// Repository method returning the unpaged query
    fn query_method(&self, entity: &str) -> String {
        format!("Get{}", self.plural_name(entity))
    }

    /// Repository lookup for a unique constraint
    fn unique_method(&self, entity: &str, columns: &[String]) -> String {
        let by: String = columns.iter().map(|c| self.property_name(c)).collect();
        format!("Get{}By{}Async", entity, by)
    }

    fn request_model_name(&self, entity: &str) -> String {
        format!("{}Request", entity)
    }

    fn data_contract_name(&self, entity: &str) -> String {
        format!("{}DataContract", entity)
    }

    fn repository_interface_name(&self, feature: &str) -> String {
        format!("I{}Repository", self.feature_name(feature))
    }

    fn repository_name(&self, feature: &str) -> String {
        format!("{}Repository", self.feature_name(feature))
    }

    fn controller_name(&self, feature: &str) -> String {
        format!("{}Controller", self.feature_name(feature))
    }

    fn db_context_name(&self, project: &str) -> String {
        format!("{}DbContext", self.pascal_case(project))
    }
}

/// Naming rules for C# targets
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultNamingConvention;

impl NamingConvention for DefaultNamingConvention {
    fn pascal_case(&self, name: &str) -> String {
        let converted = if has_separators(name) {
            name.to_upper_camel_case()
        } else {
            let mut chars = name.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        };
        guard_leading_digit(converted)
    }

    fn camel_case(&self, name: &str) -> String {
        let converted = if has_separators(name) {
            name.to_lower_camel_case()
        } else {
            lower_leading_capitals(name)
        };
        guard_leading_digit(converted)
    }

    fn plural_name(&self, name: &str) -> String {
        let (head, word) = split_last_word(name);
        format!("{}{}", head, pluralizer::pluralize(word, 2, false))
    }

    fn singular_name(&self, name: &str) -> String {
        let (head, word) = split_last_word(name);
        format!("{}{}", head, pluralizer::pluralize(word, 1, false))
    }

    fn escape_identifier(&self, name: String) -> String {
        if CSHARP_KEYWORDS.contains(&name.as_str()) {
            format!("@{}", name)
        } else {
            name
        }
    }
}

fn has_separators(name: &str) -> bool {
    name.chars().any(|c| !c.is_alphanumeric())
}

fn guard_leading_digit(name: String) -> String {
    if name.starts_with(|c: char| c.is_ascii_digit()) {
        format!("_{}", name)
    } else {
        name
    }
}

/// Lowercase the leading run of capitals, keeping the capital that starts the
/// next word: `ProductID` -> `productID`, `URLPath` -> `urlPath`, `ID` -> `id`.
fn lower_leading_capitals(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let upper_run = chars.iter().take_while(|c| c.is_uppercase()).count();

    let lower_count = if upper_run <= 1 || upper_run == chars.len() {
        upper_run
    } else if chars[upper_run].is_lowercase() {
        upper_run - 1
    } else {
        upper_run
    };

    chars
        .iter()
        .enumerate()
        .flat_map(|(i, c)| {
            if i < lower_count {
                c.to_lowercase().collect::<Vec<_>>()
            } else {
                vec![*c]
            }
        })
        .collect()
}

/// Split a PascalCase identifier into everything before its last word and the
/// last word itself: `OrderDetails` -> (`Order`, `Details`).
fn split_last_word(name: &str) -> (&str, &str) {
    let bytes: Vec<(usize, char)> = name.char_indices().collect();
    let mut start = 0;
    for (pos, &(index, c)) in bytes.iter().enumerate().skip(1) {
        let previous = bytes[pos - 1].1;
        if c.is_uppercase() && (previous.is_lowercase() || previous.is_ascii_digit()) {
            start = index;
        }
    }
    name.split_at(start)
}

//! Member definitions: fields, constructors, properties and methods

use super::Line;

/// Access modifier of a type or member
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AccessModifier {
    #[default]
    Public,
    Protected,
    Internal,
    Private,
}

impl AccessModifier {
    pub fn keyword(&self) -> &'static str {
        match self {
            AccessModifier::Public => "public",
            AccessModifier::Protected => "protected",
            AccessModifier::Internal => "internal",
            AccessModifier::Private => "private",
        }
    }
}

/// Metadata attached to a type, member or parameter (`[HttpGet("Product")]`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeDefinition {
    pub name: String,
    pub arguments: Vec<String>,
}

impl AttributeDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arguments: Vec::new(),
        }
    }

    pub fn with_argument(mut self, argument: impl Into<String>) -> Self {
        self.arguments.push(argument.into());
        self
    }

    /// Attribute with a single string literal argument
    pub fn with_string(self, value: &str) -> Self {
        self.with_argument(format!("\"{}\"", value))
    }
}

/// Generic type parameter with an optional constraint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenericTypeDefinition {
    pub name: String,
    pub constraint: Option<String>,
}

impl GenericTypeDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            constraint: None,
        }
    }

    pub fn with_constraint(mut self, constraint: impl Into<String>) -> Self {
        self.constraint = Some(constraint.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterDefinition {
    pub ty: String,
    pub name: String,
    pub default_value: Option<String>,
    pub attributes: Vec<AttributeDefinition>,
}

impl ParameterDefinition {
    pub fn new(ty: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            ty: ty.into(),
            name: name.into(),
            default_value: None,
            attributes: Vec::new(),
        }
    }

    pub fn with_default(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    pub fn with_attribute(mut self, attribute: AttributeDefinition) -> Self {
        self.attributes.push(attribute);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDefinition {
    pub access: AccessModifier,
    pub ty: String,
    pub name: String,
    pub is_readonly: bool,
}

impl FieldDefinition {
    pub fn readonly(access: AccessModifier, ty: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            access,
            ty: ty.into(),
            name: name.into(),
            is_readonly: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConstructorDefinition {
    pub access: AccessModifier,
    pub parameters: Vec<ParameterDefinition>,
    /// `base(...)` arguments, `None` when the base constructor is implicit
    pub base_arguments: Option<Vec<String>>,
    pub lines: Vec<Line>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyDefinition {
    pub access: AccessModifier,
    pub ty: String,
    pub name: String,
    /// `{ get; set; }` when true, otherwise a getter body in `getter`
    pub is_automatic: bool,
    pub getter: Vec<Line>,
    pub attributes: Vec<AttributeDefinition>,
}

impl PropertyDefinition {
    pub fn automatic(ty: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            access: AccessModifier::Public,
            ty: ty.into(),
            name: name.into(),
            is_automatic: true,
            getter: Vec::new(),
            attributes: Vec::new(),
        }
    }

    pub fn with_getter(ty: impl Into<String>, name: impl Into<String>, getter: Vec<Line>) -> Self {
        Self {
            is_automatic: false,
            getter,
            ..Self::automatic(ty, name)
        }
    }

    pub fn with_attribute(mut self, attribute: AttributeDefinition) -> Self {
        self.attributes.push(attribute);
        self
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.iter().any(|a| a.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDefinition {
    pub access: AccessModifier,
    pub is_async: bool,
    pub is_static: bool,
    pub is_override: bool,
    /// First parameter is the `this` receiver of an extension method
    pub is_extension: bool,
    pub return_type: String,
    pub name: String,
    pub generic_types: Vec<GenericTypeDefinition>,
    pub parameters: Vec<ParameterDefinition>,
    pub attributes: Vec<AttributeDefinition>,
    pub lines: Vec<Line>,
}

impl MethodDefinition {
    pub fn new(return_type: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            access: AccessModifier::Public,
            is_async: false,
            is_static: false,
            is_override: false,
            is_extension: false,
            return_type: return_type.into(),
            name: name.into(),
            generic_types: Vec::new(),
            parameters: Vec::new(),
            attributes: Vec::new(),
            lines: Vec::new(),
        }
    }

    pub fn parameter(&self, name: &str) -> Option<&ParameterDefinition> {
        self.parameters.iter().find(|p| p.name == name)
    }

    pub fn attribute(&self, name: &str) -> Option<&AttributeDefinition> {
        self.attributes.iter().find(|a| a.name == name)
    }

    /// Code lines of the body, trimmed
    pub fn code_lines(&self) -> impl Iterator<Item = &str> {
        self.lines
            .iter()
            .filter(|l| l.is_code())
            .map(|l| l.text().trim())
    }
}

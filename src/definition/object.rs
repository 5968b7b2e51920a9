//! Top-level type definitions

use super::{
    AccessModifier, AttributeDefinition, ConstructorDefinition, FieldDefinition,
    GenericTypeDefinition, MethodDefinition, PropertyDefinition,
};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ClassDefinition {
    pub namespaces: Vec<String>,
    pub namespace: String,
    pub documentation: Option<String>,
    pub attributes: Vec<AttributeDefinition>,
    pub access: AccessModifier,
    pub is_static: bool,
    pub is_partial: bool,
    pub name: String,
    pub generic_types: Vec<GenericTypeDefinition>,
    pub base_class: Option<String>,
    pub implements: Vec<String>,
    pub fields: Vec<FieldDefinition>,
    pub constructors: Vec<ConstructorDefinition>,
    pub properties: Vec<PropertyDefinition>,
    pub methods: Vec<MethodDefinition>,
}

impl ClassDefinition {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn property(&self, name: &str) -> Option<&PropertyDefinition> {
        self.properties.iter().find(|p| p.name == name)
    }

    pub fn method(&self, name: &str) -> Option<&MethodDefinition> {
        self.methods.iter().find(|m| m.name == name)
    }

    /// Add a namespace import once, keeping first-use order
    pub fn import(&mut self, namespace: impl Into<String>) {
        let namespace = namespace.into();
        if !self.namespaces.contains(&namespace) {
            self.namespaces.push(namespace);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InterfaceDefinition {
    pub namespaces: Vec<String>,
    pub namespace: String,
    pub documentation: Option<String>,
    pub attributes: Vec<AttributeDefinition>,
    pub access: AccessModifier,
    pub name: String,
    pub generic_types: Vec<GenericTypeDefinition>,
    pub implements: Vec<String>,
    pub properties: Vec<PropertyDefinition>,
    /// Signatures only; bodies are ignored when rendering
    pub methods: Vec<MethodDefinition>,
}

impl InterfaceDefinition {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn method(&self, name: &str) -> Option<&MethodDefinition> {
        self.methods.iter().find(|m| m.name == name)
    }
}

/// A class or interface destined for its own source file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObjectDefinition {
    Class(ClassDefinition),
    Interface(InterfaceDefinition),
}

impl ObjectDefinition {
    pub fn name(&self) -> &str {
        match self {
            ObjectDefinition::Class(c) => &c.name,
            ObjectDefinition::Interface(i) => &i.name,
        }
    }

    pub fn namespace(&self) -> &str {
        match self {
            ObjectDefinition::Class(c) => &c.namespace,
            ObjectDefinition::Interface(i) => &i.namespace,
        }
    }

    pub fn namespaces(&self) -> &[String] {
        match self {
            ObjectDefinition::Class(c) => &c.namespaces,
            ObjectDefinition::Interface(i) => &i.namespaces,
        }
    }

    pub fn methods(&self) -> &[MethodDefinition] {
        match self {
            ObjectDefinition::Class(c) => &c.methods,
            ObjectDefinition::Interface(i) => &i.methods,
        }
    }

    pub fn as_class(&self) -> Option<&ClassDefinition> {
        match self {
            ObjectDefinition::Class(c) => Some(c),
            ObjectDefinition::Interface(_) => None,
        }
    }

    pub fn as_interface(&self) -> Option<&InterfaceDefinition> {
        match self {
            ObjectDefinition::Interface(i) => Some(i),
            ObjectDefinition::Class(_) => None,
        }
    }
}

impl From<ClassDefinition> for ObjectDefinition {
    fn from(class: ClassDefinition) -> Self {
        ObjectDefinition::Class(class)
    }
}

impl From<InterfaceDefinition> for ObjectDefinition {
    fn from(interface: InterfaceDefinition) -> Self {
        ObjectDefinition::Interface(interface)
    }
}

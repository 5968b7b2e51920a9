//! Language-agnostic code definitions produced by the builders

mod lines;
mod members;
mod object;

pub use lines::{Line, Lines};
pub use members::{
    AccessModifier, AttributeDefinition, ConstructorDefinition, FieldDefinition,
    GenericTypeDefinition, MethodDefinition, ParameterDefinition, PropertyDefinition,
};
pub use object::{ClassDefinition, InterfaceDefinition, ObjectDefinition};

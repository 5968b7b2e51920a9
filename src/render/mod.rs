//! Rendering definitions to text and writing them to the output directory

mod csharp;
mod emitter;
mod hooks;

pub use csharp::CSharpRenderer;
pub use emitter::{EmitOutcome, EmittedFile, FileEmitter};
pub use hooks::{ScaffoldEvent, ScaffoldHooks};

use crate::definition::ObjectDefinition;

/// Turns a definition into source text
pub trait Renderer {
    /// Extension of generated files, without the dot
    fn file_extension(&self) -> &str;

    fn render(&self, definition: &ObjectDefinition) -> String;

    fn file_name(&self, definition: &ObjectDefinition) -> String {
        format!("{}.{}", definition.name(), self.file_extension())
    }
}

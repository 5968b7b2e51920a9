//! Callbacks around each generated file

use std::fmt;
use std::path::Path;

use crate::definition::ObjectDefinition;

use super::EmitOutcome;

/// A file about to be written, or just written
pub struct ScaffoldEvent<'e> {
    pub definition: &'e ObjectDefinition,
    /// Path relative to the output directory
    pub path: &'e Path,
    /// `None` before the write
    pub outcome: Option<EmitOutcome>,
}

type Hook = Box<dyn Fn(&ScaffoldEvent<'_>)>;

/// Optional `before_scaffold` / `after_scaffold` callbacks, run synchronously
#[derive(Default)]
pub struct ScaffoldHooks {
    before: Vec<Hook>,
    after: Vec<Hook>,
}

impl ScaffoldHooks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn before_scaffold<F>(mut self, hook: F) -> Self
    where
        F: Fn(&ScaffoldEvent<'_>) + 'static,
    {
        self.before.push(Box::new(hook));
        self
    }

    pub fn after_scaffold<F>(mut self, hook: F) -> Self
    where
        F: Fn(&ScaffoldEvent<'_>) + 'static,
    {
        self.after.push(Box::new(hook));
        self
    }

    pub(crate) fn fire_before(&self, event: &ScaffoldEvent<'_>) {
        for hook in &self.before {
            hook(event);
        }
    }

    pub(crate) fn fire_after(&self, event: &ScaffoldEvent<'_>) {
        for hook in &self.after {
            hook(event);
        }
    }
}

impl fmt::Debug for ScaffoldHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScaffoldHooks")
            .field("before", &self.before.len())
            .field("after", &self.after.len())
            .finish()
    }
}

//! The project being scaffolded: schema, selections and features

use std::path::PathBuf;

use anyhow::Result;

use crate::model::{Database, DbObject};

use super::{
    build_features, CrudAction, ProjectFeature, ProjectSelection, ProjectSettings,
    SelectionPattern, SelectionSet,
};

/// A Web API project generated from one database.
///
/// Selections and features are configured through the setup calls below and
/// are read-only once a [`crate::scaffold::Scaffolder`] borrows the project.
#[derive(Debug, Clone)]
pub struct Project {
    /// Project name, also the root namespace of the generated code
    pub name: String,
    pub output_directory: PathBuf,
    pub database: Database,
    selections: SelectionSet,
    features: Vec<ProjectFeature>,
}

impl Project {
    pub fn new(name: impl Into<String>, database: Database) -> Self {
        Self {
            name: name.into(),
            output_directory: PathBuf::from("."),
            database,
            selections: SelectionSet::new(),
            features: Vec::new(),
        }
    }

    pub fn with_output_directory(mut self, output_directory: impl Into<PathBuf>) -> Self {
        self.output_directory = output_directory.into();
        self
    }

    /// The global `*.*` selection, created with defaults on first access
    pub fn global_selection(&mut self) -> &mut ProjectSelection {
        self.selections.global_mut()
    }

    /// Apply an override to the global settings
    pub fn global_selection_with<F>(&mut self, f: F) -> &mut Self
    where
        F: FnOnce(&mut ProjectSettings),
    {
        f(&mut self.selections.global_mut().settings);
        self
    }

    /// Select a pattern and apply an override to its settings.
    ///
    /// A pattern selected for the first time starts from a copy of the global
    /// settings as they are right now; later global changes are not copied.
    pub fn select<F>(&mut self, pattern: &str, f: F) -> Result<&mut ProjectSelection>
    where
        F: FnOnce(&mut ProjectSettings),
    {
        let pattern = SelectionPattern::parse(pattern)?;
        let selection = self.selections.get_or_create(pattern);
        f(&mut selection.settings);
        Ok(selection)
    }

    /// Look up a selection by its exact pattern
    pub fn selection(&self, pattern: &str) -> Result<Option<&ProjectSelection>> {
        let pattern = SelectionPattern::parse(pattern)?;
        Ok(self.selections.get(&pattern))
    }

    pub fn remove_selection(&mut self, pattern: &str) -> Result<Option<ProjectSelection>> {
        let pattern = SelectionPattern::parse(pattern)?;
        self.selections.remove(&pattern)
    }

    /// Disable an action for a pattern, selecting the pattern if needed
    pub fn remove_action(&mut self, pattern: &str, action: CrudAction) -> Result<()> {
        self.select(pattern, |settings| {
            settings.remove_action(action);
        })?;
        Ok(())
    }

    /// Turn on `force_overwrite` for the global selection and every selection
    /// snapshotted from it
    pub fn force_overwrite_all(&mut self) -> &mut Self {
        self.selections.global_mut();
        for selection in self.selections.iter_mut() {
            selection.settings.force_overwrite = true;
        }
        self
    }

    pub fn selections(&self) -> &SelectionSet {
        &self.selections
    }

    /// Effective settings for a table or view
    pub fn resolve(&self, object: &DbObject) -> &ProjectSettings {
        self.selections.resolve(object)
    }

    /// Effective settings for artifacts generated once per schema
    pub fn resolve_schema(&self, schema: &str) -> &ProjectSettings {
        self.selections.resolve_schema(schema)
    }

    pub fn global_settings(&self) -> &ProjectSettings {
        self.selections.global_settings()
    }

    /// Partition the database into features, replacing any previous result
    pub fn build_features(&mut self) -> &[ProjectFeature] {
        self.features = build_features(&self.database);
        &self.features
    }

    pub fn features(&self) -> &[ProjectFeature] {
        &self.features
    }
}

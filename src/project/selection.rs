//! Name-pattern scoped settings and their resolution

use std::fmt;

use anyhow::Result;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::ScaffoldError;
use crate::model::DbObject;

use super::ProjectSettings;

/// `<schema|*>.<name|*>` where neither part contains a dot or a wildcard
static PATTERN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\*|[^.*]+)\.(\*|[^.*]+)$").expect("Invalid selection regex"));

/// Settings applied when no selection has been configured at all
static DEFAULT_SETTINGS: Lazy<ProjectSettings> = Lazy::new(ProjectSettings::default);

/// Scope of a selection
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SelectionPattern {
    /// `*.*`
    Global,
    /// `<schema>.*`
    Schema(String),
    /// `*.<name>`
    Name(String),
    /// `<schema>.<name>`
    Exact { schema: String, name: String },
}

impl SelectionPattern {
    pub fn parse(pattern: &str) -> Result<Self> {
        let caps = PATTERN_RE.captures(pattern.trim()).ok_or_else(|| {
            ScaffoldError::InvalidSelectionPattern {
                pattern: pattern.to_string(),
            }
        })?;
        let schema = caps.get(1).map(|m| m.as_str().trim()).unwrap_or("*");
        let name = caps.get(2).map(|m| m.as_str().trim()).unwrap_or("*");

        if schema.is_empty() || name.is_empty() {
            return Err(ScaffoldError::InvalidSelectionPattern {
                pattern: pattern.to_string(),
            }
            .into());
        }

        Ok(match (schema, name) {
            ("*", "*") => SelectionPattern::Global,
            (schema, "*") => SelectionPattern::Schema(schema.to_string()),
            ("*", name) => SelectionPattern::Name(name.to_string()),
            (schema, name) => SelectionPattern::Exact {
                schema: schema.to_string(),
                name: name.to_string(),
            },
        })
    }

    pub fn exact(object: &DbObject) -> Self {
        SelectionPattern::Exact {
            schema: object.schema.clone(),
            name: object.name.clone(),
        }
    }

    pub fn is_global(&self) -> bool {
        matches!(self, SelectionPattern::Global)
    }
}

impl fmt::Display for SelectionPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectionPattern::Global => write!(f, "*.*"),
            SelectionPattern::Schema(schema) => write!(f, "{}.*", schema),
            SelectionPattern::Name(name) => write!(f, "*.{}", name),
            SelectionPattern::Exact { schema, name } => write!(f, "{}.{}", schema, name),
        }
    }
}

/// Settings scoped to a pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectSelection {
    pub pattern: SelectionPattern,
    pub settings: ProjectSettings,
}

/// Ordered selections of a project, unique by pattern
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    selections: Vec<ProjectSelection>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ProjectSelection> {
        self.selections.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut ProjectSelection> {
        self.selections.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.selections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selections.is_empty()
    }

    pub fn get(&self, pattern: &SelectionPattern) -> Option<&ProjectSelection> {
        self.selections.iter().find(|s| &s.pattern == pattern)
    }

    pub fn get_mut(&mut self, pattern: &SelectionPattern) -> Option<&mut ProjectSelection> {
        self.selections.iter_mut().find(|s| &s.pattern == pattern)
    }

    /// The global selection, created with default settings on first access
    pub fn global_mut(&mut self) -> &mut ProjectSelection {
        let index = match self.position(&SelectionPattern::Global) {
            Some(index) => index,
            None => {
                self.selections.insert(
                    0,
                    ProjectSelection {
                        pattern: SelectionPattern::Global,
                        settings: ProjectSettings::default(),
                    },
                );
                0
            }
        };
        &mut self.selections[index]
    }

    pub fn global_settings(&self) -> &ProjectSettings {
        self.get(&SelectionPattern::Global)
            .map(|s| &s.settings)
            .unwrap_or_else(|| &*DEFAULT_SETTINGS)
    }

    /// Get a selection, creating it from a snapshot of the current global
    /// settings when the pattern has not been selected yet.
    pub fn get_or_create(&mut self, pattern: SelectionPattern) -> &mut ProjectSelection {
        if pattern.is_global() {
            return self.global_mut();
        }

        let index = match self.position(&pattern) {
            Some(index) => index,
            None => {
                let settings = ProjectSettings::inherit(&self.global_mut().settings);
                self.selections.push(ProjectSelection { pattern, settings });
                self.selections.len() - 1
            }
        };
        &mut self.selections[index]
    }

    pub fn remove(&mut self, pattern: &SelectionPattern) -> Result<Option<ProjectSelection>> {
        if pattern.is_global() {
            return Err(ScaffoldError::GlobalSelectionRemoval.into());
        }
        Ok(self
            .position(pattern)
            .map(|index| self.selections.remove(index)))
    }

    /// Resolve the effective settings for an object.
    ///
    /// Precedence: `<schema>.<name>`, `<schema>.*`, `*.<name>`, then global.
    pub fn resolve(&self, object: &DbObject) -> &ProjectSettings {
        let candidates = [
            SelectionPattern::exact(object),
            SelectionPattern::Schema(object.schema.clone()),
            SelectionPattern::Name(object.name.clone()),
        ];
        candidates
            .iter()
            .find_map(|pattern| self.get(pattern))
            .map(|s| &s.settings)
            .unwrap_or_else(|| self.global_settings())
    }

    /// Resolve settings for everything generated per schema
    pub fn resolve_schema(&self, schema: &str) -> &ProjectSettings {
        self.get(&SelectionPattern::Schema(schema.to_string()))
            .map(|s| &s.settings)
            .unwrap_or_else(|| self.global_settings())
    }

    fn position(&self, pattern: &SelectionPattern) -> Option<usize> {
        self.selections.iter().position(|s| &s.pattern == pattern)
    }
}

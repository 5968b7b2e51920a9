//! Parser for scaffold project files
//!
//! ```xml
//! <ScaffoldProject>
//!   <PropertyGroup>
//!     <Name>Store</Name>
//!     <Schema>store.schema.xml</Schema>
//!     <OutputDirectory>generated</OutputDirectory>
//!   </PropertyGroup>
//!   <Selection Pattern="*.*">
//!     <UseLogger>true</UseLogger>
//!     <ConcurrencyToken>Timestamp</ConcurrencyToken>
//!   </Selection>
//!   <Selection Pattern="dbo.Product">
//!     <RemoveAction>Delete</RemoveAction>
//!   </Selection>
//! </ScaffoldProject>
//! ```

use std::path::{Path, PathBuf};

use anyhow::Result;
use roxmltree::{Document, Node};

use crate::error::ScaffoldError;
use crate::model::{parse_schema, read_file_with_encoding_fallback};

use super::{AuditEntity, CrudAction, Project, ProjectSettings, SelectionPattern};

/// Settings overrides declared by one `<Selection>` element
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionConfig {
    pub pattern: String,
    pub force_overwrite: Option<bool>,
    pub use_logger: Option<bool>,
    pub concurrency_token: Option<String>,
    pub audit_entity: Option<AuditEntity>,
    pub entities_with_data_contracts: Option<bool>,
    pub remove_actions: Vec<CrudAction>,
}

impl SelectionConfig {
    fn apply_to(&self, settings: &mut ProjectSettings) {
        if let Some(value) = self.force_overwrite {
            settings.force_overwrite = value;
        }
        if let Some(value) = self.use_logger {
            settings.use_logger = value;
        }
        if let Some(value) = &self.concurrency_token {
            settings.concurrency_token = value.clone();
        }
        if let Some(value) = &self.audit_entity {
            settings.audit_entity = Some(value.clone());
        }
        if let Some(value) = self.entities_with_data_contracts {
            settings.entities_with_data_contracts = value;
        }
        for action in &self.remove_actions {
            settings.remove_action(*action);
        }
    }
}

/// Parsed scaffold project file
#[derive(Debug, Clone)]
pub struct ScaffoldConfig {
    pub name: String,
    /// Schema snapshot, resolved against the project file directory
    pub schema_path: PathBuf,
    pub output_directory: PathBuf,
    pub selections: Vec<SelectionConfig>,
}

impl ScaffoldConfig {
    /// Load the schema and build a project with every selection applied.
    ///
    /// Global selections are applied before the others so pattern selections
    /// snapshot the configured global values.
    pub fn load_project(&self) -> Result<Project> {
        let database = parse_schema(&self.schema_path)?;
        let mut project = Project::new(&self.name, database)
            .with_output_directory(&self.output_directory);

        let (global, scoped): (Vec<_>, Vec<_>) = self
            .selections
            .iter()
            .partition(|s| matches!(SelectionPattern::parse(&s.pattern), Ok(SelectionPattern::Global)));

        for selection in global.into_iter().chain(scoped) {
            project.select(&selection.pattern, |settings| selection.apply_to(settings))?;
        }

        project.build_features();
        Ok(project)
    }
}

/// Parse a scaffold project file
pub fn parse_scaffold_config(path: &Path) -> Result<ScaffoldConfig> {
    let content =
        read_file_with_encoding_fallback(path).map_err(|e| ScaffoldError::ConfigReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

    let doc = Document::parse(&content).map_err(|e| ScaffoldError::ConfigParseError {
        path: path.to_path_buf(),
        source: e,
    })?;

    let project_dir = path.parent().unwrap_or(Path::new(".")).to_path_buf();
    let root = doc.root_element();

    let name = find_property_value(&root, "Name").unwrap_or_else(|| {
        path.file_stem()
            .and_then(|s| s.to_str())
            .and_then(|s| s.split('.').next())
            .unwrap_or("Api")
            .to_string()
    });

    let schema = find_property_value(&root, "Schema").ok_or_else(|| {
        ScaffoldError::InvalidSchemaFormat {
            message: format!("{} does not declare a <Schema> file", path.display()),
        }
    })?;

    let output_directory = find_property_value(&root, "OutputDirectory")
        .map(|dir| project_dir.join(dir))
        .unwrap_or_else(|| project_dir.join("generated"));

    let mut selections = Vec::new();
    for node in root.children().filter(|n| n.has_tag_name("Selection")) {
        selections.push(parse_selection(&node)?);
    }

    Ok(ScaffoldConfig {
        name,
        schema_path: project_dir.join(schema),
        output_directory,
        selections,
    })
}

fn parse_selection(node: &Node) -> Result<SelectionConfig> {
    let pattern = node.attribute("Pattern").unwrap_or("*.*").to_string();
    SelectionPattern::parse(&pattern)?;

    let mut config = SelectionConfig {
        pattern,
        ..SelectionConfig::default()
    };

    for child in node.children().filter(|n| n.is_element()) {
        let text = child.text().map(|s| s.trim()).unwrap_or("");
        match child.tag_name().name() {
            "ForceOverwrite" => config.force_overwrite = Some(parse_bool(text)),
            "UseLogger" => config.use_logger = Some(parse_bool(text)),
            "ConcurrencyToken" => config.concurrency_token = Some(text.to_string()),
            "EntitiesWithDataContracts" => {
                config.entities_with_data_contracts = Some(parse_bool(text))
            }
            "AuditEntity" => {
                let audit = AuditEntity::new(
                    child.attribute("CreationUser").unwrap_or(""),
                    child.attribute("CreationDateTime").unwrap_or(""),
                    child.attribute("LastUpdateUser").unwrap_or(""),
                    child.attribute("LastUpdateDateTime").unwrap_or(""),
                );
                audit.validate(&config.pattern)?;
                config.audit_entity = Some(audit);
            }
            "RemoveAction" => config.remove_actions.push(text.parse()?),
            _ => {}
        }
    }

    Ok(config)
}

fn find_property_value(root: &Node, property_name: &str) -> Option<String> {
    root.descendants()
        .filter(|n| n.has_tag_name("PropertyGroup"))
        .flat_map(|group| group.children())
        .find(|n| n.has_tag_name(property_name))
        .and_then(|n| n.text())
        .map(|s| s.trim().to_string())
}

fn parse_bool(value: &str) -> bool {
    value.eq_ignore_ascii_case("true")
}

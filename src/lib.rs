//! rust-apiscaffold: ASP.NET Core Web API scaffolding from SQL Server schemas
//!
//! This library reads a schema snapshot and a scaffold project file and
//! generates the entity, repository, request/response and controller layers
//! of a C# Web API.

pub mod builders;
pub mod definition;
pub mod error;
pub mod model;
pub mod naming;
pub mod project;
pub mod render;
pub mod scaffold;

use std::path::PathBuf;

use anyhow::Result;
use tracing::info;

pub use error::ScaffoldError;
pub use scaffold::{ScaffoldReport, Scaffolder};

/// Options for a scaffolding run
#[derive(Debug, Clone)]
pub struct ScaffoldOptions {
    /// Path to the scaffold project file
    pub project_path: PathBuf,
    /// Output directory, overriding the one declared by the project file
    pub output_path: Option<PathBuf>,
    /// Overwrite every existing file whose content differs
    pub force: bool,
}

/// Scaffold a Web API from a scaffold project file
pub fn scaffold_project(options: ScaffoldOptions) -> Result<ScaffoldReport> {
    info!("Scaffolding project: {}", options.project_path.display());

    // Step 1: Parse the project file
    let config = project::parse_scaffold_config(&options.project_path)?;

    info!(
        "Found {} selections, schema {}",
        config.selections.len(),
        config.schema_path.display()
    );

    // Step 2: Load the schema and apply selections
    let mut project = config.load_project()?;

    if let Some(output_path) = options.output_path {
        project.output_directory = output_path;
    }
    if options.force {
        project.force_overwrite_all();
    }

    info!(
        "Loaded {} tables and {} views in {} features",
        project.database.tables.len(),
        project.database.views.len(),
        project.features().len()
    );

    // Step 3: Generate and write the source tree
    let report = Scaffolder::new(&project).scaffold()?;

    info!("Scaffolded into {}", report.output_directory.display());

    Ok(report)
}

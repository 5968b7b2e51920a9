//! Scaffold project configuration: settings, selections and features

mod api_project;
mod config_parser;
mod feature;
mod selection;
mod settings;

pub use api_project::Project;
pub use config_parser::{parse_scaffold_config, ScaffoldConfig, SelectionConfig};
pub use feature::{build_features, ProjectFeature};
pub use selection::{ProjectSelection, SelectionPattern, SelectionSet};
pub use settings::{AuditEntity, CrudAction, ProjectSettings};

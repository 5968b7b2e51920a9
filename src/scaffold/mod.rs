//! Project orchestration: plan every definition, check for collisions, emit

mod report;

use std::borrow::Cow;
use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::Result;
use tracing::{debug, info};

use crate::builders::{
    build_controller, build_data_contract, build_db_context, build_entity, build_repository,
    build_repository_interface, build_request_extensions, build_request_model,
    build_response_contracts, build_response_extensions, BuildContext, Layer,
};
use crate::definition::ObjectDefinition;
use crate::error::ScaffoldError;
use crate::model::{SchemaObject, Table};
use crate::naming::{DefaultNamingConvention, NamingConvention, SqlServerTypeResolver, TypeResolver};
use crate::project::{build_features, Project, ProjectFeature};
use crate::render::{CSharpRenderer, FileEmitter, Renderer, ScaffoldHooks};

pub use report::ScaffoldReport;

/// A definition waiting to be written
#[derive(Debug, Clone)]
pub struct PlannedFile {
    pub definition: ObjectDefinition,
    pub layer: Layer,
    pub force_overwrite: bool,
    /// What the definition was built from, for collision messages
    pub origin: String,
}

/// Generates a project's source tree.
///
/// The scaffolder borrows the project immutably, so selections and features
/// cannot change once generation starts.
pub struct Scaffolder<'p> {
    project: &'p Project,
    naming: Box<dyn NamingConvention>,
    types: Box<dyn TypeResolver>,
    renderer: Box<dyn Renderer>,
    hooks: ScaffoldHooks,
}

impl<'p> Scaffolder<'p> {
    pub fn new(project: &'p Project) -> Self {
        Self {
            project,
            naming: Box::new(DefaultNamingConvention),
            types: Box::new(SqlServerTypeResolver),
            renderer: Box::new(CSharpRenderer),
            hooks: ScaffoldHooks::new(),
        }
    }

    pub fn with_naming(mut self, naming: impl NamingConvention + 'static) -> Self {
        self.naming = Box::new(naming);
        self
    }

    pub fn with_types(mut self, types: impl TypeResolver + 'static) -> Self {
        self.types = Box::new(types);
        self
    }

    pub fn with_renderer(mut self, renderer: impl Renderer + 'static) -> Self {
        self.renderer = Box::new(renderer);
        self
    }

    pub fn with_hooks(mut self, hooks: ScaffoldHooks) -> Self {
        self.hooks = hooks;
        self
    }

    /// Build every definition in emission order.
    ///
    /// Entities, data contracts, the database context, repositories, response
    /// contracts and extensions, request models and extensions, controllers.
    pub fn plan(&self) -> Result<Vec<PlannedFile>> {
        let project = self.project;
        let database = &project.database;
        database.validate()?;

        let ctx = BuildContext::new(project, self.naming.as_ref(), self.types.as_ref());
        let global = project.global_settings();
        let features: Cow<'_, [ProjectFeature]> = if project.features().is_empty() {
            Cow::Owned(build_features(database))
        } else {
            Cow::Borrowed(project.features())
        };

        let objects: Vec<&dyn SchemaObject> = features
            .iter()
            .flat_map(|f| f.db_objects.iter())
            .filter_map(|o| database.find_object(o))
            .collect();
        let tables: Vec<&Table> = features
            .iter()
            .flat_map(|f| f.tables(database))
            .collect();

        let mut plan = Vec::new();

        for object in &objects {
            plan.push(PlannedFile {
                definition: build_entity(&ctx, *object)?,
                layer: Layer::Models,
                force_overwrite: ctx.settings(*object).force_overwrite,
                origin: object.full_name(),
            });
        }

        for table in &tables {
            if ctx.uses_data_contract(*table) {
                plan.push(PlannedFile {
                    definition: build_data_contract(&ctx, table)?,
                    layer: Layer::Models,
                    force_overwrite: ctx.settings(*table).force_overwrite,
                    origin: table.full_name(),
                });
            }
        }

        plan.push(PlannedFile {
            definition: build_db_context(&ctx)?,
            layer: Layer::Models,
            force_overwrite: global.force_overwrite,
            origin: project.name.clone(),
        });

        for feature in features.iter() {
            let settings = project.resolve_schema(&feature.name);
            plan.push(PlannedFile {
                definition: build_repository_interface(&ctx, feature)?,
                layer: Layer::Repositories,
                force_overwrite: settings.force_overwrite,
                origin: format!("{}.*", feature.name),
            });
            plan.push(PlannedFile {
                definition: build_repository(&ctx, feature)?,
                layer: Layer::Repositories,
                force_overwrite: settings.force_overwrite,
                origin: format!("{}.*", feature.name),
            });
        }

        for definition in build_response_contracts(&ctx)? {
            plan.push(PlannedFile {
                definition,
                layer: Layer::Responses,
                force_overwrite: global.force_overwrite,
                origin: project.name.clone(),
            });
        }
        plan.push(PlannedFile {
            definition: build_response_extensions(&ctx)?,
            layer: Layer::Responses,
            force_overwrite: global.force_overwrite,
            origin: project.name.clone(),
        });

        let request_tables: Vec<&Table> = tables
            .iter()
            .copied()
            .filter(|t| ctx.needs_request_model(t))
            .collect();
        for table in &request_tables {
            plan.push(PlannedFile {
                definition: build_request_model(&ctx, table)?,
                layer: Layer::Requests,
                force_overwrite: ctx.settings(*table).force_overwrite,
                origin: table.full_name(),
            });
        }
        if !request_tables.is_empty() {
            plan.push(PlannedFile {
                definition: build_request_extensions(&ctx, &request_tables)?,
                layer: Layer::Requests,
                force_overwrite: global.force_overwrite,
                origin: project.name.clone(),
            });
        }

        for feature in features.iter() {
            plan.push(PlannedFile {
                definition: build_controller(&ctx, feature)?,
                layer: Layer::Controllers,
                force_overwrite: project.resolve_schema(&feature.name).force_overwrite,
                origin: format!("{}.*", feature.name),
            });
        }

        debug!("Planned {} definitions", plan.len());
        Ok(plan)
    }

    /// Plan, check that no two definitions share an output path or a type
    /// name, then write everything in plan order
    pub fn scaffold(&self) -> Result<ScaffoldReport> {
        let plan = self.plan()?;
        let emitter = FileEmitter::new(self.renderer.as_ref(), &self.hooks);

        let mut seen: HashMap<PathBuf, &str> = HashMap::new();
        let mut types: HashMap<&str, &str> = HashMap::new();
        for planned in &plan {
            let path = emitter.relative_path(&planned.definition, planned.layer.directory());
            if let Some(first) = seen.get(&path) {
                return Err(ScaffoldError::NamingCollision {
                    path,
                    first: first.to_string(),
                    second: planned.origin.clone(),
                }
                .into());
            }
            seen.insert(path, &planned.origin);

            // Controllers import every layer's namespace, so a type name
            // must be unique across the whole project
            let name = planned.definition.name();
            if let Some(first) = types.get(name) {
                return Err(ScaffoldError::TypeNameCollision {
                    name: name.to_string(),
                    first: first.to_string(),
                    second: planned.origin.clone(),
                }
                .into());
            }
            types.insert(name, &planned.origin);
        }

        info!(
            "Scaffolding {} files into {}",
            plan.len(),
            self.project.output_directory.display()
        );

        let mut report = ScaffoldReport::new(self.project.output_directory.clone());
        for planned in &plan {
            let file = emitter.emit(
                &planned.definition,
                &self.project.output_directory,
                planned.layer.directory(),
                planned.force_overwrite,
            )?;
            report.files.push(file);
        }

        info!(
            "Scaffolded {}: {} written, {} unchanged, {} skipped",
            self.project.name,
            report.written().count(),
            report.unchanged().count(),
            report.skipped().count()
        );
        Ok(report)
    }
}

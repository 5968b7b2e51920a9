//! Web API controllers, one per feature

use anyhow::Result;
use tracing::debug;

use crate::definition::{
    AccessModifier, AttributeDefinition, ClassDefinition, ConstructorDefinition,
    FieldDefinition, Line, Lines, MethodDefinition, ObjectDefinition, ParameterDefinition,
};
use crate::model::{SchemaObject, Table, View};
use crate::project::{CrudAction, ProjectFeature};

use super::{BuildContext, Layer};

const INTERNAL_ERROR: &str =
    "There was an internal error, please contact to technical support.";

/// Build `<Feature>Controller` with the enabled actions of every object in the
/// feature.
///
/// Views only get read-all. By-key, update and delete need a primary key.
pub fn build_controller(ctx: &BuildContext, feature: &ProjectFeature) -> Result<ObjectDefinition> {
    let database = &ctx.project.database;
    let use_logger = ctx.project.resolve_schema(&feature.name).use_logger;
    let repository = ctx.naming.repository_interface_name(&feature.name);

    let mut class = ClassDefinition::new(
        ctx.namespace(Layer::Controllers),
        ctx.naming.controller_name(&feature.name),
    );
    for namespace in [
        "System",
        "System.Linq",
        "System.Threading.Tasks",
        "Microsoft.AspNetCore.Mvc",
        "Microsoft.EntityFrameworkCore",
    ] {
        class.import(namespace);
    }
    if use_logger {
        class.import("Microsoft.Extensions.Logging");
    }
    for layer in [
        Layer::Models,
        Layer::Repositories,
        Layer::Requests,
        Layer::Responses,
    ] {
        class.import(ctx.namespace(layer));
    }

    class.attributes.push(AttributeDefinition::new("ApiController"));
    class
        .attributes
        .push(AttributeDefinition::new("Route").with_string("api/[controller]"));
    class.base_class = Some("ControllerBase".to_string());

    let mut constructor = ConstructorDefinition::default();
    let mut lines = Lines::new();
    constructor
        .parameters
        .push(ParameterDefinition::new(repository.clone(), "repository"));
    lines.code("Repository = repository;");
    if use_logger {
        class.fields.push(FieldDefinition::readonly(
            AccessModifier::Protected,
            "ILogger",
            "Logger",
        ));
        constructor.parameters.push(ParameterDefinition::new(
            format!("ILogger<{}>", class.name),
            "logger",
        ));
        lines.code("Logger = logger;");
    }
    class.fields.push(FieldDefinition::readonly(
        AccessModifier::Protected,
        repository,
        "Repository",
    ));
    constructor.lines = lines.build();
    class.constructors.push(constructor);

    let actions = ActionBuilder { ctx, use_logger };
    for table in feature.tables(database) {
        let settings = ctx.settings(table);
        let has_key = table.primary_key.is_some();

        if settings.is_enabled(CrudAction::ReadAll) {
            class.methods.push(actions.read_all(table)?);
        }
        if has_key && settings.is_enabled(CrudAction::ReadByKey) {
            class.methods.push(actions.read_by_key(table)?);
        }
        if settings.is_enabled(CrudAction::Create) {
            class.methods.push(actions.create(table)?);
        }
        if has_key && settings.is_enabled(CrudAction::Update) {
            class.methods.push(actions.update(table)?);
        }
        if has_key && settings.is_enabled(CrudAction::Delete) {
            class.methods.push(actions.delete(table)?);
        }
    }
    for view in feature.views(database) {
        if ctx.settings(view).is_enabled(CrudAction::ReadAll) {
            class.methods.push(actions.read_all_view(view));
        }
    }

    debug!(
        "Built controller {} with {} actions",
        class.name,
        class.methods.len()
    );
    Ok(class.into())
}

struct ActionBuilder<'c, 'a> {
    ctx: &'c BuildContext<'a>,
    use_logger: bool,
}

impl ActionBuilder<'_, '_> {
    fn read_all(&self, table: &Table) -> Result<MethodDefinition> {
        let ctx = self.ctx;
        let entity = ctx.entity_name(table);
        let filters = ctx.filter_parameters(table)?;
        let arguments: Vec<String> = filters.iter().map(|p| p.name.clone()).collect();

        let mut method = self.action(
            ctx.naming.get_all_method(&entity),
            "HttpGet",
            entity.clone(),
        );
        method.parameters.push(ParameterDefinition::new("int", "pageSize").with_default("10"));
        method
            .parameters
            .push(ParameterDefinition::new("int", "pageNumber").with_default("1"));
        method.parameters.extend(filters);

        method.lines = self.paged_body(
            &method.name,
            &ctx.read_model_name(table),
            &format!(
                "Repository.{}({})",
                ctx.naming.query_method(&entity),
                arguments.join(", ")
            ),
            &ctx.naming.plural_name(&entity),
        );
        Ok(method)
    }

    fn read_all_view(&self, view: &View) -> MethodDefinition {
        let ctx = self.ctx;
        let entity = ctx.entity_name(view);

        let mut method = self.action(
            ctx.naming.get_all_method(&entity),
            "HttpGet",
            entity.clone(),
        );
        method.parameters.push(ParameterDefinition::new("int", "pageSize").with_default("10"));
        method
            .parameters
            .push(ParameterDefinition::new("int", "pageNumber").with_default("1"));

        method.lines = self.paged_body(
            &method.name,
            &entity,
            &format!("Repository.{}()", ctx.naming.query_method(&entity)),
            &ctx.naming.plural_name(&entity),
        );
        method
    }

    fn read_by_key(&self, table: &Table) -> Result<MethodDefinition> {
        let ctx = self.ctx;
        let entity = ctx.entity_name(table);

        let mut method = self.action(
            ctx.naming.get_method(&entity),
            "HttpGet",
            format!("{}/{{id}}", entity),
        );
        method.parameters.push(ctx.key_parameter(table)?);

        let mut lines = Lines::new();
        self.log_invocation(&mut lines, &method.name);
        lines.code(format!("var response = new SingleResponse<{}>();", entity));
        lines.blank().code("try").open();
        ctx.key_lookup(table, &mut lines)?;
        lines.blank();
        lines.code("if (entity == null)").nested("return NotFound();");
        lines.blank().code("response.Model = entity;");
        lines.close();
        self.catch_block(&mut lines, &method.name);
        lines.blank().code("return response.ToHttpResponse();");

        method.lines = lines.build();
        Ok(method)
    }

    /// Validate, convert, reject duplicates of every unique constraint, insert
    fn create(&self, table: &Table) -> Result<MethodDefinition> {
        let ctx = self.ctx;
        let entity = ctx.entity_name(table);

        let mut method = self.action(ctx.naming.post_method(&entity), "HttpPost", entity.clone());
        method.parameters.push(self.request_parameter(&entity));

        let mut lines = Lines::new();
        self.log_invocation(&mut lines, &method.name);
        self.validate_model(&mut lines);
        lines.code(format!("var response = new SingleResponse<{}>();", entity));
        lines.blank().code("try").open();
        lines.code("var entity = request.ToEntity();");

        for unique in &table.uniques {
            lines.blank();
            lines.code(format!(
                "if ((await Repository.{}(entity)) != null)",
                ctx.naming.unique_method(&entity, &unique.columns)
            ));
            lines.nested("return BadRequest();");
        }

        lines.blank().code("Repository.Add(entity);");
        lines.blank().code("await Repository.CommitChangesAsync();");
        lines.blank().code("response.Model = entity;");
        lines.close();
        self.catch_block(&mut lines, &method.name);
        lines.blank().code("return response.ToHttpResponse();");

        method.lines = lines.build();
        Ok(method)
    }

    /// Copy every updatable column from the request onto the stored entity
    fn update(&self, table: &Table) -> Result<MethodDefinition> {
        let ctx = self.ctx;
        let entity = ctx.entity_name(table);

        let mut method = self.action(
            ctx.naming.put_method(&entity),
            "HttpPut",
            format!("{}/{{id}}", entity),
        );
        method.parameters.push(ctx.key_parameter(table)?);
        method.parameters.push(self.request_parameter(&entity));

        let mut lines = Lines::new();
        self.log_invocation(&mut lines, &method.name);
        self.validate_model(&mut lines);
        lines.code(format!("var response = new SingleResponse<{}>();", entity));
        lines.blank().code("try").open();
        ctx.key_lookup(table, &mut lines)?;
        lines.blank();
        lines.code("if (entity == null)").nested("return NotFound();");
        lines.blank();
        for column in ctx.updatable_columns(table)? {
            let property = ctx.naming.property_name(&column.name);
            lines.code(format!("entity.{} = request.{};", property, property));
        }
        lines.blank().code("Repository.Update(entity);");
        lines.blank().code("await Repository.CommitChangesAsync();");
        lines.blank().code("response.Model = entity;");
        lines.close();
        self.catch_block(&mut lines, &method.name);
        lines.blank().code("return response.ToHttpResponse();");

        method.lines = lines.build();
        Ok(method)
    }

    fn delete(&self, table: &Table) -> Result<MethodDefinition> {
        let ctx = self.ctx;
        let entity = ctx.entity_name(table);

        let mut method = self.action(
            ctx.naming.delete_method(&entity),
            "HttpDelete",
            format!("{}/{{id}}", entity),
        );
        method.parameters.push(ctx.key_parameter(table)?);

        let mut lines = Lines::new();
        self.log_invocation(&mut lines, &method.name);
        lines.code(format!("var response = new SingleResponse<{}>();", entity));
        lines.blank().code("try").open();
        ctx.key_lookup(table, &mut lines)?;
        lines.blank();
        lines.code("if (entity == null)").nested("return NotFound();");
        lines.blank().code("Repository.Remove(entity);");
        lines.blank().code("await Repository.CommitChangesAsync();");
        lines.blank().code("response.Model = entity;");
        lines.close();
        self.catch_block(&mut lines, &method.name);
        lines.blank().code("return response.ToHttpResponse();");

        method.lines = lines.build();
        Ok(method)
    }

    /// Async action returning `IActionResult` with its HTTP verb and route
    fn action(&self, name: String, verb: &str, route: String) -> MethodDefinition {
        let mut method = MethodDefinition::new("Task<IActionResult>", name);
        method.is_async = true;
        method
            .attributes
            .push(AttributeDefinition::new(verb).with_string(&route));
        method
    }

    fn request_parameter(&self, entity: &str) -> ParameterDefinition {
        ParameterDefinition::new(self.ctx.naming.request_model_name(entity), "request")
            .with_attribute(AttributeDefinition::new("FromBody"))
    }

    fn paged_body(&self, method: &str, model: &str, query: &str, plural: &str) -> Vec<Line> {
        let mut lines = Lines::new();
        self.log_invocation(&mut lines, method);
        lines.code(format!("var response = new PagedResponse<{}>();", model));
        lines.blank().code("try").open();
        lines.code(format!("var query = {};", query));
        lines.blank();
        lines.code("response.PageSize = pageSize;");
        lines.code("response.PageNumber = pageNumber;");
        lines.code("response.ItemsCount = await query.CountAsync();");
        lines.blank();
        lines.code(
            "response.Model = await query.Skip((pageNumber - 1) * pageSize).Take(pageSize).ToListAsync();",
        );
        lines.blank();
        lines.code(format!(
            "response.Message = string.Format(\"Page {{0}} of {{1}}, Total of {}: {{2}}.\", pageNumber, response.PageCount, response.ItemsCount);",
            plural.to_lowercase()
        ));
        if self.use_logger {
            lines.blank();
            lines.code(format!(
                "Logger?.LogInformation(\"The {} have been retrieved successfully.\");",
                plural.to_lowercase()
            ));
        }
        lines.close();
        self.catch_block(&mut lines, method);
        lines.blank().code("return response.ToHttpResponse();");
        lines.build()
    }

    fn validate_model(&self, lines: &mut Lines) {
        lines.code("if (!ModelState.IsValid)");
        lines.nested("return BadRequest(request);");
        lines.blank();
    }

    fn log_invocation(&self, lines: &mut Lines, method: &str) {
        if self.use_logger {
            lines.code(format!(
                "Logger?.LogDebug(\"'{{0}}' has been invoked\", nameof({}));",
                method
            ));
            lines.blank();
        }
    }

    fn catch_block(&self, lines: &mut Lines, method: &str) {
        if self.use_logger {
            lines.code("catch (Exception ex)").open();
        } else {
            lines.code("catch (Exception)").open();
        }
        lines.code("response.DidError = true;");
        lines.code(format!("response.ErrorMessage = \"{}\";", INTERNAL_ERROR));
        if self.use_logger {
            lines.blank();
            lines.code(format!(
                "Logger?.LogCritical(\"There was an error on '{{0}}' invocation: {{1}}\", nameof({}), ex);",
                method
            ));
        }
        lines.close();
    }
}

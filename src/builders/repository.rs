//! Repository interface and implementation, one pair per feature

use anyhow::Result;
use tracing::debug;

use crate::definition::{
    AccessModifier, ClassDefinition, ConstructorDefinition, FieldDefinition,
    GenericTypeDefinition, InterfaceDefinition, Lines, MethodDefinition, ObjectDefinition,
    ParameterDefinition,
};
use crate::model::{SchemaObject, Table};
use crate::project::{CrudAction, ProjectFeature};

use super::data_contract::contract_joins;
use super::{match_expression, BuildContext, Layer};

/// Build `I<Feature>Repository`
pub fn build_repository_interface(
    ctx: &BuildContext,
    feature: &ProjectFeature,
) -> Result<ObjectDefinition> {
    let mut interface = InterfaceDefinition::new(
        ctx.namespace(Layer::Repositories),
        ctx.naming.repository_interface_name(&feature.name),
    );
    for namespace in ["System.Linq", "System.Threading.Tasks"] {
        interface.namespaces.push(namespace.to_string());
    }
    interface.namespaces.push(ctx.namespace(Layer::Models));

    interface.methods = repository_methods(ctx, feature)?
        .into_iter()
        .map(|mut method| {
            method.is_async = false;
            method.lines.clear();
            method
        })
        .collect();

    debug!("Built repository interface {}", interface.name);
    Ok(interface.into())
}

/// Build `<Feature>Repository` over the project's database context
pub fn build_repository(ctx: &BuildContext, feature: &ProjectFeature) -> Result<ObjectDefinition> {
    let db_context = ctx.db_context_name();
    let mut class = ClassDefinition::new(
        ctx.namespace(Layer::Repositories),
        ctx.naming.repository_name(&feature.name),
    );
    for namespace in [
        "System.Linq",
        "System.Threading.Tasks",
        "Microsoft.EntityFrameworkCore",
    ] {
        class.import(namespace);
    }
    class.import(ctx.namespace(Layer::Models));
    class
        .implements
        .push(ctx.naming.repository_interface_name(&feature.name));

    class.fields.push(FieldDefinition::readonly(
        AccessModifier::Protected,
        db_context.clone(),
        "DbContext",
    ));
    class.constructors.push(ConstructorDefinition {
        parameters: vec![ParameterDefinition::new(db_context, "dbContext")],
        lines: Lines::new().code("DbContext = dbContext;").build(),
        ..ConstructorDefinition::default()
    });

    class.methods = repository_methods(ctx, feature)?;

    debug!("Built repository {}", class.name);
    Ok(class.into())
}

/// Methods shared by the interface and the implementation, with bodies
fn repository_methods(ctx: &BuildContext, feature: &ProjectFeature) -> Result<Vec<MethodDefinition>> {
    let database = &ctx.project.database;
    let mut methods = Vec::new();

    for table in feature.tables(database) {
        let settings = ctx.settings(table);
        if settings.is_enabled(CrudAction::ReadAll) {
            methods.push(query_method(ctx, table)?);
        }
        if ctx.needs_key_lookup(table) {
            let entity = ctx.entity_name(table);
            methods.push(lookup_method(
                ctx,
                table,
                ctx.naming.get_method(&entity),
                table.key_columns(),
            ));
        }
        if settings.is_enabled(CrudAction::Create) {
            for unique in &table.uniques {
                let entity = ctx.entity_name(table);
                methods.push(lookup_method(
                    ctx,
                    table,
                    ctx.naming.unique_method(&entity, &unique.columns),
                    &unique.columns,
                ));
            }
        }
    }

    for view in feature.views(database) {
        if ctx.settings(view).is_enabled(CrudAction::ReadAll) {
            let entity = ctx.entity_name(view);
            let mut method = MethodDefinition::new(
                format!("IQueryable<{}>", entity),
                ctx.naming.query_method(&entity),
            );
            method.lines = Lines::new()
                .code(format!(
                    "return DbContext.{}.AsQueryable();",
                    ctx.naming.plural_name(&entity)
                ))
                .build();
            methods.push(method);
        }
    }

    for name in ["Add", "Update", "Remove"] {
        let mut method = MethodDefinition::new("void", name);
        method
            .generic_types
            .push(GenericTypeDefinition::new("TEntity").with_constraint("class"));
        method
            .parameters
            .push(ParameterDefinition::new("TEntity", "entity"));
        method.lines = Lines::new()
            .code(format!("DbContext.{}(entity);", name))
            .build();
        methods.push(method);
    }

    let mut commit = MethodDefinition::new("Task<int>", "CommitChangesAsync");
    commit.is_async = true;
    commit.lines = Lines::new()
        .code("return await DbContext.SaveChangesAsync();")
        .build();
    methods.push(commit);

    Ok(methods)
}

/// `Get<Plural>(filters)`: the unpaged read-all query
fn query_method(ctx: &BuildContext, table: &Table) -> Result<MethodDefinition> {
    let entity = ctx.entity_name(table);
    let filters = ctx.filter_columns(table)?;

    let mut method = MethodDefinition::new(
        format!("IQueryable<{}>", ctx.read_model_name(table)),
        ctx.naming.query_method(&entity),
    );
    method.parameters = ctx.filter_parameters(table)?;

    let mut lines = Lines::new();
    if ctx.uses_data_contract(table) {
        contract_query(ctx, table, &mut lines)?;
    } else {
        lines.code(format!(
            "var query = DbContext.{}.AsQueryable();",
            ctx.naming.plural_name(&entity)
        ));
    }

    for column in filters {
        let property = ctx.naming.property_name(&column.name);
        let parameter = ctx.naming.parameter_name(&column.name);
        lines.blank();
        lines.code(format!("if ({} != null)", parameter));
        lines.nested(format!(
            "query = query.Where(item => item.{} == {});",
            property, parameter
        ));
    }

    lines.blank().code("return query;");
    method.lines = lines.build();
    Ok(method)
}

/// Query expression joining every foreign key target into the data contract
fn contract_query(ctx: &BuildContext, table: &Table, lines: &mut Lines) -> Result<()> {
    let entity = ctx.entity_name(table);
    let mut ranges: Vec<String> = Vec::new();
    let source = range_name(ctx, &entity, &mut ranges);

    lines.code(format!(
        "var query = from {} in DbContext.{}",
        source,
        ctx.naming.plural_name(&entity)
    ));

    let joins = contract_joins(ctx, table)?;
    let mut join_ranges = Vec::new();
    for join in &joins {
        let target_entity = ctx.entity_name(join.target);
        let range = range_name(ctx, &target_entity, &mut ranges);

        let local: Vec<String> = join
            .foreign_key
            .columns
            .iter()
            .map(|c| format!("{}.{}", source, ctx.naming.property_name(c)))
            .collect();
        let remote: Vec<String> = join
            .target
            .key_columns()
            .iter()
            .map(|c| format!("{}.{}", range, ctx.naming.property_name(c)))
            .collect();
        let (left, right) = if local.len() == 1 && remote.len() == 1 {
            (local[0].clone(), remote[0].clone())
        } else {
            (anonymous_key(&local), anonymous_key(&remote))
        };

        lines.nested(format!(
            "join {} in DbContext.{} on {} equals {} into {}Join",
            range,
            ctx.naming.plural_name(&target_entity),
            left,
            right,
            range.trim_start_matches('@')
        ));
        lines.nested(format!(
            "from {} in {}Join.DefaultIfEmpty()",
            range,
            range.trim_start_matches('@')
        ));
        join_ranges.push(range);
    }

    lines.nested(format!("select new {}", ctx.naming.data_contract_name(&entity)));
    let mut assignments = Vec::new();
    for column in &table.columns {
        let property = ctx.naming.property_name(&column.name);
        assignments.push(format!("{} = {}.{}", property, source, property));
    }
    for (join, range) in joins.iter().zip(&join_ranges) {
        for (column, name) in &join.columns {
            assignments.push(format!(
                "{} = {}.{}",
                name,
                range,
                ctx.naming.property_name(&column.name)
            ));
        }
    }

    lines.nested("{");
    let count = assignments.len();
    for (index, assignment) in assignments.into_iter().enumerate() {
        let separator = if index + 1 < count { "," } else { "" };
        lines.nested(format!("    {}{}", assignment, separator));
    }
    lines.nested("};");
    Ok(())
}

/// Unique range variable for a query expression
fn range_name(ctx: &BuildContext, entity: &str, taken: &mut Vec<String>) -> String {
    let base = ctx.naming.parameter_name(entity);
    let mut name = base.clone();
    let mut suffix = 1;
    while taken.contains(&name) {
        suffix += 1;
        name = format!("{}{}", base.trim_start_matches('@'), suffix);
    }
    taken.push(name.clone());
    name
}

/// `new { Key1 = a.X, Key2 = a.Y }`
fn anonymous_key(members: &[String]) -> String {
    let members: Vec<String> = members
        .iter()
        .enumerate()
        .map(|(index, member)| format!("Key{} = {}", index + 1, member))
        .collect();
    format!("new {{ {} }}", members.join(", "))
}

/// `Get<Entity>...Async(entity)`: first row matching the given columns
fn lookup_method(
    ctx: &BuildContext,
    table: &Table,
    name: String,
    columns: &[String],
) -> MethodDefinition {
    let entity = ctx.entity_name(table);
    let mut method = MethodDefinition::new(format!("Task<{}>", entity), name);
    method.is_async = true;
    method
        .parameters
        .push(ParameterDefinition::new(entity.clone(), "entity"));
    method.lines = Lines::new()
        .code(format!(
            "return await DbContext.{}.FirstOrDefaultAsync(item => {});",
            ctx.naming.plural_name(&entity),
            match_expression(ctx.naming, "item", "entity", columns)
        ))
        .build();
    method
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use crate::project::Project;

    fn dbo(project: &Project) -> &ProjectFeature {
        project.features().iter().find(|f| f.name == "dbo").unwrap()
    }

    #[test]
    fn test_repository_interface_methods() {
        let project = store_project();
        let ctx = BuildContext::new(&project, &NAMING, &TYPES);

        let interface = build_repository_interface(&ctx, dbo(&project)).unwrap();
        let interface = interface.as_interface().unwrap();
        assert_eq!(interface.name, "IDboRepository");

        let names: Vec<&str> = interface.methods.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "GetCategories",
                "GetCategoryAsync",
                "GetProducts",
                "GetProductAsync",
                "GetProductByProductNameAsync",
                "Add",
                "Update",
                "Remove",
                "CommitChangesAsync",
            ]
        );
        assert!(interface.methods.iter().all(|m| m.lines.is_empty()));

        let add = interface.method("Add").unwrap();
        assert_eq!(add.generic_types[0].constraint.as_deref(), Some("class"));
    }

    #[test]
    fn test_repository_query_filters_by_foreign_key() {
        let project = store_project();
        let ctx = BuildContext::new(&project, &NAMING, &TYPES);

        let repository = build_repository(&ctx, dbo(&project)).unwrap();
        let class = repository.as_class().unwrap();
        assert_eq!(class.implements, vec!["IDboRepository".to_string()]);

        let query = class.method("GetProducts").unwrap();
        assert_eq!(query.return_type, "IQueryable<Product>");
        assert_eq!(query.parameter("categoryID").unwrap().ty, "int?");
        let body: Vec<&str> = query.code_lines().collect();
        assert_eq!(
            body,
            vec![
                "var query = DbContext.Products.AsQueryable();",
                "if (categoryID != null)",
                "query = query.Where(item => item.CategoryID == categoryID);",
                "return query;",
            ]
        );
    }

    #[test]
    fn test_repository_lookup_matches_every_key_column() {
        let project = store_project();
        let ctx = BuildContext::new(&project, &NAMING, &TYPES);
        let sales = project.features().iter().find(|f| f.name == "Sales").unwrap();

        let repository = build_repository(&ctx, sales).unwrap();
        let lookup = repository.as_class().unwrap().method("GetOrderDetailAsync").unwrap();
        assert_eq!(
            lookup.code_lines().next().unwrap(),
            "return await DbContext.OrderDetails.FirstOrDefaultAsync(item => item.OrderID == entity.OrderID && item.ProductID == entity.ProductID && item.LineCode == entity.LineCode);"
        );
    }

    #[test]
    fn test_disabled_actions_drop_repository_methods() {
        let mut project = store_project();
        project
            .remove_action("dbo.Product", CrudAction::Create)
            .unwrap();
        let ctx = BuildContext::new(&project, &NAMING, &TYPES);

        let repository = build_repository(&ctx, dbo(&project)).unwrap();
        assert!(repository
            .as_class()
            .unwrap()
            .method("GetProductByProductNameAsync")
            .is_none());
    }

    #[test]
    fn test_data_contract_query_joins_targets() {
        let mut project = store_project();
        project
            .select("dbo.Product", |s| s.entities_with_data_contracts = true)
            .unwrap();
        let ctx = BuildContext::new(&project, &NAMING, &TYPES);

        let repository = build_repository(&ctx, dbo(&project)).unwrap();
        let query = repository.as_class().unwrap().method("GetProducts").unwrap();
        assert_eq!(query.return_type, "IQueryable<ProductDataContract>");

        let body: Vec<&str> = query.code_lines().collect();
        assert_eq!(body[0], "var query = from product in DbContext.Products");
        assert_eq!(
            body[1],
            "join category in DbContext.Categories on product.CategoryID equals category.CategoryID into categoryJoin"
        );
        assert!(body.contains(&"CategoryCategoryName = category.CategoryName"));
    }
}

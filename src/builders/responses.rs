//! Response envelopes and their mapping to HTTP results

use anyhow::Result;
use tracing::debug;

use crate::definition::{
    ClassDefinition, GenericTypeDefinition, InterfaceDefinition, Lines, MethodDefinition,
    ObjectDefinition, ParameterDefinition, PropertyDefinition,
};

use super::{BuildContext, Layer};

const MODEL: &str = "TModel";

/// Envelope kinds: (interface, class, model type, no-result condition, HTTP
/// status for no result)
const ENVELOPES: &[(&str, &str, &str, &str, &str)] = &[
    (
        "ISingleResponse",
        "SingleResponse",
        "TModel",
        "response.Model == null",
        "NotFound",
    ),
    (
        "IListResponse",
        "ListResponse",
        "IEnumerable<TModel>",
        "response.Model == null || !response.Model.Any()",
        "NoContent",
    ),
    (
        "IPagedResponse",
        "PagedResponse",
        "IEnumerable<TModel>",
        "response.Model == null || !response.Model.Any()",
        "NoContent",
    ),
];

/// Build the response interfaces and their implementations:
/// `IResponse`, `ISingleResponse<TModel>`, `IListResponse<TModel>`,
/// `IPagedResponse<TModel>`, then `Response`, `SingleResponse<TModel>`,
/// `ListResponse<TModel>` and `PagedResponse<TModel>`.
pub fn build_response_contracts(ctx: &BuildContext) -> Result<Vec<ObjectDefinition>> {
    let namespace = ctx.namespace(Layer::Responses);
    let mut definitions = Vec::new();

    let mut response = InterfaceDefinition::new(namespace.clone(), "IResponse");
    response.properties = base_properties();
    definitions.push(response.into());

    for (interface_name, _, model_type, _, _) in ENVELOPES {
        let mut interface = InterfaceDefinition::new(namespace.clone(), *interface_name);
        interface.namespaces.push("System.Collections.Generic".to_string());
        interface.generic_types.push(GenericTypeDefinition::new(MODEL));
        interface.implements.push("IResponse".to_string());
        interface
            .properties
            .push(PropertyDefinition::automatic(*model_type, "Model"));
        if *interface_name == "IPagedResponse" {
            interface.properties.extend(paging_properties());
            interface
                .properties
                .push(PropertyDefinition::with_getter("int", "PageCount", Vec::new()));
        }
        definitions.push(interface.into());
    }

    let mut class = ClassDefinition::new(namespace.clone(), "Response");
    class.implements.push("IResponse".to_string());
    class.properties = base_properties();
    definitions.push(class.into());

    for (interface_name, class_name, model_type, _, _) in ENVELOPES {
        let mut class = ClassDefinition::new(namespace.clone(), *class_name);
        class.import("System.Collections.Generic");
        class.generic_types.push(GenericTypeDefinition::new(MODEL));
        class
            .implements
            .push(format!("{}<{}>", interface_name, MODEL));
        class.properties = base_properties();
        class
            .properties
            .push(PropertyDefinition::automatic(*model_type, "Model"));

        if *class_name == "PagedResponse" {
            class.properties.extend(paging_properties());
            class.properties.push(page_count_property());
        }
        definitions.push(class.into());
    }

    debug!("Built {} response contracts", definitions.len());
    Ok(definitions)
}

/// Build the static `ResponseExtensions` class.
///
/// An error always maps to 500. Otherwise a single response without a model
/// is 404, a list or paged response with a missing or empty model is 204, and
/// anything else is 200.
pub fn build_response_extensions(ctx: &BuildContext) -> Result<ObjectDefinition> {
    let mut class = ClassDefinition::new(ctx.namespace(Layer::Responses), "ResponseExtensions");
    class.is_static = true;
    for namespace in ["System.Linq", "System.Net", "Microsoft.AspNetCore.Mvc"] {
        class.import(namespace);
    }

    let mut plain = to_http_response("IResponse", false);
    plain.lines = Lines::new()
        .code("var status = response.DidError ? HttpStatusCode.InternalServerError : HttpStatusCode.OK;")
        .blank()
        .code("return new ObjectResult(response)")
        .open()
        .code("StatusCode = (int)status")
        .close_with(";")
        .build();
    class.methods.push(plain);

    for (interface_name, _, _, no_result, no_result_status) in ENVELOPES {
        let mut method = to_http_response(&format!("{}<{}>", interface_name, MODEL), true);
        method.lines = Lines::new()
            .code("var status = HttpStatusCode.OK;")
            .blank()
            .code("if (response.DidError)")
            .nested("status = HttpStatusCode.InternalServerError;")
            .code(format!("else if ({})", no_result))
            .nested(format!("status = HttpStatusCode.{};", no_result_status))
            .blank()
            .code("return new ObjectResult(response)")
            .open()
            .code("StatusCode = (int)status")
            .close_with(";")
            .build();
        class.methods.push(method);
    }

    debug!("Built {}", class.name);
    Ok(class.into())
}

fn to_http_response(response_type: &str, generic: bool) -> MethodDefinition {
    let mut method = MethodDefinition::new("IActionResult", "ToHttpResponse");
    method.is_static = true;
    method.is_extension = true;
    if generic {
        method.generic_types.push(GenericTypeDefinition::new(MODEL));
    }
    method
        .parameters
        .push(ParameterDefinition::new(response_type, "response"));
    method
}

fn base_properties() -> Vec<PropertyDefinition> {
    vec![
        PropertyDefinition::automatic("string", "Message"),
        PropertyDefinition::automatic("bool", "DidError"),
        PropertyDefinition::automatic("string", "ErrorMessage"),
    ]
}

fn paging_properties() -> Vec<PropertyDefinition> {
    vec![
        PropertyDefinition::automatic("int", "PageSize"),
        PropertyDefinition::automatic("int", "PageNumber"),
        PropertyDefinition::automatic("int", "ItemsCount"),
    ]
}

/// One page when there are fewer items than a page, otherwise the truncated
/// quotient plus one: 25/10 and 20/10 give 3, 9/10 gives 1, 10/10 gives 2
fn page_count_property() -> PropertyDefinition {
    PropertyDefinition::with_getter(
        "int",
        "PageCount",
        Lines::new()
            .code("return ItemsCount < PageSize ? 1 : (int)(((double)ItemsCount / PageSize) + 1);")
            .build(),
    )
}

//! C# source rendering

use std::fmt::Write;

use crate::definition::{
    AttributeDefinition, ClassDefinition, ConstructorDefinition, FieldDefinition,
    GenericTypeDefinition, InterfaceDefinition, Line, MethodDefinition, ObjectDefinition,
    ParameterDefinition, PropertyDefinition,
};

use super::Renderer;

const INDENT: &str = "    ";

/// Renders definitions as C# with block-scoped namespaces and four-space
/// indentation
#[derive(Debug, Clone, Copy, Default)]
pub struct CSharpRenderer;

impl Renderer for CSharpRenderer {
    fn file_extension(&self) -> &str {
        "cs"
    }

    fn render(&self, definition: &ObjectDefinition) -> String {
        let mut out = SourceWriter::default();

        for namespace in definition.namespaces() {
            out.line(0, &format!("using {};", namespace));
        }
        if !definition.namespaces().is_empty() {
            out.blank();
        }

        out.line(0, &format!("namespace {}", definition.namespace()));
        out.line(0, "{");
        match definition {
            ObjectDefinition::Class(class) => render_class(&mut out, class),
            ObjectDefinition::Interface(interface) => render_interface(&mut out, interface),
        }
        out.line(0, "}");

        out.finish()
    }
}

/// Accumulates lines and drops the blank line before a closing brace
#[derive(Default)]
struct SourceWriter {
    buffer: String,
}

impl SourceWriter {
    fn line(&mut self, depth: usize, text: &str) {
        for _ in 0..depth {
            self.buffer.push_str(INDENT);
        }
        self.buffer.push_str(text);
        self.buffer.push('\n');
    }

    fn blank(&mut self) {
        self.buffer.push('\n');
    }

    /// Separate two members with a blank line unless a block was just opened
    fn separate(&mut self) {
        if !self.buffer.trim_end_matches([' ', '\n']).ends_with('{') {
            self.blank();
        }
    }

    fn finish(self) -> String {
        self.buffer
    }
}

fn render_class(out: &mut SourceWriter, class: &ClassDefinition) {
    render_documentation(out, 1, class.documentation.as_deref());
    render_attributes(out, 1, &class.attributes);

    let mut header = String::from(class.access.keyword());
    if class.is_static {
        header.push_str(" static");
    }
    if class.is_partial {
        header.push_str(" partial");
    }
    let _ = write!(
        header,
        " class {}{}",
        class.name,
        generic_list(&class.generic_types)
    );

    let bases: Vec<&str> = class
        .base_class
        .iter()
        .map(String::as_str)
        .chain(class.implements.iter().map(String::as_str))
        .collect();
    if !bases.is_empty() {
        let _ = write!(header, " : {}", bases.join(", "));
    }
    out.line(1, &header);
    render_constraints(out, 2, &class.generic_types);
    out.line(1, "{");

    for field in &class.fields {
        render_field(out, field);
    }

    for constructor in &class.constructors {
        out.separate();
        render_constructor(out, &class.name, constructor);
    }

    // consecutive plain auto-properties stay together
    let mut previous_plain = false;
    for property in &class.properties {
        let plain = property.is_automatic && property.attributes.is_empty();
        if !(plain && previous_plain) {
            out.separate();
        }
        render_property(out, property, false);
        previous_plain = plain;
    }

    for method in &class.methods {
        out.separate();
        render_method(out, method, false);
    }

    out.line(1, "}");
}

fn render_interface(out: &mut SourceWriter, interface: &InterfaceDefinition) {
    render_documentation(out, 1, interface.documentation.as_deref());
    render_attributes(out, 1, &interface.attributes);

    let mut header = format!(
        "{} interface {}{}",
        interface.access.keyword(),
        interface.name,
        generic_list(&interface.generic_types)
    );
    if !interface.implements.is_empty() {
        let _ = write!(header, " : {}", interface.implements.join(", "));
    }
    out.line(1, &header);
    render_constraints(out, 2, &interface.generic_types);
    out.line(1, "{");

    for property in &interface.properties {
        render_property(out, property, true);
    }

    for method in &interface.methods {
        out.separate();
        render_method(out, method, true);
    }

    out.line(1, "}");
}

fn render_documentation(out: &mut SourceWriter, depth: usize, documentation: Option<&str>) {
    if let Some(summary) = documentation {
        out.line(depth, "/// <summary>");
        for line in summary.lines() {
            out.line(depth, &format!("/// {}", line));
        }
        out.line(depth, "/// </summary>");
    }
}

fn render_attributes(out: &mut SourceWriter, depth: usize, attributes: &[AttributeDefinition]) {
    for attribute in attributes {
        out.line(depth, &format!("[{}]", attribute_text(attribute)));
    }
}

fn attribute_text(attribute: &AttributeDefinition) -> String {
    if attribute.arguments.is_empty() {
        attribute.name.clone()
    } else {
        format!("{}({})", attribute.name, attribute.arguments.join(", "))
    }
}

fn render_field(out: &mut SourceWriter, field: &FieldDefinition) {
    let readonly = if field.is_readonly { " readonly" } else { "" };
    out.line(
        2,
        &format!("{}{} {} {};", field.access.keyword(), readonly, field.ty, field.name),
    );
}

fn render_constructor(out: &mut SourceWriter, class_name: &str, constructor: &ConstructorDefinition) {
    let mut header = format!(
        "{} {}({})",
        constructor.access.keyword(),
        class_name,
        parameter_list(&constructor.parameters, false)
    );
    if let Some(arguments) = &constructor.base_arguments {
        let _ = write!(header, "\n{}{}    : base({})", INDENT, INDENT, arguments.join(", "));
    }
    out.line(2, &header);
    render_body(out, 2, &constructor.lines);
}

fn render_property(out: &mut SourceWriter, property: &PropertyDefinition, in_interface: bool) {
    render_attributes(out, 2, &property.attributes);

    let signature = if in_interface {
        format!("{} {}", property.ty, property.name)
    } else {
        format!("{} {} {}", property.access.keyword(), property.ty, property.name)
    };

    if property.is_automatic {
        out.line(2, &format!("{} {{ get; set; }}", signature));
    } else if in_interface {
        out.line(2, &format!("{} {{ get; }}", signature));
    } else {
        out.line(2, &signature);
        out.line(2, "{");
        out.line(3, "get");
        render_body(out, 3, &property.getter);
        out.line(2, "}");
    }
}

fn render_method(out: &mut SourceWriter, method: &MethodDefinition, in_interface: bool) {
    render_attributes(out, 2, &method.attributes);

    let mut header = String::new();
    if !in_interface {
        header.push_str(method.access.keyword());
        header.push(' ');
        if method.is_static {
            header.push_str("static ");
        }
        if method.is_override {
            header.push_str("override ");
        }
        if method.is_async {
            header.push_str("async ");
        }
    }
    let _ = write!(
        header,
        "{} {}{}({})",
        method.return_type,
        method.name,
        generic_list(&method.generic_types),
        parameter_list(&method.parameters, method.is_extension)
    );

    let constraints = constraint_list(&method.generic_types);
    if in_interface {
        match constraints {
            Some(constraints) => out.line(2, &format!("{} {};", header, constraints)),
            None => out.line(2, &format!("{};", header)),
        }
        return;
    }

    out.line(2, &header);
    if let Some(constraints) = constraints {
        out.line(3, &constraints);
    }
    render_body(out, 2, &method.lines);
}

fn render_body(out: &mut SourceWriter, depth: usize, lines: &[Line]) {
    out.line(depth, "{");
    for line in lines {
        match line {
            Line::Code { text, indent } => out.line(depth + 1 + indent, text),
            Line::Comment { text, indent } => out.line(depth + 1 + indent, &format!("// {}", text)),
            Line::Todo { text, indent } => {
                out.line(depth + 1 + indent, &format!("// todo: {}", text))
            }
            Line::Blank => out.blank(),
        }
    }
    out.line(depth, "}");
}

fn generic_list(generic_types: &[GenericTypeDefinition]) -> String {
    if generic_types.is_empty() {
        return String::new();
    }
    let names: Vec<&str> = generic_types.iter().map(|g| g.name.as_str()).collect();
    format!("<{}>", names.join(", "))
}

fn constraint_list(generic_types: &[GenericTypeDefinition]) -> Option<String> {
    let constraints: Vec<String> = generic_types
        .iter()
        .filter_map(|g| {
            g.constraint
                .as_ref()
                .map(|c| format!("where {} : {}", g.name, c))
        })
        .collect();
    if constraints.is_empty() {
        None
    } else {
        Some(constraints.join(" "))
    }
}

fn render_constraints(out: &mut SourceWriter, depth: usize, generic_types: &[GenericTypeDefinition]) {
    if let Some(constraints) = constraint_list(generic_types) {
        out.line(depth, &constraints);
    }
}

fn parameter_list(parameters: &[ParameterDefinition], is_extension: bool) -> String {
    parameters
        .iter()
        .enumerate()
        .map(|(index, parameter)| {
            let mut text = String::new();
            for attribute in &parameter.attributes {
                let _ = write!(text, "[{}] ", attribute_text(attribute));
            }
            if is_extension && index == 0 {
                text.push_str("this ");
            }
            let _ = write!(text, "{} {}", parameter.ty, parameter.name);
            if let Some(default) = &parameter.default_value {
                let _ = write!(text, " = {}", default);
            }
            text
        })
        .collect::<Vec<_>>()
        .join(", ")
}

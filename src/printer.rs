//! Canonical printer for document trees.
//!
//! Produces the canonical text form of a [`Node`] tree: two-space
//! indented blocks, definitions separated by blank lines, arguments
//! and list values space-separated. Source spans are ignored — the
//! printer is schema-agnostic and purely structural.

use crate::ast::Node;
use crate::ast::NodeKind;
use crate::ast::ScalarValue;
use std::rc::Rc;

/// Prints `node` as canonical GraphQL text.
pub fn print(node: &Node) -> String {
    print_node(node, 0)
}

fn print_node(node: &Node, indent: usize) -> String {
    match node.kind() {
        NodeKind::Name => node
            .string_scalar("value")
            .unwrap_or_default()
            .to_string(),
        NodeKind::Document => join_printed(
            node.children("definitions").unwrap_or(&[]),
            "\n\n",
            indent,
        ),
        NodeKind::OperationDefinition => {
            print_operation(node, indent)
        },
        NodeKind::VariableDefinition => {
            print_variable_definition(node, indent)
        },
        NodeKind::Variable => {
            format!("${}", print_child(node, "name", indent))
        },
        NodeKind::SelectionSet => print_block(
            node.children("selections").unwrap_or(&[]),
            indent,
        ),
        NodeKind::Field => print_field(node, indent),
        NodeKind::Argument | NodeKind::ObjectField => format!(
            "{}: {}",
            print_child(node, "name", indent),
            print_child(node, "value", indent),
        ),
        NodeKind::FragmentSpread => format!(
            "...{}{}",
            print_child(node, "name", indent),
            print_directives(node, indent),
        ),
        NodeKind::InlineFragment => {
            let mut out = String::from("...");
            if let Some(condition) = node.child("typeCondition") {
                out.push_str(" on ");
                out.push_str(&print_node(condition, indent));
            }
            out.push_str(&print_directives(node, indent));
            out.push(' ');
            out.push_str(&print_child(node, "selectionSet", indent));
            out
        },
        NodeKind::FragmentDefinition => format!(
            "fragment {} on {}{} {}",
            print_child(node, "name", indent),
            print_child(node, "typeCondition", indent),
            print_directives(node, indent),
            print_child(node, "selectionSet", indent),
        ),
        NodeKind::IntValue => match node.scalar("value") {
            Some(ScalarValue::Int(value)) => value.to_string(),
            _ => String::new(),
        },
        NodeKind::FloatValue => match node.scalar("value") {
            Some(ScalarValue::Float(value)) => format_float(*value),
            _ => String::new(),
        },
        NodeKind::StringValue => print_string(node),
        NodeKind::BooleanValue => match node.scalar("value") {
            Some(ScalarValue::Boolean(value)) => value.to_string(),
            _ => String::new(),
        },
        NodeKind::NullValue => "null".to_string(),
        NodeKind::EnumValue => node
            .string_scalar("value")
            .unwrap_or_default()
            .to_string(),
        NodeKind::ListValue => format!(
            "[{}]",
            join_printed(
                node.children("values").unwrap_or(&[]),
                ", ",
                indent,
            ),
        ),
        NodeKind::ObjectValue => {
            let fields = node.children("fields").unwrap_or(&[]);
            if fields.is_empty() {
                "{}".to_string()
            } else {
                format!(
                    "{{ {} }}",
                    join_printed(fields, ", ", indent),
                )
            }
        },
        NodeKind::Directive => {
            let mut out =
                format!("@{}", print_child(node, "name", indent));
            out.push_str(&print_wrapped_sequence(
                node, "arguments", "(", ", ", ")", indent,
            ));
            out
        },
        NodeKind::NamedType => print_child(node, "name", indent),
        NodeKind::ListType => {
            format!("[{}]", print_child(node, "type", indent))
        },
        NodeKind::NonNullType => {
            format!("{}!", print_child(node, "type", indent))
        },
        NodeKind::SchemaDefinition => {
            let mut out = print_description(node, indent);
            out.push_str("schema");
            out.push_str(&print_directives(node, indent));
            out.push(' ');
            out.push_str(&print_block(
                node.children("operationTypes").unwrap_or(&[]),
                indent,
            ));
            out
        },
        NodeKind::OperationTypeDefinition => format!(
            "{}: {}",
            node.string_scalar("operation").unwrap_or_default(),
            print_child(node, "type", indent),
        ),
        NodeKind::ScalarTypeDefinition => format!(
            "{}scalar {}{}",
            print_description(node, indent),
            print_child(node, "name", indent),
            print_directives(node, indent),
        ),
        NodeKind::ObjectTypeDefinition => {
            print_composite_definition(node, "type", indent)
        },
        NodeKind::InterfaceTypeDefinition => {
            print_composite_definition(node, "interface", indent)
        },
        NodeKind::FieldDefinition => {
            let mut out = print_description(node, indent);
            out.push_str(&print_child(node, "name", indent));
            out.push_str(&print_wrapped_sequence(
                node, "arguments", "(", ", ", ")", indent,
            ));
            out.push_str(": ");
            out.push_str(&print_child(node, "type", indent));
            out.push_str(&print_directives(node, indent));
            out
        },
        NodeKind::InputValueDefinition => {
            let mut out = print_description(node, indent);
            out.push_str(&print_child(node, "name", indent));
            out.push_str(": ");
            out.push_str(&print_child(node, "type", indent));
            if let Some(default) = node.child("defaultValue") {
                out.push_str(" = ");
                out.push_str(&print_node(default, indent));
            }
            out.push_str(&print_directives(node, indent));
            out
        },
        NodeKind::UnionTypeDefinition => {
            let mut out = print_description(node, indent);
            out.push_str("union ");
            out.push_str(&print_child(node, "name", indent));
            out.push_str(&print_directives(node, indent));
            let members = node.children("types").unwrap_or(&[]);
            if !members.is_empty() {
                out.push_str(" = ");
                out.push_str(&join_printed(members, " | ", indent));
            }
            out
        },
        NodeKind::EnumTypeDefinition => {
            let mut out = print_description(node, indent);
            out.push_str("enum ");
            out.push_str(&print_child(node, "name", indent));
            out.push_str(&print_directives(node, indent));
            let values = node.children("values").unwrap_or(&[]);
            if !values.is_empty() {
                out.push(' ');
                out.push_str(&print_block(values, indent));
            }
            out
        },
        NodeKind::EnumValueDefinition => format!(
            "{}{}{}",
            print_description(node, indent),
            print_child(node, "name", indent),
            print_directives(node, indent),
        ),
        NodeKind::InputObjectTypeDefinition => {
            let mut out = print_description(node, indent);
            out.push_str("input ");
            out.push_str(&print_child(node, "name", indent));
            out.push_str(&print_directives(node, indent));
            let fields = node.children("fields").unwrap_or(&[]);
            if !fields.is_empty() {
                out.push(' ');
                out.push_str(&print_block(fields, indent));
            }
            out
        },
        NodeKind::DirectiveDefinition => {
            let mut out = print_description(node, indent);
            out.push_str("directive @");
            out.push_str(&print_child(node, "name", indent));
            out.push_str(&print_wrapped_sequence(
                node, "arguments", "(", ", ", ")", indent,
            ));
            if node.scalar("repeatable")
                == Some(&ScalarValue::Boolean(true))
            {
                out.push_str(" repeatable");
            }
            out.push_str(" on ");
            out.push_str(&join_printed(
                node.children("locations").unwrap_or(&[]),
                " | ",
                indent,
            ));
            out
        },
    }
}

// =============================================================================
// Helpers
// =============================================================================

fn print_child(node: &Node, slot: &str, indent: usize) -> String {
    node.child(slot)
        .map(|child| print_node(child, indent))
        .unwrap_or_default()
}

fn join_printed(
    children: &[Rc<Node>],
    separator: &str,
    indent: usize,
) -> String {
    children
        .iter()
        .map(|child| print_node(child, indent))
        .collect::<Vec<_>>()
        .join(separator)
}

/// Prints a sequence slot wrapped in delimiters, or nothing when the
/// slot is absent or empty.
fn print_wrapped_sequence(
    node: &Node,
    slot: &str,
    open: &str,
    separator: &str,
    close: &str,
    indent: usize,
) -> String {
    let children = node.children(slot).unwrap_or(&[]);
    if children.is_empty() {
        String::new()
    } else {
        format!(
            "{open}{}{close}",
            join_printed(children, separator, indent),
        )
    }
}

/// Prints a `{ ... }` block with each item on its own indented line.
fn print_block(children: &[Rc<Node>], indent: usize) -> String {
    if children.is_empty() {
        return "{\n".to_string() + &"  ".repeat(indent) + "}";
    }
    let inner_pad = "  ".repeat(indent + 1);
    let mut out = String::from("{\n");
    for child in children {
        out.push_str(&inner_pad);
        out.push_str(&print_node(child, indent + 1));
        out.push('\n');
    }
    out.push_str(&"  ".repeat(indent));
    out.push('}');
    out
}

fn print_directives(node: &Node, indent: usize) -> String {
    let directives = node.children("directives").unwrap_or(&[]);
    let mut out = String::new();
    for directive in directives {
        out.push(' ');
        out.push_str(&print_node(directive, indent));
    }
    out
}

/// Prints a leading description string followed by a newline at the
/// current indentation.
fn print_description(node: &Node, indent: usize) -> String {
    match node.child("description") {
        Some(description) => {
            let mut out = print_node(description, indent);
            out.push('\n');
            out.push_str(&"  ".repeat(indent));
            out
        },
        None => String::new(),
    }
}

/// Prints `type Name ...` / `interface Name ...` — shared grammar
/// apart from the keyword.
fn print_composite_definition(
    node: &Node,
    keyword: &str,
    indent: usize,
) -> String {
    let mut out = print_description(node, indent);
    out.push_str(keyword);
    out.push(' ');
    out.push_str(&print_child(node, "name", indent));
    let interfaces = node.children("interfaces").unwrap_or(&[]);
    if !interfaces.is_empty() {
        out.push_str(" implements ");
        out.push_str(&join_printed(interfaces, " & ", indent));
    }
    out.push_str(&print_directives(node, indent));
    let fields = node.children("fields").unwrap_or(&[]);
    if !fields.is_empty() {
        out.push(' ');
        out.push_str(&print_block(fields, indent));
    }
    out
}

fn print_operation(node: &Node, indent: usize) -> String {
    let operation =
        node.string_scalar("operation").unwrap_or("query");
    let name = print_child(node, "name", indent);
    let variable_definitions = print_wrapped_sequence(
        node,
        "variableDefinitions",
        "(",
        ", ",
        ")",
        indent,
    );
    let directives = print_directives(node, indent);
    let selection_set = print_child(node, "selectionSet", indent);

    // The shorthand form is only valid for an anonymous, undecorated
    // query.
    if operation == "query"
        && name.is_empty()
        && variable_definitions.is_empty()
        && directives.is_empty()
    {
        return selection_set;
    }

    let mut out = String::from(operation);
    if !name.is_empty() {
        out.push(' ');
        out.push_str(&name);
    }
    out.push_str(&variable_definitions);
    out.push_str(&directives);
    out.push(' ');
    out.push_str(&selection_set);
    out
}

fn print_variable_definition(node: &Node, indent: usize) -> String {
    let mut out = print_child(node, "variable", indent);
    out.push_str(": ");
    out.push_str(&print_child(node, "type", indent));
    if let Some(default) = node.child("defaultValue") {
        out.push_str(" = ");
        out.push_str(&print_node(default, indent));
    }
    out.push_str(&print_directives(node, indent));
    out
}

fn print_field(node: &Node, indent: usize) -> String {
    let mut out = String::new();
    if let Some(alias) = node.child("alias") {
        out.push_str(&print_node(alias, indent));
        out.push_str(": ");
    }
    out.push_str(&print_child(node, "name", indent));
    out.push_str(&print_wrapped_sequence(
        node, "arguments", "(", ", ", ")", indent,
    ));
    out.push_str(&print_directives(node, indent));
    if let Some(selection_set) = node.child("selectionSet") {
        out.push(' ');
        out.push_str(&print_node(selection_set, indent));
    }
    out
}

fn print_string(node: &Node) -> String {
    let value = node.string_scalar("value").unwrap_or_default();
    let block = node.scalar("block")
        == Some(&ScalarValue::Boolean(true));
    if block {
        if value.contains('\n') {
            format!("\"\"\"\n{value}\n\"\"\"")
        } else {
            format!("\"\"\"{value}\"\"\"")
        }
    } else {
        let mut out = String::with_capacity(value.len() + 2);
        out.push('"');
        for ch in value.chars() {
            match ch {
                '"' => out.push_str("\\\""),
                '\\' => out.push_str("\\\\"),
                '\n' => out.push_str("\\n"),
                '\r' => out.push_str("\\r"),
                '\t' => out.push_str("\\t"),
                control if (control as u32) < 0x20 => {
                    out.push_str(&format!(
                        "\\u{:04X}",
                        control as u32,
                    ));
                },
                other => out.push(other),
            }
        }
        out.push('"');
        out
    }
}

/// Formats a float so it always reads back as a float literal (a bare
/// integral value gains a `.0`).
fn format_float(value: f64) -> String {
    if value.is_finite() && value == value.trunc() {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}

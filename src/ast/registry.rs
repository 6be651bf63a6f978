//! The per-kind slot registry.
//!
//! Records, for every [`NodeKind`], the ordered list of slots the kind
//! carries: the slot's name, whether it holds a single child node, an
//! ordered child sequence, or a leaf scalar, and whether the grammar
//! mandates its presence. The traversal engine enumerates children in
//! registry order (scalar slots do not participate in traversal), and
//! the edit materializer rebuilds nodes slot by slot against the same
//! table.

use crate::ast::NodeKind;

/// How a slot stores its value.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SlotKind {
    /// An optional single child node.
    Single,
    /// An ordered sequence of child nodes.
    Sequence,
    /// A leaf scalar (string/number/bool); not traversed.
    Scalar,
}

/// One slot in a node kind's layout.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SlotSpec {
    pub name: &'static str,
    pub kind: SlotKind,
    /// Whether the grammar mandates this slot's presence. The engine
    /// fails traversal with a malformed-node error when a required
    /// slot is absent.
    pub required: bool,
}

const fn single(name: &'static str) -> SlotSpec {
    SlotSpec {
        name,
        kind: SlotKind::Single,
        required: false,
    }
}

const fn required_single(name: &'static str) -> SlotSpec {
    SlotSpec {
        name,
        kind: SlotKind::Single,
        required: true,
    }
}

const fn sequence(name: &'static str) -> SlotSpec {
    SlotSpec {
        name,
        kind: SlotKind::Sequence,
        required: false,
    }
}

const fn scalar(name: &'static str) -> SlotSpec {
    SlotSpec {
        name,
        kind: SlotKind::Scalar,
        required: false,
    }
}

const fn required_scalar(name: &'static str) -> SlotSpec {
    SlotSpec {
        name,
        kind: SlotKind::Scalar,
        required: true,
    }
}

/// Returns the ordered slot layout for `kind`.
///
/// Child-bearing slots appear in visit order; scalar slots are listed
/// where the original grammar places them but are skipped by the
/// traversal engine.
pub fn slot_specs(kind: NodeKind) -> &'static [SlotSpec] {
    const NAME: &[SlotSpec] = &[required_scalar("value")];
    const DOCUMENT: &[SlotSpec] = &[sequence("definitions")];
    const OPERATION_DEFINITION: &[SlotSpec] = &[
        required_scalar("operation"),
        single("name"),
        sequence("variableDefinitions"),
        sequence("directives"),
        required_single("selectionSet"),
    ];
    const VARIABLE_DEFINITION: &[SlotSpec] = &[
        required_single("variable"),
        required_single("type"),
        single("defaultValue"),
        sequence("directives"),
    ];
    const VARIABLE: &[SlotSpec] = &[required_single("name")];
    const SELECTION_SET: &[SlotSpec] = &[sequence("selections")];
    const FIELD: &[SlotSpec] = &[
        single("alias"),
        required_single("name"),
        sequence("arguments"),
        sequence("directives"),
        single("selectionSet"),
    ];
    const ARGUMENT: &[SlotSpec] =
        &[required_single("name"), required_single("value")];
    const FRAGMENT_SPREAD: &[SlotSpec] =
        &[required_single("name"), sequence("directives")];
    const INLINE_FRAGMENT: &[SlotSpec] = &[
        single("typeCondition"),
        sequence("directives"),
        required_single("selectionSet"),
    ];
    const FRAGMENT_DEFINITION: &[SlotSpec] = &[
        required_single("name"),
        required_single("typeCondition"),
        sequence("directives"),
        required_single("selectionSet"),
    ];
    const INT_VALUE: &[SlotSpec] = &[required_scalar("value")];
    const FLOAT_VALUE: &[SlotSpec] = &[required_scalar("value")];
    const STRING_VALUE: &[SlotSpec] =
        &[required_scalar("value"), scalar("block")];
    const BOOLEAN_VALUE: &[SlotSpec] = &[required_scalar("value")];
    const NULL_VALUE: &[SlotSpec] = &[];
    const ENUM_VALUE: &[SlotSpec] = &[required_scalar("value")];
    const LIST_VALUE: &[SlotSpec] = &[sequence("values")];
    const OBJECT_VALUE: &[SlotSpec] = &[sequence("fields")];
    const OBJECT_FIELD: &[SlotSpec] =
        &[required_single("name"), required_single("value")];
    const DIRECTIVE: &[SlotSpec] =
        &[required_single("name"), sequence("arguments")];
    const NAMED_TYPE: &[SlotSpec] = &[required_single("name")];
    const LIST_TYPE: &[SlotSpec] = &[required_single("type")];
    const NON_NULL_TYPE: &[SlotSpec] = &[required_single("type")];
    const SCHEMA_DEFINITION: &[SlotSpec] =
        &[sequence("directives"), sequence("operationTypes")];
    const OPERATION_TYPE_DEFINITION: &[SlotSpec] =
        &[required_scalar("operation"), required_single("type")];
    const SCALAR_TYPE_DEFINITION: &[SlotSpec] = &[
        single("description"),
        required_single("name"),
        sequence("directives"),
    ];
    const OBJECT_TYPE_DEFINITION: &[SlotSpec] = &[
        single("description"),
        required_single("name"),
        sequence("interfaces"),
        sequence("directives"),
        sequence("fields"),
    ];
    const FIELD_DEFINITION: &[SlotSpec] = &[
        single("description"),
        required_single("name"),
        sequence("arguments"),
        required_single("type"),
        sequence("directives"),
    ];
    const INPUT_VALUE_DEFINITION: &[SlotSpec] = &[
        single("description"),
        required_single("name"),
        required_single("type"),
        single("defaultValue"),
        sequence("directives"),
    ];
    const INTERFACE_TYPE_DEFINITION: &[SlotSpec] = &[
        single("description"),
        required_single("name"),
        sequence("interfaces"),
        sequence("directives"),
        sequence("fields"),
    ];
    const UNION_TYPE_DEFINITION: &[SlotSpec] = &[
        single("description"),
        required_single("name"),
        sequence("directives"),
        sequence("types"),
    ];
    const ENUM_TYPE_DEFINITION: &[SlotSpec] = &[
        single("description"),
        required_single("name"),
        sequence("directives"),
        sequence("values"),
    ];
    const ENUM_VALUE_DEFINITION: &[SlotSpec] = &[
        single("description"),
        required_single("name"),
        sequence("directives"),
    ];
    const INPUT_OBJECT_TYPE_DEFINITION: &[SlotSpec] = &[
        single("description"),
        required_single("name"),
        sequence("directives"),
        sequence("fields"),
    ];
    const DIRECTIVE_DEFINITION: &[SlotSpec] = &[
        single("description"),
        required_single("name"),
        sequence("arguments"),
        scalar("repeatable"),
        sequence("locations"),
    ];

    match kind {
        NodeKind::Name => NAME,
        NodeKind::Document => DOCUMENT,
        NodeKind::OperationDefinition => OPERATION_DEFINITION,
        NodeKind::VariableDefinition => VARIABLE_DEFINITION,
        NodeKind::Variable => VARIABLE,
        NodeKind::SelectionSet => SELECTION_SET,
        NodeKind::Field => FIELD,
        NodeKind::Argument => ARGUMENT,
        NodeKind::FragmentSpread => FRAGMENT_SPREAD,
        NodeKind::InlineFragment => INLINE_FRAGMENT,
        NodeKind::FragmentDefinition => FRAGMENT_DEFINITION,
        NodeKind::IntValue => INT_VALUE,
        NodeKind::FloatValue => FLOAT_VALUE,
        NodeKind::StringValue => STRING_VALUE,
        NodeKind::BooleanValue => BOOLEAN_VALUE,
        NodeKind::NullValue => NULL_VALUE,
        NodeKind::EnumValue => ENUM_VALUE,
        NodeKind::ListValue => LIST_VALUE,
        NodeKind::ObjectValue => OBJECT_VALUE,
        NodeKind::ObjectField => OBJECT_FIELD,
        NodeKind::Directive => DIRECTIVE,
        NodeKind::NamedType => NAMED_TYPE,
        NodeKind::ListType => LIST_TYPE,
        NodeKind::NonNullType => NON_NULL_TYPE,
        NodeKind::SchemaDefinition => SCHEMA_DEFINITION,
        NodeKind::OperationTypeDefinition => OPERATION_TYPE_DEFINITION,
        NodeKind::ScalarTypeDefinition => SCALAR_TYPE_DEFINITION,
        NodeKind::ObjectTypeDefinition => OBJECT_TYPE_DEFINITION,
        NodeKind::FieldDefinition => FIELD_DEFINITION,
        NodeKind::InputValueDefinition => INPUT_VALUE_DEFINITION,
        NodeKind::InterfaceTypeDefinition => INTERFACE_TYPE_DEFINITION,
        NodeKind::UnionTypeDefinition => UNION_TYPE_DEFINITION,
        NodeKind::EnumTypeDefinition => ENUM_TYPE_DEFINITION,
        NodeKind::EnumValueDefinition => ENUM_VALUE_DEFINITION,
        NodeKind::InputObjectTypeDefinition => INPUT_OBJECT_TYPE_DEFINITION,
        NodeKind::DirectiveDefinition => DIRECTIVE_DEFINITION,
    }
}

/// Looks up one slot's spec by name within `kind`'s layout.
pub fn slot_spec(kind: NodeKind, name: &str) -> Option<&'static SlotSpec> {
    slot_specs(kind).iter().find(|spec| spec.name == name)
}

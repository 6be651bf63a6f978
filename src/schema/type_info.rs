//! The stock schema-derived type tracker.

use crate::ast::Node;
use crate::ast::NodeKind;
use crate::schema::FieldDef;
use crate::schema::Schema;
use crate::schema::TypeDefinition;
use crate::schema::TypeRef;
use crate::visit::TypeTracker;

/// Tracks the schema type context at the current traversal position.
///
/// Driven through the [`TypeTracker`] interface by
/// [`visit_with_type_info`](crate::visit_with_type_info): each stack
/// mirrors one dimension of context and pushes/pops in lock-step with
/// enter/leave of the node kinds that change it. A stack entry is
/// `None` when the document names something the schema does not
/// define — lookups simply come back empty rather than failing, since
/// validation is not this tracker's job.
pub struct TypeInfo {
    schema: Schema,
    /// Output type of the field/operation/fragment being traversed.
    type_stack: Vec<Option<TypeRef>>,
    /// Named type each selection set selects against.
    parent_type_stack: Vec<Option<String>>,
    /// Expected input type at the current value position.
    input_type_stack: Vec<Option<TypeRef>>,
    /// Definition of the field being traversed.
    field_def_stack: Vec<Option<FieldDef>>,
}

impl TypeInfo {
    pub fn new(schema: Schema) -> Self {
        Self {
            schema,
            type_stack: Vec::new(),
            parent_type_stack: Vec::new(),
            input_type_stack: Vec::new(),
            field_def_stack: Vec::new(),
        }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// The output type at the current position (e.g. the declared
    /// type of the field being traversed).
    pub fn get_type(&self) -> Option<&TypeRef> {
        self.type_stack.last().and_then(Option::as_ref)
    }

    /// The named type the current selection set selects against.
    pub fn get_parent_type(&self) -> Option<&str> {
        self.parent_type_stack
            .last()
            .and_then(Option::as_deref)
    }

    /// The expected input type at the current value position.
    pub fn get_input_type(&self) -> Option<&TypeRef> {
        self.input_type_stack.last().and_then(Option::as_ref)
    }

    /// The definition of the field being traversed.
    pub fn get_field_def(&self) -> Option<&FieldDef> {
        self.field_def_stack.last().and_then(Option::as_ref)
    }
}

impl TypeTracker for TypeInfo {
    fn enter(&mut self, node: &Node) {
        match node.kind() {
            NodeKind::SelectionSet => {
                let named = self
                    .get_type()
                    .map(|ty| ty.named_type().to_string());
                self.parent_type_stack.push(named);
            },
            NodeKind::Field => {
                let def = match (
                    self.get_parent_type(),
                    node.name_value(),
                ) {
                    (Some(parent), Some(name)) => {
                        self.schema.field_def(parent, name)
                    },
                    _ => None,
                };
                self.type_stack.push(
                    def.as_ref()
                        .map(|def| def.field_type().clone()),
                );
                self.field_def_stack.push(def);
            },
            NodeKind::OperationDefinition => {
                let root = node
                    .string_scalar("operation")
                    .and_then(|operation| {
                        self.schema.root_operation_type(operation)
                    });
                self.type_stack
                    .push(root.map(TypeRef::named));
            },
            NodeKind::InlineFragment
            | NodeKind::FragmentDefinition => {
                // An absent type condition keeps the surrounding type.
                let named = node
                    .child("typeCondition")
                    .and_then(|condition| condition.name_value())
                    .map(TypeRef::named)
                    .or_else(|| self.get_type().cloned());
                self.type_stack.push(named);
            },
            NodeKind::VariableDefinition => {
                let ty = node
                    .child("type")
                    .and_then(|annotation| {
                        TypeRef::from_node(annotation)
                    });
                self.input_type_stack.push(ty);
            },
            NodeKind::Argument => {
                let ty = match (
                    self.get_field_def(),
                    node.name_value(),
                ) {
                    (Some(def), Some(name)) => {
                        def.argument_type(name).cloned()
                    },
                    _ => None,
                };
                self.input_type_stack.push(ty);
            },
            NodeKind::ListValue => {
                let item = self
                    .get_input_type()
                    .map(TypeRef::nullable)
                    .and_then(|ty| match ty {
                        TypeRef::List(inner) => {
                            Some((**inner).clone())
                        },
                        _ => None,
                    });
                self.input_type_stack.push(item);
            },
            NodeKind::ObjectField => {
                let ty = match (
                    self.get_input_type(),
                    node.name_value(),
                ) {
                    (Some(input), Some(name)) => self
                        .schema
                        .input_field_type(
                            input.named_type(),
                            name,
                        )
                        .cloned(),
                    _ => None,
                };
                self.input_type_stack.push(ty);
            },
            _ => {},
        }
    }

    fn leave(&mut self, node: &Node) {
        match node.kind() {
            NodeKind::SelectionSet => {
                self.parent_type_stack.pop();
            },
            NodeKind::Field => {
                self.type_stack.pop();
                self.field_def_stack.pop();
            },
            NodeKind::OperationDefinition
            | NodeKind::InlineFragment
            | NodeKind::FragmentDefinition => {
                self.type_stack.pop();
            },
            NodeKind::VariableDefinition
            | NodeKind::Argument
            | NodeKind::ListValue
            | NodeKind::ObjectField => {
                self.input_type_stack.pop();
            },
            _ => {},
        }
    }
}

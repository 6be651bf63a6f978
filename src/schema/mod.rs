//! A minimal schema registry for type tracking.
//!
//! This module is a lookup structure, not a validator: it records the
//! type definitions a [`TypeInfo`] tracker needs to resolve field and
//! argument types along a traversal — root operation types, field
//! maps, the composite predicate, and the `__typename` meta-field.

mod type_info;

pub use type_info::TypeInfo;

use crate::ast::Node;
use crate::ast::NodeKind;
use indexmap::IndexMap;

/// A reference to a schema type: a name, optionally wrapped in list
/// and non-null markers.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TypeRef {
    Named(String),
    List(Box<TypeRef>),
    NonNull(Box<TypeRef>),
}

impl TypeRef {
    pub fn named(name: &str) -> Self {
        TypeRef::Named(name.to_string())
    }

    pub fn list(inner: TypeRef) -> Self {
        TypeRef::List(Box::new(inner))
    }

    pub fn non_null(inner: TypeRef) -> Self {
        TypeRef::NonNull(Box::new(inner))
    }

    /// Unwraps every list/non-null marker down to the named type.
    pub fn named_type(&self) -> &str {
        match self {
            TypeRef::Named(name) => name,
            TypeRef::List(inner) => inner.named_type(),
            TypeRef::NonNull(inner) => inner.named_type(),
        }
    }

    /// Strips one non-null marker, if present.
    pub fn nullable(&self) -> &TypeRef {
        match self {
            TypeRef::NonNull(inner) => inner,
            other => other,
        }
    }

    /// Builds a reference from a type-annotation node (`NamedType`,
    /// `ListType`, `NonNullType`).
    pub fn from_node(node: &Node) -> Option<TypeRef> {
        match node.kind() {
            NodeKind::NamedType => {
                node.name_value().map(TypeRef::named)
            },
            NodeKind::ListType => node
                .child("type")
                .and_then(|inner| TypeRef::from_node(inner))
                .map(TypeRef::list),
            NodeKind::NonNullType => node
                .child("type")
                .and_then(|inner| TypeRef::from_node(inner))
                .map(TypeRef::non_null),
            _ => None,
        }
    }
}

impl std::fmt::Display for TypeRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TypeRef::Named(name) => f.write_str(name),
            TypeRef::List(inner) => write!(f, "[{inner}]"),
            TypeRef::NonNull(inner) => write!(f, "{inner}!"),
        }
    }
}

/// A field on an object or interface type, with its argument types.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldDef {
    name: String,
    arguments: IndexMap<String, TypeRef>,
    field_type: TypeRef,
}

impl FieldDef {
    pub fn new(name: &str, field_type: TypeRef) -> Self {
        Self {
            name: name.to_string(),
            arguments: IndexMap::new(),
            field_type,
        }
    }

    /// Builder-style argument registration.
    pub fn argument(mut self, name: &str, arg_type: TypeRef) -> Self {
        self.arguments.insert(name.to_string(), arg_type);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn field_type(&self) -> &TypeRef {
        &self.field_type
    }

    pub fn argument_type(&self, name: &str) -> Option<&TypeRef> {
        self.arguments.get(name)
    }
}

/// A named type definition registered in a [`Schema`].
#[derive(Clone, Debug, PartialEq)]
pub enum TypeDefinition {
    Object {
        name: String,
        fields: IndexMap<String, FieldDef>,
    },
    Interface {
        name: String,
        fields: IndexMap<String, FieldDef>,
    },
    Union {
        name: String,
        members: Vec<String>,
    },
    Scalar {
        name: String,
    },
    Enum {
        name: String,
        values: Vec<String>,
    },
    InputObject {
        name: String,
        fields: IndexMap<String, TypeRef>,
    },
}

impl TypeDefinition {
    /// Object type constructor from a field list.
    pub fn object(
        name: &str,
        fields: impl IntoIterator<Item = FieldDef>,
    ) -> Self {
        TypeDefinition::Object {
            name: name.to_string(),
            fields: fields
                .into_iter()
                .map(|field| (field.name.clone(), field))
                .collect(),
        }
    }

    /// Interface type constructor from a field list.
    pub fn interface(
        name: &str,
        fields: impl IntoIterator<Item = FieldDef>,
    ) -> Self {
        TypeDefinition::Interface {
            name: name.to_string(),
            fields: fields
                .into_iter()
                .map(|field| (field.name.clone(), field))
                .collect(),
        }
    }

    /// Union type constructor from member type names.
    pub fn union(
        name: &str,
        members: impl IntoIterator<Item = &'static str>,
    ) -> Self {
        TypeDefinition::Union {
            name: name.to_string(),
            members: members
                .into_iter()
                .map(|member| member.to_string())
                .collect(),
        }
    }

    pub fn scalar(name: &str) -> Self {
        TypeDefinition::Scalar {
            name: name.to_string(),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            TypeDefinition::Object { name, .. } => name,
            TypeDefinition::Interface { name, .. } => name,
            TypeDefinition::Union { name, .. } => name,
            TypeDefinition::Scalar { name } => name,
            TypeDefinition::Enum { name, .. } => name,
            TypeDefinition::InputObject { name, .. } => name,
        }
    }

    /// Whether the type can carry a selection set (object, interface,
    /// or union).
    pub fn is_composite(&self) -> bool {
        matches!(
            self,
            TypeDefinition::Object { .. }
                | TypeDefinition::Interface { .. }
                | TypeDefinition::Union { .. }
        )
    }
}

/// A registry of named type definitions plus the root operation types.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Schema {
    types: IndexMap<String, TypeDefinition>,
    query_type: Option<String>,
    mutation_type: Option<String>,
    subscription_type: Option<String>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style type registration.
    pub fn with_type(mut self, definition: TypeDefinition) -> Self {
        self.types
            .insert(definition.name().to_string(), definition);
        self
    }

    /// Builder-style query root registration.
    pub fn with_query_type(mut self, name: &str) -> Self {
        self.query_type = Some(name.to_string());
        self
    }

    /// Builder-style mutation root registration.
    pub fn with_mutation_type(mut self, name: &str) -> Self {
        self.mutation_type = Some(name.to_string());
        self
    }

    /// Builder-style subscription root registration.
    pub fn with_subscription_type(mut self, name: &str) -> Self {
        self.subscription_type = Some(name.to_string());
        self
    }

    /// Looks up a type definition by name.
    pub fn type_definition(
        &self,
        name: &str,
    ) -> Option<&TypeDefinition> {
        self.types.get(name)
    }

    /// The root type name for `operation` (`query` / `mutation` /
    /// `subscription`).
    pub fn root_operation_type(
        &self,
        operation: &str,
    ) -> Option<&str> {
        let root = match operation {
            "query" => &self.query_type,
            "mutation" => &self.mutation_type,
            "subscription" => &self.subscription_type,
            _ => &None,
        };
        root.as_deref()
    }

    /// Whether `name` refers to a composite type.
    pub fn is_composite(&self, name: &str) -> bool {
        self.type_definition(name)
            .map(TypeDefinition::is_composite)
            .unwrap_or(false)
    }

    /// Resolves a field on a composite type, including the
    /// `__typename` meta-field every composite type carries.
    pub fn field_def(
        &self,
        type_name: &str,
        field_name: &str,
    ) -> Option<FieldDef> {
        let definition = self.type_definition(type_name)?;
        if field_name == "__typename" && definition.is_composite() {
            return Some(FieldDef::new(
                "__typename",
                TypeRef::non_null(TypeRef::named("String")),
            ));
        }
        match definition {
            TypeDefinition::Object { fields, .. }
            | TypeDefinition::Interface { fields, .. } => {
                fields.get(field_name).cloned()
            },
            _ => None,
        }
    }

    /// Resolves an input object's field type.
    pub fn input_field_type(
        &self,
        type_name: &str,
        field_name: &str,
    ) -> Option<&TypeRef> {
        match self.type_definition(type_name)? {
            TypeDefinition::InputObject { fields, .. } => {
                fields.get(field_name)
            },
            _ => None,
        }
    }
}

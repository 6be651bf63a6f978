/// The kind of a document [`Node`](crate::ast::Node).
///
/// A closed set covering executable documents (operations, fragments,
/// selections, values) and type-system definitions. The kind is
/// exposed as a string tag via [`as_str`](NodeKind::as_str); the
/// reverse lookup is [`from_str`](NodeKind::from_str).
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum NodeKind {
    // =========================================================================
    // Executable documents
    // =========================================================================
    Argument,
    Directive,
    Document,
    Field,
    FragmentDefinition,
    FragmentSpread,
    InlineFragment,
    Name,
    OperationDefinition,
    SelectionSet,
    Variable,
    VariableDefinition,

    // =========================================================================
    // Values
    // =========================================================================
    BooleanValue,
    EnumValue,
    FloatValue,
    IntValue,
    ListValue,
    NullValue,
    ObjectField,
    ObjectValue,
    StringValue,

    // =========================================================================
    // Type references
    // =========================================================================
    ListType,
    NamedType,
    NonNullType,

    // =========================================================================
    // Type-system definitions
    // =========================================================================
    DirectiveDefinition,
    EnumTypeDefinition,
    EnumValueDefinition,
    FieldDefinition,
    InputObjectTypeDefinition,
    InputValueDefinition,
    InterfaceTypeDefinition,
    ObjectTypeDefinition,
    OperationTypeDefinition,
    ScalarTypeDefinition,
    SchemaDefinition,
    UnionTypeDefinition,
}

impl NodeKind {
    /// Returns the kind's string tag (e.g. `"Field"`, `"Name"`).
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Argument => "Argument",
            NodeKind::Directive => "Directive",
            NodeKind::Document => "Document",
            NodeKind::Field => "Field",
            NodeKind::FragmentDefinition => "FragmentDefinition",
            NodeKind::FragmentSpread => "FragmentSpread",
            NodeKind::InlineFragment => "InlineFragment",
            NodeKind::Name => "Name",
            NodeKind::OperationDefinition => "OperationDefinition",
            NodeKind::SelectionSet => "SelectionSet",
            NodeKind::Variable => "Variable",
            NodeKind::VariableDefinition => "VariableDefinition",
            NodeKind::BooleanValue => "BooleanValue",
            NodeKind::EnumValue => "EnumValue",
            NodeKind::FloatValue => "FloatValue",
            NodeKind::IntValue => "IntValue",
            NodeKind::ListValue => "ListValue",
            NodeKind::NullValue => "NullValue",
            NodeKind::ObjectField => "ObjectField",
            NodeKind::ObjectValue => "ObjectValue",
            NodeKind::StringValue => "StringValue",
            NodeKind::ListType => "ListType",
            NodeKind::NamedType => "NamedType",
            NodeKind::NonNullType => "NonNullType",
            NodeKind::DirectiveDefinition => "DirectiveDefinition",
            NodeKind::EnumTypeDefinition => "EnumTypeDefinition",
            NodeKind::EnumValueDefinition => "EnumValueDefinition",
            NodeKind::FieldDefinition => "FieldDefinition",
            NodeKind::InputObjectTypeDefinition => {
                "InputObjectTypeDefinition"
            },
            NodeKind::InputValueDefinition => "InputValueDefinition",
            NodeKind::InterfaceTypeDefinition => {
                "InterfaceTypeDefinition"
            },
            NodeKind::ObjectTypeDefinition => "ObjectTypeDefinition",
            NodeKind::OperationTypeDefinition => {
                "OperationTypeDefinition"
            },
            NodeKind::ScalarTypeDefinition => "ScalarTypeDefinition",
            NodeKind::SchemaDefinition => "SchemaDefinition",
            NodeKind::UnionTypeDefinition => "UnionTypeDefinition",
        }
    }

    /// Looks up a kind from its string tag. Returns `None` for tags
    /// outside the closed set.
    pub fn from_str(tag: &str) -> Option<Self> {
        let kind = match tag {
            "Argument" => NodeKind::Argument,
            "Directive" => NodeKind::Directive,
            "Document" => NodeKind::Document,
            "Field" => NodeKind::Field,
            "FragmentDefinition" => NodeKind::FragmentDefinition,
            "FragmentSpread" => NodeKind::FragmentSpread,
            "InlineFragment" => NodeKind::InlineFragment,
            "Name" => NodeKind::Name,
            "OperationDefinition" => NodeKind::OperationDefinition,
            "SelectionSet" => NodeKind::SelectionSet,
            "Variable" => NodeKind::Variable,
            "VariableDefinition" => NodeKind::VariableDefinition,
            "BooleanValue" => NodeKind::BooleanValue,
            "EnumValue" => NodeKind::EnumValue,
            "FloatValue" => NodeKind::FloatValue,
            "IntValue" => NodeKind::IntValue,
            "ListValue" => NodeKind::ListValue,
            "NullValue" => NodeKind::NullValue,
            "ObjectField" => NodeKind::ObjectField,
            "ObjectValue" => NodeKind::ObjectValue,
            "StringValue" => NodeKind::StringValue,
            "ListType" => NodeKind::ListType,
            "NamedType" => NodeKind::NamedType,
            "NonNullType" => NodeKind::NonNullType,
            "DirectiveDefinition" => NodeKind::DirectiveDefinition,
            "EnumTypeDefinition" => NodeKind::EnumTypeDefinition,
            "EnumValueDefinition" => NodeKind::EnumValueDefinition,
            "FieldDefinition" => NodeKind::FieldDefinition,
            "InputObjectTypeDefinition" => {
                NodeKind::InputObjectTypeDefinition
            },
            "InputValueDefinition" => NodeKind::InputValueDefinition,
            "InterfaceTypeDefinition" => {
                NodeKind::InterfaceTypeDefinition
            },
            "ObjectTypeDefinition" => NodeKind::ObjectTypeDefinition,
            "OperationTypeDefinition" => {
                NodeKind::OperationTypeDefinition
            },
            "ScalarTypeDefinition" => NodeKind::ScalarTypeDefinition,
            "SchemaDefinition" => NodeKind::SchemaDefinition,
            "UnionTypeDefinition" => NodeKind::UnionTypeDefinition,
            _ => return None,
        };
        Some(kind)
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

use crate::ast::NodeKind;
use crate::GraphQLSourceSpan;
use indexmap::IndexMap;
use std::rc::Rc;

/// A leaf scalar stored in a node slot.
#[derive(Clone, Debug, PartialEq)]
pub enum ScalarValue {
    Boolean(bool),
    Float(f64),
    Int(i32),
    String(String),
}

impl From<bool> for ScalarValue {
    fn from(value: bool) -> Self {
        ScalarValue::Boolean(value)
    }
}
impl From<f64> for ScalarValue {
    fn from(value: f64) -> Self {
        ScalarValue::Float(value)
    }
}
impl From<i32> for ScalarValue {
    fn from(value: i32) -> Self {
        ScalarValue::Int(value)
    }
}
impl From<String> for ScalarValue {
    fn from(value: String) -> Self {
        ScalarValue::String(value)
    }
}
impl From<&str> for ScalarValue {
    fn from(value: &str) -> Self {
        ScalarValue::String(value.to_string())
    }
}

/// The value held by one slot of a [`Node`].
#[derive(Clone, Debug, PartialEq)]
pub enum SlotValue {
    /// A single child node.
    Node(Rc<Node>),
    /// An ordered sequence of child nodes.
    List(Vec<Rc<Node>>),
    /// A leaf scalar; not traversed.
    Scalar(ScalarValue),
}

impl From<Rc<Node>> for SlotValue {
    fn from(value: Rc<Node>) -> Self {
        SlotValue::Node(value)
    }
}
impl From<Node> for SlotValue {
    fn from(value: Node) -> Self {
        SlotValue::Node(Rc::new(value))
    }
}
impl From<Vec<Rc<Node>>> for SlotValue {
    fn from(value: Vec<Rc<Node>>) -> Self {
        SlotValue::List(value)
    }
}
impl From<ScalarValue> for SlotValue {
    fn from(value: ScalarValue) -> Self {
        SlotValue::Scalar(value)
    }
}
impl From<bool> for SlotValue {
    fn from(value: bool) -> Self {
        SlotValue::Scalar(value.into())
    }
}
impl From<f64> for SlotValue {
    fn from(value: f64) -> Self {
        SlotValue::Scalar(value.into())
    }
}
impl From<i32> for SlotValue {
    fn from(value: i32) -> Self {
        SlotValue::Scalar(value.into())
    }
}
impl From<String> for SlotValue {
    fn from(value: String) -> Self {
        SlotValue::Scalar(value.into())
    }
}
impl From<&str> for SlotValue {
    fn from(value: &str) -> Self {
        SlotValue::Scalar(value.into())
    }
}

/// A node in a GraphQL document tree.
///
/// A node is a [`NodeKind`] discriminator plus a sparse map of named
/// slots; unset slots are absent. The slot layout for each kind lives
/// in the [`registry`](crate::ast::registry) — construction does not
/// validate against it (the traversal engine does, failing with a
/// structured error identifying the malformed node's path).
///
/// Nodes are immutable once built: the "mutating" operations
/// ([`with_slot`](Node::with_slot), [`without_slot`](Node::without_slot))
/// return a new node sharing all untouched children with the original.
///
/// An optional source span (`loc`) may be attached by the parser; it
/// is carried through edits and ignored by the traversal engine.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    kind: NodeKind,
    slots: IndexMap<&'static str, SlotValue>,
    loc: Option<GraphQLSourceSpan>,
}

impl Node {
    /// Creates a node of `kind` with every slot absent.
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            slots: IndexMap::new(),
            loc: None,
        }
    }

    /// Returns the node's kind.
    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// Returns the node's kind as its string tag.
    pub fn kind_str(&self) -> &'static str {
        self.kind.as_str()
    }

    /// Returns the node's source span, if the parser attached one.
    pub fn loc(&self) -> Option<&GraphQLSourceSpan> {
        self.loc.as_ref()
    }

    // =========================================================================
    // Slot access
    // =========================================================================

    /// Returns the raw value of `slot`, if set.
    pub fn slot(&self, slot: &str) -> Option<&SlotValue> {
        self.slots.get(slot)
    }

    /// Returns the single child node in `slot`, if the slot is set and
    /// holds one.
    pub fn child(&self, slot: &str) -> Option<&Rc<Node>> {
        match self.slots.get(slot) {
            Some(SlotValue::Node(child)) => Some(child),
            _ => None,
        }
    }

    /// Returns the child sequence in `slot`, if the slot is set and
    /// holds one.
    pub fn children(&self, slot: &str) -> Option<&[Rc<Node>]> {
        match self.slots.get(slot) {
            Some(SlotValue::List(children)) => Some(children),
            _ => None,
        }
    }

    /// Returns the scalar in `slot`, if the slot is set and holds one.
    pub fn scalar(&self, slot: &str) -> Option<&ScalarValue> {
        match self.slots.get(slot) {
            Some(SlotValue::Scalar(scalar)) => Some(scalar),
            _ => None,
        }
    }

    /// Returns the string scalar in `slot`, if set.
    pub fn string_scalar(&self, slot: &str) -> Option<&str> {
        match self.scalar(slot) {
            Some(ScalarValue::String(value)) => Some(value),
            _ => None,
        }
    }

    /// For nodes that carry a `name` child (`Field`, `Argument`,
    /// `Directive`, `NamedType`, …), the string value of that name.
    pub fn name_value(&self) -> Option<&str> {
        self.child("name")
            .and_then(|name| name.string_scalar("value"))
    }

    // =========================================================================
    // Construction & copy-on-write
    // =========================================================================

    /// Builder-style setter; consumes the node under construction.
    pub fn set(
        mut self,
        slot: &'static str,
        value: impl Into<SlotValue>,
    ) -> Self {
        self.slots.insert(slot, value.into());
        self
    }

    /// Builder-style span attachment.
    pub fn at(mut self, loc: GraphQLSourceSpan) -> Self {
        self.loc = Some(loc);
        self
    }

    /// Returns a copy of this node with `slot` set to `value`. Every
    /// other slot (and the source span) is shared with the original.
    pub fn with_slot(
        &self,
        slot: &'static str,
        value: impl Into<SlotValue>,
    ) -> Self {
        let mut copy = self.clone();
        copy.slots.insert(slot, value.into());
        copy
    }

    /// Returns a copy of this node with `slot` absent.
    pub fn without_slot(&self, slot: &str) -> Self {
        let mut copy = self.clone();
        copy.slots.shift_remove(slot);
        copy
    }

    /// In-place slot write for the edit materializer, which builds a
    /// fresh node and substitutes every edited slot before the node is
    /// shared.
    pub(crate) fn insert_slot(
        &mut self,
        slot: &'static str,
        value: SlotValue,
    ) {
        self.slots.insert(slot, value);
    }

    /// In-place slot removal for the edit materializer.
    pub(crate) fn remove_slot(&mut self, slot: &str) {
        self.slots.shift_remove(slot);
    }

    /// Recursively copies this subtree into fresh allocations.
    ///
    /// Ordinary edits never need this — [`with_slot`](Node::with_slot)
    /// shares children. Deep cloning is for visitors that must preserve
    /// the identity of a substructure across edits.
    pub fn clone_deep(&self) -> Self {
        let slots = self
            .slots
            .iter()
            .map(|(name, value)| {
                let value = match value {
                    SlotValue::Node(child) => {
                        SlotValue::Node(Rc::new(child.clone_deep()))
                    },
                    SlotValue::List(children) => SlotValue::List(
                        children
                            .iter()
                            .map(|child| Rc::new(child.clone_deep()))
                            .collect(),
                    ),
                    SlotValue::Scalar(scalar) => {
                        SlotValue::Scalar(scalar.clone())
                    },
                };
                (*name, value)
            })
            .collect();
        Self {
            kind: self.kind,
            slots,
            loc: self.loc,
        }
    }

    // =========================================================================
    // Convenience constructors
    // =========================================================================

    /// A `Name` node with the given string value.
    pub fn name(value: &str) -> Self {
        Node::new(NodeKind::Name).set("value", value)
    }
}

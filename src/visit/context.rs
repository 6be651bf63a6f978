use crate::ast::Node;
use std::fmt::Write as _;
use std::rc::Rc;

/// The position of a child within its parent: the parent's slot name
/// for single-child slots, or an index into a sequence slot.
///
/// Paths through a sequence slot carry two keys — the slot name, then
/// the index — so resolving a path against a tree only ever steps
/// through one key at a time.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Key {
    Slot(&'static str),
    Index(usize),
}

impl std::fmt::Display for Key {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Key::Slot(name) => f.write_str(name),
            Key::Index(index) => write!(f, "{index}"),
        }
    }
}

/// Formats a path as dotted keys, e.g. `definitions.0.selectionSet`.
pub fn fmt_path(path: &[Key]) -> String {
    let mut out = String::new();
    for (i, key) in path.iter().enumerate() {
        if i > 0 {
            out.push('.');
        }
        let _ = write!(out, "{key}");
    }
    out
}

/// One level of the ancestor chain above the current node.
///
/// For a child reached through a single-child slot the level is the
/// parent [`Node`]; for a child inside a sequence slot the level
/// nearest the child is the in-progress sequence snapshot the engine
/// is iterating. Each level reflects the tree as the callback sees
/// it: the source tree for unedited frames, the replacement for
/// frames replaced at enter.
#[derive(Clone, Debug)]
pub enum Ancestor {
    Node(Rc<Node>),
    Sequence(Vec<Rc<Node>>),
}

impl Ancestor {
    /// The node at this level, when the level is a node.
    pub fn as_node(&self) -> Option<&Rc<Node>> {
        match self {
            Ancestor::Node(node) => Some(node),
            Ancestor::Sequence(_) => None,
        }
    }

    /// The sequence snapshot at this level, when the level is a
    /// sequence.
    pub fn as_sequence(&self) -> Option<&[Rc<Node>]> {
        match self {
            Ancestor::Node(_) => None,
            Ancestor::Sequence(children) => Some(children),
        }
    }
}

/// The traversal position handed to every visitor callback, bundling
/// the key, parent, path, and ancestors of the current node.
///
/// Invariants (upheld by construction — `key`, `parent`, and
/// `ancestors` are all views over one path/chain pair):
///
/// - `key()` equals the last path element;
/// - `ancestors().len() == path().len() - 1` for non-root events;
/// - resolving `path()` against the root as the callback sees it
///   yields the callback's node.
pub struct VisitContext<'a> {
    path: &'a [Key],
    /// Every ancestor level from the root down to and including the
    /// current node's parent.
    chain: &'a [Ancestor],
}

impl<'a> VisitContext<'a> {
    pub(crate) fn new(path: &'a [Key], chain: &'a [Ancestor]) -> Self {
        debug_assert_eq!(path.len(), chain.len());
        Self { path, chain }
    }

    /// The current node's position in its parent; absent for the root.
    pub fn key(&self) -> Option<Key> {
        self.path.last().copied()
    }

    /// The immediate parent level — the parent node, or the sequence
    /// the current node sits in; absent for the root.
    pub fn parent(&self) -> Option<&Ancestor> {
        self.chain.last()
    }

    /// The keys from the document root to the current node.
    pub fn path(&self) -> &[Key] {
        self.path
    }

    /// The ancestor levels from the root down to — but excluding —
    /// the current node's parent (the parent is [`parent`]).
    ///
    /// [`parent`]: VisitContext::parent
    pub fn ancestors(&self) -> &[Ancestor] {
        match self.chain.len() {
            0 => &[],
            len => &self.chain[..len - 1],
        }
    }
}

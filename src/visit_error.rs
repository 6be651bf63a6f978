use crate::ast::NodeKind;
use crate::ast::SlotKind;

/// A fatal traversal error.
///
/// Fatal errors abort the traversal immediately with no edits applied.
/// ([`VisitControl::Stop`](crate::VisitControl::Stop) is not an error —
/// it returns the input tree normally.)
///
/// The only representable malformed-node shapes are a missing
/// grammar-mandated slot and a slot whose stored value disagrees with
/// the registry's layout; unknown kinds and unrecognized callback
/// returns cannot be constructed against this crate's typed API. Each
/// error carries the formatted path of the malformed node.
#[derive(Clone, Debug, thiserror::Error)]
pub enum VisitError {
    /// A node is missing a slot its kind's grammar mandates.
    #[error(
        "malformed {kind} node at `{path}`: required slot `{slot}` is absent"
    )]
    MissingSlot {
        kind: NodeKind,
        slot: &'static str,
        /// Dotted path from the root to the malformed node.
        path: String,
    },

    /// A slot holds a value of a different shape than the registry
    /// records for it (e.g. a sequence where a single child belongs).
    #[error(
        "malformed {kind} node at `{path}`: slot `{slot}` should hold a {expected:?} value"
    )]
    SlotKindMismatch {
        kind: NodeKind,
        slot: &'static str,
        expected: SlotKind,
        /// Dotted path from the root to the malformed node.
        path: String,
    },
}

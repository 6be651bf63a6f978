//! The traversal driver.
//!
//! One [`visit`] call performs one complete depth-first traversal:
//! enter the node, recurse over its children in registry slot order,
//! leave the node. Edits returned by callbacks are buffered in the
//! parent frame and materialized copy-on-write when the frame
//! completes, so an unedited subtree passes through by identity and
//! the input tree is never touched.

use crate::ast::registry;
use crate::ast::Node;
use crate::ast::SlotKind;
use crate::ast::SlotValue;
use crate::visit::fmt_path;
use crate::visit::Ancestor;
use crate::visit::Key;
use crate::visit::Visit;
use crate::visit::VisitContext;
use crate::visit::VisitControl;
use crate::VisitError;
use indexmap::IndexMap;
use std::rc::Rc;

/// What one frame of the walk produced for its position in the parent.
enum Walked {
    /// The node passes through by identity.
    Unchanged,
    /// A new node takes this position.
    Replaced(Rc<Node>),
    /// This position is tombstoned.
    Deleted,
    /// The traversal is aborting; discard buffered edits on the way
    /// out.
    Stopped,
}

/// A sparse overlay of edits against one node's slots, keyed by slot
/// name and (for sequences) original index. `None` entries are
/// tombstones.
#[derive(Default)]
struct EditBuffer {
    slots: IndexMap<&'static str, SlotEdit>,
}

enum SlotEdit {
    Single(Option<Rc<Node>>),
    Sequence(IndexMap<usize, Option<Rc<Node>>>),
}

impl EditBuffer {
    fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    fn set_single(
        &mut self,
        slot: &'static str,
        value: Option<Rc<Node>>,
    ) {
        self.slots.insert(slot, SlotEdit::Single(value));
    }

    fn set_index(
        &mut self,
        slot: &'static str,
        index: usize,
        value: Option<Rc<Node>>,
    ) {
        let entries = match self
            .slots
            .entry(slot)
            .or_insert_with(|| SlotEdit::Sequence(IndexMap::new()))
        {
            SlotEdit::Sequence(entries) => entries,
            SlotEdit::Single(_) => {
                unreachable!("slot edit shape never changes mid-frame")
            },
        };
        entries.insert(index, value);
    }

    /// Materializes a new node: every unedited slot is shared with
    /// `current`; edited sequence slots are rebuilt by original index,
    /// compacting tombstones.
    fn apply(self, current: &Node) -> Node {
        let mut out = current.clone();
        for (slot, edit) in self.slots {
            match edit {
                SlotEdit::Single(Some(replacement)) => {
                    out.insert_slot(slot, SlotValue::Node(replacement));
                },
                SlotEdit::Single(None) => {
                    out.remove_slot(slot);
                },
                SlotEdit::Sequence(entries) => {
                    let original =
                        current.children(slot).unwrap_or(&[]);
                    let mut rebuilt =
                        Vec::with_capacity(original.len());
                    for (index, child) in original.iter().enumerate() {
                        match entries.get(&index) {
                            Some(Some(replacement)) => {
                                rebuilt.push(Rc::clone(replacement));
                            },
                            Some(None) => {},
                            None => rebuilt.push(Rc::clone(child)),
                        }
                    }
                    out.insert_slot(slot, SlotValue::List(rebuilt));
                },
            }
        }
        out
    }
}

/// Performs one depth-first traversal of `root`, dispatching events to
/// `visitor` and returning the (possibly edited) root.
///
/// The input tree is never mutated: edits produce a new tree sharing
/// every unchanged subtree with `root`. When no callback edits
/// anything, the returned root is `root` itself.
///
/// Returns `Ok(None)` in exactly one case: a callback deleted the root
/// node. A [`VisitControl::Stop`] from any callback aborts the
/// traversal and returns the input root with all buffered edits
/// discarded.
///
/// The engine holds no state outside this call frame, so callbacks may
/// re-entrantly invoke `visit` on disjoint subtrees.
pub fn visit<V: Visit + ?Sized>(
    root: &Rc<Node>,
    visitor: &mut V,
) -> Result<Option<Rc<Node>>, VisitError> {
    let mut path: Vec<Key> = Vec::new();
    let mut chain: Vec<Ancestor> = Vec::new();
    match walk(root, visitor, &mut path, &mut chain)? {
        Walked::Unchanged => Ok(Some(Rc::clone(root))),
        Walked::Replaced(edited) => Ok(Some(edited)),
        Walked::Deleted => Ok(None),
        Walked::Stopped => Ok(Some(Rc::clone(root))),
    }
}

/// One frame: enter `node`, recurse over children, leave.
///
/// `path` and `chain` always satisfy `path.len() == chain.len()`; the
/// context handed to callbacks derives key/parent/ancestors from them.
fn walk<V: Visit + ?Sized>(
    node: &Rc<Node>,
    visitor: &mut V,
    path: &mut Vec<Key>,
    chain: &mut Vec<Ancestor>,
) -> Result<Walked, VisitError> {
    let control = visitor
        .enter(node, &VisitContext::new(path.as_slice(), chain.as_slice()));
    let (current, replaced_at_enter) = match control {
        VisitControl::Continue => (Rc::clone(node), false),
        VisitControl::Skip => return Ok(Walked::Unchanged),
        VisitControl::Stop => return Ok(Walked::Stopped),
        VisitControl::Delete => return Ok(Walked::Deleted),
        // Recursion descends into the replacement, not the original.
        VisitControl::Replace(replacement) => (replacement, true),
    };

    let mut edits = EditBuffer::default();
    for spec in registry::slot_specs(current.kind()) {
        let value = current.slot(spec.name);
        if spec.required && value.is_none() {
            return Err(VisitError::MissingSlot {
                kind: current.kind(),
                slot: spec.name,
                path: fmt_path(path),
            });
        }
        match spec.kind {
            SlotKind::Scalar => {
                if let Some(value) = value {
                    if !matches!(value, SlotValue::Scalar(_)) {
                        return Err(slot_mismatch(&current, spec, path));
                    }
                }
            },
            SlotKind::Single => {
                let child = match value {
                    None => continue,
                    Some(SlotValue::Node(child)) => Rc::clone(child),
                    Some(_) => {
                        return Err(slot_mismatch(&current, spec, path));
                    },
                };
                path.push(Key::Slot(spec.name));
                chain.push(Ancestor::Node(Rc::clone(&current)));
                let walked = walk(&child, visitor, path, chain)?;
                path.pop();
                chain.pop();
                match walked {
                    Walked::Unchanged => {},
                    Walked::Replaced(replacement) => {
                        edits.set_single(spec.name, Some(replacement));
                    },
                    Walked::Deleted => {
                        edits.set_single(spec.name, None);
                    },
                    Walked::Stopped => return Ok(Walked::Stopped),
                }
            },
            SlotKind::Sequence => {
                let children: Vec<Rc<Node>> = match value {
                    None => continue,
                    Some(SlotValue::List(children)) => children.clone(),
                    Some(_) => {
                        return Err(slot_mismatch(&current, spec, path));
                    },
                };
                path.push(Key::Slot(spec.name));
                chain.push(Ancestor::Node(Rc::clone(&current)));
                chain.push(Ancestor::Sequence(children.clone()));
                let mut stopped = false;
                // Deletions do not renumber later siblings: every child
                // is visited at its original index and the sequence
                // compacts at materialization.
                for (index, child) in children.iter().enumerate() {
                    path.push(Key::Index(index));
                    let walked = walk(child, visitor, path, chain)?;
                    path.pop();
                    match walked {
                        Walked::Unchanged => {},
                        Walked::Replaced(replacement) => {
                            edits.set_index(
                                spec.name,
                                index,
                                Some(replacement),
                            );
                        },
                        Walked::Deleted => {
                            edits.set_index(spec.name, index, None);
                        },
                        Walked::Stopped => {
                            stopped = true;
                            break;
                        },
                    }
                }
                chain.pop();
                chain.pop();
                path.pop();
                if stopped {
                    return Ok(Walked::Stopped);
                }
            },
        }
    }

    let had_edits = !edits.is_empty();
    let finished = if had_edits {
        Rc::new(edits.apply(&current))
    } else {
        current
    };

    let control = visitor.leave(
        &finished,
        &VisitContext::new(path.as_slice(), chain.as_slice()),
    );
    match control {
        // Skip at leave has no effect.
        VisitControl::Continue | VisitControl::Skip => {
            if replaced_at_enter || had_edits {
                Ok(Walked::Replaced(finished))
            } else {
                Ok(Walked::Unchanged)
            }
        },
        VisitControl::Stop => Ok(Walked::Stopped),
        VisitControl::Delete => Ok(Walked::Deleted),
        VisitControl::Replace(replacement) => {
            Ok(Walked::Replaced(replacement))
        },
    }
}

fn slot_mismatch(
    node: &Node,
    spec: &registry::SlotSpec,
    path: &[Key],
) -> VisitError {
    VisitError::SlotKindMismatch {
        kind: node.kind(),
        slot: spec.name,
        expected: spec.kind,
        path: fmt_path(path),
    }
}

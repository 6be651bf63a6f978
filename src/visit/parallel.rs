//! Lock-step multiplexing of several visitors over one traversal.

use crate::ast::Node;
use crate::visit::Visit;
use crate::visit::VisitContext;
use crate::visit::VisitControl;
use std::rc::Rc;

/// Per-sub-visitor traversal state.
///
/// `SuspendedAt(depth)` records the path depth of the node the
/// sub-visitor skipped; every deeper event is suppressed. The normal
/// resume point is the skipped node's own leave (an event at exactly
/// that depth). An event at a shallower depth also resumes — that
/// happens when another sub-visitor deleted the skipped node at the
/// same enter event, so its leave never fires.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum SubVisitorState {
    Active,
    SuspendedAt(usize),
    Stopped,
}

struct SubVisitor {
    visitor: Box<dyn Visit>,
    state: SubVisitorState,
}

/// A visitor that advances several sub-visitors in lock-step over one
/// traversal, preserving each one's independent skip/stop state.
///
/// Built with [`visit_in_parallel`].
///
/// - A `Skip` from one sub-visitor suspends only that sub-visitor for
///   the skipped subtree (it sees neither the descendants nor the
///   skipped node's leave); the others keep walking.
/// - A `Stop` permanently retires that sub-visitor; the combined
///   command is `Stop` only once every sub-visitor has stopped.
/// - `Delete`/`Replace` are merged first-wins in registration order;
///   the winning command goes upstream and the remaining sub-visitors
///   are not invoked for that event.
pub struct ParallelVisitor {
    visitors: Vec<SubVisitor>,
}

/// Wraps `visitors` into a single visitor advancing all of them over
/// one traversal. Sub-visitors are invoked in registration order at
/// every event.
pub fn visit_in_parallel(
    visitors: Vec<Box<dyn Visit>>,
) -> ParallelVisitor {
    ParallelVisitor {
        visitors: visitors
            .into_iter()
            .map(|visitor| SubVisitor {
                visitor,
                state: SubVisitorState::Active,
            })
            .collect(),
    }
}

impl ParallelVisitor {
    fn all_stopped(&self) -> bool {
        self.visitors
            .iter()
            .all(|sub| sub.state == SubVisitorState::Stopped)
    }
}

impl Visit for ParallelVisitor {
    fn enter(
        &mut self,
        node: &Rc<Node>,
        cx: &VisitContext<'_>,
    ) -> VisitControl {
        let depth = cx.path().len();
        for i in 0..self.visitors.len() {
            match self.visitors[i].state {
                SubVisitorState::Stopped => continue,
                SubVisitorState::SuspendedAt(suspended) => {
                    if depth > suspended {
                        continue;
                    }
                    self.visitors[i].state = SubVisitorState::Active;
                },
                SubVisitorState::Active => {},
            }
            match self.visitors[i].visitor.enter(node, cx) {
                VisitControl::Continue => {},
                VisitControl::Skip => {
                    self.visitors[i].state =
                        SubVisitorState::SuspendedAt(depth);
                },
                VisitControl::Stop => {
                    self.visitors[i].state = SubVisitorState::Stopped;
                    if self.all_stopped() {
                        return VisitControl::Stop;
                    }
                },
                VisitControl::Delete => return VisitControl::Delete,
                VisitControl::Replace(replacement) => {
                    return VisitControl::Replace(replacement);
                },
            }
        }
        VisitControl::Continue
    }

    fn leave(
        &mut self,
        node: &Rc<Node>,
        cx: &VisitContext<'_>,
    ) -> VisitControl {
        let depth = cx.path().len();
        for i in 0..self.visitors.len() {
            match self.visitors[i].state {
                SubVisitorState::Stopped => continue,
                SubVisitorState::SuspendedAt(suspended) => {
                    if depth > suspended {
                        continue;
                    }
                    self.visitors[i].state = SubVisitorState::Active;
                    // This leave is the skipped node's own: the
                    // sub-visitor resumes without seeing it.
                    if depth == suspended {
                        continue;
                    }
                },
                SubVisitorState::Active => {},
            }
            match self.visitors[i].visitor.leave(node, cx) {
                VisitControl::Continue | VisitControl::Skip => {},
                VisitControl::Stop => {
                    self.visitors[i].state = SubVisitorState::Stopped;
                    if self.all_stopped() {
                        return VisitControl::Stop;
                    }
                },
                VisitControl::Delete => return VisitControl::Delete,
                VisitControl::Replace(replacement) => {
                    return VisitControl::Replace(replacement);
                },
            }
        }
        VisitControl::Continue
    }
}

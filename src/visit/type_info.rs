//! Keeping a schema-derived type context synchronized with traversal.

use crate::ast::Node;
use crate::visit::Visit;
use crate::visit::VisitContext;
use crate::visit::VisitControl;
use std::cell::RefCell;
use std::rc::Rc;

/// A stack-like object mirroring schema context along the traversal.
///
/// The engine consumes this interface; [`schema::TypeInfo`] is the
/// stock implementation. A tracker's `enter`/`leave` calls are kept
/// balanced by [`TypeInfoVisitor`] across skips, deletions, and
/// replacements; an imbalance introduced by the tracker itself is a
/// contract violation this crate does not detect.
///
/// [`schema::TypeInfo`]: crate::schema::TypeInfo
pub trait TypeTracker {
    fn enter(&mut self, node: &Node);
    fn leave(&mut self, node: &Node);
}

/// A visitor wrapping a user visitor with a [`TypeTracker`], so every
/// user callback observes the type context as of the moment just after
/// the tracker processed the event.
///
/// Built with [`visit_with_type_info`]. The tracker is shared through
/// `Rc<RefCell<_>>`; user callbacks hold their own clone of the handle
/// and read the tracker's accessors mid-traversal.
pub struct TypeInfoVisitor<T: TypeTracker, V: Visit> {
    tracker: Rc<RefCell<T>>,
    visitor: V,
}

/// Composes `tracker` with `visitor`.
///
/// At enter: the tracker enters the node first, then the user's enter
/// callback runs. A non-`Continue` command rebalances the tracker —
/// `Skip`/`Delete` pop the node straight back off (its subtree will
/// never be walked), and `Replace` pops the original and pushes the
/// replacement so the tracker's state follows the subtree actually
/// descended. A `Stop` unwinds with no further tracker calls: the
/// traversal is ending, so the dropped balance is acceptable.
///
/// At leave: the user's leave callback runs first (still inside the
/// node's type context), then the tracker leaves the node.
pub fn visit_with_type_info<T: TypeTracker, V: Visit>(
    tracker: &Rc<RefCell<T>>,
    visitor: V,
) -> TypeInfoVisitor<T, V> {
    TypeInfoVisitor {
        tracker: Rc::clone(tracker),
        visitor,
    }
}

impl<T: TypeTracker, V: Visit> Visit for TypeInfoVisitor<T, V> {
    fn enter(
        &mut self,
        node: &Rc<Node>,
        cx: &VisitContext<'_>,
    ) -> VisitControl {
        self.tracker.borrow_mut().enter(node);
        match self.visitor.enter(node, cx) {
            VisitControl::Continue => VisitControl::Continue,
            VisitControl::Skip => {
                self.tracker.borrow_mut().leave(node);
                VisitControl::Skip
            },
            VisitControl::Stop => VisitControl::Stop,
            VisitControl::Delete => {
                self.tracker.borrow_mut().leave(node);
                VisitControl::Delete
            },
            VisitControl::Replace(replacement) => {
                let mut tracker = self.tracker.borrow_mut();
                tracker.leave(node);
                tracker.enter(&replacement);
                drop(tracker);
                VisitControl::Replace(replacement)
            },
        }
    }

    fn leave(
        &mut self,
        node: &Rc<Node>,
        cx: &VisitContext<'_>,
    ) -> VisitControl {
        let control = self.visitor.leave(node, cx);
        if !matches!(control, VisitControl::Stop) {
            self.tracker.borrow_mut().leave(node);
        }
        control
    }
}

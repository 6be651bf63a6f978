use crate::ast::Node;
use crate::ast::NodeKind;
use crate::visit::VisitContext;
use crate::visit::VisitControl;
use indexmap::IndexMap;
use std::rc::Rc;

/// The engine-facing seam for anything that can observe a traversal.
///
/// Both callbacks default to [`VisitControl::Continue`]; implement
/// whichever phases matter. The descriptor form most callers want is
/// [`Visitor`]; combinators ([`ParallelVisitor`], [`TypeInfoVisitor`])
/// implement this trait too so they compose through the same engine
/// entry point.
///
/// [`ParallelVisitor`]: crate::visit::ParallelVisitor
/// [`TypeInfoVisitor`]: crate::visit::TypeInfoVisitor
pub trait Visit {
    /// Called when `node` is reached, before its children.
    fn enter(
        &mut self,
        node: &Rc<Node>,
        cx: &VisitContext<'_>,
    ) -> VisitControl {
        let _ = (node, cx);
        VisitControl::Continue
    }

    /// Called after `node`'s children, with the node as edited by its
    /// descendants.
    fn leave(
        &mut self,
        node: &Rc<Node>,
        cx: &VisitContext<'_>,
    ) -> VisitControl {
        let _ = (node, cx);
        VisitControl::Continue
    }
}

type VisitFn =
    Box<dyn FnMut(&Rc<Node>, &VisitContext<'_>) -> VisitControl>;

#[derive(Default)]
struct KindCallbacks {
    enter: Option<VisitFn>,
    leave: Option<VisitFn>,
}

/// A visitor descriptor: callbacks keyed by node kind, with optional
/// wildcard callbacks applying to every kind.
///
/// Selection rule for an event `(kind, phase)`: a kind-specific
/// callback for that phase wins; otherwise the wildcard callback for
/// the phase, if any; otherwise the event is a no-op (`Continue`).
///
/// # Example
///
/// ```rust,ignore
/// let mut visitor = Visitor::new()
///     .on_enter(|_node, _cx| VisitControl::Continue)
///     .on_enter_kind(NodeKind::Field, |field, _cx| {
///         if field.name_value() == Some("deprecated") {
///             VisitControl::Delete
///         } else {
///             VisitControl::Continue
///         }
///     });
/// ```
#[derive(Default)]
pub struct Visitor {
    enter: Option<VisitFn>,
    leave: Option<VisitFn>,
    by_kind: IndexMap<NodeKind, KindCallbacks>,
}

impl Visitor {
    /// An empty visitor; traversal with it is the identity.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the wildcard enter callback.
    pub fn on_enter(
        mut self,
        callback: impl FnMut(&Rc<Node>, &VisitContext<'_>) -> VisitControl
            + 'static,
    ) -> Self {
        self.enter = Some(Box::new(callback));
        self
    }

    /// Sets the wildcard leave callback.
    pub fn on_leave(
        mut self,
        callback: impl FnMut(&Rc<Node>, &VisitContext<'_>) -> VisitControl
            + 'static,
    ) -> Self {
        self.leave = Some(Box::new(callback));
        self
    }

    /// Sets the enter callback for one node kind.
    pub fn on_enter_kind(
        mut self,
        kind: NodeKind,
        callback: impl FnMut(&Rc<Node>, &VisitContext<'_>) -> VisitControl
            + 'static,
    ) -> Self {
        self.by_kind.entry(kind).or_default().enter =
            Some(Box::new(callback));
        self
    }

    /// Sets the leave callback for one node kind.
    pub fn on_leave_kind(
        mut self,
        kind: NodeKind,
        callback: impl FnMut(&Rc<Node>, &VisitContext<'_>) -> VisitControl
            + 'static,
    ) -> Self {
        self.by_kind.entry(kind).or_default().leave =
            Some(Box::new(callback));
        self
    }
}

impl Visit for Visitor {
    fn enter(
        &mut self,
        node: &Rc<Node>,
        cx: &VisitContext<'_>,
    ) -> VisitControl {
        let kind_specific = self
            .by_kind
            .get_mut(&node.kind())
            .and_then(|callbacks| callbacks.enter.as_mut());
        match kind_specific.or(self.enter.as_mut()) {
            Some(callback) => callback(node, cx),
            None => VisitControl::Continue,
        }
    }

    fn leave(
        &mut self,
        node: &Rc<Node>,
        cx: &VisitContext<'_>,
    ) -> VisitControl {
        let kind_specific = self
            .by_kind
            .get_mut(&node.kind())
            .and_then(|callbacks| callbacks.leave.as_mut());
        match kind_specific.or(self.leave.as_mut()) {
            Some(callback) => callback(node, cx),
            None => VisitControl::Continue,
        }
    }
}

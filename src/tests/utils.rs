//! Various test utils.

use crate::ast::Node;
use crate::ast::NodeKind;
use crate::ast::SlotValue;
use crate::print;
use crate::visit::fmt_path;
use crate::GraphQLParser;
use crate::Key;
use crate::VisitControl;
use crate::Visitor;
use std::cell::RefCell;
use std::rc::Rc;

/// Parses a known-good test document (with locations).
pub fn parse(source: &str) -> Rc<Node> {
    GraphQLParser::new(source)
        .parse_document()
        .expect("test document parses")
}

/// Parses a known-good test document without locations.
pub fn parse_no_loc(source: &str) -> Rc<Node> {
    GraphQLParser::new(source)
        .omit_locations()
        .parse_document()
        .expect("test document parses")
}

/// Asserts that `actual` prints exactly like a pristine parse of
/// `expected_source`.
pub fn assert_prints_like(actual: &Node, expected_source: &str) {
    assert_eq!(print(actual), print(&parse(expected_source)));
}

// =============================================================================
// Event recording
// =============================================================================

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Phase {
    Enter,
    Leave,
}

/// One dispatched callback, with its path pre-formatted for easy
/// literal expectations.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RecordedEvent {
    pub phase: Phase,
    pub kind: NodeKind,
    pub path: String,
}

/// Shorthand constructor for expected events.
pub fn ev(phase: Phase, kind: NodeKind, path: &str) -> RecordedEvent {
    RecordedEvent {
        phase,
        kind,
        path: path.to_string(),
    }
}

pub type EventLog = Rc<RefCell<Vec<RecordedEvent>>>;

pub fn new_event_log() -> EventLog {
    Rc::new(RefCell::new(Vec::new()))
}

/// A visitor with wildcard enter/leave callbacks appending every
/// event to `log`.
pub fn recording_visitor(log: &EventLog) -> Visitor {
    let enter_log = Rc::clone(log);
    let leave_log = Rc::clone(log);
    Visitor::new()
        .on_enter(move |node, cx| {
            enter_log.borrow_mut().push(RecordedEvent {
                phase: Phase::Enter,
                kind: node.kind(),
                path: fmt_path(cx.path()),
            });
            VisitControl::Continue
        })
        .on_leave(move |node, cx| {
            leave_log.borrow_mut().push(RecordedEvent {
                phase: Phase::Leave,
                kind: node.kind(),
                path: fmt_path(cx.path()),
            });
            VisitControl::Continue
        })
}

/// Resolves a path against `root` the way the engine's keys address
/// the tree: slot keys step into single children or sequences,
/// index keys step into sequence elements.
pub fn resolve_path(
    root: &Rc<Node>,
    path: &[Key],
) -> Option<Rc<Node>> {
    enum Cursor {
        Node(Rc<Node>),
        Sequence(Vec<Rc<Node>>),
    }

    let mut cursor = Cursor::Node(Rc::clone(root));
    for key in path {
        cursor = match (cursor, key) {
            (Cursor::Node(node), Key::Slot(slot)) => {
                match node.slot(slot)? {
                    SlotValue::Node(child) => {
                        Cursor::Node(Rc::clone(child))
                    },
                    SlotValue::List(children) => {
                        Cursor::Sequence(children.clone())
                    },
                    SlotValue::Scalar(_) => return None,
                }
            },
            (Cursor::Sequence(children), Key::Index(index)) => {
                Cursor::Node(Rc::clone(children.get(*index)?))
            },
            _ => return None,
        };
    }
    match cursor {
        Cursor::Node(node) => Some(node),
        Cursor::Sequence(_) => None,
    }
}

//! Tests for the traversal engine's event order, flow control, and
//! error paths.

use crate::ast::Node;
use crate::ast::NodeKind;
use crate::tests::utils::ev;
use crate::tests::utils::new_event_log;
use crate::tests::utils::parse_no_loc;
use crate::tests::utils::recording_visitor;
use crate::tests::utils::resolve_path;
use crate::tests::utils::Phase;
use crate::visit::fmt_path;
use crate::visit::visit;
use crate::Key;
use crate::VisitControl;
use crate::VisitError;
use crate::Visitor;
use std::cell::RefCell;
use std::rc::Rc;

// =============================================================================
// Event order & paths
// =============================================================================

/// Verifies the exact enter/leave sequence and reported paths for the
/// minimal document `{ a }`.
#[test]
fn path_tracking_simple_document() {
    let doc = parse_no_loc("{ a }");
    let log = new_event_log();
    let mut visitor = recording_visitor(&log);
    let result = visit(&doc, &mut visitor).unwrap().unwrap();
    assert!(Rc::ptr_eq(&result, &doc));

    use NodeKind::*;
    use Phase::*;
    let field = "definitions.0.selectionSet.selections.0";
    assert_eq!(
        *log.borrow(),
        vec![
            ev(Enter, Document, ""),
            ev(Enter, OperationDefinition, "definitions.0"),
            ev(Enter, SelectionSet, "definitions.0.selectionSet"),
            ev(Enter, Field, field),
            ev(Enter, Name, &format!("{field}.name")),
            ev(Leave, Name, &format!("{field}.name")),
            ev(Leave, Field, field),
            ev(Leave, SelectionSet, "definitions.0.selectionSet"),
            ev(Leave, OperationDefinition, "definitions.0"),
            ev(Leave, Document, ""),
        ],
    );
}

/// An empty visitor returns the input root by identity.
#[test]
fn empty_visitor_is_identity() {
    let doc = parse_no_loc("{ a, b { x }, c }");
    let result =
        visit(&doc, &mut Visitor::new()).unwrap().unwrap();
    assert!(Rc::ptr_eq(&result, &doc));
}

/// At every event: the key equals the last path element, the ancestor
/// count is one less than the path length, and resolving the path
/// against the root yields the event's node.
#[test]
fn invariants_hold_at_every_event() {
    let doc = parse_no_loc(
        r#"
        query Q($v: [Int!] = [1]) {
            a
            b(x: 1, y: { p: "s", q: [true, null] }) @dir(z: RED) {
                c
            }
            ... on T { d }
            ...F
        }
        fragment F on T { e @other }
        "#,
    );

    let root = Rc::clone(&doc);
    let checked = Rc::new(RefCell::new(0usize));
    let counter = Rc::clone(&checked);
    let mut visitor = Visitor::new().on_enter(move |node, cx| {
        assert_eq!(cx.key(), cx.path().last().copied());
        if !cx.path().is_empty() {
            assert_eq!(cx.ancestors().len(), cx.path().len() - 1);
        }
        let resolved = resolve_path(&root, cx.path())
            .expect("every reported path resolves");
        assert!(
            Rc::ptr_eq(&resolved, node),
            "path {} resolved to a different node",
            fmt_path(cx.path()),
        );
        *counter.borrow_mut() += 1;
        VisitControl::Continue
    });
    visit(&doc, &mut visitor).unwrap();
    assert!(*checked.borrow() > 30);
}

// =============================================================================
// Skip
// =============================================================================

/// A skipped field's subtree gets no events and its own leave is
/// suppressed; siblings proceed normally.
#[test]
fn skip_suppresses_subtree_and_leave() {
    let doc = parse_no_loc("{ a, b { x }, c }");
    let log = new_event_log();
    let skip_log = Rc::clone(&log);
    let leave_log = Rc::clone(&log);
    let mut visitor = Visitor::new()
        .on_enter(move |node, cx| {
            skip_log.borrow_mut().push(ev(
                Phase::Enter,
                node.kind(),
                &fmt_path(cx.path()),
            ));
            if node.kind() == NodeKind::Field
                && node.name_value() == Some("b")
            {
                VisitControl::Skip
            } else {
                VisitControl::Continue
            }
        })
        .on_leave(move |node, cx| {
            leave_log.borrow_mut().push(ev(
                Phase::Leave,
                node.kind(),
                &fmt_path(cx.path()),
            ));
            VisitControl::Continue
        });
    let result = visit(&doc, &mut visitor).unwrap().unwrap();
    assert!(Rc::ptr_eq(&result, &doc));

    use NodeKind::*;
    use Phase::*;
    let selections = "definitions.0.selectionSet.selections";
    assert_eq!(
        *log.borrow(),
        vec![
            ev(Enter, Document, ""),
            ev(Enter, OperationDefinition, "definitions.0"),
            ev(Enter, SelectionSet, "definitions.0.selectionSet"),
            ev(Enter, Field, &format!("{selections}.0")),
            ev(Enter, Name, &format!("{selections}.0.name")),
            ev(Leave, Name, &format!("{selections}.0.name")),
            ev(Leave, Field, &format!("{selections}.0")),
            // Field `b` enters, then nothing beneath it and no leave.
            ev(Enter, Field, &format!("{selections}.1")),
            ev(Enter, Field, &format!("{selections}.2")),
            ev(Enter, Name, &format!("{selections}.2.name")),
            ev(Leave, Name, &format!("{selections}.2.name")),
            ev(Leave, Field, &format!("{selections}.2")),
            ev(Leave, SelectionSet, "definitions.0.selectionSet"),
            ev(Leave, OperationDefinition, "definitions.0"),
            ev(Leave, Document, ""),
        ],
    );
}

// =============================================================================
// Stop
// =============================================================================

/// No event fires after a `Stop` at enter, and the input tree comes
/// back unchanged.
#[test]
fn stop_at_enter_aborts_traversal() {
    let doc = parse_no_loc("{ a, b, c }");
    let log = new_event_log();
    let stop_log = Rc::clone(&log);
    let mut visitor = Visitor::new().on_enter(move |node, cx| {
        stop_log.borrow_mut().push(ev(
            Phase::Enter,
            node.kind(),
            &fmt_path(cx.path()),
        ));
        if node.name_value() == Some("b") {
            VisitControl::Stop
        } else {
            VisitControl::Continue
        }
    });
    let result = visit(&doc, &mut visitor).unwrap().unwrap();
    assert!(Rc::ptr_eq(&result, &doc));

    let last = log.borrow().last().cloned().unwrap();
    assert_eq!(last.kind, NodeKind::Field);
    assert_eq!(
        last.path,
        "definitions.0.selectionSet.selections.1",
    );
}

/// A `Stop` at leave suppresses every enclosing leave event.
#[test]
fn stop_at_leave_suppresses_enclosing_leaves() {
    let doc = parse_no_loc("{ a, b, c }");
    let leave_log = new_event_log();
    let enter_log = Rc::clone(&leave_log);
    let stop_log = Rc::clone(&leave_log);
    let mut visitor = Visitor::new()
        .on_enter(move |node, cx| {
            enter_log.borrow_mut().push(ev(
                Phase::Enter,
                node.kind(),
                &fmt_path(cx.path()),
            ));
            VisitControl::Continue
        })
        .on_leave(move |node, cx| {
            stop_log.borrow_mut().push(ev(
                Phase::Leave,
                node.kind(),
                &fmt_path(cx.path()),
            ));
            if node.name_value() == Some("a") {
                VisitControl::Stop
            } else {
                VisitControl::Continue
            }
        });
    let result = visit(&doc, &mut visitor).unwrap().unwrap();
    assert!(Rc::ptr_eq(&result, &doc));

    let events = leave_log.borrow();
    // The last event is `leave` of field `a`; the sibling fields and
    // the enclosing selection set, operation, and document never
    // leave (nor do the siblings enter).
    let last = events.last().unwrap();
    assert_eq!(last.phase, Phase::Leave);
    assert_eq!(
        last.path,
        "definitions.0.selectionSet.selections.0",
    );
    assert!(!events.iter().any(|event| {
        event.path == "definitions.0.selectionSet.selections.1"
    }));
}

// =============================================================================
// Re-entrancy
// =============================================================================

/// A callback may run a nested traversal over a disjoint tree without
/// disturbing the outer walk.
#[test]
fn engine_is_reentrant() {
    let outer = parse_no_loc("{ a, b }");
    let inner = parse_no_loc("{ x { y } }");

    let inner_counts = Rc::new(RefCell::new(Vec::new()));
    let counts = Rc::clone(&inner_counts);
    let mut visitor = Visitor::new().on_enter_kind(
        NodeKind::Field,
        move |_node, _cx| {
            let nested = Rc::new(RefCell::new(0usize));
            let tally = Rc::clone(&nested);
            let mut counting =
                Visitor::new().on_enter(move |_node, _cx| {
                    *tally.borrow_mut() += 1;
                    VisitControl::Continue
                });
            visit(&inner, &mut counting).unwrap();
            counts.borrow_mut().push(*nested.borrow());
            VisitControl::Continue
        },
    );
    let result = visit(&outer, &mut visitor).unwrap().unwrap();
    assert!(Rc::ptr_eq(&result, &outer));
    // Two outer fields, each running a full nested traversal of the
    // 7-node inner tree.
    assert_eq!(*inner_counts.borrow(), vec![7, 7]);
}

// =============================================================================
// Malformed nodes
// =============================================================================

/// A `Field` without its mandatory `name` slot fails traversal with
/// the malformed node's path.
#[test]
fn missing_required_slot_fails_with_path() {
    let field = Rc::new(Node::new(NodeKind::Field));
    let selection_set = Rc::new(
        Node::new(NodeKind::SelectionSet)
            .set("selections", vec![field]),
    );
    let operation = Rc::new(
        Node::new(NodeKind::OperationDefinition)
            .set("operation", "query")
            .set("selectionSet", selection_set),
    );
    let doc = Rc::new(
        Node::new(NodeKind::Document)
            .set("definitions", vec![operation]),
    );

    let error =
        visit(&doc, &mut Visitor::new()).unwrap_err();
    match error {
        VisitError::MissingSlot { kind, slot, path } => {
            assert_eq!(kind, NodeKind::Field);
            assert_eq!(slot, "name");
            assert_eq!(
                path,
                "definitions.0.selectionSet.selections.0",
            );
        },
        other => panic!("unexpected error: {other:?}"),
    }
}

/// A slot holding the wrong shape of value fails traversal.
#[test]
fn slot_kind_mismatch_fails_with_path() {
    let doc = Rc::new(
        Node::new(NodeKind::Document)
            .set("definitions", Node::name("oops")),
    );
    let error =
        visit(&doc, &mut Visitor::new()).unwrap_err();
    match error {
        VisitError::SlotKindMismatch {
            kind, slot, path, ..
        } => {
            assert_eq!(kind, NodeKind::Document);
            assert_eq!(slot, "definitions");
            assert_eq!(path, "");
        },
        other => panic!("unexpected error: {other:?}"),
    }
}

/// Errors surface through the combinators' composition too: the key
/// type is shared, so a path key formats identically everywhere.
#[test]
fn key_display_formats() {
    assert_eq!(
        fmt_path(&[
            Key::Slot("definitions"),
            Key::Index(0),
            Key::Slot("selectionSet"),
        ]),
        "definitions.0.selectionSet",
    );
    assert_eq!(fmt_path(&[]), "");
}

//! Tests for the parallel combinator's independent per-visitor state.

use crate::ast::Node;
use crate::ast::NodeKind;
use crate::print;
use crate::tests::utils::new_event_log;
use crate::tests::utils::parse_no_loc;
use crate::tests::utils::EventLog;
use crate::tests::utils::Phase;
use crate::tests::utils::RecordedEvent;
use crate::visit::fmt_path;
use crate::visit::visit;
use crate::visit::visit_in_parallel;
use crate::Visit;
use crate::VisitControl;
use crate::Visitor;
use std::rc::Rc;

/// A recording visitor that additionally skips one field's subtree.
fn recording_skipper(
    log: &EventLog,
    skip_field: &'static str,
) -> Visitor {
    let enter_log = Rc::clone(log);
    let leave_log = Rc::clone(log);
    Visitor::new()
        .on_enter(move |node, cx| {
            enter_log.borrow_mut().push(RecordedEvent {
                phase: Phase::Enter,
                kind: node.kind(),
                path: fmt_path(cx.path()),
            });
            if node.kind() == NodeKind::Field
                && node.name_value() == Some(skip_field)
            {
                VisitControl::Skip
            } else {
                VisitControl::Continue
            }
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

fn names_entered(log: &EventLog) -> Vec<String> {
    log.borrow()
        .iter()
        .filter(|event| {
            event.phase == Phase::Enter
                && event.kind == NodeKind::Name
        })
        .map(|event| event.path.clone())
        .collect()
}

/// Two parallel visitors skip different subtrees; each one misses
/// exactly the subtree it skipped while the other walks it.
#[test]
fn independent_skips() {
    let doc = parse_no_loc("{ a { x }, b { y } }");

    let log_one = new_event_log();
    let log_two = new_event_log();
    let mut combined = visit_in_parallel(vec![
        Box::new(recording_skipper(&log_one, "a")),
        Box::new(recording_skipper(&log_two, "b")),
    ]);
    let result = visit(&doc, &mut combined).unwrap().unwrap();
    assert!(Rc::ptr_eq(&result, &doc));

    let selections = "definitions.0.selectionSet.selections";
    let a_name = format!("{selections}.0.name");
    let x_name =
        format!("{selections}.0.selectionSet.selections.0.name");
    let b_name = format!("{selections}.1.name");
    let y_name =
        format!("{selections}.1.selectionSet.selections.0.name");

    // Visitor one walks everything except `a`'s subtree.
    assert_eq!(
        names_entered(&log_one),
        vec![b_name.clone(), y_name.clone()],
    );
    // Visitor two walks everything except `b`'s subtree.
    assert_eq!(names_entered(&log_two), vec![a_name, x_name]);

    // Neither visitor sees the skipped field's leave...
    let leave_of = |log: &EventLog, path: &str| {
        log.borrow().iter().any(|event| {
            event.phase == Phase::Leave && event.path == path
        })
    };
    assert!(!leave_of(&log_one, &format!("{selections}.0")));
    assert!(leave_of(&log_one, &format!("{selections}.1")));
    assert!(!leave_of(&log_two, &format!("{selections}.1")));
    assert!(leave_of(&log_two, &format!("{selections}.0")));

    // ...but both leave everything they entered above the skips.
    assert!(leave_of(&log_one, ""));
    assert!(leave_of(&log_two, ""));
}

/// A `Stop` retires only the stopping visitor; the other completes
/// the traversal.
#[test]
fn stop_retires_one_visitor() {
    let doc = parse_no_loc("{ a, b, c }");

    let log = new_event_log();
    let stopper_log = Rc::clone(&log);
    let stopper = Visitor::new().on_enter(move |node, cx| {
        stopper_log.borrow_mut().push(RecordedEvent {
            phase: Phase::Enter,
            kind: node.kind(),
            path: fmt_path(cx.path()),
        });
        if node.name_value() == Some("a") {
            VisitControl::Stop
        } else {
            VisitControl::Continue
        }
    });

    let full_log = new_event_log();
    let walker_log = Rc::clone(&full_log);
    let walker = Visitor::new().on_enter(move |node, cx| {
        walker_log.borrow_mut().push(RecordedEvent {
            phase: Phase::Enter,
            kind: node.kind(),
            path: fmt_path(cx.path()),
        });
        let _ = node;
        VisitControl::Continue
    });

    let mut combined = visit_in_parallel(vec![
        Box::new(stopper),
        Box::new(walker),
    ]);
    let result = visit(&doc, &mut combined).unwrap().unwrap();
    assert!(Rc::ptr_eq(&result, &doc));

    // The stopper saw nothing after field `a`.
    let stopper_fields: Vec<_> = log
        .borrow()
        .iter()
        .filter(|event| event.kind == NodeKind::Field)
        .map(|event| event.path.clone())
        .collect();
    assert_eq!(
        stopper_fields,
        vec!["definitions.0.selectionSet.selections.0".to_string()],
    );

    // The walker saw all three fields.
    let walker_fields = full_log
        .borrow()
        .iter()
        .filter(|event| event.kind == NodeKind::Field)
        .count();
    assert_eq!(walker_fields, 3);
}

/// The combined command is `Stop` only once every sub-visitor has
/// stopped — then the engine aborts the walk.
#[test]
fn combined_stop_when_all_stop() {
    let doc = parse_no_loc("{ a, b, c }");

    let make_stopper = |field: &'static str| {
        Visitor::new().on_enter(move |node, _cx| {
            if node.kind() == NodeKind::Field
                && node.name_value() == Some(field)
            {
                VisitControl::Stop
            } else {
                VisitControl::Continue
            }
        })
    };

    let log = new_event_log();
    let witness_log = Rc::clone(&log);
    let witness = Visitor::new().on_enter(move |node, cx| {
        witness_log.borrow_mut().push(RecordedEvent {
            phase: Phase::Enter,
            kind: node.kind(),
            path: fmt_path(cx.path()),
        });
        if node.kind() == NodeKind::Field
            && node.name_value() == Some("b")
        {
            VisitControl::Stop
        } else {
            VisitControl::Continue
        }
    });

    let mut combined = visit_in_parallel(vec![
        Box::new(make_stopper("a")),
        Box::new(witness),
    ]);
    let result = visit(&doc, &mut combined).unwrap().unwrap();
    assert!(Rc::ptr_eq(&result, &doc));

    // The witness entered fields `a` and `b`, and once it stopped at
    // `b` every sub-visitor had stopped, so field `c` was never
    // visited by anyone.
    let fields: Vec<_> = log
        .borrow()
        .iter()
        .filter(|event| event.kind == NodeKind::Field)
        .map(|event| event.path.clone())
        .collect();
    assert_eq!(
        fields,
        vec![
            "definitions.0.selectionSet.selections.0".to_string(),
            "definitions.0.selectionSet.selections.1".to_string(),
        ],
    );
}

/// The first sub-visitor to return an edit wins and later
/// sub-visitors are not invoked for that event.
#[test]
fn first_edit_wins() {
    let doc = parse_no_loc("{ a, b, c }");

    let replacer = Visitor::new().on_enter_kind(
        NodeKind::Field,
        |node, _cx| {
            if node.name_value() == Some("b") {
                VisitControl::Replace(Rc::new(
                    node.with_slot("name", Node::name("z")),
                ))
            } else {
                VisitControl::Continue
            }
        },
    );

    let log = new_event_log();
    let observer_log = Rc::clone(&log);
    let observer = Visitor::new().on_enter(move |node, cx| {
        observer_log.borrow_mut().push(RecordedEvent {
            phase: Phase::Enter,
            kind: node.kind(),
            path: fmt_path(cx.path()),
        });
        let _ = node;
        VisitControl::Continue
    });

    let mut combined = visit_in_parallel(vec![
        Box::new(replacer),
        Box::new(observer),
    ]);
    let edited = visit(&doc, &mut combined).unwrap().unwrap();
    assert_eq!(print(&edited), print(&parse_no_loc("{ a, z, c }")));

    // The observer never received the short-circuited enter of `b`,
    // but it did walk the replacement's children.
    let events = log.borrow();
    assert!(!events.iter().any(|event| {
        event.kind == NodeKind::Field
            && event.path
                == "definitions.0.selectionSet.selections.1"
    }));
    assert!(events.iter().any(|event| {
        event.kind == NodeKind::Name
            && event.path
                == "definitions.0.selectionSet.selections.1.name"
    }));
}

/// When a delete wins at enter, the deleted node's events are over:
/// later sub-visitors see neither phase for it.
#[test]
fn delete_wins_at_enter_skips_remaining_visitors() {
    let doc = parse_no_loc("{ a, b, c }");

    let deleter = Visitor::new().on_enter_kind(
        NodeKind::Field,
        |node, _cx| {
            if node.name_value() == Some("b") {
                VisitControl::Delete
            } else {
                VisitControl::Continue
            }
        },
    );

    let log = new_event_log();
    let observer_log = Rc::clone(&log);
    let observer = Visitor::new()
        .on_enter(move |node, cx| {
            observer_log.borrow_mut().push(RecordedEvent {
                phase: Phase::Enter,
                kind: node.kind(),
                path: fmt_path(cx.path()),
            });
            let _ = node;
            VisitControl::Continue
        });

    let mut combined = visit_in_parallel(vec![
        Box::new(deleter),
        Box::new(observer),
    ]);
    let edited = visit(&doc, &mut combined).unwrap().unwrap();
    assert_eq!(print(&edited), print(&parse_no_loc("{ a, c }")));

    assert!(!log.borrow().iter().any(|event| {
        event.path == "definitions.0.selectionSet.selections.1"
    }));
}

/// The engine (and thus the combinator's boxed sub-visitors) accepts
/// hand-written `Visit` implementations, not just descriptors.
#[test]
fn hand_written_visit_impl() {
    struct CountingVisit {
        enters: usize,
        leaves: usize,
    }
    impl Visit for CountingVisit {
        fn enter(
            &mut self,
            _node: &Rc<Node>,
            _cx: &crate::VisitContext<'_>,
        ) -> VisitControl {
            self.enters += 1;
            VisitControl::Continue
        }
        fn leave(
            &mut self,
            _node: &Rc<Node>,
            _cx: &crate::VisitContext<'_>,
        ) -> VisitControl {
            self.leaves += 1;
            VisitControl::Continue
        }
    }

    let doc = parse_no_loc("{ a { x } }");
    let mut counter = CountingVisit {
        enters: 0,
        leaves: 0,
    };
    visit(&doc, &mut counter).unwrap();
    // Document, operation, selection set, field a, name a, nested
    // selection set, field x, name x.
    assert_eq!(counter.enters, 8);
    assert_eq!(counter.leaves, 8);
}

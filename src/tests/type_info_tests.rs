//! Tests for the type-info combinator and the stock tracker.

use crate::ast::Node;
use crate::ast::NodeKind;
use crate::print;
use crate::schema::FieldDef;
use crate::schema::Schema;
use crate::schema::TypeDefinition;
use crate::schema::TypeInfo;
use crate::schema::TypeRef;
use crate::tests::utils::parse_no_loc;
use crate::visit::visit;
use crate::visit::visit_with_type_info;
use crate::VisitControl;
use crate::Visitor;
use std::cell::RefCell;
use std::rc::Rc;

/// A small schema: `Query { human(id: Int): Human, alien: Alien }`,
/// with `Human.pets` returning a union so composite detection covers
/// objects and unions.
fn pet_schema() -> Schema {
    Schema::new()
        .with_query_type("Query")
        .with_type(TypeDefinition::scalar("String"))
        .with_type(TypeDefinition::scalar("Int"))
        .with_type(TypeDefinition::object(
            "Query",
            [
                FieldDef::new("human", TypeRef::named("Human"))
                    .argument("id", TypeRef::named("Int")),
                FieldDef::new("alien", TypeRef::named("Alien")),
            ],
        ))
        .with_type(TypeDefinition::object(
            "Human",
            [
                FieldDef::new("name", TypeRef::named("String")),
                FieldDef::new(
                    "pets",
                    TypeRef::list(TypeRef::named("Pet")),
                ),
            ],
        ))
        .with_type(TypeDefinition::union("Pet", ["Cat", "Dog"]))
        .with_type(TypeDefinition::object(
            "Cat",
            [FieldDef::new("name", TypeRef::named("String"))],
        ))
        .with_type(TypeDefinition::object(
            "Dog",
            [FieldDef::new("name", TypeRef::named("String"))],
        ))
        .with_type(TypeDefinition::object(
            "Alien",
            [FieldDef::new("name", TypeRef::named("String"))],
        ))
}

/// One recorded enter event: node kind plus the tracker's
/// (parentType, type, inputType) reading at that moment.
type TraceEntry =
    (NodeKind, Option<String>, Option<String>, Option<String>);

fn trace_entry(
    kind: NodeKind,
    tracker: &TypeInfo,
) -> TraceEntry {
    (
        kind,
        tracker.get_parent_type().map(str::to_string),
        tracker.get_type().map(TypeRef::to_string),
        tracker.get_input_type().map(TypeRef::to_string),
    )
}

fn golden(
    kind: NodeKind,
    parent: Option<&str>,
    ty: Option<&str>,
    input: Option<&str>,
) -> TraceEntry {
    (
        kind,
        parent.map(str::to_string),
        ty.map(str::to_string),
        input.map(str::to_string),
    )
}

/// Wraps selectionless fields of composite type with
/// `{ __typename }`, checking the tracker stays synchronized through
/// the replace handshake, and the whole trace against a golden
/// recording.
#[test]
fn maintains_type_info_during_edit() {
    let doc =
        parse_no_loc("{ human(id: 4) { name, pets }, alien }");
    let before = print(&doc);

    let tracker =
        Rc::new(RefCell::new(TypeInfo::new(pet_schema())));
    let trace: Rc<RefCell<Vec<TraceEntry>>> =
        Rc::new(RefCell::new(Vec::new()));

    let callback_tracker = Rc::clone(&tracker);
    let callback_trace = Rc::clone(&trace);
    let user = Visitor::new().on_enter(move |node, _cx| {
        let info = callback_tracker.borrow();
        callback_trace
            .borrow_mut()
            .push(trace_entry(node.kind(), &info));

        if node.kind() == NodeKind::Field
            && node.child("selectionSet").is_none()
        {
            let composite = info
                .get_type()
                .map(|ty| {
                    info.schema().is_composite(ty.named_type())
                })
                .unwrap_or(false);
            if composite {
                drop(info);
                let typename = Node::new(NodeKind::Field)
                    .set("name", Node::name("__typename"));
                let selection_set =
                    Node::new(NodeKind::SelectionSet).set(
                        "selections",
                        vec![Rc::new(typename)],
                    );
                return VisitControl::Replace(Rc::new(
                    node.with_slot("selectionSet", selection_set),
                ));
            }
        }
        VisitControl::Continue
    });

    let mut wrapped = visit_with_type_info(&tracker, user);
    let edited = visit(&doc, &mut wrapped).unwrap().unwrap();

    assert_eq!(
        print(&edited),
        print(&parse_no_loc(
            "{ human(id: 4) { name, pets { __typename } }, alien { __typename } }",
        )),
    );
    assert_eq!(print(&doc), before);

    // The tracker unwound to its initial state.
    let info = tracker.borrow();
    assert!(info.get_type().is_none());
    assert!(info.get_parent_type().is_none());
    assert!(info.get_input_type().is_none());
    drop(info);

    use NodeKind::*;
    let q = Some("Query");
    assert_eq!(
        *trace.borrow(),
        vec![
            golden(Document, None, None, None),
            golden(OperationDefinition, None, Some("Query"), None),
            golden(SelectionSet, q, Some("Query"), None),
            golden(Field, q, Some("Human"), None),
            golden(Name, q, Some("Human"), None),
            golden(Argument, q, Some("Human"), Some("Int")),
            golden(Name, q, Some("Human"), Some("Int")),
            golden(IntValue, q, Some("Human"), Some("Int")),
            golden(
                SelectionSet,
                Some("Human"),
                Some("Human"),
                None,
            ),
            golden(Field, Some("Human"), Some("String"), None),
            golden(Name, Some("Human"), Some("String"), None),
            golden(Field, Some("Human"), Some("[Pet]"), None),
            golden(Name, Some("Human"), Some("[Pet]"), None),
            golden(
                SelectionSet,
                Some("Pet"),
                Some("[Pet]"),
                None,
            ),
            golden(Field, Some("Pet"), Some("String!"), None),
            golden(Name, Some("Pet"), Some("String!"), None),
            golden(Field, q, Some("Alien"), None),
            golden(Name, q, Some("Alien"), None),
            golden(
                SelectionSet,
                Some("Alien"),
                Some("Alien"),
                None,
            ),
            golden(Field, Some("Alien"), Some("String!"), None),
            golden(Name, Some("Alien"), Some("String!"), None),
        ],
    );
}

/// A `Skip` from the user rebalances the tracker immediately: the
/// skipped field's type is popped before the next sibling enters.
#[test]
fn skip_rebalances_tracker() {
    let doc = parse_no_loc("{ human(id: 4) { name }, alien }");
    let tracker =
        Rc::new(RefCell::new(TypeInfo::new(pet_schema())));

    let observed = Rc::new(RefCell::new(Vec::new()));
    let callback_tracker = Rc::clone(&tracker);
    let callback_observed = Rc::clone(&observed);
    let user = Visitor::new().on_enter_kind(
        NodeKind::Field,
        move |node, _cx| {
            let info = callback_tracker.borrow();
            callback_observed.borrow_mut().push((
                node.name_value().unwrap().to_string(),
                info.get_type().map(TypeRef::to_string),
            ));
            if node.name_value() == Some("human") {
                VisitControl::Skip
            } else {
                VisitControl::Continue
            }
        },
    );

    let mut wrapped = visit_with_type_info(&tracker, user);
    visit(&doc, &mut wrapped).unwrap();

    // `name` was never visited (inside the skipped subtree), and
    // `alien` resolved against Query, not against a stale Human
    // context.
    assert_eq!(
        *observed.borrow(),
        vec![
            ("human".to_string(), Some("Human".to_string())),
            ("alien".to_string(), Some("Alien".to_string())),
        ],
    );
    assert!(tracker.borrow().get_type().is_none());
}

/// Variable definitions and list values feed the input-type stack.
#[test]
fn input_types_for_variables_and_lists() {
    let doc = parse_no_loc(
        "query Q($ids: [Int!] = [1]) { human(id: 4) { name } }",
    );
    let tracker =
        Rc::new(RefCell::new(TypeInfo::new(pet_schema())));

    let observed = Rc::new(RefCell::new(Vec::new()));
    let callback_tracker = Rc::clone(&tracker);
    let callback_observed = Rc::clone(&observed);
    let user = Visitor::new().on_enter(move |node, _cx| {
        if matches!(
            node.kind(),
            NodeKind::VariableDefinition
                | NodeKind::ListValue
                | NodeKind::IntValue
        ) {
            let info = callback_tracker.borrow();
            callback_observed.borrow_mut().push((
                node.kind(),
                info.get_input_type().map(TypeRef::to_string),
            ));
        }
        VisitControl::Continue
    });

    let mut wrapped = visit_with_type_info(&tracker, user);
    visit(&doc, &mut wrapped).unwrap();

    use NodeKind::*;
    assert_eq!(
        *observed.borrow(),
        vec![
            (VariableDefinition, Some("[Int!]".to_string())),
            (ListValue, Some("Int!".to_string())),
            (IntValue, Some("Int!".to_string())),
            (IntValue, Some("Int".to_string())),
        ],
    );
}

/// Fields the schema does not define simply read as absent context,
/// and the tracker still unwinds cleanly.
#[test]
fn unknown_fields_read_as_absent() {
    let doc = parse_no_loc("{ martian { x } }");
    let tracker =
        Rc::new(RefCell::new(TypeInfo::new(pet_schema())));

    let observed = Rc::new(RefCell::new(Vec::new()));
    let callback_tracker = Rc::clone(&tracker);
    let callback_observed = Rc::clone(&observed);
    let user = Visitor::new().on_enter_kind(
        NodeKind::Field,
        move |node, _cx| {
            let info = callback_tracker.borrow();
            callback_observed.borrow_mut().push((
                node.name_value().unwrap().to_string(),
                info.get_type().map(TypeRef::to_string),
            ));
            VisitControl::Continue
        },
    );

    let mut wrapped = visit_with_type_info(&tracker, user);
    visit(&doc, &mut wrapped).unwrap();

    assert_eq!(
        *observed.borrow(),
        vec![
            ("martian".to_string(), None),
            ("x".to_string(), None),
        ],
    );
    assert!(tracker.borrow().get_type().is_none());
    assert!(tracker.borrow().get_parent_type().is_none());
}

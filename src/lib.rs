//! An editing visitor engine for GraphQL document ASTs.
//!
//! This crate traverses a GraphQL document tree in a well-defined
//! depth-first order, invoking user callbacks on entry and exit of
//! every node. Callbacks can edit the tree structurally — replace a
//! node, delete it, skip its subtree, or stop the whole traversal —
//! and the engine returns a new tree that shares every unchanged
//! subtree with the input. The input tree is never mutated.
//!
//! On top of single-visitor traversal it provides two compositions:
//!
//! - [`visit_in_parallel`]: advance several independent visitors over
//!   one traversal, each with its own skip/stop state.
//! - [`visit_with_type_info`]: keep a schema-derived type context
//!   (a [`TypeTracker`] such as [`schema::TypeInfo`]) synchronized
//!   with the traversal position.
//!
//! A compact lexer/parser ([`GraphQLParser`]) and a canonical printer
//! ([`print`]) round out the crate so documents can move between text
//! and tree form.
//!
//! # Example
//!
//! ```rust,ignore
//! use libgraphql_visit::ast::NodeKind;
//! use libgraphql_visit::GraphQLParser;
//! use libgraphql_visit::visit;
//! use libgraphql_visit::VisitControl;
//! use libgraphql_visit::Visitor;
//!
//! let doc = GraphQLParser::new("{ a, b }").parse_document()?;
//! let mut visitor = Visitor::new().on_enter_kind(
//!     NodeKind::Field,
//!     |field, _cx| {
//!         if field.name_value() == Some("b") {
//!             VisitControl::Delete
//!         } else {
//!             VisitControl::Continue
//!         }
//!     },
//! );
//! let edited = visit(&doc, &mut visitor)?;
//! ```

pub mod ast;
mod graphql_parse_error;
mod graphql_parse_error_kind;
mod graphql_parser;
mod graphql_source_span;
mod lexer;
mod printer;
pub mod schema;
mod source_position;
mod token;
pub mod visit;
mod visit_error;

pub use graphql_parse_error::GraphQLParseError;
pub use graphql_parse_error_kind::GraphQLParseErrorKind;
pub use graphql_parser::GraphQLParser;
pub use graphql_source_span::GraphQLSourceSpan;
pub use printer::print;
pub use source_position::SourcePosition;
pub use token::GraphQLToken;
pub use token::GraphQLTokenKind;
pub use visit::visit;
pub use visit::visit_in_parallel;
pub use visit::visit_with_type_info;
pub use visit::Ancestor;
pub use visit::Key;
pub use visit::ParallelVisitor;
pub use visit::TypeInfoVisitor;
pub use visit::TypeTracker;
pub use visit::Visit;
pub use visit::VisitContext;
pub use visit::VisitControl;
pub use visit::Visitor;
pub use visit_error::VisitError;

#[cfg(test)]
mod tests;

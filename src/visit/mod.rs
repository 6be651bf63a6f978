//! The traversal engine and its visitor compositions.
//!
//! [`visit`] drives one depth-first traversal of a document tree,
//! dispatching enter/leave events to a [`Visit`] implementation and
//! interpreting the [`VisitControl`] each callback returns. Structural
//! edits are buffered per ancestor frame and materialized copy-on-write
//! as frames complete, so the input tree is never mutated.
//!
//! [`visit_in_parallel`] multiplexes several visitors over one walk,
//! each with independent skip/stop state. [`visit_with_type_info`]
//! keeps an external [`TypeTracker`] synchronized with the traversal
//! position so user callbacks observe the schema-derived type context
//! of the node they are handed.

mod context;
mod control;
mod engine;
mod parallel;
mod type_info;
mod visitor;

pub use context::fmt_path;
pub use context::Ancestor;
pub use context::Key;
pub use context::VisitContext;
pub use control::VisitControl;
pub use engine::visit;
pub use parallel::visit_in_parallel;
pub use parallel::ParallelVisitor;
pub use type_info::visit_with_type_info;
pub use type_info::TypeInfoVisitor;
pub use type_info::TypeTracker;
pub use visitor::Visit;
pub use visitor::Visitor;

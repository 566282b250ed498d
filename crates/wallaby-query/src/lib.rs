//! CSS-subset selector parsing and execution for the Wallaby browser.
//!
//! # Scope
//!
//! A query string is parsed - via a static catalog of selector
//! recognizers - into an ordered list of [`SelectorOp`]s: *filters* (id,
//! class, element, attribute, universal) that narrow the working set in
//! place, and *transposes* (descendant, child, adjacent sibling, comma
//! union) that move the working set to a different set of nodes entirely.
//! The execution engine applies the list against a document tree (or a
//! caller-supplied starting set, enabling scoped sub-queries) and produces
//! a deduplicated element array in document order.
//!
//! This is deliberately a subset: no pseudo-classes, no specificity, no
//! cascade. Parsing a query the grammar does not cover fails with a
//! structured [`QueryError`] carrying the query string, character offset,
//! and span length; execution itself cannot fail.

mod engine;
mod error;
mod ops;
mod parser;

pub use engine::{execute, execute_within, run_ops};
pub use error::{QueryError, QueryErrorKind};
pub use ops::{AttributeOp, SelectorOp};
pub use parser::parse_query;

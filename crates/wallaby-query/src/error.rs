//! Structured query errors.
//!
//! Grammar problems are fatal to the single query invocation that raised
//! them and carry enough position information for the caller to render a
//! precise diagnostic. They never corrupt the tree being queried.

use thiserror::Error;

/// What went wrong while parsing a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum QueryErrorKind {
    /// The character at the scan position matches no known selector
    /// pattern.
    #[error("unrecognized selector")]
    UnrecognizedSelector,
    /// An attribute selector used a comparison operator the grammar does
    /// not define.
    #[error("invalid attribute comparison operator")]
    InvalidAttributeOperator,
    /// An attribute selector was not terminated or had no name.
    #[error("malformed attribute selector")]
    MalformedAttributeSelector,
    /// The query begins with a transpose operation (`>`, `+`, `,`).
    #[error("query must not begin with a combinator")]
    LeadingTranspose,
    /// The query ends with a transpose operation.
    #[error("query must not end with a combinator")]
    TrailingTranspose,
}

/// A query grammar error, positioned within the offending query string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} at offset {offset} (span {length}) in query {query:?}")]
pub struct QueryError {
    /// The full query string as given by the caller.
    pub query: String,
    /// Character offset of the offending span within `query`.
    pub offset: usize,
    /// Length, in characters, of the offending span.
    pub length: usize,
    /// The classification of the problem.
    pub kind: QueryErrorKind,
}

impl QueryError {
    /// Create an error positioned at a character offset in the query.
    #[must_use]
    pub const fn new(query: String, offset: usize, length: usize, kind: QueryErrorKind) -> Self {
        Self {
            query,
            offset,
            length,
            kind,
        }
    }
}

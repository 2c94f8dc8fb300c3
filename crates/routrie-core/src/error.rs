//! Construction-time route errors.
//!
//! Only route construction can fail. Match-time misses — decoder
//! failures, unsatisfied query clauses, exhausted backtracking — are not
//! errors; they all reduce to the absent match result.

use thiserror::Error;

/// Why a route was rejected before reaching the trie.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum RouteError {
    /// The same query parameter name appears in two clauses of one
    /// pattern.
    #[error("duplicate query parameter `{name}` in pattern `{pattern}`")]
    DuplicateQueryParam {
        /// The offending parameter name.
        name: String,
        /// The pattern, rendered in surface syntax.
        pattern: String,
    },

    /// A literal path segment is empty; no zero-length segment matches.
    #[error("empty literal segment in pattern `{pattern}`")]
    EmptySegment {
        /// The pattern, rendered in surface syntax.
        pattern: String,
    },

    /// A literal path segment contains `/`; segments never span a slash.
    #[error("literal segment `{literal}` contains `/` in pattern `{pattern}`")]
    SegmentContainsSlash {
        /// The offending literal.
        literal: String,
        /// The pattern, rendered in surface syntax.
        pattern: String,
    },
}

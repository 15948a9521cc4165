//! Error type for the coverage pass.
//!
//! Follows the teacher's `parser/types.rs` convention: a `thiserror`-derived
//! type per failure, one unifying enum, manual context where `thiserror`'s
//! `#[error(...)]` isn't expressive enough on its own.

use thiserror::Error;

/// Category-2 errors from the design: an internal invariant was violated.
/// These are never recoverable within the pass — the caller is expected to
/// treat them as a fatal compiler-internal error and abort.
#[derive(Debug, Error, PartialEq)]
pub enum CoverageError {
    /// The toggle expander hit a data-type class it does not know how to
    /// decompose (spec §4.4, "Anything else").
    #[error("unsupported data type encountered during toggle expansion")]
    UnsupportedDataType,

    /// A struct or union declared with zero members; there is no toggle
    /// shape to decompose.
    #[error("aggregate type has no members")]
    EmptyAggregate,

    /// Instrumentation would have been attached to an enclosing node type
    /// the pass does not expect for that coverage family.
    #[error("unexpected enclosing node for {0} instrumentation")]
    UnexpectedEnclosingNode(&'static str),
}

//! hdl-coverage-instrument - a coverage-instrumentation pass over an
//! elaborated HDL netlist AST.
//!
//! This crate walks a netlist tree and inserts line/block, branch, toggle,
//! and user-cover-point instrumentation nodes. It does not parse HDL source,
//! schedule or emit generated code, or collect runtime samples — those are
//! external collaborators; this crate only produces the descriptors and
//! increment/toggle nodes a later pass turns into executable counters.

pub mod ast;
pub mod coverage;
pub mod options;

pub use ast::types::*;
pub use coverage::coverage;
pub use coverage::errors::CoverageError;
pub use options::Options;

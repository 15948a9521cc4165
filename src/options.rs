//! Global options consumed by the coverage pass.
//!
//! Mirrors the shape of the teacher's `ShellOptions`/`ShoptOptions`: a plain,
//! `Default`-constructed record owned by the caller and read only by the
//! pass.

/// Coverage-instrumentation options, supplied by the surrounding compiler
/// infrastructure and never mutated by this pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    /// Enables line/block and branch instrumentation.
    pub coverage_line: bool,
    /// Enables per-bit toggle instrumentation.
    pub coverage_toggle: bool,
    /// Enables instrumentation of user-written cover statements.
    pub coverage_user: bool,
    /// Disables the leading-underscore toggle-eligibility filter.
    pub coverage_underscore: bool,
    /// Maximum `width * unpacked-element-count` for a signal to remain
    /// toggle-eligible.
    pub coverage_max_width: u32,
    /// Additionally synthesizes a per-increment trace variable.
    pub trace_coverage: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            coverage_line: true,
            coverage_toggle: true,
            coverage_user: true,
            coverage_underscore: false,
            coverage_max_width: 256,
            trace_coverage: false,
        }
    }
}

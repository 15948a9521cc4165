//! Scope-state controller (spec §3 `ScopeState`, §4.1).

use std::collections::HashSet;

use crate::ast::types::NodeId;

use super::line_tracker::Handle;

/// Whether coverage is currently on for the enclosing scope, which handle
/// that scope is tracking lines under, and which file pins that scope's
/// "home" for the file-match rule in §4.2.
///
/// The spec's `anchor_node` is narrowed here to just the file name, since
/// the file is the only field of the anchor node the pass ever consults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeState {
    pub on: bool,
    pub in_module_off: bool,
    pub handle: Handle,
    pub anchor_file: String,
    /// Set while inside a procedure/loop/task-function/named-block, so the
    /// toggle expander (which only ever looks at module-level `vars`) never
    /// needs to special-case process-local declarations explicitly — it is
    /// carried here purely to mirror the save/restore shape the spec
    /// describes for every other per-frame auxiliary.
    pub toggle_off: bool,
}

impl ScopeState {
    pub fn fresh(handle: Handle, anchor_file: impl Into<String>) -> Self {
        Self {
            on: true,
            in_module_off: false,
            handle,
            anchor_file: anchor_file.into(),
            toggle_off: false,
        }
    }

    /// A child scope that inherits `on`/`in_module_off`/`anchor_file` from
    /// `self` but gets its own handle — the shape every push in §4.1 uses
    /// for procedures, if/else arms, case items, and user-cover statements.
    pub fn child(&self, handle: Handle) -> Self {
        Self {
            on: self.on,
            in_module_off: self.in_module_off,
            handle,
            anchor_file: self.anchor_file.clone(),
            toggle_off: self.toggle_off,
        }
    }
}

/// Dotted hierarchy of enclosing named sub-block names (spec §3
/// `BeginHier`).
#[derive(Debug, Default, Clone)]
pub struct BeginHier(Vec<String>);

impl BeginHier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: String) {
        self.0.push(name);
    }

    pub fn pop(&mut self) {
        self.0.pop();
    }

    pub fn as_string(&self) -> String {
        self.0.join(".")
    }
}

/// The elsif-continuation side table: a scoped, reset-per-pass marker set
/// rather than a permanent field on `IfNode`, per the design notes'
/// preference ("avoid leaking state to later passes").
#[derive(Debug, Default)]
pub struct ElsifContinuation(HashSet<NodeId>);

impl ElsifContinuation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark(&mut self, id: NodeId) {
        self.0.insert(id);
    }

    pub fn is_marked(&self, id: NodeId) -> bool {
        self.0.contains(&id)
    }
}

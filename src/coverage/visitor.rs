//! The top-level recursive walk tying scope state, line tracking, branch
//! classification, and toggle expansion together into one pass (spec §4.1,
//! driving §4.2–§4.6).

use crate::ast::types::{
    BlockNode, CaseNode, IfNode, LoopNode, ModuleNode, NamedBlockNode, NetlistNode, SourceLoc,
    StmtNode, TaskFuncNode, UserCoverNode,
};
use crate::options::Options;

use super::branch::{ElsifRoles, IfPattern};
use super::emitter::{self, PagePrefix};
use super::line_tracker::{Handle, HandleCounter, LineTracker};
use super::scope::{BeginHier, ElsifContinuation, ScopeState};
use super::toggle;
use super::trace_name::VarNameMap;

/// Owns every piece of per-pass state described in spec §3/§9: counters,
/// side tables, and maps live here rather than as process-wide statics, and
/// are reset per top-level module where the spec calls for it.
pub struct CoverageVisitor<'a> {
    options: &'a Options,
    handles: HandleCounter,
    lines: LineTracker,
    var_names: VarNameMap,
    elsif_continuation: ElsifContinuation,
    begin_hier: BeginHier,
}

impl<'a> CoverageVisitor<'a> {
    pub fn new(options: &'a Options) -> Self {
        Self {
            options,
            handles: HandleCounter::new(),
            lines: LineTracker::new(),
            var_names: VarNameMap::new(),
            elsif_continuation: ElsifContinuation::new(),
            begin_hier: BeginHier::new(),
        }
    }

    pub fn run(&mut self, netlist: &mut NetlistNode) {
        for module in &mut netlist.modules {
            self.visit_module(module);
        }
    }

    fn visit_module(&mut self, module: &mut ModuleNode) {
        self.handles.reset();
        self.var_names.reset();
        self.begin_hier = BeginHier::new();

        let handle = self.handles.next();
        let mut state = ScopeState::fresh(handle, module.file.clone());
        if module.is_top_shell {
            state.on = false;
            state.in_module_off = true;
        }

        if self.options.coverage_toggle && !module.is_top_shell {
            self.instrument_toggles(module);
        } else if module.is_top_shell {
            tracing::debug!(module = %module.name, "skipping toggle instrumentation in synthesized top-level shell");
        }

        let mut stmts = std::mem::take(&mut module.stmts);
        self.visit_stmt_list(module, &mut state, &mut stmts);
        module.stmts = stmts;
    }

    fn instrument_toggles(&mut self, module: &mut ModuleNode) {
        let vars = module.vars.clone();
        for var in &vars {
            match toggle::is_eligible(var, self.options) {
                Ok(true) => {
                    toggle::instrument(module, var, &mut self.var_names, self.options)
                        .expect("eligibility check already ruled out unsupported data types");
                }
                Ok(false) => {
                    tracing::info!(signal = %var.name, "skipping ineligible signal for toggle coverage");
                }
                Err(err) => panic!("internal error decomposing type of signal '{}': {err}", var.name),
            }
        }
    }

    fn record_own_span(&mut self, state: &ScopeState, loc: &SourceLoc) {
        if state.on && loc.file == state.anchor_file {
            self.lines.record(state.handle, loc.first_line, loc.last_line);
        }
    }

    fn take_lines(&mut self, handle: Handle) -> String {
        self.lines.take_coalesced(handle)
    }

    /// Walks one statement list in order, threading `state.on` through
    /// stop-like statements and pragma removal (spec §4.1, §4.2).
    fn visit_stmt_list(&mut self, module: &mut ModuleNode, state: &mut ScopeState, stmts: &mut Vec<StmtNode>) {
        let mut i = 0;
        while i < stmts.len() {
            let loc = stmt_loc(&stmts[i]);
            self.record_own_span(state, &loc);

            match &mut stmts[i] {
                StmtNode::Stop(_) => {
                    state.on = false;
                }
                StmtNode::PragmaOff(_) => {
                    state.on = false;
                    stmts.remove(i);
                    continue;
                }
                StmtNode::If(node) => self.visit_if(module, state, node),
                StmtNode::Case(node) => self.visit_case(module, state, node),
                StmtNode::Block(node) => {
                    self.visit_proc_like(module, state, &mut node.loc, &mut node.stmts)
                }
                StmtNode::Loop(node) => {
                    self.visit_proc_like(module, state, &mut node.loc, &mut node.stmts)
                }
                StmtNode::TaskFunc(node) if node.is_foreign => {}
                StmtNode::TaskFunc(node) => {
                    self.visit_proc_like(module, state, &mut node.loc, &mut node.stmts)
                }
                StmtNode::UserCover(node) => self.visit_user_cover(module, state, node),
                StmtNode::NamedBlock(node) => self.visit_named_block(module, state, node),
                StmtNode::LocalVarDecl(_) | StmtNode::Plain(_) | StmtNode::CoverageIncrement(_) => {}
            }
            i += 1;
        }
    }

    fn visit_proc_like(
        &mut self,
        module: &mut ModuleNode,
        parent: &ScopeState,
        loc: &mut SourceLoc,
        stmts: &mut Vec<StmtNode>,
    ) {
        let handle = self.handles.next();
        let mut state = parent.child(handle);
        state.toggle_off = true;
        // The procedure's own header line (its `always`/`initial`/etc. line)
        // is part of what ran even if nothing inside the body ends up
        // recorded, so it goes under the fresh handle before descending.
        self.record_own_span(&state, &SourceLoc::line(loc.file.clone(), loc.first_line));
        self.visit_stmt_list(module, &mut state, stmts);

        // A block's own descriptor fires whenever line coverage is enabled
        // at all: it records that the block ran up to whatever point it
        // reached, even if a `$stop` partway through suppressed the
        // statements after it (spec §8 scenario 3). Per-statement
        // suppression is already handled by `record_own_span` consulting
        // the live `on` flag as it walks; gating the summary descriptor on
        // that same flag's *final* value would wrongly drop it whenever a
        // block ends mid-`$stop`.
        if self.options.coverage_line {
            let lines = self.take_lines(handle);
            let inc = emitter::emit(
                module,
                &mut self.var_names,
                self.options,
                PagePrefix::Line,
                "block",
                lines,
                0,
                &self.begin_hier.as_string(),
                &loc.file,
                loc.first_line,
                "block",
            );
            stmts.insert(0, StmtNode::CoverageIncrement(inc));
        } else {
            let _ = self.take_lines(handle);
        }
    }

    fn visit_if(&mut self, module: &mut ModuleNode, parent: &ScopeState, if_node: &mut IfNode) {
        let is_elsif = if_node.else_stmts.len() == 1 && matches!(if_node.else_stmts[0], StmtNode::If(_));
        let is_continuation = self.elsif_continuation.is_marked(if_node.id);
        // Captured before traversal: a pragma-only else-arm can empty itself
        // out during `visit_stmt_list`, but whether this `if` ever *had* an
        // else clause at all is a structural fact decided up front.
        let had_else = !if_node.else_stmts.is_empty();
        let roles = ElsifRoles::classify(is_elsif, is_continuation, had_else);

        if is_elsif {
            if let StmtNode::If(nested) = &if_node.else_stmts[0] {
                self.elsif_continuation.mark(nested.id);
            }
        }

        let then_handle = self.handles.next();
        let mut then_state = parent.child(then_handle);
        self.visit_stmt_list(module, &mut then_state, &mut if_node.then_stmts);

        let else_handle = self.handles.next();
        let mut else_state = parent.child(else_handle);
        self.visit_stmt_list(module, &mut else_state, &mut if_node.else_stmts);

        if !self.options.coverage_line {
            let _ = self.take_lines(then_handle);
            let _ = self.take_lines(else_handle);
            return;
        }

        match roles.pattern() {
            IfPattern::BranchPair => {
                if then_state.on && else_state.on {
                    let then_lines = self.take_lines(then_handle);
                    let inc = emitter::emit(
                        module,
                        &mut self.var_names,
                        self.options,
                        PagePrefix::Branch,
                        "if",
                        then_lines,
                        0,
                        &self.begin_hier.as_string(),
                        &if_node.loc.file,
                        if_node.loc.first_line,
                        "if",
                    );
                    if_node.then_stmts.insert(0, StmtNode::CoverageIncrement(inc));

                    let else_lines = self.take_lines(else_handle);
                    let inc = emitter::emit(
                        module,
                        &mut self.var_names,
                        self.options,
                        PagePrefix::Branch,
                        "else",
                        else_lines,
                        1,
                        &self.begin_hier.as_string(),
                        &if_node.loc.file,
                        if_node.loc.first_line,
                        "else",
                    );
                    if_node.else_stmts.insert(0, StmtNode::CoverageIncrement(inc));
                } else {
                    // Not both arms are live (e.g. one arm ends in `$stop`):
                    // a `v_branch` pair would misreport a branch that can
                    // never land on its off side. Degrade to independent
                    // `v_line` half-blocks instead of dropping coverage on
                    // the arm that's still live.
                    self.emit_half_blocks(
                        module, if_node, had_else, then_handle, then_state.on, else_handle, else_state.on,
                    );
                }
            }
            IfPattern::Elsif => {
                if then_state.on {
                    let then_lines = self.take_lines(then_handle);
                    let inc = emitter::emit(
                        module,
                        &mut self.var_names,
                        self.options,
                        PagePrefix::Line,
                        "elsif",
                        then_lines,
                        0,
                        &self.begin_hier.as_string(),
                        &if_node.loc.file,
                        if_node.loc.first_line,
                        "elsif",
                    );
                    if_node.then_stmts.insert(0, StmtNode::CoverageIncrement(inc));
                } else {
                    let _ = self.take_lines(then_handle);
                }
                let _ = self.take_lines(else_handle);
            }
            IfPattern::HalfBlocks => {
                self.emit_half_blocks(
                    module, if_node, had_else, then_handle, then_state.on, else_handle, else_state.on,
                );
            }
        }
    }

    /// Emits up to two independent `v_line` descriptors: `"if"` into the
    /// then-arm when it's live, `"else"` into the else-arm when it's live
    /// *and* this `if` actually had an else clause to begin with (a no-else
    /// `if` never gets an `"else"` descriptor, regardless of the inherited
    /// `on` state of its empty else-arm).
    #[allow(clippy::too_many_arguments)]
    fn emit_half_blocks(
        &mut self,
        module: &mut ModuleNode,
        if_node: &mut IfNode,
        had_else: bool,
        then_handle: Handle,
        then_on: bool,
        else_handle: Handle,
        else_on: bool,
    ) {
        if then_on {
            let then_lines = self.take_lines(then_handle);
            let inc = emitter::emit(
                module,
                &mut self.var_names,
                self.options,
                PagePrefix::Line,
                "if",
                then_lines,
                0,
                &self.begin_hier.as_string(),
                &if_node.loc.file,
                if_node.loc.first_line,
                "if",
            );
            if_node.then_stmts.insert(0, StmtNode::CoverageIncrement(inc));
        } else {
            let _ = self.take_lines(then_handle);
        }
        if had_else && else_on {
            let else_lines = self.take_lines(else_handle);
            let inc = emitter::emit(
                module,
                &mut self.var_names,
                self.options,
                PagePrefix::Line,
                "else",
                else_lines,
                1,
                &self.begin_hier.as_string(),
                &if_node.loc.file,
                if_node.loc.first_line,
                "else",
            );
            if_node.else_stmts.insert(0, StmtNode::CoverageIncrement(inc));
        } else {
            let _ = self.take_lines(else_handle);
        }
    }

    fn visit_case(&mut self, module: &mut ModuleNode, parent: &ScopeState, case_node: &mut CaseNode) {
        for item in &mut case_node.items {
            let handle = self.handles.next();
            let mut state = parent.child(handle);
            self.visit_stmt_list(module, &mut state, &mut item.stmts);

            if self.options.coverage_line && state.on {
                let lines = self.take_lines(handle);
                let inc = emitter::emit(
                    module,
                    &mut self.var_names,
                    self.options,
                    PagePrefix::Line,
                    "case",
                    lines,
                    0,
                    &self.begin_hier.as_string(),
                    &item.loc.file,
                    item.loc.first_line,
                    "case",
                );
                item.stmts.push(StmtNode::CoverageIncrement(inc));
            } else {
                let _ = self.take_lines(handle);
            }
        }
    }

    fn visit_user_cover(&mut self, module: &mut ModuleNode, parent: &ScopeState, uc: &mut UserCoverNode) {
        let handle = self.handles.next();
        let mut state = parent.child(handle);
        state.on = true;
        self.visit_stmt_list(module, &mut state, &mut uc.stmts);
        let _ = self.take_lines(handle);

        if uc.increment.is_none() && self.options.coverage_user {
            let hier = self.begin_hier.as_string();
            let inc = emitter::emit(
                module,
                &mut self.var_names,
                self.options,
                PagePrefix::User,
                "cover",
                String::new(),
                0,
                &hier,
                &uc.loc.file,
                uc.loc.first_line,
                "cover",
            );
            uc.increment = Some(inc);
        }
    }

    fn visit_named_block(&mut self, module: &mut ModuleNode, parent: &ScopeState, nb: &mut NamedBlockNode) {
        if let Some(name) = &nb.name {
            self.begin_hier.push(name.clone());
        }
        let mut state = parent.clone();
        state.toggle_off = true;
        self.visit_stmt_list(module, &mut state, &mut nb.stmts);
        if nb.name.is_some() {
            self.begin_hier.pop();
        }
    }
}

fn stmt_loc(stmt: &StmtNode) -> SourceLoc {
    match stmt {
        StmtNode::Block(BlockNode { loc, .. })
        | StmtNode::Loop(LoopNode { loc, .. })
        | StmtNode::TaskFunc(TaskFuncNode { loc, .. })
        | StmtNode::If(IfNode { loc, .. })
        | StmtNode::Case(CaseNode { loc, .. })
        | StmtNode::UserCover(UserCoverNode { loc, .. })
        | StmtNode::NamedBlock(NamedBlockNode { loc, .. })
        | StmtNode::Stop(loc)
        | StmtNode::PragmaOff(loc)
        | StmtNode::Plain(loc) => loc.clone(),
        StmtNode::LocalVarDecl(var) => var.loc.clone(),
        StmtNode::CoverageIncrement(_) => SourceLoc::new(String::new(), 0, 0),
    }
}

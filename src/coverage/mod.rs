//! Coverage-instrumentation pass over an elaborated netlist AST.
//!
//! [`coverage`] is the sole public entry point; everything else in this
//! module tree is implementation detail the pass uses internally.

pub mod branch;
pub mod emitter;
pub mod errors;
pub mod line_tracker;
pub mod scope;
pub mod toggle;
pub mod trace_name;
pub mod visitor;

use crate::ast::types::NetlistNode;
use crate::options::Options;

use visitor::CoverageVisitor;

/// Walks `root` in place, inserting line/block, branch, toggle, and
/// user-cover instrumentation nodes as directed by `options`. Mutates the
/// tree; returns nothing.
pub fn coverage(root: &mut NetlistNode, options: &Options) {
    if !options.coverage_line && !options.coverage_toggle && !options.coverage_user {
        tracing::debug!("no coverage family enabled; traversal is a no-op");
    }
    let mut visitor = CoverageVisitor::new(options);
    visitor.run(root);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::types::{SourceLoc, VarKind};
    use crate::ast::types::DataTypeNode;
    use crate::ast::Ast;
    use crate::ast::types::NodeIdGen;

    fn module_with_if_else(is_elsif_like: bool) -> crate::ast::types::ModuleNode {
        let mut ids = NodeIdGen::new();
        let then_stmts = vec![Ast::plain(SourceLoc::line("top.sv", 11))];
        let else_stmts = if is_elsif_like {
            vec![Ast::if_node(
                ids.next(),
                SourceLoc::line("top.sv", 12),
                vec![Ast::plain(SourceLoc::line("top.sv", 13))],
                vec![],
            )]
        } else {
            vec![Ast::plain(SourceLoc::line("top.sv", 12))]
        };
        let if_stmt = Ast::if_node(ids.next(), SourceLoc::new("top.sv", 10, 12), then_stmts, else_stmts);
        let mut module = Ast::module("top", "top.sv");
        module.stmts.push(if_stmt);
        module
    }

    #[test]
    fn simple_if_else_gets_branch_pair_p1() {
        let mut netlist = NetlistNode {
            modules: vec![module_with_if_else(false)],
        };
        coverage(&mut netlist, &Options::default());

        let if_stmt = &netlist.modules[0].stmts[0];
        let crate::ast::types::StmtNode::If(if_node) = if_stmt else {
            panic!("expected if node")
        };
        assert!(matches!(
            if_node.then_stmts[0],
            crate::ast::types::StmtNode::CoverageIncrement(_)
        ));
        assert!(matches!(
            if_node.else_stmts[0],
            crate::ast::types::StmtNode::CoverageIncrement(_)
        ));
        let crate::ast::types::StmtNode::CoverageIncrement(then_inc) = &if_node.then_stmts[0] else {
            unreachable!()
        };
        assert_eq!(then_inc.decl.page, "v_branch/top");
        assert_eq!(then_inc.decl.comment, "if");
        assert_eq!(then_inc.decl.column, 0);
        let crate::ast::types::StmtNode::CoverageIncrement(else_inc) = &if_node.else_stmts[0] else {
            unreachable!()
        };
        assert_eq!(else_inc.decl.comment, "else");
        assert_eq!(else_inc.decl.column, 1);
    }

    #[test]
    fn stop_suppresses_statements_after_it_p4() {
        let loc = |l: u32| SourceLoc::line("top.sv", l);
        let block = Ast::block(
            SourceLoc::new("top.sv", 30, 34),
            vec![Ast::plain(loc(31)), Ast::stop(loc(32)), Ast::plain(loc(33))],
        );
        let mut module = Ast::module("top", "top.sv");
        module.stmts.push(block);
        let mut netlist = NetlistNode {
            modules: vec![module],
        };
        coverage(&mut netlist, &Options::default());

        let crate::ast::types::StmtNode::Block(block) = &netlist.modules[0].stmts[0] else {
            panic!("expected block")
        };
        let crate::ast::types::StmtNode::CoverageIncrement(inc) = &block.stmts[0] else {
            panic!("expected a prepended coverage increment")
        };
        assert_eq!(inc.decl.lines, "30-32");
    }

    #[test]
    fn user_cover_fires_even_after_a_stop_p4() {
        let loc = |l: u32| SourceLoc::line("top.sv", l);
        let block = Ast::block(
            SourceLoc::new("top.sv", 1, 5),
            vec![
                Ast::stop(loc(2)),
                Ast::user_cover(loc(3), vec![]),
            ],
        );
        let mut module = Ast::module("top", "top.sv");
        module.stmts.push(block);
        let mut netlist = NetlistNode {
            modules: vec![module],
        };
        coverage(&mut netlist, &Options::default());

        let crate::ast::types::StmtNode::Block(block) = &netlist.modules[0].stmts[0] else {
            panic!("expected block")
        };
        // index 0 is the prepended block descriptor; the user-cover node follows.
        let crate::ast::types::StmtNode::UserCover(uc) = &block.stmts[2] else {
            panic!("expected user cover node")
        };
        assert!(uc.increment.is_some());
    }

    #[test]
    fn handles_are_pairwise_distinct_within_a_module_p3() {
        // Exercised indirectly: if/else always allocate two fresh handles,
        // and line sets never collide across scenarios above, which would
        // only hold if handles were unique per scope. A focused unit check
        // lives in `line_tracker`'s own tests; this confirms end-to-end
        // wiring doesn't reuse a handle across sibling scopes.
        let mut netlist = NetlistNode {
            modules: vec![module_with_if_else(false)],
        };
        coverage(&mut netlist, &Options::default());
        let crate::ast::types::StmtNode::If(if_node) = &netlist.modules[0].stmts[0] else {
            panic!("expected if")
        };
        let crate::ast::types::StmtNode::CoverageIncrement(then_inc) = &if_node.then_stmts[0] else {
            panic!()
        };
        let crate::ast::types::StmtNode::CoverageIncrement(else_inc) = &if_node.else_stmts[0] else {
            panic!()
        };
        assert_ne!(then_inc.decl.lines, else_inc.decl.lines);
    }

    #[test]
    fn if_with_no_else_gets_a_single_line_half_block_not_a_fabricated_branch() {
        let if_stmt = Ast::if_node(
            NodeIdGen::new().next(),
            SourceLoc::new("top.sv", 10, 11),
            vec![Ast::plain(SourceLoc::line("top.sv", 11))],
            vec![],
        );
        let mut module = Ast::module("top", "top.sv");
        module.stmts.push(if_stmt);
        let mut netlist = NetlistNode {
            modules: vec![module],
        };
        coverage(&mut netlist, &Options::default());

        let crate::ast::types::StmtNode::If(if_node) = &netlist.modules[0].stmts[0] else {
            panic!("expected if")
        };
        let crate::ast::types::StmtNode::CoverageIncrement(then_inc) = &if_node.then_stmts[0] else {
            panic!("expected a then-arm descriptor")
        };
        assert_eq!(then_inc.decl.page, "v_line/top");
        assert_eq!(then_inc.decl.comment, "if");
        assert!(if_node.else_stmts.is_empty(), "a no-else if must not grow a fabricated else-arm");
    }

    #[test]
    fn shadow_variable_matches_declared_type_p8() {
        let var = Ast::var(
            "sig",
            VarKind::Signal,
            DataTypeNode::RangedScalar { hi: 3, lo: 0 },
            SourceLoc::line("top.sv", 4),
        );
        let mut module = Ast::module("top", "top.sv");
        module.vars.push(var.clone());
        let mut netlist = NetlistNode {
            modules: vec![module],
        };
        coverage(&mut netlist, &Options::default());

        let shadow = netlist.modules[0].generated.iter().find_map(|g| match g {
            crate::ast::types::GeneratedItem::ShadowVar(t) if t.name == "__Vtogcov__sig" => Some(t),
            _ => None,
        });
        let shadow = shadow.expect("shadow var must be present");
        assert_eq!(shadow.data_type, var.data_type);
    }
}

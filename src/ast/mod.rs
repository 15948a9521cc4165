//! Netlist AST types consumed and produced by the coverage pass.
//!
//! Architecture:
//!   (external) HDL source → elaboration → netlist AST → coverage pass → …

pub mod types;

pub use types::*;

/// Zero-sized constructor namespace for netlist AST nodes, in the same
/// spirit as a parser's own node factory: every node is built through one of
/// these functions rather than struct-literal'd ad hoc at call sites.
pub struct Ast;

impl Ast {
    pub fn module(name: impl Into<String>, file: impl Into<String>) -> ModuleNode {
        ModuleNode::new(name, file)
    }

    pub fn var(
        name: impl Into<String>,
        kind: VarKind,
        data_type: DataTypeNode,
        loc: SourceLoc,
    ) -> VarNode {
        VarNode {
            name: name.into(),
            kind,
            data_type,
            loc,
        }
    }

    pub fn block(loc: SourceLoc, stmts: Vec<StmtNode>) -> StmtNode {
        StmtNode::Block(BlockNode { loc, stmts })
    }

    pub fn loop_node(loc: SourceLoc, stmts: Vec<StmtNode>) -> StmtNode {
        StmtNode::Loop(LoopNode { loc, stmts })
    }

    pub fn task_func(loc: SourceLoc, is_foreign: bool, stmts: Vec<StmtNode>) -> StmtNode {
        StmtNode::TaskFunc(TaskFuncNode {
            loc,
            is_foreign,
            stmts,
        })
    }

    pub fn if_node(
        id: NodeId,
        loc: SourceLoc,
        then_stmts: Vec<StmtNode>,
        else_stmts: Vec<StmtNode>,
    ) -> StmtNode {
        StmtNode::If(IfNode {
            id,
            loc,
            then_stmts,
            else_stmts,
        })
    }

    pub fn case_node(loc: SourceLoc, items: Vec<CaseItemNode>) -> StmtNode {
        StmtNode::Case(CaseNode { loc, items })
    }

    pub fn case_item(loc: SourceLoc, stmts: Vec<StmtNode>) -> CaseItemNode {
        CaseItemNode { loc, stmts }
    }

    pub fn user_cover(loc: SourceLoc, stmts: Vec<StmtNode>) -> StmtNode {
        StmtNode::UserCover(UserCoverNode {
            loc,
            stmts,
            increment: None,
        })
    }

    pub fn stop(loc: SourceLoc) -> StmtNode {
        StmtNode::Stop(loc)
    }

    pub fn pragma_off(loc: SourceLoc) -> StmtNode {
        StmtNode::PragmaOff(loc)
    }

    pub fn named_block(loc: SourceLoc, name: Option<String>, stmts: Vec<StmtNode>) -> StmtNode {
        StmtNode::NamedBlock(NamedBlockNode { loc, name, stmts })
    }

    pub fn plain(loc: SourceLoc) -> StmtNode {
        StmtNode::Plain(loc)
    }

    pub fn local_var_decl(var: VarNode) -> StmtNode {
        StmtNode::LocalVarDecl(var)
    }
}

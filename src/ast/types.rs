//! Netlist AST node types consumed and mutated by the coverage pass.
//!
//! This crate does not parse or elaborate HDL source; it receives an
//! already-built netlist tree from surrounding compiler infrastructure. The
//! node set here is the minimal slice of that tree the coverage pass needs to
//! walk and extend: modules, statements, declared-variable types, and the
//! coverage/instrumentation nodes the pass inserts.

use std::fmt;

/// Monotonic identity tag assigned to every `IfNode` at construction time.
///
/// Used purely as a key for the pass's elsif-continuation side table; it has
/// no meaning outside one run of the pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

/// Hands out strictly increasing `NodeId`s for AST construction.
#[derive(Debug, Default)]
pub struct NodeIdGen(u32);

impl NodeIdGen {
    pub fn new() -> Self {
        Self(0)
    }

    pub fn next(&mut self) -> NodeId {
        let id = self.0;
        self.0 += 1;
        NodeId(id)
    }
}

/// Source position of one AST node: its enclosing file and inclusive line
/// range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLoc {
    pub file: String,
    pub first_line: u32,
    pub last_line: u32,
}

impl SourceLoc {
    pub fn new(file: impl Into<String>, first_line: u32, last_line: u32) -> Self {
        Self {
            file: file.into(),
            first_line,
            last_line,
        }
    }

    pub fn line(file: impl Into<String>, line: u32) -> Self {
        Self::new(file, line, line)
    }
}

/// Whether a declared variable participates in toggle coverage at all, prior
/// to the width/name filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarKind {
    /// An ordinary net or variable: wire, reg, logic, bit, etc.
    Signal,
    /// A port (in/out/inout); togglable the same as a plain signal.
    Port,
    /// A compile-time parameter; never togglable.
    Parameter,
    /// A generate-loop genvar; never togglable.
    Genvar,
}

impl VarKind {
    pub fn is_togglable(self) -> bool {
        matches!(self, VarKind::Signal | VarKind::Port)
    }
}

/// One member of a packed/unpacked struct or union.
#[derive(Debug, Clone, PartialEq)]
pub struct StructMember {
    pub name: String,
    pub data_type: DataTypeNode,
}

impl StructMember {
    pub fn new(name: impl Into<String>, data_type: DataTypeNode) -> Self {
        Self {
            name: name.into(),
            data_type,
        }
    }
}

/// The declared type of a variable, restricted to the classes the toggle
/// expander (spec §4.4) knows how to decompose.
#[derive(Debug, Clone, PartialEq)]
pub enum DataTypeNode {
    /// `[hi:lo]` — a bit-ranged scalar.
    RangedScalar { hi: i32, lo: i32 },
    /// A single-bit scalar with no declared range.
    UnrangedScalar,
    /// `element[lo..hi]`, stored as distinct per-index storage.
    UnpackedArray {
        lo: i32,
        hi: i32,
        element: Box<DataTypeNode>,
    },
    /// `element[lo..hi]`, laid out contiguously in the enclosing bit vector.
    PackedArray {
        lo: i32,
        hi: i32,
        element: Box<DataTypeNode>,
    },
    /// A struct laid out contiguously in the enclosing bit vector.
    PackedStruct { members: Vec<StructMember> },
    /// A struct with distinct per-member storage.
    UnpackedStruct { members: Vec<StructMember> },
    /// A union; per the open question in the design notes, only the first
    /// member is ever toggle-instrumented.
    Union { members: Vec<StructMember> },
    /// Any type class this pass does not know how to decompose (e.g. a
    /// class handle, a string, a real). Hitting this during expansion is a
    /// fatal internal error, never a silent skip.
    Other,
}

impl DataTypeNode {
    /// Total number of scalar bits this type decomposes into for toggle
    /// coverage — the quantity the eligibility filter compares against
    /// `coverage_max_width`, and the quantity P2 checks against the number
    /// of emitted toggle nodes.
    pub fn total_toggle_bits(&self) -> Result<u32, crate::coverage::errors::CoverageError> {
        use crate::coverage::errors::CoverageError;
        match self {
            DataTypeNode::RangedScalar { hi, lo } => Ok((hi - lo).unsigned_abs() + 1),
            DataTypeNode::UnrangedScalar => Ok(1),
            DataTypeNode::UnpackedArray { lo, hi, element } => {
                let count = (hi - lo).unsigned_abs() + 1;
                Ok(count * element.total_toggle_bits()?)
            }
            DataTypeNode::PackedArray { lo, hi, element } => {
                let count = (hi - lo).unsigned_abs() + 1;
                Ok(count * element.total_toggle_bits()?)
            }
            DataTypeNode::PackedStruct { members } | DataTypeNode::UnpackedStruct { members } => {
                let mut total = 0u32;
                for m in members {
                    total += m.data_type.total_toggle_bits()?;
                }
                Ok(total)
            }
            DataTypeNode::Union { members } => members
                .first()
                .ok_or(CoverageError::EmptyAggregate)?
                .data_type
                .total_toggle_bits(),
            DataTypeNode::Other => Err(CoverageError::UnsupportedDataType),
        }
    }
}

/// A declared signal, port, parameter, or genvar.
#[derive(Debug, Clone, PartialEq)]
pub struct VarNode {
    pub name: String,
    pub kind: VarKind,
    pub data_type: DataTypeNode,
    pub loc: SourceLoc,
}

/// An expression reaching one sub-element of a signal (or its shadow
/// companion), built up by the toggle expander as it recurses into a type.
#[derive(Debug, Clone, PartialEq)]
pub enum ExprNode {
    /// A reference to a declared variable, or to its `__Vtogcov__` shadow.
    VarRef { name: String },
    /// `of[bit]` — a single-bit select out of a packed scalar/array.
    BitSel { of: Box<ExprNode>, bit: i32 },
    /// `of[index]` — an unpacked-array element select.
    ArraySel { of: Box<ExprNode>, index: i32 },
    /// A contiguous bit-slice out of a packed aggregate.
    BitSlice {
        of: Box<ExprNode>,
        offset: u32,
        width: u32,
    },
    /// `of.member` — an unpacked-struct member select.
    StructSel { of: Box<ExprNode>, member: String },
    /// A 32-bit integer constant.
    Const(i64),
    /// `lhs + rhs`.
    Add { lhs: Box<ExprNode>, rhs: Box<ExprNode> },
}

impl ExprNode {
    pub fn var_ref(name: impl Into<String>) -> Self {
        ExprNode::VarRef { name: name.into() }
    }

    pub fn bit_sel(self, bit: i32) -> Self {
        ExprNode::BitSel {
            of: Box::new(self),
            bit,
        }
    }

    pub fn array_sel(self, index: i32) -> Self {
        ExprNode::ArraySel {
            of: Box::new(self),
            index,
        }
    }

    pub fn bit_slice(self, offset: u32, width: u32) -> Self {
        ExprNode::BitSlice {
            of: Box::new(self),
            offset,
            width,
        }
    }

    pub fn struct_sel(self, member: impl Into<String>) -> Self {
        ExprNode::StructSel {
            of: Box::new(self),
            member: member.into(),
        }
    }
}

/// A coverage metadata descriptor: static information about one coverage
/// point, independent of how many times it fires at runtime.
#[derive(Debug, Clone, PartialEq)]
pub struct CoverageDeclNode {
    pub page: String,
    pub comment: String,
    pub lines: String,
    pub column: u8,
    pub hier: String,
}

/// A module-level temporary variable synthesized by the pass: a shadow
/// variable or a trace-coverage counter.
#[derive(Debug, Clone, PartialEq)]
pub struct ModuleTempNode {
    pub name: String,
    pub data_type: DataTypeNode,
    pub traceable: bool,
}

/// `target := target + 1` synthesized for trace-coverage mode.
#[derive(Debug, Clone, PartialEq)]
pub struct AssignNode {
    pub target: ExprNode,
    pub value: ExprNode,
}

/// A coverage-increment node, referring to its descriptor and optionally
/// carrying a chained trace-variable assignment (spec §4.5).
#[derive(Debug, Clone, PartialEq)]
pub struct CoverageIncrementNode {
    pub decl: CoverageDeclNode,
    pub trace_assign: Option<AssignNode>,
}

/// A single-bit toggle-coverage check: an increment plus the two access-path
/// expressions (current value, shadow/previous value) being compared.
#[derive(Debug, Clone, PartialEq)]
pub struct CoverageToggleNode {
    pub increment: CoverageIncrementNode,
    pub value_expr: ExprNode,
    pub change_expr: ExprNode,
}

/// Anything the pass attaches to a module's top level outside the normal
/// procedural statement list: shadow variables, trace variables, and toggle
/// checks.
#[derive(Debug, Clone, PartialEq)]
pub enum GeneratedItem {
    ShadowVar(ModuleTempNode),
    TraceVar(ModuleTempNode),
    Toggle(CoverageToggleNode),
}

/// One statement in a procedural statement list. `CoverageIncrement` is the
/// variant the pass inserts; every other variant is part of the input tree.
#[derive(Debug, Clone, PartialEq)]
pub enum StmtNode {
    /// An `always`/`initial`/`final` procedure.
    Block(BlockNode),
    /// A `for`/`while`/`repeat`-style loop body.
    Loop(LoopNode),
    /// A non-foreign task or function body.
    TaskFunc(TaskFuncNode),
    If(IfNode),
    Case(CaseNode),
    UserCover(UserCoverNode),
    /// A `$stop`/`$finish`-like terminator.
    Stop(SourceLoc),
    /// A coverage-off pragma; removed from the tree once visited.
    PragmaOff(SourceLoc),
    NamedBlock(NamedBlockNode),
    /// A declaration of a process-local variable; never toggle-eligible.
    LocalVarDecl(VarNode),
    /// Any other leaf statement (assignment, display, etc.) carrying only a
    /// source position.
    Plain(SourceLoc),
    /// Inserted by the pass.
    CoverageIncrement(CoverageIncrementNode),
}

#[derive(Debug, Clone, PartialEq)]
pub struct BlockNode {
    pub loc: SourceLoc,
    pub stmts: Vec<StmtNode>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoopNode {
    pub loc: SourceLoc,
    pub stmts: Vec<StmtNode>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TaskFuncNode {
    pub loc: SourceLoc,
    pub is_foreign: bool,
    pub stmts: Vec<StmtNode>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfNode {
    pub id: NodeId,
    pub loc: SourceLoc,
    pub then_stmts: Vec<StmtNode>,
    pub else_stmts: Vec<StmtNode>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CaseItemNode {
    pub loc: SourceLoc,
    pub stmts: Vec<StmtNode>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CaseNode {
    pub loc: SourceLoc,
    pub items: Vec<CaseItemNode>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UserCoverNode {
    pub loc: SourceLoc,
    pub stmts: Vec<StmtNode>,
    /// Set by the pass the first time it attaches an increment; a
    /// pre-existing increment (already attached upstream) is left alone.
    pub increment: Option<CoverageIncrementNode>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NamedBlockNode {
    pub loc: SourceLoc,
    pub name: Option<String>,
    pub stmts: Vec<StmtNode>,
}

/// A module (or the synthesized top-level shell).
#[derive(Debug, Clone, PartialEq)]
pub struct ModuleNode {
    pub name: String,
    pub pretty_name: String,
    pub file: String,
    pub is_top_shell: bool,
    pub is_class: bool,
    pub vars: Vec<VarNode>,
    pub stmts: Vec<StmtNode>,
    pub generated: Vec<GeneratedItem>,
}

impl ModuleNode {
    pub fn new(name: impl Into<String>, file: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            pretty_name: name.clone(),
            name,
            file: file.into(),
            is_top_shell: false,
            is_class: false,
            vars: Vec::new(),
            stmts: Vec::new(),
            generated: Vec::new(),
        }
    }
}

/// The elaborated netlist: a flat list of modules.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NetlistNode {
    pub modules: Vec<ModuleNode>,
}

impl fmt::Display for NetlistNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "netlist({} modules)", self.modules.len())
    }
}

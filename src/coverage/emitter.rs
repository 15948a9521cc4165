//! Instrumentation emitter (spec §4.5).

use crate::ast::types::{AssignNode, CoverageDeclNode, CoverageIncrementNode, ExprNode, ModuleTempNode, DataTypeNode, GeneratedItem};
use crate::options::Options;

use super::trace_name;
use super::trace_name::VarNameMap;

/// The four page prefixes a descriptor can be tagged with (spec §6).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PagePrefix {
    Line,
    Branch,
    Toggle,
    User,
}

impl PagePrefix {
    pub fn as_str(self) -> &'static str {
        match self {
            PagePrefix::Line => "v_line",
            PagePrefix::Branch => "v_branch",
            PagePrefix::Toggle => "v_toggle",
            PagePrefix::User => "v_user",
        }
    }
}

/// Builds a `page_name = page_prefix + "/" + module_pretty_name` descriptor
/// and the increment node referring to it, optionally chaining a
/// trace-coverage temporary and its increment assignment, and — when a
/// trace variable was created — appends it to the module's generated
/// items. Returns the increment; callers attach it to whatever statement
/// list is appropriate for their coverage family (spec §4.5).
#[allow(clippy::too_many_arguments)]
pub fn emit(
    module: &mut crate::ast::types::ModuleNode,
    var_names: &mut VarNameMap,
    options: &Options,
    page_prefix: PagePrefix,
    comment: impl Into<String>,
    lines: String,
    column: u8,
    hier: &str,
    file: &str,
    line: u32,
    type_tag: &str,
) -> CoverageIncrementNode {
    let page = format!("{}/{}", page_prefix.as_str(), module.pretty_name);
    let decl = CoverageDeclNode {
        page,
        comment: comment.into(),
        lines,
        column,
        hier: hier.to_string(),
    };

    let trace_assign = if options.trace_coverage && !module.is_class {
        let temp_name = trace_name::synthesize(var_names, hier, page_prefix, file, line, type_tag);
        let temp = ModuleTempNode {
            name: temp_name.clone(),
            data_type: DataTypeNode::RangedScalar { hi: 31, lo: 0 },
            traceable: true,
        };
        module.generated.push(GeneratedItem::TraceVar(temp));
        Some(AssignNode {
            target: ExprNode::var_ref(&temp_name),
            value: ExprNode::Add {
                lhs: Box::new(ExprNode::var_ref(&temp_name)),
                rhs: Box::new(ExprNode::Const(1)),
            },
        })
    } else {
        None
    };

    CoverageIncrementNode { decl, trace_assign }
}

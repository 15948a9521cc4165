//! Toggle expander and variable-ignore filter (spec §4.4).

use crate::ast::types::{
    CoverageToggleNode, DataTypeNode, ExprNode, GeneratedItem, ModuleNode, ModuleTempNode, VarNode,
};
use crate::options::Options;

use super::emitter::{self, PagePrefix};
use super::errors::CoverageError;
use super::trace_name::{self, VarNameMap};

/// One decomposed scalar-bit leaf: the access-path comment suffix (e.g.
/// `"[3]"`, `".a[1]"`) and the two expressions reaching that bit in the
/// signal and in its shadow companion.
///
/// The spec frames this triple (`ToggleEnt`) as an owned resource that must
/// be explicitly released if destroyed unconsumed. In Rust, `value_expr`
/// and `change_expr` are owned `ExprNode` trees; moving a `ToggleEnt` out of
/// scope without reading its fields simply drops them — there is no
/// separate release step to forget.
#[derive(Debug, Clone, PartialEq)]
pub struct ToggleEnt {
    pub comment_suffix: String,
    pub value_expr: ExprNode,
    pub change_expr: ExprNode,
}

/// Eligibility filter on a signal declaration (spec §4.4).
pub fn is_eligible(var: &VarNode, options: &Options) -> Result<bool, CoverageError> {
    if !var.kind.is_togglable() {
        return Ok(false);
    }
    if !options.coverage_underscore && (var.name.starts_with('_') || var.name.contains("._")) {
        return Ok(false);
    }
    let bits = var.data_type.total_toggle_bits()?;
    if bits > options.coverage_max_width {
        return Ok(false);
    }
    Ok(true)
}

/// Recursively decomposes `data_type` into scalar-bit leaves, per the type
/// class table in spec §4.4.
fn expand(
    data_type: &DataTypeNode,
    value_expr: &ExprNode,
    change_expr: &ExprNode,
    path: &str,
) -> Result<Vec<ToggleEnt>, CoverageError> {
    match data_type {
        DataTypeNode::RangedScalar { hi, lo } => {
            let (lo, hi) = (*lo, *hi);
            let mut out = Vec::new();
            for i in lo..=hi {
                let bit = i - lo;
                out.push(ToggleEnt {
                    comment_suffix: format!("{}[{}]", path, i),
                    value_expr: value_expr.clone().bit_sel(bit),
                    change_expr: change_expr.clone().bit_sel(bit),
                });
            }
            Ok(out)
        }
        DataTypeNode::UnrangedScalar => Ok(vec![ToggleEnt {
            comment_suffix: path.to_string(),
            value_expr: value_expr.clone(),
            change_expr: change_expr.clone(),
        }]),
        DataTypeNode::UnpackedArray { lo, hi, element } => {
            let mut out = Vec::new();
            for i in *lo..=*hi {
                out.extend(expand(
                    element,
                    &value_expr.clone().array_sel(i),
                    &change_expr.clone().array_sel(i),
                    &format!("{}[{}]", path, i),
                )?);
            }
            Ok(out)
        }
        DataTypeNode::PackedArray { lo, hi, element } => {
            let width = element.total_toggle_bits()?;
            let mut out = Vec::new();
            for i in *lo..=*hi {
                let offset = (i - lo).unsigned_abs() * width;
                out.extend(expand(
                    element,
                    &value_expr.clone().bit_slice(offset, width),
                    &change_expr.clone().bit_slice(offset, width),
                    &format!("{}[{}]", path, i),
                )?);
            }
            Ok(out)
        }
        DataTypeNode::PackedStruct { members } => {
            let mut out = Vec::new();
            let mut offset = 0u32;
            for member in members {
                let width = member.data_type.total_toggle_bits()?;
                out.extend(expand(
                    &member.data_type,
                    &value_expr.clone().bit_slice(offset, width),
                    &change_expr.clone().bit_slice(offset, width),
                    &format!("{}.{}", path, member.name),
                )?);
                offset += width;
            }
            Ok(out)
        }
        DataTypeNode::UnpackedStruct { members } => {
            // Open question (spec §9): both child accesses are derived from
            // `value_expr`, not one from `value_expr` and one from
            // `change_expr`. Replicated faithfully rather than "fixed".
            let mut out = Vec::new();
            for member in members {
                out.extend(expand(
                    &member.data_type,
                    &value_expr.clone().struct_sel(&member.name),
                    &value_expr.clone().struct_sel(&member.name),
                    &format!("{}.{}", path, member.name),
                )?);
            }
            Ok(out)
        }
        DataTypeNode::Union { members } => {
            let first = members.first().ok_or(CoverageError::EmptyAggregate)?;
            let width = first.data_type.total_toggle_bits()?;
            expand(
                &first.data_type,
                &value_expr.clone().bit_slice(0, width),
                &change_expr.clone().bit_slice(0, width),
                &format!("{}.{}", path, first.name),
            )
        }
        DataTypeNode::Other => Err(CoverageError::UnsupportedDataType),
    }
}

/// Instruments one eligible signal: synthesizes its shadow variable and
/// attaches one `coverage-toggle` node per scalar-bit leaf to the module
/// (spec §4.4). Callers are expected to have already checked
/// [`is_eligible`].
pub fn instrument(
    module: &mut ModuleNode,
    var: &VarNode,
    var_names: &mut VarNameMap,
    options: &Options,
) -> Result<(), CoverageError> {
    let shadow_name = format!("__Vtogcov__{}", trace_name::sanitize(&var.name));
    module.generated.push(GeneratedItem::ShadowVar(ModuleTempNode {
        name: shadow_name.clone(),
        data_type: var.data_type.clone(),
        traceable: false,
    }));

    let value_expr = ExprNode::var_ref(&var.name);
    let change_expr = ExprNode::var_ref(&shadow_name);
    let leaves = expand(&var.data_type, &value_expr, &change_expr, "")?;

    for leaf in leaves {
        let comment = format!("{}{}", var.name, leaf.comment_suffix);
        let increment = emitter::emit(
            module,
            var_names,
            options,
            PagePrefix::Toggle,
            comment,
            String::new(),
            0,
            "",
            &var.loc.file,
            var.loc.first_line,
            "toggle",
        );
        module.generated.push(GeneratedItem::Toggle(CoverageToggleNode {
            increment,
            value_expr: leaf.value_expr,
            change_expr: leaf.change_expr,
        }));
    }

    Ok(())
}

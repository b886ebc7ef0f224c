//! Recognizes `err != nil` comparisons and the branch they guard.

use retnonnilerr_ir::cfg::Cfg;
use retnonnilerr_ir::ir::{BasicBlock, ValueKind};
use retnonnilerr_ir::types::ErrorType;
use retnonnilerr_ir::values::{CompareOp, InstrView, Operand};

/// A qualifying comparison: `x != y` where one side has type `error` and the
/// other side is the nil `error` constant.
///
/// `var err error; if err != nil` lowers to `nil:error != nil:error`, so both
/// sides may be the constant.
pub fn is_nil_error_check(view: &InstrView, error_type: &ErrorType) -> bool {
    let InstrView::Compare {
        op: CompareOp::Neq,
        x,
        y,
        ..
    } = view
    else {
        return false;
    };
    (is_error_value(x, error_type) && is_nil_error(y, error_type))
        || (is_error_value(y, error_type) && is_nil_error(x, error_type))
}

fn is_error_value(operand: &Operand, error_type: &ErrorType) -> bool {
    operand.has_type(|t| error_type.is(t))
}

/// The nil constant's type must be `error` when the bridge reports one.
fn is_nil_error(operand: &Operand, error_type: &ErrorType) -> bool {
    operand.is_nil && operand.type_id.map_or(true, |t| error_type.is(t))
}

/// Block entered when the comparison `compare_id` in `block` holds.
///
/// If `block` ends in an `If` on some other value, the comparison does not
/// drive the branch and there is no candidate.
pub fn candidate_block<'a>(
    cfg: &Cfg<'a>,
    block: &BasicBlock,
    compare_id: u32,
) -> Option<&'a BasicBlock> {
    if let Some(term) = block.terminator() {
        if term.kind == ValueKind::If && term.operands.first() != Some(&compare_id) {
            tracing::debug!(
                block = block.id,
                compare = compare_id,
                "comparison does not drive the block's branch"
            );
            return None;
        }
    }
    let target = cfg.true_successor(block.id);
    if target.is_none() {
        tracing::debug!(block = block.id, "no successor for nil-error branch");
    }
    target
}

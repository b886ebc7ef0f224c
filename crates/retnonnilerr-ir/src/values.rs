//! Operand resolution and a typed view over instruction kinds.
//!
//! Bridge instructions are flat records tagged with a `ValueKind`. Passes that
//! only care about a few kinds match on [`InstrView`] instead, with operands
//! already resolved to their static type and nil-constant status.

use std::collections::HashMap;

use crate::ir::{Function, Instruction, ValueKind};

/// Comparison operators of `go/token` as they appear in `bin_op`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eql,
    Neq,
    Lss,
    Leq,
    Gtr,
    Geq,
}

impl CompareOp {
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "==" => Some(Self::Eql),
            "!=" => Some(Self::Neq),
            "<" => Some(Self::Lss),
            "<=" => Some(Self::Leq),
            ">" => Some(Self::Gtr),
            ">=" => Some(Self::Geq),
            _ => None,
        }
    }
}

/// A resolved operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Operand {
    pub id: u32,
    /// Static type, `None` when neither the bridge nor the defining
    /// instruction provides one.
    pub type_id: Option<u32>,
    /// The operand is a nil constant (`nil:T` in go/ssa).
    pub is_nil: bool,
}

impl Operand {
    pub fn has_type(&self, pred: impl Fn(u32) -> bool) -> bool {
        self.type_id.is_some_and(pred)
    }
}

/// The instruction kinds the return-path checks distinguish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstrView {
    /// `x op y` for a comparison operator.
    Compare {
        id: u32,
        op: CompareOp,
        x: Operand,
        y: Operand,
    },
    /// `if cond goto T else F`.
    If { cond: u32 },
    /// `return results...`
    Return { results: Vec<Operand> },
    Other,
}

/// Value id → defining instruction, for one function.
pub struct ValueTable<'a> {
    defs: HashMap<u32, &'a Instruction>,
}

impl<'a> ValueTable<'a> {
    pub fn for_function(func: &'a Function) -> Self {
        let defs = func
            .blocks
            .iter()
            .flat_map(|b| b.instructions.iter())
            .map(|instr| (instr.id, instr))
            .collect();
        Self { defs }
    }

    pub fn def(&self, id: u32) -> Option<&'a Instruction> {
        self.defs.get(&id).copied()
    }

    /// Resolve operand `idx` of `instr`.
    pub fn operand(&self, instr: &Instruction, idx: usize) -> Option<Operand> {
        let id = *instr.operands.get(idx)?;
        let def = self.def(id);
        let type_id = instr
            .operand_types
            .get(idx)
            .copied()
            .or_else(|| def.map(|d| d.type_id));
        let is_nil = instr.nil_operand_indices.contains(&idx)
            || def.is_some_and(|d| d.kind == ValueKind::Const && d.is_nil);
        Some(Operand {
            id,
            type_id,
            is_nil,
        })
    }

    pub fn view(&self, instr: &Instruction) -> InstrView {
        match instr.kind {
            ValueKind::BinOp => {
                let Some(op) = instr.bin_op.as_deref().and_then(CompareOp::from_token) else {
                    return InstrView::Other;
                };
                if instr.operands.len() != 2 {
                    return InstrView::Other;
                }
                match (self.operand(instr, 0), self.operand(instr, 1)) {
                    (Some(x), Some(y)) => InstrView::Compare {
                        id: instr.id,
                        op,
                        x,
                        y,
                    },
                    _ => InstrView::Other,
                }
            }
            ValueKind::If => match instr.operands.first() {
                Some(&cond) => InstrView::If { cond },
                None => InstrView::Other,
            },
            ValueKind::Return => InstrView::Return {
                results: (0..instr.operands.len())
                    .filter_map(|idx| self.operand(instr, idx))
                    .collect(),
            },
            _ => InstrView::Other,
        }
    }
}

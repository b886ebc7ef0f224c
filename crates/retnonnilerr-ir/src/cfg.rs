//! CFG navigation helpers over deserialized bridge data.
//!
//! The bridge emits `cfg_edges` in go/ssa `Succs` order. For a block ending
//! in `If`, go/ssa guarantees `Succs[0]` is the branch taken when the
//! condition holds; bridges that label edges mark it `CondTrue`.

use crate::ir::{BasicBlock, EdgeKind, Function};
use std::collections::HashMap;

/// A traversable view of a function's CFG
pub struct Cfg<'a> {
    func: &'a Function,
    successors: HashMap<u32, Vec<(u32, &'a EdgeKind)>>,
    block_map: HashMap<u32, &'a BasicBlock>,
}

impl<'a> Cfg<'a> {
    /// Build traversal indices from a deserialized function
    pub fn from_function(func: &'a Function) -> Self {
        let mut successors: HashMap<u32, Vec<(u32, &EdgeKind)>> = HashMap::new();
        let mut block_map = HashMap::new();

        for block in &func.blocks {
            block_map.insert(block.id, block);
            successors.entry(block.id).or_default();
        }

        for edge in &func.cfg_edges {
            successors
                .entry(edge.from_block)
                .or_default()
                .push((edge.to_block, &edge.kind));
        }

        Self {
            func,
            successors,
            block_map,
        }
    }

    /// Get block by ID
    pub fn block(&self, id: u32) -> Option<&'a BasicBlock> {
        self.block_map.get(&id).copied()
    }

    /// Successors of a block, in declaration order
    pub fn successors(&self, block_id: u32) -> &[(u32, &'a EdgeKind)] {
        self.successors
            .get(&block_id)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Block taken when the conditional ending `block_id` holds.
    ///
    /// Prefers an explicit `CondTrue` edge, otherwise the first successor.
    pub fn true_successor(&self, block_id: u32) -> Option<&'a BasicBlock> {
        let succs = self.successors(block_id);
        let target = succs
            .iter()
            .find(|(_, kind)| **kind == EdgeKind::CondTrue)
            .or_else(|| succs.first())
            .map(|&(id, _)| id)?;
        self.block(target)
    }

    /// All blocks in the CFG
    pub fn blocks(&self) -> impl Iterator<Item = &'a BasicBlock> {
        self.func.blocks.iter()
    }
}

//! Return-site checker: scans the returns of one candidate block.

use serde::{Deserialize, Serialize};

use retnonnilerr_diagnostics::diagnostic::Reporter;
use retnonnilerr_ir::ir::{BasicBlock, Instruction};
use retnonnilerr_ir::types::ErrorType;
use retnonnilerr_ir::values::{InstrView, ValueTable};

use crate::rules;
use crate::suppression::SuppressionIndex;

/// What a suppressed return does to the rest of its block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuppressionMode {
    /// Stop scanning the block at the first suppressed return.
    #[default]
    StopBlock,
    /// Skip only the suppressed return.
    SkipReturn,
}

impl std::str::FromStr for SuppressionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "stop_block" | "stop-block" => Ok(Self::StopBlock),
            "skip_return" | "skip-return" => Ok(Self::SkipReturn),
            other => Err(format!("unknown suppression mode: {other}")),
        }
    }
}

impl std::fmt::Display for SuppressionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::StopBlock => write!(f, "stop_block"),
            Self::SkipReturn => write!(f, "skip_return"),
        }
    }
}

/// Per-function state shared by every candidate block.
pub struct ReturnSiteChecker<'a> {
    pub values: &'a ValueTable<'a>,
    pub error_type: &'a ErrorType,
    pub suppressions: &'a SuppressionIndex,
    /// File of the function being checked; suppressions are looked up here.
    pub file: &'a str,
    pub func_name: &'a str,
    pub mode: SuppressionMode,
}

impl ReturnSiteChecker<'_> {
    /// Report every return of `block` that drops the error tested by
    /// `compare`. Successor blocks are not visited. Returns the number of
    /// diagnostics reported.
    pub fn check_block(
        &self,
        block: &BasicBlock,
        compare: &Instruction,
        reporter: &mut dyn Reporter,
    ) -> usize {
        let mut reported = 0;
        for instr in &block.instructions {
            let InstrView::Return { results } = self.values.view(instr) else {
                continue;
            };

            let has_err = results
                .iter()
                .any(|r| !r.is_nil && r.has_type(|t| self.error_type.is(t)));

            if self.suppressions.is_suppressed(self.file, instr.line()) {
                tracing::debug!(
                    file = self.file,
                    line = instr.line(),
                    mode = %self.mode,
                    "return suppressed"
                );
                match self.mode {
                    SuppressionMode::StopBlock => break,
                    SuppressionMode::SkipReturn => continue,
                }
            }

            if !results.is_empty() && !has_err {
                reporter.report(rules::build_ret001(instr, compare, self.func_name, self.file));
                reported += 1;
            }
        }
        reported
    }
}

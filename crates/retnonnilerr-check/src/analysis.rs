//! Analysis driver: walks every function of a package, finds `err != nil`
//! branches and hands their true target to the return-site checker.

use std::collections::HashSet;

use retnonnilerr_diagnostics::diagnostic::{Diagnostic, Reporter};
use retnonnilerr_ir::cfg::Cfg;
use retnonnilerr_ir::ir::{AnalysisInput, Function, Package};
use retnonnilerr_ir::types::{ErrorType, TypeMap};
use retnonnilerr_ir::values::ValueTable;

use crate::checker::{ReturnSiteChecker, SuppressionMode};
use crate::detector;
use crate::suppression::{SuppressionIndex, IGNORE_MARKER};

/// Knobs for one run of the pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckOptions {
    /// Comment substring that suppresses the next line. Empty disables.
    pub ignore_marker: String,
    pub suppression: SuppressionMode,
    /// Skip functions declared in generated files. Off by default.
    pub skip_generated: bool,
}

impl Default for CheckOptions {
    fn default() -> Self {
        Self {
            ignore_marker: IGNORE_MARKER.to_string(),
            suppression: SuppressionMode::default(),
            skip_generated: false,
        }
    }
}

pub struct RetNonNilErrAnalyzer;

impl RetNonNilErrAnalyzer {
    pub fn analyze(ir: &AnalysisInput) -> Vec<Diagnostic> {
        Self::analyze_with_options(ir, &CheckOptions::default())
    }

    pub fn analyze_with_options(ir: &AnalysisInput, opts: &CheckOptions) -> Vec<Diagnostic> {
        let mut diags = Vec::new();
        for pkg in &ir.packages {
            Self::check_package(pkg, opts, &mut diags);
        }
        diags
    }

    /// Check a single package. The suppression index and the `error` type
    /// are rebuilt from this package alone.
    pub fn check_package(pkg: &Package, opts: &CheckOptions, reporter: &mut dyn Reporter) {
        let types = TypeMap::from_package(pkg);
        let Some(error_type) = ErrorType::resolve(&types) else {
            tracing::debug!(package = %pkg.import_path, "package never mentions `error`; skipping");
            return;
        };
        let suppressions = SuppressionIndex::build(&pkg.files, &opts.ignore_marker);
        let generated: HashSet<&str> = pkg
            .files
            .iter()
            .filter(|f| f.is_generated)
            .map(|f| f.path.as_str())
            .collect();

        let mut reported = 0;
        for func in &pkg.functions {
            if opts.skip_generated && generated.contains(func.file()) {
                tracing::debug!(function = %func.name, "skipping generated function");
                continue;
            }
            reported += Self::check_function(func, &error_type, &suppressions, opts, reporter);
        }
        tracing::debug!(
            package = %pkg.import_path,
            functions = pkg.functions.len(),
            suppressed_lines = suppressions.len(),
            reported,
            "retnonnilerr package done"
        );
    }

    fn check_function(
        func: &Function,
        error_type: &ErrorType,
        suppressions: &SuppressionIndex,
        opts: &CheckOptions,
        reporter: &mut dyn Reporter,
    ) -> usize {
        let cfg = Cfg::from_function(func);
        let values = ValueTable::for_function(func);
        let checker = ReturnSiteChecker {
            values: &values,
            error_type,
            suppressions,
            file: func.file(),
            func_name: &func.short_name,
            mode: opts.suppression,
        };

        let mut reported = 0;
        for block in cfg.blocks() {
            for instr in &block.instructions {
                let view = values.view(instr);
                if !detector::is_nil_error_check(&view, error_type) {
                    continue;
                }
                if let Some(target) = detector::candidate_block(&cfg, block, instr.id) {
                    reported += checker.check_block(target, instr, reporter);
                }
            }
        }
        reported
    }
}

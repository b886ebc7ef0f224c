//! Analysis orchestrator: loads bridge output, runs the pass, post-processes.

use crate::config::Config;
use retnonnilerr_check::RetNonNilErrAnalyzer;
use retnonnilerr_diagnostics::diagnostic::{Diagnostic, Severity};
use retnonnilerr_ir::ir::AnalysisInput;
use retnonnilerr_ir::IrError;
use std::path::Path;

/// Complete output from an analysis run.
#[derive(Debug, Clone)]
pub struct AnalysisOutput {
    pub diagnostics: Vec<Diagnostic>,
    pub summary: AnalysisSummary,
}

/// Summary statistics for the analysis.
#[derive(Debug, Clone, serde::Serialize)]
pub struct AnalysisSummary {
    pub total: usize,
    pub critical: usize,
    pub error: usize,
    pub warning: usize,
    pub info: usize,
    /// Diagnostics dropped by `max_diagnostics`.
    pub truncated: usize,
    pub packages_analyzed: usize,
    pub functions_analyzed: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum OrchestratorError {
    #[error(transparent)]
    Ir(#[from] IrError),
}

/// Load a bridge JSON file and analyze it.
pub fn analyze_file(path: &Path, config: &Config) -> Result<AnalysisOutput, OrchestratorError> {
    let ir = retnonnilerr_ir::load_json_file(path)?;
    Ok(analyze_ir(&ir, config))
}

/// Run the pass on already-loaded IR.
/// Used by both the CLI (after loading) and tests (from fixtures).
pub fn analyze_ir(ir: &AnalysisInput, config: &Config) -> AnalysisOutput {
    let mut all_diags = Vec::new();

    if config.rules.retnonnilerr.enabled {
        let opts = config.check_options();
        all_diags.extend(RetNonNilErrAnalyzer::analyze_with_options(ir, &opts));
    }

    postprocess_diagnostics(all_diags, config, ir)
}

/// Severity filter, sort, dedup, truncate, build summary.
///
/// A return reached from two `err != nil` checks is reported once per check
/// by the pass; reports with the same id and location collapse to the first.
fn postprocess_diagnostics(
    mut diags: Vec<Diagnostic>,
    config: &Config,
    ir: &AnalysisInput,
) -> AnalysisOutput {
    let threshold = parse_severity(&config.retnonnilerr.severity_threshold);
    diags.retain(|d| d.severity.is_at_least(threshold));

    diags.sort_by(|a, b| {
        a.location
            .file
            .cmp(&b.location.file)
            .then(a.location.line.cmp(&b.location.line))
            .then(a.location.column.cmp(&b.location.column))
            .then(b.severity.cmp(&a.severity))
    });
    diags.dedup_by(|a, b| a.id == b.id && a.location == b.location);

    let mut truncated = 0;
    let max = config.retnonnilerr.max_diagnostics;
    if max > 0 && diags.len() > max {
        truncated = diags.len() - max;
        diags.truncate(max);
    }

    let count = |sev: Severity| diags.iter().filter(|d| d.severity == sev).count();
    let summary = AnalysisSummary {
        total: diags.len(),
        critical: count(Severity::Critical),
        error: count(Severity::Error),
        warning: count(Severity::Warning),
        info: count(Severity::Info),
        truncated,
        packages_analyzed: ir.packages.len(),
        functions_analyzed: ir.function_count(),
    };
    tracing::info!(
        total = summary.total,
        truncated = summary.truncated,
        packages = summary.packages_analyzed,
        functions = summary.functions_analyzed,
        "analysis complete"
    );

    AnalysisOutput {
        diagnostics: diags,
        summary,
    }
}

/// Unknown names fall back to `warning`.
pub fn parse_severity(s: &str) -> Severity {
    s.parse().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "falling back to warning threshold");
        Severity::Warning
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use retnonnilerr_check::SuppressionMode;

    #[test]
    fn test_analyze_ir_fixture() {
        let ir = retnonnilerr_ir::load_bridge_fixture("retnonnilerr/a");
        let output = analyze_ir(&ir, &Config::default());
        assert_eq!(output.summary.total, 9);
        assert_eq!(output.summary.warning, 9);
        assert_eq!(output.summary.truncated, 0);
        assert_eq!(output.summary.packages_analyzed, 1);
        assert_eq!(output.summary.functions_analyzed, ir.function_count());
        assert!(output.diagnostics.iter().all(|d| d.rule == "RET001"));
    }

    #[test]
    fn test_analyze_ir_disabled() {
        let ir = retnonnilerr_ir::load_bridge_fixture("retnonnilerr/a");
        let mut config = Config::default();
        config.rules.retnonnilerr.enabled = false;
        let output = analyze_ir(&ir, &config);
        assert!(output.diagnostics.is_empty());
        assert_eq!(output.summary.total, 0);
    }

    #[test]
    fn test_analyze_ir_severity_filter() {
        let ir = retnonnilerr_ir::load_bridge_fixture("retnonnilerr/a");
        let mut config = Config::default();
        config.retnonnilerr.severity_threshold = "error".to_string();
        let output = analyze_ir(&ir, &config);
        assert!(output.diagnostics.is_empty(), "RET001 is a warning");

        config.retnonnilerr.severity_threshold = "info".to_string();
        assert_eq!(analyze_ir(&ir, &config).summary.total, 9);
    }

    #[test]
    fn test_analyze_ir_sorted_output() {
        let ir = retnonnilerr_ir::load_bridge_fixture("retnonnilerr/a");
        let output = analyze_ir(&ir, &Config::default());
        for w in output.diagnostics.windows(2) {
            let cmp = w[0]
                .location
                .file
                .cmp(&w[1].location.file)
                .then(w[0].location.line.cmp(&w[1].location.line));
            assert!(
                cmp != std::cmp::Ordering::Greater,
                "diagnostics should be sorted by file then line"
            );
        }
    }

    #[test]
    fn test_analyze_ir_truncates() {
        let ir = retnonnilerr_ir::load_bridge_fixture("retnonnilerr/a");
        let mut config = Config::default();
        config.retnonnilerr.max_diagnostics = 3;
        let output = analyze_ir(&ir, &config);
        assert_eq!(output.diagnostics.len(), 3);
        assert_eq!(output.summary.total, 3);
        assert_eq!(output.summary.truncated, 6);

        config.retnonnilerr.max_diagnostics = 0;
        let output = analyze_ir(&ir, &config);
        assert_eq!(output.summary.total, 9);
        assert_eq!(output.summary.truncated, 0);
    }

    #[test]
    fn test_analyze_ir_generated_and_suppression_settings() {
        let ir = retnonnilerr_ir::load_bridge_fixture("retnonnilerr/a");
        let mut config = Config::default();
        config.retnonnilerr.skip_generated = true;
        assert_eq!(analyze_ir(&ir, &config).summary.total, 8);

        let mut config = Config::default();
        config.rules.retnonnilerr.ignore_marker = String::new();
        assert_eq!(analyze_ir(&ir, &config).summary.total, 11);

        let mut config = Config::default();
        config.rules.retnonnilerr.suppression = SuppressionMode::SkipReturn;
        assert_eq!(analyze_ir(&ir, &config).summary.total, 9);
    }

    #[test]
    fn test_same_return_reported_twice_is_collapsed() {
        let ir = retnonnilerr_ir::load_bridge_fixture("retnonnilerr/a");
        let mut diags = RetNonNilErrAnalyzer::analyze(&ir);
        let mut second_check = diags[0].clone();
        if let Some(root) = second_check.root_cause.as_mut() {
            root.line += 2;
        }
        diags.push(second_check);
        assert_eq!(diags.len(), 10);

        let output = postprocess_diagnostics(diags, &Config::default(), &ir);
        assert_eq!(output.summary.total, 9);
        assert_eq!(output.diagnostics[0].root_cause.as_ref().unwrap().line, 13);
    }

    #[test]
    fn test_analyze_file_errors() {
        let err = analyze_file(Path::new("/nonexistent/ir.json"), &Config::default()).unwrap_err();
        assert!(matches!(err, OrchestratorError::Ir(IrError::Read { .. })));

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ir.json");
        std::fs::write(&path, "{\"packages\": 3}").unwrap();
        let err = analyze_file(&path, &Config::default()).unwrap_err();
        assert!(matches!(err, OrchestratorError::Ir(IrError::Parse(_))));
    }

    #[test]
    fn test_analyze_file_empty_input() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ir.json");
        std::fs::write(&path, r#"{"packages": [], "go_version": "go1.22.5"}"#).unwrap();
        let output = analyze_file(&path, &Config::default()).unwrap();
        assert!(output.diagnostics.is_empty());
        assert_eq!(output.summary.packages_analyzed, 0);
    }

    #[test]
    fn test_parse_severity() {
        assert_eq!(parse_severity("critical"), Severity::Critical);
        assert_eq!(parse_severity("error"), Severity::Error);
        assert_eq!(parse_severity("Warning"), Severity::Warning);
        assert_eq!(parse_severity("info"), Severity::Info);
        assert_eq!(parse_severity("unknown"), Severity::Warning);
    }
}

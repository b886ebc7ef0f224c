//! RET001 diagnostic construction.

use retnonnilerr_diagnostics::diagnostic::{Diagnostic, DiagnosticBuilder, Severity};
use retnonnilerr_ir::ir::{Instruction, Span};

pub const RULE_CODE: &str = "RET001";

pub const MESSAGE: &str =
    "`return err` should be included in this return stmt. you seem to be ignoring error handling";

/// RET001: a return inside an `err != nil` branch that drops the error.
///
/// `file` is used when the return itself has no position.
pub fn build_ret001(
    ret: &Instruction,
    compare: &Instruction,
    func_name: &str,
    file: &str,
) -> Diagnostic {
    let (ret_file, line, col, end_line, end_col) = extract_span(&ret.span, file);
    let (cmp_file, cmp_line, ..) = extract_span(&compare.span, file);
    DiagnosticBuilder::new(RULE_CODE, Severity::Warning, "error discarded on error path")
        .location(ret_file, line, col)
        .end_location(end_line, end_col)
        .confidence(0.9)
        .explanation(MESSAGE)
        .root_cause(cmp_file, cmp_line, "error checked here")
        .function(func_name)
        .build()
}

fn extract_span(span: &Option<Span>, file: &str) -> (String, u32, u32, u32, u32) {
    match span {
        Some(s) => (
            if s.file.is_empty() {
                file.to_string()
            } else {
                s.file.clone()
            },
            s.start_line,
            s.start_col,
            s.end_line.max(s.start_line),
            s.end_col,
        ),
        None => (file.to_string(), 0, 0, 0, 0),
    }
}

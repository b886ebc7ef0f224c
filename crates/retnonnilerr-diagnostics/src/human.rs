//! Human-readable diagnostic output formatters.
//!
//! `format_human` uses ariadne for rich terminal output with source context;
//! `format_text` is the one-line-per-finding form used by `go vet` drivers.

use crate::diagnostic::{Diagnostic, Severity};
use ariadne::{Color, Config, IndexType, Label, Report, ReportKind, Source};
use std::collections::HashMap;
use std::ops::Range;

/// Format diagnostics for human-readable terminal output.
///
/// Each report underlines the offending return and, when it lives in the same
/// file, the `err != nil` comparison that guards it. Findings whose source
/// cannot be read are printed in the one-line fallback form.
pub fn format_human(diags: &[Diagnostic], use_color: bool) -> String {
    if diags.is_empty() {
        return "No issues found\n".to_string();
    }

    let config = Config::default()
        .with_color(use_color)
        .with_index_type(IndexType::Byte);
    let mut sources: HashMap<&str, String> = HashMap::new();
    let mut output = Vec::with_capacity(diags.len() + 1);

    for diag in diags {
        let file = diag.location.file.as_str();
        let source = sources
            .entry(file)
            .or_insert_with(|| std::fs::read_to_string(file).unwrap_or_default());
        match render_report(diag, source, config) {
            Some(report) => output.push(report),
            None => output.push(format_fallback(diag)),
        }
    }

    output.push(format!("\nFound {} issue(s)\n", diags.len()));
    output.join("\n")
}

fn render_report(diag: &Diagnostic, source: &str, config: Config) -> Option<String> {
    let file = diag.location.file.as_str();
    let ret_span = line_span(source, diag.location.line, diag.location.column)?;
    let (kind, color) = match diag.severity {
        Severity::Critical | Severity::Error => (ReportKind::Error, Color::Red),
        Severity::Warning => (ReportKind::Warning, Color::Yellow),
        Severity::Info => (ReportKind::Advice, Color::Cyan),
    };

    let mut report = Report::build(kind, (file, ret_span.clone()))
        .with_config(config)
        .with_code(&diag.rule)
        .with_message(&diag.title)
        .with_label(
            Label::new((file, ret_span))
                .with_message(&diag.explanation)
                .with_color(color)
                .with_order(0),
        );

    if let Some(root) = &diag.root_cause {
        match line_span(source, root.line, 0).filter(|_| root.file == file) {
            Some(check_span) => {
                report = report.with_label(
                    Label::new((file, check_span))
                        .with_message(&root.description)
                        .with_color(Color::Blue)
                        .with_order(1),
                );
            }
            None => {
                report = report.with_note(format!(
                    "{} ({}:{})",
                    root.description, root.file, root.line
                ));
            }
        }
    }

    let mut buf = Vec::new();
    report
        .finish()
        .write((file, Source::from(source)), &mut buf)
        .ok()?;
    Some(String::from_utf8_lossy(&buf).into_owned())
}

/// `file:line:col: message`, one diagnostic per line.
pub fn format_text(diags: &[Diagnostic]) -> String {
    diags
        .iter()
        .map(|d| format!("{}: {}\n", d.location, d.explanation))
        .collect()
}

/// Byte range of 1-based `line` from `column` to the end of the line.
///
/// Column 0 starts at the first non-blank character. `None` when the line is
/// not in `source`.
fn line_span(source: &str, line: u32, column: u32) -> Option<Range<usize>> {
    let index = (line as usize).checked_sub(1)?;
    let mut start = 0;
    for text in source.split_inclusive('\n').take(index) {
        start += text.len();
    }
    if start >= source.len() {
        return None;
    }
    let body = source[start..].split('\n').next()?.trim_end_matches('\r');

    let mut col = match column {
        0 => body.len() - body.trim_start().len(),
        c => (c as usize - 1).min(body.len()),
    };
    while !body.is_char_boundary(col) {
        col -= 1;
    }
    let end = body.len().max(col + 1);
    Some(start + col..(start + end).min(source.len()))
}

/// Fallback format when source file is not available.
fn format_fallback(diag: &Diagnostic) -> String {
    format!(
        "{}: {} [{}] {}: {}\n",
        diag.location, diag.severity, diag.rule, diag.title, diag.explanation,
    )
}

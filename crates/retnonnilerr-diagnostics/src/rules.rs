//! Rule catalog.
//!
//! Single source of truth for rule metadata, shared by `explain` and the
//! SARIF driver section.

use serde::Serialize;

/// Information about a single analysis rule.
#[derive(Debug, Clone, Serialize)]
pub struct RuleInfo {
    pub code: String,
    pub name: String,
    pub description: String,
    pub severity: String,
    /// Example Go code that triggers this rule.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example_bad: Option<String>,
    /// Example Go code that is safe (does not trigger this rule).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example_good: Option<String>,
    /// Go idiom or best practice for avoiding this issue.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub go_idiom: Option<String>,
}

impl RuleInfo {
    /// Long-form text printed by `retnonnilerr explain`.
    pub fn explain(&self) -> String {
        let mut out = format!("{}: {}\n\n{}\n", self.code, self.name, self.description);
        if let Some(ref bad) = self.example_bad {
            out.push_str("\nExample:\n");
            for line in bad.lines() {
                out.push_str(&format!("  {line}\n"));
            }
        }
        if let Some(ref good) = self.example_good {
            out.push_str("\nFix:\n");
            for line in good.lines() {
                out.push_str(&format!("  {line}\n"));
            }
        }
        if let Some(ref idiom) = self.go_idiom {
            out.push_str(&format!("\n{idiom}\n"));
        }
        out
    }
}

/// Look up a single rule by code (case-insensitive, e.g. "ret001").
pub fn get_rule(code: &str) -> Option<RuleInfo> {
    get_all_rules()
        .into_iter()
        .find(|r| r.code.eq_ignore_ascii_case(code) || r.name == code)
}

/// Return all available analysis rules.
pub fn get_all_rules() -> Vec<RuleInfo> {
    vec![RuleInfo {
        code: "RET001".into(),
        name: "retnonnilerr".into(),
        description: concat!(
            "Inside an `if err != nil` branch the function returns without the error.\n",
            "Every returned value is nil, a zero value, or a non-error value, so the\n",
            "caller sees success. Suppress a deliberate case with\n",
            "`//lint:ignore retnonnilerr <reason>` on the line above the return."
        )
        .into(),
        severity: "warning".into(),
        example_bad: Some(
            "t, err := load()\nif err != nil {\n\treturn nil, nil\n}".into(),
        ),
        example_good: Some("t, err := load()\nif err != nil {\n\treturn nil, err\n}".into()),
        go_idiom: Some("Propagate (or wrap) the error you just checked".into()),
    }]
}

//! SARIF v2.1.0 output for code-scanning uploads.
//!
//! Only the subset this tool fills in is modelled: one run, the catalog
//! entries of the rules that fired, and one result per diagnostic whose
//! related location is the `err != nil` comparison.

use serde::Serialize;

use crate::diagnostic::{Diagnostic, Severity};
use crate::rules::{get_all_rules, RuleInfo};

const SCHEMA: &str = "https://json.schemastore.org/sarif-2.1.0.json";
const INFORMATION_URI: &str = "https://github.com/MokkeMeguru/retnonnilerr";

#[derive(Debug, Serialize)]
pub struct SarifLog<'a> {
    #[serde(rename = "$schema")]
    pub schema: &'static str,
    pub version: &'static str,
    pub runs: [SarifRun<'a>; 1],
}

#[derive(Debug, Serialize)]
pub struct SarifRun<'a> {
    pub tool: SarifTool<'a>,
    pub results: Vec<SarifResult<'a>>,
}

#[derive(Debug, Serialize)]
pub struct SarifTool<'a> {
    pub driver: SarifDriver<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SarifDriver<'a> {
    pub name: &'static str,
    pub version: &'a str,
    pub information_uri: &'static str,
    pub rules: Vec<SarifRule>,
}

/// Rule metadata, taken from the rule catalog.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SarifRule {
    pub id: String,
    pub name: String,
    pub short_description: Text<String>,
    pub full_description: Text<String>,
    pub default_configuration: Level,
}

#[derive(Debug, Serialize)]
pub struct Level {
    pub level: &'static str,
}

#[derive(Debug, Serialize)]
pub struct Text<T> {
    pub text: T,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SarifResult<'a> {
    pub rule_id: &'a str,
    pub level: &'static str,
    pub message: Text<&'a str>,
    pub locations: [SarifLocation<'a>; 1],
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub related_locations: Vec<SarifLocation<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SarifLocation<'a> {
    pub physical_location: PhysicalLocation<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<Text<&'a str>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PhysicalLocation<'a> {
    pub artifact_location: ArtifactLocation<'a>,
    pub region: Region,
}

#[derive(Debug, Serialize)]
pub struct ArtifactLocation<'a> {
    pub uri: &'a str,
}

/// 1-based start position. A column of 0 is left out.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Region {
    pub start_line: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_column: Option<u32>,
}

impl<'a> PhysicalLocation<'a> {
    fn at(uri: &'a str, line: u32, column: u32) -> Self {
        Self {
            artifact_location: ArtifactLocation { uri },
            region: Region {
                start_line: line,
                start_column: (column > 0).then_some(column),
            },
        }
    }
}

/// Pretty-printed SARIF JSON for `diagnostics`.
pub fn to_sarif(diagnostics: &[Diagnostic], version: &str) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&to_sarif_log(diagnostics, version))
}

pub fn to_sarif_log<'a>(diagnostics: &'a [Diagnostic], version: &'a str) -> SarifLog<'a> {
    let rules = get_all_rules()
        .into_iter()
        .filter(|rule| diagnostics.iter().any(|d| d.rule == rule.code))
        .map(catalog_rule)
        .collect();

    SarifLog {
        schema: SCHEMA,
        version: "2.1.0",
        runs: [SarifRun {
            tool: SarifTool {
                driver: SarifDriver {
                    name: "retnonnilerr",
                    version,
                    information_uri: INFORMATION_URI,
                    rules,
                },
            },
            results: diagnostics.iter().map(result_for).collect(),
        }],
    }
}

fn level(severity: Severity) -> &'static str {
    match severity {
        Severity::Critical | Severity::Error => "error",
        Severity::Warning => "warning",
        Severity::Info => "note",
    }
}

fn catalog_rule(rule: RuleInfo) -> SarifRule {
    let severity = rule.severity.parse().unwrap_or(Severity::Warning);
    let short = rule.go_idiom.unwrap_or_else(|| rule.name.clone());
    SarifRule {
        id: rule.code,
        name: rule.name,
        short_description: Text { text: short },
        full_description: Text {
            text: rule.description,
        },
        default_configuration: Level {
            level: level(severity),
        },
    }
}

fn result_for(diag: &Diagnostic) -> SarifResult<'_> {
    let message: &str = if diag.explanation.is_empty() {
        &diag.title
    } else {
        &diag.explanation
    };
    let related_locations = diag
        .root_cause
        .iter()
        .map(|rc| SarifLocation {
            physical_location: PhysicalLocation::at(&rc.file, rc.line, 0),
            message: Some(Text {
                text: rc.description.as_str(),
            }),
        })
        .collect();

    SarifResult {
        rule_id: &diag.rule,
        level: level(diag.severity),
        message: Text { text: message },
        locations: [SarifLocation {
            physical_location: PhysicalLocation::at(
                &diag.location.file,
                diag.location.line,
                diag.location.column,
            ),
            message: None,
        }],
        related_locations,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::DiagnosticBuilder;

    fn make_test_diag(file: &str, line: u32) -> Diagnostic {
        DiagnosticBuilder::new("RET001", Severity::Warning, "error discarded on error path")
            .location(file, line, 3)
            .explanation("`return err` should be included in this return stmt")
            .root_cause(file, line - 1, "error checked here")
            .build()
    }

    #[test]
    fn test_empty_run() {
        let log = to_sarif_log(&[], "0.1.0");
        assert_eq!(log.version, "2.1.0");
        assert_eq!(log.runs[0].tool.driver.name, "retnonnilerr");
        assert_eq!(log.runs[0].tool.driver.version, "0.1.0");
        assert!(log.runs[0].tool.driver.rules.is_empty());
        assert!(log.runs[0].results.is_empty());
    }

    #[test]
    fn test_result_mapping() {
        let diags = [make_test_diag("handler.go", 18)];
        let log = to_sarif_log(&diags, "0.1.0");
        let result = &log.runs[0].results[0];
        assert_eq!(result.rule_id, "RET001");
        assert_eq!(result.level, "warning");
        assert_eq!(result.locations[0].physical_location.region.start_line, 18);
        assert_eq!(result.locations[0].physical_location.region.start_column, Some(3));

        let related = &result.related_locations[0];
        assert_eq!(related.physical_location.region.start_line, 17);
        assert_eq!(related.physical_location.region.start_column, None);
        assert_eq!(related.message.as_ref().unwrap().text, "error checked here");
    }

    #[test]
    fn test_level_mapping() {
        assert_eq!(level(Severity::Critical), "error");
        assert_eq!(level(Severity::Error), "error");
        assert_eq!(level(Severity::Warning), "warning");
        assert_eq!(level(Severity::Info), "note");
    }

    #[test]
    fn test_rules_listed_once_from_catalog() {
        let diags = [make_test_diag("a.go", 14), make_test_diag("c.go", 7)];
        let log = to_sarif_log(&diags, "0.1.0");
        let rules = &log.runs[0].tool.driver.rules;
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].id, "RET001");
        assert_eq!(rules[0].name, "retnonnilerr");
        assert_eq!(rules[0].default_configuration.level, "warning");
        assert!(rules[0].full_description.text.contains("lint:ignore retnonnilerr"));
    }

    #[test]
    fn test_message_falls_back_to_title() {
        let diag = DiagnosticBuilder::new("RET001", Severity::Warning, "error dropped")
            .location("a.go", 3, 1)
            .build();
        let diags = [diag];
        let log = to_sarif_log(&diags, "0.1.0");
        let result = &log.runs[0].results[0];
        assert_eq!(result.message.text, "error dropped");
        assert!(result.related_locations.is_empty());
    }

    #[test]
    fn test_json_shape() {
        let json = to_sarif(&[make_test_diag("main.go", 10)], "0.1.0").unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["$schema"], SCHEMA);
        assert_eq!(parsed["runs"][0]["tool"]["driver"]["informationUri"], INFORMATION_URI);
        let result = &parsed["runs"][0]["results"][0];
        assert_eq!(result["ruleId"], "RET001");
        assert_eq!(
            result["locations"][0]["physicalLocation"],
            serde_json::json!({
                "artifactLocation": { "uri": "main.go" },
                "region": { "startLine": 10, "startColumn": 3 }
            })
        );
        assert_eq!(
            result["relatedLocations"][0]["physicalLocation"]["region"],
            serde_json::json!({ "startLine": 9 })
        );
    }
}

//! retnonnilerr IR: intermediate representation for Go code analysis.
//!
//! The IR is built by the Go compiler frontend (the bridge: go/packages +
//! go/ssa) and deserialized in Rust from JSON. This crate provides:
//! - High-level IR wrappers matching the bridge output
//! - CFG navigation helpers
//! - Type system helpers
//! - Operand resolution and a typed instruction view

pub mod cfg; // CFG navigation helpers
pub mod ir; // High-level IR wrappers
pub mod types; // Type system helpers
pub mod values; // Operand resolution

use std::path::Path;

/// Errors from loading bridge output.
#[derive(Debug, thiserror::Error)]
pub enum IrError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid bridge JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Load a bridge JSON file and convert it to the owned IR.
pub fn load_json_file(path: &Path) -> Result<ir::AnalysisInput, IrError> {
    let data = std::fs::read_to_string(path).map_err(|source| IrError::Read {
        path: path.display().to_string(),
        source,
    })?;
    let ir = ir::AnalysisInput::from_json(&data)?;
    tracing::debug!(
        path = %path.display(),
        packages = ir.packages.len(),
        functions = ir.function_count(),
        "loaded bridge output"
    );
    Ok(ir)
}

/// Load a bridge fixture file from `tests/bridge_fixtures/` by name.
/// The fixture file should have a `.json` extension.
///
/// This is available in test builds and when the `test-fixtures` feature is enabled.
#[cfg(any(test, feature = "test-fixtures"))]
pub fn load_bridge_fixture(name: &str) -> ir::AnalysisInput {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    let fixture_path = manifest_dir
        .join("../../tests/bridge_fixtures")
        .join(format!("{name}.json"));
    load_json_file(&fixture_path).unwrap_or_else(|e| panic!("failed to load fixture {name}: {e}"))
}

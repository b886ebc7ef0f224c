//! retnonnilerr - flags `if err != nil` branches that return without the error

pub mod analysis;
pub mod checker;
pub mod detector;
pub mod rules;
pub mod suppression;

pub use analysis::{CheckOptions, RetNonNilErrAnalyzer};
pub use checker::SuppressionMode;

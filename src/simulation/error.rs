//! Simulation error types.

use thiserror::Error;

use crate::config::ParseError;
use crate::diagnostics::{Diagnostic, ValidationResult};

/// Why a simulation could not run.
///
/// Only hard failures end up here; recoverable issues become warnings on
/// the result instead.
#[derive(Debug, Error)]
pub enum SimulationError {
    /// The configuration text is not well-formed.
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// The configuration parsed but failed validation.
    #[error("Invalid configuration: {}", summarize(.0))]
    Invalid(ValidationResult),

    /// The request JSON does not describe a request.
    #[error("Invalid request: {0}")]
    Request(#[from] serde_json::Error),
}

impl SimulationError {
    /// Every diagnostic explaining the failure; never empty.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        match self {
            SimulationError::Parse(e) => vec![e.to_diagnostic()],
            SimulationError::Invalid(result) => result.errors.clone(),
            SimulationError::Request(e) => {
                vec![Diagnostic::error("invalid_request", e.to_string())]
            }
        }
    }
}

fn summarize(result: &ValidationResult) -> String {
    result
        .errors
        .iter()
        .map(|d| d.message.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

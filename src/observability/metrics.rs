//! Metrics collection.
//!
//! # Metrics
//! - `playground_validations_total` (counter): validations by outcome
//!   (`valid`, `invalid`, `parse_error`)
//! - `playground_simulations_total` (counter): simulations by outcome
//!   (`matched`, `no_match`, `invalid`, `parse_error`, `bad_request`)
//!
//! # Design Decisions
//! - Facade only; no exporter is bundled
//! - Labels are a small closed set to keep cardinality flat

pub const VALIDATIONS_TOTAL: &str = "playground_validations_total";
pub const SIMULATIONS_TOTAL: &str = "playground_simulations_total";

/// Record the outcome of one `validate` call.
pub fn record_validation(outcome: &'static str) {
    metrics::counter!(VALIDATIONS_TOTAL, "outcome" => outcome).increment(1);
}

/// Record the outcome of one `simulate` call.
pub fn record_simulation(outcome: &'static str) {
    metrics::counter!(SIMULATIONS_TOTAL, "outcome" => outcome).increment(1);
}

//! Simulation subsystem.
//!
//! # Data Flow
//! ```text
//! simulate(config text, request JSON)
//!     → config::parse            (ParseError aborts)
//!     → config::validate_semantics (errors abort with the same diagnostics)
//!     → request.rs               (JSON → SimulatedRequest)
//!     → routing::match_routes    (winner + full trace)
//!     → policy::resolve_policy   (always total)
//!     → load_balancer::select_target (if the winner has an upstream)
//!     → agents::plan_hooks       (if a route won)
//!     → result.rs assemble       (SimulationResult)
//! ```
//!
//! # Design Decisions
//! - Each stage returns a value; only the first two can fail
//! - Recoverable issues become warnings on the result

pub mod engine;
pub mod error;
pub mod request;
pub mod result;

pub use engine::{run_simulation, simulate, simulate_request, validate};
pub use error::SimulationError;
pub use request::{create_sample_request, HeaderMap, RequestTemplate, SimulatedRequest};
pub use result::{
    assemble, MatchResult, RouteSummary, SimulationResult, TraceStep, UpstreamSelection,
};

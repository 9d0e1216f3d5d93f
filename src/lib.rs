//! Gateway Playground Library
//!
//! Validates gateway routing configurations and simulates how a single
//! request would be routed, explaining every decision along the way. Nothing
//! touches the network and no hook is ever executed.
//!
//! # Example
//!
//! ```
//! let config = r#"
//!     [[routes]]
//!     id = "api"
//!     upstream = "backend"
//!     match = { methods = ["GET"], path_prefix = "/api" }
//!
//!     [upstreams.backend]
//!     targets = [{ address = "10.0.0.1:8080" }, { address = "10.0.0.2:8080" }]
//! "#;
//!
//! assert!(gateway_playground::validate(config).unwrap().valid);
//!
//! let request = gateway_playground::create_sample_request("GET", "example.com", "/api/users");
//! let result = gateway_playground::simulate_request(config, &request).unwrap();
//! assert_eq!(result.matched_route.unwrap().id, "api");
//! assert_eq!(result.upstream_selection.unwrap().selected_target, "10.0.0.1:8080");
//! ```

// Core subsystems
pub mod config;
pub mod diagnostics;
pub mod routing;
pub mod simulation;

// Decision stages
pub mod agents;
pub mod load_balancer;
pub mod policy;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use config::{parse, validate_semantics, Config, ParseError};
pub use diagnostics::{Diagnostic, Location, Severity, ValidationResult};
pub use lifecycle::startup::init_panic_hook;
pub use simulation::{
    create_sample_request, simulate, simulate_request, validate, RequestTemplate,
    SimulatedRequest, SimulationError, SimulationResult,
};

//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config text (TOML)
//!     → schema.rs (serde deserialize, spans kept)
//!     → loader.rs (lower into typed model, compile predicates)
//!     → model.rs Config (immutable for the rest of the call)
//!     → validation.rs (semantic checks → errors / warnings)
//!
//! On file change (CLI --watch):
//!     watcher.rs detects change
//!     → re-read and validate
//!     → outcome sent to the caller
//! ```
//!
//! # Design Decisions
//! - Config is immutable once parsed and lives for one call only
//! - Unknown fields and type mismatches are parse errors, never coerced
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod model;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use loader::{load_config, parse, ConfigError, ParseError};
pub use model::{Config, Defaults, Route};
pub use validation::validate_semantics;

//! Policy subsystem.
//!
//! # Data Flow
//! ```text
//! Matched route (or none)
//!     → resolver.rs (merge route override over config defaults)
//!     → built-in defaults fill whatever is still unset
//!     → Policy (fully populated)
//! ```
//!
//! # Design Decisions
//! - Merge is field-by-field, never whole-table replacement
//! - Resolution is total: no match still yields the global policy
//! - Validation of values (zero timeouts etc.) lives in config validation

pub mod resolver;
pub mod types;

pub use resolver::resolve_policy;
pub use types::{FailureMode, Policy, PolicyOverride};

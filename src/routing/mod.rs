//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Simulated Request (method, host, path, headers)
//!     → router.rs (order routes, evaluate each)
//!     → matcher.rs (evaluate predicates, explain the verdict)
//!     → Return: matched Route or NoMatch, plus one TraceStep per route
//!
//! Route Compilation (at parse time):
//!     [[routes]] tables
//!     → Compile predicates (host patterns, path patterns, header checks)
//!     → Freeze as immutable Config
//! ```
//!
//! # Design Decisions
//! - No regex (prefix and segment matching only)
//! - Deterministic: same input always matches same route
//! - First match wins (ordered by priority, then declaration)

pub mod matcher;
pub mod router;

pub use matcher::{HeaderPredicate, HostPattern, MatchSpec, PathPattern, Predicate, Verdict};
pub use router::match_routes;

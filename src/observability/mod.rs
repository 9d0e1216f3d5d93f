//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Engine stages produce:
//!     → logging.rs (structured log events via tracing macros)
//!     → metrics.rs (validation / simulation outcome counters)
//!
//! Consumers:
//!     → CLI: fmt subscriber on stderr, filtered by --log-level / RUST_LOG
//!     → Embedders: whatever subscriber / recorder they install
//! ```
//!
//! # Design Decisions
//! - The library never installs a subscriber or recorder itself
//! - Without one, events and counters are no-ops
//! - stdout stays reserved for JSON results

pub mod logging;
pub mod metrics;

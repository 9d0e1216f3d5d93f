//! Agent hook subsystem.
//!
//! # Data Flow
//! ```text
//! Matched route
//!     → route bindings (or config default hooks when the route declares none)
//!     → planner.rs (fill timeout / failure mode: binding → agent → policy)
//!     → stable sort by phase precedence
//!     → Vec<PlannedHook>
//! ```
//!
//! # Design Decisions
//! - Planning only: no hook is ever invoked
//! - Declaration order is preserved within a phase
//! - Agent declarations are optional; when present they supply defaults

pub mod planner;
pub mod types;

pub use planner::plan_hooks;
pub use types::{AgentDecl, HookBinding, HookPhase, HookSource, PlannedHook};

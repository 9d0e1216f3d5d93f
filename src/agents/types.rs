//! Agent hook types.

use serde::{Deserialize, Serialize};

use crate::diagnostics::Location;
use crate::policy::FailureMode;

/// Request lifecycle phase a hook is bound to.
///
/// Variant order is the firing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HookPhase {
    PreRoute,
    PreUpstream,
    PostRoute,
    PostResponse,
}

impl std::fmt::Display for HookPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            HookPhase::PreRoute => "pre_route",
            HookPhase::PreUpstream => "pre_upstream",
            HookPhase::PostRoute => "post_route",
            HookPhase::PostResponse => "post_response",
        };
        f.write_str(name)
    }
}

/// A hook binding declared on a route or in the config defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HookBinding {
    pub agent_id: String,
    pub hook: HookPhase,
    pub timeout_ms: Option<i64>,
    pub failure_mode: Option<FailureMode>,
    pub location: Option<Location>,
}

/// A declared agent. Supplies defaults to bindings that reference it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AgentDecl {
    pub id: String,
    pub timeout_ms: Option<i64>,
    pub failure_mode: Option<FailureMode>,
    pub location: Option<Location>,
}

/// Where a planned hook's binding came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HookSource {
    Route,
    Defaults,
}

/// A hook that would fire for the simulated request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedHook {
    pub agent_id: String,
    pub hook: HookPhase,
    pub timeout_ms: u64,
    pub failure_mode: FailureMode,
    pub source: HookSource,
}

//! Simulation result types.
//!
//! Field names and nesting are the wire contract; optional parts are
//! omitted when not applicable.

use serde::{Deserialize, Serialize};

use crate::agents::PlannedHook;
use crate::config::model::Route;
use crate::diagnostics::Diagnostic;
use crate::load_balancer::LoadBalancerKind;
use crate::policy::Policy;

/// Whether a route matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchResult {
    Match,
    NoMatch,
}

/// One route's evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceStep {
    pub route_id: String,
    pub result: MatchResult,
    pub reason: String,
}

/// Summary of the winning route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteSummary {
    pub id: String,
    pub priority: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upstream: Option<String>,
}

impl From<&Route> for RouteSummary {
    fn from(route: &Route) -> Self {
        Self {
            id: route.id.clone(),
            priority: route.priority,
            upstream: route.upstream.clone(),
        }
    }
}

/// Which target was picked and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpstreamSelection {
    pub upstream_id: String,
    pub selected_target: String,
    pub load_balancer: LoadBalancerKind,
    pub selection_reason: String,
}

/// Aggregate result of simulating one request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matched_route: Option<RouteSummary>,
    pub match_trace: Vec<TraceStep>,
    pub applied_policies: Policy,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upstream_selection: Option<UpstreamSelection>,
    pub agent_hooks: Vec<PlannedHook>,
    pub warnings: Vec<Diagnostic>,
}

/// Combine the stage outputs. Pure aggregation; never fails.
pub fn assemble(
    matched_route: Option<&Route>,
    match_trace: Vec<TraceStep>,
    applied_policies: Policy,
    upstream_selection: Option<UpstreamSelection>,
    agent_hooks: Vec<PlannedHook>,
    warnings: Vec<Diagnostic>,
) -> SimulationResult {
    SimulationResult {
        matched_route: matched_route.map(RouteSummary::from),
        match_trace,
        applied_policies,
        upstream_selection,
        agent_hooks,
        warnings,
    }
}

//! Typed configuration model.
//!
//! Built by `loader::parse` and never mutated afterwards.

use std::collections::BTreeMap;

use crate::agents::{AgentDecl, HookBinding};
use crate::diagnostics::Location;
use crate::policy::PolicyOverride;
use crate::routing::MatchSpec;

pub use crate::load_balancer::{Upstream, UpstreamTarget};

/// A parsed configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    /// Routes in declaration order.
    pub routes: Vec<Route>,

    /// Upstreams keyed (and iterated) by id.
    pub upstreams: BTreeMap<String, Upstream>,

    /// Declared agents keyed by id.
    pub agents: BTreeMap<String, AgentDecl>,

    pub defaults: Defaults,
}

/// Config-level defaults.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Defaults {
    pub policies: PolicyOverride,
    pub hooks: Vec<HookBinding>,
}

/// A compiled route.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    pub id: String,
    pub priority: i64,

    /// Zero-based declaration index, used to break priority ties.
    pub index: usize,

    pub matcher: MatchSpec,
    pub policies: Option<PolicyOverride>,
    pub upstream: Option<String>,
    pub agents: Vec<HookBinding>,

    /// Location of the route's `id`.
    pub location: Option<Location>,
    /// Location of the route's `upstream` reference.
    pub upstream_location: Option<Location>,
}

impl Config {
    pub fn upstream(&self, id: &str) -> Option<&Upstream> {
        self.upstreams.get(id)
    }
}

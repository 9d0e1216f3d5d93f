//! Configuration document schema.
//!
//! These types mirror the TOML document one-to-one and exist only to be
//! deserialized; `loader.rs` lowers them into the typed model. Every table
//! denies unknown fields so nothing is silently dropped. Selected values are
//! wrapped in `Spanned` so diagnostics can point back at the source.

use std::collections::BTreeMap;

use serde::Deserialize;
use toml::Spanned;

use crate::agents::HookPhase;
use crate::load_balancer::{HashKey, LoadBalancerKind};
use crate::policy::FailureMode;

/// Root of a configuration document.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigDocument {
    /// Config-level policy defaults and default hooks.
    pub defaults: DefaultsDocument,

    /// Agent declarations keyed by agent id.
    pub agents: BTreeMap<String, Spanned<AgentDocument>>,

    /// Routes in declaration order.
    pub routes: Vec<Spanned<RouteDocument>>,

    /// Upstream groups keyed by upstream id.
    pub upstreams: BTreeMap<String, Spanned<UpstreamDocument>>,
}

/// `[defaults]` table.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
pub struct DefaultsDocument {
    pub policies: PolicyDocument,

    /// Hooks inherited by routes that declare none.
    pub hooks: Vec<Spanned<HookDocument>>,
}

/// Policy fields; all optional so they can be layered.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
pub struct PolicyDocument {
    /// Request timeout in seconds. Any number parses; range is checked
    /// during validation.
    pub timeout_secs: Option<Spanned<f64>>,

    pub failure_mode: Option<FailureMode>,

    /// Attempts when `failure_mode = "retry"`.
    pub retry_attempts: Option<u32>,

    /// Maximum request body size in bytes.
    pub max_body_bytes: Option<u64>,
}

/// `[agents.<id>]` table.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
pub struct AgentDocument {
    pub timeout_ms: Option<i64>,
    pub failure_mode: Option<FailureMode>,
}

/// One `[[routes]]` entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RouteDocument {
    /// Route identifier, unique within the document.
    pub id: Spanned<String>,

    /// Route priority (higher = checked first).
    #[serde(default)]
    pub priority: i64,

    /// Upstream group to forward to.
    #[serde(default)]
    pub upstream: Option<Spanned<String>>,

    #[serde(default, rename = "match")]
    pub matcher: MatchDocument,

    #[serde(default)]
    pub policies: Option<PolicyDocument>,

    /// Hook bindings; when empty the default hooks apply.
    #[serde(default)]
    pub agents: Vec<Spanned<HookDocument>>,
}

/// `[routes.match]` table. Absent fields do not constrain the match.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
pub struct MatchDocument {
    /// Allowed methods; absent = any, empty = none.
    pub methods: Option<Vec<String>>,

    /// Host pattern: exact, `*.suffix` or `*`.
    pub host: Option<String>,

    /// Exact path; `*` matches one segment.
    pub path: Option<String>,

    pub path_prefix: Option<String>,

    pub headers: Vec<HeaderDocument>,
}

/// Header predicate: presence only when `value` is absent.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HeaderDocument {
    pub name: String,
    #[serde(default)]
    pub value: Option<String>,
}

/// Hook binding on a route or in the defaults.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HookDocument {
    pub agent_id: String,
    pub hook: HookPhase,
    #[serde(default)]
    pub timeout_ms: Option<i64>,
    #[serde(default)]
    pub failure_mode: Option<FailureMode>,
}

/// `[upstreams.<id>]` table.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpstreamDocument {
    #[serde(default)]
    pub load_balancer: LoadBalancerKind,

    /// Key for `hash` balancing (default: path).
    #[serde(default)]
    pub hash_key: Option<HashKey>,

    #[serde(default)]
    pub targets: Vec<TargetDocument>,
}

/// Backend target entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TargetDocument {
    /// Target address (e.g., "127.0.0.1:3000").
    pub address: String,

    /// Weight for weighted load balancing (default: 1).
    #[serde(default = "default_weight")]
    pub weight: u32,
}

fn default_weight() -> u32 {
    1
}

//! Effective policy resolution for a matched route.

use crate::config::model::{Config, Route};
use crate::policy::types::Policy;

/// Resolve the policy for `route`.
///
/// Each field comes from the route override if set, else the config-level
/// default, else the built-in default. With no route only the first two
/// layers below the route apply.
pub fn resolve_policy(config: &Config, route: Option<&Route>) -> Policy {
    let global = config.defaults.policies.over(&Policy::default());

    let policy = match route.and_then(|r| r.policies.as_ref()) {
        Some(layer) => layer.over(&global),
        None => global,
    };

    tracing::debug!(
        route = route.map(|r| r.id.as_str()).unwrap_or("<none>"),
        timeout_secs = policy.timeout_secs,
        failure_mode = %policy.failure_mode,
        "Policy resolved"
    );

    policy
}

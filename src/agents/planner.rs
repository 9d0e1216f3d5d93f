//! Hook planning for a matched route.

use crate::agents::types::{HookSource, PlannedHook};
use crate::config::model::{Config, Route};
use crate::policy::Policy;

/// Plan the hooks that would fire for `route` under `policy`.
///
/// Routes without bindings inherit the config default hooks. Effective
/// timeout and failure mode come from the binding, then the declared agent,
/// then the resolved policy.
pub fn plan_hooks(config: &Config, route: &Route, policy: &Policy) -> Vec<PlannedHook> {
    let (bindings, source) = if route.agents.is_empty() {
        (config.defaults.hooks.as_slice(), HookSource::Defaults)
    } else {
        (route.agents.as_slice(), HookSource::Route)
    };

    let mut planned: Vec<PlannedHook> = bindings
        .iter()
        .map(|binding| {
            let agent = config.agents.get(&binding.agent_id);
            PlannedHook {
                agent_id: binding.agent_id.clone(),
                hook: binding.hook,
                timeout_ms: binding
                    .timeout_ms
                    .or_else(|| agent.and_then(|a| a.timeout_ms))
                    // Negative values only survive in unvalidated configs.
                    .map(|ms| u64::try_from(ms).unwrap_or(0))
                    .unwrap_or_else(|| policy.timeout_ms()),
                failure_mode: binding
                    .failure_mode
                    .or_else(|| agent.and_then(|a| a.failure_mode))
                    .unwrap_or(policy.failure_mode),
                source,
            }
        })
        .collect();

    // Stable: declaration order survives within a phase.
    planned.sort_by_key(|hook| hook.hook);

    tracing::debug!(
        route = %route.id,
        hooks = planned.len(),
        source = ?source,
        "Hooks planned"
    );

    planned
}

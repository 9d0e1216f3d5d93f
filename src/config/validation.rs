//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check referential integrity (routes reference existing upstreams,
//!   hooks reference declared agents)
//! - Validate value ranges (timeouts > 0, body limits > 0)
//! - Detect routes that can never win and groups nothing uses
//!
//! # Design Decisions
//! - Returns all diagnostics, not just the first
//! - Validation is a pure function: &Config → ValidationResult
//! - Errors reject the config; warnings only flag it

use std::collections::{BTreeSet, HashMap};

use crate::agents::HookBinding;
use crate::config::model::{Config, Route};
use crate::diagnostics::{Diagnostic, Location, ValidationResult};
use crate::load_balancer::{LoadBalancerKind, Upstream};
use crate::policy::{FailureMode, Policy, PolicyOverride};
use crate::routing::matcher::{HostPattern, Predicate};
use crate::routing::router::evaluation_order;

/// Check `config` for semantic correctness.
pub fn validate_semantics(config: &Config) -> ValidationResult {
    let mut diagnostics = Vec::new();

    check_routes(config, &mut diagnostics);
    check_upstreams(config, &mut diagnostics);
    check_policies(config, &mut diagnostics);
    check_hooks(config, &mut diagnostics);
    check_agents(config, &mut diagnostics);

    let result = ValidationResult::from_diagnostics(diagnostics);
    tracing::debug!(
        valid = result.valid,
        errors = result.errors.len(),
        warnings = result.warnings.len(),
        "Configuration validated"
    );
    result
}

fn check_routes(config: &Config, out: &mut Vec<Diagnostic>) {
    let mut seen: HashMap<&str, Option<Location>> = HashMap::new();

    for route in &config.routes {
        if let Some(first) = seen.get(route.id.as_str()) {
            let first = first
                .map(|l| format!(" (first declared at {})", l))
                .unwrap_or_default();
            out.push(
                Diagnostic::error(
                    "duplicate_route_id",
                    format!("duplicate route id {}{}", route.id, first),
                )
                .at(route.location),
            );
        } else {
            seen.insert(&route.id, route.location);
        }

        if let Some(upstream) = &route.upstream {
            if !config.upstreams.contains_key(upstream) {
                out.push(
                    Diagnostic::error(
                        "unresolved_upstream",
                        format!(
                            "route {} references undeclared upstream {}",
                            route.id, upstream
                        ),
                    )
                    .at(route.upstream_location.or(route.location)),
                );
            }
        }

        check_predicates(route, out);
    }

    // Shadowing is judged in evaluation order.
    let ordered = evaluation_order(&config.routes);
    for (position, route) in ordered.iter().enumerate() {
        let shadow = ordered[..position]
            .iter()
            .find(|earlier| earlier.matcher == route.matcher);
        if let Some(earlier) = shadow {
            out.push(
                Diagnostic::warning(
                    "shadowed_route",
                    format!(
                        "route {} can never win: route {} has identical predicates and is evaluated first",
                        route.id, earlier.id
                    ),
                )
                .at(route.location),
            );
        }
    }
}

fn check_predicates(route: &Route, out: &mut Vec<Diagnostic>) {
    for predicate in &route.matcher.predicates {
        match predicate {
            Predicate::Method(methods) if methods.is_empty() => out.push(
                Diagnostic::warning(
                    "unreachable_route",
                    format!(
                        "route {} has an empty method set and can never match",
                        route.id
                    ),
                )
                .at(route.location),
            ),
            Predicate::Method(_) => {}
            Predicate::Host(pattern) => {
                let malformed = match pattern {
                    HostPattern::Any => false,
                    HostPattern::Suffix(rest) | HostPattern::Exact(rest) => {
                        rest.is_empty() || rest.contains('*')
                    }
                };
                if malformed {
                    out.push(
                        Diagnostic::error(
                            "invalid_host_pattern",
                            format!(
                                "route {} has invalid host pattern '{}': '*' is only allowed as the whole host or a leading '*.' label",
                                route.id, pattern
                            ),
                        )
                        .at(route.location),
                    );
                }
            }
            Predicate::Path(pattern) => check_path(route, "path", pattern.as_str(), out),
            Predicate::PathPrefix(prefix) => check_path(route, "path_prefix", prefix, out),
            Predicate::Header(header) if header.name.is_empty() => out.push(
                Diagnostic::error(
                    "invalid_header_predicate",
                    format!("route {} has a header predicate with an empty name", route.id),
                )
                .at(route.location),
            ),
            Predicate::Header(_) => {}
        }
    }
}

fn check_path(route: &Route, field: &str, value: &str, out: &mut Vec<Diagnostic>) {
    if !value.starts_with('/') {
        out.push(
            Diagnostic::error(
                "invalid_path_pattern",
                format!(
                    "route {} has {} '{}' which does not start with '/'",
                    route.id, field, value
                ),
            )
            .at(route.location),
        );
    }
}

fn check_upstreams(config: &Config, out: &mut Vec<Diagnostic>) {
    let referenced: BTreeSet<&str> = config
        .routes
        .iter()
        .filter_map(|r| r.upstream.as_deref())
        .collect();

    for upstream in config.upstreams.values() {
        if upstream.targets.is_empty() {
            out.push(
                Diagnostic::error(
                    "empty_upstream",
                    format!("upstream {} has no targets", upstream.id),
                )
                .at(upstream.location),
            );
        }

        check_targets(upstream, out);

        if upstream.hash_key.is_some() && upstream.load_balancer != LoadBalancerKind::Hash {
            out.push(
                Diagnostic::warning(
                    "ignored_hash_key",
                    format!(
                        "upstream {} sets hash_key but balances with {}; the key is ignored",
                        upstream.id, upstream.load_balancer
                    ),
                )
                .at(upstream.location),
            );
        }

        if !referenced.contains(upstream.id.as_str()) {
            out.push(
                Diagnostic::warning(
                    "unused_upstream",
                    format!("upstream {} is not referenced by any route", upstream.id),
                )
                .at(upstream.location),
            );
        }
    }
}

fn check_targets(upstream: &Upstream, out: &mut Vec<Diagnostic>) {
    let mut addresses = BTreeSet::new();
    for target in &upstream.targets {
        if target.address.trim().is_empty() {
            out.push(
                Diagnostic::error(
                    "empty_target_address",
                    format!("upstream {} has a target with an empty address", upstream.id),
                )
                .at(upstream.location),
            );
        } else if !addresses.insert(target.address.as_str()) {
            out.push(
                Diagnostic::warning(
                    "duplicate_target",
                    format!(
                        "upstream {} lists target {} more than once",
                        upstream.id, target.address
                    ),
                )
                .at(upstream.location),
            );
        }
    }

    if upstream.load_balancer != LoadBalancerKind::Weighted || upstream.targets.is_empty() {
        return;
    }
    if upstream.total_weight() == 0 {
        out.push(
            Diagnostic::warning(
                "all_zero_weights",
                format!(
                    "upstream {} has only zero-weight targets; the first target takes all traffic",
                    upstream.id
                ),
            )
            .at(upstream.location),
        );
        return;
    }
    for target in upstream.targets.iter().filter(|t| t.weight == 0) {
        out.push(
            Diagnostic::warning(
                "zero_weight_target",
                format!(
                    "target {} in upstream {} has weight 0 and will never be selected",
                    target.address, upstream.id
                ),
            )
            .at(upstream.location),
        );
    }
}

fn check_policies(config: &Config, out: &mut Vec<Diagnostic>) {
    let global = config.defaults.policies.over(&Policy::default());
    check_policy_values("defaults", &config.defaults.policies, None, out);
    check_retry("defaults", &global, None, out);

    for route in &config.routes {
        if let Some(layer) = &route.policies {
            let owner = format!("route {}", route.id);
            check_policy_values(&owner, layer, route.location, out);
            check_retry(&owner, &layer.over(&global), route.location, out);
        }
    }
}

fn check_policy_values(
    owner: &str,
    layer: &PolicyOverride,
    fallback: Option<Location>,
    out: &mut Vec<Diagnostic>,
) {
    if let Some(secs) = layer.timeout_secs.filter(|s| !(s.is_finite() && *s > 0.0)) {
        out.push(
            Diagnostic::error(
                "invalid_timeout",
                format!("{}: timeout_secs must be positive, got {}", owner, secs),
            )
            .at(layer.timeout_location.or(fallback)),
        );
    }
    if layer.max_body_bytes == Some(0) {
        out.push(
            Diagnostic::error(
                "invalid_body_limit",
                format!("{}: max_body_bytes must be positive", owner),
            )
            .at(fallback),
        );
    }
}

fn check_retry(owner: &str, policy: &Policy, location: Option<Location>, out: &mut Vec<Diagnostic>) {
    if policy.failure_mode == FailureMode::Retry && policy.retry_attempts == 0 {
        out.push(
            Diagnostic::warning(
                "retry_without_attempts",
                format!(
                    "{}: failure_mode is retry but retry_attempts is 0; failures are never retried",
                    owner
                ),
            )
            .at(location),
        );
    }
}

fn check_hooks(config: &Config, out: &mut Vec<Diagnostic>) {
    check_binding_list(config, "defaults", &config.defaults.hooks, out);
    for route in &config.routes {
        check_binding_list(config, &format!("route {}", route.id), &route.agents, out);
    }
}

fn check_binding_list(config: &Config, owner: &str, bindings: &[HookBinding], out: &mut Vec<Diagnostic>) {
    let mut seen = BTreeSet::new();

    for binding in bindings {
        if binding.agent_id.trim().is_empty() {
            out.push(
                Diagnostic::error(
                    "unresolved_agent",
                    format!("{}: hook binding has an empty agent_id", owner),
                )
                .at(binding.location),
            );
        } else if !config.agents.is_empty() && !config.agents.contains_key(&binding.agent_id) {
            out.push(
                Diagnostic::error(
                    "unresolved_agent",
                    format!(
                        "{}: hook binding references undeclared agent {}",
                        owner, binding.agent_id
                    ),
                )
                .at(binding.location),
            );
        }

        if let Some(ms) = binding.timeout_ms.filter(|ms| *ms <= 0) {
            out.push(
                Diagnostic::error(
                    "invalid_timeout",
                    format!(
                        "{}: hook {} ({}) timeout_ms must be positive, got {}",
                        owner, binding.agent_id, binding.hook, ms
                    ),
                )
                .at(binding.location),
            );
        }

        if !seen.insert((binding.agent_id.as_str(), binding.hook)) {
            out.push(
                Diagnostic::warning(
                    "duplicate_hook",
                    format!(
                        "{}: agent {} is bound to {} more than once",
                        owner, binding.agent_id, binding.hook
                    ),
                )
                .at(binding.location),
            );
        }
    }
}

fn check_agents(config: &Config, out: &mut Vec<Diagnostic>) {
    let referenced: BTreeSet<&str> = config
        .defaults
        .hooks
        .iter()
        .chain(config.routes.iter().flat_map(|r| r.agents.iter()))
        .map(|b| b.agent_id.as_str())
        .collect();

    for agent in config.agents.values() {
        if let Some(ms) = agent.timeout_ms.filter(|ms| *ms <= 0) {
            out.push(
                Diagnostic::error(
                    "invalid_timeout",
                    format!("agent {}: timeout_ms must be positive, got {}", agent.id, ms),
                )
                .at(agent.location),
            );
        }
        if !referenced.contains(agent.id.as_str()) {
            out.push(
                Diagnostic::warning(
                    "unused_agent",
                    format!("agent {} is declared but never bound to a hook", agent.id),
                )
                .at(agent.location),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::loader::parse;

    fn codes(diagnostics: &[Diagnostic]) -> Vec<&str> {
        diagnostics.iter().filter_map(|d| d.code.as_deref()).collect()
    }

    fn validate(text: &str) -> ValidationResult {
        validate_semantics(&parse(text).unwrap())
    }

    #[test]
    fn test_clean_config_is_valid() {
        let result = validate(
            r#"
            [[routes]]
            id = "r1"
            upstream = "u1"
            match = { methods = ["GET"], path_prefix = "/api" }

            [upstreams.u1]
            targets = [{ address = "a" }, { address = "b" }]
            "#,
        );
        assert!(result.valid);
        assert!(result.errors.is_empty());
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_unresolved_upstream() {
        let result = validate(
            r#"
            [[routes]]
            id = "r1"
            upstream = "u2"
            "#,
        );
        assert!(!result.valid);
        assert_eq!(result.errors.len(), 1);
        assert!(result.errors[0].message.contains("u2"));
        assert_eq!(result.errors[0].location.map(|l| l.line), Some(4));
    }

    #[test]
    fn test_empty_upstream_is_an_error() {
        let result = validate(
            r#"
            [[routes]]
            id = "r1"
            upstream = "u1"

            [upstreams.u1]
            targets = []
            "#,
        );
        assert!(!result.valid);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].message, "upstream u1 has no targets");
    }

    #[test]
    fn test_duplicate_route_ids() {
        let result = validate(
            r#"
            [[routes]]
            id = "dup"
            match = { path = "/a" }

            [[routes]]
            id = "dup"
            match = { path = "/b" }
            "#,
        );
        assert_eq!(codes(&result.errors), vec!["duplicate_route_id"]);
        assert!(result.errors[0].message.contains("first declared at line 3"));
    }

    #[test]
    fn test_zero_timeouts_are_errors() {
        let result = validate(
            r#"
            [defaults.policies]
            timeout_secs = 0

            [agents.waf]
            timeout_ms = 0

            [[routes]]
            id = "r"
            agents = [{ agent_id = "waf", hook = "pre_route", timeout_ms = 0 }]
            "#,
        );
        assert_eq!(
            codes(&result.errors),
            vec!["invalid_timeout", "invalid_timeout", "invalid_timeout"]
        );
        assert_eq!(result.errors[0].location.map(|l| l.line), Some(3));
    }

    #[test]
    fn test_negative_timeouts_are_validation_errors() {
        let result = validate(
            r#"
            [defaults.policies]
            timeout_secs = -1

            [[routes]]
            id = "r"
            agents = [{ agent_id = "waf", hook = "pre_route", timeout_ms = -5 }]
            "#,
        );
        assert!(!result.valid);
        assert_eq!(codes(&result.errors), vec!["invalid_timeout", "invalid_timeout"]);
        assert_eq!(result.errors[0].location.map(|l| l.line), Some(3));
        assert!(result.errors[0].message.contains("got -1"));
    }

    #[test]
    fn test_fractional_and_non_finite_timeouts() {
        let result = validate(
            r#"
            [[routes]]
            id = "half"
            policies = { timeout_secs = 0.5 }
            "#,
        );
        assert!(result.valid, "{:?}", result.errors);

        let result = validate("[defaults.policies]\ntimeout_secs = inf\n");
        assert_eq!(codes(&result.errors), vec!["invalid_timeout"]);
        let result = validate("[defaults.policies]\ntimeout_secs = nan\n");
        assert_eq!(codes(&result.errors), vec!["invalid_timeout"]);
    }

    #[test]
    fn test_warnings_keep_config_valid() {
        let result = validate(
            r#"
            [[routes]]
            id = "never"
            match = { methods = [] }

            [upstreams.orphan]
            targets = [{ address = "a" }]
            "#,
        );
        assert!(result.valid);
        assert_eq!(codes(&result.warnings), vec!["unreachable_route", "unused_upstream"]);
    }

    #[test]
    fn test_shadowed_route_warning() {
        let result = validate(
            r#"
            [[routes]]
            id = "second"
            priority = 1
            match = { path_prefix = "/x" }

            [[routes]]
            id = "first"
            priority = 9
            match = { path_prefix = "/x" }
            "#,
        );
        assert_eq!(codes(&result.warnings), vec!["shadowed_route"]);
        assert!(result.warnings[0].message.starts_with("route second can never win"));
    }

    #[test]
    fn test_pattern_errors() {
        let result = validate(
            r#"
            [[routes]]
            id = "bad"
            match = { host = "api.*.com", path = "users", path_prefix = "v1" }
            "#,
        );
        assert_eq!(
            codes(&result.errors),
            vec!["invalid_host_pattern", "invalid_path_pattern", "invalid_path_pattern"]
        );
    }

    #[test]
    fn test_upstream_warnings() {
        let result = validate(
            r#"
            [[routes]]
            id = "r"
            upstream = "w"

            [[routes]]
            id = "s"
            upstream = "rr"
            match = { path = "/s" }

            [upstreams.w]
            load_balancer = "weighted"
            targets = [{ address = "a", weight = 0 }, { address = "b" }, { address = "b" }]

            [upstreams.rr]
            hash_key = "host"
            targets = [{ address = "c" }]
            "#,
        );
        assert!(result.valid);
        assert_eq!(
            codes(&result.warnings),
            vec!["ignored_hash_key", "duplicate_target", "zero_weight_target"]
        );
    }

    #[test]
    fn test_agent_references() {
        let result = validate(
            r#"
            [agents.waf]
            [agents.idle]

            [[routes]]
            id = "r"
            agents = [
                { agent_id = "waf", hook = "pre_route" },
                { agent_id = "waf", hook = "pre_route" },
                { agent_id = "ghost", hook = "post_route" },
            ]
            "#,
        );
        assert_eq!(codes(&result.errors), vec!["unresolved_agent"]);
        assert!(result.errors[0].message.contains("ghost"));
        assert_eq!(codes(&result.warnings), vec!["duplicate_hook", "unused_agent"]);
    }

    #[test]
    fn test_undeclared_agents_allowed_without_agent_table() {
        let result = validate(
            r#"
            [[routes]]
            id = "r"
            agents = [{ agent_id = "a1", hook = "pre_route", timeout_ms = 200, failure_mode = "fail_open" }]
            "#,
        );
        assert!(result.valid);
    }

    #[test]
    fn test_retry_without_attempts() {
        let result = validate(
            r#"
            [defaults.policies]
            retry_attempts = 0

            [[routes]]
            id = "r"
            policies = { failure_mode = "retry" }
            "#,
        );
        assert!(result.valid);
        assert_eq!(codes(&result.warnings), vec!["retry_without_attempts"]);
    }
}

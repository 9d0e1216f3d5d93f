//! End-to-end routing scenarios.

use gateway_playground::agents::HookPhase;
use gateway_playground::policy::FailureMode;
use gateway_playground::simulation::MatchResult;
use gateway_playground::{simulate, validate, SimulationError};

mod common;

use common::BASIC;

#[test]
fn test_basic_match_selects_first_round_robin_target() {
    let result = simulate(BASIC, &common::request_json("GET", "x", "/api")).unwrap();

    let matched = result.matched_route.as_ref().expect("r1 should match");
    assert_eq!(matched.id, "r1");
    assert_eq!(matched.priority, 10);

    let selection = result.upstream_selection.as_ref().unwrap();
    assert_eq!(selection.upstream_id, "u1");
    assert_eq!(selection.selected_target, "a");
    assert_eq!(
        selection.selection_reason,
        "round-robin (stateless simulation, first target shown)"
    );

    assert_eq!(result.match_trace.len(), 1);
    assert_eq!(result.match_trace[0].route_id, "r1");
    assert_eq!(result.match_trace[0].result, MatchResult::Match);
}

#[test]
fn test_method_mismatch_explains_allowed_set() {
    let result = simulate(BASIC, &common::request_json("POST", "x", "/api")).unwrap();

    assert!(result.matched_route.is_none());
    assert!(result.upstream_selection.is_none());
    assert!(result.agent_hooks.is_empty());
    assert_eq!(result.match_trace.len(), 1);
    assert_eq!(result.match_trace[0].result, MatchResult::NoMatch);
    assert_eq!(
        result.match_trace[0].reason,
        "method POST not in allowed set {GET}"
    );
    assert_eq!(common::warning_codes(&result), vec!["no_route_matched"]);
}

#[test]
fn test_unresolved_upstream_reference() {
    let config = r#"
[[routes]]
id = "r1"
upstream = "u2"
"#;
    let result = validate(config).unwrap();

    assert!(!result.valid);
    assert_eq!(result.errors.len(), 1);
    assert!(result.errors[0].message.contains("u2"));
    assert_eq!(result.errors[0].code.as_deref(), Some("unresolved_upstream"));
}

#[test]
fn test_equal_priority_first_declared_wins() {
    let config = r#"
[[routes]]
id = "r_first"
priority = 5
match = { path_prefix = "/" }

[[routes]]
id = "r_second"
priority = 5
match = { path_prefix = "/shop" }
"#;
    let result = simulate(config, &common::request_json("GET", "x", "/shop/cart")).unwrap();

    assert_eq!(result.matched_route.unwrap().id, "r_first");
    let ids: Vec<_> = result.match_trace.iter().map(|s| s.route_id.as_str()).collect();
    assert_eq!(ids, vec!["r_first", "r_second"]);
    assert!(result
        .match_trace
        .iter()
        .all(|s| s.result == MatchResult::Match));
    assert!(!result.match_trace[0].reason.contains("selected earlier"));
    assert_eq!(
        result.match_trace[1].reason,
        "path /shop/cart has prefix /shop; r_first was selected earlier"
    );
}

#[test]
fn test_empty_upstream_blocks_simulation_with_same_error() {
    let config = r#"
[[routes]]
id = "r1"
upstream = "u1"

[upstreams.u1]
targets = []
"#;
    let validation = validate(config).unwrap();
    assert!(!validation.valid);
    assert_eq!(validation.errors[0].message, "upstream u1 has no targets");

    match simulate(config, &common::request_json("GET", "x", "/")) {
        Err(SimulationError::Invalid(result)) => assert_eq!(result, validation),
        other => panic!("expected validation failure, got {:?}", other),
    }
}

#[test]
fn test_pre_route_hook_planned_before_post_route() {
    let config = r#"
[[routes]]
id = "r1"

[[routes.agents]]
agent_id = "logger"
hook = "post_route"
timeout_ms = 50
failure_mode = "fail_open"

[[routes.agents]]
agent_id = "a1"
hook = "pre_route"
timeout_ms = 200
failure_mode = "fail_open"
"#;
    let result = simulate(config, &common::request_json("GET", "x", "/")).unwrap();

    assert_eq!(result.agent_hooks.len(), 2);
    let first = &result.agent_hooks[0];
    assert_eq!(first.agent_id, "a1");
    assert_eq!(first.hook, HookPhase::PreRoute);
    assert_eq!(first.timeout_ms, 200);
    assert_eq!(first.failure_mode, FailureMode::FailOpen);
    assert_eq!(result.agent_hooks[1].hook, HookPhase::PostRoute);
}

#[test]
fn test_headers_and_host_drive_matching() {
    let config = r#"
[[routes]]
id = "canary"
priority = 20
upstream = "canary"
match = { host = "*.example.com", headers = [{ name = "X-Canary", value = "1" }] }

[[routes]]
id = "stable"
upstream = "stable"
match = { host = "*.example.com" }

[upstreams.canary]
targets = [{ address = "canary-1" }]

[upstreams.stable]
targets = [{ address = "stable-1" }, { address = "stable-2" }]
"#;
    let plain = common::request("GET", "api.example.com", "/");
    let result = common::simulate(config, &plain);
    assert_eq!(result.matched_route.unwrap().id, "stable");
    assert_eq!(result.match_trace[0].reason, "header x-canary missing");

    let mut canary = common::request("GET", "API.example.com:443", "/");
    canary.headers.insert("x-canary", "1");
    let result = common::simulate(config, &canary);
    assert_eq!(result.matched_route.as_ref().unwrap().id, "canary");
    assert_eq!(
        result.upstream_selection.as_ref().unwrap().selected_target,
        "canary-1"
    );
    assert_eq!(common::warning_codes(&result), vec!["single_target"]);
}

#[test]
fn test_parse_error_blocks_both_entry_points() {
    let config = "[[routes]]\nid = \"r\"\nprority = 3\n";

    let err = validate(config).unwrap_err();
    assert!(err.message.contains("prority"), "{}", err.message);

    let err = simulate(config, &common::request_json("GET", "x", "/")).unwrap_err();
    assert!(matches!(err, SimulationError::Parse(_)));
    assert_eq!(err.diagnostics()[0].code.as_deref(), Some("parse_error"));
}

#[test]
fn test_policies_merge_into_result() {
    let config = r#"
[defaults.policies]
timeout_secs = 15
failure_mode = "fail_open"

[[routes]]
id = "r"
policies = { timeout_secs = 3 }
"#;
    let result = simulate(config, &common::request_json("GET", "x", "/")).unwrap();
    assert_eq!(result.applied_policies.timeout_secs, 3.0);
    assert_eq!(result.applied_policies.failure_mode, FailureMode::FailOpen);

    let unmatched = r#"
[defaults.policies]
timeout_secs = 15

[[routes]]
id = "r"
match = { methods = ["PUT"] }
"#;
    let result = simulate(unmatched, &common::request_json("GET", "x", "/")).unwrap();
    assert!(result.matched_route.is_none());
    assert_eq!(result.applied_policies.timeout_secs, 15.0);
}

#[test]
fn test_out_of_range_timeout_is_reported_not_thrown() {
    let config = "[defaults.policies]\ntimeout_secs = -1\n";
    let result = validate(config).expect("well-formed config must not throw");
    assert!(!result.valid);
    assert_eq!(result.errors[0].code.as_deref(), Some("invalid_timeout"));
    assert_eq!(result.errors[0].location.map(|l| l.line), Some(2));

    let err = simulate(config, &common::request_json("GET", "x", "/")).unwrap_err();
    assert!(matches!(err, SimulationError::Invalid(_)));

    let fractional = r#"
[[routes]]
id = "fast"
policies = { timeout_secs = 0.5 }
agents = [{ agent_id = "waf", hook = "pre_route", timeout_ms = 800 }]
"#;
    assert!(validate(fractional).unwrap().valid);
    let result = simulate(fractional, &common::request_json("GET", "x", "/")).unwrap();
    assert_eq!(result.applied_policies.timeout_secs, 0.5);
    assert!(common::warning_codes(&result).contains(&"hook_timeout_exceeds_policy"));
}

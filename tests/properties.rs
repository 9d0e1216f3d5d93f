//! Invariants that hold for any configuration or request.

use gateway_playground::{simulate, validate};

mod common;

const ROUTES: &str = r#"
[[routes]]
id = "low"
priority = -3
match = { path_prefix = "/" }

[[routes]]
id = "high"
priority = 100
match = { methods = [] }

[[routes]]
id = "mid"
priority = 7
match = { host = "shop.example.com", path = "/items/*" }
"#;

#[test]
fn test_valid_iff_no_errors() {
    let configs = [
        common::BASIC,
        ROUTES,
        "[[routes]]\nid = \"r\"\nupstream = \"missing\"\n",
        "[[routes]]\nid = \"r\"\n[[routes]]\nid = \"r\"\n",
        "[upstreams.idle]\ntargets = [{ address = \"a\" }]\n",
    ];
    for config in configs {
        let result = validate(config).unwrap();
        assert_eq!(result.valid, result.errors.is_empty(), "{}", config);
        assert!(result.errors.iter().all(|d| d.is_error()));
        assert!(result.warnings.iter().all(|d| !d.is_error()));
    }
}

#[test]
fn test_trace_covers_every_route_in_priority_order() {
    let request = common::request_json("GET", "shop.example.com", "/items/42");
    let result = simulate(ROUTES, &request).unwrap();

    let ids: Vec<_> = result.match_trace.iter().map(|s| s.route_id.as_str()).collect();
    assert_eq!(ids, vec!["high", "mid", "low"]);
    assert_eq!(
        result.match_trace[0].reason,
        "method set is empty {}; route can never match"
    );
    assert_eq!(result.matched_route.unwrap().id, "mid");
}

#[test]
fn test_no_routes_yields_empty_trace_and_default_policy() {
    let result = simulate("", &common::request_json("GET", "x", "/")).unwrap();
    assert!(result.match_trace.is_empty());
    assert!(result.matched_route.is_none());
    assert_eq!(result.applied_policies.timeout_secs, 30.0);
    assert_eq!(result.applied_policies.retry_attempts, 3);
    assert_eq!(result.applied_policies.max_body_bytes, 2 * 1024 * 1024);
}

#[test]
fn test_results_are_deterministic_per_algorithm() {
    let targets = [("a", 1), ("b", 3), ("c", 5)];
    let configs = [
        common::balanced("round_robin", &targets, ""),
        common::balanced("random", &targets, ""),
        common::balanced("weighted", &targets, ""),
        common::balanced("hash", &targets, "hash_key = \"client_ip\""),
    ];
    let mut request = common::request("DELETE", "api.internal", "/v1/users/9");
    request.client_ip = Some("198.51.100.7".into());
    request.headers.insert("x-trace", "abc");
    let request = serde_json::to_string(&request).unwrap();

    for config in &configs {
        let first = serde_json::to_string(&simulate(config, &request).unwrap()).unwrap();
        for _ in 0..5 {
            let again = serde_json::to_string(&simulate(config, &request).unwrap()).unwrap();
            assert_eq!(first, again, "{}", config);
        }
    }
}

#[test]
fn test_selected_target_belongs_to_upstream() {
    let targets = [("a", 2), ("b", 0), ("c", 1)];
    for algorithm in ["round_robin", "random", "weighted", "hash"] {
        let config = common::balanced(algorithm, &targets, "");
        for path in ["/", "/a", "/b/c", "/orders/1234"] {
            let result = common::simulate(&config, &common::request("GET", "h", path));
            let selection = result.upstream_selection.expect("upstream selected");
            assert!(["a", "b", "c"].contains(&selection.selected_target.as_str()));
            if algorithm == "weighted" {
                assert_ne!(selection.selected_target, "b", "zero weight picked");
            }
        }
    }
}

#[test]
fn test_single_target_short_circuits_every_algorithm() {
    for algorithm in ["round_robin", "random", "weighted", "hash"] {
        let config = common::balanced(algorithm, &[("only", 4)], "");
        let result = common::simulate(&config, &common::request("GET", "h", "/x"));
        assert_eq!(result.upstream_selection.as_ref().unwrap().selected_target, "only");
        assert!(common::warning_codes(&result).contains(&"single_target"));
    }
}

#[test]
fn test_hash_is_stable_across_unrelated_fields() {
    let config = common::balanced("hash", &[("a", 1), ("b", 1), ("c", 1), ("d", 1)], "");
    let baseline = common::simulate(&config, &common::request("GET", "one", "/cart"));
    let other = common::simulate(&config, &common::request("POST", "two", "/cart"));
    assert_eq!(
        baseline.upstream_selection.unwrap().selected_target,
        other.upstream_selection.unwrap().selected_target
    );
}

#[test]
fn test_missing_hash_header_warns() {
    let config = common::balanced("hash", &[("a", 1), ("b", 1)], "hash_key = \"header:x-user\"");
    let result = common::simulate(&config, &common::request("GET", "h", "/"));
    assert!(result.upstream_selection.is_some());
    assert!(common::warning_codes(&result).contains(&"hash_key_missing"));
}

#[test]
fn test_trailing_slash_is_significant() {
    let config = r#"
[[routes]]
id = "exact"
match = { path = "/api" }
"#;
    let result = common::simulate(config, &common::request("GET", "h", "/api/"));
    assert!(result.matched_route.is_none());

    let result = common::simulate(config, &common::request("GET", "h", "/api?x=1"));
    assert_eq!(result.matched_route.unwrap().id, "exact");
}

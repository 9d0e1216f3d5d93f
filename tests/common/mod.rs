//! Shared fixtures for integration tests.

#![allow(dead_code)]

use gateway_playground::{SimulatedRequest, SimulationResult};

/// One GET-only route on /api in front of a two-target round-robin upstream.
pub const BASIC: &str = r#"
[[routes]]
id = "r1"
priority = 10
upstream = "u1"

[routes.match]
methods = ["GET"]
path_prefix = "/api"

[upstreams.u1]
load_balancer = "round_robin"
targets = [{ address = "a" }, { address = "b" }]
"#;

/// Build a config with a single route in front of an upstream using `algorithm`.
pub fn balanced(algorithm: &str, targets: &[(&str, u32)], extra: &str) -> String {
    let targets = targets
        .iter()
        .map(|(address, weight)| format!("{{ address = \"{}\", weight = {} }}", address, weight))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        r#"
[[routes]]
id = "all"
upstream = "pool"

[upstreams.pool]
load_balancer = "{}"
{}
targets = [{}]
"#,
        algorithm, extra, targets
    )
}

pub fn request(method: &str, host: &str, path: &str) -> SimulatedRequest {
    gateway_playground::create_sample_request(method, host, path)
}

pub fn request_json(method: &str, host: &str, path: &str) -> String {
    serde_json::to_string(&request(method, host, path)).unwrap()
}

pub fn simulate(config: &str, request: &SimulatedRequest) -> SimulationResult {
    gateway_playground::simulate_request(config, request).expect("simulation should run")
}

pub fn warning_codes(result: &SimulationResult) -> Vec<&str> {
    result
        .warnings
        .iter()
        .filter_map(|w| w.code.as_deref())
        .collect()
}

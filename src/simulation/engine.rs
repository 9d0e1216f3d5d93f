//! Validation and simulation entry points.
//!
//! # Responsibilities
//! - Run parse → validate for `validate`
//! - Run parse → validate → match → policy → select → hooks for `simulate`
//! - Downgrade recoverable stage issues to warnings on the result
//!
//! # Design Decisions
//! - Only parse and validation failures abort; every other stage runs to
//!   completion so the trace is always full
//! - Inputs are owned by the caller, outputs are returned by value
//! - No state survives a call

use crate::agents::{plan_hooks, PlannedHook};
use crate::config::model::{Config, Route};
use crate::config::{parse, validate_semantics, ParseError};
use crate::diagnostics::{Diagnostic, ValidationResult};
use crate::load_balancer::select_target;
use crate::policy::{resolve_policy, Policy};
use crate::routing::match_routes;
use crate::simulation::error::SimulationError;
use crate::simulation::request::SimulatedRequest;
use crate::simulation::result::{assemble, SimulationResult, UpstreamSelection};

/// Parse and validate configuration text.
///
/// Unparseable text is an `Err`; semantic problems come back as a result
/// with `valid = false`.
pub fn validate(config_text: &str) -> Result<ValidationResult, ParseError> {
    let outcome = parse(config_text).map(|config| validate_semantics(&config));

    crate::observability::metrics::record_validation(match &outcome {
        Ok(result) if result.valid => "valid",
        Ok(_) => "invalid",
        Err(_) => "parse_error",
    });

    outcome
}

/// Simulate routing of the JSON-encoded request against configuration text.
pub fn simulate(config_text: &str, request_json: &str) -> Result<SimulationResult, SimulationError> {
    let config = checked_config(config_text)?;
    let request = SimulatedRequest::from_json(request_json).map_err(|e| {
        crate::observability::metrics::record_simulation("bad_request");
        SimulationError::Request(e)
    })?;
    Ok(finish(&config, &request))
}

/// Simulate routing of an already-built request.
pub fn simulate_request(
    config_text: &str,
    request: &SimulatedRequest,
) -> Result<SimulationResult, SimulationError> {
    let config = checked_config(config_text)?;
    Ok(finish(&config, request))
}

fn checked_config(config_text: &str) -> Result<Config, SimulationError> {
    let config = parse(config_text).map_err(|e| {
        crate::observability::metrics::record_simulation("parse_error");
        SimulationError::Parse(e)
    })?;

    let validation = validate_semantics(&config);
    if !validation.valid {
        tracing::debug!(
            errors = validation.errors.len(),
            "Simulation refused: configuration is invalid"
        );
        crate::observability::metrics::record_simulation("invalid");
        return Err(SimulationError::Invalid(validation));
    }

    Ok(config)
}

fn finish(config: &Config, request: &SimulatedRequest) -> SimulationResult {
    let result = run_simulation(config, request);
    crate::observability::metrics::record_simulation(if result.matched_route.is_some() {
        "matched"
    } else {
        "no_match"
    });
    result
}

/// Run every simulation stage against a parsed config.
///
/// Does not validate; callers wanting the validation gate use `simulate`.
pub fn run_simulation(config: &Config, request: &SimulatedRequest) -> SimulationResult {
    tracing::debug!(
        method = %request.method,
        host = %request.host,
        path = %request.path,
        headers = request.headers.len(),
        "Simulating request"
    );

    let mut warnings = Vec::new();

    let (matched, trace) = match_routes(config, request);
    let policy = resolve_policy(config, matched);

    let (selection, hooks) = match matched {
        Some(route) => {
            let selection = select_upstream(config, route, request, &mut warnings);
            let hooks = plan_hooks(config, route, &policy);
            check_hook_timeouts(&hooks, &policy, &mut warnings);
            (selection, hooks)
        }
        None => {
            warnings.push(Diagnostic::warning(
                "no_route_matched",
                format!(
                    "no route matched {} {}{}",
                    request.method_upper(),
                    request.host,
                    request.path
                ),
            ));
            (None, Vec::new())
        }
    };

    assemble(matched, trace, policy, selection, hooks, warnings)
}

fn select_upstream(
    config: &Config,
    route: &Route,
    request: &SimulatedRequest,
    warnings: &mut Vec<Diagnostic>,
) -> Option<UpstreamSelection> {
    let Some(upstream_id) = route.upstream.as_deref() else {
        warnings.push(Diagnostic::warning(
            "no_upstream",
            format!(
                "route {} has no upstream; the request would not be forwarded",
                route.id
            ),
        ));
        return None;
    };

    let Some(upstream) = config.upstream(upstream_id) else {
        warnings.push(Diagnostic::warning(
            "no_upstream",
            format!("route {} references undeclared upstream {}", route.id, upstream_id),
        ));
        return None;
    };

    match select_target(upstream, request) {
        Some(selection) => {
            warnings.extend(selection.warnings);
            Some(UpstreamSelection {
                upstream_id: upstream.id.clone(),
                selected_target: selection.target.address,
                load_balancer: upstream.load_balancer,
                selection_reason: selection.reason,
            })
        }
        None => {
            warnings.push(Diagnostic::warning(
                "empty_upstream",
                format!("upstream {} has no targets; nothing to select", upstream.id),
            ));
            None
        }
    }
}

fn check_hook_timeouts(hooks: &[PlannedHook], policy: &Policy, warnings: &mut Vec<Diagnostic>) {
    let budget = policy.timeout_ms();
    for hook in hooks.iter().filter(|h| h.timeout_ms > budget) {
        warnings.push(Diagnostic::warning(
            "hook_timeout_exceeds_policy",
            format!(
                "hook {} ({}) timeout {}ms exceeds the route timeout of {}ms",
                hook.agent_id, hook.hook, hook.timeout_ms, budget
            ),
        ));
    }
}

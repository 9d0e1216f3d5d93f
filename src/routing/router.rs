//! Route lookup with a full decision trace.
//!
//! # Responsibilities
//! - Order routes by priority (descending), then declaration (ascending)
//! - Evaluate every route and record one trace step each
//! - Return the first passing route, or explicit no-match
//!
//! # Design Decisions
//! - The trace is diagnostic: evaluation continues after the winner
//! - Deterministic: same input always matches same route

use crate::config::model::{Config, Route};
use crate::routing::matcher::Verdict;
use crate::simulation::request::SimulatedRequest;
use crate::simulation::result::{MatchResult, TraceStep};

/// Routes in evaluation order.
pub fn evaluation_order(routes: &[Route]) -> Vec<&Route> {
    let mut ordered: Vec<&Route> = routes.iter().collect();
    // Stable sort keeps declaration order among equal priorities.
    ordered.sort_by(|a, b| b.priority.cmp(&a.priority));
    ordered
}

/// Match `request` against every route in `config`.
pub fn match_routes<'a>(
    config: &'a Config,
    request: &SimulatedRequest,
) -> (Option<&'a Route>, Vec<TraceStep>) {
    let mut winner: Option<&Route> = None;
    let mut trace = Vec::with_capacity(config.routes.len());

    for route in evaluation_order(&config.routes) {
        let verdict = route.matcher.evaluate(request);
        tracing::trace!(
            route = %route.id,
            priority = route.priority,
            matched = verdict.is_pass(),
            reason = verdict.reason(),
            "Route evaluated"
        );

        let (result, reason) = match verdict {
            Verdict::Pass(reason) => match winner {
                None => {
                    winner = Some(route);
                    (MatchResult::Match, reason)
                }
                Some(earlier) => (
                    MatchResult::Match,
                    format!("{}; {} was selected earlier", reason, earlier.id),
                ),
            },
            Verdict::Fail(reason) => (MatchResult::NoMatch, reason),
        };

        trace.push(TraceStep {
            route_id: route.id.clone(),
            result,
            reason,
        });
    }

    tracing::debug!(
        routes = config.routes.len(),
        matched = winner.map(|r| r.id.as_str()).unwrap_or("<none>"),
        "Route matching complete"
    );

    (winner, trace)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::loader::parse;

    const CONFIG: &str = r#"
        [[routes]]
        id = "low"
        priority = 1

        [[routes]]
        id = "first-five"
        priority = 5
        match = { path_prefix = "/api" }

        [[routes]]
        id = "second-five"
        priority = 5
        match = { path_prefix = "/api" }

        [[routes]]
        id = "high-post"
        priority = 10
        match = { methods = ["POST"] }
    "#;

    #[test]
    fn test_order_by_priority_then_declaration() {
        let config = parse(CONFIG).unwrap();
        let ids: Vec<_> = evaluation_order(&config.routes)
            .iter()
            .map(|r| r.id.as_str())
            .collect();
        assert_eq!(ids, vec!["high-post", "first-five", "second-five", "low"]);
    }

    #[test]
    fn test_first_declared_wins_ties_and_trace_is_complete() {
        let config = parse(CONFIG).unwrap();
        let request = SimulatedRequest::new("GET", "x", "/api/users");

        let (winner, trace) = match_routes(&config, &request);
        assert_eq!(winner.unwrap().id, "first-five");
        assert_eq!(trace.len(), 4);

        let results: Vec<_> = trace.iter().map(|s| s.result).collect();
        assert_eq!(
            results,
            vec![
                MatchResult::NoMatch,
                MatchResult::Match,
                MatchResult::Match,
                MatchResult::Match,
            ]
        );
        assert_eq!(trace[0].reason, "method GET not in allowed set {POST}");
        assert_eq!(trace[1].reason, "path /api/users has prefix /api");
        assert_eq!(
            trace[2].reason,
            "path /api/users has prefix /api; first-five was selected earlier"
        );
        assert!(trace[3].reason.ends_with("; first-five was selected earlier"));
    }

    #[test]
    fn test_no_match_lists_every_route() {
        let config = parse(
            r#"
            [[routes]]
            id = "only"
            match = { methods = ["GET"] }
            "#,
        )
        .unwrap();
        let (winner, trace) = match_routes(&config, &SimulatedRequest::new("PUT", "x", "/"));
        assert!(winner.is_none());
        assert_eq!(trace.len(), 1);
        assert_eq!(trace[0].result, MatchResult::NoMatch);
    }
}

//! Weighted load balancing strategy.
//!
//! A request-seeded draw in `[0, total_weight)` is walked over the
//! cumulative weights in declaration order, so each target is chosen in
//! proportion to its weight and earlier targets own the lower ranges.

use crate::diagnostics::Diagnostic;
use crate::load_balancer::{request_seed, Pick, Upstream};
use crate::simulation::request::SimulatedRequest;

pub fn select(upstream: &Upstream, request: &SimulatedRequest) -> Pick {
    let total = upstream.total_weight();

    if total == 0 {
        let mut pick = Pick::new(
            0,
            "weighted (all weights are zero; falling back to first target)",
        );
        pick.warnings.push(Diagnostic::warning(
            "all_zero_weights",
            format!(
                "upstream {} has only zero-weight targets; first target used",
                upstream.id
            ),
        ));
        return pick;
    }

    let mut rng = fastrand::Rng::with_seed(request_seed(request));
    let draw = rng.u64(..total);

    let mut upper = 0u64;
    for (index, target) in upstream.targets.iter().enumerate() {
        upper += u64::from(target.weight);
        if draw < upper {
            return Pick::new(
                index,
                format!(
                    "weighted (effective weight {} of {} total, draw {} seeded from request method, host and path)",
                    target.weight, total, draw
                ),
            );
        }
    }

    // Unreachable: draw < total == final upper bound.
    Pick::new(0, format!("weighted (draw {} out of range)", draw))
}

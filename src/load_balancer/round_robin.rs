//! Round-robin load balancing strategy.
//!
//! A live proxy rotates a counter across requests. A simulation is a single
//! stateless call, so the first rotation step is always shown.

use crate::load_balancer::{Pick, UpstreamTarget};

pub const REASON: &str = "round-robin (stateless simulation, first target shown)";

pub fn select(targets: &[UpstreamTarget]) -> Pick {
    debug_assert!(!targets.is_empty());
    Pick::new(0, REASON)
}

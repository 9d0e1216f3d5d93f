//! Upstream target groups.

use serde::{Deserialize, Serialize};

use crate::diagnostics::Location;
use crate::load_balancer::{HashKey, LoadBalancerKind};

/// A single backend target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpstreamTarget {
    /// Target address or identifier (e.g., "10.0.0.1:8080").
    pub address: String,

    /// Relative weight for weighted load balancing (default: 1).
    pub weight: u32,
}

/// A named group of targets behind one load balancing algorithm.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upstream {
    pub id: String,
    pub load_balancer: LoadBalancerKind,

    /// Key for `hash` balancing; `None` means the default key.
    pub hash_key: Option<HashKey>,

    /// Targets in declaration order.
    pub targets: Vec<UpstreamTarget>,

    pub location: Option<Location>,
}

impl Upstream {
    /// Effective hash key.
    pub fn hash_key(&self) -> HashKey {
        self.hash_key.clone().unwrap_or_default()
    }

    /// Sum of all target weights.
    pub fn total_weight(&self) -> u64 {
        self.targets.iter().map(|t| u64::from(t.weight)).sum()
    }
}

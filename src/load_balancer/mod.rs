//! Load balancing subsystem.
//!
//! # Data Flow
//! ```text
//! Route matched → upstream identified
//!     → upstream.rs (ordered targets, algorithm, hash key)
//!     → Apply load balancing algorithm:
//!         - round_robin.rs (first target; no counter survives a call)
//!         - random.rs (request-seeded draw)
//!         - weighted.rs (request-seeded draw over cumulative weights)
//!         - hash.rs (digest of the configured key)
//!     → Selection (target + human-readable reason)
//! ```
//!
//! # Design Decisions
//! - Algorithms are a closed enum; dispatch is an exhaustive match
//! - Selection is stateless: identical inputs always pick the same target
//! - Round-robin always shows the first target since there is no call
//!   counter between simulations; callers must not expect rotation
//! - Seeds and hashes come from SHA-256 so they are stable across platforms
//! - Single-target upstreams short-circuit every algorithm

pub mod hash;
pub mod random;
pub mod round_robin;
pub mod upstream;
pub mod weighted;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::diagnostics::Diagnostic;
use crate::routing::matcher::{normalize_host, path_without_query};
use crate::simulation::request::SimulatedRequest;

pub use hash::HashKey;
pub use upstream::{Upstream, UpstreamTarget};

/// Load balancing algorithm of an upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadBalancerKind {
    #[default]
    RoundRobin,
    Random,
    Weighted,
    Hash,
}

impl std::fmt::Display for LoadBalancerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            LoadBalancerKind::RoundRobin => "round_robin",
            LoadBalancerKind::Random => "random",
            LoadBalancerKind::Weighted => "weighted",
            LoadBalancerKind::Hash => "hash",
        };
        f.write_str(name)
    }
}

/// An algorithm's pick among two or more targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pick {
    pub index: usize,
    pub reason: String,
    pub warnings: Vec<Diagnostic>,
}

impl Pick {
    pub fn new(index: usize, reason: impl Into<String>) -> Self {
        Self {
            index,
            reason: reason.into(),
            warnings: Vec::new(),
        }
    }
}

/// The target chosen for a request and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub target: UpstreamTarget,
    pub reason: String,
    pub warnings: Vec<Diagnostic>,
}

/// Choose a target from `upstream` for `request`.
///
/// Returns `None` only when the upstream has no targets.
pub fn select_target(upstream: &Upstream, request: &SimulatedRequest) -> Option<Selection> {
    let targets = &upstream.targets;

    let pick = match targets.len() {
        0 => {
            tracing::debug!(upstream = %upstream.id, "No targets to select from");
            return None;
        }
        1 => Pick {
            index: 0,
            reason: format!(
                "single target; {} load balancing has no effect",
                upstream.load_balancer
            ),
            warnings: vec![Diagnostic::warning(
                "single_target",
                format!(
                    "upstream {} has a single target; load balancing has no effect",
                    upstream.id
                ),
            )],
        },
        _ => match upstream.load_balancer {
            LoadBalancerKind::RoundRobin => round_robin::select(targets),
            LoadBalancerKind::Random => random::select(targets, request),
            LoadBalancerKind::Weighted => weighted::select(upstream, request),
            LoadBalancerKind::Hash => hash::select(targets, &upstream.hash_key(), request),
        },
    };

    let target = targets.get(pick.index)?.clone();

    tracing::debug!(
        upstream = %upstream.id,
        algorithm = %upstream.load_balancer,
        target = %target.address,
        "Target selected"
    );

    Some(Selection {
        target,
        reason: pick.reason,
        warnings: pick.warnings,
    })
}

/// SHA-256 over `parts`, each terminated by a NUL byte so that
/// `["ab", "c"]` and `["a", "bc"]` differ.
pub(crate) fn digest(parts: &[&str]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update(part.as_bytes());
        hasher.update([0u8]);
    }
    hasher.finalize().into()
}

/// Seed derived from the request's method, host and path, normalized the
/// way the route matcher compares them.
pub(crate) fn request_seed(request: &SimulatedRequest) -> u64 {
    let method = request.method_upper();
    let host = normalize_host(&request.host);
    let hash = digest(&[
        method.as_str(),
        host.as_str(),
        path_without_query(&request.path),
    ]);
    leading_u64(&hash)
}

pub(crate) fn leading_u64(hash: &[u8; 32]) -> u64 {
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&hash[..8]);
    u64::from_be_bytes(bytes)
}

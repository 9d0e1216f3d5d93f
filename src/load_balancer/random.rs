//! Random load balancing strategy (request-seeded).

use crate::load_balancer::{request_seed, Pick, UpstreamTarget};
use crate::simulation::request::SimulatedRequest;

pub fn select(targets: &[UpstreamTarget], request: &SimulatedRequest) -> Pick {
    let seed = request_seed(request);
    let mut rng = fastrand::Rng::with_seed(seed);
    let index = rng.usize(..targets.len());

    Pick::new(
        index,
        format!(
            "random (seeded from request method, host and path; seed {:#018x}; picked {} of {})",
            seed,
            index + 1,
            targets.len()
        ),
    )
}

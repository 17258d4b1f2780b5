//! Local CPU/memory sampling. Real OS introspection is out of scope here;
//! the sampler synthesizes plausible values the same way the original
//! prototype did, so the scoring function always has fresh inputs.

use crate::node::Node;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// The two figures the scoring function reads besides queue length.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocalMetrics {
    pub cpu_utilization: f32,
    pub memory_utilization: f32,
}

impl Default for LocalMetrics {
    fn default() -> Self {
        Self {
            cpu_utilization: 0.0,
            memory_utilization: 0.0,
        }
    }
}

/// Draw one fresh reading: CPU uniform in [30, 100], memory uniform in [40, 100].
pub fn sample() -> LocalMetrics {
    let mut rng = rand::thread_rng();
    LocalMetrics {
        cpu_utilization: rng.gen_range(30.0..=100.0),
        memory_utilization: rng.gen_range(40.0..=100.0),
    }
}

/// Spawn the periodic metrics sampler. Exits as soon as `token` is cancelled.
pub fn spawn_metrics_loop(node: Arc<Node>, token: CancellationToken) -> JoinHandle<()> {
    let interval = node.config().metrics_interval();
    tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = token.cancelled() => break,
                _ = tokio::time::sleep(interval) => {
                    node.set_local_metrics(sample());
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sampled_values_stay_in_documented_ranges() {
        for _ in 0..200 {
            let m = sample();
            assert!((30.0..=100.0).contains(&m.cpu_utilization));
            assert!((40.0..=100.0).contains(&m.memory_utilization));
        }
    }
}

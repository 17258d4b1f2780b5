//! Fitness scoring. Pure function of queue length and the two sampled
//! utilization figures; never cached, always recomputed from the current
//! locked state.

use crate::config::ScoreWeights;

/// Higher is better: lower queue length, lower CPU, lower memory all push
/// the score up.
pub fn compute_score(
    queue_length: usize,
    cpu_utilization: f32,
    memory_utilization: f32,
    weights: ScoreWeights,
) -> f32 {
    (1.0 - weights.queue_weight * (queue_length as f32 / 100.0))
        + weights.cpu_weight * (1.0 - cpu_utilization / 100.0)
        + weights.memory_weight * (1.0 - memory_utilization / 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_node_scores_higher_than_loaded_node() {
        let w = ScoreWeights::default();
        let idle = compute_score(0, 30.0, 40.0, w);
        let loaded = compute_score(8, 95.0, 95.0, w);
        assert!(idle > loaded);
    }

    #[test]
    fn matches_hand_computed_value() {
        let w = ScoreWeights::default();
        // queue=0, cpu=0, mem=0 -> 1.0 + 0.4 + 0.3 = 1.7
        let s = compute_score(0, 0.0, 0.0, w);
        assert!((s - 1.7).abs() < 1e-6);
    }

    #[test]
    fn is_monotonically_decreasing_in_queue_length() {
        let w = ScoreWeights::default();
        let a = compute_score(1, 50.0, 50.0, w);
        let b = compute_score(5, 50.0, 50.0, w);
        assert!(a > b);
    }
}

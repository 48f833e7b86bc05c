//! Temporal smoothing of per-frame bar lengths
//!
//! Single-frame edge estimates flicker (occlusion, UI effects). The stabilizer
//! keeps a short history, picks the best supported cluster of recent values,
//! blends it with the previous output and only falls back to the last known
//! value while it has been stable for long enough.

use crate::error::{DetectError, DetectResult};
use std::collections::VecDeque;
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StabilizerConfig {
    /// Number of recent samples kept in the history
    pub recent_count: usize,
    /// Values within this distance of a cluster key join that cluster
    pub cluster_tolerance: u32,
    /// Candidates within this distance of the last output are blended with it
    pub blend_tolerance: u32,
    /// Weight of the previous output when blending
    pub blend_weight: f64,
    /// Streak needed to keep reporting the last value when samples are too sparse
    pub sparse_trust_streak: u32,
    /// Streak needed to keep reporting the last value when no cluster has enough support
    pub weak_trust_streak: u32,
}

impl Default for StabilizerConfig {
    fn default() -> Self {
        Self {
            recent_count: 9,
            cluster_tolerance: 3,
            blend_tolerance: 5,
            blend_weight: 0.7,
            sparse_trust_streak: 5,
            weak_trust_streak: 3,
        }
    }
}

impl StabilizerConfig {
    pub fn validate(&self) -> DetectResult<()> {
        if self.recent_count == 0 {
            return Err(DetectError::invalid_config(
                "hpbar_recent_length_count",
                "history must hold at least one sample",
            ));
        }
        if !(0.0..=1.0).contains(&self.blend_weight) {
            return Err(DetectError::invalid_config(
                "blend_weight",
                format!("must be within [0, 1], got {}", self.blend_weight),
            ));
        }
        Ok(())
    }
}

/// One per-frame measurement
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectionSample {
    /// `None` when no confident edge pair was found in the frame
    pub length: Option<u32>,
    pub timestamp: Instant,
}

impl DetectionSample {
    pub fn new(length: Option<u32>) -> Self {
        Self {
            length,
            timestamp: Instant::now(),
        }
    }
}

/// Filter output after one update
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StabilizedEstimate {
    pub length: Option<u32>,
    pub stable_streak: u32,
}

struct Cluster {
    key: u32,
    members: Vec<u32>,
}

impl Cluster {
    fn mean(&self) -> u32 {
        let sum: u64 = self.members.iter().map(|&v| v as u64).sum();
        (sum / self.members.len() as u64) as u32
    }
}

/// First-fit grouping: each value joins the first cluster whose key is within
/// `tolerance`, otherwise it opens a new cluster keyed by itself.
fn cluster_first_fit(values: &[u32], tolerance: u32) -> Vec<Cluster> {
    let mut clusters: Vec<Cluster> = Vec::new();
    for &value in values {
        match clusters
            .iter_mut()
            .find(|c| c.key.abs_diff(value) <= tolerance)
        {
            Some(cluster) => cluster.members.push(value),
            None => clusters.push(Cluster {
                key: value,
                members: vec![value],
            }),
        }
    }
    clusters
}

/// Largest cluster; the earliest formed one wins ties
fn largest_cluster(clusters: &[Cluster]) -> Option<&Cluster> {
    clusters.iter().fold(None, |best, cluster| match best {
        Some(b) if b.members.len() >= cluster.members.len() => Some(b),
        _ => Some(cluster),
    })
}

/// Debounced, outlier-resistant running estimate of one tracked bar
///
/// State is private to the instance; use one stabilizer per tracked quantity.
#[derive(Debug, Clone)]
pub struct TemporalStabilizer {
    config: StabilizerConfig,
    history: VecDeque<Option<u32>>,
    last_valid: Option<u32>,
    stable_streak: u32,
}

impl TemporalStabilizer {
    pub fn new(config: StabilizerConfig) -> Self {
        Self {
            history: VecDeque::with_capacity(config.recent_count + 1),
            config,
            last_valid: None,
            stable_streak: 0,
        }
    }

    pub fn config(&self) -> &StabilizerConfig {
        &self.config
    }

    /// Recent samples, oldest first
    pub fn history(&self) -> &VecDeque<Option<u32>> {
        &self.history
    }

    pub fn last_valid(&self) -> Option<u32> {
        self.last_valid
    }

    pub fn stable_streak(&self) -> u32 {
        self.stable_streak
    }

    /// Forget all history, e.g. when the tracked bar changes
    pub fn reset(&mut self) {
        self.history.clear();
        self.last_valid = None;
        self.stable_streak = 0;
    }

    /// Feed one frame's measurement and get the current stabilized estimate
    pub fn update(&mut self, sample: Option<u32>) -> StabilizedEstimate {
        self.history.push_back(sample);
        while self.history.len() > self.config.recent_count {
            self.history.pop_front();
        }

        let valid: Vec<u32> = self.history.iter().flatten().copied().collect();
        if valid.len() < self.config.recent_count / 3 {
            return self.estimate(self.trusted_last_valid(self.config.sparse_trust_streak));
        }

        let clusters = cluster_first_fit(&valid, self.config.cluster_tolerance);
        let Some(cluster) = largest_cluster(&clusters) else {
            return self.estimate(None);
        };

        if cluster.members.len() < self.history.len() / 3 {
            return self.estimate(self.trusted_last_valid(self.config.weak_trust_streak));
        }

        let mut candidate = cluster.mean();
        match self.last_valid {
            Some(last) if candidate.abs_diff(last) <= self.config.blend_tolerance => {
                let weight = self.config.blend_weight;
                candidate = (weight * last as f64 + (1.0 - weight) * candidate as f64).round() as u32;
                self.stable_streak = self.stable_streak.saturating_add(1);
            }
            _ => self.stable_streak = 0,
        }
        self.last_valid = Some(candidate);
        self.estimate(Some(candidate))
    }

    fn trusted_last_valid(&self, min_streak: u32) -> Option<u32> {
        if self.stable_streak > min_streak {
            self.last_valid
        } else {
            None
        }
    }

    fn estimate(&self, length: Option<u32>) -> StabilizedEstimate {
        StabilizedEstimate {
            length,
            stable_streak: self.stable_streak,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stabilizer(recent_count: usize) -> TemporalStabilizer {
        TemporalStabilizer::new(StabilizerConfig {
            recent_count,
            ..StabilizerConfig::default()
        })
    }

    fn feed(stabilizer: &mut TemporalStabilizer, value: Option<u32>, times: usize) -> StabilizedEstimate {
        let mut last = StabilizedEstimate::default();
        for _ in 0..times {
            last = stabilizer.update(value);
        }
        last
    }

    #[test]
    fn test_needs_a_third_of_history_before_reporting() {
        let mut s = stabilizer(9);
        assert_eq!(s.update(Some(100)).length, None);
        assert_eq!(s.update(Some(100)).length, None);
        let third = s.update(Some(100));
        assert_eq!(third.length, Some(100));
        assert_eq!(third.stable_streak, 0);
    }

    #[test]
    fn test_constant_stream_converges_and_streak_grows() {
        let mut s = stabilizer(9);
        feed(&mut s, Some(100), 3);

        let mut previous_streak = s.stable_streak();
        for _ in 0..12 {
            let estimate = s.update(Some(100));
            assert_eq!(estimate.length, Some(100));
            assert!(estimate.stable_streak > previous_streak);
            previous_streak = estimate.stable_streak;
        }
    }

    #[test]
    fn test_single_outlier_does_not_move_output() {
        let mut s = stabilizer(9);
        let settled = feed(&mut s, Some(100), 12);
        assert_eq!(settled.length, Some(100));

        let estimate = s.update(Some(9999));
        assert_eq!(estimate.length, Some(100));
        assert!(estimate.stable_streak > settled.stable_streak);
        assert_eq!(s.last_valid(), Some(100));
    }

    #[test]
    fn test_small_jitter_is_blended() {
        let mut s = stabilizer(3);
        assert_eq!(s.update(Some(100)).length, Some(100));
        // cluster [100, 103] -> mean 101 -> round(70.0 + 30.3) = 100
        assert_eq!(s.update(Some(103)).length, Some(100));
        // cluster [100, 103, 103] -> mean 102 -> round(70.0 + 30.6) = 101
        let estimate = s.update(Some(103));
        assert_eq!(estimate.length, Some(101));
        assert_eq!(estimate.stable_streak, 2);
    }

    #[test]
    fn test_cluster_mean_is_truncated() {
        let mut s = stabilizer(9);
        s.update(Some(100));
        s.update(Some(102));
        // mean(100, 102, 103) = 101.67, nothing to blend with yet
        let estimate = s.update(Some(103));
        assert_eq!(estimate.length, Some(101));
        assert_eq!(estimate.stable_streak, 0);
    }

    #[test]
    fn test_sustained_jump_resets_streak() {
        let mut s = stabilizer(9);
        feed(&mut s, Some(100), 12);

        let mut outputs = Vec::new();
        for _ in 0..9 {
            outputs.push(s.update(Some(150)));
        }
        // 100 keeps the majority for four rounds, then 150 takes over
        assert!(outputs[..4].iter().all(|e| e.length == Some(100)));
        assert_eq!(outputs[4].length, Some(150));
        assert_eq!(outputs[4].stable_streak, 0);
        assert_eq!(outputs[8].length, Some(150));
        assert_eq!(outputs[8].stable_streak, 4);
    }

    #[test]
    fn test_tie_goes_to_first_formed_cluster() {
        let mut s = stabilizer(4);
        for value in [10, 10, 50, 50] {
            s.update(Some(value));
        }
        assert_eq!(s.last_valid(), Some(10));
    }

    #[test]
    fn test_first_fit_uses_cluster_key_not_members() {
        let clusters = cluster_first_fit(&[10, 13, 16, 11], 3);
        let keys: Vec<u32> = clusters.iter().map(|c| c.key).collect();
        assert_eq!(keys, vec![10, 16]);
        assert_eq!(clusters[0].members, vec![10, 13, 11]);
    }

    #[test]
    fn test_absent_samples_keep_trusted_value() {
        let mut s = stabilizer(9);
        feed(&mut s, Some(100), 12);
        assert!(s.stable_streak() > 5);

        let estimate = feed(&mut s, None, 9);
        assert_eq!(estimate.length, Some(100));
        assert_eq!(s.history().iter().filter(|v| v.is_none()).count(), 9);
    }

    #[test]
    fn test_absent_samples_without_trust_report_nothing() {
        let mut s = stabilizer(3);
        feed(&mut s, Some(100), 2);

        let estimate = feed(&mut s, None, 3);
        assert_eq!(estimate.length, None);
        assert_eq!(estimate.stable_streak, 3);
        assert_eq!(s.last_valid(), Some(100));
    }

    #[test]
    fn test_scattered_samples_fall_back_on_weak_trust() {
        let mut trusted = stabilizer(9);
        feed(&mut trusted, Some(100), 12);
        let scattered = [10, 20, 30, 40, 50, 60, 70, 80, 90];
        let mut estimate = StabilizedEstimate::default();
        for value in scattered {
            estimate = trusted.update(Some(value));
        }
        // No cluster reaches 3 members once the 100s have left the history
        assert_eq!(estimate.length, Some(100));

        let mut untrusted = stabilizer(9);
        for value in scattered {
            estimate = untrusted.update(Some(value));
        }
        assert_eq!(estimate.length, None);
    }

    #[test]
    fn test_sparse_history_trusts_only_streak_above_five() {
        // Each absent sample still blends while a 100 is left in the window
        let mut at_limit = stabilizer(3);
        feed(&mut at_limit, Some(100), 4);
        let estimate = feed(&mut at_limit, None, 3);
        assert_eq!(estimate.stable_streak, 5);
        assert_eq!(estimate.length, None);

        let mut above = stabilizer(3);
        feed(&mut above, Some(100), 5);
        let estimate = feed(&mut above, None, 3);
        assert_eq!(estimate.stable_streak, 6);
        assert_eq!(estimate.length, Some(100));
    }

    #[test]
    fn test_weak_cluster_trusts_only_streak_above_three() {
        // Window ends as [_, 100, _, _, _, 10]: two valid singletons, support needs 2
        let mut at_limit = stabilizer(6);
        let mut estimate = StabilizedEstimate::default();
        for value in [Some(100), None, Some(100), None, None, None, Some(10)] {
            estimate = at_limit.update(value);
        }
        assert_eq!(estimate.stable_streak, 3);
        assert_eq!(estimate.length, None);

        let mut above = stabilizer(6);
        for value in [Some(100), Some(100), None, None, None, None, Some(10)] {
            estimate = above.update(value);
        }
        assert_eq!(estimate.stable_streak, 4);
        assert_eq!(estimate.length, Some(100));
    }

    #[test]
    fn test_reset_forgets_state() {
        let mut s = stabilizer(9);
        feed(&mut s, Some(100), 12);
        s.update(None);

        s.reset();
        assert!(s.history().is_empty());
        assert_eq!(s.last_valid(), None);
        assert_eq!(s.stable_streak(), 0);
        // Starts over: one sample is not enough support in a 9-frame window
        assert_eq!(s.update(Some(100)).length, None);
    }

    #[test]
    fn test_history_is_bounded() {
        let mut s = stabilizer(5);
        feed(&mut s, Some(42), 20);
        assert_eq!(s.history().len(), 5);
    }

    #[test]
    fn test_validate() {
        assert!(StabilizerConfig::default().validate().is_ok());
        let empty = StabilizerConfig {
            recent_count: 0,
            ..StabilizerConfig::default()
        };
        assert!(empty.validate().is_err());
    }
}

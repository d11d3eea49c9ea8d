//! Time sampling for animated schemas.
//!
//! A schema's samples are recorded at times described by a [`TimeSampling`];
//! the scene engine maps a query time to a sample index through it.

use crate::util::Chrono;

/// Type of time sampling.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum TimeSamplingType {
    /// Single static sample at time 0 (identity sampling).
    #[default]
    Identity,

    /// Uniform sampling: `start_time + index * time_per_cycle`.
    Uniform {
        time_per_cycle: Chrono,
        start_time: Chrono,
    },

    /// Cyclic sampling: repeating pattern of sample times.
    Cyclic {
        time_per_cycle: Chrono,
        times: Vec<Chrono>,
    },

    /// Acyclic sampling: explicit time for each sample.
    Acyclic {
        times: Vec<Chrono>,
    },
}

/// Time sampling information for a schema.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TimeSampling {
    /// The type of sampling.
    pub sampling_type: TimeSamplingType,
}

impl TimeSampling {
    /// Identity time sampling (single sample at time 0).
    pub const IDENTITY: Self = Self {
        sampling_type: TimeSamplingType::Identity,
    };

    /// Create uniform time sampling.
    pub fn uniform(time_per_cycle: Chrono, start_time: Chrono) -> Self {
        Self {
            sampling_type: TimeSamplingType::Uniform {
                time_per_cycle,
                start_time,
            },
        }
    }

    /// Create acyclic time sampling from explicit times.
    pub fn acyclic(times: Vec<Chrono>) -> Self {
        Self {
            sampling_type: TimeSamplingType::Acyclic { times },
        }
    }

    /// Create cyclic time sampling.
    pub fn cyclic(time_per_cycle: Chrono, times: Vec<Chrono>) -> Self {
        Self {
            sampling_type: TimeSamplingType::Cyclic {
                time_per_cycle,
                times,
            },
        }
    }

    /// Check if this is identity (static) sampling.
    #[inline]
    pub fn is_identity(&self) -> bool {
        matches!(self.sampling_type, TimeSamplingType::Identity)
    }

    /// Check that the sampling can produce sample times at all.
    ///
    /// Uniform and cyclic samplings need a positive cycle; cyclic and acyclic
    /// samplings need at least one stored time, sorted ascending. The times
    /// of one cycle must fit inside `time_per_cycle` so that sample times keep
    /// increasing across cycles.
    pub fn is_well_formed(&self) -> bool {
        fn ascending(times: &[Chrono]) -> bool {
            !times.is_empty() && times.windows(2).all(|w| w[0] <= w[1])
        }
        match &self.sampling_type {
            TimeSamplingType::Identity => true,
            TimeSamplingType::Uniform { time_per_cycle, .. } => *time_per_cycle > 0.0,
            TimeSamplingType::Cyclic { time_per_cycle, times } => {
                *time_per_cycle > 0.0
                    && ascending(times)
                    && times[times.len() - 1] < times[0] + *time_per_cycle
            }
            TimeSamplingType::Acyclic { times } => ascending(times),
        }
    }

    /// Get the time for a specific sample index.
    pub fn sample_time(&self, index: usize) -> Chrono {
        match &self.sampling_type {
            TimeSamplingType::Identity => 0.0,
            TimeSamplingType::Uniform { time_per_cycle, start_time } => {
                *start_time + (index as Chrono) * *time_per_cycle
            }
            TimeSamplingType::Cyclic { time_per_cycle, times } => {
                if times.is_empty() {
                    return 0.0;
                }
                let cycle = index / times.len();
                let local_idx = index % times.len();
                times[local_idx] + (cycle as Chrono) * *time_per_cycle
            }
            TimeSamplingType::Acyclic { times } => times.get(index).copied().unwrap_or(0.0),
        }
    }

    /// First and last sample times for `num_samples` samples.
    pub fn time_range(&self, num_samples: usize) -> Option<(Chrono, Chrono)> {
        if num_samples == 0 {
            return None;
        }
        Some((self.sample_time(0), self.sample_time(num_samples - 1)))
    }

    /// Find the floor index (largest index with time <= given time).
    pub fn floor_index(&self, time: Chrono, num_samples: usize) -> (usize, Chrono) {
        if num_samples == 0 {
            return (0, 0.0);
        }

        match &self.sampling_type {
            TimeSamplingType::Identity => (0, 0.0),
            TimeSamplingType::Uniform { time_per_cycle, start_time } => {
                if time <= *start_time {
                    return (0, *start_time);
                }
                let idx = ((time - start_time) / time_per_cycle).floor() as usize;
                let idx = idx.min(num_samples - 1);
                (idx, self.sample_time(idx))
            }
            TimeSamplingType::Cyclic { .. } | TimeSamplingType::Acyclic { .. } => {
                let mut lo = 0;
                let mut hi = num_samples;
                while lo < hi {
                    let mid = lo + (hi - lo) / 2;
                    if self.sample_time(mid) <= time {
                        lo = mid + 1;
                    } else {
                        hi = mid;
                    }
                }
                let idx = lo.saturating_sub(1);
                (idx, self.sample_time(idx))
            }
        }
    }

    /// Find the nearest index to the given time.
    ///
    /// Ties go to the earlier sample.
    pub fn near_index(&self, time: Chrono, num_samples: usize) -> (usize, Chrono) {
        if num_samples == 0 {
            return (0, 0.0);
        }

        let (floor_idx, floor_time) = self.floor_index(time, num_samples);
        if floor_idx >= num_samples - 1 || floor_time > time {
            return (floor_idx, floor_time);
        }

        let ceil_idx = floor_idx + 1;
        let ceil_time = self.sample_time(ceil_idx);

        if (time - floor_time).abs() <= (ceil_time - time).abs() {
            (floor_idx, floor_time)
        } else {
            (ceil_idx, ceil_time)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_sampling() {
        let ts = TimeSampling::uniform(1.0 / 24.0, 0.0);

        assert_eq!(ts.sample_time(0), 0.0);
        assert!((ts.sample_time(24) - 1.0).abs() < 1e-10);
        assert!((ts.sample_time(48) - 2.0).abs() < 1e-10);
    }

    #[test]
    fn test_acyclic_sampling() {
        let ts = TimeSampling::acyclic(vec![0.0, 0.5, 1.0, 2.0]);

        assert_eq!(ts.sample_time(1), 0.5);
        assert_eq!(ts.sample_time(3), 2.0);
        assert_eq!(ts.time_range(4), Some((0.0, 2.0)));
        assert_eq!(ts.time_range(0), None);
    }

    #[test]
    fn test_cyclic_sampling() {
        let ts = TimeSampling::cyclic(1.0, vec![0.0, 0.25]);

        assert_eq!(ts.sample_time(2), 1.0);
        assert_eq!(ts.sample_time(3), 1.25);
        assert_eq!(ts.near_index(1.2, 4).0, 3);
    }

    #[test]
    fn test_floor_index() {
        let ts = TimeSampling::uniform(1.0, 0.0);

        assert_eq!(ts.floor_index(0.5, 10).0, 0);
        assert_eq!(ts.floor_index(1.5, 10).0, 1);
        assert_eq!(ts.floor_index(5.0, 10).0, 5);
        assert_eq!(ts.floor_index(50.0, 10).0, 9);
    }

    #[test]
    fn test_near_index() {
        let ts = TimeSampling::uniform(1.0, 0.0);

        assert_eq!(ts.near_index(0.4, 3).0, 0);
        assert_eq!(ts.near_index(0.6, 3).0, 1);
        // tie resolves to the earlier sample
        assert_eq!(ts.near_index(0.5, 3).0, 0);
        assert_eq!(ts.near_index(-3.0, 3).0, 0);
        assert_eq!(ts.near_index(9.0, 3).0, 2);
    }

    #[test]
    fn test_near_index_acyclic_before_first() {
        let ts = TimeSampling::acyclic(vec![1.0, 2.0]);
        assert_eq!(ts.near_index(0.0, 2), (0, 1.0));
        assert_eq!(ts.near_index(1.6, 2), (1, 2.0));
    }

    #[test]
    fn test_well_formed() {
        assert!(TimeSampling::IDENTITY.is_well_formed());
        assert!(TimeSampling::uniform(0.5, 0.0).is_well_formed());
        assert!(!TimeSampling::uniform(0.0, 0.0).is_well_formed());
        assert!(!TimeSampling::acyclic(vec![]).is_well_formed());
        assert!(!TimeSampling::acyclic(vec![1.0, 0.0]).is_well_formed());
        assert!(TimeSampling::cyclic(1.0, vec![0.0, 0.25]).is_well_formed());
        assert!(!TimeSampling::cyclic(1.0, vec![0.0, 2.0]).is_well_formed());
        assert!(!TimeSampling::cyclic(1.0, vec![0.5, 1.5]).is_well_formed());
    }
}

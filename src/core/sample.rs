//! Sample selection.

use super::TimeSampling;
use crate::util::Chrono;

/// Sample selector for reading schema samples.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SampleSelector {
    /// Select by exact index.
    Index(usize),
    /// Select by time - nearest.
    TimeNear(Chrono),
}

impl SampleSelector {
    /// Create a selector for index 0 (first/static sample).
    pub const fn first() -> Self {
        Self::Index(0)
    }

    /// Create a selector for nearest time.
    pub const fn time_near(t: Chrono) -> Self {
        Self::TimeNear(t)
    }

    /// Resolve to a sample index, clamped to the available samples.
    ///
    /// Returns `None` when there are no samples.
    pub fn resolve(&self, sampling: &TimeSampling, num_samples: usize) -> Option<usize> {
        if num_samples == 0 {
            return None;
        }
        let index = match *self {
            Self::Index(i) => i.min(num_samples - 1),
            Self::TimeNear(t) => sampling.near_index(t, num_samples).0,
        };
        Some(index)
    }
}

impl Default for SampleSelector {
    fn default() -> Self {
        Self::Index(0)
    }
}

impl From<usize> for SampleSelector {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

impl From<Chrono> for SampleSelector {
    fn from(time: Chrono) -> Self {
        Self::TimeNear(time)
    }
}

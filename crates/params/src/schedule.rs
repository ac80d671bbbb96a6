//! Time-interval schedules for time-inhomogeneous models.

use crate::error::ParamError;

/// An ordered partition of the simulation horizon into time intervals.
///
/// Each interval `k` starts at `starts[k]` and extends to the start of the
/// next interval; the last interval is open-ended. Parameter bindings and
/// transition matrices may change only at these boundaries.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSchedule {
    starts: Vec<f64>,
}

impl TimeSchedule {
    /// Creates a schedule from interval start boundaries.
    ///
    /// # Errors
    ///
    /// Returns [`ParamError::InvalidSchedule`] if `starts` is empty,
    /// contains non-finite values, or is not strictly increasing.
    pub fn new(starts: Vec<f64>) -> Result<Self, ParamError> {
        if starts.is_empty() {
            return Err(ParamError::InvalidSchedule {
                reason: "no interval boundaries".to_string(),
            });
        }
        for &s in &starts {
            if !s.is_finite() {
                return Err(ParamError::InvalidSchedule {
                    reason: format!("non-finite boundary: {s}"),
                });
            }
        }
        for w in starts.windows(2) {
            if w[1] <= w[0] {
                return Err(ParamError::InvalidSchedule {
                    reason: format!("boundaries not strictly increasing: {} then {}", w[0], w[1]),
                });
            }
        }
        Ok(Self { starts })
    }

    /// Creates a single-interval schedule starting at time 0.
    ///
    /// Useful for time-homogeneous models where nothing varies over the
    /// horizon.
    pub fn single() -> Self {
        Self { starts: vec![0.0] }
    }

    /// Returns the number of intervals.
    pub fn n_intervals(&self) -> usize {
        self.starts.len()
    }

    /// Returns the interval start boundaries.
    pub fn starts(&self) -> &[f64] {
        &self.starts
    }

    /// Resolves an evaluation time to the index of the interval containing it.
    ///
    /// The applicable interval is the one with the latest start boundary
    /// less than or equal to `time`.
    ///
    /// # Errors
    ///
    /// Returns [`ParamError::NoApplicableInterval`] if `time` is NaN or
    /// precedes the first boundary.
    pub fn interval_at(&self, time: f64) -> Result<usize, ParamError> {
        if !(time >= self.starts[0]) {
            return Err(ParamError::NoApplicableInterval {
                time,
                first_start: self.starts[0],
            });
        }
        // partition_point gives the count of boundaries <= time.
        let idx = self.starts.partition_point(|&s| s <= time);
        Ok(idx - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_interval() {
        let sched = TimeSchedule::single();
        assert_eq!(sched.n_intervals(), 1);
        assert_eq!(sched.interval_at(0.0).unwrap(), 0);
        assert_eq!(sched.interval_at(1000.0).unwrap(), 0);
    }

    #[test]
    fn interval_resolution() {
        let sched = TimeSchedule::new(vec![0.0, 2.0, 10.0]).unwrap();
        assert_eq!(sched.interval_at(0.0).unwrap(), 0);
        assert_eq!(sched.interval_at(1.999).unwrap(), 0);
        // A boundary belongs to the interval it starts.
        assert_eq!(sched.interval_at(2.0).unwrap(), 1);
        assert_eq!(sched.interval_at(9.0).unwrap(), 1);
        assert_eq!(sched.interval_at(10.0).unwrap(), 2);
        // Last interval is open-ended.
        assert_eq!(sched.interval_at(1e9).unwrap(), 2);
    }

    #[test]
    fn time_before_first_boundary() {
        let sched = TimeSchedule::new(vec![1.0, 2.0]).unwrap();
        assert!(matches!(
            sched.interval_at(0.5),
            Err(ParamError::NoApplicableInterval { .. })
        ));
    }

    #[test]
    fn nan_time_rejected() {
        let sched = TimeSchedule::single();
        assert!(matches!(
            sched.interval_at(f64::NAN),
            Err(ParamError::NoApplicableInterval { .. })
        ));
    }

    #[test]
    fn empty_boundaries_rejected() {
        assert!(matches!(
            TimeSchedule::new(vec![]),
            Err(ParamError::InvalidSchedule { .. })
        ));
    }

    #[test]
    fn non_increasing_rejected() {
        assert!(TimeSchedule::new(vec![0.0, 2.0, 2.0]).is_err());
        assert!(TimeSchedule::new(vec![0.0, 2.0, 1.0]).is_err());
    }

    #[test]
    fn non_finite_rejected() {
        assert!(TimeSchedule::new(vec![0.0, f64::INFINITY]).is_err());
        assert!(TimeSchedule::new(vec![f64::NAN]).is_err());
    }
}

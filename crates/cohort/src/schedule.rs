//! Cycle-indexed transition-matrix schedules.

use iaso_params::TimeSchedule;
use iaso_tpmatrix::TransitionMatrix;

use crate::error::CohortError;

/// One transition matrix per time interval, addressed by simulation cycle.
///
/// Cycle `i` (1-based) evolves the cohort over the time span
/// `[(i-1) * cycle_length, i * cycle_length)`; the applicable matrix is
/// the one whose interval contains the span's start. Matrices change only
/// at interval boundaries, never mid-interval.
#[derive(Debug, Clone)]
pub struct MatrixSchedule {
    schedule: TimeSchedule,
    matrices: Vec<TransitionMatrix>,
    cycle_length: f64,
}

impl MatrixSchedule {
    /// Creates a schedule from per-interval matrices.
    ///
    /// # Errors
    ///
    /// Returns [`CohortError::EmptySchedule`] for zero matrices,
    /// [`CohortError::MatrixCountMismatch`] if the matrix and interval
    /// counts disagree, [`CohortError::StateCountMismatch`] if the
    /// matrices disagree on state count, [`CohortError::InvalidCycleLength`]
    /// for a non-positive cycle length, [`CohortError::UncoveredCycles`]
    /// if the first interval starts after time 0, and any matrix
    /// validation failure.
    pub fn new(
        schedule: TimeSchedule,
        matrices: Vec<TransitionMatrix>,
        cycle_length: f64,
    ) -> Result<Self, CohortError> {
        if matrices.is_empty() {
            return Err(CohortError::EmptySchedule);
        }
        if matrices.len() != schedule.n_intervals() {
            return Err(CohortError::MatrixCountMismatch {
                intervals: schedule.n_intervals(),
                matrices: matrices.len(),
            });
        }
        if !(cycle_length.is_finite() && cycle_length > 0.0) {
            return Err(CohortError::InvalidCycleLength {
                value: cycle_length,
            });
        }
        if schedule.starts()[0] > 0.0 {
            return Err(CohortError::UncoveredCycles {
                start: schedule.starts()[0],
            });
        }
        let n_states = matrices[0].n_states();
        for m in &matrices {
            if m.n_states() != n_states {
                return Err(CohortError::StateCountMismatch {
                    expected: n_states,
                    got: m.n_states(),
                });
            }
            m.validate()?;
        }
        Ok(Self {
            schedule,
            matrices,
            cycle_length,
        })
    }

    /// Creates a single-matrix schedule for a time-homogeneous model.
    ///
    /// # Errors
    ///
    /// Returns the same validation errors as [`MatrixSchedule::new`].
    pub fn constant(matrix: TransitionMatrix, cycle_length: f64) -> Result<Self, CohortError> {
        Self::new(TimeSchedule::single(), vec![matrix], cycle_length)
    }

    /// Returns the number of states.
    pub fn n_states(&self) -> usize {
        self.matrices[0].n_states()
    }

    /// Returns the cycle length in model time units.
    pub fn cycle_length(&self) -> f64 {
        self.cycle_length
    }

    /// Returns the matrix applicable to a 1-based simulation cycle.
    ///
    /// # Panics
    ///
    /// Panics if `cycle` is 0.
    pub fn for_cycle(&self, cycle: usize) -> &TransitionMatrix {
        assert!(cycle >= 1, "cycles are 1-based, got {cycle}");
        let start_time = (cycle - 1) as f64 * self.cycle_length;
        // Coverage of t >= 0 was checked at construction.
        let interval = self
            .schedule
            .interval_at(start_time)
            .expect("schedule covers all non-negative times");
        &self.matrices[interval]
    }
}

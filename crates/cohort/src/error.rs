//! Error types for the iaso-cohort crate.

use iaso_tpmatrix::TpMatrixError;

/// Error type for all fallible operations in the iaso-cohort crate.
#[derive(Debug, Clone, thiserror::Error)]
pub enum CohortError {
    /// Returned when an occupancy vector fails the simplex invariant
    /// beyond tolerance. Cycle 0 is the initial distribution.
    #[error("invalid distribution at cycle {cycle}: sums to {sum}, expected 1")]
    InvalidDistribution {
        /// The cycle at which the invariant broke.
        cycle: usize,
        /// The offending sum.
        sum: f64,
    },

    /// Returned when an occupancy entry is negative beyond tolerance or
    /// non-finite.
    #[error("invalid probability at cycle {cycle}, state {state}: {value}")]
    InvalidProbability {
        /// The cycle at which the entry appeared.
        cycle: usize,
        /// The state index.
        state: usize,
        /// The offending value.
        value: f64,
    },

    /// Returned when the initial distribution's length disagrees with the
    /// matrices' state count.
    #[error("state count mismatch: expected {expected}, got {got}")]
    StateCountMismatch {
        /// Expected state count.
        expected: usize,
        /// Actual state count.
        got: usize,
    },

    /// Returned when a pre-allocated trajectory buffer has the wrong length.
    #[error("buffer length mismatch: expected {expected}, got {got}")]
    BufferLengthMismatch {
        /// Expected buffer length.
        expected: usize,
        /// Actual buffer length.
        got: usize,
    },

    /// Returned when a matrix schedule has no matrices.
    #[error("matrix schedule is empty")]
    EmptySchedule,

    /// Returned when the matrix count disagrees with the schedule's
    /// interval count.
    #[error("matrix count mismatch: {intervals} intervals but {matrices} matrices")]
    MatrixCountMismatch {
        /// Number of schedule intervals.
        intervals: usize,
        /// Number of matrices supplied.
        matrices: usize,
    },

    /// Returned when the cycle length is not a positive finite number.
    #[error("invalid cycle length: {value} (must be finite and > 0)")]
    InvalidCycleLength {
        /// The offending value.
        value: f64,
    },

    /// Returned when a schedule does not cover time 0, so some cycle would
    /// have no applicable matrix.
    #[error("schedule starts at {start}, leaving cycles before it uncovered")]
    UncoveredCycles {
        /// Start of the schedule's first interval.
        start: f64,
    },

    /// Wrapped transition-matrix error.
    #[error(transparent)]
    Matrix(#[from] TpMatrixError),
}

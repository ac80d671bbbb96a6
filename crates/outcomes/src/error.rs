//! Error types for the iaso-outcomes crate.

/// Error type for all fallible operations in the iaso-outcomes crate.
#[derive(Debug, Clone, thiserror::Error)]
pub enum OutcomeError {
    /// Returned when a value schedule leaves a simulated cycle without an
    /// assigned state-value vector.
    #[error("no value assigned to cycle {cycle} (evaluation time {time})")]
    MismatchedLength {
        /// The uncovered cycle.
        cycle: usize,
        /// The cycle's evaluation time.
        time: f64,
    },

    /// Returned when state-value vectors disagree with the trajectory's
    /// state count.
    #[error("state count mismatch: expected {expected}, got {got}")]
    StateCountMismatch {
        /// Expected state count.
        expected: usize,
        /// Actual state count.
        got: usize,
    },

    /// Returned when a value schedule has no state values at all.
    #[error("value schedule is empty")]
    EmptyValues,

    /// Returned when a state value is NaN or infinite.
    #[error("non-finite value for state {state}: {value}")]
    NonFiniteValue {
        /// The state index.
        state: usize,
        /// The offending value.
        value: f64,
    },

    /// Returned when per-interval value rows disagree with the schedule's
    /// interval count.
    #[error("interval count mismatch: {intervals} intervals but {rows} value rows")]
    IntervalCountMismatch {
        /// Number of schedule intervals.
        intervals: usize,
        /// Number of value rows supplied.
        rows: usize,
    },

    /// Returned when a discount rate is NaN, infinite, or at most -1.
    #[error("invalid discount rate: {value} (must be finite and > -1)")]
    InvalidDiscountRate {
        /// The offending value.
        value: f64,
    },

    /// Returned when the cycle length is not a positive finite number.
    #[error("invalid cycle length: {value} (must be finite and > 0)")]
    InvalidCycleLength {
        /// The offending value.
        value: f64,
    },
}

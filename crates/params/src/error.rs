//! Error types for the iaso-params crate.

/// Error type for all fallible operations in the iaso-params crate.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ParamError {
    /// Returned when a parameter name was never registered.
    #[error("unknown parameter: '{name}'")]
    UnknownParameter {
        /// The unregistered name.
        name: String,
    },

    /// Returned when a parameter name is registered twice.
    #[error("parameter '{name}' is already registered")]
    DuplicateParameter {
        /// The duplicated name.
        name: String,
    },

    /// Returned when a sample, stratum, or interval index exceeds the
    /// configured bounds.
    #[error("{axis} index {index} out of range (bound: {bound})")]
    IndexOutOfRange {
        /// Which axis overflowed ("sample", "stratum", or "interval").
        axis: &'static str,
        /// The requested index.
        index: usize,
        /// The exclusive upper bound.
        bound: usize,
    },

    /// Returned when an evaluation time precedes the first interval boundary.
    #[error("no applicable interval: time {time} precedes first boundary {first_start}")]
    NoApplicableInterval {
        /// The requested evaluation time.
        time: f64,
        /// Start of the first interval.
        first_start: f64,
    },

    /// Returned when a time schedule is structurally invalid.
    #[error("invalid time schedule: {reason}")]
    InvalidSchedule {
        /// Description of the problem.
        reason: String,
    },

    /// Returned when a registered value's dimensions disagree with the
    /// store's configured bounds.
    #[error("parameter '{name}': expected {expected} values, got {got}")]
    DimensionMismatch {
        /// The parameter being registered.
        name: String,
        /// Expected element count.
        expected: usize,
        /// Actual element count.
        got: usize,
    },

    /// Returned when a distribution specification has invalid hyperparameters.
    #[error("invalid distribution for '{name}': {reason}")]
    InvalidSpec {
        /// The parameter the specification belongs to.
        name: String,
        /// Description of the problem.
        reason: String,
    },
}

//! Error types for the iaso-tpmatrix crate.

use iaso_params::ParamError;

/// Error type for all fallible operations in the iaso-tpmatrix crate.
#[derive(Debug, Clone, thiserror::Error)]
pub enum TpMatrixError {
    /// Returned when a template or matrix has fewer than 2 states.
    #[error("too few states: {n_states} (need at least 2)")]
    TooFewStates {
        /// The offending state count.
        n_states: usize,
    },

    /// Returned when a cell grid does not contain exactly S x S entries.
    #[error("cell count mismatch: expected {expected}, got {got}")]
    CellCountMismatch {
        /// Expected cell count (S x S).
        expected: usize,
        /// Actual cell count.
        got: usize,
    },

    /// Returned when a row contains more than one complement marker.
    #[error("row {row} has more than one complement marker")]
    MultipleComplements {
        /// The offending row index.
        row: usize,
    },

    /// Returned when a declared absorbing state is out of range.
    #[error("absorbing state {state} out of range for {n_states} states")]
    AbsorbingOutOfRange {
        /// The declared state index.
        state: usize,
        /// Number of states in the template.
        n_states: usize,
    },

    /// Returned when a declared absorbing state's row is not the identity
    /// row for that state.
    #[error("absorbing state {state} does not have an identity row: {reason}")]
    InvalidAbsorbingRow {
        /// The declared state index.
        state: usize,
        /// Description of the problem.
        reason: String,
    },

    /// Returned when a resolved cell is non-finite or outside [0, 1].
    #[error("entry ({row}, {col}) = {value} is not a probability")]
    InvalidEntry {
        /// Row index.
        row: usize,
        /// Column index.
        col: usize,
        /// The offending value.
        value: f64,
    },

    /// Returned when a row fails to sum to 1 after complement resolution.
    #[error("invalid row {row}: {reason}")]
    InvalidRow {
        /// The offending row index.
        row: usize,
        /// Description of the problem.
        reason: String,
    },

    /// Wrapped parameter-store lookup failure.
    #[error(transparent)]
    Param(#[from] ParamError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_invalid_row() {
        let e = TpMatrixError::InvalidRow {
            row: 1,
            reason: "sums to 1.1".to_string(),
        };
        assert_eq!(e.to_string(), "invalid row 1: sums to 1.1");
    }

    #[test]
    fn display_invalid_entry() {
        let e = TpMatrixError::InvalidEntry {
            row: 0,
            col: 2,
            value: 1.5,
        };
        assert_eq!(e.to_string(), "entry (0, 2) = 1.5 is not a probability");
    }

    #[test]
    fn param_error_wraps_transparently() {
        let inner = ParamError::UnknownParameter {
            name: "p".to_string(),
        };
        let e = TpMatrixError::from(inner.clone());
        assert_eq!(e.to_string(), inner.to_string());
    }

    #[test]
    fn error_is_send_and_sync() {
        fn assert_impl<T: Send + Sync>() {}
        assert_impl::<TpMatrixError>();
    }
}

//! Error types for the iaso-model crate.

use iaso_cohort::CohortError;
use iaso_outcomes::OutcomeError;
use iaso_params::ParamError;
use iaso_tpmatrix::TpMatrixError;

/// Error type for all fallible operations in the iaso-model crate.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ModelError {
    /// Returned when the model definition is internally inconsistent.
    #[error("invalid model definition ({field}): {reason}")]
    InvalidDefinition {
        /// The offending definition field.
        field: String,
        /// Description of the problem.
        reason: String,
    },

    /// Returned when a definition file cannot be read.
    #[error("cannot read '{path}': {reason}")]
    Io {
        /// The path that failed.
        path: String,
        /// Description of the failure.
        reason: String,
    },

    /// Returned when a definition file cannot be parsed.
    ///
    /// The `reason` field is a `String` (not a toml error type) because
    /// toml errors do not implement `Clone`.
    #[error("cannot parse model definition: {reason}")]
    Parse {
        /// Description of the parse failure.
        reason: String,
    },

    /// Returned when results cannot be serialized.
    #[error("serialization failed: {reason}")]
    Serialization {
        /// Description of the failure.
        reason: String,
    },

    /// Wrapped parameter-store error.
    #[error(transparent)]
    Param(#[from] ParamError),

    /// Wrapped transition-matrix error.
    #[error(transparent)]
    Matrix(#[from] TpMatrixError),

    /// Wrapped propagation error.
    #[error(transparent)]
    Cohort(#[from] CohortError),

    /// Wrapped outcome-integration error.
    #[error(transparent)]
    Outcome(#[from] OutcomeError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_invalid_definition() {
        let e = ModelError::InvalidDefinition {
            field: "states".to_string(),
            reason: "need at least 2".to_string(),
        };
        assert_eq!(
            e.to_string(),
            "invalid model definition (states): need at least 2"
        );
    }

    #[test]
    fn inner_errors_wrap_transparently() {
        let inner = ParamError::UnknownParameter {
            name: "p".to_string(),
        };
        assert_eq!(ModelError::from(inner.clone()).to_string(), inner.to_string());
    }

    #[test]
    fn error_is_send_and_sync() {
        fn assert_impl<T: Send + Sync>() {}
        assert_impl::<ModelError>();
    }
}

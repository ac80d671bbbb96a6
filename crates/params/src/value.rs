//! Semantic parameter-value containers.

use crate::error::ParamError;

/// A parameter value with one of three index layouts.
///
/// A `Scalar` is constant across every sample and stratum. `PerStratum`
/// varies by population stratum but not by draw. `Draws` carries one value
/// per (sample, stratum) pair in row-major order.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    /// A single value broadcast across all samples and strata.
    Scalar(f64),
    /// One value per population stratum, constant across samples.
    PerStratum(Vec<f64>),
    /// One value per (sample, stratum) pair, row-major by sample.
    Draws {
        /// Number of parameter-sample draws.
        n_samples: usize,
        /// Number of population strata.
        n_strata: usize,
        /// `n_samples * n_strata` values, row-major by sample.
        values: Vec<f64>,
    },
}

impl ParamValue {
    /// Creates a `Draws` value, checking the element count.
    ///
    /// # Errors
    ///
    /// Returns [`ParamError::DimensionMismatch`] if
    /// `values.len() != n_samples * n_strata`.
    pub fn draws(
        name: &str,
        n_samples: usize,
        n_strata: usize,
        values: Vec<f64>,
    ) -> Result<Self, ParamError> {
        let expected = n_samples * n_strata;
        if values.len() != expected {
            return Err(ParamError::DimensionMismatch {
                name: name.to_string(),
                expected,
                got: values.len(),
            });
        }
        Ok(Self::Draws {
            n_samples,
            n_strata,
            values,
        })
    }

    /// Reads the value for a (sample, stratum) pair.
    ///
    /// Scalars ignore both indices; `PerStratum` ignores the sample index.
    /// Bounds are the caller's responsibility ([`crate::ParameterSet::get`]
    /// checks them against the store's configured dimensions).
    pub(crate) fn at(&self, sample: usize, stratum: usize) -> f64 {
        match self {
            Self::Scalar(v) => *v,
            Self::PerStratum(v) => v[stratum],
            Self::Draws {
                n_strata, values, ..
            } => values[sample * n_strata + stratum],
        }
    }
}

//! Row-stochastic transition-probability matrices.

use crate::error::TpMatrixError;

/// Tolerance on row sums: a row must sum to 1 within this bound.
pub const ROW_SUM_TOL: f64 = 1e-8;

/// A square row-stochastic transition-probability matrix.
///
/// Row `i` holds the probabilities of moving from state `i` to each state
/// over one cycle. Entries are stored row-major. One instance exists per
/// (sample, stratum, time interval); instances are immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionMatrix {
    n_states: usize,
    probs: Vec<f64>,
}

impl TransitionMatrix {
    /// Constructs a matrix from rows, validating the stochastic invariant.
    ///
    /// # Errors
    ///
    /// Returns [`TpMatrixError::TooFewStates`] for fewer than 2 rows,
    /// [`TpMatrixError::CellCountMismatch`] for ragged rows, and the
    /// validation errors of [`TransitionMatrix::validate`].
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, TpMatrixError> {
        let n_states = rows.len();
        if n_states < 2 {
            return Err(TpMatrixError::TooFewStates { n_states });
        }
        let mut probs = Vec::with_capacity(n_states * n_states);
        for row in &rows {
            if row.len() != n_states {
                return Err(TpMatrixError::CellCountMismatch {
                    expected: n_states,
                    got: row.len(),
                });
            }
            probs.extend_from_slice(row);
        }
        let matrix = Self { n_states, probs };
        matrix.validate()?;
        Ok(matrix)
    }

    /// Constructs a matrix from a pre-validated flat buffer.
    pub(crate) fn from_probs_unchecked(n_states: usize, probs: Vec<f64>) -> Self {
        debug_assert_eq!(probs.len(), n_states * n_states);
        Self { n_states, probs }
    }

    /// Returns the identity matrix, which keeps every state where it is.
    ///
    /// # Panics
    ///
    /// Panics if `n_states < 2`.
    pub fn identity(n_states: usize) -> Self {
        assert!(n_states >= 2, "identity needs at least 2 states");
        let mut probs = vec![0.0; n_states * n_states];
        for i in 0..n_states {
            probs[i * n_states + i] = 1.0;
        }
        Self { n_states, probs }
    }

    /// Returns the number of states.
    pub fn n_states(&self) -> usize {
        self.n_states
    }

    /// Returns the transition probabilities out of a given state.
    ///
    /// # Panics
    ///
    /// Panics if `from >= n_states`.
    pub fn row(&self, from: usize) -> &[f64] {
        assert!(
            from < self.n_states,
            "state must be < {}, got {from}",
            self.n_states
        );
        &self.probs[from * self.n_states..(from + 1) * self.n_states]
    }

    /// Returns the probability of transitioning from one state to another.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of range.
    pub fn prob(&self, from: usize, to: usize) -> f64 {
        assert!(to < self.n_states, "state must be < {}, got {to}", self.n_states);
        self.row(from)[to]
    }

    /// Validates that the matrix is row-stochastic.
    ///
    /// Checks that all entries are finite, in `[0, 1]`, and that each row
    /// sums to 1 within [`ROW_SUM_TOL`].
    ///
    /// # Errors
    ///
    /// Returns [`TpMatrixError::InvalidEntry`] or
    /// [`TpMatrixError::InvalidRow`].
    pub fn validate(&self) -> Result<(), TpMatrixError> {
        for i in 0..self.n_states {
            let row = &self.probs[i * self.n_states..(i + 1) * self.n_states];
            let mut sum = 0.0;
            for (j, &p) in row.iter().enumerate() {
                if !p.is_finite() || !(0.0..=1.0).contains(&p) {
                    return Err(TpMatrixError::InvalidEntry {
                        row: i,
                        col: j,
                        value: p,
                    });
                }
                sum += p;
            }
            if (sum - 1.0).abs() > ROW_SUM_TOL {
                return Err(TpMatrixError::InvalidRow {
                    row: i,
                    reason: format!("sums to {sum}, expected 1"),
                });
            }
        }
        Ok(())
    }

    /// Returns true if `state`'s row is the identity row for that state.
    pub fn is_absorbing(&self, state: usize) -> bool {
        self.row(state)
            .iter()
            .enumerate()
            .all(|(j, &p)| if j == state { p == 1.0 } else { p == 0.0 })
    }
}

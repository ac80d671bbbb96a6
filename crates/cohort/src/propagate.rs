//! The discrete-time Markov cohort forward pass.

use tracing::warn;

use crate::error::CohortError;
use crate::schedule::MatrixSchedule;
use crate::trajectory::OccupancyTrajectory;

/// Hard bound on occupancy-vector drift: a vector whose sum differs from 1
/// by more than this is a model-construction bug, not rounding.
pub const DISTRIBUTION_TOL: f64 = 1e-6;

/// Drift at or below this is indistinguishable from exact and left alone;
/// drift between here and [`DISTRIBUTION_TOL`] is re-normalized in place
/// with a logged warning.
const DRIFT_EPS: f64 = 1e-12;

/// Entries more negative than this are a hard failure; less negative
/// entries are rounding artifacts and are clamped to zero.
const NEGATIVE_EPS: f64 = 1e-9;

/// Computes the occupancy trajectory of a cohort.
///
/// `trajectory[0]` is the initial distribution; `trajectory[i]` is
/// `trajectory[i-1]` times the matrix [`MatrixSchedule::for_cycle`] selects
/// for cycle `i`. Work is `O(n_cycles * n_states^2)`; the caller repeats
/// it once per (sample, stratum, strategy) combination.
///
/// # Errors
///
/// Returns [`CohortError::StateCountMismatch`] if the initial
/// distribution's length disagrees with the matrices, and
/// [`CohortError::InvalidDistribution`] / [`CohortError::InvalidProbability`]
/// if the initial distribution or any propagated vector breaks the simplex
/// invariant beyond tolerance.
pub fn propagate(
    initial: &[f64],
    matrices: &MatrixSchedule,
    n_cycles: usize,
) -> Result<OccupancyTrajectory, CohortError> {
    let n_states = matrices.n_states();
    let mut buf = vec![0.0_f64; (n_cycles + 1) * n_states];
    propagate_into(initial, matrices, n_cycles, &mut buf)?;
    Ok(OccupancyTrajectory::from_parts(n_states, buf))
}

/// Computes an occupancy trajectory into a pre-allocated buffer.
///
/// The buffer holds `(n_cycles + 1) * n_states` values row-major by cycle.
/// Useful when sweeping many parameter samples with one allocation.
///
/// # Errors
///
/// Returns [`CohortError::BufferLengthMismatch`] for a wrongly sized
/// buffer, plus everything [`propagate`] can return.
pub fn propagate_into(
    initial: &[f64],
    matrices: &MatrixSchedule,
    n_cycles: usize,
    out: &mut [f64],
) -> Result<(), CohortError> {
    let n_states = matrices.n_states();
    if initial.len() != n_states {
        return Err(CohortError::StateCountMismatch {
            expected: n_states,
            got: initial.len(),
        });
    }
    let expected = (n_cycles + 1) * n_states;
    if out.len() != expected {
        return Err(CohortError::BufferLengthMismatch {
            expected,
            got: out.len(),
        });
    }

    out[..n_states].copy_from_slice(initial);
    enforce_simplex(&mut out[..n_states], 0)?;

    for cycle in 1..=n_cycles {
        let matrix = matrices.for_cycle(cycle);
        let (prev, rest) = out[(cycle - 1) * n_states..].split_at_mut(n_states);
        let next = &mut rest[..n_states];
        next.fill(0.0);
        // Row-vector times matrix: next[j] = sum_i prev[i] * M[i][j].
        for (i, &occupancy) in prev.iter().enumerate() {
            if occupancy == 0.0 {
                continue;
            }
            for (n, &p) in next.iter_mut().zip(matrix.row(i)) {
                *n += occupancy * p;
            }
        }
        enforce_simplex(next, cycle)?;
    }
    Ok(())
}

/// Validates one occupancy vector, correcting drift within tolerance.
///
/// Sub-tolerance negative entries are clamped to zero; drift in
/// (DRIFT_EPS, DISTRIBUTION_TOL] is re-normalized with a warning; anything
/// worse is a hard error, surfaced to the caller rather than allowed to
/// propagate as NaN through later cycles.
fn enforce_simplex(probs: &mut [f64], cycle: usize) -> Result<(), CohortError> {
    for (state, p) in probs.iter_mut().enumerate() {
        if !p.is_finite() || *p < -NEGATIVE_EPS {
            return Err(CohortError::InvalidProbability {
                cycle,
                state,
                value: *p,
            });
        }
        if *p < 0.0 {
            *p = 0.0;
        }
    }
    let sum: f64 = probs.iter().sum();
    let drift = (sum - 1.0).abs();
    if drift > DISTRIBUTION_TOL {
        return Err(CohortError::InvalidDistribution { cycle, sum });
    }
    if drift > DRIFT_EPS {
        warn!(cycle, sum, "re-normalizing occupancy vector after drift");
        for p in probs.iter_mut() {
            *p /= sum;
        }
    }
    Ok(())
}

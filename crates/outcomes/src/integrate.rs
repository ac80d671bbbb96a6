//! Discounted integration of value schedules against trajectories.

use iaso_cohort::OccupancyTrajectory;

use crate::error::OutcomeError;
use crate::values::ValueSchedule;

/// The quadrature rule translating discrete-cycle occupancy into an
/// integral approximation.
///
/// The choice materially changes results (left sums credit each cycle at
/// its starting distribution, right sums at its ending distribution), so
/// it is always an explicit argument, never a silent default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quadrature {
    /// Weight cycle `i` by `trajectory[i - 1]` (start of cycle).
    RiemannLeft,
    /// Weight cycle `i` by `trajectory[i]` (end of cycle).
    RiemannRight,
    /// Average the start- and end-of-cycle contributions.
    Trapezoidal,
}

/// Integrates a value schedule against a trajectory with discounting.
///
/// Cycle `i` (1-based, occurring at time `i * cycle_length`) contributes
/// `weight_i . values * cycle_length * (1 + discount_rate)^(-i * cycle_length)`
/// where `weight_i` is the occupancy vector the quadrature rule selects
/// and `values` is the state-value row of the interval containing the
/// cycle's start time. A terminal value vector, if present, is applied
/// once to the final distribution with the final cycle's discount factor
/// and no cycle-length scaling.
///
/// A discount rate of zero is an ordinary value here, not a special case:
/// the factor is simply 1 for every cycle.
///
/// The trajectory is not consumed or mutated; invoke once per outcome
/// category (each cost category, utility) against the same trajectory.
///
/// # Errors
///
/// Returns [`OutcomeError::StateCountMismatch`] if the schedule and
/// trajectory disagree on state count, [`OutcomeError::MismatchedLength`]
/// if any cycle has no assigned value row, and
/// [`OutcomeError::InvalidDiscountRate`] /
/// [`OutcomeError::InvalidCycleLength`] for malformed scalars.
pub fn integrate(
    trajectory: &OccupancyTrajectory,
    values: &ValueSchedule,
    discount_rate: f64,
    quadrature: Quadrature,
    cycle_length: f64,
) -> Result<f64, OutcomeError> {
    if values.n_states() != trajectory.n_states() {
        return Err(OutcomeError::StateCountMismatch {
            expected: trajectory.n_states(),
            got: values.n_states(),
        });
    }
    if !discount_rate.is_finite() || discount_rate <= -1.0 {
        return Err(OutcomeError::InvalidDiscountRate {
            value: discount_rate,
        });
    }
    if !(cycle_length.is_finite() && cycle_length > 0.0) {
        return Err(OutcomeError::InvalidCycleLength {
            value: cycle_length,
        });
    }

    let n_cycles = trajectory.n_cycles();
    let mut total = 0.0;

    for cycle in 1..=n_cycles {
        let start_time = (cycle - 1) as f64 * cycle_length;
        let state_values = values.values_at(start_time, cycle)?;

        let weighted = match quadrature {
            Quadrature::RiemannLeft => dot(trajectory.distribution(cycle - 1), state_values),
            Quadrature::RiemannRight => dot(trajectory.distribution(cycle), state_values),
            Quadrature::Trapezoidal => {
                0.5 * (dot(trajectory.distribution(cycle - 1), state_values)
                    + dot(trajectory.distribution(cycle), state_values))
            }
        };

        total += weighted * cycle_length * discount_factor(discount_rate, cycle, cycle_length);
    }

    if let Some(terminal) = values.terminal() {
        total += dot(trajectory.final_distribution(), terminal)
            * discount_factor(discount_rate, n_cycles, cycle_length);
    }

    Ok(total)
}

/// `(1 + dr)^(-cycle * cycle_length)`, the compound discount factor at a
/// cycle's end time.
fn discount_factor(discount_rate: f64, cycle: usize, cycle_length: f64) -> f64 {
    (1.0 + discount_rate).powf(-(cycle as f64) * cycle_length)
}

fn dot(occupancy: &[f64], values: &[f64]) -> f64 {
    occupancy.iter().zip(values).map(|(&p, &v)| p * v).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use iaso_cohort::{MatrixSchedule, propagate};
    use iaso_tpmatrix::TransitionMatrix;

    fn trajectory(n_cycles: usize) -> OccupancyTrajectory {
        let m = TransitionMatrix::from_rows(vec![vec![0.9, 0.1], vec![0.0, 1.0]]).unwrap();
        let sched = MatrixSchedule::constant(m, 1.0).unwrap();
        propagate(&[1.0, 0.0], &sched, n_cycles).unwrap()
    }

    #[test]
    fn undiscounted_right_sum() {
        let t = trajectory(3);
        let vs = ValueSchedule::constant(vec![1.0, 0.0]).unwrap();
        let total = integrate(&t, &vs, 0.0, Quadrature::RiemannRight, 1.0).unwrap();
        // 0.9 + 0.81 + 0.729
        assert!((total - 2.439).abs() < 1e-12);
    }

    #[test]
    fn undiscounted_left_sum() {
        let t = trajectory(3);
        let vs = ValueSchedule::constant(vec![1.0, 0.0]).unwrap();
        let total = integrate(&t, &vs, 0.0, Quadrature::RiemannLeft, 1.0).unwrap();
        // 1.0 + 0.9 + 0.81
        assert!((total - 2.71).abs() < 1e-12);
    }

    #[test]
    fn quadrature_consistency() {
        // For a constant value function and dr = 0, left and right differ
        // by the first/last boundary contribution, and trapezoidal is
        // their average.
        let t = trajectory(10);
        let vs = ValueSchedule::constant(vec![1.0, 0.25]).unwrap();
        let left = integrate(&t, &vs, 0.0, Quadrature::RiemannLeft, 1.0).unwrap();
        let right = integrate(&t, &vs, 0.0, Quadrature::RiemannRight, 1.0).unwrap();
        let trap = integrate(&t, &vs, 0.0, Quadrature::Trapezoidal, 1.0).unwrap();

        let first = dot(t.distribution(0), &[1.0, 0.25]);
        let last = dot(t.distribution(10), &[1.0, 0.25]);
        assert!(((left - right) - (first - last)).abs() < 1e-12);
        assert!((trap - 0.5 * (left + right)).abs() < 1e-12);
    }

    #[test]
    fn discounted_constant_cost() {
        // All mass absorbed immediately in a state costing 100/year: the
        // total must equal sum_{i=1..5} 100 * 1.05^-i.
        let m = TransitionMatrix::identity(2);
        let sched = MatrixSchedule::constant(m, 1.0).unwrap();
        let t = propagate(&[0.0, 1.0], &sched, 5).unwrap();
        let vs = ValueSchedule::constant(vec![0.0, 100.0]).unwrap();

        let total = integrate(&t, &vs, 0.05, Quadrature::RiemannRight, 1.0).unwrap();
        let expected: f64 = (1..=5).map(|i| 100.0 * 1.05_f64.powi(-i)).sum();
        assert!(
            (total - expected).abs() < 1e-10,
            "got {total}, expected {expected}"
        );
    }

    #[test]
    fn zero_rate_is_first_class() {
        let t = trajectory(5);
        let vs = ValueSchedule::constant(vec![1.0, 0.0]).unwrap();
        let zero = integrate(&t, &vs, 0.0, Quadrature::RiemannRight, 1.0).unwrap();
        let tiny = integrate(&t, &vs, 1e-12, Quadrature::RiemannRight, 1.0).unwrap();
        // Continuous in the rate at zero; no separate code path.
        assert!((zero - tiny).abs() < 1e-9);
    }

    #[test]
    fn terminal_value_applied_once() {
        let m = TransitionMatrix::identity(2);
        let sched = MatrixSchedule::constant(m, 1.0).unwrap();
        let t = propagate(&[0.0, 1.0], &sched, 4).unwrap();
        let vs = ValueSchedule::constant(vec![0.0, 0.0])
            .unwrap()
            .with_terminal(vec![0.0, 1000.0])
            .unwrap();

        let total = integrate(&t, &vs, 0.05, Quadrature::RiemannRight, 1.0).unwrap();
        assert!((total - 1000.0 * 1.05_f64.powi(-4)).abs() < 1e-10);
    }

    #[test]
    fn state_count_mismatch() {
        let t = trajectory(2);
        let vs = ValueSchedule::constant(vec![1.0, 0.0, 0.5]).unwrap();
        assert!(matches!(
            integrate(&t, &vs, 0.0, Quadrature::RiemannRight, 1.0),
            Err(OutcomeError::StateCountMismatch { expected: 2, got: 3 })
        ));
    }

    #[test]
    fn uncovered_cycle_fails() {
        use iaso_params::TimeSchedule;
        // Values only defined from t=1: cycle 1 (starting at t=0) has none.
        let t = trajectory(3);
        let sched = TimeSchedule::new(vec![1.0]).unwrap();
        let vs = ValueSchedule::new(sched, vec![vec![1.0, 0.0]]).unwrap();
        assert!(matches!(
            integrate(&t, &vs, 0.0, Quadrature::RiemannRight, 1.0),
            Err(OutcomeError::MismatchedLength { cycle: 1, .. })
        ));
    }

    #[test]
    fn invalid_scalars() {
        let t = trajectory(1);
        let vs = ValueSchedule::constant(vec![1.0, 0.0]).unwrap();
        assert!(matches!(
            integrate(&t, &vs, -1.0, Quadrature::RiemannRight, 1.0),
            Err(OutcomeError::InvalidDiscountRate { .. })
        ));
        assert!(matches!(
            integrate(&t, &vs, 0.03, Quadrature::RiemannRight, 0.0),
            Err(OutcomeError::InvalidCycleLength { .. })
        ));
    }

    #[test]
    fn half_year_cycles_discount_by_time() {
        let m = TransitionMatrix::identity(2);
        let sched = MatrixSchedule::constant(m, 0.5).unwrap();
        let t = propagate(&[0.0, 1.0], &sched, 2).unwrap();
        let vs = ValueSchedule::constant(vec![0.0, 100.0]).unwrap();

        let total = integrate(&t, &vs, 0.05, Quadrature::RiemannRight, 0.5).unwrap();
        let expected = 100.0 * 0.5 * 1.05_f64.powf(-0.5) + 100.0 * 0.5 * 1.05_f64.powf(-1.0);
        assert!((total - expected).abs() < 1e-10);
    }
}

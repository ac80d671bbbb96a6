//! Template resolution: one concrete matrix per (sample, stratum, time).

use iaso_params::ParameterSet;

use crate::error::TpMatrixError;
use crate::expr::CellExpr;
use crate::matrix::{ROW_SUM_TOL, TransitionMatrix};
use crate::template::MatrixTemplate;

/// Tolerance on a complement residual: a residual more negative than this
/// is an error; anything in (-COMPLEMENT_TOL, 0) is clamped to 0.
pub const COMPLEMENT_TOL: f64 = 1e-8;

/// Resolves a template to a concrete [`TransitionMatrix`].
///
/// Non-complement cells are evaluated first (constants as-is, parameter
/// references through the store at the given sample, stratum, and
/// evaluation time); each row's complement cell then receives one minus
/// the sum of the row's other cells. Pure function of its inputs.
///
/// # Errors
///
/// * [`TpMatrixError::InvalidEntry`] — a resolved cell is non-finite or
///   outside [0, 1] beyond [`COMPLEMENT_TOL`].
/// * [`TpMatrixError::InvalidRow`] — a complement residual is negative
///   beyond tolerance, or a row without a complement does not sum to 1
///   within [`ROW_SUM_TOL`].
/// * [`TpMatrixError::Param`] — a parameter lookup failed.
pub fn build(
    template: &MatrixTemplate,
    params: &ParameterSet,
    sample: usize,
    stratum: usize,
    time: f64,
) -> Result<TransitionMatrix, TpMatrixError> {
    let n = template.n_states();
    let mut probs = vec![0.0_f64; n * n];

    for row in 0..n {
        let mut complement_col: Option<usize> = None;
        let mut explicit_sum = 0.0;

        for (col, cell) in template.row(row).iter().enumerate() {
            let value = match cell {
                CellExpr::Constant(v) => *v,
                CellExpr::ParameterRef(name) => params.lookup_at(name, sample, stratum, time)?,
                CellExpr::Complement => {
                    // At most one per row, enforced at template construction.
                    complement_col = Some(col);
                    continue;
                }
            };
            let value = check_entry(row, col, value)?;
            probs[row * n + col] = value;
            explicit_sum += value;
        }

        match complement_col {
            Some(col) => {
                let residual = 1.0 - explicit_sum;
                if residual < -COMPLEMENT_TOL {
                    return Err(TpMatrixError::InvalidRow {
                        row,
                        reason: format!(
                            "explicit cells sum to {explicit_sum}, leaving negative complement {residual}"
                        ),
                    });
                }
                probs[row * n + col] = residual.max(0.0);
            }
            None => {
                if (explicit_sum - 1.0).abs() > ROW_SUM_TOL {
                    return Err(TpMatrixError::InvalidRow {
                        row,
                        reason: format!("no complement and cells sum to {explicit_sum}"),
                    });
                }
            }
        }
    }

    let matrix = TransitionMatrix::from_probs_unchecked(n, probs);

    // Declared absorbing rows must come out as identity rows.
    for &state in template.absorbing() {
        if !matrix.is_absorbing(state) {
            return Err(TpMatrixError::InvalidAbsorbingRow {
                state,
                reason: "resolved row is not an identity row".to_string(),
            });
        }
    }

    matrix.validate()?;
    Ok(matrix)
}

/// Checks one resolved entry, clamping values within tolerance of [0, 1].
fn check_entry(row: usize, col: usize, value: f64) -> Result<f64, TpMatrixError> {
    if !value.is_finite() || value < -COMPLEMENT_TOL || value > 1.0 + COMPLEMENT_TOL {
        return Err(TpMatrixError::InvalidEntry { row, col, value });
    }
    Ok(value.clamp(0.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use iaso_params::{ParamValue, ParameterSet, TimeSchedule};

    fn template(specs: &[&str]) -> MatrixTemplate {
        let n = (specs.len() as f64).sqrt() as usize;
        let cells = specs.iter().map(|s| s.parse().unwrap()).collect();
        MatrixTemplate::new(n, cells).unwrap()
    }

    fn empty_params() -> ParameterSet {
        ParameterSet::new(1, 1, TimeSchedule::single()).unwrap()
    }

    #[test]
    fn complement_resolution() {
        let t = template(&["0.2", "0.3", "C", "0", "1", "0", "0", "0", "1"]);
        let m = build(&t, &empty_params(), 0, 0, 0.0).unwrap();
        assert_eq!(m.row(0), &[0.2, 0.3, 0.5]);
    }

    #[test]
    fn negative_complement_rejected() {
        let t = template(&["0.6", "0.5", "C", "0", "1", "0", "0", "0", "1"]);
        let result = build(&t, &empty_params(), 0, 0, 0.0);
        assert!(matches!(result, Err(TpMatrixError::InvalidRow { row: 0, .. })));
    }

    #[test]
    fn tiny_negative_complement_clamped() {
        // Explicit cells overshoot 1 by less than the tolerance.
        let cells = vec![
            CellExpr::Constant(0.6),
            CellExpr::Constant(0.4 + 1e-12),
            CellExpr::Complement,
            CellExpr::Constant(0.0),
            CellExpr::Constant(1.0),
            CellExpr::Constant(0.0),
            CellExpr::Constant(0.0),
            CellExpr::Constant(0.0),
            CellExpr::Constant(1.0),
        ];
        let t = MatrixTemplate::new(3, cells).unwrap();
        let m = build(&t, &empty_params(), 0, 0, 0.0).unwrap();
        assert_eq!(m.prob(0, 2), 0.0);
    }

    #[test]
    fn no_complement_row_must_sum_to_one() {
        let t = template(&["0.5", "0.4", "0", "1"]);
        let result = build(&t, &empty_params(), 0, 0, 0.0);
        assert!(matches!(result, Err(TpMatrixError::InvalidRow { row: 0, .. })));
    }

    #[test]
    fn parameter_refs_resolve_through_store() {
        let mut params = ParameterSet::new(2, 1, TimeSchedule::single()).unwrap();
        params
            .register(
                "p_die",
                ParamValue::draws("p_die", 2, 1, vec![0.1, 0.3]).unwrap(),
            )
            .unwrap();
        let t = template(&["C", "p_die", "0", "1"]);

        let m0 = build(&t, &params, 0, 0, 0.0).unwrap();
        assert!((m0.prob(0, 0) - 0.9).abs() < 1e-12);
        let m1 = build(&t, &params, 1, 0, 0.0).unwrap();
        assert!((m1.prob(0, 0) - 0.7).abs() < 1e-12);
    }

    #[test]
    fn unknown_parameter_propagates() {
        let t = template(&["C", "p_missing", "0", "1"]);
        let result = build(&t, &empty_params(), 0, 0, 0.0);
        assert!(matches!(result, Err(TpMatrixError::Param(_))));
    }

    #[test]
    fn out_of_range_entry_rejected() {
        let t = template(&["C", "1.5", "0", "1"]);
        let result = build(&t, &empty_params(), 0, 0, 0.0);
        assert!(matches!(
            result,
            Err(TpMatrixError::InvalidEntry { row: 0, col: 1, .. })
        ));
    }

    #[test]
    fn absorbing_row_with_complement_diagonal_builds_identity() {
        let cells: Vec<CellExpr> = ["C", "0.1", "0", "C"]
            .iter()
            .map(|s| s.parse().unwrap())
            .collect();
        let t = MatrixTemplate::new(2, cells)
            .unwrap()
            .with_absorbing(&[1])
            .unwrap();
        let m = build(&t, &empty_params(), 0, 0, 0.0).unwrap();
        assert!(m.is_absorbing(1));
    }

    #[test]
    fn time_varying_parameter_changes_matrix() {
        let schedule = TimeSchedule::new(vec![0.0, 2.0]).unwrap();
        let mut params = ParameterSet::new(1, 1, schedule).unwrap();
        params
            .register_time_varying(
                "p_die",
                vec![ParamValue::Scalar(0.1), ParamValue::Scalar(0.5)],
            )
            .unwrap();
        let t = template(&["C", "p_die", "0", "1"]);

        let early = build(&t, &params, 0, 0, 0.0).unwrap();
        let late = build(&t, &params, 0, 0, 2.0).unwrap();
        assert!((early.prob(0, 1) - 0.1).abs() < 1e-12);
        assert!((late.prob(0, 1) - 0.5).abs() < 1e-12);
    }
}

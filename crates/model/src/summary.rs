//! Probabilistic-sensitivity-analysis summaries of outcome tables.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::results::SimulationResults;

/// Mean and credible interval of one outcome across parameter samples.
#[derive(Debug, Clone, Serialize)]
pub struct OutcomeSummary {
    /// Treatment strategy name.
    pub strategy: String,
    /// Population group name.
    pub group: String,
    /// Outcome category.
    pub category: String,
    /// Mean across samples.
    pub mean: f64,
    /// Lower credible bound.
    pub lower: f64,
    /// Upper credible bound.
    pub upper: f64,
}

/// Summarizes outcomes per (strategy, group, category) across samples.
///
/// `interval` is the credible mass, e.g. 0.95 for a 2.5%–97.5% interval.
/// Quantiles use R's default type-7 interpolation.
///
/// # Panics
///
/// Panics if `interval` is not in (0, 1].
pub fn summarize(results: &SimulationResults, interval: f64) -> Vec<OutcomeSummary> {
    assert!(
        interval > 0.0 && interval <= 1.0,
        "interval must be in (0, 1], got {interval}"
    );
    let tail = (1.0 - interval) / 2.0;

    let mut grouped: BTreeMap<(&str, &str, &str), Vec<f64>> = BTreeMap::new();
    for row in &results.outcomes {
        grouped
            .entry((
                row.strategy.as_str(),
                row.group.as_str(),
                row.category.as_str(),
            ))
            .or_default()
            .push(row.value);
    }

    grouped
        .into_iter()
        .map(|((strategy, group, category), mut values)| {
            values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
            let mean = values.iter().sum::<f64>() / values.len() as f64;
            OutcomeSummary {
                strategy: strategy.to_string(),
                group: group.to_string(),
                category: category.to_string(),
                mean,
                lower: quantile(&values, tail),
                upper: quantile(&values, 1.0 - tail),
            }
        })
        .collect()
}

/// Type-7 quantile of pre-sorted values (linear interpolation between
/// order statistics, matching R's default).
fn quantile(sorted: &[f64], p: f64) -> f64 {
    debug_assert!(!sorted.is_empty());
    let position = (sorted.len() - 1) as f64 * p;
    let below = position.floor() as usize;
    let above = (below + 1).min(sorted.len() - 1);
    let fraction = position - position.floor();
    sorted[below] + fraction * (sorted[above] - sorted[below])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results::OutcomeRow;

    fn results_with(values: &[f64]) -> SimulationResults {
        SimulationResults {
            stateprobs: vec![],
            outcomes: values
                .iter()
                .enumerate()
                .map(|(sample, &value)| OutcomeRow {
                    strategy: "soc".to_string(),
                    group: "all".to_string(),
                    sample,
                    category: "qalys".to_string(),
                    value,
                })
                .collect(),
        }
    }

    #[test]
    fn mean_and_bounds() {
        let results = results_with(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        let summary = summarize(&results, 1.0);
        assert_eq!(summary.len(), 1);
        let s = &summary[0];
        assert!((s.mean - 3.0).abs() < 1e-12);
        assert_eq!(s.lower, 1.0);
        assert_eq!(s.upper, 5.0);
    }

    #[test]
    fn type7_interpolation() {
        // Quartiles of 1..=4 under type-7: q25 = 1.75, q75 = 3.25.
        let results = results_with(&[4.0, 2.0, 1.0, 3.0]);
        let summary = summarize(&results, 0.5);
        let s = &summary[0];
        assert!((s.lower - 1.75).abs() < 1e-12);
        assert!((s.upper - 3.25).abs() < 1e-12);
    }

    #[test]
    fn groups_kept_separate() {
        let mut results = results_with(&[1.0, 2.0]);
        results.outcomes.push(OutcomeRow {
            strategy: "new-drug".to_string(),
            group: "all".to_string(),
            sample: 0,
            category: "qalys".to_string(),
            value: 10.0,
        });
        let summary = summarize(&results, 0.95);
        assert_eq!(summary.len(), 2);
        // BTreeMap ordering: "new-drug" before "soc".
        assert_eq!(summary[0].strategy, "new-drug");
        assert!((summary[0].mean - 10.0).abs() < 1e-12);
    }

    #[test]
    #[should_panic(expected = "interval must be in (0, 1]")]
    fn bad_interval_panics() {
        let results = results_with(&[1.0]);
        let _ = summarize(&results, 0.0);
    }
}

//! Distribution draws for probabilistic sensitivity analysis.
//!
//! Parameter uncertainty enters the store as arrays of per-sample draws.
//! The specifications here cover the distributions typically assigned to
//! health-economic inputs: Beta for probabilities, Gamma/LogNormal for
//! costs and rates, Dirichlet for whole transition rows, and Fixed for
//! deterministic runs.

use rand::Rng;
use rand_distr::{Beta, Distribution, Gamma, LogNormal, Normal, Uniform};

use crate::error::ParamError;
use crate::value::ParamValue;

/// How one scalar parameter is drawn per sample.
#[derive(Debug, Clone, PartialEq)]
pub enum DistributionSpec {
    /// A deterministic value, identical across draws.
    Fixed(f64),
    /// Normal with mean and standard deviation.
    Normal {
        /// Mean.
        mean: f64,
        /// Standard deviation (> 0).
        sd: f64,
    },
    /// Log-normal parameterized on the log scale.
    LogNormal {
        /// Mean of the log.
        meanlog: f64,
        /// Standard deviation of the log (> 0).
        sdlog: f64,
    },
    /// Gamma with shape and rate (rate = 1 / scale).
    Gamma {
        /// Shape (> 0).
        shape: f64,
        /// Rate (> 0).
        rate: f64,
    },
    /// Beta on [0, 1].
    Beta {
        /// First shape parameter (> 0).
        alpha: f64,
        /// Second shape parameter (> 0).
        beta: f64,
    },
    /// Uniform on [low, high).
    Uniform {
        /// Lower bound.
        low: f64,
        /// Upper bound (> low).
        high: f64,
    },
}

impl DistributionSpec {
    /// Validates the hyperparameters.
    ///
    /// # Errors
    ///
    /// Returns [`ParamError::InvalidSpec`] naming the offending parameter.
    pub fn validate(&self, name: &str) -> Result<(), ParamError> {
        let fail = |reason: String| {
            Err(ParamError::InvalidSpec {
                name: name.to_string(),
                reason,
            })
        };
        match *self {
            Self::Fixed(v) => {
                if !v.is_finite() {
                    return fail(format!("fixed value must be finite, got {v}"));
                }
            }
            Self::Normal { mean, sd } => {
                if !mean.is_finite() || !sd.is_finite() || sd <= 0.0 {
                    return fail(format!("normal requires finite mean and sd > 0, got ({mean}, {sd})"));
                }
            }
            Self::LogNormal { meanlog, sdlog } => {
                if !meanlog.is_finite() || !sdlog.is_finite() || sdlog <= 0.0 {
                    return fail(format!(
                        "lognormal requires finite meanlog and sdlog > 0, got ({meanlog}, {sdlog})"
                    ));
                }
            }
            Self::Gamma { shape, rate } => {
                if !(shape > 0.0 && shape.is_finite() && rate > 0.0 && rate.is_finite()) {
                    return fail(format!("gamma requires shape > 0 and rate > 0, got ({shape}, {rate})"));
                }
            }
            Self::Beta { alpha, beta } => {
                if !(alpha > 0.0 && alpha.is_finite() && beta > 0.0 && beta.is_finite()) {
                    return fail(format!("beta requires alpha > 0 and beta > 0, got ({alpha}, {beta})"));
                }
            }
            Self::Uniform { low, high } => {
                if !low.is_finite() || !high.is_finite() || high <= low {
                    return fail(format!("uniform requires low < high, got [{low}, {high})"));
                }
            }
        }
        Ok(())
    }
}

/// Draws one parameter as a [`ParamValue`] with one value per sample.
///
/// `Fixed` specifications produce a broadcast [`ParamValue::Scalar`];
/// everything else produces [`ParamValue::Draws`] with the per-sample draw
/// replicated across strata.
///
/// # Errors
///
/// Returns [`ParamError::InvalidSpec`] if the hyperparameters are invalid.
pub fn draw(
    name: &str,
    spec: &DistributionSpec,
    n_samples: usize,
    n_strata: usize,
    rng: &mut impl Rng,
) -> Result<ParamValue, ParamError> {
    spec.validate(name)?;
    let per_sample: Vec<f64> = match *spec {
        DistributionSpec::Fixed(v) => return Ok(ParamValue::Scalar(v)),
        DistributionSpec::Normal { mean, sd } => {
            let dist = Normal::new(mean, sd).expect("hyperparameters validated");
            (0..n_samples).map(|_| dist.sample(rng)).collect()
        }
        DistributionSpec::LogNormal { meanlog, sdlog } => {
            let dist = LogNormal::new(meanlog, sdlog).expect("hyperparameters validated");
            (0..n_samples).map(|_| dist.sample(rng)).collect()
        }
        DistributionSpec::Gamma { shape, rate } => {
            let dist = Gamma::new(shape, 1.0 / rate).expect("hyperparameters validated");
            (0..n_samples).map(|_| dist.sample(rng)).collect()
        }
        DistributionSpec::Beta { alpha, beta } => {
            let dist = Beta::new(alpha, beta).expect("hyperparameters validated");
            (0..n_samples).map(|_| dist.sample(rng)).collect()
        }
        DistributionSpec::Uniform { low, high } => {
            let dist = Uniform::new(low, high).expect("hyperparameters validated");
            (0..n_samples).map(|_| dist.sample(rng)).collect()
        }
    };
    Ok(replicate_across_strata(name, per_sample, n_strata))
}

/// A Dirichlet draw over a named group of parameters.
///
/// Each sample draws one probability vector; component `k` becomes a draw
/// of parameter `names[k]`. Used to propagate joint uncertainty across the
/// probabilities of a transition row.
#[derive(Debug, Clone, PartialEq)]
pub struct DirichletSpec {
    /// Parameter name receiving each component of the drawn vector.
    pub names: Vec<String>,
    /// Concentration parameters, one per component (> 0).
    pub alphas: Vec<f64>,
}

impl DirichletSpec {
    /// Validates the group shape and concentration parameters.
    ///
    /// # Errors
    ///
    /// Returns [`ParamError::InvalidSpec`] if fewer than two components are
    /// given, the name and alpha counts disagree, or any alpha is not a
    /// positive finite number.
    pub fn validate(&self) -> Result<(), ParamError> {
        let group = self.names.join(",");
        if self.names.len() < 2 {
            return Err(ParamError::InvalidSpec {
                name: group,
                reason: "dirichlet needs at least 2 components".to_string(),
            });
        }
        if self.names.len() != self.alphas.len() {
            return Err(ParamError::InvalidSpec {
                name: group,
                reason: format!(
                    "{} names but {} alphas",
                    self.names.len(),
                    self.alphas.len()
                ),
            });
        }
        for &a in &self.alphas {
            if !(a > 0.0 && a.is_finite()) {
                return Err(ParamError::InvalidSpec {
                    name: group,
                    reason: format!("alpha must be finite and > 0, got {a}"),
                });
            }
        }
        Ok(())
    }
}

/// Draws a Dirichlet group, returning one [`ParamValue`] per component name.
///
/// Uses the Gamma-normalization construction: component `k` of each sample
/// is `g_k / sum(g)` with `g_k ~ Gamma(alpha_k, 1)`.
///
/// # Errors
///
/// Returns [`ParamError::InvalidSpec`] if the specification is invalid.
pub fn draw_dirichlet(
    spec: &DirichletSpec,
    n_samples: usize,
    n_strata: usize,
    rng: &mut impl Rng,
) -> Result<Vec<(String, ParamValue)>, ParamError> {
    spec.validate()?;
    let k = spec.names.len();
    let gammas: Vec<Gamma<f64>> = spec
        .alphas
        .iter()
        .map(|&a| Gamma::new(a, 1.0).expect("alphas validated"))
        .collect();

    let mut per_component: Vec<Vec<f64>> = vec![Vec::with_capacity(n_samples); k];
    let mut g = vec![0.0_f64; k];
    for _ in 0..n_samples {
        for (gi, dist) in g.iter_mut().zip(&gammas) {
            *gi = dist.sample(rng);
        }
        let total: f64 = g.iter().sum();
        for (comp, &gi) in per_component.iter_mut().zip(&g) {
            comp.push(gi / total);
        }
    }

    Ok(spec
        .names
        .iter()
        .zip(per_component)
        .map(|(name, draws)| {
            (
                name.clone(),
                replicate_across_strata(name, draws, n_strata),
            )
        })
        .collect())
}

fn replicate_across_strata(name: &str, per_sample: Vec<f64>, n_strata: usize) -> ParamValue {
    let n_samples = per_sample.len();
    let mut values = Vec::with_capacity(n_samples * n_strata);
    for v in per_sample {
        values.extend(std::iter::repeat(v).take(n_strata));
    }
    ParamValue::draws(name, n_samples, n_strata, values).expect("replication sized exactly")
}

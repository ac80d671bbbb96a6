//! The TOML-facing model definition and its validation.

use std::collections::BTreeSet;
use std::path::Path;

use rand::Rng;
use serde::Deserialize;

use iaso_outcomes::{Quadrature, ValueSchedule};
use iaso_params::{
    DirichletSpec, DistributionSpec, ParamValue, ParameterSet, TimeSchedule, draw, draw_dirichlet,
};
use iaso_tpmatrix::{CellExpr, MatrixTemplate};

use crate::error::ModelError;

/// A complete, declarative description of one decision model.
///
/// Deserialized from TOML; [`ModelDefinition::validate`] cross-checks
/// every reference eagerly so that a run never fails midway for shape
/// reasons.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModelDefinition {
    /// Model name, carried into logs and output.
    pub name: String,

    /// Free-text description.
    #[serde(default)]
    pub description: Option<String>,

    /// Health states, in matrix order.
    pub states: Vec<StateDef>,

    /// Population groups (strata).
    #[serde(default = "default_groups")]
    pub groups: Vec<GroupDef>,

    /// Treatment strategies, each with its own transition template.
    pub strategies: Vec<StrategyDef>,

    /// Scalar parameters and their uncertainty distributions.
    #[serde(default)]
    pub parameters: Vec<ParameterDef>,

    /// Dirichlet groups drawing correlated probability vectors.
    #[serde(default)]
    pub dirichlet: Vec<DirichletDef>,

    /// Simulation dimensions.
    pub simulation: SimulationDef,

    /// Outcome valuation.
    pub outcomes: OutcomesDef,
}

/// One health state.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StateDef {
    /// State name.
    pub name: String,
    /// Whether the state is absorbing (e.g. death). Absorbing rows must be
    /// identity rows in every strategy's template.
    #[serde(default)]
    pub absorbing: bool,
}

/// One population group.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GroupDef {
    /// Group name.
    pub name: String,
    /// Relative population weight (> 0), for downstream aggregation.
    #[serde(default = "default_weight")]
    pub weight: f64,
}

/// One treatment strategy.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StrategyDef {
    /// Strategy name.
    pub name: String,
    /// S x S grid of cell expressions: a number, a parameter name, or the
    /// complement marker `"C"`.
    pub transitions: Vec<Vec<String>>,
}

/// One scalar parameter with its sampling distribution.
#[derive(Debug, Clone, Deserialize)]
pub struct ParameterDef {
    /// Parameter name, as referenced from transition templates.
    pub name: String,
    /// Sampling distribution.
    #[serde(flatten)]
    pub distribution: DistributionDef,
}

/// The sampling distribution of one parameter.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "distribution", rename_all = "snake_case")]
pub enum DistributionDef {
    /// A deterministic value.
    Fixed {
        /// The value.
        value: f64,
    },
    /// One deterministic value per population group.
    PerGroup {
        /// One value per group, in group order.
        values: Vec<f64>,
    },
    /// Normal with mean and standard deviation.
    Normal {
        /// Mean.
        mean: f64,
        /// Standard deviation.
        sd: f64,
    },
    /// Log-normal parameterized on the log scale.
    LogNormal {
        /// Mean of the log.
        meanlog: f64,
        /// Standard deviation of the log.
        sdlog: f64,
    },
    /// Gamma with shape and rate.
    Gamma {
        /// Shape.
        shape: f64,
        /// Rate.
        rate: f64,
    },
    /// Beta on [0, 1].
    Beta {
        /// First shape parameter.
        alpha: f64,
        /// Second shape parameter.
        beta: f64,
    },
    /// Uniform on [low, high).
    Uniform {
        /// Lower bound.
        low: f64,
        /// Upper bound.
        high: f64,
    },
}

/// A Dirichlet draw across a group of parameter names.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DirichletDef {
    /// Parameter names receiving the components of each drawn vector.
    pub names: Vec<String>,
    /// Concentration parameters, one per name.
    pub alphas: Vec<f64>,
}

/// Simulation dimensions.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SimulationDef {
    /// Number of parameter-sample draws.
    pub n_samples: usize,
    /// Number of simulated cycles.
    pub n_cycles: usize,
    /// Length of one cycle in model time units (typically years).
    pub cycle_length: f64,
    /// Interval start boundaries for time-inhomogeneous models.
    #[serde(default = "default_boundaries")]
    pub time_boundaries: Vec<f64>,
    /// Initial occupancy distribution; defaults to everyone in the first
    /// state.
    #[serde(default)]
    pub initial: Option<Vec<f64>>,
    /// RNG seed for parameter draws; absent means OS entropy.
    #[serde(default)]
    pub seed: Option<u64>,
}

/// Outcome valuation: discounting, quadrature, and value schedules.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutcomesDef {
    /// Annual discount rate applied to QALYs.
    #[serde(default = "default_discount")]
    pub discount_rate_qalys: f64,
    /// Annual discount rate applied to costs.
    #[serde(default = "default_discount")]
    pub discount_rate_costs: f64,
    /// Quadrature rule. Required: the choice materially changes results
    /// and is never defaulted.
    pub quadrature: QuadratureDef,
    /// Utility values per state.
    pub utility: ValueDef,
    /// Named cost categories.
    #[serde(default)]
    pub costs: Vec<CostCategoryDef>,
}

/// Serde-facing quadrature selector.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum QuadratureDef {
    /// Weight each cycle at its starting distribution.
    RiemannLeft,
    /// Weight each cycle at its ending distribution.
    RiemannRight,
    /// Average of the two.
    Trapezoidal,
}

impl From<QuadratureDef> for Quadrature {
    fn from(q: QuadratureDef) -> Self {
        match q {
            QuadratureDef::RiemannLeft => Quadrature::RiemannLeft,
            QuadratureDef::RiemannRight => Quadrature::RiemannRight,
            QuadratureDef::Trapezoidal => Quadrature::Trapezoidal,
        }
    }
}

/// One value schedule: either constant or per-interval, with an optional
/// one-time terminal vector.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ValueDef {
    /// One value per state, constant over time.
    #[serde(default)]
    pub values: Option<Vec<f64>>,
    /// One row per time boundary, each with one value per state.
    #[serde(default)]
    pub by_interval: Option<Vec<Vec<f64>>>,
    /// One-time values applied at the final cycle.
    #[serde(default)]
    pub terminal: Option<Vec<f64>>,
}

/// One named cost category.
#[derive(Debug, Clone, Deserialize)]
pub struct CostCategoryDef {
    /// Category name (e.g. "medical", "drug").
    pub name: String,
    /// The category's value schedule.
    #[serde(flatten)]
    pub value: ValueDef,
}

fn default_groups() -> Vec<GroupDef> {
    vec![GroupDef {
        name: "all".to_string(),
        weight: 1.0,
    }]
}

fn default_weight() -> f64 {
    1.0
}

fn default_boundaries() -> Vec<f64> {
    vec![0.0]
}

fn default_discount() -> f64 {
    0.0
}

impl ModelDefinition {
    /// Parses a definition from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::Parse`] on malformed TOML.
    pub fn from_toml_str(text: &str) -> Result<Self, ModelError> {
        toml::from_str(text).map_err(|e| ModelError::Parse {
            reason: e.to_string(),
        })
    }

    /// Reads and parses a definition file.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::Io`] or [`ModelError::Parse`].
    pub fn from_path(path: &Path) -> Result<Self, ModelError> {
        let text = std::fs::read_to_string(path).map_err(|e| ModelError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_toml_str(&text)
    }

    /// Returns the number of states.
    pub fn n_states(&self) -> usize {
        self.states.len()
    }

    /// Cross-checks the definition eagerly.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidDefinition`] naming the offending
    /// field, or a wrapped error from the crate that rejected a piece.
    pub fn validate(&self) -> Result<(), ModelError> {
        let fail = |field: &str, reason: String| {
            Err(ModelError::InvalidDefinition {
                field: field.to_string(),
                reason,
            })
        };

        // States.
        if self.states.len() < 2 {
            return fail("states", format!("need at least 2 states, got {}", self.states.len()));
        }
        check_unique("states", self.states.iter().map(|s| s.name.as_str()))?;

        // Groups.
        if self.groups.is_empty() {
            return fail("groups", "need at least 1 group".to_string());
        }
        check_unique("groups", self.groups.iter().map(|g| g.name.as_str()))?;
        for g in &self.groups {
            if !(g.weight.is_finite() && g.weight > 0.0) {
                return fail("groups", format!("group '{}' has weight {}", g.name, g.weight));
            }
        }

        // Strategies and their templates.
        if self.strategies.is_empty() {
            return fail("strategies", "need at least 1 strategy".to_string());
        }
        check_unique("strategies", self.strategies.iter().map(|s| s.name.as_str()))?;
        let defined = self.defined_parameter_names()?;
        for strategy in &self.strategies {
            let template = self.template_for(strategy)?;
            for name in template.parameter_names() {
                if !defined.contains(name) {
                    return fail(
                        "strategies",
                        format!("strategy '{}' references undefined parameter '{name}'", strategy.name),
                    );
                }
            }
        }

        // Parameters.
        for p in &self.parameters {
            if let DistributionDef::PerGroup { values } = &p.distribution {
                if values.len() != self.groups.len() {
                    return fail(
                        "parameters",
                        format!(
                            "'{}' has {} per-group values but {} groups",
                            p.name,
                            values.len(),
                            self.groups.len()
                        ),
                    );
                }
            } else {
                distribution_spec(&p.distribution).validate(&p.name)?;
            }
        }
        for d in &self.dirichlet {
            DirichletSpec {
                names: d.names.clone(),
                alphas: d.alphas.clone(),
            }
            .validate()?;
        }

        // Simulation dimensions.
        if self.simulation.n_samples == 0 {
            return fail("simulation", "n_samples must be at least 1".to_string());
        }
        if !(self.simulation.cycle_length.is_finite() && self.simulation.cycle_length > 0.0) {
            return fail(
                "simulation",
                format!("cycle_length must be finite and > 0, got {}", self.simulation.cycle_length),
            );
        }
        let schedule = self.schedule()?;
        if schedule.starts()[0] != 0.0 {
            return fail(
                "simulation",
                format!("first time boundary must be 0, got {}", schedule.starts()[0]),
            );
        }
        if let Some(initial) = &self.simulation.initial {
            if initial.len() != self.n_states() {
                return fail(
                    "simulation",
                    format!("initial has {} entries for {} states", initial.len(), self.n_states()),
                );
            }
        }

        // Outcomes.
        self.value_schedule(&self.outcomes.utility, "utility")?;
        check_unique(
            "outcomes.costs",
            self.outcomes.costs.iter().map(|c| c.name.as_str()),
        )?;
        for category in &self.outcomes.costs {
            if category.name == "qalys" {
                return fail("outcomes.costs", "cost category may not be named 'qalys'".to_string());
            }
            self.value_schedule(&category.value, &category.name)?;
        }
        for (label, dr) in [
            ("discount_rate_qalys", self.outcomes.discount_rate_qalys),
            ("discount_rate_costs", self.outcomes.discount_rate_costs),
        ] {
            if !dr.is_finite() || dr <= -1.0 {
                return fail("outcomes", format!("{label} must be finite and > -1, got {dr}"));
            }
        }

        Ok(())
    }

    /// Builds the time schedule from the declared boundaries.
    pub fn schedule(&self) -> Result<TimeSchedule, ModelError> {
        Ok(TimeSchedule::new(self.simulation.time_boundaries.clone())?)
    }

    /// Builds the transition template of one strategy, with the declared
    /// absorbing states attached.
    pub fn template_for(&self, strategy: &StrategyDef) -> Result<MatrixTemplate, ModelError> {
        let n = self.n_states();
        if strategy.transitions.len() != n {
            return Err(ModelError::InvalidDefinition {
                field: "strategies".to_string(),
                reason: format!(
                    "strategy '{}' has {} rows for {} states",
                    strategy.name,
                    strategy.transitions.len(),
                    n
                ),
            });
        }
        let mut cells: Vec<CellExpr> = Vec::with_capacity(n * n);
        for row in &strategy.transitions {
            if row.len() != n {
                return Err(ModelError::InvalidDefinition {
                    field: "strategies".to_string(),
                    reason: format!(
                        "strategy '{}' has a row with {} cells for {} states",
                        strategy.name,
                        row.len(),
                        n
                    ),
                });
            }
            for cell in row {
                cells.push(cell.parse().expect("cell parsing is infallible"));
            }
        }
        let absorbing: Vec<usize> = self
            .states
            .iter()
            .enumerate()
            .filter(|(_, s)| s.absorbing)
            .map(|(i, _)| i)
            .collect();
        Ok(MatrixTemplate::new(n, cells)?.with_absorbing(&absorbing)?)
    }

    /// Draws the parameter store for one run.
    pub fn draw_parameter_set(&self, rng: &mut impl Rng) -> Result<ParameterSet, ModelError> {
        let mut params = ParameterSet::new(
            self.simulation.n_samples,
            self.groups.len(),
            self.schedule()?,
        )?;
        for p in &self.parameters {
            let value = match &p.distribution {
                DistributionDef::PerGroup { values } => ParamValue::PerStratum(values.clone()),
                other => draw(
                    &p.name,
                    &distribution_spec(other),
                    self.simulation.n_samples,
                    self.groups.len(),
                    rng,
                )?,
            };
            params.register(&p.name, value)?;
        }
        for d in &self.dirichlet {
            let spec = DirichletSpec {
                names: d.names.clone(),
                alphas: d.alphas.clone(),
            };
            for (name, value) in draw_dirichlet(
                &spec,
                self.simulation.n_samples,
                self.groups.len(),
                rng,
            )? {
                params.register(&name, value)?;
            }
        }
        Ok(params)
    }

    /// Returns the initial occupancy distribution (one-hot at the first
    /// state unless declared).
    pub fn initial_distribution(&self) -> Vec<f64> {
        match &self.simulation.initial {
            Some(initial) => initial.clone(),
            None => {
                let mut one_hot = vec![0.0; self.n_states()];
                one_hot[0] = 1.0;
                one_hot
            }
        }
    }

    /// Builds a [`ValueSchedule`] from one value definition.
    pub fn value_schedule(&self, def: &ValueDef, label: &str) -> Result<ValueSchedule, ModelError> {
        let schedule = match (&def.values, &def.by_interval) {
            (Some(values), None) => ValueSchedule::constant(values.clone())?,
            (None, Some(rows)) => ValueSchedule::new(self.schedule()?, rows.clone())?,
            _ => {
                return Err(ModelError::InvalidDefinition {
                    field: label.to_string(),
                    reason: "exactly one of `values` and `by_interval` must be set".to_string(),
                });
            }
        };
        if schedule.n_states() != self.n_states() {
            return Err(ModelError::InvalidDefinition {
                field: label.to_string(),
                reason: format!(
                    "{} values for {} states",
                    schedule.n_states(),
                    self.n_states()
                ),
            });
        }
        match &def.terminal {
            Some(terminal) => Ok(schedule.with_terminal(terminal.clone())?),
            None => Ok(schedule),
        }
    }

    fn defined_parameter_names(&self) -> Result<BTreeSet<&str>, ModelError> {
        let mut defined: BTreeSet<&str> = BTreeSet::new();
        for p in &self.parameters {
            if !defined.insert(p.name.as_str()) {
                return Err(ModelError::InvalidDefinition {
                    field: "parameters".to_string(),
                    reason: format!("duplicate parameter '{}'", p.name),
                });
            }
        }
        for d in &self.dirichlet {
            for name in &d.names {
                if !defined.insert(name.as_str()) {
                    return Err(ModelError::InvalidDefinition {
                        field: "dirichlet".to_string(),
                        reason: format!("duplicate parameter '{name}'"),
                    });
                }
            }
        }
        Ok(defined)
    }
}

fn distribution_spec(def: &DistributionDef) -> DistributionSpec {
    match *def {
        DistributionDef::Fixed { value } => DistributionSpec::Fixed(value),
        DistributionDef::PerGroup { .. } => {
            unreachable!("per-group parameters are registered directly")
        }
        DistributionDef::Normal { mean, sd } => DistributionSpec::Normal { mean, sd },
        DistributionDef::LogNormal { meanlog, sdlog } => {
            DistributionSpec::LogNormal { meanlog, sdlog }
        }
        DistributionDef::Gamma { shape, rate } => DistributionSpec::Gamma { shape, rate },
        DistributionDef::Beta { alpha, beta } => DistributionSpec::Beta { alpha, beta },
        DistributionDef::Uniform { low, high } => DistributionSpec::Uniform { low, high },
    }
}

fn check_unique<'a>(
    field: &str,
    names: impl Iterator<Item = &'a str>,
) -> Result<(), ModelError> {
    let mut seen = BTreeSet::new();
    for name in names {
        if !seen.insert(name) {
            return Err(ModelError::InvalidDefinition {
                field: field.to_string(),
                reason: format!("duplicate name '{name}'"),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
        name = "two-state"

        [[states]]
        name = "Alive"
        [[states]]
        name = "Dead"
        absorbing = true

        [[strategies]]
        name = "soc"
        transitions = [["C", "p_die"], ["0", "1"]]

        [[parameters]]
        name = "p_die"
        distribution = "fixed"
        value = 0.1

        [simulation]
        n_samples = 1
        n_cycles = 3
        cycle_length = 1.0

        [outcomes]
        quadrature = "riemann_right"

        [outcomes.utility]
        values = [1.0, 0.0]
    "#;

    #[test]
    fn minimal_definition_parses_and_validates() {
        let def = ModelDefinition::from_toml_str(MINIMAL).unwrap();
        def.validate().unwrap();
        assert_eq!(def.n_states(), 2);
        assert_eq!(def.groups.len(), 1);
        assert_eq!(def.groups[0].name, "all");
        assert_eq!(def.initial_distribution(), vec![1.0, 0.0]);
    }

    #[test]
    fn undefined_parameter_reference_rejected() {
        let text = MINIMAL.replace("p_die\"\n        distribution", "p_other\"\n        distribution");
        let def = ModelDefinition::from_toml_str(&text).unwrap();
        assert!(matches!(
            def.validate(),
            Err(ModelError::InvalidDefinition { .. })
        ));
    }

    #[test]
    fn missing_quadrature_fails_to_parse() {
        let text = MINIMAL.replace("quadrature = \"riemann_right\"", "");
        assert!(matches!(
            ModelDefinition::from_toml_str(&text),
            Err(ModelError::Parse { .. })
        ));
    }

    #[test]
    fn absorbing_state_forces_identity_row() {
        let text = MINIMAL.replace("[\"0\", \"1\"]", "[\"0.1\", \"0.9\"]");
        let def = ModelDefinition::from_toml_str(&text).unwrap();
        assert!(def.validate().is_err());
    }

    #[test]
    fn wrong_utility_length_rejected() {
        let text = MINIMAL.replace("values = [1.0, 0.0]", "values = [1.0, 0.0, 0.5]");
        let def = ModelDefinition::from_toml_str(&text).unwrap();
        assert!(def.validate().is_err());
    }

    #[test]
    fn parameter_distributions_parse() {
        let text = r#"
            name = "dists"

            [[states]]
            name = "A"
            [[states]]
            name = "B"
            absorbing = true

            [[strategies]]
            name = "soc"
            transitions = [["C", "p_move"], ["0", "1"]]

            [[parameters]]
            name = "p_move"
            distribution = "beta"
            alpha = 2.0
            beta = 8.0

            [[parameters]]
            name = "cost_a"
            distribution = "gamma"
            shape = 100.0
            rate = 0.05

            [simulation]
            n_samples = 5
            n_cycles = 2
            cycle_length = 1.0

            [outcomes]
            quadrature = "trapezoidal"

            [outcomes.utility]
            values = [1.0, 0.0]
        "#;
        let def = ModelDefinition::from_toml_str(text).unwrap();
        def.validate().unwrap();
        assert!(matches!(
            def.parameters[0].distribution,
            DistributionDef::Beta { .. }
        ));
    }

    #[test]
    fn duplicate_names_rejected() {
        let text = MINIMAL.replace(
            "[[states]]\n        name = \"Dead\"",
            "[[states]]\n        name = \"Alive\"",
        );
        let def = ModelDefinition::from_toml_str(&text).unwrap();
        assert!(def.validate().is_err());
    }
}

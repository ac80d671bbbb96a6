//! Model definition, simulation fan-out, and result tables.
//!
//! This crate wires the core crates together: a declarative
//! [`ModelDefinition`] (parsed from TOML) is validated, its parameter
//! store drawn, and every (sample, strategy, group) combination
//! propagated and integrated in parallel. The output is a pair of
//! long-form tables (state probabilities and aggregate outcomes) plus a
//! per-combination summary across samples.
//!
//! # Pipeline
//!
//! ```text
//!  ┌────────────┐    ┌──────────┐    ┌───────────┐    ┌───────────┐
//!  │ definition │───▶│  params  │───▶│  tpmatrix │───▶│  cohort    │
//!  │ (validate) │    │  (draw)  │    │  (build)  │    │ (propagate)│
//!  └────────────┘    └──────────┘    └───────────┘    └─────┬─────┘
//!                                                           │
//!                       ┌───────────┐    ┌──────────┐       │
//!                       │  summary  │◀───│ outcomes │◀──────┘
//!                       │ (mean/CI) │    │(integrate)│
//!                       └───────────┘    └──────────┘
//! ```

pub mod definition;
pub mod error;
pub mod results;
pub mod run;
pub mod summary;

pub use definition::{
    CostCategoryDef, DirichletDef, DistributionDef, GroupDef, ModelDefinition, OutcomesDef,
    ParameterDef, QuadratureDef, SimulationDef, StateDef, StrategyDef, ValueDef,
};
pub use error::ModelError;
pub use results::{OutcomeRow, SimulationResults, StateProbRow};
pub use run::run;
pub use summary::{OutcomeSummary, summarize};

//! Parameter-sample store and time schedules for health-economic models.
//!
//! This crate holds the inputs every downstream stage reads: named
//! parameter values indexed by (sample, stratum, time interval), and the
//! [`TimeSchedule`] that partitions the simulation horizon for
//! time-inhomogeneous models. It also provides the distribution draws that
//! populate a store for probabilistic sensitivity analysis.
//!
//! # Quick start
//!
//! ```rust
//! use iaso_params::{ParamValue, ParameterSet, TimeSchedule};
//!
//! let mut params = ParameterSet::new(100, 2, TimeSchedule::single()).unwrap();
//! params.register("p_sick_dead", ParamValue::Scalar(0.02)).unwrap();
//!
//! // Scalars broadcast across every sample and stratum.
//! assert_eq!(params.get("p_sick_dead", 57, 1, 0).unwrap(), 0.02);
//! ```

pub mod draw;
pub mod error;
pub mod schedule;
pub mod store;
pub mod value;

pub use draw::{DirichletSpec, DistributionSpec, draw, draw_dirichlet};
pub use error::ParamError;
pub use schedule::TimeSchedule;
pub use store::ParameterSet;
pub use value::ParamValue;

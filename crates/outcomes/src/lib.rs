//! Discounted outcome integration for cohort simulations.
//!
//! Turns a state-occupancy trajectory into scalar outcomes (total QALYs,
//! total cost per category) by integrating per-state value schedules
//! with an explicit quadrature rule and compound discounting.
//!
//! # Quick start
//!
//! ```rust
//! use iaso_cohort::{MatrixSchedule, propagate};
//! use iaso_outcomes::{Quadrature, ValueSchedule, integrate};
//! use iaso_tpmatrix::TransitionMatrix;
//!
//! let matrix = TransitionMatrix::from_rows(vec![
//!     vec![0.9, 0.1],
//!     vec![0.0, 1.0],
//! ])
//! .unwrap();
//! let schedule = MatrixSchedule::constant(matrix, 1.0).unwrap();
//! let trajectory = propagate(&[1.0, 0.0], &schedule, 3).unwrap();
//!
//! // Utility 0.8 while alive, 0 when dead; 3% annual discounting.
//! let utility = ValueSchedule::constant(vec![0.8, 0.0]).unwrap();
//! let qalys = integrate(&trajectory, &utility, 0.03, Quadrature::RiemannRight, 1.0).unwrap();
//! assert!(qalys > 0.0);
//! ```

pub mod error;
pub mod integrate;
pub mod values;

pub use error::OutcomeError;
pub use integrate::{Quadrature, integrate};
pub use values::ValueSchedule;

//! Discrete-time Markov cohort propagation.
//!
//! This crate is the cost center of the toolkit: given an initial
//! occupancy distribution and a (possibly time-varying) schedule of
//! transition matrices, it computes the cohort's state-probability
//! trajectory one row-vector-times-matrix step per cycle.
//!
//! # Pipeline
//!
//! ```text
//!  ┌──────────────┐     ┌────────────────┐     ┌──────────────────┐
//!  │  tpmatrix     │────▶│ MatrixSchedule │────▶│    propagate     │
//!  │  (build)      │     │ (per interval) │     │  (forward pass)  │
//!  └──────────────┘     └────────────────┘     └──────────────────┘
//! ```
//!
//! # Quick start
//!
//! ```rust
//! use iaso_cohort::{MatrixSchedule, propagate};
//! use iaso_tpmatrix::TransitionMatrix;
//!
//! let matrix = TransitionMatrix::from_rows(vec![
//!     vec![0.9, 0.1],
//!     vec![0.0, 1.0],
//! ])
//! .unwrap();
//! let schedule = MatrixSchedule::constant(matrix, 1.0).unwrap();
//!
//! let trajectory = propagate(&[1.0, 0.0], &schedule, 3).unwrap();
//! let final_dist = trajectory.final_distribution();
//! assert!((final_dist[0] - 0.729).abs() < 1e-12);
//! assert!((final_dist[1] - 0.271).abs() < 1e-12);
//! ```

pub mod error;
pub mod propagate;
pub mod schedule;
pub mod trajectory;

pub use error::CohortError;
pub use propagate::{DISTRIBUTION_TOL, propagate, propagate_into};
pub use schedule::MatrixSchedule;
pub use trajectory::OccupancyTrajectory;

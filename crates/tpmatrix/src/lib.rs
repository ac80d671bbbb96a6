//! Transition-probability-matrix construction for Markov cohort models.
//!
//! A strategy's transition structure is written once as a
//! [`MatrixTemplate`] of symbolic cells (explicit constants, references
//! into the parameter store, and at most one complement marker per row)
//! and resolved by [`build`] into one concrete row-stochastic
//! [`TransitionMatrix`] per (parameter sample, stratum, time interval).
//!
//! # Quick start
//!
//! ```rust
//! use iaso_params::{ParameterSet, TimeSchedule};
//! use iaso_tpmatrix::{CellExpr, MatrixTemplate, build};
//!
//! // Healthy -> Dead with the diagonal as the complement.
//! let cells: Vec<CellExpr> = ["C", "0.1", "0", "1"]
//!     .iter()
//!     .map(|s| s.parse().unwrap())
//!     .collect();
//! let template = MatrixTemplate::new(2, cells)
//!     .unwrap()
//!     .with_absorbing(&[1])
//!     .unwrap();
//!
//! let params = ParameterSet::new(1, 1, TimeSchedule::single()).unwrap();
//! let matrix = build(&template, &params, 0, 0, 0.0).unwrap();
//! assert_eq!(matrix.row(0), &[0.9, 0.1]);
//! ```

pub mod build;
pub mod error;
pub mod expr;
pub mod matrix;
pub mod template;

pub use build::{COMPLEMENT_TOL, build};
pub use error::TpMatrixError;
pub use expr::CellExpr;
pub use matrix::{ROW_SUM_TOL, TransitionMatrix};
pub use template::MatrixTemplate;

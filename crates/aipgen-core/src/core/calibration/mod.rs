//! # Value Calibration
//!
//! Linear per-atom-type tables that turn raw surface potentials into AIP
//! interaction values, and the [`ValueModel`] that picks the right table for
//! each kind of surface feature.

pub mod model;
pub mod tables;

pub use model::{CalibrationMode, ValueModel};
pub use tables::{CalibrationTables, Coefficients, TableLoadError};

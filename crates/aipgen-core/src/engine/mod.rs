//! # Engine Module
//!
//! The stateful footprinting layer. Given a typed molecule and its three
//! sampled isosurfaces, the engine walks the atoms in order and places atom
//! interaction points (AIPs) on each one, consuming tight-surface area as lone
//! pairs are accepted.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Radii, percentiles and clustering knobs with a validating builder
//! - **Footprinting** ([`footprint`]) - [`AipFootprintEngine`], the per-atom driver and its search passes
//! - **Bookkeeping** ([`ledger`]) - Records, per-atom counters and the exclusion mask with rollback
//! - **Surface analysis** ([`edge`], [`clustering`]) - Edge trimming and two-medoid splitting of owned areas
//! - **Statistics** ([`statistics`]) - Whole-molecule polar and non-polar area summaries
//! - **Progress Monitoring** ([`progress`]) - Callback-based progress events
//! - **Error Handling** ([`error`]) - Engine-specific error types

pub mod clustering;
pub mod config;
pub mod edge;
pub mod error;
pub mod footprint;
pub mod ledger;
mod lone_pairs;
mod non_polar;
pub mod progress;
pub mod statistics;

pub use config::{FootprintConfig, FootprintConfigBuilder};
pub use error::EngineError;
pub use footprint::{AipFootprintEngine, Footprint, SurfacePartitions};
pub use progress::{Progress, ProgressReporter};
pub use statistics::SurfaceStatistics;

//! # Atom Typing
//!
//! Fine chemical-environment typing of molecular graphs. The footprint engine
//! branches on these types and the calibration tables are keyed by them.
//!
//! - [`atom_type`] - The closed [`AtomType`] enum and its canonical labels
//! - [`template`] - Functional-group templates with per-node attribute rules
//! - [`matcher`] - Backtracking enumeration of template embeddings
//! - [`classifier`] - Ordered, first-label-wins application of the templates

pub mod atom_type;
pub mod classifier;
pub mod matcher;
pub mod template;

pub use atom_type::{AtomType, LonePairs};
pub use classifier::AtomTypeClassifier;

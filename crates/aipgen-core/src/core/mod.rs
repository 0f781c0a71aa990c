//! # Core Module
//!
//! Stateless building blocks of AIP footprinting: the molecular graph, atom
//! typing, the calibration tables, the sampled surface model, file I/O and
//! geometric utilities.
//!
//! ## Architecture
//!
//! - **Molecular Representation** ([`models`]) - Elements, atoms, bonds, molecules and AIP records
//! - **Atom Typing** ([`typing`]) - Template-based classification into fine chemical types
//! - **Calibration** ([`calibration`]) - Per-type linear tables mapping potentials to interaction values
//! - **Surface Model** ([`surface`]) - Isosurface samples, hull measures and atom ownership
//! - **File I/O** ([`io`]) - Molecule and surface readers, AIP and statistics writers
//! - **Utilities** ([`utils`]) - Geometry helpers, convex hulls and the k-d tree index

pub mod calibration;
pub mod io;
pub mod models;
pub mod surface;
pub mod typing;
pub mod utils;

//! # aipgen Core Library
//!
//! Atom interaction point (AIP) footprinting of molecules from sampled
//! molecular electrostatic potential surfaces.
//!
//! ## Architectural Philosophy
//!
//! The library keeps the same three-layer split throughout.
//!
//! - **[`core`]: The Foundation.** Stateless data models (`Molecule`, `Surface`,
//!   `AipRecord`), atom typing, calibration tables and I/O utilities.
//!
//! - **[`engine`]: The Logic Core.** The stateful per-atom footprinting pass
//!   (`AipFootprintEngine`) with its exclusion ledger, edge detection,
//!   clustering and surface statistics.
//!
//! - **[`workflows`]: The Public API.** Ties `core` and `engine` together into a
//!   single call that types a molecule, footprints it and summarizes the result.

pub mod core;
pub mod engine;
pub mod workflows;

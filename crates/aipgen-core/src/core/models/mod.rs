//! # Core Models Module
//!
//! Data structures describing the molecule that is being footprinted and the
//! interaction points produced for it.
//!
//! ## Key Components
//!
//! - [`element`] - Supported elements and their reference radii and weights
//! - [`atom`] - Individual atoms with coordinates, radii and optional annotations
//! - [`topology`] - Bond orders and bonds between ordinal atom indices
//! - [`molecule`] - The molecular graph with adjacency lookups
//! - [`builder`] - Name-keyed construction of a validated [`molecule::Molecule`]
//! - [`aip`] - Atom interaction point records emitted by the footprint engine
//!
//! ## Usage
//!
//! ```ignore
//! use aipgen::core::models::{builder::MoleculeBuilder, element::Element, topology::BondOrder};
//!
//! let mut builder = MoleculeBuilder::new("water");
//! builder
//!     .add_atom("O", Element::O, Point3::origin())
//!     .add_atom("H1", Element::H, Point3::new(0.757, 0.586, 0.0))
//!     .add_bond("O", "H1", BondOrder::Single);
//! let molecule = builder.build()?;
//! ```

pub mod aip;
pub mod atom;
pub mod builder;
pub mod element;
pub mod molecule;
pub mod topology;

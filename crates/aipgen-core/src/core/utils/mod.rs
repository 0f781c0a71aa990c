//! Geometric primitives shared by the surface model and the footprint engine.

pub mod geometry;
pub mod hull;
pub mod spatial;

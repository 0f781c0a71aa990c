//! # Surface Model
//!
//! Sampled MEPS isosurfaces, their convex-hull measures, and the
//! partition of samples into atom-owned subsets.

pub mod isosurface;
pub mod partition;
pub mod sample;

pub use isosurface::Isosurface;
pub use partition::{OwnershipMetric, Partition};
pub use sample::{BOHR_TO_ANGSTROM, Surface, SurfaceError, SurfaceSample, SurfaceSet};

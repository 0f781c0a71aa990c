use super::isosurface::Isosurface;
use crate::core::utils::hull::convex_hull;
use nalgebra::Point3;
use thiserror::Error;

pub const BOHR_TO_ANGSTROM: f64 = 0.529177;

/// One MEPS sample: position in Å and electrostatic potential in hartree/e.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceSample {
    pub position: Point3<f64>,
    pub potential: f64,
}

impl SurfaceSample {
    pub fn new(position: Point3<f64>, potential: f64) -> Self {
        Self {
            position,
            potential,
        }
    }

    /// Builds a sample from a position given in bohr.
    pub fn from_bohr(x: f64, y: f64, z: f64, potential: f64) -> Self {
        Self::new(
            Point3::new(x, y, z) * BOHR_TO_ANGSTROM,
            potential,
        )
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum SurfaceError {
    #[error("The {isosurface} surface has no samples")]
    Empty { isosurface: Isosurface },
    #[error("Sample {index} of the {isosurface} surface is not finite")]
    NonFinite {
        isosurface: Isosurface,
        index: usize,
    },
}

/// All samples of one isosurface together with its convex-hull measures.
#[derive(Debug, Clone)]
pub struct Surface {
    isosurface: Isosurface,
    samples: Vec<SurfaceSample>,
    area: f64,
    volume: f64,
}

impl Surface {
    pub fn new(isosurface: Isosurface, samples: Vec<SurfaceSample>) -> Result<Self, SurfaceError> {
        if samples.is_empty() {
            return Err(SurfaceError::Empty { isosurface });
        }
        if let Some(index) = samples.iter().position(|s| {
            !(s.potential.is_finite() && s.position.coords.iter().all(|c| c.is_finite()))
        }) {
            return Err(SurfaceError::NonFinite { isosurface, index });
        }

        let positions: Vec<Point3<f64>> = samples.iter().map(|s| s.position).collect();
        let (area, volume) = convex_hull(&positions).map_or((0.0, 0.0), |m| (m.area, m.volume));

        Ok(Self {
            isosurface,
            samples,
            area,
            volume,
        })
    }

    pub fn isosurface(&self) -> Isosurface {
        self.isosurface
    }

    pub fn samples(&self) -> &[SurfaceSample] {
        &self.samples
    }

    pub fn sample(&self, index: usize) -> Option<&SurfaceSample> {
        self.samples.get(index)
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn positions(&self) -> Vec<Point3<f64>> {
        self.samples.iter().map(|s| s.position).collect()
    }

    /// Convex-hull area of all samples (Å²).
    pub fn area(&self) -> f64 {
        self.area
    }

    pub fn volume(&self) -> f64 {
        self.volume
    }

    pub fn area_per_point(&self) -> f64 {
        self.area / self.samples.len() as f64
    }

    pub fn potential_range(&self) -> (f64, f64) {
        self.samples
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), s| {
                (lo.min(s.potential), hi.max(s.potential))
            })
    }
}

/// The three isosurfaces of one molecule.
#[derive(Debug, Clone)]
pub struct SurfaceSet {
    pub tight: Surface,
    pub middle: Surface,
    pub loose: Surface,
}

impl SurfaceSet {
    pub fn new(tight: Surface, middle: Surface, loose: Surface) -> Self {
        Self {
            tight,
            middle,
            loose,
        }
    }

    pub fn get(&self, isosurface: Isosurface) -> &Surface {
        match isosurface {
            Isosurface::Tight => &self.tight,
            Isosurface::Middle => &self.middle,
            Isosurface::Loose => &self.loose,
        }
    }
}

use crate::core::surface::Isosurface;
use crate::core::typing::AtomType;
use nalgebra::Point3;
use serde::Serialize;
use std::fmt;

/// How an interaction point was located.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum AipCategory {
    /// Lone pair found on the loose surface.
    Polar,
    /// Extreme-value or clustered site on the tight surface.
    NonPolar,
    /// Site at the tip of an X-H bond.
    Hydrogen,
    /// Positive cap along a bond axis on the middle surface.
    Sigma,
    /// Sigma hole that had to be taken from the tight surface.
    OuterSigma,
    /// Lone pair or fluorine site placed on the tight surface.
    OuterPolar,
}

impl AipCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            AipCategory::Polar => "polar",
            AipCategory::NonPolar => "non-polar",
            AipCategory::Hydrogen => "hydrogen",
            AipCategory::Sigma => "sigma",
            AipCategory::OuterSigma => "outer-sigma",
            AipCategory::OuterPolar => "outer-polar",
        }
    }

    /// Lone-pair categories count towards an atom's polar tally.
    pub fn is_polar(self) -> bool {
        matches!(self, AipCategory::Polar | AipCategory::OuterPolar)
    }
}

impl fmt::Display for AipCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Opposite-sign extremum attached to an ambiguous pi face.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DualCompanion {
    pub value: f64,
    pub raw_value: f64,
    pub sample_index: usize,
}

/// One atom interaction point.
#[derive(Debug, Clone, PartialEq)]
pub struct AipRecord {
    /// Calibrated interaction strength, rounded to two decimals.
    pub value: f64,
    /// Electrostatic potential of the underlying surface sample.
    pub raw_value: f64,
    pub position: Point3<f64>,
    /// Index of the sample on [`isosurface`](Self::isosurface) this point sits on.
    pub sample_index: usize,
    pub category: AipCategory,
    pub atom_index: usize,
    pub atom_type: AtomType,
    pub atom_name: String,
    pub area_fraction: f64,
    pub isosurface: Isosurface,
    pub dual: Option<DualCompanion>,
}

impl AipRecord {
    pub fn is_dual(&self) -> bool {
        self.dual.is_some()
    }

    /// Flattens the record into named attributes for document writers.
    pub fn attributes(&self) -> Vec<(&'static str, String)> {
        let mut attrs = vec![
            ("value", format!("{:.2}", self.value)),
            ("nearest_atom_id", self.atom_name.clone()),
            ("type", self.category.to_string()),
            ("atom_type", self.atom_type.to_string()),
            ("x3", format!("{:.6}", self.position.x)),
            ("y3", format!("{:.6}", self.position.y)),
            ("z3", format!("{:.6}", self.position.z)),
            ("raw_value", format!("{:.6}", self.raw_value)),
            ("isosurface", format!("{}", self.isosurface.density())),
            ("fraction", format!("{}", self.area_fraction)),
        ];
        if let Some(dual) = &self.dual {
            attrs.push(("max_value", format!("{:.2}", dual.value)));
            attrs.push(("max_raw_value", format!("{:.6}", dual.raw_value)));
        }
        attrs
    }
}

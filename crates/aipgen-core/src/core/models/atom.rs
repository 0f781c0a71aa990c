use super::element::Element;
use crate::core::typing::AtomType;
use nalgebra::Point3;
use std::fmt;
use std::str::FromStr;

/// Coarse hybridization label that an upstream structure reader may supply.
///
/// Typing templates can constrain on it, but the classifier never requires it:
/// atoms without a label simply fail any template rule that demands one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Hybridization {
    Sp,
    Sp2,
    Sp3,
    Aromatic,
}

impl FromStr for Hybridization {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sp" | "1" => Ok(Hybridization::Sp),
            "sp2" | "2" => Ok(Hybridization::Sp2),
            "sp3" | "3" => Ok(Hybridization::Sp3),
            "ar" | "aromatic" => Ok(Hybridization::Aromatic),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Hybridization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Hybridization::Sp => "sp",
            Hybridization::Sp2 => "sp2",
            Hybridization::Sp3 => "sp3",
            Hybridization::Aromatic => "ar",
        })
    }
}

/// An atom of the molecule being footprinted.
///
/// Radii are resolved from the element reference table when the atom is
/// created, so downstream geometry never has to consult the table again.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// Stable ordinal index within the molecule.
    pub index: usize,
    /// Unique atom name (e.g., "O1", "H2").
    pub name: String,
    pub element: Element,
    /// Cartesian coordinates in Angstroms.
    pub position: Point3<f64>,
    pub hybridization: Option<Hybridization>,
    /// Fine chemical-environment type, filled in by the classifier or pre-assigned by the caller.
    pub atom_type: Option<AtomType>,
    pub covalent_radius: f64,
    pub vdw_radius: f64,
}

impl Atom {
    pub fn new(index: usize, name: &str, element: Element, position: Point3<f64>) -> Self {
        let data = element.data();
        Self {
            index,
            name: name.to_string(),
            element,
            position,
            hybridization: None,
            atom_type: None,
            covalent_radius: data.covalent_radius,
            vdw_radius: data.vdw_radius,
        }
    }

    pub fn is_hydrogen(&self) -> bool {
        self.element == Element::H
    }
}

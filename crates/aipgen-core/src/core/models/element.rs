use phf::{Map, phf_map};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Chemical elements recognised by the footprinting pipeline.
///
/// The set covers the elements that appear in drug-like small molecules and
/// common solvents. Any element outside this list is rejected at input time,
/// since neither the typing templates nor the calibration tables know about it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Element {
    H,
    B,
    C,
    N,
    O,
    F,
    Si,
    P,
    S,
    Cl,
    Se,
    Br,
    I,
}

/// Reference data for one element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElementData {
    /// Single-bond covalent radius in Angstroms.
    pub covalent_radius: f64,
    /// Bondi van der Waals radius in Angstroms.
    pub vdw_radius: f64,
    /// Standard atomic weight in g/mol.
    pub atomic_weight: f64,
}

static ELEMENT_TABLE: Map<&'static str, ElementData> = phf_map! {
    "H" => ElementData { covalent_radius: 0.31, vdw_radius: 1.20, atomic_weight: 1.008 },
    "B" => ElementData { covalent_radius: 0.84, vdw_radius: 1.92, atomic_weight: 10.81 },
    "C" => ElementData { covalent_radius: 0.76, vdw_radius: 1.70, atomic_weight: 12.011 },
    "N" => ElementData { covalent_radius: 0.71, vdw_radius: 1.55, atomic_weight: 14.007 },
    "O" => ElementData { covalent_radius: 0.66, vdw_radius: 1.52, atomic_weight: 15.999 },
    "F" => ElementData { covalent_radius: 0.57, vdw_radius: 1.47, atomic_weight: 18.998 },
    "Si" => ElementData { covalent_radius: 1.11, vdw_radius: 2.10, atomic_weight: 28.085 },
    "P" => ElementData { covalent_radius: 1.07, vdw_radius: 1.80, atomic_weight: 30.974 },
    "S" => ElementData { covalent_radius: 1.05, vdw_radius: 1.80, atomic_weight: 32.06 },
    "Cl" => ElementData { covalent_radius: 1.02, vdw_radius: 1.75, atomic_weight: 35.45 },
    "Se" => ElementData { covalent_radius: 1.20, vdw_radius: 1.90, atomic_weight: 78.971 },
    "Br" => ElementData { covalent_radius: 1.20, vdw_radius: 1.85, atomic_weight: 79.904 },
    "I" => ElementData { covalent_radius: 1.39, vdw_radius: 1.98, atomic_weight: 126.904 },
};

impl Element {
    pub const ALL: [Element; 13] = [
        Element::H,
        Element::B,
        Element::C,
        Element::N,
        Element::O,
        Element::F,
        Element::Si,
        Element::P,
        Element::S,
        Element::Cl,
        Element::Se,
        Element::Br,
        Element::I,
    ];

    pub fn symbol(self) -> &'static str {
        match self {
            Element::H => "H",
            Element::B => "B",
            Element::C => "C",
            Element::N => "N",
            Element::O => "O",
            Element::F => "F",
            Element::Si => "Si",
            Element::P => "P",
            Element::S => "S",
            Element::Cl => "Cl",
            Element::Se => "Se",
            Element::Br => "Br",
            Element::I => "I",
        }
    }

    /// Looks up the reference data for this element.
    ///
    /// Every variant has an entry in the static table, so the fallback branch
    /// only exists to keep the lookup total.
    pub fn data(self) -> ElementData {
        ELEMENT_TABLE
            .get(self.symbol())
            .copied()
            .unwrap_or(ElementData {
                covalent_radius: 0.77,
                vdw_radius: 1.70,
                atomic_weight: 0.0,
            })
    }

    pub fn covalent_radius(self) -> f64 {
        self.data().covalent_radius
    }

    pub fn vdw_radius(self) -> f64 {
        self.data().vdw_radius
    }

    pub fn is_halogen(self) -> bool {
        matches!(self, Element::F | Element::Cl | Element::Br | Element::I)
    }

    /// Heavy halogens and chalcogens carry a symmetric belt of negative
    /// potential around their bond axis.
    pub fn is_heavy_polarizable(self) -> bool {
        matches!(
            self,
            Element::Cl | Element::Br | Element::I | Element::S | Element::Se
        )
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown element symbol: '{0}'")]
pub struct ParseElementError(pub String);

impl FromStr for Element {
    type Err = ParseElementError;

    /// Parses an element symbol. Matching is case-insensitive so that
    /// upper-case symbols from legacy structure files (`CL`, `BR`) are accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Element::ALL
            .iter()
            .copied()
            .find(|e| e.symbol().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ParseElementError(trimmed.to_string()))
    }
}

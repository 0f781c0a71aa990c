use crate::core::models::element::Element;
use phf::{Map, phf_map};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HydrogenType {
    /// Hydroxyl or water hydrogen.
    OnOxygen,
    OnNitrogen,
    OnSulfur,
    OnCarbon,
    /// Hydrogen on any other element, or isolated.
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CarbonType {
    Sp3,
    Sp2,
    Carbonyl,
    Aromatic,
    Sp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NitrogenType {
    /// Pyramidal amine.
    Amine,
    /// Quaternary ammonium, no lone pair.
    Ammonium,
    /// Trigonal planar (aniline, enamine, amidine single-bonded N).
    Trigonal,
    Amide,
    Imine,
    Nitrile,
    /// Pyridine-type aromatic nitrogen.
    Aromatic,
    /// Pyrrole-type aromatic nitrogen, lone pair in the ring.
    AromaticSubstituted,
    Nitro,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OxygenType {
    /// Hydroxyl, ether or water oxygen.
    Sp3,
    Carbonyl,
    Carboxylate,
    /// Furan-type aromatic oxygen.
    Aromatic,
    PhosphineOxide,
    Sulfoxide,
    NOxide,
    Nitro,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SulfurType {
    /// Thiol or thioether.
    Sp3,
    /// Thione.
    Sp2,
    /// Thiophene-type aromatic sulfur.
    Aromatic,
    Sulfoxide,
    Sulfone,
    /// Phosphine sulfide.
    PhosphineSulfide,
}

/// Fine chemical-environment type of an atom.
///
/// The outer variant is the coarse category and the payload the fine subtype.
/// Every type has a canonical label (`"N.am"`, `"O.3"`, ...) used in tables,
/// configuration files and output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AtomType {
    Hydrogen(HydrogenType),
    Carbon(CarbonType),
    Nitrogen(NitrogenType),
    Oxygen(OxygenType),
    Sulfur(SulfurType),
    Phosphorus,
    Halogen(Element),
    Other(Element),
}

/// How many lone pairs the polar sub-search should look for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LonePairs {
    None,
    One,
    Two,
    Three,
}

impl LonePairs {
    pub fn count(self) -> usize {
        match self {
            LonePairs::None => 0,
            LonePairs::One => 1,
            LonePairs::Two => 2,
            LonePairs::Three => 3,
        }
    }
}

static LABELS: Map<&'static str, AtomType> = phf_map! {
    "H.O" => AtomType::Hydrogen(HydrogenType::OnOxygen),
    "H.N" => AtomType::Hydrogen(HydrogenType::OnNitrogen),
    "H.S" => AtomType::Hydrogen(HydrogenType::OnSulfur),
    "H.C" => AtomType::Hydrogen(HydrogenType::OnCarbon),
    "H" => AtomType::Hydrogen(HydrogenType::Other),
    "C.3" => AtomType::Carbon(CarbonType::Sp3),
    "C.2" => AtomType::Carbon(CarbonType::Sp2),
    "C.co" => AtomType::Carbon(CarbonType::Carbonyl),
    "C.ar" => AtomType::Carbon(CarbonType::Aromatic),
    "C.1" => AtomType::Carbon(CarbonType::Sp),
    "N.3" => AtomType::Nitrogen(NitrogenType::Amine),
    "N.4" => AtomType::Nitrogen(NitrogenType::Ammonium),
    "N.pl3" => AtomType::Nitrogen(NitrogenType::Trigonal),
    "N.am" => AtomType::Nitrogen(NitrogenType::Amide),
    "N.2" => AtomType::Nitrogen(NitrogenType::Imine),
    "N.1" => AtomType::Nitrogen(NitrogenType::Nitrile),
    "N.ar" => AtomType::Nitrogen(NitrogenType::Aromatic),
    "N.ar.pl3" => AtomType::Nitrogen(NitrogenType::AromaticSubstituted),
    "N.no2" => AtomType::Nitrogen(NitrogenType::Nitro),
    "O.3" => AtomType::Oxygen(OxygenType::Sp3),
    "O.2" => AtomType::Oxygen(OxygenType::Carbonyl),
    "O.co2" => AtomType::Oxygen(OxygenType::Carboxylate),
    "O.ar" => AtomType::Oxygen(OxygenType::Aromatic),
    "O.po" => AtomType::Oxygen(OxygenType::PhosphineOxide),
    "O.so" => AtomType::Oxygen(OxygenType::Sulfoxide),
    "O.no" => AtomType::Oxygen(OxygenType::NOxide),
    "O.no2" => AtomType::Oxygen(OxygenType::Nitro),
    "S.3" => AtomType::Sulfur(SulfurType::Sp3),
    "S.2" => AtomType::Sulfur(SulfurType::Sp2),
    "S.ar" => AtomType::Sulfur(SulfurType::Aromatic),
    "S.o" => AtomType::Sulfur(SulfurType::Sulfoxide),
    "S.o2" => AtomType::Sulfur(SulfurType::Sulfone),
    "S.ps" => AtomType::Sulfur(SulfurType::PhosphineSulfide),
    "P.3" => AtomType::Phosphorus,
    "F" => AtomType::Halogen(Element::F),
    "Cl" => AtomType::Halogen(Element::Cl),
    "Br" => AtomType::Halogen(Element::Br),
    "I" => AtomType::Halogen(Element::I),
    "B" => AtomType::Other(Element::B),
    "Si" => AtomType::Other(Element::Si),
    "Se" => AtomType::Other(Element::Se),
};

impl AtomType {
    pub fn label(self) -> &'static str {
        match self {
            AtomType::Hydrogen(h) => match h {
                HydrogenType::OnOxygen => "H.O",
                HydrogenType::OnNitrogen => "H.N",
                HydrogenType::OnSulfur => "H.S",
                HydrogenType::OnCarbon => "H.C",
                HydrogenType::Other => "H",
            },
            AtomType::Carbon(c) => match c {
                CarbonType::Sp3 => "C.3",
                CarbonType::Sp2 => "C.2",
                CarbonType::Carbonyl => "C.co",
                CarbonType::Aromatic => "C.ar",
                CarbonType::Sp => "C.1",
            },
            AtomType::Nitrogen(n) => match n {
                NitrogenType::Amine => "N.3",
                NitrogenType::Ammonium => "N.4",
                NitrogenType::Trigonal => "N.pl3",
                NitrogenType::Amide => "N.am",
                NitrogenType::Imine => "N.2",
                NitrogenType::Nitrile => "N.1",
                NitrogenType::Aromatic => "N.ar",
                NitrogenType::AromaticSubstituted => "N.ar.pl3",
                NitrogenType::Nitro => "N.no2",
            },
            AtomType::Oxygen(o) => match o {
                OxygenType::Sp3 => "O.3",
                OxygenType::Carbonyl => "O.2",
                OxygenType::Carboxylate => "O.co2",
                OxygenType::Aromatic => "O.ar",
                OxygenType::PhosphineOxide => "O.po",
                OxygenType::Sulfoxide => "O.so",
                OxygenType::NOxide => "O.no",
                OxygenType::Nitro => "O.no2",
            },
            AtomType::Sulfur(s) => match s {
                SulfurType::Sp3 => "S.3",
                SulfurType::Sp2 => "S.2",
                SulfurType::Aromatic => "S.ar",
                SulfurType::Sulfoxide => "S.o",
                SulfurType::Sulfone => "S.o2",
                SulfurType::PhosphineSulfide => "S.ps",
            },
            AtomType::Phosphorus => "P.3",
            AtomType::Halogen(e) | AtomType::Other(e) => e.symbol(),
        }
    }

    pub fn element(self) -> Element {
        match self {
            AtomType::Hydrogen(_) => Element::H,
            AtomType::Carbon(_) => Element::C,
            AtomType::Nitrogen(_) => Element::N,
            AtomType::Oxygen(_) => Element::O,
            AtomType::Sulfur(_) => Element::S,
            AtomType::Phosphorus => Element::P,
            AtomType::Halogen(e) | AtomType::Other(e) => e,
        }
    }

    /// Coarse type used when no template labels an atom.
    pub fn coarse(element: Element) -> AtomType {
        match element {
            Element::H => AtomType::Hydrogen(HydrogenType::Other),
            Element::C => AtomType::Carbon(CarbonType::Sp3),
            Element::N => AtomType::Nitrogen(NitrogenType::Amine),
            Element::O => AtomType::Oxygen(OxygenType::Sp3),
            Element::S => AtomType::Sulfur(SulfurType::Sp3),
            Element::P => AtomType::Phosphorus,
            Element::F | Element::Cl | Element::Br | Element::I => AtomType::Halogen(element),
            Element::B | Element::Si | Element::Se => AtomType::Other(element),
        }
    }

    pub fn is_hydrogen(self) -> bool {
        matches!(self, AtomType::Hydrogen(_))
    }

    pub fn lone_pairs(self) -> LonePairs {
        match self {
            AtomType::Nitrogen(
                NitrogenType::Amine
                | NitrogenType::Imine
                | NitrogenType::Nitrile
                | NitrogenType::Aromatic,
            ) => LonePairs::One,
            AtomType::Oxygen(
                OxygenType::Sp3 | OxygenType::Carbonyl | OxygenType::Carboxylate | OxygenType::Nitro,
            ) => LonePairs::Two,
            AtomType::Oxygen(
                OxygenType::PhosphineOxide | OxygenType::Sulfoxide | OxygenType::NOxide,
            ) => LonePairs::Three,
            AtomType::Sulfur(SulfurType::Sp2) => LonePairs::Two,
            AtomType::Sulfur(SulfurType::PhosphineSulfide) => LonePairs::Three,
            _ => LonePairs::None,
        }
    }

    pub fn is_lone_pair_eligible(self) -> bool {
        self.lone_pairs() != LonePairs::None
    }

    pub fn is_pi_system(self) -> bool {
        matches!(
            self,
            AtomType::Carbon(CarbonType::Sp2 | CarbonType::Carbonyl | CarbonType::Aromatic)
                | AtomType::Nitrogen(
                    NitrogenType::Trigonal
                        | NitrogenType::Amide
                        | NitrogenType::Imine
                        | NitrogenType::Aromatic
                        | NitrogenType::AromaticSubstituted
                        | NitrogenType::Nitro
                )
                | AtomType::Oxygen(
                    OxygenType::Carbonyl
                        | OxygenType::Carboxylate
                        | OxygenType::Aromatic
                        | OxygenType::Nitro
                )
                | AtomType::Sulfur(SulfurType::Sp2 | SulfurType::Aromatic)
        )
    }

    pub fn is_linear(self) -> bool {
        matches!(
            self,
            AtomType::Carbon(CarbonType::Sp) | AtomType::Nitrogen(NitrogenType::Nitrile)
        )
    }

    pub fn is_sulfoxide_sulfur(self) -> bool {
        matches!(
            self,
            AtomType::Sulfur(SulfurType::Sulfoxide | SulfurType::Sulfone)
        )
    }

    /// Divalent sulfur that carries sigma holes opposite its two substituents.
    pub fn is_divalent_sulfur(self) -> bool {
        matches!(self, AtomType::Sulfur(SulfurType::Sp3 | SulfurType::Aromatic))
    }

    /// Non-polar sites of these types come in symmetric pairs, each owning half the area.
    pub fn has_dual_lobes(self) -> bool {
        self.is_pi_system() || self.element().is_heavy_polarizable()
    }
}

impl fmt::Display for AtomType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown atom type label '{0}'")]
pub struct ParseAtomTypeError(pub String);

impl FromStr for AtomType {
    type Err = ParseAtomTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LABELS
            .get(s.trim())
            .copied()
            .ok_or_else(|| ParseAtomTypeError(s.trim().to_string()))
    }
}

impl Serialize for AtomType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for AtomType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        label.parse().map_err(serde::de::Error::custom)
    }
}

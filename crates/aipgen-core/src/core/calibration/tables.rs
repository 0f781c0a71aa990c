use crate::core::typing::AtomType;
use phf::{Map, phf_map};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

/// Linear calibration pair: calibrated = c0 + c1 * potential (sign handled by the caller).
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Coefficients {
    pub c0: f64,
    pub c1: f64,
}

impl Coefficients {
    pub const fn new(c0: f64, c1: f64) -> Self {
        Self { c0, c1 }
    }

    pub fn apply(&self, potential: f64) -> f64 {
        self.c0 + self.c1 * potential
    }
}

// Potentials are in hartree per elementary charge.

static ALPHA_MIDDLE: Map<&'static str, (f64, f64)> = phf_map! {
    "H.O" => (0.24, 25.6),
    "H.N" => (0.19, 24.8),
    "H.S" => (0.08, 21.7),
    "H.C" => (0.03, 19.9),
    "H" => (0.02, 19.0),
    "Cl" => (0.05, 16.2),
    "Br" => (0.07, 17.5),
    "I" => (0.11, 18.9),
    "S.3" => (0.04, 15.8),
    "S.ar" => (0.03, 15.1),
    "Se" => (0.06, 16.6),
};

static ALPHA_TIGHT: Map<&'static str, (f64, f64)> = phf_map! {
    "C.3" => (0.0, 9.8),
    "C.2" => (0.0, 10.4),
    "C.co" => (0.0, 11.2),
    "C.ar" => (0.0, 10.1),
    "C.1" => (0.0, 10.9),
    "N.am" => (0.0, 10.6),
    "N.pl3" => (0.0, 10.3),
    "N.ar.pl3" => (0.0, 10.8),
    "N.4" => (0.0, 12.0),
    "N.no2" => (0.0, 11.7),
    "O.2" => (0.0, 9.4),
    "O.3" => (0.0, 9.0),
    "S.o" => (0.0, 12.6),
    "S.o2" => (0.0, 13.1),
    "S.3" => (0.0, 9.9),
    "S.2" => (0.0, 9.7),
    "S.ar" => (0.0, 9.6),
    "P.3" => (0.0, 11.0),
    "Cl" => (0.0, 10.2),
    "Br" => (0.0, 10.8),
    "I" => (0.0, 11.5),
};

static BETA_TIGHT: Map<&'static str, (f64, f64)> = phf_map! {
    "C.3" => (0.0, -11.0),
    "C.2" => (0.0, -13.6),
    "C.co" => (0.0, -12.0),
    "C.ar" => (0.0, -14.2),
    "C.1" => (0.0, -15.1),
    "N.3" => (0.0, -18.0),
    "N.2" => (0.0, -17.8),
    "N.1" => (0.0, -17.2),
    "N.ar" => (0.0, -18.5),
    "O.3" => (0.0, -16.4),
    "O.2" => (0.0, -16.9),
    "O.co2" => (0.0, -17.5),
    "F" => (0.0, -13.5),
    "Cl" => (0.0, -14.8),
    "Br" => (0.0, -15.3),
    "I" => (0.0, -15.9),
    "S.3" => (0.0, -16.0),
    "S.2" => (0.0, -16.2),
    "S.ar" => (0.0, -15.5),
};

static BETA_LOOSE: Map<&'static str, (f64, f64)> = phf_map! {
    "N.3" => (-0.45, 92.0),
    "N.2" => (-0.40, 89.5),
    "N.1" => (-0.31, 74.0),
    "N.ar" => (-0.48, 94.0),
    "O.3" => (-0.38, 68.0),
    "O.2" => (-0.52, 72.5),
    "O.co2" => (-0.70, 79.0),
    "O.po" => (-0.85, 81.0),
    "O.so" => (-0.66, 76.4),
    "O.no" => (-0.74, 77.8),
    "O.no2" => (-0.21, 51.0),
    "S.2" => (-0.12, 48.0),
    "S.ps" => (-0.30, 58.0),
    "S.3" => (-0.10, 40.0),
    "S.ar" => (-0.05, 35.0),
};

static ALPHA_ALL_ATOMS: Map<&'static str, (f64, f64)> = phf_map! {
    "H.O" => (0.30, 27.0),
    "H.N" => (0.25, 25.5),
    "H.S" => (0.10, 21.0),
    "H.C" => (0.05, 14.0),
    "H" => (0.05, 14.0),
};

static BETA_ALL_ATOMS: Map<&'static str, (f64, f64)> = phf_map! {
    "O.3" => (-0.30, 60.0),
    "O.2" => (-0.40, 64.0),
    "O.co2" => (-0.60, 71.0),
    "N.3" => (-0.35, 82.0),
    "N.ar" => (-0.38, 84.0),
    "N.2" => (-0.33, 80.0),
    "N.1" => (-0.25, 66.0),
};

pub const SOFT_HYDROGEN: Coefficients = Coefficients::new(0.0, 18.0);
pub const DUAL: Coefficients = Coefficients::new(0.0, 12.5);
pub const ALPHA_ALL_ATOMS_FALLBACK: Coefficients = Coefficients::new(0.0, 12.0);
pub const BETA_ALL_ATOMS_FALLBACK: Coefficients = Coefficients::new(0.0, 30.0);

/// Calibration coefficients per fine atom type.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoefficientTable {
    entries: HashMap<AtomType, Coefficients>,
}

impl CoefficientTable {
    fn from_static(map: &Map<&'static str, (f64, f64)>) -> Self {
        let entries = map
            .entries()
            .filter_map(|(label, (c0, c1))| {
                label
                    .parse::<AtomType>()
                    .ok()
                    .map(|t| (t, Coefficients::new(*c0, *c1)))
            })
            .collect();
        Self { entries }
    }

    pub fn get(&self, atom_type: AtomType) -> Option<Coefficients> {
        self.entries.get(&atom_type).copied()
    }

    pub fn insert(&mut self, atom_type: AtomType, coefficients: Coefficients) {
        self.entries.insert(atom_type, coefficients);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The full set of calibration tables plus the named fallback entries.
#[derive(Debug, Clone, PartialEq)]
pub struct CalibrationTables {
    pub alpha_middle: CoefficientTable,
    pub alpha_tight: CoefficientTable,
    pub beta_tight: CoefficientTable,
    pub beta_loose: CoefficientTable,
    pub alpha_all_atoms: CoefficientTable,
    pub beta_all_atoms: CoefficientTable,
    pub soft_hydrogen: Coefficients,
    pub dual: Coefficients,
    pub alpha_all_atoms_fallback: Coefficients,
    pub beta_all_atoms_fallback: Coefficients,
}

impl Default for CalibrationTables {
    fn default() -> Self {
        Self {
            alpha_middle: CoefficientTable::from_static(&ALPHA_MIDDLE),
            alpha_tight: CoefficientTable::from_static(&ALPHA_TIGHT),
            beta_tight: CoefficientTable::from_static(&BETA_TIGHT),
            beta_loose: CoefficientTable::from_static(&BETA_LOOSE),
            alpha_all_atoms: CoefficientTable::from_static(&ALPHA_ALL_ATOMS),
            beta_all_atoms: CoefficientTable::from_static(&BETA_ALL_ATOMS),
            soft_hydrogen: SOFT_HYDROGEN,
            dual: DUAL,
            alpha_all_atoms_fallback: ALPHA_ALL_ATOMS_FALLBACK,
            beta_all_atoms_fallback: BETA_ALL_ATOMS_FALLBACK,
        }
    }
}

#[derive(Debug, Error)]
pub enum TableLoadError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("TOML parsing error for '{path}': {source}")]
    Toml {
        path: String,
        source: toml::de::Error,
    },
    #[error("Unknown atom type '{label}' in table '{table}'")]
    UnknownAtomType { table: &'static str, label: String },
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
struct TableOverrides {
    soft_hydrogen: Option<Coefficients>,
    dual: Option<Coefficients>,
    alpha_all_atoms_fallback: Option<Coefficients>,
    beta_all_atoms_fallback: Option<Coefficients>,
    alpha_middle: HashMap<String, Coefficients>,
    alpha_tight: HashMap<String, Coefficients>,
    beta_tight: HashMap<String, Coefficients>,
    beta_loose: HashMap<String, Coefficients>,
    alpha_all_atoms: HashMap<String, Coefficients>,
    beta_all_atoms: HashMap<String, Coefficients>,
}

fn merge(
    table: &mut CoefficientTable,
    name: &'static str,
    overrides: HashMap<String, Coefficients>,
) -> Result<(), TableLoadError> {
    for (label, coefficients) in overrides {
        let atom_type = label
            .parse::<AtomType>()
            .map_err(|_| TableLoadError::UnknownAtomType { table: name, label })?;
        table.insert(atom_type, coefficients);
    }
    Ok(())
}

impl CalibrationTables {
    /// Loads a TOML file of table overrides and applies it on top of the defaults.
    pub fn load(path: &Path) -> Result<Self, TableLoadError> {
        let content = std::fs::read_to_string(path).map_err(|e| TableLoadError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        Self::from_toml_str(&content).map_err(|e| match e {
            TableLoadError::Toml { source, .. } => TableLoadError::Toml {
                path: path.to_string_lossy().to_string(),
                source,
            },
            other => other,
        })
    }

    pub fn from_toml_str(content: &str) -> Result<Self, TableLoadError> {
        let overrides: TableOverrides =
            toml::from_str(content).map_err(|e| TableLoadError::Toml {
                path: String::from("<string>"),
                source: e,
            })?;
        let mut tables = Self::default();
        if let Some(c) = overrides.soft_hydrogen {
            tables.soft_hydrogen = c;
        }
        if let Some(c) = overrides.dual {
            tables.dual = c;
        }
        if let Some(c) = overrides.alpha_all_atoms_fallback {
            tables.alpha_all_atoms_fallback = c;
        }
        if let Some(c) = overrides.beta_all_atoms_fallback {
            tables.beta_all_atoms_fallback = c;
        }
        merge(&mut tables.alpha_middle, "alpha-middle", overrides.alpha_middle)?;
        merge(&mut tables.alpha_tight, "alpha-tight", overrides.alpha_tight)?;
        merge(&mut tables.beta_tight, "beta-tight", overrides.beta_tight)?;
        merge(&mut tables.beta_loose, "beta-loose", overrides.beta_loose)?;
        merge(&mut tables.alpha_all_atoms, "alpha-all-atoms", overrides.alpha_all_atoms)?;
        merge(&mut tables.beta_all_atoms, "beta-all-atoms", overrides.beta_all_atoms)?;
        Ok(tables)
    }
}

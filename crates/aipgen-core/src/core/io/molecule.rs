use super::traits::InputFile;
use crate::core::models::atom::Hybridization;
use crate::core::models::builder::{ModelError, MoleculeBuilder};
use crate::core::models::element::{Element, ParseElementError};
use crate::core::models::molecule::Molecule;
use crate::core::models::topology::{BondOrder, ParseBondOrderError};
use crate::core::typing::AtomType;
use nalgebra::Point3;
use serde::Deserialize;
use std::io::{self, BufRead};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MoleculeTomlError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Malformed molecule document: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Atom '{atom}': {source}")]
    Element {
        atom: String,
        source: ParseElementError,
    },
    #[error("Atom '{atom}' has unknown hybridization '{value}'")]
    Hybridization { atom: String, value: String },
    #[error("Bond {first}-{second}: {source}")]
    BondOrder {
        first: String,
        second: String,
        source: ParseBondOrderError,
    },
    #[error(transparent)]
    Model(#[from] ModelError),
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct MoleculeDocument {
    name: String,
    #[serde(default)]
    atoms: Vec<AtomEntry>,
    #[serde(default)]
    bonds: Vec<BondEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct AtomEntry {
    name: String,
    element: String,
    position: [f64; 3],
    hybridization: Option<String>,
    #[serde(rename = "type")]
    atom_type: Option<AtomType>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct BondEntry {
    atoms: [String; 2],
    #[serde(default = "default_order")]
    order: String,
}

fn default_order() -> String {
    "single".to_string()
}

/// Molecule description in TOML.
///
/// ```toml
/// name = "water"
///
/// [[atoms]]
/// name = "O1"
/// element = "O"
/// position = [0.0, 0.0, 0.117]
///
/// [[bonds]]
/// atoms = ["O1", "H1"]
/// order = "single"
/// ```
///
/// Atoms may carry an optional `hybridization` and a pre-assigned fine `type`.
pub struct MoleculeToml;

impl InputFile for MoleculeToml {
    type Output = Molecule;
    type Error = MoleculeTomlError;

    fn read_from(reader: &mut impl BufRead) -> Result<Molecule, MoleculeTomlError> {
        let mut text = String::new();
        reader.read_to_string(&mut text)?;
        Self::parse(&text)
    }
}

impl MoleculeToml {
    pub fn parse(text: &str) -> Result<Molecule, MoleculeTomlError> {
        let document: MoleculeDocument = toml::from_str(text)?;
        let mut builder = MoleculeBuilder::new(&document.name);

        for atom in &document.atoms {
            let element: Element =
                atom.element
                    .parse()
                    .map_err(|source| MoleculeTomlError::Element {
                        atom: atom.name.clone(),
                        source,
                    })?;
            let hybridization = match &atom.hybridization {
                Some(value) => Some(value.parse::<Hybridization>().map_err(|_| {
                    MoleculeTomlError::Hybridization {
                        atom: atom.name.clone(),
                        value: value.clone(),
                    }
                })?),
                None => None,
            };
            let [x, y, z] = atom.position;
            builder.add_annotated_atom(
                &atom.name,
                element,
                Point3::new(x, y, z),
                hybridization,
                atom.atom_type,
            );
        }

        for bond in &document.bonds {
            let [first, second] = &bond.atoms;
            let order: BondOrder =
                bond.order
                    .parse()
                    .map_err(|source| MoleculeTomlError::BondOrder {
                        first: first.clone(),
                        second: second.clone(),
                        source,
                    })?;
            builder.add_bond(first, second, order);
        }

        Ok(builder.build()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const WATER: &str = r#"
name = "water"

[[atoms]]
name = "O1"
element = "O"
position = [0.0, 0.0, 0.117]
hybridization = "sp3"

[[atoms]]
name = "H1"
element = "H"
position = [0.0, 0.757, -0.467]

[[atoms]]
name = "H2"
element = "H"
position = [0.0, -0.757, -0.467]
type = "H.O"

[[bonds]]
atoms = ["O1", "H1"]

[[bonds]]
atoms = ["O1", "H2"]
order = "1"
"#;

    #[test]
    fn parses_atoms_bonds_and_annotations() {
        let molecule = MoleculeToml::parse(WATER).unwrap();
        assert_eq!(molecule.name(), "water");
        assert_eq!(molecule.len(), 3);
        assert_eq!(molecule.bonds().len(), 2);
        assert_eq!(molecule.degree(0), 2);
        assert_eq!(molecule.atoms()[0].hybridization, Some(Hybridization::Sp3));
        assert_eq!(molecule.atoms()[2].atom_type, Some("H.O".parse().unwrap()));
        assert_eq!(molecule.bond_order(0, 1), Some(BondOrder::Single));
    }

    #[test]
    fn reads_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(WATER.as_bytes()).unwrap();
        let molecule = MoleculeToml::read_from_path(file.path()).unwrap();
        assert_eq!(molecule.find_atom_by_name("H2"), Some(2));
    }

    #[test]
    fn unknown_element_names_the_atom() {
        let text = r#"
name = "x"
[[atoms]]
name = "Q1"
element = "Qq"
position = [0.0, 0.0, 0.0]
"#;
        let err = MoleculeToml::parse(text).unwrap_err();
        assert!(matches!(err, MoleculeTomlError::Element { ref atom, .. } if atom == "Q1"));
    }

    #[test]
    fn bad_bond_order_and_dangling_bond_are_reported() {
        let bad_order = r#"
name = "x"
[[atoms]]
name = "C1"
element = "C"
position = [0.0, 0.0, 0.0]
[[atoms]]
name = "C2"
element = "C"
position = [1.5, 0.0, 0.0]
[[bonds]]
atoms = ["C1", "C2"]
order = "quadruple"
"#;
        assert!(matches!(
            MoleculeToml::parse(bad_order),
            Err(MoleculeTomlError::BondOrder { .. })
        ));

        let dangling = r#"
name = "x"
[[atoms]]
name = "C1"
element = "C"
position = [0.0, 0.0, 0.0]
[[bonds]]
atoms = ["C1", "C9"]
"#;
        assert!(matches!(
            MoleculeToml::parse(dangling),
            Err(MoleculeTomlError::Model(ModelError::UnknownAtom(_)))
        ));
    }

    #[test]
    fn empty_molecule_is_rejected() {
        assert!(matches!(
            MoleculeToml::parse("name = \"nothing\""),
            Err(MoleculeTomlError::Model(ModelError::EmptyMolecule(_)))
        ));
    }
}

use super::atom::{Atom, Hybridization};
use super::element::Element;
use super::molecule::Molecule;
use super::topology::{Bond, BondOrder};
use crate::core::typing::AtomType;
use nalgebra::Point3;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    #[error("Molecule '{0}' contains no atoms")]
    EmptyMolecule(String),
    #[error("Duplicate atom name '{0}'")]
    DuplicateAtomName(String),
    #[error("Bond references unknown atom '{0}'")]
    UnknownAtom(String),
    #[error("Atom '{0}' cannot be bonded to itself")]
    SelfBond(String),
    #[error("Atom '{name}' has a non-finite coordinate")]
    NonFiniteCoordinate { name: String },
}

/// Incremental construction of a [`Molecule`] keyed by atom name.
///
/// Problems are recorded as they happen and reported together by [`build`](Self::build),
/// which lets readers chain `add_*` calls without checking each one.
pub struct MoleculeBuilder {
    molecule: Molecule,
    pending_bonds: Vec<(String, String, BondOrder)>,
    errors: Vec<ModelError>,
}

impl MoleculeBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            molecule: Molecule {
                name: name.to_string(),
                ..Molecule::default()
            },
            pending_bonds: Vec::new(),
            errors: Vec::new(),
        }
    }

    pub fn add_atom(&mut self, name: &str, element: Element, position: Point3<f64>) -> &mut Self {
        self.push_atom(name, element, position, None, None)
    }

    /// Adds an atom carrying optional upstream annotations: a coarse hybridization
    /// and a pre-assigned fine type that the classifier will keep.
    pub fn add_annotated_atom(
        &mut self,
        name: &str,
        element: Element,
        position: Point3<f64>,
        hybridization: Option<Hybridization>,
        atom_type: Option<AtomType>,
    ) -> &mut Self {
        self.push_atom(name, element, position, hybridization, atom_type)
    }

    fn push_atom(
        &mut self,
        name: &str,
        element: Element,
        position: Point3<f64>,
        hybridization: Option<Hybridization>,
        atom_type: Option<AtomType>,
    ) -> &mut Self {
        if self.molecule.name_map.contains_key(name) {
            self.errors
                .push(ModelError::DuplicateAtomName(name.to_string()));
            return self;
        }
        if !position.coords.iter().all(|c| c.is_finite()) {
            self.errors.push(ModelError::NonFiniteCoordinate {
                name: name.to_string(),
            });
            return self;
        }
        let index = self.molecule.atoms.len();
        let mut atom = Atom::new(index, name, element, position);
        atom.hybridization = hybridization;
        atom.atom_type = atom_type;
        self.molecule.atoms.push(atom);
        self.molecule.name_map.insert(name.to_string(), index);
        self
    }

    pub fn add_bond(&mut self, first: &str, second: &str, order: BondOrder) -> &mut Self {
        self.pending_bonds
            .push((first.to_string(), second.to_string(), order));
        self
    }

    /// Resolves bonds and returns the molecule, or the first recorded problem.
    pub fn build(mut self) -> Result<Molecule, ModelError> {
        if let Some(err) = self.errors.into_iter().next() {
            return Err(err);
        }
        if self.molecule.atoms.is_empty() {
            return Err(ModelError::EmptyMolecule(self.molecule.name));
        }

        let n = self.molecule.atoms.len();
        self.molecule.adjacency = vec![Vec::new(); n];
        for (first, second, order) in self.pending_bonds {
            let a = *self
                .molecule
                .name_map
                .get(&first)
                .ok_or_else(|| ModelError::UnknownAtom(first.clone()))?;
            let b = *self
                .molecule
                .name_map
                .get(&second)
                .ok_or_else(|| ModelError::UnknownAtom(second.clone()))?;
            if a == b {
                return Err(ModelError::SelfBond(first));
            }
            if self.molecule.adjacency[a].iter().any(|(n, _)| *n == b) {
                continue;
            }
            self.molecule.bonds.push(Bond::new(a, b, order));
            self.molecule.adjacency[a].push((b, order));
            self.molecule.adjacency[b].push((a, order));
        }
        Ok(self.molecule)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_resolves_bonds_by_name() {
        let mut builder = MoleculeBuilder::new("water");
        builder
            .add_atom("O", Element::O, Point3::origin())
            .add_atom("H1", Element::H, Point3::new(0.96, 0.0, 0.0))
            .add_bond("O", "H1", BondOrder::Single);
        let mol = builder.build().unwrap();
        assert_eq!(mol.name(), "water");
        assert_eq!(mol.len(), 2);
        assert_eq!(mol.bonds(), &[Bond::new(0, 1, BondOrder::Single)]);
    }

    #[test]
    fn dangling_bond_is_rejected() {
        let mut builder = MoleculeBuilder::new("broken");
        builder
            .add_atom("O", Element::O, Point3::origin())
            .add_bond("O", "H9", BondOrder::Single);
        assert_eq!(
            builder.build().unwrap_err(),
            ModelError::UnknownAtom("H9".to_string())
        );
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let mut builder = MoleculeBuilder::new("dup");
        builder
            .add_atom("C1", Element::C, Point3::origin())
            .add_atom("C1", Element::C, Point3::new(1.5, 0.0, 0.0));
        assert_eq!(
            builder.build().unwrap_err(),
            ModelError::DuplicateAtomName("C1".to_string())
        );
    }

    #[test]
    fn empty_molecule_is_rejected() {
        let builder = MoleculeBuilder::new("nothing");
        assert_eq!(
            builder.build().unwrap_err(),
            ModelError::EmptyMolecule("nothing".to_string())
        );
    }

    #[test]
    fn self_bond_and_non_finite_coordinates_are_rejected() {
        let mut builder = MoleculeBuilder::new("self");
        builder
            .add_atom("C1", Element::C, Point3::origin())
            .add_bond("C1", "C1", BondOrder::Single);
        assert_eq!(
            builder.build().unwrap_err(),
            ModelError::SelfBond("C1".to_string())
        );

        let mut builder = MoleculeBuilder::new("nan");
        builder.add_atom("C1", Element::C, Point3::new(f64::NAN, 0.0, 0.0));
        assert!(matches!(
            builder.build(),
            Err(ModelError::NonFiniteCoordinate { .. })
        ));
    }

    #[test]
    fn repeated_bond_is_stored_once() {
        let mut builder = MoleculeBuilder::new("rep");
        builder
            .add_atom("C1", Element::C, Point3::origin())
            .add_atom("C2", Element::C, Point3::new(1.5, 0.0, 0.0))
            .add_bond("C1", "C2", BondOrder::Single)
            .add_bond("C2", "C1", BondOrder::Single);
        let mol = builder.build().unwrap();
        assert_eq!(mol.bonds().len(), 1);
        assert_eq!(mol.degree(0), 1);
    }
}

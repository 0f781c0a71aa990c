use super::atom::Atom;
use super::topology::{Bond, BondOrder};
use crate::core::typing::AtomType;
use std::collections::HashMap;

/// A small molecule as a labelled graph: atoms carry element, position and
/// (eventually) a fine type; bonds carry their order.
///
/// Instances are produced by [`MoleculeBuilder`](super::builder::MoleculeBuilder),
/// which validates names and bond references, so every index stored here is in range.
#[derive(Debug, Clone, Default)]
pub struct Molecule {
    pub(crate) name: String,
    pub(crate) atoms: Vec<Atom>,
    pub(crate) bonds: Vec<Bond>,
    pub(crate) adjacency: Vec<Vec<(usize, BondOrder)>>,
    pub(crate) name_map: HashMap<String, usize>,
}

impl Molecule {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    pub fn atom(&self, index: usize) -> Option<&Atom> {
        self.atoms.get(index)
    }

    pub fn bonds(&self) -> &[Bond] {
        &self.bonds
    }

    pub fn find_atom_by_name(&self, name: &str) -> Option<usize> {
        self.name_map.get(name).copied()
    }

    /// Bonded neighbours of `index` with the connecting bond order, in bond insertion order.
    pub fn neighbors(&self, index: usize) -> &[(usize, BondOrder)] {
        self.adjacency.get(index).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn degree(&self, index: usize) -> usize {
        self.neighbors(index).len()
    }

    pub fn heavy_degree(&self, index: usize) -> usize {
        self.neighbors(index)
            .iter()
            .filter(|(n, _)| !self.atoms[*n].is_hydrogen())
            .count()
    }

    pub fn bond_order(&self, a: usize, b: usize) -> Option<BondOrder> {
        self.neighbors(a)
            .iter()
            .find(|(n, _)| *n == b)
            .map(|(_, order)| *order)
    }

    pub fn has_aromatic_bonds(&self) -> bool {
        self.bonds.iter().any(|b| b.order == BondOrder::Aromatic)
    }

    pub fn atom_type(&self, index: usize) -> Option<AtomType> {
        self.atoms.get(index).and_then(|a| a.atom_type)
    }

    /// Writes classifier output back onto the atoms.
    pub fn apply_atom_types(&mut self, types: &[AtomType]) {
        for (atom, atom_type) in self.atoms.iter_mut().zip(types) {
            atom.atom_type = Some(*atom_type);
        }
    }
}

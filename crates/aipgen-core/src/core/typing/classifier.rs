use super::atom_type::{
    AtomType, CarbonType, HydrogenType, NitrogenType, OxygenType, SulfurType,
};
use super::matcher::find_matches;
use super::template::{FunctionalGroupTemplate, aromatic_templates, general_templates};
use crate::core::models::atom::Hybridization;
use crate::core::models::element::Element;
use crate::core::models::molecule::Molecule;
use crate::core::models::topology::BondOrder;
use crate::core::utils::geometry::pyramidalization_angle;
use nalgebra::Point3;
use std::collections::HashMap;
use tracing::{debug, instrument};

/// Deviation from planarity, in degrees, above which a trigonal nitrogen is re-typed as pyramidal.
pub const PLANARITY_THRESHOLD_DEGREES: f64 = 20.0;

/// Assigns fine atom types by ordered functional-group template matching.
///
/// Templates are tried in priority order and every embedding of every template
/// is applied, but an atom keeps the first label it receives. Atoms no template
/// reaches get a coarse type from their element and bond orders.
pub struct AtomTypeClassifier {
    aromatic: Vec<FunctionalGroupTemplate>,
    general: Vec<FunctionalGroupTemplate>,
    planarity_threshold: f64,
}

impl Default for AtomTypeClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl AtomTypeClassifier {
    pub fn new() -> Self {
        Self {
            aromatic: aromatic_templates(),
            general: general_templates(),
            planarity_threshold: PLANARITY_THRESHOLD_DEGREES,
        }
    }

    pub fn with_planarity_threshold(mut self, degrees: f64) -> Self {
        self.planarity_threshold = degrees;
        self
    }

    /// Returns one fine type per atom, in atom index order.
    ///
    /// Types already present on the molecule's atoms are kept as-is.
    #[instrument(skip_all, name = "atom_typing", fields(molecule = molecule.name()))]
    pub fn classify(&self, molecule: &Molecule) -> Vec<AtomType> {
        let mut labels: HashMap<usize, AtomType> = HashMap::with_capacity(molecule.len());
        for atom in molecule.atoms() {
            if let Some(t) = atom.atom_type {
                labels.insert(atom.index, t);
            }
        }
        let preassigned = labels.len();

        let aromatic: &[FunctionalGroupTemplate] = if molecule.has_aromatic_bonds() {
            &self.aromatic
        } else {
            &[]
        };
        for template in aromatic.iter().chain(self.general.iter()) {
            for embedding in find_matches(template, molecule) {
                for (node, &atom) in template.nodes.iter().zip(&embedding) {
                    if let Some(label) = node.label {
                        labels.entry(atom).or_insert(label);
                    }
                }
            }
        }

        let mut types: Vec<AtomType> = (0..molecule.len())
            .map(|i| match labels.get(&i) {
                Some(t) => *t,
                None => {
                    let fallback = coarse_fallback(molecule, i);
                    debug!(
                        atom = %molecule.atoms()[i].name,
                        label = %fallback,
                        "No template matched; keeping coarse type"
                    );
                    fallback
                }
            })
            .collect();

        for atom in molecule.atoms() {
            if atom.atom_type.is_none()
                && types[atom.index] == AtomType::Nitrogen(NitrogenType::Trigonal)
                && self.is_pyramidal(molecule, atom.index)
            {
                debug!(atom = %atom.name, "Trigonal nitrogen is pyramidal; re-typing as amine");
                types[atom.index] = AtomType::Nitrogen(NitrogenType::Amine);
            }
        }

        debug!(
            atoms = molecule.len(),
            preassigned, "Atom typing complete"
        );
        types
    }

    fn is_pyramidal(&self, molecule: &Molecule, index: usize) -> bool {
        let neighbors = molecule.neighbors(index);
        if neighbors.len() != 3 {
            return false;
        }
        let pos = |i: usize| -> Point3<f64> { molecule.atoms()[i].position };
        let ring = [pos(neighbors[0].0), pos(neighbors[1].0), pos(neighbors[2].0)];
        pyramidalization_angle(&pos(index), &ring)
            .is_some_and(|angle| angle > self.planarity_threshold)
    }
}

/// Element- and bond-order-based type for atoms that no template labelled.
fn coarse_fallback(molecule: &Molecule, index: usize) -> AtomType {
    let atom = &molecule.atoms()[index];
    let neighbors = molecule.neighbors(index);
    let count = |order: BondOrder| neighbors.iter().filter(|(_, o)| *o == order).count();
    let aromatic =
        count(BondOrder::Aromatic) > 0 || atom.hybridization == Some(Hybridization::Aromatic);
    let doubles = count(BondOrder::Double);
    let triples = count(BondOrder::Triple);

    match atom.element {
        Element::H => {
            let parent = neighbors
                .first()
                .and_then(|(n, _)| molecule.atom(*n))
                .map(|a| a.element);
            AtomType::Hydrogen(match parent {
                Some(Element::O) => HydrogenType::OnOxygen,
                Some(Element::N) => HydrogenType::OnNitrogen,
                Some(Element::S) => HydrogenType::OnSulfur,
                Some(Element::C) => HydrogenType::OnCarbon,
                _ => HydrogenType::Other,
            })
        }
        Element::C => AtomType::Carbon(
            if triples > 0 || doubles >= 2 || atom.hybridization == Some(Hybridization::Sp) {
                CarbonType::Sp
            } else if aromatic {
                CarbonType::Aromatic
            } else if doubles > 0 || atom.hybridization == Some(Hybridization::Sp2) {
                CarbonType::Sp2
            } else {
                CarbonType::Sp3
            },
        ),
        Element::N => AtomType::Nitrogen(if aromatic {
            if neighbors.len() >= 3 {
                NitrogenType::AromaticSubstituted
            } else {
                NitrogenType::Aromatic
            }
        } else if triples > 0 {
            NitrogenType::Nitrile
        } else if doubles > 0 {
            NitrogenType::Imine
        } else if neighbors.len() >= 4 {
            NitrogenType::Ammonium
        } else if atom.hybridization == Some(Hybridization::Sp2) {
            NitrogenType::Trigonal
        } else {
            NitrogenType::Amine
        }),
        Element::O => AtomType::Oxygen(if aromatic {
            OxygenType::Aromatic
        } else if doubles > 0 {
            OxygenType::Carbonyl
        } else {
            OxygenType::Sp3
        }),
        Element::S => AtomType::Sulfur(if aromatic {
            SulfurType::Aromatic
        } else if doubles > 0 {
            SulfurType::Sp2
        } else {
            SulfurType::Sp3
        }),
        other => AtomType::coarse(other),
    }
}

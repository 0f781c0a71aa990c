use super::atom_type::{
    AtomType, CarbonType, HydrogenType, NitrogenType, OxygenType, SulfurType,
};
use crate::core::models::atom::Hybridization;
use crate::core::models::element::Element;
use crate::core::models::topology::BondOrder;

/// Attribute constraint on a template node.
#[derive(Debug, Clone, PartialEq)]
pub enum Rule<T: 'static> {
    Any,
    Exact(T),
    AnyOf(&'static [T]),
    NoneOf(&'static [T]),
}

impl<T: PartialEq + Copy> Rule<T> {
    /// Tests an attribute value. A missing value only satisfies `Any` and `NoneOf`.
    pub fn accepts(&self, value: Option<T>) -> bool {
        match (self, value) {
            (Rule::Any, _) => true,
            (Rule::Exact(expected), Some(v)) => *expected == v,
            (Rule::AnyOf(set), Some(v)) => set.contains(&v),
            (Rule::NoneOf(set), Some(v)) => !set.contains(&v),
            (Rule::NoneOf(_), None) => true,
            (Rule::Exact(_) | Rule::AnyOf(_), None) => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TemplateNode {
    pub element: Rule<Element>,
    pub degree: Rule<usize>,
    pub hybridization: Rule<Hybridization>,
    /// Label given to the molecule atom this node maps onto; `None` marks context-only nodes.
    pub label: Option<AtomType>,
}

impl TemplateNode {
    pub fn element(element: Element) -> Self {
        Self {
            element: Rule::Exact(element),
            degree: Rule::Any,
            hybridization: Rule::Any,
            label: None,
        }
    }

    pub fn any() -> Self {
        Self {
            element: Rule::Any,
            degree: Rule::Any,
            hybridization: Rule::Any,
            label: None,
        }
    }

    pub fn elements(set: &'static [Element]) -> Self {
        Self {
            element: Rule::AnyOf(set),
            ..Self::any()
        }
    }

    pub fn degree(mut self, degree: usize) -> Self {
        self.degree = Rule::Exact(degree);
        self
    }

    pub fn degree_in(mut self, set: &'static [usize]) -> Self {
        self.degree = Rule::AnyOf(set);
        self
    }

    pub fn hybridization(mut self, rule: Rule<Hybridization>) -> Self {
        self.hybridization = rule;
        self
    }

    pub fn label(mut self, atom_type: AtomType) -> Self {
        self.label = Some(atom_type);
        self
    }
}

/// A functional-group fragment. Node 0 is the root and the fragment must be connected.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionalGroupTemplate {
    pub name: &'static str,
    pub nodes: Vec<TemplateNode>,
    pub edges: Vec<(usize, usize, BondOrder)>,
}

impl FunctionalGroupTemplate {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            nodes: Vec::new(),
            edges: Vec::new(),
        }
    }

    pub fn node(mut self, node: TemplateNode) -> Self {
        self.nodes.push(node);
        self
    }

    pub fn bond(mut self, a: usize, b: usize, order: BondOrder) -> Self {
        self.edges.push((a, b, order));
        self
    }
}

use BondOrder::{Aromatic, Double, Single, Triple};
use Element::{C, H, N, O, P, S};
use TemplateNode as Node;

/// Templates that run first when the molecule contains aromatic bonds.
pub fn aromatic_templates() -> Vec<FunctionalGroupTemplate> {
    vec![
        FunctionalGroupTemplate::new("aromatic trisubstituted nitrogen")
            .node(
                Node::element(N)
                    .degree(3)
                    .label(AtomType::Nitrogen(NitrogenType::AromaticSubstituted)),
            )
            .node(Node::any())
            .node(Node::any())
            .bond(0, 1, Aromatic)
            .bond(0, 2, Aromatic),
        FunctionalGroupTemplate::new("pyridine-type nitrogen")
            .node(
                Node::element(N)
                    .degree(2)
                    .label(AtomType::Nitrogen(NitrogenType::Aromatic)),
            )
            .node(Node::any())
            .node(Node::any())
            .bond(0, 1, Aromatic)
            .bond(0, 2, Aromatic),
        FunctionalGroupTemplate::new("furan-type oxygen")
            .node(Node::element(O).label(AtomType::Oxygen(OxygenType::Aromatic)))
            .node(Node::any())
            .bond(0, 1, Aromatic),
        FunctionalGroupTemplate::new("thiophene-type sulfur")
            .node(Node::element(S).label(AtomType::Sulfur(SulfurType::Aromatic)))
            .node(Node::any())
            .bond(0, 1, Aromatic),
        FunctionalGroupTemplate::new("aromatic carbon")
            .node(Node::element(C).label(AtomType::Carbon(CarbonType::Aromatic)))
            .node(Node::any())
            .bond(0, 1, Aromatic),
    ]
}

/// General templates, most specific first.
pub fn general_templates() -> Vec<FunctionalGroupTemplate> {
    let carbonyl_c = AtomType::Carbon(CarbonType::Carbonyl);
    let carbonyl_o = AtomType::Oxygen(OxygenType::Carbonyl);
    vec![
        // Nitrogen-oxygen groups.
        FunctionalGroupTemplate::new("nitro")
            .node(Node::element(N).degree(3).label(AtomType::Nitrogen(NitrogenType::Nitro)))
            .node(Node::element(O).degree(1).label(AtomType::Oxygen(OxygenType::Nitro)))
            .node(Node::element(O).degree(1).label(AtomType::Oxygen(OxygenType::Nitro)))
            .bond(0, 1, Double)
            .bond(0, 2, Single),
        FunctionalGroupTemplate::new("N-oxide oxygen")
            .node(Node::element(O).degree(1).label(AtomType::Oxygen(OxygenType::NOxide)))
            .node(Node::element(N).degree_in(&[3, 4]))
            .bond(0, 1, Single),
        // Carbonyl family.
        FunctionalGroupTemplate::new("carboxylate")
            .node(Node::element(C).degree(3).label(carbonyl_c))
            .node(Node::element(O).degree(1).label(AtomType::Oxygen(OxygenType::Carboxylate)))
            .node(Node::element(O).degree(1).label(AtomType::Oxygen(OxygenType::Carboxylate)))
            .bond(0, 1, Double)
            .bond(0, 2, Single),
        FunctionalGroupTemplate::new("acid or ester")
            .node(Node::element(C).degree(3).label(carbonyl_c))
            .node(Node::element(O).degree(1).label(carbonyl_o))
            .node(Node::element(O).degree(2).label(AtomType::Oxygen(OxygenType::Sp3)))
            .bond(0, 1, Double)
            .bond(0, 2, Single),
        FunctionalGroupTemplate::new("amide nitrogen")
            .node(Node::element(N).degree(3).label(AtomType::Nitrogen(NitrogenType::Amide)))
            .node(Node::element(C).degree(3).label(carbonyl_c))
            .node(Node::element(O).degree(1).label(carbonyl_o))
            .bond(0, 1, Single)
            .bond(1, 2, Double),
        FunctionalGroupTemplate::new("thioamide nitrogen")
            .node(Node::element(N).degree(3).label(AtomType::Nitrogen(NitrogenType::Amide)))
            .node(Node::element(C).degree(3).label(AtomType::Carbon(CarbonType::Sp2)))
            .node(Node::element(S).degree(1).label(AtomType::Sulfur(SulfurType::Sp2)))
            .bond(0, 1, Single)
            .bond(1, 2, Double),
        FunctionalGroupTemplate::new("sulfonamide nitrogen")
            .node(Node::element(N).degree(3).label(AtomType::Nitrogen(NitrogenType::Amide)))
            .node(Node::element(S).degree(4).label(AtomType::Sulfur(SulfurType::Sulfone)))
            .node(Node::element(O).degree(1).label(AtomType::Oxygen(OxygenType::Sulfoxide)))
            .node(Node::element(O).degree(1).label(AtomType::Oxygen(OxygenType::Sulfoxide)))
            .bond(0, 1, Single)
            .bond(1, 2, Double)
            .bond(1, 3, Double),
        // Sulfur and phosphorus oxides.
        FunctionalGroupTemplate::new("sulfone")
            .node(Node::element(S).degree(4).label(AtomType::Sulfur(SulfurType::Sulfone)))
            .node(Node::element(O).degree(1).label(AtomType::Oxygen(OxygenType::Sulfoxide)))
            .node(Node::element(O).degree(1).label(AtomType::Oxygen(OxygenType::Sulfoxide)))
            .bond(0, 1, Double)
            .bond(0, 2, Double),
        FunctionalGroupTemplate::new("sulfoxide")
            .node(Node::element(S).degree(3).label(AtomType::Sulfur(SulfurType::Sulfoxide)))
            .node(Node::element(O).degree(1).label(AtomType::Oxygen(OxygenType::Sulfoxide)))
            .bond(0, 1, Double),
        FunctionalGroupTemplate::new("phosphine sulfide")
            .node(Node::element(P).label(AtomType::Phosphorus))
            .node(Node::element(S).degree(1).label(AtomType::Sulfur(SulfurType::PhosphineSulfide)))
            .bond(0, 1, Double),
        FunctionalGroupTemplate::new("phosphoryl")
            .node(Node::element(P).label(AtomType::Phosphorus))
            .node(Node::element(O).degree(1).label(AtomType::Oxygen(OxygenType::PhosphineOxide)))
            .bond(0, 1, Double),
        FunctionalGroupTemplate::new("ketone or aldehyde")
            .node(Node::element(C).degree(3).label(carbonyl_c))
            .node(Node::element(O).degree(1).label(carbonyl_o))
            .bond(0, 1, Double),
        FunctionalGroupTemplate::new("thione")
            .node(Node::element(C).label(AtomType::Carbon(CarbonType::Sp2)))
            .node(Node::element(S).degree(1).label(AtomType::Sulfur(SulfurType::Sp2)))
            .bond(0, 1, Double),
        // Conjugated nitrogens.
        FunctionalGroupTemplate::new("amidine")
            .node(Node::element(N).degree(3).label(AtomType::Nitrogen(NitrogenType::Trigonal)))
            .node(Node::element(C).label(AtomType::Carbon(CarbonType::Sp2)))
            .node(Node::element(N).label(AtomType::Nitrogen(NitrogenType::Imine)))
            .bond(0, 1, Single)
            .bond(1, 2, Double),
        FunctionalGroupTemplate::new("aniline nitrogen")
            .node(Node::element(N).degree(3).label(AtomType::Nitrogen(NitrogenType::Trigonal)))
            .node(Node::element(C))
            .node(Node::any())
            .bond(0, 1, Single)
            .bond(1, 2, Aromatic),
        FunctionalGroupTemplate::new("enamine nitrogen")
            .node(Node::element(N).degree(3).label(AtomType::Nitrogen(NitrogenType::Trigonal)))
            .node(Node::element(C).label(AtomType::Carbon(CarbonType::Sp2)))
            .node(Node::element(C).label(AtomType::Carbon(CarbonType::Sp2)))
            .bond(0, 1, Single)
            .bond(1, 2, Double),
        FunctionalGroupTemplate::new("nitrile")
            .node(Node::element(N).degree(1).label(AtomType::Nitrogen(NitrogenType::Nitrile)))
            .node(Node::element(C).label(AtomType::Carbon(CarbonType::Sp)))
            .bond(0, 1, Triple),
        FunctionalGroupTemplate::new("imine")
            .node(Node::element(N).degree_in(&[1, 2]).label(AtomType::Nitrogen(NitrogenType::Imine)))
            .node(Node::elements(&[C, N]))
            .bond(0, 1, Double),
        FunctionalGroupTemplate::new("ammonium")
            .node(Node::element(N).degree(4).label(AtomType::Nitrogen(NitrogenType::Ammonium))),
        FunctionalGroupTemplate::new("amine")
            .node(
                Node::element(N)
                    .degree_in(&[1, 2, 3])
                    .hybridization(Rule::NoneOf(&[Hybridization::Sp2, Hybridization::Aromatic]))
                    .label(AtomType::Nitrogen(NitrogenType::Amine)),
            ),
        // Saturated oxygen and sulfur.
        FunctionalGroupTemplate::new("hydroxyl or ether")
            .node(Node::element(O).degree(2).label(AtomType::Oxygen(OxygenType::Sp3)))
            .node(Node::any())
            .bond(0, 1, Single),
        FunctionalGroupTemplate::new("thiol or thioether")
            .node(Node::element(S).degree(2).label(AtomType::Sulfur(SulfurType::Sp3)))
            .node(Node::any())
            .bond(0, 1, Single),
        // Hydrogens by parent element.
        FunctionalGroupTemplate::new("hydroxyl hydrogen")
            .node(Node::element(H).label(AtomType::Hydrogen(HydrogenType::OnOxygen)))
            .node(Node::element(O))
            .bond(0, 1, Single),
        FunctionalGroupTemplate::new("amine hydrogen")
            .node(Node::element(H).label(AtomType::Hydrogen(HydrogenType::OnNitrogen)))
            .node(Node::element(N))
            .bond(0, 1, Single),
        FunctionalGroupTemplate::new("thiol hydrogen")
            .node(Node::element(H).label(AtomType::Hydrogen(HydrogenType::OnSulfur)))
            .node(Node::element(S))
            .bond(0, 1, Single),
        FunctionalGroupTemplate::new("aliphatic hydrogen")
            .node(Node::element(H).label(AtomType::Hydrogen(HydrogenType::OnCarbon)))
            .node(Node::element(C))
            .bond(0, 1, Single),
        // Remaining carbons.
        FunctionalGroupTemplate::new("alkyne")
            .node(Node::element(C).label(AtomType::Carbon(CarbonType::Sp)))
            .node(Node::element(C).label(AtomType::Carbon(CarbonType::Sp)))
            .bond(0, 1, Triple),
        FunctionalGroupTemplate::new("cumulated carbon")
            .node(Node::element(C).degree(2).label(AtomType::Carbon(CarbonType::Sp)))
            .node(Node::any())
            .node(Node::any())
            .bond(0, 1, Double)
            .bond(0, 2, Double),
        FunctionalGroupTemplate::new("alkene")
            .node(Node::element(C).label(AtomType::Carbon(CarbonType::Sp2)))
            .node(Node::element(C).label(AtomType::Carbon(CarbonType::Sp2)))
            .bond(0, 1, Double),
        FunctionalGroupTemplate::new("tetrahedral carbon")
            .node(Node::element(C).degree(4).label(AtomType::Carbon(CarbonType::Sp3))),
        // Single-atom element types.
        FunctionalGroupTemplate::new("fluorine")
            .node(Node::element(Element::F).label(AtomType::Halogen(Element::F))),
        FunctionalGroupTemplate::new("chlorine")
            .node(Node::element(Element::Cl).label(AtomType::Halogen(Element::Cl))),
        FunctionalGroupTemplate::new("bromine")
            .node(Node::element(Element::Br).label(AtomType::Halogen(Element::Br))),
        FunctionalGroupTemplate::new("iodine")
            .node(Node::element(Element::I).label(AtomType::Halogen(Element::I))),
        FunctionalGroupTemplate::new("phosphorus")
            .node(Node::element(P).label(AtomType::Phosphorus)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn is_connected(t: &FunctionalGroupTemplate) -> bool {
        let mut seen = HashSet::from([0usize]);
        let mut stack = vec![0usize];
        while let Some(n) = stack.pop() {
            for &(a, b, _) in &t.edges {
                let other = if a == n {
                    b
                } else if b == n {
                    a
                } else {
                    continue;
                };
                if seen.insert(other) {
                    stack.push(other);
                }
            }
        }
        seen.len() == t.nodes.len()
    }

    #[test]
    fn all_templates_are_small_connected_and_labelled() {
        for t in aromatic_templates().iter().chain(general_templates().iter()) {
            assert!(!t.nodes.is_empty() && t.nodes.len() <= 6, "{}", t.name);
            assert!(is_connected(t), "template '{}' is disconnected", t.name);
            assert!(
                t.nodes.iter().any(|n| n.label.is_some()),
                "template '{}' assigns nothing",
                t.name
            );
            for &(a, b, _) in &t.edges {
                assert!(a < t.nodes.len() && b < t.nodes.len() && a != b, "{}", t.name);
            }
        }
    }

    #[test]
    fn amide_precedes_generic_amine() {
        let names: Vec<_> = general_templates().iter().map(|t| t.name).collect();
        let amide = names.iter().position(|n| *n == "amide nitrogen").unwrap();
        let amine = names.iter().position(|n| *n == "amine").unwrap();
        assert!(amide < amine);
    }

    #[test]
    fn rules_treat_missing_values_conservatively() {
        let exact = Rule::Exact(Hybridization::Sp2);
        let none_of: Rule<Hybridization> = Rule::NoneOf(&[Hybridization::Sp2]);
        assert!(!exact.accepts(None));
        assert!(exact.accepts(Some(Hybridization::Sp2)));
        assert!(none_of.accepts(None));
        assert!(!none_of.accepts(Some(Hybridization::Sp2)));
        assert!(Rule::<usize>::Any.accepts(None));
        assert!(Rule::AnyOf(&[1usize, 2]).accepts(Some(2)));
    }
}

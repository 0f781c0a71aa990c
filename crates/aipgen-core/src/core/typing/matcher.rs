use super::template::{FunctionalGroupTemplate, TemplateNode};
use crate::core::models::molecule::Molecule;

/// Visiting order for template nodes: each node after the root comes with an
/// already-visited neighbour whose image seeds its candidate set.
fn search_order(template: &FunctionalGroupTemplate) -> Vec<(usize, Option<usize>)> {
    let n = template.nodes.len();
    let mut order = Vec::with_capacity(n);
    let mut visited = vec![false; n];
    if n == 0 {
        return order;
    }
    visited[0] = true;
    order.push((0, None));
    let mut head = 0;
    while head < order.len() {
        let (current, _) = order[head];
        head += 1;
        for &(a, b, _) in &template.edges {
            let next = if a == current {
                b
            } else if b == current {
                a
            } else {
                continue;
            };
            if !visited[next] {
                visited[next] = true;
                order.push((next, Some(current)));
            }
        }
    }
    order
}

fn node_accepts(node: &TemplateNode, molecule: &Molecule, atom: usize) -> bool {
    let Some(a) = molecule.atom(atom) else {
        return false;
    };
    node.element.accepts(Some(a.element))
        && node.degree.accepts(Some(molecule.degree(atom)))
        && node.hybridization.accepts(a.hybridization)
}

struct Search<'a> {
    template: &'a FunctionalGroupTemplate,
    molecule: &'a Molecule,
    order: Vec<(usize, Option<usize>)>,
    mapping: Vec<Option<usize>>,
    used: Vec<bool>,
    matches: Vec<Vec<usize>>,
}

impl Search<'_> {
    /// Every template edge touching `node` whose other end is already mapped
    /// must exist in the molecule with the same bond order.
    fn edges_consistent(&self, node: usize, atom: usize) -> bool {
        self.template.edges.iter().all(|&(a, b, order)| {
            let other = if a == node {
                b
            } else if b == node {
                a
            } else {
                return true;
            };
            match self.mapping[other] {
                Some(image) => self.molecule.bond_order(atom, image) == Some(order),
                None => true,
            }
        })
    }

    fn extend(&mut self, depth: usize) {
        if depth == self.order.len() {
            let complete: Vec<usize> = self.mapping.iter().flatten().copied().collect();
            self.matches.push(complete);
            return;
        }
        let (node, parent) = self.order[depth];
        let candidates: Vec<usize> = match parent.and_then(|p| self.mapping[p]) {
            Some(parent_atom) => self
                .molecule
                .neighbors(parent_atom)
                .iter()
                .map(|(n, _)| *n)
                .collect(),
            None => (0..self.molecule.len()).collect(),
        };
        for atom in candidates {
            if self.used[atom]
                || !node_accepts(&self.template.nodes[node], self.molecule, atom)
                || !self.edges_consistent(node, atom)
            {
                continue;
            }
            self.mapping[node] = Some(atom);
            self.used[atom] = true;
            self.extend(depth + 1);
            self.used[atom] = false;
            self.mapping[node] = None;
        }
    }
}

/// Enumerates every embedding of `template` into `molecule`.
///
/// Each match lists the molecule atom for every template node, in template node
/// order. Symmetric fragments produce one match per automorphism.
pub fn find_matches(template: &FunctionalGroupTemplate, molecule: &Molecule) -> Vec<Vec<usize>> {
    if template.nodes.is_empty() || template.nodes.len() > molecule.len() {
        return Vec::new();
    }
    let order = search_order(template);
    if order.len() != template.nodes.len() {
        return Vec::new();
    }
    let mut search = Search {
        template,
        molecule,
        order,
        mapping: vec![None; template.nodes.len()],
        used: vec![false; molecule.len()],
        matches: Vec::new(),
    };
    search.extend(0);
    search.matches
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::builder::MoleculeBuilder;
    use crate::core::models::element::Element;
    use crate::core::models::topology::BondOrder;
    use nalgebra::Point3;

    fn acetone_fragment() -> Molecule {
        let mut b = MoleculeBuilder::new("acetone");
        b.add_atom("C1", Element::C, Point3::new(0.0, 0.0, 0.0))
            .add_atom("C2", Element::C, Point3::new(1.5, 0.0, 0.0))
            .add_atom("C3", Element::C, Point3::new(2.3, 1.3, 0.0))
            .add_atom("O1", Element::O, Point3::new(2.1, -1.1, 0.0))
            .add_bond("C1", "C2", BondOrder::Single)
            .add_bond("C2", "C3", BondOrder::Single)
            .add_bond("C2", "O1", BondOrder::Double);
        b.build().unwrap()
    }

    #[test]
    fn finds_single_carbonyl_match() {
        let template = FunctionalGroupTemplate::new("carbonyl")
            .node(TemplateNode::element(Element::C))
            .node(TemplateNode::element(Element::O))
            .bond(0, 1, BondOrder::Double);
        let matches = find_matches(&template, &acetone_fragment());
        assert_eq!(matches, vec![vec![1, 3]]);
    }

    #[test]
    fn enumerates_all_symmetric_embeddings() {
        let template = FunctionalGroupTemplate::new("c-c-c")
            .node(TemplateNode::element(Element::C))
            .node(TemplateNode::element(Element::C))
            .node(TemplateNode::element(Element::C))
            .bond(0, 1, BondOrder::Single)
            .bond(1, 2, BondOrder::Single);
        let mut matches = find_matches(&template, &acetone_fragment());
        matches.sort();
        assert_eq!(matches, vec![vec![0, 1, 2], vec![2, 1, 0]]);
    }

    #[test]
    fn bond_order_mismatch_prevents_match() {
        let template = FunctionalGroupTemplate::new("c-o single")
            .node(TemplateNode::element(Element::C))
            .node(TemplateNode::element(Element::O))
            .bond(0, 1, BondOrder::Single);
        assert!(find_matches(&template, &acetone_fragment()).is_empty());
    }

    #[test]
    fn degree_rule_filters_candidates() {
        let template =
            FunctionalGroupTemplate::new("quaternary").node(TemplateNode::element(Element::C).degree(3));
        assert_eq!(find_matches(&template, &acetone_fragment()), vec![vec![1]]);
    }
}

use super::sample::Surface;
use crate::core::models::atom::Atom;
use serde::Deserialize;

/// Distance used to decide which atom owns a surface sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OwnershipMetric {
    /// Distance divided by the atom's van der Waals radius.
    #[default]
    VdwScaled,
    /// Distance minus the atom's van der Waals radius.
    VdwOffset,
    /// Plain Euclidean distance.
    Euclidean,
}

impl OwnershipMetric {
    pub fn weighted_distance(self, distance: f64, vdw_radius: f64) -> f64 {
        match self {
            OwnershipMetric::VdwScaled => distance / vdw_radius,
            OwnershipMetric::VdwOffset => distance - vdw_radius,
            OwnershipMetric::Euclidean => distance,
        }
    }
}

/// Total, disjoint assignment of every sample of one surface to an atom.
#[derive(Debug, Clone, PartialEq)]
pub struct Partition {
    owner: Vec<usize>,
    members: Vec<Vec<usize>>,
}

impl Partition {
    /// Assigns each sample to the atom minimizing the weighted distance.
    /// Ties go to the lowest atom index.
    pub fn compute(surface: &Surface, atoms: &[Atom], metric: OwnershipMetric) -> Self {
        let mut owner = Vec::with_capacity(surface.len());
        let mut members = vec![Vec::new(); atoms.len()];

        for (sample_index, sample) in surface.samples().iter().enumerate() {
            let mut best: Option<(usize, f64)> = None;
            for (atom_index, atom) in atoms.iter().enumerate() {
                let d = (sample.position - atom.position).norm();
                let w = metric.weighted_distance(d, atom.vdw_radius);
                if best.is_none_or(|(_, bw)| w < bw) {
                    best = Some((atom_index, w));
                }
            }
            if let Some((atom_index, _)) = best {
                owner.push(atom_index);
                members[atom_index].push(sample_index);
            }
        }

        Self { owner, members }
    }

    pub fn owner_of(&self, sample_index: usize) -> Option<usize> {
        self.owner.get(sample_index).copied()
    }

    /// Sample indices owned by `atom_index`, ascending.
    pub fn owned(&self, atom_index: usize) -> &[usize] {
        self.members
            .get(atom_index)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn owned_count(&self, atom_index: usize) -> usize {
        self.owned(atom_index).len()
    }

    pub fn sample_count(&self) -> usize {
        self.owner.len()
    }
}

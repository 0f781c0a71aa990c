use super::footprint::{AipFootprintEngine, Candidate, PolarPass, Site};
use crate::core::calibration::CalibrationMode;
use crate::core::models::aip::AipCategory;
use crate::core::models::element::Element;
use crate::core::typing::LonePairs;
use crate::core::utils::spatial::SpatialIndex;
use nalgebra::Point3;
use tracing::debug;

impl AipFootprintEngine<'_> {
    /// Places lone-pair AIPs for one atom. Returns false, leaving the ledger
    /// untouched, when no complete candidate set could be calibrated.
    pub(super) fn polar_search(&mut self, site: Site<'_>, pass: PolarPass) -> bool {
        let subset = self.search_subset(site.index, pass.isosurface, pass.filtered);
        let pool = self.candidates(pass.isosurface, &subset);
        if pool.is_empty() {
            return false;
        }

        let capacity = pass
            .lone_pairs
            .count()
            .saturating_sub(self.ledger.polar_count_for(site.index));
        let found = match pass.lone_pairs {
            LonePairs::Three => self.three_lone_pairs(site, &pool),
            _ => Some(self.local_minima(&pool, capacity)),
        };
        let Some(found) = found.filter(|c| !c.is_empty()) else {
            debug!(atom = %site.atom.name, surface = %pass.isosurface, "No lone-pair candidates.");
            return false;
        };

        let mode = if pass.outer {
            CalibrationMode::OuterPolar
        } else {
            CalibrationMode::Polar
        };
        let values: Option<Vec<f64>> = found
            .iter()
            .map(|c| self.model.calibrate(site.atom_type, c.potential, mode, false))
            .collect();
        let Some(values) = values else {
            debug!(atom = %site.atom.name, "Lone-pair candidate has no calibrated value.");
            return false;
        };

        let category = if pass.outer {
            AipCategory::OuterPolar
        } else {
            AipCategory::Polar
        };
        let radius = self.exclusion_radius(site, pass.outer);
        for (candidate, value) in found.into_iter().zip(values) {
            self.push_record(site, pass.isosurface, candidate, category, value, 1.0);
            let consumed = self.tight_index.within(&candidate.position, radius);
            self.ledger.exclude(consumed);
        }
        true
    }

    fn exclusion_radius(&self, site: Site<'_>, outer: bool) -> f64 {
        let lp = &self.config.lone_pair;
        let base = if outer {
            lp.outer_exclusion_radius
        } else {
            lp.exclusion_radius
        };
        if site.atom.element == Element::S {
            base.max(lp.sulfur_exclusion_radius)
        } else {
            base
        }
    }

    /// Deepest minimum plus its 120° and 240° images about the substituent axis.
    fn three_lone_pairs(&self, site: Site<'_>, pool: &[Candidate]) -> Option<Vec<Candidate>> {
        let start = *pool
            .iter()
            .min_by(|a, b| a.potential.total_cmp(&b.potential))?;
        if start.potential >= 0.0 {
            return None;
        }
        let axis = self.bond_axis(site)?;
        let mut found = vec![start];
        for companion in self.ring(site, pool, start, &axis, &[120.0, 240.0]) {
            found.push(companion?);
        }
        Some(found)
    }

    /// Negative samples with no lower sample within the local-minimum radius,
    /// deepest first, at most `capacity` of them.
    fn local_minima(&self, pool: &[Candidate], capacity: usize) -> Vec<Candidate> {
        let positions: Vec<Point3<f64>> = pool.iter().map(|c| c.position).collect();
        let index = SpatialIndex::new(&positions);
        let radius = self.config.lone_pair.local_minimum_radius;

        let mut minima: Vec<Candidate> = pool
            .iter()
            .filter(|c| c.potential < 0.0)
            .filter(|c| {
                index
                    .within(&c.position, radius)
                    .into_iter()
                    .all(|j| pool[j].potential >= c.potential)
            })
            .copied()
            .collect();
        minima.sort_by(|a, b| {
            a.potential
                .total_cmp(&b.potential)
                .then(a.sample_index.cmp(&b.sample_index))
        });
        minima.truncate(capacity);
        minima
    }
}

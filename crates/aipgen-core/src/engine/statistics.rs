use super::footprint::Footprint;
use crate::core::calibration::ValueModel;
use crate::core::surface::Surface;
use crate::core::typing::AtomType;
use serde::Serialize;
use tracing::instrument;

/// Re-scored values at or above this count as a polar positive area.
pub const ALPHA_POLAR_CUTOFF: f64 = 1.5;
/// Re-scored values at or below this count as a polar negative area.
pub const BETA_POLAR_CUTOFF: f64 = -2.5;

/// Whole-molecule area statistics of the tight surface.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct SurfaceStatistics {
    pub total_area: f64,
    pub positive_area: f64,
    pub negative_area: f64,
    pub positive_polar_area: f64,
    pub positive_nonpolar_area: f64,
    pub negative_polar_area: f64,
    pub negative_nonpolar_area: f64,
    /// Area owned by atoms that emitted at least one AIP.
    pub covered_area: f64,
    pub point_count: usize,
    pub min_potential: f64,
    pub max_potential: f64,
    pub volume: f64,
}

impl SurfaceStatistics {
    #[instrument(skip_all, name = "surface_statistics")]
    pub fn compute(
        tight: &Surface,
        footprint: &Footprint,
        types: &[AtomType],
        model: &ValueModel,
    ) -> Self {
        let n = tight.len();
        let area = tight.area();
        let area_per_point = tight.area_per_point();
        let (min_potential, max_potential) = tight.potential_range();

        let positives = tight.samples().iter().filter(|s| s.potential > 0.0).count();
        let negatives = tight.samples().iter().filter(|s| s.potential < 0.0).count();

        let mut stats = Self {
            total_area: area,
            positive_area: area * positives as f64 / n as f64,
            negative_area: area * negatives as f64 / n as f64,
            point_count: n,
            min_potential,
            max_potential,
            volume: tight.volume(),
            ..Self::default()
        };

        let partition = &footprint.partitions.tight;
        for (atom_index, atom_type) in types.iter().enumerate() {
            let owned = partition.owned(atom_index);
            if owned.is_empty() {
                continue;
            }
            let aips = footprint.count_for(atom_index);
            if aips > 0 {
                stats.covered_area += owned.len() as f64 * area_per_point;
            }
            let weight = aips as f64 / owned.len() as f64;
            let share = area_per_point * weight;

            for sample in owned.iter().filter_map(|&i| tight.sample(i)) {
                let v = sample.potential;
                if v > 0.0 {
                    match model.all_atoms_alpha(*atom_type, v) {
                        Some(alpha) if alpha >= ALPHA_POLAR_CUTOFF => {
                            stats.positive_polar_area += share
                        }
                        Some(_) => stats.positive_nonpolar_area += share,
                        None => {}
                    }
                } else if v < 0.0 {
                    match model.all_atoms_beta(*atom_type, v) {
                        Some(beta) if beta <= BETA_POLAR_CUTOFF => {
                            stats.negative_polar_area += share
                        }
                        Some(_) => stats.negative_nonpolar_area += share,
                        None => {}
                    }
                }
            }
        }
        stats
    }

    pub fn attributes(&self) -> Vec<(&'static str, String)> {
        vec![
            ("total_area", format!("{:.4}", self.total_area)),
            ("positive_area", format!("{:.4}", self.positive_area)),
            ("negative_area", format!("{:.4}", self.negative_area)),
            ("positive_polar_area", format!("{:.4}", self.positive_polar_area)),
            ("positive_nonpolar_area", format!("{:.4}", self.positive_nonpolar_area)),
            ("negative_polar_area", format!("{:.4}", self.negative_polar_area)),
            ("negative_nonpolar_area", format!("{:.4}", self.negative_nonpolar_area)),
            ("covered_area", format!("{:.4}", self.covered_area)),
            ("point_count", self.point_count.to_string()),
            ("min_potential", format!("{:.6}", self.min_potential)),
            ("max_potential", format!("{:.6}", self.max_potential)),
            ("volume", format!("{:.4}", self.volume)),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::aip::{AipCategory, AipRecord};
    use crate::core::models::atom::Atom;
    use crate::core::models::element::Element;
    use crate::core::surface::{Isosurface, OwnershipMetric, Partition, SurfaceSample, SurfaceSet};
    use crate::engine::footprint::SurfacePartitions;
    use nalgebra::Point3;

    /// Unit cube corners around two atoms on the x axis; left corners are
    /// strongly positive, right corners weakly negative.
    fn fixture() -> (Surface, Footprint, Vec<AtomType>) {
        let mut samples = Vec::new();
        for x in [0.0, 1.0] {
            for y in [0.0, 1.0] {
                for z in [0.0, 1.0] {
                    let v = if x == 0.0 { 0.1 } else { -0.01 };
                    samples.push(SurfaceSample::new(Point3::new(x, y, z), v));
                }
            }
        }
        let tight = Surface::new(Isosurface::Tight, samples).unwrap();
        let atoms = vec![
            Atom::new(0, "H1", Element::H, Point3::new(-0.5, 0.5, 0.5)),
            Atom::new(1, "C1", Element::C, Point3::new(1.5, 0.5, 0.5)),
        ];
        let partition = Partition::compute(&tight, &atoms, OwnershipMetric::Euclidean);
        let set = SurfaceSet::new(tight.clone(), tight.clone(), tight.clone());
        let partitions = SurfacePartitions {
            tight: partition.clone(),
            middle: Partition::compute(&set.middle, &atoms, OwnershipMetric::Euclidean),
            loose: partition,
        };
        let record = AipRecord {
            value: 2.7,
            raw_value: 0.1,
            position: Point3::new(0.0, 0.0, 0.0),
            sample_index: 0,
            category: AipCategory::Hydrogen,
            atom_index: 0,
            atom_type: "H.O".parse().unwrap(),
            atom_name: "H1".to_string(),
            area_fraction: 1.0,
            isosurface: Isosurface::Middle,
            dual: None,
        };
        let footprint = Footprint {
            records: vec![record],
            aip_counts: vec![1, 0],
            partitions,
        };
        let types = vec!["H.O".parse().unwrap(), "C.3".parse().unwrap()];
        (tight, footprint, types)
    }

    #[test]
    fn areas_split_by_sign_and_polarity() {
        let (tight, footprint, types) = fixture();
        let stats = SurfaceStatistics::compute(&tight, &footprint, &types, &ValueModel::default());
        assert!((stats.total_area - 6.0).abs() < 1e-9);
        assert!((stats.positive_area - 3.0).abs() < 1e-9);
        assert!((stats.negative_area - 3.0).abs() < 1e-9);
        // H1 owns four points and emitted one AIP: each point counts 0.75 * 1/4.
        // alpha(H.O, 0.1) = 0.30 + 27.0 * 0.1 = 3.0 >= 1.5.
        assert!((stats.positive_polar_area - 0.75).abs() < 1e-9);
        assert_eq!(stats.positive_nonpolar_area, 0.0);
        // C1 emitted nothing, so its negative points carry no weight.
        assert_eq!(stats.negative_polar_area, 0.0);
        assert_eq!(stats.negative_nonpolar_area, 0.0);
        assert!((stats.covered_area - 3.0).abs() < 1e-9);
        assert_eq!(stats.point_count, 8);
        assert_eq!(stats.min_potential, -0.01);
        assert_eq!(stats.max_potential, 0.1);
        assert!((stats.volume - 1.0).abs() < 1e-9);
    }

    #[test]
    fn attributes_cover_every_statistic() {
        let (tight, footprint, types) = fixture();
        let stats = SurfaceStatistics::compute(&tight, &footprint, &types, &ValueModel::default());
        let attrs = stats.attributes();
        assert_eq!(attrs.len(), 12);
        assert!(attrs.contains(&("point_count", "8".to_string())));
        assert!(attrs.contains(&("total_area", "6.0000".to_string())));
    }
}

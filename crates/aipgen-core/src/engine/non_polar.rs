use super::clustering::{ClusterSettings, Polarity, cluster_extremum, medoid, split};
use super::footprint::{AipFootprintEngine, Candidate, PolarPass, Site};
use crate::core::calibration::CalibrationMode;
use crate::core::models::aip::{AipCategory, DualCompanion};
use crate::core::models::element::Element;
use crate::core::surface::Isosurface;
use crate::core::typing::LonePairs;
use crate::core::utils::geometry::{axial_offset, perpendicular_distance};
use crate::core::utils::spatial::SpatialIndex;
use nalgebra::{Point3, Vector3};
use std::f64::consts::PI;
use tracing::debug;

const AXIS_TIE_EPS: f64 = 1e-6;
const RING_ANGLES: [f64; 3] = [90.0, 180.0, 270.0];

fn extreme(pool: &[Candidate], polarity: Polarity) -> Option<Candidate> {
    let it = pool.iter().copied();
    match polarity {
        Polarity::Positive => it.max_by(|a, b| a.potential.total_cmp(&b.potential)),
        Polarity::Negative => it.min_by(|a, b| a.potential.total_cmp(&b.potential)),
    }
}

impl AipFootprintEngine<'_> {
    pub(super) fn non_polar_search(&mut self, site: Site<'_>) {
        let atom_type = site.atom_type;
        let element = atom_type.element();
        let polar = self.ledger.polar_count_for(site.index);

        if atom_type.is_hydrogen() {
            self.axial_tip_site(site, Isosurface::Middle, Polarity::Positive);
        } else if element == Element::F {
            self.axial_tip_site(site, Isosurface::Loose, Polarity::Negative);
        } else if atom_type.is_linear() {
            self.linear_sites(site);
        } else if matches!(element, Element::Cl | Element::Br | Element::I) {
            self.halogen_sites(site);
        } else if atom_type.is_sulfoxide_sulfur() {
            self.single_site(site, true);
        } else if atom_type.is_divalent_sulfur() {
            self.divalent_sulfur_sites(site);
        } else if atom_type.is_pi_system() && polar > 0 && atom_type.lone_pairs() != LonePairs::One {
            self.clustered_sites(site, true);
        } else if atom_type.is_pi_system() && polar == 0 {
            self.clustered_sites(site, false);
        } else if polar > 0 {
            debug!(atom = %site.atom.name, "Already satisfied by its lone pairs.");
        } else {
            self.single_site(site, false);
        }
    }

    /// Sample on the far side of the bond axis closest to it; hydrogens and fluorines.
    fn axial_tip(
        &self,
        site: Site<'_>,
        pool: &[Candidate],
        polarity: Polarity,
    ) -> Option<Candidate> {
        let Some(axis) = self.bond_axis(site) else {
            return extreme(pool, polarity);
        };
        let origin = site.atom.position;
        let better = |a: &Candidate, b: &Candidate| match polarity {
            Polarity::Positive => a.potential > b.potential,
            Polarity::Negative => a.potential < b.potential,
        };

        let mut best: Option<(Candidate, f64)> = None;
        for c in pool
            .iter()
            .filter(|c| axial_offset(&c.position, &origin, &axis) > 0.0)
        {
            let d = perpendicular_distance(&c.position, &origin, &axis);
            best = match best {
                None => Some((*c, d)),
                Some((_, bd)) if d < bd - AXIS_TIE_EPS => Some((*c, d)),
                Some((b, bd)) if (d - bd).abs() <= AXIS_TIE_EPS && better(c, &b) => Some((*c, d)),
                keep => keep,
            };
        }
        best.map(|(c, _)| c).or_else(|| extreme(pool, polarity))
    }

    fn axial_tip_site(&mut self, site: Site<'_>, isosurface: Isosurface, polarity: Polarity) {
        let subset = self.search_subset(site.index, isosurface, true);
        let pool = self.candidates(isosurface, &subset);
        let Some(tip) = self.axial_tip(site, &pool, polarity) else {
            return;
        };
        let (mode, category) = match polarity {
            Polarity::Positive => (CalibrationMode::NonPolar, AipCategory::Hydrogen),
            Polarity::Negative => (CalibrationMode::OuterPolar, AipCategory::OuterPolar),
        };
        match self
            .model
            .calibrate(site.atom_type, tip.potential, mode, false)
        {
            Some(value) => self.push_record(site, isosurface, tip, category, value, 1.0),
            None => debug!(atom = %site.atom.name, "Axial tip has no calibrated value."),
        }
    }

    /// Pushes `start` and whichever of its four-fold ring images could be snapped.
    fn four_fold_ring(&mut self, site: Site<'_>, pool: &[Candidate], start: Candidate) {
        let fraction = Self::lobe_fraction(site.atom_type, true);
        let mut members = vec![Some(start)];
        if let Some(axis) = self.bond_axis(site) {
            members.extend(self.ring(site, pool, start, &axis, &RING_ANGLES));
        }
        for c in members.into_iter().flatten() {
            if let Some(value) =
                self.model
                    .calibrate(site.atom_type, c.potential, CalibrationMode::NonPolar, false)
            {
                self.push_record(site, Isosurface::Tight, c, AipCategory::NonPolar, value, fraction);
            }
        }
    }

    /// sp carbon and nitrogen: the largest-magnitude sample plus a 4-fold ring.
    fn linear_sites(&mut self, site: Site<'_>) {
        let subset = self.search_subset(site.index, Isosurface::Tight, true);
        let pool = self.candidates(Isosurface::Tight, &subset);
        let Some(start) = pool
            .iter()
            .copied()
            .max_by(|a, b| a.potential.abs().total_cmp(&b.potential.abs()))
        else {
            return;
        };
        self.four_fold_ring(site, &pool, start);
    }

    /// Cl, Br, I: a sigma hole on the bond-axis cap and a negative belt around it.
    fn halogen_sites(&mut self, site: Site<'_>) {
        if let Some(axis) = self.bond_axis(site) {
            let origin = site.atom.position;
            let cap = |pool: Vec<Candidate>| -> Vec<Candidate> {
                pool.into_iter()
                    .filter(|c| axial_offset(&c.position, &origin, &axis) > 0.0)
                    .collect()
            };
            let middle = cap(self.candidates(
                Isosurface::Middle,
                &self.search_subset(site.index, Isosurface::Middle, true),
            ));
            let (isosurface, category, pool) = if middle.is_empty() {
                let tight = cap(self.candidates(
                    Isosurface::Tight,
                    &self.search_subset(site.index, Isosurface::Tight, true),
                ));
                (Isosurface::Tight, AipCategory::OuterSigma, tight)
            } else {
                (Isosurface::Middle, AipCategory::Sigma, middle)
            };
            if let Some(hole) = extreme(&pool, Polarity::Positive) {
                if let Some(value) =
                    self.model
                        .calibrate(site.atom_type, hole.potential, CalibrationMode::Sigma, false)
                {
                    self.push_record(site, isosurface, hole, category, value, 1.0);
                }
            }
        }

        let subset = self.search_subset(site.index, Isosurface::Tight, true);
        let pool = self.candidates(Isosurface::Tight, &subset);
        match extreme(&pool, Polarity::Negative) {
            Some(start) if start.potential < 0.0 => self.four_fold_ring(site, &pool, start),
            _ => debug!(atom = %site.atom.name, "No negative belt on the halogen."),
        }
    }

    /// One site for the whole patch, valued at its majority-sign extremum.
    ///
    /// A `centred` site sits on the patch medoid; otherwise it sits on the
    /// extremum sample itself.
    fn single_site(&mut self, site: Site<'_>, centred: bool) {
        let subset = self.search_subset(site.index, Isosurface::Tight, true);
        let tight = self.surface(Isosurface::Tight);
        let Some(found) = cluster_extremum(tight, &subset, None) else {
            return;
        };
        let location = if centred {
            let positions: Vec<Point3<f64>> = subset
                .iter()
                .filter_map(|&i| tight.sample(i).map(|s| s.position))
                .collect();
            let members: Vec<usize> = (0..positions.len()).collect();
            medoid(&positions, &members).map(|m| subset[m])
        } else {
            Some(found.sample_index)
        };
        let Some(c) = location.and_then(|i| self.candidate(Isosurface::Tight, i)) else {
            return;
        };
        let c = Candidate {
            potential: found.potential,
            ..c
        };
        if let Some(value) =
            self.model
                .calibrate(site.atom_type, c.potential, CalibrationMode::NonPolar, false)
        {
            self.push_record(site, Isosurface::Tight, c, AipCategory::NonPolar, value, 1.0);
        }
    }

    /// Thioether and aromatic sulfur: outer lone pairs, then one sigma hole
    /// opposite each substituent. Undefined holes discard the atom's work and
    /// the search is repeated without edge or exclusion filtering.
    fn divalent_sulfur_sites(&mut self, site: Site<'_>) {
        for filtered in [true, false] {
            let checkpoint = self.ledger.checkpoint();
            if self.try_divalent_sulfur(site, filtered) {
                return;
            }
            self.ledger.rollback(checkpoint);
            debug!(atom = %site.atom.name, filtered, "Sulfur sigma holes undefined.");
        }
    }

    fn try_divalent_sulfur(&mut self, site: Site<'_>, filtered: bool) -> bool {
        self.polar_search(site, PolarPass::outer(LonePairs::Two, filtered));

        let subset = self.search_subset(site.index, Isosurface::Tight, filtered);
        let pool = self.candidates(Isosurface::Tight, &subset);
        if pool.is_empty() {
            return false;
        }
        let origin = site.atom.position;
        let radius =
            pool.iter().map(|c| (c.position - origin).norm()).sum::<f64>() / pool.len() as f64;
        let tolerance = PI * radius * self.config.lone_pair.ring_tolerance_factor;
        let positions: Vec<Point3<f64>> = pool.iter().map(|c| c.position).collect();
        let index = SpatialIndex::new(&positions);

        let axes: Vec<Vector3<f64>> = self.substituent_axes(site);
        for axis in axes.iter().take(2) {
            let ideal = origin + axis * radius;
            let Some((nearest, distance)) = index.nearest(&ideal) else {
                return false;
            };
            if distance > tolerance {
                return false;
            }
            let hole = pool[nearest];
            let Some(value) =
                self.model
                    .calibrate(site.atom_type, hole.potential, CalibrationMode::Sigma, false)
            else {
                return false;
            };
            self.push_record(site, Isosurface::Tight, hole, AipCategory::Sigma, value, 1.0);
        }
        true
    }

    /// Two-medoid extraction over the tight patch; the polarized variant
    /// attaches the minority-sign extremum as a dual companion.
    fn clustered_sites(&mut self, site: Site<'_>, polarized: bool) {
        let subset = self.search_subset(site.index, Isosurface::Tight, true);
        if subset.is_empty() {
            return;
        }
        let tight = self.surface(Isosurface::Tight);
        let points: Vec<Point3<f64>> = subset
            .iter()
            .filter_map(|&i| tight.sample(i).map(|s| s.position))
            .collect();
        let clustering = &self.config.clustering;
        let settings = ClusterSettings {
            max_iterations: clustering.max_iterations,
            separation_floor: clustering.separation_factor * site.atom.vdw_radius,
            max_area_ratio: clustering.max_area_ratio,
            random_seed: clustering.random_seed,
        };
        let dual_fraction = polarized.then_some(clustering.dual_fraction);

        let clusters = split(&points, &settings);
        let fraction = Self::lobe_fraction(site.atom_type, clusters.len() == 2);
        for members in clusters {
            let samples: Vec<usize> = members.iter().map(|&m| subset[m]).collect();
            let Some(found) = cluster_extremum(tight, &samples, dual_fraction) else {
                continue;
            };
            let Some(c) = self.candidate(Isosurface::Tight, found.sample_index) else {
                continue;
            };
            let Some(value) = self.model.calibrate(
                site.atom_type,
                c.potential,
                CalibrationMode::NonPolar,
                polarized,
            ) else {
                debug!(atom = %site.atom.name, "Cluster extremum has no calibrated value.");
                continue;
            };
            self.push_record(site, Isosurface::Tight, c, AipCategory::NonPolar, value, fraction);

            if let Some((sample_index, raw_value)) = found.minority {
                if let Some(value) = self.model.calibrate(
                    site.atom_type,
                    raw_value,
                    CalibrationMode::NonPolar,
                    true,
                ) {
                    let companion = DualCompanion {
                        value,
                        raw_value,
                        sample_index,
                    };
                    if !self.ledger.attach_dual(companion) {
                        debug!(atom = %site.atom.name, "No record to carry the dual companion.");
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::calibration::ValueModel;
    use crate::core::models::aip::AipRecord;
    use crate::core::models::builder::MoleculeBuilder;
    use crate::core::models::molecule::Molecule;
    use crate::core::models::topology::BondOrder;
    use crate::core::surface::{Surface, SurfaceSample, SurfaceSet};
    use crate::core::typing::AtomType;
    use crate::engine::config::FootprintConfig;
    use crate::engine::progress::ProgressReporter;

    fn sphere(
        center: Point3<f64>,
        isosurface: Isosurface,
        radius: f64,
        potential: impl Fn(&Vector3<f64>) -> f64,
    ) -> Surface {
        let n = 600;
        let golden = PI * (3.0 - 5f64.sqrt());
        let samples = (0..n)
            .map(|i| {
                let y = 1.0 - 2.0 * (i as f64 + 0.5) / n as f64;
                let r = (1.0 - y * y).sqrt();
                let t = golden * i as f64;
                let d = Vector3::new(r * t.cos(), y, r * t.sin());
                SurfaceSample::new(center + d * radius, potential(&d))
            })
            .collect();
        Surface::new(isosurface, samples).unwrap()
    }

    fn one_atom_set(potential: impl Fn(&Vector3<f64>) -> f64 + Copy) -> SurfaceSet {
        SurfaceSet::new(
            sphere(Point3::origin(), Isosurface::Tight, 1.5, potential),
            sphere(Point3::origin(), Isosurface::Middle, 1.8, potential),
            sphere(Point3::origin(), Isosurface::Loose, 2.2, potential),
        )
    }

    fn run(molecule: &Molecule, types: &[AtomType], surfaces: &SurfaceSet) -> Vec<AipRecord> {
        let config = FootprintConfig::default();
        let model = ValueModel::default();
        AipFootprintEngine::new(molecule, types, surfaces, &config, &model)
            .unwrap()
            .run(&ProgressReporter::new())
            .records
    }

    #[test]
    fn pure_pi_atom_splits_into_two_half_lobes() {
        let mut builder = MoleculeBuilder::new("carbon");
        builder.add_atom("C1", Element::C, Point3::origin());
        let molecule = builder.build().unwrap();
        let types: Vec<AtomType> = vec!["C.ar".parse().unwrap()];
        // Two negative faces above and below the xy plane.
        let surfaces = one_atom_set(|d| -0.02 * d.z.abs().powi(4));

        let records = run(&molecule, &types, &surfaces);
        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|r| r.area_fraction == 0.5));
        assert!(records.iter().all(|r| r.category == AipCategory::NonPolar));
        assert!(records.iter().all(|r| r.raw_value < 0.0));
        assert_ne!(records[0].sample_index, records[1].sample_index);
        assert!(records.iter().all(|r| !r.is_dual()));
    }

    #[test]
    fn polarized_variant_attaches_minority_extremum() {
        let mut builder = MoleculeBuilder::new("carbonyl oxygen");
        builder.add_atom("O1", Element::O, Point3::origin());
        let molecule = builder.build().unwrap();
        let types: Vec<AtomType> = vec!["O.2".parse().unwrap()];
        // One lone pair along +x on the loose surface; on the tight surface
        // every fifth sample is positive, so each face carries a 20 % minority.
        let lone_pair = |d: &Vector3<f64>| -0.08 * d.x.max(0.0).powi(8);
        let checkered = sphere(Point3::origin(), Isosurface::Tight, 1.5, |_| 0.0);
        let tight_samples = checkered
            .samples()
            .iter()
            .enumerate()
            .map(|(i, s)| {
                let v = if i % 5 == 0 { 0.01 } else { -0.01 - 1e-5 * i as f64 };
                SurfaceSample::new(s.position, v)
            })
            .collect();
        let surfaces = SurfaceSet::new(
            Surface::new(Isosurface::Tight, tight_samples).unwrap(),
            sphere(Point3::origin(), Isosurface::Middle, 1.8, lone_pair),
            sphere(Point3::origin(), Isosurface::Loose, 2.2, lone_pair),
        );

        let records = run(&molecule, &types, &surfaces);
        let polar = records
            .iter()
            .filter(|r| r.category == AipCategory::Polar)
            .count();
        assert_eq!(polar, 1);
        let non_polar: Vec<_> = records
            .iter()
            .filter(|r| r.category == AipCategory::NonPolar)
            .collect();
        assert!(!non_polar.is_empty() && non_polar.len() <= 2);
        for r in non_polar {
            let dual = r.dual.expect("every face carries a minority");
            assert!(r.raw_value < 0.0);
            assert!(dual.raw_value > 0.0);
            assert!(dual.value > 0.0);
        }
    }

    #[test]
    fn hydrogen_site_sits_on_the_bond_axis() {
        let mut builder = MoleculeBuilder::new("hydrogen fluoride");
        builder
            .add_atom("H1", Element::H, Point3::origin())
            .add_atom("F1", Element::F, Point3::new(-0.92, 0.0, 0.0))
            .add_bond("H1", "F1", BondOrder::Single);
        let molecule = builder.build().unwrap();
        let types: Vec<AtomType> = vec!["H".parse().unwrap(), "F".parse().unwrap()];
        let hydrogen = |d: &Vector3<f64>| 0.05 * d.x.max(0.0);
        let surfaces = one_atom_set(hydrogen);

        let config = FootprintConfig::default();
        let model = ValueModel::default();
        let mut engine =
            AipFootprintEngine::new(&molecule, &types, &surfaces, &config, &model).unwrap();
        let site = Site {
            index: 0,
            atom: &molecule.atoms()[0],
            atom_type: types[0],
        };
        engine.non_polar_search(site);
        let records = engine.ledger.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].category, AipCategory::Hydrogen);
        assert_eq!(records[0].isosurface, Isosurface::Middle);
        let p = records[0].position;
        assert!(p.x > 1.7);
        assert!((p.y * p.y + p.z * p.z).sqrt() < 0.3);
    }

    #[test]
    fn halogen_gets_sigma_hole_and_negative_belt() {
        let mut builder = MoleculeBuilder::new("chloromethane fragment");
        builder
            .add_atom("CL1", Element::Cl, Point3::origin())
            .add_atom("C1", Element::C, Point3::new(-1.78, 0.0, 0.0))
            .add_bond("CL1", "C1", BondOrder::Single);
        let molecule = builder.build().unwrap();
        let types: Vec<AtomType> = vec!["Cl".parse().unwrap(), "C.3".parse().unwrap()];
        let surfaces = one_atom_set(|d| {
            if d.x > 0.8 {
                0.03 * d.x
            } else {
                -0.02 * (1.0 - d.x * d.x)
            }
        });

        let config = FootprintConfig::default();
        let model = ValueModel::default();
        let mut engine =
            AipFootprintEngine::new(&molecule, &types, &surfaces, &config, &model).unwrap();
        let site = Site {
            index: 0,
            atom: &molecule.atoms()[0],
            atom_type: types[0],
        };
        engine.non_polar_search(site);
        let records = engine.ledger.records();
        assert_eq!(records[0].category, AipCategory::Sigma);
        assert_eq!(records[0].isosurface, Isosurface::Middle);
        assert!(records[0].value > 0.0);
        let belt: Vec<_> = records[1..].iter().collect();
        assert!(!belt.is_empty() && belt.len() <= 4);
        assert!(belt.iter().all(|r| r.raw_value < 0.0 && r.area_fraction == 0.5));
    }

    #[test]
    fn satisfied_single_lone_pair_atom_emits_nothing_more() {
        let mut builder = MoleculeBuilder::new("amine");
        builder.add_atom("N1", Element::N, Point3::origin());
        let molecule = builder.build().unwrap();
        let types: Vec<AtomType> = vec!["N.3".parse().unwrap()];
        let surfaces = one_atom_set(|d| -0.05 * d.z.max(0.0).powi(4) + 0.005 * d.x);

        let records = run(&molecule, &types, &surfaces);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].category, AipCategory::Polar);
    }

    /// Runs only the non-polar branch for atom 0.
    fn search_first_atom(
        molecule: &Molecule,
        types: &[AtomType],
        surfaces: &SurfaceSet,
        config: &FootprintConfig,
    ) -> Vec<AipRecord> {
        let model = ValueModel::default();
        let mut engine =
            AipFootprintEngine::new(molecule, types, surfaces, config, &model).unwrap();
        let site = Site {
            index: 0,
            atom: &molecule.atoms()[0],
            atom_type: types[0],
        };
        engine.non_polar_search(site);
        engine.ledger.records().to_vec()
    }

    #[test]
    fn sulfoxide_site_sits_on_the_patch_medoid() {
        let mut builder = MoleculeBuilder::new("sulfoxide fragment");
        builder
            .add_atom("S1", Element::S, Point3::origin())
            .add_atom("C1", Element::C, Point3::new(0.0, -1.6, 0.0));
        let molecule = builder.build().unwrap();
        let types: Vec<AtomType> = vec!["S.o".parse().unwrap(), "C.3".parse().unwrap()];
        // The neighbour takes the -y cap, leaving sulfur a patch centred on +y,
        // while the potential peaks along +x.
        let surfaces = one_atom_set(|d| 0.05 * d.x.max(0.0).powi(4));
        let config = FootprintConfig::default();

        let records = search_first_atom(&molecule, &types, &surfaces, &config);
        assert_eq!(records.len(), 1);
        let site = &records[0];
        assert_eq!(site.category, AipCategory::NonPolar);
        assert!(site.position.y > 1.3, "site at {:?}", site.position);
        assert!(site.position.x.abs() < 0.5, "site at {:?}", site.position);

        let model = ValueModel::default();
        let engine =
            AipFootprintEngine::new(&molecule, &types, &surfaces, &config, &model).unwrap();
        let subset = engine.search_subset(0, Isosurface::Tight, true);
        let peak = subset
            .iter()
            .map(|&i| surfaces.tight.samples()[i].potential)
            .fold(f64::MIN, f64::max);
        assert_eq!(site.raw_value, peak);
        assert!(peak > 0.04);
    }

    fn thioether() -> Molecule {
        let mut builder = MoleculeBuilder::new("thioether");
        builder
            .add_atom("S1", Element::S, Point3::origin())
            .add_atom("C1", Element::C, Point3::new(-1.82, 0.0, 0.0))
            .add_atom("C2", Element::C, Point3::new(0.0, -1.82, 0.0))
            .add_bond("S1", "C1", BondOrder::Single)
            .add_bond("S1", "C2", BondOrder::Single);
        builder.build().unwrap()
    }

    fn thioether_types() -> Vec<AtomType> {
        vec![
            "S.3".parse().unwrap(),
            "C.3".parse().unwrap(),
            "C.3".parse().unwrap(),
        ]
    }

    fn assert_sigma_holes_opposite_substituents(records: &[AipRecord]) {
        let holes: Vec<&AipRecord> = records
            .iter()
            .filter(|r| r.category == AipCategory::Sigma)
            .collect();
        assert_eq!(holes.len(), 2);
        let ideal = [Point3::new(1.5, 0.0, 0.0), Point3::new(0.0, 1.5, 0.0)];
        for (hole, target) in holes.iter().zip(ideal) {
            assert_eq!(hole.isosurface, Isosurface::Tight);
            assert!((hole.position - target).norm() < 0.5, "hole at {:?}", hole.position);
        }
    }

    #[test]
    fn thioether_gets_outer_lone_pair_and_two_sigma_holes() {
        let molecule = thioether();
        let types = thioether_types();
        let surfaces = one_atom_set(|d| -0.05 * d.z.max(0.0).powi(4));

        let records =
            search_first_atom(&molecule, &types, &surfaces, &FootprintConfig::default());
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].category, AipCategory::OuterPolar);
        assert!(records[0].position.z > 1.3);
        assert_sigma_holes_opposite_substituents(&records);
    }

    #[test]
    fn thioether_without_filtered_holes_rolls_back_and_retries_unfiltered() {
        let molecule = thioether();
        let types = thioether_types();
        let surfaces = one_atom_set(|d| -0.05 * d.z.max(0.0).powi(4));
        // The lone-pair exclusion swallows the whole sulfur patch, so the
        // filtered hole search finds nothing.
        let config = FootprintConfig::builder()
            .sulfur_exclusion_radius(4.0)
            .build()
            .unwrap();

        let records = search_first_atom(&molecule, &types, &surfaces, &config);
        let lone_pairs = records
            .iter()
            .filter(|r| r.category == AipCategory::OuterPolar)
            .count();
        assert_eq!(lone_pairs, 1);
        assert_eq!(records.len(), 3);
        assert_sigma_holes_opposite_substituents(&records);
    }

    #[test]
    fn linear_atoms_get_a_four_fold_ring_about_the_bond() {
        for label in ["C.1", "N.1"] {
            let mut builder = MoleculeBuilder::new("linear fragment");
            builder
                .add_atom("X1", Element::C, Point3::origin())
                .add_atom("C2", Element::C, Point3::new(-1.2, 0.0, 0.0))
                .add_bond("X1", "C2", BondOrder::Triple);
            let molecule = builder.build().unwrap();
            let types: Vec<AtomType> = vec![label.parse().unwrap(), "C.1".parse().unwrap()];
            // Negative belt around the bond axis, deepest towards +y.
            let surfaces = one_atom_set(|d| -0.03 * (1.0 - d.x * d.x) * (1.0 + 0.5 * d.y));

            let records =
                search_first_atom(&molecule, &types, &surfaces, &FootprintConfig::default());
            assert_eq!(records.len(), 4, "{label}");
            assert!(records.iter().all(|r| r.category == AipCategory::NonPolar));
            assert!(records.iter().all(|r| r.area_fraction == 1.0));
            // Start, then its 90°, 180° and 270° images about +x.
            let ideal = [
                Point3::new(0.0, 1.5, 0.0),
                Point3::new(0.0, 0.0, 1.5),
                Point3::new(0.0, -1.5, 0.0),
                Point3::new(0.0, 0.0, -1.5),
            ];
            for (record, target) in records.iter().zip(ideal) {
                assert!(
                    (record.position - target).norm() < 0.35,
                    "{label}: {:?} vs {:?}",
                    record.position,
                    target
                );
            }
            let mut samples: Vec<usize> = records.iter().map(|r| r.sample_index).collect();
            samples.sort_unstable();
            samples.dedup();
            assert_eq!(samples.len(), 4);
        }
    }
}

use super::config::FootprintConfig;
use super::edge::EdgeDetector;
use super::error::EngineError;
use super::ledger::AipLedger;
use super::progress::{Progress, ProgressReporter};
use crate::core::calibration::ValueModel;
use crate::core::models::aip::{AipCategory, AipRecord};
use crate::core::models::atom::Atom;
use crate::core::models::molecule::Molecule;
use crate::core::surface::{Isosurface, Partition, Surface, SurfaceSet};
use crate::core::typing::AtomType;
use crate::core::typing::atom_type::SulfurType;
use crate::core::utils::geometry::{perpendicular_distance, rotate_about_axis};
use crate::core::utils::spatial::SpatialIndex;
use nalgebra::{Point3, Vector3};
use std::f64::consts::PI;
use tracing::{debug, info, instrument};

/// Ownership partitions of the three isosurfaces.
#[derive(Debug, Clone)]
pub struct SurfacePartitions {
    pub tight: Partition,
    pub middle: Partition,
    pub loose: Partition,
}

impl SurfacePartitions {
    pub fn compute(surfaces: &SurfaceSet, atoms: &[Atom], config: &FootprintConfig) -> Self {
        Self {
            tight: Partition::compute(&surfaces.tight, atoms, config.ownership),
            middle: Partition::compute(&surfaces.middle, atoms, config.ownership),
            loose: Partition::compute(&surfaces.loose, atoms, config.ownership),
        }
    }

    pub fn get(&self, isosurface: Isosurface) -> &Partition {
        match isosurface {
            Isosurface::Tight => &self.tight,
            Isosurface::Middle => &self.middle,
            Isosurface::Loose => &self.loose,
        }
    }
}

/// Everything the engine produced for one molecule.
#[derive(Debug, Clone)]
pub struct Footprint {
    pub records: Vec<AipRecord>,
    /// Records emitted per atom, indexed like the molecule's atoms.
    pub aip_counts: Vec<usize>,
    pub partitions: SurfacePartitions,
}

impl Footprint {
    pub fn count_for(&self, atom_index: usize) -> usize {
        self.aip_counts.get(atom_index).copied().unwrap_or(0)
    }
}

#[derive(Debug, Clone, Copy)]
pub(super) struct Site<'a> {
    pub index: usize,
    pub atom: &'a Atom,
    pub atom_type: AtomType,
}

/// A surface sample picked as an AIP location.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) struct Candidate {
    pub sample_index: usize,
    pub position: Point3<f64>,
    pub potential: f64,
}

/// Sequential per-atom AIP extraction for one molecule.
///
/// Atoms are processed in index order; later atoms consult the ledger for
/// what earlier atoms emitted, so the loop must stay sequential.
pub struct AipFootprintEngine<'a> {
    pub(super) molecule: &'a Molecule,
    pub(super) types: &'a [AtomType],
    pub(super) surfaces: &'a SurfaceSet,
    pub(super) config: &'a FootprintConfig,
    pub(super) model: &'a ValueModel,
    pub(super) partitions: SurfacePartitions,
    pub(super) tight_index: SpatialIndex,
    pub(super) edge: EdgeDetector,
    pub(super) ledger: AipLedger,
}

impl<'a> AipFootprintEngine<'a> {
    pub fn new(
        molecule: &'a Molecule,
        types: &'a [AtomType],
        surfaces: &'a SurfaceSet,
        config: &'a FootprintConfig,
        model: &'a ValueModel,
    ) -> Result<Self, EngineError> {
        if types.len() != molecule.len() {
            return Err(EngineError::TypeCountMismatch {
                molecule: molecule.name().to_string(),
                atoms: molecule.len(),
                types: types.len(),
            });
        }
        let partitions = SurfacePartitions::compute(surfaces, molecule.atoms(), config);
        Ok(Self {
            molecule,
            types,
            surfaces,
            config,
            model,
            partitions,
            tight_index: SpatialIndex::new(&surfaces.tight.positions()),
            edge: EdgeDetector::from_config(&config.edge),
            ledger: AipLedger::new(molecule.len(), surfaces.tight.len()),
        })
    }

    #[instrument(skip_all, name = "aip_footprint", fields(molecule = self.molecule.name()))]
    pub fn run(mut self, reporter: &ProgressReporter) -> Footprint {
        info!(atoms = self.molecule.len(), "Extracting atom interaction points.");
        reporter.report(Progress::TaskStart {
            total_steps: self.molecule.len() as u64,
        });

        let molecule = self.molecule;
        for (index, atom) in molecule.atoms().iter().enumerate() {
            let site = Site {
                index,
                atom,
                atom_type: self.types[index],
            };
            let before = self.ledger.len();
            self.footprint_atom(site);
            let aips = self.ledger.len() - before;
            debug!(atom = %atom.name, atom_type = %site.atom_type, aips, "Atom footprinted.");
            reporter.report(Progress::AtomFinished { index, aips });
        }

        reporter.report(Progress::TaskFinish);
        info!(aips = self.ledger.len(), "Footprint complete.");
        let (records, aip_counts) = self.ledger.into_parts();
        Footprint {
            records,
            aip_counts,
            partitions: self.partitions,
        }
    }

    fn footprint_atom(&mut self, site: Site<'_>) {
        let minimum = self.config.minimum_area.for_type(site.atom_type);
        let area = self.tight_area(site.index);
        if area < minimum {
            debug!(atom = %site.atom.name, area, minimum, "Owned area below minimum.");
            return;
        }

        if site.atom_type.is_lone_pair_eligible() {
            let lone_pairs = site.atom_type.lone_pairs();
            let found = self.polar_search(site, PolarPass::loose(lone_pairs));
            // Phosphine sulfides get no second chance on the tight surface.
            if !found && site.atom_type != AtomType::Sulfur(SulfurType::PhosphineSulfide) {
                self.polar_search(site, PolarPass::outer(lone_pairs, true));
            }
        }

        let remaining = self.tight_area(site.index);
        if remaining < minimum {
            debug!(atom = %site.atom.name, remaining, "No area left after lone pairs.");
            return;
        }
        self.non_polar_search(site);
    }

    /// Owned tight-surface area not yet consumed by lone-pair exclusions.
    pub(super) fn tight_area(&self, atom_index: usize) -> f64 {
        let owned = self
            .partitions
            .tight
            .owned(atom_index)
            .iter()
            .filter(|&&i| !self.ledger.is_excluded(i))
            .count();
        owned as f64 * self.surfaces.tight.area_per_point()
    }

    /// Sample indices of `atom_index` on `isosurface` that a search may use.
    ///
    /// Filtered subsets drop excluded tight samples and the sparse fringe.
    pub(super) fn search_subset(
        &self,
        atom_index: usize,
        isosurface: Isosurface,
        filtered: bool,
    ) -> Vec<usize> {
        let owned = self.partitions.get(isosurface).owned(atom_index);
        if !filtered {
            return owned.to_vec();
        }
        let available: Vec<usize> = match isosurface {
            Isosurface::Tight => owned
                .iter()
                .copied()
                .filter(|&i| !self.ledger.is_excluded(i))
                .collect(),
            _ => owned.to_vec(),
        };
        self.edge
            .interior(self.surfaces.get(isosurface), &available)
    }

    pub(super) fn surface(&self, isosurface: Isosurface) -> &'a Surface {
        self.surfaces.get(isosurface)
    }

    pub(super) fn candidate(&self, isosurface: Isosurface, sample_index: usize) -> Option<Candidate> {
        self.surface(isosurface)
            .sample(sample_index)
            .map(|s| Candidate {
                sample_index,
                position: s.position,
                potential: s.potential,
            })
    }

    pub(super) fn candidates(&self, isosurface: Isosurface, subset: &[usize]) -> Vec<Candidate> {
        subset
            .iter()
            .filter_map(|&i| self.candidate(isosurface, i))
            .collect()
    }

    /// Unit vector from the first bonded neighbour towards the atom.
    pub(super) fn bond_axis(&self, site: Site<'_>) -> Option<Vector3<f64>> {
        let (neighbor, _) = self.molecule.neighbors(site.index).first()?;
        let neighbor = self.molecule.atom(*neighbor)?;
        (site.atom.position - neighbor.position).try_normalize(1e-9)
    }

    /// Unit vectors from each bonded neighbour towards the atom.
    pub(super) fn substituent_axes(&self, site: Site<'_>) -> Vec<Vector3<f64>> {
        self.molecule
            .neighbors(site.index)
            .iter()
            .filter_map(|(n, _)| self.molecule.atom(*n))
            .filter_map(|n| (site.atom.position - n.position).try_normalize(1e-9))
            .collect()
    }

    /// Rotates `start` about the axis through the atom and snaps each ideal
    /// point to the nearest candidate within `π · r_circle · tolerance_factor`.
    ///
    /// Returns one entry per angle; `None` marks a ring point with no sample
    /// close enough, or one that snapped onto an already used sample.
    pub(super) fn ring(
        &self,
        site: Site<'_>,
        pool: &[Candidate],
        start: Candidate,
        axis: &Vector3<f64>,
        angles: &[f64],
    ) -> Vec<Option<Candidate>> {
        let positions: Vec<Point3<f64>> = pool.iter().map(|c| c.position).collect();
        let index = SpatialIndex::new(&positions);
        let radius = perpendicular_distance(&start.position, &site.atom.position, axis);
        let tolerance = PI * radius * self.config.lone_pair.ring_tolerance_factor;

        let mut used = vec![start.sample_index];
        angles
            .iter()
            .map(|&angle| {
                let ideal = rotate_about_axis(&start.position, &site.atom.position, axis, angle);
                let (nearest, distance) = index.nearest(&ideal)?;
                let snapped = pool[nearest];
                if distance > tolerance || used.contains(&snapped.sample_index) {
                    debug!(angle, distance, tolerance, "Ring point could not be snapped.");
                    return None;
                }
                used.push(snapped.sample_index);
                Some(snapped)
            })
            .collect()
    }

    /// Half the area for each lobe of a symmetric pair on dual-lobe types.
    pub(super) fn lobe_fraction(atom_type: AtomType, paired: bool) -> f64 {
        if paired && atom_type.has_dual_lobes() {
            0.5
        } else {
            1.0
        }
    }

    pub(super) fn push_record(
        &mut self,
        site: Site<'_>,
        isosurface: Isosurface,
        candidate: Candidate,
        category: AipCategory,
        value: f64,
        area_fraction: f64,
    ) {
        self.ledger.push(AipRecord {
            value,
            raw_value: candidate.potential,
            position: candidate.position,
            sample_index: candidate.sample_index,
            category,
            atom_index: site.index,
            atom_type: site.atom_type,
            atom_name: site.atom.name.clone(),
            area_fraction,
            isosurface,
            dual: None,
        });
    }
}

/// Parameters of one lone-pair search pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) struct PolarPass {
    pub isosurface: Isosurface,
    pub outer: bool,
    pub lone_pairs: crate::core::typing::LonePairs,
    pub filtered: bool,
}

impl PolarPass {
    pub fn loose(lone_pairs: crate::core::typing::LonePairs) -> Self {
        Self {
            isosurface: Isosurface::Loose,
            outer: false,
            lone_pairs,
            filtered: true,
        }
    }

    pub fn outer(lone_pairs: crate::core::typing::LonePairs, filtered: bool) -> Self {
        Self {
            isosurface: Isosurface::Tight,
            outer: true,
            lone_pairs,
            filtered,
        }
    }
}

use crate::core::calibration::ValueModel;
use crate::core::models::aip::AipRecord;
use crate::core::models::molecule::Molecule;
use crate::core::surface::SurfaceSet;
use crate::core::typing::{AtomType, AtomTypeClassifier};
use crate::engine::config::FootprintConfig;
use crate::engine::error::EngineError;
use crate::engine::footprint::AipFootprintEngine;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::statistics::SurfaceStatistics;
use tracing::{info, instrument};

#[derive(Debug, Clone)]
pub struct FootprintResult {
    /// Fine type of every atom, in atom index order.
    pub atom_types: Vec<AtomType>,
    pub records: Vec<AipRecord>,
    /// Records emitted per atom, in atom index order.
    pub aip_counts: Vec<usize>,
    pub statistics: SurfaceStatistics,
}

impl FootprintResult {
    pub fn records_for(&self, atom_index: usize) -> impl Iterator<Item = &AipRecord> {
        self.records
            .iter()
            .filter(move |r| r.atom_index == atom_index)
    }
}

/// Types the molecule, extracts its AIPs and summarizes the tight surface.
#[instrument(skip_all, name = "footprint_workflow", fields(molecule = molecule.name()))]
pub fn run(
    molecule: &Molecule,
    surfaces: &SurfaceSet,
    config: &FootprintConfig,
    model: &ValueModel,
    reporter: &ProgressReporter,
) -> Result<FootprintResult, EngineError> {
    // === Phase 1: Atom typing ===
    reporter.report(Progress::PhaseStart {
        name: "Atom Typing",
    });
    let atom_types = AtomTypeClassifier::new()
        .with_planarity_threshold(config.typing.planarity_threshold)
        .classify(molecule);
    reporter.report(Progress::PhaseFinish);

    // === Phase 2: AIP extraction ===
    reporter.report(Progress::PhaseStart {
        name: "Footprinting",
    });
    let footprint =
        AipFootprintEngine::new(molecule, &atom_types, surfaces, config, model)?.run(reporter);
    reporter.report(Progress::PhaseFinish);

    // === Phase 3: Surface statistics ===
    reporter.report(Progress::PhaseStart {
        name: "Surface Statistics",
    });
    let statistics = SurfaceStatistics::compute(&surfaces.tight, &footprint, &atom_types, model);
    reporter.report(Progress::PhaseFinish);

    info!(
        aips = footprint.records.len(),
        total_area = statistics.total_area,
        "Footprint workflow finished."
    );
    Ok(FootprintResult {
        atom_types,
        records: footprint.records,
        aip_counts: footprint.aip_counts,
        statistics,
    })
}

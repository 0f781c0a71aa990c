use crate::cli::FootprintArgs;
use crate::config::PartialFootprintConfig;
use crate::error::{CliError, Result};
use crate::utils::progress::FootprintProgress;
use aipgen::core::calibration::{CalibrationTables, ValueModel};
use aipgen::core::io::{
    AipCsv, InputFile, MoleculeToml, OutputFile, StatisticsDocument, StatisticsToml, read_surface,
};
use aipgen::core::models::aip::AipCategory;
use aipgen::core::models::molecule::Molecule;
use aipgen::core::surface::{Isosurface, Surface, SurfaceSet};
use aipgen::engine::progress::ProgressReporter;
use aipgen::engine::statistics::SurfaceStatistics;
use aipgen::workflows::footprint::{self, FootprintResult};
use std::path::Path;
use tracing::{debug, info};

pub fn run(args: FootprintArgs) -> Result<()> {
    info!("Starting footprint command.");

    let partial = match &args.config {
        Some(path) => PartialFootprintConfig::from_file(path)?,
        None => PartialFootprintConfig::default(),
    };
    let resolved = partial.merge_with_cli(&args)?;
    debug!("Resolved footprint configuration: {:?}", resolved.footprint);

    let model = load_model(resolved.tables.as_deref())?;
    let molecule = load_molecule(&args.molecule)?;
    let surfaces = SurfaceSet::new(
        load_surface(&args.tight, Isosurface::Tight)?,
        load_surface(&args.middle, Isosurface::Middle)?,
        load_surface(&args.loose, Isosurface::Loose)?,
    );
    info!(
        molecule = molecule.name(),
        atoms = molecule.len(),
        tight = surfaces.tight.len(),
        middle = surfaces.middle.len(),
        loose = surfaces.loose.len(),
        "Inputs loaded."
    );

    let progress = FootprintProgress::new();
    let reporter = ProgressReporter::with_callback(progress.callback());
    let result = footprint::run(&molecule, &surfaces, &resolved.footprint, &model, &reporter)?;

    AipCsv::write_to_path(&result.records, &args.output).map_err(|e| CliError::FileWriting {
        path: args.output.clone(),
        source: e.into(),
    })?;
    info!("AIPs written to {:?}", args.output);

    if let Some(path) = &args.statistics {
        let document = StatisticsDocument {
            molecule: molecule.name().to_string(),
            aip_count: result.records.len(),
            statistics: result.statistics.clone(),
        };
        StatisticsToml::<SurfaceStatistics>::write_to_path(&document, path).map_err(|e| {
            CliError::FileWriting {
                path: path.clone(),
                source: e.into(),
            }
        })?;
        info!("Surface statistics written to {:?}", path);
    }

    print_summary(&molecule, &result, &args.output);
    Ok(())
}

fn load_model(tables: Option<&Path>) -> Result<ValueModel> {
    let Some(path) = tables else {
        return Ok(ValueModel::default());
    };
    debug!("Loading calibration tables from {:?}", path);
    let tables = CalibrationTables::load(path).map_err(|e| CliError::FileParsing {
        path: path.to_path_buf(),
        source: e.into(),
    })?;
    Ok(ValueModel::new(tables))
}

fn load_molecule(path: &Path) -> Result<Molecule> {
    MoleculeToml::read_from_path(path).map_err(|e| CliError::FileParsing {
        path: path.to_path_buf(),
        source: e.into(),
    })
}

fn load_surface(path: &Path, isosurface: Isosurface) -> Result<Surface> {
    read_surface(path, isosurface).map_err(|e| CliError::FileParsing {
        path: path.to_path_buf(),
        source: e.into(),
    })
}

fn print_summary(molecule: &Molecule, result: &FootprintResult, output: &Path) {
    let breakdown: Vec<String> = [
        AipCategory::Polar,
        AipCategory::OuterPolar,
        AipCategory::Hydrogen,
        AipCategory::Sigma,
        AipCategory::OuterSigma,
        AipCategory::NonPolar,
    ]
    .into_iter()
    .filter_map(|category| {
        let n = result
            .records
            .iter()
            .filter(|r| r.category == category)
            .count();
        (n > 0).then(|| format!("{n} {category}"))
    })
    .collect();
    println!(
        "{}: {} AIPs ({}) -> {}",
        molecule.name(),
        result.records.len(),
        breakdown.join(", "),
        output.display()
    );
    for (name, value) in result.statistics.attributes() {
        println!("  {:<24} {}", name, value);
    }
}

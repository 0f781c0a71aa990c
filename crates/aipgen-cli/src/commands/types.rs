use crate::cli::TypesArgs;
use crate::error::{CliError, Result};
use aipgen::core::io::{InputFile, MoleculeToml};
use aipgen::core::models::molecule::Molecule;
use aipgen::core::typing::{AtomType, AtomTypeClassifier};
use tracing::info;

pub fn run(args: TypesArgs) -> Result<()> {
    let molecule = MoleculeToml::read_from_path(&args.molecule).map_err(|e| {
        CliError::FileParsing {
            path: args.molecule.clone(),
            source: e.into(),
        }
    })?;
    let types = AtomTypeClassifier::new().classify(&molecule);
    info!(molecule = molecule.name(), atoms = molecule.len(), "Atoms typed.");
    print!("{}", render_table(&molecule, &types));
    Ok(())
}

fn render_table(molecule: &Molecule, types: &[AtomType]) -> String {
    let mut out = format!("{:>5}  {:<8} {:<4} {}\n", "index", "name", "elem", "type");
    for (atom, atom_type) in molecule.atoms().iter().zip(types) {
        out.push_str(&format!(
            "{:>5}  {:<8} {:<4} {}\n",
            atom.index + 1,
            atom.name,
            atom.element.to_string(),
            atom_type
        ));
    }
    out
}

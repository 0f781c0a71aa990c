//! Readers and writers for the documents that surround a footprinting run.
//!
//! Inputs are a TOML molecule description and one CSV of surface samples per
//! isosurface. Outputs are a CSV of AIP records and a TOML statistics summary.
//! Every format implements [`traits::InputFile`] or [`traits::OutputFile`].

pub mod aip;
pub mod molecule;
pub mod statistics;
pub mod surface;
pub mod traits;

pub use aip::{AipCsv, AipCsvError};
pub use molecule::{MoleculeToml, MoleculeTomlError};
pub use statistics::{StatisticsDocument, StatisticsToml, StatisticsTomlError};
pub use surface::{SurfaceCsv, SurfaceCsvError, read_surface};
pub use traits::{InputFile, OutputFile};

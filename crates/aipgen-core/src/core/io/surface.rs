use super::traits::InputFile;
use crate::core::surface::{Isosurface, Surface, SurfaceError, SurfaceSample};
use serde::Deserialize;
use std::io::{self, BufRead};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SurfaceCsvError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Malformed surface CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Surface(#[from] SurfaceError),
}

#[derive(Debug, Deserialize)]
struct SampleRow {
    x: f64,
    y: f64,
    z: f64,
    potential: f64,
}

/// Surface samples as CSV with an `x,y,z,potential` header.
///
/// Coordinates are in bohr and are converted to Ångström on read. Lines
/// starting with `#` are ignored.
pub struct SurfaceCsv;

impl InputFile for SurfaceCsv {
    type Output = Vec<SurfaceSample>;
    type Error = SurfaceCsvError;

    fn read_from(reader: &mut impl BufRead) -> Result<Vec<SurfaceSample>, SurfaceCsvError> {
        let mut csv = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .comment(Some(b'#'))
            .from_reader(reader);
        csv.deserialize::<SampleRow>()
            .map(|row| -> Result<SurfaceSample, SurfaceCsvError> {
                let row = row?;
                Ok(SurfaceSample::from_bohr(row.x, row.y, row.z, row.potential))
            })
            .collect()
    }
}

/// Reads one isosurface from a CSV file and validates it.
pub fn read_surface<P: AsRef<Path>>(
    path: P,
    isosurface: Isosurface,
) -> Result<Surface, SurfaceCsvError> {
    let samples = SurfaceCsv::read_from_path(path)?;
    Ok(Surface::new(isosurface, samples)?)
}

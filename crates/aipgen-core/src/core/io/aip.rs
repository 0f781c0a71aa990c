use super::traits::OutputFile;
use crate::core::models::aip::AipRecord;
use std::io::{self, Write};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AipCsvError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Column order of the AIP table. Dual columns are left empty for plain records.
pub const AIP_COLUMNS: [&str; 12] = [
    "value",
    "nearest_atom_id",
    "type",
    "atom_type",
    "x3",
    "y3",
    "z3",
    "raw_value",
    "isosurface",
    "fraction",
    "max_value",
    "max_raw_value",
];

/// AIP records as a CSV table with one row per record.
pub struct AipCsv;

impl OutputFile for AipCsv {
    type Input = [AipRecord];
    type Error = AipCsvError;

    fn write_to(records: &[AipRecord], writer: &mut impl Write) -> Result<(), AipCsvError> {
        let mut csv = csv::Writer::from_writer(writer);
        csv.write_record(AIP_COLUMNS)?;
        for record in records {
            let attributes = record.attributes();
            let row = AIP_COLUMNS.iter().map(|column| {
                attributes
                    .iter()
                    .find(|(key, _)| key == column)
                    .map(|(_, value)| value.as_str())
                    .unwrap_or("")
            });
            csv.write_record(row)?;
        }
        csv.flush()?;
        Ok(())
    }
}

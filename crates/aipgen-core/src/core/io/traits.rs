use std::error::Error;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// A file format that can be parsed into an in-memory value.
pub trait InputFile {
    type Output;
    type Error: Error + From<io::Error>;

    /// Parses the whole document from a buffered reader.
    fn read_from(reader: &mut impl BufRead) -> Result<Self::Output, Self::Error>;

    fn read_from_path<P: AsRef<Path>>(path: P) -> Result<Self::Output, Self::Error> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        Self::read_from(&mut reader)
    }
}

/// A file format that a value can be written out as.
pub trait OutputFile {
    type Input: ?Sized;
    type Error: Error + From<io::Error>;

    fn write_to(value: &Self::Input, writer: &mut impl Write) -> Result<(), Self::Error>;

    fn write_to_path<P: AsRef<Path>>(value: &Self::Input, path: P) -> Result<(), Self::Error> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        Self::write_to(value, &mut writer)?;
        writer.flush()?;
        Ok(())
    }
}

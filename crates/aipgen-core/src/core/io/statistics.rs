use super::traits::OutputFile;
use serde::Serialize;
use std::io::{self, Write};
use std::marker::PhantomData;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StatisticsTomlError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Failed to serialize statistics: {0}")]
    Toml(#[from] toml::ser::Error),
}

/// Summary of one footprinting run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct StatisticsDocument<S> {
    pub molecule: String,
    pub aip_count: usize,
    pub statistics: S,
}

/// TOML writer for [`StatisticsDocument`], generic over the statistics payload.
pub struct StatisticsToml<S>(PhantomData<S>);

impl<S: Serialize> OutputFile for StatisticsToml<S> {
    type Input = StatisticsDocument<S>;
    type Error = StatisticsTomlError;

    fn write_to(
        document: &StatisticsDocument<S>,
        writer: &mut impl Write,
    ) -> Result<(), StatisticsTomlError> {
        let text = toml::to_string(document)?;
        writer.write_all(text.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Areas {
        total_area: f64,
        point_count: usize,
    }

    #[test]
    fn document_nests_statistics_under_a_table() {
        let document = StatisticsDocument {
            molecule: "water".to_string(),
            aip_count: 4,
            statistics: Areas {
                total_area: 61.5,
                point_count: 900,
            },
        };
        let mut out = Vec::new();
        StatisticsToml::<Areas>::write_to(&document, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let parsed: toml::Table = text.parse().unwrap();
        assert_eq!(parsed["molecule"].as_str(), Some("water"));
        assert_eq!(parsed["aip-count"].as_integer(), Some(4));
        assert_eq!(parsed["statistics"]["total_area"].as_float(), Some(61.5));
        assert_eq!(parsed["statistics"]["point_count"].as_integer(), Some(900));
    }

    #[test]
    fn writes_to_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stats.toml");
        let document = StatisticsDocument {
            molecule: "m".to_string(),
            aip_count: 0,
            statistics: Areas {
                total_area: 1.0,
                point_count: 1,
            },
        };
        StatisticsToml::<Areas>::write_to_path(&document, &path).unwrap();
        assert!(std::fs::read_to_string(&path).unwrap().contains("[statistics]"));
    }
}

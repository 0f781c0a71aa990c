use thiserror::Error;

use super::config::ConfigError;
use crate::core::calibration::TableLoadError;
use crate::core::models::builder::ModelError;
use crate::core::surface::SurfaceError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid molecule: {source}")]
    Model {
        #[from]
        source: ModelError,
    },

    #[error("Invalid surface: {source}")]
    Surface {
        #[from]
        source: SurfaceError,
    },

    #[error("Invalid configuration: {source}")]
    Config {
        #[from]
        source: ConfigError,
    },

    #[error("Calibration tables could not be loaded: {source}")]
    Tables {
        #[from]
        source: TableLoadError,
    },

    #[error("Molecule '{molecule}' has {atoms} atoms but {types} atom types were supplied")]
    TypeCountMismatch {
        molecule: String,
        atoms: usize,
        types: usize,
    },

    #[error("Internal logic error: {0}")]
    Internal(String),
}

use thiserror::Error;

use crate::spectrum::ParamErrors;

/// Result type produced by the ocean pipeline.
pub type OceanResult<T> = Result<T, OceanError>;

#[derive(Debug, Error)]
pub enum OceanError {
    /// One or more parameter checks failed; nothing was generated
    #[error("invalid ocean parameters: {0}")]
    InvalidParameters(ParamErrors),
    #[error(transparent)]
    Export(#[from] ExportError),
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("{width}x{height} image exceeds the 65535 pixel limit of the TGA header")]
    TooLarge { width: usize, height: usize },
    #[error("failed to export mesh: {0}")]
    Mesh(String),
}

//! Error type for the few operations that can fail.
//!
//! Interactive editing never errors: missing ids are no-ops and geometry
//! is clamped. Only decoding external payloads and handing results to an
//! outside collaborator (save, export) can fail.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid project data: {0}")]
    InvalidProject(#[from] serde_json::Error),

    #[error("unknown element type `{0}`")]
    UnknownElementType(String),

    #[error("save failed: {0}")]
    SaveFailed(String),

    #[error("export failed: {0}")]
    ExportFailed(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

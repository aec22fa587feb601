use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("unknown drink: {0}")]
    UnknownDrink(String),
    #[error("unknown curiosity: {0}")]
    UnknownCuriosity(String),
    #[error("asset manifest {path} is invalid: {reason}")]
    InvalidManifest { path: PathBuf, reason: String },
}

//! Loading the model artifact from disk.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::forest::{Model, ModelArtifact};

/// Faults that prevent a model from being loaded.
///
/// All of these are fatal at startup: a missing or corrupt artifact is a
/// configuration error, not a transient fault, so there is no retry.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("failed to read model artifact at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse model artifact at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid model artifact at {path}: {reason}")]
    Invalid { path: PathBuf, reason: String },
}

/// Reads, parses, and validates the model artifact at `path`.
pub fn load_model(path: &Path) -> Result<Model, ModelError> {
    let file = File::open(path).map_err(|source| ModelError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let artifact: ModelArtifact =
        serde_json::from_reader(BufReader::new(file)).map_err(|source| ModelError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    Model::from_artifact(artifact).map_err(|reason| ModelError::Invalid {
        path: path.to_path_buf(),
        reason,
    })
}

//! The classification model: artifact format, structural validation,
//! and batch prediction.

mod forest;
mod loader;

pub use forest::{Label, Model, ModelArtifact, Node, Tree};
pub use loader::{load_model, ModelError};

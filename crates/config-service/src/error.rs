//! Error types for the configuration service

use thiserror::Error;

/// Errors surfaced by store, catalog, and preview operations
#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration not found")]
    NotFound,

    #[error("Template {0} not found")]
    TemplateNotFound(String),

    #[error("Cluster API error: {0}")]
    Backend(String),

    #[error("Failed to render preview: {0}")]
    Render(#[from] serde_yaml::Error),
}

impl Error {
    /// Map a kube client error, splitting out the 404 case
    pub fn from_kube(err: kube::Error) -> Self {
        match err {
            kube::Error::Api(ref ae) if ae.code == 404 => Error::NotFound,
            other => Error::Backend(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

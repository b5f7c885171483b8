//! Service configuration
//!
//! All settings come from the environment so the deployment chart stays in
//! charge of wiring.

use std::path::PathBuf;

/// Runtime settings for the configuration service
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Address the HTTP server binds to
    pub bind_addr: String,
    /// Directory scanned for custom template documents
    pub templates_dir: Option<PathBuf>,
    /// GitOps repository receiving mirror syncs (unset disables the mirror)
    pub git_repo_url: Option<String>,
}

impl ServiceConfig {
    /// Load settings from the environment, falling back to defaults.
    #[must_use]
    pub fn from_env() -> Self {
        let bind_addr =
            std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8000".to_string());

        let templates_dir = std::env::var("TEMPLATES_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/app/templates"));

        Self {
            bind_addr,
            templates_dir: Some(templates_dir),
            git_repo_url: std::env::var("GIT_REPO_URL").ok().filter(|s| !s.is_empty()),
        }
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8000".to_string(),
            templates_dir: Some(PathBuf::from("/app/templates")),
            git_repo_url: None,
        }
    }
}

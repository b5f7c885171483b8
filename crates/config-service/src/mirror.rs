//! Best-effort Git mirror for configuration state
//!
//! The mirror is an external collaborator: writes are handed off after the
//! primary store write and are never awaited by request handlers. A failed
//! or skipped sync leaves the mirror stale, which is accepted.

use async_trait::async_trait;
use tracing::info;

use crate::crds::ApplicationConfiguration;

/// Replication target for configuration upserts and removals
#[async_trait]
pub trait ConfigMirror: Send + Sync {
    async fn sync(&self, config: &ApplicationConfiguration) -> anyhow::Result<()>;

    async fn remove(&self, name: &str, namespace: &str) -> anyhow::Result<()>;
}

/// Mirror pointed at a GitOps repository
///
/// With no repository configured both operations are no-ops. The actual
/// repository write is handled by the GitOps tooling watching the repo; this
/// side only records the intent.
pub struct GitMirror {
    repo_url: Option<String>,
}

impl GitMirror {
    #[must_use]
    pub fn new(repo_url: Option<String>) -> Self {
        Self { repo_url }
    }
}

#[async_trait]
impl ConfigMirror for GitMirror {
    async fn sync(&self, config: &ApplicationConfiguration) -> anyhow::Result<()> {
        let Some(repo) = &self.repo_url else {
            return Ok(());
        };

        let name = config.metadata.name.as_deref().unwrap_or("<unnamed>");
        info!("Syncing configuration {name} to {repo}");
        Ok(())
    }

    async fn remove(&self, name: &str, namespace: &str) -> anyhow::Result<()> {
        let Some(repo) = &self.repo_url else {
            return Ok(());
        };

        info!("Removing configuration {namespace}/{name} from {repo}");
        Ok(())
    }
}

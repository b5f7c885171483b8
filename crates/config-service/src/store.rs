//! Store facade over the cluster-resident configuration API
//!
//! The facade owns two injected collaborators: a [`ConfigBackend`] that talks
//! to the custom-resource API, and a [`ConfigMirror`] that receives
//! fire-and-forget replication hand-offs after every successful write.
//! Concurrent writes to the same identity are serialized by the cluster API;
//! this layer carries no optimistic-lock token and may overwrite concurrent
//! edits.

use async_trait::async_trait;
use chrono::Utc;
use kube::api::{Api, DeleteParams, ListParams, Patch, PatchParams, PostParams};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{error, warn};

use crate::crds::ApplicationConfiguration;
use crate::error::{Error, Result};
use crate::mirror::ConfigMirror;

pub const CREATED_ANNOTATION: &str = "created";
pub const LAST_MODIFIED_ANNOTATION: &str = "lastModified";

/// Raw custom-resource operations, implemented against the cluster in
/// production and by fakes in tests
#[async_trait]
pub trait ConfigBackend: Send + Sync {
    async fn list(&self, namespace: Option<&str>) -> Result<Vec<ApplicationConfiguration>>;

    async fn get(&self, name: &str, namespace: &str) -> Result<ApplicationConfiguration>;

    async fn create(&self, config: &ApplicationConfiguration) -> Result<ApplicationConfiguration>;

    async fn update(&self, config: &ApplicationConfiguration) -> Result<ApplicationConfiguration>;

    async fn delete(&self, name: &str, namespace: &str) -> Result<()>;
}

/// Backend talking to the `applicationconfigurations` API through kube
pub struct KubeBackend {
    client: kube::Client,
}

impl KubeBackend {
    #[must_use]
    pub fn new(client: kube::Client) -> Self {
        Self { client }
    }

    fn namespaced(&self, namespace: &str) -> Api<ApplicationConfiguration> {
        Api::namespaced(self.client.clone(), namespace)
    }
}

fn identity(config: &ApplicationConfiguration) -> Result<(String, String)> {
    let name = config
        .metadata
        .name
        .clone()
        .ok_or_else(|| Error::Backend("configuration has no name".to_string()))?;
    let namespace = config
        .metadata
        .namespace
        .clone()
        .ok_or_else(|| Error::Backend("configuration has no namespace".to_string()))?;
    Ok((name, namespace))
}

#[async_trait]
impl ConfigBackend for KubeBackend {
    async fn list(&self, namespace: Option<&str>) -> Result<Vec<ApplicationConfiguration>> {
        let result = match namespace {
            Some(ns) => self.namespaced(ns).list(&ListParams::default()).await,
            None => {
                Api::<ApplicationConfiguration>::all(self.client.clone())
                    .list(&ListParams::default())
                    .await
            }
        };
        Ok(result.map_err(Error::from_kube)?.items)
    }

    async fn get(&self, name: &str, namespace: &str) -> Result<ApplicationConfiguration> {
        self.namespaced(namespace)
            .get(name)
            .await
            .map_err(Error::from_kube)
    }

    async fn create(&self, config: &ApplicationConfiguration) -> Result<ApplicationConfiguration> {
        let (_, namespace) = identity(config)?;
        self.namespaced(&namespace)
            .create(&PostParams::default(), config)
            .await
            .map_err(Error::from_kube)
    }

    async fn update(&self, config: &ApplicationConfiguration) -> Result<ApplicationConfiguration> {
        let (name, namespace) = identity(config)?;
        self.namespaced(&namespace)
            .patch(&name, &PatchParams::default(), &Patch::Merge(config))
            .await
            .map_err(Error::from_kube)
    }

    async fn delete(&self, name: &str, namespace: &str) -> Result<()> {
        self.namespaced(namespace)
            .delete(name, &DeleteParams::default())
            .await
            .map_err(Error::from_kube)?;
        Ok(())
    }
}

/// High-level configuration store used by the REST handlers
pub struct ConfigStore {
    backend: Arc<dyn ConfigBackend>,
    mirror: Arc<dyn ConfigMirror>,
}

impl ConfigStore {
    #[must_use]
    pub fn new(backend: Arc<dyn ConfigBackend>, mirror: Arc<dyn ConfigMirror>) -> Self {
        Self { backend, mirror }
    }

    /// List configurations, cluster-wide or per namespace.
    ///
    /// A backend fault is logged and reported as an empty list.
    pub async fn list(&self, namespace: Option<&str>) -> Vec<ApplicationConfiguration> {
        match self.backend.list(namespace).await {
            Ok(configs) => configs,
            Err(e) => {
                error!("Failed to list configurations: {e}");
                Vec::new()
            }
        }
    }

    /// Get a configuration by identity. NotFound propagates distinctly from
    /// other backend failures.
    pub async fn get(&self, name: &str, namespace: &str) -> Result<ApplicationConfiguration> {
        self.backend.get(name, namespace).await
    }

    /// Persist a new configuration, stamping creation annotations.
    pub async fn create(
        &self,
        mut config: ApplicationConfiguration,
    ) -> Result<ApplicationConfiguration> {
        let now = Utc::now().to_rfc3339();
        let annotations = config
            .metadata
            .annotations
            .get_or_insert_with(BTreeMap::new);
        annotations.insert(CREATED_ANNOTATION.to_string(), now.clone());
        annotations.insert(LAST_MODIFIED_ANNOTATION.to_string(), now);

        let stored = self.backend.create(&config).await?;
        self.hand_off_sync(stored.clone());
        Ok(stored)
    }

    /// Persist changes to an existing configuration, stamping the
    /// modification annotation.
    pub async fn update(
        &self,
        mut config: ApplicationConfiguration,
    ) -> Result<ApplicationConfiguration> {
        let annotations = config
            .metadata
            .annotations
            .get_or_insert_with(BTreeMap::new);
        annotations.insert(LAST_MODIFIED_ANNOTATION.to_string(), Utc::now().to_rfc3339());

        let stored = self.backend.update(&config).await?;
        self.hand_off_sync(stored.clone());
        Ok(stored)
    }

    /// Delete a configuration by identity. Absence is success.
    pub async fn delete(&self, name: &str, namespace: &str) -> Result<()> {
        match self.backend.delete(name, namespace).await {
            Ok(()) => {
                self.hand_off_remove(name.to_string(), namespace.to_string());
                Ok(())
            }
            Err(Error::NotFound) => Ok(()),
            Err(e) => {
                error!("Failed to delete configuration {namespace}/{name}: {e}");
                Err(e)
            }
        }
    }

    /// Hand the stored configuration to the mirror without awaiting it.
    /// The primary write has already succeeded; a sync failure is only logged.
    fn hand_off_sync(&self, config: ApplicationConfiguration) {
        let mirror = Arc::clone(&self.mirror);
        tokio::spawn(async move {
            if let Err(e) = mirror.sync(&config).await {
                let name = config.metadata.name.as_deref().unwrap_or("<unnamed>");
                warn!("Mirror sync failed for configuration {name}: {e}");
            }
        });
    }

    fn hand_off_remove(&self, name: String, namespace: String) {
        let mirror = Arc::clone(&self.mirror);
        tokio::spawn(async move {
            if let Err(e) = mirror.remove(&name, &namespace).await {
                warn!("Mirror removal failed for configuration {namespace}/{name}: {e}");
            }
        });
    }
}

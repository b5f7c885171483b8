//! Manifest preview rendering
//!
//! Renders the cluster objects a configuration would expand into. The output
//! is only ever shown to humans for review; nothing here is applied.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::crds::{ApplicationConfiguration, EnvironmentConfig};
use crate::error::Result;

const API_VERSION: &str = "platform.idp/v1alpha1";

#[derive(Serialize)]
struct ManifestMeta {
    name: String,
    namespace: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WebApplicationManifest {
    api_version: String,
    kind: String,
    metadata: ManifestMeta,
    spec: WebApplicationSpec,
}

#[derive(Serialize)]
struct WebApplicationSpec {
    environments: BTreeMap<String, EnvironmentConfig>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DatabaseInstanceManifest {
    api_version: String,
    kind: String,
    metadata: ManifestMeta,
    spec: DatabaseInstanceSpec,
}

#[derive(Serialize)]
struct DatabaseInstanceSpec {
    #[serde(rename = "type")]
    engine: String,
    size: String,
    environment: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CacheInstanceManifest {
    api_version: String,
    kind: String,
    metadata: ManifestMeta,
    spec: CacheInstanceSpec,
}

#[derive(Serialize)]
struct CacheInstanceSpec {
    #[serde(rename = "type")]
    engine: String,
    size: String,
    nodes: i32,
    environment: String,
}

/// Render the YAML preview for a configuration.
///
/// Emits one `WebApplication` document plus one `DatabaseInstance` and/or
/// `CacheInstance` document per environment that requests them. Environments
/// are walked in map order, so identical input always renders identically.
pub fn render_preview(config: &ApplicationConfiguration) -> Result<String> {
    let namespace = config.metadata.namespace.clone().unwrap_or_default();
    let application = &config.spec.application;

    let mut documents = Vec::new();

    let web_app = WebApplicationManifest {
        api_version: API_VERSION.to_string(),
        kind: "WebApplication".to_string(),
        metadata: ManifestMeta {
            name: application.clone(),
            namespace: namespace.clone(),
        },
        spec: WebApplicationSpec {
            environments: config.spec.environments.clone(),
        },
    };
    documents.push(serde_yaml::to_string(&web_app)?);

    for (env_name, env_config) in &config.spec.environments {
        if let Some(database) = &env_config.database {
            let manifest = DatabaseInstanceManifest {
                api_version: API_VERSION.to_string(),
                kind: "DatabaseInstance".to_string(),
                metadata: ManifestMeta {
                    name: format!("{application}-{env_name}-db"),
                    namespace: namespace.clone(),
                },
                spec: DatabaseInstanceSpec {
                    engine: database.engine.clone(),
                    size: database.size.clone(),
                    environment: env_name.clone(),
                },
            };
            documents.push(serde_yaml::to_string(&manifest)?);
        }

        if let Some(cache) = &env_config.cache {
            let manifest = CacheInstanceManifest {
                api_version: API_VERSION.to_string(),
                kind: "CacheInstance".to_string(),
                metadata: ManifestMeta {
                    name: format!("{application}-{env_name}-cache"),
                    namespace: namespace.clone(),
                },
                spec: CacheInstanceSpec {
                    engine: cache.engine.clone(),
                    size: cache.size.clone(),
                    nodes: cache.nodes,
                    environment: env_name.clone(),
                },
            };
            documents.push(serde_yaml::to_string(&manifest)?);
        }
    }

    Ok(documents.join("\n---\n"))
}

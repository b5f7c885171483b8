//! Configuration template catalog
//!
//! Built-in templates plus any well-formed template documents found in the
//! configured directory. The catalog holds no state between queries; the
//! directory is re-scanned on every listing.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::warn;

use crate::crds::{
    ApplicationConfiguration, ApplicationConfigurationSpec, EnvironmentConfig, ResourceRequirements,
    ResourceSpec,
};
use crate::error::{Error, Result};
use kube::api::ObjectMeta;

/// Template category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum TemplateType {
    #[serde(rename = "web-app")]
    WebApp,
    #[serde(rename = "api-service")]
    ApiService,
    #[serde(rename = "worker")]
    Worker,
    #[serde(rename = "cron-job")]
    CronJob,
}

/// Partial spec carried by a template, merged into new configurations
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct TemplateSpec {
    #[serde(default)]
    pub environments: BTreeMap<String, EnvironmentConfig>,
}

/// Wrapper matching the template document layout (`configuration.spec`)
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct TemplateConfiguration {
    #[serde(default)]
    pub spec: TemplateSpec,
}

/// A named, typed, partial configuration
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ConfigurationTemplate {
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub template_type: TemplateType,
    pub configuration: TemplateConfiguration,
}

/// Catalog of built-in and directory-provided templates
#[derive(Debug, Clone)]
pub struct TemplateCatalog {
    templates_dir: Option<PathBuf>,
}

fn resources(req_cpu: &str, req_mem: &str, lim_cpu: &str, lim_mem: &str) -> ResourceSpec {
    ResourceSpec {
        requests: Some(ResourceRequirements {
            cpu: req_cpu.to_string(),
            memory: req_mem.to_string(),
        }),
        limits: Some(ResourceRequirements {
            cpu: lim_cpu.to_string(),
            memory: lim_mem.to_string(),
        }),
    }
}

fn builtin_templates() -> Vec<ConfigurationTemplate> {
    let mut web_envs = BTreeMap::new();
    web_envs.insert(
        "development".to_string(),
        EnvironmentConfig {
            replicas: 1,
            resources: resources("100m", "128Mi", "500m", "512Mi"),
            ..Default::default()
        },
    );
    web_envs.insert(
        "production".to_string(),
        EnvironmentConfig {
            replicas: 3,
            resources: resources("500m", "512Mi", "1000m", "1Gi"),
            ..Default::default()
        },
    );

    let mut api_envs = BTreeMap::new();
    api_envs.insert(
        "development".to_string(),
        EnvironmentConfig {
            replicas: 1,
            resources: resources("200m", "256Mi", "500m", "512Mi"),
            database: Some(crate::crds::DatabaseSpec {
                engine: "postgresql".to_string(),
                size: "small".to_string(),
                storage: "10Gi".to_string(),
                version: None,
            }),
            ..Default::default()
        },
    );
    api_envs.insert(
        "production".to_string(),
        EnvironmentConfig {
            replicas: 3,
            resources: resources("500m", "512Mi", "1000m", "1Gi"),
            database: Some(crate::crds::DatabaseSpec {
                engine: "postgresql".to_string(),
                size: "large".to_string(),
                storage: "10Gi".to_string(),
                version: None,
            }),
            ..Default::default()
        },
    );

    vec![
        ConfigurationTemplate {
            name: "web-application".to_string(),
            description: "Standard web application with load balancer".to_string(),
            template_type: TemplateType::WebApp,
            configuration: TemplateConfiguration {
                spec: TemplateSpec {
                    environments: web_envs,
                },
            },
        },
        ConfigurationTemplate {
            name: "api-service".to_string(),
            description: "REST API service with database".to_string(),
            template_type: TemplateType::ApiService,
            configuration: TemplateConfiguration {
                spec: TemplateSpec {
                    environments: api_envs,
                },
            },
        },
    ]
}

impl TemplateCatalog {
    #[must_use]
    pub fn new(templates_dir: Option<PathBuf>) -> Self {
        Self { templates_dir }
    }

    /// List every available template, built-ins first.
    ///
    /// Malformed template files are skipped with a warning; a missing or
    /// unreadable directory only yields the built-ins.
    #[must_use]
    pub fn list(&self) -> Vec<ConfigurationTemplate> {
        let mut templates = builtin_templates();

        let Some(dir) = &self.templates_dir else {
            return templates;
        };

        let entries = match std::fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(_) => return templates,
        };

        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("yaml") {
                continue;
            }

            match std::fs::read_to_string(&path)
                .map_err(anyhow::Error::from)
                .and_then(|raw| {
                    serde_yaml::from_str::<ConfigurationTemplate>(&raw).map_err(anyhow::Error::from)
                }) {
                Ok(template) => templates.push(template),
                Err(e) => {
                    warn!("Failed to load template {}: {e}", path.display());
                }
            }
        }

        templates
    }

    /// Look up a template by name.
    pub fn get(&self, name: &str) -> Result<ConfigurationTemplate> {
        self.list()
            .into_iter()
            .find(|t| t.name == name)
            .ok_or_else(|| Error::TemplateNotFound(name.to_string()))
    }

    /// Instantiate a template into a fresh, unpersisted configuration.
    ///
    /// Creation is a separate step; the caller decides whether to submit the
    /// result to the store.
    pub fn apply(&self, template_name: &str, app_name: &str, namespace: &str) -> Result<ApplicationConfiguration> {
        let template = self.get(template_name)?;

        let mut labels = BTreeMap::new();
        labels.insert("app".to_string(), app_name.to_string());
        labels.insert("template".to_string(), template_name.to_string());

        Ok(ApplicationConfiguration {
            metadata: ObjectMeta {
                name: Some(format!("{app_name}-config")),
                namespace: Some(namespace.to_string()),
                labels: Some(labels),
                ..Default::default()
            },
            spec: ApplicationConfigurationSpec {
                application: app_name.to_string(),
                environments: template.configuration.spec.environments,
            },
        })
    }
}

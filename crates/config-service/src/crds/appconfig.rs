//! `ApplicationConfiguration` Custom Resource Definition

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Default function for `replicas` field
fn default_replicas() -> i32 {
    1
}

/// Default function for `min_replicas` field
fn default_min_replicas() -> i32 {
    1
}

/// Default function for `max_replicas` field
fn default_max_replicas() -> i32 {
    10
}

/// Default function for `target_cpu_utilization` field
fn default_target_cpu() -> i32 {
    70
}

/// Default function for ingress `path` field
fn default_ingress_path() -> String {
    "/".to_string()
}

/// Default function for database `storage` field
fn default_db_storage() -> String {
    "10Gi".to_string()
}

/// Default function for cache `nodes` field
fn default_cache_nodes() -> i32 {
    1
}

/// CPU and memory amounts for one side of a resource spec
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq, JsonSchema)]
pub struct ResourceRequirements {
    /// CPU requirement (e.g., "100m", "1")
    pub cpu: String,
    /// Memory requirement (e.g., "128Mi", "1Gi")
    pub memory: String,
}

/// Resource requests and limits for an environment's workload
#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq, Eq, JsonSchema)]
pub struct ResourceSpec {
    /// Requested resources
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requests: Option<ResourceRequirements>,

    /// Resource limits
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limits: Option<ResourceRequirements>,
}

/// Horizontal autoscaling policy for an environment
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq, JsonSchema)]
pub struct AutoscalingPolicy {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default = "default_min_replicas", rename = "minReplicas")]
    pub min_replicas: i32,

    #[serde(default = "default_max_replicas", rename = "maxReplicas")]
    pub max_replicas: i32,

    #[serde(default = "default_target_cpu", rename = "targetCPUUtilization")]
    pub target_cpu_utilization: i32,

    #[serde(
        default,
        rename = "targetMemoryUtilization",
        skip_serializing_if = "Option::is_none"
    )]
    pub target_memory_utilization: Option<i32>,
}

/// Ingress exposure policy for an environment
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq, JsonSchema)]
pub struct IngressPolicy {
    #[serde(default)]
    pub enabled: bool,

    /// Hostname to route (unset means cluster default)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,

    #[serde(default = "default_ingress_path")]
    pub path: String,

    #[serde(default)]
    pub tls: bool,

    #[serde(default)]
    pub annotations: BTreeMap<String, String>,
}

/// Managed database instance requested by an environment
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq, JsonSchema)]
pub struct DatabaseSpec {
    /// Database type: postgresql, mysql, redis, mongodb
    #[serde(rename = "type")]
    pub engine: String,

    /// Size class: small, medium, large
    pub size: String,

    #[serde(default = "default_db_storage")]
    pub storage: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// Managed cache instance requested by an environment
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq, JsonSchema)]
pub struct CacheSpec {
    /// Cache type: redis, memcached
    #[serde(rename = "type")]
    pub engine: String,

    /// Size class: small, medium, large
    pub size: String,

    #[serde(default = "default_cache_nodes")]
    pub nodes: i32,
}

/// Per-environment deployment settings
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq, JsonSchema)]
pub struct EnvironmentConfig {
    /// Desired replica count (must be positive)
    #[serde(default = "default_replicas")]
    pub replicas: i32,

    /// Resource requests and limits
    #[serde(default)]
    pub resources: ResourceSpec,

    /// Plain environment variables
    #[serde(default)]
    pub environment: BTreeMap<String, String>,

    /// Secret references (variable name to secret key)
    #[serde(default)]
    pub secrets: BTreeMap<String, String>,

    /// Autoscaling policy (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scaling: Option<AutoscalingPolicy>,

    /// Ingress policy (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ingress: Option<IngressPolicy>,

    /// Managed database instance (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<DatabaseSpec>,

    /// Managed cache instance (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache: Option<CacheSpec>,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            replicas: default_replicas(),
            resources: ResourceSpec::default(),
            environment: BTreeMap::new(),
            secrets: BTreeMap::new(),
            scaling: None,
            ingress: None,
            database: None,
            cache: None,
        }
    }
}

/// `ApplicationConfiguration` CRD for per-application deployment settings
///
/// Environments are kept in a `BTreeMap` so every serialization and preview
/// pass walks them in the same order.
#[derive(CustomResource, Deserialize, Serialize, Clone, Debug, JsonSchema)]
#[kube(group = "platform.idp", version = "v1alpha1", kind = "ApplicationConfiguration")]
#[kube(namespaced)]
#[kube(printcolumn = r#"{"name":"Application","type":"string","jsonPath":".spec.application"}"#)]
#[kube(printcolumn = r#"{"name":"Age","type":"date","jsonPath":".metadata.creationTimestamp"}"#)]
pub struct ApplicationConfigurationSpec {
    /// Application this configuration belongs to
    pub application: String,

    /// Environment name to deployment settings
    #[serde(default)]
    pub environments: BTreeMap<String, EnvironmentConfig>,
}

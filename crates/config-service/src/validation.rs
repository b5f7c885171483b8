//! Static validation rules for `ApplicationConfiguration` resources

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::crds::ApplicationConfiguration;

/// Outcome of validating a configuration
///
/// Errors block creation; warnings are advisory only.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct ValidationResult {
    pub valid: bool,
    #[serde(default)]
    pub errors: Vec<String>,
    #[serde(default)]
    pub warnings: Vec<String>,
}

/// Validate a configuration snapshot. Pure function, no I/O.
#[must_use]
pub fn validate(config: &ApplicationConfiguration) -> ValidationResult {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    if config
        .metadata
        .name
        .as_deref()
        .is_none_or(|name| name.is_empty())
    {
        errors.push("Configuration name is required".to_string());
    }

    if config
        .metadata
        .namespace
        .as_deref()
        .is_none_or(|ns| ns.is_empty())
    {
        errors.push("Namespace is required".to_string());
    }

    if config.spec.application.is_empty() {
        errors.push("Application name is required".to_string());
    }

    if config.spec.environments.is_empty() {
        warnings.push("No environments configured".to_string());
    }

    for (env_name, env_config) in &config.spec.environments {
        if env_config.replicas <= 0 {
            errors.push(format!("Invalid replica count for environment {env_name}"));
        }

        if env_config.resources.requests.is_none() || env_config.resources.limits.is_none() {
            warnings.push(format!(
                "Resource requests/limits not fully specified for environment {env_name}"
            ));
        }
    }

    ValidationResult {
        valid: errors.is_empty(),
        errors,
        warnings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crds::{
        ApplicationConfigurationSpec, EnvironmentConfig, ResourceRequirements, ResourceSpec,
    };
    use kube::api::ObjectMeta;
    use std::collections::BTreeMap;

    fn full_resources() -> ResourceSpec {
        ResourceSpec {
            requests: Some(ResourceRequirements {
                cpu: "100m".to_string(),
                memory: "128Mi".to_string(),
            }),
            limits: Some(ResourceRequirements {
                cpu: "500m".to_string(),
                memory: "512Mi".to_string(),
            }),
        }
    }

    fn config_with(
        name: Option<&str>,
        namespace: Option<&str>,
        application: &str,
        environments: BTreeMap<String, EnvironmentConfig>,
    ) -> ApplicationConfiguration {
        ApplicationConfiguration {
            metadata: ObjectMeta {
                name: name.map(String::from),
                namespace: namespace.map(String::from),
                ..Default::default()
            },
            spec: ApplicationConfigurationSpec {
                application: application.to_string(),
                environments,
            },
        }
    }

    #[test]
    fn test_missing_identity_fields_are_errors() {
        let result = validate(&config_with(None, None, "", BTreeMap::new()));
        assert!(!result.valid);
        assert!(result
            .errors
            .contains(&"Configuration name is required".to_string()));
        assert!(result.errors.contains(&"Namespace is required".to_string()));
        assert!(result
            .errors
            .contains(&"Application name is required".to_string()));
    }

    #[test]
    fn test_empty_string_name_is_an_error() {
        let result = validate(&config_with(Some(""), Some("ns1"), "shop", BTreeMap::new()));
        assert!(result
            .errors
            .contains(&"Configuration name is required".to_string()));
    }

    #[test]
    fn test_no_environments_is_warning_only() {
        let result = validate(&config_with(
            Some("shop-config"),
            Some("ns1"),
            "shop",
            BTreeMap::new(),
        ));
        assert!(result.valid);
        assert_eq!(result.errors, Vec::<String>::new());
        assert!(result
            .warnings
            .contains(&"No environments configured".to_string()));
    }

    #[test]
    fn test_non_positive_replicas_is_error_naming_environment() {
        let mut environments = BTreeMap::new();
        environments.insert(
            "staging".to_string(),
            EnvironmentConfig {
                replicas: 0,
                resources: full_resources(),
                ..Default::default()
            },
        );
        let result = validate(&config_with(
            Some("shop-config"),
            Some("ns1"),
            "shop",
            environments,
        ));
        assert!(!result.valid);
        assert!(result
            .errors
            .contains(&"Invalid replica count for environment staging".to_string()));
    }

    #[test]
    fn test_negative_replicas_is_error() {
        let mut environments = BTreeMap::new();
        environments.insert(
            "dev".to_string(),
            EnvironmentConfig {
                replicas: -3,
                resources: full_resources(),
                ..Default::default()
            },
        );
        let result = validate(&config_with(
            Some("shop-config"),
            Some("ns1"),
            "shop",
            environments,
        ));
        assert!(!result.valid);
    }

    #[test]
    fn test_positive_replicas_never_errors() {
        let mut environments = BTreeMap::new();
        environments.insert(
            "production".to_string(),
            EnvironmentConfig {
                replicas: 3,
                resources: full_resources(),
                ..Default::default()
            },
        );
        let result = validate(&config_with(
            Some("shop-config"),
            Some("ns1"),
            "shop",
            environments,
        ));
        assert!(result.valid);
        assert!(result.errors.is_empty());
    }

    #[test]
    fn test_missing_limits_is_warning_but_still_valid() {
        let mut environments = BTreeMap::new();
        environments.insert(
            "dev".to_string(),
            EnvironmentConfig {
                replicas: 1,
                resources: ResourceSpec {
                    requests: Some(ResourceRequirements {
                        cpu: "100m".to_string(),
                        memory: "128Mi".to_string(),
                    }),
                    limits: None,
                },
                ..Default::default()
            },
        );
        let result = validate(&config_with(
            Some("shop-config"),
            Some("ns1"),
            "shop",
            environments,
        ));
        assert!(result.valid);
        assert!(result
            .warnings
            .contains(&"Resource requests/limits not fully specified for environment dev".to_string()));
    }
}

//! Integration tests for the configuration REST surface.
//!
//! The cluster API is replaced with an in-memory backend so the full HTTP
//! stack (router, extractors, error mapping) is exercised over a real socket.

use async_trait::async_trait;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::RwLock;

use config_service::crds::ApplicationConfiguration;
use config_service::error::{Error, Result};
use config_service::mirror::GitMirror;
use config_service::server::{build_router, AppState};
use config_service::store::{ConfigBackend, ConfigStore};
use config_service::templates::TemplateCatalog;

// =============================================================================
// In-memory backend
// =============================================================================

/// Cluster API stand-in keyed by (namespace, name).
#[derive(Default)]
struct InMemoryBackend {
    objects: RwLock<HashMap<(String, String), ApplicationConfiguration>>,
}

fn key_of(config: &ApplicationConfiguration) -> (String, String) {
    (
        config.metadata.namespace.clone().unwrap_or_default(),
        config.metadata.name.clone().unwrap_or_default(),
    )
}

#[async_trait]
impl ConfigBackend for InMemoryBackend {
    async fn list(&self, namespace: Option<&str>) -> Result<Vec<ApplicationConfiguration>> {
        let objects = self.objects.read().await;
        let mut configs: Vec<ApplicationConfiguration> = objects
            .iter()
            .filter(|((ns, _), _)| namespace.is_none_or(|wanted| wanted == ns.as_str()))
            .map(|(_, config)| config.clone())
            .collect();
        configs.sort_by_key(key_of);
        Ok(configs)
    }

    async fn get(&self, name: &str, namespace: &str) -> Result<ApplicationConfiguration> {
        self.objects
            .read()
            .await
            .get(&(namespace.to_string(), name.to_string()))
            .cloned()
            .ok_or(Error::NotFound)
    }

    async fn create(&self, config: &ApplicationConfiguration) -> Result<ApplicationConfiguration> {
        self.objects
            .write()
            .await
            .insert(key_of(config), config.clone());
        Ok(config.clone())
    }

    async fn update(&self, config: &ApplicationConfiguration) -> Result<ApplicationConfiguration> {
        let mut objects = self.objects.write().await;
        let key = key_of(config);
        if !objects.contains_key(&key) {
            return Err(Error::NotFound);
        }
        objects.insert(key, config.clone());
        Ok(config.clone())
    }

    async fn delete(&self, name: &str, namespace: &str) -> Result<()> {
        self.objects
            .write()
            .await
            .remove(&(namespace.to_string(), name.to_string()))
            .map(|_| ())
            .ok_or(Error::NotFound)
    }
}

/// Start the service on a random port with an in-memory backend.
async fn start_service() -> SocketAddr {
    let backend = Arc::new(InMemoryBackend::default());
    let state = AppState {
        store: Arc::new(ConfigStore::new(backend, Arc::new(GitMirror::new(None)))),
        catalog: Arc::new(TemplateCatalog::new(None)),
    };

    let app = build_router(state);
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    // Wait for server to be ready
    tokio::time::sleep(Duration::from_millis(100)).await;

    addr
}

fn sample_payload(name: &str, namespace: &str) -> serde_json::Value {
    serde_json::json!({
        "metadata": { "name": name, "namespace": namespace },
        "spec": {
            "application": "shop",
            "environments": {
                "development": {
                    "replicas": 1,
                    "resources": {
                        "requests": { "cpu": "100m", "memory": "128Mi" },
                        "limits": { "cpu": "500m", "memory": "512Mi" }
                    },
                    "database": { "type": "postgresql", "size": "small" }
                },
                "production": {
                    "replicas": 3,
                    "cache": { "type": "redis", "size": "medium" }
                }
            }
        }
    })
}

// =============================================================================
// Tests
// =============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let addr = start_service().await;
    let body: serde_json::Value = reqwest::get(format!("http://{addr}/health"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["status"], "healthy");
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn test_create_then_get_round_trip() {
    let addr = start_service().await;
    let client = reqwest::Client::new();

    let created: serde_json::Value = client
        .post(format!("http://{addr}/configurations"))
        .json(&sample_payload("shop-config", "ns1"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    // Creation stamps both timestamp annotations.
    assert!(created["metadata"]["annotations"]["created"].is_string());
    assert!(created["metadata"]["annotations"]["lastModified"].is_string());

    let fetched: serde_json::Value = client
        .get(format!("http://{addr}/configurations/ns1/shop-config"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(fetched["spec"]["application"], "shop");
    assert_eq!(
        fetched["spec"]["environments"]["production"]["replicas"],
        3
    );
}

#[tokio::test]
async fn test_get_unknown_configuration_is_404() {
    let addr = start_service().await;
    let response = reqwest::get(format!("http://{addr}/configurations/ns1/missing"))
        .await
        .unwrap();

    assert_eq!(response.status(), 404);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["detail"], "Configuration not found");
}

#[tokio::test]
async fn test_list_filters_by_namespace() {
    let addr = start_service().await;
    let client = reqwest::Client::new();

    for (name, ns) in [("a-config", "ns1"), ("b-config", "ns2")] {
        client
            .post(format!("http://{addr}/configurations"))
            .json(&sample_payload(name, ns))
            .send()
            .await
            .unwrap();
    }

    let all: Vec<serde_json::Value> = client
        .get(format!("http://{addr}/configurations"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(all.len(), 2);

    let ns1_only: Vec<serde_json::Value> = client
        .get(format!("http://{addr}/configurations/ns1"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(ns1_only.len(), 1);
    assert_eq!(ns1_only[0]["metadata"]["name"], "a-config");
}

#[tokio::test]
async fn test_update_forces_path_identity() {
    let addr = start_service().await;
    let client = reqwest::Client::new();

    client
        .post(format!("http://{addr}/configurations"))
        .json(&sample_payload("shop-config", "ns1"))
        .send()
        .await
        .unwrap();

    // Payload claims a different identity; the path wins.
    let mut payload = sample_payload("other-name", "other-ns");
    payload["spec"]["environments"]["production"]["replicas"] = serde_json::json!(5);

    let updated: serde_json::Value = client
        .put(format!("http://{addr}/configurations/ns1/shop-config"))
        .json(&payload)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(updated["metadata"]["name"], "shop-config");
    assert_eq!(updated["metadata"]["namespace"], "ns1");
    assert_eq!(updated["spec"]["environments"]["production"]["replicas"], 5);
    assert!(updated["metadata"]["annotations"]["lastModified"].is_string());
}

#[tokio::test]
async fn test_delete_is_idempotent_over_http() {
    let addr = start_service().await;
    let client = reqwest::Client::new();

    client
        .post(format!("http://{addr}/configurations"))
        .json(&sample_payload("shop-config", "ns1"))
        .send()
        .await
        .unwrap();

    for _ in 0..2 {
        let response = client
            .delete(format!("http://{addr}/configurations/ns1/shop-config"))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 200);
        let body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(body["message"], "Configuration deleted successfully");
    }
}

#[tokio::test]
async fn test_validate_endpoint_reports_itemized_errors() {
    let addr = start_service().await;
    let client = reqwest::Client::new();

    let payload = serde_json::json!({
        "metadata": {},
        "spec": { "application": "", "environments": { "dev": { "replicas": 0 } } }
    });

    let result: serde_json::Value = client
        .post(format!("http://{addr}/configurations/validate"))
        .json(&payload)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(result["valid"], false);
    let errors = result["errors"].as_array().unwrap();
    assert!(errors.contains(&serde_json::json!("Configuration name is required")));
    assert!(errors.contains(&serde_json::json!("Invalid replica count for environment dev")));
    // Missing requests/limits only warns.
    assert!(result["warnings"]
        .as_array()
        .unwrap()
        .iter()
        .any(|w| w.as_str().unwrap().contains("dev")));
}

#[tokio::test]
async fn test_preview_endpoint_renders_manifests() {
    let addr = start_service().await;
    let client = reqwest::Client::new();

    let body: serde_json::Value = client
        .post(format!("http://{addr}/configurations/preview"))
        .json(&sample_payload("shop-config", "ns1"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let preview = body["preview"].as_str().unwrap();
    assert_eq!(preview.split("\n---\n").count(), 3);
    assert!(preview.contains("name: shop-development-db"));
    assert!(preview.contains("name: shop-production-cache"));
}

#[tokio::test]
async fn test_template_listing_and_apply() {
    let addr = start_service().await;
    let client = reqwest::Client::new();

    let templates: Vec<serde_json::Value> = client
        .get(format!("http://{addr}/templates"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(templates.len(), 2);

    let applied: serde_json::Value = client
        .post(format!(
            "http://{addr}/templates/web-application/apply?application_name=foo&namespace=ns1"
        ))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(applied["metadata"]["name"], "foo-config");
    assert_eq!(applied["metadata"]["labels"]["app"], "foo");
    assert_eq!(applied["metadata"]["labels"]["template"], "web-application");
    assert_eq!(
        applied["spec"]["environments"]["development"]["replicas"],
        1
    );
    assert_eq!(
        applied["spec"]["environments"]["production"]["replicas"],
        3
    );

    // Applying does not persist anything.
    let response = client
        .get(format!("http://{addr}/configurations/ns1/foo-config"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn test_apply_unknown_template_is_404() {
    let addr = start_service().await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!(
            "http://{addr}/templates/no-such/apply?application_name=foo&namespace=ns1"
        ))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 404);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["detail"], "Template no-such not found");
}

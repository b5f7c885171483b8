//! HTTP surface for the configuration service

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    timeout::TimeoutLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{info, Level};

use crate::crds::ApplicationConfiguration;
use crate::error::Error;
use crate::manifests::render_preview;
use crate::store::ConfigStore;
use crate::templates::{ConfigurationTemplate, TemplateCatalog};
use crate::validation::{validate, ValidationResult};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Configuration store facade.
    pub store: Arc<ConfigStore>,
    /// Template catalog.
    pub catalog: Arc<TemplateCatalog>,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = match &self {
            Error::NotFound | Error::TemplateNotFound(_) => StatusCode::NOT_FOUND,
            Error::Backend(_) | Error::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(json!({ "detail": self.to_string() }))).into_response()
    }
}

/// Build the HTTP router for the configuration service.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
        .route(
            "/configurations",
            get(list_configurations).post(create_configuration),
        )
        .route("/configurations/validate", post(validate_configuration))
        .route("/configurations/preview", post(preview_configuration))
        .route(
            "/configurations/{namespace}",
            get(list_configurations_in_namespace),
        )
        .route(
            "/configurations/{namespace}/{name}",
            get(get_configuration)
                .put(update_configuration)
                .delete(delete_configuration),
        )
        .route("/templates", get(list_templates))
        .route("/templates/{name}/apply", post(apply_template))
        .layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                        .on_request(DefaultOnRequest::new().level(Level::INFO))
                        .on_response(DefaultOnResponse::new().level(Level::INFO)),
                )
                .layer(CorsLayer::permissive())
                .layer(TimeoutLayer::new(Duration::from_secs(30))),
        )
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// Readiness check endpoint.
async fn readiness_check() -> Json<Value> {
    Json(json!({
        "status": "ready",
        "service": "config-service",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

#[derive(Debug, Deserialize)]
struct ListQuery {
    namespace: Option<String>,
}

/// List configurations, optionally filtered by namespace.
async fn list_configurations(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Json<Vec<ApplicationConfiguration>> {
    Json(state.store.list(query.namespace.as_deref()).await)
}

/// List configurations in a specific namespace.
async fn list_configurations_in_namespace(
    State(state): State<AppState>,
    Path(namespace): Path<String>,
) -> Json<Vec<ApplicationConfiguration>> {
    Json(state.store.list(Some(&namespace)).await)
}

/// Get a specific configuration.
async fn get_configuration(
    State(state): State<AppState>,
    Path((namespace, name)): Path<(String, String)>,
) -> Result<Json<ApplicationConfiguration>, Error> {
    let config = state.store.get(&name, &namespace).await?;
    Ok(Json(config))
}

/// Create a new configuration.
async fn create_configuration(
    State(state): State<AppState>,
    Json(config): Json<ApplicationConfiguration>,
) -> Result<Json<ApplicationConfiguration>, Error> {
    let stored = state.store.create(config).await?;
    info!(
        "Created configuration {}",
        stored.metadata.name.as_deref().unwrap_or("<unnamed>")
    );
    Ok(Json(stored))
}

/// Update an existing configuration. The path identity wins over whatever
/// the payload carries.
async fn update_configuration(
    State(state): State<AppState>,
    Path((namespace, name)): Path<(String, String)>,
    Json(mut config): Json<ApplicationConfiguration>,
) -> Result<Json<ApplicationConfiguration>, Error> {
    config.metadata.name = Some(name);
    config.metadata.namespace = Some(namespace);
    let stored = state.store.update(config).await?;
    Ok(Json(stored))
}

/// Delete a configuration. Deleting an absent identity succeeds.
async fn delete_configuration(
    State(state): State<AppState>,
    Path((namespace, name)): Path<(String, String)>,
) -> Result<Json<Value>, Error> {
    state.store.delete(&name, &namespace).await?;
    Ok(Json(json!({ "message": "Configuration deleted successfully" })))
}

/// Validate a configuration without persisting it.
async fn validate_configuration(
    Json(config): Json<ApplicationConfiguration>,
) -> Json<ValidationResult> {
    Json(validate(&config))
}

/// Render the YAML manifest preview for a configuration.
async fn preview_configuration(
    Json(config): Json<ApplicationConfiguration>,
) -> Result<Json<Value>, Error> {
    let preview = render_preview(&config)?;
    Ok(Json(json!({ "preview": preview })))
}

/// List available templates.
async fn list_templates(State(state): State<AppState>) -> Json<Vec<ConfigurationTemplate>> {
    Json(state.catalog.list())
}

#[derive(Debug, Deserialize)]
struct ApplyTemplateQuery {
    application_name: String,
    namespace: String,
}

/// Instantiate a template into a new, unpersisted configuration.
async fn apply_template(
    State(state): State<AppState>,
    Path(template_name): Path<String>,
    Query(query): Query<ApplyTemplateQuery>,
) -> Result<Json<ApplicationConfiguration>, Error> {
    let config = state
        .catalog
        .apply(&template_name, &query.application_name, &query.namespace)?;
    Ok(Json(config))
}

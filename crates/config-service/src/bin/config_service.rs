/*
 * IDP Platform - Configuration Manager Service
 * Copyright (C) 2025 IDP Platform
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU Affero General Public License as published
 * by the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
 * GNU Affero General Public License for more details.
 *
 * You should have received a copy of the GNU Affero General Public License
 * along with this program. If not, see <https://www.gnu.org/licenses/>.
 */

//! Configuration Manager Service
//!
//! REST API for managing `ApplicationConfiguration` custom resources:
//! - CRUD delegation to the cluster API
//! - Static validation and manifest preview rendering
//! - Template catalog and instantiation
//! - Best-effort GitOps mirror hand-off

use std::sync::Arc;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use config_service::config::ServiceConfig;
use config_service::mirror::GitMirror;
use config_service::server::{build_router, AppState};
use config_service::store::{ConfigStore, KubeBackend};
use config_service::templates::TemplateCatalog;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,config_service=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting Configuration Manager Service v{}",
        env!("CARGO_PKG_VERSION")
    );

    let service_config = ServiceConfig::from_env();

    // Initialize Kubernetes client
    let client = kube::Client::try_default().await?;
    info!("Connected to Kubernetes cluster");

    let backend = Arc::new(KubeBackend::new(client));
    let mirror = Arc::new(GitMirror::new(service_config.git_repo_url.clone()));
    let state = AppState {
        store: Arc::new(ConfigStore::new(backend, mirror)),
        catalog: Arc::new(TemplateCatalog::new(service_config.templates_dir.clone())),
    };

    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&service_config.bind_addr).await?;
    info!(
        "Configuration service listening on {}",
        service_config.bind_addr
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Configuration service stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C, shutting down gracefully");
        },
        () = terminate => {
            info!("Received SIGTERM, shutting down gracefully");
        },
    }
}

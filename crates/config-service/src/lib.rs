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

#![allow(clippy::missing_errors_doc)]

//! Configuration service core library
//!
//! REST facade over `ApplicationConfiguration` custom resources: CRUD
//! delegation to the cluster API, static validation, manifest preview
//! rendering, and a template catalog.

pub mod config;
pub mod crds;
pub mod error;
pub mod manifests;
pub mod mirror;
pub mod server;
pub mod store;
pub mod templates;
pub mod validation;

// Re-export commonly used types
pub use config::ServiceConfig;
pub use crds::{ApplicationConfiguration, ApplicationConfigurationSpec, EnvironmentConfig};
pub use error::{Error, Result};
pub use validation::{validate, ValidationResult};

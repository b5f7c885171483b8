/*
 * IDP Platform - Operations Flow Client
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

//! Windmill flow client and platform operation wrappers
//!
//! Submit-and-poll access to the platform's Windmill flows, plus the
//! operation surface (bootstrap, operations, health) rendered as text.

pub mod client;
pub mod config;
pub mod ops;

pub use client::{ClientError, JobOutcome, WindmillClient};
pub use config::WindmillConfig;

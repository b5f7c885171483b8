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

//! Platform operations CLI
//!
//! Drives the platform's Windmill flows from the command line: bootstrap the
//! platform, run operational tasks, and render health reports.

use clap::{Parser, Subcommand};
use colored::Colorize;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use opsflow::ops::{
    bootstrap_platform, configuration_action, health_report, run_operation, BootstrapParams,
    OperationParams,
};
use opsflow::{WindmillClient, WindmillConfig};

/// Platform operations via Windmill flows
#[derive(Parser)]
#[command(name = "opsflow")]
#[command(about = "Bootstrap and operate the platform through Windmill flows")]
#[command(version)]
struct Cli {
    /// Windmill server URL
    #[arg(long, env = "WINDMILL_URL", global = true)]
    base_url: Option<String>,

    /// Authentication token
    #[arg(long, env = "WINDMILL_TOKEN", global = true)]
    token: Option<String>,

    /// Windmill workspace
    #[arg(long, env = "WINDMILL_WORKSPACE", global = true)]
    workspace: Option<String>,

    /// Total seconds to wait for a job result
    #[arg(long, global = true)]
    timeout: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Bootstrap the complete platform from scratch
    Bootstrap {
        /// Platform name
        #[arg(long, default_value = "IDP Platform")]
        platform_name: String,

        /// Target environment (development/staging/production)
        #[arg(long, default_value = "development")]
        environment: String,

        /// Skip the monitoring stack
        #[arg(long)]
        no_monitoring: bool,

        /// Skip authentication setup
        #[arg(long)]
        no_auth: bool,

        /// Skip Backstage installation
        #[arg(long)]
        skip_backstage: bool,

        /// Test mode without making actual changes
        #[arg(long)]
        dry_run: bool,
    },
    /// Run an operational task against platform services
    Operations {
        /// Operation type (start/stop/restart/status/health)
        #[arg(long, default_value = "status")]
        operation: String,

        /// Specific services to operate on (repeatable; empty means all)
        #[arg(long)]
        service: Vec<String>,

        /// Test mode without making actual changes
        #[arg(long)]
        dry_run: bool,
    },
    /// Run health checks and render a report
    Health {
        /// Run a lighter subset of checks
        #[arg(long)]
        basic: bool,
    },
    /// Configuration management actions
    Config {
        /// Action (show/validate/wizard)
        #[arg(long, default_value = "show")]
        action: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn,opsflow=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let mut config = WindmillConfig::from_env();
    if let Some(base_url) = cli.base_url {
        config.base_url = base_url;
    }
    if let Some(token) = cli.token {
        config.token = Some(token);
    }
    if let Some(workspace) = cli.workspace {
        config.workspace = workspace;
    }
    if let Some(timeout) = cli.timeout {
        config.timeout = Duration::from_secs(timeout);
    }

    let client = WindmillClient::new(config)?;

    let output = match cli.command {
        Commands::Bootstrap {
            platform_name,
            environment,
            no_monitoring,
            no_auth,
            skip_backstage,
            dry_run,
        } => {
            let params = BootstrapParams {
                platform_name,
                environment,
                enable_monitoring: !no_monitoring,
                enable_auth: !no_auth,
                skip_backstage,
                dry_run,
            };
            println!("{}", "Submitting platform bootstrap...".bold());
            bootstrap_platform(&client, &params).await
        }
        Commands::Operations {
            operation,
            service,
            dry_run,
        } => {
            let params = OperationParams {
                operation,
                services: service,
                comprehensive_health: true,
                dry_run,
            };
            run_operation(&client, &params).await
        }
        Commands::Health { basic } => health_report(&client, !basic).await,
        Commands::Config { action } => configuration_action(&action),
    };

    println!("{output}");
    Ok(())
}

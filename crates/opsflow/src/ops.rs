//! Platform operation wrappers
//!
//! Each operation submits a fixed flow with a typed argument payload and
//! renders the outcome as human-readable text. Failures and timeouts come
//! back as text too; callers never have to unwrap an error to show the user
//! what happened.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::client::{JobOutcome, WindmillClient};

const BOOTSTRAP_FLOW: &str = "f/idp/bootstrap-platform";
const OPERATIONS_FLOW: &str = "f/idp/platform-operations";

fn default_platform_name() -> String {
    "IDP Platform".to_string()
}

fn default_environment() -> String {
    "development".to_string()
}

fn default_true() -> bool {
    true
}

fn default_operation() -> String {
    "status".to_string()
}

/// Arguments for the platform bootstrap flow
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BootstrapParams {
    #[serde(default = "default_platform_name")]
    pub platform_name: String,
    /// Target environment (development/staging/production)
    #[serde(default = "default_environment")]
    pub environment: String,
    #[serde(default = "default_true")]
    pub enable_monitoring: bool,
    #[serde(default = "default_true")]
    pub enable_auth: bool,
    #[serde(default)]
    pub skip_backstage: bool,
    /// Test mode without making actual changes
    #[serde(default)]
    pub dry_run: bool,
}

impl Default for BootstrapParams {
    fn default() -> Self {
        Self {
            platform_name: default_platform_name(),
            environment: default_environment(),
            enable_monitoring: true,
            enable_auth: true,
            skip_backstage: false,
            dry_run: false,
        }
    }
}

/// Arguments for the platform operations flow
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationParams {
    /// Operation type (start/stop/restart/status/health)
    #[serde(default = "default_operation")]
    pub operation: String,
    /// Specific services to operate on (empty means all)
    #[serde(default)]
    pub services: Vec<String>,
    #[serde(default = "default_true")]
    pub comprehensive_health: bool,
    #[serde(default)]
    pub dry_run: bool,
}

impl Default for OperationParams {
    fn default() -> Self {
        Self {
            operation: default_operation(),
            services: Vec::new(),
            comprehensive_health: true,
            dry_run: false,
        }
    }
}

/// Bootstrap the complete platform from scratch.
pub async fn bootstrap_platform(client: &WindmillClient, params: &BootstrapParams) -> String {
    let args = json!({
        "platform_name": params.platform_name,
        "environment": params.environment,
        "enable_monitoring": params.enable_monitoring,
        "enable_auth": params.enable_auth,
        "skip_backstage": params.skip_backstage,
        "dry_run": params.dry_run,
    });

    let outcome = client.run_flow(BOOTSTRAP_FLOW, &args).await;
    format_bootstrap_outcome(&outcome)
}

/// Run an operational task (start/stop/restart/status/health).
pub async fn run_operation(client: &WindmillClient, params: &OperationParams) -> String {
    let args = json!({
        "operation": params.operation,
        "services": params.services,
        "comprehensive_health": params.comprehensive_health,
        "dry_run": params.dry_run,
    });

    let outcome = client.run_flow(OPERATIONS_FLOW, &args).await;
    format_operation_outcome(&params.operation, &outcome)
}

/// Run a health check and render a full report.
pub async fn health_report(client: &WindmillClient, comprehensive: bool) -> String {
    let args = json!({
        "operation": "health",
        "comprehensive_health": comprehensive,
    });

    let outcome = client.run_flow(OPERATIONS_FLOW, &args).await;
    format_health_outcome(&outcome)
}

/// Configuration management actions (show/validate/wizard).
///
/// TODO: wire to the configuration-manager flow once it lands in Windmill.
#[must_use]
pub fn configuration_action(action: &str) -> String {
    format!(
        "⚙️ Platform Configuration - {}\n\n\
         Available actions: show, validate, wizard\n\
         Current action: {action}\n\
         Status: Not yet implemented in Windmill flows\n",
        action.to_uppercase()
    )
}

fn completed_result<'a>(context: &str, outcome: &'a JobOutcome) -> Result<&'a Value, String> {
    match outcome {
        JobOutcome::Completed { result, .. } => Ok(result),
        JobOutcome::Failed { error } => Err(format!("❌ Failed to execute {context}: {error}")),
        JobOutcome::TimedOut => Err(format!("❌ Failed to execute {context}: job timed out")),
    }
}

fn join_list(items: Option<&Vec<Value>>) -> String {
    let joined = items
        .map(|values| {
            values
                .iter()
                .filter_map(Value::as_str)
                .collect::<Vec<_>>()
                .join(", ")
        })
        .unwrap_or_default();
    if joined.is_empty() {
        "None".to_string()
    } else {
        joined
    }
}

fn format_bootstrap_outcome(outcome: &JobOutcome) -> String {
    let result = match completed_result("bootstrap", outcome) {
        Ok(result) => result,
        Err(text) => return text,
    };

    if result["success"].as_bool().unwrap_or(false) {
        let results = &result["results"];
        format!(
            "✅ Platform bootstrap completed successfully!\n\n\
             Status: {}\n\
             Duration: {}s\n\
             Platform URLs: {}\n\n\
             Summary: {}\n",
            results["status"].as_str().unwrap_or("unknown"),
            results["duration"].as_str().unwrap_or("unknown"),
            serde_json::to_string_pretty(&result["platform_urls"]).unwrap_or_default(),
            result["summary"].as_str().unwrap_or("No summary available"),
        )
    } else {
        format!(
            "❌ Platform bootstrap failed!\n\n\
             Failed steps: {}\n\
             Warnings: {}\n\
             Error details: {}\n",
            join_list(result["failed_steps"].as_array()),
            join_list(result["warnings"].as_array()),
            result["results"]["error"].as_str().unwrap_or("Unknown error"),
        )
    }
}

fn format_operation_outcome(operation: &str, outcome: &JobOutcome) -> String {
    let result = match completed_result(operation, outcome) {
        Ok(result) => result,
        Err(text) => return text,
    };

    if result["success"].as_bool().unwrap_or(false) {
        let results = &result["results"];
        format!(
            "✅ Platform {operation} completed successfully!\n\n\
             Status: {}\n\
             Duration: {}s\n\n\
             Services:\n{}\n\n\
             Summary: {}\n",
            results["status"].as_str().unwrap_or("unknown"),
            results["duration"].as_str().unwrap_or("unknown"),
            serde_json::to_string_pretty(&results["services"]).unwrap_or_default(),
            result["summary"].as_str().unwrap_or("No summary available"),
        )
    } else {
        format!(
            "❌ Platform {operation} failed!\n\n\
             Failed steps: {}\n\
             Warnings: {}\n",
            join_list(result["failed_steps"].as_array()),
            join_list(result["warnings"].as_array()),
        )
    }
}

fn format_component_status(components: &Value) -> String {
    let Some(map) = components.as_object() else {
        return "No component data available".to_string();
    };
    if map.is_empty() {
        return "No component data available".to_string();
    }

    map.iter()
        .map(|(name, info)| {
            if info.is_object() {
                format!(
                    "  {name}: {} (Score: {}/100)",
                    info["status"].as_str().unwrap_or("unknown").to_uppercase(),
                    info["score"].as_i64().unwrap_or(0),
                )
            } else {
                format!("  {name}: {info}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_recommendations(recommendations: &Value) -> String {
    let items: Vec<String> = recommendations
        .as_array()
        .map(|values| {
            values
                .iter()
                .filter_map(Value::as_str)
                .map(|rec| format!("  • {rec}"))
                .collect()
        })
        .unwrap_or_default();

    if items.is_empty() {
        "No recommendations".to_string()
    } else {
        items.join("\n")
    }
}

fn format_health_outcome(outcome: &JobOutcome) -> String {
    let result = match completed_result("health check", outcome) {
        Ok(result) => result,
        Err(text) => return text,
    };

    if !result["success"].as_bool().unwrap_or(false) {
        return format!(
            "❌ Health check operation failed: {}",
            result["error"].as_str().unwrap_or("Unknown error")
        );
    }

    // The health payload lives in the output of the health-check step.
    let health_step = result["results"]["steps"]
        .as_array()
        .and_then(|steps| {
            steps
                .iter()
                .find(|step| step["name"].as_str() == Some("health-check"))
        })
        .map(|step| &step["output"]);

    let Some(health_step) = health_step else {
        return "❌ Health check failed to complete successfully".to_string();
    };
    if !health_step["success"].as_bool().unwrap_or(false) {
        return "❌ Health check failed to complete successfully".to_string();
    }

    let health_data = &health_step["output"];
    format!(
        "🏥 Platform Health Report\n\n\
         Overall Status: {}\n\
         Health Score: {}/100\n\n\
         Component Status:\n{}\n\n\
         Service URLs:\n{}\n\n\
         Recommendations:\n{}\n",
        health_data["overall_status"]
            .as_str()
            .unwrap_or("unknown")
            .to_uppercase(),
        health_data["health_score"].as_i64().unwrap_or(0),
        format_component_status(&health_data["components"]),
        serde_json::to_string_pretty(&health_data["urls"]).unwrap_or_default(),
        format_recommendations(&health_data["recommendations"]),
    )
}

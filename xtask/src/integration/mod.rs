//! Integration test infrastructure.
//!
//! Starts DynamoDB Local in a container and runs the feature-gated
//! `singletable` integration suite against it.
//!
//! # Usage
//!
//! ```bash
//! # Start DynamoDB Local, run the suite, stop the container
//! cargo xtask integration
//!
//! # Skip container management (assumes DynamoDB Local is already running)
//! cargo xtask integration --no-docker
//! ```

mod containers;
pub mod error;

pub use error::{IntegrationError, Result};

use std::time::Duration;

use tracing::{debug, info, warn};

use containers::{
    detect_runtime, endpoint_url, is_running, start_container, stop_container, test_environment,
    wait_for_health, ContainerRuntime, DYNAMODB_SPEC,
};

use crate::prelude::*;

/// Integration test command.
#[derive(Debug, clap::Parser)]
#[command(long_about = "Run the integration suite against DynamoDB Local.

This command starts a DynamoDB Local container, runs
`cargo test -p singletable --features integration` against it, and stops
the container afterward. Each test provisions and tears down its own table.")]
pub struct IntegrationCommand {
    /// Skip Docker container management (assume DynamoDB Local is running).
    #[arg(long)]
    pub no_docker: bool,

    /// Keep the container running after tests complete.
    #[arg(long)]
    pub keep_containers: bool,

    /// Timeout in seconds for container health checks.
    #[arg(long, default_value = "30")]
    pub health_timeout: u64,

    /// Endpoint used with `--no-docker`.
    #[arg(long, env = "AWS_ENDPOINT_URL")]
    pub endpoint: Option<String>,
}

/// Main entry point for integration command.
pub async fn run(command: IntegrationCommand, global: crate::Global) -> Result<()> {
    if !global.is_silent() {
        aprintln!("{}", p_b("Integration Tests"));
        aprintln!();
    }

    let runtime = if command.no_docker {
        if !global.is_silent() {
            aprintln!(
                "{} {}",
                p_y("⚠️"),
                "Skipping DynamoDB container management (--no-docker)"
            );
        }
        None
    } else {
        let runtime = detect_runtime().await?;
        debug!(?runtime, "Detected container runtime");
        Some(runtime)
    };

    let started = match runtime {
        Some(rt) => start_dynamodb_container(command.health_timeout, &global, rt).await?,
        None => false,
    };

    let endpoint = match (&runtime, command.endpoint) {
        (None, Some(endpoint)) => endpoint,
        _ => endpoint_url(&DYNAMODB_SPEC),
    };
    let passed = run_tests(&endpoint, &global).await;

    if started {
        if let Some(rt) = runtime {
            if command.keep_containers {
                if !global.is_silent() {
                    aprintln!("{} {}", p_y("⚠️"), "Container left running (--keep-containers)");
                }
            } else {
                stop_dynamodb_container(&global, rt).await;
            }
        }
    }

    let passed = passed?;
    info!(passed, "Integration suite finished");

    aprintln!();
    if passed {
        aprintln!("{} {}", p_g("✅"), p_g("All integration tests passed!"));
        Ok(())
    } else {
        aprintln!("{} {}", p_r("❌"), p_r("Some integration tests failed"));
        Err(IntegrationError::TestFailed(
            "singletable integration suite failed".to_string(),
        ))
    }
}

/// Runs the suite against `endpoint`, returning whether it passed.
async fn run_tests(endpoint: &str, global: &crate::Global) -> Result<bool> {
    if !global.is_silent() {
        aprintln!("{} Running against {}", p_b("  →"), p_y(endpoint));
    }

    let mut cmd = tokio::process::Command::new("cargo");
    cmd.args(["test", "-p", "singletable", "--features", "integration"]);

    for (key, value) in test_environment(endpoint) {
        cmd.env(key, value);
    }

    info!(endpoint = %endpoint, "Running integration suite");
    let status = cmd.status().await?;
    debug!(%status, "cargo test exited");
    Ok(status.success())
}

/// Start the DynamoDB Local container. Returns false if one was already running.
async fn start_dynamodb_container(
    timeout_secs: u64,
    global: &crate::Global,
    runtime: ContainerRuntime,
) -> Result<bool> {
    if is_running(runtime, &DYNAMODB_SPEC).await? {
        warn!(
            container = DYNAMODB_SPEC.name,
            "Container already running; leaving it in place"
        );
        if !global.is_silent() {
            aprintln!(
                "{} {}",
                p_y("⚠️"),
                "DynamoDB Local container already running"
            );
        }
        return Ok(false);
    }

    if !global.is_silent() {
        aprintln!("{} {}", p_b("🐳"), "Starting DynamoDB Local container...");
    }

    start_container(runtime, &DYNAMODB_SPEC).await?;

    if !global.is_silent() {
        aprintln!(
            "{} {}",
            p_b("⏳"),
            format!("Waiting for container health (max {}s)...", timeout_secs)
        );
    }

    wait_for_health(&DYNAMODB_SPEC, Duration::from_secs(timeout_secs)).await?;
    info!(container = DYNAMODB_SPEC.name, "DynamoDB Local is healthy");

    if !global.is_silent() {
        aprintln!("{} {}", p_g("✅"), "DynamoDB Local is ready");
    }

    Ok(true)
}

/// Stop the DynamoDB Local container.
async fn stop_dynamodb_container(global: &crate::Global, runtime: ContainerRuntime) {
    if !global.is_silent() {
        aprintln!("{} {}", p_b("🐳"), "Stopping DynamoDB Local container...");
    }

    stop_container(runtime, DYNAMODB_SPEC.name).await;
    info!(container = DYNAMODB_SPEC.name, "Container stopped");

    if !global.is_silent() {
        aprintln!("{} {}", p_g("✅"), "DynamoDB container stopped");
    }
}

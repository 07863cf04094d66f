//! Manual table provisioning and teardown.

mod error;

pub use error::{Result, TableError};

use dialoguer::Confirm;
use singletable::backend::DynamoDbBackend;
use singletable::config::Config;
use singletable::lifecycle::{generate_table_name, TableManager, TeardownOutcome};
use singletable_core::table::single_table_schema;
use tracing::info;

use crate::prelude::*;

/// Table lifecycle commands.
#[derive(Debug, clap::Parser)]
pub struct TableCommand {
    #[command(subcommand)]
    pub action: TableAction,
}

/// Available table actions.
#[derive(Debug, clap::Subcommand)]
pub enum TableAction {
    /// Create a table and wait until it is active.
    Provision(ProvisionCommand),

    /// Request deletion of a table.
    Teardown(TeardownCommand),
}

/// Create a single-table schema and wait for it.
#[derive(Debug, clap::Parser)]
#[command(long_about = "Create a table with the single-table schema and wait until it is active.

The table uses `pk` (HASH, S) and `sk` (RANGE, S) with on-demand billing.
When no name is given, a fresh `<unix-seconds>_<uuid>` name is generated.

Environment variables:
  AWS_ENDPOINT_URL                          - Use local DynamoDB (e.g., http://localhost:8000)
  AWS_REGION                                - AWS region (defaults to us-east-1)
  SINGLETABLE_PROVISION_INITIAL_DELAY_MS    - Sleep before the first poll (default: 1000)
  SINGLETABLE_PROVISION_POLL_INTERVAL_MS    - Sleep between polls (default: 3000)
  SINGLETABLE_PROVISION_TIMEOUT_SECS        - Give up after this long (default: 60)")]
pub struct ProvisionCommand {
    /// Table name to use (generated when omitted).
    #[arg(long)]
    pub table_name: Option<String>,
}

/// Delete a table without waiting for it to disappear.
#[derive(Debug, clap::Parser)]
pub struct TeardownCommand {
    /// Table name to delete.
    #[arg(long)]
    pub table_name: String,

    /// Skip confirmation prompts.
    #[arg(long)]
    pub force: bool,
}

/// Main entry point for table command.
pub async fn run(command: TableCommand, global: crate::Global) -> Result<()> {
    let config = Config::from_env();

    if !global.is_silent() {
        aprintln!("{} {}", p_b("Target:"), config.target_display());
        aprintln!();
    }

    let backend = DynamoDbBackend::from_config(&config).await;
    let manager = TableManager::new(backend).with_policy(config.provision);

    match command.action {
        TableAction::Provision(cmd) => run_provision(cmd, &manager, &global).await,
        TableAction::Teardown(cmd) => run_teardown(cmd, &manager, &global).await,
    }
}

async fn run_provision(
    cmd: ProvisionCommand,
    manager: &TableManager<DynamoDbBackend>,
    global: &crate::Global,
) -> Result<()> {
    let table_name = cmd.table_name.unwrap_or_else(generate_table_name);

    if !global.is_silent() {
        aprintln!("{}", p_y("Provision Plan:"));
        for line in single_table_schema(&table_name).summary_lines() {
            aprintln!("  {}", line);
        }
        aprintln!();
    }

    let table = manager.provision(&table_name).await?;

    if !global.is_silent() {
        aprintln!("{} Table {} is active", p_g("✅"), p_b(table.name()));
    }
    // Always on stdout, for scripts.
    println!("{}", table.name());

    Ok(())
}

async fn run_teardown(
    cmd: TeardownCommand,
    manager: &TableManager<DynamoDbBackend>,
    global: &crate::Global,
) -> Result<()> {
    if !cmd.force {
        let confirmed = Confirm::new()
            .with_prompt(format!(
                "Delete table '{}'? ALL DATA WILL BE LOST",
                cmd.table_name
            ))
            .default(false)
            .interact()
            .map_err(|e| TableError::Prompt(e.to_string()))?;

        if !confirmed {
            info!(table = %cmd.table_name, "Teardown cancelled at prompt");
            return Err(TableError::UserCancelled);
        }
    }

    match manager.teardown_table(&cmd.table_name).await {
        TeardownOutcome::Deleted => {
            if !global.is_silent() {
                aprintln!("{} Delete requested for {}", p_g("✅"), p_b(&cmd.table_name));
            }
            Ok(())
        }
        TeardownOutcome::Failed(source) => Err(TableError::TeardownFailed {
            table_name: cmd.table_name,
            source,
        }),
    }
}

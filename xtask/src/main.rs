//! See <https://github.com/matklad/cargo-xtask/>
//!
//! This binary defines various auxiliary build commands, which are not
//! expressible with just `cargo`.
//!
//! The binary is integrated into the `cargo` command line by using an
//! alias in `.cargo/config`.

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod integration;
mod prelude;
mod table;

/// Development tasks for the singletable repository
#[derive(Debug, Parser)]
#[command(name = "xtask")]
#[command(about = "Development tasks for singletable", long_about = None)]
struct Cli {
    #[command(flatten)]
    global: Global,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, clap::Args)]
pub struct Global {
    /// Silence the command output
    #[clap(long, global = true)]
    pub silent: bool,

    /// Enable verbose output
    #[clap(long, global = true)]
    pub verbose: bool,
}

impl Global {
    pub fn is_silent(&self) -> bool {
        self.silent
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// Log filter used when `RUST_LOG` is unset.
    fn default_filter(&self) -> &'static str {
        if self.is_verbose() {
            "singletable=debug,xtask=debug"
        } else if self.is_silent() {
            "singletable=warn,xtask=warn"
        } else {
            "singletable=info,xtask=info"
        }
    }
}

#[derive(Debug, clap::Subcommand)]
enum Commands {
    /// Provision or tear down a single-table schema by hand
    Table(table::TableCommand),

    /// Run the DynamoDB Local integration suite
    Integration(integration::IntegrationCommand),
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| cli.global.default_filter().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match cli.command {
        Commands::Table(table_cmd) => {
            table::run(table_cmd, cli.global).await?;
        }
        Commands::Integration(integration_cmd) => {
            integration::run(integration_cmd, cli.global).await?;
        }
    }

    Ok(())
}

//! Tether CLI
//!
//! Developer tool for inspecting, validating and running connector operations.

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

/// Tether - connector catalog and step runner
#[derive(Parser)]
#[command(name = "tether")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "tether.yaml")]
    config: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List registered integrations
    List,

    /// Show an integration's metadata and operation schemas
    Show {
        /// Integration identifier
        integration: String,
    },

    /// Run one action or trigger as a single step
    Run {
        /// Integration identifier
        integration: String,

        /// Action or trigger identifier
        operation: String,

        /// Step input as a JSON object
        #[arg(short, long, default_value = "{}")]
        input: String,

        /// Bearer token passed as resolved credentials
        #[arg(long, env = "TETHER_TOKEN", hide_env_values = true)]
        token: Option<String>,

        /// Invoke test mode instead of a real run
        #[arg(long)]
        test: bool,
    },

    /// Check the configuration and every registered integration
    Validate,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so command output on stdout stays machine-readable
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            cli.json
                .then(|| fmt::layer().json().with_writer(std::io::stderr)),
        )
        .with((!cli.json).then(|| fmt::layer().with_writer(std::io::stderr)))
        .init();

    match cli.command {
        Commands::List => {
            commands::list::run(&cli.config).await?;
        }
        Commands::Show { integration } => {
            commands::show::run(&cli.config, &integration).await?;
        }
        Commands::Run {
            integration,
            operation,
            input,
            token,
            test,
        } => {
            commands::run::run(
                &cli.config,
                &integration,
                &operation,
                &input,
                token.as_deref(),
                test,
            )
            .await?;
        }
        Commands::Validate => {
            commands::validate::run(&cli.config).await?;
        }
    }

    Ok(())
}

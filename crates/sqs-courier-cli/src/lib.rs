//! # SQS Courier CLI
//!
//! Command-line front end for the SQS Courier client:
//! - `send` a message to a FIFO queue
//! - print a queue's `attributes` as JSON
//! - `create` a queue that does not exist yet
//!
//! Logs go to stderr; command output goes to stdout.

use clap::{Parser, Subcommand};
use sqs_courier::{
    ClientConfig, ConfigurationError, MessageAttributeValue, MessageAttributes, QueueAttributes,
    QueueClient, QueueError,
};
use std::collections::BTreeMap;
use std::io::Write;
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;

/// Log filter used when neither `RUST_LOG` nor `--log-level` is given
pub const DEFAULT_LOG_FILTER: &str = "sqs_courier=info,sqs_courier_cli=info";

// ============================================================================
// CLI Structure
// ============================================================================

/// SQS Courier - send to and provision AWS SQS queues
#[derive(Debug, Parser)]
#[command(name = "sqs-courier")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Send messages to and provision AWS SQS queues")]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "SQS_COURIER_CONFIG")]
    pub config: Option<PathBuf>,

    /// AWS region, overriding the configuration
    #[arg(long)]
    pub region: Option<String>,

    /// SQS endpoint override, e.g. a local emulator
    #[arg(long)]
    pub endpoint_url: Option<String>,

    /// Logging filter
    #[arg(short, long, default_value = DEFAULT_LOG_FILTER)]
    pub log_level: String,

    /// Enable JSON logging
    #[arg(long)]
    pub json_logs: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Send a message to a FIFO queue
    Send {
        /// Target queue URL
        #[arg(long)]
        queue_url: String,

        /// Message group id
        #[arg(long)]
        group_id: String,

        /// String message attribute as KEY=VALUE (repeatable)
        #[arg(short, long = "attribute", value_parser = parse_key_value)]
        attributes: Vec<(String, String)>,

        /// Message body
        body: String,
    },

    /// Print all attributes of a queue as JSON
    Attributes {
        /// Queue URL
        #[arg(long)]
        queue_url: String,
    },

    /// Create a queue unless one with the same name exists
    Create {
        /// Queue name (use a `.fifo` suffix for FIFO queues)
        #[arg(long)]
        queue_name: String,

        /// Queue attribute as KEY=VALUE (repeatable)
        #[arg(short, long = "attribute", value_parser = parse_key_value)]
        attributes: Vec<(String, String)>,
    },
}

/// Parse a `KEY=VALUE` argument
pub fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected KEY=VALUE, got '{}'", raw)),
    }
}

// ============================================================================
// CLI Error Types
// ============================================================================

/// CLI-specific errors
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("Invalid argument: {arg} - {message}")]
    InvalidArgument { arg: String, message: String },

    #[error(transparent)]
    Queue(#[from] QueueError),

    #[error("Failed to write output: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialise output: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CliError {
    /// Process exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Configuration(_) => 1,
            Self::InvalidArgument { .. } => 2,
            Self::Queue(e) if e.is_queue_exists() => 4,
            Self::Queue(_) => 3,
            Self::Io(_) | Self::Serialization(_) => 5,
        }
    }
}

// ============================================================================
// Entry Point
// ============================================================================

/// Parse arguments, set up logging and configuration, then run the command
pub async fn run_cli() -> Result<(), CliError> {
    let cli = Cli::parse();

    initialize_logging(&cli)?;

    let config = load_configuration(&cli)?;
    info!(region = %config.region, "Connecting to SQS");
    let client = QueueClient::connect(&config).await;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    execute_command(&client, cli.command, &mut out).await
}

/// Install the global tracing subscriber. `RUST_LOG` wins over `--log-level`.
fn initialize_logging(cli: &Cli) -> Result<(), CliError> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&cli.log_level))
        .map_err(|e| CliError::InvalidArgument {
            arg: "--log-level".to_string(),
            message: e.to_string(),
        })?;

    let registry = tracing_subscriber::registry().with(filter);
    let result = if cli.json_logs {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .try_init()
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init()
    };

    result.map_err(|e| CliError::InvalidArgument {
        arg: "--log-level".to_string(),
        message: format!("failed to initialise logging: {}", e),
    })
}

/// Build the client configuration: file and environment first, then flags
pub fn load_configuration(cli: &Cli) -> Result<ClientConfig, CliError> {
    let mut config = ClientConfig::load(cli.config.as_deref())?;

    if let Some(region) = &cli.region {
        config.region = region.clone();
    }
    if let Some(endpoint) = &cli.endpoint_url {
        config.endpoint_url = Some(endpoint.clone());
    }

    config.validate()?;
    debug!(config = ?config, "Configuration loaded");
    Ok(config)
}

// ============================================================================
// Command Implementations
// ============================================================================

/// Run one command against `client`, writing its result to `out`
pub async fn execute_command(
    client: &QueueClient,
    command: Commands,
    out: &mut impl Write,
) -> Result<(), CliError> {
    match command {
        Commands::Send {
            queue_url,
            group_id,
            attributes,
            body,
        } => {
            let attributes: MessageAttributes = attributes
                .into_iter()
                .map(|(k, v)| (k, MessageAttributeValue::string(v)))
                .collect();

            client
                .send_message(&body, attributes, &group_id, &queue_url)
                .await?;
            writeln!(out, "sent")?;
        }
        Commands::Attributes { queue_url } => {
            let attributes: BTreeMap<String, String> = client
                .get_queue_attributes(&queue_url)
                .await?
                .into_iter()
                .collect();

            serde_json::to_writer_pretty(&mut *out, &attributes)?;
            writeln!(out)?;
        }
        Commands::Create {
            queue_name,
            attributes,
        } => {
            let attributes: QueueAttributes = attributes.into_iter().collect();
            let queue_url = client.create_if_not_exists(&queue_name, attributes).await?;
            writeln!(out, "{}", queue_url)?;
        }
    }

    Ok(())
}

//! Command-line argument structures for async-hub3 CLI tools.
//!
//! This module provides reusable clap argument structures for the `hub3-*` CLI tools.

use clap::{Parser, ValueEnum};
use std::time::Duration;

use crate::client::{ClientBuilder, DEFAULT_HOST};
use crate::{Client, Result};

/// Output format for CLI tools.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output with decoded values.
    #[default]
    Human,
    /// JSON output for scripting.
    Json,
    /// Raw tab-separated wire values for scripting.
    Raw,
}

/// Connection arguments shared across all CLI tools.
#[derive(Debug, Parser)]
pub struct CommonArgs {
    /// Hub address.
    #[arg(short = 'H', long = "host", env = "HUB_HOST", default_value = DEFAULT_HOST)]
    pub host: String,

    /// Admin user name. Looked up on the hub when omitted.
    #[arg(short = 'u', long = "username")]
    pub username: Option<String>,

    /// Admin password. Without it only unauthenticated values can be read.
    #[arg(short = 'p', long = "password", env = "HUB_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// HTTP request timeout in seconds.
    #[arg(short = 't', long = "timeout", default_value = "30")]
    pub timeout: f64,

    /// Retries after HTTP 500, with doubling backoff.
    #[arg(long = "retry-500", default_value = "3")]
    pub retry_500: u32,
}

impl CommonArgs {
    /// Timeout as a duration. Negative or non-finite values yield zero,
    /// which the client builder rejects.
    pub fn timeout_duration(&self) -> Duration {
        Duration::try_from_secs_f64(self.timeout).unwrap_or(Duration::ZERO)
    }

    /// A client builder configured from these arguments.
    pub fn builder(&self) -> ClientBuilder {
        let builder = Client::builder(self.host.as_str())
            .timeout(self.timeout_duration())
            .retry_500(self.retry_500);
        match &self.password {
            Some(password) => builder.credentials(self.username.as_deref(), password.as_str()),
            None => builder,
        }
    }

    /// Connect, logging in if a password was given.
    pub async fn connect(&self) -> Result<Client> {
        self.builder().connect().await
    }
}

/// Output control arguments.
#[derive(Debug, Parser)]
pub struct OutputArgs {
    /// Output format: human, json, or raw.
    #[arg(short = 'O', long = "output", default_value = "human")]
    pub format: OutputFormat,

    /// Show request timing.
    #[arg(long = "timing")]
    pub timing: bool,

    /// Print request statistics to stderr when done.
    #[arg(long = "stats")]
    pub stats: bool,

    /// Enable debug logging (async_hub3=debug).
    #[arg(short = 'd', long = "debug")]
    pub debug: bool,

    /// Enable trace logging (async_hub3=trace).
    #[arg(short = 'D', long = "trace")]
    pub trace: bool,
}

impl OutputArgs {
    /// Initialize tracing based on debug/trace flags.
    pub fn init_tracing(&self) {
        use tracing_subscriber::EnvFilter;

        let filter = if self.trace {
            "async_hub3=trace"
        } else if self.debug {
            "async_hub3=debug"
        } else {
            "async_hub3=warn"
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::new(filter))
            .with_writer(std::io::stderr)
            .try_init();
    }
}

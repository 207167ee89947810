//! Command-line configuration

use std::path::PathBuf;

use clap::{Args, Parser};
use jiff::Timestamp;

/// Log output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    /// Compact, human-readable logs.
    Compact,

    /// Structured JSON logs.
    Json,
}

/// Logging settings.
#[derive(Debug, Args)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,

    /// Log format (compact, json)
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

/// Banetón pricing configuration
#[derive(Debug, Parser)]
#[command(
    name = "baneton",
    about = "Price a bakery cart against the active promotions",
    long_about = None
)]
pub struct PricingConfig {
    /// Directory holding `products/`, `promotions/` and `carts/` fixture files
    #[arg(long, env = "BANETON_FIXTURES", default_value = "./fixtures")]
    pub fixtures: PathBuf,

    /// Product and promotion set to load
    #[arg(short, long, env = "BANETON_SET", default_value = "bakery")]
    pub set: String,

    /// Cart to price; defaults to the set name
    #[arg(short, long)]
    pub cart: Option<String>,

    /// Instant to evaluate promotion windows at (RFC 3339); defaults to now
    #[arg(long, env = "BANETON_AT")]
    pub at: Option<Timestamp>,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,
}

impl PricingConfig {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }

    /// Name of the cart fixture to price
    pub fn cart_name(&self) -> &str {
        self.cart.as_deref().unwrap_or(&self.set)
    }

    /// Instant promotions are evaluated at
    pub fn point_in_time(&self) -> Timestamp {
        self.at.unwrap_or_else(Timestamp::now)
    }
}

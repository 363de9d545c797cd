//! Configuration and CLI argument handling

use std::{path::PathBuf, time::Duration};

use clap::Parser;

/// CLI argument parsing structure
#[derive(Debug, Parser)]
#[command(name = "practice-tracker")]
#[command(about = "A personal practice-time tracking server")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "3000")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    /// JSON file holding all users; kept in memory only when omitted
    #[arg(short, long)]
    pub data_file: Option<PathBuf>,

    /// Lifetime of a bearer token in hours
    #[arg(long, default_value = "24", value_parser = clap::value_parser!(u64).range(1..))]
    pub token_ttl_hours: u64,

    /// Seconds between expired-token sweeps
    #[arg(long, default_value = "300", value_parser = clap::value_parser!(u64).range(1..))]
    pub sweep_interval_secs: u64,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    pub fn token_ttl(&self) -> chrono::Duration {
        i64::try_from(self.token_ttl_hours)
            .ok()
            .and_then(chrono::Duration::try_hours)
            .unwrap_or(chrono::Duration::MAX)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::try_parse_from(["practice-tracker"]).unwrap();
        assert_eq!(config.address(), "0.0.0.0:3000");
        assert_eq!(config.log_level(), "info");
        assert_eq!(config.token_ttl(), chrono::Duration::hours(24));
        assert!(config.data_file.is_none());
    }

    #[test]
    fn zero_sweep_interval_is_rejected() {
        assert!(Config::try_parse_from(["practice-tracker", "--sweep-interval-secs", "0"]).is_err());
    }

    #[test]
    fn verbose_and_data_file() {
        let config =
            Config::try_parse_from(["practice-tracker", "-v", "--data-file", "users.json"]).unwrap();
        assert_eq!(config.log_level(), "debug");
        assert_eq!(config.data_file, Some(PathBuf::from("users.json")));
    }
}

//! Client configuration.

use std::{path::PathBuf, time::Duration};

use clap::Args;

/// Backend and local state settings.
#[derive(Debug, Clone, Args)]
pub struct ClientConfig {
    /// Base URL of the canteen REST API
    #[arg(
        long,
        env = "CANTEEN_API_URL",
        default_value = "http://localhost:8000/api",
        global = true
    )]
    pub api_url: String,

    /// Directory holding the persisted cart and session token
    #[arg(long, env = "CANTEEN_DATA_DIR", default_value = ".canteen", global = true)]
    pub data_dir: PathBuf,

    /// Seconds between order status polls while tracking
    #[arg(
        long,
        env = "CANTEEN_POLL_INTERVAL_SECS",
        default_value_t = 5,
        value_parser = clap::value_parser!(u64).range(1..),
        global = true
    )]
    pub poll_interval_secs: u64,
}

impl ClientConfig {
    /// Poll interval as a [`Duration`].
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }
}

/// Log output format.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum LogFormat {
    /// Compact, human-readable logs.
    Compact,

    /// Structured JSON logs.
    Json,
}

/// Logging settings.
#[derive(Debug, Clone, Args)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "warn", global = true)]
    pub log_level: String,

    /// Log format (compact, json)
    #[arg(
        long,
        env = "LOG_FORMAT",
        value_enum,
        default_value_t = LogFormat::Compact,
        global = true
    )]
    pub log_format: LogFormat,
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[derive(Debug, Parser)]
    struct TestCli {
        #[command(flatten)]
        client: ClientConfig,

        #[command(flatten)]
        logging: LoggingConfig,
    }

    #[test]
    fn flags_override_defaults() -> Result<(), clap::Error> {
        let cli = TestCli::try_parse_from([
            "canteen",
            "--api-url",
            "https://canteen.example/api",
            "--poll-interval-secs",
            "2",
            "--log-format",
            "json",
        ])?;

        assert_eq!(cli.client.api_url, "https://canteen.example/api");
        assert_eq!(cli.client.poll_interval(), Duration::from_secs(2));
        assert!(matches!(cli.logging.log_format, LogFormat::Json));

        Ok(())
    }

    #[test]
    fn zero_poll_interval_is_rejected() {
        let result = TestCli::try_parse_from(["canteen", "--poll-interval-secs", "0"]);

        assert!(result.is_err());
    }
}

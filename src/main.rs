//! Machine Config Server
//!
//! Hands booting machines the JSON configuration document for their pool.
//!
//! # Architecture Overview
//!
//! ```text
//!                              ┌──────────────────────────────────────────────┐
//!                              │            MACHINE CONFIG SERVER             │
//!                              │                                              │
//!     GET /config/worker       │  ┌─────────┐    ┌──────────┐    ┌─────────┐  │
//!     ─────────────────────────┼─▶│  http   │───▶│ routing  │───▶│provider │  │
//!                              │  │ server  │    │ dispatch │    │  (dir)  │  │
//!                              │  └─────────┘    └──────────┘    └────┬────┘  │
//!                              │                                      │       │
//!     200 application/json     │  ┌─────────┐                         │       │
//!     ◀────────────────────────┼──│response │◀────────────────────────┘       │
//!                              │  └─────────┘                                 │
//!                              │                                              │
//!                              │  config · observability · lifecycle          │
//!                              └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;

use machine_config_server::config::{self, ConfigError, LogFormat, ServerConfig};
use machine_config_server::lifecycle::startup;
use machine_config_server::observability::logging;

#[derive(Parser, Debug)]
#[command(name = "machine-config-server")]
#[command(about = "Serve machine pool configuration documents", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override listener.bind_address.
    #[arg(short, long)]
    bind: Option<String>,

    /// Override provider.directory.
    #[arg(short, long)]
    pool_dir: Option<PathBuf>,

    /// Override observability.log_format.
    #[arg(long, value_enum)]
    log_format: Option<LogFormat>,
}

impl Cli {
    /// File (or defaults), then flags, then validation.
    fn resolve_config(&self) -> Result<ServerConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => config::parse_config(path)?,
            None => ServerConfig::default(),
        };

        if let Some(bind) = &self.bind {
            config.listener.bind_address = bind.clone();
        }
        if let Some(dir) = &self.pool_dir {
            config.provider.directory = dir.clone();
        }
        if let Some(format) = self.log_format {
            config.observability.log_format = format;
        }

        config::validate_config(&config).map_err(ConfigError::Validation)?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = cli.resolve_config()?;

    logging::init_logging(&config.observability)?;
    tracing::info!("machine-config-server v{} starting", env!("CARGO_PKG_VERSION"));

    startup::run(config).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_defaults() {
        let cli = Cli::parse_from([
            "machine-config-server",
            "--bind",
            "127.0.0.1:22700",
            "--pool-dir",
            "/srv/pools",
            "--log-format",
            "json",
        ]);
        let config = cli.resolve_config().unwrap();
        assert_eq!(config.listener.bind_address, "127.0.0.1:22700");
        assert_eq!(config.provider.directory, PathBuf::from("/srv/pools"));
        assert_eq!(config.observability.log_format, LogFormat::Json);
    }

    #[test]
    fn test_invalid_override_fails_validation() {
        let cli = Cli::parse_from(["machine-config-server", "--bind", "nowhere"]);
        assert!(matches!(cli.resolve_config(), Err(ConfigError::Validation(_))));
    }
}

//! Command-line interface parsing for tikicrawl
//!
//! This module handles parsing of CLI arguments using clap. The `fetch`
//! subcommand (the default) prints the listing once; `serve` runs the cached
//! HTTP endpoint. Flags override the environment-derived [`Config`].

use clap::{Parser, Subcommand};
use thiserror::Error;

use crate::cache::CacheBackend;
use crate::config::Config;
use crate::data::ProductQuery;

/// Error types for CLI argument parsing
#[derive(Debug, Error)]
pub enum CliError {
    /// The specified cache backend name is not recognized
    #[error("Invalid cache backend: '{0}'. Valid backends: redis, memory, file")]
    InvalidCacheBackend(String),

    /// A search limit of zero would never return products
    #[error("Invalid limit: must be at least 1")]
    InvalidLimit,
}

/// tikicrawl - Fetch the Tiki product listing or serve it behind a cache
#[derive(Parser, Debug)]
#[command(name = "tikicrawl")]
#[command(about = "Fetch the Tiki product listing or serve it behind a short-lived cache")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Fetch the listing once and print it (default)
    Fetch {
        /// Search term
        #[arg(long, short)]
        query: Option<String>,
        /// Maximum number of products
        #[arg(long, short)]
        limit: Option<u32>,
    },
    /// Serve the listing at GET /CrawlerData/Craw
    ///
    /// Examples:
    ///   tikicrawl serve                  # Redis at REDIS_URL, port from PORT
    ///   tikicrawl serve --cache memory   # No external cache needed
    ///   tikicrawl serve --port 3000
    ///
    /// Valid backends: redis, memory, file
    Serve {
        /// Port to listen on
        #[arg(long, short)]
        port: Option<u16>,
        /// Cache backend to use
        #[arg(long, value_name = "BACKEND")]
        cache: Option<String>,
    },
}

/// What the process should do once started
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// Print one listing for the query and exit
    Fetch(ProductQuery),
    /// Run the HTTP server
    Serve,
}

/// Configuration derived from CLI arguments for application startup
#[derive(Debug, Clone)]
pub struct StartupConfig {
    pub mode: Mode,
    pub config: Config,
}

/// Parses a cache backend string argument.
///
/// # Returns
/// * `Ok(CacheBackend)` if the string names a known backend
/// * `Err(CliError::InvalidCacheBackend)` otherwise
pub fn parse_cache_backend_arg(s: &str) -> Result<CacheBackend, CliError> {
    s.parse().map_err(CliError::InvalidCacheBackend)
}

impl StartupConfig {
    /// Creates a StartupConfig from parsed CLI arguments layered over `config`.
    pub fn from_cli(cli: &Cli, mut config: Config) -> Result<Self, CliError> {
        match &cli.command {
            None => Ok(StartupConfig {
                mode: Mode::Fetch(config.query.clone()),
                config,
            }),
            Some(Command::Fetch { query, limit }) => {
                let mut product_query = config.query.clone();
                if let Some(q) = query {
                    product_query.q = q.clone();
                }
                match limit {
                    Some(0) => return Err(CliError::InvalidLimit),
                    Some(n) => product_query.limit = *n,
                    None => {}
                }
                Ok(StartupConfig {
                    mode: Mode::Fetch(product_query),
                    config,
                })
            }
            Some(Command::Serve { port, cache }) => {
                if let Some(port) = port {
                    config.port = *port;
                }
                if let Some(cache) = cache {
                    config.cache_backend = parse_cache_backend_arg(cache)?;
                }
                Ok(StartupConfig {
                    mode: Mode::Serve,
                    config,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cache_backend_arg_valid() {
        assert_eq!(parse_cache_backend_arg("redis").unwrap(), CacheBackend::Redis);
        assert_eq!(parse_cache_backend_arg("memory").unwrap(), CacheBackend::Memory);
        assert_eq!(parse_cache_backend_arg("file").unwrap(), CacheBackend::File);
    }

    #[test]
    fn test_parse_cache_backend_arg_invalid() {
        let err = parse_cache_backend_arg("memcached").unwrap_err();
        assert!(err.to_string().contains("Invalid cache backend"));
        assert!(err.to_string().contains("memcached"));
    }

    #[test]
    fn test_cli_parse_no_args() {
        let cli = Cli::parse_from(["tikicrawl"]);
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_cli_parse_fetch_with_query() {
        let cli = Cli::parse_from(["tikicrawl", "fetch", "--query", "giay", "--limit", "10"]);
        assert_eq!(
            cli.command,
            Some(Command::Fetch {
                query: Some("giay".to_string()),
                limit: Some(10),
            })
        );
    }

    #[test]
    fn test_cli_parse_serve_flags() {
        let cli = Cli::parse_from(["tikicrawl", "serve", "-p", "3000", "--cache", "memory"]);
        assert_eq!(
            cli.command,
            Some(Command::Serve {
                port: Some(3000),
                cache: Some("memory".to_string()),
            })
        );
    }

    #[test]
    fn test_startup_config_no_args_fetches_default_query() {
        let cli = Cli::parse_from(["tikicrawl"]);
        let startup = StartupConfig::from_cli(&cli, Config::default()).unwrap();
        assert_eq!(startup.mode, Mode::Fetch(ProductQuery::default()));
    }

    #[test]
    fn test_startup_config_fetch_overrides_query() {
        let cli = Cli::parse_from(["tikicrawl", "fetch", "-q", "giay"]);
        let startup = StartupConfig::from_cli(&cli, Config::default()).unwrap();
        assert_eq!(
            startup.mode,
            Mode::Fetch(ProductQuery {
                q: "giay".to_string(),
                limit: 40,
            })
        );
    }

    #[test]
    fn test_startup_config_fetch_rejects_zero_limit() {
        let cli = Cli::parse_from(["tikicrawl", "fetch", "--limit", "0"]);
        let result = StartupConfig::from_cli(&cli, Config::default());
        assert!(matches!(result, Err(CliError::InvalidLimit)));
    }

    #[test]
    fn test_startup_config_fetch_starts_from_configured_query() {
        let config = Config {
            query: ProductQuery {
                q: "dep".to_string(),
                limit: 7,
            },
            ..Config::default()
        };

        let bare_cli = Cli::parse_from(["tikicrawl"]);
        let bare = StartupConfig::from_cli(&bare_cli, config.clone()).unwrap();
        assert_eq!(bare.mode, Mode::Fetch(config.query.clone()));

        let cli = Cli::parse_from(["tikicrawl", "fetch", "--query", "giay"]);
        let startup = StartupConfig::from_cli(&cli, config).unwrap();
        assert_eq!(
            startup.mode,
            Mode::Fetch(ProductQuery {
                q: "giay".to_string(),
                limit: 7,
            })
        );
    }

    #[test]
    fn test_startup_config_serve_overrides_config() {
        let cli = Cli::parse_from(["tikicrawl", "serve", "--port", "3000", "--cache", "file"]);
        let startup = StartupConfig::from_cli(&cli, Config::default()).unwrap();
        assert_eq!(startup.mode, Mode::Serve);
        assert_eq!(startup.config.port, 3000);
        assert_eq!(startup.config.cache_backend, CacheBackend::File);
    }

    #[test]
    fn test_startup_config_serve_keeps_env_values() {
        let config = Config {
            port: 9000,
            cache_backend: CacheBackend::Memory,
            ..Config::default()
        };
        let cli = Cli::parse_from(["tikicrawl", "serve"]);
        let startup = StartupConfig::from_cli(&cli, config).unwrap();
        assert_eq!(startup.config.port, 9000);
        assert_eq!(startup.config.cache_backend, CacheBackend::Memory);
    }

    #[test]
    fn test_startup_config_serve_invalid_cache() {
        let cli = Cli::parse_from(["tikicrawl", "serve", "--cache", "invalid"]);
        let result = StartupConfig::from_cli(&cli, Config::default());
        assert!(result.is_err());
    }
}

//! tikicrawl - Fetch the Tiki product listing
//!
//! Prints the listing to the console, or serves it over HTTP with a
//! short-lived cache in front of the upstream API.

use std::io::{self, Write};
use std::process;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use tikicrawl::cli::{Cli, Mode, StartupConfig};
use tikicrawl::config::Config;
use tikicrawl::data::{ProductQuery, TikiClient};
use tikicrawl::printer::show_products;
use tikicrawl::server::{self, AppState};

/// Logs go to stderr so the fetched listing alone reaches stdout
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tikicrawl=debug,tower_http=debug")),
        )
        .with_writer(io::stderr)
        .init();
}

async fn run_fetch(config: &Config, query: &ProductQuery) -> io::Result<()> {
    let client = TikiClient::new().with_base_url(config.tiki_base_url.clone());
    let response = client.fetch_products(query).await;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    show_products(&mut out, &response.data)?;
    out.flush()
}

async fn run_serve(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!(
        port = config.port,
        cache_backend = %config.cache_backend,
        cache_ttl_secs = config.cache_ttl.as_secs(),
        upstream = %config.tiki_base_url,
        "Starting tikicrawl server"
    );

    let state = AppState::from_config(&config).await?;
    server::serve(state, config.port).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let cli = Cli::parse();
    let startup = match StartupConfig::from_cli(&cli, Config::from_env()) {
        Ok(startup) => startup,
        Err(e) => {
            eprintln!("error: {}", e);
            process::exit(2);
        }
    };

    match startup.mode {
        Mode::Fetch(query) => run_fetch(&startup.config, &query).await?,
        Mode::Serve => run_serve(startup.config).await?,
    }

    Ok(())
}

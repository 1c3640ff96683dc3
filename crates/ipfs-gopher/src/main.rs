//! ipfs-gopher: entry point.
//!
//! This binary serves IPFS content to Gopher clients.  Each request's
//! selector is treated as an IPFS path: files are sent as-is (or rewritten if
//! they are embedded menus) and directories are listed as Gopher menus.
//!
//! # Usage
//!
//! ```text
//! ipfs-gopher [OPTIONS]
//!
//! Options:
//!   --host   <HOST>   Host advertised in menu lines   [default: localhost]
//!   --port   <PORT>   Port advertised in menu lines   [default: 7070]
//!   --daemon <ADDR>   IPFS daemon RPC address         [default: localhost:5001]
//!   --listen <ADDR>   Address to listen on            [default: localhost:7070]
//!   --config <PATH>   Optional TOML config file
//! ```
//!
//! # Where settings come from
//!
//! For each setting the first of these that is present wins:
//!
//! 1. The command-line flag.
//! 2. The environment variable.
//! 3. The config file given with `--config`.
//! 4. The built-in default.
//!
//! | Variable              | Flag       |
//! |-----------------------|------------|
//! | `IPFS_GOPHER_HOST`    | `--host`   |
//! | `IPFS_GOPHER_PORT`    | `--port`   |
//! | `IPFS_GOPHER_DAEMON`  | `--daemon` |
//! | `IPFS_GOPHER_LISTEN`  | `--listen` |
//! | `IPFS_GOPHER_CONFIG`  | `--config` |
//!
//! Logging is controlled by `RUST_LOG`, falling back to the config file's
//! `log_level`, then `info`.

use std::path::PathBuf;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use ipfs_gopher::application::SelectorResolver;
use ipfs_gopher::domain::ProxyConfig;
use ipfs_gopher::infrastructure::{load_config, run_server, FileConfig, IpfsClient};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Gopher-to-IPFS gateway.
///
/// Every flag is optional; unset flags fall back to the environment, then the
/// config file, then the built-in default.
#[derive(Debug, Parser)]
#[command(
    name = "ipfs-gopher",
    about = "Serve IPFS files and directories to Gopher clients",
    version
)]
struct Cli {
    /// Host name written into menu lines so clients connect back here.
    #[arg(long, env = "IPFS_GOPHER_HOST")]
    host: Option<String>,

    /// Port written into menu lines so clients connect back here.
    #[arg(long, env = "IPFS_GOPHER_PORT")]
    port: Option<u16>,

    /// Address of the IPFS daemon's RPC API.
    #[arg(long, env = "IPFS_GOPHER_DAEMON")]
    daemon: Option<String>,

    /// Address the Gopher listener binds to.
    #[arg(long, env = "IPFS_GOPHER_LISTEN")]
    listen: Option<String>,

    /// Path to a TOML config file.
    #[arg(long, short = 'c', env = "IPFS_GOPHER_CONFIG")]
    config: Option<PathBuf>,
}

impl Cli {
    /// Merges the CLI arguments over `file` and the defaults into a
    /// [`ProxyConfig`].
    ///
    /// # Errors
    ///
    /// Returns an error if the advertised host is empty or contains a tab or
    /// line break (it would corrupt every menu line), or if the daemon or
    /// listen address is empty.
    fn into_proxy_config(self, file: &FileConfig) -> anyhow::Result<ProxyConfig> {
        let defaults = ProxyConfig::default();

        let config = ProxyConfig {
            advertised_host: self
                .host
                .or_else(|| file.host.clone())
                .unwrap_or(defaults.advertised_host),
            advertised_port: self.port.or(file.port).unwrap_or(defaults.advertised_port),
            daemon_addr: self
                .daemon
                .or_else(|| file.daemon.clone())
                .unwrap_or(defaults.daemon_addr),
            listen_addr: self
                .listen
                .or_else(|| file.listen.clone())
                .unwrap_or(defaults.listen_addr),
        };

        let host = &config.advertised_host;
        if host.is_empty() || host.contains(['\t', '\r', '\n']) {
            anyhow::bail!("invalid advertised host: {host:?}");
        }
        if config.daemon_addr.trim().is_empty() {
            anyhow::bail!("IPFS daemon address must not be empty");
        }
        if config.listen_addr.trim().is_empty() {
            anyhow::bail!("listen address must not be empty");
        }

        Ok(config)
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

/// Program entry point.
///
/// 1. Parse CLI arguments and load the config file, if one was given.
/// 2. Initialise `tracing_subscriber`.
/// 3. Build the [`ProxyConfig`], the IPFS client, and the shared resolver.
/// 4. Spawn a Ctrl+C handler that clears the `running` flag.
/// 5. Run the accept loop until the flag is cleared.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let file = match &cli.config {
        Some(path) => load_config(path)
            .with_context(|| format!("failed to load config file {}", path.display()))?,
        None => FileConfig::default(),
    };

    // ── Logging setup ─────────────────────────────────────────────────────────
    let fallback_level = file.log_level.clone().unwrap_or_else(|| "info".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback_level)),
        )
        .init();

    let config = cli.into_proxy_config(&file)?;

    info!(
        "ipfs-gopher starting: listen={}, daemon={}, advertising {}:{}",
        config.listen_addr, config.daemon_addr, config.advertised_host, config.advertised_port
    );

    let backend = IpfsClient::new(config.daemon_api_url()).context("failed to create IPFS client")?;
    let resolver = Arc::new(SelectorResolver::new(Arc::new(backend), config.line_fixer()));

    // ── Graceful shutdown flag ─────────────────────────────────────────────────
    let running = Arc::new(AtomicBool::new(true));
    let running_clone = Arc::clone(&running);

    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("received Ctrl+C, initiating graceful shutdown");
                running_clone.store(false, Ordering::Relaxed);
            }
            Err(e) => {
                tracing::error!("failed to listen for Ctrl+C signal: {e}");
            }
        }
    });

    // ── Main server loop ───────────────────────────────────────────────────────
    run_server(&config.listen_addr, resolver, running).await?;

    info!("ipfs-gopher stopped");
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

//! Gateway configuration types.
//!
//! [`ProxyConfig`] is the single source of truth for all runtime settings.
//! It is built once at startup from CLI arguments, environment variables, and
//! an optional TOML file (see `main.rs`), then handed to the components that
//! need it.  Nothing reads configuration from global state.

use ipfs_gopher_core::LineFixer;

/// All runtime configuration for the gateway.
///
/// # Example
///
/// ```rust
/// use ipfs_gopher::domain::ProxyConfig;
///
/// let cfg = ProxyConfig::default();
/// assert_eq!(cfg.advertised_port, 7070);
/// assert_eq!(cfg.daemon_api_url(), "http://localhost:5001/api/v0");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyConfig {
    /// Host name written into menu lines so clients come back to this gateway.
    ///
    /// This is what *clients* use to reach us, which is not necessarily the
    /// address we bind to (e.g. behind NAT or a reverse proxy).
    pub advertised_host: String,

    /// Port written into menu lines alongside [`Self::advertised_host`].
    pub advertised_port: u16,

    /// Address of the IPFS daemon's RPC API, e.g. `localhost:5001` or
    /// `http://10.0.0.2:5001`.
    pub daemon_addr: String,

    /// Address the Gopher listener binds to, e.g. `localhost:7070` or
    /// `0.0.0.0:70`.  Host names are resolved at bind time.
    pub listen_addr: String,
}

impl ProxyConfig {
    /// Builds the [`LineFixer`] that pads menu lines with the advertised
    /// host and port.
    pub fn line_fixer(&self) -> LineFixer {
        LineFixer::new(self.advertised_host.clone(), self.advertised_port)
    }

    /// Base URL of the daemon's `/api/v0` endpoints.
    ///
    /// A bare `host:port` gets an `http://` scheme; an address that already
    /// carries a scheme is used as is.
    pub fn daemon_api_url(&self) -> String {
        let base = self.daemon_addr.trim_end_matches('/');
        if base.contains("://") {
            format!("{base}/api/v0")
        } else {
            format!("http://{base}/api/v0")
        }
    }
}

impl Default for ProxyConfig {
    /// | Field            | Default          |
    /// |------------------|------------------|
    /// | advertised_host  | `localhost`      |
    /// | advertised_port  | `7070`           |
    /// | daemon_addr      | `localhost:5001` |
    /// | listen_addr      | `localhost:7070` |
    fn default() -> Self {
        Self {
            advertised_host: "localhost".to_string(),
            advertised_port: 7070,
            daemon_addr: "localhost:5001".to_string(),
            listen_addr: "localhost:7070".to_string(),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

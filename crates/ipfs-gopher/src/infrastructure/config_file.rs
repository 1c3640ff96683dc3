//! Optional TOML configuration file.
//!
//! Every setting can also be given on the command line or through an
//! environment variable; the file only supplies values that neither of those
//! set.  Missing keys are simply left unset.
//!
//! ```toml
//! host = "gopher.example.net"
//! port = 70
//! daemon = "localhost:5001"
//! listen = "0.0.0.0:70"
//! log_level = "debug"
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A file system I/O error occurred.
    #[error("I/O error reading config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Settings read from the config file.  `None` means "not set here".
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    /// Host advertised in menu lines.
    #[serde(default)]
    pub host: Option<String>,
    /// Port advertised in menu lines.
    #[serde(default)]
    pub port: Option<u16>,
    /// IPFS daemon RPC address.
    #[serde(default)]
    pub daemon: Option<String>,
    /// Gopher listen address.
    #[serde(default)]
    pub listen: Option<String>,
    /// `tracing` filter used when `RUST_LOG` is not set, e.g. `"info"`.
    #[serde(default)]
    pub log_level: Option<String>,
}

/// Loads a [`FileConfig`] from `path`.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] if the file cannot be read (including when it
/// does not exist: a path given explicitly is expected to be there) and
/// [`ConfigError::Parse`] if the TOML is malformed or has unknown keys.
pub fn load_config(path: &Path) -> Result<FileConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(toml::from_str(&content)?)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_leaves_everything_unset() {
        let cfg: FileConfig = toml::from_str("").expect("deserialize empty");
        assert_eq!(cfg, FileConfig::default());
    }

    #[test]
    fn test_full_toml_is_read() {
        // Arrange
        let toml_str = r#"
host = "gopher.example.net"
port = 70
daemon = "10.0.0.2:5001"
listen = "0.0.0.0:70"
log_level = "debug"
"#;

        // Act
        let cfg: FileConfig = toml::from_str(toml_str).expect("deserialize full");

        // Assert
        assert_eq!(cfg.host.as_deref(), Some("gopher.example.net"));
        assert_eq!(cfg.port, Some(70));
        assert_eq!(cfg.daemon.as_deref(), Some("10.0.0.2:5001"));
        assert_eq!(cfg.listen.as_deref(), Some("0.0.0.0:70"));
        assert_eq!(cfg.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let result: Result<FileConfig, toml::de::Error> = toml::from_str("hots = \"typo\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_out_of_range_port_is_rejected() {
        let result: Result<FileConfig, toml::de::Error> = toml::from_str("port = 70000");
        assert!(result.is_err());
    }

    #[test]
    fn test_partial_toml_leaves_other_fields_unset() {
        let cfg: FileConfig = toml::from_str("port = 7070").expect("deserialize partial");

        assert_eq!(
            cfg,
            FileConfig {
                port: Some(7070),
                ..FileConfig::default()
            }
        );
    }

    #[test]
    fn test_load_config_missing_file_is_io_error() {
        let path = PathBuf::from("/nonexistent/path/that/cannot/exist/ipfs-gopher.toml");

        let result = load_config(&path);

        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn test_load_config_reads_file_from_temp_dir() {
        // Arrange
        let dir = std::env::temp_dir().join(format!("ipfs_gopher_test_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(&path, "host = \"from-file\"\nport = 7171\n").unwrap();

        // Act
        let cfg = load_config(&path).expect("load");

        // Assert
        assert_eq!(cfg.host.as_deref(), Some("from-file"));
        assert_eq!(cfg.port, Some(7171));

        // Cleanup
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_load_config_malformed_file_is_parse_error() {
        let dir = std::env::temp_dir().join(format!("ipfs_gopher_bad_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(&path, "[[[ not valid toml").unwrap();

        let result = load_config(&path);

        assert!(matches!(result, Err(ConfigError::Parse(_))));
        std::fs::remove_dir_all(&dir).ok();
    }
}

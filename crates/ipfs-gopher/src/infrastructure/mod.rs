//! Infrastructure layer for ipfs-gopher.
//!
//! Everything that touches the outside world: the Gopher TCP listener, the
//! HTTP client for the IPFS daemon, and the optional config file.
//!
//! # Responsibilities
//!
//! - Binding the Gopher listener and spawning a task per connection
//! - Reading the selector line from each client
//! - Calling the IPFS RPC API (`cat`, `ls`, `files/stat`)
//! - Reading `ipfs-gopher.toml`
//!
//! # What does NOT belong here?
//!
//! - Menu rewriting or directory synthesis (that is the application layer)

pub mod config_file;
pub mod gopher_server;
pub mod ipfs_client;

pub use config_file::{load_config, ConfigError, FileConfig};
pub use gopher_server::{run_server, serve};
pub use ipfs_client::IpfsClient;

//! Domain layer for ipfs-gopher.
//!
//! Plain data types with no I/O: the gateway configuration and the shape of
//! a directory listing entry.  Nothing here touches `tokio`, sockets, or the
//! IPFS daemon.

pub mod config;
pub mod entry;

pub use config::ProxyConfig;
pub use entry::{DirEntry, EntryKind};

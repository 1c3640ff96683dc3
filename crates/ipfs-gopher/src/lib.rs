//! ipfs-gopher library crate.
//!
//! A Gopher-to-IPFS gateway: Gopher clients send selectors such as
//! `/ipfs/<cid>/docs`, and the gateway answers with the file stored at that
//! path, a rewritten embedded menu, or a menu synthesized from the directory
//! listing.
//!
//! # Architecture (clean architecture)
//!
//! ```text
//! Gopher client (selector line over TCP)
//!         ↕
//! [ipfs-gopher]
//!   ├── domain/           ProxyConfig, DirEntry
//!   ├── application/      Resolver, forwarder, directory synthesis
//!   └── infrastructure/
//!         ├── gopher_server/  accept loop, selector reading
//!         ├── ipfs_client/    IPFS RPC over HTTP (reqwest)
//!         └── config_file/    optional TOML settings
//!         ↕
//! IPFS daemon (/api/v0 over HTTP)
//! ```
//!
//! # Layer rules
//!
//! - `domain` has no I/O.
//! - `application` depends on `domain` and `ipfs-gopher-core`, and reaches
//!   storage only through the `ContentBackend` trait.
//! - `infrastructure` depends on all other layers plus `tokio` and `reqwest`.

/// Domain layer: configuration and listing types (no I/O).
pub mod domain;

/// Application layer: the translation engine.
pub mod application;

/// Infrastructure layer: Gopher listener, IPFS client, config file.
pub mod infrastructure;

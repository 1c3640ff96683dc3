//! Application layer for ipfs-gopher.
//!
//! The translation engine: it knows *what* a Gopher client should receive for
//! a selector, but reaches storage only through the [`ContentBackend`] trait.
//!
//! # Responsibilities
//!
//! - Deciding whether a selector is content or a directory ([`resolver`])
//! - Forwarding raw content and rewriting embedded menus ([`forwarder`])
//! - Synthesizing menus for directory listings ([`directory`])
//!
//! # What does NOT belong here?
//!
//! - Opening sockets or HTTP connections (that is infrastructure)
//! - Parsing command-line flags or config files (that is `main.rs`)

pub mod backend;
pub mod directory;
pub mod forwarder;
pub mod resolver;

pub use backend::{BackendError, ContentBackend, ContentStream};
pub use directory::write_directory_menu;
pub use forwarder::{forward, ForwardError, ForwardOutcome, MAX_LINE};
pub use resolver::{GatewayError, Resolution, SelectorResolver};

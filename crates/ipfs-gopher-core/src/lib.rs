//! # ipfs-gopher-core
//!
//! Pure translation logic shared by the ipfs-gopher gateway: Gopher menu line
//! rewriting, file-type inference, and selector path helpers.
//!
//! This crate performs no I/O.  Everything here is a total function over
//! strings, which keeps the rules that decide what a Gopher client sees easy
//! to test without a socket or an IPFS daemon.
//!
//! # Architecture overview (for beginners)
//!
//! Gopher is a line-oriented protocol.  A client sends one *selector* line and
//! the server answers with either raw bytes (a file) or a *menu*: a sequence of
//! CRLF-terminated lines, each made of tab-separated fields
//! `<type><label>\t<selector>\t<host>\t<port>`, ending with a line holding a
//! single `.`.
//!
//! - **`menu`** – Gopher item types, the [`LineFixer`] that pads incomplete
//!   menu lines into four-field wire lines, and [`infer_item_type`] which
//!   guesses a type code from a file name.
//!
//! - **`selector`** – Path helpers used to resolve relative selectors and to
//!   build child selectors for synthesized directory listings.

pub mod menu;
pub mod selector;

// Re-export the most-used items at the crate root so callers can write
// `ipfs_gopher_core::LineFixer` instead of `ipfs_gopher_core::menu::line::LineFixer`.
pub use menu::filetype::infer_item_type;
pub use menu::item_type::ItemType;
pub use menu::line::{LineFixer, CRLF, DEFAULT_GOPHER_PORT, PLACEHOLDER_SELECTOR, TERMINATOR};
pub use menu::SENTINEL;

//! Gopher menu primitives.
//!
//! # Sub-modules
//!
//! - [`item_type`] – The single-character type codes that prefix menu lines.
//! - [`line`]      – [`line::LineFixer`]: turns a loosely written menu line
//!   into a complete CRLF-terminated wire line.
//! - [`filetype`]  – Maps file extensions to item types.

pub mod filetype;
pub mod item_type;
pub mod line;

/// Marker that identifies IPFS content as an embedded Gopher menu.
///
/// When a fetched file starts with exactly these bytes, the gateway discards
/// the rest of the marker's line and rewrites every following line through a
/// [`line::LineFixer`] instead of forwarding the file verbatim.
pub const SENTINEL: &[u8] = b"<<<ipfs-gopher-menu>>>";

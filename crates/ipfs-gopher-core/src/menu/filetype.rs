//! File-type inference for directory listings.
//!
//! IPFS only tells us whether a link is a file or a directory, but a Gopher
//! client wants to know whether a file is text, an image, a sound, and so on.
//! The best we can do is guess from the extension.

use super::item_type::ItemType;

/// Extension (lower case, without the dot) → item type.
///
/// Anything not listed here is served as [`ItemType::Binary`].
const EXTENSION_TYPES: &[(&str, ItemType)] = &[
    // Plain text and source code
    ("txt", ItemType::Text),
    ("md", ItemType::Text),
    ("s", ItemType::Text),
    ("c", ItemType::Text),
    ("h", ItemType::Text),
    ("py", ItemType::Text),
    ("go", ItemType::Text),
    ("fs", ItemType::Text),
    ("xml", ItemType::Text),
    ("css", ItemType::Text),
    ("ts", ItemType::Text),
    // GIF-class images
    ("gif", ItemType::Gif),
    ("svg", ItemType::Gif),
    // Other images
    ("jpg", ItemType::Image),
    ("jpeg", ItemType::Image),
    ("png", ItemType::Image),
    // Markup
    ("html", ItemType::Html),
    ("htm", ItemType::Html),
    // Audio and tracker music
    ("ogg", ItemType::Sound),
    ("mp3", ItemType::Sound),
    ("wav", ItemType::Sound),
    ("mod", ItemType::Sound),
    ("it", ItemType::Sound),
    ("xm", ItemType::Sound),
    ("mid", ItemType::Sound),
    ("vgm", ItemType::Sound),
];

/// Guesses the Gopher item type of a file from its name.
///
/// The extension is everything after the last `.` of the final path segment
/// and is compared case-insensitively.  Unknown or missing extensions fall back
/// to [`ItemType::Binary`], so this never fails.
///
/// # Example
///
/// ```rust
/// use ipfs_gopher_core::{infer_item_type, ItemType};
///
/// assert_eq!(infer_item_type("README.TXT"), ItemType::Text);
/// assert_eq!(infer_item_type("song.mp3"), ItemType::Sound);
/// assert_eq!(infer_item_type("archive.tar.gz"), ItemType::Binary);
/// ```
pub fn infer_item_type(name: &str) -> ItemType {
    let file_name = name.rsplit('/').next().unwrap_or(name);
    let Some((_, ext)) = file_name.rsplit_once('.') else {
        return ItemType::Binary;
    };

    EXTENSION_TYPES
        .iter()
        .find(|(known, _)| known.eq_ignore_ascii_case(ext))
        .map(|(_, ty)| *ty)
        .unwrap_or(ItemType::Binary)
}

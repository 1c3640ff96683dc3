//! Gopher item type codes (RFC 1436 §3.8 plus the common `g`, `I`, `h`, `s`,
//! `i` extensions).

use std::fmt;

/// Single-character classifier at the start of every Gopher menu line.
///
/// The client uses it to decide how to fetch and present the entry: `1` is
/// followed as another menu, `0` is displayed as text, `9` is downloaded, and
/// `i` is an informational line that cannot be selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ItemType {
    Text = b'0',
    Directory = b'1',
    Binary = b'9',
    Gif = b'g',
    Image = b'I',
    Html = b'h',
    Sound = b's',
    Info = b'i',
}

impl ItemType {
    /// Returns the wire character for this type.
    pub fn as_char(self) -> char {
        self as u8 as char
    }
}

impl TryFrom<char> for ItemType {
    type Error = ();

    fn try_from(value: char) -> Result<Self, Self::Error> {
        match value {
            '0' => Ok(ItemType::Text),
            '1' => Ok(ItemType::Directory),
            '9' => Ok(ItemType::Binary),
            'g' => Ok(ItemType::Gif),
            'I' => Ok(ItemType::Image),
            'h' => Ok(ItemType::Html),
            's' => Ok(ItemType::Sound),
            'i' => Ok(ItemType::Info),
            _ => Err(()),
        }
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

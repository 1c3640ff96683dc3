//! Directory listing entries.

use ipfs_gopher_core::{infer_item_type, ItemType};

/// What kind of object a directory link points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    File,
    Directory,
    Symlink,
    /// Raw blocks and anything the daemon reports without a UnixFS type.
    Raw,
}

impl EntryKind {
    /// Maps a UnixFS data type code, as reported in the `Type` field of the
    /// daemon's `ls` output, to an entry kind.
    ///
    /// HAMT-sharded directories (code 5) are listed like ordinary ones.
    pub fn from_unixfs(code: i32) -> Self {
        match code {
            1 | 5 => EntryKind::Directory,
            2 => EntryKind::File,
            4 => EntryKind::Symlink,
            _ => EntryKind::Raw,
        }
    }
}

/// One child of a listed directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    pub kind: EntryKind,
}

impl DirEntry {
    pub fn new(name: impl Into<String>, kind: EntryKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    /// Gopher item type used for this entry in a synthesized menu.
    ///
    /// Directories are always menus; everything else is guessed from the name.
    pub fn item_type(&self) -> ItemType {
        match self.kind {
            EntryKind::Directory => ItemType::Directory,
            EntryKind::File | EntryKind::Symlink | EntryKind::Raw => infer_item_type(&self.name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_unixfs_known_codes() {
        assert_eq!(EntryKind::from_unixfs(0), EntryKind::Raw);
        assert_eq!(EntryKind::from_unixfs(1), EntryKind::Directory);
        assert_eq!(EntryKind::from_unixfs(2), EntryKind::File);
        assert_eq!(EntryKind::from_unixfs(4), EntryKind::Symlink);
        assert_eq!(EntryKind::from_unixfs(5), EntryKind::Directory);
    }

    #[test]
    fn test_from_unixfs_metadata_and_unknown_are_raw() {
        assert_eq!(EntryKind::from_unixfs(3), EntryKind::Raw);
        assert_eq!(EntryKind::from_unixfs(-1), EntryKind::Raw);
        assert_eq!(EntryKind::from_unixfs(42), EntryKind::Raw);
    }

    #[test]
    fn test_directory_is_always_a_menu_even_with_extension() {
        let entry = DirEntry::new("photos.jpg", EntryKind::Directory);
        assert_eq!(entry.item_type(), ItemType::Directory);
    }

    #[test]
    fn test_file_symlink_and_raw_use_inference() {
        assert_eq!(DirEntry::new("a.txt", EntryKind::File).item_type(), ItemType::Text);
        assert_eq!(DirEntry::new("b.png", EntryKind::Symlink).item_type(), ItemType::Image);
        assert_eq!(DirEntry::new("c", EntryKind::Raw).item_type(), ItemType::Binary);
    }
}

//! Selector path helpers.
//!
//! Selectors served by the gateway are IPFS paths such as
//! `/ipfs/<cid>/docs/readme.txt`, so they follow `/`-separated path rules.

/// Returns the directory portion of `selector`: everything before its last `/`.
///
/// A selector directly under the root yields `""`, so that appending a
/// `/`-prefixed remainder never produces a doubled slash.  A selector without
/// any `/` yields `"."`.
///
/// ```rust
/// use ipfs_gopher_core::selector::dir_of;
///
/// assert_eq!(dir_of("/ipfs/Qm/menu"), "/ipfs/Qm");
/// assert_eq!(dir_of("/menu"), "");
/// assert_eq!(dir_of("menu"), ".");
/// ```
pub fn dir_of(selector: &str) -> &str {
    match selector.rfind('/') {
        Some(idx) => &selector[..idx],
        None => ".",
    }
}

/// Joins a child `name` onto a directory `selector` with exactly one `/`
/// between them.
///
/// ```rust
/// use ipfs_gopher_core::selector::join;
///
/// assert_eq!(join("/docs", "readme.txt"), "/docs/readme.txt");
/// assert_eq!(join("/docs/", "img"), "/docs/img");
/// assert_eq!(join("/", "img"), "/img");
/// ```
pub fn join(selector: &str, name: &str) -> String {
    let name = name.trim_start_matches('/');
    if selector.is_empty() {
        return name.to_string();
    }

    let base = selector.trim_end_matches('/');
    let mut joined = String::with_capacity(base.len() + name.len() + 1);
    joined.push_str(base);
    joined.push('/');
    joined.push_str(name);
    joined
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dir_of_nested_selector() {
        assert_eq!(dir_of("/ipfs/QmHash/site/index"), "/ipfs/QmHash/site");
    }

    #[test]
    fn test_dir_of_root_child_is_empty() {
        assert_eq!(dir_of("/gophermap"), "");
    }

    #[test]
    fn test_dir_of_without_slash_is_dot() {
        assert_eq!(dir_of("gophermap"), ".");
        assert_eq!(dir_of(""), ".");
    }

    #[test]
    fn test_dir_of_trailing_slash_keeps_directory() {
        assert_eq!(dir_of("/docs/"), "/docs");
    }

    #[test]
    fn test_join_simple() {
        assert_eq!(join("/docs", "readme.txt"), "/docs/readme.txt");
    }

    #[test]
    fn test_join_collapses_slashes_at_the_seam() {
        assert_eq!(join("/docs//", "/img"), "/docs/img");
    }

    #[test]
    fn test_join_root() {
        assert_eq!(join("/", "a"), "/a");
    }

    #[test]
    fn test_join_empty_selector_returns_name() {
        assert_eq!(join("", "a"), "a");
    }
}

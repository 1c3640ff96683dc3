//! Menu line rewriting.
//!
//! Menus stored in IPFS are written by hand, so their lines are often
//! incomplete: a label with no selector, a selector with no host, and so on.
//! [`LineFixer`] fills in the missing fields so every line a client receives
//! is a valid Gopher wire line.
//!
//! # Rules by field count
//!
//! ```text
//! fields  input                      output
//! ──────  ─────────────────────────  ──────────────────────────────────────
//!   1     .                          .
//!   1     iHello                     iHello  fake      <host>  <port>
//!   1     (empty)                    (empty)
//!   2     0Notes  ./notes.txt        0Notes  <dir>/notes.txt  <host>  <port>
//!   3     1Other  /x  other.host     1Other  /x  other.host  70
//!   4+    anything                   unchanged
//! ```
//!
//! Every output line is terminated with CRLF.

/// Line terminator required by Gopher.
pub const CRLF: &str = "\r\n";

/// The single-field line that ends a menu.
pub const TERMINATOR: &str = ".";

/// Selector written into padded one-field lines.  Such lines are info lines
/// and the client never requests it.
pub const PLACEHOLDER_SELECTOR: &str = "fake";

/// Port appended to three-field lines, which name their own host but no port.
pub const DEFAULT_GOPHER_PORT: u16 = 70;

/// Rewrites loosely written menu lines into complete Gopher wire lines.
///
/// Holds the host and port the gateway advertises, so that selectors which
/// omit them resolve back through this gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineFixer {
    host: String,
    port: u16,
}

impl LineFixer {
    /// Creates a fixer advertising `host:port` in padded lines.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// The advertised host.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// The advertised port.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Rewrites one menu line (without its terminator) into a CRLF-terminated
    /// wire line.
    ///
    /// `current_dir` replaces the leading `.` of a two-field line whose
    /// selector starts with `./`.  Pass `""` for synthetic lines that never
    /// carry relative selectors.
    ///
    /// # Example
    ///
    /// ```rust
    /// use ipfs_gopher_core::LineFixer;
    ///
    /// let fixer = LineFixer::new("gopher.example", 7070);
    /// assert_eq!(
    ///     fixer.fix("0Readme\t./readme.txt", "/ipfs/Qm/docs"),
    ///     "0Readme\t/ipfs/Qm/docs/readme.txt\tgopher.example\t7070\r\n",
    /// );
    /// ```
    pub fn fix(&self, line: &str, current_dir: &str) -> String {
        let fields: Vec<&str> = line.split('\t').collect();
        let mut out = String::with_capacity(line.len() + self.host.len() + 16);

        match fields.as_slice() {
            [only] if *only == TERMINATOR || only.is_empty() => out.push_str(only),
            [label] => {
                out.push_str(label);
                self.push_field(&mut out, PLACEHOLDER_SELECTOR);
                self.push_host_port(&mut out);
            }
            [label, path] => {
                out.push_str(label);
                out.push('\t');
                match path.strip_prefix('.') {
                    Some(rest) if rest.starts_with('/') => {
                        out.push_str(current_dir);
                        out.push_str(rest);
                    }
                    _ => out.push_str(path),
                }
                self.push_host_port(&mut out);
            }
            [_, _, _] => {
                out.push_str(line);
                out.push('\t');
                out.push_str(&DEFAULT_GOPHER_PORT.to_string());
            }
            _ => out.push_str(line),
        }

        out.push_str(CRLF);
        out
    }

    fn push_field(&self, out: &mut String, field: &str) {
        out.push('\t');
        out.push_str(field);
    }

    fn push_host_port(&self, out: &mut String) {
        out.push('\t');
        out.push_str(&self.host);
        out.push('\t');
        out.push_str(&self.port.to_string());
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

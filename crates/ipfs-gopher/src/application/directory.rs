//! Directory listing → Gopher menu synthesis.
//!
//! When a selector names an IPFS directory there is no menu file to forward,
//! so one is built from the listing:
//!
//! ```text
//! iListing /docs  fake  <host>  <port>
//! i               fake  <host>  <port>
//! 0readme.txt     /docs/readme.txt  <host>  <port>
//! 1img            /docs/img         <host>  <port>
//! .
//! ```

use tokio::io::{AsyncWrite, AsyncWriteExt};

use ipfs_gopher_core::{selector::join, ItemType, LineFixer, TERMINATOR};

use crate::domain::DirEntry;

/// Writes a complete menu for the directory `selector` containing `entries`.
///
/// Entries keep the order the backend listed them in.  Returns the number of
/// entry lines written (header, separator and terminator excluded).
///
/// # Errors
///
/// Returns the first write error; the menu is then incomplete.
pub async fn write_directory_menu<W>(
    dst: &mut W,
    selector: &str,
    entries: &[DirEntry],
    fixer: &LineFixer,
) -> std::io::Result<usize>
where
    W: AsyncWrite + Unpin + ?Sized,
{
    // Synthetic lines never carry `./` selectors, so no directory context.
    // A search selector carries a tab; in the label it would start a new field.
    let header = format!("{}Listing {}", ItemType::Info, selector.replace('\t', " "));
    dst.write_all(fixer.fix(&header, "").as_bytes()).await?;
    dst.write_all(fixer.fix(&ItemType::Info.to_string(), "").as_bytes())
        .await?;

    for entry in entries {
        let line = format!(
            "{}{}\t{}",
            entry.item_type(),
            entry.name,
            join(selector, &entry.name)
        );
        dst.write_all(fixer.fix(&line, "").as_bytes()).await?;
    }

    dst.write_all(fixer.fix(TERMINATOR, "").as_bytes()).await?;
    dst.flush().await?;
    Ok(entries.len())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

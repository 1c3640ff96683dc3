//! Marker-sniffing forwarder.
//!
//! A file fetched from IPFS is either served verbatim, or, when it starts
//! with [`SENTINEL`], treated as a hand-written Gopher menu whose lines are
//! rewritten through a [`LineFixer`].
//!
//! ```text
//! <<<ipfs-gopher-menu>>> anything here is dropped
//! iWelcome!                      → iWelcome!\tfake\t<host>\t<port>\r\n
//! 0About\t./about.txt            → 0About\t<dir>/about.txt\t<host>\t<port>\r\n
//! .                              → .\r\n
//! ```
//!
//! # Streaming
//!
//! Nothing is buffered beyond one line: raw content is copied through with
//! `tokio::io::copy`, and each menu line is written as soon as it is fixed.
//! A menu line longer than [`MAX_LINE`] is fixed and written in `MAX_LINE`
//! pieces rather than held in memory.

use thiserror::Error;
use tokio::io::{
    AsyncBufRead, AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader,
};
use tracing::trace;

use ipfs_gopher_core::{selector::dir_of, LineFixer, SENTINEL};

/// Longest embedded menu line handled in one piece, terminator included.
pub const MAX_LINE: usize = 4096;

/// Errors that abort forwarding.
#[derive(Debug, Error)]
pub enum ForwardError {
    #[error("I/O error while forwarding: {0}")]
    Io(#[from] std::io::Error),
}

/// What [`forward`] did with the stream, for request logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForwardOutcome {
    /// Content was copied verbatim.
    Raw { bytes: u64 },
    /// Content was an embedded menu; `lines` lines were rewritten.
    Menu { lines: usize },
}

/// Forwards `src` to `dst`, rewriting it line by line if it is an embedded
/// menu.
///
/// `selector` is the request that produced `src`; its directory portion is
/// used to resolve `./` selectors inside the menu.
///
/// A stream shorter than the sentinel cannot be a menu and is forwarded
/// verbatim like any other raw content.
///
/// # Errors
///
/// Returns [`ForwardError::Io`] on any read or write failure.
pub async fn forward<W, R>(
    dst: &mut W,
    src: &mut R,
    selector: &str,
    fixer: &LineFixer,
) -> Result<ForwardOutcome, ForwardError>
where
    W: AsyncWrite + Unpin + ?Sized,
    R: AsyncRead + Unpin + ?Sized,
{
    let mut head = [0u8; SENTINEL.len()];
    let filled = read_prefix(src, &mut head).await?;

    if &head[..filled] != SENTINEL {
        dst.write_all(&head[..filled]).await?;
        let copied = tokio::io::copy(src, dst).await?;
        dst.flush().await?;
        return Ok(ForwardOutcome::Raw {
            bytes: filled as u64 + copied,
        });
    }

    let current_dir = dir_of(selector);
    let mut reader = BufReader::with_capacity(MAX_LINE, src);
    let mut line = Vec::with_capacity(MAX_LINE);

    // The rest of the sentinel's own line carries nothing for the client.
    skip_line(&mut reader).await?;

    let mut lines = 0;
    let mut in_long_line = false;
    loop {
        line.clear();
        if read_menu_line(&mut reader, &mut line).await? == 0 {
            break;
        }
        let terminated = line.last() == Some(&b'\n');
        strip_line_terminator(&mut line);

        // Bare terminator closing a line already written in pieces.
        if in_long_line && terminated && line.is_empty() {
            in_long_line = false;
            continue;
        }
        in_long_line = !terminated;

        let fixed = fixer.fix(&String::from_utf8_lossy(&line), current_dir);
        trace!("menu line: {:?}", fixed.trim_end());
        dst.write_all(fixed.as_bytes()).await?;
        lines += 1;
    }

    dst.flush().await?;
    Ok(ForwardOutcome::Menu { lines })
}

/// Fills `buf` from `src`, looping over short reads.  Returns fewer than
/// `buf.len()` bytes only if the stream ended first.
async fn read_prefix<R>(src: &mut R, buf: &mut [u8]) -> std::io::Result<usize>
where
    R: AsyncRead + Unpin + ?Sized,
{
    let mut filled = 0;
    while filled < buf.len() {
        match src.read(&mut buf[filled..]).await? {
            0 => break,
            n => filled += n,
        }
    }
    Ok(filled)
}

/// Discards everything up to and including the next `\n`, or to EOF.
/// Consumes the buffer in place, so the line may be any length.
async fn skip_line<R>(reader: &mut R) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin + ?Sized,
{
    loop {
        let buf = reader.fill_buf().await?;
        if buf.is_empty() {
            return Ok(());
        }
        match buf.iter().position(|&b| b == b'\n') {
            Some(end) => {
                reader.consume(end + 1);
                return Ok(());
            }
            None => {
                let len = buf.len();
                reader.consume(len);
            }
        }
    }
}

/// Reads one line, terminator included, into `line`, stopping early after
/// [`MAX_LINE`] bytes.  Returns 0 at EOF.
async fn read_menu_line<R>(reader: &mut R, line: &mut Vec<u8>) -> std::io::Result<usize>
where
    R: AsyncBufRead + Unpin + ?Sized,
{
    (&mut *reader)
        .take(MAX_LINE as u64)
        .read_until(b'\n', line)
        .await
}

fn strip_line_terminator(line: &mut Vec<u8>) {
    if line.last() == Some(&b'\n') {
        line.pop();
        if line.last() == Some(&b'\r') {
            line.pop();
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

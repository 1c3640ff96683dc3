//! Gopher server: accept loop and per-connection handling.
//!
//! This module is responsible for:
//!
//! 1. Binding a TCP listener on the configured address.
//! 2. Accepting incoming connections from Gopher clients.
//! 3. Reading the single selector line each client sends.
//! 4. Handing the selector to the [`SelectorResolver`], which streams the
//!    response straight into the socket.
//! 5. Closing the connection, whether the request succeeded or not.
//! 6. Stopping the accept loop when the `running` flag is cleared.
//!
//! # Scalability
//!
//! Each connection runs in its own Tokio task.  The accept loop never waits
//! for a request to finish: it spawns the task and goes straight back to
//! `accept()`, so a slow IPFS lookup only stalls the client that asked for
//! it.  There is no limit on concurrent connections.
//!
//! # Errors on the wire
//!
//! Gopher has no standard error line, so a failed request is logged and the
//! connection is closed.  The client sees an empty or truncated response.

use std::net::SocketAddr;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::Duration;

use anyhow::Context;
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::time::timeout;
use tracing::{debug, error, info, warn};

use crate::application::{Resolution, SelectorResolver};

/// Longest selector line accepted, terminator included.
pub const MAX_SELECTOR_LEN: usize = 4096;

/// How often the accept loop wakes up to check the shutdown flag.
const ACCEPT_POLL: Duration = Duration::from_millis(200);

/// Errors while reading the request line.
#[derive(Debug, Error)]
pub enum SelectorError {
    #[error("I/O error reading selector: {0}")]
    Io(#[from] std::io::Error),

    #[error("connection closed before a selector was sent")]
    Closed,

    #[error("selector exceeds {limit} bytes")]
    TooLong { limit: usize },

    #[error("selector is not valid UTF-8")]
    NotUtf8,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Binds `listen_addr` and serves Gopher requests until `running` is cleared.
///
/// # Errors
///
/// Returns an error if the listener cannot be bound (address in use, no
/// permission for port 70, unresolvable host name).  Errors after startup
/// are logged and never end the loop.
pub async fn run_server(
    listen_addr: &str,
    resolver: Arc<SelectorResolver>,
    running: Arc<AtomicBool>,
) -> anyhow::Result<()> {
    let listener = TcpListener::bind(listen_addr)
        .await
        .with_context(|| format!("failed to bind Gopher listener on {listen_addr}"))?;

    info!(
        "Gopher gateway listening on {}",
        listener
            .local_addr()
            .map(|a| a.to_string())
            .unwrap_or_else(|_| listen_addr.to_string())
    );

    serve(listener, resolver, running).await;
    Ok(())
}

/// Runs the accept loop on an already bound `listener`.
///
/// Split from [`run_server`] so tests can bind an ephemeral port and learn
/// its address before serving.
pub async fn serve(listener: TcpListener, resolver: Arc<SelectorResolver>, running: Arc<AtomicBool>) {
    loop {
        if !running.load(Ordering::Relaxed) {
            info!("shutdown flag set; stopping accept loop");
            break;
        }

        // Short timeout so the shutdown flag is noticed even when idle.
        match timeout(ACCEPT_POLL, listener.accept()).await {
            Ok(Ok((stream, peer_addr))) => {
                debug!("new Gopher connection from {peer_addr}");
                let resolver = Arc::clone(&resolver);
                tokio::spawn(async move {
                    handle_connection(stream, peer_addr, resolver).await;
                });
            }
            Ok(Err(e)) => {
                // Transient (e.g. out of file descriptors); keep serving.
                error!("accept error: {e}");
            }
            Err(_) => {}
        }
    }
}

// ── Per-connection handler ────────────────────────────────────────────────────

/// Serves one request and logs the outcome.  The stream is dropped, and so
/// closed, when this returns.
pub async fn handle_connection(stream: TcpStream, peer_addr: SocketAddr, resolver: Arc<SelectorResolver>) {
    match serve_request(stream, &resolver).await {
        Ok((selector, Resolution::Content(outcome))) => {
            info!("{peer_addr} {selector:?}: served content ({outcome:?})");
        }
        Ok((selector, Resolution::Directory { entries })) => {
            info!("{peer_addr} {selector:?}: served directory ({entries} entries)");
        }
        Err(e) => warn!("{peer_addr}: request failed: {e:#}"),
    }
}

async fn serve_request(
    mut stream: TcpStream,
    resolver: &SelectorResolver,
) -> anyhow::Result<(String, Resolution)> {
    let (read_half, mut write_half) = stream.split();
    let mut reader = BufReader::new(read_half);

    let selector = read_selector(&mut reader)
        .await
        .context("failed to read selector")?;

    let resolution = resolver
        .resolve(&selector, &mut write_half)
        .await
        .with_context(|| format!("failed to serve {selector:?}"))?;

    write_half.shutdown().await.ok();
    Ok((selector, resolution))
}

/// Reads the request line and strips its `\n` or `\r\n` terminator.
///
/// A final line cut off by EOF is accepted as long as something was sent;
/// an empty line is the root selector `""`.
///
/// # Errors
///
/// - [`SelectorError::Closed`] if the client sent nothing at all.
/// - [`SelectorError::TooLong`] past [`MAX_SELECTOR_LEN`] bytes.
/// - [`SelectorError::NotUtf8`] if the bytes are not UTF-8; IPFS paths are
///   strings, and a rewritten selector would name a different object.
pub async fn read_selector<R>(reader: &mut R) -> Result<String, SelectorError>
where
    R: AsyncBufRead + Unpin,
{
    let mut line = Vec::new();
    let n = (&mut *reader)
        .take(MAX_SELECTOR_LEN as u64)
        .read_until(b'\n', &mut line)
        .await?;

    if n == 0 {
        return Err(SelectorError::Closed);
    }
    if line.last() != Some(&b'\n') && n == MAX_SELECTOR_LEN {
        return Err(SelectorError::TooLong {
            limit: MAX_SELECTOR_LEN,
        });
    }

    if line.last() == Some(&b'\n') {
        line.pop();
        if line.last() == Some(&b'\r') {
            line.pop();
        }
    }
    String::from_utf8(line).map_err(|_| SelectorError::NotUtf8)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    async fn selector_of(input: &[u8]) -> Result<String, SelectorError> {
        let mut reader = input;
        read_selector(&mut reader).await
    }

    #[tokio::test]
    async fn test_crlf_terminated_selector() {
        assert_eq!(selector_of(b"/ipfs/Qm/docs\r\n").await.unwrap(), "/ipfs/Qm/docs");
    }

    #[tokio::test]
    async fn test_lf_terminated_selector() {
        assert_eq!(selector_of(b"/docs\n").await.unwrap(), "/docs");
    }

    #[tokio::test]
    async fn test_empty_line_is_root_selector() {
        assert_eq!(selector_of(b"\r\n").await.unwrap(), "");
    }

    #[tokio::test]
    async fn test_unterminated_selector_at_eof_is_accepted() {
        assert_eq!(selector_of(b"/docs").await.unwrap(), "/docs");
    }

    #[tokio::test]
    async fn test_only_first_line_is_read() {
        let mut reader: &[u8] = b"/first\r\n/second\r\n";

        let selector = read_selector(&mut reader).await.unwrap();

        assert_eq!(selector, "/first");
        assert_eq!(reader, b"/second\r\n");
    }

    #[tokio::test]
    async fn test_nothing_sent_is_closed_error() {
        assert!(matches!(selector_of(b"").await, Err(SelectorError::Closed)));
    }

    #[tokio::test]
    async fn test_overlong_selector_is_rejected() {
        let input = vec![b'a'; MAX_SELECTOR_LEN + 10];

        let result = selector_of(&input).await;

        assert!(matches!(result, Err(SelectorError::TooLong { limit }) if limit == MAX_SELECTOR_LEN));
    }

    #[tokio::test]
    async fn test_selector_with_tab_is_kept_whole() {
        // Type-7 search requests carry "selector\tquery"; the whole line is
        // passed on.
        assert_eq!(selector_of(b"/s\tterm\r\n").await.unwrap(), "/s\tterm");
    }

    #[tokio::test]
    async fn test_non_utf8_selector_is_rejected() {
        let result = selector_of(b"/ipfs/Qm/\xff\xfe\r\n").await;

        assert!(matches!(result, Err(SelectorError::NotUtf8)));
    }

    #[tokio::test]
    async fn test_utf8_selector_is_kept_exactly() {
        assert_eq!(
            selector_of("/ipfs/Qm/caf\u{e9}.txt\r\n".as_bytes()).await.unwrap(),
            "/ipfs/Qm/caf\u{e9}.txt"
        );
    }
}

//! Selector resolution: decide whether a selector is content or a directory
//! and hand it to the right translator.
//!
//! # How the decision is made
//!
//! 1. Ask the backend what the path is ([`ContentBackend::probe`]).  If it
//!    knows, dispatch directly.
//! 2. Otherwise fetch the path as content.  If that fails, assume it is a
//!    directory and list it instead.  Only the listing error is reported.
//!
//! Step 2 exists because IPFS daemons do not report "not found" and "is a
//! directory" in a stable, inspectable way.  A failed fetch is therefore *not*
//! proof that the path is a directory; the listing attempt settles it.

use std::sync::Arc;

use thiserror::Error;
use tokio::io::AsyncWrite;
use tracing::debug;

use ipfs_gopher_core::LineFixer;

use crate::application::backend::{BackendError, ContentBackend};
use crate::application::directory::write_directory_menu;
use crate::application::forwarder::{forward, ForwardError, ForwardOutcome};
use crate::domain::EntryKind;

/// Errors that fail a whole request.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error(transparent)]
    Forward(#[from] ForwardError),

    #[error("I/O error while writing menu: {0}")]
    Io(#[from] std::io::Error),
}

/// How a selector was served.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// The selector named content, forwarded as described.
    Content(ForwardOutcome),
    /// The selector named a directory; a menu with `entries` items was sent.
    Directory { entries: usize },
}

/// Serves selectors from a [`ContentBackend`].
///
/// One resolver is shared by every connection; it holds no per-request state.
pub struct SelectorResolver {
    backend: Arc<dyn ContentBackend>,
    fixer: LineFixer,
}

impl SelectorResolver {
    pub fn new(backend: Arc<dyn ContentBackend>, fixer: LineFixer) -> Self {
        Self { backend, fixer }
    }

    /// Fetches `selector` from the backend and writes the Gopher response to
    /// `dst`.
    ///
    /// # Errors
    ///
    /// - [`GatewayError::Backend`] when the selector can be neither fetched
    ///   nor listed.  Nothing has been written to `dst` in that case.
    /// - [`GatewayError::Forward`] / [`GatewayError::Io`] when streaming the
    ///   response fails part way.
    pub async fn resolve<W>(&self, selector: &str, dst: &mut W) -> Result<Resolution, GatewayError>
    where
        W: AsyncWrite + Unpin + Send + ?Sized,
    {
        match self.backend.probe(selector).await {
            Ok(Some(EntryKind::Directory)) => return self.list(selector, dst).await,
            Ok(Some(kind)) => {
                debug!("{selector}: probed as {kind:?}");
                return self.fetch(selector, dst).await;
            }
            Ok(None) => {}
            Err(e) => debug!("{selector}: probe failed ({e}); falling back to fetch"),
        }

        match self.backend.cat(selector).await {
            Ok(mut stream) => {
                let outcome = forward(dst, &mut stream, selector, &self.fixer).await?;
                Ok(Resolution::Content(outcome))
            }
            Err(e) => {
                debug!("{selector}: fetch failed ({e}); retrying as directory");
                self.list(selector, dst).await
            }
        }
    }

    async fn fetch<W>(&self, selector: &str, dst: &mut W) -> Result<Resolution, GatewayError>
    where
        W: AsyncWrite + Unpin + Send + ?Sized,
    {
        let mut stream = self.backend.cat(selector).await?;
        let outcome = forward(dst, &mut stream, selector, &self.fixer).await?;
        Ok(Resolution::Content(outcome))
    }

    async fn list<W>(&self, selector: &str, dst: &mut W) -> Result<Resolution, GatewayError>
    where
        W: AsyncWrite + Unpin + Send + ?Sized,
    {
        let entries = self.backend.ls(selector).await?;
        let written = write_directory_menu(dst, selector, &entries, &self.fixer).await?;
        Ok(Resolution::Directory { entries: written })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

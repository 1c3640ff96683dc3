//! The content backend seam.
//!
//! The resolver only needs two things from storage: "give me the bytes at this
//! path" and "list the directory at this path".  [`ContentBackend`] captures
//! exactly that, so the translation logic can be tested against an in-memory
//! double while production wires in the IPFS HTTP client.

use std::pin::Pin;

use async_trait::async_trait;
use thiserror::Error;
use tokio::io::AsyncRead;

use crate::domain::{DirEntry, EntryKind};

/// A streamed file body returned by [`ContentBackend::cat`].
pub type ContentStream = Pin<Box<dyn AsyncRead + Send>>;

/// Errors reported by a content backend.
#[derive(Debug, Error)]
pub enum BackendError {
    /// The request never produced a response (connection refused, DNS, ...).
    #[error("backend request failed: {0}")]
    Request(String),

    /// The backend answered with a non-success status.
    ///
    /// `message` carries the backend's own explanation when it sent one,
    /// e.g. `"this dag node is a directory"`.
    #[error("backend returned status {status}: {message}")]
    Status { status: u16, message: String },

    /// The response body could not be decoded.
    #[error("failed to decode backend response: {0}")]
    Decode(String),
}

/// Read-only access to content-addressed storage.
///
/// Implementations must be cheap to share: one instance serves every
/// connection through an `Arc<dyn ContentBackend>`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContentBackend: Send + Sync {
    /// Starts streaming the content stored at `path`.
    ///
    /// Fails when `path` does not exist *or* is a directory; many backends do
    /// not let callers tell those two apart.
    async fn cat(&self, path: &str) -> Result<ContentStream, BackendError>;

    /// Lists the children of the directory at `path`, in backend order.
    async fn ls(&self, path: &str) -> Result<Vec<DirEntry>, BackendError>;

    /// Reports what `path` is, when the backend can say so cheaply.
    ///
    /// `Ok(None)` means "cannot tell"; the resolver then falls back to trying
    /// [`Self::cat`] first and [`Self::ls`] on failure.
    async fn probe(&self, _path: &str) -> Result<Option<EntryKind>, BackendError> {
        Ok(None)
    }
}

//! HTTP client for the IPFS daemon's RPC API (`/api/v0`).
//!
//! Implements [`ContentBackend`] with three RPC commands:
//!
//! | Command      | Used for                   | Response                     |
//! |--------------|----------------------------|------------------------------|
//! | `cat`        | [`ContentBackend::cat`]    | raw file bytes, streamed     |
//! | `ls`         | [`ContentBackend::ls`]     | JSON `{"Objects":[{Links}]}` |
//! | `files/stat` | [`ContentBackend::probe`]  | JSON `{"Type":"directory"}`  |
//!
//! The RPC API only accepts `POST`.  Every command takes the IPFS path in the
//! `arg` query parameter.
//!
//! # Streaming
//!
//! `cat` bodies are never buffered whole: the response's byte stream is
//! adapted into an `AsyncRead` with `tokio_util::io::StreamReader`, so a large
//! file flows to the Gopher client chunk by chunk.

use async_trait::async_trait;
use futures_util::TryStreamExt;
use serde::Deserialize;
use tokio_util::io::StreamReader;
use tracing::debug;

use crate::application::backend::{BackendError, ContentBackend, ContentStream};
use crate::domain::{DirEntry, EntryKind};

// ── Response schemas ──────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct LsResponse {
    #[serde(default)]
    objects: Vec<LsObject>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct LsObject {
    #[serde(default)]
    links: Vec<LsLink>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct LsLink {
    name: String,
    #[serde(rename = "Type", default)]
    kind: i32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct StatResponse {
    #[serde(rename = "Type")]
    kind: String,
}

/// Body the daemon sends with non-2xx responses.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ApiErrorBody {
    message: String,
}

// ── Client ────────────────────────────────────────────────────────────────────

/// [`ContentBackend`] backed by a Kubo-compatible IPFS daemon.
#[derive(Debug, Clone)]
pub struct IpfsClient {
    client: reqwest::Client,
    api_url: String,
}

impl IpfsClient {
    /// Creates a client for the RPC API rooted at `api_url`
    /// (e.g. `http://localhost:5001/api/v0`).
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Request`] if the HTTP client cannot be built
    /// (e.g. the TLS backend fails to initialise).
    pub fn new(api_url: impl Into<String>) -> Result<Self, BackendError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("ipfs-gopher/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| BackendError::Request(e.to_string()))?;

        Ok(Self {
            client,
            api_url: api_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, command: &str) -> String {
        format!("{}/{command}", self.api_url)
    }

    /// Issues `POST <api>/<command>?arg=<path>` and checks the status.
    async fn call(&self, command: &str, path: &str) -> Result<reqwest::Response, BackendError> {
        debug!("ipfs {command} {path}");

        let response = self
            .client
            .post(self.endpoint(command))
            .query(&[("arg", path)])
            .send()
            .await
            .map_err(|e| BackendError::Request(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(BackendError::Status {
            status: status.as_u16(),
            message: error_message(&body),
        })
    }
}

#[async_trait]
impl ContentBackend for IpfsClient {
    async fn cat(&self, path: &str) -> Result<ContentStream, BackendError> {
        let response = self.call("cat", path).await?;
        let body = response.bytes_stream().map_err(std::io::Error::other);
        Ok(Box::pin(StreamReader::new(body)))
    }

    async fn ls(&self, path: &str) -> Result<Vec<DirEntry>, BackendError> {
        let body = self
            .call("ls", path)
            .await?
            .text()
            .await
            .map_err(|e| BackendError::Request(e.to_string()))?;
        parse_ls(&body)
    }

    async fn probe(&self, path: &str) -> Result<Option<EntryKind>, BackendError> {
        let body = self
            .call("files/stat", path)
            .await?
            .text()
            .await
            .map_err(|e| BackendError::Request(e.to_string()))?;
        parse_stat(&body)
    }
}

// ── Response parsing ──────────────────────────────────────────────────────────

/// Flattens the links of every object in an `ls` response, preserving order.
fn parse_ls(body: &str) -> Result<Vec<DirEntry>, BackendError> {
    let response: LsResponse =
        serde_json::from_str(body).map_err(|e| BackendError::Decode(e.to_string()))?;

    Ok(response
        .objects
        .into_iter()
        .flat_map(|object| object.links)
        .map(|link| DirEntry::new(link.name, EntryKind::from_unixfs(link.kind)))
        .collect())
}

/// Maps a `files/stat` response to an entry kind; unknown types yield `None`.
fn parse_stat(body: &str) -> Result<Option<EntryKind>, BackendError> {
    let stat: StatResponse =
        serde_json::from_str(body).map_err(|e| BackendError::Decode(e.to_string()))?;

    Ok(match stat.kind.as_str() {
        "directory" => Some(EntryKind::Directory),
        "file" => Some(EntryKind::File),
        "symlink" => Some(EntryKind::Symlink),
        _ => None,
    })
}

/// Extracts the daemon's `Message` from an error body, or returns the body
/// itself when it is not the usual JSON error object.
fn error_message(body: &str) -> String {
    serde_json::from_str::<ApiErrorBody>(body)
        .map(|e| e.message)
        .unwrap_or_else(|_| body.trim().to_string())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    // ── Parsing ───────────────────────────────────────────────────────────────

    #[test]
    fn test_parse_ls_flattens_links_in_order() {
        // Arrange: shape of a Kubo `ls` response
        let body = r#"{"Objects":[{"Hash":"QmDir","Links":[
            {"Name":"readme.txt","Hash":"QmA","Size":12,"Type":2,"Target":""},
            {"Name":"img","Hash":"QmB","Size":0,"Type":1,"Target":""},
            {"Name":"link","Hash":"QmC","Size":0,"Type":4,"Target":"readme.txt"}
        ]}]}"#;

        // Act
        let entries = parse_ls(body).unwrap();

        // Assert
        assert_eq!(
            entries,
            vec![
                DirEntry::new("readme.txt", EntryKind::File),
                DirEntry::new("img", EntryKind::Directory),
                DirEntry::new("link", EntryKind::Symlink),
            ]
        );
    }

    #[test]
    fn test_parse_ls_empty_directory() {
        let entries = parse_ls(r#"{"Objects":[{"Hash":"QmEmpty","Links":[]}]}"#).unwrap();
        assert!(entries.is_empty());
    }

    #[test]
    fn test_parse_ls_missing_type_is_raw() {
        let entries = parse_ls(r#"{"Objects":[{"Links":[{"Name":"blob"}]}]}"#).unwrap();
        assert_eq!(entries, vec![DirEntry::new("blob", EntryKind::Raw)]);
    }

    #[test]
    fn test_parse_ls_invalid_json_is_decode_error() {
        assert!(matches!(parse_ls("not json"), Err(BackendError::Decode(_))));
    }

    #[test]
    fn test_parse_stat_types() {
        assert_eq!(
            parse_stat(r#"{"Hash":"Qm","Type":"directory"}"#).unwrap(),
            Some(EntryKind::Directory)
        );
        assert_eq!(
            parse_stat(r#"{"Hash":"Qm","Type":"file"}"#).unwrap(),
            Some(EntryKind::File)
        );
        assert_eq!(parse_stat(r#"{"Type":"weird"}"#).unwrap(), None);
    }

    #[test]
    fn test_error_message_prefers_json_message() {
        let body = r#"{"Message":"this dag node is a directory","Code":0,"Type":"error"}"#;
        assert_eq!(error_message(body), "this dag node is a directory");
    }

    #[test]
    fn test_error_message_falls_back_to_plain_body() {
        assert_eq!(error_message("  404 page not found\n"), "404 page not found");
    }

    #[test]
    fn test_endpoint_joins_without_double_slash() {
        let client = IpfsClient::new("http://localhost:5001/api/v0/").unwrap();
        assert_eq!(client.endpoint("cat"), "http://localhost:5001/api/v0/cat");
        assert_eq!(
            client.endpoint("files/stat"),
            "http://localhost:5001/api/v0/files/stat"
        );
    }

    // ── Against a stub daemon ─────────────────────────────────────────────────

    /// Serves one HTTP request with a canned response and returns the request
    /// line the client sent.
    async fn stub_daemon(status: &'static str, body: &'static [u8]) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let api_url = format!("http://{}/api/v0", listener.local_addr().unwrap());

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }

            let head = format!(
                "HTTP/1.1 {status}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                body.len()
            );
            socket.write_all(head.as_bytes()).await.unwrap();
            socket.write_all(body).await.unwrap();
            socket.shutdown().await.ok();

            let text = String::from_utf8_lossy(&request).to_string();
            text.lines().next().unwrap_or_default().to_string()
        });

        (api_url, handle)
    }

    #[tokio::test]
    async fn test_cat_streams_body_and_posts_arg() {
        // Arrange
        let (api_url, daemon) = stub_daemon("200 OK", b"file contents\x00\xff").await;
        let client = IpfsClient::new(api_url).unwrap();

        // Act
        let mut stream = client.cat("/ipfs/QmFile").await.unwrap();
        let mut body = Vec::new();
        stream.read_to_end(&mut body).await.unwrap();
        let request_line = daemon.await.unwrap();

        // Assert
        assert_eq!(body, b"file contents\x00\xff");
        assert!(request_line.starts_with("POST /api/v0/cat?arg=%2Fipfs%2FQmFile"));
    }

    #[tokio::test]
    async fn test_cat_error_status_carries_daemon_message() {
        let (api_url, daemon) = stub_daemon(
            "500 Internal Server Error",
            br#"{"Message":"this dag node is a directory","Code":0,"Type":"error"}"#,
        )
        .await;
        let client = IpfsClient::new(api_url).unwrap();

        let result = client.cat("/ipfs/QmDir").await;
        daemon.await.unwrap();

        match result {
            Err(BackendError::Status { status, message }) => {
                assert_eq!(status, 500);
                assert_eq!(message, "this dag node is a directory");
            }
            Err(other) => panic!("expected status error, got {other:?}"),
            Ok(_) => panic!("expected status error, got a stream"),
        }
    }

    #[tokio::test]
    async fn test_ls_decodes_listing() {
        let (api_url, daemon) = stub_daemon(
            "200 OK",
            br#"{"Objects":[{"Hash":"QmD","Links":[{"Name":"a.txt","Hash":"QmA","Size":1,"Type":2}]}]}"#,
        )
        .await;
        let client = IpfsClient::new(api_url).unwrap();

        let entries = client.ls("/ipfs/QmD").await.unwrap();
        let request_line = daemon.await.unwrap();

        assert_eq!(entries, vec![DirEntry::new("a.txt", EntryKind::File)]);
        assert!(request_line.starts_with("POST /api/v0/ls?arg="));
    }

    #[tokio::test]
    async fn test_probe_uses_files_stat() {
        let (api_url, daemon) =
            stub_daemon("200 OK", br#"{"Hash":"QmD","Type":"directory"}"#).await;
        let client = IpfsClient::new(api_url).unwrap();

        let kind = client.probe("/ipfs/QmD").await.unwrap();
        let request_line = daemon.await.unwrap();

        assert_eq!(kind, Some(EntryKind::Directory));
        assert!(request_line.starts_with("POST /api/v0/files/stat?arg="));
    }

    #[tokio::test]
    async fn test_unreachable_daemon_is_request_error() {
        // Bind then drop to get a port nobody is listening on.
        let addr = TcpListener::bind("127.0.0.1:0")
            .await
            .unwrap()
            .local_addr()
            .unwrap();
        let client = IpfsClient::new(format!("http://{addr}/api/v0")).unwrap();

        let result = client.ls("/ipfs/Qm").await;

        assert!(matches!(result, Err(BackendError::Request(_))));
    }
}

use reqwest::blocking::Client;
use reqwest::StatusCode;
use tracing::debug;

use crate::command::{DeleteReply, Entry};
use crate::error::{KvMirrorError, Result};

/// A trait for the remote side of the store: one method per supported operation.
///
/// The dispatcher is generic over this trait so it can run against the real
/// HTTP client or against a scripted stand-in in tests. Implementations issue
/// exactly one remote call per method invocation and never retry.
pub trait RemoteStore {
    /// stores `key`/`value` on the remote store, overwriting any previous value
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// fetches the entry for `key` from the remote store
    ///
    /// Returns `Ok(None)` if the key does not exist. Absence is a normal
    /// outcome, not an error.
    fn get(&self, key: &str) -> Result<Option<Entry>>;

    /// deletes `key` from the remote store
    ///
    /// Returns `Ok(false)` if the key was not present; true if it was deleted.
    fn delete(&self, key: &str) -> Result<bool>;
}

/// `HttpRemoteStore` speaks the store's HTTP wire protocol against a fixed base URL:
/// `POST {base}/set`, `GET {base}/get/{key}`, `DELETE {base}/del/{key}`, with
/// key/value payloads serialized as JSON.
///
/// Response mapping per the wire contract:
/// - 200 is parsed into the operation's typed payload; a 200 body that does not
///   decode is reported as [`KvMirrorError::MalformedResponse`], never trusted.
/// - 404 on GET becomes `Ok(None)`.
/// - any other status becomes [`KvMirrorError::RemoteError`] carrying the status.
///
/// A transport-level failure (server unreachable, connection reset) is reported
/// as [`KvMirrorError::ConnectionFailure`] so callers can tell it apart from an
/// application-level error status. No timeout is configured beyond the
/// transport default.
pub struct HttpRemoteStore {
    base_url: String,
    client: Client,
}

impl HttpRemoteStore {
    /// creates a client for the remote store rooted at `base_url`.
    /// A trailing `/` on the URL is tolerated and trimmed.
    ///
    /// # Errors
    /// returns [`KvMirrorError::InvalidInput`] if `base_url` is not an absolute
    /// http(s) URL
    pub fn new(base_url: &str) -> Result<Self> {
        let url = reqwest::Url::parse(base_url)
            .map_err(|e| KvMirrorError::InvalidInput(format!("invalid server url {}: {}", base_url, e)))?;
        match url.scheme() {
            "http" | "https" => {}
            other => {
                return Err(KvMirrorError::InvalidInput(format!(
                    "unsupported url scheme: {}",
                    other
                )))
            }
        }

        Ok(HttpRemoteStore {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: Client::new(),
        })
    }

    /// the normalized base URL requests are issued against
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl RemoteStore for HttpRemoteStore {
    fn set(&self, key: &str, value: &str) -> Result<()> {
        let body = Entry {
            key: key.to_string(),
            value: value.to_string(),
        };
        let resp = self
            .client
            .post(format!("{}/set", self.base_url))
            .json(&body)
            .send()
            .map_err(connection_failure)?;
        debug!(status = %resp.status(), key, "set response");

        match resp.status() {
            StatusCode::OK => Ok(()),
            status => Err(KvMirrorError::RemoteError {
                status: status.as_u16(),
            }),
        }
    }

    fn get(&self, key: &str) -> Result<Option<Entry>> {
        let resp = self
            .client
            .get(format!("{}/get/{}", self.base_url, key))
            .send()
            .map_err(connection_failure)?;
        debug!(status = %resp.status(), key, "get response");

        match resp.status() {
            StatusCode::OK => {
                let entry: Entry = resp
                    .json()
                    .map_err(|e| KvMirrorError::MalformedResponse(e.to_string()))?;
                Ok(Some(entry))
            }
            StatusCode::NOT_FOUND => Ok(None),
            status => Err(KvMirrorError::RemoteError {
                status: status.as_u16(),
            }),
        }
    }

    fn delete(&self, key: &str) -> Result<bool> {
        let resp = self
            .client
            .delete(format!("{}/del/{}", self.base_url, key))
            .send()
            .map_err(connection_failure)?;
        debug!(status = %resp.status(), key, "del response");

        match resp.status() {
            StatusCode::OK => {
                let reply: DeleteReply = resp
                    .json()
                    .map_err(|e| KvMirrorError::MalformedResponse(e.to_string()))?;
                Ok(reply.deleted)
            }
            status => Err(KvMirrorError::RemoteError {
                status: status.as_u16(),
            }),
        }
    }
}

/// classifies a reqwest transport error as a connection failure
fn connection_failure(e: reqwest::Error) -> KvMirrorError {
    KvMirrorError::ConnectionFailure(e.to_string())
}

use std::path::PathBuf;
use thiserror::Error;

/// type alias for all operations in this crate that could fail with a [`KvMirrorError`]
pub type Result<T> = std::result::Result<T, KvMirrorError>;

/// The error variants produced by the client core.
///
/// Remote and storage failures are always returned as one of these variants so the
/// presentation layer only ever renders the `Display` message; it never has to
/// re-derive a failure from a raw HTTP response or catch a panic.
///
/// "Not found" is deliberately absent: a missing key is a normal negative outcome
/// of a GET or DEL, not an error.
#[derive(Debug, Error)]
pub enum KvMirrorError {
    /// the requested operation was rejected before any network call was made
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// the remote store could not be reached at the transport level
    #[error("cannot reach the remote store: {0}")]
    ConnectionFailure(String),

    /// the remote store answered with a status the wire contract does not define
    #[error("remote store returned unexpected status {status}")]
    RemoteError {
        /// the HTTP status code the server responded with
        status: u16,
    },

    /// the remote store answered 200 but the body did not decode to the expected shape
    #[error("remote store returned a malformed response: {0}")]
    MalformedResponse(String),

    /// the persisted mirror document exists but does not parse as a JSON object.
    ///
    /// Fatal to loading the mirror. Never masked as an empty store, since the next
    /// write would then overwrite whatever the unreadable document still holds.
    #[error("mirror document at {} is corrupt: {}", .path.display(), .source)]
    CorruptStore {
        /// path of the unreadable document
        path: PathBuf,
        /// the underlying parse failure
        source: serde_json::Error,
    },

    /// file IO on the mirror document failed
    #[error("mirror io error: {0}")]
    Io(#[from] std::io::Error),

    /// encoding the mirror document failed
    #[error("mirror serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

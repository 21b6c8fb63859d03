use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{KvMirrorError, Result};

/// These are the operations that can be requested against the remote key/value store
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// set a key/value in the store
    Set {
        /// the key to set
        key: String,
        /// the value to set
        value: String,
    },
    /// get the value for a key from the store
    Get {
        /// the key to look up
        key: String,
    },
    /// delete a key/value from the store
    Del {
        /// the key to delete
        key: String,
    },
}

impl Operation {
    /// returns the kind of this operation
    pub fn kind(&self) -> OpKind {
        match self {
            Operation::Set { .. } => OpKind::Set,
            Operation::Get { .. } => OpKind::Get,
            Operation::Del { .. } => OpKind::Del,
        }
    }

    /// returns the key this operation targets
    pub fn key(&self) -> &str {
        match self {
            Operation::Set { key, .. } | Operation::Get { key } | Operation::Del { key } => key,
        }
    }

    /// validates this operation before it is allowed anywhere near the network.
    /// The key must be non-empty for every operation, and SET additionally
    /// requires a non-empty value.
    ///
    /// # Errors
    /// returns [`KvMirrorError::InvalidInput`] describing the rejected field
    pub(crate) fn validate(&self) -> Result<()> {
        if self.key().is_empty() {
            return Err(KvMirrorError::InvalidInput("key cannot be empty".into()));
        }
        if let Operation::Set { value, .. } = self {
            if value.is_empty() {
                return Err(KvMirrorError::InvalidInput(
                    "value cannot be empty for a SET operation".into(),
                ));
            }
        }
        Ok(())
    }
}

/// The three operation kinds, as recorded in the history log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OpKind {
    /// a SET operation
    Set,
    /// a GET operation
    Get,
    /// a DEL operation
    Del,
}

impl fmt::Display for OpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OpKind::Set => write!(f, "SET"),
            OpKind::Get => write!(f, "GET"),
            OpKind::Del => write!(f, "DEL"),
        }
    }
}

/// A key/value pair as it travels on the wire.
///
/// The same JSON shape serves as the `POST /set` request body and the
/// `GET /get/{key}` response body: `{"key": ..., "value": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// the entry's key
    pub key: String,
    /// the entry's value
    pub value: String,
}

/// Response body of `DELETE /del/{key}`: whether the key existed and was removed
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DeleteReply {
    /// true if the key was present on the server and has been deleted
    pub deleted: bool,
}

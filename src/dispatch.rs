use std::collections::BTreeMap;
use std::path::PathBuf;

use tracing::{debug, info};

use crate::command::{OpKind, Operation};
use crate::error::Result;
use crate::history::{HistoryLog, HistoryRecord, STATUS_DELETED, STATUS_NOT_FOUND};
use crate::mirror::MirrorStore;
use crate::remote::{HttpRemoteStore, RemoteStore};

/// default base URL of the remote store
pub const DEFAULT_SERVER_URL: &str = "http://localhost:8080";
/// default path of the persisted mirror document
pub const DEFAULT_MIRROR_PATH: &str = "kvstore_db.json";

/// Whether a successful GET writes the fetched entry back into the mirror.
///
/// The mirror can serve two different jobs. As an audit mirror it replays only
/// confirmed SET/DEL operations, so a GET must not touch it. As a local cache it
/// should absorb everything the server returns. Which one a session wants is
/// policy, so it is configured here rather than fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GetMirroring {
    /// GET never mutates the mirror; it reflects confirmed SET/DEL only (default)
    #[default]
    AuditOnly,
    /// a successful GET upserts the fetched entry into the mirror
    Refresh,
}

/// Configuration for a [`Session`]: where the remote store lives, where the
/// mirror document is persisted, and the GET mirroring policy.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// base URL of the remote store
    pub server_url: String,
    /// path of the persisted mirror document
    pub mirror_path: PathBuf,
    /// GET mirroring policy
    pub get_mirroring: GetMirroring,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            server_url: DEFAULT_SERVER_URL.to_string(),
            mirror_path: PathBuf::from(DEFAULT_MIRROR_PATH),
            get_mirroring: GetMirroring::default(),
        }
    }
}

/// How a dispatched operation ended, from the presentation layer's point of view.
///
/// Failures are not represented here: a failed dispatch returns the crate error
/// instead, and leaves no trace in the mirror or the history log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeKind {
    /// the operation did what was asked
    Success,
    /// the targeted key does not exist on the server (GET miss, or DEL of an
    /// absent key); a negative result, not an error
    NotFound,
}

/// The result event emitted for every completed dispatch.
///
/// Carries enough structure for a front-end to render a status line and append a
/// table row without ever looking at a raw HTTP response.
#[derive(Debug, Clone)]
pub struct OperationOutcome {
    /// how the operation ended
    pub kind: OutcomeKind,
    /// which operation ran
    pub operation: OpKind,
    /// the key the operation targeted
    pub key: String,
    /// the value involved, when there is one (the value set, or the value fetched)
    pub value: Option<String>,
    /// a ready-to-display status line
    pub message: String,
}

impl OperationOutcome {
    /// true when a front-end should clear its input fields after this outcome,
    /// which is what the reference client does after a confirmed SET or DEL
    pub fn resets_input(&self) -> bool {
        self.kind == OutcomeKind::Success && self.operation != OpKind::Get
    }
}

/// One user session over the store: the remote client, the persisted local
/// mirror, and the in-memory history log, owned together so that exactly one
/// component decides when the mirror changes and when history grows.
///
/// `Session` is the only mutator of its mirror and log; front-ends read
/// snapshots through [`history`](Session::history) and
/// [`mirror_snapshot`](Session::mirror_snapshot). It holds no presentation
/// state. `execute` takes `&mut self`, so one operation completes before the
/// next starts; the remote call inside it is the only blocking point and is
/// never retried or abandoned mid-flight.
///
/// The mirror is mutated strictly after the remote store acknowledges an
/// operation. There are no optimistic writes: on any connection failure or
/// unexpected remote status, mirror and history are left exactly as they were.
pub struct Session<R: RemoteStore> {
    remote: R,
    mirror: MirrorStore,
    history: HistoryLog,
    get_mirroring: GetMirroring,
}

impl Session<HttpRemoteStore> {
    /// opens a session against the remote store named by `config`.
    ///
    /// The mirror document is loaded here, once, so a corrupt document is
    /// reported before any operation runs.
    ///
    /// # Errors
    /// returns [`KvMirrorError::InvalidInput`](crate::KvMirrorError::InvalidInput)
    /// for an unusable server URL, or
    /// [`KvMirrorError::CorruptStore`](crate::KvMirrorError::CorruptStore) if the
    /// mirror document exists but does not parse
    pub fn connect(config: SessionConfig) -> Result<Self> {
        let remote = HttpRemoteStore::new(&config.server_url)?;
        let mirror = MirrorStore::open(&config.mirror_path)?;
        info!(server = %remote.base_url(), mirror = %config.mirror_path.display(), "session opened");
        Ok(Session::with_remote(remote, mirror, config.get_mirroring))
    }
}

impl<R: RemoteStore> Session<R> {
    /// builds a session from its parts. This is how tests (and any alternative
    /// transport) plug in a different [`RemoteStore`] implementation.
    pub fn with_remote(remote: R, mirror: MirrorStore, get_mirroring: GetMirroring) -> Self {
        Session {
            remote,
            mirror,
            history: HistoryLog::new(),
            get_mirroring,
        }
    }

    /// validates and dispatches one operation, reconciles the confirmed result
    /// into the mirror, and appends a history record for the finalized outcome.
    ///
    /// # Errors
    /// - [`KvMirrorError::InvalidInput`](crate::KvMirrorError::InvalidInput) for
    ///   an empty key, or an empty value on SET; no remote call is made.
    /// - any error from the remote client, propagated unchanged. The mirror and
    ///   the history log are untouched in every error case.
    pub fn execute(&mut self, op: Operation) -> Result<OperationOutcome> {
        op.validate()?;
        debug!(kind = %op.kind(), key = op.key(), "dispatching");

        match op {
            Operation::Set { key, value } => {
                self.remote.set(&key, &value)?;
                self.mirror.upsert(&key, &value)?;
                self.history
                    .append(HistoryRecord::new(OpKind::Set, &key, &value));
                Ok(OperationOutcome {
                    kind: OutcomeKind::Success,
                    operation: OpKind::Set,
                    message: format!("stored {}", key),
                    key,
                    value: Some(value),
                })
            }

            Operation::Get { key } => match self.remote.get(&key)? {
                Some(entry) => {
                    if self.get_mirroring == GetMirroring::Refresh {
                        self.mirror.upsert(&entry.key, &entry.value)?;
                    }
                    self.history
                        .append(HistoryRecord::new(OpKind::Get, &entry.key, &entry.value));
                    Ok(OperationOutcome {
                        kind: OutcomeKind::Success,
                        operation: OpKind::Get,
                        message: format!("found {}", entry.key),
                        key: entry.key,
                        value: Some(entry.value),
                    })
                }
                None => {
                    self.history
                        .append(HistoryRecord::new(OpKind::Get, &key, STATUS_NOT_FOUND));
                    Ok(OperationOutcome {
                        kind: OutcomeKind::NotFound,
                        operation: OpKind::Get,
                        message: format!("key {} not found", key),
                        key,
                        value: None,
                    })
                }
            },

            Operation::Del { key } => {
                if self.remote.delete(&key)? {
                    self.mirror.remove(&key)?;
                    self.history
                        .append(HistoryRecord::new(OpKind::Del, &key, STATUS_DELETED));
                    Ok(OperationOutcome {
                        kind: OutcomeKind::Success,
                        operation: OpKind::Del,
                        message: format!("deleted {}", key),
                        key,
                        value: None,
                    })
                } else {
                    self.history
                        .append(HistoryRecord::new(OpKind::Del, &key, STATUS_NOT_FOUND));
                    Ok(OperationOutcome {
                        kind: OutcomeKind::NotFound,
                        operation: OpKind::Del,
                        message: format!("key {} not found", key),
                        key,
                        value: None,
                    })
                }
            }
        }
    }

    /// the executed-operation records, oldest first
    pub fn history(&self) -> &[HistoryRecord] {
        self.history.snapshot()
    }

    /// a snapshot of the persisted mirror document
    ///
    /// # Errors
    /// returns [`KvMirrorError::CorruptStore`](crate::KvMirrorError::CorruptStore)
    /// if the document was made unreadable behind this session's back
    pub fn mirror_snapshot(&self) -> Result<BTreeMap<String, String>> {
        self.mirror.load()
    }

    /// empties the history log. The mirror is untouched.
    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// "clear database": resets the persisted mirror document to an empty
    /// mapping and empties the history log with it. The remote store is not
    /// consulted. Safe to call repeatedly.
    pub fn clear_mirror(&mut self) -> Result<()> {
        self.mirror.clear()?;
        self.history.clear();
        info!("mirror and history cleared");
        Ok(())
    }
}

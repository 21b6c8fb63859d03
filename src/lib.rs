#![deny(missing_docs)]
//! The client-side core of a desktop front-end for a remote key-value store, mapping
//! [`String`] keys to [`String`] values.
//!
//! This crate provides the operation dispatcher and local-mirror synchronization
//! logic behind such a front-end, as well as a [`kvmirror-client`] executable that
//! drives it from the command line. Key/value data is exchanged with the remote
//! store over HTTP, with request and response payloads serialized as JSON.
//!
//! ## Supported Store Operations
//! The core supports three operations against the remote store:
//!
//! - `SET` a key/value pair in the store
//! - `GET` the value associated with a key
//! - `DEL` a key/value pair from the store
//!
//! See [`Operation`] and [`OperationOutcome`] for the structure of a request and
//! its result event.
//!
//! ## Session
//! [`Session`] is the brains of this operation. A front-end hands it an
//! [`Operation`]; the session validates it, sends it to the remote store through
//! a [`RemoteStore`] implementation, and on confirmation reconciles the result
//! into its two local components:
//!
//! - the [`MirrorStore`], a persisted JSON document holding every key/value the
//!   server has confirmed. It is mutated only after the remote store
//!   acknowledges an operation, never speculatively, so it always replays as the
//!   sequence of confirmed SET/DEL operations.
//! - the [`HistoryLog`], an append-only, insertion-ordered record of executed
//!   operations, which the front-end renders as its history table.
//!
//! A failed dispatch (unreachable server, unexpected status) changes neither of
//! them; the typed [`KvMirrorError`] is returned for display.
//!
//! ## Wire Protocol
//! The remote store is an external collaborator reached through a fixed HTTP
//! contract: `POST {base}/set` with body `{"key": ..., "value": ...}`,
//! `GET {base}/get/{key}` answering the same entry shape (404 when absent), and
//! `DELETE {base}/del/{key}` answering `{"deleted": bool}`.
//! [`HttpRemoteStore`] implements this contract; anything else that implements
//! [`RemoteStore`] can stand in for it.
//!
//! ## Mirror Document
//! The mirror is one JSON object at a configured path, top-level keys = store
//! keys. An absent file is an empty store; every mutation rewrites the document
//! in full. A document that fails to parse is reported as
//! [`KvMirrorError::CorruptStore`] rather than silently discarded.
//!
//! ## Client executable
//! The [`kvmirror-client`] binary is the provided presentation layer: one-shot
//! `set`/`get`/`rm` subcommands in addition to an interactive shell with the
//! history table and the clear operations.
//!
//! [`String`]: https://doc.rust-lang.org/std/string/struct.String.html
//! [`kvmirror-client`]: ./bin/kvmirror-client.rs

pub use command::{DeleteReply, Entry, OpKind, Operation};
pub use dispatch::{
    GetMirroring, OperationOutcome, OutcomeKind, Session, SessionConfig, DEFAULT_MIRROR_PATH,
    DEFAULT_SERVER_URL,
};
pub use error::{KvMirrorError, Result};
pub use history::{HistoryLog, HistoryRecord, STATUS_DELETED, STATUS_NOT_FOUND};
pub use mirror::MirrorStore;
pub use remote::{HttpRemoteStore, RemoteStore};

mod command;
mod dispatch;
mod error;
mod history;
mod mirror;
mod remote;

//! CLI tests for the `kvmirror-client` binary. Everything here runs without a
//! live server: validation failures stop before the network, and the mirror
//! subcommands are purely local.

use std::fs;
use std::net::TcpListener;
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use tempfile::TempDir;

fn client() -> Command {
    Command::cargo_bin("kvmirror-client").expect("binary not built")
}

/// a 127.0.0.1 url that refuses connections
fn dead_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

#[test]
fn empty_key_fails_before_any_network_call() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("mirror.json");
    let url = dead_url();

    client()
        .args(&[
            "--url",
            url.as_str(),
            "--db-file",
            db.to_str().unwrap(),
            "set",
            "",
            "1",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("key cannot be empty").from_utf8());

    // no mirror document was created along the way
    assert!(!db.exists());
}

#[test]
fn empty_value_on_set_is_rejected() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("mirror.json");
    let url = dead_url();

    client()
        .args(&[
            "--url",
            url.as_str(),
            "--db-file",
            db.to_str().unwrap(),
            "set",
            "a",
            "",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("value cannot be empty").from_utf8());
}

#[test]
fn unreachable_server_is_reported_as_a_connection_failure() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("mirror.json");
    let url = dead_url();

    client()
        .args(&[
            "--url",
            url.as_str(),
            "--db-file",
            db.to_str().unwrap(),
            "get",
            "a",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot reach the remote store").from_utf8());
}

#[test]
fn mirror_subcommand_prints_the_local_document() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("mirror.json");
    fs::write(&db, r#"{"a":"1","b":"2"}"#).unwrap();

    client()
        .args(&["--db-file", db.to_str().unwrap(), "mirror"])
        .assert()
        .success()
        .stdout(predicate::str::contains("a = 1").from_utf8())
        .stdout(predicate::str::contains("b = 2").from_utf8());
}

#[test]
fn clear_db_resets_the_document_and_is_repeatable() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("mirror.json");
    fs::write(&db, r#"{"a":"1"}"#).unwrap();

    client()
        .args(&["--db-file", db.to_str().unwrap(), "clear-db"])
        .assert()
        .success();
    assert_eq!(fs::read_to_string(&db).unwrap(), "{}");

    client()
        .args(&["--db-file", db.to_str().unwrap(), "clear-db"])
        .assert()
        .success();
    assert_eq!(fs::read_to_string(&db).unwrap(), "{}");
}

#[test]
fn corrupt_mirror_document_is_reported_not_discarded() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("mirror.json");
    fs::write(&db, "{ not json").unwrap();

    client()
        .args(&["--db-file", db.to_str().unwrap(), "mirror"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("is corrupt").from_utf8());

    // the unreadable document must survive untouched
    assert_eq!(fs::read_to_string(&db).unwrap(), "{ not json");
}

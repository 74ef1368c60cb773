mod common;

use assert_cmd::cargo_bin;
use assert_cmd::prelude::*;
use common::write_signals;
use predicates::prelude::*;
use std::process::Command;

#[cfg(not(feature = "storage-rocksdb"))]
#[test]
fn test_rocksdb_fallback_warning() {
    let dir = tempfile::tempdir().unwrap();
    let signals = dir.path().join("signals.csv");
    write_signals(&signals, &[]).unwrap();

    let mut cmd = Command::new(cargo_bin!("paysession"));
    cmd.arg(&signals)
        .arg("--customer-id")
        .arg("cus_1")
        .arg("--db-path")
        .arg(dir.path().join("some_db"));

    cmd.assert()
        .success()
        .stderr(predicate::str::contains("WARNING: Persistent storage requested via --db-path, but 'storage-rocksdb' feature is not enabled. Falling back to In-Memory storage."));
}

#[cfg(feature = "storage-rocksdb")]
#[test]
fn test_rocksdb_no_fallback_warning() {
    let dir = tempfile::tempdir().unwrap();
    let signals = dir.path().join("signals.csv");
    write_signals(&signals, &[]).unwrap();

    let mut cmd = Command::new(cargo_bin!("paysession"));
    cmd.arg(&signals)
        .arg("--customer-id")
        .arg("cus_1")
        .arg("--db-path")
        .arg(dir.path().join("test_db"));

    cmd.assert()
        .success()
        .stderr(predicate::str::contains("WARNING").not());
}

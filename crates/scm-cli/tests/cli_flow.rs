//! # CLI Flow Tests
//!
//! Drives the `scm` binary end to end against a ledger file in a temporary
//! directory.

use std::path::Path;
use std::process::{Command, Output};

fn scm(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_scm"))
        .current_dir(dir)
        .env_remove("SCM_REGISTRY_PROGRAM")
        .env_remove("SCM_TOKEN_PROGRAM")
        .env_remove("SCM_ASSOCIATED_TOKEN_PROGRAM")
        .env_remove("SCM_METADATA_PROGRAM")
        .args(["--ledger", "ledger.json", "--now", "1700000000"])
        .args(args)
        .output()
        .unwrap()
}

fn json(output: &Output) -> serde_json::Value {
    assert!(
        output.status.success(),
        "command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn full_lifecycle_through_the_binary() {
    let dir = tempfile::tempdir().unwrap();
    let d = dir.path();

    let authority = json(&scm(d, &["key", "generate", "--prefix", "authority"]));
    let inspector = json(&scm(d, &["key", "generate", "--prefix", "inspector"]));
    let inspector_address = inspector["address"].as_str().unwrap().to_string();

    let site = json(&scm(d, &["site", "create", "--site", "S1", "--key", "authority.key"]));
    assert_eq!(site["authority"], authority["address"]);
    assert!(d.join("ledger.json").exists());

    json(&scm(
        d,
        &[
            "inspector", "create", "--site", "S1", "--owner", &inspector_address, "--key",
            "authority.key",
        ],
    ));
    let device = json(&scm(
        d,
        &["device", "create", "--site", "S1", "--device", "D1", "--key", "authority.key"],
    ));
    assert!(device["last_safety_check"].is_null());

    let issued = json(&scm(
        d,
        &[
            "check", "create", "--site", "S1", "--device", "D1", "--check", "C1", "--name",
            "Crane", "--symbol", "CRN", "--uri", "https://example.com/crane", "--days", "5",
            "--key", "inspector.key",
        ],
    ));
    assert_eq!(issued["safety_check"]["expires_at"], 1_700_000_000_i64 + 432_000);

    let shown = json(&scm(d, &["device", "show", "--site", "S1", "--device", "D1"]));
    assert_eq!(shown["version"], 1);
    assert_eq!(shown["record"]["last_safety_check"], issued["address"]);

    let status = json(&scm(d, &["device", "status", "--site", "S1", "--device", "D1"]));
    assert_eq!(status["status"], "valid");

    let derived = json(&scm(
        d,
        &["address", "check", "--site", "S1", "--device", "D1", "--check", "C1"],
    ));
    assert_eq!(derived["address"], issued["address"]);
}

#[test]
fn failed_operation_exits_one_and_keeps_ledger() {
    let dir = tempfile::tempdir().unwrap();
    let d = dir.path();
    json(&scm(d, &["key", "generate", "--prefix", "authority"]));
    json(&scm(d, &["key", "generate", "--prefix", "stranger"]));
    json(&scm(d, &["site", "create", "--site", "S1", "--key", "authority.key"]));
    let before = std::fs::read_to_string(d.join("ledger.json")).unwrap();

    let out = scm(
        d,
        &["device", "create", "--site", "S1", "--device", "D1", "--key", "stranger.key"],
    );
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("not authorized"));
    assert_eq!(std::fs::read_to_string(d.join("ledger.json")).unwrap(), before);
}

#[test]
fn duplicate_site_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let d = dir.path();
    json(&scm(d, &["key", "generate", "--prefix", "authority"]));
    json(&scm(d, &["site", "create", "--site", "S1", "--key", "authority.key"]));
    let out = scm(d, &["site", "create", "--site", "S1", "--key", "authority.key"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("already exists"));
}

//! Integration tests for the CLI binary.
//!
//! Registered as a [[test]] in the dxp-identity-cli crate so that
//! CARGO_BIN_EXE_dxpid is available. Every test runs against its own
//! temporary data root through `DXP_HOME`.

use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};

const ZERO_SEED_HEX: &str = "0000000000000000000000000000000000000000000000000000000000000000";
const ZERO_VERIFY_KEY: &str = "4zvwRjXUKGfvwnParsHAS3HuSVzV5cA4McphgmoCtajS";
const ZERO_DID: &str = "did:dxp:8LXvA8e8DEoLfxxdtohXHU";
const ZERO_HELLO_SIG: &str = "e25c8723d039fe8f45d6c9d6a8917fa91bc754913cd596fd358a493a21a3cb59\
                              0a6537babc7df0400ab61a05589c9c36b65a143878cb0341d4e9e48419c4370d";

/// Get a Command pointing to the `dxpid` binary with an isolated data root.
fn dxpid(home: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_dxpid"));
    cmd.env("DXP_HOME", home)
        .env("DXP_PASSPHRASE", "test-passphrase")
        .env_remove("RUST_LOG");
    cmd
}

fn run(home: &Path, args: &[&str]) -> Output {
    dxpid(home)
        .args(args)
        .output()
        .expect("failed to execute dxpid")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn assert_success(output: &Output) {
    assert!(
        output.status.success(),
        "dxpid should succeed, stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
}

#[test]
fn cli_responds_to_help() {
    let home = tempfile::tempdir().unwrap();
    let output = run(home.path(), &["--help"]);
    assert_success(&output);
    let out = stdout(&output);
    assert!(out.contains("dxpid") || out.contains("Usage"), "got: {out}");
    for sub in ["mnemonic", "derive", "sign", "verify", "address", "credential"] {
        assert!(out.contains(sub), "help should list {sub}, got: {out}");
    }
}

#[test]
fn cli_responds_to_version() {
    let home = tempfile::tempdir().unwrap();
    let output = run(home.path(), &["--version"]);
    assert_success(&output);
    assert!(stdout(&output).contains("0.2"));
}

#[test]
fn cli_exits_with_error_on_unknown_flag() {
    let home = tempfile::tempdir().unwrap();
    assert!(!run(home.path(), &["--nonexistent-flag"]).status.success());
}

#[test]
fn cli_mnemonic_prints_phrase_and_identity() {
    let home = tempfile::tempdir().unwrap();
    let output = run(home.path(), &["mnemonic", "--words", "12"]);
    assert_success(&output);
    let out = stdout(&output);
    let mut lines = out.lines();
    assert_eq!(lines.next().unwrap().split(' ').count(), 12);
    assert!(lines.next().unwrap().starts_with("Address: "));
    assert!(out.contains("\"did\": \"did:dxp:"));
    assert!(out.contains("\"encryptionPublicKey\""));
}

#[test]
fn cli_mnemonic_rejects_bad_word_count() {
    let home = tempfile::tempdir().unwrap();
    let output = run(home.path(), &["mnemonic", "--words", "13"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("strength"));
}

#[test]
fn cli_mnemonic_user_entropy() {
    let home = tempfile::tempdir().unwrap();
    let entropy = "x".repeat(50);

    let mut child = dxpid(home.path())
        .args(["mnemonic", "--unsafe-entropy"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    child
        .stdin
        .take()
        .unwrap()
        .write_all(format!("{entropy}\ny\n").as_bytes())
        .unwrap();
    let output = child.wait_with_output().unwrap();
    assert_success(&output);
    assert_eq!(stdout(&output).lines().next().unwrap().split(' ').count(), 24);
    assert!(String::from_utf8_lossy(&output.stderr).contains("Input length: 50"));
}

#[test]
fn cli_mnemonic_user_entropy_too_short() {
    let home = tempfile::tempdir().unwrap();
    let mut child = dxpid(home.path())
        .args(["mnemonic", "--unsafe-entropy"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    child.stdin.take().unwrap().write_all(b"short\n").unwrap();
    let output = child.wait_with_output().unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Insufficient entropy"));
}

#[test]
fn cli_derive_from_seed_hex_matches_golden() {
    let home = tempfile::tempdir().unwrap();
    let output = run(home.path(), &["derive", "--seed-hex", ZERO_SEED_HEX]);
    assert_success(&output);
    let id: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(id["did"], ZERO_DID);
    assert_eq!(id["verifyKey"], ZERO_VERIFY_KEY);
}

#[test]
fn cli_derive_from_seed_file() {
    let home = tempfile::tempdir().unwrap();
    let seed_path = home.path().join("seed.bin");

    std::fs::write(&seed_path, [0u8; 31]).unwrap();
    let output = run(home.path(), &["derive", "--seed-file", seed_path.to_str().unwrap()]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Invalid seed length"));

    std::fs::write(&seed_path, [0u8; 40]).unwrap();
    let output = run(home.path(), &["derive", "--seed-file", seed_path.to_str().unwrap()]);
    assert_success(&output);
    assert!(stdout(&output).contains(ZERO_DID));
}

#[test]
fn cli_derive_requires_a_source() {
    let home = tempfile::tempdir().unwrap();
    assert!(!run(home.path(), &["derive"]).status.success());
}

#[test]
fn cli_save_show_sign_verify() {
    let home = tempfile::tempdir().unwrap();
    let h = home.path();

    assert_success(&run(h, &["derive", "--seed-hex", ZERO_SEED_HEX, "--save", "default"]));
    assert!(h.join("identity").join("default.dxp").exists());

    let output = run(h, &["show"]);
    assert_success(&output);
    let doc: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(doc["did"], ZERO_DID);
    assert_eq!(doc["pubKey"], ZERO_VERIFY_KEY);

    let output = run(h, &["sign", "--message", "hello"]);
    assert_success(&output);
    assert_eq!(stdout(&output).trim(), ZERO_HELLO_SIG);

    let output = run(
        h,
        &[
            "verify",
            "--verify-key",
            ZERO_VERIFY_KEY,
            "--signature",
            ZERO_HELLO_SIG,
            "--message",
            "hello",
        ],
    );
    assert_success(&output);
    assert_eq!(stdout(&output).trim(), "valid");

    let output = run(
        h,
        &[
            "verify",
            "--verify-key",
            ZERO_VERIFY_KEY,
            "--signature",
            ZERO_HELLO_SIG,
            "--message",
            "hellO",
        ],
    );
    assert!(!output.status.success());
    assert_eq!(stdout(&output).trim(), "invalid");
}

#[test]
fn cli_sign_with_wrong_passphrase_fails() {
    let home = tempfile::tempdir().unwrap();
    let h = home.path();
    assert_success(&run(h, &["derive", "--seed-hex", ZERO_SEED_HEX, "--save", "default"]));

    let output = dxpid(h)
        .env("DXP_PASSPHRASE", "not-it")
        .args(["sign", "--message", "hello"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Invalid passphrase"));
}

#[test]
fn cli_verify_garbage_signature_is_invalid() {
    let home = tempfile::tempdir().unwrap();
    let output = run(
        home.path(),
        &[
            "verify",
            "--verify-key",
            ZERO_VERIFY_KEY,
            "--signature",
            "zz",
            "--message",
            "hello",
        ],
    );
    assert!(!output.status.success());
    assert_eq!(stdout(&output).trim(), "invalid");
}

#[test]
fn cli_address_from_verify_key() {
    let home = tempfile::tempdir().unwrap();
    let output = run(home.path(), &["address", "--verify-key", ZERO_VERIFY_KEY]);
    assert_success(&output);
    assert_eq!(
        stdout(&output).trim(),
        "139E3940E64B5491722088D9A0D741628FC826E0"
    );

    let output = run(
        home.path(),
        &["address", "--verify-key", ZERO_VERIFY_KEY, "--bech32", "dxp"],
    );
    assert_success(&output);
    assert!(stdout(&output).trim().starts_with("dxp1"));
}

#[test]
fn cli_register_credential_resolve_list() {
    let home = tempfile::tempdir().unwrap();
    let h = home.path();

    // Subject: the zero seed. Issuer: a second saved identity.
    assert_success(&run(h, &["derive", "--seed-hex", ZERO_SEED_HEX, "--save", "alice"]));
    assert_success(&run(
        h,
        &["derive", "--mnemonic", "kyc authority", "--save", "authority"],
    ));

    let output = run(h, &["address", "--did", ZERO_DID]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Identity not found"));

    assert_success(&run(h, &["--identity", "alice", "register"]));
    assert_success(&run(h, &["--identity", "authority", "register"]));
    assert!(!run(h, &["--identity", "alice", "register"]).status.success());

    let output = run(h, &["address", "--did", ZERO_DID]);
    assert_success(&output);
    assert_eq!(
        stdout(&output).trim(),
        "139E3940E64B5491722088D9A0D741628FC826E0"
    );

    let output = run(
        h,
        &["--identity", "authority", "credential", "--subject", ZERO_DID],
    );
    assert_success(&output);
    let doc: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(doc["credentials"][0]["claim"]["kycValidated"], true);

    let output = run(h, &["resolve", ZERO_DID]);
    assert_success(&output);
    let resolved: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(resolved, doc);

    let output = run(h, &["list"]);
    assert_success(&output);
    let out = stdout(&output);
    assert!(out.contains(ZERO_DID));
    assert_eq!(out.lines().count(), 4);
}

#[test]
fn cli_resolve_unknown_did_fails() {
    let home = tempfile::tempdir().unwrap();
    let output = run(home.path(), &["resolve", ZERO_DID]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Identity not found"));

    let output = run(home.path(), &["resolve", "did:dxp:nope"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Invalid did"));
}

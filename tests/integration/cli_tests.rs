//! Integration tests for the CLI binary.
//!
//! Exercises the `assetlinks` binary on paths that need no network:
//! argument handling, input validation, and well-known URI derivation.
//!
//! This test is registered as a [[test]] in the assetlinks-cli crate
//! so that CARGO_BIN_EXE_assetlinks is available.

use std::io::Write;
use std::process::Command;

/// Get a Command pointing to the `assetlinks` binary.
fn assetlinks_binary() -> Command {
    Command::new(env!("CARGO_BIN_EXE_assetlinks"))
}

#[test]
fn cli_responds_to_help() {
    let output = assetlinks_binary()
        .arg("--help")
        .output()
        .expect("failed to execute assetlinks --help");

    assert!(
        output.status.success(),
        "assetlinks --help should exit with success, stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("verify-app") && stdout.contains("well-known"),
        "help should list subcommands, got: {stdout}"
    );
}

#[test]
fn cli_responds_to_version() {
    let output = assetlinks_binary()
        .arg("--version")
        .output()
        .expect("failed to execute assetlinks --version");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("0.1"), "version info expected, got: {stdout}");
}

#[test]
fn cli_exits_with_error_on_unknown_flag() {
    let output = assetlinks_binary()
        .arg("--nonexistent-flag")
        .output()
        .expect("failed to execute assetlinks");

    assert!(!output.status.success());
}

#[test]
fn well_known_replaces_path() {
    let output = assetlinks_binary()
        .args(["well-known", "https://www.example.com:8443/some/page?q=1#top"])
        .output()
        .expect("failed to execute assetlinks well-known");

    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout).trim(),
        "https://www.example.com:8443/.well-known/assetlinks.json"
    );
}

#[test]
fn well_known_rejects_non_web_origin() {
    let output = assetlinks_binary()
        .args(["well-known", "ftp://www.example.com"])
        .output()
        .expect("failed to execute assetlinks well-known");

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).starts_with("error:"));
}

#[test]
fn list_rejects_invalid_relation_without_fetching() {
    let output = assetlinks_binary()
        .args(["list", "https://www.example.com", "--relation", "Not A Relation"])
        .output()
        .expect("failed to execute assetlinks list");

    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn check_requires_a_target() {
    let output = assetlinks_binary()
        .args([
            "check",
            "https://www.example.com",
            "--relation",
            "delegate_permission/common.handle_all_urls",
        ])
        .output()
        .expect("failed to execute assetlinks check");

    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn check_package_requires_fingerprint() {
    let output = assetlinks_binary()
        .args([
            "check",
            "https://www.example.com",
            "--relation",
            "delegate_permission/common.handle_all_urls",
            "--package",
            "com.example.app",
        ])
        .output()
        .expect("failed to execute assetlinks check");

    assert!(!output.status.success());
}

#[test]
fn verify_app_rejects_non_web_origin() {
    let dir = tempfile::tempdir().expect("tempdir");
    let cert = dir.path().join("signer.der");
    std::fs::File::create(&cert)
        .and_then(|mut f| f.write_all(&[0x01]))
        .expect("write cert");

    let output = assetlinks_binary()
        .args(["verify-app", "ftp://www.example.com", "--package", "com.example.app", "--cert"])
        .arg(&cert)
        .output()
        .expect("failed to execute assetlinks verify-app");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("HTTP or HTTPS"), "got: {stderr}");
}

#[test]
fn verify_app_reports_unreadable_certificate() {
    let dir = tempfile::tempdir().expect("tempdir");
    let missing = dir.path().join("missing.der");

    let output = assetlinks_binary()
        .args(["verify-app", "https://www.example.com", "--package", "com.example.app", "--cert"])
        .arg(&missing)
        .output()
        .expect("failed to execute assetlinks verify-app");

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("certificate"));
}

#[test]
fn verify_app_rejects_malformed_fingerprint() {
    let output = assetlinks_binary()
        .args([
            "verify-app",
            "https://www.example.com",
            "--package",
            "com.example.app",
            "--fingerprint",
            "ab:cd",
        ])
        .output()
        .expect("failed to execute assetlinks verify-app");

    assert_eq!(output.status.code(), Some(1));
}

//! CLI integration tests for rfc4648
//!
//! Tests the binary as a user would interact with it.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Runs the binary inside `dir` with no user config in scope.
fn rfc4648(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("rfc4648").unwrap();
    cmd.current_dir(dir)
        .env("HOME", dir)
        .env("XDG_CONFIG_HOME", dir.join("config"))
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG");
    cmd
}

fn workspace(input: &[u8]) -> (TempDir, PathBuf, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let input_path = dir.path().join("in.bin");
    let output_path = dir.path().join("out.txt");
    fs::write(&input_path, input).unwrap();
    (dir, input_path, output_path)
}

// ============================================================================
// Basic Commands
// ============================================================================

#[test]
fn test_help() {
    let dir = tempfile::tempdir().unwrap();
    rfc4648(dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("RFC 4648"))
        .stdout(predicate::str::contains("Base32hex"));
}

#[test]
fn test_version() {
    let dir = tempfile::tempdir().unwrap();
    rfc4648(dir.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("rfc4648"));
}

// ============================================================================
// Encode/Decode
// ============================================================================

#[test]
fn test_encode_base64() {
    let (dir, input, output) = workspace(b"Man");
    rfc4648(dir.path())
        .args(["E", "C"])
        .arg(&input)
        .arg(&output)
        .assert()
        .success()
        .stdout("");
    assert_eq!(fs::read(&output).unwrap(), b"TWFu");
}

#[test]
fn test_encode_lowercase_letters() {
    let (dir, input, output) = workspace(b"f");
    rfc4648(dir.path())
        .args(["e", "b"])
        .arg(&input)
        .arg(&output)
        .assert()
        .success();
    assert_eq!(fs::read(&output).unwrap(), b"MY======");
}

#[test]
fn test_encode_base16() {
    let (dir, input, output) = workspace(&[0xDE, 0xAD, 0xBE, 0xEF]);
    rfc4648(dir.path())
        .args(["E", "A"])
        .arg(&input)
        .arg(&output)
        .assert()
        .success();
    assert_eq!(fs::read(&output).unwrap(), b"DEADBEEF");
}

#[test]
fn test_encode_base32hex() {
    let (dir, input, output) = workspace(b"foobar");
    rfc4648(dir.path())
        .args(["E", "B", "--extended-hex"])
        .arg(&input)
        .arg(&output)
        .assert()
        .success();
    assert_eq!(fs::read(&output).unwrap(), b"CPNMUOJ1E8======");
}

#[test]
fn test_decode_base32() {
    let (dir, input, output) = workspace(b"MY======");
    rfc4648(dir.path())
        .args(["D", "B"])
        .arg(&input)
        .arg(&output)
        .assert()
        .success();
    assert_eq!(fs::read(&output).unwrap(), b"f");
}

#[test]
fn test_decode_accepts_trailing_newline() {
    let (dir, input, output) = workspace(b"TWFu\n");
    rfc4648(dir.path())
        .args(["D", "C"])
        .arg(&input)
        .arg(&output)
        .assert()
        .success();
    assert_eq!(fs::read(&output).unwrap(), b"Man");
}

#[test]
fn test_roundtrip_large_file() {
    let data: Vec<u8> = (0..200_000u32).map(|i| (i.wrapping_mul(2654435761) >> 13) as u8).collect();
    for base in ["A", "B", "C"] {
        let (dir, input, encoded) = workspace(&data);
        let decoded = dir.path().join("decoded.bin");

        rfc4648(dir.path())
            .args(["E", base])
            .arg(&input)
            .arg(&encoded)
            .assert()
            .success();
        rfc4648(dir.path())
            .args(["D", base])
            .arg(&encoded)
            .arg(&decoded)
            .assert()
            .success();

        assert_eq!(fs::read(&decoded).unwrap(), data, "base {base}");
    }
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_wrong_argument_count() {
    let dir = tempfile::tempdir().unwrap();
    rfc4648(dir.path())
        .args(["E", "C", "only-input"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn test_unknown_mode_letter() {
    let (dir, input, output) = workspace(b"x");
    rfc4648(dir.path())
        .args(["X", "C"])
        .arg(&input)
        .arg(&output)
        .assert()
        .failure()
        .stderr(predicate::str::contains("expected E or D"));
}

#[test]
fn test_unknown_base_letter() {
    let (dir, input, output) = workspace(b"x");
    rfc4648(dir.path())
        .args(["E", "base64"])
        .arg(&input)
        .arg(&output)
        .assert()
        .failure()
        .stderr(predicate::str::contains("expected A, B or C"));
}

#[test]
fn test_extended_hex_needs_base32() {
    let (dir, input, output) = workspace(b"x");
    rfc4648(dir.path())
        .args(["E", "C", "-x"])
        .arg(&input)
        .arg(&output)
        .assert()
        .failure()
        .stderr(predicate::str::contains("only applies to Base32"));
}

#[test]
fn test_missing_input_file() {
    let dir = tempfile::tempdir().unwrap();
    rfc4648(dir.path())
        .args(["E", "C", "does-not-exist.bin", "out.txt"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("cannot open does-not-exist.bin"))
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn test_unwritable_output() {
    let (dir, input, _) = workspace(b"x");
    rfc4648(dir.path())
        .args(["E", "C"])
        .arg(&input)
        .arg(dir.path().join("no-such-dir").join("out.txt"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("cannot create"));
}

#[test]
fn test_decode_invalid_symbol() {
    let (dir, input, output) = workspace(b"TW*u");
    rfc4648(dir.path())
        .args(["D", "C"])
        .arg(&input)
        .arg(&output)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("invalid base64 symbol '*' at byte 2"))
        .stderr(predicate::str::contains("Usage").not());
}

#[test]
fn test_decode_lenient() {
    let (dir, input, output) = workspace(b"TW*u");
    rfc4648(dir.path())
        .args(["D", "C", "--lenient"])
        .arg(&input)
        .arg(&output)
        .assert()
        .success();
    // '*' reads as 'A' (value zero).
    assert_eq!(fs::read(&output).unwrap(), b"M`.");
}

// ============================================================================
// Configuration
// ============================================================================

#[test]
fn test_local_config_sets_policy() {
    let (dir, input, output) = workspace(b"TW*u");
    fs::write(dir.path().join("rfc4648.toml"), "[decode]\npolicy = \"lenient\"\n").unwrap();
    rfc4648(dir.path())
        .args(["D", "C"])
        .arg(&input)
        .arg(&output)
        .assert()
        .success();
}

#[test]
fn test_explicit_config_error_is_fatal() {
    let (dir, input, output) = workspace(b"Man");
    let config = dir.path().join("bad.toml");
    fs::write(&config, "[buffer]\nsize = 2\n").unwrap();
    rfc4648(dir.path())
        .args(["E", "C", "--config"])
        .arg(&config)
        .arg(&input)
        .arg(&output)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("buffer.size = 2 is out of range"));
}

#[test]
fn test_small_buffer_from_config() {
    let data: Vec<u8> = (0..=255).collect();
    let (dir, input, output) = workspace(&data);
    let config = dir.path().join("small.toml");
    fs::write(&config, "[buffer]\nsize = 8\n").unwrap();
    rfc4648(dir.path())
        .args(["E", "B", "--config"])
        .arg(&config)
        .arg(&input)
        .arg(&output)
        .assert()
        .success();
    assert_eq!(
        fs::read_to_string(&output).unwrap(),
        rfc4648_codec::encode(&data, rfc4648_codec::Encoding::Base32)
    );
}

// domain-scout/tests/cli_integration.rs
//
// Offline CLI tests: --analyze, --dry-run and argument/validation failures.
// None of these reach the network.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Command isolated from the user's config files and cache.
fn scout(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("domain-scout").unwrap();
    cmd.current_dir(home.path())
        .env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path().join(".config"))
        .env_remove("RUST_LOG")
        .env_remove("DS_CONFIG")
        .env_remove("DS_EXT")
        .env_remove("DS_CACHE");
    cmd
}

#[test]
fn test_help_lists_modes() {
    let home = TempDir::new().unwrap();
    scout(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--analyze"))
        .stdout(predicate::str::contains("--dry-run"))
        .stdout(predicate::str::contains("--no-cache"));
}

#[test]
fn test_no_input_is_an_error() {
    let home = TempDir::new().unwrap();
    scout(&home)
        .assert()
        .failure()
        .stderr(predicate::str::contains("You must specify patterns"));
}

// ── Analyze ──────────────────────────────────────────────────────────────────

#[test]
fn test_analyze_two_letters_three_extensions() {
    let home = TempDir::new().unwrap();
    scout(&home)
        .args(["ll", "--ext", ".com,.net,.org", "--analyze"])
        .assert()
        .success()
        .stdout(predicate::str::contains("676"))
        .stdout(predicate::str::contains("2028"))
        .stdout(predicate::str::contains("letter, letter"));
}

#[test]
fn test_analyze_json() {
    let home = TempDir::new().unwrap();
    let output = scout(&home)
        .args(["getcv", "-e", ".io", "--analyze", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let line = String::from_utf8(output.stdout).unwrap();
    let json: serde_json::Value = serde_json::from_str(line.trim()).unwrap();
    assert_eq!(json["pattern"], "getcv");
    assert_eq!(
        json["segments"],
        serde_json::json!(["literal", "consonant", "vowel"])
    );
    assert_eq!(json["combination_count"], 105);
}

#[test]
fn test_analyze_invalid_pattern_fails() {
    let home = TempDir::new().unwrap();
    scout(&home)
        .args(["--analyze", "--", "-test"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot start with a hyphen"));
}

#[test]
fn test_analyze_invalid_extension_fails() {
    let home = TempDir::new().unwrap();
    scout(&home)
        .args(["ll", "--ext", "com", "--analyze"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("must start with '.'"));
}

#[test]
fn test_analyze_mixed_valid_and_invalid_succeeds() {
    let home = TempDir::new().unwrap();
    scout(&home)
        .args(["te--st", "cv", "--analyze"])
        .assert()
        .success()
        .stdout(predicate::str::contains("105"))
        .stderr(predicate::str::contains("consecutive hyphens"));
}

#[test]
fn test_analyze_pattern_file() {
    let home = TempDir::new().unwrap();
    let file = home.path().join("patterns.txt");
    fs::write(&file, "# names\nll ; ext=.io,.ai\nshop  # literal only\n").unwrap();

    scout(&home)
        .args(["--file", file.to_str().unwrap(), "--analyze"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1352"))
        .stdout(predicate::str::contains("shop"));
}

#[test]
fn test_analyze_pattern_file_from_stdin() {
    let home = TempDir::new().unwrap();
    scout(&home)
        .args(["--file", "-", "--analyze"])
        .write_stdin("nn; ext=.com\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("100"));
}

// ── Dry run ──────────────────────────────────────────────────────────────────

#[test]
fn test_dry_run_lists_every_domain() {
    let home = TempDir::new().unwrap();
    let output = scout(&home)
        .args(["lv", "--ext", ".com", "--dry-run", "--no-cache"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let domains: Vec<&str> = stdout.lines().collect();
    assert_eq!(domains.len(), 26 * 5);
    assert!(domains.iter().all(|d| d.ends_with(".com") && d.len() == 6));
    assert!(String::from_utf8(output.stderr)
        .unwrap()
        .contains("130 domains would be checked"));
}

#[test]
fn test_dry_run_respects_limit() {
    let home = TempDir::new().unwrap();
    let output = scout(&home)
        .args(["ll", "--dry-run", "--limit", "7", "--no-cache"])
        .output()
        .unwrap();
    assert!(output.status.success());
    assert_eq!(String::from_utf8(output.stdout).unwrap().lines().count(), 7);
}

#[test]
fn test_dry_run_skips_literal_with_leading_digit() {
    let home = TempDir::new().unwrap();
    scout(&home)
        .args(["7l", "--dry-run", "--no-cache"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("0 domains would be checked"));
}

#[test]
fn test_dry_run_does_not_create_cache_file() {
    let home = TempDir::new().unwrap();
    let cache = home.path().join("scout.cache");
    scout(&home)
        .args(["go", "--dry-run", "--cache", cache.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("go.com"));
    assert!(!cache.exists());
}

#[test]
fn test_dry_run_with_corrupt_cache_falls_back() {
    let home = TempDir::new().unwrap();
    let cache = home.path().join("scout.cache");
    fs::write(&cache, b"garbage").unwrap();

    scout(&home)
        .args(["go", "--dry-run", "--cache", cache.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("go.com"))
        .stderr(predicate::str::contains("corrupt"));
}

// ── Configuration ────────────────────────────────────────────────────────────

#[test]
fn test_config_file_default_extensions() {
    let home = TempDir::new().unwrap();
    let config = home.path().join("scout.toml");
    fs::write(&config, "[defaults]\nextensions = [\".dev\"]\n").unwrap();

    scout(&home)
        .args(["go", "--dry-run", "--no-cache", "--config", config.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("go.dev"));
}

#[test]
fn test_env_extensions_lose_to_cli() {
    let home = TempDir::new().unwrap();
    scout(&home)
        .env("DS_EXT", ".net")
        .args(["go", "--ext", ".org", "--dry-run", "--no-cache"])
        .assert()
        .success()
        .stdout(predicate::str::contains("go.org"))
        .stdout(predicate::str::contains("go.net").not());
}

#[test]
fn test_invalid_concurrency_rejected() {
    let home = TempDir::new().unwrap();
    scout(&home)
        .args(["ll", "-c", "0", "--analyze"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Concurrency must be between 1 and 100"));
}

#[test]
fn test_huge_rate_rejected() {
    let home = TempDir::new().unwrap();
    scout(&home)
        .args(["ll", "--rate", "4000000000", "--dry-run", "--no-cache"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Rate must be between 0 and 10000"));
}

#[test]
fn test_zero_timeout_rejected() {
    let home = TempDir::new().unwrap();
    scout(&home)
        .args(["ll", "--timeout", "0s", "--dry-run", "--no-cache"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid timeout '0s'"));
}

#[test]
fn test_config_file_with_zero_timeout_rejected() {
    let home = TempDir::new().unwrap();
    let config = home.path().join("scout.toml");
    fs::write(&config, "[defaults]\ntimeout = \"0s\"\n").unwrap();

    scout(&home)
        .args(["go", "--dry-run", "--no-cache", "--config", config.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid timeout format"));
}

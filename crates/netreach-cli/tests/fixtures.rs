//! End-to-end CLI tests against inventory snapshots.
//!
//! Each fixture in `tests/fixtures/<name>/` holds an `inventory.json` snapshot.
//! These tests run the CLI against it and verify:
//! 1. Exit code (0=allow, 2=deny, 1=runtime error)
//! 2. The decision or rule listing printed on stdout

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::path::PathBuf;
use tempfile::TempDir;

/// Helper to get a Command for the netreach binary.
/// Wraps the deprecated cargo_bin to centralize the deprecation warning.
#[allow(deprecated)]
fn netreach_cmd() -> Command {
    Command::cargo_bin("netreach").expect("netreach binary not found - run `cargo build` first")
}

/// Get the path to the test fixtures directory
fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .expect("netreach-cli crate should have a parent directory")
        .parent()
        .expect("crates directory should have a parent (repo root)")
        .join("tests")
        .join("fixtures")
}

fn fixture_cmd(fixture_name: &str) -> Command {
    let mut cmd = netreach_cmd();
    cmd.arg("--inventory")
        .arg(fixtures_dir().join(fixture_name).join("inventory.json"))
        .arg("--config")
        .arg(fixtures_dir().join(fixture_name).join("netreach.toml"));
    cmd
}

/// Run `check --json` against a fixture and return the exit code and decision.
///
/// `args` is split on whitespace.
fn run_check(fixture_name: &str, args: &str) -> (i32, Value) {
    let output = fixture_cmd(fixture_name)
        .args(["check", "--project", "p1", "--json"])
        .args(["--network", "default"])
        .args(args.split_whitespace())
        .output()
        .expect("Failed to run command");

    let exit_code = output.status.code().unwrap_or(-1);
    let decision: Value = serde_json::from_slice(&output.stdout).unwrap_or_else(|e| {
        panic!(
            "decision JSON for fixture '{fixture_name}': {e}\nstderr:\n{}",
            String::from_utf8_lossy(&output.stderr)
        )
    });
    (exit_code, decision)
}

// ============================================================================
// Fixture tests
// ============================================================================

#[test]
fn fixture_vpc_allow_allows_ssh() {
    let (code, d) = run_check(
        "vpc_allow",
        "--direction ingress --protocol tcp --port 22 --range 203.0.113.5/32",
    );
    assert_eq!(code, 0);
    assert_eq!(d["action"], "allow");
    assert_eq!(d["matched_by"], "vpc firewall rule: allow-ssh");
    assert_eq!(d["rule"]["priority"], 1000);
}

#[test]
fn fixture_vpc_allow_respects_target_tags() {
    let (code, d) = run_check("vpc_allow", "--direction ingress --protocol tcp --port 443");
    assert_eq!(code, 2);
    assert_eq!(d["matched_by"], "implicit default");

    let (code, d) = run_check(
        "vpc_allow",
        "--direction ingress --protocol tcp --port 443 --target-tag web",
    );
    assert_eq!(code, 0);
    assert_eq!(d["matched_by"], "vpc firewall rule: allow-web");
}

#[test]
fn fixture_vpc_allow_egress_deny() {
    let (code, d) = run_check(
        "vpc_allow",
        "--direction egress --protocol tcp --port 25 --range 198.51.100.7",
    );
    assert_eq!(code, 2);
    assert_eq!(d["matched_by"], "vpc firewall rule: deny-smtp-out");
}

#[test]
fn fixture_folder_deny_outranks_network_allow() {
    let (code, d) = run_check(
        "folder_deny",
        "--direction ingress --protocol tcp --port 22 --range 203.0.113.5/32",
    );
    assert_eq!(code, 2);
    assert_eq!(d["action"], "deny");
    assert_eq!(d["matched_by"], "policy: folder-baseline, rule: deny all");
    assert_eq!(d["rule"]["scope"], "folder");
}

#[test]
fn fixture_folder_deny_skips_goto_next() {
    let (code, d) = run_check("folder_deny", "--direction egress --protocol tcp");
    assert_eq!(code, 0);
    assert_eq!(d["matched_by"], "implicit default");
}

#[test]
fn fixture_empty_network_uses_implicit_defaults() {
    let (code, d) = run_check("empty_network", "--direction ingress --protocol tcp");
    assert_eq!(code, 2);
    assert_eq!(d["action"], "deny");
    assert_eq!(d["matched_by"], "implicit default");
    assert!(d.get("rule").is_none());

    let (code, d) = run_check("empty_network", "--direction egress --protocol udp");
    assert_eq!(code, 0);
    assert_eq!(d["action"], "allow");
    assert_eq!(d["matched_by"], "implicit default");
}

#[test]
fn fixture_equal_priority_denies() {
    let (code, d) = run_check(
        "equal_priority",
        "--direction ingress --protocol tcp --port 22",
    );
    assert_eq!(code, 2);
    assert_eq!(d["matched_by"], "vpc firewall rule: deny-ssh");
}

#[test]
fn fixture_cross_scope_tie_denies_by_default() {
    let (code, d) = run_check(
        "cross_scope_tie",
        "--direction ingress --protocol tcp --port 22",
    );
    assert_eq!(code, 2);
    assert_eq!(d["matched_by"], "vpc firewall rule: deny-ssh");
}

#[test]
fn fixture_tagged_source_applies_to_tagged_peer() {
    let (code, d) = run_check(
        "tagged_source",
        "--direction ingress --protocol tcp --port 5432 --source-tag web",
    );
    assert_eq!(code, 0);
    assert_eq!(d["matched_by"], "vpc firewall rule: allow-from-web");

    let (code, _) = run_check(
        "tagged_source",
        "--direction ingress --protocol tcp --port 5432 --source-tag db",
    );
    assert_eq!(code, 2);
}

#[test]
fn fixture_malformed_rule_is_dropped_by_default() {
    let (code, d) = run_check(
        "malformed_rule",
        "--direction ingress --protocol tcp --port 22 --range 10.0.0.1",
    );
    assert_eq!(code, 0);
    assert_eq!(d["matched_by"], "vpc firewall rule: allow-ssh");
}

#[test]
fn fixture_malformed_rule_fails_under_strict_profile() {
    fixture_cmd("malformed_rule")
        .args(["--profile", "strict"])
        .args(["check", "--project", "p1", "--direction", "ingress"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("malformed rule"))
        .stderr(predicate::str::contains("broken-range"));
}

// ============================================================================
// CLI behavior tests
// ============================================================================

#[test]
fn text_output_explains_the_decision() {
    let explanation = "matched by: policy: folder-baseline, rule: deny all";
    fixture_cmd("folder_deny")
        .args(["check", "--project", "p1", "--direction", "ingress"])
        .args(["--protocol", "tcp"])
        .assert()
        .code(2)
        .stdout(predicate::str::starts_with("deny\n"))
        .stdout(predicate::str::contains(explanation));
}

#[test]
fn rules_lists_by_priority_then_name() {
    fixture_cmd("vpc_allow")
        .args(["rules", "--project", "p1", "--direction", "ingress"])
        .assert()
        .success()
        .stdout(predicate::str::contains("allow-ssh"))
        .stdout(predicate::str::contains("allow-web"))
        .stdout(predicate::str::contains("deny-smtp-out").not());
}

#[test]
fn rules_json_honours_filters() {
    let output = fixture_cmd("vpc_allow")
        .args(["rules", "--project", "p1", "--direction", "ingress"])
        .args(["--json", "--target-tag", "web"])
        .output()
        .expect("Failed to run command");
    assert!(output.status.success());

    let rules: Value = serde_json::from_slice(&output.stdout).expect("rules JSON");
    let names: Vec<&str> = rules
        .as_array()
        .expect("array")
        .iter()
        .filter_map(|r| r["name"].as_str())
        .collect();
    assert_eq!(names, vec!["allow-web"]);
}

#[test]
fn unknown_network_is_a_runtime_error() {
    let message = "network prod not found in project p1";
    fixture_cmd("vpc_allow")
        .args(["check", "--project", "p1", "--network", "prod"])
        .args(["--direction", "ingress"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains(message));
}

#[test]
fn config_file_selects_tie_break() {
    let tmp = TempDir::new().expect("Failed to create temp dir");
    let config = tmp.path().join("netreach.toml");
    std::fs::write(&config, "tie_break = \"hierarchy_first\"\n").expect("write config");

    let inventory = fixtures_dir().join("cross_scope_tie").join("inventory.json");
    let output = netreach_cmd()
        .arg("--inventory")
        .arg(&inventory)
        .arg("--config")
        .arg(&config)
        .args(["check", "--project", "p1", "--direction", "ingress"])
        .args(["--json", "--protocol", "tcp", "--port", "22"])
        .output()
        .expect("Failed to run command");

    // The organization allow comes first in the chain and wins the tie.
    assert_eq!(output.status.code(), Some(0));
    let d: Value = serde_json::from_slice(&output.stdout).expect("decision JSON");
    assert_eq!(d["matched_by"], "policy: org-baseline, rule: allow ssh");
}

#[test]
fn tie_break_flag_selects_hierarchy_first() {
    fixture_cmd("cross_scope_tie")
        .args(["--tie-break", "hierarchy_first"])
        .args(["check", "--project", "p1", "--direction", "ingress"])
        .args(["--protocol", "tcp", "--port", "22"])
        .assert()
        .code(0)
        .stdout(predicate::str::contains("rule: allow ssh"));
}

#[test]
fn invalid_config_is_a_runtime_error() {
    let tmp = TempDir::new().expect("Failed to create temp dir");
    let config = tmp.path().join("netreach.toml");
    std::fs::write(&config, "tie_break = \"scope\"\n").expect("write config");

    netreach_cmd()
        .arg("--inventory")
        .arg(fixtures_dir().join("empty_network").join("inventory.json"))
        .arg("--config")
        .arg(&config)
        .args(["check", "--project", "p1", "--direction", "ingress"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("unknown tie_break: scope"));
}

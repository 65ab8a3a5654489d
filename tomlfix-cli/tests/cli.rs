//! End-to-end tests for the `tomlfix` binary.

#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;
use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn tomlfix() -> Command {
    Command::cargo_bin("tomlfix").expect("tomlfix binary")
}

const TOOL_TOML: &str = "[tool]\nname = 'demo'  # keep me\nfast_mode = \"yes\"\n";

fn ledger_json(matches: &str) -> String {
    format!(
        r#"{{
  "schema": "tomlfix.matches.v1",
  "tool": {{ "name": "toy-lint", "version": "0.0.1" }},
  "matches": [{matches}]
}}"#
    )
}

/// A root with one document and a ledger that covers it.
fn create_temp_root() -> TempDir {
    let td = tempfile::tempdir().expect("tempdir");
    let root = td.path();
    fs::write(root.join("tool.toml"), TOOL_TOML).unwrap();
    fs::create_dir_all(root.join("ledgers").join("toy-lint")).unwrap();
    fs::write(
        root.join("ledgers").join("toy-lint").join("matches.json"),
        ledger_json(
            r#"
    { "document": "tool.toml", "rule_id": "toml.string-style", "location": { "toml_path": ["tool", "name"] } },
    { "document": "tool.toml", "rule_id": "toml.truthy", "location": { "line": 3 } },
    { "document": "tool.toml", "rule_id": "toml.key-case", "location": { "line": 3 } },
    { "document": "tool.toml", "rule_id": "vendor.unknown", "location": { "line": 1 } }"#,
        ),
    )
    .unwrap();
    td
}

fn read(path: &Path) -> String {
    fs::read_to_string(path).expect("read file")
}

#[test]
fn test_apply_without_write_is_dry_run() {
    let temp = create_temp_root();

    tomlfix()
        .current_dir(temp.path())
        .args(["apply", "--ledger", "ledgers"])
        .assert()
        .success()
        .stdout(predicate::str::contains("dry-run: 1 documents modified"));

    assert_eq!(read(&temp.path().join("tool.toml")), TOOL_TOML);
}

#[test]
fn test_apply_write_rewrites_document() {
    let temp = create_temp_root();

    tomlfix()
        .current_dir(temp.path())
        .args(["apply", "--ledger", "ledgers", "--write"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "1 documents modified, 3 matches fixed, 1 left unfixed, 0 errored",
        ));

    assert_eq!(
        read(&temp.path().join("tool.toml")),
        "[tool]\nname = \"demo\"  # keep me\nfast-mode = true\n"
    );
}

#[test]
fn test_apply_single_ledger_file_with_root() {
    let temp = create_temp_root();
    let root = temp.path().to_str().unwrap();
    let ledger = temp.path().join("ledgers/toy-lint/matches.json");

    tomlfix()
        .args(["apply", "--write", "--root", root, "--ledger"])
        .arg(&ledger)
        .assert()
        .success();

    assert!(read(&temp.path().join("tool.toml")).contains("fast-mode = true"));
}

#[test]
fn test_apply_writes_artifacts() {
    let temp = create_temp_root();

    tomlfix()
        .current_dir(temp.path())
        .args(["apply", "--ledger", "ledgers", "--out-dir", "out"])
        .assert()
        .success();

    let out = temp.path().join("out");
    let report: serde_json::Value =
        serde_json::from_str(&read(&out.join("report.json"))).expect("report is json");
    assert_eq!(report["schema"], "tomlfix.report.v1");
    assert_eq!(report["dry_run"], true);
    assert_eq!(report["summary"]["matches_fixed"], 3);
    assert!(read(&out.join("patch.diff")).contains("+fast-mode = true"));
    assert!(out.join("report.md").exists());
}

#[test]
fn test_deny_flag_skips_rules() {
    let temp = create_temp_root();

    tomlfix()
        .current_dir(temp.path())
        .args(["apply", "--ledger", "ledgers", "--write", "--deny", "toml.*"])
        .assert()
        .success()
        .stdout(predicate::str::contains("0 documents modified"));

    assert_eq!(read(&temp.path().join("tool.toml")), TOOL_TOML);
}

#[test]
fn test_config_file_policy_and_write() {
    let temp = create_temp_root();
    fs::write(
        temp.path().join("tomlfix.toml"),
        "[policy]\nallow = [\"toml.string-style\"]\n\n[run]\nwrite = true\njobs = 1\n",
    )
    .unwrap();

    tomlfix()
        .current_dir(temp.path())
        .args(["apply", "--ledger", "ledgers"])
        .assert()
        .success();

    assert_eq!(
        read(&temp.path().join("tool.toml")),
        "[tool]\nname = \"demo\"  # keep me\nfast_mode = \"yes\"\n"
    );
}

#[test]
fn test_invalid_config_is_tool_error() {
    let temp = create_temp_root();
    fs::write(temp.path().join("tomlfix.toml"), "[policy\n").unwrap();

    tomlfix()
        .current_dir(temp.path())
        .args(["apply", "--ledger", "ledgers"])
        .assert()
        .code(1);
}

#[test]
fn test_missing_ledger_is_tool_error() {
    let temp = create_temp_root();

    tomlfix()
        .current_dir(temp.path())
        .args(["apply", "--ledger", "nope.json"])
        .assert()
        .code(1);
}

#[test]
fn test_unparseable_document_exits_two() {
    let temp = create_temp_root();
    fs::write(temp.path().join("tool.toml"), "[tool\nname = 'x'\n").unwrap();

    tomlfix()
        .current_dir(temp.path())
        .args(["apply", "--ledger", "ledgers", "--write"])
        .assert()
        .code(2)
        .stdout(predicate::str::contains("1 errored"))
        .stderr(predicate::str::contains("tool.toml"));
}

#[test]
fn test_broken_ledger_is_skipped() {
    let temp = create_temp_root();
    fs::create_dir_all(temp.path().join("ledgers/broken")).unwrap();
    fs::write(temp.path().join("ledgers/broken/matches.json"), "{ not json").unwrap();

    tomlfix()
        .current_dir(temp.path())
        .args(["apply", "--ledger", "ledgers", "--write"])
        .assert()
        .success();

    assert!(read(&temp.path().join("tool.toml")).contains("fast-mode = true"));
}

#[test]
fn test_list_fixers_text() {
    tomlfix()
        .arg("list-fixers")
        .assert()
        .success()
        .stdout(predicate::str::contains("toml.string-style"))
        .stdout(predicate::str::contains("cargo.workspace-resolver"));
}

#[test]
fn test_list_fixers_json() {
    let output = tomlfix()
        .args(["list-fixers", "--format", "json"])
        .output()
        .expect("run tomlfix");
    assert!(output.status.success());

    let fixers: Vec<serde_json::Value> =
        serde_json::from_slice(&output.stdout).expect("json output");
    let ids: Vec<&str> = fixers
        .iter()
        .filter_map(|f| f["rule_id"].as_str())
        .collect();
    assert!(ids.contains(&"toml.truthy"));
    assert!(ids.windows(2).all(|w| w[0] < w[1]), "sorted: {ids:?}");
}

#[test]
fn test_list_fixers_rejects_unknown_format() {
    tomlfix()
        .args(["list-fixers", "--format", "yaml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}

#[test]
fn test_explain_known_rule() {
    tomlfix()
        .args(["explain", "string-style"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Rule ID:  toml.string-style"));
}

#[test]
fn test_explain_unknown_rule() {
    tomlfix()
        .args(["explain", "no-such-rule"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Unknown rule"));
}

#[test]
fn test_apply_requires_ledger() {
    tomlfix()
        .arg("apply")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--ledger"));
}

use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

fn fixture(path: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join(path)
}

#[test]
fn diff_summary_counts_operations() {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("markup-diff"));
    cmd.arg("diff")
        .arg(fixture("fixtures/page_before.xml"))
        .arg(fixture("fixtures/page_after.xml"))
        .arg("--summary")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "insert=2 delete=2 reorder=4 attr_set=1 attr_remove=0",
        ));
}

#[test]
fn diff_text_lists_operations_per_node() {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("markup-diff"));
    cmd.arg("diff")
        .arg(fixture("fixtures/page_before.xml"))
        .arg(fixture("fixtures/page_after.xml"))
        .assert()
        .success()
        .stdout(predicate::str::contains("@1"))
        .stdout(predicate::str::contains("= attrSet class=\"dark\""))
        .stdout(predicate::str::contains("~ reorder [2, 0, 1]"));
}

#[test]
fn diff_json_uses_wire_discriminators() {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("markup-diff"));
    cmd.arg("diff")
        .arg(fixture("fixtures/page_before.xml"))
        .arg(fixture("fixtures/page_after.xml"))
        .arg("--format")
        .arg("json")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"type\": \"reorder\""))
        .stdout(predicate::str::contains("\"type\": \"attrSet\""))
        .stdout(predicate::str::contains("\"type\": \"insert\""));
}

#[test]
fn diff_start_index_names_the_root_patch() {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("markup-diff"));
    cmd.arg("diff")
        .arg(fixture("fixtures/page_before.xml"))
        .arg(fixture("fixtures/page_after.xml"))
        .arg("--format")
        .arg("json")
        .arg("--start-index")
        .arg("7")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("{\n  \"index\": 7"));
}

#[test]
fn diff_config_changes_the_skip_marker() {
    let mut defaults = Command::new(assert_cmd::cargo::cargo_bin!("markup-diff"));
    defaults
        .arg("diff")
        .arg(fixture("fixtures/form_before.xml"))
        .arg(fixture("fixtures/form_after.xml"))
        .arg("--summary")
        .assert()
        .success()
        .stdout(predicate::str::contains("insert=1"))
        .stdout(predicate::str::contains("attr_remove=1"));

    let mut configured = Command::new(assert_cmd::cargo::cargo_bin!("markup-diff"));
    configured
        .arg("diff")
        .arg(fixture("fixtures/form_before.xml"))
        .arg(fixture("fixtures/form_after.xml"))
        .arg("--summary")
        .arg("--config")
        .arg(fixture("fixtures/diff.toml"))
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "insert=0 delete=0 reorder=0 attr_set=0 attr_remove=0",
        ));
}

#[test]
fn diff_writes_json_to_output_file() {
    let dir = tempdir().expect("tempdir");
    let out = dir.path().join("patch.json");

    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("markup-diff"));
    cmd.arg("diff")
        .arg(fixture("fixtures/page_before.xml"))
        .arg(fixture("fixtures/page_after.xml"))
        .arg("--format")
        .arg("json")
        .arg("--output")
        .arg(&out)
        .assert()
        .success();

    let written = fs::read_to_string(&out).expect("read patch");
    assert!(written.contains("\"type\": \"delete\""));
}

#[test]
fn diff_refuses_to_overwrite_an_input() {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("markup-diff"));
    cmd.arg("diff")
        .arg(fixture("fixtures/page_before.xml"))
        .arg(fixture("fixtures/page_after.xml"))
        .arg("--output")
        .arg(fixture("fixtures/page_after.xml"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("is the after file"));
}

#[test]
fn diff_reports_missing_config() {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("markup-diff"));
    cmd.arg("diff")
        .arg(fixture("fixtures/page_before.xml"))
        .arg(fixture("fixtures/page_after.xml"))
        .arg("--config")
        .arg(fixture("fixtures/does_not_exist.toml"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read config file"));
}

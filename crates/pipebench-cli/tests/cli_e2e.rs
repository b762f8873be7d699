use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

fn pipebench() -> Command {
    Command::new(env!("CARGO_BIN_EXE_pipebench"))
}

#[test]
fn genconfig_prints_the_three_stanzas_in_order() {
    let tmp = tempfile::tempdir().unwrap();
    let filter = tmp.path().join("filter.conf");
    fs::write(&filter, "filter { mutate { } }\n").unwrap();

    let output = pipebench()
        .args([
            "genconfig",
            "-c",
            "json",
            "-s",
            "/file/path/logs.log",
            "-t",
            "/file/db/path",
        ])
        .arg("-f")
        .arg(&filter)
        .output()
        .unwrap();
    assert!(output.status.success());

    let doc = String::from_utf8(output.stdout).unwrap();
    let input = doc.find("input {file {codec => \"json\" mode => \"tail\" path => \"/file/path/logs.log\"").unwrap();
    let filter_pos = doc.find("filter {ruby { code =>").unwrap();
    let out_pos = doc
        .find("output {file {path => \"/file/db/path/output.log\"} }")
        .unwrap();
    assert!(input < filter_pos && filter_pos < out_pos);
    assert!(doc.contains("sincedb_path => \"/file/db/path/sincedb.log\""));
    assert!(doc.contains("start_position => \"beginning\""));
}

#[test]
fn genconfig_with_missing_filter_file_fails() {
    pipebench()
        .args(["genconfig", "-f", "/no/such/filter.conf"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("filter file"));
}

#[test]
fn unknown_flag_is_a_usage_error() {
    pipebench()
        .args(["run", "--definitely-not-a-flag"])
        .assert()
        .failure()
        .code(2);
}

#[cfg(unix)]
fn write_fake_engine(dir: &Path) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;
    let script = r#"#!/bin/sh
config="$2"
out=$(sed -n 's/.*output {file {path => "\([^"]*\)".*/\1/p' "$config")
db=$(sed -n 's/.*sincedb_path => "\([^"]*\)".*/\1/p' "$config")
printf '{"processed_at":"%s","message":"benchmark sample"}\n' "$(date -u +%Y-%m-%dT%H:%M:%SZ)" > "$out"
sleep 1
echo "0 0 0 100" > "$db"
sleep 60
"#;
    let path = dir.join("fake-engine.sh");
    fs::write(&path, script).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

#[cfg(unix)]
#[test]
fn run_against_a_fake_engine_prints_a_result_block() {
    let tmp = tempfile::tempdir().unwrap();
    let engine = write_fake_engine(tmp.path());

    let source = tmp.path().join("input.log");
    fs::write(&source, "x".repeat(100)).unwrap();
    let filter = tmp.path().join("filter.conf");
    fs::write(&filter, "filter { mutate { } }\n").unwrap();
    let runs = tmp.path().join("runs");
    fs::create_dir_all(&runs).unwrap();

    let mut cmd = pipebench();
    cmd.arg("run")
        .arg("-e")
        .arg(&engine)
        .arg("-s")
        .arg(&source)
        .arg("-f")
        .arg(&filter)
        .arg("-t")
        .arg(&runs)
        .args(["--poll-ms", "50", "--timeout-secs", "30"]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Filter File:"))
        .stdout(predicate::str::contains("Input File Size: 100"))
        .stdout(predicate::str::contains("File Size Change Percentage:"));

    // The run workspace must be gone afterwards.
    assert_eq!(fs::read_dir(&runs).unwrap().count(), 0);
}

#[cfg(unix)]
#[test]
fn run_iterations_print_one_result_each() {
    let tmp = tempfile::tempdir().unwrap();
    let engine = write_fake_engine(tmp.path());

    let source = tmp.path().join("input.log");
    fs::write(&source, "y".repeat(50)).unwrap();
    let filter = tmp.path().join("filter.conf");
    fs::write(&filter, "filter { }\n").unwrap();
    let runs = tmp.path().join("runs");
    fs::create_dir_all(&runs).unwrap();

    let output = pipebench()
        .arg("run")
        .arg("-e")
        .arg(&engine)
        .arg("-s")
        .arg(&source)
        .arg("-f")
        .arg(&filter)
        .arg("-t")
        .arg(&runs)
        .args(["-i", "2", "--poll-ms", "50", "--timeout-secs", "30"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert_eq!(stdout.matches("Filter File:").count(), 2);
}

use assert_cmd::Command;
use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;
use serde_json::Value;
use tempfile::TempDir;

/// Runs inside an empty directory so no stray `qail-array.toml` is picked up.
fn cmd(dir: &TempDir) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("qail-array"));
    cmd.current_dir(dir.path())
        .env_remove("QAIL_ARRAY_CONFIG")
        .env_remove("RUST_LOG")
        .arg("--no-color");
    cmd
}

fn stdout_json(output: &[u8]) -> Value {
    serde_json::from_slice(output).expect("valid json")
}

#[test]
fn decode_prints_elements() {
    let temp = TempDir::new().expect("tempdir");
    cmd(&temp)
        .args(["decode", r#"{a,"b,c",NULL}"#])
        .assert()
        .success()
        .stdout(contains("b,c").and(contains("NULL")).and(contains("3 element(s)")));
}

#[test]
fn decode_json_output() {
    let temp = TempDir::new().expect("tempdir");
    let output = cmd(&temp)
        .args(["decode", r#"{a,"b\"c",NULL}"#, "--format", "json"])
        .output()
        .expect("run");
    assert!(output.status.success());
    let json = stdout_json(&output.stdout);
    assert_eq!(json, serde_json::json!(["a", "b\"c", null]));
}

#[test]
fn decode_rejects_two_dimensions() {
    let temp = TempDir::new().expect("tempdir");
    cmd(&temp)
        .args(["decode", "{{1,2},{3,4}}"])
        .assert()
        .failure()
        .stderr(contains("Error:").and(contains("ARRAY[2][2]")));
}

#[test]
fn decode_reports_offset() {
    let temp = TempDir::new().expect("tempdir");
    cmd(&temp)
        .args(["decode", "{1,2"])
        .assert()
        .failure()
        .stderr(contains("expected '}' at offset 4"));
}

#[test]
fn empty_delimiter_flag_fails() {
    let temp = TempDir::new().expect("tempdir");
    cmd(&temp)
        .args(["decode", "{a,b}", "-d", ""])
        .assert()
        .failure()
        .stderr(contains("delimiter must not be empty"));
}

#[test]
fn inspect_table_shape() {
    let temp = TempDir::new().expect("tempdir");
    cmd(&temp)
        .args(["inspect", "{{1,2,3},{4,5,6}}", "-f", "table"])
        .assert()
        .success()
        .stdout(contains("Dimensions: 2 [2][3]"));
}

#[test]
fn inspect_shows_dimensions() {
    let temp = TempDir::new().expect("tempdir");
    let output = cmd(&temp)
        .args(["inspect", "{{1,2},{3,4}}", "-f", "json"])
        .output()
        .expect("run");
    assert!(output.status.success());
    let json = stdout_json(&output.stdout);
    assert_eq!(json["dims"], serde_json::json!([2, 2]));
    assert_eq!(json["elements"], serde_json::json!(["1", "2", "3", "4"]));
}

#[test]
fn encode_quotes_everything() {
    let temp = TempDir::new().expect("tempdir");
    cmd(&temp)
        .args(["encode", "a\"b", "c\\d"])
        .assert()
        .success()
        .stdout(concat!(r#"{"a\"b","c\\d"}"#, "\n"));

    cmd(&temp)
        .arg("encode")
        .assert()
        .success()
        .stdout("{}\n");
}

#[test]
fn bytea_from_stdin() {
    let temp = TempDir::new().expect("tempdir");
    cmd(&temp)
        .args(["bytea", "-", "--format", "text"])
        .write_stdin("\\x48656c6c6f\n")
        .assert()
        .success()
        .stdout("Hello\n");
}

#[test]
fn bytea_hex_output() {
    let temp = TempDir::new().expect("tempdir");
    cmd(&temp)
        .args(["bytea", r"a\\\001"])
        .assert()
        .success()
        .stdout("615c01\n");
}

#[test]
fn config_sets_delimiter_and_format() {
    let temp = TempDir::new().expect("tempdir");
    std::fs::write(
        temp.path().join("qail-array.toml"),
        "[array]\ndelimiter = \";\"\n\n[output]\nformat = \"json\"\n",
    )
    .expect("write config");

    let output = cmd(&temp)
        .args(["decode", "{a,b;c}"])
        .output()
        .expect("run");
    assert!(output.status.success());
    assert_eq!(stdout_json(&output.stdout), serde_json::json!(["a,b", "c"]));
}

#[test]
fn explicit_missing_config_fails() {
    let temp = TempDir::new().expect("tempdir");
    let missing = temp.path().join("missing.toml");
    cmd(&temp)
        .arg("--config")
        .arg(missing)
        .args(["encode", "x"])
        .assert()
        .failure()
        .stderr(contains("failed to read"));
}

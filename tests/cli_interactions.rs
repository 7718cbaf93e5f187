//! CLI options interaction tests
//!
//! These tests run the `propbind` binary inside a temporary working
//! directory and check the printed record, error categories and exit codes.

use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::process::Command;
use tempfile::TempDir;

const APPLICATION_YML: &str = r#"
person:
  last-name: Li
  age: 18
  boss: false
  birth: 2017/12/12
  maps: {k1: v1, k2: 12}
  list:
    - lisi
    - zhaoliu
  dog:
    name: Tom
"#;

/// Temporary working directory with the given files
fn workspace(files: &[(&str, &str)]) -> TempDir {
    let dir = TempDir::new().unwrap();
    for (name, content) in files {
        fs::write(dir.path().join(name), content).unwrap();
    }
    dir
}

/// Command running in `dir` with plain output
fn create_test_cmd(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("propbind").unwrap();
    cmd.current_dir(dir.path()).arg("--no-color");
    cmd
}

#[test]
fn test_binds_default_document() {
    let dir = workspace(&[("application.yml", APPLICATION_YML)]);

    create_test_cmd(&dir)
        .arg("--no-env")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Person{lastName='Li', age=18, isOwner=false, birthDate=2017-12-12 00:00:00, \
             attributes={k1=v1, k2=12}, tags=[lisi, zhaoliu], pet=Pet{name='Tom', breed=null}}",
        ));
}

#[test]
fn test_empty_directory_prints_zero_record() {
    let dir = workspace(&[]);

    create_test_cmd(&dir)
        .arg("--no-env")
        .assert()
        .success()
        .stdout(predicate::str::contains("Person{lastName=null, age=null"));
}

#[test]
fn test_named_source_and_overrides() {
    let dir = workspace(&[
        ("application.yml", APPLICATION_YML),
        ("person.properties", "person.last-name=Zhang\nperson.maps.k3=v3\n"),
    ]);

    create_test_cmd(&dir)
        .args(["--no-env", "--source", "person.properties"])
        .assert()
        .success()
        .stdout(predicate::str::contains("lastName='Li'"))
        .stdout(predicate::str::contains("k3=v3"));

    create_test_cmd(&dir)
        .args(["--no-env", "--source", "person.properties", "--set", "person.lastName=Wang"])
        .assert()
        .success()
        .stdout(predicate::str::contains("lastName='Wang'"));
}

#[test]
fn test_explicit_config_document() {
    let dir = workspace(&[("custom.json", r#"{"person": {"age": 41, "isOwner": true}}"#)]);

    create_test_cmd(&dir)
        .args(["--no-env", "--config", "custom.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("age=41, isOwner=true"));
}

#[test]
fn test_json_output() {
    let dir = workspace(&[("application.yml", APPLICATION_YML)]);

    let output = create_test_cmd(&dir)
        .args(["--no-env", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["lastName"], "Li");
    assert_eq!(json["age"], 18);
    assert_eq!(json["attributes"]["k2"], "12");
    assert_eq!(json["pet"]["name"], "Tom");
}

#[test]
fn test_environment_layers() {
    let dir = workspace(&[("application.yml", APPLICATION_YML), (".env", "PERSON_AGE=30\n")]);

    create_test_cmd(&dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("age=30"));

    create_test_cmd(&dir)
        .env("PERSON_AGE", "31")
        .assert()
        .success()
        .stdout(predicate::str::contains("age=31"));

    create_test_cmd(&dir)
        .env("PERSON_AGE", "31")
        .arg("--no-env")
        .assert()
        .success()
        .stdout(predicate::str::contains("age=18"));
}

#[test]
fn test_bind_error_exit_code() {
    let dir = workspace(&[("application.properties", "person.age=eighteen\n")]);

    create_test_cmd(&dir)
        .arg("--no-env")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("[BIND]"))
        .stderr(predicate::str::contains("person.age"))
        .stderr(predicate::str::contains("Binding help"));
}

#[test]
fn test_missing_config_document() {
    let dir = workspace(&[]);

    create_test_cmd(&dir)
        .args(["--no-env", "--config", "missing.yml"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("[CONFIG]"))
        .stderr(predicate::str::contains("missing.yml"));
}

#[test]
fn test_broken_document_is_parse_error() {
    let dir = workspace(&[("application.json", "{\"person\": ")]);

    create_test_cmd(&dir)
        .arg("--no-env")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("[PARSE]"));
}

#[test]
fn test_strict_and_deny_unknown_modes() {
    let dir = workspace(&[("application.properties", "person.maps=k1:v1\nperson.nmae=Li\n")]);

    create_test_cmd(&dir)
        .arg("--no-env")
        .assert()
        .success()
        .stdout(predicate::str::contains("attributes={}"));

    create_test_cmd(&dir)
        .args(["--no-env", "--strict"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("[NESTED]"));

    create_test_cmd(&dir)
        .args(["--no-env", "--deny-unknown"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("[UNKNOWN]"))
        .stderr(predicate::str::contains("person.nmae"));
}

#[test]
fn test_validation_error() {
    let dir = workspace(&[("application.properties", "person.age=-3\n")]);

    create_test_cmd(&dir)
        .arg("--no-env")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("[VALIDATION]"));
}

#[test]
fn test_validation_error_names_custom_prefix() {
    let dir = workspace(&[("application.properties", "app.owner.age=-3\n")]);

    create_test_cmd(&dir)
        .args(["--no-env", "--prefix", "app.owner"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("app.owner.age must not be negative"));
}

#[test]
fn test_bracketed_map_key_overrides_document() {
    let dir = workspace(&[("application.yml", APPLICATION_YML)]);

    create_test_cmd(&dir)
        .args(["--no-env", "--set", "person.maps[k1]=override"])
        .assert()
        .success()
        .stdout(predicate::str::contains("k1=override"))
        .stdout(predicate::str::contains("[k1]").not());
}

#[test]
fn test_help_lists_environment_variables() {
    let dir = workspace(&[]);

    create_test_cmd(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("PERSON_<FIELD>"))
        .stdout(predicate::str::contains("Configuration Priority"));
}

#[test]
fn test_custom_prefix() {
    let dir = workspace(&[("application.properties", "app.owner.last-name=Zhao\nperson.last-name=Li\n")]);

    create_test_cmd(&dir)
        .args(["--no-env", "--prefix", "app.owner"])
        .assert()
        .success()
        .stdout(predicate::str::contains("lastName='Zhao'"));
}

#[test]
fn test_verbose_summary_goes_to_stderr() {
    let dir = workspace(&[("application.yml", APPLICATION_YML)]);

    create_test_cmd(&dir)
        .args(["--no-env", "--verbose"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Sources").not())
        .stderr(predicate::str::contains("Sources (lowest precedence first):"))
        .stderr(predicate::str::contains("application.yml"));
}

#[test]
fn test_example_env() {
    let dir = workspace(&[]);

    create_test_cmd(&dir)
        .args(["--example-env", "--prefix", "app"])
        .assert()
        .success()
        .stdout(predicate::str::contains("# APP_LASTNAME=Zhang"));
}

#[test]
fn test_conflicting_color_flags() {
    let dir = workspace(&[]);

    create_test_cmd(&dir)
        .arg("--color")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("--color and --no-color"));
}

#[test]
fn test_invalid_arguments() {
    let dir = workspace(&[]);

    create_test_cmd(&dir).args(["--set", "no-equals-sign"]).assert().failure();
    create_test_cmd(&dir).args(["--format", "xml"]).assert().failure();
}

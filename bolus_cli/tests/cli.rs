use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const CONFIG: &str = r#"
[therapy]
isf = 50.0
carb_ratio = 10.0
target_glucose = 100.0

[safety]
max_bolus_units = 10.0

[calculator]
fraction = 0.8

[[basal]]
start = "00:00"
rate = 1.0
"#;

const GLUCOSE: &str = "minutes_ago,glucose\n0,180\n5,176\n10,173\n15,170\n";

fn setup() -> TempDir {
    let dir = TempDir::new().expect("tempdir");
    fs::write(dir.path().join("bolus.toml"), CONFIG).unwrap();
    fs::write(dir.path().join("glucose.csv"), GLUCOSE).unwrap();
    dir
}

fn cmd(dir: &TempDir) -> Command {
    let mut c = Command::cargo_bin("bolus_cli").expect("binary");
    c.current_dir(dir.path());
    c
}

#[test]
fn advise_prints_rounded_recommendation() {
    let dir = setup();
    cmd(&dir)
        .args(["advise", "--glucose", "glucose.csv", "--iob", "2", "--cob", "30"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Recommended bolus: 2.25 U"))
        .stdout(predicate::str::contains("Total computed need: 2.80 U"))
        .stdout(predicate::str::contains("pending"));
}

#[test]
fn advise_emits_json() {
    let dir = setup();
    let output = cmd(&dir)
        .args([
            "--json", "advise", "--glucose", "glucose.csv", "--iob", "2", "--cob", "30",
        ])
        .output()
        .expect("run");
    assert!(output.status.success());
    let v: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    assert!((v["amount"].as_f64().unwrap() - 2.25).abs() < 1e-9);
    assert_eq!(v["warning"], "Pending");
}

#[test]
fn suggestion_file_enables_reconciliation() {
    let dir = setup();
    fs::write(
        dir.path().join("suggestion.json"),
        r#"{ "insulin_for_manual_bolus": 1.5 }"#,
    )
    .unwrap();
    cmd(&dir)
        .args([
            "advise",
            "--glucose",
            "glucose.csv",
            "--iob",
            "2",
            "--cob",
            "30",
            "--suggestion",
            "suggestion.json",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("exceeds the algorithm's recommendation"));
}

#[test]
fn override_maps_both_directions() {
    let dir = setup();
    cmd(&dir)
        .args(["override", "--percentage", "100"])
        .assert()
        .success()
        .stdout(predicate::str::contains("target 100"));
    cmd(&dir)
        .args(["override", "--target", "160"])
        .assert()
        .success()
        .stdout(predicate::str::contains("50 %"));
}

#[test]
fn invalid_config_fails_with_context() {
    let dir = setup();
    fs::write(
        dir.path().join("bolus.toml"),
        CONFIG.replace("isf = 50.0", "isf = 0.0"),
    )
    .unwrap();
    cmd(&dir)
        .args(["advise", "--glucose", "glucose.csv"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("isf"));
}

#[test]
fn missing_glucose_file_fails() {
    let dir = setup();
    cmd(&dir)
        .args(["advise", "--glucose", "nope.csv"])
        .assert()
        .failure();
}

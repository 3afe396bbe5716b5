use bolus_config::{load_toml, validate};
use rstest::rstest;

fn base_toml() -> String {
    r#"
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
    rate = 0.8

    [[basal]]
    start = "06:30"
    rate = 1.1
    "#
    .to_string()
}

#[test]
fn full_config_validates() {
    let cfg = load_toml(&base_toml()).expect("parse");
    validate(&cfg).expect("valid");
}

#[rstest]
#[case("isf = 50.0", "isf = 0.0")]
#[case("carb_ratio = 10.0", "carb_ratio = -1.0")]
#[case("target_glucose = 100.0", "target_glucose = 0.0")]
#[case("fraction = 0.8", "fraction = 2.5")]
#[case("max_bolus_units = 10.0", "max_bolus_units = 0.0")]
fn out_of_range_values_are_rejected(#[case] good: &str, #[case] bad: &str) {
    let toml_text = base_toml().replace(good, bad);
    let cfg = load_toml(&toml_text).expect("parse");
    assert!(validate(&cfg).is_err(), "expected rejection for {bad}");
}

#[test]
fn basal_entries_must_be_ordered() {
    let toml_text = base_toml().replace("start = \"06:30\"", "start = \"00:00\"");
    let cfg = load_toml(&toml_text).expect("parse");
    assert!(validate(&cfg).is_err());
}

#[test]
fn first_basal_entry_must_start_at_midnight() {
    let toml_text = base_toml().replacen("start = \"00:00\"", "start = \"01:00\"", 1);
    let cfg = load_toml(&toml_text).expect("parse");
    assert!(validate(&cfg).is_err());
}

#[test]
fn empty_basal_schedule_is_allowed() {
    // Superbolus will be refused at runtime instead.
    let cfg = load_toml(
        r#"
        [therapy]
        isf = 40.0
        carb_ratio = 12.0
        target_glucose = 95.0
        "#,
    )
    .expect("parse");
    validate(&cfg).expect("valid");
    assert!(cfg.basal.is_empty());
}

#[test]
fn half_basal_target_must_exceed_normal_range() {
    let toml_text = base_toml().replace(
        "fraction = 0.8",
        "fraction = 0.8\nhalf_basal_target = 90.0",
    );
    let cfg = load_toml(&toml_text).expect("parse");
    assert!(validate(&cfg).is_err());
}

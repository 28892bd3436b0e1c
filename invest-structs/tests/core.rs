use invest_structs::{config::RunSettings, core::OutputData};
use invest_utils::{dejsonify, jsonify, Amount};
use serde_json::json;
use std::{path::Path, time::Duration};

fn output_data() -> OutputData {
    OutputData {
        algorithm: "dynamic".to_string(),
        dataset: "test_shares".to_string(),
        budget: Amount::from_f64(300.0).unwrap(),
        selection: vec!["A".to_string(), "B".to_string()],
        total_cost: Amount::from_f64(300.0).unwrap(),
        total_profit: 160.0,
        elapsed_secs: 0.5,
        subsets_examined: None,
        precision_gap: None,
    }
}

#[test]
fn test_output_data_json_omits_missing_fields() {
    let text = jsonify(&output_data()).unwrap();
    assert_eq!(
        text,
        r#"{"algorithm":"dynamic","budget":"300.00","dataset":"test_shares","elapsed_secs":0.5,"selection":["A","B"],"total_cost":"300.00","total_profit":160.0}"#
    );
    assert_eq!(dejsonify::<OutputData>(&text).unwrap(), output_data());
}

#[test]
fn test_output_data_return_rate() {
    let data = output_data();
    assert!((data.return_rate() - 160.0 / 3.0).abs() < 1e-9);

    let empty = OutputData {
        selection: vec![],
        total_cost: Amount::ZERO,
        total_profit: 0.0,
        ..output_data()
    };
    assert_eq!(empty.return_rate(), 0.0);
}

#[test]
fn test_settings_defaults() {
    let settings: RunSettings = dejsonify(r#"{"dataset":"dataset1"}"#).unwrap();
    assert_eq!(settings, RunSettings::new("dataset1"));
    assert_eq!(settings.budget(), 500.0);
    assert_eq!(settings.algorithm(), "dynamic");
    assert_eq!(settings.timeout(), None);
}

#[test]
fn test_settings_overrides() {
    let settings: RunSettings = dejsonify(
        r#"{"dataset":"dataset2","budget":720,"algorithm":"brute_force","timeout_ms":50,"hyperparameters":{"check_interval":16}}"#,
    )
    .unwrap();
    assert_eq!(settings.budget(), 720.0);
    assert_eq!(settings.algorithm(), "brute_force");
    assert_eq!(settings.timeout(), Some(Duration::from_millis(50)));
    assert_eq!(
        settings.hyperparameters.as_ref().unwrap().get("check_interval"),
        Some(&json!(16))
    );
}

#[test]
fn test_dataset_path_resolution() {
    let data_dir = Path::new("data");
    assert_eq!(
        RunSettings::new("dataset1").dataset_path(data_dir),
        Path::new("data/dataset1.csv")
    );
    assert_eq!(
        RunSettings::new("/tmp/shares.csv").dataset_path(data_dir),
        Path::new("/tmp/shares.csv")
    );
}

use std::path::Path;
use std::process::{Command, Output};

use serde_json::{Value, json};
use tempfile::TempDir;

const SNAPSHOT: &str = r#"{
    "resource": {"host.name": "web-1"},
    "records": [
        {
            "name": "requests",
            "number_kind": "int64",
            "labels": {"host.name": "pod-7"},
            "aggregation": {"kind": "sum", "values": [40, 2]}
        },
        {
            "name": "temperature",
            "aggregation": {"kind": "last_value", "values": [21.5]}
        },
        {
            "name": "latency",
            "unit": "ms",
            "aggregation": {"kind": "min_max_sum_count", "values": [4.0, 1.0, 10.0, 5.0]}
        },
        {
            "name": "idle",
            "aggregation": {"kind": "sum"}
        }
    ]
}"#;

fn nrmetrics(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_nrmetrics"))
        .current_dir(dir)
        .env_remove("RUST_LOG")
        .env("NRMETRICS__EXPORTER__SERVICE_NAME", "checkout-api")
        .args(args)
        .output()
        .expect("failed to run nrmetrics")
}

#[test]
fn test_convert_prints_metrics_and_skips_failures() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("snapshot.json");
    std::fs::write(&input, SNAPSHOT).unwrap();

    let output = nrmetrics(dir.path(), &["convert", input.to_str().unwrap()]);
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let metrics: Vec<Value> = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(metrics.len(), 2);

    assert_eq!(metrics[0]["type"], json!("count"));
    assert_eq!(metrics[0]["name"], json!("requests"));
    assert_eq!(metrics[0]["value"], json!(42.0));
    assert_eq!(metrics[0]["attributes"]["host.name"], json!("pod-7"));
    assert_eq!(metrics[0]["attributes"]["service.name"], json!("checkout-api"));

    assert_eq!(metrics[1]["type"], json!("summary"));
    assert_eq!(
        metrics[1]["value"],
        json!({"count": 4.0, "sum": 20.0, "min": 1.0, "max": 10.0})
    );
    assert_eq!(metrics[1]["attributes"]["host.name"], json!("web-1"));
    assert_eq!(metrics[1]["attributes"]["unit"], json!("ms"));

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Skipping metric temperature"), "{stderr}");
    assert!(stderr.contains("Skipping metric idle"), "{stderr}");
}

#[test]
fn test_convert_rejects_malformed_snapshot() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("broken.json");
    std::fs::write(&input, "{\"records\": 3}").unwrap();

    let output = nrmetrics(dir.path(), &["convert", input.to_str().unwrap()]);

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
}

#[test]
fn test_config_json_reflects_environment() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("nrmetrics.toml"),
        "[resource]\n\"deployment.environment\" = \"staging\"\n",
    )
    .unwrap();

    let output = nrmetrics(dir.path(), &["config", "--json"]);
    assert!(output.status.success());

    let config: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(config["exporter"]["service_name"], json!("checkout-api"));
    assert_eq!(
        config["resource"]["deployment.environment"],
        json!("staging")
    );
}

#[test]
fn test_missing_config_file_is_an_error() {
    let dir = TempDir::new().unwrap();

    let output = nrmetrics(dir.path(), &["--config", "absent.toml", "validate"]);

    assert!(!output.status.success());
}

#[test]
fn test_version_names_the_binary() {
    let dir = TempDir::new().unwrap();

    let output = nrmetrics(dir.path(), &["version"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.starts_with(&format!("nrmetrics {}", env!("CARGO_PKG_VERSION"))),
        "{stdout}"
    );
}

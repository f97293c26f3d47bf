use std::process::Command;

fn temp_path(label: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!(
        "sitekit-cli-{label}-{}",
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos()
    ))
}

#[test]
fn cli_list_scenarios_writes_output() {
    let exe = env!("CARGO_BIN_EXE_sitekit-tester");
    let output_path = temp_path("list");
    let status = Command::new(exe)
        .args(["--list-scenarios", "--output"])
        .arg(&output_path)
        .status()
        .expect("run cli");
    assert!(status.success());
    let content = std::fs::read_to_string(output_path).expect("read output");
    assert!(content.contains("Available scenarios"));
    assert!(content.contains("link-guard"));
}

#[test]
fn cli_logic_mode_passes_and_reports_json() {
    let exe = env!("CARGO_BIN_EXE_sitekit-tester");
    let output_path = temp_path("logic");
    let status = Command::new(exe)
        .args([
            "--mode",
            "logic",
            "--scenarios",
            "all",
            "--iterations",
            "2",
            "--report",
            "json",
            "--output",
        ])
        .arg(&output_path)
        .status()
        .expect("run cli");
    assert!(status.success());
    let content = std::fs::read_to_string(output_path).expect("read output");
    let results: serde_json::Value = serde_json::from_str(&content).expect("json report");
    let results = results.as_array().expect("array of results");
    assert!(!results.is_empty());
    assert!(results.iter().all(|r| r["passed"] == true));
    assert!(results.iter().all(|r| r["iterations_run"] == 2));
}

#[test]
fn cli_runs_with_unknown_browser_and_json_report() {
    let exe = env!("CARGO_BIN_EXE_sitekit-tester");
    let output_path = temp_path("browser");
    let output = Command::new(exe)
        .args([
            "--mode",
            "browser",
            "--browsers",
            "unknown",
            "--report",
            "json",
            "--scenarios",
            "toast",
            "--output",
        ])
        .arg(&output_path)
        .output()
        .expect("run cli");
    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Unknown browser"));
    let content = std::fs::read_to_string(output_path).expect("read output");
    assert_eq!(content.trim(), "[]");
}

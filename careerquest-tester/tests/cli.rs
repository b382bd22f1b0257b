use std::process::Command;

fn temp_path(label: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!(
        "careerquest-cli-{label}-{}",
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos()
    ))
}

#[test]
fn cli_list_scenarios_writes_output() {
    let exe = env!("CARGO_BIN_EXE_careerquest-tester");
    let output_path = temp_path("list");
    let status = Command::new(exe)
        .args(["--list-scenarios", "--output"])
        .arg(&output_path)
        .status()
        .expect("run cli");
    assert!(status.success());
    let content = std::fs::read_to_string(output_path).expect("read output");
    assert!(content.contains("Available scenarios"));
    assert!(content.contains("full-career"));
}

#[test]
fn cli_runs_all_scenarios_with_json_report() {
    let exe = env!("CARGO_BIN_EXE_careerquest-tester");
    let output_path = temp_path("run");
    let output = Command::new(exe)
        .args([
            "--report",
            "json",
            "--scenarios",
            "all",
            "--iterations",
            "2",
            "--seeds",
            "1,2",
            "--output",
        ])
        .arg(&output_path)
        .output()
        .expect("run cli");
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Career Quest Automated Tester"));

    let content = std::fs::read_to_string(output_path).expect("read output");
    let results: serde_json::Value = serde_json::from_str(&content).expect("json report");
    let results = results.as_array().expect("array");
    assert_eq!(results.len(), 12);
    assert!(results.iter().all(|r| r["passed"] == true));
}

#[test]
fn cli_rejects_inconsistent_rules_file() {
    let exe = env!("CARGO_BIN_EXE_careerquest-tester");
    let rules_path = temp_path("rules");
    std::fs::write(&rules_path, r#"{"architecture_penalty": 15}"#).expect("write rules");
    let output = Command::new(exe)
        .args(["--scenarios", "smoke", "--iterations", "1", "--rules"])
        .arg(&rules_path)
        .output()
        .expect("run cli");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("architecture_penalty"));
}

#[test]
fn cli_fails_when_a_scenario_fails() {
    let exe = env!("CARGO_BIN_EXE_careerquest-tester");
    let catalog_path = temp_path("catalog");
    // A single challenge cannot carry a player to completion.
    std::fs::write(
        &catalog_path,
        r#"{"challenges": [{
            "id": "lonely",
            "title": "Lonely",
            "description": "only one",
            "category": "logic",
            "required_stage": "intern",
            "options": [{"text": "a", "is_correct": true}, {"text": "b"}]
        }]}"#,
    )
    .expect("write catalog");
    let output = Command::new(exe)
        .args([
            "--scenarios",
            "full-career",
            "--iterations",
            "1",
            "--report",
            "markdown",
            "--catalog",
        ])
        .arg(&catalog_path)
        .output()
        .expect("run cli");
    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("catalog exhausted"));
}

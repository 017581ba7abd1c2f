// suggest_core/tests/cli_tests.rs
// Drives suggest_cli end to end with fixture files

use assert_cmd::Command;
use insta::{assert_json_snapshot, assert_snapshot};
use serde_json::Value;
use std::io::Write;
use tempfile::NamedTempFile;

fn fixture(lines: &[&str]) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create fixture");
    for line in lines {
        writeln!(file, "{}", line).expect("write fixture");
    }
    file
}

fn cli() -> Command {
    Command::cargo_bin("suggest_cli").expect("suggest_cli binary must be built")
}

#[test]
fn test_query_prints_completion() {
    let corpus = fixture(&["New-Thing -Group rg1 -Location eastus"]);
    let output = cli()
        .arg("query")
        .arg("--corpus")
        .arg(corpus.path())
        .arg("New-Thing -Group rg1")
        .assert()
        .success()
        .get_output()
        .clone();

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_snapshot!(stdout.trim_end(), @"New-Thing -Group rg1 -Location eastus");
}

#[test]
fn test_query_json_reports_template_and_source() {
    let corpus = fixture(&["Get-Thing -Name foo", "", "Set-Thing -Id 1 -Mode fast"]);
    let output = cli()
        .args(["query", "--json", "--corpus"])
        .arg(corpus.path())
        .arg("Get-Thing -Name a | Set-Thing -Id 2")
        .assert()
        .success()
        .get_output()
        .clone();

    let value: Value = serde_json::from_slice(&output.stdout).expect("json output");
    assert_json_snapshot!(value, @r###"
{
  "line": "Get-Thing -Name a | Set-Thing -Id 2 -Mode fast",
  "source": "predictions",
  "template_index": 1
}
"###);
}

#[test]
fn test_query_without_match_exits_with_one() {
    let corpus = fixture(&["Get-Thing -Name foo"]);
    cli()
        .arg("query")
        .arg("--corpus")
        .arg(corpus.path())
        .arg("Get-Thing -Name foo")
        .assert()
        .code(1)
        .stdout("");
}

#[test]
fn test_query_falls_back_to_commands() {
    let corpus = fixture(&["Get-Thing -Name foo"]);
    let commands = fixture(&["Remove-Thing -Id"]);
    let output = cli()
        .arg("query")
        .arg("--corpus")
        .arg(corpus.path())
        .arg("--commands")
        .arg(commands.path())
        .arg("Remove-")
        .assert()
        .success()
        .get_output()
        .clone();

    assert_snapshot!(String::from_utf8_lossy(&output.stdout).trim_end(), @"Remove-Thing -Id");
}

#[test]
fn test_index_groups_bags() {
    let corpus = fixture(&["Get-Thing -Name foo", "get-thing -Name bar -Verbose"]);
    let output = cli()
        .arg("index")
        .arg("--corpus")
        .arg(corpus.path())
        .assert()
        .success()
        .get_output()
        .clone();

    let templates: Value = serde_json::from_slice(&output.stdout).expect("json output");
    assert_eq!(templates.as_array().map(Vec::len), Some(1));
    assert_eq!(templates[0]["command"], "Get-Thing");
    assert_eq!(templates[0]["bags"][1][1]["flag"], "-Verbose");
    assert_eq!(templates[0]["bags"][1][1]["value"], Value::Null);
}

#[test]
fn test_snippet_redacts_history() {
    let history = fixture(&["ls -la", "New-Thing -Location eastus -Group rg1 -Verbose"]);
    let commands = fixture(&["New-Thing", "Get-Thing"]);
    let output = cli()
        .arg("snippet")
        .arg("--history")
        .arg(history.path())
        .arg("--commands")
        .arg(commands.path())
        .assert()
        .success()
        .get_output()
        .clone();

    assert_snapshot!(String::from_utf8_lossy(&output.stdout).trim_end(), @r###"
start_of_snippet
New-Thing -Group *** -Location ***
"###);
}

#[test]
fn test_snippet_rejects_zero_window() {
    let history = fixture(&["Get-Thing"]);
    let commands = fixture(&["Get-Thing"]);
    cli()
        .arg("snippet")
        .arg("--history")
        .arg(history.path())
        .arg("--commands")
        .arg(commands.path())
        .args(["--window", "0"])
        .assert()
        .code(2);
}

#[test]
fn test_normalize_prints_canonical_line() {
    let output = cli()
        .args(["normalize", "Set-Thing -Mode fast -Id 7 -Debug"])
        .assert()
        .success()
        .get_output()
        .clone();

    assert_snapshot!(String::from_utf8_lossy(&output.stdout).trim_end(), @"Set-Thing -Id *** -Mode ***");
}

#[test]
fn test_config_file_changes_marker() {
    let mut config = NamedTempFile::new().expect("create config");
    write!(config, r#"{{"redaction_marker": "<redacted>"}}"#).expect("write config");

    cli()
        .arg("--config")
        .arg(config.path())
        .args(["normalize", "Get-Thing -Name foo"])
        .assert()
        .success()
        .stdout("Get-Thing -Name <redacted>\n");
}

#[test]
fn test_invalid_config_fails() {
    let mut config = NamedTempFile::new().expect("create config");
    write!(config, r#"{{"history_window": 0}}"#).expect("write config");

    let output = cli()
        .arg("--config")
        .arg(config.path())
        .args(["normalize", "Get-Thing"])
        .assert()
        .code(2)
        .get_output()
        .clone();

    let stderr = String::from_utf8_lossy(&output.stderr);
    let logged: Value = stderr
        .lines()
        .find_map(|line| serde_json::from_str(line).ok())
        .expect("error log line");
    assert_eq!(logged["level"], "error");
    assert_eq!(logged["component"], "CLI");
    assert_eq!(logged["event"], "command_failed");
    assert_eq!(logged["data"]["exit_code"], 2);
    assert!(logged["message"].as_str().unwrap_or("").contains("history_window"));
}

//! Integration tests for the `qosman` CLI binary.
//!
//! Argument parsing, help output, completions and the offline catalog
//! commands run without an agent; the agent-facing ones use a wiremock
//! stand-in.
#![allow(clippy::unwrap_used)]

use std::io::Write;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `qosman` binary with env isolation.
///
/// Clears every `QOSMAN_*` override and points `--config` nowhere unless a
/// test passes its own, so the host's /etc/qosman never leaks in.
fn qosman_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("qosman");
    cmd.env_remove("QOSMAN_AGENT__URL")
        .env_remove("QOSMAN_AGENT__TIMEOUT_SECS")
        .env_remove("QOSMAN_AGENT__API_TOKEN")
        .env_remove("QOSMAN_AGENT__CA_CERT")
        .env_remove("QOSMAN_FLOWS__PROTOCOL")
        .env_remove("QOSMAN_FLOWS__PRIORITY")
        .env_remove("RUST_LOG")
        .env("NO_COLOR", "1");
    cmd
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

fn temp_file(suffix: &str, contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

fn records_fixture() -> tempfile::NamedTempFile {
    let records = json!([
        {
            "id": "vnfr-1",
            "name": "web",
            "vdu": [{
                "hostname": "web",
                "vnfc": [{ "connection_point": [{ "virtual_link_reference": "vl-data" }] }]
            }],
            "virtual_link": [
                { "name": "vl-data", "qos": ["minimum_bandwith:HIGH"] },
                { "name": "vl-mgmt", "qos": [] }
            ]
        },
        {
            "id": "vnfr-2",
            "name": "db",
            "vdu": [{
                "hostname": "db",
                "vnfc": [{ "connection_point": [{ "virtual_link_reference": "vl-data" }] }]
            }],
            "virtual_link": [
                { "name": "vl-data", "qos": ["minimum_bandwith:LOW"] }
            ]
        }
    ]);
    temp_file(".json", &records.to_string())
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = qosman_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    qosman_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("QoS")
            .and(predicate::str::contains("allocate"))
            .and(predicate::str::contains("release"))
            .and(predicate::str::contains("classify")),
    );
}

#[test]
fn test_version_flag() {
    qosman_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("qosman"));
}

#[test]
fn test_completions_zsh() {
    qosman_cmd()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

// ── Catalog ─────────────────────────────────────────────────────────

#[test]
fn test_classify_known_tag() {
    qosman_cmd()
        .args(["classify", "HIGH", "-o", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"quality\": \"HIGH\""));
}

#[test]
fn test_classify_unknown_tag_is_input_error() {
    let output = qosman_cmd().args(["classify", "GOLD"]).output().unwrap();
    assert_eq!(output.status.code(), Some(3));
    let text = combined_output(&output);
    assert!(text.contains("GOLD"), "Expected the tag in the error:\n{text}");
}

#[test]
fn test_qualities_plain_lists_every_tier() {
    qosman_cmd()
        .args(["qualities", "-o", "plain"])
        .assert()
        .success()
        .stdout(predicate::eq("LOW\nMEDIUM\nHIGH\n"));
}

#[test]
fn test_links_from_records() {
    let records = records_fixture();
    qosman_cmd()
        .args(["links", "-o", "plain", "-r"])
        .arg(records.path())
        .assert()
        .success()
        .stdout(predicate::eq("vnfr-1/vl-data\nvnfr-2/vl-data\n"));
}

#[test]
fn test_targets_unique() {
    let records = records_fixture();
    qosman_cmd()
        .args(["targets", "-u", "-o", "plain", "-r"])
        .arg(records.path())
        .assert()
        .success()
        .stdout(predicate::eq("web\ndb\n"));
}

#[test]
fn test_malformed_annotation_is_input_error() {
    let records = temp_file(
        ".json",
        r#"[{ "id": "r1", "virtual_link": [{ "name": "vl", "qos": ["minimum_bandwith"] }] }]"#,
    );
    let output = qosman_cmd()
        .args(["links", "-r"])
        .arg(records.path())
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(3));
}

#[test]
fn test_unparsable_records_name_the_file() {
    let records = temp_file(".json", "[{");
    let output = qosman_cmd()
        .args(["targets", "-r"])
        .arg(records.path())
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(3));
    assert!(combined_output(&output).contains("Invalid JSON"));
}

// ── Error cases ─────────────────────────────────────────────────────

#[test]
fn test_release_requires_a_target() {
    let output = qosman_cmd().arg("release").output().unwrap();
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_missing_explicit_config_is_usage_error() {
    let output = qosman_cmd()
        .args(["config", "show", "--config", "/nonexistent/qosman.toml"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("--config"));
}

#[test]
fn test_config_show_masks_token() {
    let config = temp_file(
        ".toml",
        "[agent]\nurl = \"http://agent.example:8091\"\napi_token = \"s3cret\"\n",
    );
    qosman_cmd()
        .args(["config", "show", "--config"])
        .arg(config.path())
        .assert()
        .success()
        .stdout(
            predicate::str::contains("agent.example")
                .and(predicate::str::contains("****"))
                .and(predicate::str::contains("s3cret").not()),
        );
}

#[test]
fn test_bad_agent_url_is_config_error() {
    let output = qosman_cmd()
        .args(["hosts", "--agent", "not a url"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(9));
}

// ── Against a stand-in agent ────────────────────────────────────────

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_hosts_against_agent() {
    let agent = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/hosts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "hypervisors": { "hv-A": ["web-1"], "hv-B": ["db-1"] }
        })))
        .mount(&agent)
        .await;

    let uri = agent.uri();
    let output = tokio::task::spawn_blocking(move || {
        qosman_cmd()
            .args(["hosts", "-o", "plain", "--agent", &uri])
            .output()
            .unwrap()
    })
    .await
    .unwrap();

    assert!(output.status.success(), "{}", combined_output(&output));
    assert_eq!(String::from_utf8_lossy(&output.stdout), "db-1\nweb-1\n");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_hosts_agent_error_exits_with_agent_code() {
    let agent = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/hosts"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&agent)
        .await;

    let uri = agent.uri();
    let output = tokio::task::spawn_blocking(move || {
        qosman_cmd().args(["hosts", "--agent", &uri]).output().unwrap()
    })
    .await
    .unwrap();

    assert_eq!(output.status.code(), Some(8), "{}", combined_output(&output));
}

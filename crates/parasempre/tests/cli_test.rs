//! Integration tests for the `parasempre` CLI binary.
//!
//! These tests cover argument parsing, help output, shell completions,
//! identity persistence, and exit-code mapping — plus a few end-to-end
//! runs against a mock guest service.
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `parasempre` binary with env isolation.
///
/// Clears all `PARASEMPRE_*` env vars and points config directories at a
/// nonexistent path so tests never touch the user's real settings or
/// identity token.
fn parasempre_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("parasempre");
    cmd.env("HOME", "/tmp/parasempre-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/parasempre-cli-test-nonexistent")
        .env_remove("PARASEMPRE_API_BASE")
        .env_remove("PARASEMPRE_TIMEOUT_SECS")
        .env_remove("PARASEMPRE_OUTPUT");
    cmd
}

/// Same isolation, but with config directories rooted at `dir` so the
/// identity token persists across invocations.
fn parasempre_cmd_in(dir: &std::path::Path) -> assert_cmd::Command {
    let mut cmd = parasempre_cmd();
    cmd.env("HOME", dir).env("XDG_CONFIG_HOME", dir);
    cmd
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

/// Run the command on the blocking pool so the mock server keeps serving.
async fn run_blocking(mut cmd: assert_cmd::Command) -> std::process::Output {
    tokio::task::spawn_blocking(move || cmd.output().unwrap())
        .await
        .unwrap()
}

/// A guest row as the service would return it.
fn guest_json(id: i64, first: &str, last: &str, relationship: &str, confirmed: bool) -> serde_json::Value {
    json!({
        "id": id,
        "first_name": first,
        "last_name": last,
        "phone": "11999990001",
        "relationship": relationship,
        "confirmed": confirmed,
        "family_group": id,
        "created_by": "AB123",
        "updated_by": "AB123",
        "created_at": "2025-05-10T12:00:00Z",
        "updated_at": "2025-05-10T12:00:00Z",
    })
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = parasempre_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(
        text.contains("Usage"),
        "Expected 'Usage' in output:\n{text}"
    );
}

#[test]
fn test_help_flag() {
    parasempre_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("Para Sempre")
            .and(predicate::str::contains("guests"))
            .and(predicate::str::contains("identity"))
            .and(predicate::str::contains("whoami")),
    );
}

#[test]
fn test_version_flag() {
    parasempre_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("parasempre"));
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    parasempre_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_completions_zsh() {
    parasempre_cmd()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

// ── Identity persistence ────────────────────────────────────────────

#[test]
fn test_identity_round_trip() {
    let dir = tempfile::tempdir().unwrap();

    // Tokens are normalized to uppercase on the way in.
    parasempre_cmd_in(dir.path())
        .args(["identity", "set", "ab123"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Identificação registrada: AB123"));

    parasempre_cmd_in(dir.path())
        .args(["identity", "show"])
        .assert()
        .success()
        .stdout("AB123\n");

    parasempre_cmd_in(dir.path())
        .args(["identity", "clear"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Identificação removida."));

    let output = parasempre_cmd_in(dir.path())
        .args(["identity", "show"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(3), "Expected auth exit code");
}

#[test]
fn test_identity_set_rejects_malformed_token() {
    let dir = tempfile::tempdir().unwrap();
    let output = parasempre_cmd_in(dir.path())
        .args(["identity", "set", "toolong"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected usage exit code");
    assert!(
        combined_output(&output).contains("RACF"),
        "Expected RACF validation message"
    );
}

#[test]
fn test_identity_show_unset_exits_with_auth_code() {
    let output = parasempre_cmd().args(["identity", "show"]).output().unwrap();
    assert_eq!(output.status.code(), Some(3), "Expected auth exit code");
    assert!(combined_output(&output).contains("RACF"));
}

// ── Error cases ─────────────────────────────────────────────────────

#[test]
fn test_invalid_subcommand() {
    let output = parasempre_cmd().arg("foobar").output().unwrap();
    assert!(
        !output.status.success(),
        "Expected failure for invalid subcommand"
    );
    let text = combined_output(&output);
    assert!(
        text.contains("invalid") || text.contains("unrecognized") || text.contains("foobar"),
        "Expected error mentioning invalid subcommand:\n{text}"
    );
}

#[test]
fn test_invalid_output_format() {
    let output = parasempre_cmd()
        .args(["--output", "invalid", "guests", "list"])
        .output()
        .unwrap();
    assert!(
        !output.status.success(),
        "Expected failure for invalid output format"
    );
    let text = combined_output(&output);
    assert!(
        text.contains("invalid")
            || text.contains("possible values")
            || text.contains("valid value"),
        "Expected error about valid output formats:\n{text}"
    );
}

#[test]
fn test_unreachable_service_maps_to_connection_exit() {
    let output = parasempre_cmd()
        .env("PARASEMPRE_API_BASE", "http://127.0.0.1:1")
        .args(["guests", "list"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(7), "Expected connection exit code");
}

#[test]
fn test_global_flags_parsing() {
    // All flags should parse correctly — the failure should come from the
    // unreachable service, not from argument parsing.
    let output = parasempre_cmd()
        .args([
            "--api-base",
            "http://127.0.0.1:1",
            "--output",
            "json",
            "--timeout",
            "5",
            "-v",
            "guests",
            "list",
        ])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(7), "Expected connection exit code");
}

// ── Subcommand help discovery ───────────────────────────────────────

#[test]
fn test_guests_subcommands_exist() {
    parasempre_cmd()
        .args(["guests", "--help"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("list")
                .and(predicate::str::contains("get"))
                .and(predicate::str::contains("create"))
                .and(predicate::str::contains("update"))
                .and(predicate::str::contains("confirm"))
                .and(predicate::str::contains("delete"))
                .and(predicate::str::contains("family"))
                .and(predicate::str::contains("import")),
        );
}

#[test]
fn test_identity_subcommands_exist() {
    parasempre_cmd()
        .args(["identity", "--help"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("set")
                .and(predicate::str::contains("show"))
                .and(predicate::str::contains("clear")),
        );
}

// ── End-to-end against a mock service ───────────────────────────────

#[tokio::test]
async fn test_guests_list_renders_mock_data() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/guests"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            guest_json(1, "Ana", "Souza", "R", true),
            guest_json(2, "Bruno", "Lima", "P", false),
        ])))
        .mount(&server)
        .await;

    let mut cmd = parasempre_cmd();
    cmd.env("PARASEMPRE_API_BASE", server.uri())
        .args(["guests", "list", "--output", "json"]);
    let output = run_blocking(cmd).await;

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Ana"));
    assert!(stdout.contains("Bruno"));
}

#[tokio::test]
async fn test_guests_list_search_filters_rows() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/guests"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            guest_json(1, "Ana", "Souza", "R", true),
            guest_json(2, "Bruno", "Lima", "P", false),
        ])))
        .mount(&server)
        .await;

    let mut cmd = parasempre_cmd();
    cmd.env("PARASEMPRE_API_BASE", server.uri())
        .args(["guests", "list", "--search", "bru", "--output", "json"]);
    let output = run_blocking(cmd).await;

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Bruno"));
    assert!(!stdout.contains("Ana"));
}

#[tokio::test]
async fn test_guests_get_unknown_id_maps_to_not_found_exit() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/guests/999"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({"error": "Convidado não encontrado"})),
        )
        .mount(&server)
        .await;

    let mut cmd = parasempre_cmd();
    cmd.env("PARASEMPRE_API_BASE", server.uri())
        .args(["guests", "get", "999"]);
    let output = run_blocking(cmd).await;

    assert_eq!(output.status.code(), Some(4), "Expected not-found exit code");
    assert!(combined_output(&output).contains("não encontrado"));
}

#[tokio::test]
async fn test_whoami_resolves_the_role() {
    let dir = tempfile::tempdir().unwrap();

    let mut set = parasempre_cmd_in(dir.path());
    set.args(["identity", "set", "ab123"]);
    let output = run_blocking(set).await;
    assert!(output.status.success());

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/users/me"))
        .and(header("user-racf", "AB123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"role": "groom"})))
        .mount(&server)
        .await;

    let mut cmd = parasempre_cmd_in(dir.path());
    cmd.env("PARASEMPRE_API_BASE", server.uri()).arg("whoami");
    let output = run_blocking(cmd).await;

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("AB123"));
    assert!(stdout.contains("Noivo"));
}

#[tokio::test]
async fn test_whoami_without_identity_exits_with_auth_code() {
    let server = MockServer::start().await;

    let mut cmd = parasempre_cmd();
    cmd.env("PARASEMPRE_API_BASE", server.uri()).arg("whoami");
    let output = run_blocking(cmd).await;

    assert_eq!(output.status.code(), Some(3), "Expected auth exit code");
}

#[tokio::test]
async fn test_import_renders_the_server_report() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("convidados.csv");
    std::fs::write(&file, "nome;sobrenome;telefone\nAna;Souza;11999990001\n").unwrap();

    let mut set = parasempre_cmd_in(dir.path());
    set.args(["identity", "set", "ab123"]);
    let output = run_blocking(set).await;
    assert!(output.status.success());

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/guests/import"))
        .and(header("user-racf", "AB123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "imported": 2,
            "total": 3,
            "errors": ["linha 2: telefone inválido"],
        })))
        .mount(&server)
        .await;

    let mut cmd = parasempre_cmd_in(dir.path());
    cmd.env("PARASEMPRE_API_BASE", server.uri());
    cmd.args(["guests", "import"]).arg(&file);
    let output = run_blocking(cmd).await;

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("2 importados, 3 no arquivo, 1 erros"));
    assert!(stdout.contains("linha 2: telefone inválido"));
}

#[tokio::test]
async fn test_import_rejects_unsupported_extension() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("convidados.pdf");
    std::fs::write(&file, "%PDF-1.4").unwrap();

    let mut cmd = parasempre_cmd_in(dir.path());
    cmd.args(["guests", "import"]).arg(&file);
    let output = run_blocking(cmd).await;

    assert_eq!(output.status.code(), Some(2), "Expected usage exit code");
    assert!(combined_output(&output).contains("não suportado"));
}

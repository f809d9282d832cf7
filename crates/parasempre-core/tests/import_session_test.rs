// End-to-end import session tests: file selection, upload, and the
// state the session settles in afterwards.

#![allow(clippy::unwrap_used)]

use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use parasempre_api::DirectoryClient;
use parasempre_core::{
    CoreError, GuestDirectory, IdentityContext, ImportSession, ImportState, MemoryIdentityStore,
};

async fn setup() -> (MockServer, GuestDirectory) {
    let server = MockServer::start().await;
    let client = DirectoryClient::from_reqwest(&server.uri(), reqwest::Client::new()).unwrap();
    let identity = IdentityContext::new(Box::new(MemoryIdentityStore::default())).unwrap();
    identity.set("AB123").unwrap();
    (server, GuestDirectory::new(client, identity))
}

#[tokio::test]
async fn upload_sends_the_file_and_records_the_report() {
    let (server, directory) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/guests/import"))
        .and(header("user-racf", "AB123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "imported": 2, "total": 2, "errors": [],
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("convidados.csv");
    std::fs::write(&file, "nome;sobrenome;telefone\nAna;Silva;11999990001\n").unwrap();

    let mut session = ImportSession::new();
    session.select_file(&file).unwrap();
    let report = session.upload(&directory).await.unwrap();

    assert_eq!(report.imported, 2);
    assert_eq!(session.state(), &ImportState::Completed { report });
}

#[tokio::test]
async fn upload_failure_still_completes_with_a_synthesized_report() {
    let (server, directory) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/guests/import"))
        .respond_with(ResponseTemplate::new(503).set_body_string("service unavailable"))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("convidados.xlsx");
    std::fs::write(&file, b"PK\x03\x04").unwrap();

    let mut session = ImportSession::new();
    session.select_file(&file).unwrap();
    let report = session.upload(&directory).await.unwrap();

    assert_eq!(report.imported, 0);
    assert_eq!(report.errors, vec!["Erro 503".to_owned()]);
    assert!(matches!(session.state(), ImportState::Completed { .. }));
}

#[tokio::test]
async fn upload_without_identity_fails_locally() {
    let (server, directory) = setup().await;
    directory.identity().clear().unwrap();

    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("convidados.csv");
    std::fs::write(&file, "x").unwrap();

    let mut session = ImportSession::new();
    session.select_file(&file).unwrap();
    let err = session.upload(&directory).await.unwrap_err();

    assert_eq!(err, CoreError::IdentityRequired);
    assert!(matches!(session.state(), ImportState::Failed { .. }));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn unreadable_file_fails_before_any_request() {
    let (server, directory) = setup().await;

    let mut session = ImportSession::new();
    session.select_file("/definitely/not/here/convidados.csv").unwrap();
    let err = session.upload(&directory).await.unwrap_err();

    assert!(matches!(err, CoreError::Io { .. }));
    let ImportState::Failed { message } = session.state() else {
        panic!("expected a failed session");
    };
    assert!(message.starts_with("falha ao ler o arquivo"));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn session_can_run_again_after_reset() {
    let (server, directory) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/guests/import"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "imported": 1, "total": 1, "errors": [],
        })))
        .expect(2)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("convidados.csv");
    std::fs::write(&file, "Ana;Silva\n").unwrap();

    let mut session = ImportSession::new();
    session.select_file(&file).unwrap();
    session.upload(&directory).await.unwrap();

    session.reset().unwrap();
    assert_eq!(session.state(), &ImportState::Idle);

    session.select_file(&file).unwrap();
    session.upload(&directory).await.unwrap();
}

// ── Import session ──
//
// Drives one spreadsheet import at a time:
//
//   Idle → FileSelected → Uploading → Completed | Failed → Idle
//
// `Failed` covers local problems only (bad extension, unreadable file,
// missing identity). Once the upload is handed to the directory, even a
// transport failure lands in `Completed` with a synthesized report, so
// the outcome always reads the same way.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::directory::GuestDirectory;
use crate::error::CoreError;
use crate::model::ImportReport;

const ACCEPTED_EXTENSIONS: [&str; 2] = ["csv", "xlsx"];
const UNSUPPORTED_FORMAT: &str = "formato de arquivo não suportado: use .csv ou .xlsx";
const IMPORT_IN_PROGRESS: &str = "importação em andamento";
const NO_FILE_SELECTED: &str = "nenhum arquivo selecionado";

/// Phase of the current import attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportState {
    Idle,
    FileSelected { path: PathBuf },
    Uploading,
    Completed { report: ImportReport },
    Failed { message: String },
}

/// Single-import state machine. One session drives one upload at a
/// time; selecting a new file in any settled state replaces the
/// previous selection.
#[derive(Debug)]
pub struct ImportSession {
    state: ImportState,
}

impl Default for ImportSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ImportSession {
    pub fn new() -> Self {
        Self { state: ImportState::Idle }
    }

    pub fn state(&self) -> &ImportState {
        &self.state
    }

    /// Pick the file to upload. Only `.csv` and `.xlsx` are accepted
    /// (case-insensitive); anything else parks the session in `Failed`.
    pub fn select_file(&mut self, path: impl Into<PathBuf>) -> Result<(), CoreError> {
        if self.state == ImportState::Uploading {
            return Err(CoreError::validation(IMPORT_IN_PROGRESS));
        }

        let path = path.into();
        if !has_accepted_extension(&path) {
            self.state = ImportState::Failed { message: UNSUPPORTED_FORMAT.to_owned() };
            return Err(CoreError::validation(UNSUPPORTED_FORMAT));
        }

        debug!(path = %path.display(), "import file selected");
        self.state = ImportState::FileSelected { path };
        Ok(())
    }

    /// Read the selected file and upload it through the directory.
    ///
    /// Legal only from `FileSelected`. The returned report is also
    /// recorded in the session state.
    pub async fn upload(&mut self, directory: &GuestDirectory) -> Result<ImportReport, CoreError> {
        let path = match std::mem::replace(&mut self.state, ImportState::Uploading) {
            ImportState::FileSelected { path } => path,
            previous => {
                self.state = previous;
                return Err(CoreError::validation(NO_FILE_SELECTED));
            }
        };

        let Some(file_name) = path.file_name().and_then(|name| name.to_str()).map(str::to_owned)
        else {
            self.state = ImportState::Failed { message: UNSUPPORTED_FORMAT.to_owned() };
            return Err(CoreError::validation(UNSUPPORTED_FORMAT));
        };

        let contents = match std::fs::read(&path) {
            Ok(contents) => contents,
            Err(err) => {
                let message = format!("falha ao ler o arquivo: {err}");
                self.state = ImportState::Failed { message: message.clone() };
                return Err(CoreError::Io { message });
            }
        };

        match directory.import(&file_name, contents).await {
            Ok(report) => {
                self.state = ImportState::Completed { report: report.clone() };
                Ok(report)
            }
            Err(err) => {
                self.state = ImportState::Failed { message: err.to_string() };
                Err(err)
            }
        }
    }

    /// Return to `Idle`. Rejected while an upload is in flight.
    pub fn reset(&mut self) -> Result<(), CoreError> {
        if self.state == ImportState::Uploading {
            return Err(CoreError::validation(IMPORT_IN_PROGRESS));
        }
        self.state = ImportState::Idle;
        Ok(())
    }
}

fn has_accepted_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            let lower = ext.to_ascii_lowercase();
            ACCEPTED_EXTENSIONS.contains(&lower.as_str())
        })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn accepts_csv_and_xlsx_any_case() {
        let mut session = ImportSession::new();
        session.select_file("convidados.csv").unwrap();
        session.select_file("convidados.XLSX").unwrap();
        assert!(matches!(session.state(), ImportState::FileSelected { .. }));
    }

    #[test]
    fn rejects_other_extensions() {
        let mut session = ImportSession::new();
        let err = session.select_file("convidados.pdf").unwrap_err();
        assert_eq!(err.to_string(), "formato de arquivo não suportado: use .csv ou .xlsx");
        assert!(matches!(session.state(), ImportState::Failed { .. }));
    }

    #[test]
    fn rejects_files_without_extension() {
        let mut session = ImportSession::new();
        assert!(session.select_file("convidados").is_err());
    }

    #[test]
    fn selecting_again_replaces_the_previous_file() {
        let mut session = ImportSession::new();
        session.select_file("a.csv").unwrap();
        session.select_file("b.xlsx").unwrap();
        assert_eq!(
            session.state(),
            &ImportState::FileSelected { path: PathBuf::from("b.xlsx") }
        );
    }

    #[test]
    fn selection_is_rejected_mid_upload() {
        let mut session = ImportSession::new();
        session.state = ImportState::Uploading;
        let err = session.select_file("a.csv").unwrap_err();
        assert_eq!(err.to_string(), "importação em andamento");
        assert_eq!(session.state(), &ImportState::Uploading);
    }

    #[test]
    fn reset_is_rejected_mid_upload() {
        let mut session = ImportSession::new();
        session.state = ImportState::Uploading;
        assert!(session.reset().is_err());
    }

    #[test]
    fn reset_returns_to_idle() {
        let mut session = ImportSession::new();
        session.state = ImportState::Failed { message: "x".to_owned() };
        session.reset().unwrap();
        assert_eq!(session.state(), &ImportState::Idle);
    }

    #[tokio::test]
    async fn upload_without_selection_is_rejected() {
        use crate::identity::{IdentityContext, MemoryIdentityStore};
        use parasempre_api::{DirectoryClient, TransportConfig};

        let client =
            DirectoryClient::new("http://localhost:9", &TransportConfig::default()).unwrap();
        let identity = IdentityContext::new(Box::new(MemoryIdentityStore::default())).unwrap();
        let directory = GuestDirectory::new(client, identity);

        let mut session = ImportSession::new();
        let err = session.upload(&directory).await.unwrap_err();
        assert_eq!(err.to_string(), "nenhum arquivo selecionado");
        assert_eq!(session.state(), &ImportState::Idle);
    }
}

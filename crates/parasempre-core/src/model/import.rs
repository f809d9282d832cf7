// ── Import report ──

use serde::Serialize;

use crate::error::CoreError;

/// Outcome of one spreadsheet import, as the server reported it (or as
/// synthesized locally when the upload itself failed).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    /// Rows committed to the directory.
    pub imported: u32,
    /// Rows found in the file.
    pub total: u32,
    /// Per-row failure messages, verbatim from the server.
    pub errors: Vec<String>,
}

impl ImportReport {
    /// The upload reached the server but some rows were rejected.
    pub fn is_partial(&self) -> bool {
        self.imported > 0 && !self.errors.is_empty()
    }

    /// Nothing committed at all.
    pub fn is_failure(&self) -> bool {
        self.imported == 0
    }

    /// Stand-in report for an upload that never produced a server-side
    /// result: zero counts, the failure message as the only error line.
    pub(crate) fn from_transport_failure(err: &CoreError) -> Self {
        Self { imported: 0, total: 0, errors: vec![err.to_string()] }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_means_some_rows_committed_and_some_failed() {
        let report = ImportReport {
            imported: 8,
            total: 10,
            errors: vec!["linha 3: telefone inválido".to_owned()],
        };
        assert!(report.is_partial());
        assert!(!report.is_failure());
    }

    #[test]
    fn transport_failure_synthesizes_zero_counts() {
        let err = CoreError::Transport { message: "Erro 502".to_owned(), status: Some(502) };
        let report = ImportReport::from_transport_failure(&err);
        assert_eq!(report.imported, 0);
        assert_eq!(report.total, 0);
        assert_eq!(report.errors, vec!["Erro 502".to_owned()]);
    }
}

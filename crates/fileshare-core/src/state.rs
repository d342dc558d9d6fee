//! View state for the two panels.
//!
//! Each panel owns one of these behind a signal. Outcomes replace the
//! state wholesale, so rerunning a flow never accumulates records.

use crate::shared_files::{InitReport, LoadOutcome};
use crate::types::{Account, FileRecord};
use crate::upload::UploadReceipt;

/// Informational text shown when no files are listed.
pub const NO_SHARED_FILES_MESSAGE: &str = "No shared files available.";

/// Shared-files panel status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelStatus {
    Loading,
    Ready(Vec<FileRecord>),
    Empty,
    Failed(String),
}

/// How a banner should be styled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerTone {
    Info,
    Error,
}

/// Inline message rendered above the list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    pub text: String,
    pub tone: BannerTone,
}

/// State of the shared-files panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharedFilesState {
    pub account: Option<Account>,
    pub status: PanelStatus,
}

impl Default for SharedFilesState {
    fn default() -> Self {
        Self::new()
    }
}

impl SharedFilesState {
    pub fn new() -> Self {
        Self {
            account: None,
            status: PanelStatus::Loading,
        }
    }

    /// Replaces the state with the result of one initialization run.
    ///
    /// Cancelled runs are ignored; nobody is left to see them.
    pub fn apply(&mut self, report: InitReport) {
        if report.outcome.is_cancelled() {
            return;
        }
        self.account = report.account;
        self.status = match report.outcome {
            LoadOutcome::Loaded(records) => PanelStatus::Ready(records),
            LoadOutcome::Empty => PanelStatus::Empty,
            LoadOutcome::Failed(e) => PanelStatus::Failed(e.to_string()),
        };
    }

    pub fn is_loading(&self) -> bool {
        self.status == PanelStatus::Loading
    }

    /// Records to list; empty unless the panel is ready.
    pub fn records(&self) -> &[FileRecord] {
        match &self.status {
            PanelStatus::Ready(records) => records,
            _ => &[],
        }
    }

    /// Placeholder for the list card once a run has settled with nothing to show.
    ///
    /// An empty listing already says so in the banner.
    pub fn list_placeholder(&self) -> Option<&'static str> {
        if matches!(self.status, PanelStatus::Loading | PanelStatus::Empty)
            || !self.records().is_empty()
        {
            return None;
        }
        Some(NO_SHARED_FILES_MESSAGE)
    }

    /// Banner text, collapsing empty and failed runs into one message slot.
    pub fn banner(&self) -> Option<Banner> {
        match &self.status {
            PanelStatus::Loading | PanelStatus::Ready(_) => None,
            PanelStatus::Empty => Some(Banner {
                text: NO_SHARED_FILES_MESSAGE.to_string(),
                tone: BannerTone::Info,
            }),
            PanelStatus::Failed(text) => Some(Banner {
                text: text.clone(),
                tone: BannerTone::Error,
            }),
        }
    }
}

/// A file picked for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickedFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl PickedFile {
    pub fn size_display(&self) -> String {
        let size = self.bytes.len();
        if size < 1024 {
            format!("{} B", size)
        } else if size < 1024 * 1024 {
            format!("{:.1} KB", size as f64 / 1024.0)
        } else {
            format!("{:.1} MB", size as f64 / (1024.0 * 1024.0))
        }
    }
}

/// Upload panel status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadStatus {
    Idle,
    Uploading,
    Done(UploadReceipt),
    Failed(String),
}

/// State of the upload panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadState {
    pub picked: Option<PickedFile>,
    pub status: UploadStatus,
}

impl Default for UploadState {
    fn default() -> Self {
        Self {
            picked: None,
            status: UploadStatus::Idle,
        }
    }
}

impl UploadState {
    /// Selecting a file clears any previous result.
    pub fn pick(&mut self, file: PickedFile) {
        self.picked = Some(file);
        self.status = UploadStatus::Idle;
    }

    pub fn can_submit(&self) -> bool {
        self.picked.is_some() && self.status != UploadStatus::Uploading
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SharedFilesError;
    use crate::types::FileId;

    fn record(id: u64) -> FileRecord {
        FileRecord {
            file_id: FileId::from(id),
            file_name: format!("file-{id}"),
            content_hash: format!("Qm{id}"),
        }
    }

    #[test]
    fn test_new_state_is_loading() {
        let state = SharedFilesState::new();
        assert!(state.is_loading());
        assert!(state.records().is_empty());
        assert_eq!(state.banner(), None);
    }

    #[test]
    fn test_apply_replaces_records() {
        let mut state = SharedFilesState::new();
        let report = InitReport {
            account: Some(Account::new("0xme")),
            outcome: LoadOutcome::Loaded(vec![record(1), record(2)]),
        };
        state.apply(report.clone());
        state.apply(report);
        assert_eq!(state.records().len(), 2);
    }

    #[test]
    fn test_failure_clears_previous_list() {
        let mut state = SharedFilesState::new();
        state.apply(InitReport {
            account: Some(Account::new("0xme")),
            outcome: LoadOutcome::Loaded(vec![record(1)]),
        });
        state.apply(InitReport {
            account: Some(Account::new("0xme")),
            outcome: LoadOutcome::Failed(SharedFilesError::ListingFailed),
        });

        assert!(state.records().is_empty());
        let banner = state.banner().unwrap();
        assert_eq!(banner.tone, BannerTone::Error);
        assert_eq!(banner.text, "Error loading shared files. Please try again.");
    }

    #[test]
    fn test_empty_is_informational() {
        let mut state = SharedFilesState::new();
        state.apply(InitReport {
            account: Some(Account::new("0xme")),
            outcome: LoadOutcome::Empty,
        });
        assert_eq!(
            state.banner(),
            Some(Banner {
                text: NO_SHARED_FILES_MESSAGE.to_string(),
                tone: BannerTone::Info,
            })
        );
    }

    #[test]
    fn test_cancelled_report_is_ignored() {
        let mut state = SharedFilesState::new();
        state.apply(InitReport {
            account: None,
            outcome: LoadOutcome::Failed(SharedFilesError::Cancelled),
        });
        assert!(state.is_loading());
    }

    #[test]
    fn test_list_placeholder_after_settled_runs() {
        let mut state = SharedFilesState::new();
        assert_eq!(state.list_placeholder(), None);

        state.apply(InitReport {
            account: Some(Account::new("0xme")),
            outcome: LoadOutcome::Empty,
        });
        assert_eq!(state.list_placeholder(), None);

        state.apply(InitReport {
            account: Some(Account::new("0xme")),
            outcome: LoadOutcome::Loaded(vec![]),
        });
        assert_eq!(state.list_placeholder(), Some(NO_SHARED_FILES_MESSAGE));
        assert_eq!(state.banner(), None);

        state.apply(InitReport {
            account: None,
            outcome: LoadOutcome::Failed(SharedFilesError::ListingFailed),
        });
        assert_eq!(state.list_placeholder(), Some(NO_SHARED_FILES_MESSAGE));

        state.apply(InitReport {
            account: Some(Account::new("0xme")),
            outcome: LoadOutcome::Loaded(vec![record(1)]),
        });
        assert_eq!(state.list_placeholder(), None);
    }

    #[test]
    fn test_upload_state_pick_resets_status() {
        let mut state = UploadState {
            picked: None,
            status: UploadStatus::Failed("boom".into()),
        };
        assert!(!state.can_submit());

        state.pick(PickedFile {
            name: "a.txt".into(),
            bytes: vec![1; 2048],
        });
        assert_eq!(state.status, UploadStatus::Idle);
        assert!(state.can_submit());
        assert_eq!(state.picked.as_ref().unwrap().size_display(), "2.0 KB");

        state.status = UploadStatus::Uploading;
        assert!(!state.can_submit());
    }
}

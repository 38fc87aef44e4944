use crate::polling::PollMode;
use crate::report::ReportId;
use crate::state::Notice;
use crate::status::{DisplayStatus, StatusStyle};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    /// No successful refresh yet.
    pub loading: bool,
    pub reports: Vec<ReportRowView>,
    /// A create call is in flight; the create trigger is disabled.
    pub create_pending: bool,
    pub polling: PollMode,
    pub notice: Option<Notice>,
    pub cache_version: u64,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRowView {
    pub id: ReportId,
    pub title: String,
    pub status: DisplayStatus,
    pub style: StatusStyle,
    pub retry_count: u32,
    pub result_url: Option<String>,
    pub created_at: String,
    pub completed_at: Option<String>,
    /// Delete call in flight for this row; its delete button is disabled.
    pub deleting: bool,
}

impl AppViewModel {
    pub fn row(&self, id: ReportId) -> Option<&ReportRowView> {
        self.reports.iter().find(|row| row.id == id)
    }

    pub fn ids(&self) -> Vec<ReportId> {
        self.reports.iter().map(|row| row.id).collect()
    }
}

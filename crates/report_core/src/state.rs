use std::collections::BTreeSet;

use crate::cache::CacheStore;
use crate::mutation::MutationCoordinator;
use crate::polling::PollingController;
use crate::report::ReportId;
use crate::status::derive_display_status;
use crate::view_model::{AppViewModel, ReportRowView};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// One-line message for the user, shown until dismissed or replaced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

#[derive(Debug, Default)]
pub struct AppState {
    pub(crate) cache: CacheStore,
    pub(crate) polling: PollingController,
    pub(crate) mutations: MutationCoordinator,
    /// Deletes waiting for the user's answer.
    pub(crate) confirming: BTreeSet<ReportId>,
    pub(crate) notice: Option<Notice>,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cache(&self) -> &CacheStore {
        &self.cache
    }

    pub fn polling(&self) -> &PollingController {
        &self.polling
    }

    pub fn mutations(&self) -> &MutationCoordinator {
        &self.mutations
    }

    pub fn is_confirming(&self, id: ReportId) -> bool {
        self.confirming.contains(&id)
    }

    pub fn view(&self) -> AppViewModel {
        let cached = self.cache.read();
        let reports = cached
            .as_deref()
            .map(|collection| {
                collection
                    .iter()
                    .map(|report| {
                        let status = derive_display_status(report);
                        ReportRowView {
                            id: report.id,
                            title: report.title.clone(),
                            status,
                            style: status.style(),
                            retry_count: report.retry_count,
                            result_url: report.result_url.clone(),
                            created_at: report.created_at.clone(),
                            completed_at: report.completed_at.clone(),
                            deleting: self.mutations.is_deleting(report.id),
                        }
                    })
                    .collect()
            })
            .unwrap_or_default();

        AppViewModel {
            loading: cached.is_none(),
            reports,
            create_pending: self.mutations.create_pending(),
            polling: self.polling.mode(),
            notice: self.notice.clone(),
            cache_version: self.cache.version(),
            dirty: self.dirty,
        }
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Returns whether a render is due and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }
}

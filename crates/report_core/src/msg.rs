use std::fmt;

use crate::mutation::MutationId;
use crate::polling::RefreshId;
use crate::report::{Report, ReportId};

/// Transport-agnostic description of a failed remote call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteFailure {
    pub message: String,
}

impl RemoteFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for RemoteFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// The poll interval elapsed.
    PollTick,
    /// A refresh request finished.
    ReportsFetched {
        request: RefreshId,
        result: Result<Vec<Report>, RemoteFailure>,
    },
    /// User asked for a new report.
    CreateClicked { title: String },
    /// The create call finished.
    ReportCreated {
        mutation: MutationId,
        result: Result<Report, RemoteFailure>,
    },
    /// User clicked the delete button of a row.
    DeleteClicked { id: ReportId },
    /// User confirmed the delete prompt.
    DeleteConfirmed { id: ReportId },
    /// User declined the delete prompt.
    DeleteCancelled { id: ReportId },
    /// The delete call finished.
    ReportDeleted {
        mutation: MutationId,
        result: Result<(), RemoteFailure>,
    },
    /// User dismissed the current notice.
    NoticeDismissed,
    /// Fallback for placeholder wiring.
    NoOp,
}

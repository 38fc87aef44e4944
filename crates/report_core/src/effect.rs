use crate::mutation::MutationId;
use crate::polling::RefreshId;
use crate::report::ReportId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    FetchReports { request: RefreshId },
    CreateReport { mutation: MutationId, title: String },
    DeleteReport { mutation: MutationId, id: ReportId },
    /// Ask the user before deleting; answered with `Msg::DeleteConfirmed` or `Msg::DeleteCancelled`.
    ConfirmDelete { id: ReportId },
}

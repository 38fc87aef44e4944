//! Report sync core: pure state machine for the cached report list.
//!
//! Remote calls never happen here. [`update`] turns messages into state
//! changes plus [`Effect`]s for the host to execute, and the host feeds the
//! results back as further [`Msg`]s.
mod cache;
mod effect;
mod msg;
mod mutation;
mod polling;
mod report;
mod state;
mod status;
mod update;
mod view_model;

pub use cache::{CacheSnapshot, CacheStore, CollectionError, Removal, ReportCollection};
pub use effect::Effect;
pub use msg::{Msg, RemoteFailure};
pub use mutation::{
    Applied, Begun, MutationCoordinator, MutationId, MutationKind, MutationLease, MutationPhase,
    Rejected, Settled, Settlement,
};
pub use polling::{PollMode, PollingController, RefreshId, DEFAULT_POLL_INTERVAL};
pub use report::{RawStatus, Report, ReportId};
pub use state::{AppState, Notice, NoticeLevel};
pub use status::{derive_display_status, DisplayStatus, StatusStyle, NEUTRAL_STYLE};
pub use update::update;
pub use view_model::{AppViewModel, ReportRowView};

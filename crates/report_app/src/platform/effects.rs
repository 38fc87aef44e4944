use std::sync::{mpsc, Arc};

use report_core::{Effect, Msg, MutationId, RawStatus, RefreshId, RemoteFailure, Report};
use report_engine::{
    ClientSettings, EngineError, EngineEvent, EngineHandle, EventSink, ReportRecord,
};
use report_logging::{report_info, report_warn};

use super::input::{Confirmations, Inbox};

pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(
        settings: ClientSettings,
        inbox_tx: mpsc::Sender<Inbox>,
    ) -> Result<Self, EngineError> {
        let engine = EngineHandle::new(settings, Arc::new(InboxSink { tx: inbox_tx }))?;
        Ok(Self { engine })
    }

    /// Remote calls go to the engine; delete prompts open on `confirmations`.
    pub fn enqueue(&self, effects: Vec<Effect>, confirmations: &mut Confirmations) {
        for effect in effects {
            match effect {
                Effect::FetchReports { request } => {
                    self.engine.list(request.get());
                }
                Effect::CreateReport { mutation, title } => {
                    report_info!("CreateReport {} title={:?}", mutation, title);
                    self.engine.create(mutation.get(), title);
                }
                Effect::DeleteReport { mutation, id } => {
                    report_info!("DeleteReport {} id={}", mutation, id);
                    self.engine.delete(mutation.get(), id);
                }
                Effect::ConfirmDelete { id } => {
                    confirmations.ask(id);
                }
            }
        }
    }
}

/// Turns engine events into core messages on the main loop's inbox.
struct InboxSink {
    tx: mpsc::Sender<Inbox>,
}

impl EventSink for InboxSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(Inbox::Msg(map_event(event)));
    }
}

fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::Listed { request, result } => Msg::ReportsFetched {
            request: RefreshId::new(request),
            result: result
                .map(|records| records.into_iter().map(map_record).collect())
                .map_err(|err| RemoteFailure::new(err.to_string())),
        },
        EngineEvent::Created { mutation, result } => Msg::ReportCreated {
            mutation: MutationId::new(mutation),
            result: result.map(map_record).map_err(|err| {
                report_warn!("create for mutation#{} failed: {}", mutation, err);
                RemoteFailure::new(err.to_string())
            }),
        },
        EngineEvent::Deleted { mutation, result } => Msg::ReportDeleted {
            mutation: MutationId::new(mutation),
            result: result.map_err(|err| {
                report_warn!("delete for mutation#{} failed: {}", mutation, err);
                RemoteFailure::new(err.to_string())
            }),
        },
    }
}

fn map_record(record: ReportRecord) -> Report {
    Report {
        id: record.id,
        title: record.title,
        status: RawStatus::parse(&record.status),
        retry_count: record.retry_count,
        result_url: record.result_url,
        created_at: record.created_at,
        completed_at: record.completed_at,
    }
}

use report_logging::{report_debug, report_error, report_info, report_warn};

use crate::cache::ReportCollection;
use crate::mutation::{MutationId, MutationKind, Rejected, Settled, Settlement};
use crate::{AppState, Effect, Msg, Notice, RemoteFailure};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::PollTick => match state.polling.on_tick() {
            Some(request) => {
                report_debug!("{request} issued by tick");
                vec![Effect::FetchReports { request }]
            }
            None => Vec::new(),
        },
        Msg::ReportsFetched { request, result } => {
            if !state.polling.accept(request) {
                report_debug!("{request} dropped: cancelled or superseded");
                return (state, Vec::new());
            }
            match result.map(ReportCollection::new) {
                Ok(Ok(collection)) => {
                    let changed = state.cache.read().as_deref() != Some(&collection);
                    state.cache.replace(collection);
                    if changed {
                        state.mark_dirty();
                    }
                }
                Ok(Err(violation)) => {
                    report_error!("{request} rejected, keeping cached reports: {violation}");
                }
                Err(failure) => {
                    report_warn!("{request} failed, retrying next tick: {failure}");
                }
            }
            Vec::new()
        }
        Msg::CreateClicked { title } => {
            let title = title.trim();
            if title.is_empty() {
                return (state, Vec::new());
            }
            let kind = MutationKind::Create {
                title: title.to_string(),
            };
            match start_mutation(&mut state, kind) {
                Some(mutation) => vec![Effect::CreateReport {
                    mutation,
                    title: title.to_string(),
                }],
                None => Vec::new(),
            }
        }
        Msg::ReportCreated { mutation, result } => {
            let notice = match &result {
                Ok(report) => Notice::info(format!("Report #{} queued", report.id)),
                Err(failure) => Notice::error(format!("Could not create report: {failure}")),
            };
            settle_mutation(&mut state, mutation, result.map(|_| ()), Some(notice))
        }
        Msg::DeleteClicked { id } => {
            let present = state
                .cache
                .read()
                .is_some_and(|collection| collection.contains(id));
            if !present || state.mutations.is_deleting(id) || !state.confirming.insert(id) {
                return (state, Vec::new());
            }
            vec![Effect::ConfirmDelete { id }]
        }
        Msg::DeleteConfirmed { id } => {
            if !state.confirming.remove(&id) {
                return (state, Vec::new());
            }
            match start_mutation(&mut state, MutationKind::Delete { id }) {
                Some(mutation) => vec![Effect::DeleteReport { mutation, id }],
                None => Vec::new(),
            }
        }
        Msg::DeleteCancelled { id } => {
            state.confirming.remove(&id);
            Vec::new()
        }
        Msg::ReportDeleted { mutation, result } => {
            let notice = result
                .as_ref()
                .err()
                .map(|failure| Notice::error(format!("Could not delete report: {failure}")));
            settle_mutation(&mut state, mutation, result, notice)
        }
        Msg::NoticeDismissed => {
            if state.notice.take().is_some() {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn start_mutation(state: &mut AppState, kind: MutationKind) -> Option<MutationId> {
    match state
        .mutations
        .start(kind, &mut state.polling, &mut state.cache)
    {
        Ok(mutation) => {
            state.mark_dirty();
            Some(mutation)
        }
        Err(Rejected::AlreadyDeleting(id)) => {
            report_debug!("delete #{id} ignored: already in flight");
            None
        }
        Err(Rejected::CreatePending) => {
            report_debug!("create ignored: another create is in flight");
            None
        }
    }
}

fn settle_mutation(
    state: &mut AppState,
    mutation: MutationId,
    result: Result<(), RemoteFailure>,
    notice: Option<Notice>,
) -> Vec<Effect> {
    let settlement = match &result {
        Ok(()) => Settlement::Commit,
        Err(_) => Settlement::Rollback,
    };
    let settled = state.mutations.settle(
        mutation,
        settlement,
        &mut state.cache,
        &mut state.polling,
    );
    let Some(Settled { kind, refresh, .. }) = settled else {
        report_debug!("{mutation} dropped: not in flight");
        return Vec::new();
    };
    if let Err(failure) = &result {
        report_warn!("{kind} failed and was rolled back: {failure}");
    }
    if notice.is_some() {
        state.notice = notice;
    }
    state.mark_dirty();
    match refresh {
        Some(request) => {
            report_info!("{kind} settled; {request} issued");
            vec![Effect::FetchReports { request }]
        }
        None => Vec::new(),
    }
}

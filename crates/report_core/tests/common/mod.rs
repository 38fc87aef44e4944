#![allow(dead_code)]
use std::sync::Once;

use report_core::{update, AppState, Effect, Msg, MutationId, RawStatus, RefreshId, Report};

pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(report_logging::initialize_for_tests);
}

pub fn report(id: u64, status: RawStatus) -> Report {
    Report::new(id, format!("Report {id}")).with_status(status)
}

/// Ticks once and answers the resulting refresh with `reports`.
pub fn loaded(reports: Vec<Report>) -> AppState {
    let (state, effects) = update(AppState::new(), Msg::PollTick);
    let request = single_fetch(&effects);
    let (mut state, effects) = update(
        state,
        Msg::ReportsFetched {
            request,
            result: Ok(reports),
        },
    );
    assert!(effects.is_empty());
    state.consume_dirty();
    state
}

pub fn single_fetch(effects: &[Effect]) -> RefreshId {
    match effects {
        [Effect::FetchReports { request }] => *request,
        other => panic!("expected a single fetch, got {other:?}"),
    }
}

/// Clicks delete, confirms, and returns the mutation the delete call carries.
pub fn confirmed_delete(state: AppState, id: u64) -> (AppState, MutationId) {
    let (state, effects) = update(state, Msg::DeleteClicked { id });
    assert_eq!(effects, vec![Effect::ConfirmDelete { id }]);
    let (state, effects) = update(state, Msg::DeleteConfirmed { id });
    match effects.as_slice() {
        [Effect::DeleteReport {
            mutation,
            id: target,
        }] if *target == id => (state, *mutation),
        other => panic!("expected a delete call, got {other:?}"),
    }
}

/// Clicks create and returns the mutation the create call carries.
pub fn clicked_create(state: AppState, title: &str) -> (AppState, MutationId) {
    let (state, effects) = update(
        state,
        Msg::CreateClicked {
            title: title.to_string(),
        },
    );
    match effects.as_slice() {
        [Effect::CreateReport { mutation, .. }] => (state, *mutation),
        other => panic!("expected a create call, got {other:?}"),
    }
}

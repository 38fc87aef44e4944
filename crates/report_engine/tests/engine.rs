use std::sync::{mpsc, Arc};
use std::time::Duration;

use async_trait::async_trait;
use report_engine::{
    ChannelEventSink, ClientSettings, EngineEvent, EngineHandle, ReportApi, ReportId,
    ReportRecord, TransportError, TransportErrorKind,
};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn channel_sink() -> (Arc<ChannelEventSink>, mpsc::Receiver<EngineEvent>) {
    let (tx, rx) = mpsc::channel();
    (Arc::new(ChannelEventSink::new(tx)), rx)
}

fn collect(rx: &mpsc::Receiver<EngineEvent>, count: usize) -> Vec<EngineEvent> {
    (0..count)
        .map_while(|_| rx.recv_timeout(Duration::from_secs(5)).ok())
        .collect()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn commands_come_back_as_tagged_events() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/reports"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 1, "title": "Only", "status": "pending", "retry_count": 0 }
        ])))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/reports/1"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let (sink, rx) = channel_sink();
    let engine = EngineHandle::new(
        ClientSettings {
            base_url: server.uri(),
            ..ClientSettings::default()
        },
        sink,
    )
    .expect("engine");
    engine.list(11);
    engine.delete(12, 1);

    let events = collect(&rx, 2);
    assert_eq!(events.len(), 2);

    let listed = events.iter().find_map(|event| match event {
        EngineEvent::Listed { request, result } => Some((*request, result.clone())),
        _ => None,
    });
    let (request, result) = listed.expect("listed event");
    assert_eq!(request, 11);
    assert_eq!(result.expect("list ok")[0].title, "Only");

    let deleted = events.iter().find_map(|event| match event {
        EngineEvent::Deleted { mutation, result } => Some((*mutation, result.clone())),
        _ => None,
    });
    let (mutation, result) = deleted.expect("deleted event");
    assert_eq!(mutation, 12);
    assert_eq!(result.unwrap_err().kind, TransportErrorKind::HttpStatus(500));
}

#[test]
fn unreachable_server_reports_network_error() {
    let (sink, rx) = channel_sink();
    // Port 9 (discard) is closed on test hosts.
    let engine = EngineHandle::new(
        ClientSettings {
            base_url: "http://127.0.0.1:9".to_string(),
            connect_timeout: Duration::from_millis(200),
            request_timeout: Duration::from_millis(500),
            ..ClientSettings::default()
        },
        sink,
    )
    .expect("engine");
    engine.create(3, "Generated from UI");

    match collect(&rx, 1).as_slice() {
        [EngineEvent::Created { mutation, result }] => {
            assert_eq!(*mutation, 3);
            let kind = result.clone().unwrap_err().kind;
            assert!(
                matches!(kind, TransportErrorKind::Network | TransportErrorKind::Timeout),
                "unexpected {kind:?}"
            );
        }
        other => panic!("unexpected events {other:?}"),
    }
}

struct ScriptedApi;

#[async_trait]
impl ReportApi for ScriptedApi {
    async fn list_reports(&self) -> Result<Vec<ReportRecord>, TransportError> {
        Ok(Vec::new())
    }

    async fn create_report(&self, title: &str) -> Result<ReportRecord, TransportError> {
        Ok(ReportRecord {
            id: 21,
            title: title.to_string(),
            status: "pending".to_string(),
            result_url: None,
            retry_count: 0,
            created_at: String::new(),
            completed_at: None,
        })
    }

    async fn delete_report(&self, _id: ReportId) -> Result<(), TransportError> {
        Ok(())
    }
}

#[test]
fn custom_api_can_back_the_engine() {
    let (sink, rx) = channel_sink();
    let engine = EngineHandle::with_api(Arc::new(ScriptedApi), sink).expect("engine");
    engine.create(1, "Scripted");

    match collect(&rx, 1).as_slice() {
        [EngineEvent::Created { mutation: 1, result: Ok(record) }] => {
            assert_eq!(record.id, 21);
            assert_eq!(record.title, "Scripted");
        }
        other => panic!("unexpected events {other:?}"),
    }
}

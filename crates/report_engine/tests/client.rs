use std::time::Duration;

use pretty_assertions::assert_eq;
use report_engine::{ClientSettings, ReportApi, ReportRecord, ReqwestReportApi, TransportErrorKind};
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn api_for(server: &MockServer) -> ReqwestReportApi {
    ReqwestReportApi::new(ClientSettings {
        base_url: server.uri(),
        ..ClientSettings::default()
    })
    .expect("client")
}

#[tokio::test]
async fn list_decodes_records_in_server_order() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/reports"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "id": 2,
                "title": "Second",
                "status": "processing",
                "result_url": null,
                "retry_count": 1,
                "created_at": "2024-05-01T10:00:00Z",
                "completed_at": null
            },
            {
                "id": 1,
                "title": "First",
                "status": "completed",
                "result_url": "/reports/1.txt",
                "retry_count": 0,
                "created_at": "2024-05-01T09:00:00Z",
                "completed_at": "2024-05-01T09:00:05Z"
            }
        ])))
        .mount(&server)
        .await;

    let reports = api_for(&server).list_reports().await.expect("list ok");
    assert_eq!(reports.iter().map(|r| r.id).collect::<Vec<_>>(), vec![2, 1]);
    assert_eq!(reports[0].retry_count, 1);
    assert_eq!(reports[1].result_url.as_deref(), Some("/reports/1.txt"));
}

#[tokio::test]
async fn create_posts_title_and_returns_record() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/reports"))
        .and(body_json(json!({ "title": "Generated from UI" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 7,
            "title": "Generated from UI",
            "status": "pending",
            "result_url": null,
            "retry_count": 0,
            "created_at": "2024-05-01T10:00:00Z",
            "completed_at": null
        })))
        .expect(1)
        .mount(&server)
        .await;

    let created = api_for(&server)
        .create_report("Generated from UI")
        .await
        .expect("create ok");
    assert_eq!(
        created,
        ReportRecord {
            id: 7,
            title: "Generated from UI".to_string(),
            status: "pending".to_string(),
            result_url: None,
            retry_count: 0,
            created_at: "2024-05-01T10:00:00Z".to_string(),
            completed_at: None,
        }
    );
}

#[tokio::test]
async fn delete_accepts_no_content() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/reports/3"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    api_for(&server).delete_report(3).await.expect("delete ok");
}

#[tokio::test]
async fn delete_of_missing_report_fails_with_status() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/reports/99"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "detail": "Report not found" })))
        .mount(&server)
        .await;

    let err = api_for(&server).delete_report(99).await.unwrap_err();
    assert_eq!(err.kind, TransportErrorKind::HttpStatus(404));
}

#[tokio::test]
async fn malformed_body_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/reports"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = api_for(&server).list_reports().await.unwrap_err();
    assert_eq!(err.kind, TransportErrorKind::Decode);
}

#[tokio::test]
async fn slow_response_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/reports"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(250))
                .set_body_json(json!([])),
        )
        .mount(&server)
        .await;

    let api = ReqwestReportApi::new(ClientSettings {
        base_url: server.uri(),
        request_timeout: Duration::from_millis(50),
        ..ClientSettings::default()
    })
    .expect("client");
    let err = api.list_reports().await.unwrap_err();
    assert_eq!(err.kind, TransportErrorKind::Timeout);
}

#[tokio::test]
async fn oversized_body_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/reports"))
        .respond_with(ResponseTemplate::new(200).set_body_string("[                    ]"))
        .mount(&server)
        .await;

    let api = ReqwestReportApi::new(ClientSettings {
        base_url: server.uri(),
        max_bytes: 10,
        ..ClientSettings::default()
    })
    .expect("client");
    let err = api.list_reports().await.unwrap_err();
    assert_eq!(
        err.kind,
        TransportErrorKind::TooLarge {
            max_bytes: 10,
            actual: Some(22)
        }
    );
}

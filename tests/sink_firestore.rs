//! Firestore sink against a mocked REST endpoint.

use chrono::{TimeZone, Utc};
use mockito::{Matcher, Server};
use serde_json::json;

use tou_rates::error::SinkError;
use tou_rates::reading::TouReading;
use tou_rates::sink::{FirestoreSink, RateSink};
use tou_rates::tariff::ConsumerCategory;

const DOCUMENTS_PATH: &str = "/v1/projects/solar-test/databases/(default)/documents/tou-rates";

fn reading() -> TouReading {
    let at = Utc.with_ymd_and_hms(2024, 6, 3, 14, 0, 0).unwrap();
    TouReading::new(ConsumerCategory::NonDomestic, 12.34, at)
}

#[tokio::test]
async fn append_posts_typed_document_with_api_key() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", DOCUMENTS_PATH)
        .match_query(Matcher::UrlEncoded("key".into(), "secret".into()))
        .match_body(Matcher::Json(json!({
            "fields": {
                "category": { "stringValue": "NON_DOMESTIC" },
                "rate": { "doubleValue": 12.34 },
                "timestamp": { "stringValue": "2024-06-03T14:00:00.000Z" },
            }
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"name":"projects/solar-test/databases/(default)/documents/tou-rates/abc"}"#)
        .create_async()
        .await;

    let sink =
        FirestoreSink::new(server.url(), "solar-test", "(default)", Some("secret".into())).unwrap();
    sink.append("tou-rates", &reading()).await.unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn append_without_key_still_posts() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", DOCUMENTS_PATH)
        .with_status(200)
        .create_async()
        .await;

    let sink = FirestoreSink::new(server.url(), "solar-test", "(default)", None).unwrap();
    sink.append("tou-rates", &reading()).await.unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn server_error_is_reported_as_rejected() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", DOCUMENTS_PATH)
        .match_query(Matcher::Any)
        .with_status(500)
        .with_body("backend unavailable")
        .create_async()
        .await;

    let sink =
        FirestoreSink::new(server.url(), "solar-test", "(default)", Some("secret".into())).unwrap();
    let err = sink.append("tou-rates", &reading()).await.unwrap_err();

    match err {
        SinkError::Rejected { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "backend unavailable");
        }
        other => panic!("expected Rejected, got {other:?}"),
    }
}

#[tokio::test]
async fn unreachable_server_is_an_http_error() {
    // Nothing listens on port 9 (discard) in the test environment.
    let sink = FirestoreSink::new("http://127.0.0.1:9", "solar-test", "(default)", None).unwrap();
    let err = sink.append("tou-rates", &reading()).await.unwrap_err();
    assert!(matches!(err, SinkError::Http(_)));
}

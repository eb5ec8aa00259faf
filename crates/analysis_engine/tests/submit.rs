use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use analysis_engine::{
    EngineConfig, EngineEvent, FailureKind, ProgressSink, ReqwestSubmitter, Submitter,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Default)]
struct TestSink {
    events: Mutex<Vec<EngineEvent>>,
}

impl TestSink {
    fn percents(&self) -> Vec<u8> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter_map(|event| match event {
                EngineEvent::JobProgress { percent, .. } => Some(*percent),
                _ => None,
            })
            .collect()
    }
}

impl ProgressSink for TestSink {
    fn emit(&self, event: EngineEvent) {
        self.events.lock().unwrap().push(event);
    }
}

fn write_videos(dir: &TempDir, names: &[&str]) -> Vec<PathBuf> {
    names
        .iter()
        .map(|name| {
            let path = dir.path().join(name);
            std::fs::write(&path, vec![b'x'; 32]).unwrap();
            path
        })
        .collect()
}

fn submitter_for(server: &MockServer) -> ReqwestSubmitter {
    let config = EngineConfig {
        upload_chunk_bytes: 8,
        ..EngineConfig::with_base_url(&server.uri()).expect("base url")
    };
    ReqwestSubmitter::new(&config).expect("submitter")
}

#[tokio::test]
async fn uploads_files_and_returns_payload() {
    let server = MockServer::start().await;
    let payload = json!({
        "car_counts": [4, 9, 2, 11],
        "rl_recommendation": { "direction": "East", "timer": 42, "confidence": 0.87 }
    });
    Mock::given(method("POST"))
        .and(path("/upload"))
        .respond_with(ResponseTemplate::new(200).set_body_json(payload.clone()))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let files = write_videos(&dir, &["north.mp4", "south.mp4"]);
    let sink = Arc::new(TestSink::default());

    let result = submitter_for(&server)
        .submit(1, &files, sink.clone())
        .await
        .expect("submit ok");
    assert_eq!(result, payload);

    let requests = server.received_requests().await.expect("recorded");
    assert_eq!(requests.len(), 1);
    let body = String::from_utf8_lossy(&requests[0].body);
    assert!(body.contains("name=\"videos\""));
    assert!(body.contains("filename=\"north.mp4\""));
    assert!(body.contains("filename=\"south.mp4\""));
    assert!(body.contains("video/mp4"));

    let percents = sink.percents();
    assert!(!percents.is_empty());
    assert!(percents.windows(2).all(|pair| pair[0] < pair[1]));
    assert_eq!(percents.last(), Some(&90));
}

#[tokio::test]
async fn progress_follows_each_streamed_chunk() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let video = dir.path().join("east.webm");
    std::fs::write(&video, vec![b'y'; 800]).unwrap();
    let sink = Arc::new(TestSink::default());

    submitter_for(&server)
        .submit(2, &[video], sink.clone())
        .await
        .expect("submit ok");

    // 8-byte chunks of an 800-byte file move the bar less than a point each.
    let expected: Vec<u8> = (1..=90).collect();
    assert_eq!(sink.percents(), expected);

    let requests = server.received_requests().await.expect("recorded");
    assert_eq!(requests.len(), 1);
    assert!(requests[0].body.windows(800).any(|run| run.iter().all(|b| *b == b'y')));
}

#[tokio::test]
async fn error_body_is_surfaced() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "Wrong number of files",
            "detail": "Expected 4 videos, got 2"
        })))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let files = write_videos(&dir, &["a.mp4", "b.mp4"]);
    let err = submitter_for(&server)
        .submit(3, &files, Arc::new(TestSink::default()))
        .await
        .unwrap_err();

    assert_eq!(err.kind, FailureKind::HttpStatus(400));
    assert_eq!(
        err.message,
        "Wrong number of files: Expected 4 videos, got 2"
    );
}

#[tokio::test]
async fn server_error_without_json_uses_status_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let files = write_videos(&dir, &["a.mp4"]);
    let err = submitter_for(&server)
        .submit(1, &files, Arc::new(TestSink::default()))
        .await
        .unwrap_err();

    assert_eq!(err.kind, FailureKind::HttpStatus(500));
    assert!(err.message.contains("500"));
}

#[tokio::test]
async fn missing_file_fails_before_any_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let files = vec![dir.path().join("gone.mp4")];
    let err = submitter_for(&server)
        .submit(1, &files, Arc::new(TestSink::default()))
        .await
        .unwrap_err();

    assert_eq!(err.kind, FailureKind::Io);
}

#[tokio::test]
async fn slow_analysis_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(500))
                .set_body_json(json!({})),
        )
        .mount(&server)
        .await;

    let config = EngineConfig {
        submit_timeout: Duration::from_millis(100),
        ..EngineConfig::with_base_url(&server.uri()).expect("base url")
    };
    let dir = TempDir::new().unwrap();
    let files = write_videos(&dir, &["a.mp4"]);
    let err = ReqwestSubmitter::new(&config)
        .expect("submitter")
        .submit(1, &files, Arc::new(TestSink::default()))
        .await
        .unwrap_err();

    assert_eq!(err.kind, FailureKind::Timeout);
}

#[tokio::test]
async fn non_json_success_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload"))
        .respond_with(ResponseTemplate::new(200).set_body_string("done"))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let files = write_videos(&dir, &["a.mp4"]);
    let err = submitter_for(&server)
        .submit(1, &files, Arc::new(TestSink::default()))
        .await
        .unwrap_err();

    assert_eq!(err.kind, FailureKind::Malformed);
}

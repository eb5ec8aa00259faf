use std::time::Duration;

use analysis_engine::{EngineConfig, FailureKind, HealthProber, ReqwestHealthProber};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn prober_for(server: &MockServer) -> ReqwestHealthProber {
    let config = EngineConfig::with_base_url(&server.uri()).expect("base url");
    ReqwestHealthProber::new(&config).expect("prober")
}

#[tokio::test]
async fn healthy_payload_is_returned_verbatim() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "healthy",
            "components": { "api": "ok", "engine": "ok" }
        })))
        .mount(&server)
        .await;

    let report = prober_for(&server).probe().await.expect("probe ok");
    assert_eq!(report.status, "healthy");
    assert_eq!(report.components.get("api").map(String::as_str), Some("ok"));
    assert_eq!(report.components.get("engine").map(String::as_str), Some("ok"));
}

#[tokio::test]
async fn missing_components_default_to_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "degraded" })))
        .mount(&server)
        .await;

    let report = prober_for(&server).probe().await.expect("probe ok");
    assert_eq!(report.status, "degraded");
    assert!(report.components.is_empty());
}

#[tokio::test]
async fn non_success_status_is_a_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(503).set_body_json(json!({
            "status": "healthy",
            "components": {}
        })))
        .mount(&server)
        .await;

    let err = prober_for(&server).probe().await.unwrap_err();
    assert_eq!(err.kind, FailureKind::HttpStatus(503));
}

#[tokio::test]
async fn malformed_payloads_are_failures() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "components": {} })))
        .mount(&server)
        .await;

    let prober = prober_for(&server);
    let first = prober.probe().await.unwrap_err();
    assert_eq!(first.kind, FailureKind::Malformed);
    let second = prober.probe().await.unwrap_err();
    assert_eq!(second.kind, FailureKind::Malformed);
}

#[tokio::test]
async fn slow_probe_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(500))
                .set_body_json(json!({ "status": "healthy" })),
        )
        .mount(&server)
        .await;

    let config = EngineConfig {
        probe_timeout: Duration::from_millis(50),
        ..EngineConfig::with_base_url(&server.uri()).expect("base url")
    };
    let prober = ReqwestHealthProber::new(&config).expect("prober");

    let started = std::time::Instant::now();
    let err = prober.probe().await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Timeout);
    assert!(started.elapsed() < Duration::from_millis(450));
}

#[tokio::test]
async fn unreachable_backend_is_a_failure() {
    // Nothing listens on port 1.
    let config = EngineConfig {
        probe_timeout: Duration::from_secs(2),
        ..EngineConfig::with_base_url("http://127.0.0.1:1").expect("base url")
    };
    let err = ReqwestHealthProber::new(&config)
        .expect("prober")
        .probe()
        .await
        .unwrap_err();
    assert!(matches!(err.kind, FailureKind::Network | FailureKind::Timeout));
}

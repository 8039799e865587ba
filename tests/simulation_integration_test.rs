// tests/simulation_integration_test.rs
//! End-to-end runs through the public API with a mocked strategy service.

mod common;

use std::time::Duration;

use httpmock::Method::POST;
use httpmock::MockServer;
use serde_json::json;

use chainrisk_lib::core::{Level, StrategySource};
use common::{engine_with_endpoint, taiwan_scenario};

#[tokio::test]
async fn service_strategies_flow_into_results() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/mitigate")
            .body_contains("\"affectedSuppliers\":[\"sup-tw-001\"]")
            .body_contains("\"recoveryRate\":0.5");
        then.status(200).json_body(json!({
            "strategies": [
                { "action": "Qualify a second foundry", "impact": "high", "difficulty": "high",
                  "timeframe": "6-9 months", "description": "Reduce single-site exposure." },
                { "action": "Expedite inventory by air" }
            ]
        }));
    });

    let engine = engine_with_endpoint(server.url("/mitigate"), 5_000);
    let results = engine.run(&taiwan_scenario()).await.expect("simulation runs");

    mock.assert();
    assert_eq!(results.strategy_source, StrategySource::Service);
    assert_eq!(results.mitigation_strategies.len(), 2);
    assert_eq!(results.mitigation_strategies[0].impact, Level::High);
    assert_eq!(results.mitigation_strategies[1].difficulty, Level::Medium);
    assert_eq!(results.cascade_depth, 1);
}

#[tokio::test]
async fn server_error_falls_back_to_rules() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/mitigate");
        then.status(500).body("internal error");
    });

    let engine = engine_with_endpoint(server.url("/mitigate"), 5_000);
    let results = engine.run(&taiwan_scenario()).await.unwrap();

    assert_eq!(results.strategy_source, StrategySource::Fallback);
    assert!(!results.mitigation_strategies.is_empty());
}

#[tokio::test]
async fn malformed_reply_falls_back_to_rules() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/mitigate");
        then.status(200)
            .header("content-type", "application/json")
            .body("{\"strategies\": [ {\"action\": ");
    });

    let engine = engine_with_endpoint(server.url("/mitigate"), 5_000);
    let first = engine.run(&taiwan_scenario()).await.unwrap();
    let second = engine.run(&taiwan_scenario()).await.unwrap();

    assert_eq!(first.strategy_source, StrategySource::Fallback);
    assert_eq!(first.mitigation_strategies, second.mitigation_strategies);
    assert_ne!(first.id, second.id);
}

#[tokio::test]
async fn slow_service_falls_back_after_timeout() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/mitigate");
        then.status(200)
            .delay(Duration::from_millis(2_000))
            .json_body(json!({ "strategies": [{ "action": "late" }] }));
    });

    let engine = engine_with_endpoint(server.url("/mitigate"), 200);
    let results = engine.run(&taiwan_scenario()).await.unwrap();
    assert_eq!(results.strategy_source, StrategySource::Fallback);
}

#[tokio::test]
async fn unreachable_service_falls_back() {
    // Nothing listens on port 9 on a test host.
    let engine = engine_with_endpoint("http://127.0.0.1:9/mitigate".to_string(), 1_000);
    let results = engine.run(&taiwan_scenario()).await.unwrap();
    assert_eq!(results.strategy_source, StrategySource::Fallback);
}

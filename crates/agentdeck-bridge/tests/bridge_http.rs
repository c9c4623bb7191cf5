//! HTTP behavior of the bridge against an in-process mock endpoint.
//!
//! The bridge is blocking, so each test owns a small tokio runtime that
//! hosts the axum mock while the call itself runs on the test thread.

use agentdeck_bridge::{AgentBridge, BridgeError};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::runtime::Runtime;

/// Serve `router` on an ephemeral port, returning the base URL.
fn serve(rt: &Runtime, router: Router) -> String {
    let listener = rt
        .block_on(TcpListener::bind("127.0.0.1:0"))
        .expect("bind mock listener");
    let addr = listener.local_addr().expect("mock listener addr");
    rt.spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    format!("http://{addr}")
}

#[test]
fn test_call_success_envelope() {
    let rt = Runtime::new().expect("runtime");
    let app = Router::new().route(
        "/v3/inference/chat/",
        post(|Json(body): Json<Value>| async move {
            Json(json!({
                "status": "success",
                "result": {
                    "echo_agent": body["agent_id"],
                    "echo_user": body["user_id"],
                    "echo_message": body["message"],
                    "session": body["session_id"],
                }
            }))
        }),
    );
    let base = serve(&rt, app);

    let bridge = AgentBridge::new(base, "student-01", None);
    let reply = bridge.call("What should I do now?", "agent-123").unwrap();

    assert!(reply.is_success());
    assert_eq!(reply.result["echo_agent"], "agent-123");
    assert_eq!(reply.result["echo_user"], "student-01");
    assert_eq!(reply.result["echo_message"], "What should I do now?");
    // Each call opens a fresh session keyed on the agent id.
    let session = reply.result["session"].as_str().unwrap();
    assert!(session.starts_with("agent-123-"));
}

#[test]
fn test_call_non_success_status_is_not_an_error() {
    let rt = Runtime::new().expect("runtime");
    let app = Router::new().route(
        "/v3/inference/chat/",
        post(|| async {
            Json(json!({ "status": "failed", "result": { "detail": "agent crashed" } }))
        }),
    );
    let base = serve(&rt, app);

    let bridge = AgentBridge::new(base, "student-01", None);
    let reply = bridge.call("anything", "agent-123").unwrap();

    // A completed call with a bad verdict is Ok, just not a success.
    assert!(!reply.is_success());
    assert_eq!(reply.status, "failed");
    assert_eq!(reply.result["detail"], "agent crashed");
}

#[test]
fn test_call_peels_fenced_string_response() {
    let rt = Runtime::new().expect("runtime");
    let app = Router::new().route(
        "/v3/inference/chat/",
        post(|| async { Json(json!({ "response": "```json\n{\"score\": 76}\n```" })) }),
    );
    let base = serve(&rt, app);

    let bridge = AgentBridge::new(base, "student-01", None);
    let reply = bridge.call("score this", "agent-123").unwrap();

    assert!(reply.is_success());
    assert_eq!(reply.result["score"], 76);
}

#[test]
fn test_call_maps_endpoint_errors() {
    let rt = Runtime::new().expect("runtime");
    let app = Router::new().route(
        "/v3/inference/chat/",
        post(|| async {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "message": "inference backend down" })),
            )
        }),
    );
    let base = serve(&rt, app);

    let bridge = AgentBridge::new(base, "student-01", None);
    let err = bridge.call("anything", "agent-123").unwrap_err();

    match err {
        BridgeError::Endpoint { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "inference backend down");
        }
        other => panic!("expected endpoint error, got {other:?}"),
    }
}

#[test]
fn test_call_network_error() {
    // Bind then immediately drop so the port is closed by the time the
    // bridge connects.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let bridge = AgentBridge::new(format!("http://{addr}"), "student-01", None);
    let err = bridge.call("anything", "agent-123").unwrap_err();
    assert!(matches!(err, BridgeError::Http(_)));
}

#[test]
fn test_call_attaches_api_key_header() {
    let rt = Runtime::new().expect("runtime");
    let app = Router::new().route(
        "/v3/inference/chat/",
        post(|headers: HeaderMap, Json(_): Json<Value>| async move {
            let key = headers
                .get("x-api-key")
                .and_then(|v| v.to_str().ok())
                .unwrap_or("")
                .to_string();
            Json(json!({ "status": "success", "result": { "key": key } }))
        }),
    );
    let base = serve(&rt, app);

    let bridge = AgentBridge::new(base, "student-01", Some("sk-test".into()));
    let reply = bridge.call("anything", "agent-123").unwrap();
    assert_eq!(reply.result["key"], "sk-test");
}

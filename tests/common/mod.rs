//! Purpose: Loopback stand-in for the Solr package search endpoint.
//! Exports: `MockIndex`, `unreachable_endpoint`.
//! Role: Shared fixture for library and CLI integration tests.
//! Invariants: The listener is bound before `start` returns, so early requests queue.
//! Invariants: Responses are selected by the `q` parameter only.
#![allow(dead_code)]

use axum::Router;
use axum::extract::{Query, RawQuery, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use serde_json::json;
use std::collections::HashMap;
use std::net::TcpListener;
use std::sync::{Arc, Mutex};

pub const SELECT_PATH: &str = "/solrsearch/select";

type RequestLog = Arc<Mutex<Vec<String>>>;

pub struct MockIndex {
    pub endpoint: String,
    requests: RequestLog,
}

impl MockIndex {
    pub fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind mock index");
        listener.set_nonblocking(true).expect("nonblocking listener");
        let addr = listener.local_addr().expect("local addr");
        let requests: RequestLog = Arc::new(Mutex::new(Vec::new()));
        let state = requests.clone();

        std::thread::spawn(move || {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .expect("mock index runtime");
            runtime.block_on(async move {
                let listener =
                    tokio::net::TcpListener::from_std(listener).expect("tokio listener");
                let app = Router::new()
                    .route(SELECT_PATH, get(select))
                    .with_state(state);
                let _ = axum::serve(listener, app).await;
            });
        });

        Self {
            endpoint: format!("http://{addr}{SELECT_PATH}"),
            requests,
        }
    }

    /// Raw query strings received so far, in arrival order.
    pub fn queries(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap_or_else(|poison| poison.into_inner())
            .clone()
    }
}

/// An endpoint on a loopback port with nothing listening.
pub fn unreachable_endpoint() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind unused port");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);
    format!("http://{addr}{SELECT_PATH}")
}

async fn select(
    State(requests): State<RequestLog>,
    RawQuery(raw): RawQuery,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    requests
        .lock()
        .unwrap_or_else(|poison| poison.into_inner())
        .push(raw.unwrap_or_default());

    match params.get("q").map(String::as_str).unwrap_or("") {
        "nostr" => axum::Json(json!({
            "responseHeader": {"status": 0, "QTime": 1},
            "response": {"numFound": 3, "start": 0, "docs": [
                {"id": "com.vitorpamplona.quartz:quartz", "g": "com.vitorpamplona.quartz", "a": "quartz", "v": "0.85.0", "p": "aar"},
                {"id": "io.github.rust-nostr:nostr-sdk-jvm", "g": "io.github.rust-nostr", "a": "nostr-sdk-jvm", "v": "0.39.0", "p": "jar"},
                {"id": "fr.acinq.secp256k1:secp256k1-kmp", "g": "fr.acinq.secp256k1", "a": "secp256k1-kmp", "v": "0.15.0", "p": "jar"}
            ]}
        }))
        .into_response(),
        "vitorpamplona" => axum::Json(json!({
            "response": {"numFound": 1, "docs": [
                {"g": "com.vitorpamplona.ammolite", "a": "ammolite", "v": "0.85.0"}
            ]}
        }))
        .into_response(),
        "empty" => axum::Json(json!({"response": {"numFound": 0, "docs": []}})).into_response(),
        "busy" => (StatusCode::INTERNAL_SERVER_ERROR, "index unavailable").into_response(),
        "missing" => (StatusCode::NOT_FOUND, "no such core").into_response(),
        "accepted" => (StatusCode::ACCEPTED, "{\"response\":{\"docs\":[{\"g\":\"x\",\"a\":\"y\",\"v\":\"1\"}]}}").into_response(),
        "garbled" => (StatusCode::OK, "<html>maintenance</html>").into_response(),
        "latin1" => (
            StatusCode::OK,
            b"{\"response\":{\"docs\":[{\"g\":\"\xff\xfe\",\"a\":\"x\",\"v\":\"1\"}]}}".to_vec(),
        )
            .into_response(),
        other => axum::Json(json!({
            "response": {"numFound": 1, "docs": [
                {"g": "org.example", "a": other, "v": "1.0.0"}
            ]}
        }))
        .into_response(),
    }
}

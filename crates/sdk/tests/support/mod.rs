//! In-process stand-in for a BillingGate worker.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use axum::{http::HeaderMap, Router};
use billinggate_sdk::{BillingGateClient, ClientConfig};
use tokio::net::TcpListener;

pub const API_KEY: &str = "test-api-key";
pub const SECRET: &str = "0123456789abcdef0123456789abcdef";

/// A request as seen by the mock worker.
#[derive(Debug, Clone, Default)]
pub struct Seen {
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub query: Option<String>,
    pub body: Option<serde_json::Value>,
}

impl Seen {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let header = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_owned)
        };
        Self {
            authorization: header("authorization"),
            content_type: header("content-type"),
            ..Self::default()
        }
    }
}

/// Shared log of requests the mock worker received.
pub type SeenLog = Arc<Mutex<Vec<Seen>>>;

/// Serve `app` on an ephemeral loopback port and return its base URL.
pub async fn spawn(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

/// An API-flow client pointed at `base_url`.
pub fn api_client(base_url: &str) -> BillingGateClient {
    BillingGateClient::new(
        ClientConfig::new()
            .with_worker_url(base_url)
            .with_api_key(API_KEY),
    )
    .unwrap()
}

//! Mock Hyperliquid info endpoint served by axum on an ephemeral port.

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde_json::Value;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// How the venue misbehaves, if at all.
#[derive(Debug, Clone)]
pub struct Behavior {
    /// Most fills per `userFillsByTime` response.
    pub page_limit: usize,
    /// Answer every request with 429 and `Retry-After`.
    pub rate_limit_secs: Option<u64>,
    /// Ignore `startTime` and always return the first full page.
    pub stuck: bool,
    /// Fail this many requests with 503 before answering normally.
    pub fail_first: usize,
    /// Delay before answering.
    pub delay: Option<Duration>,
    /// Reverse each page so records arrive newest-first.
    pub reverse_pages: bool,
}

impl Default for Behavior {
    fn default() -> Self {
        Self {
            page_limit: 2000,
            rate_limit_secs: None,
            stuck: false,
            fail_first: 0,
            delay: None,
            reverse_pages: false,
        }
    }
}

#[derive(Default)]
pub struct VenueState {
    pub fills: Mutex<Vec<Value>>,
    pub funding: Mutex<Vec<Value>>,
    pub requests: Mutex<Vec<Value>>,
    pub behavior: Mutex<Behavior>,
}

pub struct MockVenue {
    pub url: String,
    pub state: Arc<VenueState>,
}

impl MockVenue {
    pub async fn start(behavior: Behavior) -> Self {
        let state = Arc::new(VenueState {
            behavior: Mutex::new(behavior),
            ..Default::default()
        });
        let app = Router::new()
            .route("/info", post(info))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            url: format!("http://{}", addr),
            state,
        }
    }

    pub fn with_fills(self, fills: Vec<Value>) -> Self {
        *self.state.fills.lock().unwrap() = fills;
        self
    }

    pub fn with_funding(self, funding: Vec<Value>) -> Self {
        *self.state.funding.lock().unwrap() = funding;
        self
    }

    pub fn requests(&self) -> Vec<Value> {
        self.state.requests.lock().unwrap().clone()
    }

    /// `startTime` of every `userFillsByTime` request, in order.
    pub fn fill_cursors(&self) -> Vec<i64> {
        self.requests()
            .iter()
            .filter(|r| r["type"] == "userFillsByTime")
            .filter_map(|r| r["startTime"].as_i64())
            .collect()
    }
}

fn time_of(v: &Value) -> i64 {
    v["time"].as_i64().unwrap_or_default()
}

async fn info(State(state): State<Arc<VenueState>>, Json(body): Json<Value>) -> Response {
    state.requests.lock().unwrap().push(body.clone());

    let behavior = {
        let mut guard = state.behavior.lock().unwrap();
        let snapshot = guard.clone();
        if guard.fail_first > 0 {
            guard.fail_first -= 1;
        }
        snapshot
    };

    if let Some(delay) = behavior.delay {
        tokio::time::sleep(delay).await;
    }
    if let Some(secs) = behavior.rate_limit_secs {
        return (
            StatusCode::TOO_MANY_REQUESTS,
            [(header::RETRY_AFTER, secs.to_string())],
            "rate limited",
        )
            .into_response();
    }
    if behavior.fail_first > 0 {
        return (StatusCode::SERVICE_UNAVAILABLE, "try again").into_response();
    }

    let start = body["startTime"].as_i64().unwrap_or_default();
    match body["type"].as_str() {
        Some("userFillsByTime") => {
            let mut fills = state.fills.lock().unwrap().clone();
            fills.sort_by_key(time_of);
            let mut page: Vec<Value> = fills
                .into_iter()
                .filter(|f| behavior.stuck || time_of(f) >= start)
                .take(behavior.page_limit)
                .collect();
            if behavior.reverse_pages {
                page.reverse();
            }
            Json(Value::Array(page)).into_response()
        }
        Some("userFunding") => {
            let funding: Vec<Value> = state
                .funding
                .lock()
                .unwrap()
                .iter()
                .filter(|f| time_of(f) >= start)
                .cloned()
                .collect();
            Json(Value::Array(funding)).into_response()
        }
        _ => (StatusCode::UNPROCESSABLE_ENTITY, "unknown request type").into_response(),
    }
}

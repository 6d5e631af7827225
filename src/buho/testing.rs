//! In-memory HTTP client double for tests.

use async_trait::async_trait;
use serde_json::Value as JsonValue;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::http::{HttpClient, HttpError, HttpRequestOptions};

type Responder = dyn Fn(&HttpRequestOptions) -> Result<JsonValue, HttpError> + Send + Sync;

/// Records every request and answers through a closure.
pub struct RecordingClient {
    responder: Box<Responder>,
    requests: Mutex<Vec<HttpRequestOptions>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl RecordingClient {
    pub fn new<F>(responder: F) -> Self
    where
        F: Fn(&HttpRequestOptions) -> Result<JsonValue, HttpError> + Send + Sync + 'static,
    {
        Self {
            responder: Box::new(responder),
            requests: Mutex::new(Vec::new()),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    /// Answer the n-th request (0-based) with the n-th scripted outcome
    pub fn scripted(outcomes: Vec<Result<JsonValue, HttpError>>) -> Self {
        let counter = AtomicUsize::new(0);
        Self::new(move |_| {
            let n = counter.fetch_add(1, Ordering::SeqCst);
            outcomes
                .get(n)
                .cloned()
                .unwrap_or_else(|| Err(HttpError::Transport("unexpected request".to_string())))
        })
    }

    pub fn requests(&self) -> Vec<HttpRequestOptions> {
        self.requests.lock().unwrap().clone()
    }

    /// Request bodies, in dispatch order
    pub fn bodies(&self) -> Vec<JsonValue> {
        self.requests()
            .into_iter()
            .map(|r| r.body.unwrap_or(JsonValue::Null))
            .collect()
    }

    /// Highest number of simultaneously outstanding requests seen
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HttpClient for RecordingClient {
    async fn request(&self, options: HttpRequestOptions) -> Result<JsonValue, HttpError> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        self.requests.lock().unwrap().push(options.clone());

        // Give any concurrently polled request a chance to start
        tokio::task::yield_now().await;

        let outcome = (self.responder)(&options);
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        outcome
    }
}

//! Mock transport for testing.
//!
//! Provides a programmable transport that can simulate a hub without a
//! network connection. Responses are served in the order they were queued.

use super::{Request, Response, Transport};
use crate::error::{Error, Result};
use bytes::Bytes;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// A request seen by the mock transport.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordedRequest {
    /// The request as issued by the client.
    pub request: Request,
    /// Credential cookie attached to the request, if any.
    pub credential: Option<String>,
}

impl RecordedRequest {
    /// The endpoint path.
    pub fn path(&self) -> &str {
        &self.request.path
    }

    /// The verbatim query string, or `""`.
    pub fn raw_query(&self) -> &str {
        self.request.raw_query.as_deref().unwrap_or("")
    }

    /// Value of a form-encoded parameter.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.request
            .params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

struct MockTransportInner {
    responses: VecDeque<Response>,
    requests: Vec<RecordedRequest>,
    default_response: Option<Response>,
}

/// Mock transport for testing client functionality.
///
/// # Example
///
/// ```rust
/// use async_hub3::transport::MockTransport;
///
/// let mock = MockTransport::new();
/// mock.queue_json(r#"{"1.3.6.1.4.1.4115.1.20.1.1.5.8.0": "ABC123"}"#);
/// mock.queue_status(500);
/// assert_eq!(mock.queued_response_count(), 2);
/// ```
#[derive(Clone)]
pub struct MockTransport {
    inner: Arc<Mutex<MockTransportInner>>,
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl MockTransport {
    /// Create a new mock transport with an empty queue.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(MockTransportInner {
                responses: VecDeque::new(),
                requests: Vec::new(),
                default_response: None,
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, MockTransportInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Queue a response.
    pub fn queue_response(&self, response: Response) {
        self.lock().responses.push_back(response);
    }

    /// Queue a 200 response with the given body.
    pub fn queue_json(&self, body: impl Into<Bytes>) {
        self.queue_response(Response::new(200, body));
    }

    /// Queue an empty response with the given status.
    pub fn queue_status(&self, status: u16) {
        self.queue_response(Response::new(status, Bytes::new()));
    }

    /// Queue a successful login whose envelope is `json`.
    ///
    /// The body is the base64 encoding of `json`, as the hub sends it.
    pub fn queue_login(&self, json: &str) {
        use base64::Engine;
        let body = base64::engine::general_purpose::STANDARD.encode(json);
        self.queue_json(body);
    }

    /// Set a response served whenever the queue is empty.
    pub fn set_default_response(&self, response: Response) {
        self.lock().default_response = Some(response);
    }

    /// Get all recorded requests.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.lock().requests.clone()
    }

    /// Paths of all recorded requests, in order.
    pub fn paths(&self) -> Vec<String> {
        self.lock()
            .requests
            .iter()
            .map(|r| r.request.path.to_string())
            .collect()
    }

    /// Clear recorded requests.
    pub fn clear_requests(&self) {
        self.lock().requests.clear();
    }

    /// Get the number of queued responses remaining.
    pub fn queued_response_count(&self) -> usize {
        self.lock().responses.len()
    }
}

impl Transport for MockTransport {
    async fn get(&self, request: &Request, credential: Option<&str>) -> Result<Response> {
        let mut inner = self.lock();
        inner.requests.push(RecordedRequest {
            request: request.clone(),
            credential: credential.map(str::to_string),
        });

        match inner.responses.pop_front() {
            Some(response) => Ok(response),
            None => inner.default_response.clone().ok_or_else(|| {
                Error::Config(format!("mock transport has no response for {}", request.display_target()).into())
            }),
        }
    }

    fn base_url(&self) -> &str {
        "http://mock"
    }
}

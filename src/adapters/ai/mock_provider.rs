//! Mock Extraction Provider for testing.
//!
//! Provides a configurable mock implementation of the ExtractionProvider
//! port, allowing tests to run without calling a real model.
//!
//! # Features
//!
//! - Pre-configured responses (consumed in order, shared by every call kind)
//! - Simulated delays for timeout testing
//! - Error injection for resilience testing
//! - Call tracking for verification
//!
//! # Example
//!
//! ```ignore
//! let provider = MockExtractionProvider::new()
//!     .with_response(r#"{"transactions":[]}"#)
//!     .with_delay(Duration::from_millis(100));
//!
//! let completion = provider.complete_structured(request).await?;
//! ```

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::sleep;

use crate::ports::{AIError, ExtractionProvider, StructuredCompletion, StructuredRequest};

const MOCK_MODEL: &str = "mock-extractor-1";

/// Mock extraction provider for testing.
///
/// Clones share the response queue and call history.
#[derive(Debug, Clone)]
pub struct MockExtractionProvider {
    /// Pre-configured responses (consumed in order).
    responses: Arc<Mutex<VecDeque<MockResponse>>>,
    /// Simulated latency per request.
    delay: Duration,
    /// Structured call history for verification.
    calls: Arc<Mutex<Vec<StructuredRequest>>>,
    /// Free-form prompts seen.
    freeform_calls: Arc<Mutex<Vec<String>>>,
}

/// A configured mock response.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Return raw model text.
    Success { text: String, tokens_used: u32 },
    /// Return an error.
    Error(MockError),
}

/// Mock error types for testing error handling.
#[derive(Debug, Clone)]
pub enum MockError {
    /// Simulate rate limiting.
    RateLimited { retry_after_secs: u32 },
    /// Simulate content filtering.
    ContentFiltered { reason: String },
    /// Simulate provider unavailable.
    Unavailable { message: String },
    /// Simulate authentication failure.
    AuthenticationFailed,
    /// Simulate network error.
    Network { message: String },
    /// Simulate timeout.
    Timeout { timeout_secs: u32 },
}

impl From<MockError> for AIError {
    fn from(err: MockError) -> Self {
        match err {
            MockError::RateLimited { retry_after_secs } => AIError::rate_limited(retry_after_secs),
            MockError::ContentFiltered { reason } => AIError::content_filtered(reason),
            MockError::Unavailable { message } => AIError::unavailable(message),
            MockError::AuthenticationFailed => AIError::AuthenticationFailed,
            MockError::Network { message } => AIError::network(message),
            MockError::Timeout { timeout_secs } => AIError::Timeout { timeout_secs },
        }
    }
}

impl Default for MockExtractionProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MockExtractionProvider {
    /// Creates a new mock provider with default settings.
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::new())),
            delay: Duration::ZERO,
            calls: Arc::new(Mutex::new(Vec::new())),
            freeform_calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Adds a successful response to the queue.
    pub fn with_response(self, text: impl Into<String>) -> Self {
        self.push(MockResponse::Success {
            text: text.into(),
            tokens_used: 42,
        })
    }

    /// Adds an error response to the queue.
    pub fn with_error(self, error: MockError) -> Self {
        self.push(MockResponse::Error(error))
    }

    /// Sets simulated latency per request.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Queues a response on an already-shared provider.
    pub fn enqueue(&self, text: impl Into<String>) {
        self.responses.lock().unwrap().push_back(MockResponse::Success {
            text: text.into(),
            tokens_used: 42,
        });
    }

    /// Returns the number of structured calls made to this provider.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Returns all recorded structured calls.
    pub fn get_calls(&self) -> Vec<StructuredRequest> {
        self.calls.lock().unwrap().clone()
    }

    /// Returns the number of free-form calls made to this provider.
    pub fn freeform_call_count(&self) -> usize {
        self.freeform_calls.lock().unwrap().len()
    }

    fn push(self, response: MockResponse) -> Self {
        self.responses.lock().unwrap().push_back(response);
        self
    }

    /// Gets the next response or an empty extraction.
    fn next_response(&self) -> MockResponse {
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| MockResponse::Success {
                text: r#"{"transactions":[]}"#.to_string(),
                tokens_used: 1,
            })
    }

    async fn respond(&self) -> Result<(String, u32), AIError> {
        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }

        match self.next_response() {
            MockResponse::Success { text, tokens_used } => Ok((text, tokens_used)),
            MockResponse::Error(err) => Err(err.into()),
        }
    }
}

#[async_trait]
impl ExtractionProvider for MockExtractionProvider {
    async fn complete_freeform(&self, prompt: &str) -> Result<String, AIError> {
        self.freeform_calls.lock().unwrap().push(prompt.to_string());
        let (text, _) = self.respond().await?;
        Ok(text)
    }

    async fn complete_structured(
        &self,
        request: StructuredRequest,
    ) -> Result<StructuredCompletion, AIError> {
        self.calls.lock().unwrap().push(request);
        let (text, tokens_used) = self.respond().await?;
        Ok(StructuredCompletion {
            text,
            tokens_used,
            elapsed_ms: self.delay.as_millis() as u64,
            model: MOCK_MODEL.to_string(),
        })
    }

    fn model_name(&self) -> String {
        MOCK_MODEL.to_string()
    }
}

//! Extraction Provider Adapters.
//!
//! Implementations of the ExtractionProvider port.
//!
//! ## Available Adapters
//!
//! - `MockExtractionProvider` - Configurable mock for testing
//! - `GeminiProvider` - Google Gemini models over the REST API

mod gemini_provider;
mod mock_provider;

pub use gemini_provider::{GeminiConfig, GeminiProvider};
pub use mock_provider::{MockError, MockExtractionProvider, MockResponse};

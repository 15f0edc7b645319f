//! Client for OpenAI-compatible chat-completions APIs.
//!
//! The content pipeline talks to its language model through [`ChatClient`],
//! which wraps `reqwest` with typed request/response handling and surfaces
//! failures as [`GatewayError`]. The client itself never retries; callers that
//! want resilience wrap individual calls in [`retry_with_backoff`].

pub mod client;
pub mod error;
pub mod retry;
pub mod types;

pub use client::ChatClient;
pub use error::GatewayError;
pub use retry::{is_retriable, retry_with_backoff};
pub use types::{ChatMessage, GenerationParams};

use thiserror::Error;

/// Errors returned by the chat-completions client.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The configured API base could not be parsed as a URL.
    #[error("invalid API base URL '{0}'")]
    InvalidBaseUrl(String),

    /// The API answered with a non-2xx status.
    #[error("chat completions API returned HTTP {status}")]
    UnexpectedStatus { status: reqwest::StatusCode },

    /// The response body could not be deserialized into the expected shape.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// The API answered 2xx but the `choices` array was empty.
    #[error("chat completions response contained no choices")]
    EmptyCompletion,
}

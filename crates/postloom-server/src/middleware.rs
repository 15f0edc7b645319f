use std::{
    collections::HashMap,
    sync::Arc,
    time::{Duration, Instant},
};

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tokio::sync::Mutex;
use uuid::Uuid;

/// Newtype wrapping a request ID string, stored as a request extension.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

/// The authenticated caller, resolved by the bearer-auth middleware and
/// stored as a request extension. With auth disabled (development), every
/// request runs as the nil user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser(pub Uuid);

/// API key auth settings used by middleware.
///
/// Each configured bearer token maps to the UUID of the user it acts as;
/// identity is delegated to whoever provisioned the key.
#[derive(Debug, Clone)]
pub struct AuthState {
    api_keys: Arc<HashMap<String, Uuid>>,
    pub enabled: bool,
}

impl AuthState {
    /// Builds auth config from `POSTLOOM_API_KEYS` (comma-separated
    /// `token:user-uuid` pairs).
    ///
    /// In development, empty/missing keys disable auth for local iteration.
    /// In non-development envs, empty/missing keys fail startup.
    ///
    /// # Errors
    ///
    /// Returns an error when an entry is malformed, or when no keys are
    /// configured outside development.
    pub fn from_env(is_development: bool) -> anyhow::Result<Self> {
        let raw = std::env::var("POSTLOOM_API_KEYS").unwrap_or_default();
        Self::from_keys(&raw, is_development)
    }

    /// Builds auth config from a raw `token:user-uuid,...` list.
    ///
    /// # Errors
    ///
    /// Returns an error when an entry is malformed, or when no keys are
    /// configured outside development.
    pub fn from_keys(raw: &str, is_development: bool) -> anyhow::Result<Self> {
        let mut keys = HashMap::new();
        for entry in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            let Some((token, user)) = entry.split_once(':') else {
                anyhow::bail!("POSTLOOM_API_KEYS entries must be 'token:user-uuid', got '{entry}'");
            };
            let token = token.trim();
            if token.is_empty() {
                anyhow::bail!("POSTLOOM_API_KEYS entry '{entry}' has an empty token");
            }
            let user_id = Uuid::parse_str(user.trim()).map_err(|e| {
                anyhow::anyhow!("POSTLOOM_API_KEYS entry '{entry}' has an invalid user uuid: {e}")
            })?;
            keys.insert(token.to_owned(), user_id);
        }

        if keys.is_empty() {
            if is_development {
                tracing::warn!(
                    "POSTLOOM_API_KEYS not set; bearer auth disabled in development environment"
                );
                return Ok(Self {
                    api_keys: Arc::new(HashMap::new()),
                    enabled: false,
                });
            }

            anyhow::bail!(
                "POSTLOOM_API_KEYS is required outside development; provide comma-separated token:user-uuid pairs"
            );
        }

        Ok(Self {
            api_keys: Arc::new(keys),
            enabled: true,
        })
    }

    fn resolve(&self, token: &str) -> Option<Uuid> {
        self.api_keys.get(token).copied()
    }
}

#[derive(Debug, Clone)]
struct RateLimitWindow {
    started_at: Instant,
    count: usize,
}

/// Fixed-window limiter for simple API protection.
#[derive(Debug, Clone)]
pub struct RateLimitState {
    max_requests: usize,
    window: Duration,
    state: Arc<Mutex<RateLimitWindow>>,
}

impl RateLimitState {
    #[must_use]
    pub fn new(max_requests: usize, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            state: Arc::new(Mutex::new(RateLimitWindow {
                started_at: Instant::now(),
                count: 0,
            })),
        }
    }
}

#[derive(Debug, Serialize)]
struct MiddlewareErrorBody {
    error: &'static str,
}

/// Axum middleware that extracts or generates a request ID.
///
/// If the incoming request has an `x-request-id` header, that value is used.
/// Otherwise a new `UUIDv4` is generated. The ID is:
/// - Inserted into request extensions as [`RequestId`]
/// - Set on the response as the `x-request-id` header
pub async fn request_id(mut req: Request, next: Next) -> Response {
    let id = req
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map_or_else(|| Uuid::new_v4().to_string(), String::from);

    req.extensions_mut().insert(RequestId(id.clone()));

    let mut res = next.run(req).await;

    if let Ok(val) = HeaderValue::from_str(&id) {
        res.headers_mut().insert("x-request-id", val);
    }

    res
}

/// Middleware resolving the calling user from a Bearer token when enabled.
///
/// Inserts [`AuthUser`] into request extensions on success. With auth
/// disabled the nil user is used, so downstream handlers always find an
/// [`AuthUser`].
pub async fn require_bearer_auth(
    State(auth): State<AuthState>,
    mut req: Request,
    next: Next,
) -> Response {
    if !auth.enabled {
        req.extensions_mut().insert(AuthUser(Uuid::nil()));
        return next.run(req).await;
    }

    let user = extract_bearer_token(req.headers().get(AUTHORIZATION)).and_then(|t| auth.resolve(t));

    match user {
        Some(user_id) => {
            req.extensions_mut().insert(AuthUser(user_id));
            next.run(req).await
        }
        None => (
            StatusCode::UNAUTHORIZED,
            Json(MiddlewareErrorBody {
                error: "missing or invalid bearer token",
            }),
        )
            .into_response(),
    }
}

/// Middleware enforcing a fixed request-per-window limit.
pub async fn enforce_rate_limit(
    State(rate_limit): State<RateLimitState>,
    req: Request,
    next: Next,
) -> Response {
    let mut window = rate_limit.state.lock().await;
    let elapsed = window.started_at.elapsed();

    if elapsed >= rate_limit.window {
        window.started_at = Instant::now();
        window.count = 0;
    }

    if window.count >= rate_limit.max_requests {
        return (
            StatusCode::TOO_MANY_REQUESTS,
            Json(MiddlewareErrorBody {
                error: "rate limit exceeded",
            }),
        )
            .into_response();
    }

    window.count += 1;
    drop(window);

    next.run(req).await
}

fn extract_bearer_token(value: Option<&HeaderValue>) -> Option<&str> {
    value
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .filter(|s| !s.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_bearer_token_accepts_valid_header() {
        let header = HeaderValue::from_static("Bearer test-token");
        assert_eq!(extract_bearer_token(Some(&header)), Some("test-token"));
    }

    #[test]
    fn extract_bearer_token_rejects_non_bearer_header() {
        let header = HeaderValue::from_static("Basic abc123");
        assert_eq!(extract_bearer_token(Some(&header)), None);
    }

    #[test]
    fn from_keys_maps_tokens_to_users() {
        let user = Uuid::new_v4();
        let state = AuthState::from_keys(&format!("alpha:{user}"), false)
            .expect("valid key list should parse");

        assert!(state.enabled);
        assert_eq!(state.resolve("alpha"), Some(user));
        assert_eq!(state.resolve("beta"), None);
    }

    #[test]
    fn from_keys_rejects_malformed_entries() {
        assert!(AuthState::from_keys("token-without-user", false).is_err());
        assert!(AuthState::from_keys("alpha:not-a-uuid", false).is_err());
        assert!(AuthState::from_keys(&format!(":{}", Uuid::new_v4()), false).is_err());
    }

    #[test]
    fn from_keys_disables_auth_when_empty_in_dev() {
        let state = AuthState::from_keys("", true).expect("dev should allow missing keys");
        assert!(!state.enabled);
    }

    #[test]
    fn from_keys_requires_keys_outside_dev() {
        assert!(AuthState::from_keys("", false).is_err());
    }
}

//! Session authentication middleware.

use crate::error::{ApiError, ApiResult};
use crate::metrics::SESSIONS_REJECTED;
use crate::state::AppState;
use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use locker_metadata::{MetadataError, MetadataResult};
use tracing::Instrument;
use uuid::Uuid;

/// Header carrying the session token.
pub const SESSION_HEADER: &str = "x-session";

/// Maximum length for trace IDs.
/// Longer trace IDs are truncated to prevent log bloat and log injection.
const MAX_TRACE_ID_LEN: usize = 128;

/// Trace ID for request correlation.
#[derive(Clone, Debug)]
pub struct TraceId(pub String);

impl TraceId {
    /// Generate a new random trace ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Create a trace ID from a client-provided value, keeping at most
    /// MAX_TRACE_ID_LEN printable ASCII characters.
    pub fn from_client(value: &str) -> Self {
        let sanitized: String = value
            .chars()
            .take(MAX_TRACE_ID_LEN)
            .filter(|c| c.is_ascii_graphic() || *c == ' ')
            .collect();

        if sanitized.is_empty() {
            Self::new()
        } else {
            Self(sanitized)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for TraceId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TraceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The account a valid session token acts for.
#[derive(Clone, Debug)]
pub struct AuthenticatedUser {
    pub username: String,
}

/// Why a request carries no [`AuthenticatedUser`].
#[derive(Clone, Debug)]
pub struct SessionRejection(pub MetadataError);

/// Resolve the `X-Session` header to a username.
///
/// An absent or empty header is a missing token. A header that is present but
/// unusable (not UTF-8, or only whitespace) is an invalid token.
fn resolve_session(state: &AppState, req: &Request) -> MetadataResult<String> {
    let Some(value) = req.headers().get(SESSION_HEADER) else {
        return Err(MetadataError::MissingToken);
    };
    if value.is_empty() {
        return Err(MetadataError::MissingToken);
    }
    match value.to_str().map(str::trim) {
        Ok(token) if !token.is_empty() => state.sessions.resolve(Some(token)),
        _ => Err(MetadataError::InvalidToken),
    }
}

/// Extract trace ID from X-Trace-Id header or generate a new one.
fn extract_or_generate_trace_id(req: &Request) -> TraceId {
    req.headers()
        .get("x-trace-id")
        .and_then(|v| v.to_str().ok())
        .map(TraceId::from_client)
        .unwrap_or_else(TraceId::new)
}

/// Resolves the `X-Session` header and sets up trace context.
///
/// Never rejects by itself: handlers that need a user call [`require_auth`].
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Response {
    let trace_id = extract_or_generate_trace_id(&req);

    match resolve_session(&state, &req) {
        Ok(username) => {
            req.extensions_mut().insert(AuthenticatedUser { username });
        }
        Err(err) => {
            req.extensions_mut().insert(SessionRejection(err));
        }
    }

    next.run(req)
        .instrument(tracing::info_span!("request", trace_id = %trace_id))
        .await
}

/// Require a valid session.
pub fn require_auth(req: &Request) -> ApiResult<&AuthenticatedUser> {
    if let Some(user) = req.extensions().get::<AuthenticatedUser>() {
        return Ok(user);
    }

    let err = req
        .extensions()
        .get::<SessionRejection>()
        .map(|rejection| rejection.0.clone())
        .unwrap_or(MetadataError::MissingToken);
    let reason = match err {
        MetadataError::InvalidToken => "invalid",
        _ => "missing",
    };
    SESSIONS_REJECTED.with_label_values(&[reason]).inc();
    tracing::debug!(reason, "Session rejected");
    Err(ApiError::Metadata(err))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{HeaderValue, StatusCode};
    use locker_core::config::AppConfig;
    use locker_metadata::from_config;

    fn state() -> AppState {
        let config = AppConfig::for_testing();
        let store = from_config(&config.files).unwrap();
        AppState::new(config, store)
    }

    fn with_session(value: HeaderValue) -> Request {
        let mut req = Request::new(Body::empty());
        req.headers_mut().insert(SESSION_HEADER, value);
        req
    }

    #[test]
    fn test_trace_id_is_sanitized() {
        let trace = TraceId::from_client("abc\n\u{1b}[31mdef");
        assert_eq!(trace.as_str(), "abc[31mdef");

        let long = "x".repeat(MAX_TRACE_ID_LEN + 10);
        assert_eq!(TraceId::from_client(&long).as_str().len(), MAX_TRACE_ID_LEN);
    }

    #[test]
    fn test_blank_trace_id_is_replaced() {
        let trace = TraceId::from_client("\n\t");
        assert!(Uuid::parse_str(trace.as_str()).is_ok());
    }

    #[test]
    fn test_require_auth_accepts_resolved_user() {
        let mut req = Request::new(Body::empty());
        req.extensions_mut().insert(AuthenticatedUser {
            username: "alice".to_string(),
        });
        assert_eq!(require_auth(&req).unwrap().username, "alice");
    }

    #[test]
    fn test_require_auth_reports_rejection_as_forbidden() {
        let mut req = Request::new(Body::empty());
        req.extensions_mut()
            .insert(SessionRejection(MetadataError::InvalidToken));
        let err = require_auth(&req).unwrap_err();
        assert!(matches!(err, ApiError::Metadata(MetadataError::InvalidToken)));
        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);

        let bare = Request::new(Body::empty());
        assert!(matches!(
            require_auth(&bare),
            Err(ApiError::Metadata(MetadataError::MissingToken))
        ));
    }

    #[test]
    fn test_session_header_classification() {
        let state = state();
        let bare = Request::new(Body::empty());
        assert_eq!(
            resolve_session(&state, &bare),
            Err(MetadataError::MissingToken)
        );
        assert_eq!(
            resolve_session(&state, &with_session(HeaderValue::from_static(""))),
            Err(MetadataError::MissingToken)
        );

        // A supplied but unusable token is invalid, not missing.
        for value in [
            HeaderValue::from_static("   "),
            HeaderValue::from_bytes(b"\xfftoken").unwrap(),
            HeaderValue::from_static("00000000-0000-4000-8000-000000000000"),
        ] {
            assert_eq!(
                resolve_session(&state, &with_session(value)),
                Err(MetadataError::InvalidToken)
            );
        }

        state.accounts.register("alice", "password1").unwrap();
        let user = state.accounts.authenticate("alice", "password1").unwrap();
        let session = state.sessions.create_session(&user).unwrap();
        let padded = format!(" {} ", session.token);
        assert_eq!(
            resolve_session(
                &state,
                &with_session(HeaderValue::from_str(&padded).unwrap())
            ),
            Ok("alice".to_string())
        );
    }
}

//! Account and session endpoints.

use crate::auth::require_auth;
use crate::error::{ApiError, ApiResult};
use crate::metrics::{LOGINS, REGISTRATIONS, record_store_version};
use crate::state::AppState;
use axum::Json;
use axum::extract::{Request, State};
use axum::http::StatusCode;
use locker_metadata::MetadataError;
use serde::{Deserialize, Serialize};

/// Upper bound on a credentials body.
const MAX_CREDENTIALS_BODY_SIZE: usize = 16 * 1024;

/// Body of /register and /login.
#[derive(Deserialize)]
pub struct CredentialsRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Response for a successful login.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
}

/// Response for the authenticated caller.
#[derive(Debug, Serialize)]
pub struct WhoamiResponse {
    pub username: String,
}

async fn read_credentials(req: Request) -> Result<CredentialsRequest, String> {
    let bytes = axum::body::to_bytes(req.into_body(), MAX_CREDENTIALS_BODY_SIZE)
        .await
        .map_err(|e| format!("failed to read body: {e}"))?;
    serde_json::from_slice(&bytes).map_err(|e| format!("invalid JSON: {e}"))
}

/// POST /register - Create an account.
pub async fn register(State(state): State<AppState>, req: Request) -> ApiResult<StatusCode> {
    let body = read_credentials(req).await.map_err(|e| {
        REGISTRATIONS.with_label_values(&["invalid"]).inc();
        ApiError::BadRequest(e)
    })?;

    match state.accounts.register(&body.username, &body.password) {
        Ok(()) => {
            REGISTRATIONS.with_label_values(&["created"]).inc();
            record_store_version(state.store.version());
            Ok(StatusCode::NO_CONTENT)
        }
        Err(e) => {
            let result = match e {
                MetadataError::AlreadyExists(_) => "already_exists",
                _ => "invalid",
            };
            REGISTRATIONS.with_label_values(&[result]).inc();
            Err(e.into())
        }
    }
}

/// POST /login - Exchange credentials for a session token.
pub async fn login(
    State(state): State<AppState>,
    req: Request,
) -> ApiResult<Json<LoginResponse>> {
    let body = read_credentials(req).await.map_err(|e| {
        LOGINS.with_label_values(&["invalid"]).inc();
        ApiError::Forbidden(e)
    })?;

    if body.username.is_empty() || body.password.is_empty() {
        LOGINS.with_label_values(&["invalid"]).inc();
        return Err(ApiError::Forbidden(
            "username or password is blank".to_string(),
        ));
    }

    let user = state
        .accounts
        .authenticate(&body.username, &body.password)
        .inspect_err(|_| LOGINS.with_label_values(&["rejected"]).inc())?;
    let session = state.sessions.create_session(&user)?;
    LOGINS.with_label_values(&["success"]).inc();
    record_store_version(state.store.version());

    Ok(Json(LoginResponse {
        token: session.token,
    }))
}

/// GET /whoami - Name the account behind the session token.
pub async fn whoami(req: Request) -> ApiResult<Json<WhoamiResponse>> {
    let auth = require_auth(&req)?;
    Ok(Json(WhoamiResponse {
        username: auth.username.clone(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::AuthenticatedUser;
    use axum::body::Body;
    use locker_core::config::AppConfig;

    fn state() -> AppState {
        let config = AppConfig::for_testing();
        let store = locker_metadata::from_config(&config.files).unwrap();
        AppState::new(config, store)
    }

    fn json_body(value: &str) -> Request {
        Request::new(Body::from(value.to_string()))
    }

    #[tokio::test]
    async fn test_register_then_login() {
        let state = state();
        let status = register(
            State(state.clone()),
            json_body(r#"{"username":"alice","password":"password1"}"#),
        )
        .await
        .unwrap();
        assert_eq!(status, StatusCode::NO_CONTENT);

        let Json(response) = login(
            State(state.clone()),
            json_body(r#"{"username":"alice","password":"password1"}"#),
        )
        .await
        .unwrap();
        assert_eq!(
            state.sessions.resolve(Some(&response.token)).unwrap(),
            "alice"
        );
    }

    #[tokio::test]
    async fn test_malformed_json_status_differs_by_endpoint() {
        let state = state();
        let err = register(State(state.clone()), json_body("{nope"))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);

        let err = login(State(state), json_body("{nope")).await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_login_with_blank_fields() {
        let err = login(State(state()), json_body(r#"{"username":"alice"}"#))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(err.message(), "username or password is blank");
    }

    #[tokio::test]
    async fn test_whoami_returns_username() {
        let mut req = Request::new(Body::empty());
        req.extensions_mut().insert(AuthenticatedUser {
            username: "alice".to_string(),
        });
        let Json(response) = whoami(req).await.unwrap();
        assert_eq!(response.username, "alice");
    }
}

//! File endpoints. Every route acts on the caller's own files only.

use crate::auth::require_auth;
use crate::error::{ApiError, ApiResult};
use crate::metrics::{
    BYTES_STORED, FILES_DELETED, FILES_STORED, FILES_SUPERSEDED, record_store_version,
};
use crate::state::AppState;
use axum::Json;
use axum::body::Body;
use axum::extract::{Path, Request, State};
use axum::http::header::{CONTENT_LENGTH, CONTENT_TYPE, LOCATION};
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use locker_core::DEFAULT_CONTENT_TYPE;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::Serialize;

/// Bytes escaped in a path segment: everything but RFC 3986 unreserved.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

fn file_location(filename: &str) -> String {
    format!("/files/{}", utf8_percent_encode(filename, PATH_SEGMENT))
}

/// Response for a stored file.
#[derive(Debug, Serialize)]
pub struct StoreFileResponse {
    pub filename: String,
    pub size: usize,
    pub replaced: bool,
    /// Files of the caller removed by this upload.
    pub superseded: Vec<String>,
}

/// PUT /files/{filename} - Store the request body as one of the caller's files.
pub async fn put_file(
    State(state): State<AppState>,
    Path(filename): Path<String>,
    req: Request,
) -> ApiResult<Response> {
    let owner = require_auth(&req)?.username.clone();
    let content_type = req
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);

    let data = axum::body::to_bytes(req.into_body(), state.upload_limit())
        .await
        .map_err(|e| ApiError::BadRequest(format!("failed to read file: {e}")))?;

    let stored = state
        .vault
        .store(&owner, &filename, content_type.as_deref(), data)?;
    FILES_STORED.inc();
    FILES_SUPERSEDED.inc_by(stored.superseded.len() as u64);
    BYTES_STORED.inc_by(stored.size as u64);
    record_store_version(stored.version);

    let location = HeaderValue::from_str(&file_location(&stored.filename))
        .map_err(|e| ApiError::Internal(format!("invalid location header: {e}")))?;
    let body = StoreFileResponse {
        filename: stored.filename,
        size: stored.size,
        replaced: stored.replaced,
        superseded: stored.superseded,
    };
    Ok((StatusCode::OK, [(LOCATION, location)], Json(body)).into_response())
}

/// GET /files/{filename} - Download one of the caller's files.
pub async fn get_file(
    State(state): State<AppState>,
    Path(filename): Path<String>,
    req: Request,
) -> ApiResult<Response> {
    let owner = require_auth(&req)?;
    let file = state.vault.fetch(&owner.username, &filename)?;

    let content_type = HeaderValue::from_bytes(file.content_type.as_bytes())
        .unwrap_or_else(|_| HeaderValue::from_static(DEFAULT_CONTENT_TYPE));
    Ok((
        StatusCode::OK,
        [
            (CONTENT_TYPE, content_type),
            (CONTENT_LENGTH, HeaderValue::from(file.data.len())),
        ],
        Body::from(file.data),
    )
        .into_response())
}

/// DELETE /files/{filename} - Delete one of the caller's files.
pub async fn delete_file(
    State(state): State<AppState>,
    Path(filename): Path<String>,
    req: Request,
) -> ApiResult<StatusCode> {
    let owner = require_auth(&req)?;
    state.vault.remove(&owner.username, &filename)?;
    FILES_DELETED.inc();
    record_store_version(state.store.version());
    Ok(StatusCode::NO_CONTENT)
}

/// GET /files - Names of the caller's files.
pub async fn list_files(
    State(state): State<AppState>,
    req: Request,
) -> ApiResult<Json<Vec<String>>> {
    let owner = require_auth(&req)?;
    Ok(Json(state.vault.list(&owner.username)))
}

//! Directory endpoints: query surface, submissions, imports and moderation.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use handle_directory::{
    ContributorId, DirectoryQuery, DirectoryRecord, ImportSummary, InputFormat, QueryResponse,
    RecordId, Submission, UpsertOutcome,
};
use serde::Deserialize;

use crate::server::app::AppState;
use crate::server::error::ApiError;

/// `GET /api/directory?query=&limit=&mode=&brand=`
pub async fn query_handler(
    State(state): State<AppState>,
    Query(params): Query<DirectoryQuery>,
) -> Result<Json<QueryResponse>, ApiError> {
    let response = state.directory.query(&params).await?;
    Ok(Json(response))
}

/// `POST /api/directory/submissions`
///
/// 201 when a new row was created, 200 when an existing one was updated.
pub async fn submit_handler(
    State(state): State<AppState>,
    Json(submission): Json<Submission>,
) -> Result<(StatusCode, Json<UpsertOutcome>), ApiError> {
    let outcome = state.directory.upsert_with_outcome(submission).await?;
    let status = if outcome.is_created() {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(outcome)))
}

#[derive(Debug, Deserialize)]
pub struct ImportRequest {
    pub text: String,
    #[serde(default)]
    pub format: InputFormat,
    #[serde(default = "ContributorId::nil")]
    pub contributor_id: ContributorId,
}

/// `POST /api/directory/imports`
///
/// Per-line failures are reported in the summary; the request itself succeeds.
pub async fn import_handler(
    State(state): State<AppState>,
    Json(request): Json<ImportRequest>,
) -> Json<ImportSummary> {
    let summary = state
        .directory
        .import_text(&request.text, request.format, request.contributor_id)
        .await;
    Json(summary)
}

#[derive(Debug, Deserialize)]
pub struct VerifiedRequest {
    pub verified: bool,
}

/// `PUT /api/directory/records/:id/verified`
pub async fn set_verified_handler(
    State(state): State<AppState>,
    Path(id): Path<RecordId>,
    Json(request): Json<VerifiedRequest>,
) -> Result<Json<DirectoryRecord>, ApiError> {
    let record = state.directory.set_verified(id, request.verified).await?;
    Ok(Json(record))
}

/// `DELETE /api/directory/records/:id`
pub async fn delete_record(
    State(state): State<AppState>,
    Path(id): Path<RecordId>,
) -> Result<StatusCode, ApiError> {
    state.directory.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

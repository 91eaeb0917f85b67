//! REST API handlers using axum

use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::AppState;
use crate::error::{Error, Result};
use crate::filter::{self, FilterState};
use crate::record::{StudentPayload, StudentRecord};
use crate::stats::Summary;
use crate::storage::Storage;

/// Optional filter parameters for `GET /students`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    /// Free-text search.
    pub search: Option<String>,
    /// Program selection, or `all`.
    pub program: Option<String>,
    /// Gender selection, or `all`.
    pub gender: Option<String>,
    /// Year level selection, or `all`.
    pub year_level: Option<String>,
    /// University selection, or `all`.
    pub university: Option<String>,
}

impl From<ListQuery> for FilterState {
    fn from(query: ListQuery) -> Self {
        Self {
            search: query.search.unwrap_or_default(),
            program: query.program.into(),
            gender: query.gender.into(),
            year_level: query.year_level.into(),
            university: query.university.into(),
        }
    }
}

/// Body of a successful delete.
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    /// Confirmation text.
    pub message: String,
    /// Id of the removed record.
    pub id: String,
}

/// Body of `GET /health`.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// `ok`, or `degraded` when the store cannot be read.
    pub status: &'static str,
    /// RFC 3339 time of the check.
    pub timestamp: String,
    /// Number of stored records, when readable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub students: Option<usize>,
}

/// GET /students - list records, optionally filtered
pub async fn list_students(
    State(state): State<AppState>,
    query: std::result::Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<Vec<StudentRecord>>> {
    let Query(query) = query.map_err(|rejection| Error::validation(rejection.body_text()))?;
    let filter_state = FilterState::from(query);

    let records = with_storage(&state, Storage::list).await?;
    if filter_state.is_unfiltered() {
        return Ok(Json(records));
    }
    let visible = filter::filter(&records, &filter_state)
        .into_iter()
        .cloned()
        .collect();
    Ok(Json(visible))
}

/// GET /students/:id - fetch one record
pub async fn get_student(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<StudentRecord>> {
    let record = with_storage(&state, move |s| s.get(&id)).await?;
    Ok(Json(record))
}

/// POST /students - create a record
pub async fn create_student(
    State(state): State<AppState>,
    payload: std::result::Result<Json<StudentPayload>, JsonRejection>,
) -> Result<(StatusCode, Json<StudentRecord>)> {
    let Json(payload) = payload.map_err(|rejection| Error::validation(rejection.body_text()))?;
    let record = payload.into_record()?;
    debug!(id = %record.id, "REST create request");

    let stored = with_storage(&state, move |s| s.add(record)).await?;
    Ok((StatusCode::CREATED, Json(stored)))
}

/// PUT /students/:id - replace a record
pub async fn update_student(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: std::result::Result<Json<StudentPayload>, JsonRejection>,
) -> Result<Json<StudentRecord>> {
    let Json(payload) = payload.map_err(|rejection| Error::validation(rejection.body_text()))?;
    let record = payload.into_record_with_id(&id)?;
    debug!(id = %id, "REST update request");

    let stored = with_storage(&state, move |s| s.update(&id, record)).await?;
    Ok(Json(stored))
}

/// DELETE /students/:id - remove a record
pub async fn delete_student(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>> {
    debug!(id = %id, "REST delete request");
    let removed = with_storage(&state, move |s| s.remove(&id)).await?;
    Ok(Json(DeleteResponse {
        message: "Student deleted successfully".to_string(),
        id: removed.id,
    }))
}

/// GET /students/stats/summary - aggregate counts
pub async fn summary(State(state): State<AppState>) -> Result<Json<Summary>> {
    let summary = with_storage(&state, Storage::summary).await?;
    Ok(Json(summary))
}

/// GET /health - liveness plus a store read check
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let (status, students) = match with_storage(&state, Storage::count).await {
        Ok(count) => ("ok", Some(count)),
        Err(e) => {
            warn!(error = %e, "Health check could not read student data");
            ("degraded", None)
        }
    };
    Json(HealthResponse {
        status,
        timestamp: chrono::Utc::now().to_rfc3339(),
        students,
    })
}

/// Fallback for unknown API paths.
pub async fn route_not_found() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({ "error": "route not found" })),
    )
}

/// Run a blocking store operation off the async workers.
async fn with_storage<T, F>(state: &AppState, op: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce(&Storage) -> Result<T> + Send + 'static,
{
    let storage = Arc::clone(&state.storage);
    tokio::task::spawn_blocking(move || op(&storage))
        .await
        .map_err(|e| Error::internal(format!("storage task failed: {e}")))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::Selection;

    #[test]
    fn test_list_query_defaults_to_unfiltered() {
        let state = FilterState::from(ListQuery::default());
        assert!(state.is_unfiltered());
    }

    #[test]
    fn test_list_query_into_filter_state() {
        let query = ListQuery {
            search: Some("ada".to_string()),
            program: Some("CS".to_string()),
            gender: Some("all".to_string()),
            year_level: None,
            university: Some("State".to_string()),
        };
        let state = FilterState::from(query);
        assert_eq!(state.search, "ada");
        assert_eq!(state.program, Selection::Only("CS".to_string()));
        assert_eq!(state.gender, Selection::All);
        assert_eq!(state.year_level, Selection::All);
        assert_eq!(state.university, Selection::Only("State".to_string()));
    }

    #[test]
    fn test_health_response_omits_missing_count() {
        let body = HealthResponse {
            status: "degraded",
            timestamp: "2024-01-01T00:00:00+00:00".to_string(),
            students: None,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["status"], "degraded");
        assert!(json.get("students").is_none());
    }
}

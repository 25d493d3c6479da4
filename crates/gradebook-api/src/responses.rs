//! Handlers for `/responses` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/responses` | All responses |
//! | `GET`    | `/responses/:id` | 404 if not found |
//! | `PATCH`  | `/responses/:id` | Body: [`ScriptResponsePatch`] |
//! | `DELETE` | `/responses/:id` | 204 |
//! | `POST`   | `/responses/:id/finish` | Body (optional): `{"finished_at"?: ms}` |
//! | `GET`    | `/responses/:id/tasks/:task_id` | The answer for that task; 404 if not started |
//! | `POST`   | `/responses/:id/tasks/:task_id/start` | Idempotent |
//! | `PUT`    | `/responses/:id/tasks/:task_id/grade` | Body: `{"grade": "MA" \| null}` |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
};
use chrono::{DateTime, Utc};
use gradebook_core::{
  answer::AnswerRecord,
  response::{ScriptResponsePatch, ScriptResponseRecord},
  store::GradebookStore,
};
use serde::Deserialize;

use crate::{error::ApiError, extract::ApiBody};

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /responses`
pub async fn list<S>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<ScriptResponseRecord>>, ApiError>
where
  S: GradebookStore,
{
  let responses = store.list_responses().await.map_err(ApiError::store)?;
  Ok(Json(responses.iter().map(|r| r.to_record()).collect()))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /responses/:id`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<String>,
) -> Result<Json<ScriptResponseRecord>, ApiError>
where
  S: GradebookStore,
{
  let response = store
    .get_response(id.clone())
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("Response {id} not found")))?;
  Ok(Json(response.to_record()))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `PATCH /responses/:id`
pub async fn update<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<String>,
  ApiBody(patch): ApiBody<ScriptResponsePatch>,
) -> Result<Json<ScriptResponseRecord>, ApiError>
where
  S: GradebookStore,
{
  let response = store
    .update_response(id, patch)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(response.to_record()))
}

// ─── Remove ───────────────────────────────────────────────────────────────────

/// `DELETE /responses/:id`
pub async fn remove<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<String>,
) -> Result<StatusCode, ApiError>
where
  S: GradebookStore,
{
  if store.remove_response(id.clone()).await.map_err(ApiError::store)? {
    Ok(StatusCode::NO_CONTENT)
  } else {
    Err(ApiError::NotFound(format!("Response {id} not found")))
  }
}

// ─── Finish ───────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct FinishBody {
  #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
  pub finished_at: Option<DateTime<Utc>>,
}

/// `POST /responses/:id/finish` — `finished_at` defaults to now, and the body
/// may be left out entirely.
pub async fn finish<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<String>,
  body: Option<ApiBody<FinishBody>>,
) -> Result<Json<ScriptResponseRecord>, ApiError>
where
  S: GradebookStore,
{
  let body = body.map(|ApiBody(body)| body).unwrap_or_default();
  let response = store
    .finish_response(id, body.finished_at)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(response.to_record()))
}

// ─── Task answers ─────────────────────────────────────────────────────────────

/// `GET /responses/:id/tasks/:task_id`
pub async fn get_answer<S>(
  State(store): State<Arc<S>>,
  Path((id, task_id)): Path<(String, String)>,
) -> Result<Json<AnswerRecord>, ApiError>
where
  S: GradebookStore,
{
  let response = store
    .get_response(id.clone())
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("Response {id} not found")))?;
  let answer = response
    .find_answer_by_task_id(&task_id)
    .ok_or_else(|| ApiError::NotFound(format!("Task {task_id} not found")))?;
  Ok(Json(answer.to_record()))
}

/// `POST /responses/:id/tasks/:task_id/start`
pub async fn start_task<S>(
  State(store): State<Arc<S>>,
  Path((id, task_id)): Path<(String, String)>,
) -> Result<Json<AnswerRecord>, ApiError>
where
  S: GradebookStore,
{
  let answer = store
    .start_task(id, task_id)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(answer.to_record()))
}

#[derive(Debug, Deserialize)]
pub struct GradeBody {
  pub grade: Option<String>,
}

/// `PUT /responses/:id/tasks/:task_id/grade` — `null` clears the grade.
pub async fn grade_task<S>(
  State(store): State<Arc<S>>,
  Path((id, task_id)): Path<(String, String)>,
  ApiBody(body): ApiBody<GradeBody>,
) -> Result<Json<AnswerRecord>, ApiError>
where
  S: GradebookStore,
{
  let answer = store
    .grade_task(id, task_id, body.grade)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(answer.to_record()))
}

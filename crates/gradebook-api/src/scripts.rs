//! Handlers for `/scripts` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/scripts` | All scripts, registration order |
//! | `POST`   | `/scripts` | Body: [`ScriptRecord`]; 201, 409 on id clash, 400 on duplicate task ids |
//! | `GET`    | `/scripts/:id` | 404 if not found |
//! | `DELETE` | `/scripts/:id` | 204; 404 if not found |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use gradebook_core::{store::GradebookStore, task::ScriptRecord};

use crate::{error::ApiError, extract::ApiBody};

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /scripts`
pub async fn list<S>(State(store): State<Arc<S>>) -> Result<Json<Vec<ScriptRecord>>, ApiError>
where
  S: GradebookStore,
{
  let scripts = store.list_scripts().await.map_err(ApiError::store)?;
  Ok(Json(scripts.iter().map(|s| s.to_record()).collect()))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /scripts` — returns 201 + the stored script.
pub async fn create<S>(
  State(store): State<Arc<S>>,
  ApiBody(body): ApiBody<ScriptRecord>,
) -> Result<impl IntoResponse, ApiError>
where
  S: GradebookStore,
{
  let script = store.add_script(body).await.map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(script.to_record())))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /scripts/:id`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<String>,
) -> Result<Json<ScriptRecord>, ApiError>
where
  S: GradebookStore,
{
  let script = store
    .get_script(id.clone())
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("Script {id} not found")))?;
  Ok(Json(script.to_record()))
}

// ─── Remove ───────────────────────────────────────────────────────────────────

/// `DELETE /scripts/:id`
pub async fn remove<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<String>,
) -> Result<StatusCode, ApiError>
where
  S: GradebookStore,
{
  if store.remove_script(id.clone()).await.map_err(ApiError::store)? {
    Ok(StatusCode::NO_CONTENT)
  } else {
    Err(ApiError::NotFound(format!("Script {id} not found")))
  }
}

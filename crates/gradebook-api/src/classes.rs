//! Handlers for `/classes` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/classes` | All classes with their enrollments |
//! | `POST` | `/classes` | Body: `{"topic","semester","year"}`; id is `topic-year-semester` |
//! | `GET`  | `/classes/:id` | 404 if not found |
//! | `POST` | `/classes/:id/enrollments` | Body: `{"studentCPF"}` |
//! | `POST` | `/classes/:id/responses` | Body: a script response; resolved against this class |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use gradebook_core::{
  response::ScriptResponseRecord,
  roster::{Class, NewClass},
  store::GradebookStore,
};
use serde::Deserialize;

use crate::{error::ApiError, extract::ApiBody};

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /classes`
pub async fn list<S>(State(store): State<Arc<S>>) -> Result<Json<Vec<Class>>, ApiError>
where
  S: GradebookStore,
{
  let classes = store.list_classes().await.map_err(ApiError::store)?;
  Ok(Json(classes))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /classes`
pub async fn create<S>(
  State(store): State<Arc<S>>,
  ApiBody(body): ApiBody<NewClass>,
) -> Result<impl IntoResponse, ApiError>
where
  S: GradebookStore,
{
  let class = store.add_class(body).await.map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(class)))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /classes/:id`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<String>,
) -> Result<Json<Class>, ApiError>
where
  S: GradebookStore,
{
  let class = store
    .get_class(id.clone())
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("Class {id} not found")))?;
  Ok(Json(class))
}

// ─── Enroll ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct EnrollBody {
  #[serde(rename = "studentCPF")]
  pub student_cpf: String,
}

/// `POST /classes/:id/enrollments` — body: `{"studentCPF":"..."}`
pub async fn enroll<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<String>,
  ApiBody(body): ApiBody<EnrollBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: GradebookStore,
{
  let enrollment = store
    .enroll(id, body.student_cpf)
    .await
    .map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(enrollment)))
}

// ─── Record a response ────────────────────────────────────────────────────────

/// `POST /classes/:id/responses` — body is a serialized script response; an
/// empty or missing `id` gets a generated one. Dangling script, student or
/// task references are a 404 naming the missing id.
pub async fn record_response<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<String>,
  ApiBody(body): ApiBody<ScriptResponseRecord>,
) -> Result<impl IntoResponse, ApiError>
where
  S: GradebookStore,
{
  let response = store
    .record_response(id, body)
    .await
    .map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(response.to_record())))
}

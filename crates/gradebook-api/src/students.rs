//! Handlers for `/students` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/students` | All students |
//! | `POST`   | `/students` | Body: `{"name","cpf","email"}`; 201, 400 if invalid |
//! | `GET`    | `/students/:cpf` | CPF with or without separators |
//! | `PATCH`  | `/students/:cpf` | Body: `{"name"?, "email"?}` |
//! | `DELETE` | `/students/:cpf` | Also drops the student's enrollments |
//! | `GET`    | `/students/:cpf/responses` | 404 if the student is unknown |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use gradebook_core::{
  response::ScriptResponseRecord,
  roster::{Student, StudentPatch, StudentRecord},
  store::GradebookStore,
};

use crate::{error::ApiError, extract::ApiBody};

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /students`
pub async fn list<S>(State(store): State<Arc<S>>) -> Result<Json<Vec<Student>>, ApiError>
where
  S: GradebookStore,
{
  let students = store.list_students().await.map_err(ApiError::store)?;
  Ok(Json(students))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /students` — the record is validated here so a bad CPF or email is a
/// 400 with the domain message rather than a body-parse rejection.
pub async fn create<S>(
  State(store): State<Arc<S>>,
  ApiBody(body): ApiBody<StudentRecord>,
) -> Result<impl IntoResponse, ApiError>
where
  S: GradebookStore,
{
  let student = Student::try_from(body).map_err(ApiError::store)?;
  let student = store.add_student(student).await.map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(student)))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /students/:cpf`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  Path(cpf): Path<String>,
) -> Result<Json<Student>, ApiError>
where
  S: GradebookStore,
{
  let student = store
    .get_student(cpf.clone())
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("Student {cpf} not found")))?;
  Ok(Json(student))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `PATCH /students/:cpf`
pub async fn update<S>(
  State(store): State<Arc<S>>,
  Path(cpf): Path<String>,
  ApiBody(patch): ApiBody<StudentPatch>,
) -> Result<Json<Student>, ApiError>
where
  S: GradebookStore,
{
  let student = store.update_student(cpf, patch).await.map_err(ApiError::store)?;
  Ok(Json(student))
}

// ─── Remove ───────────────────────────────────────────────────────────────────

/// `DELETE /students/:cpf`
pub async fn remove<S>(
  State(store): State<Arc<S>>,
  Path(cpf): Path<String>,
) -> Result<StatusCode, ApiError>
where
  S: GradebookStore,
{
  if store.remove_student(cpf.clone()).await.map_err(ApiError::store)? {
    Ok(StatusCode::NO_CONTENT)
  } else {
    Err(ApiError::NotFound(format!("Student {cpf} not found")))
  }
}

// ─── Responses ────────────────────────────────────────────────────────────────

/// `GET /students/:cpf/responses`
pub async fn responses<S>(
  State(store): State<Arc<S>>,
  Path(cpf): Path<String>,
) -> Result<Json<Vec<ScriptResponseRecord>>, ApiError>
where
  S: GradebookStore,
{
  let responses = store
    .responses_for_student(cpf)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(responses.iter().map(|r| r.to_record()).collect()))
}

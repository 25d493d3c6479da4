//! Router tests against an in-memory store.

use std::sync::Arc;

use axum::{
  Router,
  body::Body,
  http::{Request, StatusCode, header},
};
use gradebook_store_memory::MemoryStore;
use serde_json::{Value, json};
use tower::ServiceExt as _;

use crate::api_router;

const CPF: &str = "15029035478";
const CLASS: &str = "Math-2025-1";

fn app(store: &MemoryStore) -> Router { api_router(Arc::new(store.clone())) }

async fn call(
  store: &MemoryStore,
  method: &str,
  uri: &str,
  body: Option<Value>,
) -> (StatusCode, Value) {
  let mut builder = Request::builder().method(method).uri(uri);
  let body = match body {
    Some(v) => {
      builder = builder.header(header::CONTENT_TYPE, "application/json");
      Body::from(v.to_string())
    }
    None => Body::empty(),
  };
  let resp = app(store).oneshot(builder.body(body).unwrap()).await.unwrap();
  let status = resp.status();
  let bytes = axum::body::to_bytes(resp.into_body(), 1024 * 1024).await.unwrap();
  let json = if bytes.is_empty() {
    Value::Null
  } else {
    serde_json::from_slice(&bytes).unwrap()
  };
  (status, json)
}

/// Script `S1` (tasks `T1`, `T2`), student Alice, class `Math-2025-1` with
/// Alice enrolled.
async fn seeded() -> MemoryStore {
  let store = MemoryStore::new();
  let steps = [
    (
      "/scripts",
      json!({
        "id": "S1", "title": "Fractions",
        "tasks": [{ "id": "T1", "statement": "Simplify 4/8" }, { "id": "T2", "statement": "Add" }],
      }),
    ),
    ("/students", json!({ "name": "Alice", "cpf": CPF, "email": "alice@gmail.com" })),
    ("/classes", json!({ "topic": "Math", "semester": 1, "year": 2025 })),
    ("/classes/Math-2025-1/enrollments", json!({ "studentCPF": CPF })),
  ];
  for (uri, body) in steps {
    let (status, body) = call(&store, "POST", uri, Some(body)).await;
    assert_eq!(status, StatusCode::CREATED, "{uri}: {body}");
  }
  store
}

async fn seeded_with_response() -> MemoryStore {
  let store = seeded().await;
  let (status, _) = call(
    &store,
    "POST",
    &format!("/classes/{CLASS}/responses"),
    Some(json!({ "id": "R1", "scriptId": "S1", "studentCPF": CPF, "started_at": 1000 })),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED);
  store
}

// ── Scripts & students ──────────────────────────────────────────────────────

#[tokio::test]
async fn list_is_empty_without_data() {
  let store = MemoryStore::new();
  let (status, body) = call(&store, "GET", "/responses", None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body, json!([]));
}

#[tokio::test]
async fn script_round_trips_through_api() {
  let store = seeded().await;
  let (status, body) = call(&store, "GET", "/scripts/S1", None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["tasks"][1]["id"], "T2");

  let (status, body) = call(&store, "GET", "/scripts/S9", None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  assert_eq!(body["error"], "Script S9 not found");
}

#[tokio::test]
async fn duplicate_task_ids_are_bad_request() {
  let store = MemoryStore::new();
  let (status, _) = call(
    &store,
    "POST",
    "/scripts",
    Some(json!({ "id": "S1", "tasks": [{ "id": "T1" }, { "id": "T1" }] })),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn invalid_student_is_bad_request() {
  let store = MemoryStore::new();
  let (status, body) = call(
    &store,
    "POST",
    "/students",
    Some(json!({ "name": "Bob", "cpf": CPF, "email": "user@domain.c" })),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert!(body["error"].as_str().unwrap().contains("email"));
}

#[tokio::test]
async fn unknown_student_responses_is_not_found() {
  let store = seeded().await;
  let (status, body) = call(&store, "GET", "/students/99999999999/responses", None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  assert_eq!(body["error"], "Student 99999999999 not found");
}

// ── Responses ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn student_responses_are_listed() {
  let store = seeded_with_response().await;
  let (status, body) = call(&store, "GET", &format!("/students/{CPF}/responses"), None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body[0]["id"], "R1");
  assert_eq!(body[0]["status"], "in_progress");
}

#[tokio::test]
async fn dangling_script_is_not_found_and_named() {
  let store = seeded().await;
  let (status, body) = call(
    &store,
    "POST",
    &format!("/classes/{CLASS}/responses"),
    Some(json!({ "scriptId": "missing", "studentCPF": CPF })),
  )
  .await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  assert!(body["error"].as_str().unwrap().contains("missing"));
}

#[tokio::test]
async fn dangling_task_is_not_found_and_nothing_is_stored() {
  let store = seeded().await;
  let (status, body) = call(
    &store,
    "POST",
    &format!("/classes/{CLASS}/responses"),
    Some(json!({
      "id": "R1", "scriptId": "S1", "studentCPF": CPF,
      "answers": [{ "id": "R1-T9", "taskId": "T9", "started_at": 1 }],
    })),
  )
  .await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  assert!(body["error"].as_str().unwrap().contains("T9"));

  let (_, list) = call(&store, "GET", "/responses", None).await;
  assert_eq!(list, json!([]));
}

#[tokio::test]
async fn grading_flow() {
  let store = seeded_with_response().await;

  let (status, answer) = call(&store, "POST", "/responses/R1/tasks/T1/start", None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(answer["id"], "R1-T1");
  assert!(answer.get("grade").is_none());

  let (status, again) = call(&store, "POST", "/responses/R1/tasks/T1/start", None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(again["started_at"], answer["started_at"]);

  let (status, graded) = call(
    &store,
    "PUT",
    "/responses/R1/tasks/T1/grade",
    Some(json!({ "grade": "MA" })),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(graded["grade"], "MA");

  let (status, body) = call(
    &store,
    "PUT",
    "/responses/R1/tasks/T1/grade",
    Some(json!({ "grade": "BOGUS" })),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert!(body["error"].as_str().unwrap().contains("Invalid grade value"));

  let (status, fetched) = call(&store, "GET", "/responses/R1/tasks/T1", None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(fetched["grade"], "MA");

  let (status, body) = call(&store, "GET", "/responses/R1/tasks/T2", None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  assert_eq!(body["error"], "Task T2 not found");
}

#[tokio::test]
async fn finish_sets_status_and_timestamp() {
  let store = seeded_with_response().await;
  let (status, body) = call(
    &store,
    "POST",
    "/responses/R1/finish",
    Some(json!({ "finished_at": 5000 })),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["status"], "finished");
  assert_eq!(body["finished_at"], 5000);

  let (status, graded) = call(
    &store,
    "PUT",
    "/responses/R1/tasks/T2/grade",
    Some(json!({ "grade": "MANA" })),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(graded["id"], "R1-T2");
  assert_eq!(graded["grade"], "MANA");
}

#[tokio::test]
async fn finish_without_body_stamps_now() {
  let store = seeded_with_response().await;
  let (status, body) = call(&store, "POST", "/responses/R1/finish", None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["status"], "finished");
  assert!(body["finished_at"].as_i64().unwrap() >= 1000);
}

#[tokio::test]
async fn malformed_body_is_json_bad_request() {
  let store = seeded_with_response().await;

  let (status, body) = call(
    &store,
    "POST",
    "/responses/R1/finish",
    Some(json!({ "finished_at": "soon" })),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert!(body["error"].is_string());

  let resp = app(&store)
    .oneshot(
      Request::builder()
        .method("POST")
        .uri("/scripts")
        .body(Body::from(r#"{"id":"S2"}"#))
        .unwrap(),
    )
    .await
    .unwrap();
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  let bytes = axum::body::to_bytes(resp.into_body(), 1024 * 1024).await.unwrap();
  let body: Value = serde_json::from_slice(&bytes).unwrap();
  assert!(body["error"].as_str().unwrap().contains("Content-Type"));

  let (_, stored) = call(&store, "GET", "/responses/R1", None).await;
  assert_eq!(stored["status"], "in_progress");
}

#[tokio::test]
async fn patch_response_is_merge() {
  let store = seeded_with_response().await;
  call(&store, "POST", "/responses/R1/tasks/T1/start", None).await;

  let (status, body) = call(
    &store,
    "PATCH",
    "/responses/R1",
    Some(json!({ "status": "finished" })),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["status"], "finished");
  assert_eq!(body["answers"].as_array().unwrap().len(), 1);
  assert_eq!(body["started_at"], 1000);
}

#[tokio::test]
async fn delete_response() {
  let store = seeded_with_response().await;
  let (status, _) = call(&store, "DELETE", "/responses/R1", None).await;
  assert_eq!(status, StatusCode::NO_CONTENT);
  let (status, _) = call(&store, "GET", "/responses/R1", None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

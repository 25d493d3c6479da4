//! JSON REST API for the gradebook.
//!
//! Exposes an axum [`Router`] backed by any
//! [`gradebook_core::store::GradebookStore`]. Handlers only translate between
//! HTTP and store calls; every rule lives in the core.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", gradebook_api::api_router(store.clone()))
//! ```

pub mod classes;
pub mod error;
pub mod extract;
pub mod responses;
pub mod scripts;
pub mod students;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post, put},
};
use gradebook_core::store::GradebookStore;

pub use error::ApiError;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: GradebookStore + 'static,
{
  Router::new()
    // Scripts
    .route("/scripts", get(scripts::list::<S>).post(scripts::create::<S>))
    .route("/scripts/{id}", get(scripts::get_one::<S>).delete(scripts::remove::<S>))
    // Students
    .route("/students", get(students::list::<S>).post(students::create::<S>))
    .route(
      "/students/{cpf}",
      get(students::get_one::<S>)
        .patch(students::update::<S>)
        .delete(students::remove::<S>),
    )
    .route("/students/{cpf}/responses", get(students::responses::<S>))
    // Classes
    .route("/classes", get(classes::list::<S>).post(classes::create::<S>))
    .route("/classes/{id}", get(classes::get_one::<S>))
    .route("/classes/{id}/enrollments", post(classes::enroll::<S>))
    .route("/classes/{id}/responses", post(classes::record_response::<S>))
    // Responses
    .route("/responses", get(responses::list::<S>))
    .route(
      "/responses/{id}",
      get(responses::get_one::<S>)
        .patch(responses::update::<S>)
        .delete(responses::remove::<S>),
    )
    .route("/responses/{id}/finish", post(responses::finish::<S>))
    .route("/responses/{id}/tasks/{task_id}", get(responses::get_answer::<S>))
    .route("/responses/{id}/tasks/{task_id}/start", post(responses::start_task::<S>))
    .route("/responses/{id}/tasks/{task_id}/grade", put(responses::grade_task::<S>))
    .with_state(store)
}

#[cfg(test)]
mod tests;

//! The `GradebookStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `gradebook-store-memory`).
//! Higher layers (`gradebook-api`) depend on this abstraction, not on any
//! concrete backend.
//!
//! Every method is atomic with respect to the others: a call that fails leaves
//! the store exactly as it found it, and no caller observes a half-applied
//! change.

use std::{future::Future, sync::Arc};

use chrono::{DateTime, Utc};

use crate::{
  FailureKind,
  answer::Answer,
  response::{ScriptResponse, ScriptResponsePatch, ScriptResponseRecord},
  roster::{Class, Enrollment, NewClass, Student, StudentPatch},
  task::{Script, ScriptRecord},
};

// ─── Errors ──────────────────────────────────────────────────────────────────

/// Error bound for store backends: anything that can say what kind of failure
/// it is.
pub trait StoreError: std::error::Error + Send + Sync + 'static {
  fn kind(&self) -> FailureKind;
}

impl StoreError for crate::Error {
  fn kind(&self) -> FailureKind { crate::Error::kind(self) }
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a gradebook store backend.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait GradebookStore: Send + Sync {
  type Error: StoreError;

  // ── Scripts ───────────────────────────────────────────────────────────

  /// Build and register a script. Fails if the id is taken or the record
  /// holds duplicate task ids.
  fn add_script(
    &self,
    record: ScriptRecord,
  ) -> impl Future<Output = Result<Arc<Script>, Self::Error>> + Send + '_;

  fn get_script(
    &self,
    id: String,
  ) -> impl Future<Output = Result<Option<Arc<Script>>, Self::Error>> + Send + '_;

  fn list_scripts(
    &self,
  ) -> impl Future<Output = Result<Vec<Arc<Script>>, Self::Error>> + Send + '_;

  /// Unregister a script. Responses that already hold it keep their handle.
  /// Returns `false` if there was nothing to remove.
  fn remove_script(
    &self,
    id: String,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Students ──────────────────────────────────────────────────────────

  fn add_student(
    &self,
    student: Student,
  ) -> impl Future<Output = Result<Student, Self::Error>> + Send + '_;

  fn get_student(
    &self,
    cpf: String,
  ) -> impl Future<Output = Result<Option<Student>, Self::Error>> + Send + '_;

  fn list_students(
    &self,
  ) -> impl Future<Output = Result<Vec<Student>, Self::Error>> + Send + '_;

  /// Merge-patch a student; the change is mirrored into their enrollments.
  fn update_student(
    &self,
    cpf: String,
    patch: StudentPatch,
  ) -> impl Future<Output = Result<Student, Self::Error>> + Send + '_;

  /// Remove a student and every enrollment they hold.
  fn remove_student(
    &self,
    cpf: String,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Classes ───────────────────────────────────────────────────────────

  fn add_class(
    &self,
    input: NewClass,
  ) -> impl Future<Output = Result<Class, Self::Error>> + Send + '_;

  fn get_class(
    &self,
    id: String,
  ) -> impl Future<Output = Result<Option<Class>, Self::Error>> + Send + '_;

  fn list_classes(
    &self,
  ) -> impl Future<Output = Result<Vec<Class>, Self::Error>> + Send + '_;

  /// Enroll a registered student in a registered class.
  fn enroll(
    &self,
    class_id: String,
    cpf: String,
  ) -> impl Future<Output = Result<Enrollment, Self::Error>> + Send + '_;

  // ── Responses ─────────────────────────────────────────────────────────

  /// Reconstruct a response from `record` against the registered scripts and
  /// the enrollments of `class_id`, then register it.
  fn record_response(
    &self,
    class_id: String,
    record: ScriptResponseRecord,
  ) -> impl Future<Output = Result<ScriptResponse, Self::Error>> + Send + '_;

  fn get_response(
    &self,
    id: String,
  ) -> impl Future<Output = Result<Option<ScriptResponse>, Self::Error>> + Send + '_;

  fn list_responses(
    &self,
  ) -> impl Future<Output = Result<Vec<ScriptResponse>, Self::Error>> + Send + '_;

  /// All responses by one student. Fails if the student is not registered.
  fn responses_for_student(
    &self,
    cpf: String,
  ) -> impl Future<Output = Result<Vec<ScriptResponse>, Self::Error>> + Send + '_;

  fn remove_response(
    &self,
    id: String,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// `addOrGetAnswer` on a stored response.
  fn start_task(
    &self,
    response_id: String,
    task_id: String,
  ) -> impl Future<Output = Result<Answer, Self::Error>> + Send + '_;

  /// Validate `grade` and set it on the answer for `task_id`; `None` clears.
  fn grade_task(
    &self,
    response_id: String,
    task_id: String,
    grade: Option<String>,
  ) -> impl Future<Output = Result<Answer, Self::Error>> + Send + '_;

  fn finish_response(
    &self,
    response_id: String,
    at: Option<DateTime<Utc>>,
  ) -> impl Future<Output = Result<ScriptResponse, Self::Error>> + Send + '_;

  fn update_response(
    &self,
    response_id: String,
    patch: ScriptResponsePatch,
  ) -> impl Future<Output = Result<ScriptResponse, Self::Error>> + Send + '_;
}

//! Error types for `gradebook-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("Invalid grade value: {0:?}")]
  InvalidGrade(String),

  #[error("Script {0} not found")]
  ScriptNotFound(String),

  #[error("Enrollment for CPF {0} not found")]
  EnrollmentNotFound(String),

  #[error("Task {0} not found")]
  TaskNotFound(String),

  #[error("task id must not be empty")]
  EmptyTaskId,

  #[error("duplicate task id {task_id:?} in script {script_id:?}")]
  DuplicateTask { script_id: String, task_id: String },

  #[error("duplicate answer for task {0:?}")]
  DuplicateAnswer(String),

  #[error("student name must not be empty")]
  InvalidName,

  #[error("invalid CPF: {0:?}")]
  InvalidCpf(String),

  #[error("invalid email: {0:?}")]
  InvalidEmail(String),

  #[error("student {cpf} is already enrolled in class {class_id}")]
  AlreadyEnrolled { class_id: String, cpf: String },
}

/// Coarse classification used by outer layers to pick a response status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
  /// The input itself is malformed or violates a domain rule.
  Invalid,
  /// A referenced entity does not exist.
  NotFound,
  /// The operation clashes with existing state.
  Conflict,
}

impl Error {
  pub fn kind(&self) -> FailureKind {
    match self {
      Self::InvalidGrade(_)
      | Self::EmptyTaskId
      | Self::DuplicateTask { .. }
      | Self::DuplicateAnswer(_)
      | Self::InvalidName
      | Self::InvalidCpf(_)
      | Self::InvalidEmail(_) => FailureKind::Invalid,
      Self::ScriptNotFound(_)
      | Self::EnrollmentNotFound(_)
      | Self::TaskNotFound(_) => FailureKind::NotFound,
      Self::AlreadyEnrolled { .. } => FailureKind::Conflict,
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

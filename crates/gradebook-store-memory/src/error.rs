//! Error type for `gradebook-store-memory`.

use gradebook_core::{FailureKind, store::StoreError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error(transparent)]
  Core(#[from] gradebook_core::Error),

  #[error("Script {0} already exists")]
  ScriptExists(String),

  #[error("Student {0} already exists")]
  StudentExists(String),

  #[error("Class {0} already exists")]
  ClassExists(String),

  #[error("Response {0} already exists")]
  ResponseExists(String),

  #[error("Student {0} not found")]
  StudentNotFound(String),

  #[error("Class {0} not found")]
  ClassNotFound(String),

  #[error("Response {0} not found")]
  ResponseNotFound(String),
}

impl StoreError for Error {
  fn kind(&self) -> FailureKind {
    match self {
      Self::Core(e) => e.kind(),
      Self::ScriptExists(_)
      | Self::StudentExists(_)
      | Self::ClassExists(_)
      | Self::ResponseExists(_) => FailureKind::Conflict,
      Self::StudentNotFound(_)
      | Self::ClassNotFound(_)
      | Self::ResponseNotFound(_) => FailureKind::NotFound,
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

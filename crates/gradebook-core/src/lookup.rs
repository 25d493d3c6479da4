//! Synchronous lookups the reconstruction protocol resolves references
//! against.
//!
//! Implemented by [`Class`](crate::roster::Class) for enrollments and by the
//! registries of a store backend for scripts.

use std::sync::Arc;

use crate::{roster::Enrollment, task::Script};

/// Something that can resolve a script id to the shared script.
pub trait ScriptLookup {
  fn find_script(&self, id: &str) -> Option<Arc<Script>>;
}

/// Something that can resolve a student CPF to an enrollment.
pub trait EnrollmentLookup {
  fn find_enrollment_by_student_cpf(&self, cpf: &str) -> Option<&Enrollment>;
}

impl ScriptLookup for [Arc<Script>] {
  fn find_script(&self, id: &str) -> Option<Arc<Script>> {
    self.iter().find(|s| s.id() == id).cloned()
  }
}

//! [`MemoryStore`] — the in-process implementation of [`GradebookStore`].

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use uuid::Uuid;

use gradebook_core::{
  answer::Answer,
  response::{ScriptResponse, ScriptResponsePatch, ScriptResponseRecord},
  roster::{Class, Enrollment, NewClass, Student, StudentPatch, normalize_cpf},
  store::GradebookStore,
  task::{Script, ScriptRecord},
};

use crate::{Error, Registries, Result};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A gradebook held entirely in memory.
///
/// Cloning is cheap — the registries are reference-counted. Every call takes
/// the single lock for its whole duration, and nothing is written until all
/// validation and reference resolution has succeeded.
#[derive(Clone, Default)]
pub struct MemoryStore {
  inner: Arc<Mutex<Registries>>,
}

impl MemoryStore {
  pub fn new() -> Self { Self::default() }
}

/// CPFs arrive from paths and bodies with or without separators; registries
/// key on the bare digits. Input that is not a CPF at all can only miss.
fn cpf_key(raw: &str) -> String { normalize_cpf(raw).unwrap_or_else(|_| raw.to_owned()) }

// ─── GradebookStore impl ─────────────────────────────────────────────────────

impl GradebookStore for MemoryStore {
  type Error = Error;

  // ── Scripts ───────────────────────────────────────────────────────────────

  async fn add_script(&self, record: ScriptRecord) -> Result<Arc<Script>> {
    let script = Script::from_record(record)?;
    let mut reg = self.inner.lock().await;
    let script = reg.scripts.add(script)?;
    tracing::debug!(script_id = script.id(), tasks = script.tasks().len(), "script registered");
    Ok(script)
  }

  async fn get_script(&self, id: String) -> Result<Option<Arc<Script>>> {
    let reg = self.inner.lock().await;
    Ok(reg.scripts.find_by_id(&id).cloned())
  }

  async fn list_scripts(&self) -> Result<Vec<Arc<Script>>> {
    let reg = self.inner.lock().await;
    Ok(reg.scripts.all().to_vec())
  }

  async fn remove_script(&self, id: String) -> Result<bool> {
    let mut reg = self.inner.lock().await;
    let removed = reg.scripts.remove(&id);
    if removed {
      tracing::debug!(script_id = %id, "script removed");
    }
    Ok(removed)
  }

  // ── Students ──────────────────────────────────────────────────────────────

  async fn add_student(&self, student: Student) -> Result<Student> {
    let mut reg = self.inner.lock().await;
    let student = reg.students.add(student)?.clone();
    tracing::debug!(cpf = student.cpf(), "student registered");
    Ok(student)
  }

  async fn get_student(&self, cpf: String) -> Result<Option<Student>> {
    let reg = self.inner.lock().await;
    Ok(reg.students.find_by_cpf(&cpf_key(&cpf)).cloned())
  }

  async fn list_students(&self) -> Result<Vec<Student>> {
    let reg = self.inner.lock().await;
    Ok(reg.students.all().to_vec())
  }

  async fn update_student(&self, cpf: String, patch: StudentPatch) -> Result<Student> {
    let cpf = cpf_key(&cpf);
    let mut reg = self.inner.lock().await;
    let student = reg
      .students
      .find_by_cpf_mut(&cpf)
      .ok_or_else(|| Error::StudentNotFound(cpf.clone()))?;
    student.update(patch)?;
    let student = student.clone();

    for class in reg.classes.iter_mut() {
      class.refresh_student(&student);
    }
    Ok(student)
  }

  async fn remove_student(&self, cpf: String) -> Result<bool> {
    let cpf = cpf_key(&cpf);
    let mut reg = self.inner.lock().await;
    if reg.students.remove(&cpf).is_none() {
      return Ok(false);
    }
    for class in reg.classes.iter_mut() {
      class.unenroll(&cpf);
    }
    tracing::debug!(cpf = %cpf, "student removed");
    Ok(true)
  }

  // ── Classes ───────────────────────────────────────────────────────────────

  async fn add_class(&self, input: NewClass) -> Result<Class> {
    let mut reg = self.inner.lock().await;
    let class = reg.classes.add(Class::new(input))?.clone();
    tracing::debug!(class_id = class.id(), "class registered");
    Ok(class)
  }

  async fn get_class(&self, id: String) -> Result<Option<Class>> {
    let reg = self.inner.lock().await;
    Ok(reg.classes.find_by_id(&id).cloned())
  }

  async fn list_classes(&self) -> Result<Vec<Class>> {
    let reg = self.inner.lock().await;
    Ok(reg.classes.all().to_vec())
  }

  async fn enroll(&self, class_id: String, cpf: String) -> Result<Enrollment> {
    let cpf = cpf_key(&cpf);
    let mut reg = self.inner.lock().await;
    let student = reg
      .students
      .find_by_cpf(&cpf)
      .cloned()
      .ok_or_else(|| Error::StudentNotFound(cpf.clone()))?;
    let class = reg
      .classes
      .find_by_id_mut(&class_id)
      .ok_or_else(|| Error::ClassNotFound(class_id.clone()))?;
    let enrollment = class.enroll(student)?.clone();
    tracing::debug!(class_id = %class_id, cpf = %cpf, "student enrolled");
    Ok(enrollment)
  }

  // ── Responses ─────────────────────────────────────────────────────────────

  async fn record_response(
    &self,
    class_id: String,
    mut record: ScriptResponseRecord,
  ) -> Result<ScriptResponse> {
    if record.id.is_empty() {
      record.id = Uuid::new_v4().to_string();
    }

    let mut reg = self.inner.lock().await;
    let class = reg
      .classes
      .find_by_id(&class_id)
      .ok_or_else(|| Error::ClassNotFound(class_id.clone()))?;

    let response = ScriptResponse::from_record(record, &reg.scripts, class)
      .inspect_err(|e| tracing::warn!(class_id = %class_id, "response rejected: {e}"))?;

    let response = reg.responses.add(response)?.clone();
    tracing::debug!(
      response_id = response.id(),
      script_id = response.script().id(),
      answers = response.answers().len(),
      "response recorded"
    );
    Ok(response)
  }

  async fn get_response(&self, id: String) -> Result<Option<ScriptResponse>> {
    let reg = self.inner.lock().await;
    Ok(reg.responses.find_by_id(&id).cloned())
  }

  async fn list_responses(&self) -> Result<Vec<ScriptResponse>> {
    let reg = self.inner.lock().await;
    Ok(reg.responses.all().to_vec())
  }

  async fn responses_for_student(&self, cpf: String) -> Result<Vec<ScriptResponse>> {
    let cpf = cpf_key(&cpf);
    let reg = self.inner.lock().await;
    if reg.students.find_by_cpf(&cpf).is_none() {
      return Err(Error::StudentNotFound(cpf));
    }
    Ok(reg.responses.for_student(&cpf).cloned().collect())
  }

  async fn remove_response(&self, id: String) -> Result<bool> {
    let mut reg = self.inner.lock().await;
    Ok(reg.responses.remove(&id))
  }

  async fn start_task(&self, response_id: String, task_id: String) -> Result<Answer> {
    let mut reg = self.inner.lock().await;
    let response = reg
      .responses
      .find_by_id_mut(&response_id)
      .ok_or_else(|| Error::ResponseNotFound(response_id.clone()))?;
    let task = response.script().require_task(&task_id)?;
    Ok(response.add_or_get_answer(&task)?.clone())
  }

  async fn grade_task(
    &self,
    response_id: String,
    task_id: String,
    grade: Option<String>,
  ) -> Result<Answer> {
    let mut reg = self.inner.lock().await;
    let response = reg
      .responses
      .find_by_id_mut(&response_id)
      .ok_or_else(|| Error::ResponseNotFound(response_id.clone()))?;
    let answer = response.grade_task(&task_id, grade.as_deref())?.clone();
    tracing::debug!(
      response_id = %response_id,
      task_id = %task_id,
      grade = ?answer.grade(),
      "task graded"
    );
    Ok(answer)
  }

  async fn finish_response(
    &self,
    response_id: String,
    at: Option<DateTime<Utc>>,
  ) -> Result<ScriptResponse> {
    let mut reg = self.inner.lock().await;
    let response = reg
      .responses
      .find_by_id_mut(&response_id)
      .ok_or_else(|| Error::ResponseNotFound(response_id.clone()))?;
    response.mark_finished(at);
    tracing::info!(response_id = %response_id, "response finished");
    Ok(response.clone())
  }

  async fn update_response(
    &self,
    response_id: String,
    patch: ScriptResponsePatch,
  ) -> Result<ScriptResponse> {
    let mut reg = self.inner.lock().await;
    let response = reg
      .responses
      .find_by_id_mut(&response_id)
      .ok_or_else(|| Error::ResponseNotFound(response_id.clone()))?;
    response.update(patch)?;
    Ok(response.clone())
  }
}

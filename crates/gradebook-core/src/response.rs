//! Script responses: one student's attempt at one script.
//!
//! A response starts `in_progress` and moves to `finished` through
//! [`ScriptResponse::mark_finished`]; nothing on the runtime surface moves it
//! back. Only [`ScriptResponse::update`], which exists for reconstruction, may
//! write the status directly.
//!
//! Persisted responses reference their script, student and tasks by id.
//! [`ScriptResponse::from_record`] resolves those ids and either returns a
//! fully linked response or fails without building anything.

use std::{collections::HashSet, sync::Arc};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use crate::{
  Error, Result,
  answer::{Answer, AnswerRecord},
  lookup::{EnrollmentLookup, ScriptLookup},
  patch,
  roster::{Enrollment, EnrollmentRef, normalize_cpf},
  task::{Script, Task},
  time, validate_grade,
};

// ─── Status ──────────────────────────────────────────────────────────────────

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Default,
  Serialize,
  Deserialize,
  Display,
  AsRefStr,
  EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ResponseStatus {
  #[default]
  InProgress,
  Finished,
}

// ─── Wire types ──────────────────────────────────────────────────────────────

/// JSON shape of a [`ScriptResponse`].
///
/// `id` and `studentCPF` default to empty so a record missing them still
/// reaches reference resolution and fails with a named error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptResponseRecord {
  #[serde(default)]
  pub id:          String,
  #[serde(rename = "scriptId")]
  pub script_id:   String,
  #[serde(rename = "studentCPF", default)]
  pub student_cpf: String,
  #[serde(
    default,
    with = "chrono::serde::ts_milliseconds_option",
    skip_serializing_if = "Option::is_none"
  )]
  pub started_at:  Option<DateTime<Utc>>,
  #[serde(
    default,
    with = "chrono::serde::ts_milliseconds_option",
    skip_serializing_if = "Option::is_none"
  )]
  pub finished_at: Option<DateTime<Utc>>,
  /// Absent means [`ResponseStatus::InProgress`].
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub status:      Option<ResponseStatus>,
  #[serde(default)]
  pub answers:     Vec<AnswerRecord>,
}

/// Merge-patch for [`ScriptResponse::update`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScriptResponsePatch {
  #[serde(default, deserialize_with = "patch::present_millis")]
  pub finished_at: Option<Option<DateTime<Utc>>>,
  #[serde(default)]
  pub status:      Option<ResponseStatus>,
  /// Replaces the whole answer list; every task id is re-resolved.
  #[serde(default)]
  pub answers:     Option<Vec<AnswerRecord>>,
}

// ─── ScriptResponse ──────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct ScriptResponse {
  id:          String,
  script:      Arc<Script>,
  enrollment:  EnrollmentRef,
  started_at:  DateTime<Utc>,
  finished_at: Option<DateTime<Utc>>,
  status:      ResponseStatus,
  answers:     Vec<Answer>,
}

impl ScriptResponse {
  /// Begin a new attempt. `started_at` defaults to now.
  pub fn new(
    id: impl Into<String>,
    script: Arc<Script>,
    enrollment: &Enrollment,
    started_at: Option<DateTime<Utc>>,
  ) -> Self {
    Self {
      id: id.into(),
      script,
      enrollment: enrollment.to_ref(),
      started_at: started_at.unwrap_or_else(time::now),
      finished_at: None,
      status: ResponseStatus::InProgress,
      answers: Vec::new(),
    }
  }

  /// Rebuild a response from its record.
  ///
  /// Resolves `scriptId` against `scripts`, `studentCPF` against `class`, and
  /// every answer's `taskId` against the resolved script. The first miss is
  /// returned as [`Error::ScriptNotFound`], [`Error::EnrollmentNotFound`] or
  /// [`Error::TaskNotFound`].
  pub fn from_record<S, C>(
    record: ScriptResponseRecord,
    scripts: &S,
    class: &C,
  ) -> Result<Self>
  where
    S: ScriptLookup + ?Sized,
    C: EnrollmentLookup + ?Sized,
  {
    let script = scripts
      .find_script(&record.script_id)
      .ok_or_else(|| Error::ScriptNotFound(record.script_id.clone()))?;

    let enrollment = normalize_cpf(&record.student_cpf)
      .ok()
      .and_then(|cpf| class.find_enrollment_by_student_cpf(&cpf))
      .ok_or_else(|| Error::EnrollmentNotFound(record.student_cpf.clone()))?;

    let answers = resolve_answers(&script, record.answers)?;

    let mut response =
      Self::new(record.id, Arc::clone(&script), enrollment, record.started_at);
    response.finished_at = record.finished_at;
    response.status = record.status.unwrap_or_default();
    response.answers = answers;
    Ok(response)
  }

  pub fn to_record(&self) -> ScriptResponseRecord {
    ScriptResponseRecord {
      id:          self.id.clone(),
      script_id:   self.script.id().to_owned(),
      student_cpf: self.enrollment.student_cpf.clone(),
      started_at:  Some(self.started_at),
      finished_at: self.finished_at,
      status:      Some(self.status),
      answers:     self.answers.iter().map(Answer::to_record).collect(),
    }
  }

  // ── Accessors ─────────────────────────────────────────────────────────

  pub fn id(&self) -> &str { &self.id }

  pub fn script(&self) -> &Arc<Script> { &self.script }

  pub fn enrollment(&self) -> &EnrollmentRef { &self.enrollment }

  pub fn student_cpf(&self) -> &str { &self.enrollment.student_cpf }

  pub fn started_at(&self) -> DateTime<Utc> { self.started_at }

  pub fn finished_at(&self) -> Option<DateTime<Utc>> { self.finished_at }

  pub fn status(&self) -> ResponseStatus { self.status }

  pub fn is_finished(&self) -> bool { self.status == ResponseStatus::Finished }

  pub fn answers(&self) -> &[Answer] { &self.answers }

  // ── Runtime mutations ─────────────────────────────────────────────────

  /// Return the answer for `task`, creating it (id `{response}-{task}`,
  /// started now) if this is the first time the task is touched.
  ///
  /// The task must belong to this response's script. Status is not
  /// consulted, so a grader can still open a task the student skipped.
  pub fn add_or_get_answer(&mut self, task: &Task) -> Result<&mut Answer> {
    let pos = match self.position_of(&task.id) {
      Some(pos) => pos,
      None => {
        let shared = self.script.require_task(&task.id)?;
        let answer_id = format!("{}-{}", self.id, task.id);
        self.answers.push(Answer::new(answer_id, shared));
        self.answers.len() - 1
      }
    };
    Ok(&mut self.answers[pos])
  }

  pub fn find_answer_by_task_id(&self, task_id: &str) -> Option<&Answer> {
    self.position_of(task_id).map(|pos| &self.answers[pos])
  }

  /// Grade the answer for `task_id`, starting it first if needed. An invalid
  /// grade is rejected before anything is created or changed.
  pub fn grade_task(&mut self, task_id: &str, grade: Option<&str>) -> Result<&Answer> {
    let grade = validate_grade(grade)?;
    let task = self.script.require_task(task_id)?;
    let answer = self.add_or_get_answer(&task)?;
    answer.set_grade(grade);
    Ok(&*answer)
  }

  /// Move to `finished`, stamping `finished_at` with `at` or now. Calling it
  /// again only moves the timestamp.
  pub fn mark_finished(&mut self, at: Option<DateTime<Utc>>) {
    self.finished_at = Some(at.unwrap_or_else(time::now));
    self.status = ResponseStatus::Finished;
  }

  /// Apply a merge-patch. A replacement answer list is fully resolved before
  /// any field is written, so a dangling task id leaves the response as it
  /// was.
  pub fn update(&mut self, patch: ScriptResponsePatch) -> Result<()> {
    let answers = patch
      .answers
      .map(|records| resolve_answers(&self.script, records))
      .transpose()?;

    if let Some(finished_at) = patch.finished_at {
      self.finished_at = finished_at;
    }
    if let Some(status) = patch.status {
      self.status = status;
    }
    if let Some(answers) = answers {
      self.answers = answers;
    }
    Ok(())
  }

  fn position_of(&self, task_id: &str) -> Option<usize> {
    self.answers.iter().position(|a| a.task_id() == task_id)
  }
}

/// Link answer records to the tasks of `script`. Fails on the first unknown
/// task id, and on a second answer for the same task.
fn resolve_answers(script: &Script, records: Vec<AnswerRecord>) -> Result<Vec<Answer>> {
  let mut seen = HashSet::with_capacity(records.len());
  records
    .into_iter()
    .map(|record| {
      let task = script.require_task(&record.task_id)?;
      if !seen.insert(record.task_id.clone()) {
        return Err(Error::DuplicateAnswer(record.task_id));
      }
      Answer::from_record(record, task)
    })
    .collect()
}

//! Per-task answers.
//!
//! [`Answer`] is the timing record a response session keeps for each task a
//! student has started. [`TaskAnswer`] is a standalone graded response to one
//! task, usable outside a full session (and derivable from an [`Answer`]).
//!
//! Absent optional fields are omitted from the JSON output rather than written
//! as `null`.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Grade, Result, patch, task::Task, time, validate_grade};

// ─── Answer ──────────────────────────────────────────────────────────────────

/// JSON shape of an [`Answer`]. The task is referenced by id, not embedded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerRecord {
  pub id:         String,
  #[serde(rename = "taskId")]
  pub task_id:    String,
  #[serde(with = "chrono::serde::ts_milliseconds")]
  pub started_at: DateTime<Utc>,
  /// Raw grade code; validated when the record is turned into an [`Answer`].
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub grade:      Option<String>,
}

/// A student's work on one task within one response session.
#[derive(Debug, Clone)]
pub struct Answer {
  id:         String,
  task:       Arc<Task>,
  started_at: DateTime<Utc>,
  grade:      Option<Grade>,
}

impl Answer {
  /// A fresh, ungraded answer started now.
  pub fn new(id: impl Into<String>, task: Arc<Task>) -> Self {
    Self {
      id: id.into(),
      task,
      started_at: time::now(),
      grade: None,
    }
  }

  /// Rebuild an answer from its record. `task` must already be resolved from
  /// `record.task_id` by the caller.
  pub fn from_record(record: AnswerRecord, task: Arc<Task>) -> Result<Self> {
    let grade = validate_grade(record.grade.as_deref())?;
    Ok(Self {
      id: record.id,
      task,
      started_at: record.started_at,
      grade,
    })
  }

  pub fn to_record(&self) -> AnswerRecord {
    AnswerRecord {
      id:         self.id.clone(),
      task_id:    self.task.id.clone(),
      started_at: self.started_at,
      grade:      self.grade.map(|g| g.to_string()),
    }
  }

  pub fn id(&self) -> &str { &self.id }

  pub fn task(&self) -> &Arc<Task> { &self.task }

  pub fn task_id(&self) -> &str { &self.task.id }

  pub fn started_at(&self) -> DateTime<Utc> { self.started_at }

  pub fn grade(&self) -> Option<Grade> { self.grade }

  /// Validate and set the grade; `None` clears it.
  pub fn update_grade(&mut self, grade: Option<&str>) -> Result<()> {
    self.grade = validate_grade(grade)?;
    Ok(())
  }

  pub fn set_grade(&mut self, grade: Option<Grade>) { self.grade = grade; }
}

// ─── TaskAnswer ──────────────────────────────────────────────────────────────

/// JSON shape of a [`TaskAnswer`]; the task is embedded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskAnswerRecord {
  pub id:       String,
  pub task:     Task,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub answer:   Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub grade:    Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub comments: Option<String>,
}

/// A merge-patch for [`TaskAnswer::update`]. Only fields present in the patch
/// are applied; see the `patch` module for the present-vs-null convention.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskAnswerPatch {
  #[serde(default)]
  pub task:     Option<Task>,
  #[serde(default, deserialize_with = "patch::present")]
  pub answer:   Option<Option<String>>,
  #[serde(default, deserialize_with = "patch::present")]
  pub grade:    Option<Option<String>>,
  #[serde(default, deserialize_with = "patch::present")]
  pub comments: Option<Option<String>>,
}

/// A graded response to a single task.
#[derive(Debug, Clone)]
pub struct TaskAnswer {
  pub id:       String,
  pub task:     Arc<Task>,
  pub answer:   Option<String>,
  grade:        Option<Grade>,
  pub comments: Option<String>,
}

impl TaskAnswer {
  /// Fails with [`crate::Error::InvalidGrade`] if `grade` is not a known code.
  pub fn new(
    id: impl Into<String>,
    task: Arc<Task>,
    answer: Option<String>,
    grade: Option<&str>,
    comments: Option<String>,
  ) -> Result<Self> {
    let grade = validate_grade(grade)?;
    Ok(Self {
      id: id.into(),
      task,
      answer,
      grade,
      comments,
    })
  }

  /// Build from a record, taking the embedded task as given.
  pub fn from_record(record: TaskAnswerRecord) -> Result<Self> {
    Self::new(
      record.id,
      Arc::new(record.task),
      record.answer,
      record.grade.as_deref(),
      record.comments,
    )
  }

  pub fn to_record(&self) -> TaskAnswerRecord {
    TaskAnswerRecord {
      id:       self.id.clone(),
      task:     Task::clone(&self.task),
      answer:   self.answer.clone(),
      grade:    self.grade.map(|g| g.to_string()),
      comments: self.comments.clone(),
    }
  }

  pub fn task_id(&self) -> &str { &self.task.id }

  pub fn grade(&self) -> Option<Grade> { self.grade }

  /// Validate and set the grade; `None` clears it.
  pub fn update_grade(&mut self, grade: Option<&str>) -> Result<()> {
    self.grade = validate_grade(grade)?;
    Ok(())
  }

  /// Apply a merge-patch. A patch with an invalid grade fails before any
  /// field is written.
  pub fn update(&mut self, patch: TaskAnswerPatch) -> Result<()> {
    let grade = patch
      .grade
      .map(|g| validate_grade(g.as_deref()))
      .transpose()?;

    if let Some(task) = patch.task {
      self.task = Arc::new(task);
    }
    if let Some(answer) = patch.answer {
      self.answer = answer;
    }
    if let Some(grade) = grade {
      self.grade = grade;
    }
    if let Some(comments) = patch.comments {
      self.comments = comments;
    }
    Ok(())
  }
}

impl From<&Answer> for TaskAnswer {
  fn from(answer: &Answer) -> Self {
    Self {
      id:       answer.id.clone(),
      task:     Arc::clone(&answer.task),
      answer:   None,
      grade:    answer.grade,
      comments: None,
    }
  }
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;
  use crate::Error;

  fn task() -> Arc<Task> { Arc::new(Task::new("t1", "Example Task")) }

  fn ungraded() -> TaskAnswer {
    TaskAnswer::new("a1", task(), None, None, None).unwrap()
  }

  // ── TaskAnswer construction ────────────────────────────────────────────

  #[test]
  fn constructor_initializes_fields() {
    let task = task();
    let ta = TaskAnswer::new(
      "a1",
      Arc::clone(&task),
      Some("my answer".into()),
      Some("MA"),
      Some("good job".into()),
    )
    .unwrap();

    assert_eq!(ta.id, "a1");
    assert!(Arc::ptr_eq(&ta.task, &task));
    assert_eq!(ta.answer.as_deref(), Some("my answer"));
    assert_eq!(ta.grade(), Some(Grade::Achieved));
    assert_eq!(ta.comments.as_deref(), Some("good job"));
    assert_eq!(ta.task_id(), "t1");
  }

  #[test]
  fn constructor_rejects_invalid_grade() {
    let err = TaskAnswer::new("a1", task(), None, Some("BOGUS"), None).unwrap_err();
    assert!(matches!(err, Error::InvalidGrade(ref g) if g == "BOGUS"));
    assert!(err.to_string().contains("Invalid grade value"));
  }

  #[test]
  fn constructor_accepts_absent_grade() {
    assert_eq!(ungraded().grade(), None);
  }

  // ── Grade updates ──────────────────────────────────────────────────────

  #[test]
  fn update_grade_sets_and_clears() {
    let mut ta = ungraded();
    ta.update_grade(Some("MANA")).unwrap();
    assert_eq!(ta.grade(), Some(Grade::NotYetAchieved));

    ta.update_grade(None).unwrap();
    assert_eq!(ta.grade(), None);
  }

  #[test]
  fn update_grade_failure_keeps_previous_grade() {
    let mut ta = TaskAnswer::new("a1", task(), None, Some("MPA"), None).unwrap();
    let err = ta.update_grade(Some("BAD")).unwrap_err();
    assert!(err.to_string().contains("Invalid grade value"));
    assert_eq!(ta.grade(), Some(Grade::PartiallyAchieved));
  }

  // ── Merge-patch ────────────────────────────────────────────────────────

  #[test]
  fn patch_with_only_comments_leaves_grade_and_task() {
    let mut ta = TaskAnswer::new("a1", task(), Some("x".into()), Some("MA"), None).unwrap();
    let patch: TaskAnswerPatch = serde_json::from_value(json!({ "comments": "hello" })).unwrap();
    ta.update(patch).unwrap();

    assert_eq!(ta.comments.as_deref(), Some("hello"));
    assert_eq!(ta.grade(), Some(Grade::Achieved));
    assert_eq!(ta.answer.as_deref(), Some("x"));
    assert_eq!(ta.task_id(), "t1");
  }

  #[test]
  fn patch_null_grade_clears_but_missing_grade_does_not() {
    let mut ta = TaskAnswer::new("a1", task(), None, Some("MA"), None).unwrap();

    let untouched: TaskAnswerPatch = serde_json::from_value(json!({ "answer": "new" })).unwrap();
    ta.update(untouched).unwrap();
    assert_eq!(ta.grade(), Some(Grade::Achieved));
    assert_eq!(ta.answer.as_deref(), Some("new"));

    let clear: TaskAnswerPatch = serde_json::from_value(json!({ "grade": null })).unwrap();
    ta.update(clear).unwrap();
    assert_eq!(ta.grade(), None);
  }

  #[test]
  fn patch_with_invalid_grade_mutates_nothing() {
    let mut ta = TaskAnswer::new("a1", task(), None, Some("MPA"), None).unwrap();
    let patch: TaskAnswerPatch = serde_json::from_value(json!({
      "grade":    "WRONG",
      "comments": "should not land",
      "task":     { "id": "t2", "statement": "Other" },
    }))
    .unwrap();

    let err = ta.update(patch).unwrap_err();
    assert!(err.to_string().contains("Invalid grade value"));
    assert_eq!(ta.grade(), Some(Grade::PartiallyAchieved));
    assert_eq!(ta.comments, None);
    assert_eq!(ta.task_id(), "t1");
  }

  #[test]
  fn patch_replaces_task() {
    let mut ta = ungraded();
    let patch: TaskAnswerPatch = serde_json::from_value(json!({
      "task": { "id": "t2", "statement": "New task" },
    }))
    .unwrap();
    ta.update(patch).unwrap();

    assert_eq!(ta.task_id(), "t2");
    assert_eq!(*ta.task, Task::new("t2", "New task"));
  }

  // ── JSON ───────────────────────────────────────────────────────────────

  #[test]
  fn to_record_omits_absent_fields() {
    let ta = TaskAnswer::new("a1", task(), Some("answer".into()), Some("MPA"), None).unwrap();
    let json = serde_json::to_value(ta.to_record()).unwrap();
    assert_eq!(
      json,
      json!({
        "id":     "a1",
        "task":   { "id": "t1", "statement": "Example Task" },
        "answer": "answer",
        "grade":  "MPA",
      })
    );
  }

  #[test]
  fn from_record_takes_task_as_given() {
    let record: TaskAnswerRecord = serde_json::from_value(json!({
      "id":       "a1",
      "task":     { "id": "t1", "statement": "Example Task" },
      "answer":   "ans",
      "grade":    "MA",
      "comments": "ok",
    }))
    .unwrap();

    let ta = TaskAnswer::from_record(record.clone()).unwrap();
    assert_eq!(ta.grade(), Some(Grade::Achieved));
    assert_eq!(ta.comments.as_deref(), Some("ok"));
    assert_eq!(ta.to_record(), record);
  }

  #[test]
  fn from_record_rejects_invalid_grade() {
    let record = TaskAnswerRecord {
      id:       "a1".into(),
      task:     Task::new("t1", ""),
      answer:   None,
      grade:    Some("A+".into()),
      comments: None,
    };
    assert!(matches!(TaskAnswer::from_record(record), Err(Error::InvalidGrade(_))));
  }

  // ── Answer ─────────────────────────────────────────────────────────────

  #[test]
  fn answer_grade_is_validated() {
    let mut answer = Answer::new("R1-t1", task());
    answer.update_grade(Some("MA")).unwrap();
    assert!(answer.update_grade(Some("nope")).is_err());
    assert_eq!(answer.grade(), Some(Grade::Achieved));
  }

  #[test]
  fn answer_record_references_task_by_id() {
    let mut answer = Answer::new("R1-t1", task());
    answer.set_grade(Some(Grade::PartiallyAchieved));
    let json = serde_json::to_value(answer.to_record()).unwrap();

    assert_eq!(json["taskId"], "t1");
    assert_eq!(json["grade"], "MPA");
    assert_eq!(json["started_at"], answer.started_at().timestamp_millis());
    assert!(json.get("task").is_none());
  }

  #[test]
  fn task_answer_derived_from_answer_shares_task() {
    let mut answer = Answer::new("R1-t1", task());
    answer.set_grade(Some(Grade::NotYetAchieved));
    let ta = TaskAnswer::from(&answer);

    assert_eq!(ta.id, "R1-t1");
    assert!(Arc::ptr_eq(&ta.task, answer.task()));
    assert_eq!(ta.grade(), Some(Grade::NotYetAchieved));
  }
}

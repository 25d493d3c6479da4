//! Tasks and the scripts that order them.
//!
//! A [`Script`] owns its tasks behind [`Arc`] so every response that
//! references the script shares the same task values instead of copying them.

use std::{collections::HashMap, sync::Arc};

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

// ─── Task ────────────────────────────────────────────────────────────────────

/// One question or prompt within a script. Also the JSON shape
/// `{"id": ..., "statement": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
  pub id:        String,
  #[serde(default)]
  pub statement: String,
}

impl Task {
  pub fn new(id: impl Into<String>, statement: impl Into<String>) -> Self {
    Self { id: id.into(), statement: statement.into() }
  }

  pub fn id(&self) -> &str { &self.id }
}

// ─── Script ──────────────────────────────────────────────────────────────────

/// JSON shape of a script: `{"id", "title", "tasks": [Task]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptRecord {
  pub id:    String,
  #[serde(default)]
  pub title: String,
  #[serde(default)]
  pub tasks: Vec<Task>,
}

/// An assessment instrument: an ordered list of tasks with unique ids.
#[derive(Debug, Clone)]
pub struct Script {
  id:    String,
  title: String,
  tasks: Vec<Arc<Task>>,
  /// Task id → position in `tasks`.
  index: HashMap<String, usize>,
}

impl Script {
  pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
    Self {
      id:    id.into(),
      title: title.into(),
      tasks: Vec::new(),
      index: HashMap::new(),
    }
  }

  /// Build a script from its record, keeping task order.
  ///
  /// Fails on an empty task id or a task id that appears twice.
  pub fn from_record(record: ScriptRecord) -> Result<Self> {
    let mut script = Self::new(record.id, record.title);
    for task in record.tasks {
      script.push_task(task)?;
    }
    Ok(script)
  }

  pub fn to_record(&self) -> ScriptRecord {
    ScriptRecord {
      id:    self.id.clone(),
      title: self.title.clone(),
      tasks: self.tasks.iter().map(|t| Task::clone(t)).collect(),
    }
  }

  /// Append a task at the end of the script and return the shared handle.
  pub fn push_task(&mut self, task: Task) -> Result<Arc<Task>> {
    if task.id.is_empty() {
      return Err(Error::EmptyTaskId);
    }
    if self.index.contains_key(&task.id) {
      return Err(Error::DuplicateTask {
        script_id: self.id.clone(),
        task_id:   task.id,
      });
    }
    let task = Arc::new(task);
    self.index.insert(task.id.clone(), self.tasks.len());
    self.tasks.push(Arc::clone(&task));
    Ok(task)
  }

  pub fn find_task_by_id(&self, id: &str) -> Option<&Arc<Task>> {
    self.index.get(id).map(|&pos| &self.tasks[pos])
  }

  /// Like [`Self::find_task_by_id`], but a miss is a [`Error::TaskNotFound`].
  pub fn require_task(&self, id: &str) -> Result<Arc<Task>> {
    self
      .find_task_by_id(id)
      .cloned()
      .ok_or_else(|| Error::TaskNotFound(id.to_owned()))
  }

  pub fn id(&self) -> &str { &self.id }

  pub fn title(&self) -> &str { &self.title }

  pub fn tasks(&self) -> &[Arc<Task>] { &self.tasks }
}

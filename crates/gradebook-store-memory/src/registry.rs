//! Keyed, insertion-ordered registries.
//!
//! These are synchronous and assume exclusive access; see [`MemoryStore`]
//! for the lock that provides it.
//!
//! [`MemoryStore`]: crate::MemoryStore

use std::sync::Arc;

use gradebook_core::{
  lookup::ScriptLookup,
  response::ScriptResponse,
  roster::{Class, Student},
  task::Script,
};

use crate::{Error, Result};

// ─── Scripts ─────────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct Scripts {
  items: Vec<Arc<Script>>,
}

impl Scripts {
  pub fn add(&mut self, script: Script) -> Result<Arc<Script>> {
    if self.find_by_id(script.id()).is_some() {
      return Err(Error::ScriptExists(script.id().to_owned()));
    }
    let script = Arc::new(script);
    self.items.push(Arc::clone(&script));
    Ok(script)
  }

  pub fn find_by_id(&self, id: &str) -> Option<&Arc<Script>> {
    self.items.iter().find(|s| s.id() == id)
  }

  pub fn remove(&mut self, id: &str) -> bool {
    let before = self.items.len();
    self.items.retain(|s| s.id() != id);
    self.items.len() != before
  }

  pub fn all(&self) -> &[Arc<Script>] { &self.items }
}

impl ScriptLookup for Scripts {
  fn find_script(&self, id: &str) -> Option<Arc<Script>> { self.find_by_id(id).cloned() }
}

// ─── Students ────────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct Students {
  items: Vec<Student>,
}

impl Students {
  pub fn add(&mut self, student: Student) -> Result<&Student> {
    if self.find_by_cpf(student.cpf()).is_some() {
      return Err(Error::StudentExists(student.cpf().to_owned()));
    }
    self.items.push(student);
    Ok(&self.items[self.items.len() - 1])
  }

  pub fn find_by_cpf(&self, cpf: &str) -> Option<&Student> {
    self.items.iter().find(|s| s.cpf() == cpf)
  }

  pub fn find_by_cpf_mut(&mut self, cpf: &str) -> Option<&mut Student> {
    self.items.iter_mut().find(|s| s.cpf() == cpf)
  }

  pub fn remove(&mut self, cpf: &str) -> Option<Student> {
    let pos = self.items.iter().position(|s| s.cpf() == cpf)?;
    Some(self.items.remove(pos))
  }

  pub fn all(&self) -> &[Student] { &self.items }
}

// ─── Classes ─────────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct Classes {
  items: Vec<Class>,
}

impl Classes {
  pub fn add(&mut self, class: Class) -> Result<&Class> {
    if self.find_by_id(class.id()).is_some() {
      return Err(Error::ClassExists(class.id().to_owned()));
    }
    self.items.push(class);
    Ok(&self.items[self.items.len() - 1])
  }

  pub fn find_by_id(&self, id: &str) -> Option<&Class> {
    self.items.iter().find(|c| c.id() == id)
  }

  pub fn find_by_id_mut(&mut self, id: &str) -> Option<&mut Class> {
    self.items.iter_mut().find(|c| c.id() == id)
  }

  pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Class> { self.items.iter_mut() }

  pub fn all(&self) -> &[Class] { &self.items }
}

// ─── Script responses ────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct ScriptResponses {
  items: Vec<ScriptResponse>,
}

impl ScriptResponses {
  pub fn add(&mut self, response: ScriptResponse) -> Result<&ScriptResponse> {
    if self.find_by_id(response.id()).is_some() {
      return Err(Error::ResponseExists(response.id().to_owned()));
    }
    self.items.push(response);
    Ok(&self.items[self.items.len() - 1])
  }

  pub fn find_by_id(&self, id: &str) -> Option<&ScriptResponse> {
    self.items.iter().find(|r| r.id() == id)
  }

  pub fn find_by_id_mut(&mut self, id: &str) -> Option<&mut ScriptResponse> {
    self.items.iter_mut().find(|r| r.id() == id)
  }

  pub fn for_student<'a>(
    &'a self,
    cpf: &'a str,
  ) -> impl Iterator<Item = &'a ScriptResponse> + 'a {
    self.items.iter().filter(move |r| r.student_cpf() == cpf)
  }

  pub fn remove(&mut self, id: &str) -> bool {
    let before = self.items.len();
    self.items.retain(|r| r.id() != id);
    self.items.len() != before
  }

  pub fn all(&self) -> &[ScriptResponse] { &self.items }
}

// ─── All together ────────────────────────────────────────────────────────────

/// Every registry a store needs, guarded as one unit.
#[derive(Debug, Default)]
pub struct Registries {
  pub scripts:   Scripts,
  pub students:  Students,
  pub classes:   Classes,
  pub responses: ScriptResponses,
}

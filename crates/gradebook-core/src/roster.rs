//! Students, classes, and the enrollments that tie them together.

use serde::{Deserialize, Serialize};

use crate::{Error, Result, lookup::EnrollmentLookup};

// ─── Student ─────────────────────────────────────────────────────────────────

/// Unvalidated JSON shape of a [`Student`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentRecord {
  pub name:  String,
  pub cpf:   String,
  pub email: String,
}

/// A student, identified by CPF.
///
/// The CPF is stored as its 11 bare digits, whatever separators it was
/// supplied with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "StudentRecord", into = "StudentRecord")]
pub struct Student {
  name:  String,
  cpf:   String,
  email: String,
}

/// Merge-patch for [`Student::update`]. The CPF is identity and cannot change.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StudentPatch {
  #[serde(default)]
  pub name:  Option<String>,
  #[serde(default)]
  pub email: Option<String>,
}

impl Student {
  pub fn new(
    name: impl Into<String>,
    cpf: impl AsRef<str>,
    email: impl Into<String>,
  ) -> Result<Self> {
    let name = name.into();
    let email = email.into();
    check_name(&name)?;
    check_email(&email)?;
    Ok(Self {
      name,
      cpf: normalize_cpf(cpf.as_ref())?,
      email,
    })
  }

  pub fn name(&self) -> &str { &self.name }

  pub fn cpf(&self) -> &str { &self.cpf }

  pub fn email(&self) -> &str { &self.email }

  /// Apply a merge-patch; both fields are validated before either is written.
  pub fn update(&mut self, patch: StudentPatch) -> Result<()> {
    if let Some(name) = &patch.name {
      check_name(name)?;
    }
    if let Some(email) = &patch.email {
      check_email(email)?;
    }
    if let Some(name) = patch.name {
      self.name = name;
    }
    if let Some(email) = patch.email {
      self.email = email;
    }
    Ok(())
  }
}

impl TryFrom<StudentRecord> for Student {
  type Error = Error;

  fn try_from(r: StudentRecord) -> Result<Self> { Self::new(r.name, r.cpf, r.email) }
}

impl From<Student> for StudentRecord {
  fn from(s: Student) -> Self {
    StudentRecord {
      name:  s.name,
      cpf:   s.cpf,
      email: s.email,
    }
  }
}

fn check_name(name: &str) -> Result<()> {
  if name.trim().is_empty() {
    return Err(Error::InvalidName);
  }
  Ok(())
}

/// Strip `.`/`-` separators and require exactly 11 digits.
pub fn normalize_cpf(raw: &str) -> Result<String> {
  let digits: String = raw.chars().filter(|c| !matches!(c, '.' | '-')).collect();
  if digits.len() != 11 || !digits.bytes().all(|b| b.is_ascii_digit()) {
    return Err(Error::InvalidCpf(raw.to_owned()));
  }
  Ok(digits)
}

fn check_email(email: &str) -> Result<()> {
  let invalid = || Error::InvalidEmail(email.to_owned());

  if email.chars().any(char::is_whitespace) {
    return Err(invalid());
  }
  let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
  if domain.contains('@') {
    return Err(invalid());
  }

  let well_formed = |part: &str| {
    !part.is_empty()
      && !part.starts_with('.')
      && !part.ends_with('.')
      && !part.contains("..")
  };
  if !well_formed(local) || !well_formed(domain) {
    return Err(invalid());
  }

  match domain.rsplit_once('.') {
    Some((_, tld)) if tld.len() >= 2 && tld.chars().all(|c| c.is_ascii_alphabetic()) => Ok(()),
    _ => Err(invalid()),
  }
}

// ─── Enrollment ──────────────────────────────────────────────────────────────

/// One student's membership of one class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Enrollment {
  pub class_id: String,
  pub student:  Student,
}

impl Enrollment {
  pub fn student_cpf(&self) -> &str { self.student.cpf() }

  /// The by-id handle a response keeps instead of the enrollment itself.
  pub fn to_ref(&self) -> EnrollmentRef {
    EnrollmentRef {
      class_id:    self.class_id.clone(),
      student_cpf: self.student.cpf().to_owned(),
    }
  }
}

/// A weak, by-id reference to an [`Enrollment`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EnrollmentRef {
  pub class_id:    String,
  pub student_cpf: String,
}

// ─── Class ───────────────────────────────────────────────────────────────────

/// Input to [`Class::new`].
#[derive(Debug, Clone, Deserialize)]
pub struct NewClass {
  pub topic:    String,
  pub semester: u8,
  pub year:     u16,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Class {
  id:          String,
  topic:       String,
  semester:    u8,
  year:        u16,
  enrollments: Vec<Enrollment>,
}

impl Class {
  pub fn new(input: NewClass) -> Self {
    Self {
      id:          class_id(&input.topic, input.year, input.semester),
      topic:       input.topic,
      semester:    input.semester,
      year:        input.year,
      enrollments: Vec::new(),
    }
  }

  pub fn id(&self) -> &str { &self.id }

  pub fn topic(&self) -> &str { &self.topic }

  pub fn semester(&self) -> u8 { self.semester }

  pub fn year(&self) -> u16 { self.year }

  pub fn enrollments(&self) -> &[Enrollment] { &self.enrollments }

  /// Enroll `student`; a student can be enrolled at most once per class.
  pub fn enroll(&mut self, student: Student) -> Result<&Enrollment> {
    if self.find_enrollment_by_student_cpf(student.cpf()).is_some() {
      return Err(Error::AlreadyEnrolled {
        class_id: self.id.clone(),
        cpf:      student.cpf().to_owned(),
      });
    }
    self.enrollments.push(Enrollment {
      class_id: self.id.clone(),
      student,
    });
    Ok(&self.enrollments[self.enrollments.len() - 1])
  }

  /// Replace the copy of `student` held by their enrollment, if any.
  /// Returns `true` if this class enrolls them.
  pub fn refresh_student(&mut self, student: &Student) -> bool {
    match self.enrollments.iter_mut().find(|e| e.student_cpf() == student.cpf()) {
      Some(enrollment) => {
        enrollment.student = student.clone();
        true
      }
      None => false,
    }
  }

  /// Remove the enrollment for `cpf`, returning it if there was one.
  pub fn unenroll(&mut self, cpf: &str) -> Option<Enrollment> {
    let pos = self.enrollments.iter().position(|e| e.student_cpf() == cpf)?;
    Some(self.enrollments.remove(pos))
  }
}

impl EnrollmentLookup for Class {
  fn find_enrollment_by_student_cpf(&self, cpf: &str) -> Option<&Enrollment> {
    self.enrollments.iter().find(|e| e.student_cpf() == cpf)
  }
}

/// `{topic}-{year}-{semester}`
pub fn class_id(topic: &str, year: u16, semester: u8) -> String {
  format!("{topic}-{year}-{semester}")
}

//! Grade codes and the single validator every grade setter goes through.
//!
//! A grade travels as a bare string (`"MA"`, `"MPA"`, `"MANA"`). Absence is a
//! valid state meaning "not yet graded".

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoStaticStr};

use crate::{Error, Result};

/// An evaluation code assigned to a task's answer.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  Display,
  AsRefStr,
  EnumString,
  EnumIter,
  IntoStaticStr,
)]
pub enum Grade {
  /// Goal achieved.
  #[serde(rename = "MA")]
  #[strum(serialize = "MA")]
  Achieved,
  /// Goal partially achieved.
  #[serde(rename = "MPA")]
  #[strum(serialize = "MPA")]
  PartiallyAchieved,
  /// Goal not yet achieved.
  #[serde(rename = "MANA")]
  #[strum(serialize = "MANA")]
  NotYetAchieved,
}

impl Grade {
  /// The wire code, e.g. `"MPA"`.
  pub fn code(self) -> &'static str { self.into() }
}

/// Resolve a raw grade into its typed form.
///
/// `None` is accepted and stays `None`. Anything outside the enumerated set
/// fails with [`Error::InvalidGrade`]. Callers must run this before touching
/// their own state so a failure leaves it unchanged.
pub fn validate_grade(value: Option<&str>) -> Result<Option<Grade>> {
  value
    .map(|raw| {
      raw
        .parse::<Grade>()
        .map_err(|_| Error::InvalidGrade(raw.to_owned()))
    })
    .transpose()
}

/// `true` iff `value` is absent or one of the enumerated codes.
pub fn is_valid_grade(value: Option<&str>) -> bool {
  validate_grade(value).is_ok()
}

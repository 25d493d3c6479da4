//! Deserialisation helpers for merge-patch fields.
//!
//! Patch fields are `Option<Option<T>>` tagged with `#[serde(default)]`: a key
//! missing from the JSON object yields the outer `None` ("leave untouched"),
//! while a present key, `null` included, yields `Some(..)` ("set", with
//! `Some(None)` meaning "clear").

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};

pub(crate) fn present<'de, D, T>(de: D) -> Result<Option<Option<T>>, D::Error>
where
  D: Deserializer<'de>,
  T: Deserialize<'de>,
{
  Option::<T>::deserialize(de).map(Some)
}

/// [`present`] for epoch-millisecond timestamps.
pub(crate) fn present_millis<'de, D>(
  de: D,
) -> Result<Option<Option<DateTime<Utc>>>, D::Error>
where
  D: Deserializer<'de>,
{
  #[derive(Deserialize)]
  struct Millis(
    #[serde(with = "chrono::serde::ts_milliseconds_option")]
    Option<DateTime<Utc>>,
  );

  Millis::deserialize(de).map(|Millis(at)| Some(at))
}

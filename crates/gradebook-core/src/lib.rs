//! Core types and trait definitions for the gradebook.
//!
//! This crate is deliberately free of HTTP and storage dependencies. It holds
//! the grading domain model (`Script → Task`, `ScriptResponse → Answer`), the
//! JSON record shapes those entities travel as, and the reconstruction logic
//! that links records back to live scripts and enrollments.

pub mod answer;
pub mod error;
pub mod grade;
pub mod lookup;
pub mod response;
pub mod roster;
pub mod store;
pub mod task;

mod patch;
mod time;

pub use error::{Error, FailureKind, Result};
pub use grade::{Grade, is_valid_grade, validate_grade};

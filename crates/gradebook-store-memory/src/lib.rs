//! In-memory backend for the gradebook store.
//!
//! The registries themselves are plain single-threaded collections;
//! [`MemoryStore`] puts all of them behind one async mutex so each store call
//! runs with exclusive access.

mod registry;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use registry::{Classes, Registries, ScriptResponses, Scripts, Students};
pub use store::MemoryStore;

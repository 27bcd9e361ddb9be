//! Client-side caching for the photo browser.
//!
//! [`query`] tracks backend requests per key so that only the newest answer
//! for a key is ever accepted. [`storage`] provides the persistent and
//! per-session key-value stores used for view preferences.

pub mod query;
pub mod storage;

pub use query::{QueryCache, QueryState, Ticket};
pub use storage::{get_json, scoped_key, set_json, KeyValueStore, LocalStore, SessionStore};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Database Error: {0}")]
    DatabaseError(String),
    #[error("Serialization Error: {0}")]
    SerializationError(String),
    #[error("Other Error: {0}")]
    Other(String),
}

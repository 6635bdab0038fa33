//! Persistence substrate for Belajar.
//!
//! A trait-based key-value blob interface with a JSON-file implementation
//! and an in-memory one, plus typed load/save of the progress aggregate.

#![warn(missing_docs)]

pub mod trait_;
pub mod json_storage;
pub mod memory_storage;
pub mod progress_store;

pub use trait_::{Storage, StorageError, Result};
pub use json_storage::JsonStorage;
pub use memory_storage::MemoryStorage;
pub use progress_store::{clear_progress, load_progress, save_progress, PROGRESS_KEY};

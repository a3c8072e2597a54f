//! Core utilities for the tsweave TypeScript emitter.
//!
//! This crate has no knowledge of types or code parts. It only deals with
//! strings and the file system.

mod file;
mod utils;

// File operations
pub use file::{WriteResult, list_files, remove_empty_parents, remove_file, write_if_changed};
// String utilities
pub use utils::{safe_file_stem, strip_generic_arity, to_identifier};

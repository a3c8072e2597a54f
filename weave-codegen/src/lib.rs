//! Emission engine for the tsweave TypeScript generator.
//!
//! # Module Organization
//!
//! - [`parts`] - Code part tree (named and keyed regions, closers, rendering)
//! - [`imports`] - Per-file import sections
//! - [`tree`] - Folder/file model, relative paths, barrels and saving
//! - [`libraries`] - External package registry
//! - [`types`] - Model type descriptors and the resolved type registry
//! - [`pipeline`] - Generation context, generator plugins and the work-queue drain
//! - [`diagnostic`] - Error log side channel
//! - [`config`] - Generator configuration

pub mod config;
pub mod diagnostic;
mod error;
pub mod imports;
pub mod libraries;
pub mod parts;
pub mod pipeline;
pub mod tree;
pub mod types;

pub use config::{ConfigError, GeneratorConfig};
pub use diagnostic::{Diagnostic, Diagnostics, Severity};
pub use error::{Error, Result};
pub use pipeline::{GenerationPass, TsGenerator, TypeScriptContext};

#[cfg(any(test, feature = "testing"))]
pub mod testing;

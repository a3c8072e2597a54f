//! Generation pass.
//!
//! A [`GenerationPass`] collects [`TsGenerator`] plugins and produces a
//! [`TypeScriptContext`], the single owner of every piece of state of one
//! pass: configuration, folder tree, type registry, libraries and
//! diagnostics.
//!
//! # Example
//!
//! ```ignore
//! let mut ctx = GenerationPass::new(GeneratorConfig::default())
//!     .generator(EnumGenerator)
//!     .initialize()?;
//! ctx.resolve(&model)?;
//! if ctx.generate_code()? {
//!     ctx.save(&SaveStrategy::new("out"));
//! }
//! ```

mod context;
mod generator;
mod pass;
mod resolve;

pub use context::TypeScriptContext;
pub use generator::TsGenerator;
pub use pass::GenerationPass;

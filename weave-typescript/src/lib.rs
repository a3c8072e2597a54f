//! Standard TypeScript generators for tsweave.
//!
//! The engine in `tsweave-codegen` knows nothing about how a model type maps
//! to TypeScript. This crate provides the usual mappings as
//! [`TsGenerator`](tsweave_codegen::TsGenerator) plugins:
//!
//! - [`StandardTypes`] maps booleans, numbers, big integers and strings to
//!   their TypeScript primitives.
//! - [`EnumGenerator`] writes `export enum` declarations.
//! - [`GuidGenerator`] writes a small `Guid` class.
//! - [`LuxonGenerator`] maps date-times to the `luxon` library.
//!
//! # Usage
//!
//! ```ignore
//! use tsweave_codegen::{GeneratorConfig, tree::SaveStrategy, types::ModelType};
//! use tsweave_typescript::Generator;
//!
//! let config = GeneratorConfig::from_file("tsweave.toml")?;
//! let generator = Generator::new(config);
//!
//! // Render files without writing
//! let files = generator.preview(&[ModelType::class("Shop", "Order")])?;
//!
//! // Generate and save, removing files left over by previous runs
//! let outcome = generator.generate(
//!     &[ModelType::class("Shop", "Order")],
//!     &SaveStrategy::new("ts/src").with_cleanup(true),
//! )?;
//! ```

mod enums;
mod generator;
mod guid;
mod luxon;
mod standard;

pub use enums::EnumGenerator;
pub use generator::{GenerationOutcome, Generator, PreviewFile};
pub use guid::{GuidGenerator, constructor_body};
pub use luxon::{LUXON_TYPES_VERSION, LUXON_VERSION, LuxonGenerator};
pub use standard::StandardTypes;

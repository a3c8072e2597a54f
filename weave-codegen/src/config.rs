//! Generator configuration.
//!
//! ```toml
//! pascal_case = true
//! generate_documentation = false
//! barrels = ["", "Sample/Models"]
//!
//! [library_versions]
//! luxon = "^3.4.0"
//! ```

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
    str::FromStr,
};

use miette::{Diagnostic, NamedSource, SourceSpan};
use serde::Deserialize;
use thiserror::Error;

/// Errors raised while loading a [`GeneratorConfig`].
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("failed to read '{path}'")]
    #[diagnostic(code(tsweave::config_io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse generator configuration")]
    #[diagnostic(code(tsweave::config_parse))]
    Parse {
        #[source_code]
        src: NamedSource<String>,
        #[label("parse error here")]
        span: Option<SourceSpan>,
        #[source]
        source: toml::de::Error,
    },
}

/// Options of a generation pass.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Whether generated identifiers start with an upper-case letter.
    pub pascal_case: bool,
    /// Whether generators emit JSDoc comments.
    pub generate_documentation: bool,
    /// Folders (relative to the output root, "" is the root) that get a generated `index.ts`.
    pub barrels: Vec<String>,
    /// Library versions that override the ones declared by generators.
    pub library_versions: BTreeMap<String, String>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            pascal_case: false,
            generate_documentation: true,
            barrels: Vec::new(),
            library_versions: BTreeMap::new(),
        }
    }
}

impl GeneratorConfig {
    /// Parse a configuration, naming `filename` in error reports.
    pub fn parse(src: &str, filename: &str) -> Result<Self, ConfigError> {
        toml::from_str(src).map_err(|source| ConfigError::Parse {
            src: NamedSource::new(filename, src.to_string()),
            span: source.span().map(SourceSpan::from),
            source,
        })
    }

    /// Load a configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let src = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&src, &path.display().to_string())
    }

    pub fn with_pascal_case(mut self, pascal_case: bool) -> Self {
        self.pascal_case = pascal_case;
        self
    }

    pub fn with_documentation(mut self, generate_documentation: bool) -> Self {
        self.generate_documentation = generate_documentation;
        self
    }

    /// Mark a folder for barrel generation.
    pub fn with_barrel(mut self, folder: impl Into<String>) -> Self {
        self.barrels.push(folder.into());
        self
    }

    /// Pin the version of a library.
    pub fn with_library_version(
        mut self,
        name: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        self.library_versions.insert(name.into(), version.into());
        self
    }
}

impl FromStr for GeneratorConfig {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s, "tsweave.toml")
    }
}

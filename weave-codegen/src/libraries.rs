//! External package registry.
//!
//! Generators declare the packages their output imports from. The first
//! declaration of a name wins, configured versions override whatever code
//! declares, and only libraries that were actually imported end up in the
//! package manifest sections.

use std::collections::BTreeMap;

use indexmap::IndexMap;
use serde::Serialize;

use crate::{Error, Result, diagnostic::Diagnostics};

const PHASE: &str = "libraries";

/// Section of `package.json` a library belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum DependencyKind {
    Dependency,
    DevDependency,
    PeerDependency,
}

impl DependencyKind {
    /// Name of the `package.json` section.
    pub fn section_name(&self) -> &'static str {
        match self {
            Self::Dependency => "dependencies",
            Self::DevDependency => "devDependencies",
            Self::PeerDependency => "peerDependencies",
        }
    }
}

/// A registered package.
#[derive(Debug, Clone, Serialize)]
pub struct LibraryImport {
    pub name: String,
    pub version: String,
    pub kind: DependencyKind,
    /// Set once something imports from the library.
    pub used: bool,
    /// Libraries that are marked used along with this one.
    pub implied: Vec<String>,
}

/// Registry of the external packages of a generation pass.
#[derive(Debug, Default)]
pub struct LibraryManager {
    libraries: IndexMap<String, LibraryImport>,
    configured: BTreeMap<String, String>,
}

impl LibraryManager {
    /// Create a manager with externally configured versions.
    pub fn new(configured: BTreeMap<String, String>) -> Self {
        Self {
            libraries: IndexMap::new(),
            configured,
        }
    }

    fn configured_version(&self, name: &str) -> Option<&str> {
        self.configured
            .iter()
            .find(|(configured, _)| configured.eq_ignore_ascii_case(name))
            .map(|(_, version)| version.as_str())
    }

    /// Register a library.
    ///
    /// A second registration of the same name returns the first one; a
    /// different version is reported as a warning and ignored. Implied
    /// libraries must already be registered.
    pub fn register(
        &mut self,
        diagnostics: &mut Diagnostics,
        name: &str,
        kind: DependencyKind,
        version: Option<&str>,
        implied: &[&str],
    ) -> Result<&LibraryImport> {
        if name.trim().is_empty() {
            return Err(Error::InvalidLibrary {
                name: name.to_string(),
                reason: "name is empty".to_string(),
            });
        }
        if version.is_some_and(|v| v.trim().is_empty()) {
            return Err(Error::InvalidLibrary {
                name: name.to_string(),
                reason: "version is empty".to_string(),
            });
        }

        if let Some(index) = self.libraries.get_index_of(name) {
            let existing = &self.libraries[index];
            if let Some(version) = version.filter(|v| *v != existing.version) {
                diagnostics.add_warning(
                    PHASE,
                    format!(
                        "Library '{name}' is already registered with version '{}', ignoring version '{version}'.",
                        existing.version
                    ),
                );
            }
            return Ok(&self.libraries[index]);
        }

        for dependency in implied {
            if !self.libraries.contains_key(*dependency) {
                return Err(Error::UnknownLibrary {
                    name: (*dependency).to_string(),
                });
            }
        }

        let version = match (self.configured_version(name), version) {
            (Some(configured), Some(code)) if configured != code => {
                diagnostics.add_warning(
                    PHASE,
                    format!(
                        "Library '{name}' version '{code}' is overridden by the configured version '{configured}'."
                    ),
                );
                configured.to_string()
            }
            (Some(configured), _) => {
                diagnostics.add_info(
                    PHASE,
                    format!("Library '{name}' uses the configured version '{configured}'."),
                );
                configured.to_string()
            }
            (None, Some(code)) => code.to_string(),
            (None, None) => {
                return Err(Error::MissingLibraryVersion {
                    name: name.to_string(),
                });
            }
        };

        tracing::debug!(library = name, %version, ?kind, "registered library");
        let entry = self
            .libraries
            .entry(name.to_string())
            .or_insert(LibraryImport {
                name: name.to_string(),
                version,
                kind,
                used: false,
                implied: implied.iter().map(|d| (*d).to_string()).collect(),
            });
        Ok(entry)
    }

    pub fn get(&self, name: &str) -> Option<&LibraryImport> {
        self.libraries.get(name)
    }

    /// Mark a library and everything it implies as used.
    pub fn mark_used(&mut self, name: &str) -> Result<()> {
        let mut pending = vec![name.to_string()];
        while let Some(current) = pending.pop() {
            let library = self
                .libraries
                .get_mut(&current)
                .ok_or_else(|| Error::UnknownLibrary {
                    name: current.clone(),
                })?;
            if !library.used {
                library.used = true;
                pending.extend(library.implied.iter().cloned());
            }
        }
        Ok(())
    }

    /// All registered libraries, in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &LibraryImport> {
        self.libraries.values()
    }

    /// Libraries that ended up being imported.
    pub fn used_libraries(&self) -> impl Iterator<Item = &LibraryImport> {
        self.libraries.values().filter(|library| library.used)
    }

    /// `package.json` dependency sections of the used libraries.
    pub fn package_dependencies(&self) -> serde_json::Value {
        let mut sections = serde_json::Map::new();
        for library in self.used_libraries() {
            let section = sections
                .entry(library.kind.section_name())
                .or_insert_with(|| serde_json::Value::Object(serde_json::Map::new()));
            if let serde_json::Value::Object(entries) = section {
                entries.insert(
                    library.name.clone(),
                    serde_json::Value::String(library.version.clone()),
                );
            }
        }
        serde_json::Value::Object(sections)
    }
}

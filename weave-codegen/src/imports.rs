//! Per-file import sections.
//!
//! Imports are collected while bodies are written and only turned into
//! `import { .. } from '..';` statements when the file is rendered, once the
//! whole folder tree is known.

use indexmap::{IndexMap, IndexSet};

use crate::tree::{FileId, SourceTree};

/// Where imported symbols come from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ImportTarget {
    /// Another generated file.
    File(FileId),
    /// An external package, imported by its name.
    Library(String),
}

/// Deduplicated imports of one file, in order of first use.
#[derive(Debug)]
pub struct ImportSection {
    owner: FileId,
    imports: IndexMap<ImportTarget, IndexSet<String>>,
    import_count: usize,
}

impl ImportSection {
    pub(crate) fn new(owner: FileId) -> Self {
        Self {
            owner,
            imports: IndexMap::new(),
            import_count: 0,
        }
    }

    /// Import `symbols` from `target`.
    ///
    /// Importing from the owning file is a no-op. Returns the number of
    /// symbols that were not already imported from this target.
    pub fn ensure_import(&mut self, target: ImportTarget, symbols: &[&str]) -> usize {
        if target == ImportTarget::File(self.owner) {
            return 0;
        }
        let known = self.imports.entry(target).or_default();
        let mut added = 0;
        for symbol in symbols {
            if known.insert((*symbol).to_string()) {
                added += 1;
            }
        }
        self.import_count += added;
        added
    }

    /// Number of distinct symbols imported so far.
    pub fn import_count(&self) -> usize {
        self.import_count
    }

    pub fn is_empty(&self) -> bool {
        self.imports.is_empty()
    }

    pub fn contains(&self, target: &ImportTarget, symbol: &str) -> bool {
        self.imports
            .get(target)
            .is_some_and(|symbols| symbols.contains(symbol))
    }

    /// Iterate over targets and their symbols in order of first use.
    pub fn iter(&self) -> impl Iterator<Item = (&ImportTarget, &IndexSet<String>)> {
        self.imports.iter()
    }

    /// One statement per target.
    pub(crate) fn render(&self, tree: &SourceTree) -> String {
        let from = tree.file(self.owner).folder();
        let mut out = String::new();
        for (target, symbols) in &self.imports {
            if symbols.is_empty() {
                continue;
            }
            let module = match target {
                ImportTarget::File(file) => {
                    let file = tree.file(*file);
                    format!("{}/{}", tree.relative_path(from, file.folder()), file.stem())
                }
                ImportTarget::Library(name) => name.clone(),
            };
            let symbols: Vec<&str> = symbols.iter().map(String::as_str).collect();
            out.push_str(&format!(
                "import {{ {} }} from '{}';\n",
                symbols.join(", "),
                module
            ));
        }
        out
    }
}

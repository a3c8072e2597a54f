use std::{
    collections::BTreeSet,
    path::{Path, PathBuf},
};

use tracing::{debug, info};
use tsweave_core::{WriteResult, list_files, remove_empty_parents, remove_file, write_if_changed};

use super::{FolderId, INDEX_FILE, SOURCE_EXTENSION, SourceTree};
use crate::diagnostic::Diagnostics;

/// Where and how a tree is written.
#[derive(Debug, Clone)]
pub struct SaveStrategy {
    /// Output directory that maps to the root folder.
    pub target: PathBuf,
    /// Remove `.ts` files found under `target` that this save did not
    /// produce, and the folders they leave empty.
    pub cleanup: bool,
}

impl SaveStrategy {
    pub fn new(target: impl Into<PathBuf>) -> Self {
        Self {
            target: target.into(),
            cleanup: false,
        }
    }

    pub fn with_cleanup(mut self, cleanup: bool) -> Self {
        self.cleanup = cleanup;
        self
    }
}

/// Outcome of a successful save.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SaveSummary {
    /// Files produced, barrels included.
    pub files: usize,
    /// Files whose content actually changed on disk.
    pub written: usize,
    /// Stale files removed.
    pub removed: usize,
    /// Folders left empty by the stale files and removed.
    pub removed_folders: usize,
}

impl SourceTree {
    /// Write every file to `strategy.target`.
    ///
    /// I/O failures are logged to `diagnostics` and yield `None`. Files
    /// written before the failure stay on disk.
    pub fn save(&self, diagnostics: &mut Diagnostics, strategy: &SaveStrategy) -> Option<SaveSummary> {
        match self.try_save(strategy) {
            Ok(summary) => {
                info!(
                    dir = %strategy.target.display(),
                    files = summary.files,
                    written = summary.written,
                    removed = summary.removed,
                    "saved generated files"
                );
                Some(summary)
            }
            Err(err) => {
                diagnostics.push(
                    crate::Diagnostic::error("save", format!("{err:#}"))
                        .at(strategy.target.display().to_string()),
                );
                None
            }
        }
    }

    fn try_save(&self, strategy: &SaveStrategy) -> eyre::Result<SaveSummary> {
        let existing = if strategy.cleanup {
            list_files(&strategy.target)?
                .into_iter()
                .filter(|path| is_source_file(path))
                .collect()
        } else {
            BTreeSet::new()
        };
        let mut saved = BTreeSet::new();
        let mut summary = SaveSummary::default();
        self.save_folder(self.root(), &strategy.target, &mut saved, &mut summary)?;

        for stale in existing.difference(&saved) {
            debug!(path = %stale.display(), "removing stale file");
            remove_file(stale)?;
            summary.removed += 1;
            summary.removed_folders += remove_empty_parents(stale, &strategy.target)?;
        }
        Ok(summary)
    }

    fn save_folder(
        &self,
        folder: FolderId,
        dir: &Path,
        saved: &mut BTreeSet<PathBuf>,
        summary: &mut SaveSummary,
    ) -> eyre::Result<()> {
        let node = self.folder(folder);
        for file in node.files() {
            let path = dir.join(self.file(*file).name());
            self.write(&path, &self.render_file(*file), saved, summary)?;
        }
        for child in node.folders() {
            self.save_folder(*child, &dir.join(self.folder(*child).name()), saved, summary)?;
        }
        if self.writes_barrel(folder) {
            self.write(&dir.join(INDEX_FILE), &self.barrel(folder), saved, summary)?;
        } else if node.wants_barrel() && self.index_file(folder).is_none() {
            debug!(folder = %self.folder_path(folder), "nothing to export, no barrel");
        }
        Ok(())
    }

    fn write(
        &self,
        path: &Path,
        content: &str,
        saved: &mut BTreeSet<PathBuf>,
        summary: &mut SaveSummary,
    ) -> eyre::Result<()> {
        if write_if_changed(path, content)? == WriteResult::Written {
            summary.written += 1;
        }
        summary.files += 1;
        saved.insert(path.to_path_buf());
        Ok(())
    }

    /// Whether saving `folder` generates its `index.ts`: a barrel is wanted,
    /// no `index.ts` file was created in it and it has something to export.
    pub fn writes_barrel(&self, folder: FolderId) -> bool {
        self.folder(folder).wants_barrel()
            && self.index_file(folder).is_none()
            && !self.barrel(folder).is_empty()
    }

    /// Whether `folder` is saved with an `index.ts` that can be re-exported.
    fn exports_barrel(&self, folder: FolderId) -> bool {
        self.index_file(folder).is_some() || self.writes_barrel(folder)
    }

    /// Content of the generated `index.ts` of `folder`.
    ///
    /// Files are re-exported one by one. Sub-folders with their own barrel are
    /// re-exported as a whole, the others are flattened.
    pub fn barrel(&self, folder: FolderId) -> String {
        let mut out = String::new();
        self.add_barrel_exports(folder, "", &mut out);
        out
    }

    fn add_barrel_exports(&self, folder: FolderId, prefix: &str, out: &mut String) {
        let node = self.folder(folder);
        for file in node.files() {
            let file = self.file(*file);
            if file.name().eq_ignore_ascii_case(INDEX_FILE) {
                continue;
            }
            out.push_str(&format!("export * from './{}{}';\n", prefix, file.stem()));
        }
        for child in node.folders() {
            let name = self.folder(*child).name();
            if self.has_barrel(*child) {
                if self.exports_barrel(*child) {
                    out.push_str(&format!("export * from './{}{}';\n", prefix, name));
                }
            } else {
                self.add_barrel_exports(*child, &format!("{prefix}{name}/"), out);
            }
        }
    }
}

fn is_source_file(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case(&SOURCE_EXTENSION[1..]))
}

//! Folder/file model.
//!
//! A [`SourceTree`] owns every folder, file and code part of a generation
//! pass. Folders and files are created on demand, never removed, and keep
//! their creation order for rendering and barrels.

mod naming;
mod paths;
mod save;

pub use save::{SaveStrategy, SaveSummary};

use crate::{
    Result,
    imports::{ImportSection, ImportTarget},
    parts::{PartArena, PartId, PartWriter},
};

/// Handle of a folder. The root is always the first folder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FolderId(pub(crate) usize);

/// Handle of a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FileId(pub(crate) usize);

/// The generated source extension.
pub const SOURCE_EXTENSION: &str = ".ts";

/// Canonical barrel name.
pub const INDEX_FILE: &str = "index.ts";

#[derive(Debug)]
pub struct FolderNode {
    name: String,
    parent: Option<FolderId>,
    folders: Vec<FolderId>,
    files: Vec<FileId>,
    barrel: bool,
}

impl FolderNode {
    /// Folder name, empty for the root.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parent(&self) -> Option<FolderId> {
        self.parent
    }

    pub fn folders(&self) -> &[FolderId] {
        &self.folders
    }

    pub fn files(&self) -> &[FileId] {
        &self.files
    }

    /// Whether a barrel was requested for this folder.
    pub fn wants_barrel(&self) -> bool {
        self.barrel
    }
}

#[derive(Debug)]
pub struct FileNode {
    name: String,
    folder: FolderId,
    body: PartId,
    imports: ImportSection,
}

impl FileNode {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// File name without its extension, as used in module specifiers.
    pub fn stem(&self) -> &str {
        naming::strip_extension(&self.name).unwrap_or(&self.name)
    }

    pub fn folder(&self) -> FolderId {
        self.folder
    }

    pub fn body(&self) -> PartId {
        self.body
    }

    pub fn imports(&self) -> &ImportSection {
        &self.imports
    }
}

/// A folder or file added to a tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Created {
    Folder(FolderId),
    File(FileId),
}

/// All folders, files and parts of one generation pass.
#[derive(Debug)]
pub struct SourceTree {
    folders: Vec<FolderNode>,
    files: Vec<FileNode>,
    pub(crate) parts: PartArena,
    created: Vec<Created>,
}

impl Default for SourceTree {
    fn default() -> Self {
        Self::new()
    }
}

impl SourceTree {
    pub fn new() -> Self {
        Self {
            folders: vec![FolderNode {
                name: String::new(),
                parent: None,
                folders: Vec::new(),
                files: Vec::new(),
                barrel: false,
            }],
            files: Vec::new(),
            parts: PartArena::default(),
            created: Vec::new(),
        }
    }

    /// Folders and files added since the last call, in creation order.
    ///
    /// The root is never reported.
    pub fn take_created(&mut self) -> Vec<Created> {
        std::mem::take(&mut self.created)
    }

    pub fn root(&self) -> FolderId {
        FolderId(0)
    }

    pub fn folder(&self, id: FolderId) -> &FolderNode {
        &self.folders[id.0]
    }

    pub fn file(&self, id: FileId) -> &FileNode {
        &self.files[id.0]
    }

    /// Every folder, root first, in creation order.
    pub fn folders(&self) -> impl Iterator<Item = FolderId> + '_ {
        (0..self.folders.len()).map(FolderId)
    }

    /// Every file, in creation order.
    pub fn files(&self) -> impl Iterator<Item = FileId> + '_ {
        (0..self.files.len()).map(FileId)
    }

    /// Find or create a folder below the root.
    pub fn find_or_create_folder(&mut self, path: &str) -> Result<FolderId> {
        self.find_or_create_folder_in(self.root(), path)
    }

    /// Find or create a folder below `base`. `..` moves to the parent folder.
    pub fn find_or_create_folder_in(&mut self, base: FolderId, path: &str) -> Result<FolderId> {
        let mut current = base;
        for segment in naming::segments(path) {
            current = match segment {
                ".." => self
                    .folder(current)
                    .parent
                    .ok_or_else(|| crate::Error::invalid_name(path, "goes above the root folder"))?,
                name => match self.child_folder(current, name) {
                    Some(existing) => existing,
                    None => {
                        naming::check_folder_name(name)?;
                        self.add_folder(current, name)
                    }
                },
            };
        }
        Ok(current)
    }

    pub fn find_folder(&self, path: &str) -> Option<FolderId> {
        self.find_folder_in(self.root(), path)
    }

    pub fn find_folder_in(&self, base: FolderId, path: &str) -> Option<FolderId> {
        let mut current = base;
        for segment in naming::segments(path) {
            current = match segment {
                ".." => self.folder(current).parent?,
                name => self.child_folder(current, name)?,
            };
        }
        Some(current)
    }

    /// Find or create a file from a root-relative path such as `Models/User.ts`.
    pub fn find_or_create_file(&mut self, path: &str) -> Result<FileId> {
        self.find_or_create_file_in(self.root(), path)
    }

    pub fn find_or_create_file_in(&mut self, base: FolderId, path: &str) -> Result<FileId> {
        self.find_or_create_file_with_status(base, path)
            .map(|(file, _)| file)
    }

    /// Like [`find_or_create_file_in`](Self::find_or_create_file_in), also
    /// reporting whether the file was created by this call.
    pub fn find_or_create_file_with_status(
        &mut self,
        base: FolderId,
        path: &str,
    ) -> Result<(FileId, bool)> {
        let (folder_path, name) = naming::split_file_path(path)?;
        let folder = self.find_or_create_folder_in(base, folder_path)?;
        if let Some(existing) = self.child_file(folder, name) {
            return Ok((existing, false));
        }
        naming::check_file_name(name)?;
        if folder == self.root() && name.eq_ignore_ascii_case(INDEX_FILE) {
            return Err(crate::Error::RootIndexFile {
                name: name.to_string(),
            });
        }
        Ok((self.add_file(folder, name), true))
    }

    pub fn find_file(&self, path: &str) -> Option<FileId> {
        self.find_file_in(self.root(), path)
    }

    pub fn find_file_in(&self, base: FolderId, path: &str) -> Option<FileId> {
        let (folder_path, name) = naming::split_file_path(path).ok()?;
        let folder = self.find_folder_in(base, folder_path)?;
        self.child_file(folder, name)
    }

    /// Request a generated `index.ts` for `folder`.
    pub fn enable_barrel(&mut self, folder: FolderId) {
        self.folders[folder.0].barrel = true;
    }

    /// Whether `folder` asks for an `index.ts`, requested or hand-written.
    pub fn has_barrel(&self, folder: FolderId) -> bool {
        self.folder(folder).barrel || self.index_file(folder).is_some()
    }

    /// Hand-written `index.ts` of `folder`, whatever its case.
    pub fn index_file(&self, folder: FolderId) -> Option<FileId> {
        self.folder(folder)
            .files
            .iter()
            .copied()
            .find(|id| self.file(*id).name.eq_ignore_ascii_case(INDEX_FILE))
    }

    /// Every file of the subtree, depth-first.
    pub fn all_files_recursive(&self, folder: FolderId) -> Vec<FileId> {
        let mut files = Vec::new();
        self.collect_files(folder, &mut files);
        files
    }

    fn collect_files(&self, folder: FolderId, files: &mut Vec<FileId>) {
        let node = self.folder(folder);
        files.extend_from_slice(&node.files);
        for child in &node.folders {
            self.collect_files(*child, files);
        }
    }

    /// Writer on the body of a file.
    pub fn body(&mut self, file: FileId) -> PartWriter<'_> {
        let body = self.file(file).body;
        PartWriter::new(self, body)
    }

    /// Writer on any part.
    pub fn part(&mut self, id: PartId) -> PartWriter<'_> {
        PartWriter::new(self, id)
    }

    /// The file a part belongs to.
    pub fn part_file(&self, id: PartId) -> FileId {
        self.parts.node(id).file
    }

    /// Add imports to the import section of `file`.
    pub fn ensure_import(&mut self, file: FileId, target: ImportTarget, symbols: &[&str]) -> usize {
        self.files[file.0].imports.ensure_import(target, symbols)
    }

    /// Full text of a file: import block, blank line, body.
    pub fn render_file(&self, file: FileId) -> String {
        let node = self.file(file);
        let mut out = node.imports.render(self);
        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str(&self.parts.render(node.body));
        out
    }

    fn child_folder(&self, parent: FolderId, name: &str) -> Option<FolderId> {
        self.folder(parent)
            .folders
            .iter()
            .copied()
            .find(|id| self.folder(*id).name == name)
    }

    fn child_file(&self, folder: FolderId, name: &str) -> Option<FileId> {
        self.folder(folder)
            .files
            .iter()
            .copied()
            .find(|id| self.file(*id).name == name)
    }

    fn add_folder(&mut self, parent: FolderId, name: &str) -> FolderId {
        let id = FolderId(self.folders.len());
        self.folders.push(FolderNode {
            name: name.to_string(),
            parent: Some(parent),
            folders: Vec::new(),
            files: Vec::new(),
            barrel: false,
        });
        self.folders[parent.0].folders.push(id);
        self.created.push(Created::Folder(id));
        id
    }

    fn add_file(&mut self, folder: FolderId, name: &str) -> FileId {
        let id = FileId(self.files.len());
        let body = self.parts.alloc(id, false, None);
        self.files.push(FileNode {
            name: name.to_string(),
            folder,
            body,
            imports: ImportSection::new(id),
        });
        self.folders[folder.0].files.push(id);
        self.created.push(Created::File(id));
        tracing::trace!(path = %self.file_path(id), "created file");
        id
    }
}

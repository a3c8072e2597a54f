use super::{FileId, FolderId, SourceTree, naming};

impl SourceTree {
    /// Root-relative path of a folder, `""` for the root.
    pub fn folder_path(&self, folder: FolderId) -> String {
        let names: Vec<&str> = self
            .ancestors(folder)
            .into_iter()
            .rev()
            .skip(1)
            .map(|id| self.folder(id).name())
            .collect();
        names.join("/")
    }

    /// Root-relative path of a file.
    pub fn file_path(&self, file: FileId) -> String {
        let node = self.file(file);
        let folder = self.folder_path(node.folder());
        if folder.is_empty() {
            node.name().to_string()
        } else {
            format!("{}/{}", folder, node.name())
        }
    }

    /// Relative path from one folder to another.
    ///
    /// Starts with `.` for the folder itself and its descendants (`.`, `./a/b`)
    /// and with `..` when it has to go up (`..`, `../../c`).
    pub fn relative_path(&self, from: FolderId, to: FolderId) -> String {
        let from_chain = self.ancestors(from);
        let to_chain = self.ancestors(to);
        // Both chains end with the root.
        let common = from_chain
            .iter()
            .find(|id| to_chain.contains(id))
            .copied()
            .unwrap_or_else(|| self.root());

        let ups = from_chain.iter().take_while(|id| **id != common).count();
        let mut path = if ups == 0 {
            ".".to_string()
        } else {
            vec![".."; ups].join("/")
        };
        for id in to_chain
            .iter()
            .take_while(|id| **id != common)
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
        {
            path.push('/');
            path.push_str(self.folder(*id).name());
        }
        path
    }

    /// Apply a relative path computed by [`relative_path`](Self::relative_path).
    pub fn resolve_relative(&self, from: FolderId, path: &str) -> Option<FolderId> {
        let mut current = from;
        for segment in naming::segments(path) {
            current = match segment {
                ".." => self.folder(current).parent()?,
                name => self
                    .folder(current)
                    .folders()
                    .iter()
                    .copied()
                    .find(|id| self.folder(*id).name() == name)?,
            };
        }
        Some(current)
    }

    /// `folder` followed by its parents up to the root.
    fn ancestors(&self, folder: FolderId) -> Vec<FolderId> {
        let mut chain = vec![folder];
        let mut current = folder;
        while let Some(parent) = self.folder(current).parent() {
            chain.push(parent);
            current = parent;
        }
        chain
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tree() -> (SourceTree, Vec<FolderId>) {
        let mut tree = SourceTree::new();
        let folders = ["", "a", "a/b", "a/b/c", "a/d", "e", "e/f"]
            .iter()
            .map(|path| tree.find_or_create_folder(path).unwrap())
            .collect();
        (tree, folders)
    }

    #[test]
    fn test_relative_path_shapes() {
        let mut tree = SourceTree::new();
        let root = tree.root();
        let b = tree.find_or_create_folder("a/b").unwrap();
        let a = tree.find_folder("a").unwrap();
        let d = tree.find_or_create_folder("a/d").unwrap();
        let f = tree.find_or_create_folder("e/f").unwrap();

        assert_eq!(tree.relative_path(a, a), ".");
        assert_eq!(tree.relative_path(a, b), "./b");
        assert_eq!(tree.relative_path(root, b), "./a/b");
        assert_eq!(tree.relative_path(b, a), "..");
        assert_eq!(tree.relative_path(b, root), "../..");
        assert_eq!(tree.relative_path(b, d), "../d");
        assert_eq!(tree.relative_path(b, f), "../../e/f");
    }

    #[test]
    fn test_relative_path_round_trip() {
        let (tree, folders) = sample_tree();
        for from in &folders {
            for to in &folders {
                let there = tree.relative_path(*from, *to);
                let back = tree.relative_path(*to, *from);
                assert_eq!(tree.resolve_relative(*from, &there), Some(*to), "{there}");
                assert_eq!(tree.resolve_relative(*to, &back), Some(*from), "{back}");
                let landed = tree.resolve_relative(*from, &there).unwrap();
                assert_eq!(tree.resolve_relative(landed, &back), Some(*from));
            }
        }
    }

    #[test]
    fn test_paths() {
        let mut tree = SourceTree::new();
        let file = tree.find_or_create_file("a/b/c.ts").unwrap();
        let root_file = tree.find_or_create_file("main.ts").unwrap();
        assert_eq!(tree.folder_path(tree.root()), "");
        assert_eq!(tree.file_path(file), "a/b/c.ts");
        assert_eq!(tree.file_path(root_file), "main.ts");
    }
}

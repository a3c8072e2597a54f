use super::{Fragment, PartId, PartKey};
use crate::{imports::ImportTarget, tree::FileId, tree::SourceTree};

/// Mutable access to one part of a [`SourceTree`].
///
/// Text methods return `&mut Self` for chaining; methods creating children
/// return the child's [`PartId`], to be reopened with
/// [`SourceTree::part`] when it needs content.
///
/// ```
/// use tsweave_codegen::tree::SourceTree;
///
/// let mut tree = SourceTree::new();
/// let file = tree.find_or_create_file("user.ts").unwrap();
/// let mut body = tree.body(file);
/// body.append("export interface User ");
/// let props = body.open_block();
/// tree.part(props).append_line("name: string;");
///
/// assert_eq!(tree.render_file(file), "export interface User {\n  name: string;\n}\n");
/// ```
pub struct PartWriter<'a> {
    tree: &'a mut SourceTree,
    id: PartId,
}

impl<'a> PartWriter<'a> {
    pub(crate) fn new(tree: &'a mut SourceTree, id: PartId) -> Self {
        Self { tree, id }
    }

    pub fn id(&self) -> PartId {
        self.id
    }

    /// The file this part belongs to.
    pub fn file(&self) -> FileId {
        self.tree.parts.node(self.id).file
    }

    /// Append raw text.
    pub fn append(&mut self, text: &str) -> &mut Self {
        if text.is_empty() {
            return self;
        }
        let content = &mut self.tree.parts.node_mut(self.id).content;
        match content.last_mut() {
            Some(Fragment::Text(last)) => last.push_str(text),
            _ => content.push(Fragment::Text(text.to_string())),
        }
        self
    }

    pub fn new_line(&mut self) -> &mut Self {
        self.append("\n")
    }

    /// Append text followed by a new line.
    pub fn append_line(&mut self, text: &str) -> &mut Self {
        self.append(text).new_line()
    }

    /// Append a single-quoted TypeScript string literal.
    pub fn append_source_string(&mut self, value: &str) -> &mut Self {
        let mut literal = String::with_capacity(value.len() + 2);
        literal.push('\'');
        for c in value.chars() {
            match c {
                '\'' => literal.push_str("\\'"),
                '\\' => literal.push_str("\\\\"),
                '\n' => literal.push_str("\\n"),
                '\r' => literal.push_str("\\r"),
                '\t' => literal.push_str("\\t"),
                c => literal.push(c),
            }
        }
        literal.push('\'');
        self.append(&literal)
    }

    /// Append a JSDoc block. Does nothing for blank documentation.
    pub fn append_documentation(&mut self, doc: &str) -> &mut Self {
        if doc.trim().is_empty() {
            return self;
        }
        self.append_line("/**");
        for line in doc.lines() {
            let line = line.trim_end();
            if line.is_empty() {
                self.append_line(" *");
            } else {
                self.append(" * ").append_line(line);
            }
        }
        self.append_line(" */")
    }

    /// Replace the closer emitted after this part's content.
    pub fn set_closer(&mut self, closer: &str) -> &mut Self {
        self.tree.parts.node_mut(self.id).closer = Some(closer.to_string());
        self
    }

    /// Create an anonymous child at the current position.
    pub fn create_part(&mut self) -> PartId {
        self.tree.parts.add_child(self.id, false, None)
    }

    /// Create an anonymous child that ends with `closer`.
    pub fn create_part_with_closer(&mut self, closer: &str) -> PartId {
        self.tree
            .parts
            .add_child(self.id, false, Some(closer.to_string()))
    }

    /// Append `{` and return an indented child closed by `}`.
    pub fn open_block(&mut self) -> PartId {
        self.append_line("{");
        self.tree
            .parts
            .add_child(self.id, true, Some("}\n".to_string()))
    }

    pub fn find_named_part(&self, name: &str) -> Option<PartId> {
        self.tree.parts.node(self.id).named.get(name).copied()
    }

    /// Find the child registered under `name`, creating it at the current position.
    pub fn find_or_create_named_part(&mut self, name: &str) -> PartId {
        if let Some(existing) = self.find_named_part(name) {
            return existing;
        }
        let child = self.create_part();
        self.tree
            .parts
            .node_mut(self.id)
            .named
            .insert(name.to_string(), child);
        child
    }

    pub fn find_keyed_part(&self, key: &PartKey) -> Option<PartId> {
        self.tree.parts.node(self.id).keyed.get(key).copied()
    }

    /// Find the child registered under `key`, creating it at the current position.
    ///
    /// The closer only applies when the part is created.
    pub fn find_or_create_keyed_part(&mut self, key: PartKey, closer: Option<&str>) -> PartId {
        if let Some(existing) = self.find_keyed_part(&key) {
            return existing;
        }
        let child = self
            .tree
            .parts
            .add_child(self.id, false, closer.map(str::to_string));
        self.tree.parts.node_mut(self.id).keyed.insert(key, child);
        child
    }

    /// Like [`open_block`](Self::open_block), registered under `key`.
    ///
    /// The `{` is only written when the block is created.
    pub fn open_keyed_block(&mut self, key: PartKey) -> PartId {
        if let Some(existing) = self.find_keyed_part(&key) {
            return existing;
        }
        let block = self.open_block();
        self.tree.parts.node_mut(self.id).keyed.insert(key, block);
        block
    }

    /// Import `symbols` from another generated file into this part's file.
    pub fn ensure_import(&mut self, target: FileId, symbols: &[&str]) -> &mut Self {
        let file = self.file();
        self.tree
            .ensure_import(file, ImportTarget::File(target), symbols);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.tree.parts.is_empty(self.id)
    }

    pub fn render(&self) -> String {
        self.tree.parts.render(self.id)
    }
}

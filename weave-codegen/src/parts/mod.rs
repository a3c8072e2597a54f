//! Code part tree.
//!
//! Every file body is a tree of parts stored in a single arena and addressed
//! by [`PartId`]. A part holds an ordered mix of text and child parts, may be
//! indented one level relative to its parent, and may carry a closer that is
//! emitted after all of its content. Children can be registered under a name
//! or a [`PartKey`] so that later code finds the same region again and keeps
//! appending to it, long after the surrounding text has been written.

mod render;
mod writer;

use std::collections::HashMap;

use indexmap::IndexMap;

pub use render::INDENT;
pub use writer::PartWriter;

use crate::{tree::FileId, types::TypeId};

/// Stable handle of a part in its [`SourceTree`](crate::tree::SourceTree).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PartId(pub(crate) usize);

/// Lookup key of a keyed child part.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PartKey {
    /// The primary region of a resolved type.
    Type(TypeId),
    /// A well-known region shared by generators.
    Token(&'static str),
    /// Anything else.
    Custom(String),
}

/// Body of a class, between its braces.
pub const CLASS_BODY: PartKey = PartKey::Token("class-body");

/// Body of a class constructor, open for insertions by other generators.
pub const CONSTRUCTOR_BODY: PartKey = PartKey::Token("constructor-body");

#[derive(Debug)]
pub(crate) enum Fragment {
    Text(String),
    Part(PartId),
}

#[derive(Debug)]
pub(crate) struct PartNode {
    pub(crate) file: FileId,
    pub(crate) content: Vec<Fragment>,
    pub(crate) closer: Option<String>,
    pub(crate) indented: bool,
    pub(crate) named: IndexMap<String, PartId>,
    pub(crate) keyed: HashMap<PartKey, PartId>,
}

/// Storage of all parts of a tree.
#[derive(Debug, Default)]
pub(crate) struct PartArena {
    nodes: Vec<PartNode>,
}

impl PartArena {
    pub(crate) fn alloc(&mut self, file: FileId, indented: bool, closer: Option<String>) -> PartId {
        let id = PartId(self.nodes.len());
        self.nodes.push(PartNode {
            file,
            content: Vec::new(),
            closer,
            indented,
            named: IndexMap::new(),
            keyed: HashMap::new(),
        });
        id
    }

    pub(crate) fn node(&self, id: PartId) -> &PartNode {
        &self.nodes[id.0]
    }

    pub(crate) fn node_mut(&mut self, id: PartId) -> &mut PartNode {
        &mut self.nodes[id.0]
    }

    /// Allocate a child and place it at the current end of `parent`.
    pub(crate) fn add_child(
        &mut self,
        parent: PartId,
        indented: bool,
        closer: Option<String>,
    ) -> PartId {
        let file = self.node(parent).file;
        let child = self.alloc(file, indented, closer);
        self.node_mut(parent).content.push(Fragment::Part(child));
        child
    }

    /// Whether the part (children and closer included) renders to nothing.
    pub(crate) fn is_empty(&self, id: PartId) -> bool {
        let node = self.node(id);
        node.closer.as_deref().is_none_or(str::is_empty)
            && node.content.iter().all(|fragment| match fragment {
                Fragment::Text(text) => text.is_empty(),
                Fragment::Part(child) => self.is_empty(*child),
            })
    }
}

use super::{Fragment, PartArena, PartId};

/// One indentation level of generated TypeScript.
pub const INDENT: &str = "  ";

impl PartArena {
    /// Depth-first rendering of a part.
    ///
    /// Rendering does not mutate the tree and can be repeated.
    pub(crate) fn render(&self, id: PartId) -> String {
        let mut out = String::new();
        self.render_into(id, &mut out);
        out
    }

    fn render_into(&self, id: PartId, out: &mut String) {
        let node = self.node(id);
        if node.indented {
            let mut inner = String::new();
            self.render_content(&node.content, &mut inner);
            push_indented(&inner, out);
        } else {
            self.render_content(&node.content, out);
        }
        if let Some(closer) = &node.closer {
            out.push_str(closer);
        }
    }

    fn render_content(&self, content: &[Fragment], out: &mut String) {
        for fragment in content {
            match fragment {
                Fragment::Text(text) => out.push_str(text),
                Fragment::Part(child) => self.render_into(*child, out),
            }
        }
    }
}

/// Prefix every non-blank line with one indentation level.
fn push_indented(text: &str, out: &mut String) {
    for line in text.split_inclusive('\n') {
        if !line.trim().is_empty() {
            out.push_str(INDENT);
        }
        out.push_str(line);
    }
}

use crate::lang::{DefKind, Language};
use crate::pool;
use crate::syntax::errors::ParseError;
use crate::syntax::parser::collect_syntax_errors;
use std::ops::Range;

/// Arena index of a node. Node identity is positional: ids are assigned in
/// document order during lowering and never move afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) usize);

/// Structural role of a statement-level node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Module,
    Class,
    Function,
    Other,
}

impl From<DefKind> for NodeKind {
    fn from(kind: DefKind) -> Self {
        match kind {
            DefKind::Class => NodeKind::Class,
            DefKind::Function => NodeKind::Function,
        }
    }
}

impl NodeKind {
    /// The definition kind, if this node is a documentable definition.
    pub fn def_kind(&self) -> Option<DefKind> {
        match self {
            NodeKind::Class => Some(DefKind::Class),
            NodeKind::Function => Some(DefKind::Function),
            NodeKind::Module | NodeKind::Other => None,
        }
    }
}

#[derive(Debug, Clone)]
struct NodeData {
    kind: NodeKind,
    name: Option<String>,
    /// Byte range of the node in the original source. Spans of siblings are
    /// disjoint and ordered; a child span lies inside its parent's span.
    span: Range<usize>,
    /// Verified replacement text installed by a splice. Rendering emits this
    /// instead of the original span.
    replacement: Option<String>,
    children: Vec<NodeId>,
}

/// Statement-level syntax tree over one source unit.
///
/// The module root is `NodeId(0)`; its children are the ordered top-level
/// statements. Below the top level only class/function definitions become
/// nodes; all other bytes are preserved as untouched gap text between child
/// spans and reproduced verbatim by [`SyntaxTree::render`].
pub struct SyntaxTree {
    language: Language,
    source: String,
    nodes: Vec<NodeData>,
    parents: Vec<Option<NodeId>>,
}

impl SyntaxTree {
    /// Parse a source unit and lower it into a statement tree.
    ///
    /// Fails with [`ParseError::Syntax`] if the source contains any ERROR or
    /// MISSING nodes. The parent map is annotated before returning.
    pub fn parse(language: Language, source: impl Into<String>) -> Result<Self, ParseError> {
        let source = source.into();
        let ts_tree = pool::with_parser(language, |parser| parser.parse(&source))??;
        let root = ts_tree.root_node();

        let errors = collect_syntax_errors(root, &source);
        if !errors.is_empty() {
            return Err(ParseError::Syntax { errors });
        }

        let module = NodeData {
            kind: NodeKind::Module,
            name: None,
            span: 0..source.len(),
            replacement: None,
            children: Vec::new(),
        };
        let mut tree = Self {
            language,
            source,
            nodes: vec![module],
            parents: Vec::new(),
        };

        let mut cursor = root.walk();
        for child in root.named_children(&mut cursor) {
            tree.lower_statement(child, NodeId(0));
        }
        tree.annotate_parents();
        Ok(tree)
    }

    /// The module root.
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn language(&self) -> Language {
        self.language
    }

    /// Ordered top-level statements of the module body.
    pub fn body(&self) -> &[NodeId] {
        &self.nodes[0].children
    }

    /// Number of top-level statements.
    pub fn statement_count(&self) -> usize {
        self.nodes[0].children.len()
    }

    pub fn node_kind(&self, id: NodeId) -> NodeKind {
        self.nodes[id.0].kind
    }

    pub fn node_name(&self, id: NodeId) -> Option<&str> {
        self.nodes[id.0].name.as_deref()
    }

    pub fn children_of(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    /// Immediate syntactic parent, from the recomputed parent map.
    pub fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.parents[id.0]
    }

    /// Position of a node within its parent's statement sequence.
    pub fn child_index(&self, id: NodeId) -> Option<usize> {
        let parent = self.parent_of(id)?;
        self.nodes[parent.0].children.iter().position(|&c| c == id)
    }

    /// Recompute the parent map from the child lists.
    ///
    /// Runs once at the end of every full parse. The map is transient; it is
    /// never part of the rendered output.
    pub fn annotate_parents(&mut self) {
        self.parents = vec![None; self.nodes.len()];
        for id in 0..self.nodes.len() {
            for &child in &self.nodes[id].children {
                self.parents[child.0] = Some(NodeId(id));
            }
        }
    }

    /// Current text of a node: its replacement if spliced, otherwise the
    /// original span stitched around any spliced descendants.
    pub fn node_text(&self, id: NodeId) -> String {
        self.render_node(id)
    }

    /// Whether this node's slot has been replaced.
    pub fn is_replaced(&self, id: NodeId) -> bool {
        self.nodes[id.0].replacement.is_some()
    }

    /// Whether any enclosing node has already been replaced, making this
    /// node's original span unreachable in the rendered output.
    pub fn ancestor_replaced(&self, id: NodeId) -> bool {
        let mut current = self.parents[id.0];
        while let Some(parent) = current {
            if self.nodes[parent.0].replacement.is_some() {
                return true;
            }
            current = self.parents[parent.0];
        }
        false
    }

    /// Install verified replacement text into a node's slot.
    ///
    /// The replacement occupies exactly the one slot the original occupied;
    /// siblings keep their identity and position. Validation (single
    /// statement, matching kind) happens before this call. For nested slots
    /// the text is re-indented to the original definition's indentation.
    pub fn splice(&mut self, id: NodeId, replacement: &str) {
        let indent = self.leading_indent(id).to_string();
        let text = if indent.is_empty() {
            replacement.to_string()
        } else {
            let mut out = String::with_capacity(replacement.len());
            for (i, line) in replacement.lines().enumerate() {
                if i > 0 {
                    out.push('\n');
                    if !line.is_empty() {
                        out.push_str(&indent);
                    }
                }
                out.push_str(line);
            }
            out
        };
        self.nodes[id.0].replacement = Some(text);
    }

    /// Render the full unit back to source text.
    ///
    /// Untouched statements and all trivia between them (comments, blank
    /// lines) come back byte-for-byte from the original source.
    pub fn render(&self) -> String {
        self.render_node(self.root())
    }

    fn render_node(&self, id: NodeId) -> String {
        let node = &self.nodes[id.0];
        if let Some(text) = &node.replacement {
            return text.clone();
        }

        let mut out = String::with_capacity(node.span.len());
        let mut pos = node.span.start;
        for &child in &node.children {
            let child_span = &self.nodes[child.0].span;
            out.push_str(&self.source[pos..child_span.start]);
            out.push_str(&self.render_node(child));
            pos = child_span.end;
        }
        out.push_str(&self.source[pos..node.span.end]);
        out
    }

    /// Whitespace preceding the node on its own line, used to re-indent
    /// nested replacements. Empty when the node does not start a line.
    fn leading_indent(&self, id: NodeId) -> &str {
        let start = self.nodes[id.0].span.start;
        let line_start = self.source[..start].rfind('\n').map(|i| i + 1).unwrap_or(0);
        let prefix = &self.source[line_start..start];
        if prefix.chars().all(|c| c == ' ' || c == '\t') {
            prefix
        } else {
            ""
        }
    }

    /// Lower one top-level statement. Non-definition statements become Other
    /// nodes so the module body reflects every slot in source order.
    fn lower_statement(&mut self, cst: tree_sitter::Node<'_>, parent: NodeId) {
        match self.language.classify(cst) {
            Some((kind, inner)) => {
                let name = definition_name(inner, &self.source);
                let id = self.push_node(kind.into(), name, cst.byte_range(), parent);
                self.lower_nested(inner, id);
            }
            None => {
                let id = self.push_node(NodeKind::Other, None, cst.byte_range(), parent);
                self.lower_nested(cst, id);
            }
        }
    }

    /// Walk the CST below a statement, attaching every definition found to
    /// `parent` (or to the nearest enclosing definition once one is entered).
    fn lower_nested(&mut self, cst: tree_sitter::Node<'_>, parent: NodeId) {
        let mut cursor = cst.walk();
        let children: Vec<_> = cst.named_children(&mut cursor).collect();
        for child in children {
            match self.language.classify(child) {
                Some((kind, inner)) => {
                    let name = definition_name(inner, &self.source);
                    let id = self.push_node(kind.into(), name, child.byte_range(), parent);
                    self.lower_nested(inner, id);
                }
                None => self.lower_nested(child, parent),
            }
        }
    }

    fn push_node(
        &mut self,
        kind: NodeKind,
        name: Option<String>,
        span: Range<usize>,
        parent: NodeId,
    ) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeData {
            kind,
            name,
            span,
            replacement: None,
            children: Vec::new(),
        });
        self.nodes[parent.0].children.push(id);
        id
    }
}

fn definition_name(node: tree_sitter::Node<'_>, source: &str) -> Option<String> {
    node.child_by_field_name("name")
        .map(|n| source[n.byte_range()].to_string())
}

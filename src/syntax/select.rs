use crate::lang::DefKind;
use crate::syntax::tree::{NodeId, NodeKind, SyntaxTree};

/// A documentable definition selected for splicing.
///
/// Identity is positional: `index` is the node's slot within its parent's
/// statement sequence at selection time. Sequential single-slot replacement
/// keeps the indices of yet-unprocessed entities valid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    pub node: NodeId,
    pub kind: DefKind,
    pub index: usize,
    pub name: Option<String>,
}

impl Entity {
    /// Human-readable label for diagnostics.
    pub fn label(&self) -> String {
        match &self.name {
            Some(name) => format!("{} {}", self.kind, name),
            None => format!("unnamed {}", self.kind),
        }
    }
}

/// Walk the tree and yield the documentable entities in source order.
///
/// Selected: every class definition at any nesting depth, and every function
/// definition whose parent is the module root. Excluded: methods (functions
/// whose parent is a class — they are documented as part of their enclosing
/// class's regenerated text), nested functions, and functions inside
/// non-definition statements.
pub fn select_entities(tree: &SyntaxTree) -> Vec<Entity> {
    let mut entities = Vec::new();
    walk(tree, tree.root(), &mut entities);
    entities
}

fn walk(tree: &SyntaxTree, id: NodeId, entities: &mut Vec<Entity>) {
    for &child in tree.children_of(id) {
        let selected = match tree.node_kind(child) {
            NodeKind::Class => true,
            NodeKind::Function => tree.parent_of(child) == Some(tree.root()),
            NodeKind::Module | NodeKind::Other => false,
        };
        if selected {
            entities.push(Entity {
                node: child,
                kind: tree
                    .node_kind(child)
                    .def_kind()
                    .expect("selected nodes are definitions"),
                index: tree.child_index(child).unwrap_or(0),
                name: tree.node_name(child).map(str::to_string),
            });
        }
        walk(tree, child, entities);
    }
}

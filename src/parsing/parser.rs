//! Parser plumbing shared by the Ruby stub parser and its audit.

use std::collections::HashSet;
use tree_sitter::Node;

/// Nesting limit for recursive AST walks.
pub const MAX_AST_DEPTH: usize = 500;

/// Returns false (and logs) once `depth` exceeds [`MAX_AST_DEPTH`].
pub fn check_recursion_depth(depth: usize, node: Node) -> bool {
    if depth > MAX_AST_DEPTH {
        let pos = node.start_position();
        tracing::warn!(
            target: "parser",
            "maximum AST depth ({MAX_AST_DEPTH}) exceeded at line {}:{}, skipping subtree",
            pos.row + 1,
            pos.column + 1
        );
        return false;
    }
    true
}

/// A grammar node kind the parser has processed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HandledNode {
    pub name: String,
    pub id: u16,
}

pub trait NodeTracker {
    fn get_handled_nodes(&self) -> &HashSet<HandledNode>;
    fn register_handled_node(&mut self, node_kind: &str, node_id: u16);
}

#[derive(Debug, Default)]
pub struct NodeTrackingState {
    handled_nodes: HashSet<HandledNode>,
}

impl NodeTrackingState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.handled_nodes.clear();
    }
}

impl NodeTracker for NodeTrackingState {
    fn get_handled_nodes(&self) -> &HashSet<HandledNode> {
        &self.handled_nodes
    }

    fn register_handled_node(&mut self, node_kind: &str, node_id: u16) {
        self.handled_nodes.insert(HandledNode {
            name: node_kind.to_string(),
            id: node_id,
        });
    }
}

/// Truncate to at most `max_bytes` without splitting a UTF-8 character.
pub fn safe_truncate_str(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut end = max_bytes;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// Shorten for one-line display, appending `...` when cut.
pub fn truncate_for_display(s: &str, max_bytes: usize) -> String {
    let first_line = s.lines().next().unwrap_or("");
    let cut = safe_truncate_str(first_line, max_bytes);
    if cut.len() < s.len() {
        format!("{cut}...")
    } else {
        cut.to_string()
    }
}

//! Tree flattening (§4.8): turns a forest plus a set of expanded node ids
//! into the in-order sequence a tree controller scrolls over.

use std::collections::HashSet;

/// A node in an owned forest. Children are a plain `Vec`, not a lazily
/// loaded page — tree data is expected to be fully resident (§4.8 design
/// note: expand/collapse must be instantaneous, which rules out a
/// round-trip through a [`crate::data_source::DataSource`] on every
/// keypress).
#[derive(Debug, Clone)]
pub struct TreeNode<T> {
    pub id: String,
    pub data: T,
    pub children: Vec<TreeNode<T>>,
}

impl<T> TreeNode<T> {
    pub fn new(id: impl Into<String>, data: T) -> Self {
        Self { id: id.into(), data, children: Vec::new() }
    }

    pub fn with_children(mut self, children: Vec<TreeNode<T>>) -> Self {
        self.children = children;
        self
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }
}

/// One row of the flattened, in-order view over a forest.
#[derive(Debug, Clone)]
pub struct FlatTreeItem<T> {
    pub id: String,
    pub data: T,
    pub depth: usize,
    pub has_children: bool,
    pub expanded: bool,
    pub parent_id: Option<String>,
}

/// Depth-first, pre-order flattening (§4.8): a node's children appear
/// immediately after it only when `expanded` contains the node's id.
/// Collapsed subtrees contribute nothing to the output, not even a
/// placeholder row.
pub fn flatten_as_tree<T: Clone>(forest: &[TreeNode<T>], expanded: &HashSet<String>) -> Vec<FlatTreeItem<T>> {
    let mut out = Vec::new();
    flatten_into(forest, 0, None, expanded, &mut out);
    out
}

fn flatten_into<T: Clone>(
    nodes: &[TreeNode<T>],
    depth: usize,
    parent_id: Option<&str>,
    expanded: &HashSet<String>,
    out: &mut Vec<FlatTreeItem<T>>,
) {
    for node in nodes {
        let is_expanded = node.has_children() && expanded.contains(&node.id);
        out.push(FlatTreeItem {
            id: node.id.clone(),
            data: node.data.clone(),
            depth,
            has_children: node.has_children(),
            expanded: is_expanded,
            parent_id: parent_id.map(str::to_string),
        });
        if is_expanded {
            flatten_into(&node.children, depth + 1, Some(node.id.as_str()), expanded, out);
        }
    }
}

/// Walks every descendant id of `id` (not including `id` itself), for
/// cascading selection (§4.8) — selection follows the forest's real shape,
/// not whatever happens to be expanded right now.
pub fn descendant_ids<T>(forest: &[TreeNode<T>], id: &str) -> Vec<String> {
    fn find<'a, T>(nodes: &'a [TreeNode<T>], id: &str) -> Option<&'a TreeNode<T>> {
        for node in nodes {
            if node.id == id {
                return Some(node);
            }
            if let Some(found) = find(&node.children, id) {
                return Some(found);
            }
        }
        None
    }
    fn collect<T>(node: &TreeNode<T>, out: &mut Vec<String>) {
        for child in &node.children {
            out.push(child.id.clone());
            collect(child, out);
        }
    }
    let mut out = Vec::new();
    if let Some(node) = find(forest, id) {
        collect(node, &mut out);
    }
    out
}

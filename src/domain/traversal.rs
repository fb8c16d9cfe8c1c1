//! Whole-tree helpers built on [`AnyNode::for_each_child`].
//!
//! Nodes only enumerate their direct children; everything that needs the
//! full tree recurses here.

use termtree::Tree;
use tracing::instrument;

use crate::domain::fields::AnyNode;

/// Pre-order walk; `visit` receives each node with its depth (root = 0).
pub fn walk(root: &dyn AnyNode, visit: &mut dyn FnMut(&dyn AnyNode, usize)) {
    walk_at(root, 0, visit);
}

fn walk_at(node: &dyn AnyNode, depth: usize, visit: &mut dyn FnMut(&dyn AnyNode, usize)) {
    visit(node, depth);
    node.for_each_child(&mut |child| walk_at(child, depth + 1, &mut *visit));
}

/// Labels of the direct children, in visiting order.
pub fn child_labels(node: &dyn AnyNode) -> Vec<String> {
    let mut labels = Vec::new();
    node.for_each_child(&mut |child| labels.push(child.label()));
    labels
}

#[instrument(level = "trace", skip(root), fields(node = root.node_name()))]
pub fn count_nodes(root: &dyn AnyNode) -> usize {
    let mut count = 0;
    walk(root, &mut |_, _| count += 1);
    count
}

/// Number of levels; a lone leaf has depth 1.
pub fn depth(root: &dyn AnyNode) -> usize {
    let mut max = 0;
    walk(root, &mut |_, d| max = max.max(d + 1));
    max
}

/// True if every node reachable from `root` is published.
pub fn all_published(root: &dyn AnyNode) -> bool {
    let mut all = true;
    walk(root, &mut |node, _| all &= node.is_published());
    all
}

/// Render the tree for display. Unpublished nodes are marked with `*`.
pub fn to_tree(node: &dyn AnyNode) -> Tree<String> {
    let mut label = node.label();
    if !node.is_published() {
        label.push_str(" *");
    }
    let mut leaves = Vec::new();
    node.for_each_child(&mut |child| leaves.push(to_tree(child)));
    Tree::new(label).with_leaves(leaves)
}

//! Node types for the wildcard pattern trie.
//!
//! A node holds a label (the fragment of pattern text consumed on the edge
//! leading to it), a terminal flag marking that a stored pattern ends here,
//! and its children keyed by the first character of each child's label.
//!
//! Two node kinds exist. [`TreeNode`] is uniquely owned and mutable; it is what
//! insertion works on. [`DagNode`] is immutable and shared through `Arc`; it is
//! what the DAG builder produces. Read-only algorithms are written once against
//! the [`PatternNode`] trait.

use std::collections::{btree_map, BTreeMap};
use std::mem;
use std::sync::Arc;

use crate::digest::node_digest;

/// Read access to a trie node, shared by trees and DAGs.
pub trait PatternNode {
    /// The label consumed on the edge leading to this node.
    fn label(&self) -> &[char];

    /// Whether a stored pattern ends at this node.
    fn is_terminal(&self) -> bool;

    /// The child whose label starts with `key`, if any.
    fn child(&self, key: char) -> Option<&Self>;

    /// The children, in ascending key order.
    fn children<'a>(&'a self) -> Box<dyn Iterator<Item = (char, &'a Self)> + 'a>;
}

/// A uniquely owned, mutable trie node.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub(crate) struct TreeNode {
    /// The label consumed on the edge leading here; empty only at the root
    pub label: Vec<char>,

    /// Whether a pattern terminates here
    pub terminal: bool,

    /// Child nodes indexed by the first character of their label
    pub children: BTreeMap<char, TreeNode>,
}

impl TreeNode {
    /// Creates the empty root node.
    pub fn root() -> Self {
        TreeNode::default()
    }

    /// Creates a terminal leaf holding `label`.
    pub fn leaf(label: Vec<char>) -> Self {
        TreeNode {
            label,
            terminal: true,
            children: BTreeMap::new(),
        }
    }

    /// Splits this node after `at` characters of its label.
    ///
    /// The suffix becomes the only child and takes over the terminal flag and
    /// every existing child; this node keeps the prefix.
    pub fn split(&mut self, at: usize) {
        debug_assert!(at < self.label.len());

        let suffix = self.label.split_off(at);
        let key = suffix[0];
        let child = TreeNode {
            label: suffix,
            terminal: mem::take(&mut self.terminal),
            children: mem::take(&mut self.children),
        };
        self.children.insert(key, child);
    }

    /// Computes the structural digest of the subtree rooted here.
    ///
    /// Children are digested before their parent, walking an explicit stack
    /// so that arbitrarily deep trees are handled.
    pub fn digest(&self) -> u64 {
        let mut current = DigestFrame::new(self);
        let mut parents: Vec<(DigestFrame<'_>, char)> = Vec::new();

        loop {
            if let Some((&key, child)) = current.pending.next() {
                let parent = mem::replace(&mut current, DigestFrame::new(child));
                parents.push((parent, key));
                continue;
            }

            let digest = node_digest(
                &current.node.label,
                current.node.terminal,
                mem::take(&mut current.digests),
            );
            match parents.pop() {
                Some((parent, key)) => {
                    current = parent;
                    current.digests.push((key, digest));
                }
                None => return digest,
            }
        }
    }

    /// Returns the number of nodes in this subtree, including this one.
    pub fn subtree_nodes(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];

        while let Some(node) = stack.pop() {
            count += 1;
            stack.extend(node.children.values());
        }

        count
    }
}

/// A node whose children are still being digested.
struct DigestFrame<'a> {
    node: &'a TreeNode,
    pending: btree_map::Iter<'a, char, TreeNode>,
    digests: Vec<(char, u64)>,
}

impl<'a> DigestFrame<'a> {
    fn new(node: &'a TreeNode) -> Self {
        DigestFrame {
            node,
            pending: node.children.iter(),
            digests: Vec::with_capacity(node.children.len()),
        }
    }
}

// Deep chains would otherwise be dropped one stack frame per level
impl Drop for TreeNode {
    fn drop(&mut self) {
        let mut stack: Vec<TreeNode> = mem::take(&mut self.children).into_values().collect();

        while let Some(mut node) = stack.pop() {
            stack.extend(mem::take(&mut node.children).into_values());
        }
    }
}

impl PatternNode for TreeNode {
    fn label(&self) -> &[char] {
        &self.label
    }

    fn is_terminal(&self) -> bool {
        self.terminal
    }

    fn child(&self, key: char) -> Option<&Self> {
        self.children.get(&key)
    }

    fn children<'a>(&'a self) -> Box<dyn Iterator<Item = (char, &'a Self)> + 'a> {
        Box::new(self.children.iter().map(|(&key, child)| (key, child)))
    }
}

/// An immutable node that may be shared by several parents.
///
/// Children are kept as a slice sorted by key. The structural digest is
/// computed once, when the node is built, from the digests of its children.
#[derive(Debug)]
pub struct DagNode {
    label: Box<[char]>,
    terminal: bool,
    children: Box<[(char, Arc<DagNode>)]>,
    digest: u64,
}

impl DagNode {
    /// Builds a node over children that are already canonical.
    ///
    /// `children` must be sorted by key.
    pub(crate) fn new(
        label: Box<[char]>,
        terminal: bool,
        children: Box<[(char, Arc<DagNode>)]>,
    ) -> Self {
        debug_assert!(children.windows(2).all(|w| w[0].0 < w[1].0));

        let digest = node_digest(
            &label,
            terminal,
            children.iter().map(|(key, child)| (*key, child.digest)),
        );

        DagNode {
            label,
            terminal,
            children,
            digest,
        }
    }

    /// Returns the structural digest of the subgraph rooted here.
    pub fn digest(&self) -> u64 {
        self.digest
    }

    /// Returns `true` when `self` and `other` have the same structure.
    ///
    /// Children of both sides are canonical, so equal children are the same
    /// allocation and comparing pointers is enough.
    pub(crate) fn same_shape(&self, other: &DagNode) -> bool {
        self.terminal == other.terminal
            && self.label == other.label
            && self.children.len() == other.children.len()
            && self
                .children
                .iter()
                .zip(other.children.iter())
                .all(|((k1, c1), (k2, c2))| k1 == k2 && Arc::ptr_eq(c1, c2))
    }

    pub(crate) fn shared_children(&self) -> impl Iterator<Item = &Arc<DagNode>> {
        self.children.iter().map(|(_, child)| child)
    }
}

impl Drop for DagNode {
    fn drop(&mut self) {
        let mut stack: Vec<Arc<DagNode>> = mem::take(&mut self.children)
            .into_vec()
            .into_iter()
            .map(|(_, child)| child)
            .collect();

        // Only the last owner of a shared node takes its children apart
        while let Some(child) = stack.pop() {
            if let Some(mut node) = Arc::into_inner(child) {
                stack.extend(
                    mem::take(&mut node.children)
                        .into_vec()
                        .into_iter()
                        .map(|(_, child)| child),
                );
            }
        }
    }
}

impl PatternNode for DagNode {
    fn label(&self) -> &[char] {
        &self.label
    }

    fn is_terminal(&self) -> bool {
        self.terminal
    }

    fn child(&self, key: char) -> Option<&Self> {
        self.children
            .binary_search_by_key(&key, |(k, _)| *k)
            .ok()
            .map(|idx| &*self.children[idx].1)
    }

    fn children<'a>(&'a self) -> Box<dyn Iterator<Item = (char, &'a Self)> + 'a> {
        Box::new(self.children.iter().map(|(key, child)| (*key, &**child)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::to_chars;

    #[test]
    fn test_root_node() {
        let node = TreeNode::root();

        assert!(node.label.is_empty());
        assert!(!node.terminal);
        assert!(node.children.is_empty());
        assert_eq!(node.subtree_nodes(), 1);
    }

    #[test]
    fn test_split() {
        let mut node = TreeNode::leaf(to_chars("abcd"));
        node.children.insert('x', TreeNode::leaf(to_chars("xy")));

        node.split(2);

        assert_eq!(node.label, to_chars("ab"));
        assert!(!node.terminal);
        assert_eq!(node.children.len(), 1);

        let tail = &node.children[&'c'];
        assert_eq!(tail.label, to_chars("cd"));
        assert!(tail.terminal);
        assert!(tail.children.contains_key(&'x'));
        assert_eq!(node.subtree_nodes(), 3);
    }

    #[test]
    fn test_split_keeps_digest_sensitive() {
        let whole = TreeNode::leaf(to_chars("abcd"));
        let mut split = whole.clone();
        split.split(2);

        // Same patterns, different physical shape
        assert_ne!(whole.digest(), split.digest());
    }

    #[test]
    fn test_tree_and_dag_digest_agree() {
        let mut tree = TreeNode::leaf(to_chars("ab"));
        tree.children.insert('c', TreeNode::leaf(to_chars("cd")));

        let leaf = Arc::new(DagNode::new(to_chars("cd").into(), true, Box::new([])));
        let dag = DagNode::new(to_chars("ab").into(), true, vec![('c', leaf)].into());

        assert_eq!(tree.digest(), dag.digest());
    }

    #[test]
    fn test_same_shape() {
        let leaf = Arc::new(DagNode::new(to_chars("x").into(), true, Box::new([])));
        let other_leaf = Arc::new(DagNode::new(to_chars("x").into(), true, Box::new([])));
        let with = |label: &str, terminal: bool, children: Vec<(char, Arc<DagNode>)>| {
            DagNode::new(to_chars(label).into(), terminal, children.into())
        };

        let node = with("a", false, vec![('x', Arc::clone(&leaf))]);

        assert!(node.same_shape(&with("a", false, vec![('x', Arc::clone(&leaf))])));
        assert!(!node.same_shape(&with("a", true, vec![('x', Arc::clone(&leaf))])));
        assert!(!node.same_shape(&with("b", false, vec![('x', Arc::clone(&leaf))])));
        assert!(!node.same_shape(&with("a", false, Vec::new())));

        // Equal but not canonical children are not considered the same
        assert!(!node.same_shape(&with("a", false, vec![('x', other_leaf)])));
    }

    #[test]
    fn test_dag_child_lookup() {
        let b = Arc::new(DagNode::new(to_chars("b").into(), true, Box::new([])));
        let d = Arc::new(DagNode::new(to_chars("d").into(), true, Box::new([])));
        let node = DagNode::new(Box::new([]), false, vec![('b', b), ('d', d)].into());

        assert_eq!(node.child('b').map(|c| c.label().to_vec()), Some(vec!['b']));
        assert_eq!(node.child('d').map(|c| c.label().to_vec()), Some(vec!['d']));
        assert!(node.child('c').is_none());

        let keys: Vec<char> = node.children().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!['b', 'd']);
    }

    #[test]
    fn test_deep_tree_chain() {
        let depth = 100_000;
        let mut node = TreeNode::leaf(vec!['a']);
        for _ in 0..depth {
            let mut parent = TreeNode::leaf(vec!['a']);
            parent.children.insert('a', node);
            node = parent;
        }

        assert_eq!(node.subtree_nodes(), depth + 1);
        assert_eq!(node.digest(), node.digest());
        drop(node);
    }

    #[test]
    fn test_deep_dag_chain() {
        let mut node = Arc::new(DagNode::new(to_chars("a").into(), true, Box::new([])));
        for _ in 0..100_000 {
            node = Arc::new(DagNode::new(
                to_chars("a").into(),
                true,
                vec![('a', node)].into(),
            ));
        }

        let shared = Arc::clone(&node);
        drop(node);
        assert_eq!(shared.label(), &['a'][..]);
        drop(shared);
    }
}

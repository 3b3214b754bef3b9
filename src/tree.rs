//! The mutable pattern tree.
//!
//! This module contains the `PatternTree` type, the compressed trie that
//! patterns are inserted into before it is frozen into a
//! [`PatternDag`](crate::PatternDag).

use std::collections::btree_map::Entry;
use std::fmt;

use crate::dag::{self, PatternDag};
use crate::dump;
use crate::matcher::{find_all, find_matches, Limits};
use crate::node::TreeNode;
use crate::patterns::{self, Patterns};
use crate::util::{common_prefix_len, to_chars};
use crate::Result;

/// A compressed trie of wildcard patterns.
///
/// Patterns are stored verbatim: `*` and `?` only take on their wildcard
/// meaning when a query is matched with [`find`](PatternTree::find).
///
/// # Examples
///
/// ```
/// use wildcard_dawg::PatternTree;
///
/// let mut tree = PatternTree::new();
/// tree.add("abc");
/// tree.add("*bc");
/// tree.add("b*d");
///
/// assert_eq!(tree.find("abc"), vec!["*bc", "abc"]);
/// assert!(tree.find("xyz").is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PatternTree {
    root: TreeNode,

    /// The number of distinct patterns stored
    size: usize,
}

impl PatternTree {
    /// Creates a new, empty tree.
    ///
    /// ```
    /// use wildcard_dawg::PatternTree;
    ///
    /// let tree = PatternTree::new();
    /// assert!(tree.is_empty());
    /// ```
    pub fn new() -> Self {
        PatternTree {
            root: TreeNode::root(),
            size: 0,
        }
    }

    /// Returns the number of distinct patterns stored.
    pub fn len(&self) -> usize {
        self.size
    }

    /// Returns `true` if no pattern is stored.
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Adds a pattern to the tree.
    ///
    /// Returns `true` if the pattern was not stored yet. Adding the empty
    /// string does nothing and returns `false`.
    ///
    /// ```
    /// use wildcard_dawg::PatternTree;
    ///
    /// let mut tree = PatternTree::new();
    /// assert!(tree.add("a*c"));
    /// assert!(!tree.add("a*c"));
    /// assert!(!tree.add(""));
    /// assert_eq!(tree.len(), 1);
    /// ```
    pub fn add(&mut self, pattern: &str) -> bool {
        if pattern.is_empty() {
            return false;
        }

        let added = insert(&mut self.root, &to_chars(pattern));
        if added {
            self.size += 1;
        }
        tracing::trace!(pattern, added, "added pattern");
        added
    }

    /// Returns every stored pattern that matches `query`, sorted and without
    /// duplicates.
    pub fn find(&self, query: &str) -> Vec<String> {
        find_all(&self.root, query)
    }

    /// Like [`find`](PatternTree::find), but gives up with
    /// [`Error::StepLimitExceeded`](crate::Error::StepLimitExceeded) once the
    /// search explores more states than `limits` allows.
    pub fn find_with(&self, query: &str, limits: &Limits) -> Result<Vec<String>> {
        find_matches(&self.root, query, limits)
    }

    /// Returns `true` if exactly `pattern` is stored. Wildcards are compared
    /// literally.
    pub fn contains(&self, pattern: &str) -> bool {
        !pattern.is_empty() && patterns::contains(&self.root, &to_chars(pattern))
    }

    /// Iterates over the stored patterns in lexicographic order.
    pub fn patterns(&self) -> impl Iterator<Item = String> + '_ {
        Patterns::new(&self.root)
    }

    /// Returns the number of nodes in the tree, including the root.
    pub fn node_count(&self) -> usize {
        self.root.subtree_nodes()
    }

    /// Returns the canonical digest of the whole tree.
    ///
    /// The digest depends only on the tree's structure, so two trees built
    /// from the same patterns have the same digest whatever the insertion
    /// order, and so does the [`PatternDag`] built from either.
    pub fn structural_digest(&self) -> u64 {
        self.root.digest()
    }

    /// Freezes the tree into a DAG where structurally identical subtrees are
    /// shared.
    ///
    /// The tree is consumed. The DAG answers every query exactly like the
    /// tree did, but it cannot be modified.
    ///
    /// ```
    /// use wildcard_dawg::PatternTree;
    ///
    /// let tree: PatternTree = ["abc", "*cd", "*bc", "b*d", "*"].iter().collect();
    /// let expected = tree.find("abc");
    ///
    /// let dag = tree.into_dag();
    /// assert_eq!(dag.find("abc"), expected);
    /// ```
    pub fn into_dag(self) -> PatternDag {
        dag::build(self.root, self.size)
    }

    /// Renders the tree one node per line, for debugging.
    pub fn debug_string(&self) -> String {
        dump::render(&self.root)
    }
}

/// Inserts `pattern` below `root`, splitting labels where they diverge.
///
/// Returns `true` if a pattern ended at a node that was not terminal yet.
fn insert(root: &mut TreeNode, pattern: &[char]) -> bool {
    let mut node = root;
    let mut rest = pattern;

    loop {
        let common = common_prefix_len(rest, &node.label);
        if common < node.label.len() {
            node.split(common);
        }
        rest = &rest[common..];

        let key = match rest.first() {
            None => return !std::mem::replace(&mut node.terminal, true),
            Some(&key) => key,
        };
        match node.children.entry(key) {
            Entry::Occupied(child) => node = child.into_mut(),
            Entry::Vacant(slot) => {
                slot.insert(TreeNode::leaf(rest.to_vec()));
                return true;
            }
        }
    }
}

impl fmt::Display for PatternTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.debug_string())
    }
}

impl<S: AsRef<str>> Extend<S> for PatternTree {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        for pattern in iter {
            self.add(pattern.as_ref());
        }
    }
}

impl<S: AsRef<str>> FromIterator<S> for PatternTree {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut tree = PatternTree::new();
        tree.extend(iter);
        tree
    }
}

//! Structural sharing: turning a pattern tree into a DAG.
//!
//! The builder walks the tree bottom-up. Each node is rebuilt over its already
//! canonical children and then looked up by structural digest; when an equal
//! node has been seen before, that node is reused and the new one dropped.
//! Identical subtrees therefore end up as a single shared [`DagNode`], which
//! turns the trie into the minimal DAWG for the same pattern set.

use std::collections::{btree_map, HashMap, HashSet};
use std::fmt;
use std::mem;
use std::sync::Arc;

use once_cell::sync::OnceCell;

use crate::dump;
use crate::matcher::{find_all, find_matches, Limits};
use crate::node::{DagNode, TreeNode};
use crate::patterns::{self, Patterns};
use crate::util::to_chars;
use crate::Result;

/// A read-only pattern set whose identical subtrees are shared.
///
/// Built by [`PatternTree::into_dag`](crate::PatternTree::into_dag). It offers
/// the same queries as the tree and gives the same answers, but has no way to
/// add patterns: nodes may be referenced from several parents, so they are
/// never modified after construction.
///
/// Cloning is cheap and the DAG can be queried from several threads at once.
///
/// # Examples
///
/// ```
/// use wildcard_dawg::PatternTree;
///
/// let tree: PatternTree = ["a*c", "b*c", "*"].iter().collect();
/// let dag = tree.into_dag();
///
/// assert_eq!(dag.find("abbc"), vec!["*", "a*c"]);
/// assert_eq!(dag.len(), 3);
/// ```
#[derive(Clone)]
pub struct PatternDag {
    root: Arc<DagNode>,
    size: usize,
    node_count: Arc<OnceCell<usize>>,
}

impl PatternDag {
    /// Returns the number of distinct patterns stored.
    pub fn len(&self) -> usize {
        self.size
    }

    /// Returns `true` if no pattern is stored.
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Returns the root node.
    pub fn root(&self) -> &DagNode {
        &self.root
    }

    /// Returns every stored pattern that matches `query`, sorted and without
    /// duplicates.
    pub fn find(&self, query: &str) -> Vec<String> {
        find_all(&*self.root, query)
    }

    /// Like [`find`](PatternDag::find), but gives up once the search explores
    /// more states than `limits` allows.
    pub fn find_with(&self, query: &str, limits: &Limits) -> Result<Vec<String>> {
        find_matches(&*self.root, query, limits)
    }

    /// Returns `true` if exactly `pattern` is stored.
    pub fn contains(&self, pattern: &str) -> bool {
        !pattern.is_empty() && patterns::contains(&*self.root, &to_chars(pattern))
    }

    /// Iterates over the stored patterns in lexicographic order.
    pub fn patterns(&self) -> impl Iterator<Item = String> + '_ {
        Patterns::new(&*self.root)
    }

    /// Returns the number of distinct nodes, counting each shared node once.
    ///
    /// Computed on first use.
    pub fn node_count(&self) -> usize {
        *self.node_count.get_or_init(|| count_nodes(&self.root))
    }

    /// Returns the canonical digest of the whole DAG.
    ///
    /// This equals the digest of the tree the DAG was built from.
    pub fn structural_digest(&self) -> u64 {
        self.root.digest()
    }

    /// Renders the DAG one node per line; shared nodes are expanded once and
    /// marked with `*` wherever they appear again.
    pub fn debug_string(&self) -> String {
        dump::render(&*self.root)
    }
}

impl fmt::Debug for PatternDag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PatternDag")
            .field("size", &self.size)
            .field("digest", &format!("{:016x}", self.root.digest()))
            .finish()
    }
}

impl fmt::Display for PatternDag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.debug_string())
    }
}

/// Shares identical subtrees, keeping the first node seen for each structure.
struct DagBuilder {
    /// Representatives by digest; a bucket only holds more than one node
    /// when distinct structures collide
    registry: HashMap<u64, Vec<Arc<DagNode>>>,
    visited: usize,
}

impl DagBuilder {
    fn new() -> Self {
        DagBuilder {
            registry: HashMap::new(),
            visited: 0,
        }
    }

    /// Rebuilds the tree below `root` bottom-up, sharing every subtree that
    /// is already registered.
    ///
    /// The walk keeps its own stack of partly built nodes, so the depth of
    /// the tree is not limited by the call stack.
    fn canonicalize(&mut self, root: TreeNode) -> Arc<DagNode> {
        let mut current = BuildFrame::new(root);
        let mut parents: Vec<(BuildFrame, char)> = Vec::new();

        loop {
            if let Some((key, child)) = current.pending.next() {
                let parent = mem::replace(&mut current, BuildFrame::new(child));
                parents.push((parent, key));
                continue;
            }

            let node = self.intern(
                mem::take(&mut current.label).into(),
                current.terminal,
                mem::take(&mut current.done).into(),
            );
            match parents.pop() {
                Some((parent, key)) => {
                    current = parent;
                    current.done.push((key, node));
                }
                None => return node,
            }
        }
    }

    /// Returns the registered node with this structure, registering a new
    /// one if there is none. `children` must already be canonical.
    fn intern(
        &mut self,
        label: Box<[char]>,
        terminal: bool,
        children: Box<[(char, Arc<DagNode>)]>,
    ) -> Arc<DagNode> {
        self.visited += 1;

        let candidate = DagNode::new(label, terminal, children);
        let bucket = self.registry.entry(candidate.digest()).or_default();

        if let Some(existing) = bucket.iter().find(|existing| existing.same_shape(&candidate)) {
            return Arc::clone(existing);
        }

        if !bucket.is_empty() {
            tracing::warn!(
                digest = candidate.digest(),
                "structural digest collision, keeping subtrees apart"
            );
        }

        let node = Arc::new(candidate);
        bucket.push(Arc::clone(&node));
        node
    }
}

/// A tree node taken apart, waiting for its children to become canonical.
struct BuildFrame {
    label: Vec<char>,
    terminal: bool,
    pending: btree_map::IntoIter<char, TreeNode>,
    done: Vec<(char, Arc<DagNode>)>,
}

impl BuildFrame {
    fn new(mut node: TreeNode) -> Self {
        BuildFrame {
            label: mem::take(&mut node.label),
            terminal: node.terminal,
            done: Vec::with_capacity(node.children.len()),
            pending: mem::take(&mut node.children).into_iter(),
        }
    }
}

/// Converts the tree rooted at `root` into a DAG.
pub(crate) fn build(root: TreeNode, size: usize) -> PatternDag {
    let mut builder = DagBuilder::new();
    let root = builder.canonicalize(root);

    tracing::debug!(
        patterns = size,
        tree_nodes = builder.visited,
        dag_nodes = builder.registry.values().map(Vec::len).sum::<usize>(),
        "built pattern dag"
    );

    PatternDag {
        root,
        size,
        node_count: Arc::new(OnceCell::new()),
    }
}

fn count_nodes(root: &Arc<DagNode>) -> usize {
    let mut seen: HashSet<*const DagNode> = HashSet::new();
    let mut stack = vec![root];

    while let Some(node) = stack.pop() {
        if seen.insert(Arc::as_ptr(node)) {
            stack.extend(node.shared_children());
        }
    }

    seen.len()
}

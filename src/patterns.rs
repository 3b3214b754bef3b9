//! Iteration over stored patterns and exact lookups.

use std::collections::VecDeque;

use crate::node::PatternNode;
use crate::util::common_prefix_len;

/// An iterator over the patterns stored in a tree or DAG.
///
/// This iterator performs a depth-first traversal, visiting children in key
/// order, so patterns come out in lexicographic order. Each stacked node
/// carries the pattern text that leads up to it.
pub(crate) struct Patterns<'a, N> {
    stack: VecDeque<(&'a N, String)>,
}

impl<'a, N: PatternNode> Patterns<'a, N> {
    pub(crate) fn new(root: &'a N) -> Self {
        let mut stack = VecDeque::new();
        stack.push_back((root, String::new()));
        Patterns { stack }
    }
}

impl<'a, N: PatternNode> Iterator for Patterns<'a, N> {
    type Item = String;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((node, mut pattern)) = self.stack.pop_front() {
            pattern.extend(node.label().iter());

            let children: Vec<_> = node.children().collect();
            for (_, child) in children.into_iter().rev() {
                self.stack.push_front((child, pattern.clone()));
            }

            // The empty pattern is never stored, so the root is skipped
            if node.is_terminal() && !pattern.is_empty() {
                return Some(pattern);
            }
        }

        None
    }
}

/// Returns `true` if exactly `pattern` ends at a terminal node below `root`.
pub(crate) fn contains<N: PatternNode>(root: &N, pattern: &[char]) -> bool {
    let mut current = root;
    let mut remaining = pattern;

    loop {
        let label = current.label();
        let common = common_prefix_len(remaining, label);

        // The node's label isn't completely matched
        if common < label.len() {
            return false;
        }
        remaining = &remaining[common..];

        match remaining.first() {
            None => return current.is_terminal(),
            Some(&key) => match current.child(key) {
                Some(child) => current = child,
                None => return false,
            },
        }
    }
}

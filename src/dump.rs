//! Human readable dump of a tree or DAG.
//!
//! One line per node, indented two spaces per level:
//!
//! ```text
//! []
//!   [*]
//!     [bc] ($)
//!   [abc]* ($)
//! ```
//!
//! `($)` marks a node where a pattern ends. A `*` after the label marks a node
//! that was already printed higher up; in a DAG this is how sharing shows up,
//! and such a node is not expanded again.

use std::collections::HashSet;

use crate::node::PatternNode;

pub(crate) fn render<N: PatternNode>(root: &N) -> String {
    let mut out = String::new();
    let mut visited: HashSet<*const N> = HashSet::new();
    let mut stack = vec![(root, 0usize)];

    while let Some((node, depth)) = stack.pop() {
        for _ in 0..depth {
            out.push_str("  ");
        }
        out.push('[');
        out.extend(node.label().iter());
        out.push(']');

        let first_visit = visited.insert(node as *const N);
        if !first_visit {
            out.push('*');
        }
        if node.is_terminal() {
            out.push_str(" ($)");
        }
        out.push('\n');

        if first_visit {
            // Reversed, so the smallest key is printed first
            let children: Vec<_> = node.children().collect();
            stack.extend(children.into_iter().rev().map(|(_, child)| (child, depth + 1)));
        }
    }

    out
}

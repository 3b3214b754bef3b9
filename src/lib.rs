//! # Wildcard DAWG
//!
//! A compressed trie of wildcard patterns that can be frozen into a DAWG.
//!
//! Patterns are made of literal characters plus two wildcards: `*` matches any
//! run of zero or more characters and `?` matches exactly one. Patterns are
//! stored in a radix trie ([`PatternTree`]); a query string is matched against
//! every stored pattern at once by walking the trie and following each way the
//! wildcards can consume the query.
//!
//! ## Features
//!
//! - **Compressed storage**: chains of single-child nodes collapse into one
//!   labelled edge
//! - **Glob matching**: [`find`](PatternTree::find) returns every stored
//!   pattern matching a query
//! - **Structural sharing**: [`into_dag`](PatternTree::into_dag) merges
//!   identical subtrees into shared nodes, without changing any match result
//! - **Structural digest**: a canonical 64-bit hash of the trie's shape,
//!   independent of insertion order
//!
//! ## Example
//!
//! ```rust
//! use wildcard_dawg::PatternTree;
//!
//! let mut tree = PatternTree::new();
//! tree.add("abc");
//! tree.add("*cd");
//! tree.add("*bc");
//! tree.add("b*d");
//! tree.add("*");
//!
//! assert_eq!(tree.find("abc"), vec!["*", "*bc", "abc"]);
//!
//! // Freeze into a DAG; results are unchanged
//! let dag = tree.into_dag();
//! assert_eq!(dag.find("abc"), vec!["*", "*bc", "abc"]);
//! ```

mod dag;
mod digest;
mod dump;
mod matcher;
pub mod node;
mod patterns;
mod tree;
mod util;

// Re-export public types
pub use crate::dag::PatternDag;
pub use crate::matcher::{glob_match, Limits};
pub use crate::node::{DagNode, PatternNode};
pub use crate::tree::PatternTree;

/// Errors that can occur while matching patterns.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The search explored more states than its [`Limits`] allow
    #[error("wildcard search exceeded its limit of {limit} steps")]
    StepLimitExceeded {
        /// The configured maximum number of steps
        limit: usize,
    },
}

/// Result type for fallible pattern operations.
pub type Result<T> = std::result::Result<T, Error>;

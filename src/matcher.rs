//! Wildcard matching against stored patterns.
//!
//! Labels stored in the trie are pattern fragments: `*` matches any run of
//! zero or more characters, `?` matches exactly one character and every other
//! character matches itself. Because `*` can stop after any number of
//! characters, matching a label from one query offset can finish at several
//! offsets. Each of these continuation points is explored separately when the
//! traversal descends into the children.

use std::collections::{BTreeSet, HashSet};

use crate::node::PatternNode;
use crate::util::to_chars;
use crate::{Error, Result};

const ANY_RUN: char = '*';
const ANY_ONE: char = '?';

/// Bounds applied to a single search.
///
/// The default is unbounded. Heavily wildcarded patterns against long queries
/// can take exponential time; a step budget turns that into an error instead.
///
/// ```
/// use wildcard_dawg::{Limits, PatternTree};
///
/// let tree: PatternTree = ["a*b*c"].iter().collect();
/// let limits = Limits::new().max_steps(10_000);
///
/// assert_eq!(tree.find_with("aXbYc", &limits).unwrap(), vec!["a*b*c"]);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Limits {
    max_steps: Option<usize>,
}

impl Limits {
    /// Creates unbounded limits.
    pub fn new() -> Self {
        Self::default()
    }

    /// Caps the number of matcher states a search may explore.
    pub fn max_steps(mut self, steps: usize) -> Self {
        self.max_steps = Some(steps);
        self
    }
}

/// Counts explored states against the configured limit.
#[derive(Debug)]
struct Budget {
    used: usize,
    limit: Option<usize>,
}

impl Budget {
    fn new(limits: &Limits) -> Self {
        Budget {
            used: 0,
            limit: limits.max_steps,
        }
    }

    fn spend(&mut self) -> Result<()> {
        self.used += 1;
        match self.limit {
            Some(limit) if self.used > limit => {
                tracing::debug!(limit, "wildcard search exhausted its step budget");
                Err(Error::StepLimitExceeded { limit })
            }
            _ => Ok(()),
        }
    }
}

/// Returns every query offset at which `label` can finish matching when it
/// starts at `start`, in ascending order.
///
/// States `(label position, query position)` are explored from an explicit
/// worklist and each state is visited at most once.
fn continuations(
    label: &[char],
    query: &[char],
    start: usize,
    budget: &mut Budget,
) -> Result<Vec<usize>> {
    let mut ends = BTreeSet::new();
    let mut seen = HashSet::new();
    let mut work = vec![(0usize, start)];

    while let Some((p, i)) = work.pop() {
        if !seen.insert((p, i)) {
            continue;
        }
        budget.spend()?;

        if p == label.len() {
            ends.insert(i);
            continue;
        }
        if i > query.len() {
            continue;
        }

        let more = i < query.len();
        match label[p] {
            ANY_RUN => {
                work.push((p + 1, i));
                if more {
                    work.push((p, i + 1));
                }
            }
            ANY_ONE => {
                if more {
                    work.push((p + 1, i + 1));
                }
            }
            literal => {
                if more && query[i] == literal {
                    work.push((p + 1, i + 1));
                }
            }
        }
    }

    Ok(ends.into_iter().collect())
}

/// Returns `true` when `query` matches the wildcard `pattern` as a whole.
///
/// ```
/// use wildcard_dawg::glob_match;
///
/// assert!(glob_match("a*c", "abbc"));
/// assert!(glob_match("a?c", "abc"));
/// assert!(!glob_match("a?c", "abbc"));
/// ```
pub fn glob_match(pattern: &str, query: &str) -> bool {
    let pattern = to_chars(pattern);
    let query = to_chars(query);

    match continuations(&pattern, &query, 0, &mut Budget::new(&Limits::default())) {
        Ok(ends) => ends.last() == Some(&query.len()),
        Err(_) => false,
    }
}

/// Collects every stored pattern under `root` that matches `query`.
///
/// The result is sorted and free of duplicates. Nodes are visited from an
/// explicit worklist; each entry remembers how long the pattern text leading
/// to its parent is, so the shared buffer can be cut back before the node's
/// own label is appended.
pub(crate) fn find_matches<N: PatternNode>(
    root: &N,
    query: &str,
    limits: &Limits,
) -> Result<Vec<String>> {
    let query = to_chars(query);
    let mut budget = Budget::new(limits);
    let mut found = BTreeSet::new();
    let mut pattern = String::new();
    let mut work = vec![(root, 0usize, 0usize)];

    while let Some((node, entry, mark)) = work.pop() {
        let ends = continuations(node.label(), &query, entry, &mut budget)?;
        if ends.is_empty() {
            continue;
        }

        pattern.truncate(mark);
        pattern.extend(node.label().iter());
        let reached = pattern.len();

        for end in ends {
            if end == query.len() && node.is_terminal() {
                found.insert(pattern.clone());
            }
            work.extend(node.children().map(|(_, child)| (child, end, reached)));
        }
    }

    Ok(found.into_iter().collect())
}

/// Runs [`find_matches`] without a step limit.
pub(crate) fn find_all<N: PatternNode>(root: &N, query: &str) -> Vec<String> {
    let found = find_matches(root, query, &Limits::default());
    debug_assert!(found.is_ok(), "a search without a step limit cannot run out of steps");
    found.unwrap_or_default()
}

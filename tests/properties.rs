use std::collections::BTreeSet;

use quickcheck::{quickcheck, Arbitrary, Gen};
use wildcard_dawg::{glob_match, PatternTree};

/// Textbook recursive glob matcher, kept independent of the crate.
fn reference_match(pattern: &[char], query: &[char]) -> bool {
    match (pattern.first(), query.first()) {
        (None, None) => true,
        (None, Some(_)) => false,
        (Some('*'), _) => {
            reference_match(&pattern[1..], query)
                || (!query.is_empty() && reference_match(pattern, &query[1..]))
        }
        (Some('?'), Some(_)) => reference_match(&pattern[1..], &query[1..]),
        (Some(p), Some(q)) if p == q => reference_match(&pattern[1..], &query[1..]),
        _ => false,
    }
}

fn matches(pattern: &str, query: &str) -> bool {
    let pattern: Vec<char> = pattern.chars().collect();
    let query: Vec<char> = query.chars().collect();
    reference_match(&pattern, &query)
}

fn pick(g: &mut Gen, alphabet: &[char], max_len: usize) -> String {
    let len = usize::arbitrary(g) % (max_len + 1);
    (0..len)
        .map(|_| *g.choose(alphabet).unwrap_or(&alphabet[0]))
        .collect()
}

/// A pattern over a small alphabet with both wildcards.
#[derive(Debug, Clone)]
struct Pattern(String);

impl Arbitrary for Pattern {
    fn arbitrary(g: &mut Gen) -> Self {
        Pattern(pick(g, &['a', 'b', 'c', '*', '?'], 6))
    }
}

/// A concrete query over the same literal alphabet.
#[derive(Debug, Clone)]
struct Query(String);

impl Arbitrary for Query {
    fn arbitrary(g: &mut Gen) -> Self {
        Query(pick(g, &['a', 'b', 'c'], 7))
    }
}

fn build(patterns: &[Pattern]) -> PatternTree {
    patterns.iter().map(|p| p.0.as_str()).collect()
}

quickcheck! {
    fn prop_find_is_exact(patterns: Vec<Pattern>, query: Query) -> bool {
        let tree = build(&patterns);

        let expected: BTreeSet<String> = patterns
            .iter()
            .map(|p| p.0.clone())
            .filter(|p| !p.is_empty() && matches(p, &query.0))
            .collect();
        let found: BTreeSet<String> = tree.find(&query.0).into_iter().collect();

        // No false positives and nothing missing
        found == expected
    }

    fn prop_dag_is_equivalent(patterns: Vec<Pattern>, queries: Vec<Query>) -> bool {
        let tree = build(&patterns);
        let digest = tree.structural_digest();
        let dag = tree.clone().into_dag();

        dag.structural_digest() == digest
            && dag.len() == tree.len()
            && dag.node_count() <= tree.node_count()
            && dag.patterns().eq(tree.patterns())
            && queries.iter().all(|q| dag.find(&q.0) == tree.find(&q.0))
    }

    fn prop_insertion_is_idempotent(patterns: Vec<Pattern>, query: Query) -> bool {
        let once = build(&patterns);
        let mut twice = once.clone();
        twice.extend(patterns.iter().map(|p| p.0.as_str()));

        once == twice && once.find(&query.0) == twice.find(&query.0)
    }

    fn prop_every_pattern_matches_its_expansion(pattern: Pattern, fill: Query) -> bool {
        // Replace each wildcard by a concrete run so the result must match
        let mut query = String::new();
        for ch in pattern.0.chars() {
            match ch {
                '*' => query.push_str(&fill.0),
                '?' => query.push(fill.0.chars().next().unwrap_or('a')),
                literal => query.push(literal),
            }
        }

        let tree = build(&[pattern.clone()]);
        pattern.0.is_empty() || tree.find(&query) == vec![pattern.0.clone()]
    }

    fn prop_glob_match_agrees(pattern: Pattern, query: Query) -> bool {
        glob_match(&pattern.0, &query.0) == matches(&pattern.0, &query.0)
    }

    fn prop_digest_ignores_insertion_order(patterns: Vec<Pattern>) -> bool {
        let forward = build(&patterns);
        let mut reversed = patterns.clone();
        reversed.reverse();
        let backward = build(&reversed);

        forward.structural_digest() == backward.structural_digest() && forward == backward
    }
}

//! Canonical structural digest of a trie node.
//!
//! A node is serialized from its logical structure only: the label, whether a
//! pattern terminates at the node, and the digest of every child in ascending
//! key order. The serialization is then folded with 64-bit FNV-1a, so the same
//! structure always produces the same digest, whether it is held by a
//! [`PatternTree`](crate::PatternTree) or a [`PatternDag`](crate::PatternDag).

use std::hash::Hasher;

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// 64-bit FNV-1a.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Fnv1a(u64);

impl Default for Fnv1a {
    fn default() -> Self {
        Fnv1a(FNV_OFFSET)
    }
}

impl Hasher for Fnv1a {
    fn write(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.0 ^= u64::from(byte);
            self.0 = self.0.wrapping_mul(FNV_PRIME);
        }
    }

    fn finish(&self) -> u64 {
        self.0
    }
}

/// Writes the canonical serialization of one node into `buf`.
///
/// Layout: `<label length>:<label>[<$ or space>]\n`, then one
/// `  <key><digest as 16 hex digits>\n` line per child. `children` must yield
/// keys in ascending order.
pub(crate) fn serialize<I>(buf: &mut String, label: &[char], terminal: bool, children: I)
where
    I: IntoIterator<Item = (char, u64)>,
{
    buf.push_str(&label.len().to_string());
    buf.push(':');
    buf.extend(label.iter());
    buf.push('[');
    buf.push(if terminal { '$' } else { ' ' });
    buf.push_str("]\n");

    for (key, digest) in children {
        buf.push_str("  ");
        buf.push(key);
        buf.push_str(&format!("{:016x}", digest));
        buf.push('\n');
    }
}

/// Computes the digest of a node from its label, terminal flag and the
/// already computed digests of its children.
pub(crate) fn node_digest<I>(label: &[char], terminal: bool, children: I) -> u64
where
    I: IntoIterator<Item = (char, u64)>,
{
    let mut buf = String::with_capacity(label.len() + 16);
    serialize(&mut buf, label, terminal, children);

    let mut hasher = Fnv1a::default();
    hasher.write(buf.as_bytes());
    hasher.finish()
}

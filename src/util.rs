/// Finds the length of the common prefix between a pattern and a node's label.
///
/// Returns the number of characters that match starting from the first one.
pub(crate) fn common_prefix_len(pattern: &[char], label: &[char]) -> usize {
    pattern
        .iter()
        .zip(label.iter())
        .take_while(|(a, b)| a == b)
        .count()
}

/// Splits a string into the `char` buffer the trie stores and matches on.
pub(crate) fn to_chars(s: &str) -> Vec<char> {
    s.chars().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_common_prefix_len() {
        let pattern = to_chars("abcdef");

        assert_eq!(common_prefix_len(&pattern, &to_chars("abc")), 3);
        assert_eq!(common_prefix_len(&pattern, &to_chars("abx")), 2);
        assert_eq!(common_prefix_len(&pattern, &to_chars("xyz")), 0);
        assert_eq!(common_prefix_len(&pattern, &[]), 0);

        // Label longer than the pattern
        assert_eq!(common_prefix_len(&to_chars("ab"), &to_chars("abcd")), 2);
    }

    #[test]
    fn test_common_prefix_len_multibyte() {
        // Wildcards are ordinary characters here
        let pattern = to_chars("é*ü");
        assert_eq!(common_prefix_len(&pattern, &to_chars("é*")), 2);
        assert_eq!(common_prefix_len(&pattern, &to_chars("e*")), 0);
    }
}

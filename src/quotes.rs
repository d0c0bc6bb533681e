//! Quote removal.
//!
//! Quote pairs are stripped one at a time, single quotes before double quotes. Text in
//! single quotes is kept literally; the first double-quoted section of a word gets `$`
//! substitution, later ones in the same word do not.

use crate::substitution::substitute;

const SINGLE: u8 = b'\'';
const DOUBLE: u8 = b'"';

/// A word cut around the outermost pair of one quote character.
struct QuotedSplit<'a> {
    before: &'a str,
    inner: &'a str,
    after: &'a str,
}

impl QuotedSplit<'_> {
    fn join(&self, inner: &str) -> String {
        let mut joined = String::with_capacity(self.before.len() + inner.len() + self.after.len());
        joined.push_str(self.before);
        joined.push_str(inner);
        joined.push_str(self.after);
        joined
    }
}

/// True if the word contains neither `'` nor `"`.
pub fn has_no_quotes(word: &str) -> bool {
    !word.contains(['\'', '"'])
}

/// Remove all quote pairs from a (trimmed) word.
///
/// A quote character that occurs only once in the word is left in place, so
/// `" ' "` resolves to ` ' `.
pub fn extract_quotes<F>(word: &str, lookup: F) -> String
where
    F: Fn(&str) -> String,
{
    let mut current = word.trim().to_string();
    let mut substitute_next = true;
    loop {
        let next = if let Some(split) = split_outermost(&current, SINGLE) {
            split.join(split.inner)
        } else if let Some(split) = split_outermost(&current, DOUBLE) {
            if substitute_next {
                substitute_next = false;
                split.join(&substitute(split.inner, &lookup))
            } else {
                split.join(split.inner)
            }
        } else {
            return current;
        };
        current = next;
    }
}

/// Locate the first and last `quote` in `word` and shrink inwards while both ends are
/// still quotes. Returns `None` unless the quote occurs at least twice.
fn split_outermost(word: &str, quote: u8) -> Option<QuotedSplit<'_>> {
    let bytes = word.as_bytes();
    let first = bytes.iter().position(|&b| b == quote)?;
    let last = bytes.iter().rposition(|&b| b == quote)?;
    if first == last {
        return None;
    }

    let (mut start, mut end) = (first, last);
    while start < end && bytes[start] == quote && bytes[end] == quote {
        start += 1;
        end -= 1;
    }
    // `end` may have stepped below `start` for words like `""`.
    let inner = if start <= end { &word[start..=end] } else { "" };

    Some(QuotedSplit {
        before: &word[..first],
        inner,
        after: &word[last + 1..],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(word: &str) -> String {
        extract_quotes(word, |name| match name {
            "x" => "text".to_string(),
            _ => String::new(),
        })
    }

    #[test]
    fn test_single_and_double_quotes() {
        assert_eq!(resolve("'text'"), "text");
        assert_eq!(resolve("\"text with spaces\""), "text with spaces");
        assert_eq!(resolve("\"\"text with spaces\"\""), "text with spaces");
    }

    #[test]
    fn test_nested_quotes() {
        assert_eq!(resolve("'\"text\"'"), "text");
        assert_eq!(resolve("\"'text'\""), "text");
    }

    #[test]
    fn test_single_quotes_suppress_substitution() {
        assert_eq!(resolve("'$x'"), "$x");
    }

    #[test]
    fn test_double_quotes_substitute() {
        assert_eq!(resolve("\"$x\""), "text");
        assert_eq!(resolve("\"   $x\""), "   text");
    }

    #[test]
    fn test_only_first_double_quoted_section_substitutes() {
        // The outermost pair is stripped first, so the inner `$x` is substituted
        // together with its surroundings and the leftover pair is just unquoted.
        assert_eq!(resolve("\"a\"$x\"b\""), "atextb");
        assert_eq!(resolve("x\"\""), "x");
    }

    #[test]
    fn test_lone_quote_is_kept() {
        assert_eq!(resolve("\" ' | \""), " ' | ");
    }

    #[test]
    fn test_empty_quotes() {
        assert_eq!(resolve("\"\""), "");
        assert_eq!(resolve("''"), "");
    }

    #[test]
    fn test_idempotent_once_unquoted() {
        for word in ["'text'", "\"$x\"", "\"a 'b' c\"", "plain"] {
            let once = resolve(word);
            assert_eq!(resolve(&once), once);
        }
    }

    #[test]
    fn test_has_no_quotes() {
        assert!(has_no_quotes("plain$x"));
        assert!(!has_no_quotes("it's"));
        assert!(!has_no_quotes("\"q\""));
    }
}

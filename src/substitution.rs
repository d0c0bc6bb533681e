//! `$identifier` substitution.
//!
//! Identifiers are lowercase: `[_a-z][_a-z0-9]*`. A `$` that is not followed by an
//! identifier is ordinary text.

use regex::{Captures, Regex};
use std::sync::LazyLock;

static REFERENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$([_a-z][_a-z0-9]*)").unwrap());

static WHOLE_REFERENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\$([_a-z][_a-z0-9]*)$").unwrap());

static IDENTIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[_a-z][_a-z0-9]*$").unwrap());

/// Replace every `$identifier` in `word` with `lookup(identifier)`.
///
/// Matches are found left to right and never overlap. Replaced text is not scanned
/// again, so a value containing `$y` stays as is.
pub fn substitute<F>(word: &str, lookup: F) -> String
where
    F: Fn(&str) -> String,
{
    if !word.contains('$') {
        return word.to_string();
    }
    let result = REFERENCE.replace_all(word, |caps: &Captures| lookup(&caps[1]));
    log::trace!("substituted {:?} -> {:?}", word, result);
    result.into_owned()
}

/// Returns the identifier if `word` is exactly one `$identifier` reference.
pub fn as_reference(word: &str) -> Option<&str> {
    WHOLE_REFERENCE
        .captures(word)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

pub fn is_identifier(name: &str) -> bool {
    IDENTIFIER.is_match(name)
}

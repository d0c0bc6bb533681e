//! Splitting an input line into words.
//!
//! A quoted section (one or more quote characters, some text, one or more matching quote
//! characters) always becomes a word of its own, even when it contains spaces or `|`.
//! The remaining text is split on whitespace and every `|` in it becomes a separate word.
//! Quotes stay in the words; they are removed later by [`crate::quotes`].

use crate::error::ParseError;
use regex::Regex;
use std::sync::LazyLock;

const QUOTED_PATTERN: &str = r#"("+[^"]+"+)|('+[^']+'+)"#;

static QUOTED: LazyLock<Regex> = LazyLock::new(|| Regex::new(QUOTED_PATTERN).unwrap());

static WHOLE_QUOTED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!("^(?:{QUOTED_PATTERN})$")).unwrap());

/// The word that separates pipeline stages.
pub const PIPE: &str = "|";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum QuoteState {
    Unquoted,
    Inside(char),
}

/// Split a raw input line into words.
///
/// Fails with [`ParseError::MismatchedQuotes`] when a quote is never closed. No word is
/// ever empty.
pub fn tokenize(line: &str) -> Result<Vec<String>, ParseError> {
    check_quotes_balance(line)?;

    let mut words = Vec::new();
    let mut plain_start = 0;
    for quoted in QUOTED.find_iter(line) {
        split_plain(&line[plain_start..quoted.start()], &mut words);
        words.push(quoted.as_str().to_string());
        plain_start = quoted.end();
    }
    split_plain(&line[plain_start..], &mut words);

    log::debug!("words: {:?}", words);
    Ok(words)
}

/// True if the whole word is one quoted section, like `"a | b"` or `''x''`.
pub fn is_quoted(word: &str) -> bool {
    WHOLE_QUOTED.is_match(word)
}

/// True if the word separates two pipeline stages.
pub fn is_pipe_boundary(word: &str) -> bool {
    !is_quoted(word) && word.contains(PIPE)
}

fn split_plain(text: &str, words: &mut Vec<String>) {
    for chunk in text.split_whitespace() {
        let mut rest = chunk;
        while let Some(idx) = rest.find(PIPE) {
            if idx > 0 {
                words.push(rest[..idx].to_string());
            }
            words.push(PIPE.to_string());
            rest = &rest[idx + PIPE.len()..];
        }
        if !rest.is_empty() {
            words.push(rest.to_string());
        }
    }
}

fn check_quotes_balance(line: &str) -> Result<(), ParseError> {
    let mut state = QuoteState::Unquoted;
    for ch in line.chars() {
        state = match (state, ch) {
            (QuoteState::Unquoted, '\'' | '"') => QuoteState::Inside(ch),
            (QuoteState::Inside(quote), c) if quote == c => QuoteState::Unquoted,
            (state, _) => state,
        };
    }
    match state {
        QuoteState::Unquoted => Ok(()),
        QuoteState::Inside(_) => Err(ParseError::MismatchedQuotes),
    }
}

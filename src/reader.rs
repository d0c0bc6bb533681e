//! Reading one pipeline stage out of a list of words.

use crate::env::VariableStore;
use crate::error::ParseError;
use crate::lexer::is_pipe_boundary;
use crate::quotes::{extract_quotes, has_no_quotes};
use crate::substitution::{as_reference, is_identifier, substitute};

/// A command ready to be dispatched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineStage {
    /// Command name after one substitution pass.
    pub name: String,
    /// Arguments with quotes removed and variables substituted.
    pub args: Vec<String>,
    /// Index of the first word of the next stage.
    pub next: usize,
}

/// What [`read_command`] found at the given position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stage {
    /// A `name=value` assignment that was already stored; nothing to execute.
    Assignment { next: usize },
    Command(PipelineStage),
}

struct WordCursor<'a> {
    words: &'a [String],
    pos: usize,
}

impl<'a> WordCursor<'a> {
    fn peek(&self) -> Option<&'a str> {
        self.words.get(self.pos).map(String::as_str)
    }

    fn consume(&mut self) -> Option<&'a str> {
        let word = self.peek();
        if word.is_some() {
            self.pos += 1;
        }
        word
    }

    /// Step over a `|` that ends the current stage. A `|` must be followed by a command.
    fn skip_boundary(&mut self) -> Result<(), ParseError> {
        if self.peek().is_some_and(is_pipe_boundary) {
            self.pos += 1;
            if self.peek().is_none() {
                return Err(ParseError::MissingCommand);
            }
        }
        Ok(())
    }
}

/// Read the stage that starts at `start`.
///
/// Assignments are applied to `vars` right away. For a command the arguments run up to
/// the next `|` or the end of `words`.
pub fn read_command(
    words: &[String],
    start: usize,
    vars: &mut VariableStore,
) -> Result<Stage, ParseError> {
    let mut cursor = WordCursor { words, pos: start };

    let first = match cursor.consume() {
        Some(word) if !is_pipe_boundary(word) => word,
        _ => return Err(ParseError::MissingCommand),
    };
    let name = substitute(first, |id| vars.get(id));

    if let Some((variable, inline)) = split_assignment(&name) {
        let value = if inline.is_empty() {
            match cursor.peek() {
                Some(word) if !is_pipe_boundary(word) => {
                    cursor.consume();
                    assigned_value(word, vars)
                }
                _ => return Err(ParseError::MissingAssignmentValue(variable.to_string())),
            }
        } else {
            // Already substituted together with the name.
            let value = extract_quotes(inline, |id| vars.get(id));
            match as_reference(&value) {
                Some(id) => vars.get(id),
                None => value,
            }
        };
        log::debug!("assign {} = {:?}", variable, value);
        vars.set(variable, value);
        cursor.skip_boundary()?;
        return Ok(Stage::Assignment { next: cursor.pos });
    }

    let mut args = Vec::new();
    while let Some(word) = cursor.peek() {
        if is_pipe_boundary(word) {
            break;
        }
        args.push(process_argument(word, vars));
        cursor.consume();
    }
    cursor.skip_boundary()?;

    Ok(Stage::Command(PipelineStage {
        name,
        args,
        next: cursor.pos,
    }))
}

/// Resolve quotes and variables in a single argument word.
pub fn process_argument(word: &str, vars: &VariableStore) -> String {
    if has_no_quotes(word) {
        substitute(word, |id| vars.get(id))
    } else {
        extract_quotes(word, |id| vars.get(id))
    }
}

/// A right-hand side that is exactly `$other` copies the current value of `other`.
fn assigned_value(word: &str, vars: &VariableStore) -> String {
    match as_reference(word) {
        Some(id) => vars.get(id),
        None => process_argument(word, vars),
    }
}

/// Split `name=rest` if `name` is a valid identifier.
fn split_assignment(word: &str) -> Option<(&str, &str)> {
    let (name, rest) = word.split_once('=')?;
    is_identifier(name).then_some((name, rest))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn command(stage: Stage) -> PipelineStage {
        match stage {
            Stage::Command(stage) => stage,
            Stage::Assignment { .. } => panic!("expected a command, got {:?}", stage),
        }
    }

    #[test]
    fn test_read_echo() {
        let mut vars = VariableStore::new();
        let input = words(&["echo", "word", "another", "word", "\"in quotes\""]);
        let stage = command(read_command(&input, 0, &mut vars).unwrap());

        assert_eq!(stage.name, "echo");
        assert_eq!(stage.args, vec!["word", "another", "word", "in quotes"]);
        assert_eq!(stage.next, 5);
    }

    #[test]
    fn test_pipe_first_and_second_command() {
        let mut vars = VariableStore::new();
        let input = words(&["echo", "text", "\"more text\"", "|", "cat"]);

        let echo = command(read_command(&input, 0, &mut vars).unwrap());
        assert_eq!(echo.name, "echo");
        assert_eq!(echo.args, vec!["text", "more text"]);
        assert_eq!(echo.next, 4);

        let cat = command(read_command(&input, echo.next, &mut vars).unwrap());
        assert_eq!(cat.name, "cat");
        assert!(cat.args.is_empty());
        assert_eq!(cat.next, 5);
    }

    #[test]
    fn test_quoted_pipe_is_an_argument() {
        let mut vars = VariableStore::new();
        let input = words(&["echo", "\"|\"", "'a|b'"]);
        let stage = command(read_command(&input, 0, &mut vars).unwrap());
        assert_eq!(stage.args, vec!["|", "a|b"]);
    }

    #[test]
    fn test_inline_assignment() {
        let mut vars = VariableStore::new();
        let stage = read_command(&words(&["x=text"]), 0, &mut vars).unwrap();

        assert_eq!(stage, Stage::Assignment { next: 1 });
        assert_eq!(vars.get("x"), "text");
    }

    #[test]
    fn test_assignment_of_quoted_value_uses_next_word() {
        let mut vars = VariableStore::new();
        let input = words(&["x=", "\"text with spaces\"", "echo", "$x"]);

        let stage = read_command(&input, 0, &mut vars).unwrap();
        assert_eq!(stage, Stage::Assignment { next: 2 });
        assert_eq!(vars.get("x"), "text with spaces");

        let echo = command(read_command(&input, 2, &mut vars).unwrap());
        assert_eq!(echo.args, vec!["text with spaces"]);
    }

    #[test]
    fn test_assignment_copies_referenced_value() {
        let mut vars = VariableStore::new();
        read_command(&words(&["x=texttext"]), 0, &mut vars).unwrap();
        read_command(&words(&["y=x"]), 0, &mut vars).unwrap();
        assert_eq!(vars.get("y"), "x");

        read_command(&words(&["y=$x"]), 0, &mut vars).unwrap();
        assert_eq!(vars.get("y"), "texttext");

        read_command(&words(&["x=other"]), 0, &mut vars).unwrap();
        assert_eq!(vars.get("y"), "texttext");
    }

    #[test]
    fn test_single_quoted_reference_is_stored_literally() {
        let mut vars = VariableStore::new();
        vars.set("x", "value");
        read_command(&words(&["y=", "'$x'"]), 0, &mut vars).unwrap();
        assert_eq!(vars.get("y"), "$x");
    }

    #[test]
    fn test_assignment_followed_by_pipe() {
        let mut vars = VariableStore::new();
        let input = words(&["x=1", "|", "echo", "$x"]);
        let stage = read_command(&input, 0, &mut vars).unwrap();
        assert_eq!(stage, Stage::Assignment { next: 2 });
    }

    #[test]
    fn test_assignment_without_value() {
        let mut vars = VariableStore::new();
        assert_eq!(
            read_command(&words(&["x="]), 0, &mut vars),
            Err(ParseError::MissingAssignmentValue("x".to_string()))
        );
        assert_eq!(
            read_command(&words(&["x=", "|", "wc"]), 0, &mut vars),
            Err(ParseError::MissingAssignmentValue("x".to_string()))
        );
    }

    #[test]
    fn test_invalid_identifier_is_a_command() {
        let mut vars = VariableStore::new();
        let stage = command(read_command(&words(&["X=1"]), 0, &mut vars).unwrap());
        assert_eq!(stage.name, "X=1");
    }

    #[test]
    fn test_substitution_in_command_name() {
        let mut vars = VariableStore::new();
        read_command(&words(&["a=p"]), 0, &mut vars).unwrap();
        read_command(&words(&["b=wd"]), 0, &mut vars).unwrap();

        let stage = command(read_command(&words(&["$a$b"]), 0, &mut vars).unwrap());
        assert_eq!(stage.name, "pwd");
        assert!(stage.args.is_empty());
        assert_eq!(stage.next, 1);
    }

    #[test]
    fn test_substitution_in_arguments() {
        let mut vars = VariableStore::new();
        vars.set("x", "text");
        let input = words(&["echo", "\"$x\"", "more", "$x", "'$x'"]);
        let stage = command(read_command(&input, 0, &mut vars).unwrap());
        assert_eq!(stage.args, vec!["text", "more", "text", "$x"]);
    }

    #[test]
    fn test_trailing_pipe() {
        let mut vars = VariableStore::new();
        let input = words(&["echo", "text", "|"]);
        assert_eq!(
            read_command(&input, 0, &mut vars),
            Err(ParseError::MissingCommand)
        );
    }

    #[test]
    fn test_leading_pipe() {
        let mut vars = VariableStore::new();
        assert_eq!(
            read_command(&words(&["|", "wc"]), 0, &mut vars),
            Err(ParseError::MissingCommand)
        );
    }
}

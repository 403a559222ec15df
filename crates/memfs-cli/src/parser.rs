//! Command parser: one shell line -> one structured command.
//!
//! Pure string handling; nothing here touches the store.

use memfs_core::Request;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Request(Request),
    Help,
    Clear,
    Exit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("Invalid command format. Use 'help' command for usage")]
    InvalidFormat,

    #[error("Invalid filename: {0}")]
    InvalidFilename(String),

    #[error("Invalid count: {0}")]
    InvalidCount(String),

    #[error("Expected {expected} files, but got {names}")]
    CountMismatch { expected: usize, names: usize },

    #[error(
        "Expected {expected} files and contents, but got {names} files and {contents} contents."
    )]
    WriteCountMismatch {
        expected: usize,
        names: usize,
        contents: usize,
    },

    #[error("Unterminated quote")]
    UnterminatedQuote,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Token {
    text: String,
    quoted: bool,
}

pub const HELP: &str = "\
Available commands:
  create <filename>                             - Create a new file with the specified filename
  create -n <count> <filenames...>              - Create multiple files; expects <count> filenames
  write <filename> \"<content>\"                  - Write content to a file
  write -n <count> <filename> \"<content>\" ...   - Write to multiple files; expects <count> filename/content pairs
  read <filename>                               - Read and display the content of a file
  delete <filename>                             - Delete a specific file
  delete -n <count> <filenames...>              - Delete multiple files; expects <count> filenames
  ls                                            - List directory contents
  ls -l                                         - List directory contents in long format
  help                                          - Show this help menu
  exit                                          - Exit the program
  clear                                         - Clear the screen";

/// Split on whitespace outside double quotes. Quotes are stripped; a token
/// that contained a quote is marked `quoted` (so `""` survives as empty).
fn tokenize(line: &str) -> Result<Vec<Token>, ParseError> {
    let mut tokens = Vec::new();
    let mut text = String::new();
    let mut quoted = false;
    let mut in_quotes = false;

    for c in line.chars() {
        match c {
            '"' => {
                in_quotes = !in_quotes;
                quoted = true;
            }
            c if c.is_whitespace() && !in_quotes => {
                if !text.is_empty() || quoted {
                    tokens.push(Token {
                        text: std::mem::take(&mut text),
                        quoted,
                    });
                }
                quoted = false;
            }
            c => text.push(c),
        }
    }
    if in_quotes {
        return Err(ParseError::UnterminatedQuote);
    }
    if !text.is_empty() || quoted {
        tokens.push(Token { text, quoted });
    }
    Ok(tokens)
}

/// `name.ext` made of ASCII letters, digits and underscores.
pub fn is_valid_filename(name: &str) -> bool {
    let valid = |part: &str| {
        !part.is_empty() && part.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
    };
    match name.split_once('.') {
        Some((stem, ext)) => valid(stem) && valid(ext),
        None => false,
    }
}

fn filename(token: &Token) -> Result<String, ParseError> {
    if token.quoted || !is_valid_filename(&token.text) {
        return Err(ParseError::InvalidFilename(token.text.clone()));
    }
    Ok(token.text.clone())
}

fn count(token: &Token) -> Result<usize, ParseError> {
    token
        .text
        .parse()
        .map_err(|_| ParseError::InvalidCount(token.text.clone()))
}

fn is_flag(token: &Token, flag: &str) -> bool {
    !token.quoted && token.text == flag
}

/// Parse one shell line. `Ok(None)` for a blank line.
pub fn parse(line: &str) -> Result<Option<Command>, ParseError> {
    let tokens = tokenize(line)?;
    let Some((head, args)) = tokens.split_first() else {
        return Ok(None);
    };

    let command = match head.text.as_str() {
        "create" => Command::Request(Request::create(names(args)?)),
        "delete" => Command::Request(Request::delete(names(args)?)),
        "write" => Command::Request(Request::write(pairs(args)?)),
        "read" => match args {
            [name] => Command::Request(Request::read(filename(name)?)),
            _ => return Err(ParseError::InvalidFormat),
        },
        "ls" => match args {
            [] => Command::Request(Request::list(false)),
            [flag] if is_flag(flag, "-l") => Command::Request(Request::list(true)),
            _ => return Err(ParseError::InvalidFormat),
        },
        "help" => Command::Help,
        "clear" => Command::Clear,
        "exit" => Command::Exit,
        other => return Err(ParseError::UnknownCommand(other.to_string())),
    };
    Ok(Some(command))
}

/// `<file>` or `-n <count> <files...>`
fn names(args: &[Token]) -> Result<Vec<String>, ParseError> {
    match args {
        [name] if !is_flag(name, "-n") => Ok(vec![filename(name)?]),
        [flag, n, rest @ ..] if is_flag(flag, "-n") && !rest.is_empty() => {
            let expected = count(n)?;
            let names = rest.iter().map(filename).collect::<Result<Vec<_>, _>>()?;
            if names.len() != expected {
                return Err(ParseError::CountMismatch {
                    expected,
                    names: names.len(),
                });
            }
            Ok(names)
        }
        _ => Err(ParseError::InvalidFormat),
    }
}

/// `<file> "<content>"` or `-n <count> (<file> <content>)...`
fn pairs(args: &[Token]) -> Result<Vec<(String, String)>, ParseError> {
    match args {
        [name, content] if !is_flag(name, "-n") => {
            if !content.quoted {
                return Err(ParseError::InvalidFormat);
            }
            Ok(vec![(filename(name)?, content.text.clone())])
        }
        [flag, n, rest @ ..] if is_flag(flag, "-n") && !rest.is_empty() => {
            let expected = count(n)?;
            let mut names = Vec::new();
            let mut contents = Vec::new();
            for chunk in rest.chunks(2) {
                names.push(filename(&chunk[0])?);
                if let Some(content) = chunk.get(1) {
                    contents.push(content.text.clone());
                }
            }
            if names.len() != expected || contents.len() != expected {
                return Err(ParseError::WriteCountMismatch {
                    expected,
                    names: names.len(),
                    contents: contents.len(),
                });
            }
            Ok(names.into_iter().zip(contents).collect())
        }
        _ => Err(ParseError::InvalidFormat),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use memfs_core::Operation;
    use rstest::rstest;

    fn request(line: &str) -> Request {
        match parse(line).unwrap() {
            Some(Command::Request(r)) => r,
            other => panic!("expected request, got {other:?}"),
        }
    }

    #[test]
    fn tokenizer_keeps_quoted_spaces() {
        let tokens = tokenize(r#"write a.txt "hello world""#).unwrap();
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[2].text, "hello world");
        assert!(tokens[2].quoted);
        assert!(!tokens[1].quoted);
    }

    #[test]
    fn tokenizer_keeps_empty_quoted_token() {
        let tokens = tokenize(r#"write a.txt """#).unwrap();
        assert_eq!(tokens[2].text, "");
    }

    #[test]
    fn blank_line_is_nothing() {
        assert_eq!(parse("   ").unwrap(), None);
    }

    #[test]
    fn single_create() {
        let r = request("create a.txt");
        assert_eq!(r.operation, Operation::Create);
        assert_eq!(r.filenames, vec!["a.txt"]);
        assert_eq!(r.file_count, 1);
    }

    #[test]
    fn multi_create_and_delete() {
        let r = request("create -n 3 a.txt b.txt c_1.md");
        assert_eq!(r.filenames, vec!["a.txt", "b.txt", "c_1.md"]);

        let r = request("delete -n 2 a.txt b.txt");
        assert_eq!(r.operation, Operation::Delete);
        assert_eq!(r.file_count, 2);
    }

    #[test]
    fn multi_write_pairs_names_with_contents() {
        let r = request(r#"write -n 2 a.txt "first one" b.txt second"#);
        assert_eq!(r.filenames, vec!["a.txt", "b.txt"]);
        assert_eq!(r.contents, vec!["first one", "second"]);
    }

    #[test]
    fn single_write_requires_quoted_content() {
        assert_eq!(parse("write a.txt hello"), Err(ParseError::InvalidFormat));
        let r = request(r#"write a.txt "hello""#);
        assert_eq!(r.contents, vec!["hello"]);
    }

    #[test]
    fn ls_variants() {
        assert!(!request("ls").long_format);
        assert!(request("ls -l").long_format);
        assert_eq!(parse("ls -a"), Err(ParseError::InvalidFormat));
    }

    #[test]
    fn shell_commands() {
        assert_eq!(parse("help").unwrap(), Some(Command::Help));
        assert_eq!(parse("clear").unwrap(), Some(Command::Clear));
        assert_eq!(parse("exit").unwrap(), Some(Command::Exit));
        assert_eq!(
            parse("format c:"),
            Err(ParseError::UnknownCommand("format".into()))
        );
    }

    #[rstest]
    #[case::no_extension("create abc", ParseError::InvalidFilename("abc".into()))]
    #[case::two_dots("read a.b.c", ParseError::InvalidFilename("a.b.c".into()))]
    #[case::dash("delete -n 1 bad-name.txt", ParseError::InvalidFilename("bad-name.txt".into()))]
    #[case::bad_count("create -n x a.txt", ParseError::InvalidCount("x".into()))]
    #[case::missing_names("create -n 2", ParseError::InvalidFormat)]
    #[case::read_two("read a.txt b.txt", ParseError::InvalidFormat)]
    #[case::quote("write a.txt \"oops", ParseError::UnterminatedQuote)]
    fn rejects_malformed_lines(#[case] line: &str, #[case] expected: ParseError) {
        assert_eq!(parse(line), Err(expected));
    }

    #[rstest]
    #[case::create_too_few("create -n 3 a.txt b.txt", ParseError::CountMismatch { expected: 3, names: 2 })]
    #[case::delete_too_many("delete -n 1 a.txt b.txt", ParseError::CountMismatch { expected: 1, names: 2 })]
    #[case::write_dangling_name(
        "write -n 2 a.txt x b.txt",
        ParseError::WriteCountMismatch { expected: 2, names: 2, contents: 1 }
    )]
    fn declared_count_must_match_arguments(#[case] line: &str, #[case] expected: ParseError) {
        assert_eq!(parse(line), Err(expected));
    }

    #[test]
    fn filename_shape() {
        assert!(is_valid_filename("file_01.txt"));
        assert!(!is_valid_filename(".txt"));
        assert!(!is_valid_filename("file."));
        assert!(!is_valid_filename("a b.txt"));
    }
}

use std::fmt;
use std::path::PathBuf;

mod command;

pub use command::ParsedCommand;

pub const INPUT_REDIRECT: &str = "<";
pub const OUTPUT_REDIRECT: &str = ">";
pub const BACKGROUND: &str = "&";

pub const DEFAULT_MAX_LINE_LENGTH: usize = 2048;
pub const DEFAULT_MAX_ARGS: usize = 512;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    MissingCommand,
    MissingRedirectTarget(&'static str),
    LineTooLong { length: usize, max: usize },
    TooManyArguments { count: usize, max: usize },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::MissingCommand => write!(f, "missing command name"),
            ParseError::MissingRedirectTarget(op) => {
                write!(f, "expected a file name after '{}'", op)
            }
            ParseError::LineTooLong { length, max } => {
                write!(f, "line is {} bytes long, limit is {}", length, max)
            }
            ParseError::TooManyArguments { count, max } => {
                write!(f, "{} arguments given, limit is {}", count, max)
            }
        }
    }
}

impl std::error::Error for ParseError {}

/// Comment and blank lines never reach the parser.
pub fn is_noop(line: &str) -> bool {
    line.starts_with('#') || line.trim().is_empty()
}

#[derive(Debug, Clone)]
pub struct Parser {
    max_line_length: usize,
    max_args: usize,
}

impl Default for Parser {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_LINE_LENGTH, DEFAULT_MAX_ARGS)
    }
}

impl Parser {
    pub fn new(max_line_length: usize, max_args: usize) -> Self {
        Self {
            max_line_length,
            max_args,
        }
    }

    /// The length limit applies to the line as typed, before `$$` expansion.
    pub fn check_line(&self, line: &str) -> Result<(), ParseError> {
        if line.len() > self.max_line_length {
            return Err(ParseError::LineTooLong {
                length: line.len(),
                max: self.max_line_length,
            });
        }
        Ok(())
    }

    pub fn parse(&self, line: &str) -> Result<ParsedCommand, ParseError> {
        let mut tokens = line.split_whitespace();
        let name = match tokens.next() {
            Some(INPUT_REDIRECT) | Some(OUTPUT_REDIRECT) | Some(BACKGROUND) | None => {
                return Err(ParseError::MissingCommand)
            }
            Some(name) => name,
        };

        let mut command = ParsedCommand::new(name);
        while let Some(token) = tokens.next() {
            match token {
                INPUT_REDIRECT => {
                    let target = tokens
                        .next()
                        .ok_or(ParseError::MissingRedirectTarget(INPUT_REDIRECT))?;
                    command.input = Some(PathBuf::from(target));
                }
                OUTPUT_REDIRECT => {
                    let target = tokens
                        .next()
                        .ok_or(ParseError::MissingRedirectTarget(OUTPUT_REDIRECT))?;
                    command.output = Some(PathBuf::from(target));
                }
                // Any standalone `&` counts, not just a trailing one.
                BACKGROUND => command.background = true,
                arg => command.arguments.push(arg.to_string()),
            }
        }

        if command.arguments.len() > self.max_args {
            return Err(ParseError::TooManyArguments {
                count: command.arguments.len(),
                max: self.max_args,
            });
        }

        Ok(command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn parse(line: &str) -> Result<ParsedCommand, ParseError> {
        Parser::default().parse(line)
    }

    #[test]
    fn test_full_command() {
        let cmd = parse("echo hi < in.txt > out.txt &").unwrap();
        assert_eq!(cmd.name, "echo");
        assert_eq!(cmd.arguments, vec!["echo", "hi"]);
        assert_eq!(cmd.input(), Some(Path::new("in.txt")));
        assert_eq!(cmd.output(), Some(Path::new("out.txt")));
        assert!(cmd.background);
        assert_eq!(cmd.args(), ["hi".to_string()]);
    }

    #[test]
    fn test_plain_command() {
        let cmd = parse("ls -la /tmp").unwrap();
        assert_eq!(cmd.arguments, vec!["ls", "-la", "/tmp"]);
        assert_eq!(cmd.input, None);
        assert_eq!(cmd.output, None);
        assert!(!cmd.background);
    }

    #[test]
    fn test_whitespace_is_collapsed() {
        let cmd = parse("  wc\t-l   <  words  ").unwrap();
        assert_eq!(cmd.arguments, vec!["wc", "-l"]);
        assert_eq!(cmd.input(), Some(Path::new("words")));
    }

    #[test]
    fn test_ampersand_anywhere_sets_background() {
        let cmd = parse("sleep & 5").unwrap();
        assert!(cmd.background);
        assert_eq!(cmd.arguments, vec!["sleep", "5"]);
    }

    #[test]
    fn test_ampersand_inside_token_is_an_argument() {
        let cmd = parse("echo a&b").unwrap();
        assert!(!cmd.background);
        assert_eq!(cmd.arguments, vec!["echo", "a&b"]);
    }

    #[test]
    fn test_last_redirect_wins() {
        let cmd = parse("cat > a > b").unwrap();
        assert_eq!(cmd.output(), Some(Path::new("b")));
        assert_eq!(cmd.arguments, vec!["cat"]);
    }

    #[test]
    fn test_missing_redirect_target() {
        assert_eq!(
            parse("cat <"),
            Err(ParseError::MissingRedirectTarget(INPUT_REDIRECT))
        );
        assert_eq!(
            parse("ls >"),
            Err(ParseError::MissingRedirectTarget(OUTPUT_REDIRECT))
        );
    }

    #[test]
    fn test_missing_command() {
        assert_eq!(parse("< in.txt"), Err(ParseError::MissingCommand));
        assert_eq!(parse("&"), Err(ParseError::MissingCommand));
        assert_eq!(parse("   "), Err(ParseError::MissingCommand));
    }

    #[test]
    fn test_limits() {
        let parser = Parser::new(16, 3);
        assert!(parser.parse("echo a b").is_ok());
        assert_eq!(
            parser.parse("echo a b c"),
            Err(ParseError::TooManyArguments { count: 4, max: 3 })
        );
        assert!(matches!(
            parser.check_line("echo aaaaaaaaaaaaaaaa"),
            Err(ParseError::LineTooLong { max: 16, .. })
        ));
        assert_eq!(parser.check_line("echo aaaaaaaaaaa"), Ok(()));
    }

    #[test]
    fn test_parse_does_not_limit_expanded_length() {
        let parser = Parser::new(16, 3);
        let cmd = parser.parse("echo 12345678901234567890").unwrap();
        assert_eq!(cmd.args(), ["12345678901234567890".to_string()]);
    }

    #[test]
    fn test_redirect_targets_do_not_count_as_arguments() {
        let parser = Parser::new(DEFAULT_MAX_LINE_LENGTH, 2);
        let cmd = parser.parse("cat file < in > out &").unwrap();
        assert_eq!(cmd.arguments.len(), 2);
    }

    #[test]
    fn test_noop_lines() {
        assert!(is_noop(""));
        assert!(is_noop("   \t"));
        assert!(is_noop("# a comment"));
        assert!(is_noop("#"));
        assert!(!is_noop("echo # not a comment"));
        assert!(!is_noop(" # indented"));
    }

    #[test]
    fn test_error_display() {
        let errors = vec![
            ParseError::MissingCommand,
            ParseError::MissingRedirectTarget(">"),
            ParseError::LineTooLong { length: 3, max: 2 },
            ParseError::TooManyArguments { count: 3, max: 2 },
        ];

        for error in errors {
            assert!(!error.to_string().is_empty());
        }
    }
}

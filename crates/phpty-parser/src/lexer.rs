//! Lexer for type expressions and value literals.
//!
//! Built on logos. Keywords are not separate tokens: builtin type names are
//! case-insensitive and may also be class names in other positions, so the
//! parser classifies `Name` tokens itself.

use crate::token::{Span, Token};
use logos::Logos;
use thiserror::Error;

/// Logos-based token enum for lexing.
///
/// Converted to [`Token`] after lexing.
#[derive(Logos, Debug, Clone, PartialEq)]
enum LogosToken {
    // Whitespace (skip)
    #[regex(r"[ \t\r\n\x0b\f]+", logos::skip)]
    Whitespace,

    #[token("?")]
    Question,

    #[token("|")]
    Pipe,

    #[token("(")]
    LeftParen,

    #[token(")")]
    RightParen,

    #[token("[")]
    LeftBracket,

    #[token("]")]
    RightBracket,

    #[token(",")]
    Comma,

    #[token("-")]
    Minus,

    // Names, optionally namespaced and fully qualified
    #[regex(r"\\?[a-zA-Z_][a-zA-Z0-9_]*(\\[a-zA-Z_][a-zA-Z0-9_]*)*", |lex| lex.slice().to_string())]
    Name(String),

    #[regex(r"[0-9]+(_[0-9]+)*", parse_int)]
    IntLiteral(u64),

    #[regex(r"[0-9]+(_[0-9]+)*\.[0-9]+(_[0-9]+)*([eE][+-]?[0-9]+(_[0-9]+)*)?", parse_float)]
    #[regex(r"[0-9]+(_[0-9]+)*[eE][+-]?[0-9]+(_[0-9]+)*", parse_float)]
    #[regex(r"\.[0-9]+(_[0-9]+)*([eE][+-]?[0-9]+(_[0-9]+)*)?", parse_float)]
    FloatLiteral(f64),

    #[regex(r#""([^"\\]|\\.)*""#, parse_string)]
    #[regex(r"'([^'\\]|\\.)*'", parse_string)]
    StringLiteral(String),

    #[regex(r#""([^"\\]|\\.)*"#)]
    #[regex(r"'([^'\\]|\\.)*")]
    UnterminatedString,
}

fn parse_int(lex: &mut logos::Lexer<LogosToken>) -> Option<u64> {
    lex.slice().replace('_', "").parse().ok()
}

fn parse_float(lex: &mut logos::Lexer<LogosToken>) -> Option<f64> {
    lex.slice().replace('_', "").parse().ok()
}

fn parse_string(lex: &mut logos::Lexer<LogosToken>) -> Option<String> {
    let s = lex.slice();
    let inner = &s[1..s.len() - 1]; // Remove quotes
    Some(unescape_string(inner))
}

fn unescape_string(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars();

    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some('n') => result.push('\n'),
                Some('r') => result.push('\r'),
                Some('t') => result.push('\t'),
                Some('v') => result.push('\x0b'),
                Some('f') => result.push('\x0c'),
                Some('0') => result.push('\0'),
                Some(other) => result.push(other),
                None => result.push('\\'),
            }
        } else {
            result.push(c);
        }
    }

    result
}

/// Lexer error types.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LexError {
    /// Character that starts no token
    #[error("Unexpected character '{character}' at {}:{}", .span.line, .span.column)]
    UnexpectedCharacter {
        /// The character
        character: char,
        /// Its location
        span: Span,
    },

    /// String literal without a closing quote
    #[error("Unterminated string at {}:{}", .span.line, .span.column)]
    UnterminatedString {
        /// Location of the literal
        span: Span,
    },

    /// Integer literal above the 64-bit unsigned range
    #[error("Invalid number '{text}' at {}:{}", .span.line, .span.column)]
    InvalidNumber {
        /// The literal as written
        text: String,
        /// Its location
        span: Span,
    },
}

impl LexError {
    /// Location of the error
    pub fn span(&self) -> Span {
        match self {
            LexError::UnexpectedCharacter { span, .. }
            | LexError::UnterminatedString { span }
            | LexError::InvalidNumber { span, .. } => *span,
        }
    }
}

/// Converts source text into tokens with spans
pub struct Lexer<'a> {
    source: &'a str,
    tokens: Vec<(Token, Span)>,
    errors: Vec<LexError>,
}

impl<'a> Lexer<'a> {
    /// Create a lexer over `source`
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            tokens: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Tokenize the whole input, ending with [`Token::Eof`]
    pub fn tokenize(mut self) -> Result<Vec<(Token, Span)>, Vec<LexError>> {
        let mut logos_lexer = LogosToken::lexer(self.source);
        let mut line = 1u32;
        let mut column = 1u32;
        let mut last_end = 0;

        while let Some(token_result) = logos_lexer.next() {
            let range = logos_lexer.span();

            // Update line and column based on skipped text
            advance_position(&self.source[last_end..range.start], &mut line, &mut column);

            let span = Span::new(range.start, range.end, line, column);
            let text = &self.source[range.start..range.end];

            match token_result {
                Ok(LogosToken::UnterminatedString) => {
                    self.errors.push(LexError::UnterminatedString { span });
                }
                Ok(logos_token) => {
                    let token = convert_token(logos_token);
                    self.tokens.push((token, span));
                }
                Err(_) if text.starts_with(|c: char| c.is_ascii_digit()) => {
                    self.errors.push(LexError::InvalidNumber {
                        text: text.to_string(),
                        span,
                    });
                }
                Err(_) => {
                    let character = text.chars().next().unwrap_or('\0');
                    self.errors.push(LexError::UnexpectedCharacter { character, span });
                }
            }

            advance_position(text, &mut line, &mut column);
            last_end = range.end;
        }

        advance_position(&self.source[last_end..], &mut line, &mut column);
        let eof_span = Span::new(self.source.len(), self.source.len(), line, column);
        self.tokens.push((Token::Eof, eof_span));

        if self.errors.is_empty() {
            Ok(self.tokens)
        } else {
            Err(self.errors)
        }
    }
}

fn advance_position(text: &str, line: &mut u32, column: &mut u32) {
    for c in text.chars() {
        if c == '\n' {
            *line += 1;
            *column = 1;
        } else {
            *column += 1;
        }
    }
}

fn convert_token(logos_token: LogosToken) -> Token {
    match logos_token {
        LogosToken::Question => Token::Question,
        LogosToken::Pipe => Token::Pipe,
        LogosToken::LeftParen => Token::LeftParen,
        LogosToken::RightParen => Token::RightParen,
        LogosToken::LeftBracket => Token::LeftBracket,
        LogosToken::RightBracket => Token::RightBracket,
        LogosToken::Comma => Token::Comma,
        LogosToken::Minus => Token::Minus,
        LogosToken::Name(name) => Token::Name(name),
        LogosToken::IntLiteral(i) => Token::IntLiteral(i),
        LogosToken::FloatLiteral(f) => Token::FloatLiteral(f),
        LogosToken::StringLiteral(s) => Token::StringLiteral(s),
        // Whitespace is skipped and unterminated strings become errors
        LogosToken::Whitespace | LogosToken::UnterminatedString => Token::Eof,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(source: &str) -> Vec<Token> {
        Lexer::new(source)
            .tokenize()
            .unwrap()
            .into_iter()
            .map(|(token, _)| token)
            .collect()
    }

    #[test]
    fn test_union_tokens() {
        assert_eq!(
            tokens("int | \\Foo\\Bar|null"),
            vec![
                Token::Name("int".to_string()),
                Token::Pipe,
                Token::Name("\\Foo\\Bar".to_string()),
                Token::Pipe,
                Token::Name("null".to_string()),
                Token::Eof,
            ]
        );
    }

    #[test]
    fn test_nullable_tokens() {
        assert_eq!(
            tokens("?string"),
            vec![Token::Question, Token::Name("string".to_string()), Token::Eof]
        );
    }

    #[test]
    fn test_literals() {
        assert_eq!(
            tokens("[42, -1.5, 1e100, 'a\\'b', \"x\"]"),
            vec![
                Token::LeftBracket,
                Token::IntLiteral(42),
                Token::Comma,
                Token::Minus,
                Token::FloatLiteral(1.5),
                Token::Comma,
                Token::FloatLiteral(1e100),
                Token::Comma,
                Token::StringLiteral("a'b".to_string()),
                Token::Comma,
                Token::StringLiteral("x".to_string()),
                Token::RightBracket,
                Token::Eof,
            ]
        );
        assert_eq!(tokens("45.0")[0], Token::FloatLiteral(45.0));
        assert_eq!(tokens("1_000")[0], Token::IntLiteral(1000));
    }

    #[test]
    fn test_spans() {
        let result = Lexer::new("int|\n  Foo").tokenize().unwrap();
        assert_eq!(result[0].1, Span::new(0, 3, 1, 1));
        assert_eq!(result[1].1, Span::new(3, 4, 1, 4));
        assert_eq!(result[2].1, Span::new(7, 10, 2, 3));
    }

    #[test]
    fn test_unexpected_character() {
        let errors = Lexer::new("int & string").tokenize().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(matches!(
            errors[0],
            LexError::UnexpectedCharacter { character: '&', .. }
        ));
        assert_eq!(errors[0].to_string(), "Unexpected character '&' at 1:5");
    }

    #[test]
    fn test_unterminated_string() {
        let errors = Lexer::new("\"abc").tokenize().unwrap_err();
        assert!(matches!(errors[0], LexError::UnterminatedString { .. }));
    }

    #[test]
    fn test_vertical_tab_is_whitespace() {
        assert_eq!(
            tokens("int\x0b|\x0bstring"),
            vec![
                Token::Name("int".to_string()),
                Token::Pipe,
                Token::Name("string".to_string()),
                Token::Eof,
            ]
        );
        assert_eq!(tokens("\x0b42\x0b"), vec![Token::IntLiteral(42), Token::Eof]);
    }

    #[test]
    fn test_magnitude_of_min_int() {
        assert_eq!(
            tokens("-9223372036854775808"),
            vec![Token::Minus, Token::IntLiteral(1 << 63), Token::Eof]
        );
    }

    #[test]
    fn test_integer_overflow() {
        let errors = Lexer::new("99999999999999999999").tokenize().unwrap_err();
        assert!(matches!(errors[0], LexError::InvalidNumber { .. }));
    }
}

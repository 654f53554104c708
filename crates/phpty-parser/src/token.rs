//! Token definitions for type expressions and value literals

use std::fmt;

/// A lexical token
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// `?`
    Question,
    /// `|`
    Pipe,
    /// `(`
    LeftParen,
    /// `)`
    RightParen,
    /// `[`
    LeftBracket,
    /// `]`
    RightBracket,
    /// `,`
    Comma,
    /// `-`
    Minus,

    /// Identifier or namespaced name (`int`, `Foo`, `\App\User`)
    Name(String),
    /// Integer literal, unsigned so that `-9223372036854775808` can be negated
    IntLiteral(u64),
    /// Float literal
    FloatLiteral(f64),
    /// Quoted string literal (quotes removed, escapes applied)
    StringLiteral(String),

    /// End of input
    Eof,
}

impl Token {
    /// A `Name` token, for use in expected-token lists
    pub fn name() -> Token {
        Token::Name(String::new())
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Question => write!(f, "'?'"),
            Token::Pipe => write!(f, "'|'"),
            Token::LeftParen => write!(f, "'('"),
            Token::RightParen => write!(f, "')'"),
            Token::LeftBracket => write!(f, "'['"),
            Token::RightBracket => write!(f, "']'"),
            Token::Comma => write!(f, "','"),
            Token::Minus => write!(f, "'-'"),
            Token::Name(name) if name.is_empty() => write!(f, "a type name"),
            Token::Name(name) => write!(f, "'{}'", name),
            Token::IntLiteral(i) => write!(f, "integer {}", i),
            Token::FloatLiteral(x) => write!(f, "float {}", x),
            Token::StringLiteral(s) => write!(f, "string {:?}", s),
            Token::Eof => write!(f, "end of input"),
        }
    }
}

/// Source location information for a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    /// Byte offset of the first character
    pub start: usize,
    /// Byte offset one past the last character
    pub end: usize,
    /// 1-based line
    pub line: u32,
    /// 1-based column
    pub column: u32,
}

impl Span {
    /// Create a span
    pub fn new(start: usize, end: usize, line: u32, column: u32) -> Self {
        Self {
            start,
            end,
            line,
            column,
        }
    }
}

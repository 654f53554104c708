//! Parse error types and error reporting

use crate::lexer::LexError;
use crate::token::{Span, Token};
use phpty_types::DeclarationError;
use std::fmt;

/// A parse error with location and contextual information.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    /// The kind of error that occurred
    pub kind: ParseErrorKind,

    /// Source location of the error
    pub span: Span,

    /// Human-readable error message
    pub message: String,

    /// Optional suggestion for fixing the error
    pub suggestion: Option<String>,
}

/// The kind of parse error.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseErrorKind {
    /// Unexpected token found
    UnexpectedToken {
        /// Tokens that would have been accepted
        expected: Vec<Token>,
        /// Token actually found
        found: Token,
    },

    /// Unexpected end of input
    UnexpectedEof {
        /// Tokens that would have been accepted
        expected: Vec<Token>,
    },

    /// Malformed input (including lexical errors)
    InvalidSyntax {
        /// Reason
        reason: String,
    },

    /// Well-formed but structurally disallowed type, such as `void` in a union
    InvalidType {
        /// Reason
        reason: String,
    },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Parse error at {}:{}: {}",
            self.span.line, self.span.column, self.message
        )?;

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\n  Suggestion: {}", suggestion)?;
        }

        Ok(())
    }
}

impl std::error::Error for ParseError {}

impl ParseError {
    /// Create an "unexpected token" error.
    pub fn unexpected_token(expected: Vec<Token>, found: Token, span: Span) -> Self {
        let message = format!("Expected {}, found {}", describe_expected(&expected), found);

        Self {
            kind: ParseErrorKind::UnexpectedToken { expected, found },
            span,
            message,
            suggestion: None,
        }
    }

    /// Create an "unexpected EOF" error.
    pub fn unexpected_eof(expected: Vec<Token>, span: Span) -> Self {
        let message = format!(
            "Unexpected end of input, expected {}",
            describe_expected(&expected)
        );

        Self {
            kind: ParseErrorKind::UnexpectedEof { expected },
            span,
            message,
            suggestion: None,
        }
    }

    /// Create an "invalid syntax" error.
    pub fn invalid_syntax(reason: impl Into<String>, span: Span) -> Self {
        let reason = reason.into();
        Self {
            kind: ParseErrorKind::InvalidSyntax {
                reason: reason.clone(),
            },
            span,
            message: format!("Invalid syntax: {}", reason),
            suggestion: None,
        }
    }

    /// Create an "invalid type" error.
    pub fn invalid_type(reason: impl Into<String>, span: Span) -> Self {
        let reason = reason.into();
        Self {
            kind: ParseErrorKind::InvalidType {
                reason: reason.clone(),
            },
            span,
            message: format!("Invalid type: {}", reason),
            suggestion: None,
        }
    }

    /// Convert a structural type error found at `span`
    pub fn from_declaration(error: DeclarationError, span: Span) -> Self {
        match error {
            DeclarationError::InvalidType { reason } => Self::invalid_type(reason, span),
            other => Self::invalid_type(other.to_string(), span),
        }
    }

    /// Add a suggestion to this error.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

impl From<LexError> for ParseError {
    fn from(error: LexError) -> Self {
        let span = error.span();
        let reason = match &error {
            LexError::UnexpectedCharacter { character, .. } => {
                format!("unexpected character '{}'", character)
            }
            LexError::UnterminatedString { .. } => "unterminated string literal".to_string(),
            LexError::InvalidNumber { text, .. } => format!("number literal {} is out of range", text),
        };
        Self::invalid_syntax(reason, span)
    }
}

fn describe_expected(expected: &[Token]) -> String {
    match expected {
        [] => "more input".to_string(),
        [single] => single.to_string(),
        [init @ .., last] => format!(
            "{} or {}",
            init.iter().map(Token::to_string).collect::<Vec<_>>().join(", "),
            last
        ),
    }
}

//! Recursive descent parser for type expressions and value literals

pub mod error;
pub mod types;
pub mod value;

use crate::lexer::Lexer;
use crate::token::{Span, Token};

pub use error::{ParseError, ParseErrorKind};

/// Parser state over a pre-tokenized input
pub struct Parser {
    /// Pre-tokenized input, always ending with `Eof`
    tokens: Vec<(Token, Span)>,

    /// Current position in token stream
    pos: usize,
}

impl Parser {
    /// Create a new parser from source code.
    ///
    /// Lexical errors are reported as the first [`ParseError`].
    pub fn new(source: &str) -> Result<Self, ParseError> {
        let tokens = Lexer::new(source).tokenize().map_err(|errors| {
            errors
                .into_iter()
                .next()
                .map(ParseError::from)
                .unwrap_or_else(|| ParseError::invalid_syntax("invalid input", Span::new(0, 0, 1, 1)))
        })?;

        Ok(Self { tokens, pos: 0 })
    }

    // ========================================================================
    // Token Management
    // ========================================================================

    /// Get the current token.
    #[inline]
    pub fn current(&self) -> &Token {
        &self.tokens[self.pos].0
    }

    /// Get the current token's span.
    #[inline]
    pub fn current_span(&self) -> Span {
        self.tokens[self.pos].1
    }

    /// Peek at the next token (lookahead).
    #[inline]
    pub fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos + 1).map(|(tok, _)| tok)
    }

    /// Span of the most recently consumed token
    pub fn previous_span(&self) -> Span {
        self.tokens[self.pos.saturating_sub(1)].1
    }

    /// Advance to the next token, returning the previous current token.
    pub fn advance(&mut self) -> Token {
        let tok = self.tokens[self.pos].0.clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        tok
    }

    /// Check if the current token matches the given kind.
    #[inline]
    pub fn check(&self, expected: &Token) -> bool {
        std::mem::discriminant(self.current()) == std::mem::discriminant(expected)
    }

    /// Check if we've reached the end of input.
    #[inline]
    pub fn at_eof(&self) -> bool {
        matches!(self.current(), Token::Eof)
    }

    /// Consume the current token if it matches the expected kind.
    pub fn expect(&mut self, expected: Token) -> Result<Token, ParseError> {
        if self.check(&expected) {
            Ok(self.advance())
        } else {
            Err(self.unexpected_token(&[expected]))
        }
    }

    /// Fail unless all input has been consumed.
    pub fn expect_eof(&self, continuations: &[Token]) -> Result<(), ParseError> {
        if self.at_eof() {
            return Ok(());
        }
        let mut expected = continuations.to_vec();
        expected.push(Token::Eof);
        Err(self.unexpected_token(&expected))
    }

    /// Create an "unexpected token" error at the current position.
    pub fn unexpected_token(&self, expected: &[Token]) -> ParseError {
        let span = self.current_span();
        if self.at_eof() {
            ParseError::unexpected_eof(expected.to_vec(), span)
        } else {
            ParseError::unexpected_token(expected.to_vec(), self.current().clone(), span)
        }
    }

    // ========================================================================
    // Utilities
    // ========================================================================

    /// Combine two spans into a single span.
    pub fn combine_spans(&self, start: &Span, end: &Span) -> Span {
        Span {
            start: start.start,
            end: end.end,
            line: start.line,
            column: start.column,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parser_new() {
        let parser = Parser::new("int|string").unwrap();
        assert_eq!(parser.current(), &Token::Name("int".to_string()));
    }

    #[test]
    fn test_parser_advance() {
        let mut parser = Parser::new("int|string").unwrap();
        parser.advance();
        assert!(parser.check(&Token::Pipe));
        assert_eq!(parser.peek(), Some(&Token::Name("string".to_string())));
        parser.advance();
        parser.advance();
        assert!(parser.at_eof());
        // Advancing past the end stays on Eof
        parser.advance();
        assert!(parser.at_eof());
    }

    #[test]
    fn test_parser_expect() {
        let mut parser = Parser::new("?int").unwrap();
        assert!(parser.expect(Token::Question).is_ok());
        let err = parser.expect(Token::Pipe).unwrap_err();
        assert!(matches!(err.kind, ParseErrorKind::UnexpectedToken { .. }));
    }

    #[test]
    fn test_lex_error_becomes_parse_error() {
        let err = Parser::new("int & string").err().unwrap();
        assert!(matches!(err.kind, ParseErrorKind::InvalidSyntax { .. }));
        assert_eq!(err.span.column, 5);
    }
}

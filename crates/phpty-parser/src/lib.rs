//! phpty Parser
//!
//! Lexer and parser for PHP-style type expressions (`int|string|null`,
//! `?Foo`) and value literals, plus diagnostic rendering for parse and
//! type-system errors.

#![warn(missing_docs)]

pub mod token;
pub mod lexer;
pub mod parser;
pub mod diagnostic;

pub use diagnostic::{create_files, Diagnostic, ErrorCode, JsonDiagnostic};
pub use lexer::{LexError, Lexer};
pub use parser::types::TypeAnnotation;
pub use parser::{ParseError, ParseErrorKind, Parser};
pub use token::{Span, Token};

use phpty_types::Value;
use tracing::debug;

/// Parse a complete type expression
pub fn parse_type(source: &str) -> Result<TypeAnnotation, ParseError> {
    let mut parser = Parser::new(source)?;
    let annotation = parser::types::parse_type_annotation(&mut parser)?;
    parser.expect_eof(&[Token::Pipe])?;
    debug!(source, ty = %annotation.ty, "parsed type");
    Ok(annotation)
}

/// Parse a complete value literal
pub fn parse_value(source: &str) -> Result<Value, ParseError> {
    let mut parser = Parser::new(source)?;
    let value = parser::value::parse_value_literal(&mut parser)?;
    parser.expect_eof(&[])?;
    Ok(value)
}

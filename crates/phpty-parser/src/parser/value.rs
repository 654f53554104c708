//! Value literal parsing
//!
//! ```text
//! value  := "-"? number | string | "true" | "false" | "null"
//!         | "-"? ("INF" | "NAN") | "[" (value ("," value)* ","?)? "]"
//!         | "new" name ("(" string? ")")?
//! ```

use super::{ParseError, Parser};
use crate::token::Token;
use phpty_types::{ObjectValue, Value};

/// Parse a value literal.
pub fn parse_value_literal(parser: &mut Parser) -> Result<Value, ParseError> {
    let span = parser.current_span();
    match parser.current().clone() {
        Token::Minus => {
            parser.advance();
            parse_negative(parser)
        }
        Token::IntLiteral(n) => {
            parser.advance();
            Ok(i64::try_from(n).map_or(Value::Float(n as f64), Value::Int))
        }
        Token::FloatLiteral(f) => {
            parser.advance();
            Ok(Value::Float(f))
        }
        Token::StringLiteral(s) => {
            parser.advance();
            Ok(Value::String(s))
        }
        Token::LeftBracket => {
            parser.advance();
            parse_array(parser)
        }
        Token::Name(name) => {
            parser.advance();
            match name.to_ascii_lowercase().as_str() {
                "true" => Ok(Value::Bool(true)),
                "false" => Ok(Value::Bool(false)),
                "null" => Ok(Value::Null),
                "inf" => Ok(Value::Float(f64::INFINITY)),
                "nan" => Ok(Value::Float(f64::NAN)),
                "new" => parse_object(parser),
                _ => Err(ParseError::invalid_syntax(
                    format!("'{}' is not a value literal", name),
                    span,
                )
                .with_suggestion(format!("quote it to pass a string: \"{}\"", name))),
            }
        }
        _ => Err(parser.unexpected_token(&[
            Token::IntLiteral(0),
            Token::FloatLiteral(0.0),
            Token::StringLiteral(String::new()),
            Token::LeftBracket,
            Token::name(),
        ])),
    }
}

fn parse_negative(parser: &mut Parser) -> Result<Value, ParseError> {
    match parser.current().clone() {
        Token::IntLiteral(n) => {
            parser.advance();
            Ok(0i64
                .checked_sub_unsigned(n)
                .map_or(Value::Float(-(n as f64)), Value::Int))
        }
        Token::FloatLiteral(f) => {
            parser.advance();
            Ok(Value::Float(-f))
        }
        Token::Name(name) if name.eq_ignore_ascii_case("inf") => {
            parser.advance();
            Ok(Value::Float(f64::NEG_INFINITY))
        }
        _ => Err(parser.unexpected_token(&[Token::IntLiteral(0), Token::FloatLiteral(0.0)])),
    }
}

fn parse_array(parser: &mut Parser) -> Result<Value, ParseError> {
    let mut items = Vec::new();
    while !parser.check(&Token::RightBracket) {
        items.push(parse_value_literal(parser)?);
        if parser.check(&Token::Comma) {
            parser.advance();
        } else if !parser.check(&Token::RightBracket) {
            return Err(parser.unexpected_token(&[Token::Comma, Token::RightBracket]));
        }
    }
    parser.expect(Token::RightBracket)?;
    Ok(Value::Array(items))
}

fn parse_object(parser: &mut Parser) -> Result<Value, ParseError> {
    let class = match parser.current() {
        Token::Name(name) => name.clone(),
        _ => return Err(parser.unexpected_token(&[Token::name()])),
    };
    parser.advance();

    let mut to_string = None;
    if parser.check(&Token::LeftParen) {
        parser.advance();
        if let Token::StringLiteral(s) = parser.current() {
            to_string = Some(s.clone());
            parser.advance();
        }
        parser.expect(Token::RightParen)?;
    }

    let mut object = ObjectValue::new(class);
    object.to_string = to_string;
    Ok(Value::Object(object))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> Result<Value, ParseError> {
        let mut parser = Parser::new(source)?;
        let value = parse_value_literal(&mut parser)?;
        parser.expect_eof(&[])?;
        Ok(value)
    }

    #[test]
    fn test_scalars() {
        assert_eq!(parse("42").unwrap(), Value::Int(42));
        assert_eq!(parse("-7").unwrap(), Value::Int(-7));
        assert_eq!(parse("42.0").unwrap(), Value::Float(42.0));
        assert_eq!(parse("1e100").unwrap(), Value::Float(1e100));
        assert_eq!(parse("'45X'").unwrap(), Value::string("45X"));
        assert_eq!(parse("TRUE").unwrap(), Value::Bool(true));
        assert_eq!(parse("null").unwrap(), Value::Null);
        assert_eq!(parse("-INF").unwrap(), Value::Float(f64::NEG_INFINITY));
        assert!(matches!(parse("NAN").unwrap(), Value::Float(f) if f.is_nan()));
    }

    #[test]
    fn test_integer_range() {
        assert_eq!(parse("-9223372036854775808").unwrap(), Value::Int(i64::MIN));
        assert_eq!(parse("9223372036854775807").unwrap(), Value::Int(i64::MAX));
        assert_eq!(parse("[-9223372036854775808]").unwrap(), Value::Array(vec![Value::Int(i64::MIN)]));
        // Out-of-range literals become floats
        assert_eq!(parse("9223372036854775808").unwrap(), Value::Float(9.223372036854775808e18));
        assert_eq!(parse("-9223372036854775809").unwrap(), Value::Float(-9.223372036854775809e18));
        assert!(parse("99999999999999999999").is_err());
    }

    #[test]
    fn test_arrays() {
        assert_eq!(parse("[]").unwrap(), Value::Array(vec![]));
        assert_eq!(
            parse("[1, 'a', [true],]").unwrap(),
            Value::Array(vec![
                Value::Int(1),
                Value::string("a"),
                Value::Array(vec![Value::Bool(true)]),
            ])
        );
        assert!(parse("[1 2]").is_err());
        assert!(parse("[1,").is_err());
    }

    #[test]
    fn test_objects() {
        assert_eq!(parse("new Foo").unwrap(), Value::Object(ObjectValue::new("Foo")));
        assert_eq!(parse("new Foo()").unwrap(), Value::Object(ObjectValue::new("Foo")));
        assert_eq!(
            parse("new \\App\\Money(\"12 EUR\")").unwrap(),
            Value::Object(ObjectValue::stringable("App\\Money", "12 EUR"))
        );
    }

    #[test]
    fn test_bare_word_is_rejected() {
        let err = parse("hello").unwrap_err();
        assert!(err.suggestion.is_some());
    }
}

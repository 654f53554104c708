//! Type expression parsing
//!
//! ```text
//! type             := simple | "?" simple | union
//! union            := simple_or_pseudo ("|" simple_or_pseudo)+
//! simple_or_pseudo := simple | "false" | "null"
//! ```

use super::{ParseError, Parser};
use crate::token::{Span, Token};
use phpty_types::{SimpleType, Type};

/// A parsed type together with its source location
#[derive(Debug, Clone, PartialEq)]
pub struct TypeAnnotation {
    /// The parsed type
    pub ty: Type,
    /// Span of the whole type expression
    pub span: Span,
    /// Each written member with its span (one entry for non-union types)
    pub members: Vec<(Type, Span)>,
}

/// Parse a type annotation.
///
/// Stops after the type; the caller decides what may follow.
pub fn parse_type_annotation(parser: &mut Parser) -> Result<TypeAnnotation, ParseError> {
    let start = parser.current_span();

    if parser.check(&Token::Question) {
        parser.advance();
        return parse_nullable(parser, start);
    }

    let first = parse_member(parser)?;
    if !parser.check(&Token::Pipe) {
        let span = first.1;
        first.0.validate().map_err(|err| ParseError::from_declaration(err, span))?;
        return Ok(TypeAnnotation {
            ty: first.0.clone(),
            span,
            members: vec![first],
        });
    }

    let mut members = vec![first];
    while parser.check(&Token::Pipe) {
        parser.advance();
        members.push(parse_member(parser)?);
    }
    let span = parser.combine_spans(&start, &parser.previous_span());

    if let Some((_, void_span)) = members
        .iter()
        .find(|(ty, _)| matches!(ty, Type::Simple(SimpleType::Void)))
    {
        return Err(ParseError::invalid_type(
            "void can not be part of a union type",
            *void_span,
        ));
    }

    let ty = Type::union(members.iter().map(|(ty, _)| ty.clone()).collect())
        .map_err(|err| ParseError::from_declaration(err, span))?;

    Ok(TypeAnnotation { ty, span, members })
}

fn parse_nullable(parser: &mut Parser, start: Span) -> Result<TypeAnnotation, ParseError> {
    let (inner, inner_span) = parse_member(parser)?;
    let span = parser.combine_spans(&start, &inner_span);

    let simple = match inner {
        Type::Simple(simple) => simple,
        other => {
            return Err(ParseError::invalid_type(
                format!("{} can not be marked nullable", other),
                span,
            ));
        }
    };

    if parser.check(&Token::Pipe) {
        return Err(mixed_nullable_union(parser, &simple, start));
    }

    let ty = Type::nullable(simple).map_err(|err| ParseError::from_declaration(err, span))?;
    Ok(TypeAnnotation {
        ty: ty.clone(),
        span,
        members: vec![(ty, span)],
    })
}

/// `?T1|T2` is a syntax error; suggest the equivalent `T1|T2|null`
fn mixed_nullable_union(parser: &mut Parser, first: &SimpleType, start: Span) -> ParseError {
    let mut written = vec![first.to_string()];
    let mut complete = true;
    while parser.check(&Token::Pipe) {
        parser.advance();
        match parse_member(parser) {
            Ok((ty, _)) => written.push(ty.to_string()),
            Err(_) => {
                complete = false;
                break;
            }
        }
    }

    let span = parser.combine_spans(&start, &parser.previous_span());
    let suggestion = if complete {
        if !written.iter().any(|w| w == "null") {
            written.push("null".to_string());
        }
        format!("write {} instead", written.join("|"))
    } else {
        "write T1|T2|null instead".to_string()
    };

    ParseError::invalid_syntax("the nullable type syntax ?T can not be combined with a union", span)
        .with_suggestion(suggestion)
}

/// Parse one member: a builtin keyword, `false`, `null` or a class name
fn parse_member(parser: &mut Parser) -> Result<(Type, Span), ParseError> {
    let span = parser.current_span();
    let name = match parser.current() {
        Token::Name(name) => name.clone(),
        _ => return Err(parser.unexpected_token(&[Token::name()])),
    };
    parser.advance();

    Ok((Type::from_name(&name), span))
}

use phpty_parser::{parse_type, parse_value, ParseErrorKind};
use phpty_types::{
    normalize_type, reflect, validate_declaration, ClassTable, CoercionMode, CoercionResolver,
    DeclarationError, DeclarationKind, Imports, NoImports, Redundancy, SubtypingContext, Type,
    Value, VarianceChecker,
};

fn ty(source: &str) -> Type {
    let parsed = parse_type(source).unwrap().ty;
    normalize_type(&parsed, &NoImports).unwrap()
}

fn table() -> ClassTable {
    let mut table = ClassTable::new();
    table
        .add_class("Shape", None, &[])
        .add_class("Circle", Some("Shape"), &["Countable"])
        .add_class("Money", None, &["Stringable"]);
    table
}

// ============================================================================
// Parsing and declaration checks
// ============================================================================

#[test]
fn test_parse_errors_by_kind() {
    let cases = [
        ("?int|string", "syntax"),
        ("int|void", "type"),
        ("?void", "type"),
        ("false", "type"),
        ("null", "type"),
        ("false|null", "type"),
        ("int|", "eof"),
        ("int int", "token"),
    ];

    for (source, expected) in cases {
        let err = parse_type(source).unwrap_err();
        let actual = match err.kind {
            ParseErrorKind::InvalidSyntax { .. } => "syntax",
            ParseErrorKind::InvalidType { .. } => "type",
            ParseErrorKind::UnexpectedEof { .. } => "eof",
            ParseErrorKind::UnexpectedToken { .. } => "token",
        };
        assert_eq!(actual, expected, "{}", source);
    }
}

#[test]
fn test_redundant_unions_are_rejected() {
    let cases = [
        ("int|string|INT", "duplicate"),
        ("Foo|\\foo", "duplicate"),
        ("bool|false", "bool"),
        ("object|Foo", "object"),
        ("iterable|array", "iterable"),
        ("iterable|\\Traversable", "iterable"),
    ];

    for (source, expected) in cases {
        let parsed = parse_type(source).unwrap().ty;
        let err = normalize_type(&parsed, &NoImports).unwrap_err();
        let actual = match err {
            DeclarationError::Redundant { redundancy, .. } => match redundancy {
                Redundancy::Duplicate(_) => "duplicate",
                Redundancy::BoolWithFalse => "bool",
                Redundancy::ObjectWithClass(_) => "object",
                Redundancy::IterableWith(_) => "iterable",
            },
            other => panic!("{}: unexpected error {}", source, other),
        };
        assert_eq!(actual, expected, "{}", source);
    }
}

#[test]
fn test_use_alias_duplicate() {
    let mut imports = Imports::new().with_namespace("App");
    imports.add_use("Lib\\Collection", "Items");

    let parsed = parse_type("Items|\\Lib\\Collection").unwrap().ty;
    assert!(normalize_type(&parsed, &NoImports).is_ok());
    assert!(normalize_type(&parsed, &imports).is_err());
}

#[test]
fn test_declaration_site_rules() {
    let void = parse_type("void").unwrap().ty;
    assert!(validate_declaration(DeclarationKind::Return, &void).is_ok());
    assert!(validate_declaration(DeclarationKind::Parameter, &void).is_err());

    let callable = parse_type("callable|null").unwrap().ty;
    assert!(validate_declaration(DeclarationKind::Property, &callable).is_err());
}

#[test]
fn test_normalized_display_reparses() {
    for source in ["null|Foo|int|string", "?Bar", "false|array|Traversable", "float|INT"] {
        let normalized = ty(source);
        let reparsed = ty(&normalized.to_string());
        assert_eq!(reparsed, normalized, "{}", source);
    }
    assert_eq!(ty("null|Foo|int|string").to_string(), "Foo|string|int|null");
}

// ============================================================================
// Subtyping and variance
// ============================================================================

#[test]
fn test_subtyping_over_parsed_types() {
    let table = table();
    let ctx = SubtypingContext::new(&table);

    assert!(ctx.is_subtype(&ty("Circle|false"), &ty("Shape|bool|null")));
    assert!(ctx.is_subtype(&ty("Circle"), &ty("object")));
    assert!(ctx.is_subtype(&ty("?int"), &ty("int|float|null")));
    assert!(ctx.is_subtype(&ty("array|Traversable"), &ty("iterable")));
    assert!(!ctx.is_subtype(&ty("Shape"), &ty("Circle|int")));
    assert!(!ctx.is_subtype(&ty("bool"), &ty("false|int")));
}

#[test]
fn test_variance_over_parsed_types() {
    let table = table();
    let checker = VarianceChecker::new(SubtypingContext::new(&table));

    assert!(checker.check(DeclarationKind::Parameter, &ty("int|float"), &ty("int")).is_err());
    assert!(checker.check(DeclarationKind::Parameter, &ty("int"), &ty("int|float")).is_ok());
    assert!(checker.check(DeclarationKind::Return, &ty("int"), &ty("int|float")).is_err());
    assert!(checker.check(DeclarationKind::Return, &ty("int|float"), &ty("int")).is_ok());
    assert!(checker.check(DeclarationKind::Return, &ty("?Shape"), &ty("Circle|null")).is_ok());
    assert!(checker.check(DeclarationKind::Property, &ty("?int"), &ty("int|null")).is_ok());
    assert!(checker.check(DeclarationKind::Property, &ty("Shape"), &ty("Circle")).is_err());
}

// ============================================================================
// Coercion and reflection
// ============================================================================

#[test]
fn test_coercion_from_literals() {
    let table = table();
    let resolver = CoercionResolver::new(SubtypingContext::new(&table), CoercionMode::Weak);

    let cases = [
        ("int|string", "42", Value::Int(42)),
        ("int|string", "'42'", Value::string("42")),
        ("int|string", "42.0", Value::Int(42)),
        ("int|string", "1e100", Value::string("1.0E+100")),
        ("int|string", "INF", Value::string("INF")),
        ("int|string", "true", Value::Int(1)),
        ("int|string", "new Money('3 EUR')", Value::string("3 EUR")),
        ("int|float|bool", "'45'", Value::Int(45)),
        ("int|float|bool", "'45.0'", Value::Float(45.0)),
        ("int|float|bool", "''", Value::Bool(false)),
        ("int|float|bool", "'X'", Value::Bool(true)),
        ("int|float|bool", "'45X'", Value::Int(45)),
    ];

    for (target, literal, expected) in cases {
        let value = parse_value(literal).unwrap();
        let result = resolver.coerce(&value, &ty(target)).unwrap();
        assert!(
            result.value.same_representation(&expected),
            "{} as {}: expected {}, got {}",
            literal,
            target,
            expected,
            result.value
        );
    }

    let array = parse_value("[1, 2]").unwrap();
    assert!(resolver.coerce(&array, &ty("int|string")).is_err());
}

#[test]
fn test_reflection_of_parsed_types() {
    let named = reflect(&parse_type("int|null").unwrap().ty);
    assert!(named.as_named().is_some());
    assert_eq!(named.to_string(), "?int");

    let union = reflect(&parse_type("int|float|null").unwrap().ty);
    assert!(union.as_union().is_some());
    assert!(union.allows_null());
    assert_eq!(union.to_string(), "int|float|null");
    assert_eq!(parse_type(&union.to_string()).unwrap().ty, parse_type("int|float|null").unwrap().ty);
}

//! CLI command implementations.

pub mod coerce;
pub mod parse;
pub mod subtype;
pub mod variance;

use crate::output::StyledOutput;
use crate::OutputFormat;
use anyhow::bail;
use codespan_reporting::files::SimpleFiles;
use phpty_parser::{create_files, parse_type, Diagnostic, Span, TypeAnnotation};
use phpty_types::{
    normalize_type, validate_declaration, ClassName, ClassScope, ClassTable, DeclarationKind,
    NameResolver, Type,
};
use termcolor::ColorChoice;

/// Every argument is registered as the only file of its own file database
pub const FILE_ID: usize = 0;

/// Settings shared by all commands
pub struct Context {
    pub format: OutputFormat,
    color: ColorChoice,
}

impl Context {
    pub fn new(format: OutputFormat, color: ColorChoice) -> Self {
        Context { format, color }
    }

    pub fn output(&self) -> StyledOutput {
        StyledOutput::new(self.color)
    }

    pub fn is_json(&self) -> bool {
        self.format == OutputFormat::Json
    }
}

/// A command-line argument treated as a source file for diagnostics
pub struct Argument<'s> {
    pub text: &'s str,
    files: SimpleFiles<String, String>,
}

impl<'s> Argument<'s> {
    pub fn new(name: &str, text: &'s str) -> Self {
        Argument {
            text,
            files: create_files(name, text),
        }
    }

    /// Span covering the whole argument
    pub fn span(&self) -> Span {
        Span::new(0, self.text.len(), 1, 1)
    }
}

/// Render a diagnostic: codespan output on stderr, or JSON on stdout
pub fn report(
    ctx: &Context,
    out: &mut StyledOutput,
    diag: &Diagnostic,
    arg: &Argument,
) -> anyhow::Result<()> {
    if ctx.is_json() {
        let json = diag.to_json(&arg.files)?;
        out.line(&json);
    } else {
        diag.emit_to(out.stderr(), &arg.files)?;
    }
    out.flush();
    Ok(())
}

/// Parse and normalize a type argument, reporting any error against its text
pub fn load_type(
    ctx: &Context,
    out: &mut StyledOutput,
    arg: &Argument,
    resolver: &dyn NameResolver,
) -> anyhow::Result<(TypeAnnotation, Type)> {
    let annotation = match parse_type(arg.text) {
        Ok(annotation) => annotation,
        Err(err) => {
            report(ctx, out, &Diagnostic::from_parse_error(&err, FILE_ID), arg)?;
            bail!("could not parse type '{}'", arg.text);
        }
    };

    match normalize_type(&annotation.ty, resolver) {
        Ok(ty) => Ok((annotation, ty)),
        Err(err) => {
            let diag = Diagnostic::from_declaration_error(&err, &annotation, FILE_ID);
            report(ctx, out, &diag, arg)?;
            bail!("invalid type '{}'", arg.text);
        }
    }
}

/// Check a loaded type against the rules of its declaration site
pub fn check_declaration(
    ctx: &Context,
    out: &mut StyledOutput,
    arg: &Argument,
    kind: DeclarationKind,
    (annotation, ty): &(TypeAnnotation, Type),
) -> anyhow::Result<()> {
    if let Err(err) = validate_declaration(kind, ty) {
        let diag = Diagnostic::from_declaration_error(&err, annotation, FILE_ID);
        report(ctx, out, &diag, arg)?;
        bail!("'{}' can not be used as a {} type", arg.text, kind);
    }
    Ok(())
}

/// Parse a declaration kind argument
pub fn parse_kind(kind: &str) -> anyhow::Result<DeclarationKind> {
    kind.parse().map_err(anyhow::Error::msg)
}

/// A class declared with `--class NAME[:PARENT,INTERFACE...]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassSpec {
    pub name: String,
    pub supertypes: Vec<String>,
}

impl ClassSpec {
    pub fn parse(spec: &str) -> anyhow::Result<Self> {
        let (name, supers) = match spec.split_once(':') {
            Some((name, supers)) => (name.trim(), supers),
            None => (spec.trim(), ""),
        };
        if name.is_empty() {
            bail!("invalid class declaration '{}', expected NAME[:PARENT,...]", spec);
        }

        let supertypes = supers
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();

        Ok(ClassSpec {
            name: name.to_string(),
            supertypes,
        })
    }

    /// The first listed supertype doubles as the parent class
    pub fn parent(&self) -> Option<&str> {
        self.supertypes.first().map(String::as_str)
    }
}

/// Build a class table with the builtins plus the declared classes
pub fn class_table(specs: &[String]) -> anyhow::Result<(ClassTable, Vec<ClassSpec>)> {
    let specs = specs
        .iter()
        .map(|spec| ClassSpec::parse(spec))
        .collect::<anyhow::Result<Vec<_>>>()?;

    let mut table = ClassTable::new();
    for spec in &specs {
        let interfaces: Vec<&str> = spec.supertypes.iter().skip(1).map(String::as_str).collect();
        table.add_class(&spec.name, spec.parent(), &interfaces);
    }
    Ok((table, specs))
}

/// Scope for `self`, taking `parent` from the matching `--class` declaration
pub fn class_scope(specs: &[ClassSpec], self_class: &str) -> ClassScope {
    let parent = specs
        .iter()
        .find(|spec| ClassName::new(&spec.name) == ClassName::new(self_class))
        .and_then(ClassSpec::parent);
    ClassScope::new(self_class, parent)
}

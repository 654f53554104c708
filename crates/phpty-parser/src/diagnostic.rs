//! Diagnostic infrastructure for error reporting
//!
//! Renders parse errors and type-system errors with source context, either
//! through codespan-reporting or as JSON.

use crate::parser::types::TypeAnnotation;
use crate::parser::{ParseError, ParseErrorKind};
use crate::token::Span;
use codespan_reporting::diagnostic::{Diagnostic as CsDiagnostic, Label, LabelStyle, Severity};
use codespan_reporting::files::{Files, SimpleFiles};
use codespan_reporting::term;
use phpty_types::{DeclarationError, Notice, Redundancy, TypeError};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use termcolor::WriteColor;

/// Error code for a diagnostic
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorCode(pub &'static str);

impl ErrorCode {
    /// The code as text
    pub fn as_str(&self) -> &str {
        self.0
    }
}

/// A diagnostic message with source code context
pub struct Diagnostic {
    /// The underlying codespan diagnostic
    inner: CsDiagnostic<usize>,
    /// Error code (e.g., "E1001")
    code: Option<ErrorCode>,
}

impl Diagnostic {
    /// Create a new diagnostic
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Diagnostic {
            inner: CsDiagnostic::new(severity).with_message(message),
            code: None,
        }
    }

    /// Create an error diagnostic
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    /// Create a warning diagnostic
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }

    /// Set the error code
    pub fn with_code(mut self, code: ErrorCode) -> Self {
        self.inner = self.inner.with_code(code.0);
        self.code = Some(code);
        self
    }

    /// Add a primary label (main error location)
    pub fn with_primary_label(mut self, file_id: usize, span: Span, message: impl Into<String>) -> Self {
        let label = Label::primary(file_id, span.start..span.end).with_message(message);
        self.inner.labels.push(label);
        self
    }

    /// Add a secondary label (related location)
    pub fn with_secondary_label(mut self, file_id: usize, span: Span, message: impl Into<String>) -> Self {
        let label = Label::secondary(file_id, span.start..span.end).with_message(message);
        self.inner.labels.push(label);
        self
    }

    /// Add a note (additional context)
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.inner.notes.push(note.into());
        self
    }

    /// Add a help suggestion
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.inner.notes.push(format!("help: {}", help.into()));
        self
    }

    /// Create diagnostic from a ParseError
    pub fn from_parse_error(error: &ParseError, file_id: usize) -> Self {
        let label = match &error.kind {
            ParseErrorKind::UnexpectedToken { found, .. } => format!("unexpected {}", found),
            ParseErrorKind::UnexpectedEof { .. } => "input ends here".to_string(),
            ParseErrorKind::InvalidSyntax { .. } => "invalid syntax".to_string(),
            ParseErrorKind::InvalidType { .. } => "invalid type".to_string(),
        };

        let mut diag = Diagnostic::error(error.message.clone())
            .with_code(parse_error_code(error))
            .with_primary_label(file_id, error.span, label);

        if let Some(suggestion) = &error.suggestion {
            diag = diag.with_help(suggestion.clone());
        }
        diag
    }

    /// Create diagnostic from a DeclarationError raised for `annotation`
    pub fn from_declaration_error(error: &DeclarationError, annotation: &TypeAnnotation, file_id: usize) -> Self {
        let diag = Diagnostic::error(error.to_string()).with_code(declaration_error_code(error));

        match error {
            DeclarationError::Redundant {
                redundancy: Redundancy::Duplicate(_),
                ..
            } => match duplicate_member_spans(annotation) {
                Some((first, second)) => diag
                    .with_primary_label(file_id, second, "duplicate member")
                    .with_secondary_label(file_id, first, "first written here"),
                None => diag
                    .with_primary_label(file_id, annotation.span, "duplicate after name resolution")
                    .with_note("use imports are applied before members are compared"),
            },
            DeclarationError::Redundant { redundancy, .. } => diag
                .with_primary_label(file_id, annotation.span, "redundant member")
                .with_help(match redundancy {
                    Redundancy::BoolWithFalse => "remove false, bool already includes it".to_string(),
                    Redundancy::ObjectWithClass(class) => format!("remove {}, object already includes it", class),
                    Redundancy::IterableWith(member) => format!("remove {}, iterable already includes it", member),
                    Redundancy::Duplicate(member) => format!("remove the second {}", member),
                }),
            DeclarationError::InvalidType { .. } => {
                diag.with_primary_label(file_id, annotation.span, "invalid type")
            }
            DeclarationError::Variance { kind, .. } => diag.with_primary_label(
                file_id,
                annotation.span,
                format!("incompatible {} type", kind),
            ),
        }
    }

    /// Create diagnostic from a runtime TypeError for a value written at `span`
    pub fn from_type_error(error: &TypeError, file_id: usize, span: Span) -> Self {
        let label = match error {
            TypeError::Mismatch { expected, .. } => format!("not accepted by {}", expected),
            TypeError::NotCoercible { expected, .. } => format!("no conversion to {}", expected),
            TypeError::ReferenceConflict { slot, .. } => format!("conflicts at ${}", slot),
        };
        let diag = Diagnostic::error(error.to_string())
            .with_code(type_error_code(error))
            .with_primary_label(file_id, span, label);

        match error {
            TypeError::Mismatch { .. } => {
                diag.with_note("strict mode only widens int to float")
            }
            _ => diag,
        }
    }

    /// Create a warning from a coercion notice for a value written at `span`
    pub fn from_notice(notice: &Notice, file_id: usize, span: Span) -> Self {
        let diag = Diagnostic::warning(notice.to_string()).with_code(ErrorCode("W4001"));
        match notice {
            Notice::NonWellFormedNumeric { input } => diag.with_primary_label(
                file_id,
                span,
                format!("only a prefix of {:?} is numeric", input),
            ),
        }
    }

    /// Emit the diagnostic to any color-capable writer
    pub fn emit_to(
        &self,
        writer: &mut dyn WriteColor,
        files: &SimpleFiles<String, String>,
    ) -> Result<(), codespan_reporting::files::Error> {
        let config = term::Config::default();
        term::emit(writer, &config, files, &self.inner)
    }

    /// Get the underlying codespan diagnostic (for testing/custom rendering)
    pub fn inner(&self) -> &CsDiagnostic<usize> {
        &self.inner
    }

    /// Error code, if any
    pub fn code(&self) -> Option<&ErrorCode> {
        self.code.as_ref()
    }

    /// Convert to JSON representation
    pub fn to_json(&self, files: &SimpleFiles<String, String>) -> Result<String, serde_json::Error> {
        let json_diag = JsonDiagnostic::from_diagnostic(self, files);
        serde_json::to_string_pretty(&json_diag)
    }
}

/// First pair of members written with the same spelling (case-insensitive)
fn duplicate_member_spans(annotation: &TypeAnnotation) -> Option<(Span, Span)> {
    let mut seen: FxHashMap<String, Span> = FxHashMap::default();
    for (ty, span) in &annotation.members {
        let key = ty.to_string().trim_start_matches('\\').to_ascii_lowercase();
        if let Some(first) = seen.get(&key) {
            return Some((*first, *span));
        }
        seen.insert(key, *span);
    }
    None
}

/// JSON representation of a diagnostic
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonDiagnostic {
    /// Error code (e.g., "E1001")
    pub code: Option<String>,
    /// Severity level
    pub severity: String,
    /// Main error message
    pub message: String,
    /// Source locations with labels
    pub labels: Vec<JsonLabel>,
    /// Additional notes and help
    pub notes: Vec<String>,
}

/// JSON representation of a diagnostic label
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonLabel {
    /// File (or argument) name
    pub file: String,
    /// Start line (1-indexed)
    pub start_line: usize,
    /// Start column (1-indexed)
    pub start_column: usize,
    /// End line (1-indexed)
    pub end_line: usize,
    /// End column (1-indexed)
    pub end_column: usize,
    /// Label message
    pub message: Option<String>,
    /// Label style (primary or secondary)
    pub style: String,
}

impl JsonDiagnostic {
    /// Convert a Diagnostic to JSON representation
    pub fn from_diagnostic(diag: &Diagnostic, files: &SimpleFiles<String, String>) -> Self {
        let severity = match diag.inner.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Note => "note",
            Severity::Help => "help",
            Severity::Bug => "bug",
        };

        let labels = diag
            .inner
            .labels
            .iter()
            .filter_map(|label| {
                let file = files.get(label.file_id).ok()?;
                let start = file.location((), label.range.start).ok()?;
                let end = file.location((), label.range.end).ok()?;

                Some(JsonLabel {
                    file: file.name().to_string(),
                    start_line: start.line_number,
                    start_column: start.column_number,
                    end_line: end.line_number,
                    end_column: end.column_number,
                    message: Some(label.message.clone()),
                    style: match label.style {
                        LabelStyle::Primary => "primary",
                        LabelStyle::Secondary => "secondary",
                    }
                    .to_string(),
                })
            })
            .collect();

        JsonDiagnostic {
            code: diag.code.as_ref().map(|c| c.0.to_string()),
            severity: severity.to_string(),
            message: diag.inner.message.clone(),
            labels,
            notes: diag.inner.notes.clone(),
        }
    }
}

/// Get error code for a ParseError
pub fn parse_error_code(error: &ParseError) -> ErrorCode {
    match error.kind {
        ParseErrorKind::UnexpectedToken { .. } => ErrorCode("E0001"),
        ParseErrorKind::UnexpectedEof { .. } => ErrorCode("E0002"),
        ParseErrorKind::InvalidSyntax { .. } => ErrorCode("E0003"),
        ParseErrorKind::InvalidType { .. } => ErrorCode("E1001"),
    }
}

/// Get error code for a DeclarationError
pub fn declaration_error_code(error: &DeclarationError) -> ErrorCode {
    match error {
        DeclarationError::InvalidType { .. } => ErrorCode("E1002"),
        DeclarationError::Redundant { redundancy, .. } => match redundancy {
            Redundancy::Duplicate(_) => ErrorCode("E2001"),
            Redundancy::BoolWithFalse => ErrorCode("E2002"),
            Redundancy::ObjectWithClass(_) => ErrorCode("E2003"),
            Redundancy::IterableWith(_) => ErrorCode("E2004"),
        },
        DeclarationError::Variance { .. } => ErrorCode("E3001"),
    }
}

/// Get error code for a TypeError
pub fn type_error_code(error: &TypeError) -> ErrorCode {
    match error {
        TypeError::Mismatch { .. } => ErrorCode("E4001"),
        TypeError::NotCoercible { .. } => ErrorCode("E4002"),
        TypeError::ReferenceConflict { .. } => ErrorCode("E4003"),
    }
}

/// Helper to create a SimpleFiles instance from source text
pub fn create_files(name: impl Into<String>, source: impl Into<String>) -> SimpleFiles<String, String> {
    let mut files = SimpleFiles::new();
    files.add(name.into(), source.into());
    files
}

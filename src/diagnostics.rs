//! Diagnostic reporting infrastructure.
//!
//! This module provides error reporting with source locations and
//! pretty-printed output, plus the error taxonomy of the expression
//! lowering engine ([`ValueError`]).
//!
//! # Error Codes
//!
//! Lark compiler error codes are organized by category:
//!
//! - **E0001-E0099**: Lexer errors
//! - **E0100-E0199**: Syntax/parser errors
//! - **E0200-E0299**: Name resolution errors
//! - **E0300-E0399**: Type and expression lowering errors
//! - **E0400-E0499**: Backend errors
//!
//! Only the E03xx and E04xx bands are assigned by this crate.

use crate::span::Span;
use ariadne::{Color, Label, Report, ReportKind, Source};
use thiserror::Error;

/// Compiler error codes assigned by the value-lowering layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum ErrorCode {
    // ============================================================
    // Type / lowering errors (E0300-E0399)
    // ============================================================
    /// Operator has no lowering for the operand kinds it was given.
    UnimplementedOperator = 300,
    /// No conversion rule exists between the two types.
    UnsupportedConversion = 301,
    /// A conversion pairing the engine does not cover yet.
    UnimplementedConversion = 302,
    /// A constant does not fit the width it is being bound to.
    ConstantOverflow = 303,
    /// Operands of a structurally invalid shape (e.g. comparing
    /// zero-field structs, taking the address of a constant).
    InvalidOperandShape = 304,
    /// An internal contract of the lowering engine was violated.
    InternalError = 305,

    // ============================================================
    // Backend errors (E0400-E0499)
    // ============================================================
    /// The LLVM builder reported a failure.
    BackendFailure = 400,
}

impl ErrorCode {
    /// Get the formatted error code string (e.g., "E0300").
    pub fn as_str(&self) -> String {
        format!("E{:04}", *self as u16)
    }

    /// Get a human-readable description of the error.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::UnimplementedOperator => "operator not implemented for these operands",
            ErrorCode::UnsupportedConversion => "unsupported conversion",
            ErrorCode::UnimplementedConversion => "conversion not implemented",
            ErrorCode::ConstantOverflow => "constant out of range",
            ErrorCode::InvalidOperandShape => "invalid operand",
            ErrorCode::InternalError => "internal compiler error",
            ErrorCode::BackendFailure => "code generation failure",
        }
    }

    /// Get a help message suggesting how to fix the error.
    pub fn help(&self) -> Option<&'static str> {
        match self {
            ErrorCode::ConstantOverflow => {
                Some("use a wider integer type or reduce the constant")
            }
            ErrorCode::UnsupportedConversion => {
                Some("only conversions between compatible types are allowed")
            }
            _ => None,
        }
    }
}

/// The kind of diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// An error that prevents compilation.
    Error,
    /// A warning that doesn't prevent compilation.
    Warning,
    /// An informational note.
    Note,
}

impl DiagnosticKind {
    fn to_report_kind(self) -> ReportKind<'static> {
        match self {
            DiagnosticKind::Error => ReportKind::Error,
            DiagnosticKind::Warning => ReportKind::Warning,
            DiagnosticKind::Note => ReportKind::Advice,
        }
    }

    fn color(self) -> Color {
        match self {
            DiagnosticKind::Error => Color::Red,
            DiagnosticKind::Warning => Color::Yellow,
            DiagnosticKind::Note => Color::Cyan,
        }
    }
}

/// A compiler diagnostic.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    /// The kind of diagnostic.
    pub kind: DiagnosticKind,
    /// The error code (e.g., "E0300").
    pub code: Option<String>,
    /// The main error message.
    pub message: String,
    /// The primary span where the error occurred.
    pub span: Span,
    /// Additional labels pointing to relevant code.
    pub labels: Vec<DiagnosticLabel>,
    /// Suggestions for fixing the error.
    pub suggestions: Vec<String>,
}

impl Diagnostic {
    /// Create a new error diagnostic.
    pub fn error(message: impl Into<String>, span: Span) -> Self {
        Self {
            kind: DiagnosticKind::Error,
            code: None,
            message: message.into(),
            span,
            labels: Vec::new(),
            suggestions: Vec::new(),
        }
    }

    /// Create a new warning diagnostic.
    pub fn warning(message: impl Into<String>, span: Span) -> Self {
        Self {
            kind: DiagnosticKind::Warning,
            code: None,
            message: message.into(),
            span,
            labels: Vec::new(),
            suggestions: Vec::new(),
        }
    }

    /// Set the error code from an ErrorCode enum.
    /// Automatically adds the help message if available.
    pub fn with_error_code(mut self, code: ErrorCode) -> Self {
        self.code = Some(code.as_str());
        if let Some(help) = code.help() {
            self.suggestions.push(help.to_string());
        }
        self
    }

    /// Add a note to help explain the error.
    pub fn with_note(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(DiagnosticLabel::secondary(span, message));
        self
    }

    /// Add a label.
    pub fn with_label(mut self, label: DiagnosticLabel) -> Self {
        self.labels.push(label);
        self
    }

    /// Add a suggestion.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }
}

/// A label in a diagnostic.
#[derive(Debug, Clone)]
pub struct DiagnosticLabel {
    /// The span this label points to.
    pub span: Span,
    /// The label message.
    pub message: String,
    /// Whether this is the primary label.
    pub primary: bool,
}

impl DiagnosticLabel {
    pub fn primary(span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
            primary: true,
        }
    }

    pub fn secondary(span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
            primary: false,
        }
    }
}

/// Diagnostic emitter that prints diagnostics to stderr.
pub struct DiagnosticEmitter<'a> {
    filename: &'a str,
    source: &'a str,
}

impl<'a> DiagnosticEmitter<'a> {
    pub fn new(filename: &'a str, source: &'a str) -> Self {
        Self { filename, source }
    }

    /// Emit a diagnostic to stderr.
    pub fn emit(&self, diagnostic: &Diagnostic) {
        let mut builder = Report::build(
            diagnostic.kind.to_report_kind(),
            self.filename,
            diagnostic.span.start,
        );

        let message = if let Some(code) = &diagnostic.code {
            format!("[{}] {}", code, diagnostic.message)
        } else {
            diagnostic.message.clone()
        };
        builder = builder.with_message(&message);

        builder = builder.with_label(
            Label::new((self.filename, diagnostic.span.start..diagnostic.span.end))
                .with_color(diagnostic.kind.color())
                .with_message(&diagnostic.message),
        );

        for label in &diagnostic.labels {
            let color = if label.primary {
                diagnostic.kind.color()
            } else {
                Color::Blue
            };
            builder = builder.with_label(
                Label::new((self.filename, label.span.start..label.span.end))
                    .with_color(color)
                    .with_message(&label.message),
            );
        }

        if !diagnostic.suggestions.is_empty() {
            let help = diagnostic.suggestions.join("\n");
            builder = builder.with_help(help);
        }

        let report = builder.finish();

        report
            .eprint((self.filename, Source::from(self.source)))
            .expect("Failed to write diagnostic");
    }
}

/// Errors produced by expression lowering.
///
/// The lowering engine carries no position information of its own; the
/// caller attaches a [`Span`] when bridging into a [`Diagnostic`] via
/// [`ValueError::into_diagnostic`]. Every error aborts the enclosing
/// expression; there is no recovery path inside the value layer.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValueError {
    /// The operator/operand-kind pairing has no lowering rule.
    #[error("operator `{op}` is not implemented for `{lhs}` and `{rhs}`")]
    UnimplementedOperator {
        op: String,
        lhs: String,
        rhs: String,
    },

    /// No conversion rule exists between the two types. User-reachable.
    #[error("cannot convert `{from}` to `{to}`")]
    UnsupportedConversion { from: String, to: String },

    /// A conversion pairing the engine does not cover yet. Reaching this
    /// means a coverage gap, not a user error.
    #[error("conversion from `{from}` to `{to}` is not implemented")]
    UnimplementedConversion { from: String, to: String },

    /// A constant exceeds the representable range of its default or
    /// requested width. Constants are never silently truncated.
    #[error("constant {value} overflows `{target}`")]
    ConstantOverflow { value: String, target: String },

    /// Operands of a structurally invalid shape.
    #[error("invalid operand: {reason}")]
    InvalidOperandShape { reason: String },

    /// A programming contract of the lowering engine was violated.
    #[error("internal compiler error: {reason}")]
    Internal { reason: String },

    /// The LLVM builder reported a failure.
    #[error("code generation failed: {0}")]
    Llvm(String),
}

impl ValueError {
    /// The error code band this error falls into.
    pub fn code(&self) -> ErrorCode {
        match self {
            ValueError::UnimplementedOperator { .. } => ErrorCode::UnimplementedOperator,
            ValueError::UnsupportedConversion { .. } => ErrorCode::UnsupportedConversion,
            ValueError::UnimplementedConversion { .. } => ErrorCode::UnimplementedConversion,
            ValueError::ConstantOverflow { .. } => ErrorCode::ConstantOverflow,
            ValueError::InvalidOperandShape { .. } => ErrorCode::InvalidOperandShape,
            ValueError::Internal { .. } => ErrorCode::InternalError,
            ValueError::Llvm(_) => ErrorCode::BackendFailure,
        }
    }

    /// Bridge into a [`Diagnostic`], attaching the expression's span.
    pub fn into_diagnostic(self, span: Span) -> Diagnostic {
        let message = self.to_string();
        let code = self.code();
        Diagnostic::error(message, span).with_error_code(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_codes_format_with_band() {
        assert_eq!(ErrorCode::UnimplementedOperator.as_str(), "E0300");
        assert_eq!(ErrorCode::ConstantOverflow.as_str(), "E0303");
        assert_eq!(ErrorCode::BackendFailure.as_str(), "E0400");
    }

    #[test]
    fn value_error_renders_message_and_code() {
        let err = ValueError::ConstantOverflow {
            value: "70000".into(),
            target: "int16".into(),
        };
        assert_eq!(err.to_string(), "constant 70000 overflows `int16`");

        let diag = err.into_diagnostic(Span::new(4, 9, 1, 5));
        assert_eq!(diag.code.as_deref(), Some("E0303"));
        assert_eq!(diag.kind, DiagnosticKind::Error);
        assert!(!diag.suggestions.is_empty());
    }

    #[test]
    fn unimplemented_operator_names_both_operands() {
        let err = ValueError::UnimplementedOperator {
            op: "%".into(),
            lhs: "int32".into(),
            rhs: "int32".into(),
        };
        assert_eq!(
            err.to_string(),
            "operator `%` is not implemented for `int32` and `int32`"
        );
        assert_eq!(err.code(), ErrorCode::UnimplementedOperator);
    }
}

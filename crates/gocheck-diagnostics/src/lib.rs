//! gocheck Diagnostics - findings as presented to people and report layers.
//!
//! The semantic analyzer produces structured findings; this crate is where they
//! become user-facing diagnostics. It includes:
//!
//! - `Diagnostic` - code, severity, message, labelled spans, notes and fix suggestions
//! - `DiagnosticSeverity` - Error, Warning, Note and Help levels
//! - `ErrorCodeRegistry` - the stable error codes the analyzer emits
//! - Source spans with line/column resolution
//! - Terminal rendering with caret markers under the offending source text
//!
//! Every public value is `serde::Serialize`, so a JSON report layer can emit
//! diagnostics without reshaping them.
//!
//! # Example
//!
//! ```rust
//! use gocheck_diagnostics::{Diagnostic, DiagnosticSeverity};
//! use gocheck_diagnostics::span::SourceSpan;
//!
//! let span = SourceSpan::new("main.go", 20, 32);
//! let diagnostic = Diagnostic::error("E2001", "wrong number of arguments in call to `sum`")
//!     .with_primary_span(span, "expected 2 arguments, found 3");
//!
//! assert_eq!(diagnostic.severity, DiagnosticSeverity::Error);
//! assert_eq!(diagnostic.code.as_deref(), Some("E2001"));
//! ```

pub mod render;
pub mod span;
pub mod suggestion;

use serde::Serialize;
use span::{MultiSpan, SourceSpan};
use suggestion::Suggestion;
use thiserror::Error;

/// The severity level of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticSeverity {
    /// A rule violation.
    #[default]
    Error,
    /// Suspicious but legal code.
    Warning,
    /// Informational note, usually attached to another diagnostic.
    Note,
    /// A suggestion for fixing an issue.
    Help,
}

impl DiagnosticSeverity {
    /// Returns the text prefix for this severity level.
    pub fn prefix(&self) -> &'static str {
        match self {
            DiagnosticSeverity::Error => "error",
            DiagnosticSeverity::Warning => "warning",
            DiagnosticSeverity::Note => "note",
            DiagnosticSeverity::Help => "help",
        }
    }

    /// Returns true if a report containing this severity should fail the check.
    pub fn is_failure(&self) -> bool {
        matches!(self, DiagnosticSeverity::Error)
    }
}

/// A checker diagnostic (error, warning, note, or help message).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// The error code (e.g., "E2001").
    pub code: Option<String>,
    /// The severity level.
    pub severity: DiagnosticSeverity,
    /// The main message.
    pub message: String,
    /// Source locations related to this diagnostic.
    pub spans: MultiSpan,
    /// Suggested fixes for this diagnostic.
    pub suggestions: Vec<Suggestion>,
    /// Child diagnostics (notes, helps attached to this diagnostic).
    pub children: Vec<Diagnostic>,
}

impl Diagnostic {
    /// Creates a new diagnostic with the given severity, code, and message.
    pub fn new(
        severity: DiagnosticSeverity,
        code: impl Into<Option<String>>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            severity,
            message: message.into(),
            spans: MultiSpan::new(),
            suggestions: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Creates an error diagnostic.
    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(DiagnosticSeverity::Error, Some(code.into()), message)
    }

    /// Creates a warning diagnostic.
    pub fn warning(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(DiagnosticSeverity::Warning, Some(code.into()), message)
    }

    /// Creates a note diagnostic (usually attached to another diagnostic).
    pub fn note(message: impl Into<String>) -> Self {
        Self::new(DiagnosticSeverity::Note, None::<String>, message)
    }

    /// Creates a help diagnostic.
    pub fn help(message: impl Into<String>) -> Self {
        Self::new(DiagnosticSeverity::Help, None::<String>, message)
    }

    /// Adds a primary span with a label message.
    pub fn with_primary_span(mut self, span: SourceSpan, message: impl Into<String>) -> Self {
        self.spans.push_primary(span, message);
        self
    }

    /// Adds a secondary span with a label message.
    pub fn with_secondary_span(mut self, span: SourceSpan, message: impl Into<String>) -> Self {
        self.spans.push_secondary(span, message);
        self
    }

    /// Adds a suggestion to this diagnostic.
    pub fn with_suggestion(mut self, suggestion: Suggestion) -> Self {
        self.suggestions.push(suggestion);
        self
    }

    /// Adds a child diagnostic (note or help).
    pub fn with_child(mut self, child: Diagnostic) -> Self {
        self.children.push(child);
        self
    }

    /// Returns the documentation URL for this diagnostic.
    pub fn docs_url(&self, base_url: &str) -> Option<String> {
        self.code.as_ref().map(|code| format!("{}/{}", base_url, code))
    }

    pub fn has_spans(&self) -> bool {
        !self.spans.is_empty()
    }

    pub fn has_suggestions(&self) -> bool {
        !self.suggestions.is_empty()
    }
}

/// Error categories for the error code registry.
///
/// Codes follow the pattern EXXXX where the first digit is the category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ErrorCategory {
    /// E0XXX: typing of values, operands and declarations
    Typing,
    /// E1XXX: names, scopes and declarations
    Naming,
    /// E2XXX: call sites
    Calls,
    /// E3XXX: statements and control flow
    Statements,
    /// E9XXX: analysis aborted
    Internal,
}

impl ErrorCategory {
    /// Creates a category from an error code.
    pub fn from_code(code: &str) -> Option<Self> {
        if !code.starts_with('E') || code.len() != 5 {
            return None;
        }
        match code.chars().nth(1)? {
            '0' => Some(ErrorCategory::Typing),
            '1' => Some(ErrorCategory::Naming),
            '2' => Some(ErrorCategory::Calls),
            '3' => Some(ErrorCategory::Statements),
            '9' => Some(ErrorCategory::Internal),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ErrorCategory::Typing => "Typing",
            ErrorCategory::Naming => "Naming/Scope",
            ErrorCategory::Calls => "Calls",
            ErrorCategory::Statements => "Statements",
            ErrorCategory::Internal => "Internal",
        }
    }
}

/// Information about a registered error code.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorCodeInfo {
    pub code: String,
    pub category: ErrorCategory,
    pub description: String,
}

impl ErrorCodeInfo {
    pub fn new(code: impl Into<String>, description: impl Into<String>) -> Option<Self> {
        let code = code.into();
        let category = ErrorCategory::from_code(&code)?;
        Some(Self {
            code,
            category,
            description: description.into(),
        })
    }
}

/// Registry of all known error codes.
#[derive(Debug, Default)]
pub struct ErrorCodeRegistry {
    codes: std::collections::BTreeMap<String, ErrorCodeInfo>,
}

impl ErrorCodeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry with every code the analyzer can emit.
    pub fn with_standard_codes() -> Self {
        let mut registry = Self::new();

        registry.register("E0001", "value not assignable to declared type");
        registry.register("E0002", "return type mismatch");
        registry.register("E0003", "mismatched operands");
        registry.register("E0004", "invalid operand");
        registry.register("E0005", "invalid conversion");
        registry.register("E0006", "invalid composite literal");
        registry.register("E0007", "not a value");
        registry.register("E0008", "type cannot be indexed");
        registry.register("E0009", "invalid index");
        registry.register("E0010", "type cannot be ranged over");
        registry.register("E0011", "invalid recursive type");

        registry.register("E1001", "unknown identifier");
        registry.register("E1002", "unknown type");
        registry.register("E1003", "duplicate binding");
        registry.register("E1004", "duplicate type declaration");
        registry.register("E1005", "invalid selector");
        registry.register("E1006", "no new variables on left side of :=");
        registry.register("E1007", "initialization cycle");

        registry.register("E2001", "arguments number mismatch");
        registry.register("E2002", "arguments type mismatch");
        registry.register("E2003", "not callable");

        registry.register("E3001", "non-boolean condition");
        registry.register("E3002", "assignment count mismatch");
        registry.register("E3003", "invalid assignment target");
        registry.register("E3004", "break or continue outside loop");

        registry.register("E9001", "alias chain too deep");
        registry.register("E9002", "malformed program tree");

        registry
    }

    /// Registers a new error code; returns false if the code is malformed.
    pub fn register(&mut self, code: impl Into<String>, description: impl Into<String>) -> bool {
        let code = code.into();
        match ErrorCodeInfo::new(code.clone(), description) {
            Some(info) => {
                self.codes.insert(code, info);
                true
            }
            None => false,
        }
    }

    pub fn get(&self, code: &str) -> Option<&ErrorCodeInfo> {
        self.codes.get(code)
    }

    /// All registered codes in code order.
    pub fn all_codes(&self) -> impl Iterator<Item = &ErrorCodeInfo> {
        self.codes.values()
    }

    pub fn codes_in_category(&self, category: ErrorCategory) -> impl Iterator<Item = &ErrorCodeInfo> {
        self.codes.values().filter(move |info| info.category == category)
    }
}

/// Result type for diagnostic operations.
pub type DiagnosticResult<T> = Result<T, DiagnosticError>;

/// Errors that can occur while rendering diagnostics.
#[derive(Debug, Error)]
pub enum DiagnosticError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("source file not found: {0}")]
    SourceNotFound(String),
}

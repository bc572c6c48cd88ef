//! Rich diagnostics for semantic findings.
//!
//! Converts [`SemaError`] and [`FatalError`] into
//! [`gocheck_diagnostics::Diagnostic`] values with labelled spans, notes and
//! fix suggestions, ready for the terminal renderer.

use crate::error::{FatalError, SemaError};
use gocheck_ast::Span;
use gocheck_diagnostics::span::SourceSpan;
use gocheck_diagnostics::suggestion::{Applicability, Suggestion};
use gocheck_diagnostics::Diagnostic;

impl SemaError {
    /// Converts this finding into a diagnostic located in `file`.
    pub fn to_diagnostic(&self, file: &str) -> Diagnostic {
        let code = self.kind().code();
        let at = |span: &Span| source_span(file, span);

        match self {
            // ================================================================
            // Calls
            // ================================================================
            SemaError::ArityMismatch {
                callee,
                expected,
                found,
                signature,
                span,
            } => Diagnostic::error(code, format!("arguments number mismatch in call to `{}`", callee))
                .with_primary_span(
                    at(span),
                    format!("expected {} {}, found {}", expected, plural(*expected, "argument"), found),
                )
                .with_child(Diagnostic::note(format!("`{}` is declared as `{}`", callee, signature))),

            SemaError::ArgumentTypeMismatch {
                callee,
                position,
                expected,
                found,
                convertible,
                span,
            } => {
                let mut diag = Diagnostic::error(code, format!("arguments type mismatch in call to `{}`", callee))
                    .with_primary_span(
                        at(span),
                        format!("argument {} expects `{}`, found `{}`", position + 1, expected, found),
                    );
                if *convertible {
                    diag = diag
                        .with_child(Diagnostic::note(format!(
                            "`{}` and `{}` have the same underlying type",
                            found, expected
                        )))
                        .with_suggestion(Suggestion::maybe_incorrect(format!(
                            "converting the argument with `{}(...)`",
                            expected
                        )));
                }
                diag
            }

            SemaError::NotCallable { name, found, span } => {
                Diagnostic::error(code, format!("`{}` is not callable", name))
                    .with_primary_span(at(span), format!("has type `{}`", found))
            }

            // ================================================================
            // Names
            // ================================================================
            SemaError::UnknownIdentifier { name, span, similar } => with_similar(
                Diagnostic::error(code, format!("unknown identifier `{}`", name))
                    .with_primary_span(at(span), "not found in this scope"),
                &at(span),
                similar,
            ),

            SemaError::UnknownType {
                name,
                span,
                similar,
                names_value,
            } => {
                let label = if *names_value {
                    format!("`{}` is a value, not a type", name)
                } else {
                    "not found in this scope".to_string()
                };
                with_similar(
                    Diagnostic::error(code, format!("unknown type `{}`", name)).with_primary_span(at(span), label),
                    &at(span),
                    similar,
                )
            }

            SemaError::DuplicateBinding { name, span, previous }
            | SemaError::DuplicateTypeDeclaration { name, span, previous } => {
                let mut diag = Diagnostic::error(code, self.to_string())
                    .with_primary_span(at(span), format!("`{}` redeclared here", name));
                if !previous.is_dummy() {
                    diag = diag.with_secondary_span(at(previous), "previous declaration here");
                }
                diag
            }

            SemaError::NoNewVariables { span } => Diagnostic::error(code, self.to_string())
                .with_primary_span(at(span), "every name on the left is already declared")
                .with_suggestion(Suggestion::maybe_incorrect("using `=` to assign")),

            // ================================================================
            // Types and statements
            // ================================================================
            SemaError::AssignmentMismatch {
                expected,
                found,
                context,
                span,
            } => Diagnostic::error(code, format!("mismatched types in {}", context))
                .with_primary_span(at(span), format!("expected `{}`, found `{}`", expected, found)),

            SemaError::ReturnTypeMismatch { expected, found, span } => {
                Diagnostic::error(code, "mismatched return type")
                    .with_primary_span(at(span), format!("expected `{}`, found `{}`", expected, found))
            }

            SemaError::MismatchedOperands { op, left, right, span } => {
                Diagnostic::error(code, format!("mismatched operands for `{}`", op))
                    .with_primary_span(at(span), format!("`{}` and `{}`", left, right))
            }

            SemaError::InvalidConversion { found, target, span } => Diagnostic::error(code, self.to_string())
                .with_primary_span(at(span), format!("has type `{}`", found))
                .with_child(Diagnostic::note(format!(
                    "only values with the same underlying type, or numeric values, convert to `{}`",
                    target
                ))),

            SemaError::MisplacedBranch { keyword, span } => Diagnostic::error(code, self.to_string())
                .with_primary_span(at(span), format!("`{}` outside of a `for` loop", keyword)),

            SemaError::InvalidRecursiveType { name, span } => Diagnostic::error(code, self.to_string())
                .with_primary_span(at(span), format!("`{}` contains itself", name))
                .with_child(Diagnostic::note(
                    "a sequence of the type, such as `[]T`, may refer to itself",
                )),

            SemaError::InitializationCycle { name, span } => Diagnostic::error(code, self.to_string())
                .with_primary_span(at(span), format!("`{}` is needed to initialize itself", name)),

            other => Diagnostic::error(code, other.to_string()).with_primary_span(at(&other.span()), short_label(other)),
        }
    }
}

impl FatalError {
    pub fn to_diagnostic(&self, file: &str) -> Diagnostic {
        match self {
            FatalError::UnresolvedAlias { name, .. } => Diagnostic::error("E9001", self.to_string())
                .with_child(Diagnostic::note(format!(
                    "`{}` refers back to itself through its declarations",
                    name
                ))),
            FatalError::MalformedTree { span, .. } => {
                let diag = Diagnostic::error("E9002", self.to_string());
                if span.is_dummy() {
                    diag
                } else {
                    diag.with_primary_span(source_span(file, span), "here")
                }
            }
        }
    }
}

fn source_span(file: &str, span: &Span) -> SourceSpan {
    SourceSpan::new(file, span.start, span.end)
}

fn with_similar(mut diag: Diagnostic, span: &SourceSpan, similar: &[String]) -> Diagnostic {
    for candidate in similar {
        diag = diag.with_suggestion(Suggestion::replacement(
            "using a similar name",
            span,
            candidate.clone(),
            Applicability::MaybeIncorrect,
        ));
    }
    diag
}

fn short_label(error: &SemaError) -> String {
    match error {
        SemaError::InvalidOperand { operand, .. } => format!("has type `{}`", operand),
        SemaError::AssignmentCountMismatch { targets, values, .. } => {
            format!("{} {} on the left, {} on the right", targets, plural(*targets, "name"), values)
        }
        SemaError::NonBooleanCondition { found, .. } => format!("expected `bool`, found `{}`", found),
        SemaError::NotIndexable { found, .. } | SemaError::NotIterable { found, .. } => {
            format!("has type `{}`", found)
        }
        SemaError::NotAValue { what, .. } => format!("this is {}", what),
        SemaError::InvalidSelector { found, .. } => format!("base has type `{}`", found),
        _ => "here".to_string(),
    }
}

fn plural(count: usize, word: &str) -> String {
    if count == 1 {
        word.to_string()
    } else {
        format!("{}s", word)
    }
}

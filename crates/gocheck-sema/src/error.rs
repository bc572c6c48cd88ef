//! Findings and fatal conditions.
//!
//! A [`SemaError`] is a recoverable finding: it is recorded and the walk goes
//! on. A [`FatalError`] aborts the analysis and is propagated with `?` from
//! wherever it is detected.

use gocheck_ast::Span;
use thiserror::Error;

pub type SemaResult<T> = Result<T, FatalError>;

/// Conditions a well-formed program tree can never trigger.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FatalError {
    #[error("type `{name}` does not resolve within {depth} steps (cyclic alias or type declaration)")]
    UnresolvedAlias { name: String, depth: usize },

    #[error("malformed program tree: {detail}")]
    MalformedTree { detail: String, span: Span },
}

/// Fieldless discriminant of [`SemaError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DiagnosticKind {
    ArityMismatch,
    ArgumentTypeMismatch,
    UnknownIdentifier,
    UnknownType,
    NotCallable,
    DuplicateBinding,
    DuplicateTypeDeclaration,
    MismatchedOperands,
    InvalidOperand,
    AssignmentMismatch,
    AssignmentCountMismatch,
    ReturnTypeMismatch,
    NonBooleanCondition,
    NotIndexable,
    InvalidIndex,
    NotIterable,
    NotAValue,
    InvalidConversion,
    InvalidCompositeLiteral,
    InvalidAssignmentTarget,
    InvalidSelector,
    MisplacedBranch,
    NoNewVariables,
    InvalidRecursiveType,
    InitializationCycle,
}

impl DiagnosticKind {
    /// Stable error code, as registered in
    /// `gocheck_diagnostics::ErrorCodeRegistry::with_standard_codes`.
    pub fn code(&self) -> &'static str {
        match self {
            DiagnosticKind::AssignmentMismatch => "E0001",
            DiagnosticKind::ReturnTypeMismatch => "E0002",
            DiagnosticKind::MismatchedOperands => "E0003",
            DiagnosticKind::InvalidOperand => "E0004",
            DiagnosticKind::InvalidConversion => "E0005",
            DiagnosticKind::InvalidCompositeLiteral => "E0006",
            DiagnosticKind::NotAValue => "E0007",
            DiagnosticKind::NotIndexable => "E0008",
            DiagnosticKind::InvalidIndex => "E0009",
            DiagnosticKind::NotIterable => "E0010",
            DiagnosticKind::InvalidRecursiveType => "E0011",
            DiagnosticKind::UnknownIdentifier => "E1001",
            DiagnosticKind::UnknownType => "E1002",
            DiagnosticKind::DuplicateBinding => "E1003",
            DiagnosticKind::DuplicateTypeDeclaration => "E1004",
            DiagnosticKind::InvalidSelector => "E1005",
            DiagnosticKind::NoNewVariables => "E1006",
            DiagnosticKind::InitializationCycle => "E1007",
            DiagnosticKind::ArityMismatch => "E2001",
            DiagnosticKind::ArgumentTypeMismatch => "E2002",
            DiagnosticKind::NotCallable => "E2003",
            DiagnosticKind::NonBooleanCondition => "E3001",
            DiagnosticKind::AssignmentCountMismatch => "E3002",
            DiagnosticKind::InvalidAssignmentTarget => "E3003",
            DiagnosticKind::MisplacedBranch => "E3004",
        }
    }
}

/// A recoverable semantic finding.
///
/// Types are rendered to text when the finding is created, so findings stay
/// meaningful after the analysis state that produced them is gone.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SemaError {
    #[error("arguments number mismatch in call to `{callee}`: expected {expected}, found {found}")]
    ArityMismatch {
        callee: String,
        expected: usize,
        found: usize,
        /// Rendered signature of the callee
        signature: String,
        span: Span,
    },

    #[error(
        "arguments type mismatch in call to `{callee}`: argument {} expects `{expected}`, found `{found}`",
        .position + 1
    )]
    ArgumentTypeMismatch {
        callee: String,
        /// 0-based argument position
        position: usize,
        expected: String,
        found: String,
        /// The two types share an underlying type, so a conversion would fix it
        convertible: bool,
        span: Span,
    },

    #[error("unknown identifier `{name}`")]
    UnknownIdentifier {
        name: String,
        span: Span,
        similar: Vec<String>,
    },

    #[error("unknown type `{name}`")]
    UnknownType {
        name: String,
        span: Span,
        similar: Vec<String>,
        /// The name is bound, but to a value rather than a type
        names_value: bool,
    },

    #[error("`{name}` is not callable (type `{found}`)")]
    NotCallable { name: String, found: String, span: Span },

    #[error("`{name}` is already declared in this scope")]
    DuplicateBinding { name: String, span: Span, previous: Span },

    #[error("type `{name}` is already declared in this scope")]
    DuplicateTypeDeclaration { name: String, span: Span, previous: Span },

    #[error("mismatched operands for `{op}`: `{left}` and `{right}`")]
    MismatchedOperands {
        op: String,
        left: String,
        right: String,
        span: Span,
    },

    #[error("operator `{op}` is not defined on `{operand}`")]
    InvalidOperand { op: String, operand: String, span: Span },

    #[error("cannot use `{found}` as `{expected}` in {context}")]
    AssignmentMismatch {
        expected: String,
        found: String,
        context: String,
        span: Span,
    },

    #[error("assignment mismatch: {targets} name(s) but {values} value(s)")]
    AssignmentCountMismatch { targets: usize, values: usize, span: Span },

    #[error("cannot return `{found}` from a function returning `{expected}`")]
    ReturnTypeMismatch { expected: String, found: String, span: Span },

    #[error("non-boolean condition of type `{found}`")]
    NonBooleanCondition { found: String, span: Span },

    #[error("cannot index a value of type `{found}`")]
    NotIndexable { found: String, span: Span },

    #[error("invalid index: {reason}")]
    InvalidIndex { reason: String, span: Span },

    #[error("cannot range over a value of type `{found}`")]
    NotIterable { found: String, span: Span },

    #[error("`{name}` is {what}, not a value")]
    NotAValue { name: String, what: String, span: Span },

    #[error("cannot convert `{found}` to `{target}`")]
    InvalidConversion { found: String, target: String, span: Span },

    #[error("invalid composite literal: {reason}")]
    InvalidCompositeLiteral { reason: String, span: Span },

    #[error("cannot assign to {target}")]
    InvalidAssignmentTarget { target: String, span: Span },

    #[error("`{base}.{field}`: `{base}` has type `{found}` and is not a package")]
    InvalidSelector {
        base: String,
        field: String,
        found: String,
        span: Span,
    },

    #[error("`{keyword}` is not inside a loop")]
    MisplacedBranch { keyword: String, span: Span },

    #[error("no new variables on left side of `:=`")]
    NoNewVariables { span: Span },

    /// `type T [2]T`: a value of `T` would have to hold itself
    #[error("invalid recursive type `{name}`")]
    InvalidRecursiveType { name: String, span: Span },

    /// A package-level initializer that depends on its own value
    #[error("initialization cycle: `{name}` refers to itself")]
    InitializationCycle { name: String, span: Span },
}

impl SemaError {
    pub fn kind(&self) -> DiagnosticKind {
        match self {
            SemaError::ArityMismatch { .. } => DiagnosticKind::ArityMismatch,
            SemaError::ArgumentTypeMismatch { .. } => DiagnosticKind::ArgumentTypeMismatch,
            SemaError::UnknownIdentifier { .. } => DiagnosticKind::UnknownIdentifier,
            SemaError::UnknownType { .. } => DiagnosticKind::UnknownType,
            SemaError::NotCallable { .. } => DiagnosticKind::NotCallable,
            SemaError::DuplicateBinding { .. } => DiagnosticKind::DuplicateBinding,
            SemaError::DuplicateTypeDeclaration { .. } => DiagnosticKind::DuplicateTypeDeclaration,
            SemaError::MismatchedOperands { .. } => DiagnosticKind::MismatchedOperands,
            SemaError::InvalidOperand { .. } => DiagnosticKind::InvalidOperand,
            SemaError::AssignmentMismatch { .. } => DiagnosticKind::AssignmentMismatch,
            SemaError::AssignmentCountMismatch { .. } => DiagnosticKind::AssignmentCountMismatch,
            SemaError::ReturnTypeMismatch { .. } => DiagnosticKind::ReturnTypeMismatch,
            SemaError::NonBooleanCondition { .. } => DiagnosticKind::NonBooleanCondition,
            SemaError::NotIndexable { .. } => DiagnosticKind::NotIndexable,
            SemaError::InvalidIndex { .. } => DiagnosticKind::InvalidIndex,
            SemaError::NotIterable { .. } => DiagnosticKind::NotIterable,
            SemaError::NotAValue { .. } => DiagnosticKind::NotAValue,
            SemaError::InvalidConversion { .. } => DiagnosticKind::InvalidConversion,
            SemaError::InvalidCompositeLiteral { .. } => DiagnosticKind::InvalidCompositeLiteral,
            SemaError::InvalidAssignmentTarget { .. } => DiagnosticKind::InvalidAssignmentTarget,
            SemaError::InvalidSelector { .. } => DiagnosticKind::InvalidSelector,
            SemaError::MisplacedBranch { .. } => DiagnosticKind::MisplacedBranch,
            SemaError::NoNewVariables { .. } => DiagnosticKind::NoNewVariables,
            SemaError::InvalidRecursiveType { .. } => DiagnosticKind::InvalidRecursiveType,
            SemaError::InitializationCycle { .. } => DiagnosticKind::InitializationCycle,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            SemaError::ArityMismatch { span, .. }
            | SemaError::ArgumentTypeMismatch { span, .. }
            | SemaError::UnknownIdentifier { span, .. }
            | SemaError::UnknownType { span, .. }
            | SemaError::NotCallable { span, .. }
            | SemaError::DuplicateBinding { span, .. }
            | SemaError::DuplicateTypeDeclaration { span, .. }
            | SemaError::MismatchedOperands { span, .. }
            | SemaError::InvalidOperand { span, .. }
            | SemaError::AssignmentMismatch { span, .. }
            | SemaError::AssignmentCountMismatch { span, .. }
            | SemaError::ReturnTypeMismatch { span, .. }
            | SemaError::NonBooleanCondition { span, .. }
            | SemaError::NotIndexable { span, .. }
            | SemaError::InvalidIndex { span, .. }
            | SemaError::NotIterable { span, .. }
            | SemaError::NotAValue { span, .. }
            | SemaError::InvalidConversion { span, .. }
            | SemaError::InvalidCompositeLiteral { span, .. }
            | SemaError::InvalidAssignmentTarget { span, .. }
            | SemaError::InvalidSelector { span, .. }
            | SemaError::MisplacedBranch { span, .. }
            | SemaError::InvalidRecursiveType { span, .. }
            | SemaError::InitializationCycle { span, .. }
            | SemaError::NoNewVariables { span } => *span,
        }
    }
}

/// `preferred`, unless the tree did not record it.
pub(crate) fn located(preferred: Span, fallback: Span) -> Span {
    if preferred.is_dummy() {
        fallback
    } else {
        preferred
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_positions_display_one_based() {
        let error = SemaError::ArgumentTypeMismatch {
            callee: "sum".into(),
            position: 1,
            expected: "int".into(),
            found: "string".into(),
            convertible: false,
            span: Span::new(3, 6),
        };
        assert_eq!(
            error.to_string(),
            "arguments type mismatch in call to `sum`: argument 2 expects `int`, found `string`"
        );
        assert_eq!(error.kind(), DiagnosticKind::ArgumentTypeMismatch);
        assert_eq!(error.span(), Span::new(3, 6));
    }

    #[test]
    fn test_codes_are_unique() {
        let kinds = [
            DiagnosticKind::ArityMismatch,
            DiagnosticKind::ArgumentTypeMismatch,
            DiagnosticKind::UnknownIdentifier,
            DiagnosticKind::UnknownType,
            DiagnosticKind::NotCallable,
            DiagnosticKind::DuplicateBinding,
            DiagnosticKind::DuplicateTypeDeclaration,
            DiagnosticKind::MismatchedOperands,
            DiagnosticKind::InvalidOperand,
            DiagnosticKind::AssignmentMismatch,
            DiagnosticKind::AssignmentCountMismatch,
            DiagnosticKind::ReturnTypeMismatch,
            DiagnosticKind::NonBooleanCondition,
            DiagnosticKind::NotIndexable,
            DiagnosticKind::InvalidIndex,
            DiagnosticKind::NotIterable,
            DiagnosticKind::NotAValue,
            DiagnosticKind::InvalidConversion,
            DiagnosticKind::InvalidCompositeLiteral,
            DiagnosticKind::InvalidAssignmentTarget,
            DiagnosticKind::InvalidSelector,
            DiagnosticKind::MisplacedBranch,
            DiagnosticKind::NoNewVariables,
            DiagnosticKind::InvalidRecursiveType,
            DiagnosticKind::InitializationCycle,
        ];
        let mut codes: Vec<&str> = kinds.iter().map(DiagnosticKind::code).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), kinds.len());
    }

    #[test]
    fn test_located_falls_back_on_dummy_spans() {
        assert_eq!(located(Span::dummy(), Span::new(4, 9)), Span::new(4, 9));
        assert_eq!(located(Span::new(5, 6), Span::new(4, 9)), Span::new(5, 6));
    }
}

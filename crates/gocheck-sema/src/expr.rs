//! Expression Typer.
//!
//! Computes the type of every expression bottom-up and records findings in
//! the collector as it goes. A sub-expression that fails to type yields
//! [`Type::Error`], which every later check accepts, so one mistake is
//! reported once.

use crate::collector::DiagnosticCollector;
use crate::config::AnalyzerConfig;
use crate::error::{located, SemaError, SemaResult};
use crate::scope::{ScopeStack, Symbol, SymbolKind};
use crate::signature::{Signature, SignatureRegistry};
use crate::types::{PrimitiveKind, Type, TypeTable, UntypedKind};
use gocheck_ast::{BinaryOp, Block, Expr, ExprKind, Ident, Param, Span, TypeExpr, UnaryOp};

/// Body of a function literal, checked once the enclosing expression is typed.
#[derive(Debug)]
pub struct DeferredBody<'ast> {
    pub params: &'ast [Param],
    pub body: &'ast Block,
    pub signature: Signature,
}

pub struct ExprTyper<'s, 'ast> {
    pub(crate) scopes: &'s ScopeStack,
    pub(crate) types: &'s TypeTable,
    pub(crate) signatures: &'s SignatureRegistry,
    pub(crate) config: &'s AnalyzerConfig,
    pub(crate) findings: &'s mut DiagnosticCollector,
    deferred: Vec<DeferredBody<'ast>>,
}

impl<'s, 'ast> ExprTyper<'s, 'ast> {
    pub fn new(
        scopes: &'s ScopeStack,
        types: &'s TypeTable,
        signatures: &'s SignatureRegistry,
        config: &'s AnalyzerConfig,
        findings: &'s mut DiagnosticCollector,
    ) -> Self {
        Self {
            scopes,
            types,
            signatures,
            config,
            findings,
            deferred: Vec::new(),
        }
    }

    /// Function literal bodies met while typing, in source order.
    pub fn into_deferred(self) -> Vec<DeferredBody<'ast>> {
        self.deferred
    }

    pub(crate) fn widening(&self) -> bool {
        self.config.numeric_literal_widening
    }

    pub(crate) fn report(&mut self, error: SemaError) {
        let error = with_suggestions(self.scopes, self.config, error);
        self.findings.record(error);
    }

    // ========================================================================
    // Entry points
    // ========================================================================

    /// Type of `expr`; calls to functions without a result yield `Type::Unit`.
    pub fn type_of(&mut self, expr: &'ast Expr) -> SemaResult<Type> {
        match &expr.kind {
            ExprKind::Integer(_) => Ok(Type::Untyped(UntypedKind::Int)),
            ExprKind::Float(_) => Ok(Type::Untyped(UntypedKind::Float)),
            ExprKind::String(_) => Ok(Type::Untyped(UntypedKind::String)),
            ExprKind::Rune(_) => Ok(Type::Untyped(UntypedKind::Rune)),
            ExprKind::Ident(name) => Ok(self.identifier(&Ident::new(name.clone(), expr.span))),
            ExprKind::Paren(inner) => self.type_of(inner),
            ExprKind::Unary { op, operand } => self.unary(*op, operand, expr.span),
            ExprKind::Binary { op, left, right } => {
                let left_ty = self.value_of(left)?;
                let right_ty = self.value_of(right)?;
                self.binary(*op, &left_ty, &right_ty, expr.span)
            }
            ExprKind::Call { callee, args } => self.call(callee, args, expr.span),
            ExprKind::Index { base, index } => Ok(self.index(base, index, expr.span)?.1),
            ExprKind::Selector { base, field } => self.selector(base, field, expr.span),
            ExprKind::FuncLit { params, result, body } => {
                let signature = self.signature_of(params, result.as_ref())?;
                self.deferred.push(DeferredBody {
                    params,
                    body,
                    signature: signature.clone(),
                });
                Ok(Type::Function(signature))
            }
            ExprKind::CompositeLit { ty: Some(ty), elements } => self.composite(ty, elements, expr.span),
            ExprKind::CompositeLit { ty: None, elements } => {
                self.report(SemaError::InvalidCompositeLiteral {
                    reason: "missing type for composite literal".to_string(),
                    span: expr.span,
                });
                for element in elements {
                    self.value_of(element)?;
                }
                Ok(Type::Error)
            }
        }
    }

    /// Type of `expr` used as an operand: an expression without a value is
    /// reported and yields `Type::Error`.
    pub fn value_of(&mut self, expr: &'ast Expr) -> SemaResult<Type> {
        let ty = self.type_of(expr)?;
        if ty == Type::Unit {
            self.report(SemaError::NotAValue {
                name: describe_expr(expr),
                what: "a call without a result".to_string(),
                span: expr.span,
            });
            return Ok(Type::Error);
        }
        Ok(ty)
    }

    fn identifier(&mut self, name: &Ident) -> Type {
        let outcome = match self.scopes.lookup(name) {
            Ok(symbol) if symbol.is_value() => Ok(symbol.ty.clone()),
            Ok(symbol) => Err(SemaError::NotAValue {
                name: name.node.to_string(),
                what: symbol.kind.describe().to_string(),
                span: name.span,
            }),
            Err(error) => Err(error),
        };
        outcome.unwrap_or_else(|error| {
            self.report(error);
            Type::Error
        })
    }

    // ========================================================================
    // Operators
    // ========================================================================

    fn unary(&mut self, op: UnaryOp, operand: &'ast Expr, span: Span) -> SemaResult<Type> {
        let ty = self.value_of(operand)?;
        if ty.is_error() {
            return Ok(Type::Error);
        }
        let underlying = self.types.underlying(&ty)?;
        let valid = match op {
            UnaryOp::Neg | UnaryOp::Pos => underlying.is_numeric(),
            UnaryOp::Not => underlying.is_boolean(),
        };
        if !valid {
            self.report(SemaError::InvalidOperand {
                op: op.symbol().to_string(),
                operand: self.types.describe(&ty),
                span,
            });
            return Ok(Type::Error);
        }
        Ok(ty)
    }

    /// Result type of `left op right` given the operand types.
    pub fn binary(&mut self, op: BinaryOp, left: &Type, right: &Type, span: Span) -> SemaResult<Type> {
        if left.is_error() || right.is_error() {
            return Ok(if op.is_comparison() {
                Type::Untyped(UntypedKind::Bool)
            } else {
                Type::Error
            });
        }
        if op.is_shift() {
            return self.shift(op, left, right, span);
        }
        let common = match self.common_type(left, right)? {
            Some(common) => common,
            None => {
                let (left_text, right_text) = self.types.describe_pair(left, right);
                self.report(SemaError::MismatchedOperands {
                    op: op.symbol().to_string(),
                    left: left_text,
                    right: right_text,
                    span,
                });
                return Ok(Type::Error);
            }
        };
        let underlying = self.types.underlying(&common)?;
        let valid = match op {
            BinaryOp::And | BinaryOp::Or => underlying.is_boolean(),
            BinaryOp::Eq | BinaryOp::NotEq => underlying.is_comparable(),
            BinaryOp::Lt | BinaryOp::LtEq | BinaryOp::Gt | BinaryOp::GtEq => underlying.is_ordered(),
            BinaryOp::Add => underlying.is_numeric() || underlying.is_string(),
            BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div => underlying.is_numeric(),
            BinaryOp::Rem | BinaryOp::BitAnd | BinaryOp::BitOr | BinaryOp::BitXor => underlying.is_integer(),
            BinaryOp::Shl | BinaryOp::Shr => underlying.is_integer(),
        };
        if !valid {
            self.report(SemaError::InvalidOperand {
                op: op.symbol().to_string(),
                operand: self.types.describe(&common),
                span,
            });
            return Ok(if op.is_comparison() {
                Type::Untyped(UntypedKind::Bool)
            } else {
                Type::Error
            });
        }
        Ok(if op.is_comparison() {
            Type::Untyped(UntypedKind::Bool)
        } else {
            common
        })
    }

    /// Type both operands of a binary operator convert to, if any. An untyped
    /// constant takes the type of the other operand.
    fn common_type(&self, left: &Type, right: &Type) -> SemaResult<Option<Type>> {
        let widening = self.widening();
        Ok(match (left, right) {
            (Type::Untyped(l), Type::Untyped(r)) => {
                if l.is_numeric() && r.is_numeric() {
                    Some(Type::Untyped(l.max_rank(*r)))
                } else if l == r {
                    Some(left.clone())
                } else {
                    None
                }
            }
            (Type::Untyped(_), _) => self.types.is_assignable(left, right, widening)?.then(|| right.clone()),
            (_, Type::Untyped(_)) => self.types.is_assignable(right, left, widening)?.then(|| left.clone()),
            _ => self.types.identical(left, right)?.then(|| left.clone()),
        })
    }

    fn shift(&mut self, op: BinaryOp, left: &Type, right: &Type, span: Span) -> SemaResult<Type> {
        let count = self.types.underlying(right)?;
        if !count.is_integer() {
            self.report(SemaError::InvalidOperand {
                op: op.symbol().to_string(),
                operand: self.types.describe(right),
                span,
            });
            return Ok(Type::Error);
        }
        let value = self.types.underlying(left)?;
        if !value.is_integer() {
            self.report(SemaError::InvalidOperand {
                op: op.symbol().to_string(),
                operand: self.types.describe(left),
                span,
            });
            return Ok(Type::Error);
        }
        Ok(left.clone())
    }

    // ========================================================================
    // Indexing and selectors
    // ========================================================================

    /// Types `base[index]`, returning the base type and the element type.
    pub(crate) fn index(&mut self, base: &'ast Expr, index: &'ast Expr, span: Span) -> SemaResult<(Type, Type)> {
        let base_ty = self.value_of(base)?;
        let index_ty = self.value_of(index)?;
        if base_ty.is_error() {
            return Ok((Type::Error, Type::Error));
        }
        let (element, bound) = match self.types.underlying(&base_ty)? {
            Type::FixedArray { element, len } => (*element, Some(len)),
            Type::Sequence(element) => (*element, None),
            underlying if underlying.is_string() => (Type::Primitive(PrimitiveKind::Uint8), None),
            _ => {
                self.report(SemaError::NotIndexable {
                    found: self.types.describe(&base_ty),
                    span: base.span,
                });
                return Ok((base_ty, Type::Error));
            }
        };

        if !index_ty.is_error() && !self.types.underlying(&index_ty)?.is_integer() {
            self.report(SemaError::InvalidIndex {
                reason: format!("index must be an integer, found `{}`", self.types.describe(&index_ty)),
                span: located(index.span, span),
            });
        } else if let Some(value) = constant_index(index) {
            let reason = if value < 0 {
                Some(format!("index {} must not be negative", value))
            } else {
                match bound {
                    Some(len) if value >= i128::from(len) => {
                        Some(format!("index {} out of bounds for array of length {}", value, len))
                    }
                    _ => None,
                }
            };
            if let Some(reason) = reason {
                self.report(SemaError::InvalidIndex {
                    reason,
                    span: located(index.span, span),
                });
            }
        }
        Ok((base_ty, element))
    }

    /// `pkg.Member` types as `Type::Error`: package contents are not known.
    fn selector(&mut self, base: &'ast Expr, field: &Ident, span: Span) -> SemaResult<Type> {
        if self.is_package(base) {
            return Ok(Type::Error);
        }
        let base_ty = self.value_of(base)?;
        if !base_ty.is_error() {
            self.report(SemaError::InvalidSelector {
                base: describe_expr(base),
                field: field.node.to_string(),
                found: self.types.describe(&base_ty),
                span,
            });
        }
        Ok(Type::Error)
    }

    pub(crate) fn is_package(&self, expr: &Expr) -> bool {
        match &strip_parens(expr).kind {
            ExprKind::Ident(name) => self
                .scopes
                .find(name)
                .map(|symbol| symbol.kind == SymbolKind::Package)
                .unwrap_or(false),
            _ => false,
        }
    }

    // ========================================================================
    // Composite literals
    // ========================================================================

    fn composite(&mut self, ty: &'ast TypeExpr, elements: &'ast [Expr], span: Span) -> SemaResult<Type> {
        let literal_ty = match ty {
            TypeExpr::Array { element, len: None, .. } => {
                let element = self.resolve_type_expr(element)?;
                if element.is_error() {
                    Type::Error
                } else {
                    Type::fixed_array(element, elements.len() as u64)
                }
            }
            other => self.resolve_type_expr(other)?,
        };
        self.composite_of(&literal_ty, elements, span)
    }

    /// Checks `elements` against the literal type `ty`. Elided inner literals
    /// take the element type.
    pub(crate) fn composite_of(&mut self, ty: &Type, elements: &'ast [Expr], span: Span) -> SemaResult<Type> {
        if ty.is_error() {
            for element in elements {
                self.check_element(&Type::Error, element)?;
            }
            return Ok(Type::Error);
        }
        let element_ty = match self.types.underlying(ty)? {
            Type::FixedArray { element, len } => {
                if elements.len() as u64 > len {
                    self.report(SemaError::InvalidCompositeLiteral {
                        reason: format!("{} elements exceed array length {}", elements.len(), len),
                        span,
                    });
                }
                *element
            }
            Type::Sequence(element) => *element,
            _ => {
                self.report(SemaError::InvalidCompositeLiteral {
                    reason: format!("cannot build a literal of type `{}`", self.types.describe(ty)),
                    span,
                });
                Type::Error
            }
        };
        for element in elements {
            self.check_element(&element_ty, element)?;
        }
        Ok(ty.clone())
    }

    fn check_element(&mut self, element_ty: &Type, element: &'ast Expr) -> SemaResult<()> {
        if let ExprKind::CompositeLit { ty: None, elements } = &element.kind {
            self.composite_of(element_ty, elements, element.span)?;
            return Ok(());
        }
        let value = self.value_of(element)?;
        let mismatch = self.types.assignment_error(
            &value,
            element_ty,
            self.widening(),
            "array or slice literal",
            element.span,
        )?;
        if let Some(error) = mismatch {
            self.report(error);
        }
        Ok(())
    }

    // ========================================================================
    // Type expressions
    // ========================================================================

    /// Resolves a written type. Unknown names are reported and yield `Type::Error`.
    pub fn resolve_type_expr(&mut self, ty: &TypeExpr) -> SemaResult<Type> {
        Ok(match ty {
            TypeExpr::Named(name) => self.type_name(name),
            TypeExpr::Array { element, len: Some(len), .. } => {
                let element = self.resolve_type_expr(element)?;
                if element.is_error() {
                    Type::Error
                } else {
                    Type::fixed_array(element, *len)
                }
            }
            TypeExpr::Array { len: None, span, .. } => {
                self.report(SemaError::InvalidCompositeLiteral {
                    reason: "`[...]` array length is only allowed in a composite literal".to_string(),
                    span: *span,
                });
                Type::Error
            }
            TypeExpr::Slice { element, .. } => {
                let element = self.resolve_type_expr(element)?;
                if element.is_error() {
                    Type::Error
                } else {
                    Type::sequence(element)
                }
            }
            TypeExpr::Function { params, result, .. } => {
                let mut resolved = Vec::with_capacity(params.len());
                for param in params {
                    resolved.push(self.resolve_type_expr(param)?);
                }
                let result = match result {
                    Some(result) => self.resolve_type_expr(result)?,
                    None => Type::Unit,
                };
                Type::Function(Signature::new(resolved, result))
            }
        })
    }

    fn type_name(&mut self, name: &Ident) -> Type {
        let names_value = match self.scopes.find(&name.node) {
            Some(symbol) if symbol.is_type() => return symbol.ty.clone(),
            found => found.is_some(),
        };
        let similar = if self.config.suggest_similar_names {
            self.scopes
                .similar_names(&name.node, self.config.max_suggestions, Symbol::is_type)
        } else {
            Vec::new()
        };
        self.report(SemaError::UnknownType {
            name: name.node.to_string(),
            span: name.span,
            similar,
            names_value,
        });
        Type::Error
    }

    pub fn signature_of(&mut self, params: &[Param], result: Option<&TypeExpr>) -> SemaResult<Signature> {
        let mut types = Vec::with_capacity(params.len());
        for param in params {
            types.push(self.resolve_type_expr(&param.ty)?);
        }
        let result = match result {
            Some(result) => self.resolve_type_expr(result)?,
            None => Type::Unit,
        };
        Ok(Signature::new(types, result))
    }

    // ========================================================================
    // Assignment targets
    // ========================================================================

    /// Type a value assigned to `target` must have. `_` accepts anything.
    pub fn assignable_target(&mut self, target: &'ast Expr) -> SemaResult<Type> {
        let stripped = strip_parens(target);
        match &stripped.kind {
            ExprKind::Ident(name) if name == "_" => Ok(Type::Error),
            ExprKind::Ident(name) => {
                let outcome = match self.scopes.lookup(&Ident::new(name.clone(), stripped.span)) {
                    Ok(symbol) if symbol.kind == SymbolKind::Var => Ok(symbol.ty.clone()),
                    Ok(symbol) => Err(SemaError::InvalidAssignmentTarget {
                        target: format!("{} `{}`", symbol.kind.describe(), name),
                        span: stripped.span,
                    }),
                    Err(error) => Err(error),
                };
                Ok(outcome.unwrap_or_else(|error| {
                    self.report(error);
                    Type::Error
                }))
            }
            ExprKind::Index { base, index } => {
                let (base_ty, element) = self.index(base, index, stripped.span)?;
                if !base_ty.is_error() && self.types.underlying(&base_ty)?.is_string() {
                    self.report(SemaError::InvalidAssignmentTarget {
                        target: format!("`{}` (strings are immutable)", describe_expr(stripped)),
                        span: stripped.span,
                    });
                    return Ok(Type::Error);
                }
                Ok(element)
            }
            ExprKind::Selector { base, field } => self.selector(base, field, stripped.span),
            _ => {
                self.report(SemaError::InvalidAssignmentTarget {
                    target: format!("`{}`", describe_expr(stripped)),
                    span: stripped.span,
                });
                Ok(Type::Error)
            }
        }
    }
}

/// Attaches "did you mean" candidates to unknown identifiers.
pub(crate) fn with_suggestions(scopes: &ScopeStack, config: &AnalyzerConfig, error: SemaError) -> SemaError {
    match error {
        SemaError::UnknownIdentifier { name, span, similar } if similar.is_empty() && config.suggest_similar_names => {
            let similar = scopes.similar_names(&name, config.max_suggestions, Symbol::is_value);
            SemaError::UnknownIdentifier { name, span, similar }
        }
        other => other,
    }
}

pub(crate) fn strip_parens(expr: &Expr) -> &Expr {
    match &expr.kind {
        ExprKind::Paren(inner) => strip_parens(inner),
        _ => expr,
    }
}

/// Value of an integer literal index, possibly negated.
fn constant_index(expr: &Expr) -> Option<i128> {
    match &strip_parens(expr).kind {
        ExprKind::Integer(text) => text.replace('_', "").parse().ok(),
        ExprKind::Unary { op: UnaryOp::Neg, operand } => constant_index(operand).map(|value| -value),
        ExprKind::Unary { op: UnaryOp::Pos, operand } => constant_index(operand),
        _ => None,
    }
}

/// Short source-like rendering of an expression for messages.
pub(crate) fn describe_expr(expr: &Expr) -> String {
    match &expr.kind {
        ExprKind::Integer(text) | ExprKind::Float(text) => text.to_string(),
        ExprKind::String(text) => format!("{:?}", text.as_str()),
        ExprKind::Rune(c) => format!("{:?}", c),
        ExprKind::Ident(name) => name.to_string(),
        ExprKind::Paren(inner) => format!("({})", describe_expr(inner)),
        ExprKind::Unary { op, operand } => format!("{}{}", op, describe_expr(operand)),
        ExprKind::Binary { op, left, right } => {
            format!("{} {} {}", describe_expr(left), op, describe_expr(right))
        }
        ExprKind::Call { callee, .. } => format!("{}(...)", describe_expr(callee)),
        ExprKind::Index { base, .. } => format!("{}[...]", describe_expr(base)),
        ExprKind::Selector { base, field } => format!("{}.{}", describe_expr(base), field.node),
        ExprKind::FuncLit { .. } => "func literal".to_string(),
        ExprKind::CompositeLit { .. } => "composite literal".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DiagnosticKind;
    use crate::scope::FrameKind;
    use crate::universe;
    use gocheck_ast::build::*;
    use gocheck_ast::TypeDeclKind;
    use pretty_assertions::assert_eq;

    struct Fixture {
        scopes: ScopeStack,
        types: TypeTable,
        signatures: SignatureRegistry,
        config: AnalyzerConfig,
        findings: DiagnosticCollector,
    }

    impl Fixture {
        fn new() -> Self {
            let mut scopes = ScopeStack::new();
            let mut types = TypeTable::default();
            universe::install(&mut scopes, &mut types);
            scopes.push(FrameKind::Package);
            Self {
                scopes,
                types,
                signatures: SignatureRegistry::new(),
                config: AnalyzerConfig::default(),
                findings: DiagnosticCollector::new(),
            }
        }

        fn var(&mut self, name: &str, ty: Type) {
            self.scopes.bind(&ident(name), SymbolKind::Var, ty).unwrap();
        }

        fn type_of(&mut self, expr: &Expr) -> Type {
            let mut typer = ExprTyper::new(
                &self.scopes,
                &self.types,
                &self.signatures,
                &self.config,
                &mut self.findings,
            );
            typer.type_of(expr).unwrap()
        }

        fn kinds(&self) -> Vec<DiagnosticKind> {
            self.findings.all().iter().map(SemaError::kind).collect()
        }
    }

    fn int_ty() -> Type {
        Type::Primitive(PrimitiveKind::Int)
    }

    #[test]
    fn test_literals_are_untyped() {
        let mut fx = Fixture::new();
        assert_eq!(fx.type_of(&int(4)), Type::Untyped(UntypedKind::Int));
        assert_eq!(fx.type_of(&float("4.0")), Type::Untyped(UntypedKind::Float));
        assert_eq!(fx.type_of(&rune('a')), Type::Untyped(UntypedKind::Rune));
        assert_eq!(fx.type_of(&name("true")), Type::Untyped(UntypedKind::Bool));
        assert!(fx.findings.is_empty());
    }

    #[test]
    fn test_constant_arithmetic_stays_untyped() {
        let mut fx = Fixture::new();
        let sum = binary(BinaryOp::Add, float("4.5"), float("1.4"));
        assert_eq!(fx.type_of(&sum), Type::Untyped(UntypedKind::Float));
        let mixed = binary(BinaryOp::Mul, int(2), rune('a'));
        assert_eq!(fx.type_of(&mixed), Type::Untyped(UntypedKind::Rune));
    }

    #[test]
    fn test_untyped_operand_takes_other_side() {
        let mut fx = Fixture::new();
        fx.var("a", int_ty());
        assert_eq!(fx.type_of(&binary(BinaryOp::Mul, int(20), name("a"))), int_ty());
        assert_eq!(
            fx.type_of(&binary(BinaryOp::Lt, int(4), name("a"))),
            Type::Untyped(UntypedKind::Bool)
        );
        assert!(fx.findings.is_empty());
    }

    #[test]
    fn test_mismatched_operands() {
        let mut fx = Fixture::new();
        fx.var("a", int_ty());
        fx.var("s", Type::Primitive(PrimitiveKind::String));
        assert_eq!(fx.type_of(&binary(BinaryOp::Add, name("a"), name("s"))), Type::Error);
        assert_eq!(fx.kinds(), vec![DiagnosticKind::MismatchedOperands]);
    }

    #[test]
    fn test_invalid_operands() {
        let mut fx = Fixture::new();
        fx.var("flag", Type::Primitive(PrimitiveKind::Bool));
        fx.var("s", Type::Primitive(PrimitiveKind::String));
        fx.type_of(&unary(UnaryOp::Neg, name("flag")));
        fx.type_of(&binary(BinaryOp::Sub, name("s"), string("x")));
        fx.type_of(&binary(BinaryOp::Rem, float("1.5"), float("2.0")));
        assert_eq!(
            fx.kinds(),
            vec![
                DiagnosticKind::InvalidOperand,
                DiagnosticKind::InvalidOperand,
                DiagnosticKind::InvalidOperand,
            ]
        );
        assert_eq!(
            fx.type_of(&binary(BinaryOp::Add, name("s"), string("x"))),
            Type::Primitive(PrimitiveKind::String)
        );
    }

    #[test]
    fn test_errors_do_not_cascade() {
        let mut fx = Fixture::new();
        let expr = binary(
            BinaryOp::And,
            binary(BinaryOp::Add, name("missing"), int(1)),
            binary(BinaryOp::Lt, name("missing"), int(3)),
        );
        fx.type_of(&expr);
        assert_eq!(
            fx.kinds(),
            vec![
                DiagnosticKind::UnknownIdentifier,
                DiagnosticKind::UnknownIdentifier,
            ]
        );
    }

    #[test]
    fn test_index_checks() {
        let mut fx = Fixture::new();
        fx.var("A", Type::fixed_array(int_ty(), 4));
        fx.var("xs", Type::sequence(Type::Primitive(PrimitiveKind::String)));
        fx.var("n", int_ty());

        assert_eq!(fx.type_of(&index(name("A"), int(1))), int_ty());
        assert_eq!(
            fx.type_of(&index(name("xs"), name("n"))),
            Type::Primitive(PrimitiveKind::String)
        );
        assert!(fx.findings.is_empty());

        fx.type_of(&index(name("A"), int(4)));
        fx.type_of(&index(name("A"), unary(UnaryOp::Neg, int(1))));
        fx.type_of(&index(name("xs"), string("0")));
        fx.type_of(&index(name("n"), int(0)));
        assert_eq!(
            fx.kinds(),
            vec![
                DiagnosticKind::InvalidIndex,
                DiagnosticKind::InvalidIndex,
                DiagnosticKind::InvalidIndex,
                DiagnosticKind::NotIndexable,
            ]
        );
    }

    #[test]
    fn test_composite_literals() {
        let mut fx = Fixture::new();
        let literal = composite(array_ty(4, ty("int")), vec![int(4), int(5)]);
        assert_eq!(fx.type_of(&literal), Type::fixed_array(int_ty(), 4));

        let inferred = composite(array_ty_inferred(ty("string")), vec![string("a"), string("b")]);
        assert_eq!(
            fx.type_of(&inferred),
            Type::fixed_array(Type::Primitive(PrimitiveKind::String), 2)
        );

        let nested = composite(slice_ty(slice_ty(ty("int"))), vec![elided(vec![int(1), int(2)])]);
        assert_eq!(fx.type_of(&nested), Type::sequence(Type::sequence(int_ty())));
        assert!(fx.findings.is_empty());

        fx.type_of(&composite(array_ty(1, ty("int")), vec![int(1), int(2)]));
        fx.type_of(&composite(slice_ty(ty("int")), vec![string("x")]));
        assert_eq!(
            fx.kinds(),
            vec![
                DiagnosticKind::InvalidCompositeLiteral,
                DiagnosticKind::AssignmentMismatch,
            ]
        );
    }

    #[test]
    fn test_unknown_type_names_value() {
        let mut fx = Fixture::new();
        fx.var("return_int", Type::Function(Signature::new(vec![], int_ty())));
        let mut typer = ExprTyper::new(&fx.scopes, &fx.types, &fx.signatures, &fx.config, &mut fx.findings);
        assert_eq!(typer.resolve_type_expr(&ty("return_int")).unwrap(), Type::Error);
        assert_eq!(typer.resolve_type_expr(&ty("t_unsure")).unwrap(), Type::Error);

        let findings = fx.findings.all();
        assert!(matches!(&findings[0], SemaError::UnknownType { names_value: true, .. }));
        assert!(matches!(&findings[1], SemaError::UnknownType { names_value: false, .. }));
    }

    #[test]
    fn test_type_is_not_a_value() {
        let mut fx = Fixture::new();
        fx.types
            .declare(&mut fx.scopes, &ident("boolean"), TypeDeclKind::Named, Type::Primitive(PrimitiveKind::Bool))
            .unwrap();
        assert_eq!(fx.type_of(&name("boolean")), Type::Error);
        assert_eq!(fx.kinds(), vec![DiagnosticKind::NotAValue]);
    }

    #[test]
    fn test_func_literal_body_is_deferred() {
        let mut fx = Fixture::new();
        let literal = func_lit(
            vec![param("g", ty("int")), param("h", ty("bool"))],
            Some(ty("int")),
            vec![ret(Some(int(4)))],
        );
        let mut typer = ExprTyper::new(&fx.scopes, &fx.types, &fx.signatures, &fx.config, &mut fx.findings);
        let ty = typer.type_of(&literal).unwrap();
        assert_eq!(ty.to_string(), "func(int, bool) int");
        let deferred = typer.into_deferred();
        assert_eq!(deferred.len(), 1);
        assert_eq!(deferred[0].params.len(), 2);
    }

    #[test]
    fn test_assignment_targets() {
        let mut fx = Fixture::new();
        fx.var("s", Type::Primitive(PrimitiveKind::String));
        fx.scopes
            .bind(&ident("size"), SymbolKind::Const, Type::Untyped(UntypedKind::Int))
            .unwrap();
        let blank = name("_");
        let constant = name("size");
        let element = index(name("s"), int(0));
        let call_target = call("len", vec![name("s")]);
        let mut typer = ExprTyper::new(&fx.scopes, &fx.types, &fx.signatures, &fx.config, &mut fx.findings);
        assert_eq!(typer.assignable_target(&blank).unwrap(), Type::Error);
        typer.assignable_target(&constant).unwrap();
        typer.assignable_target(&element).unwrap();
        typer.assignable_target(&call_target).unwrap();
        assert_eq!(
            fx.kinds(),
            vec![
                DiagnosticKind::InvalidAssignmentTarget,
                DiagnosticKind::InvalidAssignmentTarget,
                DiagnosticKind::InvalidAssignmentTarget,
            ]
        );
    }

    #[test]
    fn test_describe_expr() {
        let expr = call_expr(
            selector("fmt", "Println"),
            vec![binary(BinaryOp::Add, name("a"), int(1))],
        );
        assert_eq!(describe_expr(&expr), "fmt.Println(...)");
        assert_eq!(describe_expr(&binary(BinaryOp::Add, name("a"), int(1))), "a + 1");
        assert_eq!(describe_expr(&string("str")), "\"str\"");
    }
}

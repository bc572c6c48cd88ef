//! Call Validator.
//!
//! A call is checked in two steps. Arity comes first: when the argument count
//! differs from the parameter count, that is the only finding for the call.
//! Otherwise each argument is checked against its parameter, and every
//! mismatching position is reported.

use crate::config::AnalyzerConfig;
use crate::error::{located, SemaError, SemaResult};
use crate::expr::{describe_expr, strip_parens, ExprTyper};
use crate::signature::{callable_type, Callable, Signature};
use crate::types::{PrimitiveKind, Type, TypeTable};
use crate::universe::Builtin;
use gocheck_ast::{Expr, ExprKind, Ident, Span};
use tracing::trace;

/// A typed call site: argument types are known, the callee is not yet matched.
#[derive(Debug, Clone)]
pub struct CallSite<'a> {
    pub callee: &'a str,
    pub arguments: Vec<(Type, Span)>,
    pub span: Span,
}

pub struct CallValidator<'t> {
    types: &'t TypeTable,
    config: &'t AnalyzerConfig,
}

impl<'t> CallValidator<'t> {
    pub fn new(types: &'t TypeTable, config: &'t AnalyzerConfig) -> Self {
        Self { types, config }
    }

    /// Findings for calling `signature` at `site`, in argument order.
    pub fn validate(&self, site: &CallSite<'_>, signature: &Signature) -> SemaResult<Vec<SemaError>> {
        trace!(callee = site.callee, found = site.arguments.len(), expected = signature.arity(), "validate call");
        if site.arguments.len() != signature.arity() {
            return Ok(vec![SemaError::ArityMismatch {
                callee: site.callee.to_string(),
                expected: signature.arity(),
                found: site.arguments.len(),
                signature: signature.to_string(),
                span: site.span,
            }]);
        }

        let mut findings = Vec::new();
        for (position, ((argument, span), param)) in site.arguments.iter().zip(&signature.params).enumerate() {
            if self
                .types
                .is_assignable(argument, param, self.config.numeric_literal_widening)?
            {
                continue;
            }
            let (expected, found) = self.types.describe_pair(param, argument);
            let convertible = !matches!(argument, Type::Untyped(_)) && self.types.same_underlying(argument, param)?;
            findings.push(SemaError::ArgumentTypeMismatch {
                callee: site.callee.to_string(),
                position,
                expected,
                found,
                convertible,
                span: located(*span, site.span),
            });
        }
        Ok(findings)
    }
}

impl<'s, 'ast> ExprTyper<'s, 'ast> {
    /// Types a call expression and validates it against its callee.
    pub(crate) fn call(&mut self, callee: &'ast Expr, args: &'ast [Expr], span: Span) -> SemaResult<Type> {
        let callee = strip_parens(callee);
        let name = describe_expr(callee);
        let resolved = match &callee.kind {
            ExprKind::Ident(id) => {
                self.signatures
                    .lookup_callable(self.scopes, self.types, &Ident::new(id.clone(), callee.span))?
            }
            ExprKind::Selector { base, .. } if self.is_package(base) => Ok(Callable::External),
            _ => {
                let ty = self.value_of(callee)?;
                callable_type(self.types, &ty, &name, callee.span)?
            }
        };

        match resolved {
            Ok(Callable::Function(signature)) => self.validate_call(&name, &signature, args, span),
            Ok(Callable::Builtin(builtin)) => self.builtin_call(builtin, args, span),
            Ok(Callable::Conversion(target)) => self.conversion(&target, args, span),
            Ok(Callable::External) | Ok(Callable::Invalid) => {
                self.type_arguments(args)?;
                Ok(Type::Error)
            }
            Err(error) => {
                self.report(error);
                self.type_arguments(args)?;
                Ok(Type::Error)
            }
        }
    }

    /// Arguments are typed, and their own findings recorded, before the call
    /// itself is validated.
    fn validate_call(
        &mut self,
        name: &str,
        signature: &Signature,
        args: &'ast [Expr],
        span: Span,
    ) -> SemaResult<Type> {
        let arguments = self.type_arguments(args)?;
        let site = CallSite {
            callee: name,
            arguments,
            span,
        };
        let findings = CallValidator::new(self.types, self.config).validate(&site, signature)?;
        for finding in findings {
            self.report(finding);
        }
        Ok((*signature.result).clone())
    }

    fn type_arguments(&mut self, args: &'ast [Expr]) -> SemaResult<Vec<(Type, Span)>> {
        let mut typed = Vec::with_capacity(args.len());
        for arg in args {
            typed.push((self.value_of(arg)?, arg.span));
        }
        Ok(typed)
    }

    fn builtin_call(&mut self, builtin: Builtin, args: &'ast [Expr], span: Span) -> SemaResult<Type> {
        let arguments = self.type_arguments(args)?;
        let int = Type::Primitive(PrimitiveKind::Int);
        match builtin {
            Builtin::Len | Builtin::Cap => {
                if arguments.len() != 1 {
                    self.report(SemaError::ArityMismatch {
                        callee: builtin.name().to_string(),
                        expected: 1,
                        found: arguments.len(),
                        signature: format!("{}(v) int", builtin),
                        span,
                    });
                    return Ok(int);
                }
                let (argument, arg_span) = &arguments[0];
                if argument.is_error() {
                    return Ok(int);
                }
                let accepted = match self.types.underlying(argument)? {
                    Type::FixedArray { .. } | Type::Sequence(_) => true,
                    underlying => builtin == Builtin::Len && underlying.is_string(),
                };
                if !accepted {
                    self.report(SemaError::ArgumentTypeMismatch {
                        callee: builtin.name().to_string(),
                        position: 0,
                        expected: if builtin == Builtin::Len {
                            "string or array or slice".to_string()
                        } else {
                            "array or slice".to_string()
                        },
                        found: self.types.describe(argument),
                        convertible: false,
                        span: located(*arg_span, span),
                    });
                }
                Ok(int)
            }
            Builtin::Append => {
                let Some((first, first_span)) = arguments.first() else {
                    self.report(SemaError::ArityMismatch {
                        callee: builtin.name().to_string(),
                        expected: 1,
                        found: 0,
                        signature: "append(s []T, elems ...T) []T".to_string(),
                        span,
                    });
                    return Ok(Type::Error);
                };
                if first.is_error() {
                    return Ok(Type::Error);
                }
                let element = match self.types.underlying(first)? {
                    Type::Sequence(element) => *element,
                    _ => {
                        self.report(SemaError::ArgumentTypeMismatch {
                            callee: builtin.name().to_string(),
                            position: 0,
                            expected: "slice".to_string(),
                            found: self.types.describe(first),
                            convertible: false,
                            span: located(*first_span, span),
                        });
                        return Ok(Type::Error);
                    }
                };
                for (position, (argument, arg_span)) in arguments.iter().enumerate().skip(1) {
                    if self.types.is_assignable(argument, &element, self.widening())? {
                        continue;
                    }
                    let (expected, found) = self.types.describe_pair(&element, argument);
                    self.report(SemaError::ArgumentTypeMismatch {
                        callee: builtin.name().to_string(),
                        position,
                        expected,
                        found,
                        convertible: false,
                        span: located(*arg_span, span),
                    });
                }
                Ok(first.clone())
            }
            Builtin::Print | Builtin::Println => Ok(Type::Unit),
        }
    }

    /// `T(x)`: exactly one argument, convertible to `T`.
    fn conversion(&mut self, target: &Type, args: &'ast [Expr], span: Span) -> SemaResult<Type> {
        let arguments = self.type_arguments(args)?;
        if arguments.len() != 1 {
            self.report(SemaError::ArityMismatch {
                callee: target.to_string(),
                expected: 1,
                found: arguments.len(),
                signature: format!("{}(value)", target),
                span,
            });
            return Ok(target.clone());
        }
        let (argument, arg_span) = &arguments[0];
        if !argument.is_error() && !self.types.convertible(argument, target)? {
            self.report(SemaError::InvalidConversion {
                found: self.types.describe(argument),
                target: self.types.describe(target),
                span: located(*arg_span, span),
            });
        }
        Ok(target.clone())
    }
}

//! Signature Registry.
//!
//! Records the declared signature of every package-level function so call
//! sites can be checked against it, including calls that appear before the
//! callee's declaration.

use crate::error::{SemaError, SemaResult};
use crate::scope::{ScopeStack, SymbolKind};
use crate::types::{Type, TypeTable};
use crate::universe::Builtin;
use gocheck_ast::{Ident, SmolStr, Span};
use rustc_hash::FxHashMap;
use std::fmt;

/// Ordered parameter types and a result type (`Type::Unit` for none).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Signature {
    pub params: Vec<Type>,
    pub result: Box<Type>,
}

impl Signature {
    pub fn new(params: Vec<Type>, result: Type) -> Self {
        Self {
            params,
            result: Box::new(result),
        }
    }

    pub fn arity(&self) -> usize {
        self.params.len()
    }

    pub fn returns_value(&self) -> bool {
        !matches!(*self.result, Type::Unit)
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("func(")?;
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", param)?;
        }
        f.write_str(")")?;
        if self.returns_value() {
            write!(f, " {}", self.result)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
struct Registered {
    signature: Signature,
    span: Span,
}

/// What a call's callee turned out to be.
#[derive(Debug, Clone, PartialEq)]
pub enum Callable {
    /// A declared function, or a value of function type
    Function(Signature),
    Builtin(Builtin),
    /// `T(x)` where `T` names a type
    Conversion(Type),
    /// A member of an imported package; its signature is not known
    External,
    /// The callee already failed to type
    Invalid,
}

#[derive(Debug, Default)]
pub struct SignatureRegistry {
    functions: FxHashMap<SmolStr, Registered>,
}

impl SignatureRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `name`'s signature. The first registration wins; a duplicate
    /// function name is reported when it is bound in the package scope.
    pub fn register(&mut self, name: &Ident, signature: Signature) {
        self.functions.entry(name.node.clone()).or_insert(Registered {
            signature,
            span: name.span,
        });
    }

    pub fn get(&self, name: &str) -> Option<&Signature> {
        self.functions.get(name).map(|registered| &registered.signature)
    }

    /// Where `name` was declared.
    pub fn declared(&self, name: &str) -> Option<Span> {
        self.functions.get(name).map(|registered| registered.span)
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    /// Resolves a call's callee name.
    ///
    /// The outer `Result` carries fatal conditions (an alias that never
    /// resolves), the inner one the finding to record when the name cannot be
    /// called.
    pub fn lookup_callable(
        &self,
        scopes: &ScopeStack,
        types: &TypeTable,
        name: &Ident,
    ) -> SemaResult<Result<Callable, SemaError>> {
        let symbol = match scopes.lookup(name) {
            Ok(symbol) => symbol,
            Err(error) => return Ok(Err(error)),
        };
        match symbol.kind {
            SymbolKind::Type => Ok(Ok(Callable::Conversion(symbol.ty.clone()))),
            SymbolKind::Builtin(builtin) => Ok(Ok(Callable::Builtin(builtin))),
            SymbolKind::Package => Ok(Err(SemaError::NotAValue {
                name: name.node.to_string(),
                what: SymbolKind::Package.describe().to_string(),
                span: name.span,
            })),
            SymbolKind::Func => match self.get(&name.node) {
                Some(signature) => Ok(Ok(Callable::Function(signature.clone()))),
                None => callable_type(types, &symbol.ty, &name.node, name.span),
            },
            _ => callable_type(types, &symbol.ty, &name.node, name.span),
        }
    }
}

/// Whether a value of type `ty` can be called, and with what signature.
pub fn callable_type(
    types: &TypeTable,
    ty: &Type,
    name: &str,
    span: Span,
) -> SemaResult<Result<Callable, SemaError>> {
    if ty.is_error() {
        return Ok(Ok(Callable::Invalid));
    }
    match types.underlying(ty)? {
        Type::Function(signature) => Ok(Ok(Callable::Function(signature))),
        Type::Error => Ok(Ok(Callable::Invalid)),
        _ => Ok(Err(SemaError::NotCallable {
            name: name.to_string(),
            found: types.describe(ty),
            span,
        })),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scope::FrameKind;
    use crate::types::PrimitiveKind;
    use gocheck_ast::build::ident;
    use gocheck_ast::TypeDeclKind;
    use pretty_assertions::assert_eq;

    fn prim(kind: PrimitiveKind) -> Type {
        Type::Primitive(kind)
    }

    #[test]
    fn test_signature_display() {
        let sig = Signature::new(
            vec![prim(PrimitiveKind::Int), prim(PrimitiveKind::Float32)],
            prim(PrimitiveKind::Int),
        );
        assert_eq!(sig.to_string(), "func(int, float32) int");
        assert_eq!(sig.arity(), 2);
        assert_eq!(Signature::new(vec![], Type::Unit).to_string(), "func()");
    }

    #[test]
    fn test_first_registration_wins() {
        let mut registry = SignatureRegistry::new();
        registry.register(&ident("sum"), Signature::new(vec![prim(PrimitiveKind::Int)], Type::Unit));
        registry.register(&ident("sum"), Signature::new(vec![], Type::Unit));
        assert_eq!(registry.get("sum").map(Signature::arity), Some(1));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_lookup_callable_kinds() {
        let mut scopes = ScopeStack::new();
        let mut types = TypeTable::default();
        let mut registry = SignatureRegistry::new();
        scopes.push(FrameKind::Package);

        let sig = Signature::new(vec![prim(PrimitiveKind::Int)], prim(PrimitiveKind::Int));
        scopes.bind(&ident("f"), SymbolKind::Func, Type::Function(sig.clone())).unwrap();
        registry.register(&ident("f"), sig.clone());
        types
            .declare(&mut scopes, &ident("celsius"), TypeDeclKind::Named, prim(PrimitiveKind::Float64))
            .unwrap();
        scopes.bind(&ident("n"), SymbolKind::Var, prim(PrimitiveKind::Int)).unwrap();

        assert_eq!(
            registry.lookup_callable(&scopes, &types, &ident("f")).unwrap(),
            Ok(Callable::Function(sig))
        );
        assert!(matches!(
            registry.lookup_callable(&scopes, &types, &ident("celsius")).unwrap(),
            Ok(Callable::Conversion(Type::Named { .. }))
        ));
        assert!(matches!(
            registry.lookup_callable(&scopes, &types, &ident("n")).unwrap(),
            Err(SemaError::NotCallable { .. })
        ));
        assert!(matches!(
            registry.lookup_callable(&scopes, &types, &ident("nope")).unwrap(),
            Err(SemaError::UnknownIdentifier { .. })
        ));
    }

    #[test]
    fn test_function_typed_variable_is_callable() {
        let types = TypeTable::default();
        let sig = Signature::new(vec![prim(PrimitiveKind::Bool)], Type::Unit);
        let callable = callable_type(&types, &Type::Function(sig.clone()), "g", Span::dummy()).unwrap();
        assert_eq!(callable, Ok(Callable::Function(sig)));
        assert_eq!(
            callable_type(&types, &Type::Error, "g", Span::dummy()).unwrap(),
            Ok(Callable::Invalid)
        );
    }
}

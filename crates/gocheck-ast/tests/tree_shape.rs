//! Shape checks for the tree constructors.

use gocheck_ast::build::*;
use gocheck_ast::{BinaryOp, ExprKind, ImportDecl, Item, Span, Spanned, StmtKind, TypeDeclKind, TypeExpr};
use pretty_assertions::assert_eq;

#[test]
fn test_span_merge_and_range() {
    let merged = Span::new(4, 9).merge(Span::new(2, 6));
    assert_eq!(merged, Span::new(2, 9));

    let range: std::ops::Range<usize> = merged.into();
    assert_eq!(range, 2..9);
    assert!(Span::dummy().is_dummy());
}

#[test]
fn test_import_binding_name() {
    let plain = ImportDecl {
        path: "encoding/json".into(),
        alias: None,
        span: Span::dummy(),
    };
    assert_eq!(plain.binding_name(), "json");

    let aliased = ImportDecl {
        path: "fmt".into(),
        alias: Some(Spanned::dummy("f".into())),
        span: Span::dummy(),
    };
    assert_eq!(aliased.binding_name(), "f");
}

#[test]
fn test_type_declarations() {
    let item = alias_type("al_bool0", ty("bool"));
    let Item::Type(decl) = item else {
        panic!("expected a type declaration");
    };
    assert_eq!(decl.kind, TypeDeclKind::Alias);
    assert_eq!(decl.name.node, "al_bool0");
    assert_eq!(decl.ty, TypeExpr::Named(ident("bool")));
}

#[test]
fn test_call_shape() {
    let e = at(call("sum", vec![name("a"), int(4)]), 10, 19);
    assert_eq!(e.span, Span::new(10, 19));
    match e.kind {
        ExprKind::Call { callee, args } => {
            assert_eq!(callee.kind, ExprKind::Ident("sum".into()));
            assert_eq!(args.len(), 2);
            assert_eq!(args[1].kind, ExprKind::Integer("4".into()));
        }
        other => panic!("expected call, got {:?}", other),
    }
}

#[test]
fn test_statement_shapes() {
    let s = compound_assign(name("a"), BinaryOp::Mul, int(2));
    assert!(matches!(s.kind, StmtKind::Assign { op: Some(BinaryOp::Mul), .. }));

    let r = for_range(Some("i"), Some("x"), name("numbers"), vec![]);
    match r.kind {
        StmtKind::ForRange { key, value, .. } => {
            assert_eq!(key.map(|k| k.node), Some("i".into()));
            assert_eq!(value.map(|v| v.node), Some("x".into()));
        }
        other => panic!("expected range loop, got {:?}", other),
    }
}

#[test]
fn test_operator_classes() {
    assert!(BinaryOp::Lt.is_comparison());
    assert!(BinaryOp::Lt.is_ordering());
    assert!(BinaryOp::Eq.is_comparison());
    assert!(!BinaryOp::Eq.is_ordering());
    assert!(BinaryOp::And.is_logical());
    assert!(BinaryOp::Shl.is_shift());
    assert_eq!(BinaryOp::NotEq.to_string(), "!=");
}

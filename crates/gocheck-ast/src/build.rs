//! Terse tree constructors.
//!
//! The analyzer never parses source text, so tests and benchmarks assemble
//! programs from these helpers. Every node gets a dummy span unless it is
//! placed explicitly with [`at`] / [`stmt_at`].

use crate::*;

// ----------------------------------------------------------------------------
// Names and types
// ----------------------------------------------------------------------------

pub fn ident(name: &str) -> Ident {
    Spanned::dummy(name.into())
}

pub fn ty(name: &str) -> TypeExpr {
    TypeExpr::Named(ident(name))
}

pub fn array_ty(len: u64, element: TypeExpr) -> TypeExpr {
    TypeExpr::Array {
        element: Box::new(element),
        len: Some(len),
        span: Span::dummy(),
    }
}

/// `[...]T`, only meaningful as the type of a composite literal
pub fn array_ty_inferred(element: TypeExpr) -> TypeExpr {
    TypeExpr::Array {
        element: Box::new(element),
        len: None,
        span: Span::dummy(),
    }
}

pub fn slice_ty(element: TypeExpr) -> TypeExpr {
    TypeExpr::Slice {
        element: Box::new(element),
        span: Span::dummy(),
    }
}

pub fn func_ty(params: Vec<TypeExpr>, result: Option<TypeExpr>) -> TypeExpr {
    TypeExpr::Function {
        params,
        result: result.map(Box::new),
        span: Span::dummy(),
    }
}

pub fn param(name: &str, ty: TypeExpr) -> Param {
    Param {
        name: Some(ident(name)),
        ty,
        span: Span::dummy(),
    }
}

pub fn unnamed_param(ty: TypeExpr) -> Param {
    Param {
        name: None,
        ty,
        span: Span::dummy(),
    }
}

// ----------------------------------------------------------------------------
// Expressions
// ----------------------------------------------------------------------------

fn expr(kind: ExprKind) -> Expr {
    Expr::new(kind, Span::dummy())
}

/// Re-spans an expression.
pub fn at(mut e: Expr, start: usize, end: usize) -> Expr {
    e.span = Span::new(start, end);
    e
}

pub fn int(value: i64) -> Expr {
    expr(ExprKind::Integer(value.to_string().into()))
}

pub fn float(literal: &str) -> Expr {
    expr(ExprKind::Float(literal.into()))
}

pub fn string(value: &str) -> Expr {
    expr(ExprKind::String(value.into()))
}

pub fn rune(value: char) -> Expr {
    expr(ExprKind::Rune(value))
}

/// Identifier reference.
pub fn name(name: &str) -> Expr {
    expr(ExprKind::Ident(name.into()))
}

pub fn paren(inner: Expr) -> Expr {
    expr(ExprKind::Paren(Box::new(inner)))
}

pub fn unary(op: UnaryOp, operand: Expr) -> Expr {
    expr(ExprKind::Unary {
        op,
        operand: Box::new(operand),
    })
}

pub fn binary(op: BinaryOp, left: Expr, right: Expr) -> Expr {
    expr(ExprKind::Binary {
        op,
        left: Box::new(left),
        right: Box::new(right),
    })
}

/// Call of a named callee: `call("sum", vec![name("a"), int(1)])`.
pub fn call(callee: &str, args: Vec<Expr>) -> Expr {
    call_expr(name(callee), args)
}

pub fn call_expr(callee: Expr, args: Vec<Expr>) -> Expr {
    expr(ExprKind::Call {
        callee: Box::new(callee),
        args,
    })
}

pub fn index(base: Expr, idx: Expr) -> Expr {
    expr(ExprKind::Index {
        base: Box::new(base),
        index: Box::new(idx),
    })
}

pub fn selector(base: &str, field: &str) -> Expr {
    expr(ExprKind::Selector {
        base: Box::new(name(base)),
        field: ident(field),
    })
}

pub fn func_lit(params: Vec<Param>, result: Option<TypeExpr>, stmts: Vec<Stmt>) -> Expr {
    expr(ExprKind::FuncLit {
        params,
        result,
        body: block(stmts),
    })
}

pub fn composite(ty: TypeExpr, elements: Vec<Expr>) -> Expr {
    expr(ExprKind::CompositeLit {
        ty: Some(ty),
        elements,
    })
}

/// Composite literal with an elided type, as in the inner `{1, 2}` of `[][]int{{1, 2}}`.
pub fn elided(elements: Vec<Expr>) -> Expr {
    expr(ExprKind::CompositeLit { ty: None, elements })
}

// ----------------------------------------------------------------------------
// Statements
// ----------------------------------------------------------------------------

fn stmt(kind: StmtKind) -> Stmt {
    Stmt::new(kind, Span::dummy())
}

pub fn stmt_at(mut s: Stmt, start: usize, end: usize) -> Stmt {
    s.span = Span::new(start, end);
    s
}

pub fn block(stmts: Vec<Stmt>) -> Block {
    Block {
        stmts,
        span: Span::dummy(),
    }
}

pub fn expr_stmt(e: Expr) -> Stmt {
    stmt(StmtKind::Expr(e))
}

fn var_decl(names: &[&str], ty: Option<TypeExpr>, values: Vec<Expr>) -> VarDecl {
    VarDecl {
        names: names.iter().map(|n| ident(n)).collect(),
        ty,
        values,
        span: Span::dummy(),
    }
}

fn const_decl(names: &[&str], ty: Option<TypeExpr>, values: Vec<Expr>) -> ConstDecl {
    ConstDecl {
        names: names.iter().map(|n| ident(n)).collect(),
        ty,
        values,
        span: Span::dummy(),
    }
}

/// `var name ty = value`
pub fn var(name: &str, ty: Option<TypeExpr>, value: Option<Expr>) -> Stmt {
    stmt(StmtKind::Var(var_decl(&[name], ty, value.into_iter().collect())))
}

pub fn var_multi(names: &[&str], ty: Option<TypeExpr>, values: Vec<Expr>) -> Stmt {
    stmt(StmtKind::Var(var_decl(names, ty, values)))
}

pub fn const_stmt(names: &[&str], ty: Option<TypeExpr>, values: Vec<Expr>) -> Stmt {
    stmt(StmtKind::Const(const_decl(names, ty, values)))
}

/// `name := value`
pub fn short_var(name: &str, value: Expr) -> Stmt {
    short_var_multi(&[name], vec![value])
}

pub fn short_var_multi(names: &[&str], values: Vec<Expr>) -> Stmt {
    stmt(StmtKind::ShortVar {
        names: names.iter().map(|n| ident(n)).collect(),
        values,
    })
}

pub fn assign(target: Expr, value: Expr) -> Stmt {
    stmt(StmtKind::Assign {
        target,
        op: None,
        value,
    })
}

pub fn compound_assign(target: Expr, op: BinaryOp, value: Expr) -> Stmt {
    stmt(StmtKind::Assign {
        target,
        op: Some(op),
        value,
    })
}

pub fn inc(target: Expr) -> Stmt {
    stmt(StmtKind::IncDec {
        target,
        increment: true,
    })
}

pub fn dec(target: Expr) -> Stmt {
    stmt(StmtKind::IncDec {
        target,
        increment: false,
    })
}

pub fn ret(value: Option<Expr>) -> Stmt {
    stmt(StmtKind::Return(value))
}

pub fn brk() -> Stmt {
    stmt(StmtKind::Break)
}

pub fn cont() -> Stmt {
    stmt(StmtKind::Continue)
}

pub fn block_stmt(stmts: Vec<Stmt>) -> Stmt {
    stmt(StmtKind::Block(block(stmts)))
}

pub fn if_stmt(condition: Expr, then_stmts: Vec<Stmt>, else_branch: Option<Stmt>) -> Stmt {
    stmt(StmtKind::If {
        init: None,
        condition,
        then_branch: block(then_stmts),
        else_branch: else_branch.map(Box::new),
    })
}

/// `for init; cond; post { body }`
pub fn for_stmt(init: Option<Stmt>, condition: Option<Expr>, post: Option<Stmt>, body: Vec<Stmt>) -> Stmt {
    stmt(StmtKind::For {
        init: init.map(Box::new),
        condition,
        post: post.map(Box::new),
        body: block(body),
    })
}

pub fn for_range(key: Option<&str>, value: Option<&str>, iterable: Expr, body: Vec<Stmt>) -> Stmt {
    stmt(StmtKind::ForRange {
        key: key.map(ident),
        value: value.map(ident),
        iterable,
        body: block(body),
    })
}

pub fn type_stmt(name: &str, kind: TypeDeclKind, target: TypeExpr) -> Stmt {
    stmt(StmtKind::Type(type_decl(name, kind, target)))
}

// ----------------------------------------------------------------------------
// Items
// ----------------------------------------------------------------------------

fn type_decl(name: &str, kind: TypeDeclKind, target: TypeExpr) -> TypeDecl {
    TypeDecl {
        name: ident(name),
        kind,
        ty: target,
        span: Span::dummy(),
    }
}

pub fn import(path: &str) -> Item {
    Item::Import(ImportDecl {
        path: path.into(),
        alias: None,
        span: Span::dummy(),
    })
}

/// `type name underlying`
pub fn named_type(name: &str, underlying: TypeExpr) -> Item {
    Item::Type(type_decl(name, TypeDeclKind::Named, underlying))
}

/// `type name = target`
pub fn alias_type(name: &str, target: TypeExpr) -> Item {
    Item::Type(type_decl(name, TypeDeclKind::Alias, target))
}

pub fn global_var(name: &str, ty: Option<TypeExpr>, value: Option<Expr>) -> Item {
    Item::Var(var_decl(&[name], ty, value.into_iter().collect()))
}

pub fn global_const(names: &[&str], ty: Option<TypeExpr>, values: Vec<Expr>) -> Item {
    Item::Const(const_decl(names, ty, values))
}

pub fn func(name: &str, params: Vec<Param>, result: Option<TypeExpr>, body: Vec<Stmt>) -> Item {
    Item::Function(FunctionDecl {
        name: ident(name),
        params,
        result,
        body: block(body),
        span: Span::dummy(),
    })
}

/// `package main` with the given items.
pub fn program(items: Vec<Item>) -> Program {
    Program {
        package: ident("main"),
        items,
        span: Span::dummy(),
    }
}

//! gocheck Abstract Syntax Tree
//!
//! Defines the already-parsed program tree that the semantic analyzer walks.
//! The tree is produced by an external parser; this crate only describes its
//! shape. Every node carries a byte [`Span`] into the original source so that
//! findings can point back at call sites and declarations.
//!
//! The [`build`] module offers terse constructors for assembling trees by hand,
//! which is how tests and benchmarks feed programs to the analyzer.

pub mod build;

pub use smol_str::SmolStr;

use std::ops::Range;

/// Byte range in the source file (`start` inclusive, `end` exclusive).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn merge(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    pub fn dummy() -> Self {
        Self { start: 0, end: 0 }
    }

    pub fn is_dummy(&self) -> bool {
        self.start == 0 && self.end == 0
    }
}

impl From<Range<usize>> for Span {
    fn from(range: Range<usize>) -> Self {
        Span::new(range.start, range.end)
    }
}

impl From<Span> for Range<usize> {
    fn from(span: Span) -> Self {
        span.start..span.end
    }
}

/// A spanned value - wraps any value with source location info
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned<T> {
    pub node: T,
    pub span: Span,
}

impl<T> Spanned<T> {
    pub fn new(node: T, span: Span) -> Self {
        Self { node, span }
    }

    pub fn dummy(node: T) -> Self {
        Self {
            node,
            span: Span::dummy(),
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Spanned<U> {
        Spanned {
            node: f(self.node),
            span: self.span,
        }
    }
}

/// Identifier (variable names, function names, package names)
pub type Ident = Spanned<SmolStr>;

/// Type identifier (`int`, `boolean`, `al_bool0`)
pub type TypeIdent = Spanned<SmolStr>;

// ============================================================================
// Program Structure
// ============================================================================

/// A complete source file: `package main` followed by top-level declarations.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub package: Ident,
    pub items: Vec<Item>,
    pub span: Span,
}

/// Top-level declarations
#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    Import(ImportDecl),
    Type(TypeDecl),
    Var(VarDecl),
    Const(ConstDecl),
    Function(FunctionDecl),
}

impl Item {
    pub fn span(&self) -> Span {
        match self {
            Item::Import(decl) => decl.span,
            Item::Type(decl) => decl.span,
            Item::Var(decl) => decl.span,
            Item::Const(decl) => decl.span,
            Item::Function(decl) => decl.span,
        }
    }
}

/// `import "fmt"` or `import f "fmt"`
#[derive(Debug, Clone, PartialEq)]
pub struct ImportDecl {
    pub path: SmolStr,
    pub alias: Option<Ident>,
    pub span: Span,
}

impl ImportDecl {
    /// Name the import is bound under: the alias, or the last path segment.
    pub fn binding_name(&self) -> SmolStr {
        match &self.alias {
            Some(alias) => alias.node.clone(),
            None => self
                .path
                .rsplit('/')
                .next()
                .map(SmolStr::new)
                .unwrap_or_else(|| self.path.clone()),
        }
    }
}

// ============================================================================
// Declarations
// ============================================================================

/// Whether a type declaration introduces a new identity or just another name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeDeclKind {
    /// `type boolean bool` - a distinct type with its own identity
    Named,
    /// `type al_bool0 = bool` - interchangeable with its target
    Alias,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeDecl {
    pub name: TypeIdent,
    pub kind: TypeDeclKind,
    pub ty: TypeExpr,
    pub span: Span,
}

/// `var a, b int = 1, 2` / `var x = f()` / `var numbers [6]int`
#[derive(Debug, Clone, PartialEq)]
pub struct VarDecl {
    pub names: Vec<Ident>,
    pub ty: Option<TypeExpr>,
    pub values: Vec<Expr>,
    pub span: Span,
}

/// `const size int = 1024` / `const a, b, c = 3, 4, "foo"`
#[derive(Debug, Clone, PartialEq)]
pub struct ConstDecl {
    pub names: Vec<Ident>,
    pub ty: Option<TypeExpr>,
    pub values: Vec<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDecl {
    pub name: Ident,
    pub params: Vec<Param>,
    pub result: Option<TypeExpr>,
    pub body: Block,
    pub span: Span,
}

/// A single parameter. Grouped parameters (`a, b int`) arrive expanded, one
/// `Param` per name, each carrying its own copy of the type.
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: Option<Ident>,
    pub ty: TypeExpr,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub stmts: Vec<Stmt>,
    pub span: Span,
}

// ============================================================================
// Types
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum TypeExpr {
    /// Simple named type: `int`, `boolean`, `al_bool2`
    Named(TypeIdent),

    /// Fixed-size array: `[4]int`, or `[...]int` (length taken from a
    /// composite literal) when `len` is `None`
    Array {
        element: Box<TypeExpr>,
        len: Option<u64>,
        span: Span,
    },

    /// Growable sequence: `[]string`
    Slice {
        element: Box<TypeExpr>,
        span: Span,
    },

    /// Function type: `func(int, bool) int`
    Function {
        params: Vec<TypeExpr>,
        result: Option<Box<TypeExpr>>,
        span: Span,
    },
}

impl TypeExpr {
    pub fn span(&self) -> Span {
        match self {
            TypeExpr::Named(name) => name.span,
            TypeExpr::Array { span, .. }
            | TypeExpr::Slice { span, .. }
            | TypeExpr::Function { span, .. } => *span,
        }
    }
}

// ============================================================================
// Expressions
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Self { kind, span }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    // Literals
    Integer(SmolStr),
    Float(SmolStr),
    String(SmolStr),
    Rune(char),

    /// Identifier reference (`true` and `false` are predeclared identifiers)
    Ident(SmolStr),

    /// `(expr)`
    Paren(Box<Expr>),

    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },

    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },

    /// `callee(args...)`; also conversions when the callee names a type
    Call {
        callee: Box<Expr>,
        args: Vec<Expr>,
    },

    /// `base[index]`
    Index {
        base: Box<Expr>,
        index: Box<Expr>,
    },

    /// `fmt.Println`
    Selector {
        base: Box<Expr>,
        field: Ident,
    },

    /// `func(g int, h bool) int { ... }`
    FuncLit {
        params: Vec<Param>,
        result: Option<TypeExpr>,
        body: Block,
    },

    /// `[4]int{4, 5}` / `[]string{"hey"}`; `ty` is `None` for elided inner
    /// literals such as the `{1, 2}` in `[][]int{{1, 2}}`
    CompositeLit {
        ty: Option<TypeExpr>,
        elements: Vec<Expr>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Rem,

    // Bitwise
    BitAnd,
    BitOr,
    BitXor,
    Shl,
    Shr,

    // Comparison
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,

    // Logical
    And,
    Or,
}

impl BinaryOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Rem => "%",
            BinaryOp::BitAnd => "&",
            BinaryOp::BitOr => "|",
            BinaryOp::BitXor => "^",
            BinaryOp::Shl => "<<",
            BinaryOp::Shr => ">>",
            BinaryOp::Eq => "==",
            BinaryOp::NotEq => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::LtEq => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::GtEq => ">=",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
        }
    }

    pub fn is_comparison(&self) -> bool {
        matches!(
            self,
            BinaryOp::Eq | BinaryOp::NotEq | BinaryOp::Lt | BinaryOp::LtEq | BinaryOp::Gt | BinaryOp::GtEq
        )
    }

    /// `<`, `<=`, `>`, `>=` need ordered operands, not just comparable ones
    pub fn is_ordering(&self) -> bool {
        matches!(self, BinaryOp::Lt | BinaryOp::LtEq | BinaryOp::Gt | BinaryOp::GtEq)
    }

    pub fn is_logical(&self) -> bool {
        matches!(self, BinaryOp::And | BinaryOp::Or)
    }

    pub fn is_shift(&self) -> bool {
        matches!(self, BinaryOp::Shl | BinaryOp::Shr)
    }
}

impl std::fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Neg,
    Pos,
    Not,
}

impl UnaryOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            UnaryOp::Neg => "-",
            UnaryOp::Pos => "+",
            UnaryOp::Not => "!",
        }
    }
}

impl std::fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}

// ============================================================================
// Statements
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

impl Stmt {
    pub fn new(kind: StmtKind, span: Span) -> Self {
        Self { kind, span }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum StmtKind {
    /// Expression statement, usually a call
    Expr(Expr),

    Var(VarDecl),
    Const(ConstDecl),
    Type(TypeDecl),

    /// Short variable declaration: `a, b := 1, 2`
    ShortVar {
        names: Vec<Ident>,
        values: Vec<Expr>,
    },

    /// Assignment: `x = e`, or `x += e` when `op` is set
    Assign {
        target: Expr,
        op: Option<BinaryOp>,
        value: Expr,
    },

    /// `x++` / `x--`
    IncDec {
        target: Expr,
        increment: bool,
    },

    Block(Block),

    /// `if init; cond { } else ...`; the else branch is a `Block` or another `If`
    If {
        init: Option<Box<Stmt>>,
        condition: Expr,
        then_branch: Block,
        else_branch: Option<Box<Stmt>>,
    },

    /// `for init; cond; post { }`, `for cond { }` and `for { }`
    For {
        init: Option<Box<Stmt>>,
        condition: Option<Expr>,
        post: Option<Box<Stmt>>,
        body: Block,
    },

    /// `for key, value := range iterable { }`
    ForRange {
        key: Option<Ident>,
        value: Option<Ident>,
        iterable: Expr,
        body: Block,
    },

    Return(Option<Expr>),
    Break,
    Continue,
}

//! The analysis walk.
//!
//! A program is checked in four passes over its top-level items:
//!
//! 1. imports and type declarations, so every type name is known before any
//!    type expression is resolved;
//! 2. function signatures, so calls may precede the callee's declaration;
//! 3. package-level variables and constants. Every name is bound first, so
//!    an initializer may refer to a later declaration; initializers are then
//!    typed in dependency order;
//! 4. bodies of function literals met in package-level initializers, then
//!    function bodies.

use crate::collector::DiagnosticCollector;
use crate::config::AnalyzerConfig;
use crate::error::{located, DiagnosticKind, FatalError, SemaError, SemaResult};
use crate::expr::{DeferredBody, ExprTyper};
use crate::scope::{FrameKind, ScopeStack, SymbolKind};
use crate::signature::{Signature, SignatureRegistry};
use crate::symtab::SymbolTableReport;
use crate::types::{PrimitiveKind, Type, TypeTable};
use crate::universe;
use gocheck_ast::{
    BinaryOp, Block, ConstDecl, Expr, ExprKind, Ident, Item, Param, Program, SmolStr, Span, Spanned, Stmt, StmtKind,
    TypeDecl, VarDecl,
};
use gocheck_diagnostics::Diagnostic;
use rustc_hash::FxHashMap;
use tracing::{debug, instrument};

/// Outcome of a completed analysis.
#[derive(Debug, Clone, Default)]
pub struct Analysis {
    diagnostics: Vec<SemaError>,
    symbols: Option<SymbolTableReport>,
}

impl Analysis {
    /// Findings ordered by source position.
    pub fn diagnostics(&self) -> &[SemaError] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<SemaError> {
        self.diagnostics
    }

    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn kinds(&self) -> Vec<DiagnosticKind> {
        self.diagnostics.iter().map(SemaError::kind).collect()
    }

    pub fn count(&self, kind: DiagnosticKind) -> usize {
        self.diagnostics.iter().filter(|error| error.kind() == kind).count()
    }

    /// Present when the analyzer was configured with
    /// [`with_symbol_report`](AnalyzerConfig::with_symbol_report).
    pub fn symbols(&self) -> Option<&SymbolTableReport> {
        self.symbols.as_ref()
    }

    pub fn to_diagnostics(&self, file: &str) -> Vec<Diagnostic> {
        self.diagnostics.iter().map(|error| error.to_diagnostic(file)).collect()
    }
}

/// Semantic analyzer. Holds only configuration; every call to
/// [`analyze`](Self::analyze) builds fresh state, so one analyzer may serve
/// many programs, including from several threads.
#[derive(Debug, Clone, Default)]
pub struct Analyzer {
    config: AnalyzerConfig,
}

impl Analyzer {
    pub fn new(config: AnalyzerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Checks `program`, returning every finding. Only conditions a
    /// well-formed tree cannot produce abort the analysis.
    #[instrument(level = "debug", skip_all, fields(package = %program.package.node))]
    pub fn analyze(&self, program: &Program) -> SemaResult<Analysis> {
        let mut checker = Checker::new(&self.config);
        checker.check_program(program)?;
        let analysis = checker.finish();
        debug!(findings = analysis.diagnostics.len(), "analysis finished");
        Ok(analysis)
    }
}

struct FunctionContext {
    result: Type,
    /// Enclosing `for` statements within this function
    loops: usize,
}

/// A package-level `var` or `const` declaration.
#[derive(Clone, Copy)]
enum Global<'ast> {
    Var(&'ast VarDecl),
    Const(&'ast ConstDecl),
}

impl<'ast> Global<'ast> {
    fn names(self) -> &'ast [Ident] {
        match self {
            Global::Var(decl) => &decl.names,
            Global::Const(decl) => &decl.names,
        }
    }

    fn values(self) -> &'ast [Expr] {
        match self {
            Global::Var(decl) => &decl.values,
            Global::Const(decl) => &decl.values,
        }
    }

    fn kind(self) -> SymbolKind {
        match self {
            Global::Var(_) => SymbolKind::Var,
            Global::Const(_) => SymbolKind::Const,
        }
    }
}

struct Checker<'c, 'ast> {
    config: &'c AnalyzerConfig,
    types: TypeTable,
    scopes: ScopeStack,
    signatures: SignatureRegistry,
    findings: DiagnosticCollector,
    report: Option<SymbolTableReport>,
    functions: Vec<FunctionContext>,
    /// Collects function-literal bodies instead of checking them on the spot
    held_literals: Option<Vec<DeferredBody<'ast>>>,
}

impl<'c, 'ast> Checker<'c, 'ast> {
    fn new(config: &'c AnalyzerConfig) -> Self {
        let mut scopes = ScopeStack::new();
        let mut types = TypeTable::new(config.max_alias_depth);
        universe::install(&mut scopes, &mut types);
        Self {
            config,
            types,
            scopes,
            signatures: SignatureRegistry::new(),
            findings: DiagnosticCollector::new(),
            report: config.record_symbols.then(SymbolTableReport::new),
            functions: Vec::new(),
            held_literals: None,
        }
    }

    fn finish(self) -> Analysis {
        Analysis {
            diagnostics: self.findings.into_sorted(),
            symbols: self.report.map(SymbolTableReport::finish),
        }
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    fn record(&mut self, error: SemaError) {
        self.findings.record(error);
    }

    /// Binds `name`, recording a duplicate instead of failing.
    fn bind(&mut self, name: &Ident, kind: SymbolKind, ty: Type) -> bool {
        match self.scopes.bind(name, kind, ty) {
            Ok(()) => true,
            Err(error) => {
                self.record(error);
                false
            }
        }
    }

    /// Binds a declared variable or constant. Package-level names are bound
    /// before any initializer is typed, so here they only receive their type.
    fn declare_value(&mut self, name: &Ident, kind: SymbolKind, ty: Type) {
        if self.scopes.current_kind() == FrameKind::Package {
            self.scopes.refine(name, kind, ty);
        } else {
            self.bind(name, kind, ty);
        }
    }

    fn pop_scope(&mut self) {
        let symbols = self.scopes.pop();
        if let Some(report) = &mut self.report {
            report.record(&symbols, &self.types);
        }
    }

    fn in_block<F>(&mut self, f: F) -> SemaResult<()>
    where
        F: FnOnce(&mut Self) -> SemaResult<()>,
    {
        self.scopes.push(FrameKind::Block);
        let outcome = f(self);
        self.pop_scope();
        outcome
    }

    /// Runs `f` with an expression typer over the current scopes, then checks
    /// the bodies of any function literals it met.
    fn with_typer<T, F>(&mut self, f: F) -> SemaResult<T>
    where
        F: for<'s> FnOnce(&mut ExprTyper<'s, 'ast>) -> SemaResult<T>,
    {
        let (value, deferred) = {
            let mut typer = ExprTyper::new(
                &self.scopes,
                &self.types,
                &self.signatures,
                self.config,
                &mut self.findings,
            );
            let value = f(&mut typer)?;
            (value, typer.into_deferred())
        };
        if let Some(held) = self.held_literals.as_mut() {
            held.extend(deferred);
            return Ok(value);
        }
        for body in deferred {
            self.check_func_literal(body)?;
        }
        Ok(value)
    }

    fn widening(&self) -> bool {
        self.config.numeric_literal_widening
    }

    // ========================================================================
    // Top level
    // ========================================================================

    fn check_program(&mut self, program: &'ast Program) -> SemaResult<()> {
        self.scopes.push(FrameKind::Package);

        for item in &program.items {
            if let Item::Import(import) = item {
                let span = import.alias.as_ref().map(|alias| alias.span).unwrap_or(import.span);
                self.bind(&Spanned::new(import.binding_name(), span), SymbolKind::Package, Type::Error);
            }
        }
        let type_decls = program.items.iter().filter_map(|item| match item {
            Item::Type(decl) => Some(decl),
            _ => None,
        });
        self.declare_types(type_decls)?;

        let mut bodies = Vec::new();
        for item in &program.items {
            if let Item::Function(decl) = item {
                let signature = self.with_typer(|typer| typer.signature_of(&decl.params, decl.result.as_ref()))?;
                if self.bind(&decl.name, SymbolKind::Func, Type::Function(signature.clone())) {
                    self.signatures.register(&decl.name, signature.clone());
                }
                bodies.push((decl, signature));
            }
        }
        debug!(functions = self.signatures.len(), "signatures registered");

        let globals: Vec<Global<'ast>> = program
            .items
            .iter()
            .filter_map(|item| match item {
                Item::Var(decl) => Some(Global::Var(decl)),
                Item::Const(decl) => Some(Global::Const(decl)),
                _ => None,
            })
            .collect();
        self.check_globals(&globals)?;

        for (decl, signature) in bodies {
            debug!(function = %decl.name.node, "checking body");
            self.check_function_body(&decl.params, &signature, &decl.body)?;
        }

        self.pop_scope();
        Ok(())
    }

    /// Binds every package-level name, then types the initializers so that
    /// each one comes after the declarations it refers to. Function-literal
    /// bodies are checked once every global has its type.
    fn check_globals(&mut self, globals: &[Global<'ast>]) -> SemaResult<()> {
        for global in globals {
            for name in global.names() {
                self.bind(name, global.kind(), Type::Error);
            }
        }

        let order = initialization_order(globals, &mut self.findings);
        let mut literals: Vec<Vec<DeferredBody<'ast>>> = globals.iter().map(|_| Vec::new()).collect();
        for index in order {
            self.held_literals = Some(Vec::new());
            match globals[index] {
                Global::Var(decl) => self.check_var_decl(decl)?,
                Global::Const(decl) => self.check_const_decl(decl)?,
            }
            literals[index] = self.held_literals.take().unwrap_or_default();
        }
        debug!(globals = globals.len(), "package-level declarations checked");

        for body in literals.into_iter().flatten() {
            self.check_func_literal(body)?;
        }
        Ok(())
    }

    /// Declares every type first and defines them afterwards, so definitions
    /// may refer to any type of the same group, themselves included.
    fn declare_types(&mut self, decls: impl Iterator<Item = &'ast TypeDecl>) -> SemaResult<()> {
        let mut declared = Vec::new();
        for decl in decls {
            match self.types.declare_pending(&mut self.scopes, &decl.name, decl.kind) {
                Ok(ty) => declared.push((decl, ty)),
                Err(error) => self.record(error),
            }
        }
        for (decl, ty) in &declared {
            let definition = self.with_typer(|typer| typer.resolve_type_expr(&decl.ty))?;
            self.types.define(ty, definition);
        }
        // cycles surface here rather than at some later use
        for (_, ty) in &declared {
            self.types.underlying(ty)?;
        }
        for (decl, ty) in &declared {
            if self.types.contains_itself(ty)? {
                self.record(SemaError::InvalidRecursiveType {
                    name: decl.name.node.to_string(),
                    span: decl.name.span,
                });
                self.types.define(ty, Type::Error);
            }
        }
        Ok(())
    }

    fn check_function_body(
        &mut self,
        params: &'ast [Param],
        signature: &Signature,
        body: &'ast Block,
    ) -> SemaResult<()> {
        self.functions.push(FunctionContext {
            result: (*signature.result).clone(),
            loops: 0,
        });
        self.scopes.push(FrameKind::Function);
        for (param, ty) in params.iter().zip(&signature.params) {
            if let Some(name) = &param.name {
                self.bind(name, SymbolKind::Var, ty.clone());
            }
        }
        let outcome = self.check_stmts(&body.stmts);
        self.pop_scope();
        self.functions.pop();
        outcome
    }

    fn check_func_literal(&mut self, literal: DeferredBody<'ast>) -> SemaResult<()> {
        self.check_function_body(literal.params, &literal.signature, literal.body)
    }

    // ========================================================================
    // Declarations
    // ========================================================================

    fn check_var_decl(&mut self, decl: &'ast VarDecl) -> SemaResult<()> {
        if decl.names.is_empty() {
            return Err(FatalError::MalformedTree {
                detail: "variable declaration without names".to_string(),
                span: decl.span,
            });
        }
        if decl.ty.is_none() && decl.values.is_empty() {
            return Err(FatalError::MalformedTree {
                detail: "variable declaration without a type or a value".to_string(),
                span: decl.span,
            });
        }
        let declared = match &decl.ty {
            Some(ty) => Some(self.with_typer(|typer| typer.resolve_type_expr(ty))?),
            None => None,
        };
        let values = self.type_values(&decl.values)?;

        if !values.is_empty() && values.len() != decl.names.len() {
            self.record(SemaError::AssignmentCountMismatch {
                targets: decl.names.len(),
                values: values.len(),
                span: decl.span,
            });
            for name in &decl.names {
                self.declare_value(name, SymbolKind::Var, declared.clone().unwrap_or(Type::Error));
            }
            return Ok(());
        }

        for (i, name) in decl.names.iter().enumerate() {
            let ty = match (&declared, values.get(i)) {
                (Some(declared), Some((value, span))) => {
                    let span = located(*span, decl.span);
                    if let Some(error) =
                        self.types
                            .assignment_error(value, declared, self.widening(), "variable declaration", span)?
                    {
                        self.record(error);
                    }
                    declared.clone()
                }
                (Some(declared), None) => declared.clone(),
                (None, Some((value, _))) => self.types.default_type(value),
                (None, None) => Type::Error,
            };
            self.declare_value(name, SymbolKind::Var, ty);
        }
        Ok(())
    }

    fn check_const_decl(&mut self, decl: &'ast ConstDecl) -> SemaResult<()> {
        if decl.names.is_empty() || decl.values.is_empty() {
            return Err(FatalError::MalformedTree {
                detail: "constant declaration without names or values".to_string(),
                span: decl.span,
            });
        }
        let declared = match &decl.ty {
            Some(ty) => Some(self.with_typer(|typer| typer.resolve_type_expr(ty))?),
            None => None,
        };
        let values = self.type_values(&decl.values)?;

        if values.len() != decl.names.len() {
            self.record(SemaError::AssignmentCountMismatch {
                targets: decl.names.len(),
                values: values.len(),
                span: decl.span,
            });
        }
        for (i, name) in decl.names.iter().enumerate() {
            let ty = match (&declared, values.get(i)) {
                (Some(declared), Some((value, span))) => {
                    let span = located(*span, decl.span);
                    if let Some(error) =
                        self.types
                            .assignment_error(value, declared, self.widening(), "constant declaration", span)?
                    {
                        self.record(error);
                    }
                    declared.clone()
                }
                (Some(declared), None) => declared.clone(),
                // untyped constants stay untyped
                (None, Some((value, _))) => value.clone(),
                (None, None) => Type::Error,
            };
            self.declare_value(name, SymbolKind::Const, ty);
        }
        Ok(())
    }

    fn type_values(&mut self, values: &'ast [Expr]) -> SemaResult<Vec<(Type, Span)>> {
        self.with_typer(|typer| {
            let mut typed = Vec::with_capacity(values.len());
            for value in values {
                typed.push((typer.value_of(value)?, value.span));
            }
            Ok(typed)
        })
    }

    // ========================================================================
    // Statements
    // ========================================================================

    fn check_stmts(&mut self, stmts: &'ast [Stmt]) -> SemaResult<()> {
        for stmt in stmts {
            self.check_stmt(stmt)?;
        }
        Ok(())
    }

    fn check_stmt(&mut self, stmt: &'ast Stmt) -> SemaResult<()> {
        match &stmt.kind {
            StmtKind::Expr(expr) => {
                self.with_typer(|typer| typer.type_of(expr))?;
                Ok(())
            }
            StmtKind::Var(decl) => self.check_var_decl(decl),
            StmtKind::Const(decl) => self.check_const_decl(decl),
            StmtKind::Type(decl) => self.declare_types(std::iter::once(decl)),
            StmtKind::ShortVar { names, values } => self.check_short_var(names, values, stmt.span),
            StmtKind::Assign { target, op, value } => self.check_assign(target, *op, value, stmt.span),
            StmtKind::IncDec { target, increment } => self.check_inc_dec(target, *increment, stmt.span),
            StmtKind::Block(block) => self.in_block(|checker| checker.check_stmts(&block.stmts)),
            StmtKind::If {
                init,
                condition,
                then_branch,
                else_branch,
            } => self.in_block(|checker| {
                if let Some(init) = init {
                    checker.check_stmt(init)?;
                }
                checker.check_condition(condition)?;
                checker.in_block(|checker| checker.check_stmts(&then_branch.stmts))?;
                if let Some(else_branch) = else_branch {
                    checker.check_stmt(else_branch)?;
                }
                Ok(())
            }),
            StmtKind::For {
                init,
                condition,
                post,
                body,
            } => self.in_block(|checker| {
                if let Some(init) = init {
                    checker.check_stmt(init)?;
                }
                if let Some(condition) = condition {
                    checker.check_condition(condition)?;
                }
                if let Some(post) = post {
                    checker.check_stmt(post)?;
                }
                checker.check_loop_body(body)
            }),
            StmtKind::ForRange {
                key,
                value,
                iterable,
                body,
            } => self.check_range(key.as_ref(), value.as_ref(), iterable, body),
            StmtKind::Return(value) => self.check_return(value.as_ref(), stmt.span),
            StmtKind::Break => self.check_branch("break", stmt.span),
            StmtKind::Continue => self.check_branch("continue", stmt.span),
        }
    }

    fn check_short_var(&mut self, names: &'ast [Ident], values: &'ast [Expr], span: Span) -> SemaResult<()> {
        let typed = self.type_values(values)?;
        if names.len() != typed.len() {
            self.record(SemaError::AssignmentCountMismatch {
                targets: names.len(),
                values: typed.len(),
                span,
            });
            for name in names {
                if self.scopes.lookup_local(&name.node).is_none() {
                    self.bind(name, SymbolKind::Var, Type::Error);
                }
            }
            return Ok(());
        }

        let mut declared_new = false;
        for (name, (value, value_span)) in names.iter().zip(&typed) {
            if name.node == "_" {
                continue;
            }
            let existing = self
                .scopes
                .lookup_local(&name.node)
                .map(|symbol| (symbol.kind, symbol.ty.clone()));
            match existing {
                Some((SymbolKind::Var, target)) => {
                    let value_span = located(*value_span, span);
                    if let Some(error) =
                        self.types
                            .assignment_error(value, &target, self.widening(), "assignment", value_span)?
                    {
                        self.record(error);
                    }
                }
                Some((kind, _)) => self.record(SemaError::InvalidAssignmentTarget {
                    target: format!("{} `{}`", kind.describe(), name.node),
                    span: located(name.span, span),
                }),
                None => {
                    let ty = self.types.default_type(value);
                    self.bind(name, SymbolKind::Var, ty);
                    declared_new = true;
                }
            }
        }
        if !declared_new {
            self.record(SemaError::NoNewVariables { span });
        }
        Ok(())
    }

    fn check_assign(
        &mut self,
        target: &'ast Expr,
        op: Option<BinaryOp>,
        value: &'ast Expr,
        span: Span,
    ) -> SemaResult<()> {
        if let Some(op) = op {
            if op.is_comparison() || op.is_logical() {
                return Err(FatalError::MalformedTree {
                    detail: format!("`{}=` is not an assignment operator", op),
                    span,
                });
            }
        }
        self.with_typer(|typer| {
            let target_ty = typer.assignable_target(target)?;
            let value_ty = typer.value_of(value)?;
            let value_span = located(value.span, span);
            let result = match op {
                Some(op) if !target_ty.is_error() => typer.binary(op, &target_ty, &value_ty, span)?,
                _ => value_ty,
            };
            let mismatch = typer
                .types
                .assignment_error(&result, &target_ty, typer.widening(), "assignment", value_span)?;
            if let Some(error) = mismatch {
                typer.report(error);
            }
            Ok(())
        })
    }

    fn check_inc_dec(&mut self, target: &'ast Expr, increment: bool, span: Span) -> SemaResult<()> {
        self.with_typer(|typer| {
            let ty = typer.assignable_target(target)?;
            if !ty.is_error() && !typer.types.underlying(&ty)?.is_numeric() {
                typer.report(SemaError::InvalidOperand {
                    op: if increment { "++" } else { "--" }.to_string(),
                    operand: typer.types.describe(&ty),
                    span,
                });
            }
            Ok(())
        })
    }

    fn check_condition(&mut self, condition: &'ast Expr) -> SemaResult<()> {
        self.with_typer(|typer| {
            let ty = typer.value_of(condition)?;
            if !ty.is_error() && !typer.types.underlying(&ty)?.is_boolean() {
                typer.report(SemaError::NonBooleanCondition {
                    found: typer.types.describe(&ty),
                    span: condition.span,
                });
            }
            Ok(())
        })
    }

    fn check_range(
        &mut self,
        key: Option<&'ast Ident>,
        value: Option<&'ast Ident>,
        iterable: &'ast Expr,
        body: &'ast Block,
    ) -> SemaResult<()> {
        let iterable_ty = self.with_typer(|typer| typer.value_of(iterable))?;
        let int = Type::Primitive(PrimitiveKind::Int);
        let (key_ty, value_ty) = if iterable_ty.is_error() {
            (Type::Error, Type::Error)
        } else {
            match self.types.underlying(&iterable_ty)? {
                Type::FixedArray { element, .. } | Type::Sequence(element) => (int, *element),
                underlying if underlying.is_string() => (int, Type::Primitive(PrimitiveKind::Int32)),
                _ => {
                    self.record(SemaError::NotIterable {
                        found: self.types.describe(&iterable_ty),
                        span: iterable.span,
                    });
                    (Type::Error, Type::Error)
                }
            }
        };
        self.in_block(|checker| {
            if let Some(key) = key {
                checker.bind(key, SymbolKind::Var, key_ty);
            }
            if let Some(value) = value {
                checker.bind(value, SymbolKind::Var, value_ty);
            }
            checker.check_loop_body(body)
        })
    }

    fn check_loop_body(&mut self, body: &'ast Block) -> SemaResult<()> {
        if let Some(function) = self.functions.last_mut() {
            function.loops += 1;
        }
        let outcome = self.in_block(|checker| checker.check_stmts(&body.stmts));
        if let Some(function) = self.functions.last_mut() {
            function.loops -= 1;
        }
        outcome
    }

    fn check_return(&mut self, value: Option<&'ast Expr>, span: Span) -> SemaResult<()> {
        let expected = match self.functions.last() {
            Some(function) => function.result.clone(),
            None => {
                return Err(FatalError::MalformedTree {
                    detail: "`return` outside of a function".to_string(),
                    span,
                })
            }
        };
        let Some(value) = value else {
            if expected != Type::Unit {
                self.record(SemaError::ReturnTypeMismatch {
                    expected: self.types.describe(&expected),
                    found: Type::Unit.to_string(),
                    span,
                });
            }
            return Ok(());
        };
        let widening = self.widening();
        self.with_typer(|typer| {
            let found = typer.value_of(value)?;
            let span = located(value.span, span);
            if found.is_error() {
                return Ok(());
            }
            if expected == Type::Unit {
                typer.report(SemaError::ReturnTypeMismatch {
                    expected: Type::Unit.to_string(),
                    found: typer.types.describe(&found),
                    span,
                });
            } else if !typer.types.is_assignable(&found, &expected, widening)? {
                let (expected, found) = typer.types.describe_pair(&expected, &found);
                typer.report(SemaError::ReturnTypeMismatch { expected, found, span });
            }
            Ok(())
        })
    }

    fn check_branch(&mut self, keyword: &str, span: Span) -> SemaResult<()> {
        let in_loop = self.functions.last().map(|function| function.loops > 0).unwrap_or(false);
        if !in_loop {
            self.record(SemaError::MisplacedBranch {
                keyword: keyword.to_string(),
                span,
            });
        }
        Ok(())
    }
}

/// Indices of `globals` ordered so that every initializer comes after the
/// package-level names it refers to, source order otherwise. A reference
/// back into a declaration still being ordered is an initialization cycle.
fn initialization_order(globals: &[Global<'_>], findings: &mut DiagnosticCollector) -> Vec<usize> {
    let mut declared_at: FxHashMap<&SmolStr, usize> = FxHashMap::default();
    for (index, global) in globals.iter().enumerate() {
        for name in global.names() {
            declared_at.entry(&name.node).or_insert(index);
        }
    }
    let references: Vec<Vec<(&SmolStr, Span)>> = globals
        .iter()
        .map(|global| {
            let mut names = Vec::new();
            for value in global.values() {
                collect_references(value, &mut names);
            }
            names
        })
        .collect();

    let mut state = vec![Visit::New; globals.len()];
    let mut order = Vec::with_capacity(globals.len());
    for index in 0..globals.len() {
        visit(index, &declared_at, &references, &mut state, &mut order, findings);
    }
    order
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Visit {
    New,
    Open,
    Done,
}

fn visit(
    index: usize,
    declared_at: &FxHashMap<&SmolStr, usize>,
    references: &[Vec<(&SmolStr, Span)>],
    state: &mut [Visit],
    order: &mut Vec<usize>,
    findings: &mut DiagnosticCollector,
) {
    if state[index] != Visit::New {
        return;
    }
    state[index] = Visit::Open;
    for (name, span) in &references[index] {
        let Some(&dependency) = declared_at.get(name) else {
            continue;
        };
        match state[dependency] {
            Visit::New => visit(dependency, declared_at, references, state, order, findings),
            Visit::Open => findings.record(SemaError::InitializationCycle {
                name: name.to_string(),
                span: *span,
            }),
            Visit::Done => {}
        }
    }
    state[index] = Visit::Done;
    order.push(index);
}

/// Identifiers `expr` reads while it is evaluated. Function-literal bodies
/// run later and are skipped.
fn collect_references<'e>(expr: &'e Expr, names: &mut Vec<(&'e SmolStr, Span)>) {
    match &expr.kind {
        ExprKind::Ident(name) => names.push((name, expr.span)),
        ExprKind::Paren(inner) => collect_references(inner, names),
        ExprKind::Unary { operand, .. } => collect_references(operand, names),
        ExprKind::Binary { left, right, .. } => {
            collect_references(left, names);
            collect_references(right, names);
        }
        ExprKind::Call { callee, args } => {
            collect_references(callee, names);
            for arg in args {
                collect_references(arg, names);
            }
        }
        ExprKind::Index { base, index } => {
            collect_references(base, names);
            collect_references(index, names);
        }
        ExprKind::Selector { base, .. } => collect_references(base, names),
        ExprKind::CompositeLit { elements, .. } => {
            for element in elements {
                collect_references(element, names);
            }
        }
        ExprKind::Integer(_)
        | ExprKind::Float(_)
        | ExprKind::String(_)
        | ExprKind::Rune(_)
        | ExprKind::FuncLit { .. } => {}
    }
}

//! gocheck Semantic Analysis
//!
//! Checks an already-parsed program of a small, statically typed, Go-like
//! language and reports every finding instead of stopping at the first one.
//!
//! ## Components
//!
//! - [`TypeTable`]: named types, aliases and their resolution. An alias is
//!   another spelling of its target; a named type has its own identity.
//! - [`ScopeStack`]: nested lexical frames with innermost-first lookup, so a
//!   local declaration shadows an outer one of the same name.
//! - [`SignatureRegistry`]: declared function signatures, known before any
//!   body is checked.
//! - [`ExprTyper`]: bottom-up typing of expressions, untyped constants
//!   included.
//! - [`CallValidator`]: arity first, then per-argument assignability.
//! - [`DiagnosticCollector`]: findings in source order.
//!
//! ## Example
//!
//! ```rust
//! use gocheck_ast::build::*;
//! use gocheck_sema::{analyze, DiagnosticKind};
//!
//! let program = program(vec![
//!     func("sum", vec![param("a", ty("int")), param("b", ty("int"))], Some(ty("int")), vec![
//!         ret(Some(binary(gocheck_ast::BinaryOp::Add, name("a"), name("b")))),
//!     ]),
//!     func("main", vec![], None, vec![
//!         expr_stmt(call("sum", vec![int(1), int(2), int(3)])),
//!     ]),
//! ]);
//!
//! let analysis = analyze(&program).unwrap();
//! assert_eq!(analysis.kinds(), vec![DiagnosticKind::ArityMismatch]);
//! ```

pub mod analyzer;
pub mod call;
pub mod collector;
pub mod config;
pub mod error;
mod error_diagnostic;
pub mod expr;
pub mod scope;
pub mod signature;
pub mod symtab;
pub mod types;
pub mod universe;

pub use analyzer::{Analysis, Analyzer};
pub use call::{CallSite, CallValidator};
pub use collector::DiagnosticCollector;
pub use config::AnalyzerConfig;
pub use error::{DiagnosticKind, FatalError, SemaError, SemaResult};
pub use expr::ExprTyper;
pub use scope::{FrameKind, ScopeId, ScopeStack, Symbol, SymbolKind};
pub use signature::{Callable, Signature, SignatureRegistry};
pub use symtab::{SymbolRow, SymbolTableReport};
pub use types::{PrimitiveKind, Type, TypeTable, UntypedKind};
pub use universe::Builtin;

use gocheck_ast::Program;

/// Analyzes `program` with the default configuration.
pub fn analyze(program: &Program) -> SemaResult<Analysis> {
    Analyzer::default().analyze(program)
}

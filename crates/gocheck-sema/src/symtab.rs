//! Symbol table report.
//!
//! When enabled, every frame's bindings are captured as the frame is popped.
//! The report prints as a boxed table, one row per declared name.

use crate::scope::{ScopeId, Symbol, SymbolKind};
use crate::types::{Type, TypeTable};
use gocheck_ast::Span;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolRow {
    pub name: String,
    pub scope: ScopeId,
    pub kind: &'static str,
    /// For a type declaration, what it is declared as
    pub ty: String,
    pub constant: bool,
    /// Bytes, when known statically
    pub storage: Option<u64>,
    pub span: Span,
}

#[derive(Debug, Clone, Default)]
pub struct SymbolTableReport {
    rows: Vec<SymbolRow>,
}

impl SymbolTableReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one row per symbol of a popped frame.
    pub fn record(&mut self, symbols: &[Symbol], types: &TypeTable) {
        for symbol in symbols {
            let kind = match symbol.kind {
                SymbolKind::Type => "type",
                SymbolKind::Var => "var",
                SymbolKind::Const => "const",
                SymbolKind::Func => "func",
                SymbolKind::Builtin(_) => "builtin",
                SymbolKind::Package => "package",
            };
            let (ty, storage) = match (&symbol.kind, types.declared_as(&symbol.ty)) {
                (SymbolKind::Type, Some(definition)) => (definition.to_string(), types.storage_size(definition)),
                (SymbolKind::Package, _) => (String::new(), None),
                _ => (symbol.ty.to_string(), storage_of(types, &symbol.ty)),
            };
            self.rows.push(SymbolRow {
                name: symbol.name.to_string(),
                scope: symbol.scope.clone(),
                kind,
                ty,
                constant: symbol.kind == SymbolKind::Const,
                storage,
                span: symbol.span,
            });
        }
    }

    /// Orders rows by scope. Rows of one scope keep declaration order.
    pub fn finish(mut self) -> Self {
        self.rows.sort_by(|a, b| a.scope.cmp(&b.scope));
        self
    }

    pub fn rows(&self) -> &[SymbolRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// First row for `name`, outermost scope first.
    pub fn find(&self, name: &str) -> Option<&SymbolRow> {
        self.rows.iter().find(|row| row.name == name)
    }

    pub fn in_scope<'r>(&'r self, scope: &'r str) -> impl Iterator<Item = &'r SymbolRow> + 'r {
        self.rows.iter().filter(move |row| row.scope.to_string() == scope)
    }
}

fn storage_of(types: &TypeTable, ty: &Type) -> Option<u64> {
    match ty {
        Type::Error | Type::Unit => None,
        _ => types.storage_size(ty),
    }
}

const HEADERS: [&str; 7] = ["Symbol", "Scope", "Offset", "Kind", "Type", "Const", "Storage"];

impl fmt::Display for SymbolTableReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cells: Vec<[String; 7]> = self
            .rows
            .iter()
            .map(|row| {
                [
                    row.name.clone(),
                    row.scope.to_string(),
                    row.span.start.to_string(),
                    row.kind.to_string(),
                    row.ty.clone(),
                    row.constant.to_string(),
                    row.storage.map(|size| size.to_string()).unwrap_or_default(),
                ]
            })
            .collect();

        let mut widths = HEADERS.map(|header| header.chars().count());
        for row in &cells {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }

        for (i, header) in HEADERS.iter().enumerate() {
            let sep = if i == 0 { " " } else { " | " };
            write!(f, "{}{:^width$}", sep, header, width = widths[i])?;
        }
        writeln!(f)?;
        for (i, width) in widths.iter().enumerate() {
            let sep = if i == 0 { "-" } else { "-+-" };
            write!(f, "{}{}", sep, "-".repeat(*width))?;
        }
        writeln!(f, "-")?;
        for row in &cells {
            for (i, cell) in row.iter().enumerate() {
                let sep = if i == 0 { " " } else { " | " };
                // offsets and sizes are right-aligned
                if i == 2 || i == 6 {
                    write!(f, "{}{:>width$}", sep, cell, width = widths[i])?;
                } else {
                    write!(f, "{}{:<width$}", sep, cell, width = widths[i])?;
                }
            }
            writeln!(f)?;
        }
        let count = self.rows.len();
        writeln!(f, "({} {})", count, if count == 1 { "row" } else { "rows" })
    }
}

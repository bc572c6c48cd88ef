//! Scope Stack.
//!
//! Frames are pushed when entering the package, a function body or a block
//! and popped when leaving it. Lookup walks from the innermost frame outward,
//! so an inner declaration shadows an outer one of the same name for the rest
//! of the inner frame. The bottom frame is the universe and is never popped.

use crate::error::SemaError;
use crate::types::Type;
use crate::universe::Builtin;
use gocheck_ast::{Ident, SmolStr, Span};
use indexmap::IndexMap;
use std::fmt;
use tracing::trace;

/// Hierarchical frame id: the universe is `0`, the package `1`, the first
/// function `1.1`, a block inside it `1.1.1`, the second function `1.2`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct ScopeId(Vec<u32>);

impl ScopeId {
    pub fn universe() -> Self {
        ScopeId(Vec::new())
    }

    pub fn is_universe(&self) -> bool {
        self.0.is_empty()
    }

    fn child(&self, ordinal: u32) -> Self {
        let mut path = self.0.clone();
        path.push(ordinal);
        ScopeId(path)
    }
}

impl fmt::Display for ScopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("0");
        }
        for (i, part) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{}", part)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameKind {
    Universe,
    Package,
    Function,
    Block,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    Type,
    Var,
    Const,
    Func,
    Builtin(Builtin),
    /// Imported package name
    Package,
}

impl SymbolKind {
    pub fn describe(&self) -> &'static str {
        match self {
            SymbolKind::Type => "a type",
            SymbolKind::Var => "a variable",
            SymbolKind::Const => "a constant",
            SymbolKind::Func => "a function",
            SymbolKind::Builtin(_) => "a builtin function",
            SymbolKind::Package => "a package",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Symbol {
    pub name: SmolStr,
    pub kind: SymbolKind,
    pub ty: Type,
    /// Declaration site; dummy for predeclared names
    pub span: Span,
    pub scope: ScopeId,
    pub depth: usize,
}

impl Symbol {
    pub fn is_type(&self) -> bool {
        self.kind == SymbolKind::Type
    }

    /// Can be used as an operand.
    pub fn is_value(&self) -> bool {
        matches!(self.kind, SymbolKind::Var | SymbolKind::Const | SymbolKind::Func)
    }
}

#[derive(Debug)]
struct Frame {
    id: ScopeId,
    kind: FrameKind,
    symbols: IndexMap<SmolStr, Symbol>,
    children: u32,
}

impl Frame {
    fn new(id: ScopeId, kind: FrameKind) -> Self {
        Self {
            id,
            kind,
            symbols: IndexMap::new(),
            children: 0,
        }
    }
}

#[derive(Debug)]
pub struct ScopeStack {
    frames: Vec<Frame>,
}

impl Default for ScopeStack {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopeStack {
    /// A stack holding only the (empty) universe frame.
    pub fn new() -> Self {
        Self {
            frames: vec![Frame::new(ScopeId::universe(), FrameKind::Universe)],
        }
    }

    pub fn push(&mut self, kind: FrameKind) -> ScopeId {
        let parent = self.innermost_mut();
        parent.children += 1;
        let id = parent.id.child(parent.children);
        trace!(scope = %id, ?kind, "enter scope");
        self.frames.push(Frame::new(id.clone(), kind));
        id
    }

    /// Leaves the innermost frame and hands back what it declared, in
    /// declaration order. The universe frame stays.
    pub fn pop(&mut self) -> Vec<Symbol> {
        if self.frames.len() <= 1 {
            return Vec::new();
        }
        match self.frames.pop() {
            Some(frame) => {
                trace!(scope = %frame.id, symbols = frame.symbols.len(), "leave scope");
                frame.symbols.into_values().collect()
            }
            None => Vec::new(),
        }
    }

    /// Number of frames above the universe.
    pub fn depth(&self) -> usize {
        self.frames.len() - 1
    }

    pub fn current_id(&self) -> ScopeId {
        self.innermost().id.clone()
    }

    pub fn current_kind(&self) -> FrameKind {
        self.innermost().kind
    }

    fn innermost(&self) -> &Frame {
        // `frames` always holds the universe
        &self.frames[self.frames.len() - 1]
    }

    fn innermost_mut(&mut self) -> &mut Frame {
        let last = self.frames.len() - 1;
        &mut self.frames[last]
    }

    /// Binds `name` in the innermost frame. The blank identifier `_` is
    /// accepted and never bound.
    pub fn bind(&mut self, name: &Ident, kind: SymbolKind, ty: Type) -> Result<(), SemaError> {
        if name.node == "_" {
            return Ok(());
        }
        let depth = self.depth();
        let frame = self.innermost_mut();
        if let Some(previous) = frame.symbols.get(&name.node) {
            let name_text = name.node.to_string();
            return Err(if kind == SymbolKind::Type {
                SemaError::DuplicateTypeDeclaration {
                    name: name_text,
                    span: name.span,
                    previous: previous.span,
                }
            } else {
                SemaError::DuplicateBinding {
                    name: name_text,
                    span: name.span,
                    previous: previous.span,
                }
            });
        }
        trace!(name = %name.node, scope = %frame.id, ?kind, "bind");
        let symbol = Symbol {
            name: name.node.clone(),
            kind,
            ty,
            span: name.span,
            scope: frame.id.clone(),
            depth,
        };
        frame.symbols.insert(name.node.clone(), symbol);
        Ok(())
    }

    /// Binds a predeclared name in the innermost frame, replacing any
    /// previous binding.
    pub fn predeclare(&mut self, name: &str, kind: SymbolKind, ty: Type) {
        let depth = self.depth();
        let frame = self.innermost_mut();
        let name = SmolStr::new(name);
        let symbol = Symbol {
            name: name.clone(),
            kind,
            ty,
            span: Span::dummy(),
            scope: frame.id.clone(),
            depth,
        };
        frame.symbols.insert(name, symbol);
    }

    /// Sets the type of the innermost-frame binding made by the declaration
    /// `name`. A duplicate declaration of the same name leaves the first one
    /// untouched.
    pub fn refine(&mut self, name: &Ident, kind: SymbolKind, ty: Type) {
        let frame = self.innermost_mut();
        if let Some(symbol) = frame.symbols.get_mut(&name.node) {
            if symbol.span == name.span && symbol.kind == kind {
                trace!(name = %name.node, scope = %frame.id, "refine");
                symbol.ty = ty;
            }
        }
    }

    /// Innermost binding of `name`, or `UnknownIdentifier` at the use site.
    pub fn lookup(&self, name: &Ident) -> Result<&Symbol, SemaError> {
        self.find(&name.node).ok_or_else(|| SemaError::UnknownIdentifier {
            name: name.node.to_string(),
            span: name.span,
            similar: Vec::new(),
        })
    }

    pub fn find(&self, name: &str) -> Option<&Symbol> {
        self.frames.iter().rev().find_map(|frame| frame.symbols.get(name))
    }

    /// Binding of `name` in the innermost frame only.
    pub fn lookup_local(&self, name: &str) -> Option<&Symbol> {
        self.innermost().symbols.get(name)
    }

    /// Visible names close to `name` by edit distance, nearest first.
    pub fn similar_names<F>(&self, name: &str, limit: usize, accept: F) -> Vec<String>
    where
        F: Fn(&Symbol) -> bool,
    {
        let threshold = (name.chars().count() / 3).max(1);
        let mut candidates: Vec<(usize, &str)> = Vec::new();
        for frame in self.frames.iter().rev() {
            for (candidate, symbol) in &frame.symbols {
                if candidate == name || !accept(symbol) {
                    continue;
                }
                // shadowed bindings are not reachable by name
                if self.find(candidate).map(|visible| visible.scope != symbol.scope).unwrap_or(false) {
                    continue;
                }
                let distance = strsim::levenshtein(name, candidate);
                if distance <= threshold {
                    candidates.push((distance, candidate.as_str()));
                }
            }
        }
        candidates.sort();
        candidates.dedup();
        candidates
            .into_iter()
            .take(limit)
            .map(|(_, candidate)| candidate.to_string())
            .collect()
    }
}

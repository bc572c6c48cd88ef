//! Predeclared names.

use crate::scope::{ScopeStack, SymbolKind};
use crate::types::{PrimitiveKind, Type, TypeTable, UntypedKind};
use std::fmt;

/// Builtin functions. Their calls are checked by dedicated rules instead of
/// a fixed signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Builtin {
    Len,
    Cap,
    Append,
    Print,
    Println,
}

impl Builtin {
    pub const ALL: [Builtin; 5] = [Builtin::Len, Builtin::Cap, Builtin::Append, Builtin::Print, Builtin::Println];

    pub fn name(self) -> &'static str {
        match self {
            Builtin::Len => "len",
            Builtin::Cap => "cap",
            Builtin::Append => "append",
            Builtin::Print => "print",
            Builtin::Println => "println",
        }
    }
}

impl fmt::Display for Builtin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Fills the universe frame: primitive types, `byte` and `rune`, `true` and
/// `false`, and the builtin functions. Must run before any frame is pushed.
pub fn install(scopes: &mut ScopeStack, types: &mut TypeTable) {
    for kind in PrimitiveKind::ALL {
        scopes.predeclare(kind.name(), SymbolKind::Type, Type::Primitive(kind));
    }
    for (name, target) in [("byte", PrimitiveKind::Uint8), ("rune", PrimitiveKind::Int32)] {
        let alias = types.new_alias(name.into(), Type::Primitive(target));
        scopes.predeclare(name, SymbolKind::Type, alias);
    }
    for name in ["true", "false"] {
        scopes.predeclare(name, SymbolKind::Const, Type::Untyped(UntypedKind::Bool));
    }
    for builtin in Builtin::ALL {
        scopes.predeclare(builtin.name(), SymbolKind::Builtin(builtin), Type::Error);
    }
}

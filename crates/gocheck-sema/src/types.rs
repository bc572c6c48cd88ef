//! Type Table.
//!
//! Types are plain values. Named types and aliases are represented by ids
//! into the table, so a `Type` can be cloned, compared and sent across
//! threads without dragging the table along. The table holds what those ids
//! stand for: a named type's definition and an alias's target.
//!
//! Identity rules:
//! - an alias is transparent: resolution follows alias chains until a
//!   non-alias type is reached, bounded by `max_alias_depth`;
//! - a named type is opaque: two named types are identical only if they are
//!   the same declaration, whatever their underlying types are.

use crate::error::{FatalError, SemaError, SemaResult};
use crate::scope::{ScopeId, ScopeStack, SymbolKind};
use crate::signature::Signature;
use gocheck_ast::{Ident, SmolStr, Span, TypeDeclKind};
use rustc_hash::FxHashSet;
use std::fmt;

// ============================================================================
// Primitive and untyped kinds
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PrimitiveKind {
    Bool,
    String,
    Int,
    Int8,
    Int16,
    Int32,
    Int64,
    Uint,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Float32,
    Float64,
    Complex64,
    Complex128,
}

impl PrimitiveKind {
    pub const ALL: [PrimitiveKind; 16] = [
        PrimitiveKind::Bool,
        PrimitiveKind::String,
        PrimitiveKind::Int,
        PrimitiveKind::Int8,
        PrimitiveKind::Int16,
        PrimitiveKind::Int32,
        PrimitiveKind::Int64,
        PrimitiveKind::Uint,
        PrimitiveKind::Uint8,
        PrimitiveKind::Uint16,
        PrimitiveKind::Uint32,
        PrimitiveKind::Uint64,
        PrimitiveKind::Float32,
        PrimitiveKind::Float64,
        PrimitiveKind::Complex64,
        PrimitiveKind::Complex128,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PrimitiveKind::Bool => "bool",
            PrimitiveKind::String => "string",
            PrimitiveKind::Int => "int",
            PrimitiveKind::Int8 => "int8",
            PrimitiveKind::Int16 => "int16",
            PrimitiveKind::Int32 => "int32",
            PrimitiveKind::Int64 => "int64",
            PrimitiveKind::Uint => "uint",
            PrimitiveKind::Uint8 => "uint8",
            PrimitiveKind::Uint16 => "uint16",
            PrimitiveKind::Uint32 => "uint32",
            PrimitiveKind::Uint64 => "uint64",
            PrimitiveKind::Float32 => "float32",
            PrimitiveKind::Float64 => "float64",
            PrimitiveKind::Complex64 => "complex64",
            PrimitiveKind::Complex128 => "complex128",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    pub fn is_integer(self) -> bool {
        matches!(
            self,
            PrimitiveKind::Int
                | PrimitiveKind::Int8
                | PrimitiveKind::Int16
                | PrimitiveKind::Int32
                | PrimitiveKind::Int64
                | PrimitiveKind::Uint
                | PrimitiveKind::Uint8
                | PrimitiveKind::Uint16
                | PrimitiveKind::Uint32
                | PrimitiveKind::Uint64
        )
    }

    pub fn is_float(self) -> bool {
        matches!(self, PrimitiveKind::Float32 | PrimitiveKind::Float64)
    }

    pub fn is_complex(self) -> bool {
        matches!(self, PrimitiveKind::Complex64 | PrimitiveKind::Complex128)
    }

    pub fn is_numeric(self) -> bool {
        self.is_integer() || self.is_float() || self.is_complex()
    }

    /// Supports `<`, `<=`, `>`, `>=`.
    pub fn is_ordered(self) -> bool {
        self.is_integer() || self.is_float() || self == PrimitiveKind::String
    }

    /// Storage size in bytes on a 64-bit target; strings count their header.
    pub fn size_in_bytes(self) -> u64 {
        match self {
            PrimitiveKind::Bool | PrimitiveKind::Int8 | PrimitiveKind::Uint8 => 1,
            PrimitiveKind::Int16 | PrimitiveKind::Uint16 => 2,
            PrimitiveKind::Int32 | PrimitiveKind::Uint32 | PrimitiveKind::Float32 => 4,
            PrimitiveKind::Int
            | PrimitiveKind::Int64
            | PrimitiveKind::Uint
            | PrimitiveKind::Uint64
            | PrimitiveKind::Float64
            | PrimitiveKind::Complex64 => 8,
            PrimitiveKind::String | PrimitiveKind::Complex128 => 16,
        }
    }
}

/// Kind of an untyped constant: a literal, or an expression built only
/// from constants. Context decides its final type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum UntypedKind {
    Bool,
    Int,
    Rune,
    Float,
    String,
}

impl UntypedKind {
    pub fn name(self) -> &'static str {
        match self {
            UntypedKind::Bool => "untyped bool",
            UntypedKind::Int => "untyped int",
            UntypedKind::Rune => "untyped rune",
            UntypedKind::Float => "untyped float",
            UntypedKind::String => "untyped string",
        }
    }

    /// Type a variable gets when initialized from this constant without a declared type.
    pub fn default_kind(self) -> PrimitiveKind {
        match self {
            UntypedKind::Bool => PrimitiveKind::Bool,
            UntypedKind::Int => PrimitiveKind::Int,
            UntypedKind::Rune => PrimitiveKind::Int32,
            UntypedKind::Float => PrimitiveKind::Float64,
            UntypedKind::String => PrimitiveKind::String,
        }
    }

    pub fn is_numeric(self) -> bool {
        matches!(self, UntypedKind::Int | UntypedKind::Rune | UntypedKind::Float)
    }

    pub fn is_integer(self) -> bool {
        matches!(self, UntypedKind::Int | UntypedKind::Rune)
    }

    /// Kind of an arithmetic result between two untyped numeric constants.
    pub fn max_rank(self, other: UntypedKind) -> UntypedKind {
        fn rank(kind: UntypedKind) -> u8 {
            match kind {
                UntypedKind::Int => 0,
                UntypedKind::Rune => 1,
                UntypedKind::Float => 2,
                UntypedKind::Bool | UntypedKind::String => 0,
            }
        }
        if rank(other) > rank(self) {
            other
        } else {
            self
        }
    }

    /// Whether a constant of this kind may take the primitive type `target`.
    pub fn fits(self, target: PrimitiveKind, widening: bool) -> bool {
        match self {
            UntypedKind::Bool => target == PrimitiveKind::Bool,
            UntypedKind::String => target == PrimitiveKind::String,
            UntypedKind::Int | UntypedKind::Rune => target.is_numeric(),
            UntypedKind::Float => target.is_float() || target.is_complex() || (widening && target.is_integer()),
        }
    }
}

// ============================================================================
// Types
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NamedTypeId(u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AliasId(u32);

impl NamedTypeId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

impl AliasId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    Primitive(PrimitiveKind),
    Untyped(UntypedKind),
    /// `type boolean bool`: a new identity
    Named { id: NamedTypeId, name: SmolStr },
    /// `type al_bool0 = bool`: another spelling of its target
    Alias { id: AliasId, name: SmolStr },
    FixedArray { element: Box<Type>, len: u64 },
    Sequence(Box<Type>),
    Function(Signature),
    /// Result of calling a function that returns nothing
    Unit,
    /// Stands in for anything that already failed to type; compatible with everything
    Error,
}

impl Type {
    pub fn primitive(kind: PrimitiveKind) -> Type {
        Type::Primitive(kind)
    }

    pub fn fixed_array(element: Type, len: u64) -> Type {
        Type::FixedArray {
            element: Box::new(element),
            len,
        }
    }

    pub fn sequence(element: Type) -> Type {
        Type::Sequence(Box::new(element))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Type::Error)
    }

    // The predicates below are meant for underlying types, as returned by
    // `TypeTable::underlying`.

    pub fn is_boolean(&self) -> bool {
        matches!(self, Type::Primitive(PrimitiveKind::Bool) | Type::Untyped(UntypedKind::Bool))
    }

    pub fn is_string(&self) -> bool {
        matches!(self, Type::Primitive(PrimitiveKind::String) | Type::Untyped(UntypedKind::String))
    }

    pub fn is_numeric(&self) -> bool {
        match self {
            Type::Primitive(kind) => kind.is_numeric(),
            Type::Untyped(kind) => kind.is_numeric(),
            _ => false,
        }
    }

    pub fn is_integer(&self) -> bool {
        match self {
            Type::Primitive(kind) => kind.is_integer(),
            Type::Untyped(kind) => kind.is_integer(),
            _ => false,
        }
    }

    pub fn is_ordered(&self) -> bool {
        match self {
            Type::Primitive(kind) => kind.is_ordered(),
            Type::Untyped(kind) => *kind != UntypedKind::Bool,
            _ => false,
        }
    }

    /// Supports `==` and `!=`.
    pub fn is_comparable(&self) -> bool {
        !matches!(self, Type::Sequence(_) | Type::Function(_) | Type::Unit)
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Primitive(kind) => f.write_str(kind.name()),
            Type::Untyped(kind) => f.write_str(kind.name()),
            Type::Named { name, .. } | Type::Alias { name, .. } => f.write_str(name),
            Type::FixedArray { element, len } => write!(f, "[{}]{}", len, element),
            Type::Sequence(element) => write!(f, "[]{}", element),
            Type::Function(signature) => write!(f, "{}", signature),
            Type::Unit => f.write_str("no value"),
            Type::Error => f.write_str("invalid type"),
        }
    }
}

// ============================================================================
// Type Table
// ============================================================================

#[derive(Debug, Clone)]
struct NamedEntry {
    name: SmolStr,
    definition: Type,
    scope: ScopeId,
}

#[derive(Debug, Clone)]
struct AliasEntry {
    target: Type,
}

/// Definitions behind named-type and alias ids.
#[derive(Debug, Clone)]
pub struct TypeTable {
    named: Vec<NamedEntry>,
    aliases: Vec<AliasEntry>,
    max_alias_depth: usize,
}

impl Default for TypeTable {
    fn default() -> Self {
        Self::new(64)
    }
}

impl TypeTable {
    pub fn new(max_alias_depth: usize) -> Self {
        Self {
            named: Vec::new(),
            aliases: Vec::new(),
            max_alias_depth,
        }
    }

    /// Declares `name` in the innermost scope as a named type or an alias of `definition`.
    pub fn declare(
        &mut self,
        scopes: &mut ScopeStack,
        name: &Ident,
        kind: TypeDeclKind,
        definition: Type,
    ) -> Result<Type, SemaError> {
        let ty = self.declare_pending(scopes, name, kind)?;
        self.define(&ty, definition);
        Ok(ty)
    }

    /// Declares `name` without a definition yet, so the definition may refer
    /// to `name` itself or to types declared after it. Complete with [`define`](Self::define).
    pub fn declare_pending(
        &mut self,
        scopes: &mut ScopeStack,
        name: &Ident,
        kind: TypeDeclKind,
    ) -> Result<Type, SemaError> {
        if let Some(previous) = scopes.lookup_local(&name.node) {
            return Err(SemaError::DuplicateTypeDeclaration {
                name: name.node.to_string(),
                span: name.span,
                previous: previous.span,
            });
        }
        let ty = match kind {
            TypeDeclKind::Named => self.new_named(name.node.clone(), scopes.current_id()),
            TypeDeclKind::Alias => self.new_alias(name.node.clone(), Type::Error),
        };
        scopes.bind(name, SymbolKind::Type, ty.clone())?;
        Ok(ty)
    }

    pub fn define(&mut self, ty: &Type, definition: Type) {
        match ty {
            Type::Named { id, .. } => {
                if let Some(entry) = self.named.get_mut(id.index()) {
                    entry.definition = definition;
                }
            }
            Type::Alias { id, .. } => {
                if let Some(entry) = self.aliases.get_mut(id.index()) {
                    entry.target = definition;
                }
            }
            _ => {}
        }
    }

    pub(crate) fn new_named(&mut self, name: SmolStr, scope: ScopeId) -> Type {
        let id = NamedTypeId(self.named.len() as u32);
        self.named.push(NamedEntry {
            name: name.clone(),
            definition: Type::Error,
            scope,
        });
        Type::Named { id, name }
    }

    pub(crate) fn new_alias(&mut self, name: SmolStr, target: Type) -> Type {
        let id = AliasId(self.aliases.len() as u32);
        self.aliases.push(AliasEntry { target });
        Type::Alias { id, name }
    }

    /// What a declared name stands for: a named type's definition or an alias's target.
    pub fn declared_as(&self, ty: &Type) -> Option<&Type> {
        match ty {
            Type::Named { id, .. } => self.named.get(id.index()).map(|entry| &entry.definition),
            Type::Alias { id, .. } => self.aliases.get(id.index()).map(|entry| &entry.target),
            _ => None,
        }
    }

    /// Canonical form of `ty`: every alias, at any depth, replaced by what it
    /// finally stands for. Named types are kept. Resolving a canonical type
    /// returns it unchanged.
    pub fn resolve(&self, ty: &Type) -> SemaResult<Type> {
        self.resolve_within(ty, 0)
    }

    fn resolve_within(&self, ty: &Type, depth: usize) -> SemaResult<Type> {
        let (head, depth) = self.resolve_head(ty, depth)?;
        Ok(match head {
            Type::FixedArray { element, len } => Type::FixedArray {
                element: Box::new(self.resolve_within(element, depth)?),
                len: *len,
            },
            Type::Sequence(element) => Type::Sequence(Box::new(self.resolve_within(element, depth)?)),
            Type::Function(signature) => {
                let mut params = Vec::with_capacity(signature.params.len());
                for param in &signature.params {
                    params.push(self.resolve_within(param, depth)?);
                }
                Type::Function(Signature::new(params, self.resolve_within(&signature.result, depth)?))
            }
            other => other.clone(),
        })
    }

    /// Follows the alias chain at the top of `ty`.
    fn resolve_head<'t>(&'t self, ty: &'t Type, mut depth: usize) -> SemaResult<(&'t Type, usize)> {
        let mut current = ty;
        while let Type::Alias { id, name } = current {
            let entry = match self.aliases.get(id.index()) {
                Some(entry) if depth < self.max_alias_depth => entry,
                _ => {
                    return Err(FatalError::UnresolvedAlias {
                        name: name.to_string(),
                        depth,
                    })
                }
            };
            current = &entry.target;
            depth += 1;
        }
        Ok((current, depth))
    }

    /// The type's structure: named types are unwrapped to their definition,
    /// repeatedly, then resolved.
    pub fn underlying(&self, ty: &Type) -> SemaResult<Type> {
        let mut current = self.resolve(ty)?;
        let mut steps = 0;
        while let Type::Named { id, name } = &current {
            if steps >= self.max_alias_depth {
                return Err(FatalError::UnresolvedAlias {
                    name: name.to_string(),
                    depth: steps,
                });
            }
            let definition = match self.named.get(id.index()) {
                Some(entry) => entry.definition.clone(),
                None => Type::Error,
            };
            current = self.resolve(&definition)?;
            steps += 1;
        }
        Ok(current)
    }

    pub fn identical(&self, a: &Type, b: &Type) -> SemaResult<bool> {
        Ok(self.resolve(a)? == self.resolve(b)?)
    }

    pub fn same_underlying(&self, a: &Type, b: &Type) -> SemaResult<bool> {
        Ok(self.underlying(a)? == self.underlying(b)?)
    }

    /// Whether a value of type `value` may be used where `target` is expected.
    ///
    /// Typed values must be identical to the target. Untyped constants fit any
    /// target whose underlying type is a primitive of a compatible kind.
    pub fn is_assignable(&self, value: &Type, target: &Type, widening: bool) -> SemaResult<bool> {
        if value.is_error() || target.is_error() {
            return Ok(true);
        }
        let value = self.resolve(value)?;
        let target = self.resolve(target)?;
        if value == target {
            return Ok(true);
        }
        match value {
            Type::Untyped(kind) => Ok(match self.underlying(&target)? {
                Type::Primitive(primitive) => kind.fits(primitive, widening),
                Type::Error => true,
                _ => false,
            }),
            _ => Ok(false),
        }
    }

    /// `AssignmentMismatch` for `value` used where `target` is expected, if any.
    pub fn assignment_error(
        &self,
        value: &Type,
        target: &Type,
        widening: bool,
        context: &str,
        span: Span,
    ) -> SemaResult<Option<SemaError>> {
        if self.is_assignable(value, target, widening)? {
            return Ok(None);
        }
        let (expected, found) = self.describe_pair(target, value);
        Ok(Some(SemaError::AssignmentMismatch {
            expected,
            found,
            context: context.to_string(),
            span,
        }))
    }

    /// Whether `T(value)` is a valid conversion to `target`.
    pub fn convertible(&self, value: &Type, target: &Type) -> SemaResult<bool> {
        if self.is_assignable(value, target, true)? {
            return Ok(true);
        }
        let from = self.underlying(value)?;
        let to = self.underlying(target)?;
        if from == to {
            return Ok(true);
        }
        Ok(match (&from, &to) {
            (Type::Primitive(_) | Type::Untyped(_), Type::Primitive(to_kind)) => {
                (from.is_numeric() && to_kind.is_numeric())
                    || (from.is_integer() && *to_kind == PrimitiveKind::String)
            }
            _ => false,
        })
    }

    /// The type a variable takes when initialized from a value of type `ty`.
    pub fn default_type(&self, ty: &Type) -> Type {
        match ty {
            Type::Untyped(kind) => Type::Primitive(kind.default_kind()),
            other => other.clone(),
        }
    }

    /// Canonical spelling of `ty`, aliases spelled as what they stand for.
    pub fn describe(&self, ty: &Type) -> String {
        match self.resolve(ty) {
            Ok(resolved) => resolved.to_string(),
            Err(_) => ty.to_string(),
        }
    }

    /// Describes `expected` and `found` for a mismatch message. When both
    /// spell the same (a local named type shadowing an outer one of the same
    /// name), each is qualified with the scope it was declared in.
    pub fn describe_pair(&self, expected: &Type, found: &Type) -> (String, String) {
        let expected_text = self.describe(expected);
        let found_text = self.describe(found);
        if expected_text != found_text {
            return (expected_text, found_text);
        }
        (self.qualified(expected), self.qualified(found))
    }

    fn qualified(&self, ty: &Type) -> String {
        match self.resolve(ty) {
            Ok(Type::Named { id, name }) => match self.named.get(id.index()) {
                Some(entry) => format!("{} (declared in scope {})", entry.name, entry.scope),
                None => name.to_string(),
            },
            _ => self.describe(ty),
        }
    }

    /// Whether the named type `ty` holds a value of itself: its definition
    /// leads back to `ty` through fixed-array elements and named types only.
    /// Sequences and functions refer to their elements indirectly, so
    /// `type list []list` does not contain itself.
    pub fn contains_itself(&self, ty: &Type) -> SemaResult<bool> {
        let Type::Named { id, .. } = ty else {
            return Ok(false);
        };
        let Some(entry) = self.named.get(id.index()) else {
            return Ok(false);
        };
        let mut seen = FxHashSet::default();
        self.holds_by_value(&entry.definition, *id, &mut seen)
    }

    fn holds_by_value(&self, ty: &Type, target: NamedTypeId, seen: &mut FxHashSet<NamedTypeId>) -> SemaResult<bool> {
        let (head, _) = self.resolve_head(ty, 0)?;
        match head {
            Type::Named { id, .. } if *id == target => Ok(true),
            Type::Named { id, .. } => {
                if !seen.insert(*id) {
                    return Ok(false);
                }
                match self.named.get(id.index()) {
                    Some(entry) => self.holds_by_value(&entry.definition, target, seen),
                    None => Ok(false),
                }
            }
            Type::FixedArray { element, .. } => self.holds_by_value(element, target, seen),
            _ => Ok(false),
        }
    }

    /// Storage size in bytes, when it is known statically and fits in a `u64`.
    pub fn storage_size(&self, ty: &Type) -> Option<u64> {
        self.storage_size_within(ty, &mut FxHashSet::default())
    }

    fn storage_size_within(&self, ty: &Type, open: &mut FxHashSet<NamedTypeId>) -> Option<u64> {
        let (head, _) = self.resolve_head(ty, 0).ok()?;
        match head {
            Type::Named { id, .. } => {
                // a type that contains itself has no finite size
                if !open.insert(*id) {
                    return None;
                }
                let size = match self.named.get(id.index()) {
                    Some(entry) => self.storage_size_within(&entry.definition, open),
                    None => None,
                };
                open.remove(id);
                size
            }
            Type::Primitive(kind) => Some(kind.size_in_bytes()),
            Type::Untyped(kind) => Some(kind.default_kind().size_in_bytes()),
            Type::FixedArray { element, len } => self.storage_size_within(element, open)?.checked_mul(*len),
            Type::Sequence(_) => Some(24),
            Type::Function(_) => Some(8),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gocheck_ast::build::ident;
    use crate::scope::FrameKind;
    use pretty_assertions::assert_eq;

    fn int() -> Type {
        Type::Primitive(PrimitiveKind::Int)
    }

    fn bool_ty() -> Type {
        Type::Primitive(PrimitiveKind::Bool)
    }

    fn setup() -> (TypeTable, ScopeStack) {
        let mut scopes = ScopeStack::new();
        scopes.push(FrameKind::Package);
        (TypeTable::new(64), scopes)
    }

    #[test]
    fn test_alias_chain_resolves_to_target() {
        let (mut table, mut scopes) = setup();
        let al0 = table.declare(&mut scopes, &ident("al_bool0"), TypeDeclKind::Alias, bool_ty()).unwrap();
        let al1 = table.declare(&mut scopes, &ident("al_bool1"), TypeDeclKind::Alias, al0).unwrap();
        let al2 = table.declare(&mut scopes, &ident("al_bool2"), TypeDeclKind::Alias, al1).unwrap();

        assert_eq!(table.resolve(&al2).unwrap(), bool_ty());
        assert!(table.identical(&al2, &bool_ty()).unwrap());
        assert!(table.is_assignable(&bool_ty(), &al2, false).unwrap());
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let (mut table, mut scopes) = setup();
        let alias = table
            .declare(&mut scopes, &ident("ints"), TypeDeclKind::Alias, Type::sequence(int()))
            .unwrap();
        let nested = Type::fixed_array(alias, 2);

        let once = table.resolve(&nested).unwrap();
        let twice = table.resolve(&once).unwrap();
        assert_eq!(once, Type::fixed_array(Type::sequence(int()), 2));
        assert_eq!(once, twice);
        assert_eq!(table.resolve(&int()).unwrap(), int());
    }

    #[test]
    fn test_named_type_is_not_its_underlying_type() {
        let (mut table, mut scopes) = setup();
        let boolean = table.declare(&mut scopes, &ident("boolean"), TypeDeclKind::Named, bool_ty()).unwrap();

        assert!(!table.is_assignable(&bool_ty(), &boolean, false).unwrap());
        assert!(!table.is_assignable(&boolean, &bool_ty(), false).unwrap());
        assert!(table.same_underlying(&boolean, &bool_ty()).unwrap());
        assert_eq!(table.underlying(&boolean).unwrap(), bool_ty());
    }

    #[test]
    fn test_untyped_constants_follow_context() {
        let (mut table, mut scopes) = setup();
        let boolean = table.declare(&mut scopes, &ident("boolean"), TypeDeclKind::Named, int()).unwrap();
        let untyped_int = Type::Untyped(UntypedKind::Int);
        let untyped_float = Type::Untyped(UntypedKind::Float);

        assert!(table.is_assignable(&untyped_int, &boolean, false).unwrap());
        assert!(table.is_assignable(&untyped_int, &Type::Primitive(PrimitiveKind::Float32), false).unwrap());
        assert!(!table.is_assignable(&untyped_float, &int(), false).unwrap());
        assert!(table.is_assignable(&untyped_float, &int(), true).unwrap());
        assert!(!table.is_assignable(&Type::Untyped(UntypedKind::String), &int(), true).unwrap());
    }

    #[test]
    fn test_fixed_array_and_sequence_never_mix() {
        let table = TypeTable::default();
        let array = Type::fixed_array(int(), 2);
        let slice = Type::sequence(int());

        assert!(!table.is_assignable(&array, &slice, true).unwrap());
        assert!(!table.is_assignable(&slice, &array, true).unwrap());
        assert!(!table.is_assignable(&Type::fixed_array(int(), 3), &array, true).unwrap());
        assert!(table.is_assignable(&Type::fixed_array(int(), 2), &array, false).unwrap());
    }

    #[test]
    fn test_alias_cycle_is_fatal() {
        let (mut table, mut scopes) = setup();
        let a = table.declare_pending(&mut scopes, &ident("A"), TypeDeclKind::Alias).unwrap();
        let b = table.declare(&mut scopes, &ident("B"), TypeDeclKind::Alias, a.clone()).unwrap();
        table.define(&a, b);

        let error = table.resolve(&a).unwrap_err();
        assert!(matches!(error, FatalError::UnresolvedAlias { depth: 64, .. }));
    }

    #[test]
    fn test_recursive_named_type_is_fine() {
        let (mut table, mut scopes) = setup();
        let list = table.declare_pending(&mut scopes, &ident("List"), TypeDeclKind::Named).unwrap();
        table.define(&list, Type::sequence(list.clone()));

        assert_eq!(table.underlying(&list).unwrap(), Type::sequence(list.clone()));
        assert_eq!(table.describe(&list), "List");
    }

    #[test]
    fn test_duplicate_declaration_points_at_previous() {
        let (mut table, mut scopes) = setup();
        let first = gocheck_ast::Spanned::new(SmolStr::new("boolean"), Span::new(10, 17));
        let second = gocheck_ast::Spanned::new(SmolStr::new("boolean"), Span::new(40, 47));
        table.declare(&mut scopes, &first, TypeDeclKind::Named, bool_ty()).unwrap();

        let error = table.declare(&mut scopes, &second, TypeDeclKind::Named, int()).unwrap_err();
        assert_eq!(
            error,
            SemaError::DuplicateTypeDeclaration {
                name: "boolean".into(),
                span: Span::new(40, 47),
                previous: Span::new(10, 17),
            }
        );
    }

    #[test]
    fn test_describe_pair_qualifies_shadowed_names() {
        let (mut table, mut scopes) = setup();
        let outer = table.declare(&mut scopes, &ident("boolean"), TypeDeclKind::Named, bool_ty()).unwrap();
        scopes.push(FrameKind::Function);
        let inner = table.declare(&mut scopes, &ident("boolean"), TypeDeclKind::Named, int()).unwrap();

        let (expected, found) = table.describe_pair(&outer, &inner);
        assert_eq!(expected, "boolean (declared in scope 1)");
        assert_eq!(found, "boolean (declared in scope 1.1)");
    }

    #[test]
    fn test_conversions() {
        let (mut table, mut scopes) = setup();
        let boolean = table.declare(&mut scopes, &ident("boolean"), TypeDeclKind::Named, bool_ty()).unwrap();
        let float = Type::Primitive(PrimitiveKind::Float64);

        assert!(table.convertible(&bool_ty(), &boolean).unwrap());
        assert!(table.convertible(&float, &int()).unwrap());
        assert!(table.convertible(&int(), &Type::Primitive(PrimitiveKind::String)).unwrap());
        assert!(!table.convertible(&Type::Primitive(PrimitiveKind::String), &int()).unwrap());
        assert!(!table.convertible(&Type::sequence(int()), &int()).unwrap());
    }

    #[test]
    fn test_storage_sizes() {
        let table = TypeTable::default();
        assert_eq!(table.storage_size(&int()), Some(8));
        assert_eq!(table.storage_size(&Type::Primitive(PrimitiveKind::Complex128)), Some(16));
        assert_eq!(table.storage_size(&Type::fixed_array(Type::Primitive(PrimitiveKind::Int32), 6)), Some(24));
        assert_eq!(table.storage_size(&Type::Error), None);
    }

    #[test]
    fn test_storage_size_overflow_is_unknown() {
        let table = TypeTable::default();
        let big = Type::fixed_array(Type::Primitive(PrimitiveKind::Int64), 1 << 62);
        assert_eq!(table.storage_size(&big), None);
        assert_eq!(table.storage_size(&Type::fixed_array(big, 2)), None);
    }

    #[test]
    fn test_array_of_itself_contains_itself() {
        let (mut table, mut scopes) = setup();
        let t = table.declare_pending(&mut scopes, &ident("T"), TypeDeclKind::Named).unwrap();
        table.define(&t, Type::fixed_array(t.clone(), 2));

        assert!(table.contains_itself(&t).unwrap());
        assert_eq!(table.storage_size(&t), None);
    }

    #[test]
    fn test_containment_through_other_types() {
        let (mut table, mut scopes) = setup();
        let a = table.declare_pending(&mut scopes, &ident("A"), TypeDeclKind::Named).unwrap();
        let b = table.declare_pending(&mut scopes, &ident("B"), TypeDeclKind::Named).unwrap();
        let al = table.declare_pending(&mut scopes, &ident("al_a"), TypeDeclKind::Alias).unwrap();
        let list = table.declare_pending(&mut scopes, &ident("List"), TypeDeclKind::Named).unwrap();
        table.define(&a, Type::fixed_array(b.clone(), 3));
        table.define(&b, Type::fixed_array(al.clone(), 1));
        table.define(&al, a.clone());
        table.define(&list, Type::fixed_array(Type::sequence(list.clone()), 4));

        assert!(table.contains_itself(&a).unwrap());
        assert!(table.contains_itself(&b).unwrap());
        assert!(!table.contains_itself(&list).unwrap());
        assert_eq!(table.storage_size(&list), Some(96));
        assert!(!table.contains_itself(&int()).unwrap());
    }
}

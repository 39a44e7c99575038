// src/types/core.rs
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use serde::{Deserialize, Serialize};

use crate::types::decl::AssocTypeRef;
use crate::types::param::GenericTypeParamType;

/// Identifies one [`ArchetypeArena`](crate::context::ArchetypeArena).
/// Every arena draws a fresh one when it is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ArenaId(pub u32);

impl fmt::Display for ArenaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "arena{}", self.0)
    }
}

/// A unique identifier for an archetype: the arena that allocated it plus
/// its index in that arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ArchetypeId {
    pub arena: ArenaId,
    pub index: u32,
}

impl ArchetypeId {
    pub fn new(arena: ArenaId, index: u32) -> Self {
        Self { arena, index }
    }
}

impl fmt::Display for ArchetypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "a{}.{}", self.arena.0, self.index)
    }
}

/// A reference to an archetype from inside a type tree.
///
/// Identity is the archetype id alone (arena included); the name is carried
/// along so types can be printed without going back to the arena.
#[derive(Debug, Clone, Eq)]
pub struct ArchetypeType {
    pub id: ArchetypeId,
    pub name: Arc<str>,
}

impl PartialEq for ArchetypeType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Hash for ArchetypeType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrimitiveType {
    I32,
    I64,
    F64,
    Bool,
    String,
    Unit,
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PrimitiveType::I32 => "i32",
            PrimitiveType::I64 => "i64",
            PrimitiveType::F64 => "f64",
            PrimitiveType::Bool => "bool",
            PrimitiveType::String => "string",
            PrimitiveType::Unit => "()",
        };
        f.write_str(name)
    }
}

/// Calling convention of a lowered function type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoweredConvention {
    Thin,
    Thick,
    Method,
}

/// A function type after lowering: parameters and results are explicit lists
/// and the convention is fixed. Substitution only reaches into these when
/// explicitly allowed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LoweredFunctionType {
    pub convention: LoweredConvention,
    pub params: Vec<Ty>,
    pub results: Vec<Ty>,
}

/// A type tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Ty {
    pub kind: TyKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TyKind {
    Primitive(PrimitiveType),
    /// A nominal type with generic arguments, e.g. `Array<T>`.
    Named { name: String, args: Vec<Ty> },
    Tuple(Vec<Ty>),
    Function(Vec<Ty>, Arc<Ty>),
    /// An abstract generic parameter (interface type).
    GenericParam(GenericTypeParamType),
    /// An associated-type projection `Base.Assoc` (interface type).
    DependentMember { base: Arc<Ty>, assoc: AssocTypeRef },
    /// A contextual type valid inside one generic environment.
    Archetype(ArchetypeType),
    Lowered(LoweredFunctionType),
    /// Marker left behind by an earlier, already diagnosed failure.
    Error,
}

impl Ty {
    pub fn new(kind: TyKind) -> Self {
        Self { kind }
    }

    pub fn primitive(prim: PrimitiveType) -> Self {
        Self::new(TyKind::Primitive(prim))
    }

    pub fn named(name: impl Into<String>, args: Vec<Ty>) -> Self {
        Self::new(TyKind::Named { name: name.into(), args })
    }

    pub fn tuple(elems: Vec<Ty>) -> Self {
        Self::new(TyKind::Tuple(elems))
    }

    pub fn function(params: Vec<Ty>, ret: Ty) -> Self {
        Self::new(TyKind::Function(params, Arc::new(ret)))
    }

    pub fn param(param: GenericTypeParamType) -> Self {
        Self::new(TyKind::GenericParam(param))
    }

    pub fn dependent_member(base: Ty, assoc: AssocTypeRef) -> Self {
        Self::new(TyKind::DependentMember { base: Arc::new(base), assoc })
    }

    pub fn archetype(archetype: ArchetypeType) -> Self {
        Self::new(TyKind::Archetype(archetype))
    }

    pub fn lowered(convention: LoweredConvention, params: Vec<Ty>, results: Vec<Ty>) -> Self {
        Self::new(TyKind::Lowered(LoweredFunctionType { convention, params, results }))
    }

    pub fn error() -> Self {
        Self::new(TyKind::Error)
    }

    pub fn as_archetype(&self) -> Option<&ArchetypeType> {
        match &self.kind {
            TyKind::Archetype(archetype) => Some(archetype),
            _ => None,
        }
    }

    pub fn as_param(&self) -> Option<&GenericTypeParamType> {
        match &self.kind {
            TyKind::GenericParam(param) => Some(param),
            _ => None,
        }
    }

    /// Returns the base and associated type if this is a projection.
    pub fn as_dependent_member(&self) -> Option<(&Ty, &AssocTypeRef)> {
        match &self.kind {
            TyKind::DependentMember { base, assoc } => Some((base, assoc)),
            _ => None,
        }
    }

    /// `true` for a generic parameter or a projection rooted in one.
    pub fn is_type_parameter(&self) -> bool {
        match &self.kind {
            TyKind::GenericParam(_) => true,
            TyKind::DependentMember { base, .. } => base.is_type_parameter(),
            _ => false,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self.kind, TyKind::Error)
    }

    pub fn has_archetype(&self) -> bool {
        self.any(&|kind| matches!(kind, TyKind::Archetype(_)))
    }

    pub fn has_type_parameter(&self) -> bool {
        self.any(&|kind| matches!(kind, TyKind::GenericParam(_) | TyKind::DependentMember { .. }))
    }

    pub fn has_error(&self) -> bool {
        self.any(&|kind| matches!(kind, TyKind::Error))
    }

    pub fn has_lowered(&self) -> bool {
        self.any(&|kind| matches!(kind, TyKind::Lowered(_)))
    }

    /// Returns `true` if `pred` holds for this node or any node beneath it.
    fn any(&self, pred: &dyn Fn(&TyKind) -> bool) -> bool {
        if pred(&self.kind) {
            return true;
        }
        match &self.kind {
            TyKind::Named { args, .. } => args.iter().any(|arg| arg.any(pred)),
            TyKind::Tuple(elems) => elems.iter().any(|elem| elem.any(pred)),
            TyKind::Function(params, ret) => params.iter().any(|p| p.any(pred)) || ret.any(pred),
            TyKind::DependentMember { base, .. } => base.any(pred),
            TyKind::Lowered(func) => {
                func.params.iter().any(|p| p.any(pred)) || func.results.iter().any(|r| r.any(pred))
            }
            TyKind::Primitive(_) | TyKind::GenericParam(_) | TyKind::Archetype(_) | TyKind::Error => false,
        }
    }

    /// Returns the canonical form of this type: every generic parameter is
    /// replaced by its canonical (unsugared) form.
    pub fn canonical(&self) -> Ty {
        let kind = match &self.kind {
            TyKind::GenericParam(param) => TyKind::GenericParam(param.canonical()),
            TyKind::Named { name, args } => TyKind::Named {
                name: name.clone(),
                args: args.iter().map(Ty::canonical).collect(),
            },
            TyKind::Tuple(elems) => TyKind::Tuple(elems.iter().map(Ty::canonical).collect()),
            TyKind::Function(params, ret) => TyKind::Function(
                params.iter().map(Ty::canonical).collect(),
                Arc::new(ret.canonical()),
            ),
            TyKind::DependentMember { base, assoc } => TyKind::DependentMember {
                base: Arc::new(base.canonical()),
                assoc: assoc.clone(),
            },
            TyKind::Lowered(func) => TyKind::Lowered(LoweredFunctionType {
                convention: func.convention,
                params: func.params.iter().map(Ty::canonical).collect(),
                results: func.results.iter().map(Ty::canonical).collect(),
            }),
            kind @ (TyKind::Primitive(_) | TyKind::Archetype(_) | TyKind::Error) => kind.clone(),
        };
        Ty::new(kind)
    }

    /// Structural equality after canonicalization.
    pub fn is_equal(&self, other: &Ty) -> bool {
        self.canonical() == other.canonical()
    }
}

impl From<GenericTypeParamType> for Ty {
    fn from(param: GenericTypeParamType) -> Self {
        Ty::param(param)
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, tys: &[Ty]) -> fmt::Result {
    for (i, ty) in tys.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{}", ty)?;
    }
    Ok(())
}

impl fmt::Display for Ty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            TyKind::Primitive(prim) => write!(f, "{}", prim),
            TyKind::Named { name, args } if args.is_empty() => f.write_str(name),
            TyKind::Named { name, args } => {
                write!(f, "{}<", name)?;
                write_list(f, args)?;
                f.write_str(">")
            }
            TyKind::Tuple(elems) => {
                f.write_str("(")?;
                write_list(f, elems)?;
                f.write_str(")")
            }
            TyKind::Function(params, ret) => {
                f.write_str("(")?;
                write_list(f, params)?;
                write!(f, ") -> {}", ret)
            }
            TyKind::GenericParam(param) => write!(f, "{}", param),
            TyKind::DependentMember { base, assoc } => write!(f, "{}.{}", base, assoc),
            TyKind::Archetype(archetype) => write!(f, "${}", archetype.name),
            TyKind::Lowered(func) => {
                write!(f, "@{:?} (", func.convention)?;
                write_list(f, &func.params)?;
                f.write_str(") -> (")?;
                write_list(f, &func.results)?;
                f.write_str(")")
            }
            TyKind::Error => f.write_str("<<error type>>"),
        }
    }
}

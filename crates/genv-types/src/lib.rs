//! Type trees for generic environments.
//!
//! This crate holds everything a generic environment consumes rather than
//! owns: interface and contextual type trees, protocols and associated
//! types, the archetype arena, the module scope with its concrete
//! conformances, conformance lookup callbacks and the substitution engine.

pub mod types;
pub mod context;
pub mod conformance;
pub mod subst;

pub use types::{
    ArenaId, ArchetypeId, ArchetypeType, AssocTypeRef, GenericParamKey, GenericTypeParamType, LoweredConvention,
    LoweredFunctionType, PrimitiveType, ProtocolDecl, ProtocolId, Ty, TyKind,
};
pub use context::{ArchetypeArena, ArchetypeData, Module, NormalConformance};
pub use conformance::{LookUpConformanceInModule, LookupConformance, MakeAbstractConformance, ProtocolConformanceRef};
pub use subst::{SubstOptions, Substituter, TypeReplacements};

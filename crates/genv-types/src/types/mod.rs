// src/types/mod.rs
//! Type trees and the declarations they refer to.

pub mod core;
pub mod decl;
pub mod param;

pub use self::core::{
    ArenaId, ArchetypeId, ArchetypeType, LoweredConvention, LoweredFunctionType, PrimitiveType, Ty, TyKind,
};
pub use decl::{AssocTypeRef, ProtocolDecl, ProtocolId};
pub use param::{GenericParamKey, GenericTypeParamType};

// src/conformance.rs
//! Conformance references and the lookup callbacks used while building
//! substitution lists.

use std::fmt;
use std::sync::Arc;

use crate::context::{ArchetypeArena, Module, NormalConformance};
use crate::types::{ProtocolId, Ty, TyKind};

/// How a replacement type satisfies a conformance requirement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProtocolConformanceRef {
    /// The conformance as declared on the protocol itself, with no concrete
    /// witness. Enough for type identity; never enough to execute.
    Abstract(ProtocolId),
    /// A concrete conformance of a nominal type.
    Concrete(Arc<NormalConformance>),
}

impl ProtocolConformanceRef {
    pub fn protocol(&self) -> ProtocolId {
        match self {
            ProtocolConformanceRef::Abstract(protocol) => *protocol,
            ProtocolConformanceRef::Concrete(conformance) => conformance.protocol,
        }
    }

    pub fn is_abstract(&self) -> bool {
        matches!(self, ProtocolConformanceRef::Abstract(_))
    }
}

impl fmt::Display for ProtocolConformanceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProtocolConformanceRef::Abstract(protocol) => write!(f, "abstract {}", protocol),
            ProtocolConformanceRef::Concrete(conformance) => {
                write!(f, "{}: {}", conformance.conforming, conformance.protocol)
            }
        }
    }
}

/// Resolves `(original dependent type, replacement type, protocol)` to a
/// conformance reference.
pub trait LookupConformance {
    fn lookup_conformance(&self, original: &Ty, replacement: &Ty, protocol: ProtocolId) -> Option<ProtocolConformanceRef>;
}

impl<F> LookupConformance for F
where
    F: Fn(&Ty, &Ty, ProtocolId) -> Option<ProtocolConformanceRef>,
{
    fn lookup_conformance(&self, original: &Ty, replacement: &Ty, protocol: ProtocolId) -> Option<ProtocolConformanceRef> {
        self(original, replacement, protocol)
    }
}

/// Answers every lookup with the abstract conformance of the required protocol.
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeAbstractConformance;

impl LookupConformance for MakeAbstractConformance {
    fn lookup_conformance(&self, _original: &Ty, _replacement: &Ty, protocol: ProtocolId) -> Option<ProtocolConformanceRef> {
        Some(ProtocolConformanceRef::Abstract(protocol))
    }
}

/// Looks conformances up in a module: archetypes answer abstractly when the
/// arena records the conformance, nominal types answer with the module's
/// concrete conformance.
#[derive(Debug, Clone, Copy)]
pub struct LookUpConformanceInModule<'a> {
    pub module: &'a Module,
    pub arena: &'a ArchetypeArena,
}

impl<'a> LookUpConformanceInModule<'a> {
    pub fn new(module: &'a Module, arena: &'a ArchetypeArena) -> Self {
        Self { module, arena }
    }
}

impl LookupConformance for LookUpConformanceInModule<'_> {
    fn lookup_conformance(&self, _original: &Ty, replacement: &Ty, protocol: ProtocolId) -> Option<ProtocolConformanceRef> {
        match &replacement.kind {
            TyKind::Archetype(archetype) if self.arena.owns(archetype.id) && self.arena.conforms_to(archetype.id, protocol) => {
                Some(ProtocolConformanceRef::Abstract(protocol))
            }
            TyKind::Named { name, .. } => self
                .module
                .conformance(name, protocol)
                .map(|conformance| ProtocolConformanceRef::Concrete(conformance.clone())),
            TyKind::Error => Some(ProtocolConformanceRef::Abstract(protocol)),
            _ => None,
        }
    }
}

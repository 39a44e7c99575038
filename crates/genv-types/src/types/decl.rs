// src/types/decl.rs
//! Protocol and associated-type declarations referenced from type trees.

use std::fmt;
use serde::{Deserialize, Serialize};

/// A unique identifier for a protocol declared in a [`Module`](crate::context::Module).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProtocolId(pub u32);

impl fmt::Display for ProtocolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "p{}", self.0)
    }
}

/// A protocol declaration together with the names of its associated types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtocolDecl {
    pub id: ProtocolId,
    pub name: String,
    /// Associated type names, in declaration order.
    pub associated_types: Vec<String>,
}

impl ProtocolDecl {
    /// Looks up an associated type of this protocol by name.
    pub fn associated_type(&self, name: &str) -> Option<AssocTypeRef> {
        self.associated_types
            .iter()
            .any(|assoc| assoc == name)
            .then(|| AssocTypeRef::new(self.id, name))
    }
}

/// Identity of an associated type: the protocol that declares it plus its name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AssocTypeRef {
    pub protocol: ProtocolId,
    pub name: String,
}

impl AssocTypeRef {
    pub fn new(protocol: ProtocolId, name: impl Into<String>) -> Self {
        Self { protocol, name: name.into() }
    }
}

impl fmt::Display for AssocTypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

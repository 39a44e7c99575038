// src/context/module.rs
//! The module scope: protocols and the concrete conformances of nominal types.

use std::collections::BTreeMap;
use std::sync::Arc;
use rustc_hash::FxHashMap;

use crate::types::{AssocTypeRef, ProtocolDecl, ProtocolId, Ty, TyKind};

/// A nominal type's conformance to a protocol, with its type witnesses.
///
/// Witnesses may mention the conforming type's own generic arguments as
/// depth-0 generic parameters (`τ_0_0` is the first argument); substitution
/// instantiates them with the arguments of the concrete type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalConformance {
    pub conforming: String,
    pub protocol: ProtocolId,
    type_witnesses: BTreeMap<String, Ty>,
}

impl NormalConformance {
    pub fn type_witness(&self, assoc_name: &str) -> Option<&Ty> {
        self.type_witnesses.get(assoc_name)
    }
}

/// A module scope.
#[derive(Debug, Default)]
pub struct Module {
    name: String,
    protocols: Vec<ProtocolDecl>,
    /// Conformances keyed by (nominal type name, protocol).
    conformances: FxHashMap<(String, ProtocolId), Arc<NormalConformance>>,
}

impl Module {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), ..Self::default() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declares a protocol with the given associated type names.
    pub fn add_protocol(&mut self, name: impl Into<String>, associated_types: &[&str]) -> ProtocolId {
        let id = ProtocolId(self.protocols.len() as u32);
        self.protocols.push(ProtocolDecl {
            id,
            name: name.into(),
            associated_types: associated_types.iter().map(|s| s.to_string()).collect(),
        });
        id
    }

    /// Panics if the protocol was not declared in this module.
    pub fn protocol(&self, id: ProtocolId) -> &ProtocolDecl {
        match self.protocols.get(id.0 as usize) {
            Some(decl) => decl,
            None => panic!("protocol {} is not declared in module {}", id, self.name),
        }
    }

    /// Resolves an associated type of `protocol` by name.
    ///
    /// Panics if the protocol does not declare it.
    pub fn associated_type(&self, protocol: ProtocolId, name: &str) -> AssocTypeRef {
        let decl = self.protocol(protocol);
        match decl.associated_type(name) {
            Some(assoc) => assoc,
            None => panic!("protocol {} has no associated type {}", decl.name, name),
        }
    }

    /// Records that the nominal type `conforming` conforms to `protocol`.
    ///
    /// Panics if a witness names an associated type the protocol does not declare.
    pub fn add_conformance(
        &mut self,
        conforming: impl Into<String>,
        protocol: ProtocolId,
        witnesses: Vec<(&str, Ty)>,
    ) -> Arc<NormalConformance> {
        let conforming = conforming.into();
        let decl = self.protocol(protocol);
        let mut type_witnesses = BTreeMap::new();
        for (assoc_name, witness) in witnesses {
            assert!(
                decl.associated_type(assoc_name).is_some(),
                "protocol {} has no associated type {}",
                decl.name,
                assoc_name
            );
            type_witnesses.insert(assoc_name.to_string(), witness);
        }
        let conformance = Arc::new(NormalConformance { conforming: conforming.clone(), protocol, type_witnesses });
        self.conformances.insert((conforming, protocol), conformance.clone());
        conformance
    }

    pub fn conformance(&self, nominal: &str, protocol: ProtocolId) -> Option<&Arc<NormalConformance>> {
        self.conformances.get(&(nominal.to_string(), protocol))
    }

    /// Returns the uninstantiated witness for `assoc` in the conformance of
    /// the nominal type `ty`, or `None` if `ty` is not nominal or does not
    /// conform.
    pub fn type_witness(&self, ty: &Ty, assoc: &AssocTypeRef) -> Option<&Ty> {
        match &ty.kind {
            TyKind::Named { name, .. } => self.conformance(name, assoc.protocol)?.type_witness(&assoc.name),
            _ => None,
        }
    }
}

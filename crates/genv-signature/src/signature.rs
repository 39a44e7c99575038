// src/signature.rs
//! Generic signatures and their canonical dependent-type enumeration.

use std::fmt;

use genv_types::{
    ArchetypeArena, GenericTypeParamType, LookupConformance, Module, ProtocolId, SubstOptions, Ty,
    TypeReplacements,
};

use crate::requirement::Requirement;
use crate::substitution::Substitution;

/// The shape of a generic context: its parameters and requirements.
///
/// A signature is immutable once built. Parameters must be given in
/// canonical order (strictly increasing `(depth, index)`), which is also the
/// order in which the dependent types start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenericSignature {
    /// Declared (sugared) parameters.
    params: Vec<GenericTypeParamType>,
    requirements: Vec<Requirement>,
    /// Canonical dependent types: every parameter, then each distinct
    /// projection that is the subject of a conformance, superclass or layout
    /// requirement, in requirement order.
    dependent_types: Vec<Ty>,
}

impl GenericSignature {
    /// Builds a signature.
    ///
    /// Preconditions: `params` are in strictly increasing canonical order;
    /// requirements are written over interface types only and every
    /// requirement subject is a type parameter.
    /// Postconditions: the dependent-type enumeration is computed.
    /// Assertions: enforces the preconditions.
    pub fn new(params: Vec<GenericTypeParamType>, requirements: Vec<Requirement>) -> Self {
        assert!(
            params.windows(2).all(|pair| pair[0].key() < pair[1].key()),
            "generic parameters must be unique and in canonical order"
        );
        for req in &requirements {
            assert!(!req.mentions_archetype(), "requirement {} mentions an archetype", req);
            assert!(req.first_type().is_type_parameter(), "requirement {} does not constrain a type parameter", req);
        }

        let mut dependent_types: Vec<Ty> = params.iter().map(|param| Ty::param(param.canonical())).collect();
        for req in &requirements {
            let subject = match req {
                Requirement::SameType { .. } => continue,
                _ => req.first_type().canonical(),
            };
            if subject.as_dependent_member().is_some() && !dependent_types.contains(&subject) {
                dependent_types.push(subject);
            }
        }

        log::debug!(
            "built generic signature with {} params, {} requirements, {} dependent types",
            params.len(),
            requirements.len(),
            dependent_types.len()
        );
        Self { params, requirements, dependent_types }
    }

    pub fn generic_params(&self) -> &[GenericTypeParamType] {
        &self.params
    }

    pub fn param_count(&self) -> usize {
        self.params.len()
    }

    pub fn requirements(&self) -> &[Requirement] {
        &self.requirements
    }

    /// The canonical dependent-type enumeration.
    pub fn all_dependent_types(&self) -> &[Ty] {
        &self.dependent_types
    }

    pub fn dependent_type_count(&self) -> usize {
        self.dependent_types.len()
    }

    /// Protocols `ty` is required to conform to, in requirement order.
    pub fn conformances_of<'a>(&'a self, ty: &'a Ty) -> impl Iterator<Item = ProtocolId> + 'a {
        let canonical = ty.canonical();
        self.requirements.iter().filter_map(move |req| match req {
            Requirement::Conformance { subject, protocol } if subject.canonical() == canonical => Some(*protocol),
            _ => None,
        })
    }

    /// Computes one substitution per dependent type, in canonical order.
    ///
    /// Each dependent type is rewritten through `replacements`; its
    /// conformance requirements are resolved through `lookup`.
    ///
    /// Panics if `lookup` cannot resolve a required conformance.
    pub fn substitutions(
        &self,
        module: &Module,
        arena: &ArchetypeArena,
        replacements: &dyn TypeReplacements,
        lookup: &dyn LookupConformance,
    ) -> Vec<Substitution> {
        self.dependent_types
            .iter()
            .map(|dep_ty| {
                let replacement = dep_ty.subst(module, arena, replacements, SubstOptions::default());
                let conformances = self
                    .conformances_of(dep_ty)
                    .map(|protocol| match lookup.lookup_conformance(dep_ty, &replacement, protocol) {
                        Some(conformance) => conformance,
                        None => panic!(
                            "no conformance of {} to {} for dependent type {}",
                            replacement,
                            module.protocol(protocol).name,
                            dep_ty
                        ),
                    })
                    .collect();
                log::trace!("substitution {} := {}", dep_ty, replacement);
                Substitution::new(replacement, conformances)
            })
            .collect()
    }
}

impl fmt::Display for GenericSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<")?;
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", param)?;
        }
        if !self.requirements.is_empty() {
            f.write_str(" where ")?;
            for (i, req) in self.requirements.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{}", req)?;
            }
        }
        f.write_str(">")
    }
}

// src/requirement.rs
//! Requirements of a generic signature.

use std::fmt;
use genv_types::{ProtocolId, Ty};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequirementKind {
    Conformance,
    SameType,
    Superclass,
    Layout,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayoutConstraint {
    /// Must be a reference (class) type.
    Class,
    /// Must be trivially copyable.
    Trivial,
}

impl fmt::Display for LayoutConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayoutConstraint::Class => f.write_str("AnyObject"),
            LayoutConstraint::Trivial => f.write_str("_Trivial"),
        }
    }
}

/// One requirement of a generic signature. Both sides are interface types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Requirement {
    Conformance { subject: Ty, protocol: ProtocolId },
    SameType { first: Ty, second: Ty },
    Superclass { subject: Ty, superclass: Ty },
    Layout { subject: Ty, layout: LayoutConstraint },
}

impl Requirement {
    pub fn kind(&self) -> RequirementKind {
        match self {
            Requirement::Conformance { .. } => RequirementKind::Conformance,
            Requirement::SameType { .. } => RequirementKind::SameType,
            Requirement::Superclass { .. } => RequirementKind::Superclass,
            Requirement::Layout { .. } => RequirementKind::Layout,
        }
    }

    /// The constrained type (the left-hand side for same-type requirements).
    pub fn first_type(&self) -> &Ty {
        match self {
            Requirement::Conformance { subject, .. }
            | Requirement::Superclass { subject, .. }
            | Requirement::Layout { subject, .. } => subject,
            Requirement::SameType { first, .. } => first,
        }
    }

    /// Returns `true` if either side mentions an archetype.
    pub(crate) fn mentions_archetype(&self) -> bool {
        match self {
            Requirement::SameType { first, second } => first.has_archetype() || second.has_archetype(),
            Requirement::Superclass { subject, superclass } => subject.has_archetype() || superclass.has_archetype(),
            Requirement::Conformance { subject, .. } | Requirement::Layout { subject, .. } => subject.has_archetype(),
        }
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Requirement::Conformance { subject, protocol } => write!(f, "{}: {}", subject, protocol),
            Requirement::SameType { first, second } => write!(f, "{} == {}", first, second),
            Requirement::Superclass { subject, superclass } => write!(f, "{}: {}", subject, superclass),
            Requirement::Layout { subject, layout } => write!(f, "{}: {}", subject, layout),
        }
    }
}

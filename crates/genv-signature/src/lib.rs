//! Generic signatures for the generic-environment engine.
//!
//! A [`GenericSignature`] lists generic parameters and requirements and
//! exposes the canonical enumeration of dependent types that substitution
//! lists are bound to, position by position.

pub mod requirement;
pub mod signature;
pub mod substitution;

pub use requirement::{LayoutConstraint, Requirement, RequirementKind};
pub use signature::GenericSignature;
pub use substitution::Substitution;

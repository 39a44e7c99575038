// src/context/mod.rs
//! Owners of compilation-wide state: the archetype arena and the module scope.

pub mod archetype;
pub mod module;

pub use archetype::{ArchetypeArena, ArchetypeData};
pub use module::{Module, NormalConformance};

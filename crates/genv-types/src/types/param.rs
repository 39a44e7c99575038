// src/types/param.rs
//! Generic parameter types and their canonical identity.

use std::fmt;
use serde::{Deserialize, Serialize};

/// Canonical identity of a generic parameter: its depth (how many generic
/// contexts enclose the declaration) and its index within that context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GenericParamKey {
    pub depth: u32,
    pub index: u32,
}

impl GenericParamKey {
    pub fn new(depth: u32, index: u32) -> Self {
        Self { depth, index }
    }
}

impl fmt::Display for GenericParamKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "τ_{}_{}", self.depth, self.index)
    }
}

/// A generic parameter type as it appears in interface types.
///
/// The declared form carries the user-written name ("sugar"); the canonical
/// form drops it. Two parameter types denote the same parameter iff their
/// [`key`](Self::key)s are equal, regardless of sugar.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GenericTypeParamType {
    pub depth: u32,
    pub index: u32,
    /// Declared name, `None` for the canonical form.
    pub name: Option<String>,
}

impl GenericTypeParamType {
    /// Creates a declared (sugared) parameter type.
    pub fn named(name: impl Into<String>, depth: u32, index: u32) -> Self {
        Self { depth, index, name: Some(name.into()) }
    }

    /// Creates a canonical parameter type.
    pub fn canonical_at(depth: u32, index: u32) -> Self {
        Self { depth, index, name: None }
    }

    pub fn key(&self) -> GenericParamKey {
        GenericParamKey::new(self.depth, self.index)
    }

    /// Returns the canonical form of this parameter (sugar stripped).
    pub fn canonical(&self) -> Self {
        Self::canonical_at(self.depth, self.index)
    }

    pub fn is_canonical(&self) -> bool {
        self.name.is_none()
    }

    /// Compares two parameters by canonical identity.
    pub fn is_equal(&self, other: &GenericTypeParamType) -> bool {
        self.key() == other.key()
    }
}

impl From<GenericParamKey> for GenericTypeParamType {
    fn from(key: GenericParamKey) -> Self {
        Self::canonical_at(key.depth, key.index)
    }
}

impl fmt::Display for GenericTypeParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{}", name),
            None => write!(f, "{}", self.key()),
        }
    }
}

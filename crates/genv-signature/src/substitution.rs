// src/substitution.rs
use std::fmt;
use genv_types::{ProtocolConformanceRef, Ty};

/// A replacement type plus the conformances it brings, bound positionally to
/// one dependent type of a generic signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Substitution {
    pub replacement: Ty,
    pub conformances: Vec<ProtocolConformanceRef>,
}

impl Substitution {
    pub fn new(replacement: Ty, conformances: Vec<ProtocolConformanceRef>) -> Self {
        Self { replacement, conformances }
    }

    /// A substitution with no conformance obligations.
    pub fn plain(replacement: Ty) -> Self {
        Self::new(replacement, Vec::new())
    }
}

impl fmt::Display for Substitution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.replacement)?;
        if !self.conformances.is_empty() {
            f.write_str(" [")?;
            for (i, conformance) in self.conformances.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{}", conformance)?;
            }
            f.write_str("]")?;
        }
        Ok(())
    }
}

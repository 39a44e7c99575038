//! Generic environments.
//!
//! A [`GenericEnvironment`] relates the generic parameters of a
//! [`GenericSignature`](genv_signature::GenericSignature) to the archetypes
//! that stand for them inside a generic body. It maps types into and out of
//! that context, produces forwarding substitutions, and turns positional
//! substitution lists into archetype-keyed [`SubstitutionMap`]s.
//!
//! Malformed input is a compiler bug, not a user error: the plain entry
//! points abort through [`abort`], and the `try_*` entry points return
//! [`EnvironmentError`] instead.

pub mod config;
pub mod environment;
pub mod error;
mod forwarding;
mod map_builder;
mod maps;
pub mod registry;
pub mod substitution_map;

pub use config::{AliasPolicy, EnvironmentConfig};
pub use environment::GenericEnvironment;
pub use error::{abort, EnvResult, EnvironmentError};
pub use registry::{GenericEnvId, GenericEnvironments};
pub use substitution_map::{ParentEdge, SubstitutionMap, SubstitutionMapDisplay};

//! Owning storage for the environments of one compilation.

use std::fmt;
use std::ops::Index;

use genv_signature::GenericSignature;
use genv_types::{ArchetypeArena, GenericTypeParamType, Ty};
use serde::{Deserialize, Serialize};

use crate::config::EnvironmentConfig;
use crate::environment::GenericEnvironment;
use crate::error::{abort, EnvResult};

/// A handle to an environment stored in [`GenericEnvironments`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GenericEnvId(pub u32);

impl fmt::Display for GenericEnvId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "env{}", self.0)
    }
}

/// Every generic environment created during a compilation, built with one
/// shared configuration.
///
/// Environments are only ever appended, so a [`GenericEnvId`] stays valid
/// for the registry's lifetime.
#[derive(Debug, Default)]
pub struct GenericEnvironments<'ctx> {
    config: EnvironmentConfig,
    environments: Vec<GenericEnvironment<'ctx>>,
}

impl<'ctx> GenericEnvironments<'ctx> {
    pub fn new(config: EnvironmentConfig) -> Self {
        Self { config, environments: Vec::new() }
    }

    pub fn config(&self) -> &EnvironmentConfig {
        &self.config
    }

    /// Builds and stores an environment, aborting on malformed input.
    pub fn create<I>(&mut self, signature: &'ctx GenericSignature, arena: &'ctx ArchetypeArena, mapping: I) -> GenericEnvId
    where
        I: IntoIterator<Item = (GenericTypeParamType, Ty)>,
    {
        match self.try_create(signature, arena, mapping) {
            Ok(id) => id,
            Err(err) => abort(err),
        }
    }

    pub fn try_create<I>(
        &mut self,
        signature: &'ctx GenericSignature,
        arena: &'ctx ArchetypeArena,
        mapping: I,
    ) -> EnvResult<GenericEnvId>
    where
        I: IntoIterator<Item = (GenericTypeParamType, Ty)>,
    {
        let env = GenericEnvironment::try_with_config(signature, arena, mapping, &self.config)?;
        let id = GenericEnvId(self.environments.len() as u32);
        self.environments.push(env);
        log::debug!("registered generic environment {}", id);
        Ok(id)
    }

    /// Panics if `id` was not issued by this registry.
    pub fn get(&self, id: GenericEnvId) -> &GenericEnvironment<'ctx> {
        match self.environments.get(id.0 as usize) {
            Some(env) => env,
            None => panic!("generic environment {} does not belong to this registry", id),
        }
    }

    pub fn len(&self) -> usize {
        self.environments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.environments.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (GenericEnvId, &GenericEnvironment<'ctx>)> + '_ {
        self.environments.iter().enumerate().map(|(index, env)| (GenericEnvId(index as u32), env))
    }
}

impl<'ctx> Index<GenericEnvId> for GenericEnvironments<'ctx> {
    type Output = GenericEnvironment<'ctx>;

    fn index(&self, id: GenericEnvId) -> &Self::Output {
        self.get(id)
    }
}

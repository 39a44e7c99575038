//! The generic environment: a two-way correspondence between the generic
//! parameters of a signature and their archetypes.

use genv_signature::GenericSignature;
use genv_types::{ArchetypeArena, ArchetypeId, GenericTypeParamType, Module, SubstOptions, Ty};

use crate::config::EnvironmentConfig;
use crate::error::{abort, EnvResult, EnvironmentError};
use crate::maps::{ForwardMap, ReverseMap};

/// Maps types between their interface form (written over a signature's
/// generic parameters) and their contextual form (written over archetypes)
/// for one generic scope.
///
/// An environment is immutable once built. It borrows its signature and the
/// arena holding its archetypes for `'ctx`, so neither can be dropped while
/// the environment is alive. Types handed out by the environment embed
/// archetype ids of that arena and are meaningless once it is gone.
#[derive(Debug)]
pub struct GenericEnvironment<'ctx> {
    pub(crate) signature: &'ctx GenericSignature,
    pub(crate) arena: &'ctx ArchetypeArena,
    /// Canonical parameter → contextual type; one entry per parameter.
    pub(crate) forward: ForwardMap,
    /// Archetype → the sugared parameters bound to it.
    pub(crate) reverse: ReverseMap,
}

impl<'ctx> GenericEnvironment<'ctx> {
    /// Builds an environment, aborting on malformed input.
    ///
    /// See [`try_with_config`](Self::try_with_config) for the contract.
    pub fn new<I>(signature: &'ctx GenericSignature, arena: &'ctx ArchetypeArena, mapping: I) -> Self
    where
        I: IntoIterator<Item = (GenericTypeParamType, Ty)>,
    {
        match Self::try_new(signature, arena, mapping) {
            Ok(env) => env,
            Err(err) => abort(err),
        }
    }

    /// Builds an environment with the default configuration.
    pub fn try_new<I>(signature: &'ctx GenericSignature, arena: &'ctx ArchetypeArena, mapping: I) -> EnvResult<Self>
    where
        I: IntoIterator<Item = (GenericTypeParamType, Ty)>,
    {
        Self::try_with_config(signature, arena, mapping, &EnvironmentConfig::default())
    }

    /// Builds an environment from a parameter → contextual type mapping.
    ///
    /// Preconditions: `mapping` is non-empty, has exactly one entry per
    /// parameter of `signature`, and every key is (possibly sugared) one of
    /// the signature's parameters. Contextual archetypes live in `arena`;
    /// one allocated elsewhere is a `ForeignType` error.
    /// Postconditions: the forward map holds one canonical entry per
    /// parameter; the reverse map lists, for every archetype value, all
    /// parameters bound to it with their sugar intact.
    /// Errors: `EmptyMapping`, `ShapeMismatch`, `ForeignParameter`,
    /// `DuplicateKey`, and with `verify_round_trip` set, whatever the
    /// round-trip check reports.
    pub fn try_with_config<I>(
        signature: &'ctx GenericSignature,
        arena: &'ctx ArchetypeArena,
        mapping: I,
        config: &EnvironmentConfig,
    ) -> EnvResult<Self>
    where
        I: IntoIterator<Item = (GenericTypeParamType, Ty)>,
    {
        let mapping: Vec<(GenericTypeParamType, Ty)> = mapping.into_iter().collect();
        if mapping.is_empty() {
            return Err(EnvironmentError::EmptyMapping);
        }
        if mapping.len() != signature.param_count() {
            return Err(EnvironmentError::ShapeMismatch {
                what: "generic parameter bindings",
                expected: signature.param_count(),
                found: mapping.len(),
            });
        }

        let mut forward = ForwardMap::default();
        let mut reverse = ReverseMap::new(config.alias_policy);
        for (param, context_ty) in mapping {
            let key = param.key();
            if !signature.generic_params().iter().any(|declared| declared.key() == key) {
                return Err(EnvironmentError::ForeignParameter { param: param.to_string() });
            }
            // Substitution looks parameters up by canonical key.
            if !forward.insert(key, context_ty.clone()) {
                return Err(EnvironmentError::DuplicateKey { param: param.canonical().to_string() });
            }
            // The sugared parameter goes into the reverse map so that types
            // mapped out of context stay readable.
            if let Some(archetype) = context_ty.as_archetype() {
                if !arena.owns(archetype.id) {
                    return Err(EnvironmentError::ForeignType { ty: context_ty.to_string() });
                }
                let bound = reverse.insert(archetype.id, param);
                if bound > 1 {
                    log::warn!("{} generic parameters are bound to archetype {}", bound, context_ty);
                }
            }
        }

        debug_assert_eq!(forward.len(), signature.param_count());
        let env = Self { signature, arena, forward, reverse };
        if config.verify_round_trip {
            env.verify_round_trip()?;
        }
        log::debug!("created generic environment for {} ({} parameters)", signature, signature.param_count());
        Ok(env)
    }

    /// Checks that every dependent type rooted in an archetype-bound
    /// parameter maps into context to an archetype, and that mapping that
    /// archetype back out lands on a type with the same contextual image.
    fn verify_round_trip(&self) -> EnvResult<()> {
        // Archetype-rooted projections never consult module witnesses.
        let module = Module::default();
        for dep_ty in self.signature.all_dependent_types() {
            let root = root_param(dep_ty);
            let rooted_in_archetype = self.forward.get(root.key()).is_some_and(|ty| ty.as_archetype().is_some());
            if !rooted_in_archetype {
                continue;
            }
            let context_ty = dep_ty.subst(&module, self.arena, &self.forward, SubstOptions::default());
            if context_ty.as_archetype().is_none() {
                return Err(EnvironmentError::NotContextual { ty: dep_ty.to_string() });
            }
            let interface_ty = context_ty.subst(&module, self.arena, &self.reverse, SubstOptions::default());
            if interface_ty.has_archetype() {
                return Err(EnvironmentError::ForeignType { ty: interface_ty.to_string() });
            }
            let again = interface_ty.subst(&module, self.arena, &self.forward, SubstOptions::default());
            if again != context_ty {
                return Err(EnvironmentError::ForeignType { ty: context_ty.to_string() });
            }
        }
        Ok(())
    }

    pub fn signature(&self) -> &'ctx GenericSignature {
        self.signature
    }

    pub fn arena(&self) -> &'ctx ArchetypeArena {
        self.arena
    }

    /// The declared (sugared) generic parameters of the signature.
    pub fn generic_params(&self) -> &'ctx [GenericTypeParamType] {
        self.signature.generic_params()
    }

    /// Returns `true` iff some parameter of this environment is bound
    /// directly to `archetype`. Archetypes of other arenas never are.
    pub fn contains_primary_archetype(&self, archetype: ArchetypeId) -> bool {
        self.arena.owns(archetype) && self.reverse.contains(archetype)
    }

    /// Every parameter bound to `archetype`, in canonical order. Empty if
    /// the archetype is not bound directly to any parameter.
    pub fn aliased_params(&self, archetype: ArchetypeId) -> &[GenericTypeParamType] {
        self.reverse.aliases(archetype)
    }

    /// Rewrites every archetype in `ty` into its interface type.
    ///
    /// Reaches into lowered types. Aborts with `ForeignType` if archetypes
    /// of another environment remain.
    pub fn map_type_out_of_context(&self, module: &Module, ty: &Ty) -> Ty {
        let result = ty.subst(module, self.arena, &self.reverse, SubstOptions::ALLOW_LOWERED_TYPES);
        if result.has_archetype() {
            abort(EnvironmentError::ForeignType { ty: result.to_string() });
        }
        result
    }

    /// Rewrites every generic parameter and projection in `ty` into its
    /// contextual type.
    ///
    /// Reaches into lowered types. Aborts with `UnresolvedTypeParameter` if
    /// type parameters remain, unless the result already carries an error
    /// type: that failure has been reported and must not cascade.
    pub fn map_type_into_context(&self, module: &Module, ty: &Ty) -> Ty {
        let result = ty.subst(module, self.arena, &self.forward, SubstOptions::ALLOW_LOWERED_TYPES);
        if result.has_type_parameter() && !result.has_error() {
            abort(EnvironmentError::UnresolvedTypeParameter { ty: result.to_string() });
        }
        result
    }

    /// Returns the contextual type bound to one of this environment's own
    /// parameters. Aborts with `ForeignParameter` for any other parameter.
    pub fn map_param_into_context(&self, param: &GenericTypeParamType) -> Ty {
        match self.forward.get(param.key()) {
            Some(context_ty) => context_ty.clone(),
            None => abort(EnvironmentError::ForeignParameter { param: param.to_string() }),
        }
    }

    /// Returns the declared form of `param`, for display.
    /// Aborts with `MissingParameter` if the signature does not declare it.
    pub fn sugared_type(&self, param: &GenericTypeParamType) -> &'ctx GenericTypeParamType {
        match self.signature.generic_params().iter().find(|declared| declared.is_equal(param)) {
            Some(declared) => declared,
            None => abort(EnvironmentError::MissingParameter { param: param.to_string() }),
        }
    }
}

/// The generic parameter a type parameter is rooted in.
fn root_param(ty: &Ty) -> &GenericTypeParamType {
    match ty.as_dependent_member() {
        Some((base, _)) => root_param(base),
        None => match ty.as_param() {
            Some(param) => param,
            None => panic!("dependent type {} is not rooted in a generic parameter", ty),
        },
    }
}

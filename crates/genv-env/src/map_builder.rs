use genv_signature::{Requirement, Substitution};
use genv_types::{AssocTypeRef, Module, SubstOptions, Ty};

use crate::environment::GenericEnvironment;
use crate::error::{abort, EnvResult, EnvironmentError};
use crate::substitution_map::SubstitutionMap;

impl GenericEnvironment<'_> {
    /// Builds an archetype-keyed substitution map from a positional
    /// substitution list.
    ///
    /// Preconditions: `subs` has exactly one entry per dependent type of the
    /// signature, in the same order.
    /// Postconditions: every dependent type's archetype is bound to its
    /// replacement and conformances; every archetype reachable through a
    /// same-type constraint between two projections records its extra
    /// parent.
    /// Assertions: aborts on a length mismatch, or when a dependent type
    /// does not map into context to an archetype.
    pub fn substitution_map(&self, module: &Module, subs: &[Substitution]) -> SubstitutionMap {
        match self.try_substitution_map(module, subs) {
            Ok(map) => map,
            Err(err) => abort(err),
        }
    }

    /// Fallible form of [`substitution_map`](Self::substitution_map).
    pub fn try_substitution_map(&self, module: &Module, subs: &[Substitution]) -> EnvResult<SubstitutionMap> {
        let mut result = SubstitutionMap::new();
        self.substitution_map_into(module, subs, &mut result)?;
        Ok(result)
    }

    /// Adds this environment's bindings for `subs` to an existing map.
    ///
    /// An inner generic context extends the map of its outer context this
    /// way, so one map resolves the archetypes of both. Replacements for
    /// archetypes already in `result` are overwritten; their conformances
    /// and parent edges accumulate.
    /// Errors: as [`try_substitution_map`](Self::try_substitution_map); on
    /// error `result` is left unchanged.
    pub fn substitution_map_into(
        &self,
        module: &Module,
        subs: &[Substitution],
        result: &mut SubstitutionMap,
    ) -> EnvResult<()> {
        let dependent_types = self.signature.all_dependent_types();
        if dependent_types.len() != subs.len() {
            return Err(EnvironmentError::ShapeMismatch {
                what: "substitutions",
                expected: dependent_types.len(),
                found: subs.len(),
            });
        }

        let archetypes = dependent_types
            .iter()
            .map(|dep_ty| {
                let context_ty = dep_ty.subst(module, self.arena, &self.forward, SubstOptions::default());
                match context_ty.as_archetype() {
                    Some(archetype) => Ok(archetype.id),
                    None => Err(EnvironmentError::NotContextual { ty: dep_ty.to_string() }),
                }
            })
            .collect::<EnvResult<Vec<_>>>()?;

        for ((dep_ty, archetype), sub) in dependent_types.iter().zip(archetypes).zip(subs) {
            log::trace!("{} := {}", dep_ty, sub.replacement);
            result.add_substitution(archetype, sub.replacement.clone());
            result.add_conformances(archetype, sub.conformances.iter().cloned());
        }

        for req in self.signature.requirements() {
            let Requirement::SameType { first, second } = req else {
                continue;
            };
            let (Some((first_base, first_assoc)), Some((second_base, second_assoc))) =
                (first.as_dependent_member(), second.as_dependent_member())
            else {
                continue;
            };
            self.record_parent_edge(module, result, first, first_base, first_assoc);
            self.record_parent_edge(module, result, second, second_base, second_assoc);
        }

        log::debug!("substitution map holds {} archetypes after adding {}", result.len(), self.signature);
        Ok(())
    }

    /// Adds `member`'s base as a parent of `member`'s archetype unless it is
    /// already the canonical parent.
    fn record_parent_edge(
        &self,
        module: &Module,
        result: &mut SubstitutionMap,
        member: &Ty,
        base: &Ty,
        assoc: &AssocTypeRef,
    ) {
        let member_ty = self.map_type_into_context(module, member);
        let base_ty = self.map_type_into_context(module, base);
        let (Some(archetype), Some(parent)) = (member_ty.as_archetype(), base_ty.as_archetype()) else {
            return;
        };
        if self.arena.parent(archetype.id) != Some(parent.id) {
            log::trace!("{} is also reachable as {}.{}", member_ty, base_ty, assoc);
            result.add_parent(archetype.id, parent.id, assoc.clone());
        }
    }
}

//! The two directions of a generic environment's parameter correspondence.

use rustc_hash::FxHashMap;
use genv_types::{ArchetypeId, GenericParamKey, GenericTypeParamType, Ty, TypeReplacements};

use crate::config::AliasPolicy;

/// Canonical parameter → contextual type.
#[derive(Debug, Clone, Default)]
pub(crate) struct ForwardMap {
    map: FxHashMap<GenericParamKey, Ty>,
}

impl ForwardMap {
    /// Inserts a binding. Returns `false` if the key was already bound, in
    /// which case the map is left unchanged.
    pub(crate) fn insert(&mut self, key: GenericParamKey, context_ty: Ty) -> bool {
        if self.map.contains_key(&key) {
            return false;
        }
        self.map.insert(key, context_ty);
        true
    }

    pub(crate) fn get(&self, key: GenericParamKey) -> Option<&Ty> {
        self.map.get(&key)
    }

    pub(crate) fn len(&self) -> usize {
        self.map.len()
    }
}

impl TypeReplacements for ForwardMap {
    fn replace_param(&self, param: GenericParamKey) -> Option<Ty> {
        self.get(param).cloned()
    }
}

/// Archetype → every (sugared) parameter bound to it, ordered by key.
#[derive(Debug, Clone, Default)]
pub(crate) struct ReverseMap {
    map: FxHashMap<ArchetypeId, Vec<GenericTypeParamType>>,
    policy: AliasPolicy,
}

impl ReverseMap {
    pub(crate) fn new(policy: AliasPolicy) -> Self {
        Self { map: FxHashMap::default(), policy }
    }

    /// Records `param` as bound to `archetype`. Returns the number of
    /// parameters now bound to it.
    pub(crate) fn insert(&mut self, archetype: ArchetypeId, param: GenericTypeParamType) -> usize {
        let aliases = self.map.entry(archetype).or_default();
        let at = aliases.partition_point(|existing| existing.key() < param.key());
        aliases.insert(at, param);
        aliases.len()
    }

    pub(crate) fn contains(&self, archetype: ArchetypeId) -> bool {
        self.map.contains_key(&archetype)
    }

    pub(crate) fn aliases(&self, archetype: ArchetypeId) -> &[GenericTypeParamType] {
        self.map.get(&archetype).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The parameter reported for `archetype` under the alias policy.
    pub(crate) fn preferred(&self, archetype: ArchetypeId) -> Option<&GenericTypeParamType> {
        let aliases = self.map.get(&archetype)?;
        match self.policy {
            AliasPolicy::LowestIndex => aliases.first(),
            AliasPolicy::HighestIndex => aliases.last(),
        }
    }
}

impl TypeReplacements for ReverseMap {
    fn replace_archetype(&self, archetype: ArchetypeId) -> Option<Ty> {
        self.preferred(archetype).cloned().map(Ty::param)
    }
}

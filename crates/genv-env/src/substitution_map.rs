//! Archetype-keyed substitution maps.

use std::fmt;

use rustc_hash::FxHashMap;
use genv_types::{
    ArchetypeArena, ArchetypeId, AssocTypeRef, Module, ProtocolConformanceRef, ProtocolId, SubstOptions, Ty,
    TypeReplacements,
};

/// Records that an archetype is also reachable as `parent.assoc`, besides
/// through its canonical parent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParentEdge {
    pub parent: ArchetypeId,
    pub assoc: AssocTypeRef,
}

/// Replacement types and conformances keyed by archetype.
///
/// Built from a positional substitution list by
/// [`GenericEnvironment::substitution_map`](crate::GenericEnvironment::substitution_map).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubstitutionMap {
    replacements: FxHashMap<ArchetypeId, Ty>,
    conformances: FxHashMap<ArchetypeId, Vec<ProtocolConformanceRef>>,
    parents: FxHashMap<ArchetypeId, Vec<ParentEdge>>,
}

impl SubstitutionMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `archetype` to `replacement`. A later binding overwrites an
    /// earlier one.
    pub fn add_substitution(&mut self, archetype: ArchetypeId, replacement: Ty) {
        if let Some(previous) = self.replacements.insert(archetype, replacement) {
            log::trace!("rebinding archetype {} (was {})", archetype, previous);
        }
    }

    pub fn add_conformances<I>(&mut self, archetype: ArchetypeId, conformances: I)
    where
        I: IntoIterator<Item = ProtocolConformanceRef>,
    {
        self.conformances.entry(archetype).or_default().extend(conformances);
    }

    /// Records `archetype` as reachable through `parent.assoc`.
    /// Recording the same edge twice has no effect.
    pub fn add_parent(&mut self, archetype: ArchetypeId, parent: ArchetypeId, assoc: AssocTypeRef) {
        let edge = ParentEdge { parent, assoc };
        let edges = self.parents.entry(archetype).or_default();
        if !edges.contains(&edge) {
            edges.push(edge);
        }
    }

    pub fn replacement(&self, archetype: ArchetypeId) -> Option<&Ty> {
        self.replacements.get(&archetype)
    }

    pub fn conformances(&self, archetype: ArchetypeId) -> &[ProtocolConformanceRef] {
        self.conformances.get(&archetype).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The conformance of `archetype`'s replacement to `protocol`, if recorded.
    pub fn lookup_conformance(&self, archetype: ArchetypeId, protocol: ProtocolId) -> Option<&ProtocolConformanceRef> {
        self.conformances(archetype).iter().find(|conformance| conformance.protocol() == protocol)
    }

    pub fn parents(&self, archetype: ArchetypeId) -> &[ParentEdge] {
        self.parents.get(&archetype).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of archetypes with a replacement.
    pub fn len(&self) -> usize {
        self.replacements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.replacements.is_empty()
    }

    /// Archetypes with a replacement, in id order.
    pub fn archetypes(&self) -> Vec<ArchetypeId> {
        let mut ids: Vec<ArchetypeId> = self.replacements.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Substitutes this map into a contextual type.
    pub fn apply(&self, module: &Module, arena: &ArchetypeArena, ty: &Ty) -> Ty {
        ty.subst(module, arena, self, SubstOptions::ALLOW_LOWERED_TYPES)
    }

    /// Renders the map against the arena that names its archetypes.
    pub fn display<'a>(&'a self, arena: &'a ArchetypeArena) -> SubstitutionMapDisplay<'a> {
        SubstitutionMapDisplay { map: self, arena }
    }

    /// Renders the map for snapshots and debug logs, in archetype order.
    pub fn dump(&self, arena: &ArchetypeArena) -> String {
        self.display(arena).to_string()
    }
}

/// [`fmt::Display`] adapter returned by [`SubstitutionMap::display`].
pub struct SubstitutionMapDisplay<'a> {
    map: &'a SubstitutionMap,
    arena: &'a ArchetypeArena,
}

impl SubstitutionMapDisplay<'_> {
    /// `$Name` for archetypes of the arena, the raw id for any other.
    fn name(&self, archetype: ArchetypeId) -> String {
        if self.arena.owns(archetype) {
            format!("${}", self.arena.get(archetype).name)
        } else {
            archetype.to_string()
        }
    }
}

impl fmt::Display for SubstitutionMapDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for archetype in self.map.archetypes() {
            // `replacements` holds every key `archetypes` returns.
            let replacement = &self.map.replacements[&archetype];
            writeln!(f, "{} := {}", self.name(archetype), replacement)?;
            for conformance in self.map.conformances(archetype) {
                writeln!(f, "  conforms {}", conformance)?;
            }
            for edge in self.map.parents(archetype) {
                writeln!(f, "  parent {}.{}", self.name(edge.parent), edge.assoc)?;
            }
        }
        Ok(())
    }
}

impl TypeReplacements for SubstitutionMap {
    fn replace_archetype(&self, archetype: ArchetypeId) -> Option<Ty> {
        self.replacement(archetype).cloned()
    }
}

// src/context/archetype.rs
//! Storage for archetypes (contextual types).
//!
//! Archetypes form a forest: primary archetypes stand for generic
//! parameters, nested archetypes stand for associated-type projections and
//! point at the archetype they were projected from. Same-type requirements
//! can make one nested archetype reachable from more than one parent; the
//! arena records a single canonical parent and lets other archetypes list it
//! in their nested-type tables through [`ArchetypeArena::alias_nested`].

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use crate::types::{ArenaId, ArchetypeId, ArchetypeType, AssocTypeRef, ProtocolId, Ty};

/// The data behind one archetype.
#[derive(Debug, Clone)]
pub struct ArchetypeData {
    /// Display name, `T` for a primary archetype or `T.Element` for a nested one.
    pub name: Arc<str>,
    /// Canonical parent, `None` for primary archetypes.
    pub parent: Option<ArchetypeId>,
    /// The associated type this archetype projects from its parent.
    pub assoc: Option<AssocTypeRef>,
    /// Protocols this archetype is known to conform to.
    pub conforms_to: Vec<ProtocolId>,
    /// Nested archetypes reachable from this one, by associated type name.
    nested: BTreeMap<String, ArchetypeId>,
}

impl ArchetypeData {
    pub fn is_primary(&self) -> bool {
        self.parent.is_none()
    }

    pub fn nested_types(&self) -> impl Iterator<Item = (&str, ArchetypeId)> + '_ {
        self.nested.iter().map(|(name, id)| (name.as_str(), *id))
    }
}

/// Owns every archetype created for a compilation.
///
/// Archetypes are never freed individually; the arena lives as long as the
/// compilation context that owns it, and every [`Ty`] holding an
/// [`ArchetypeType`] must not outlive it.
///
/// Each arena stamps its ids with its own [`ArenaId`], so an archetype of one
/// arena is never mistaken for the archetype at the same index of another.
#[derive(Debug)]
pub struct ArchetypeArena {
    id: ArenaId,
    archetypes: Vec<ArchetypeData>,
}

static NEXT_ARENA_ID: AtomicU32 = AtomicU32::new(0);

impl Default for ArchetypeArena {
    fn default() -> Self {
        Self::new()
    }
}

impl ArchetypeArena {
    pub fn new() -> Self {
        let id = ArenaId(NEXT_ARENA_ID.fetch_add(1, Ordering::Relaxed));
        Self { id, archetypes: Vec::new() }
    }

    pub fn id(&self) -> ArenaId {
        self.id
    }

    /// Returns `true` iff `id` was allocated by this arena.
    pub fn owns(&self, id: ArchetypeId) -> bool {
        id.arena == self.id && (id.index as usize) < self.archetypes.len()
    }

    /// Allocates a primary archetype.
    pub fn new_primary(&mut self, name: impl Into<String>, conforms_to: Vec<ProtocolId>) -> ArchetypeId {
        let name: String = name.into();
        self.push(ArchetypeData {
            name: Arc::from(name),
            parent: None,
            assoc: None,
            conforms_to,
            nested: BTreeMap::new(),
        })
    }

    /// Allocates a nested archetype for `parent.assoc` and registers it as
    /// `parent`'s nested type of that name.
    ///
    /// Panics if `parent` already has a nested type with the same name.
    pub fn new_nested(&mut self, parent: ArchetypeId, assoc: AssocTypeRef, conforms_to: Vec<ProtocolId>) -> ArchetypeId {
        let name = format!("{}.{}", self.get(parent).name, assoc.name);
        let assoc_name = assoc.name.clone();
        let id = self.push(ArchetypeData {
            name: Arc::from(name),
            parent: Some(parent),
            assoc: Some(assoc),
            conforms_to,
            nested: BTreeMap::new(),
        });
        let previous = self.get_mut(parent).nested.insert(assoc_name.clone(), id);
        assert!(previous.is_none(), "archetype {} already has a nested type named {}", parent, assoc_name);
        id
    }

    /// Makes `existing` reachable as `owner.assoc_name` without changing its
    /// canonical parent.
    ///
    /// Panics if `owner` already has a different nested type of that name.
    pub fn alias_nested(&mut self, owner: ArchetypeId, assoc_name: impl Into<String>, existing: ArchetypeId) {
        assert!(self.owns(existing), "unknown archetype {}", existing);
        let assoc_name = assoc_name.into();
        let previous = self.get_mut(owner).nested.insert(assoc_name.clone(), existing);
        assert!(
            previous.map_or(true, |prev| prev == existing),
            "archetype {} already has a different nested type named {}",
            owner,
            assoc_name
        );
    }

    fn push(&mut self, data: ArchetypeData) -> ArchetypeId {
        let id = ArchetypeId::new(self.id, self.archetypes.len() as u32);
        log::trace!("allocated archetype {} ({})", id, data.name);
        self.archetypes.push(data);
        id
    }

    /// Returns the data of an archetype.
    ///
    /// Panics on an id that was not allocated by this arena.
    pub fn get(&self, id: ArchetypeId) -> &ArchetypeData {
        match self.archetypes.get(id.index as usize) {
            Some(data) if id.arena == self.id => data,
            _ => panic!("archetype {} does not belong to this arena", id),
        }
    }

    fn get_mut(&mut self, id: ArchetypeId) -> &mut ArchetypeData {
        let arena = self.id;
        match self.archetypes.get_mut(id.index as usize) {
            Some(data) if id.arena == arena => data,
            _ => panic!("archetype {} does not belong to this arena", id),
        }
    }

    /// Builds the type-tree reference for an archetype.
    pub fn ty(&self, id: ArchetypeId) -> Ty {
        Ty::archetype(ArchetypeType { id, name: self.get(id).name.clone() })
    }

    pub fn parent(&self, id: ArchetypeId) -> Option<ArchetypeId> {
        self.get(id).parent
    }

    /// Looks up the nested archetype reached from `id` through the associated
    /// type named `name`.
    pub fn nested_type(&self, id: ArchetypeId, name: &str) -> Option<ArchetypeId> {
        self.get(id).nested.get(name).copied()
    }

    pub fn conforms_to(&self, id: ArchetypeId, protocol: ProtocolId) -> bool {
        self.get(id).conforms_to.contains(&protocol)
    }

    pub fn len(&self) -> usize {
        self.archetypes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.archetypes.is_empty()
    }
}

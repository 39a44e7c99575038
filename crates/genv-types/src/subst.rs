// src/subst.rs
//! Type substitution: rewriting generic parameters, projections and
//! archetypes in a type tree from a replacement source.

use std::collections::HashMap;
use std::hash::BuildHasher;
use std::sync::Arc;
use rustc_hash::FxHashMap;

use crate::context::{ArchetypeArena, Module};
use crate::types::{ArchetypeId, AssocTypeRef, GenericParamKey, LoweredFunctionType, Ty, TyKind};

/// A source of replacement types.
///
/// Parameters are asked for by canonical key. A source that has nothing to
/// say about a parameter or archetype leaves it in place.
pub trait TypeReplacements {
    fn replace_param(&self, param: GenericParamKey) -> Option<Ty> {
        let _ = param;
        None
    }

    fn replace_archetype(&self, archetype: ArchetypeId) -> Option<Ty> {
        let _ = archetype;
        None
    }
}

impl<S: BuildHasher> TypeReplacements for HashMap<GenericParamKey, Ty, S> {
    fn replace_param(&self, param: GenericParamKey) -> Option<Ty> {
        self.get(&param).cloned()
    }
}

impl<S: BuildHasher> TypeReplacements for HashMap<ArchetypeId, Ty, S> {
    fn replace_archetype(&self, archetype: ArchetypeId) -> Option<Ty> {
        self.get(&archetype).cloned()
    }
}

impl<T: TypeReplacements + ?Sized> TypeReplacements for &T {
    fn replace_param(&self, param: GenericParamKey) -> Option<Ty> {
        (**self).replace_param(param)
    }

    fn replace_archetype(&self, archetype: ArchetypeId) -> Option<Ty> {
        (**self).replace_archetype(archetype)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SubstOptions {
    /// Allow substitution to reach into already-lowered types.
    pub allow_lowered_types: bool,
}

impl SubstOptions {
    pub const ALLOW_LOWERED_TYPES: SubstOptions = SubstOptions { allow_lowered_types: true };
}

/// Rewrites type trees against one replacement source.
#[derive(Clone, Copy)]
pub struct Substituter<'a> {
    module: &'a Module,
    arena: &'a ArchetypeArena,
    source: &'a dyn TypeReplacements,
    options: SubstOptions,
}

impl<'a> Substituter<'a> {
    pub fn new(
        module: &'a Module,
        arena: &'a ArchetypeArena,
        source: &'a dyn TypeReplacements,
        options: SubstOptions,
    ) -> Self {
        Self { module, arena, source, options }
    }

    /// Substitutes `ty`.
    ///
    /// Panics when a lowered type is reached and `allow_lowered_types` is off.
    pub fn subst(&self, ty: &Ty) -> Ty {
        match &ty.kind {
            TyKind::Primitive(_) | TyKind::Error => ty.clone(),
            TyKind::Named { name, args } => Ty::named(name.clone(), self.subst_all(args)),
            TyKind::Tuple(elems) => Ty::tuple(self.subst_all(elems)),
            TyKind::Function(params, ret) => {
                Ty::new(TyKind::Function(self.subst_all(params), Arc::new(self.subst(ret))))
            }
            TyKind::GenericParam(param) => self.source.replace_param(param.key()).unwrap_or_else(|| ty.clone()),
            TyKind::DependentMember { base, assoc } => {
                let new_base = self.subst(base);
                self.project(new_base, assoc)
            }
            TyKind::Archetype(archetype) => {
                if let Some(replacement) = self.source.replace_archetype(archetype.id) {
                    return replacement;
                }
                // Archetypes of another arena are left for the caller to reject.
                if !self.arena.owns(archetype.id) {
                    log::trace!("archetype {} ({}) is not from arena {}", ty, archetype.id, self.arena.id());
                    return ty.clone();
                }
                // A nested archetype the source doesn't know is rewritten
                // through its parent.
                let data = self.arena.get(archetype.id);
                match (data.parent, &data.assoc) {
                    (Some(parent), Some(assoc)) => {
                        let parent_ty = self.arena.ty(parent);
                        let new_parent = self.subst(&parent_ty);
                        if new_parent == parent_ty {
                            ty.clone()
                        } else {
                            self.project(new_parent, assoc)
                        }
                    }
                    _ => ty.clone(),
                }
            }
            TyKind::Lowered(func) => {
                assert!(
                    self.options.allow_lowered_types,
                    "cannot substitute into lowered type {} without allow_lowered_types",
                    ty
                );
                Ty::new(TyKind::Lowered(LoweredFunctionType {
                    convention: func.convention,
                    params: self.subst_all(&func.params),
                    results: self.subst_all(&func.results),
                }))
            }
        }
    }

    fn subst_all(&self, tys: &[Ty]) -> Vec<Ty> {
        tys.iter().map(|ty| self.subst(ty)).collect()
    }

    /// Projects `assoc` out of an already substituted base.
    fn project(&self, base: Ty, assoc: &AssocTypeRef) -> Ty {
        match &base.kind {
            TyKind::Archetype(archetype) if !self.arena.owns(archetype.id) => {
                log::debug!("cannot project {} out of foreign archetype {}", assoc, base);
                Ty::error()
            }
            TyKind::Archetype(archetype) => match self.arena.nested_type(archetype.id, &assoc.name) {
                Some(nested) => self.arena.ty(nested),
                None => {
                    log::debug!("archetype {} has no nested type {}", base, assoc);
                    Ty::error()
                }
            },
            TyKind::GenericParam(_) | TyKind::DependentMember { .. } => Ty::dependent_member(base, assoc.clone()),
            TyKind::Named { args, .. } => match self.module.type_witness(&base, assoc) {
                Some(witness) if args.is_empty() || !witness.has_type_parameter() => witness.clone(),
                Some(witness) => {
                    let outer: FxHashMap<GenericParamKey, Ty> = args
                        .iter()
                        .enumerate()
                        .map(|(index, arg)| (GenericParamKey::new(0, index as u32), arg.clone()))
                        .collect();
                    Substituter::new(self.module, self.arena, &outer, self.options).subst(witness)
                }
                None => {
                    log::debug!("no type witness for {}.{} in module {}", base, assoc, self.module.name());
                    Ty::error()
                }
            },
            _ => Ty::error(),
        }
    }
}

impl Ty {
    /// Convenience wrapper around [`Substituter::subst`].
    pub fn subst(
        &self,
        module: &Module,
        arena: &ArchetypeArena,
        source: &dyn TypeReplacements,
        options: SubstOptions,
    ) -> Ty {
        Substituter::new(module, arena, source, options).subst(self)
    }
}

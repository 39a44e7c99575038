use genv_signature::Substitution;
use genv_types::{MakeAbstractConformance, Module};

use crate::environment::GenericEnvironment;

impl GenericEnvironment<'_> {
    /// The identity substitutions for this environment's own archetypes.
    ///
    /// Returns one entry per dependent type of the signature, in the same
    /// order: the dependent type mapped into context, paired with an
    /// abstract conformance for every protocol the signature requires of it.
    /// This is what a generic body passes when it calls itself.
    pub fn forwarding_substitutions(&self, module: &Module) -> Vec<Substitution> {
        let subs = self.signature.substitutions(module, self.arena, &self.forward, &MakeAbstractConformance);
        debug_assert_eq!(subs.len(), self.signature.dependent_type_count());
        subs
    }
}

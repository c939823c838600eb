//! Identity substitution.
//!
//! Drives [`Procedure::perform_substitution`] over every value until no
//! child points at an Identity. Keys, effects and code generation all assume
//! this has happened.

use super::{OptimizationPass, run_pass};
use crate::ir::Procedure;

/// Identity substitution pass.
#[derive(Debug, Default)]
pub struct IdentitySubstitution {
    /// Child edges rewritten so far.
    rewritten: usize,
    /// Sweeps over the procedure so far.
    sweeps: usize,
}

impl IdentitySubstitution {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn rewritten(&self) -> usize {
        self.rewritten
    }

    #[inline]
    pub fn sweeps(&self) -> usize {
        self.sweeps
    }

    fn sweep(&mut self, proc: &mut Procedure) -> bool {
        self.sweeps += 1;
        let mut changed = false;
        for id in proc.value_ids() {
            if proc.perform_substitution(id) {
                self.rewritten += 1;
                changed = true;
            }
        }
        changed
    }
}

impl OptimizationPass for IdentitySubstitution {
    fn name(&self) -> &'static str {
        "substitute_identities"
    }

    fn run(&mut self, proc: &mut Procedure) -> bool {
        let mut changed = false;
        // One sweep folds whole chains, so the second only confirms.
        while self.sweep(proc) {
            changed = true;
        }
        changed
    }
}

/// Rewrite every child edge that points at an Identity to the Identity's
/// folded target. Returns whether anything changed.
pub fn substitute_identities(proc: &mut Procedure) -> bool {
    let mut pass = IdentitySubstitution::new();
    let changed = run_pass(proc, &mut pass);
    log::debug!(
        "substitute_identities: {} values rewritten in {} sweeps",
        pass.rewritten(),
        pass.sweeps()
    );
    changed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{Opcode, Origin, Type};

    #[test]
    fn test_chain_is_folded() {
        let mut proc = Procedure::new();
        let d = proc.add_const32(Origin::NONE, 7);
        let c = proc.add_value(Opcode::Identity, Origin::NONE, &[d]);
        let b = proc.add_value(Opcode::Identity, Origin::NONE, &[c]);
        let user = proc.add_value(Opcode::Neg, Origin::NONE, &[b]);

        assert!(substitute_identities(&mut proc));
        assert_eq!(proc.value(user).child(0), d);
        assert_eq!(proc.value(user).ty(), Type::Int32);

        for (_, value) in proc.values() {
            for child in value.children().iter() {
                assert_ne!(proc.value(child).opcode(), Opcode::Identity);
            }
        }
    }

    #[test]
    fn test_nothing_to_do() {
        let mut proc = Procedure::new();
        let a = proc.add_const64(Origin::NONE, 1);
        proc.add_value(Opcode::Neg, Origin::NONE, &[a]);

        let mut pass = IdentitySubstitution::new();
        assert!(!pass.run(&mut proc));
        assert_eq!(pass.sweeps(), 1);
        assert_eq!(pass.rewritten(), 0);
    }

    #[test]
    fn test_rewritten_counts_values() {
        let mut proc = Procedure::new();
        let a = proc.add_const32(Origin::NONE, 1);
        let forward = proc.add_value(Opcode::Identity, Origin::NONE, &[a]);
        proc.add_value(Opcode::Add, Origin::NONE, &[forward, forward]);
        proc.add_value(Opcode::Neg, Origin::NONE, &[forward]);

        let mut pass = IdentitySubstitution::new();
        assert!(pass.run(&mut proc));
        assert_eq!(pass.rewritten(), 2);
        assert_eq!(pass.sweeps(), 2);
    }
}

//! Passes built directly on the value substrate.
//!
//! Both passes leave every value's index untouched: redundant values are
//! rewritten in place into Identity forwarders, and the forwarders are then
//! skipped by substitution.

pub mod cse;
pub mod substitution;

pub use cse::{LocalCse, eliminate_local_common_subexpressions};
pub use substitution::{IdentitySubstitution, substitute_identities};

use crate::ir::Procedure;

/// A transformation over a whole procedure.
pub trait OptimizationPass {
    /// Short name used in logs and validation failures.
    fn name(&self) -> &'static str;

    /// Run the pass. Returns whether anything changed.
    fn run(&mut self, proc: &mut Procedure) -> bool;
}

/// Run `pass` and validate afterwards when the procedure asks for it.
pub fn run_pass(proc: &mut Procedure, pass: &mut dyn OptimizationPass) -> bool {
    let changed = pass.run(proc);
    log::debug!("{}: changed = {changed}", pass.name());
    proc.check_after_mutation(pass.name());
    changed
}

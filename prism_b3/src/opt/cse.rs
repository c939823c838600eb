//! Local common subexpression elimination.
//!
//! Value numbering within one block at a time, keyed by [`ValueKey`]. When
//! a value's key was already produced earlier in the same block, the later
//! value becomes an Identity of the earlier one. Order within a block means
//! the earlier value always dominates the later one, so control-dependent
//! values may merge as well.

use rustc_hash::FxHashMap;

use super::substitution::IdentitySubstitution;
use super::{OptimizationPass, run_pass};
use crate::config::CseConfig;
use crate::ir::{BlockId, Effects, Opcode, Procedure, ValueId, ValueKey};

/// Local CSE pass.
#[derive(Debug)]
pub struct LocalCse {
    config: CseConfig,
    /// Values turned into forwarders so far.
    eliminated: usize,
}

impl LocalCse {
    pub fn new(config: CseConfig) -> Self {
        Self {
            config,
            eliminated: 0,
        }
    }

    /// Number of values eliminated.
    #[inline]
    pub fn eliminated(&self) -> usize {
        self.eliminated
    }

    fn can_merge(&self, effects: &Effects) -> bool {
        if effects.is_none() {
            return true;
        }
        self.config.merge_control_dependent
            && *effects
                == Effects {
                    control_dependent: true,
                    ..Effects::none()
                }
    }

    fn run_block(
        &mut self,
        proc: &mut Procedure,
        block: BlockId,
        table: &mut FxHashMap<ValueKey, ValueId>,
    ) -> bool {
        table.clear();
        let mut changed = false;
        let values = proc.block(block).values().to_vec();
        for id in values {
            changed |= proc.perform_substitution(id);
            let value = proc.value(id);
            if value.opcode() == Opcode::Identity || !self.can_merge(&value.effects()) {
                continue;
            }
            let Some(key) = value.key() else {
                continue;
            };
            match table.get(&key) {
                Some(&earlier) => {
                    log::trace!("{id} duplicates {earlier} ({key})");
                    proc.replace_with_identity(id, earlier);
                    self.eliminated += 1;
                    changed = true;
                }
                None => {
                    table.insert(key, id);
                }
            }
        }
        changed
    }
}

impl OptimizationPass for LocalCse {
    fn name(&self) -> &'static str {
        "local_cse"
    }

    fn run(&mut self, proc: &mut Procedure) -> bool {
        let mut substitution = IdentitySubstitution::new();
        let mut changed = substitution.run(proc);

        let mut table = FxHashMap::default();
        for iteration in 0..self.config.max_iterations {
            let mut swept = false;
            for block in proc.block_ids() {
                swept |= self.run_block(proc, block, &mut table);
            }
            if !swept {
                break;
            }
            log::trace!("local_cse: iteration {iteration} changed the procedure");
            changed = true;
        }

        // Users in other blocks may still point at the new forwarders.
        substitution.run(proc);
        changed
    }
}

/// Merge values that recompute something already available earlier in the
/// same block. Returns the number of values eliminated.
pub fn eliminate_local_common_subexpressions(proc: &mut Procedure, config: &CseConfig) -> usize {
    let mut pass = LocalCse::new(config.clone());
    run_pass(proc, &mut pass);
    log::debug!("local_cse: eliminated {} values", pass.eliminated());
    pass.eliminated()
}

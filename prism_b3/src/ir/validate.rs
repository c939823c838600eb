//! Structural validation of a procedure.
//!
//! Checks what construction cannot enforce on its own once passes start
//! rewriting: children that exist, types that still agree with inference,
//! arity and payload, block placement and terminator position.

use rustc_hash::FxHashSet;

use super::procedure::Procedure;
use super::value::infer_type;
use crate::error::{Result, ValidationError};

impl Procedure {
    /// Check the procedure; returns the first problem found.
    pub fn validate(&self) -> Result<()> {
        for (id, value) in self.values() {
            let kind = value.kind();
            let count = value.num_children();
            if !kind.opcode().arity().accepts(count) {
                return Err(ValidationError::BadArity {
                    value: id,
                    kind,
                    count,
                });
            }
            if !value.data().fits(kind.opcode()) {
                return Err(ValidationError::BadPayload { value: id, kind });
            }
            if let Some(child) = value.children().iter().find(|&c| !self.contains_value(c)) {
                return Err(ValidationError::MissingChild { value: id, child });
            }
            let child_type = |index: usize| value.children().get(index).map(|c| self.value(c).ty());
            if let Some(expected) = infer_type(kind, child_type(0), child_type(1)) {
                if expected != value.ty() {
                    return Err(ValidationError::TypeMismatch {
                        value: id,
                        kind,
                        expected,
                        actual: value.ty(),
                    });
                }
            }
        }

        let mut placed = FxHashSet::default();
        for (block_id, block) in self.blocks() {
            for (position, &id) in block.values().iter().enumerate() {
                if !self.contains_value(id) {
                    return Err(ValidationError::UnknownValue {
                        block: block_id,
                        value: id,
                    });
                }
                if !placed.insert(id) {
                    return Err(ValidationError::DuplicatePlacement { value: id });
                }
                let value = self.value(id);
                if value.owner() != Some(block_id) {
                    return Err(ValidationError::OwnerMismatch {
                        value: id,
                        block: block_id,
                        owner: value.owner(),
                    });
                }
                let is_last = position + 1 == block.len();
                if value.opcode().is_terminal() && !is_last {
                    return Err(ValidationError::MisplacedTerminator {
                        value: id,
                        block: block_id,
                    });
                }
                if is_last && !value.opcode().is_terminal() {
                    return Err(ValidationError::MissingTerminator { block: block_id });
                }
            }
            for successor in block.successor_blocks() {
                if successor.as_usize() >= self.num_blocks() {
                    return Err(ValidationError::UnknownSuccessor {
                        block: block_id,
                        successor,
                    });
                }
            }
        }

        for (id, value) in self.values() {
            if let Some(owner) = value.owner() {
                if !placed.contains(&id) {
                    return Err(ValidationError::Orphan { value: id, owner });
                }
            }
        }
        Ok(())
    }
}

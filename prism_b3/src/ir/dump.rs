//! Textual dumps of values, blocks and procedures.
//!
//! Formats:
//! - short: `b@7`, or `$42(b@7)` for constants
//! - deep: `Int32 b@3 = Add(b@1, b@2, <meta>, <effects>, <origin>)`
//! - successors: `Then:#1, Else:#2` for a well-formed Branch, else `[#1, #2]`
//!
//! These are debugging aids; none of them may panic on malformed IR.

use std::fmt;

use super::block::BlockId;
use super::opcode::Opcode;
use super::procedure::Procedure;
use super::value::{Value, ValueData, ValueId};

/// Prefix of every value name in dumps.
pub const DUMP_PREFIX: &str = "b@";

/// Short form.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let constant = match self.data() {
            ValueData::Const32(v) => Some(v.to_string()),
            ValueData::Const64(v) => Some(v.to_string()),
            ValueData::ConstFloat(bits) => Some(format!("{:?}", f32::from_bits(*bits))),
            ValueData::ConstDouble(bits) => Some(format!("{:?}", f64::from_bits(*bits))),
            _ => None,
        };
        match constant {
            Some(literal) => write!(f, "${literal}({DUMP_PREFIX}{})", self.index().index()),
            None => write!(f, "{DUMP_PREFIX}{}", self.index().index()),
        }
    }
}

/// Deep dump of one value, resolving children and origin through the
/// procedure.
pub struct DeepDump<'a> {
    proc: &'a Procedure,
    value: ValueId,
}

impl<'a> DeepDump<'a> {
    pub fn new(proc: &'a Procedure, value: ValueId) -> Self {
        DeepDump { proc, value }
    }
}

impl fmt::Display for DeepDump<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.proc.contains_value(self.value) {
            return f.write_str("<null>");
        }
        let value = self.proc.value(self.value);
        write!(
            f,
            "{} {DUMP_PREFIX}{} = {}(",
            value.ty(),
            value.index().index(),
            value.kind()
        )?;

        let mut parts: Vec<String> = value
            .children()
            .iter()
            .map(|child| {
                if self.proc.contains_value(child) {
                    self.proc.value(child).to_string()
                } else {
                    format!("{DUMP_PREFIX}{}", child.index())
                }
            })
            .collect();
        parts.extend(value.data().meta());
        let effects = value.effects().to_string();
        if !effects.is_empty() {
            parts.push(effects);
        }
        if let Some(origin) = self.proc.origins().describe(value.origin()) {
            parts.push(origin.to_string());
        }
        write!(f, "{})", parts.join(", "))
    }
}

/// Successor list of a block, as its terminator sees it.
pub struct SuccessorsDump<'a> {
    proc: &'a Procedure,
    block: BlockId,
}

impl<'a> SuccessorsDump<'a> {
    pub fn new(proc: &'a Procedure, block: BlockId) -> Self {
        SuccessorsDump { proc, block }
    }
}

impl fmt::Display for SuccessorsDump<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let block = self.proc.block(self.block);
        let is_branch = block
            .last()
            .filter(|&last| self.proc.contains_value(last))
            .is_some_and(|last| self.proc.value(last).opcode() == Opcode::Branch);
        if is_branch && block.num_successors() == 2 {
            if let (Some(taken), Some(not_taken)) = (block.taken(), block.not_taken()) {
                return write!(f, "Then:{taken}, Else:{not_taken}");
            }
        }
        let successors: Vec<String> = block.successors().iter().map(|s| s.to_string()).collect();
        write!(f, "[{}]", successors.join(", "))
    }
}

impl Procedure {
    pub fn deep_dump(&self, value: ValueId) -> DeepDump<'_> {
        DeepDump::new(self, value)
    }

    pub fn dump_successors(&self, block: BlockId) -> SuccessorsDump<'_> {
        SuccessorsDump::new(self, block)
    }
}

impl fmt::Display for Procedure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (block_id, block) in self.blocks() {
            writeln!(f, "BB{block_id}:")?;
            if !block.predecessors().is_empty() {
                let predecessors: Vec<String> =
                    block.predecessors().iter().map(|p| p.to_string()).collect();
                writeln!(f, "  Predecessors: {}", predecessors.join(", "))?;
            }
            for &value in block.values() {
                writeln!(f, "    {}", self.deep_dump(value))?;
            }
            if block.num_successors() > 0 {
                writeln!(f, "  Successors: {}", self.dump_successors(block_id))?;
            }
        }
        Ok(())
    }
}

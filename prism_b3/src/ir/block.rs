//! Basic blocks.
//!
//! A block owns the order of its values and its outgoing edges. The last
//! value of a well-formed block is its terminator; the successor list is what
//! that terminator branches to (`Branch` keeps taken/not-taken in slots 0/1).

use std::fmt;

use smallvec::SmallVec;

use super::arena::Id;
use super::value::ValueId;

/// Block identifier.
pub type BlockId = Id<BasicBlock>;

// =============================================================================
// Frequented block
// =============================================================================

/// How often an edge is expected to be taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Frequency {
    #[default]
    Normal,
    Rare,
}

/// A successor edge: target block plus its expected frequency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrequentedBlock {
    pub block: BlockId,
    pub frequency: Frequency,
}

impl FrequentedBlock {
    pub fn new(block: BlockId) -> Self {
        FrequentedBlock {
            block,
            frequency: Frequency::Normal,
        }
    }

    pub fn rare(block: BlockId) -> Self {
        FrequentedBlock {
            block,
            frequency: Frequency::Rare,
        }
    }
}

impl From<BlockId> for FrequentedBlock {
    fn from(block: BlockId) -> Self {
        FrequentedBlock::new(block)
    }
}

impl fmt::Display for FrequentedBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.block)?;
        if self.frequency == Frequency::Rare {
            f.write_str("/Rare")?;
        }
        Ok(())
    }
}

// =============================================================================
// Basic Block
// =============================================================================

#[derive(Debug, Clone)]
pub struct BasicBlock {
    index: BlockId,

    /// Values in execution order.
    values: Vec<ValueId>,

    successors: SmallVec<[FrequentedBlock; 2]>,

    /// Recomputed by [`crate::ir::Procedure::reset_predecessors`].
    predecessors: SmallVec<[BlockId; 2]>,
}

impl BasicBlock {
    pub(crate) fn new(index: BlockId) -> Self {
        BasicBlock {
            index,
            values: Vec::new(),
            successors: SmallVec::new(),
            predecessors: SmallVec::new(),
        }
    }

    #[inline]
    pub fn index(&self) -> BlockId {
        self.index
    }

    #[inline]
    pub fn values(&self) -> &[ValueId] {
        &self.values
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[inline]
    pub fn last(&self) -> Option<ValueId> {
        self.values.last().copied()
    }

    /// Position of `value` in this block.
    pub fn position_of(&self, value: ValueId) -> Option<usize> {
        self.values.iter().position(|&v| v == value)
    }

    pub fn contains(&self, value: ValueId) -> bool {
        self.position_of(value).is_some()
    }

    pub(crate) fn push(&mut self, value: ValueId) {
        self.values.push(value);
    }

    pub(crate) fn insert(&mut self, position: usize, value: ValueId) {
        assert!(
            position <= self.values.len(),
            "insertion point {position} past the end of {}",
            self.index
        );
        self.values.insert(position, value);
    }

    // -------------------------------------------------------------------------
    // Successors
    // -------------------------------------------------------------------------

    #[inline]
    pub fn successors(&self) -> &[FrequentedBlock] {
        &self.successors
    }

    pub fn successor_blocks(&self) -> impl Iterator<Item = BlockId> + '_ {
        self.successors.iter().map(|edge| edge.block)
    }

    #[inline]
    pub fn num_successors(&self) -> usize {
        self.successors.len()
    }

    pub fn successor(&self, index: usize) -> Option<FrequentedBlock> {
        self.successors.get(index).copied()
    }

    pub fn set_successors(&mut self, successors: &[FrequentedBlock]) {
        self.successors = SmallVec::from_slice(successors);
    }

    /// Single-edge form used by Jump.
    pub fn set_successor(&mut self, target: FrequentedBlock) {
        self.set_successors(&[target]);
    }

    /// Two-edge form used by Branch.
    pub fn set_branch_successors(&mut self, taken: FrequentedBlock, not_taken: FrequentedBlock) {
        self.set_successors(&[taken, not_taken]);
    }

    pub fn clear_successors(&mut self) {
        self.successors.clear();
    }

    /// Branch target when the condition is nonzero.
    pub fn taken(&self) -> Option<FrequentedBlock> {
        self.successor(0)
    }

    /// Branch target when the condition is zero.
    pub fn not_taken(&self) -> Option<FrequentedBlock> {
        self.successor(1)
    }

    // -------------------------------------------------------------------------
    // Predecessors
    // -------------------------------------------------------------------------

    #[inline]
    pub fn predecessors(&self) -> &[BlockId] {
        &self.predecessors
    }

    pub(crate) fn clear_predecessors(&mut self) {
        self.predecessors.clear();
    }

    pub(crate) fn add_predecessor(&mut self, block: BlockId) {
        if !self.predecessors.contains(&block) {
            self.predecessors.push(block);
        }
    }
}

//! The procedure: owner of every value, block and origin of one compilation
//! unit.
//!
//! All construction goes through the `add_*` family, which assigns the next
//! index, checks the opcode's arity and payload, and infers or checks the
//! result type. A malformed construction is a compiler bug and aborts.
//!
//! Values start out detached; [`Procedure::append`] and
//! [`Procedure::insert`] place them in a block and set their owner.

use super::arena::Arena;
use super::block::{BasicBlock, BlockId, FrequentedBlock};
use super::children::Children;
use super::constant::Constant;
use super::effects::Effects;
use super::heap_range::HeapRange;
use super::key::{KeyOperands, ValueKey};
use super::kind::{Kind, bad_kind};
use super::opcode::{Opcode, inverted_compare};
use super::origin::{Origin, OriginTable};
use super::types::{Type, pointer_type};
use super::value::{
    AtomicData, BoundsCheckBound, BoundsCheckData, MemoryData, Value, ValueData, ValueId,
    infer_type,
};
use crate::config::ProcedureConfig;

#[derive(Debug)]
pub struct Procedure {
    config: ProcedureConfig,
    values: Arena<Value>,
    blocks: Arena<BasicBlock>,
    origins: OriginTable,
}

impl Default for Procedure {
    fn default() -> Self {
        Self::new()
    }
}

impl Procedure {
    pub fn new() -> Self {
        Self::with_config(ProcedureConfig::default())
    }

    pub fn with_config(config: ProcedureConfig) -> Self {
        Procedure {
            values: Arena::with_capacity(config.initial_value_capacity),
            blocks: Arena::with_capacity(config.initial_block_capacity),
            origins: OriginTable::new(),
            config,
        }
    }

    #[inline]
    pub fn config(&self) -> &ProcedureConfig {
        &self.config
    }

    // =========================================================================
    // Lookup
    // =========================================================================

    /// The value at `id`. Panics on an id from another procedure.
    #[inline]
    pub fn value(&self, id: ValueId) -> &Value {
        &self.values[id]
    }

    #[inline]
    pub fn value_mut(&mut self, id: ValueId) -> &mut Value {
        &mut self.values[id]
    }

    #[inline]
    pub fn contains_value(&self, id: ValueId) -> bool {
        self.values.contains(id)
    }

    pub fn values(&self) -> impl Iterator<Item = (ValueId, &Value)> {
        self.values.iter()
    }

    /// All value ids, without borrowing the procedure.
    pub fn value_ids(&self) -> impl Iterator<Item = ValueId> + use<> {
        self.values.ids()
    }

    #[inline]
    pub fn num_values(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn block(&self, id: BlockId) -> &BasicBlock {
        &self.blocks[id]
    }

    #[inline]
    pub fn block_mut(&mut self, id: BlockId) -> &mut BasicBlock {
        &mut self.blocks[id]
    }

    pub fn blocks(&self) -> impl Iterator<Item = (BlockId, &BasicBlock)> {
        self.blocks.iter()
    }

    pub fn block_ids(&self) -> impl Iterator<Item = BlockId> + use<> {
        self.blocks.ids()
    }

    #[inline]
    pub fn num_blocks(&self) -> usize {
        self.blocks.len()
    }

    #[inline]
    pub fn origins(&self) -> &OriginTable {
        &self.origins
    }

    pub fn add_origin(&mut self, description: impl Into<String>) -> Origin {
        self.origins.add(description)
    }

    // =========================================================================
    // Blocks
    // =========================================================================

    pub fn add_block(&mut self) -> BlockId {
        self.blocks.alloc_with(BasicBlock::new)
    }

    /// Append a detached value to the end of `block`.
    pub fn append(&mut self, block: BlockId, value: ValueId) {
        self.claim(block, value);
        self.blocks[block].push(value);
    }

    /// Insert a detached value at `position` in `block`.
    pub fn insert(&mut self, block: BlockId, position: usize, value: ValueId) {
        self.claim(block, value);
        self.blocks[block].insert(position, value);
    }

    /// Insert a detached value right before `anchor` in `anchor`'s block.
    ///
    /// Does nothing when `anchor` is itself detached.
    pub fn insert_before(&mut self, anchor: ValueId, value: ValueId) {
        let Some(block) = self.values[anchor].owner() else {
            return;
        };
        let position = match self.blocks[block].position_of(anchor) {
            Some(position) => position,
            None => panic!("{anchor} claims to be owned by {block} but is not in it"),
        };
        self.insert(block, position, value);
    }

    fn claim(&mut self, block: BlockId, value: ValueId) {
        let slot = &mut self.values[value];
        if let Some(owner) = slot.owner() {
            panic!("{value} is already placed in {owner}");
        }
        slot.set_owner(Some(block));
    }

    /// Recompute every value's owner from block membership.
    pub fn reset_value_owners(&mut self) {
        for (_, value) in self.values.iter_mut() {
            value.set_owner(None);
        }
        for (block_id, block) in self.blocks.iter() {
            for &value in block.values() {
                self.values[value].set_owner(Some(block_id));
            }
        }
    }

    /// Recompute every block's predecessors from successor edges.
    pub fn reset_predecessors(&mut self) {
        for (_, block) in self.blocks.iter_mut() {
            block.clear_predecessors();
        }
        for block_id in self.block_ids() {
            let successors: Vec<BlockId> = self.blocks[block_id].successor_blocks().collect();
            for successor in successors {
                self.blocks[successor].add_predecessor(block_id);
            }
        }
    }

    // =========================================================================
    // Construction
    // =========================================================================

    fn alloc(
        &mut self,
        kind: Kind,
        ty: Type,
        origin: Origin,
        children: &[ValueId],
        data: ValueData,
    ) -> ValueId {
        let arity = kind.opcode().arity();
        if !arity.accepts(children.len()) || !data.fits(kind.opcode()) {
            bad_kind(kind, children.len());
        }
        for &child in children {
            assert!(
                self.values.contains(child),
                "{kind} refers to unknown child {child}"
            );
        }
        let children = Children::for_arity(arity, children);
        let id = self
            .values
            .alloc_with(|id| Value::new(id, kind, ty, origin, children, data));
        log::trace!("added {ty} {id} = {kind}");
        id
    }

    fn child_types(&self, children: &[ValueId]) -> (Option<Type>, Option<Type>) {
        let ty = |index: usize| children.get(index).map(|&child| self.values[child].ty());
        (ty(0), ty(1))
    }

    /// Add a value whose type follows from its kind and children.
    pub fn add_value(
        &mut self,
        kind: impl Into<Kind>,
        origin: Origin,
        children: &[ValueId],
    ) -> ValueId {
        let kind = kind.into();
        if !kind.opcode().arity().accepts(children.len()) {
            bad_kind(kind, children.len());
        }
        let (first, second) = self.child_types(children);
        let ty = super::value::type_for(kind, first, second);
        self.alloc(kind, ty, origin, children, ValueData::None)
    }

    /// Add a value with an explicit type.
    ///
    /// Opcodes with an inference rule must agree with it.
    pub fn add_value_with_type(
        &mut self,
        kind: impl Into<Kind>,
        ty: Type,
        origin: Origin,
        children: &[ValueId],
    ) -> ValueId {
        let kind = kind.into();
        if !kind.opcode().arity().accepts(children.len()) {
            bad_kind(kind, children.len());
        }
        let (first, second) = self.child_types(children);
        if let Some(expected) = infer_type(kind, first, second) {
            assert!(
                expected == ty,
                "{kind} produces {expected}, not {ty}"
            );
        }
        self.alloc(kind, ty, origin, children, ValueData::None)
    }

    pub fn add_const32(&mut self, origin: Origin, value: i32) -> ValueId {
        self.alloc(
            Opcode::Const32.into(),
            Type::Int32,
            origin,
            &[],
            ValueData::Const32(value),
        )
    }

    pub fn add_const64(&mut self, origin: Origin, value: i64) -> ValueId {
        self.alloc(
            Opcode::Const64.into(),
            Type::Int64,
            origin,
            &[],
            ValueData::Const64(value),
        )
    }

    pub fn add_const_double(&mut self, origin: Origin, value: f64) -> ValueId {
        self.alloc(
            Opcode::ConstDouble.into(),
            Type::Double,
            origin,
            &[],
            ValueData::ConstDouble(value.to_bits()),
        )
    }

    pub fn add_const_float(&mut self, origin: Origin, value: f32) -> ValueId {
        self.alloc(
            Opcode::ConstFloat.into(),
            Type::Float,
            origin,
            &[],
            ValueData::ConstFloat(value.to_bits()),
        )
    }

    pub fn add_constant(&mut self, origin: Origin, constant: Constant) -> ValueId {
        match constant {
            Constant::Int32(v) => self.add_const32(origin, v),
            Constant::Int64(v) => self.add_const64(origin, v),
            Constant::Float(v) => self.add_const_float(origin, v),
            Constant::Double(v) => self.add_const_double(origin, v),
        }
    }

    /// Zero of `ty`, or the bottom tuple.
    pub fn add_bottom(&mut self, origin: Origin, ty: Type) -> ValueId {
        if ty == Type::Tuple {
            return self.add_value(Opcode::BottomTuple, origin, &[]);
        }
        match Constant::zero(ty) {
            Some(zero) => self.add_constant(origin, zero),
            None => panic!("no bottom value of type {ty}"),
        }
    }

    /// Add a load or store.
    ///
    /// Stores are Void and narrow loads are Int32; `Load` takes any numeric
    /// type.
    pub fn add_memory(
        &mut self,
        kind: impl Into<Kind>,
        ty: Type,
        origin: Origin,
        children: &[ValueId],
        memory: MemoryData,
    ) -> ValueId {
        let kind = kind.into();
        match kind.opcode() {
            Opcode::Store8 | Opcode::Store16 | Opcode::Store => {
                assert!(ty == Type::Void, "{kind} must be Void, not {ty}");
            }
            Opcode::Load8Z | Opcode::Load8S | Opcode::Load16Z | Opcode::Load16S => {
                assert!(ty == Type::Int32, "{kind} must be Int32, not {ty}");
            }
            Opcode::Load => assert!(ty.is_numeric(), "Load cannot produce {ty}"),
            _ => bad_kind(kind, children.len()),
        }
        self.alloc(kind, ty, origin, children, ValueData::Memory(memory))
    }

    pub fn add_atomic(
        &mut self,
        kind: impl Into<Kind>,
        ty: Type,
        origin: Origin,
        children: &[ValueId],
        atomic: AtomicData,
    ) -> ValueId {
        let kind = kind.into();
        if kind.opcode() == Opcode::AtomicWeakCAS {
            assert!(ty == Type::Int32, "AtomicWeakCAS must be Int32, not {ty}");
        } else {
            assert!(ty.is_int(), "{kind} cannot produce {ty}");
        }
        self.alloc(kind, ty, origin, children, ValueData::Atomic(atomic))
    }

    pub fn add_fence(&mut self, origin: Origin, read: HeapRange, write: HeapRange) -> ValueId {
        self.alloc(
            Opcode::Fence.into(),
            Type::Void,
            origin,
            &[],
            ValueData::Fence { read, write },
        )
    }

    /// Call into foreign code. `children[0]` is the callee.
    pub fn add_ccall(
        &mut self,
        ty: Type,
        origin: Origin,
        effects: Effects,
        children: &[ValueId],
    ) -> ValueId {
        self.alloc(
            Opcode::CCall.into(),
            ty,
            origin,
            children,
            ValueData::CCall(effects),
        )
    }

    pub fn add_patchpoint(
        &mut self,
        ty: Type,
        origin: Origin,
        effects: Effects,
        children: &[ValueId],
    ) -> ValueId {
        self.alloc(
            Opcode::Patchpoint.into(),
            ty,
            origin,
            children,
            ValueData::Patchpoint(effects),
        )
    }

    pub fn add_bounds_check(
        &mut self,
        origin: Origin,
        pointer: ValueId,
        offset: u32,
        bound: BoundsCheckBound,
    ) -> ValueId {
        self.alloc(
            Opcode::WasmBoundsCheck.into(),
            Type::Void,
            origin,
            &[pointer],
            ValueData::BoundsCheck(BoundsCheckData { offset, bound }),
        )
    }

    pub fn add_argument_reg(&mut self, origin: Origin, reg: u32) -> ValueId {
        self.alloc(
            Opcode::ArgumentReg.into(),
            pointer_type(),
            origin,
            &[],
            ValueData::ArgumentReg(reg),
        )
    }

    pub fn add_slot_base(&mut self, origin: Origin, slot: u32) -> ValueId {
        self.alloc(
            Opcode::SlotBase.into(),
            pointer_type(),
            origin,
            &[],
            ValueData::SlotBase(slot),
        )
    }

    /// `Get` (no children, type of the variable) or `Set` (one child, Void).
    pub fn add_variable_op(
        &mut self,
        kind: impl Into<Kind>,
        ty: Type,
        origin: Origin,
        variable: u32,
        children: &[ValueId],
    ) -> ValueId {
        let kind = kind.into();
        if kind.opcode() == Opcode::Set {
            assert!(ty == Type::Void, "Set must be Void, not {ty}");
        }
        self.alloc(kind, ty, origin, children, ValueData::Variable(variable))
    }

    pub fn add_upsilon(&mut self, origin: Origin, value: ValueId, phi: Option<ValueId>) -> ValueId {
        self.alloc(
            Opcode::Upsilon.into(),
            Type::Void,
            origin,
            &[value],
            ValueData::Upsilon(phi),
        )
    }

    pub fn add_extract(&mut self, origin: Origin, ty: Type, tuple: ValueId, index: u32) -> ValueId {
        assert!(
            self.values[tuple].ty() == Type::Tuple,
            "Extract from non-tuple {tuple}"
        );
        self.alloc(
            Opcode::Extract.into(),
            ty,
            origin,
            &[tuple],
            ValueData::Extract(index),
        )
    }

    /// Rebuild a fresh pure value from its key.
    pub fn materialize(&mut self, key: &ValueKey, origin: Origin) -> ValueId {
        assert!(key.can_materialize(), "cannot materialize {key}");
        match key.operands() {
            KeyOperands::Literal(bits) => {
                let constant = match key.opcode() {
                    Opcode::Const32 => Constant::Int32(bits as u32 as i32),
                    Opcode::Const64 => Constant::Int64(bits as i64),
                    Opcode::ConstFloat => Constant::Float(f32::from_bits(bits as u32)),
                    Opcode::ConstDouble => Constant::Double(f64::from_bits(bits)),
                    _ => panic!("literal key {key} is not a constant"),
                };
                self.add_constant(origin, constant)
            }
            _ => self.add_value_with_type(key.kind(), key.ty(), origin, &key.children()),
        }
    }

    /// Allocate the comparison that is true exactly when `id` is false.
    ///
    /// `None` unless `id` is an invertible two-operand comparison.
    pub fn inverted_compare(&mut self, id: ValueId) -> Option<ValueId> {
        let value = &self.values[id];
        if value.num_children() != 2 {
            return None;
        }
        let (left, right) = (value.child(0), value.child(1));
        let inverted = inverted_compare(value.opcode(), self.values[left].ty())?;
        let (ty, origin) = (value.ty(), value.origin());
        Some(self.add_value_with_type(inverted, ty, origin, &[left, right]))
    }

    // =========================================================================
    // Identity chains
    // =========================================================================

    /// Follow Identity edges from `id` to the first non-Identity value.
    pub fn fold_identity(&self, id: ValueId) -> ValueId {
        let mut current = id;
        let mut steps = 0;
        while self.values[current].opcode() == Opcode::Identity {
            current = self.values[current].child(0);
            steps += 1;
            assert!(steps <= self.values.len(), "identity cycle through {id}");
        }
        current
    }

    /// Point every child of `id` that is an Identity at its folded target.
    ///
    /// Returns whether any child changed.
    pub fn perform_substitution(&mut self, id: ValueId) -> bool {
        let mut changed = false;
        for index in 0..self.values[id].num_children() {
            let child = self.values[id].child(index);
            if self.values[child].opcode() == Opcode::Identity {
                let target = self.fold_identity(child);
                self.values[id].set_child(index, target);
                changed = true;
            }
        }
        changed
    }

    // =========================================================================
    // In-place replacement
    // =========================================================================

    /// Make `id` forward to `target`. A Void value becomes a Nop instead.
    ///
    /// The two must have the same type.
    pub fn replace_with_identity(&mut self, id: ValueId, target: ValueId) {
        let target_ty = self.values[target].ty();
        let ty = self.values[id].ty();
        if ty != target_ty {
            log::error!("cannot replace {ty} {id} with {target_ty} {target}");
            panic!("replace_with_identity type mismatch: {ty} {id} vs {target_ty} {target}");
        }
        assert!(id != target, "cannot replace {id} with itself");
        let value = &mut self.values[id];
        if ty == Type::Void {
            value.replace_with_nop_ignoring_type();
        } else {
            value.replace_with_child(Opcode::Identity, ty, target);
        }
    }

    /// Make `id` forward to the zero of its type, placed right before it.
    ///
    /// Void values become Nops; constants are left alone.
    pub fn replace_with_bottom(&mut self, id: ValueId) {
        let value = &self.values[id];
        let (ty, origin) = (value.ty(), value.origin());
        if ty == Type::Void {
            self.values[id].replace_with_nop();
            return;
        }
        if value.is_constant() {
            return;
        }
        let bottom = self.add_bottom(origin, ty);
        self.insert_before(id, bottom);
        self.replace_with_identity(id, bottom);
    }

    fn expect_last(&self, block: BlockId, id: ValueId) {
        if self.blocks[block].last() != Some(id) {
            log::error!("{id} is not the last value of {block}");
            panic!("{id} is not the last value of {block}");
        }
    }

    /// Turn the terminator `id` of `block` into a Jump to `target`.
    pub fn replace_with_jump(&mut self, block: BlockId, id: ValueId, target: FrequentedBlock) {
        self.expect_last(block, id);
        self.values[id].replace_with(Opcode::Jump, Type::Void);
        self.blocks[block].set_successor(target);
    }

    /// Turn the terminator `id` of `block` into an Oops.
    pub fn replace_with_oops(&mut self, block: BlockId, id: ValueId) {
        self.expect_last(block, id);
        self.values[id].replace_with(Opcode::Oops, Type::Void);
        self.blocks[block].clear_successors();
    }

    /// Validate when the configuration asks for it; abort on a broken IR.
    pub fn check_after_mutation(&self, pass: &str) {
        if !self.config.validate_after_mutation {
            return;
        }
        if let Err(err) = self.validate() {
            log::error!("{pass} left the procedure invalid: {err}");
            panic!("{pass} left the procedure invalid: {err}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indices_are_monotonic() {
        let mut proc = Procedure::new();
        let a = proc.add_const32(Origin::NONE, 1);
        let b = proc.add_const32(Origin::NONE, 2);
        let c = proc.add_value(Opcode::Add, Origin::NONE, &[a, b]);
        assert!(a < b && b < c);
        assert_eq!(proc.value(c).index(), c);
        assert_eq!(proc.num_values(), 3);
    }

    #[test]
    fn test_append_sets_owner() {
        let mut proc = Procedure::new();
        let block = proc.add_block();
        let a = proc.add_const32(Origin::NONE, 1);
        assert_eq!(proc.value(a).owner(), None);
        proc.append(block, a);
        assert_eq!(proc.value(a).owner(), Some(block));
    }

    #[test]
    fn test_reset_value_owners() {
        let mut proc = Procedure::new();
        let block = proc.add_block();
        let a = proc.add_const32(Origin::NONE, 1);
        proc.append(block, a);
        proc.value_mut(a).set_owner(None);
        proc.reset_value_owners();
        assert_eq!(proc.value(a).owner(), Some(block));
    }

    #[test]
    fn test_reset_predecessors() {
        let mut proc = Procedure::new();
        let entry = proc.add_block();
        let left = proc.add_block();
        let right = proc.add_block();
        proc.block_mut(entry)
            .set_branch_successors(left.into(), right.into());
        proc.block_mut(left).set_successor(right.into());
        proc.reset_predecessors();
        assert_eq!(proc.block(right).predecessors(), &[entry, left]);
        assert_eq!(proc.block(left).predecessors(), &[entry]);
        assert!(proc.block(entry).predecessors().is_empty());
    }

    #[test]
    fn test_materialize_round_trips_key() {
        let mut proc = Procedure::new();
        let x = proc.add_argument_reg(Origin::NONE, 0);
        let y = proc.add_argument_reg(Origin::NONE, 1);
        let add = proc.add_value(Opcode::Add, Origin::NONE, &[x, y]);
        let key = proc.value(add).key().expect("add is keyed");
        let copy = proc.materialize(&key, Origin::NONE);
        assert_ne!(copy, add);
        assert_eq!(proc.value(copy).key(), Some(key));

        let c = proc.add_const_double(Origin::NONE, -0.0);
        let key = proc.value(c).key().expect("constants are keyed");
        let copy = proc.materialize(&key, Origin::NONE);
        assert_eq!(proc.value(copy).as_double().map(f64::to_bits), Some((-0.0f64).to_bits()));
    }

    #[test]
    fn test_inverted_compare() {
        let mut proc = Procedure::new();
        let x = proc.add_argument_reg(Origin::NONE, 0);
        let y = proc.add_argument_reg(Origin::NONE, 1);
        let less = proc.add_value(Opcode::LessThan, Origin::NONE, &[x, y]);
        let inverted = proc.inverted_compare(less).expect("integer compare inverts");
        assert_eq!(proc.value(inverted).opcode(), Opcode::GreaterEqual);
        assert_eq!(proc.value(inverted).children().as_slice(), &[x, y]);

        let add = proc.add_value(Opcode::Add, Origin::NONE, &[x, y]);
        assert_eq!(proc.inverted_compare(add), None);
    }

    #[test]
    #[should_panic(expected = "bad kind Add with 1 children")]
    fn test_wrong_arity_is_fatal() {
        let mut proc = Procedure::new();
        let a = proc.add_const32(Origin::NONE, 1);
        proc.add_value(Opcode::Add, Origin::NONE, &[a]);
    }

    #[test]
    #[should_panic(expected = "bad kind Load")]
    fn test_load_without_payload_is_fatal() {
        let mut proc = Procedure::new();
        let p = proc.add_argument_reg(Origin::NONE, 0);
        proc.add_value_with_type(Opcode::Load, Type::Int32, Origin::NONE, &[p]);
    }

    #[test]
    #[should_panic(expected = "no type inference rule")]
    fn test_phi_needs_explicit_type() {
        let mut proc = Procedure::new();
        proc.add_value(Opcode::Phi, Origin::NONE, &[]);
    }

    #[test]
    #[should_panic(expected = "produces Int32, not Int64")]
    fn test_explicit_type_must_match_inference() {
        let mut proc = Procedure::new();
        let a = proc.add_const32(Origin::NONE, 1);
        let b = proc.add_const32(Origin::NONE, 2);
        proc.add_value_with_type(Opcode::Add, Type::Int64, Origin::NONE, &[a, b]);
    }

    #[test]
    #[should_panic(expected = "already placed")]
    fn test_double_placement_is_fatal() {
        let mut proc = Procedure::new();
        let block = proc.add_block();
        let a = proc.add_const32(Origin::NONE, 1);
        proc.append(block, a);
        proc.append(block, a);
    }
}

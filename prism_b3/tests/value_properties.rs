//! Properties of the value substrate, exercised through the public API.
//!
//! Coverage:
//! - Identity stability across in-place replacement
//! - Type derivation
//! - Key equality and exclusion
//! - Identity-chain folding
//! - Effect profiles
//! - Boolean and rounding predicates
//! - Fatal misuse

use prism_b3::ir::{
    Arity, AtomicData, BlockId, BoundsCheckBound, Constant, Effects, FrequentedBlock, HeapRange,
    Kind, KindFlags, MemoryData, Opcode, Origin, Procedure, TriState, Type, ValueId, Width,
    type_for,
};

/// An entry block holding `Const32(1)`, `Const32(2)`, `Add` and a `Return`
/// of the sum.
fn returning_block(proc: &mut Procedure) -> (BlockId, ValueId, ValueId) {
    let block = proc.add_block();
    let origin = proc.add_origin("bc#12");
    let a = proc.add_const32(origin, 1);
    let b = proc.add_const32(origin, 2);
    let add = proc.add_value(Opcode::Add, origin, &[a, b]);
    let ret = proc.add_value(Opcode::Return, origin, &[add]);
    for id in [a, b, add, ret] {
        proc.append(block, id);
    }
    (block, add, ret)
}

// =============================================================================
// Identity Stability
// =============================================================================

mod identity_tests {
    use super::*;

    #[test]
    fn test_replace_with_identity_keeps_index_owner_origin() {
        let mut proc = Procedure::new();
        let (block, add, _) = returning_block(&mut proc);
        let origin = proc.value(add).origin();
        let other = proc.add_const32(Origin::NONE, 3);

        proc.replace_with_identity(add, other);

        let value = proc.value(add);
        assert_eq!(value.index(), add);
        assert_eq!(value.owner(), Some(block));
        assert_eq!(value.origin(), origin);
        assert_eq!(value.opcode(), Opcode::Identity);
        assert_eq!(value.ty(), Type::Int32);
        assert_eq!(value.child(0), other);
        assert_eq!(proc.origins().describe(origin), Some("bc#12"));
    }

    #[test]
    fn test_replace_with_bottom_inserts_zero_before() {
        let mut proc = Procedure::new();
        let (block, add, _) = returning_block(&mut proc);

        proc.replace_with_bottom(add);

        let forward = proc.value(add);
        assert_eq!(forward.index(), add);
        assert_eq!(forward.owner(), Some(block));
        assert_eq!(forward.opcode(), Opcode::Identity);
        let zero = forward.child(0);
        assert!(proc.value(zero).is_int32(0));
        let values = proc.block(block).values();
        let position = proc.block(block).position_of(add).unwrap();
        assert_eq!(values[position - 1], zero);
        assert_eq!(proc.validate(), Ok(()));
    }

    #[test]
    fn test_replace_with_bottom_of_void_is_nop() {
        let mut proc = Procedure::new();
        let fence = proc.add_fence(Origin::NONE, HeapRange::top(), HeapRange::top());
        proc.replace_with_bottom(fence);
        assert_eq!(proc.value(fence).opcode(), Opcode::Nop);
        assert_eq!(proc.value(fence).index(), fence);
    }

    #[test]
    fn test_replace_with_jump_keeps_identity() {
        let mut proc = Procedure::new();
        let entry = proc.add_block();
        let then_block = proc.add_block();
        let else_block = proc.add_block();
        let cond = proc.add_const32(Origin::NONE, 1);
        let branch = proc.add_value(Opcode::Branch, Origin::NONE, &[cond]);
        proc.append(entry, cond);
        proc.append(entry, branch);
        proc.block_mut(entry)
            .set_branch_successors(then_block.into(), FrequentedBlock::rare(else_block));

        proc.replace_with_jump(entry, branch, then_block.into());

        let jump = proc.value(branch);
        assert_eq!(jump.index(), branch);
        assert_eq!(jump.owner(), Some(entry));
        assert_eq!(jump.opcode(), Opcode::Jump);
        assert_eq!(jump.num_children(), 0);
        assert_eq!(proc.block(entry).num_successors(), 1);
        assert_eq!(proc.block(entry).successor_blocks().next(), Some(then_block));
    }

    #[test]
    fn test_replace_with_oops_clears_successors() {
        let mut proc = Procedure::new();
        let entry = proc.add_block();
        let next = proc.add_block();
        let jump = proc.add_value(Opcode::Jump, Origin::NONE, &[]);
        proc.append(entry, jump);
        proc.block_mut(entry).set_successors(&[next.into()]);

        proc.replace_with_oops(entry, jump);

        assert_eq!(proc.value(jump).opcode(), Opcode::Oops);
        assert_eq!(proc.value(jump).owner(), Some(entry));
        assert_eq!(proc.block(entry).num_successors(), 0);
    }

    #[test]
    fn test_replace_with_phi_drops_children() {
        let mut proc = Procedure::new();
        let (block, add, _) = returning_block(&mut proc);
        proc.value_mut(add).replace_with_phi();
        let phi = proc.value(add);
        assert_eq!(phi.opcode(), Opcode::Phi);
        assert_eq!(phi.ty(), Type::Int32);
        assert_eq!(phi.num_children(), 0);
        assert_eq!(phi.owner(), Some(block));
    }

    #[test]
    #[should_panic(expected = "is not the last value of")]
    fn test_jump_from_middle_is_fatal() {
        let mut proc = Procedure::new();
        let (block, add, _) = returning_block(&mut proc);
        let target = proc.add_block();
        proc.replace_with_jump(block, add, target.into());
    }

    #[test]
    #[should_panic(expected = "is not the last value of")]
    fn test_oops_from_middle_is_fatal() {
        let mut proc = Procedure::new();
        let (block, add, _) = returning_block(&mut proc);
        proc.replace_with_oops(block, add);
    }

    #[test]
    #[should_panic(expected = "replace_with_identity type mismatch")]
    fn test_identity_type_mismatch_is_fatal() {
        let mut proc = Procedure::new();
        let (_, add, _) = returning_block(&mut proc);
        let wide = proc.add_const64(Origin::NONE, 3);
        proc.replace_with_identity(add, wide);
    }
}

// =============================================================================
// Type Derivation
// =============================================================================

mod type_tests {
    use super::*;

    #[test]
    fn test_type_for_table() {
        let add = Kind::new(Opcode::Add);
        assert_eq!(type_for(add, Some(Type::Int32), Some(Type::Int32)), Type::Int32);
        assert_eq!(type_for(Opcode::BitwiseCast.into(), Some(Type::Int64), None), Type::Double);
        assert_eq!(type_for(Opcode::BitwiseCast.into(), Some(Type::Float), None), Type::Int32);
        assert_eq!(
            type_for(Opcode::Equal.into(), Some(Type::Double), Some(Type::Double)),
            Type::Int32
        );
        assert_eq!(type_for(Opcode::Trunc.into(), Some(Type::Int64), None), Type::Int32);
        assert_eq!(type_for(Opcode::Trunc.into(), Some(Type::Double), None), Type::Float);
        assert_eq!(type_for(Opcode::SExt32.into(), Some(Type::Int32), None), Type::Int64);
        assert_eq!(type_for(Opcode::Return.into(), Some(Type::Int32), None), Type::Void);
    }

    #[test]
    #[should_panic(expected = "Trunc of a Int32 value")]
    fn test_trunc_of_int32_is_fatal() {
        type_for(Opcode::Trunc.into(), Some(Type::Int32), None);
    }

    #[test]
    #[should_panic(expected = "BitwiseCast of a Void value")]
    fn test_bitwise_cast_of_void_is_fatal() {
        type_for(Opcode::BitwiseCast.into(), Some(Type::Void), None);
    }

    #[test]
    fn test_constructed_values_carry_inferred_type() {
        let mut proc = Procedure::new();
        let x = proc.add_const_double(Origin::NONE, 1.5);
        let cast = proc.add_value(Opcode::BitwiseCast, Origin::NONE, &[x]);
        let floor = proc.add_value(Opcode::Floor, Origin::NONE, &[x]);
        assert_eq!(proc.value(cast).ty(), Type::Int64);
        assert_eq!(proc.value(floor).ty(), Type::Double);
    }
}

// =============================================================================
// Keys
// =============================================================================

mod key_tests {
    use super::*;

    #[test]
    fn test_equal_binary_values_share_a_key() {
        let mut proc = Procedure::new();
        let a = proc.add_const64(Origin::NONE, 5);
        let b = proc.add_const64(Origin::NONE, 6);
        let first = proc.add_value(Opcode::Add, Origin::NONE, &[a, b]);
        let second = proc.add_value(Opcode::Add, Origin::NONE, &[a, b]);
        let swapped = proc.add_value(Opcode::Add, Origin::NONE, &[b, a]);

        let key = proc.value(first).key();
        assert!(key.is_some());
        assert_eq!(key, proc.value(second).key());
        assert_ne!(key, proc.value(swapped).key());
    }

    #[test]
    fn test_load_has_no_key() {
        let mut proc = Procedure::new();
        let base = proc.add_argument_reg(Origin::NONE, 0);
        let memory = MemoryData::new(8, HeapRange::single(3));
        let first = proc.add_memory(Opcode::Load, Type::Int64, Origin::NONE, &[base], memory);
        let second = proc.add_memory(Opcode::Load, Type::Int64, Origin::NONE, &[base], memory);
        assert_eq!(proc.value(first).key(), None);
        assert_eq!(proc.value(second).key(), None);
    }

    #[test]
    fn test_depend_is_unary_and_keyed_on_its_operand() {
        let mut proc = Procedure::new();
        let a = proc.add_const64(Origin::NONE, 1);
        let b = proc.add_const64(Origin::NONE, 2);
        let first = proc.add_value(Opcode::Depend, Origin::NONE, &[a]);
        let again = proc.add_value(Opcode::Depend, Origin::NONE, &[a]);
        let other = proc.add_value(Opcode::Depend, Origin::NONE, &[b]);

        assert_eq!(Opcode::Depend.arity(), Arity::One);
        assert_eq!(proc.value(first).ty(), Type::Int64);
        assert_eq!(proc.value(first).key(), proc.value(again).key());
        assert_ne!(proc.value(first).key(), proc.value(other).key());
    }

    #[test]
    #[should_panic(expected = "bad kind Depend with 2 children")]
    fn test_two_operand_depend_is_fatal() {
        let mut proc = Procedure::new();
        let a = proc.add_const64(Origin::NONE, 1);
        let b = proc.add_const64(Origin::NONE, 2);
        proc.add_value(Opcode::Depend, Origin::NONE, &[a, b]);
    }

    #[test]
    fn test_signed_zeroes_key_apart() {
        let mut proc = Procedure::new();
        let positive = proc.add_const_double(Origin::NONE, 0.0);
        let negative = proc.add_const_double(Origin::NONE, -0.0);
        assert_ne!(proc.value(positive).key(), proc.value(negative).key());
    }

    #[test]
    fn test_materialize_builds_an_equal_value() {
        let mut proc = Procedure::new();
        let a = proc.add_const32(Origin::NONE, 5);
        let b = proc.add_const32(Origin::NONE, 9);
        let less = proc.add_value(Opcode::LessThan, Origin::NONE, &[a, b]);
        let key = proc.value(less).key().unwrap();

        let rebuilt = proc.materialize(&key, Origin::NONE);
        assert_ne!(rebuilt, less);
        assert_eq!(proc.value(rebuilt).key(), Some(key));
    }
}

// =============================================================================
// Identity Chains
// =============================================================================

mod chain_tests {
    use super::*;

    #[test]
    fn test_fold_identity_reaches_end_of_chain() {
        let mut proc = Procedure::new();
        let d = proc.add_const32(Origin::NONE, 4);
        let c = proc.add_value(Opcode::Identity, Origin::NONE, &[d]);
        let b = proc.add_value(Opcode::Identity, Origin::NONE, &[c]);
        let a = proc.add_value(Opcode::Neg, Origin::NONE, &[b]);

        assert_eq!(proc.fold_identity(b), d);
        assert_eq!(proc.fold_identity(d), d);

        assert!(proc.perform_substitution(a));
        assert_eq!(proc.value(a).child(0), d);
        assert!(!proc.perform_substitution(a));
    }

    #[test]
    fn test_substitution_fixpoint_leaves_no_identity_children() {
        let mut proc = Procedure::new();
        let d = proc.add_const64(Origin::NONE, 4);
        let c = proc.add_value(Opcode::Identity, Origin::NONE, &[d]);
        let b = proc.add_value(Opcode::Identity, Origin::NONE, &[c]);
        let x = proc.add_value(Opcode::Add, Origin::NONE, &[b, c]);
        proc.add_value(Opcode::Mul, Origin::NONE, &[x, b]);

        assert!(prism_b3::opt::substitute_identities(&mut proc));
        for (_, value) in proc.values() {
            if value.opcode() == Opcode::Identity {
                continue;
            }
            for child in value.children().iter() {
                assert_ne!(proc.value(child).opcode(), Opcode::Identity);
            }
        }
        assert!(!prism_b3::opt::substitute_identities(&mut proc));
    }
}

// =============================================================================
// Effects
// =============================================================================

mod effects_tests {
    use super::*;

    #[test]
    fn test_add_is_pure() {
        let mut proc = Procedure::new();
        let (_, add, _) = returning_block(&mut proc);
        assert!(proc.value(add).effects().is_none());
    }

    #[test]
    fn test_div_is_control_dependent_only() {
        let mut proc = Procedure::new();
        let a = proc.add_const32(Origin::NONE, 7);
        let b = proc.add_const32(Origin::NONE, 0);
        let div = proc.add_value(Opcode::Div, Origin::NONE, &[a, b]);
        assert_eq!(
            proc.value(div).effects(),
            Effects {
                control_dependent: true,
                ..Effects::none()
            }
        );
    }

    #[test]
    fn test_fenced_load() {
        let mut proc = Procedure::new();
        let base = proc.add_argument_reg(Origin::NONE, 1);
        let memory = MemoryData::new(0, HeapRange::single(1)).with_fence(HeapRange::new(2, 4));
        let load = proc.add_memory(Opcode::Load, Type::Int32, Origin::NONE, &[base], memory);

        let effects = proc.value(load).effects();
        assert!(effects.control_dependent);
        assert!(effects.fence);
        assert_eq!(effects.reads, HeapRange::single(1));
        assert_eq!(effects.writes, HeapRange::new(2, 4));
        assert!(!effects.exits_sideways);
        assert!(effects.must_execute());
    }

    #[test]
    fn test_trapping_load_exits_sideways() {
        let mut proc = Procedure::new();
        let base = proc.add_argument_reg(Origin::NONE, 1);
        let kind = Kind::with_flags(Opcode::Load, KindFlags::TRAPS);
        let memory = MemoryData::new(0, HeapRange::single(1));
        let load = proc.add_memory(kind, Type::Int64, Origin::NONE, &[base], memory);

        let effects = proc.value(load).effects();
        assert!(effects.exits_sideways);
        assert_eq!(effects.reads, HeapRange::top());
    }

    #[test]
    fn test_fenced_store() {
        let mut proc = Procedure::new();
        let base = proc.add_argument_reg(Origin::NONE, 1);
        let value = proc.add_const32(Origin::NONE, 9);
        let plain = MemoryData::new(4, HeapRange::new(10, 12));
        let store = proc.add_memory(Opcode::Store, Type::Void, Origin::NONE, &[value, base], plain);
        let fenced = plain.with_fence(HeapRange::single(20));
        let fenced_store =
            proc.add_memory(Opcode::Store8, Type::Void, Origin::NONE, &[value, base], fenced);

        let effects = proc.value(store).effects();
        assert_eq!(effects.writes, HeapRange::new(10, 12));
        assert!(effects.reads.is_empty());
        assert!(!effects.fence);
        assert!(effects.control_dependent);

        let effects = proc.value(fenced_store).effects();
        assert_eq!(effects.writes, HeapRange::new(10, 12));
        assert_eq!(effects.reads, HeapRange::single(20));
        assert!(effects.fence);
    }

    #[test]
    fn test_atomic_reads_and_writes_range_and_fence() {
        let mut proc = Procedure::new();
        let base = proc.add_argument_reg(Origin::NONE, 0);
        let value = proc.add_const32(Origin::NONE, 1);
        let fenced = AtomicData::new(Width::W32, 0, HeapRange::new(4, 6))
            .with_fence(HeapRange::new(8, 10));
        let relaxed = AtomicData::new(Width::W32, 0, HeapRange::new(4, 6))
            .with_fence(HeapRange::empty());
        let add = proc.add_atomic(
            Opcode::AtomicXchgAdd,
            Type::Int32,
            Origin::NONE,
            &[value, base],
            fenced,
        );
        let xchg = proc.add_atomic(
            Opcode::AtomicXchg,
            Type::Int32,
            Origin::NONE,
            &[value, base],
            relaxed,
        );

        let effects = proc.value(add).effects();
        assert_eq!(effects.reads, HeapRange::new(4, 10));
        assert_eq!(effects.writes, HeapRange::new(4, 10));
        assert!(effects.fence);
        assert!(effects.control_dependent);

        let effects = proc.value(xchg).effects();
        assert_eq!(effects.reads, HeapRange::new(4, 6));
        assert_eq!(effects.writes, HeapRange::new(4, 6));
        assert!(!effects.fence);
    }

    #[test]
    fn test_fence_reports_its_ranges() {
        let mut proc = Procedure::new();
        let fence = proc.add_fence(Origin::NONE, HeapRange::new(0, 3), HeapRange::single(7));
        assert_eq!(
            proc.value(fence).effects(),
            Effects {
                fence: true,
                reads: HeapRange::new(0, 3),
                writes: HeapRange::single(7),
                ..Effects::none()
            }
        );
    }

    #[test]
    fn test_calls_report_supplied_effects() {
        let mut proc = Procedure::new();
        let callee = proc.add_argument_reg(Origin::NONE, 0);
        let argument = proc.add_const64(Origin::NONE, 3);
        let call_effects = Effects {
            reads: HeapRange::single(2),
            control_dependent: true,
            ..Effects::none()
        };
        let call = proc.add_ccall(Type::Int64, Origin::NONE, call_effects, &[callee, argument]);
        let patch = proc.add_patchpoint(Type::Void, Origin::NONE, Effects::for_call(), &[]);

        assert_eq!(proc.value(call).effects(), call_effects);
        assert_eq!(proc.value(patch).effects(), Effects::for_call());
    }

    #[test]
    fn test_bounds_check_reads_pinned_only_against_pinned_bound() {
        let mut proc = Procedure::new();
        let pointer = proc.add_const32(Origin::NONE, 64);
        let pinned = proc.add_bounds_check(Origin::NONE, pointer, 8, BoundsCheckBound::Pinned);
        let maximum =
            proc.add_bounds_check(Origin::NONE, pointer, 8, BoundsCheckBound::Maximum(1 << 16));

        let effects = proc.value(pinned).effects();
        assert!(effects.exits_sideways);
        assert!(effects.reads_pinned);

        let effects = proc.value(maximum).effects();
        assert!(effects.exits_sideways);
        assert!(!effects.reads_pinned);
    }

    #[test]
    fn test_variables_touch_local_state() {
        let mut proc = Procedure::new();
        let value = proc.add_const32(Origin::NONE, 5);
        let set = proc.add_variable_op(Opcode::Set, Type::Void, Origin::NONE, 0, &[value]);
        let get = proc.add_variable_op(Opcode::Get, Type::Int32, Origin::NONE, 0, &[]);

        assert_eq!(
            proc.value(set).effects(),
            Effects {
                writes_local_state: true,
                ..Effects::none()
            }
        );
        assert_eq!(
            proc.value(get).effects(),
            Effects {
                reads_local_state: true,
                ..Effects::none()
            }
        );
        assert_eq!(proc.value(get).key(), None);
    }

    #[test]
    fn test_return_is_terminal_only() {
        let mut proc = Procedure::new();
        let (_, _, ret) = returning_block(&mut proc);
        assert_eq!(
            proc.value(ret).effects(),
            Effects {
                terminal: true,
                ..Effects::none()
            }
        );
    }
}

// =============================================================================
// Predicates and Folding
// =============================================================================

mod predicate_tests {
    use super::*;

    #[test]
    fn test_returns_bool() {
        let mut proc = Procedure::new();
        let a = proc.add_const32(Origin::NONE, 3);
        let b = proc.add_const32(Origin::NONE, 4);
        let eq1 = proc.add_value(Opcode::Equal, Origin::NONE, &[a, b]);
        let eq2 = proc.add_value(Opcode::Equal, Origin::NONE, &[b, a]);
        let sum = proc.add_value(Opcode::Add, Origin::NONE, &[a, b]);
        let both = proc.add_value(Opcode::BitOr, Origin::NONE, &[eq1, eq2]);
        let mixed = proc.add_value(Opcode::BitOr, Origin::NONE, &[eq1, sum]);
        let two = proc.add_const32(Origin::NONE, 2);
        let one = proc.add_const32(Origin::NONE, 1);

        assert!(proc.value(both).returns_bool(&proc));
        assert!(!proc.value(mixed).returns_bool(&proc));
        assert!(!proc.value(two).returns_bool(&proc));
        assert!(proc.value(one).returns_bool(&proc));
    }

    #[test]
    fn test_is_rounded() {
        let mut proc = Procedure::new();
        let whole = proc.add_const_double(Origin::NONE, 4.0);
        let half = proc.add_const_double(Origin::NONE, 4.5);
        let nan = proc.add_const_double(Origin::NONE, f64::NAN);
        let int = proc.add_const32(Origin::NONE, 4);
        assert!(proc.value(whole).is_rounded());
        assert!(!proc.value(half).is_rounded());
        assert!(!proc.value(nan).is_rounded());
        assert!(!proc.value(int).is_rounded());
    }

    #[test]
    fn test_rounding_operations_are_rounded() {
        let mut proc = Procedure::new();
        let int = proc.add_const32(Origin::NONE, 3);
        let x = proc.add_const_double(Origin::NONE, 2.5);
        let converted = proc.add_value(Opcode::IToD, Origin::NONE, &[int]);
        let floor = proc.add_value(Opcode::Floor, Origin::NONE, &[x]);
        let sqrt = proc.add_value(Opcode::Sqrt, Origin::NONE, &[x]);
        assert!(proc.value(converted).is_rounded());
        assert!(proc.value(floor).is_rounded());
        assert!(!proc.value(sqrt).is_rounded());
    }

    #[test]
    fn test_is_free() {
        let mut proc = Procedure::new();
        let (_, add, ret) = returning_block(&mut proc);
        let constant = proc.add_const64(Origin::NONE, 1);
        let forward = proc.add_value(Opcode::Identity, Origin::NONE, &[constant]);
        assert!(proc.value(constant).is_free());
        assert!(proc.value(forward).is_free());
        assert!(!proc.value(add).is_free());
        assert!(!proc.value(ret).is_free());
    }

    #[test]
    fn test_as_tri_state() {
        let mut proc = Procedure::new();
        let zero = proc.add_const64(Origin::NONE, 0);
        let seven = proc.add_const32(Origin::NONE, 7);
        let (_, add, _) = returning_block(&mut proc);
        assert_eq!(proc.value(zero).as_tri_state(), TriState::False);
        assert_eq!(proc.value(seven).as_tri_state(), TriState::True);
        assert_eq!(proc.value(add).as_tri_state(), TriState::Indeterminate);
    }

    #[test]
    fn test_chill_division_folds() {
        let mut proc = Procedure::new();
        let min = proc.add_const32(Origin::NONE, i32::MIN);
        let minus_one = proc.add_const32(Origin::NONE, -1);
        let zero = proc.add_const32(Origin::NONE, 0);
        let overflow = proc.add_value(Opcode::Div, Origin::NONE, &[min, minus_one]);
        let by_zero = proc.add_value(Opcode::Mod, Origin::NONE, &[min, zero]);
        assert_eq!(proc.evaluate(overflow), Some(Constant::Int32(i32::MIN)));
        assert_eq!(proc.evaluate(by_zero), Some(Constant::Int32(0)));
    }

    #[test]
    fn test_fold_constant_in_block() {
        let mut proc = Procedure::new();
        let (block, add, _) = returning_block(&mut proc);

        let folded = proc.fold_constant(add).unwrap();

        assert!(proc.value(folded).is_int32(3));
        assert_eq!(proc.value(folded).owner(), Some(block));
        assert_eq!(proc.value(add).opcode(), Opcode::Identity);
        assert_eq!(proc.fold_identity(add), folded);
        assert_eq!(proc.validate(), Ok(()));
    }

    #[test]
    fn test_unsigned_compare() {
        let mut proc = Procedure::new();
        let minus_one = proc.add_const64(Origin::NONE, -1);
        let one = proc.add_const64(Origin::NONE, 1);
        let above = proc.add_value(Opcode::Above, Origin::NONE, &[minus_one, one]);
        let less = proc.add_value(Opcode::LessThan, Origin::NONE, &[minus_one, one]);
        assert_eq!(proc.evaluate_comparison(above), TriState::True);
        assert_eq!(proc.evaluate_comparison(less), TriState::True);
        assert_eq!(proc.evaluate(above), Some(Constant::Int32(1)));
    }
}

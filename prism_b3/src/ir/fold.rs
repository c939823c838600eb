//! Constant folding hooks.
//!
//! Each hook answers "what does this operation produce when its operands are
//! these constants?" and returns `None` whenever the operands are not
//! constants of a kind the hook understands. Hooks never allocate; the
//! procedure-level drivers at the bottom of this file turn a result into a
//! constant value and rewrite the folded node.
//!
//! # Semantics
//!
//! - Plain integer arithmetic wraps (two's complement).
//! - Checked arithmetic (`check_*`) folds to `None` on overflow so the check
//!   stays in place.
//! - Integer Div/Mod fold with chill semantics: `x / 0 == 0`,
//!   `MIN / -1 == MIN`, `x % 0 == 0`, `MIN % -1 == 0`.
//! - Shift and rotate amounts are Int32 and masked to the operand width.
//! - Float arithmetic is IEEE-754; comparisons involving NaN are false
//!   (except NotEqual and EqualOrUnordered).

use super::constant::Constant;
use super::opcode::Opcode;
use super::procedure::Procedure;
use super::tri_state::TriState;
use super::value::{Value, ValueId};

// =============================================================================
// Integer helpers
// =============================================================================

macro_rules! chill_ops {
    ($div:ident, $rem:ident, $ty:ty) => {
        fn $div(num: $ty, den: $ty) -> $ty {
            if den == 0 {
                0
            } else if den == -1 {
                num.wrapping_neg()
            } else {
                num / den
            }
        }

        fn $rem(num: $ty, den: $ty) -> $ty {
            if den == 0 || den == -1 {
                0
            } else {
                num % den
            }
        }
    };
}

chill_ops!(chill_div32, chill_mod32, i32);
chill_ops!(chill_div64, chill_mod64, i64);

fn shift_amount(value: &Value) -> Option<u32> {
    value.as_int32().map(|amount| amount as u32)
}

// =============================================================================
// Arithmetic hooks
// =============================================================================

impl Value {
    pub fn neg_constant(&self) -> Option<Constant> {
        Some(match self.as_constant()? {
            Constant::Int32(v) => Constant::Int32(v.wrapping_neg()),
            Constant::Int64(v) => Constant::Int64(v.wrapping_neg()),
            Constant::Float(v) => Constant::Float(-v),
            Constant::Double(v) => Constant::Double(-v),
        })
    }

    /// `self + imm`, for strength reduction of address arithmetic.
    pub fn add_immediate(&self, imm: i32) -> Option<Constant> {
        Some(match self.as_constant()? {
            Constant::Int32(v) => Constant::Int32(v.wrapping_add(imm)),
            Constant::Int64(v) => Constant::Int64(v.wrapping_add(imm as i64)),
            Constant::Float(v) => Constant::Float(v + imm as f32),
            Constant::Double(v) => Constant::Double(v + imm as f64),
        })
    }

    pub fn add_constant(&self, other: &Value) -> Option<Constant> {
        Some(match (self.as_constant()?, other.as_constant()?) {
            (Constant::Int32(a), Constant::Int32(b)) => Constant::Int32(a.wrapping_add(b)),
            (Constant::Int64(a), Constant::Int64(b)) => Constant::Int64(a.wrapping_add(b)),
            (Constant::Float(a), Constant::Float(b)) => Constant::Float(a + b),
            (Constant::Double(a), Constant::Double(b)) => Constant::Double(a + b),
            _ => return None,
        })
    }

    pub fn sub_constant(&self, other: &Value) -> Option<Constant> {
        Some(match (self.as_constant()?, other.as_constant()?) {
            (Constant::Int32(a), Constant::Int32(b)) => Constant::Int32(a.wrapping_sub(b)),
            (Constant::Int64(a), Constant::Int64(b)) => Constant::Int64(a.wrapping_sub(b)),
            (Constant::Float(a), Constant::Float(b)) => Constant::Float(a - b),
            (Constant::Double(a), Constant::Double(b)) => Constant::Double(a - b),
            _ => return None,
        })
    }

    pub fn mul_constant(&self, other: &Value) -> Option<Constant> {
        Some(match (self.as_constant()?, other.as_constant()?) {
            (Constant::Int32(a), Constant::Int32(b)) => Constant::Int32(a.wrapping_mul(b)),
            (Constant::Int64(a), Constant::Int64(b)) => Constant::Int64(a.wrapping_mul(b)),
            (Constant::Float(a), Constant::Float(b)) => Constant::Float(a * b),
            (Constant::Double(a), Constant::Double(b)) => Constant::Double(a * b),
            _ => return None,
        })
    }

    pub fn check_add_constant(&self, other: &Value) -> Option<Constant> {
        match (self.as_constant()?, other.as_constant()?) {
            (Constant::Int32(a), Constant::Int32(b)) => a.checked_add(b).map(Constant::Int32),
            (Constant::Int64(a), Constant::Int64(b)) => a.checked_add(b).map(Constant::Int64),
            _ => None,
        }
    }

    pub fn check_sub_constant(&self, other: &Value) -> Option<Constant> {
        match (self.as_constant()?, other.as_constant()?) {
            (Constant::Int32(a), Constant::Int32(b)) => a.checked_sub(b).map(Constant::Int32),
            (Constant::Int64(a), Constant::Int64(b)) => a.checked_sub(b).map(Constant::Int64),
            _ => None,
        }
    }

    pub fn check_mul_constant(&self, other: &Value) -> Option<Constant> {
        match (self.as_constant()?, other.as_constant()?) {
            (Constant::Int32(a), Constant::Int32(b)) => a.checked_mul(b).map(Constant::Int32),
            (Constant::Int64(a), Constant::Int64(b)) => a.checked_mul(b).map(Constant::Int64),
            _ => None,
        }
    }

    pub fn check_neg_constant(&self) -> Option<Constant> {
        match self.as_constant()? {
            Constant::Int32(v) => v.checked_neg().map(Constant::Int32),
            Constant::Int64(v) => v.checked_neg().map(Constant::Int64),
            _ => None,
        }
    }

    pub fn div_constant(&self, other: &Value) -> Option<Constant> {
        Some(match (self.as_constant()?, other.as_constant()?) {
            (Constant::Int32(a), Constant::Int32(b)) => Constant::Int32(chill_div32(a, b)),
            (Constant::Int64(a), Constant::Int64(b)) => Constant::Int64(chill_div64(a, b)),
            (Constant::Float(a), Constant::Float(b)) => Constant::Float(a / b),
            (Constant::Double(a), Constant::Double(b)) => Constant::Double(a / b),
            _ => return None,
        })
    }

    pub fn mod_constant(&self, other: &Value) -> Option<Constant> {
        Some(match (self.as_constant()?, other.as_constant()?) {
            (Constant::Int32(a), Constant::Int32(b)) => Constant::Int32(chill_mod32(a, b)),
            (Constant::Int64(a), Constant::Int64(b)) => Constant::Int64(chill_mod64(a, b)),
            (Constant::Float(a), Constant::Float(b)) => Constant::Float(a % b),
            (Constant::Double(a), Constant::Double(b)) => Constant::Double(a % b),
            _ => return None,
        })
    }

    pub fn udiv_constant(&self, other: &Value) -> Option<Constant> {
        match (self.as_constant()?, other.as_constant()?) {
            (Constant::Int32(a), Constant::Int32(b)) => Some(Constant::Int32(
                (a as u32).checked_div(b as u32).unwrap_or(0) as i32,
            )),
            (Constant::Int64(a), Constant::Int64(b)) => Some(Constant::Int64(
                (a as u64).checked_div(b as u64).unwrap_or(0) as i64,
            )),
            _ => None,
        }
    }

    pub fn umod_constant(&self, other: &Value) -> Option<Constant> {
        match (self.as_constant()?, other.as_constant()?) {
            (Constant::Int32(a), Constant::Int32(b)) => Some(Constant::Int32(
                (a as u32).checked_rem(b as u32).unwrap_or(0) as i32,
            )),
            (Constant::Int64(a), Constant::Int64(b)) => Some(Constant::Int64(
                (a as u64).checked_rem(b as u64).unwrap_or(0) as i64,
            )),
            _ => None,
        }
    }

    // -------------------------------------------------------------------------
    // Bitwise
    // -------------------------------------------------------------------------

    /// Bitwise ops also fold on floats, operating on the bit patterns.
    pub fn bit_and_constant(&self, other: &Value) -> Option<Constant> {
        bitwise(self, other, |a, b| a & b)
    }

    pub fn bit_or_constant(&self, other: &Value) -> Option<Constant> {
        bitwise(self, other, |a, b| a | b)
    }

    pub fn bit_xor_constant(&self, other: &Value) -> Option<Constant> {
        bitwise(self, other, |a, b| a ^ b)
    }

    pub fn shl_constant(&self, other: &Value) -> Option<Constant> {
        let amount = shift_amount(other)?;
        match self.as_constant()? {
            Constant::Int32(v) => Some(Constant::Int32(v.wrapping_shl(amount & 31))),
            Constant::Int64(v) => Some(Constant::Int64(v.wrapping_shl(amount & 63))),
            _ => None,
        }
    }

    pub fn sshr_constant(&self, other: &Value) -> Option<Constant> {
        let amount = shift_amount(other)?;
        match self.as_constant()? {
            Constant::Int32(v) => Some(Constant::Int32(v.wrapping_shr(amount & 31))),
            Constant::Int64(v) => Some(Constant::Int64(v.wrapping_shr(amount & 63))),
            _ => None,
        }
    }

    pub fn zshr_constant(&self, other: &Value) -> Option<Constant> {
        let amount = shift_amount(other)?;
        match self.as_constant()? {
            Constant::Int32(v) => Some(Constant::Int32(
                (v as u32).wrapping_shr(amount & 31) as i32,
            )),
            Constant::Int64(v) => Some(Constant::Int64(
                (v as u64).wrapping_shr(amount & 63) as i64,
            )),
            _ => None,
        }
    }

    pub fn rotr_constant(&self, other: &Value) -> Option<Constant> {
        let amount = shift_amount(other)?;
        match self.as_constant()? {
            Constant::Int32(v) => Some(Constant::Int32(v.rotate_right(amount & 31))),
            Constant::Int64(v) => Some(Constant::Int64(v.rotate_right(amount & 63))),
            _ => None,
        }
    }

    pub fn rotl_constant(&self, other: &Value) -> Option<Constant> {
        let amount = shift_amount(other)?;
        match self.as_constant()? {
            Constant::Int32(v) => Some(Constant::Int32(v.rotate_left(amount & 31))),
            Constant::Int64(v) => Some(Constant::Int64(v.rotate_left(amount & 63))),
            _ => None,
        }
    }

    pub fn clz_constant(&self) -> Option<Constant> {
        match self.as_constant()? {
            Constant::Int32(v) => Some(Constant::Int32(v.leading_zeros() as i32)),
            Constant::Int64(v) => Some(Constant::Int64(v.leading_zeros() as i64)),
            _ => None,
        }
    }

    // -------------------------------------------------------------------------
    // Casts
    // -------------------------------------------------------------------------

    pub fn bitwise_cast_constant(&self) -> Option<Constant> {
        Some(match self.as_constant()? {
            Constant::Int32(v) => Constant::Float(f32::from_bits(v as u32)),
            Constant::Int64(v) => Constant::Double(f64::from_bits(v as u64)),
            Constant::Float(v) => Constant::Int32(v.to_bits() as i32),
            Constant::Double(v) => Constant::Int64(v.to_bits() as i64),
        })
    }

    pub fn i_to_d_constant(&self) -> Option<Constant> {
        match self.as_constant()? {
            Constant::Int32(v) => Some(Constant::Double(v as f64)),
            Constant::Int64(v) => Some(Constant::Double(v as f64)),
            _ => None,
        }
    }

    pub fn i_to_f_constant(&self) -> Option<Constant> {
        match self.as_constant()? {
            Constant::Int32(v) => Some(Constant::Float(v as f32)),
            Constant::Int64(v) => Some(Constant::Float(v as f32)),
            _ => None,
        }
    }

    pub fn double_to_float_constant(&self) -> Option<Constant> {
        match self.as_constant()? {
            Constant::Double(v) => Some(Constant::Float(v as f32)),
            _ => None,
        }
    }

    pub fn float_to_double_constant(&self) -> Option<Constant> {
        match self.as_constant()? {
            Constant::Float(v) => Some(Constant::Double(v as f64)),
            _ => None,
        }
    }

    /// Int64 keeps its low 32 bits; Double rounds to Float.
    pub fn trunc_constant(&self) -> Option<Constant> {
        match self.as_constant()? {
            Constant::Int64(v) => Some(Constant::Int32(v as i32)),
            Constant::Double(v) => Some(Constant::Float(v as f32)),
            _ => None,
        }
    }

    pub fn sext8_constant(&self) -> Option<Constant> {
        self.as_int32().map(|v| Constant::Int32(v as i8 as i32))
    }

    pub fn sext16_constant(&self) -> Option<Constant> {
        self.as_int32().map(|v| Constant::Int32(v as i16 as i32))
    }

    pub fn sext32_constant(&self) -> Option<Constant> {
        self.as_int32().map(|v| Constant::Int64(v as i64))
    }

    pub fn zext32_constant(&self) -> Option<Constant> {
        self.as_int32().map(|v| Constant::Int64(v as u32 as i64))
    }

    // -------------------------------------------------------------------------
    // Float math
    // -------------------------------------------------------------------------

    pub fn abs_constant(&self) -> Option<Constant> {
        float_unary(self, f32::abs, f64::abs)
    }

    pub fn ceil_constant(&self) -> Option<Constant> {
        float_unary(self, f32::ceil, f64::ceil)
    }

    pub fn floor_constant(&self) -> Option<Constant> {
        float_unary(self, f32::floor, f64::floor)
    }

    pub fn sqrt_constant(&self) -> Option<Constant> {
        float_unary(self, f32::sqrt, f64::sqrt)
    }

    // -------------------------------------------------------------------------
    // Relational hooks
    // -------------------------------------------------------------------------

    pub fn equal_constant(&self, other: &Value) -> TriState {
        compare(self, other, |a, b| a == b, |a, b| a == b)
    }

    pub fn not_equal_constant(&self, other: &Value) -> TriState {
        compare(self, other, |a, b| a != b, |a, b| a != b)
    }

    pub fn less_than_constant(&self, other: &Value) -> TriState {
        compare(self, other, |a, b| a < b, |a, b| a < b)
    }

    pub fn greater_than_constant(&self, other: &Value) -> TriState {
        compare(self, other, |a, b| a > b, |a, b| a > b)
    }

    pub fn less_equal_constant(&self, other: &Value) -> TriState {
        compare(self, other, |a, b| a <= b, |a, b| a <= b)
    }

    pub fn greater_equal_constant(&self, other: &Value) -> TriState {
        compare(self, other, |a, b| a >= b, |a, b| a >= b)
    }

    pub fn above_constant(&self, other: &Value) -> TriState {
        compare_unsigned(self, other, |a, b| a > b)
    }

    pub fn below_constant(&self, other: &Value) -> TriState {
        compare_unsigned(self, other, |a, b| a < b)
    }

    pub fn above_equal_constant(&self, other: &Value) -> TriState {
        compare_unsigned(self, other, |a, b| a >= b)
    }

    pub fn below_equal_constant(&self, other: &Value) -> TriState {
        compare_unsigned(self, other, |a, b| a <= b)
    }

    /// Float-only: true when either side is NaN or both are equal.
    pub fn equal_or_unordered_constant(&self, other: &Value) -> TriState {
        match (self.as_constant(), other.as_constant()) {
            (Some(Constant::Double(a)), Some(Constant::Double(b))) => {
                TriState::from_bool(a.is_nan() || b.is_nan() || a == b)
            }
            (Some(Constant::Float(a)), Some(Constant::Float(b))) => {
                TriState::from_bool(a.is_nan() || b.is_nan() || a == b)
            }
            _ => TriState::Indeterminate,
        }
    }
}

fn bitwise(left: &Value, right: &Value, op: impl Fn(u64, u64) -> u64) -> Option<Constant> {
    Some(match (left.as_constant()?, right.as_constant()?) {
        (Constant::Int32(a), Constant::Int32(b)) => {
            Constant::Int32(op(a as u32 as u64, b as u32 as u64) as u32 as i32)
        }
        (Constant::Int64(a), Constant::Int64(b)) => Constant::Int64(op(a as u64, b as u64) as i64),
        (Constant::Float(a), Constant::Float(b)) => Constant::Float(f32::from_bits(
            op(a.to_bits() as u64, b.to_bits() as u64) as u32,
        )),
        (Constant::Double(a), Constant::Double(b)) => {
            Constant::Double(f64::from_bits(op(a.to_bits(), b.to_bits())))
        }
        _ => return None,
    })
}

fn float_unary(
    value: &Value,
    single: impl Fn(f32) -> f32,
    double: impl Fn(f64) -> f64,
) -> Option<Constant> {
    match value.as_constant()? {
        Constant::Float(v) => Some(Constant::Float(single(v))),
        Constant::Double(v) => Some(Constant::Double(double(v))),
        _ => None,
    }
}

/// Signed integer and IEEE float comparison of same-typed constants.
fn compare(
    left: &Value,
    right: &Value,
    int_op: impl Fn(i64, i64) -> bool,
    float_op: impl Fn(f64, f64) -> bool,
) -> TriState {
    match (left.as_constant(), right.as_constant()) {
        (Some(Constant::Int32(a)), Some(Constant::Int32(b))) => {
            TriState::from_bool(int_op(a as i64, b as i64))
        }
        (Some(Constant::Int64(a)), Some(Constant::Int64(b))) => TriState::from_bool(int_op(a, b)),
        (Some(Constant::Float(a)), Some(Constant::Float(b))) => {
            TriState::from_bool(float_op(a as f64, b as f64))
        }
        (Some(Constant::Double(a)), Some(Constant::Double(b))) => {
            TriState::from_bool(float_op(a, b))
        }
        _ => TriState::Indeterminate,
    }
}

fn compare_unsigned(left: &Value, right: &Value, op: impl Fn(u64, u64) -> bool) -> TriState {
    match (left.as_constant(), right.as_constant()) {
        (Some(Constant::Int32(a)), Some(Constant::Int32(b))) => {
            TriState::from_bool(op(a as u32 as u64, b as u32 as u64))
        }
        (Some(Constant::Int64(a)), Some(Constant::Int64(b))) => {
            TriState::from_bool(op(a as u64, b as u64))
        }
        _ => TriState::Indeterminate,
    }
}

// =============================================================================
// Procedure-level drivers
// =============================================================================

impl Procedure {
    /// Fold `id` to a constant if all of its operands are constants.
    pub fn evaluate(&self, id: ValueId) -> Option<Constant> {
        let value = self.value(id);
        let operand = move |index: usize| self.value(value.child(index));
        match value.opcode() {
            Opcode::Neg => operand(0).neg_constant(),
            Opcode::Add => operand(0).add_constant(operand(1)),
            Opcode::Sub => operand(0).sub_constant(operand(1)),
            Opcode::Mul => operand(0).mul_constant(operand(1)),
            Opcode::Div => operand(0).div_constant(operand(1)),
            Opcode::Mod => operand(0).mod_constant(operand(1)),
            Opcode::UDiv => operand(0).udiv_constant(operand(1)),
            Opcode::UMod => operand(0).umod_constant(operand(1)),
            Opcode::CheckAdd => operand(0).check_add_constant(operand(1)),
            Opcode::CheckSub => operand(0).check_sub_constant(operand(1)),
            Opcode::CheckMul => operand(0).check_mul_constant(operand(1)),
            Opcode::BitAnd => operand(0).bit_and_constant(operand(1)),
            Opcode::BitOr => operand(0).bit_or_constant(operand(1)),
            Opcode::BitXor => operand(0).bit_xor_constant(operand(1)),
            Opcode::Shl => operand(0).shl_constant(operand(1)),
            Opcode::SShr => operand(0).sshr_constant(operand(1)),
            Opcode::ZShr => operand(0).zshr_constant(operand(1)),
            Opcode::RotR => operand(0).rotr_constant(operand(1)),
            Opcode::RotL => operand(0).rotl_constant(operand(1)),
            Opcode::Clz => operand(0).clz_constant(),
            Opcode::BitwiseCast => operand(0).bitwise_cast_constant(),
            Opcode::IToD => operand(0).i_to_d_constant(),
            Opcode::IToF => operand(0).i_to_f_constant(),
            Opcode::DoubleToFloat => operand(0).double_to_float_constant(),
            Opcode::FloatToDouble => operand(0).float_to_double_constant(),
            Opcode::Trunc => operand(0).trunc_constant(),
            Opcode::SExt8 => operand(0).sext8_constant(),
            Opcode::SExt16 => operand(0).sext16_constant(),
            Opcode::SExt32 => operand(0).sext32_constant(),
            Opcode::ZExt32 => operand(0).zext32_constant(),
            Opcode::Abs => operand(0).abs_constant(),
            Opcode::Ceil => operand(0).ceil_constant(),
            Opcode::Floor => operand(0).floor_constant(),
            Opcode::Sqrt => operand(0).sqrt_constant(),
            opcode if opcode.is_comparison() => self
                .evaluate_comparison(id)
                .as_bool()
                .map(|truth| Constant::Int32(truth as i32)),
            _ => None,
        }
    }

    /// Decide a comparison whose operands are constants.
    pub fn evaluate_comparison(&self, id: ValueId) -> TriState {
        let value = self.value(id);
        if !value.opcode().is_comparison() {
            return TriState::Indeterminate;
        }
        let left = self.value(value.child(0));
        let right = self.value(value.child(1));
        match value.opcode() {
            Opcode::Equal => left.equal_constant(right),
            Opcode::NotEqual => left.not_equal_constant(right),
            Opcode::LessThan => left.less_than_constant(right),
            Opcode::GreaterThan => left.greater_than_constant(right),
            Opcode::LessEqual => left.less_equal_constant(right),
            Opcode::GreaterEqual => left.greater_equal_constant(right),
            Opcode::Above => left.above_constant(right),
            Opcode::Below => left.below_constant(right),
            Opcode::AboveEqual => left.above_equal_constant(right),
            Opcode::BelowEqual => left.below_equal_constant(right),
            Opcode::EqualOrUnordered => left.equal_or_unordered_constant(right),
            _ => TriState::Indeterminate,
        }
    }

    /// Replace `id` with a freshly materialized constant when it folds.
    ///
    /// The constant is inserted right before `id` in its block and `id`
    /// becomes an Identity of it. Returns the constant's id.
    pub fn fold_constant(&mut self, id: ValueId) -> Option<ValueId> {
        let constant = self.evaluate(id)?;
        let origin = self.value(id).origin();
        let folded = self.add_constant(origin, constant);
        self.insert_before(id, folded);
        self.replace_with_identity(id, folded);
        log::trace!("folded {id} to {constant}");
        Some(folded)
    }
}

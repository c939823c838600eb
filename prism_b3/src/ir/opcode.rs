//! Opcodes of the backend IR.
//!
//! Opcodes are grouped by category for fast classification:
//! - **Leaves**: constants, pinned resources, frame pointer
//! - **Pure arithmetic**: integer/float math, bit ops, casts, comparisons
//! - **Memory**: loads, stores, atomics, fences
//! - **Escapes**: calls, patchpoints, checks
//! - **SSA scaffolding**: Phi, Upsilon, Get, Set
//! - **Terminators**: Jump, Branch, Switch, EntrySwitch, Return, Oops

use std::fmt;

use super::types::Type;

// =============================================================================
// Opcode
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Opcode {
    // Polymorphic no-op / forwarding
    Nop,
    Identity,
    Opaque,

    // Constants
    Const32,
    Const64,
    ConstDouble,
    ConstFloat,
    BottomTuple,

    // Pinned resources
    SlotBase,
    ArgumentReg,
    FramePointer,

    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    UDiv,
    Mod,
    UMod,
    Neg,

    // Bitwise
    BitAnd,
    BitOr,
    BitXor,
    Shl,
    SShr,
    ZShr,
    RotR,
    RotL,
    Clz,

    // Floating-point math
    Abs,
    Ceil,
    Floor,
    Sqrt,

    // Casts
    BitwiseCast,
    SExt8,
    SExt16,
    SExt32,
    ZExt32,
    Trunc,
    IToD,
    IToF,
    FloatToDouble,
    DoubleToFloat,

    // Comparisons (result is an Int32 boolean)
    Equal,
    NotEqual,
    LessThan,
    GreaterThan,
    LessEqual,
    GreaterEqual,
    Above,
    Below,
    AboveEqual,
    BelowEqual,
    EqualOrUnordered,

    Select,

    // Memory
    Load8Z,
    Load8S,
    Load16Z,
    Load16S,
    Load,
    Store8,
    Store16,
    Store,

    // Atomics
    AtomicWeakCAS,
    AtomicStrongCAS,
    AtomicXchgAdd,
    AtomicXchgAnd,
    AtomicXchgOr,
    AtomicXchgSub,
    AtomicXchgXor,
    AtomicXchg,

    Depend,
    WasmAddress,
    Fence,

    // Escapes
    CCall,
    Patchpoint,
    Extract,
    CheckAdd,
    CheckSub,
    CheckMul,
    Check,
    WasmBoundsCheck,

    // SSA scaffolding
    Upsilon,
    Phi,
    Set,
    Get,

    // Terminators
    Jump,
    Branch,
    Switch,
    EntrySwitch,
    Return,
    Oops,
}

// =============================================================================
// Arity
// =============================================================================

/// How many children an opcode takes.
///
/// Fixed arities store children inline; `VarArgs` opcodes get a growable list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Zero,
    One,
    Two,
    Three,
    /// `Return` with or without a result.
    ZeroOrOne,
    /// Growable list with at least `min` leading operands.
    VarArgs { min: u8 },
}

impl Arity {
    #[inline]
    pub const fn accepts(self, count: usize) -> bool {
        match self {
            Arity::Zero => count == 0,
            Arity::One => count == 1,
            Arity::Two => count == 2,
            Arity::Three => count == 3,
            Arity::ZeroOrOne => count <= 1,
            Arity::VarArgs { min } => count >= min as usize,
        }
    }

    #[inline]
    pub const fn is_var_args(self) -> bool {
        matches!(self, Arity::VarArgs { .. })
    }
}

// =============================================================================
// Classification
// =============================================================================

impl Opcode {
    pub const fn arity(self) -> Arity {
        use Opcode::*;
        match self {
            Nop | Const32 | Const64 | ConstDouble | ConstFloat | BottomTuple | SlotBase
            | ArgumentReg | FramePointer | Fence | Phi | Get | Jump | Oops | EntrySwitch => {
                Arity::Zero
            }

            Identity | Opaque | Neg | Clz | Abs | Ceil | Floor | Sqrt | BitwiseCast | SExt8
            | SExt16 | SExt32 | ZExt32 | Trunc | IToD | IToF | FloatToDouble | DoubleToFloat
            | Load8Z | Load8S | Load16Z | Load16S | Load | WasmAddress | Extract | Depend
            | WasmBoundsCheck | Upsilon | Set | Branch | Switch => Arity::One,

            Add | Sub | Mul | Div | UDiv | Mod | UMod | BitAnd | BitOr | BitXor | Shl | SShr
            | ZShr | RotR | RotL | Equal | NotEqual | LessThan | GreaterThan | LessEqual
            | GreaterEqual | Above | Below | AboveEqual | BelowEqual | EqualOrUnordered
            | Store8 | Store16 | Store | AtomicXchgAdd | AtomicXchgAnd | AtomicXchgOr
            | AtomicXchgSub | AtomicXchgXor | AtomicXchg => Arity::Two,

            Select | AtomicWeakCAS | AtomicStrongCAS => Arity::Three,

            Return => Arity::ZeroOrOne,

            CCall | Check => Arity::VarArgs { min: 1 },
            CheckAdd | CheckSub | CheckMul => Arity::VarArgs { min: 2 },
            Patchpoint => Arity::VarArgs { min: 0 },
        }
    }

    #[inline]
    pub const fn is_constant(self) -> bool {
        matches!(
            self,
            Opcode::Const32 | Opcode::Const64 | Opcode::ConstDouble | Opcode::ConstFloat
        )
    }

    #[inline]
    pub const fn is_comparison(self) -> bool {
        matches!(
            self,
            Opcode::Equal
                | Opcode::NotEqual
                | Opcode::LessThan
                | Opcode::GreaterThan
                | Opcode::LessEqual
                | Opcode::GreaterEqual
                | Opcode::Above
                | Opcode::Below
                | Opcode::AboveEqual
                | Opcode::BelowEqual
                | Opcode::EqualOrUnordered
        )
    }

    #[inline]
    pub const fn is_load(self) -> bool {
        matches!(
            self,
            Opcode::Load8Z | Opcode::Load8S | Opcode::Load16Z | Opcode::Load16S | Opcode::Load
        )
    }

    #[inline]
    pub const fn is_store(self) -> bool {
        matches!(self, Opcode::Store8 | Opcode::Store16 | Opcode::Store)
    }

    #[inline]
    pub const fn is_atomic(self) -> bool {
        matches!(
            self,
            Opcode::AtomicWeakCAS
                | Opcode::AtomicStrongCAS
                | Opcode::AtomicXchgAdd
                | Opcode::AtomicXchgAnd
                | Opcode::AtomicXchgOr
                | Opcode::AtomicXchgSub
                | Opcode::AtomicXchgXor
                | Opcode::AtomicXchg
        )
    }

    /// Loads, stores and atomics: the opcodes that carry a memory range.
    #[inline]
    pub const fn is_memory_access(self) -> bool {
        self.is_load() || self.is_store() || self.is_atomic()
    }

    #[inline]
    pub const fn is_checked_arithmetic(self) -> bool {
        matches!(self, Opcode::CheckAdd | Opcode::CheckSub | Opcode::CheckMul)
    }

    /// Opcodes that end a basic block.
    #[inline]
    pub const fn is_terminal(self) -> bool {
        matches!(
            self,
            Opcode::Jump
                | Opcode::Branch
                | Opcode::Switch
                | Opcode::EntrySwitch
                | Opcode::Return
                | Opcode::Oops
        )
    }

    /// Div and Mod, the only opcodes with a chill (non-trapping) form.
    #[inline]
    pub const fn is_chillable(self) -> bool {
        matches!(self, Opcode::Div | Opcode::Mod)
    }

    /// Opcodes whose float forms may care about NaN payloads.
    #[inline]
    pub const fn is_nan_sensitive_capable(self) -> bool {
        matches!(
            self,
            Opcode::Add | Opcode::Sub | Opcode::Mul | Opcode::Div | Opcode::Mod | Opcode::Neg
        )
    }

    #[inline]
    pub const fn is_commutative(self) -> bool {
        matches!(
            self,
            Opcode::Add
                | Opcode::Mul
                | Opcode::BitAnd
                | Opcode::BitOr
                | Opcode::BitXor
                | Opcode::Equal
                | Opcode::NotEqual
                | Opcode::EqualOrUnordered
        )
    }
}

/// The comparison that is true exactly when `opcode` is false.
///
/// Ordered comparisons only invert for integer operands: with a NaN operand
/// both `a < b` and `a >= b` are false.
pub const fn inverted_compare(opcode: Opcode, operand_type: Type) -> Option<Opcode> {
    use Opcode::*;
    match opcode {
        Equal => Some(NotEqual),
        NotEqual => Some(Equal),
        LessThan if operand_type.is_int() => Some(GreaterEqual),
        GreaterThan if operand_type.is_int() => Some(LessEqual),
        LessEqual if operand_type.is_int() => Some(GreaterThan),
        GreaterEqual if operand_type.is_int() => Some(LessThan),
        Above => Some(BelowEqual),
        Below => Some(AboveEqual),
        AboveEqual => Some(Below),
        BelowEqual => Some(Above),
        _ => None,
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arity_classes() {
        assert_eq!(Opcode::Const32.arity(), Arity::Zero);
        assert_eq!(Opcode::Neg.arity(), Arity::One);
        assert_eq!(Opcode::Depend.arity(), Arity::One);
        assert!(!Opcode::Depend.arity().accepts(2));
        assert_eq!(Opcode::Add.arity(), Arity::Two);
        assert_eq!(Opcode::Select.arity(), Arity::Three);
        assert!(Opcode::CCall.arity().is_var_args());
        assert!(Opcode::Return.arity().accepts(0));
        assert!(Opcode::Return.arity().accepts(1));
        assert!(!Opcode::Return.arity().accepts(2));
        assert!(!Opcode::CheckAdd.arity().accepts(1));
        assert!(Opcode::CheckAdd.arity().accepts(5));
    }

    #[test]
    fn test_categories() {
        assert!(Opcode::Load16S.is_load());
        assert!(Opcode::Store8.is_store());
        assert!(Opcode::AtomicXchgXor.is_atomic());
        assert!(Opcode::AtomicWeakCAS.is_memory_access());
        assert!(!Opcode::Fence.is_memory_access());
        assert!(Opcode::Oops.is_terminal());
        assert!(!Opcode::Check.is_terminal());
        assert!(Opcode::EqualOrUnordered.is_comparison());
        assert!(!Opcode::Select.is_comparison());
        assert!(Opcode::BitXor.is_commutative());
        assert!(!Opcode::Sub.is_commutative());
    }

    #[test]
    fn test_inverted_compare() {
        assert_eq!(inverted_compare(Opcode::Equal, Type::Double), Some(Opcode::NotEqual));
        assert_eq!(
            inverted_compare(Opcode::LessThan, Type::Int32),
            Some(Opcode::GreaterEqual)
        );
        assert_eq!(inverted_compare(Opcode::LessThan, Type::Double), None);
        assert_eq!(inverted_compare(Opcode::Below, Type::Int64), Some(Opcode::AboveEqual));
        assert_eq!(inverted_compare(Opcode::EqualOrUnordered, Type::Float), None);
        assert_eq!(inverted_compare(Opcode::Add, Type::Int32), None);
    }

    #[test]
    fn test_display_uses_opcode_name() {
        assert_eq!(Opcode::AtomicXchgAdd.to_string(), "AtomicXchgAdd");
    }
}

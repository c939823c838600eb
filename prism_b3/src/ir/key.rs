//! Canonical keys for value numbering.
//!
//! A [`ValueKey`] projects a value onto `(kind, type, operands)`. Two values
//! with equal keys compute the same thing and one may replace the other.
//! Only opcodes whose result depends on nothing but their operands get a key;
//! [`crate::ir::Value::key`] returns `None` for everything else (memory
//! operations, calls, terminators, SSA scaffolding).
//!
//! Keys reference children by id, so they are only meaningful once identity
//! chains have been substituted away.

use std::fmt;

use super::dump::DUMP_PREFIX;
use super::kind::Kind;
use super::opcode::{Arity, Opcode};
use super::types::Type;
use super::value::ValueId;

/// Operand part of a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyOperands {
    /// Nullary leaf with no payload (FramePointer, BottomTuple).
    Leaf,
    /// Constant bits, argument register number or stack slot number.
    Literal(u64),
    Unary(ValueId),
    Binary(ValueId, ValueId),
    Ternary(ValueId, ValueId, ValueId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ValueKey {
    kind: Kind,
    ty: Type,
    operands: KeyOperands,
}

impl ValueKey {
    pub fn leaf(kind: impl Into<Kind>, ty: Type) -> Self {
        ValueKey {
            kind: kind.into(),
            ty,
            operands: KeyOperands::Leaf,
        }
    }

    pub fn literal(kind: impl Into<Kind>, ty: Type, bits: u64) -> Self {
        ValueKey {
            kind: kind.into(),
            ty,
            operands: KeyOperands::Literal(bits),
        }
    }

    pub fn unary(kind: impl Into<Kind>, ty: Type, child: ValueId) -> Self {
        ValueKey {
            kind: kind.into(),
            ty,
            operands: KeyOperands::Unary(child),
        }
    }

    pub fn binary(kind: impl Into<Kind>, ty: Type, left: ValueId, right: ValueId) -> Self {
        ValueKey {
            kind: kind.into(),
            ty,
            operands: KeyOperands::Binary(left, right),
        }
    }

    pub fn ternary(
        kind: impl Into<Kind>,
        ty: Type,
        first: ValueId,
        second: ValueId,
        third: ValueId,
    ) -> Self {
        ValueKey {
            kind: kind.into(),
            ty,
            operands: KeyOperands::Ternary(first, second, third),
        }
    }

    #[inline]
    pub fn kind(&self) -> Kind {
        self.kind
    }

    #[inline]
    pub fn opcode(&self) -> Opcode {
        self.kind.opcode()
    }

    #[inline]
    pub fn ty(&self) -> Type {
        self.ty
    }

    #[inline]
    pub fn operands(&self) -> KeyOperands {
        self.operands
    }

    /// Child operand ids, in order. Empty for leaves and literals.
    pub fn children(&self) -> Vec<ValueId> {
        match self.operands {
            KeyOperands::Leaf | KeyOperands::Literal(_) => Vec::new(),
            KeyOperands::Unary(a) => vec![a],
            KeyOperands::Binary(a, b) => vec![a, b],
            KeyOperands::Ternary(a, b, c) => vec![a, b, c],
        }
    }

    pub fn literal_bits(&self) -> Option<u64> {
        match self.operands {
            KeyOperands::Literal(bits) => Some(bits),
            _ => None,
        }
    }

    /// Whether a fresh value can be rebuilt from this key alone.
    ///
    /// Checked arithmetic and `Check` carry stackmaps the key does not
    /// record; pinned resources need payload the key only names by number.
    pub fn can_materialize(&self) -> bool {
        match self.opcode() {
            Opcode::CheckAdd
            | Opcode::CheckSub
            | Opcode::CheckMul
            | Opcode::Check
            | Opcode::ArgumentReg
            | Opcode::SlotBase => false,
            opcode if opcode.is_constant() => true,
            opcode => match (opcode.arity(), self.operands) {
                (Arity::Zero, KeyOperands::Leaf) => true,
                (Arity::One, KeyOperands::Unary(_)) => true,
                (Arity::Two, KeyOperands::Binary(..)) => true,
                (Arity::Three, KeyOperands::Ternary(..)) => true,
                _ => false,
            },
        }
    }
}

impl fmt::Display for ValueKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}<{}>", self.kind, self.ty)?;
        match self.operands {
            KeyOperands::Leaf => Ok(()),
            KeyOperands::Literal(bits) => write!(f, "(${bits:#x})"),
            _ => {
                let children: Vec<String> = self
                    .children()
                    .iter()
                    .map(|child| format!("{DUMP_PREFIX}{}", child.index()))
                    .collect();
                write!(f, "({})", children.join(", "))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equal_keys() {
        let a = ValueId::new(1);
        let b = ValueId::new(2);
        assert_eq!(
            ValueKey::binary(Opcode::Add, Type::Int32, a, b),
            ValueKey::binary(Opcode::Add, Type::Int32, a, b)
        );
        assert_ne!(
            ValueKey::binary(Opcode::Add, Type::Int32, a, b),
            ValueKey::binary(Opcode::Add, Type::Int32, b, a)
        );
        assert_ne!(
            ValueKey::binary(Opcode::Add, Type::Int32, a, b),
            ValueKey::binary(Opcode::Add, Type::Int64, a, b)
        );
    }

    #[test]
    fn test_literal_keys_compare_bits() {
        let pos = ValueKey::literal(Opcode::ConstDouble, Type::Double, 0.0f64.to_bits());
        let neg = ValueKey::literal(Opcode::ConstDouble, Type::Double, (-0.0f64).to_bits());
        assert_ne!(pos, neg);
        assert_eq!(pos.literal_bits(), Some(0));
    }

    #[test]
    fn test_can_materialize() {
        let a = ValueId::new(0);
        assert!(ValueKey::unary(Opcode::Neg, Type::Int32, a).can_materialize());
        assert!(ValueKey::literal(Opcode::Const32, Type::Int32, 5).can_materialize());
        assert!(ValueKey::leaf(Opcode::FramePointer, Type::Int64).can_materialize());
        assert!(!ValueKey::binary(Opcode::CheckAdd, Type::Int32, a, a).can_materialize());
        assert!(!ValueKey::literal(Opcode::ArgumentReg, Type::Int64, 3).can_materialize());
    }

    #[test]
    fn test_display() {
        let key = ValueKey::binary(Opcode::Mul, Type::Int64, ValueId::new(4), ValueId::new(9));
        assert_eq!(key.to_string(), "Mul<Int64>(b@4, b@9)");
        let leaf = ValueKey::leaf(Opcode::BottomTuple, Type::Tuple);
        assert_eq!(leaf.to_string(), "BottomTuple<Tuple>");
    }
}

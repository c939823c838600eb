//! Compile-time constants produced by folding.
//!
//! Fold hooks compute a [`Constant`] without touching the procedure; the
//! caller then materializes it with [`crate::ir::Procedure::add_constant`].

use std::fmt;

use super::opcode::Opcode;
use super::types::Type;

/// A typed constant. Floats are compared and hashed by bit pattern.
#[derive(Debug, Clone, Copy)]
pub enum Constant {
    Int32(i32),
    Int64(i64),
    Float(f32),
    Double(f64),
}

impl Constant {
    pub const fn ty(self) -> Type {
        match self {
            Constant::Int32(_) => Type::Int32,
            Constant::Int64(_) => Type::Int64,
            Constant::Float(_) => Type::Float,
            Constant::Double(_) => Type::Double,
        }
    }

    /// The opcode of the value that holds this constant.
    pub const fn opcode(self) -> Opcode {
        match self {
            Constant::Int32(_) => Opcode::Const32,
            Constant::Int64(_) => Opcode::Const64,
            Constant::Float(_) => Opcode::ConstFloat,
            Constant::Double(_) => Opcode::ConstDouble,
        }
    }

    /// Zero of the given numeric type.
    pub fn zero(ty: Type) -> Option<Constant> {
        match ty {
            Type::Int32 => Some(Constant::Int32(0)),
            Type::Int64 => Some(Constant::Int64(0)),
            Type::Float => Some(Constant::Float(0.0)),
            Type::Double => Some(Constant::Double(0.0)),
            Type::Void | Type::Tuple => None,
        }
    }

    /// Raw bits, zero-extended for 32-bit constants.
    pub const fn bits(self) -> u64 {
        match self {
            Constant::Int32(v) => v as u32 as u64,
            Constant::Int64(v) => v as u64,
            Constant::Float(v) => v.to_bits() as u64,
            Constant::Double(v) => v.to_bits(),
        }
    }
}

impl PartialEq for Constant {
    fn eq(&self, other: &Self) -> bool {
        self.ty() == other.ty() && self.bits() == other.bits()
    }
}

impl Eq for Constant {}

impl std::hash::Hash for Constant {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.ty().hash(state);
        self.bits().hash(state);
    }
}

impl fmt::Display for Constant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constant::Int32(v) => write!(f, "{v}"),
            Constant::Int64(v) => write!(f, "{v}"),
            Constant::Float(v) => write!(f, "{v:?}"),
            Constant::Double(v) => write!(f, "{v:?}"),
        }
    }
}

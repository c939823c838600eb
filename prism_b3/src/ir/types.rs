//! Value types.
//!
//! The backend works on a closed set of machine-level types:
//!
//! ```text
//!   Void      no value (stores, terminators, Nop)
//!   Int32     32-bit integer; also carries booleans (0 / 1)
//!   Int64     64-bit integer
//!   Float     IEEE-754 binary32
//!   Double    IEEE-754 binary64
//!   Tuple     multi-result (patchpoints, BottomTuple)
//! ```
//!
//! There is no signedness in the type: signed and unsigned interpretations are
//! chosen by opcode (`Div` vs `UDiv`, `LessThan` vs `Below`).

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[repr(u8)]
pub enum Type {
    #[default]
    Void = 0,
    Int32 = 1,
    Int64 = 2,
    Float = 3,
    Double = 4,
    Tuple = 5,
}

impl Type {
    /// Integer types (Int32, Int64).
    #[inline]
    pub const fn is_int(self) -> bool {
        matches!(self, Type::Int32 | Type::Int64)
    }

    /// Floating-point types (Float, Double).
    #[inline]
    pub const fn is_float(self) -> bool {
        matches!(self, Type::Float | Type::Double)
    }

    #[inline]
    pub const fn is_numeric(self) -> bool {
        self.is_int() || self.is_float()
    }

    #[inline]
    pub const fn is_void(self) -> bool {
        matches!(self, Type::Void)
    }

    #[inline]
    pub const fn is_tuple(self) -> bool {
        matches!(self, Type::Tuple)
    }

    /// Width in bits of a numeric type, or `None` for Void/Tuple.
    #[inline]
    pub const fn bit_width(self) -> Option<u32> {
        match self {
            Type::Int32 | Type::Float => Some(32),
            Type::Int64 | Type::Double => Some(64),
            Type::Void | Type::Tuple => None,
        }
    }

    /// Same-width counterpart in the other numeric domain.
    ///
    /// This is the type a `BitwiseCast` produces.
    #[inline]
    pub const fn bitwise_counterpart(self) -> Option<Type> {
        match self {
            Type::Int32 => Some(Type::Float),
            Type::Int64 => Some(Type::Double),
            Type::Float => Some(Type::Int32),
            Type::Double => Some(Type::Int64),
            Type::Void | Type::Tuple => None,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Type::Void => "Void",
            Type::Int32 => "Int32",
            Type::Int64 => "Int64",
            Type::Float => "Float",
            Type::Double => "Double",
            Type::Tuple => "Tuple",
        }
    }
}

/// The integer type that holds a machine pointer.
#[inline]
pub const fn pointer_type() -> Type {
    if cfg!(target_pointer_width = "64") {
        Type::Int64
    } else {
        Type::Int32
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domains() {
        assert!(Type::Int32.is_int());
        assert!(Type::Int64.is_int());
        assert!(!Type::Double.is_int());
        assert!(Type::Float.is_float());
        assert!(!Type::Tuple.is_numeric());
        assert!(Type::Void.is_void());
        assert_eq!(Type::default(), Type::Void);
    }

    #[test]
    fn test_bitwise_counterpart() {
        assert_eq!(Type::Int64.bitwise_counterpart(), Some(Type::Double));
        assert_eq!(Type::Double.bitwise_counterpart(), Some(Type::Int64));
        assert_eq!(Type::Int32.bitwise_counterpart(), Some(Type::Float));
        assert_eq!(Type::Float.bitwise_counterpart(), Some(Type::Int32));
        assert_eq!(Type::Void.bitwise_counterpart(), None);
        assert_eq!(Type::Tuple.bitwise_counterpart(), None);
    }

    #[test]
    fn test_bit_width() {
        assert_eq!(Type::Int32.bit_width(), Some(32));
        assert_eq!(Type::Double.bit_width(), Some(64));
        assert_eq!(Type::Void.bit_width(), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(Type::Int64.to_string(), "Int64");
        assert_eq!(format!("{}", Type::Void), "Void");
    }
}

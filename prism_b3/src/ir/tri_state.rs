//! Three-valued truth for compile-time facts.
//!
//! `Indeterminate` means "no answer": callers must assume nothing.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TriState {
    False,
    True,
    #[default]
    Indeterminate,
}

impl TriState {
    #[inline]
    pub const fn from_bool(value: bool) -> Self {
        if value { TriState::True } else { TriState::False }
    }

    #[inline]
    pub const fn is_definite(self) -> bool {
        !matches!(self, TriState::Indeterminate)
    }

    /// The known truth value, if any.
    #[inline]
    pub const fn as_bool(self) -> Option<bool> {
        match self {
            TriState::True => Some(true),
            TriState::False => Some(false),
            TriState::Indeterminate => None,
        }
    }

    /// Logical negation; indeterminate stays indeterminate.
    #[inline]
    pub const fn invert(self) -> Self {
        match self {
            TriState::True => TriState::False,
            TriState::False => TriState::True,
            TriState::Indeterminate => TriState::Indeterminate,
        }
    }
}

impl From<bool> for TriState {
    fn from(value: bool) -> Self {
        TriState::from_bool(value)
    }
}

impl fmt::Display for TriState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TriState::False => "False",
            TriState::True => "True",
            TriState::Indeterminate => "Indeterminate",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_indeterminate() {
        assert_eq!(TriState::default(), TriState::Indeterminate);
        assert_eq!(TriState::default().as_bool(), None);
    }

    #[test]
    fn test_invert() {
        assert_eq!(TriState::from(true).invert(), TriState::False);
        assert_eq!(TriState::False.invert(), TriState::True);
        assert_eq!(TriState::Indeterminate.invert(), TriState::Indeterminate);
    }
}

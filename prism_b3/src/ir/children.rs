//! Child operand storage.
//!
//! Fixed-arity values keep up to three children inline. Variable-arity values
//! (calls, patchpoints, checks) get a growable list. The representation is
//! picked once at construction from the opcode's [`Arity`] and is never
//! reinterpreted afterwards: a fixed list cannot grow, a var-arg list can.

use smallvec::SmallVec;

use super::opcode::Arity;
use super::value::ValueId;

/// Maximum number of inline children.
pub const MAX_FIXED_CHILDREN: usize = 3;

#[derive(Clone, PartialEq, Eq)]
pub enum Children {
    /// Zero to three children stored inline.
    Fixed {
        len: u8,
        slots: [ValueId; MAX_FIXED_CHILDREN],
    },
    /// Growable list for var-arg opcodes.
    VarArgs(SmallVec<[ValueId; 3]>),
}

impl Children {
    /// Empty fixed list.
    pub const fn none() -> Self {
        Children::Fixed {
            len: 0,
            slots: [ValueId::INVALID; MAX_FIXED_CHILDREN],
        }
    }

    /// Fixed list. Panics on more than three children.
    pub fn fixed(children: &[ValueId]) -> Self {
        assert!(
            children.len() <= MAX_FIXED_CHILDREN,
            "{} children do not fit inline",
            children.len()
        );
        let mut slots = [ValueId::INVALID; MAX_FIXED_CHILDREN];
        slots[..children.len()].copy_from_slice(children);
        Children::Fixed {
            len: children.len() as u8,
            slots,
        }
    }

    pub fn var_args(children: &[ValueId]) -> Self {
        Children::VarArgs(SmallVec::from_slice(children))
    }

    /// The representation an opcode of this arity uses.
    pub fn for_arity(arity: Arity, children: &[ValueId]) -> Self {
        if arity.is_var_args() {
            Children::var_args(children)
        } else {
            Children::fixed(children)
        }
    }

    #[inline]
    pub fn is_var_args(&self) -> bool {
        matches!(self, Children::VarArgs(_))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<ValueId> {
        self.as_slice().get(index).copied()
    }

    /// Overwrite child `index`. Panics if out of range.
    pub fn set(&mut self, index: usize, value: ValueId) {
        let len = self.len();
        match self.as_mut_slice().get_mut(index) {
            Some(slot) => *slot = value,
            None => panic!("child index {index} out of range for {len} children"),
        }
    }

    /// Append a child. Only var-arg lists grow.
    pub fn push(&mut self, value: ValueId) {
        match self {
            Children::VarArgs(list) => list.push(value),
            Children::Fixed { .. } => panic!("cannot append a child to a fixed-arity value"),
        }
    }

    pub fn extend_from_slice(&mut self, values: &[ValueId]) {
        match self {
            Children::VarArgs(list) => list.extend_from_slice(values),
            Children::Fixed { .. } => panic!("cannot append a child to a fixed-arity value"),
        }
    }

    #[inline]
    pub fn last(&self) -> Option<ValueId> {
        self.as_slice().last().copied()
    }

    #[inline]
    pub fn iter(&self) -> std::iter::Copied<std::slice::Iter<'_, ValueId>> {
        self.as_slice().iter().copied()
    }

    pub fn as_slice(&self) -> &[ValueId] {
        match self {
            Children::Fixed { len, slots } => &slots[..*len as usize],
            Children::VarArgs(list) => list.as_slice(),
        }
    }

    pub fn as_mut_slice(&mut self) -> &mut [ValueId] {
        match self {
            Children::Fixed { len, slots } => &mut slots[..*len as usize],
            Children::VarArgs(list) => list.as_mut_slice(),
        }
    }

    pub fn to_vec(&self) -> Vec<ValueId> {
        self.as_slice().to_vec()
    }
}

impl Default for Children {
    fn default() -> Self {
        Children::none()
    }
}

impl std::fmt::Debug for Children {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

impl<'a> IntoIterator for &'a Children {
    type Item = ValueId;
    type IntoIter = std::iter::Copied<std::slice::Iter<'a, ValueId>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

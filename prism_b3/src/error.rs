//! Error types.
//!
//! Broken invariants during construction or rewriting abort the compiler.
//! The only recoverable surface is [`crate::ir::Procedure::validate`], which
//! reports what is wrong with an already-built procedure.

use thiserror::Error;

use crate::ir::{BlockId, Kind, Type, ValueId};

/// Result type alias
pub type Result<T> = std::result::Result<T, ValidationError>;

/// First inconsistency found by validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{value} refers to missing child {child}")]
    MissingChild { value: ValueId, child: ValueId },

    #[error("{value} is a {kind} with {count} children")]
    BadArity {
        value: ValueId,
        kind: Kind,
        count: usize,
    },

    #[error("{value} carries a payload that does not fit {kind}")]
    BadPayload { value: ValueId, kind: Kind },

    #[error("{value} has type {actual} but {kind} produces {expected}")]
    TypeMismatch {
        value: ValueId,
        kind: Kind,
        expected: Type,
        actual: Type,
    },

    #[error("{block} lists unknown value {value}")]
    UnknownValue { block: BlockId, value: ValueId },

    #[error("{value} is placed more than once")]
    DuplicatePlacement { value: ValueId },

    #[error("{value} sits in {block} but its owner is {owner:?}")]
    OwnerMismatch {
        value: ValueId,
        block: BlockId,
        owner: Option<BlockId>,
    },

    #[error("{value} claims owner {owner} but is not in it")]
    Orphan { value: ValueId, owner: BlockId },

    #[error("terminator {value} is not the last value of {block}")]
    MisplacedTerminator { value: ValueId, block: BlockId },

    #[error("{block} does not end in a terminator")]
    MissingTerminator { block: BlockId },

    #[error("{block} branches to unknown block {successor}")]
    UnknownSuccessor { block: BlockId, successor: BlockId },
}

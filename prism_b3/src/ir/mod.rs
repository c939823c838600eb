//! Backend IR: values in blocks, owned by a procedure.
//!
//! # Core Components
//!
//! - **Arena** (`arena.rs`): typed ids and append-only storage
//! - **Types / Opcodes / Kinds** (`types.rs`, `opcode.rs`, `kind.rs`)
//! - **Effects** (`effects.rs`, `heap_range.rs`): side-effect profiles
//! - **Keys** (`key.rs`): canonical projections for value numbering
//! - **Value** (`value.rs`, `children.rs`): the node and its payloads
//! - **Folding** (`fold.rs`): constant-fold hooks
//! - **Procedure** (`procedure.rs`, `block.rs`, `origin.rs`): ownership,
//!   construction and in-place rewrites
//! - **Diagnostics** (`dump.rs`, `validate.rs`)
//!
//! # Design Principles
//!
//! - **Stable identity**: a value's id never changes, even when the value
//!   is rewritten into a different operation
//! - **Derived facts**: effects and keys are computed on demand, never cached
//! - **Loud failure**: malformed construction aborts instead of miscompiling

pub mod arena;
pub mod block;
pub mod children;
pub mod constant;
pub mod dump;
pub mod effects;
pub mod fold;
pub mod heap_range;
pub mod key;
pub mod kind;
pub mod opcode;
pub mod origin;
pub mod procedure;
pub mod tri_state;
pub mod types;
pub mod validate;
pub mod value;

// Re-export commonly used types
pub use arena::{Arena, Id};
pub use block::{BasicBlock, BlockId, Frequency, FrequentedBlock};
pub use children::Children;
pub use constant::Constant;
pub use dump::{DUMP_PREFIX, DeepDump, SuccessorsDump};
pub use effects::Effects;
pub use heap_range::HeapRange;
pub use key::{KeyOperands, ValueKey};
pub use kind::{Kind, KindFlags};
pub use opcode::{Arity, Opcode, inverted_compare};
pub use origin::{Origin, OriginTable};
pub use procedure::Procedure;
pub use tri_state::TriState;
pub use types::{Type, pointer_type};
pub use value::{
    AtomicData, BoundsCheckBound, BoundsCheckData, MemoryData, Value, ValueData, ValueId, Width,
    infer_type, type_for,
};

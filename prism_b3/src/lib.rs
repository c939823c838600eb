//! Value-level substrate of a JIT backend IR.
//!
//! - Arena-owned values with stable ids and in-place rewrites
//! - Effect classification for reordering and elimination
//! - Canonical keys for value numbering
//! - Constant folding hooks
//! - Identity substitution and local CSE built on top

pub mod config;
pub mod error;
pub mod ir;
pub mod opt;

pub use config::{CseConfig, ProcedureConfig};
pub use error::ValidationError;
pub use ir::{Opcode, Origin, Procedure, Type, Value, ValueId};

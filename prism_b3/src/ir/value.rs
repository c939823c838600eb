//! The IR value node.
//!
//! A [`Value`] lives in its procedure's arena and is addressed by a
//! [`ValueId`] that never changes. Rewrites happen in place: the
//! `replace_with*` family reassigns the node's kind, type, children and
//! payload while keeping `index`, `owner` and `origin`, so every reference
//! held elsewhere keeps resolving to the same node and simply observes the
//! new operation.
//!
//! # Node Structure
//!
//! - **Kind**: opcode plus flag bits
//! - **Type**: cached result of [`type_for`] at construction
//! - **Children**: inline for fixed arities, growable for var-args
//! - **Payload**: opcode-specific fields in [`ValueData`]
//!
//! Queries that need to look at children (like [`Value::returns_bool`]) take
//! the owning [`Procedure`]; everything else is answered from the node alone.

use std::fmt;

use super::arena::Id;
use super::block::BlockId;
use super::children::Children;
use super::constant::Constant;
use super::effects::Effects;
use super::heap_range::HeapRange;
use super::key::ValueKey;
use super::kind::{Kind, bad_kind};
use super::opcode::Opcode;
use super::origin::Origin;
use super::procedure::Procedure;
use super::tri_state::TriState;
use super::types::{Type, pointer_type};

/// Unique identifier for a value in a procedure.
pub type ValueId = Id<Value>;

// =============================================================================
// Payloads
// =============================================================================

/// Access width of an atomic operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Width {
    W8,
    W16,
    W32,
    W64,
}

impl Width {
    pub const fn bytes(self) -> u32 {
        match self {
            Width::W8 => 1,
            Width::W16 => 2,
            Width::W32 => 4,
            Width::W64 => 8,
        }
    }

    /// Natural width of a register-sized type.
    pub const fn for_type(ty: Type) -> Option<Width> {
        match ty {
            Type::Int32 | Type::Float => Some(Width::W32),
            Type::Int64 | Type::Double => Some(Width::W64),
            Type::Void | Type::Tuple => None,
        }
    }
}

impl fmt::Display for Width {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.bytes() * 8)
    }
}

/// Payload of loads and stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryData {
    /// Byte offset added to the pointer child.
    pub offset: i32,
    /// Abstract heap touched by the access.
    pub range: HeapRange,
    /// Extra range ordered by the access's fence; empty when unfenced.
    pub fence_range: HeapRange,
}

impl MemoryData {
    pub fn new(offset: i32, range: HeapRange) -> Self {
        MemoryData {
            offset,
            range,
            fence_range: HeapRange::empty(),
        }
    }

    pub fn with_fence(mut self, fence_range: HeapRange) -> Self {
        self.fence_range = fence_range;
        self
    }

    #[inline]
    pub fn has_fence(&self) -> bool {
        !self.fence_range.is_empty()
    }
}

/// Payload of atomic read-modify-write and compare-and-swap operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AtomicData {
    pub width: Width,
    pub offset: i32,
    pub range: HeapRange,
    pub fence_range: HeapRange,
}

impl AtomicData {
    /// Fenced over the whole heap, the strongest and default ordering.
    pub fn new(width: Width, offset: i32, range: HeapRange) -> Self {
        AtomicData {
            width,
            offset,
            range,
            fence_range: HeapRange::top(),
        }
    }

    pub fn with_fence(mut self, fence_range: HeapRange) -> Self {
        self.fence_range = fence_range;
        self
    }

    #[inline]
    pub fn has_fence(&self) -> bool {
        !self.fence_range.is_empty()
    }
}

/// What a wasm bounds check compares the pointer against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundsCheckBound {
    /// The memory size held in the pinned register.
    Pinned,
    /// A fixed maximum address.
    Maximum(u64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundsCheckData {
    pub offset: u32,
    pub bound: BoundsCheckBound,
}

/// Opcode-specific fields.
///
/// Each opcode either needs exactly one payload variant or none at all;
/// [`ValueData::fits`] encodes the pairing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ValueData {
    None,
    Const32(i32),
    Const64(i64),
    /// Bit pattern of the double.
    ConstDouble(u64),
    /// Bit pattern of the float.
    ConstFloat(u32),
    Memory(MemoryData),
    Atomic(AtomicData),
    Fence {
        read: HeapRange,
        write: HeapRange,
    },
    /// Effects of the callee, supplied by the front end.
    CCall(Effects),
    /// Effects of the patchpoint body, supplied by the front end.
    Patchpoint(Effects),
    BoundsCheck(BoundsCheckData),
    /// Argument register number.
    ArgumentReg(u32),
    /// Stack slot number.
    SlotBase(u32),
    /// Local variable read by `Get` or written by `Set`.
    Variable(u32),
    /// The phi an upsilon feeds, once known.
    Upsilon(Option<ValueId>),
    /// Tuple element index.
    Extract(u32),
}

impl ValueData {
    /// Whether this payload is the one `opcode` requires.
    pub fn fits(&self, opcode: Opcode) -> bool {
        match self {
            ValueData::None => !needs_payload(opcode),
            ValueData::Const32(_) => opcode == Opcode::Const32,
            ValueData::Const64(_) => opcode == Opcode::Const64,
            ValueData::ConstDouble(_) => opcode == Opcode::ConstDouble,
            ValueData::ConstFloat(_) => opcode == Opcode::ConstFloat,
            ValueData::Memory(_) => opcode.is_load() || opcode.is_store(),
            ValueData::Atomic(_) => opcode.is_atomic(),
            ValueData::Fence { .. } => opcode == Opcode::Fence,
            ValueData::CCall(_) => opcode == Opcode::CCall,
            ValueData::Patchpoint(_) => opcode == Opcode::Patchpoint,
            ValueData::BoundsCheck(_) => opcode == Opcode::WasmBoundsCheck,
            ValueData::ArgumentReg(_) => opcode == Opcode::ArgumentReg,
            ValueData::SlotBase(_) => opcode == Opcode::SlotBase,
            ValueData::Variable(_) => matches!(opcode, Opcode::Get | Opcode::Set),
            ValueData::Upsilon(_) => opcode == Opcode::Upsilon,
            ValueData::Extract(_) => opcode == Opcode::Extract,
        }
    }

    /// Payload fields as `name = value` strings for dumps.
    pub(crate) fn meta(&self) -> Vec<String> {
        match self {
            ValueData::None => Vec::new(),
            ValueData::Const32(v) => vec![v.to_string()],
            ValueData::Const64(v) => vec![v.to_string()],
            ValueData::ConstDouble(bits) => vec![format!("{:?}", f64::from_bits(*bits))],
            ValueData::ConstFloat(bits) => vec![format!("{:?}", f32::from_bits(*bits))],
            ValueData::Memory(memory) => {
                let mut meta = Vec::new();
                if memory.offset != 0 {
                    meta.push(format!("offset = {}", memory.offset));
                }
                meta.push(format!("range = {}", memory.range));
                if memory.has_fence() {
                    meta.push(format!("fenceRange = {}", memory.fence_range));
                }
                meta
            }
            ValueData::Atomic(atomic) => {
                let mut meta = vec![format!("width = {}", atomic.width)];
                if atomic.offset != 0 {
                    meta.push(format!("offset = {}", atomic.offset));
                }
                meta.push(format!("range = {}", atomic.range));
                if atomic.has_fence() {
                    meta.push(format!("fenceRange = {}", atomic.fence_range));
                }
                meta
            }
            ValueData::Fence { read, write } => {
                vec![format!("read = {read}"), format!("write = {write}")]
            }
            ValueData::CCall(_) | ValueData::Patchpoint(_) => Vec::new(),
            ValueData::BoundsCheck(check) => {
                let mut meta = Vec::new();
                if check.offset != 0 {
                    meta.push(format!("offset = {}", check.offset));
                }
                match check.bound {
                    BoundsCheckBound::Pinned => meta.push("pinned".to_string()),
                    BoundsCheckBound::Maximum(max) => meta.push(format!("maximum = {max}")),
                }
                meta
            }
            ValueData::ArgumentReg(reg) => vec![format!("r{reg}")],
            ValueData::SlotBase(slot) => vec![format!("stack{slot}")],
            ValueData::Variable(var) => vec![format!("var{var}")],
            ValueData::Upsilon(Some(phi)) => {
                vec![format!("^{}", phi.index())]
            }
            ValueData::Upsilon(None) => Vec::new(),
            ValueData::Extract(index) => vec![format!("[{index}]")],
        }
    }
}

fn needs_payload(opcode: Opcode) -> bool {
    opcode.is_constant()
        || opcode.is_memory_access()
        || matches!(
            opcode,
            Opcode::Fence
                | Opcode::CCall
                | Opcode::Patchpoint
                | Opcode::WasmBoundsCheck
                | Opcode::ArgumentReg
                | Opcode::SlotBase
                | Opcode::Get
                | Opcode::Set
                | Opcode::Upsilon
                | Opcode::Extract
        )
}

// =============================================================================
// Type inference
// =============================================================================

/// Result type of `kind` applied to children of the given types.
///
/// Aborts when the opcode has no inference rule (its type must be given
/// explicitly) or the operand types make no sense for it.
pub fn type_for(kind: Kind, first: Option<Type>, second: Option<Type>) -> Type {
    match infer_type(kind, first, second) {
        Some(ty) => ty,
        None => {
            log::error!("no type inference rule for {kind}");
            panic!("no type inference rule for {kind}");
        }
    }
}

/// Like [`type_for`], but `None` for opcodes whose type is always explicit.
pub fn infer_type(kind: Kind, first: Option<Type>, second: Option<Type>) -> Option<Type> {
    let first_type = || match first {
        Some(ty) => ty,
        None => {
            log::error!("{kind} needs a first child to infer its type");
            panic!("{kind} needs a first child to infer its type");
        }
    };
    let ty = match kind.opcode() {
        Opcode::Identity
        | Opcode::Opaque
        | Opcode::Add
        | Opcode::Sub
        | Opcode::Mul
        | Opcode::Div
        | Opcode::UDiv
        | Opcode::Mod
        | Opcode::UMod
        | Opcode::Neg
        | Opcode::BitAnd
        | Opcode::BitOr
        | Opcode::BitXor
        | Opcode::Shl
        | Opcode::SShr
        | Opcode::ZShr
        | Opcode::RotR
        | Opcode::RotL
        | Opcode::Clz
        | Opcode::Abs
        | Opcode::Ceil
        | Opcode::Floor
        | Opcode::Sqrt
        | Opcode::CheckAdd
        | Opcode::CheckSub
        | Opcode::CheckMul
        | Opcode::Depend
        | Opcode::WasmAddress => first_type(),
        Opcode::FramePointer => pointer_type(),
        Opcode::SExt8
        | Opcode::SExt16
        | Opcode::Equal
        | Opcode::NotEqual
        | Opcode::LessThan
        | Opcode::GreaterThan
        | Opcode::LessEqual
        | Opcode::GreaterEqual
        | Opcode::Above
        | Opcode::Below
        | Opcode::AboveEqual
        | Opcode::BelowEqual
        | Opcode::EqualOrUnordered => Type::Int32,
        Opcode::Trunc => match first_type() {
            Type::Int64 => Type::Int32,
            Type::Double => Type::Float,
            other => {
                log::error!("Trunc of a {other} value");
                panic!("Trunc of a {other} value");
            }
        },
        Opcode::SExt32 | Opcode::ZExt32 => Type::Int64,
        Opcode::FloatToDouble | Opcode::IToD => Type::Double,
        Opcode::DoubleToFloat | Opcode::IToF => Type::Float,
        Opcode::BitwiseCast => {
            let source = first_type();
            match source.bitwise_counterpart() {
                Some(ty) => ty,
                None => {
                    log::error!("BitwiseCast of a {source} value");
                    panic!("BitwiseCast of a {source} value");
                }
            }
        }
        Opcode::Select => match second {
            Some(ty) => ty,
            None => {
                log::error!("Select needs a second child to infer its type");
                panic!("Select needs a second child to infer its type");
            }
        },
        Opcode::BottomTuple => Type::Tuple,
        Opcode::Nop
        | Opcode::Jump
        | Opcode::Branch
        | Opcode::Switch
        | Opcode::Return
        | Opcode::Oops
        | Opcode::EntrySwitch
        | Opcode::WasmBoundsCheck
        | Opcode::Check
        | Opcode::Store8
        | Opcode::Store16
        | Opcode::Store
        | Opcode::Fence
        | Opcode::Set
        | Opcode::Upsilon => Type::Void,
        _ => return None,
    };
    Some(ty)
}

// =============================================================================
// Value
// =============================================================================

#[derive(Debug, Clone)]
pub struct Value {
    index: ValueId,
    kind: Kind,
    ty: Type,
    origin: Origin,
    owner: Option<BlockId>,
    children: Children,
    data: ValueData,
}

impl Value {
    /// Build a node. Arity, payload and type checks are the procedure's job.
    pub(crate) fn new(
        index: ValueId,
        kind: Kind,
        ty: Type,
        origin: Origin,
        children: Children,
        data: ValueData,
    ) -> Self {
        Value {
            index,
            kind,
            ty,
            origin,
            owner: None,
            children,
            data,
        }
    }

    // -------------------------------------------------------------------------
    // Identity and shape
    // -------------------------------------------------------------------------

    #[inline]
    pub fn index(&self) -> ValueId {
        self.index
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
    pub fn origin(&self) -> Origin {
        self.origin
    }

    /// The block this value sits in. Maintained by the procedure.
    #[inline]
    pub fn owner(&self) -> Option<BlockId> {
        self.owner
    }

    #[inline]
    pub(crate) fn set_owner(&mut self, owner: Option<BlockId>) {
        self.owner = owner;
    }

    #[inline]
    pub fn children(&self) -> &Children {
        &self.children
    }

    #[inline]
    pub fn children_mut(&mut self) -> &mut Children {
        &mut self.children
    }

    /// Child `index`. Panics if there is no such child.
    pub fn child(&self, index: usize) -> ValueId {
        match self.children.get(index) {
            Some(child) => child,
            None => panic!(
                "{} has no child {index} ({} children)",
                self.index,
                self.children.len()
            ),
        }
    }

    pub fn set_child(&mut self, index: usize, child: ValueId) {
        self.children.set(index, child);
    }

    #[inline]
    pub fn num_children(&self) -> usize {
        self.children.len()
    }

    #[inline]
    pub fn last_child(&self) -> Option<ValueId> {
        self.children.last()
    }

    /// Append operands to a var-arg value (call arguments, stackmap inputs).
    pub fn append_children(&mut self, children: &[ValueId]) {
        self.children.extend_from_slice(children);
    }

    #[inline]
    pub fn data(&self) -> &ValueData {
        &self.data
    }

    // -------------------------------------------------------------------------
    // Constants
    // -------------------------------------------------------------------------

    #[inline]
    pub fn is_constant(&self) -> bool {
        self.opcode().is_constant()
    }

    pub fn as_int32(&self) -> Option<i32> {
        match self.data {
            ValueData::Const32(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_int64(&self) -> Option<i64> {
        match self.data {
            ValueData::Const64(v) => Some(v),
            _ => None,
        }
    }

    /// Integer constant of either width, sign-extended.
    pub fn as_int(&self) -> Option<i64> {
        match self.data {
            ValueData::Const32(v) => Some(v as i64),
            ValueData::Const64(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_double(&self) -> Option<f64> {
        match self.data {
            ValueData::ConstDouble(bits) => Some(f64::from_bits(bits)),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f32> {
        match self.data {
            ValueData::ConstFloat(bits) => Some(f32::from_bits(bits)),
            _ => None,
        }
    }

    pub fn as_constant(&self) -> Option<Constant> {
        match self.data {
            ValueData::Const32(v) => Some(Constant::Int32(v)),
            ValueData::Const64(v) => Some(Constant::Int64(v)),
            ValueData::ConstDouble(bits) => Some(Constant::Double(f64::from_bits(bits))),
            ValueData::ConstFloat(bits) => Some(Constant::Float(f32::from_bits(bits))),
            _ => None,
        }
    }

    #[inline]
    pub fn has_int32(&self) -> bool {
        self.as_int32().is_some()
    }

    #[inline]
    pub fn has_int64(&self) -> bool {
        self.as_int64().is_some()
    }

    #[inline]
    pub fn has_int(&self) -> bool {
        self.as_int().is_some()
    }

    #[inline]
    pub fn has_double(&self) -> bool {
        self.as_double().is_some()
    }

    #[inline]
    pub fn has_float(&self) -> bool {
        self.as_float().is_some()
    }

    /// Whether this is an integer constant equal to `value`.
    pub fn is_int(&self, value: i64) -> bool {
        self.as_int() == Some(value)
    }

    pub fn is_int32(&self, value: i32) -> bool {
        self.as_int32() == Some(value)
    }

    // -------------------------------------------------------------------------
    // Payload access
    // -------------------------------------------------------------------------

    pub fn memory(&self) -> Option<&MemoryData> {
        match &self.data {
            ValueData::Memory(memory) => Some(memory),
            _ => None,
        }
    }

    pub fn atomic(&self) -> Option<&AtomicData> {
        match &self.data {
            ValueData::Atomic(atomic) => Some(atomic),
            _ => None,
        }
    }

    pub fn bounds_check(&self) -> Option<&BoundsCheckData> {
        match &self.data {
            ValueData::BoundsCheck(check) => Some(check),
            _ => None,
        }
    }

    pub fn argument_reg(&self) -> Option<u32> {
        match self.data {
            ValueData::ArgumentReg(reg) => Some(reg),
            _ => None,
        }
    }

    pub fn slot(&self) -> Option<u32> {
        match self.data {
            ValueData::SlotBase(slot) => Some(slot),
            _ => None,
        }
    }

    pub fn variable(&self) -> Option<u32> {
        match self.data {
            ValueData::Variable(var) => Some(var),
            _ => None,
        }
    }

    pub fn extract_index(&self) -> Option<u32> {
        match self.data {
            ValueData::Extract(index) => Some(index),
            _ => None,
        }
    }

    /// The phi this upsilon feeds. Panics on anything but an Upsilon.
    pub fn phi(&self) -> Option<ValueId> {
        match self.data {
            ValueData::Upsilon(phi) => phi,
            _ => panic!("{} is a {}, not an Upsilon", self.index, self.kind),
        }
    }

    pub fn set_phi(&mut self, phi: ValueId) {
        match &mut self.data {
            ValueData::Upsilon(slot) => *slot = Some(phi),
            _ => panic!("{} is a {}, not an Upsilon", self.index, self.kind),
        }
    }

    // -------------------------------------------------------------------------
    // Analyses
    // -------------------------------------------------------------------------

    /// Side-effect profile, derived from the kind and payload.
    pub fn effects(&self) -> Effects {
        let mut result = Effects::none();
        match self.opcode() {
            Opcode::Div | Opcode::UDiv | Opcode::Mod | Opcode::UMod => {
                result.control_dependent = true;
            }
            Opcode::Load8Z | Opcode::Load8S | Opcode::Load16Z | Opcode::Load16S | Opcode::Load => {
                let memory = self.expect_memory();
                result.reads = memory.range;
                if memory.has_fence() {
                    result.writes = memory.fence_range;
                    result.fence = true;
                }
                result.control_dependent = true;
            }
            Opcode::Store8 | Opcode::Store16 | Opcode::Store => {
                let memory = self.expect_memory();
                result.writes = memory.range;
                if memory.has_fence() {
                    result.reads = memory.fence_range;
                    result.fence = true;
                }
                result.control_dependent = true;
            }
            opcode if opcode.is_atomic() => {
                let atomic = match &self.data {
                    ValueData::Atomic(atomic) => atomic,
                    _ => panic!("{} without atomic payload", self.kind),
                };
                result.reads = atomic.range | atomic.fence_range;
                result.writes = atomic.range | atomic.fence_range;
                result.fence = atomic.has_fence();
                result.control_dependent = true;
            }
            Opcode::WasmAddress => result.reads_pinned = true,
            Opcode::Fence => {
                if let ValueData::Fence { read, write } = self.data {
                    result.reads = read;
                    result.writes = write;
                }
                result.fence = true;
            }
            Opcode::CCall | Opcode::Patchpoint => {
                if let ValueData::CCall(effects) | ValueData::Patchpoint(effects) = self.data {
                    result = effects;
                }
            }
            Opcode::CheckAdd | Opcode::CheckSub | Opcode::CheckMul | Opcode::Check => {
                result = Effects::for_check();
            }
            Opcode::WasmBoundsCheck => {
                if let ValueData::BoundsCheck(check) = self.data {
                    result.reads_pinned = check.bound == BoundsCheckBound::Pinned;
                }
                result.exits_sideways = true;
            }
            Opcode::Upsilon | Opcode::Set => result.writes_local_state = true,
            Opcode::Phi | Opcode::Get => result.reads_local_state = true,
            opcode if opcode.is_terminal() => result.terminal = true,
            _ => {}
        }
        if self.kind.traps() {
            result.exits_sideways = true;
            result.reads = HeapRange::top();
        }
        result
    }

    fn expect_memory(&self) -> &MemoryData {
        match &self.data {
            ValueData::Memory(memory) => memory,
            _ => panic!("{} without memory payload", self.kind),
        }
    }

    /// Canonical key for value numbering; `None` when the value must not be
    /// merged with a look-alike.
    pub fn key(&self) -> Option<ValueKey> {
        let (kind, ty) = (self.kind, self.ty);
        let key = match self.opcode() {
            Opcode::FramePointer | Opcode::BottomTuple => ValueKey::leaf(kind, ty),
            Opcode::Identity
            | Opcode::Opaque
            | Opcode::Abs
            | Opcode::Ceil
            | Opcode::Floor
            | Opcode::Sqrt
            | Opcode::SExt8
            | Opcode::SExt16
            | Opcode::SExt32
            | Opcode::ZExt32
            | Opcode::Clz
            | Opcode::Trunc
            | Opcode::IToD
            | Opcode::IToF
            | Opcode::FloatToDouble
            | Opcode::DoubleToFloat
            | Opcode::Check
            | Opcode::BitwiseCast
            | Opcode::Neg
            | Opcode::Depend => ValueKey::unary(kind, ty, self.child(0)),
            Opcode::Add
            | Opcode::Sub
            | Opcode::Mul
            | Opcode::Div
            | Opcode::UDiv
            | Opcode::Mod
            | Opcode::UMod
            | Opcode::BitAnd
            | Opcode::BitOr
            | Opcode::BitXor
            | Opcode::Shl
            | Opcode::SShr
            | Opcode::ZShr
            | Opcode::RotR
            | Opcode::RotL
            | Opcode::Equal
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
            | Opcode::CheckAdd
            | Opcode::CheckSub
            | Opcode::CheckMul => ValueKey::binary(kind, ty, self.child(0), self.child(1)),
            Opcode::Select => {
                ValueKey::ternary(kind, ty, self.child(0), self.child(1), self.child(2))
            }
            Opcode::Const32 | Opcode::Const64 | Opcode::ConstDouble | Opcode::ConstFloat => {
                let constant = self.as_constant()?;
                ValueKey::literal(kind, ty, constant.bits())
            }
            Opcode::ArgumentReg => ValueKey::literal(kind, ty, self.argument_reg()? as u64),
            Opcode::SlotBase => ValueKey::literal(kind, ty, self.slot()? as u64),
            _ => return None,
        };
        Some(key)
    }

    /// Whether duplicating this value costs nothing.
    pub fn is_free(&self) -> bool {
        matches!(
            self.opcode(),
            Opcode::Const32
                | Opcode::Const64
                | Opcode::ConstDouble
                | Opcode::ConstFloat
                | Opcode::Identity
                | Opcode::Opaque
                | Opcode::Nop
        )
    }

    /// Whether this float value is known to hold an integral number.
    ///
    /// False for non-float values.
    pub fn is_rounded(&self) -> bool {
        if !self.ty.is_float() {
            return false;
        }
        match self.opcode() {
            Opcode::Floor | Opcode::Ceil | Opcode::IToD | Opcode::IToF => true,
            Opcode::ConstDouble => self
                .as_double()
                .is_some_and(|v| v.is_finite() && v == v.ceil()),
            Opcode::ConstFloat => self
                .as_float()
                .is_some_and(|v| v.is_finite() && v == v.ceil()),
            _ => false,
        }
    }

    /// Truthiness of a constant: nonzero is true. Non-constants are
    /// indeterminate. Float zero uses IEEE equality, so `-0.0` is false.
    pub fn as_tri_state(&self) -> TriState {
        match self.data {
            ValueData::Const32(v) => TriState::from_bool(v != 0),
            ValueData::Const64(v) => TriState::from_bool(v != 0),
            ValueData::ConstDouble(bits) => TriState::from_bool(f64::from_bits(bits) != 0.0),
            ValueData::ConstFloat(bits) => TriState::from_bool(f32::from_bits(bits) != 0.0),
            _ => TriState::Indeterminate,
        }
    }

    /// Whether this Int32 value is always 0 or 1.
    pub fn returns_bool(&self, proc: &Procedure) -> bool {
        if self.ty != Type::Int32 {
            return false;
        }
        let child_returns_bool = |index: usize| proc.value(self.child(index)).returns_bool(proc);
        match self.opcode() {
            Opcode::Const32 => matches!(self.as_int32(), Some(0 | 1)),
            Opcode::BitAnd => child_returns_bool(0) || child_returns_bool(1),
            Opcode::BitOr | Opcode::BitXor => child_returns_bool(0) && child_returns_bool(1),
            Opcode::Select => child_returns_bool(1) && child_returns_bool(2),
            Opcode::Identity => child_returns_bool(0),
            Opcode::AtomicWeakCAS => true,
            opcode => opcode.is_comparison(),
        }
    }

    // -------------------------------------------------------------------------
    // In-place replacement
    // -------------------------------------------------------------------------

    /// Turn this node into a childless `kind` of type `ty`.
    ///
    /// Index, owner and origin survive; children and payload do not.
    pub fn replace_with(&mut self, kind: impl Into<Kind>, ty: Type) {
        self.reconstruct(kind.into(), ty, Children::none());
    }

    /// Turn this node into a single-child `kind` of type `ty`.
    pub fn replace_with_child(&mut self, kind: impl Into<Kind>, ty: Type, child: ValueId) {
        self.reconstruct(kind.into(), ty, Children::fixed(&[child]));
    }

    fn reconstruct(&mut self, kind: Kind, ty: Type, children: Children) {
        let opcode = kind.opcode();
        if !opcode.arity().accepts(children.len()) || !ValueData::None.fits(opcode) {
            bad_kind(kind, children.len());
        }
        log::trace!(
            "replacing {} {} {} with {} {}",
            self.ty,
            self.index,
            self.kind,
            ty,
            kind
        );
        *self = Value {
            index: self.index,
            kind,
            ty,
            origin: self.origin,
            owner: self.owner,
            children,
            data: ValueData::None,
        };
    }

    /// Become a Nop. Only Void values may do this.
    pub fn replace_with_nop(&mut self) {
        assert!(
            self.ty == Type::Void,
            "replace_with_nop on {} {}",
            self.ty,
            self.index
        );
        self.replace_with_nop_ignoring_type();
    }

    pub fn replace_with_nop_ignoring_type(&mut self) {
        self.replace_with(Opcode::Nop, Type::Void);
    }

    /// Become a Phi of the same type, or a Nop when Void.
    pub fn replace_with_phi(&mut self) {
        if self.ty == Type::Void {
            self.replace_with_nop();
            return;
        }
        self.replace_with(Opcode::Phi, self.ty);
    }
}

//! Kind: an opcode plus the orthogonal flag bits some opcodes define.
//!
//! Flags are only meaningful for the opcodes that define them. Constructing a
//! kind with a flag its opcode does not define is a compiler bug and aborts.

use std::fmt;

use super::opcode::Opcode;

bitflags::bitflags! {
    /// Extra bits carried by a [`Kind`].
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct KindFlags: u8 {
        /// Div/Mod: x/0 == 0 and MIN/-1 == MIN instead of trapping.
        const CHILL = 0b0000_0001;
        /// Memory access: a fault is caught and turned into a trap exit.
        const TRAPS = 0b0000_0010;
        /// Float arithmetic: NaN payloads are observable.
        const SENSITIVE_TO_NAN = 0b0000_0100;
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Kind {
    opcode: Opcode,
    flags: KindFlags,
}

impl Kind {
    #[inline]
    pub const fn new(opcode: Opcode) -> Self {
        Kind {
            opcode,
            flags: KindFlags::empty(),
        }
    }

    /// Build a kind with flags, checking each flag against the opcode.
    pub fn with_flags(opcode: Opcode, flags: KindFlags) -> Self {
        let mut kind = Kind::new(opcode);
        if flags.contains(KindFlags::CHILL) {
            kind.set_chill();
        }
        if flags.contains(KindFlags::TRAPS) {
            kind.set_traps();
        }
        if flags.contains(KindFlags::SENSITIVE_TO_NAN) {
            kind.set_sensitive_to_nan();
        }
        kind
    }

    #[inline]
    pub const fn opcode(self) -> Opcode {
        self.opcode
    }

    #[inline]
    pub const fn flags(self) -> KindFlags {
        self.flags
    }

    #[inline]
    pub const fn has_extra_bits(self) -> bool {
        !self.flags.is_empty()
    }

    /// Only Div and Mod have a chill form.
    pub fn is_chill(self) -> bool {
        assert!(
            self.opcode.is_chillable(),
            "asked for chill bit of {}",
            self.opcode
        );
        self.flags.contains(KindFlags::CHILL)
    }

    pub fn set_chill(&mut self) {
        assert!(
            self.opcode.is_chillable(),
            "{} cannot be chill",
            self.opcode
        );
        self.flags.insert(KindFlags::CHILL);
    }

    /// Whether this is a trapping memory access.
    ///
    /// Safe to ask of any opcode; only memory accesses can trap.
    #[inline]
    pub fn traps(self) -> bool {
        self.opcode.is_memory_access() && self.flags.contains(KindFlags::TRAPS)
    }

    pub fn set_traps(&mut self) {
        assert!(
            self.opcode.is_memory_access(),
            "{} cannot trap",
            self.opcode
        );
        self.flags.insert(KindFlags::TRAPS);
    }

    pub fn is_sensitive_to_nan(self) -> bool {
        assert!(
            self.opcode.is_nan_sensitive_capable(),
            "asked for NaN sensitivity of {}",
            self.opcode
        );
        self.flags.contains(KindFlags::SENSITIVE_TO_NAN)
    }

    pub fn set_sensitive_to_nan(&mut self) {
        assert!(
            self.opcode.is_nan_sensitive_capable(),
            "{} cannot be NaN-sensitive",
            self.opcode
        );
        self.flags.insert(KindFlags::SENSITIVE_TO_NAN);
    }
}

/// Abort on an opcode built with the wrong shape.
#[cold]
pub(crate) fn bad_kind(kind: Kind, num_children: usize) -> ! {
    log::error!("bad kind {kind} with {num_children} children");
    panic!("bad kind {kind} with {num_children} children");
}

impl From<Opcode> for Kind {
    #[inline]
    fn from(opcode: Opcode) -> Self {
        Kind::new(opcode)
    }
}

impl PartialEq<Opcode> for Kind {
    fn eq(&self, other: &Opcode) -> bool {
        self.opcode == *other && !self.has_extra_bits()
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.opcode)?;
        if !self.has_extra_bits() {
            return Ok(());
        }
        let mut names = Vec::with_capacity(3);
        if self.flags.contains(KindFlags::CHILL) {
            names.push("Chill");
        }
        if self.flags.contains(KindFlags::TRAPS) {
            names.push("Traps");
        }
        if self.flags.contains(KindFlags::SENSITIVE_TO_NAN) {
            names.push("SensitiveToNaN");
        }
        write!(f, "<{}>", names.join("|"))
    }
}

impl fmt::Debug for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

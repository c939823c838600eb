//! Side-effect and ordering profile of a value.
//!
//! `Effects` is what passes consult before moving, duplicating or deleting a
//! value. It is never stored on the value; [`crate::ir::Value::effects`]
//! derives it on demand from the kind and payload.
//!
//! The empty profile means the value is a pure function of its children: it
//! can be hoisted, sunk, duplicated and dropped when unused.

use std::fmt;

use super::heap_range::HeapRange;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Effects {
    /// Ends the basic block.
    pub terminal: bool,

    /// May leave normal control flow (deoptimization, trap handler).
    pub exits_sideways: bool,

    /// Result is only valid once control reaches this point without having
    /// exited: e.g. may fault or divide by zero. Must not be hoisted above its
    /// guards, nor dropped without proof it cannot trap.
    pub control_dependent: bool,

    /// Writes the SSA-construction local-state store (Upsilon, Set).
    pub writes_local_state: bool,

    /// Reads the SSA-construction local-state store (Phi, Get).
    pub reads_local_state: bool,

    /// Clobbers the pinned register.
    pub writes_pinned: bool,

    /// Reads the pinned register (e.g. a memory base).
    pub reads_pinned: bool,

    /// Imposes a memory-ordering barrier.
    pub fence: bool,

    pub writes: HeapRange,
    pub reads: HeapRange,
}

impl Effects {
    #[inline]
    pub const fn none() -> Self {
        Effects {
            terminal: false,
            exits_sideways: false,
            control_dependent: false,
            writes_local_state: false,
            reads_local_state: false,
            writes_pinned: false,
            reads_pinned: false,
            fence: false,
            writes: HeapRange::empty(),
            reads: HeapRange::empty(),
        }
    }

    /// Conservative profile of a call into unknown code.
    pub const fn for_call() -> Self {
        Effects {
            exits_sideways: true,
            control_dependent: true,
            reads: HeapRange::top(),
            writes: HeapRange::top(),
            ..Effects::none()
        }
    }

    /// Profile of a value that may deoptimize: the exit may observe any heap
    /// state, but nothing is written on the fast path.
    pub const fn for_check() -> Self {
        Effects {
            exits_sideways: true,
            reads: HeapRange::top(),
            ..Effects::none()
        }
    }

    /// True when nothing is set.
    #[inline]
    pub fn is_none(&self) -> bool {
        *self == Effects::none()
    }

    /// Whether the value must be kept even when its result is unused.
    pub fn must_execute(&self) -> bool {
        self.terminal
            || self.exits_sideways
            || self.writes_local_state
            || !self.writes.is_empty()
            || self.writes_pinned
            || self.fence
    }

    /// Whether two values carrying these profiles may not be reordered.
    ///
    /// Symmetric.
    pub fn interferes(&self, other: &Effects) -> bool {
        if interferes_with_terminal(self, other) || interferes_with_terminal(other, self) {
            return true;
        }
        if interferes_with_exit_sideways(self, other) || interferes_with_exit_sideways(other, self)
        {
            return true;
        }
        if interferes_with_writes_local_state(self, other)
            || interferes_with_writes_local_state(other, self)
        {
            return true;
        }
        if interferes_with_writes_pinned(self, other) || interferes_with_writes_pinned(other, self)
        {
            return true;
        }
        self.writes.overlaps(other.writes)
            || self.writes.overlaps(other.reads)
            || self.reads.overlaps(other.writes)
    }
}

fn interferes_with_terminal(terminal: &Effects, other: &Effects) -> bool {
    if !terminal.terminal {
        return false;
    }
    other.terminal
        || other.control_dependent
        || other.writes_local_state
        || !other.writes.is_empty()
        || other.writes_pinned
}

fn interferes_with_exit_sideways(exits: &Effects, other: &Effects) -> bool {
    if !exits.exits_sideways {
        return false;
    }
    other.control_dependent || !other.writes.is_empty() || other.writes_pinned
}

fn interferes_with_writes_local_state(writer: &Effects, other: &Effects) -> bool {
    if !writer.writes_local_state {
        return false;
    }
    other.writes_local_state || other.reads_local_state
}

fn interferes_with_writes_pinned(writer: &Effects, other: &Effects) -> bool {
    if !writer.writes_pinned {
        return false;
    }
    other.writes_pinned || other.reads_pinned
}

/// Prints only the parts that are set; the empty profile prints nothing.
impl fmt::Display for Effects {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts: Vec<String> = Vec::new();
        if self.terminal {
            parts.push("Terminal".into());
        }
        if self.exits_sideways {
            parts.push("ExitsSideways".into());
        }
        if self.control_dependent {
            parts.push("ControlDependent".into());
        }
        if self.writes_local_state {
            parts.push("WritesLocalState".into());
        }
        if self.reads_local_state {
            parts.push("ReadsLocalState".into());
        }
        if self.writes_pinned {
            parts.push("WritesPinned".into());
        }
        if self.reads_pinned {
            parts.push("ReadsPinned".into());
        }
        if self.fence {
            parts.push("Fence".into());
        }
        if !self.writes.is_empty() {
            parts.push(format!("Writes:{}", self.writes));
        }
        if !self.reads.is_empty() {
            parts.push(format!("Reads:{}", self.reads));
        }
        f.write_str(&parts.join("|"))
    }
}

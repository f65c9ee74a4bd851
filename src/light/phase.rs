//! Phase values and the identity token of a light

use std::fmt;
use std::sync::atomic::{AtomicU64, AtomicU8, Ordering};

/// One of the two traffic-light states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Red,
    Green,
}

impl Phase {
    /// The phase that follows this one
    pub fn toggled(self) -> Self {
        match self {
            Phase::Red => Phase::Green,
            Phase::Green => Phase::Red,
        }
    }

    fn to_bits(self) -> u8 {
        match self {
            Phase::Red => 0,
            Phase::Green => 1,
        }
    }

    fn from_bits(bits: u8) -> Self {
        if bits == 0 {
            Phase::Red
        } else {
            Phase::Green
        }
    }

    pub(crate) fn index(self) -> usize {
        self.to_bits() as usize
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Red => write!(f, "red"),
            Phase::Green => write!(f, "green"),
        }
    }
}

/// Lock-free cell holding a [`Phase`]
///
/// One writer, any number of readers; a read never sees a partial value.
#[derive(Debug)]
pub struct AtomicPhase {
    bits: AtomicU8,
}

impl AtomicPhase {
    pub fn new(phase: Phase) -> Self {
        Self {
            bits: AtomicU8::new(phase.to_bits()),
        }
    }

    pub fn load(&self) -> Phase {
        Phase::from_bits(self.bits.load(Ordering::Acquire))
    }

    pub fn store(&self, phase: Phase) {
        self.bits.store(phase.to_bits(), Ordering::Release);
    }
}

static NEXT_LIGHT_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a light
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LightId(u64);

impl LightId {
    pub(crate) fn next() -> Self {
        Self(NEXT_LIGHT_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for LightId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "light-{}", self.0)
    }
}

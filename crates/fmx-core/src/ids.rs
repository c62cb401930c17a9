use core::fmt;

/// Opaque handle the host uses to address one model variable.
///
/// - `u32` matches the width hosts pass across the interface
/// - references are contiguous from 0, so `index()` is a direct table slot
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ValueReference(u32);

impl ValueReference {
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Raw numeric value as seen by the host.
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Slot in a variable table.
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl From<u32> for ValueReference {
    fn from(raw: u32) -> Self {
        Self(raw)
    }
}

impl From<ValueReference> for u32 {
    fn from(vr: ValueReference) -> Self {
        vr.0
    }
}

impl fmt::Debug for ValueReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "vr({})", self.0)
    }
}

impl fmt::Display for ValueReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

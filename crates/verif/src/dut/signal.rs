//! Signal edge definitions.

/// A transition direction on a signal's least-significant bit.
///
/// Edge waits are meaningful for single-bit signals (clocks, strobes,
/// chip-selects, done flags); multi-bit buses are sampled with
/// [`Dut::get`](crate::dut::Dut::get) instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    /// Low-to-high transition.
    Rising,
    /// High-to-low transition.
    Falling,
}

impl Edge {
    /// Whether an `old -> new` value change is this edge.
    pub(crate) fn matches(self, old: u64, new: u64) -> bool {
        let (o, n) = (old & 1, new & 1);
        match self {
            Self::Rising => o == 0 && n == 1,
            Self::Falling => o == 1 && n == 0,
        }
    }
}

//! Prefix argument (`C-u`, `M-5`, `M--`) state.

use std::fmt;

/// A pending prefix argument. Absence is `Option::None` at the use sites.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrefixArg {
    /// `C-u` pressed `k` times, carrying `4^k`. `Universal(4)` is the bare marker.
    Universal(i64),
    /// A bare `-`.
    Negative,
    /// A typed number.
    Value(i64),
}

impl PrefixArg {
    pub const BARE: PrefixArg = PrefixArg::Universal(4);

    pub fn numeric_value(self) -> i64 {
        match self {
            PrefixArg::Universal(n) | PrefixArg::Value(n) => n,
            PrefixArg::Negative => -1,
        }
    }
}

/// Numeric value of an optional prefix argument; absent means 1.
pub fn numeric_value(arg: Option<PrefixArg>) -> i64 {
    arg.map_or(1, PrefixArg::numeric_value)
}

impl fmt::Display for PrefixArg {
    /// Echo form: `C-u` for the bare marker, `C-u(16)`, `C-u(-)`, `C-u(12)` otherwise.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            &PrefixArg::BARE => write!(f, "C-u"),
            PrefixArg::Universal(n) | PrefixArg::Value(n) => write!(f, "C-u({})", n),
            PrefixArg::Negative => write!(f, "C-u(-)"),
        }
    }
}

/// Holds the prefix argument between the command that sets it and the
/// command that consumes it.
#[derive(Debug, Default)]
pub struct PrefixArgState {
    pending: Option<PrefixArg>,
}

impl PrefixArgState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite the pending value. Last setter wins.
    pub fn set(&mut self, value: Option<PrefixArg>) {
        self.pending = value;
    }

    /// Return the pending value and clear it.
    pub fn take_current(&mut self) -> Option<PrefixArg> {
        self.pending.take()
    }

    pub fn clear(&mut self) {
        self.pending = None;
    }

    pub fn pending(&self) -> Option<PrefixArg> {
        self.pending
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}
